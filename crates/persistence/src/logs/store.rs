//! JSONL Error Log Store - append-only writer
//!
//! Ghi error records vào files JSONL theo ngày: `logs/errors/2026-01-25.jsonl`

use crate::error::{PersistenceError, PersistenceResult};
use crate::logs::record::ErrorRecord;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Error log store - ghi records vào files JSONL.
pub struct ErrorLogStore {
    base_path: PathBuf,
    /// Counter cho error ID, tiếp tục qua các lần khởi động
    error_counter: AtomicU64,
    current_writer: Mutex<Option<LogWriter>>,
}

struct LogWriter {
    date: String,
    writer: BufWriter<File>,
}

impl ErrorLogStore {
    /// Tạo store mới, tạo thư mục nếu chưa có
    pub fn new<P: AsRef<Path>>(base_path: P) -> PersistenceResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        let next_id = Self::load_error_counter(&base_path)?;

        Ok(Self {
            base_path,
            error_counter: AtomicU64::new(next_id),
            current_writer: Mutex::new(None),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Quét các file hiện có để lấy id lớn nhất
    fn load_error_counter(base_path: &Path) -> PersistenceResult<u64> {
        let mut max_id: u64 = 0;

        for entry in fs::read_dir(base_path)?.flatten() {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "jsonl") {
                let content = fs::read_to_string(&path)?;
                for line in content.lines() {
                    // Dòng hỏng bị bỏ qua, không chặn khởi động
                    if let Ok(record) = serde_json::from_str::<ErrorRecord>(line) {
                        if let Some(seq) = record.sequence() {
                            max_id = max_id.max(seq);
                        }
                    }
                }
            }
        }

        Ok(max_id + 1)
    }

    fn file_path(&self, date: &str) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", date))
    }

    fn lock_writer(&self) -> PersistenceResult<MutexGuard<'_, Option<LogWriter>>> {
        self.current_writer
            .lock()
            .map_err(|_| PersistenceError::Other("error log writer lock poisoned".to_string()))
    }

    /// Generate error ID mới
    pub fn next_error_id(&self) -> String {
        let id = self.error_counter.fetch_add(1, Ordering::SeqCst);
        format!("ERR_{:06}", id)
    }

    /// Ghi record vào file theo ngày của record
    pub fn append(&self, record: &ErrorRecord) -> PersistenceResult<()> {
        let date = record.date();
        let json = serde_json::to_string(record)?;

        let mut guard = self.lock_writer()?;

        let needs_new_file = guard.as_ref().map_or(true, |w| w.date != date);
        if needs_new_file {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.file_path(&date))?;
            *guard = Some(LogWriter {
                date,
                writer: BufWriter::new(file),
            });
        }

        if let Some(ref mut w) = *guard {
            writeln!(w.writer, "{}", json)?;
            w.writer.flush()?;
        }

        Ok(())
    }

    /// Danh sách files, sắp xếp theo ngày
    pub fn list_files(&self) -> PersistenceResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "jsonl") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn flush(&self) -> PersistenceResult<()> {
        let mut guard = self.lock_writer()?;
        if let Some(ref mut w) = *guard {
            w.writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for ErrorLogStore {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
