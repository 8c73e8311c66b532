//! Error log reader - đọc records từ JSONL files

use crate::error::{PersistenceError, PersistenceResult};
use crate::logs::record::ErrorRecord;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub struct ErrorLogReader {
    base_path: PathBuf,
}

impl ErrorLogReader {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Đọc tất cả records từ một file
    pub fn read_file(&self, file_path: &Path) -> PersistenceResult<Vec<ErrorRecord>> {
        let reader = BufReader::new(File::open(file_path)?);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }

        Ok(records)
    }

    /// Đọc records theo ngày (`YYYY-MM-DD`)
    pub fn read_date(&self, date: &str) -> PersistenceResult<Vec<ErrorRecord>> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| PersistenceError::Other(format!("Invalid date {}: {}", date, e)))?;

        let file_path = self.base_path.join(format!("{}.jsonl", date));
        if file_path.exists() {
            self.read_file(&file_path)
        } else {
            Ok(Vec::new())
        }
    }

    /// Đọc tất cả records, cũ trước
    pub fn read_all(&self) -> PersistenceResult<Vec<ErrorRecord>> {
        let mut all = Vec::new();
        if !self.base_path.exists() {
            return Ok(all);
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.base_path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |ext| ext == "jsonl"))
            .collect();
        files.sort();

        for file_path in files {
            all.extend(self.read_file(&file_path)?);
        }
        Ok(all)
    }

    /// `limit` records gần nhất, mới trước
    pub fn recent(&self, limit: usize) -> PersistenceResult<Vec<ErrorRecord>> {
        let mut all = self.read_all()?;
        all.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.sequence().cmp(&a.sequence()))
        });
        all.truncate(limit);
        Ok(all)
    }

    /// Tìm record theo id
    pub fn find(&self, error_id: &str) -> PersistenceResult<ErrorRecord> {
        self.read_all()?
            .into_iter()
            .find(|r| r.error_id == error_id)
            .ok_or_else(|| PersistenceError::not_found("ErrorRecord", error_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::ErrorLogStore;
    use tempfile::tempdir;

    #[test]
    fn test_read_back_and_recent() {
        let dir = tempdir().unwrap();
        let store = ErrorLogStore::new(dir.path()).unwrap();
        for msg in ["first", "second", "third"] {
            let record = ErrorRecord::new(&store.next_error_id(), "internal", msg);
            store.append(&record).unwrap();
        }

        let reader = ErrorLogReader::new(dir.path());
        assert_eq!(reader.read_all().unwrap().len(), 3);

        let recent = reader.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "third");

        assert_eq!(reader.find("ERR_000002").unwrap().message, "second");
        assert!(reader.find("ERR_999999").unwrap_err().is_not_found());
    }

    #[test]
    fn test_read_missing_date() {
        let dir = tempdir().unwrap();
        let reader = ErrorLogReader::new(dir.path());
        assert!(reader.read_date("2020-01-01").unwrap().is_empty());
        assert!(reader.read_date("yesterday").is_err());
    }
}
