//! Error log module
//!
//! Ghi và đọc error records từ JSONL files, phục vụ security center.

pub mod reader;
pub mod record;
pub mod store;

pub use reader::ErrorLogReader;
pub use record::ErrorRecord;
pub use store::ErrorLogStore;
