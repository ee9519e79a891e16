//! Scanning of solver run logs for communication and completion records.

pub mod parse;
pub mod record;
pub mod scan;

pub use parse::RecordParser;
pub use record::{CommunicationEvent, CompletionRecord, LogRecord};
pub use scan::{LogScan, LogScanner, scan_log};
