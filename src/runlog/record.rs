use serde::Serialize;

/// One "Communication" line: a finished sharing round of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommunicationEvent {
    pub sequence_number: u64,
    pub duration_seconds: f64,
}

/// The "Mono job done." line written when a run terminates in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionRecord {
    pub total_runtime_seconds: f64,
}

/// Classification of a single log line.
#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    Communication(CommunicationEvent),
    Completion(CompletionRecord),
    Unrecognized,
}
