use crate::error::{MalformedReason, ScanError};
use crate::runlog::parse::RecordParser;
use crate::runlog::record::{CommunicationEvent, CompletionRecord, LogRecord};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Streams the recognized records of one log file.
///
/// Communication sequence numbers must continue from the value handed to
/// [`LogScanner::open`] without gaps or repeats. The first violation, or the
/// first I/O failure, is yielded as an error and ends the iteration.
/// Unrecognized lines are skipped. `\r\n` terminators are read as `\n`.
/// The file is closed when the scanner drops.
pub struct LogScanner<'p> {
    parser: &'p RecordParser,
    path: PathBuf,
    reader: BufReader<File>,
    line: String,
    line_no: usize,
    next_sequence: u64,
    completion_seen: bool,
    done: bool,
}

impl<'p> LogScanner<'p> {
    pub fn open(
        parser: &'p RecordParser,
        path: impl AsRef<Path>,
        expected_next_sequence: u64,
    ) -> Result<Self, ScanError> {
        let path = path.as_ref().to_path_buf();
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ScanError::MissingLogFile { path });
            }
            Err(source) => return Err(ScanError::Io { path, source }),
        };

        Ok(Self {
            parser,
            path,
            reader: BufReader::new(file),
            line: String::new(),
            line_no: 0,
            next_sequence: expected_next_sequence,
            completion_seen: false,
            done: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sequence number the next communication record must carry.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn completion_seen(&self) -> bool {
        self.completion_seen
    }

    fn malformed(&self, reason: impl Into<MalformedReason>) -> ScanError {
        ScanError::MalformedRecord {
            path: self.path.clone(),
            line: self.line_no,
            reason: reason.into(),
        }
    }

    fn read_record(&mut self) -> Result<Option<LogRecord>, ScanError> {
        loop {
            self.line.clear();
            let n = self
                .reader
                .read_line(&mut self.line)
                .map_err(|source| ScanError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if self.line.ends_with("\r\n") {
                self.line.truncate(self.line.len() - 2);
                self.line.push('\n');
            }

            let record = self
                .parser
                .parse_line(&self.line)
                .map_err(|e| self.malformed(e))?;

            match record {
                LogRecord::Communication(event) => {
                    if event.sequence_number != self.next_sequence {
                        return Err(self.malformed(MalformedReason::SequenceMismatch {
                            expected: self.next_sequence,
                            found: event.sequence_number,
                        }));
                    }
                    self.next_sequence += 1;
                    return Ok(Some(record));
                }
                LogRecord::Completion(_) => {
                    if self.completion_seen {
                        return Err(self.malformed(MalformedReason::DuplicateCompletion));
                    }
                    self.completion_seen = true;
                    return Ok(Some(record));
                }
                LogRecord::Unrecognized => continue,
            }
        }
    }
}

impl Iterator for LogScanner<'_> {
    type Item = Result<LogRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Everything one log file contributed.
#[derive(Debug, Clone)]
pub struct LogScan {
    pub path: PathBuf,
    pub events: Vec<CommunicationEvent>,
    /// `None` means the run hit its time limit before finishing.
    pub completion: Option<CompletionRecord>,
}

impl LogScan {
    pub fn timed_out(&self) -> bool {
        self.completion.is_none()
    }

    pub fn comm_time(&self) -> f64 {
        self.events.iter().map(|e| e.duration_seconds).sum()
    }
}

/// Scan a whole log file into a [`LogScan`].
pub fn scan_log(
    parser: &RecordParser,
    path: impl AsRef<Path>,
    expected_next_sequence: u64,
) -> Result<LogScan, ScanError> {
    let mut scanner = LogScanner::open(parser, path, expected_next_sequence)?;

    let mut events = Vec::new();
    let mut completion = None;
    for record in scanner.by_ref() {
        match record? {
            LogRecord::Communication(event) => events.push(event),
            LogRecord::Completion(record) => completion = Some(record),
            LogRecord::Unrecognized => {}
        }
    }

    Ok(LogScan {
        path: scanner.path,
        events,
        completion,
    })
}
