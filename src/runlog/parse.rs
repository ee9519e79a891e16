use crate::Result;
use crate::error::RecordError;
use crate::runlog::record::{CommunicationEvent, CompletionRecord, LogRecord};
use regex::Regex;
use std::str::FromStr;

/// Any line mentioning this token is a communication record.
pub const COMMUNICATION_TOKEN: &str = "Communication";

/// Classifies raw log lines into [`LogRecord`]s.
///
/// Communication grammar: the line contains `Communication`, exactly two
/// whitespace-bounded integer tokens (worker index, sequence number) and
/// exactly two decimal numbers `[0-9]+\.[0-9]+` (timestamp, duration).
///
/// Completion grammar: the whole line, terminator included, is
/// `c <float> 0 Mono job done.\n` with single whitespace separators.
///
/// Example:
/// 3.120 0 Communication 4 took 0.0481 s
/// c 12.345 0 Mono job done.
pub struct RecordParser {
    float_re: Regex,
    completion_re: Regex,
}

impl RecordParser {
    pub fn new() -> Result<Self> {
        const FLOAT_RE: &str = r"[0-9]+\.[0-9]+";
        const COMPLETION_RE: &str = r"\Ac\s[0-9]+\.[0-9]+\s0\sMono\sjob\sdone\.\n\z";

        Ok(Self {
            float_re: Regex::new(FLOAT_RE)?,
            completion_re: Regex::new(COMPLETION_RE)?,
        })
    }

    /// Classify one line. `line` must still carry its `\n` terminator, since
    /// the completion grammar includes it.
    pub fn parse_line(&self, line: &str) -> std::result::Result<LogRecord, RecordError> {
        if line.contains(COMMUNICATION_TOKEN) {
            return self
                .parse_communication(line)
                .map(LogRecord::Communication);
        }

        match self.parse_completion(line)? {
            Some(record) => Ok(LogRecord::Completion(record)),
            None => Ok(LogRecord::Unrecognized),
        }
    }

    /// Extract the sequence number and duration from a communication line.
    /// The first integer (worker index) and first float (timestamp) are discarded.
    pub fn parse_communication(
        &self,
        line: &str,
    ) -> std::result::Result<CommunicationEvent, RecordError> {
        let integers = bounded_integers(line);
        if integers.len() != 2 {
            return Err(RecordError::IntegerTokenCount {
                found: integers.len(),
            });
        }

        let floats = self.floats(line);
        if floats.len() != 2 {
            return Err(RecordError::FloatTokenCount {
                expected: 2,
                found: floats.len(),
            });
        }

        Ok(CommunicationEvent {
            sequence_number: parse_number(integers[1])?,
            duration_seconds: parse_number(floats[1])?,
        })
    }

    /// `Ok(None)` when the line is not a completion line at all.
    pub fn parse_completion(
        &self,
        line: &str,
    ) -> std::result::Result<Option<CompletionRecord>, RecordError> {
        if !self.completion_re.is_match(line) {
            return Ok(None);
        }

        let floats = self.floats(line);
        if floats.len() != 1 {
            return Err(RecordError::FloatTokenCount {
                expected: 1,
                found: floats.len(),
            });
        }

        Ok(Some(CompletionRecord {
            total_runtime_seconds: parse_number(floats[0])?,
        }))
    }

    fn floats<'a>(&self, line: &'a str) -> Vec<&'a str> {
        self.float_re.find_iter(line).map(|m| m.as_str()).collect()
    }
}

/// Digit-only tokens with whitespace on both sides. A token at the very start
/// of the line, or one running into end of input, is not bounded.
fn bounded_integers(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                let token = &line[s..i];
                if s > 0 && token.bytes().all(|b| b.is_ascii_digit()) {
                    out.push(token);
                }
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    out
}

fn parse_number<T: FromStr>(token: &str) -> std::result::Result<T, RecordError> {
    token.parse().map_err(|_| RecordError::BadNumber {
        token: token.to_string(),
    })
}
