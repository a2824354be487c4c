//! Error types for trace ingestion and frame statistics

use thiserror::Error;

/// Errors that can occur while reading a trace or querying frame data
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Invalid event key '{0}': expected component:api:phase")]
    InvalidKey(String),

    #[error("Invalid {field} '{value}': not an integer")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid phase '{0}': expected start or end")]
    InvalidPhase(String),

    #[error("Timestamp {0} is outside the supported range")]
    TimestampOutOfRange(i64),

    #[error("No frame data found in trace")]
    NoFrames,

    #[error("Frame {0} has no recorded ranges")]
    EmptyFrame(i64),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<TraceError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TraceError {
    /// Attach a 1-based line number to a record-level error
    pub fn at_line(self, line: usize) -> Self {
        TraceError::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

/// Result type for trace operations
pub type Result<T> = std::result::Result<T, TraceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TraceError::InvalidPhase("middle".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid phase 'middle': expected start or end"
        );

        let err = TraceError::InvalidNumber {
            field: "frame index",
            value: "x1".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid frame index 'x1': not an integer");
    }

    #[test]
    fn test_timestamp_out_of_range_message() {
        let err = TraceError::TimestampOutOfRange(-9_000_000_000_000_000_000);
        assert_eq!(
            err.to_string(),
            "Timestamp -9000000000000000000 is outside the supported range"
        );
    }

    #[test]
    fn test_at_line_wraps_source() {
        let err = TraceError::InvalidKey("eop:pfsa".to_string()).at_line(7);
        assert!(err.to_string().starts_with("line 7: Invalid event key"));
        match err {
            TraceError::AtLine { line, source } => {
                assert_eq!(line, 7);
                assert!(matches!(*source, TraceError::InvalidKey(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TraceError = io.into();
        assert!(matches!(err, TraceError::IoError(_)));
    }
}
