//! Trace log ingestion
//!
//! Each line of a trace is one event:
//!
//! ```text
//! frame_index,component:api:phase,timestamp
//! frame_index,component:api:phase,timestamp,device_type,device_id
//! ```
//!
//! e.g. `48,EOP:PFSA:Start,1540246078613202`. Lines with any other number
//! of fields are skipped without comment.

use crate::component::Component;
use crate::error::{Result, TraceError};
use crate::frames::Frames;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// How record-level errors (bad key, bad number, bad phase) are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Abort ingestion on the first invalid record
    #[default]
    Strict,
    /// Log and skip invalid records
    Lenient,
}

/// One parsed trace event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub index: i64,
    /// Lowercased `component:api:phase` key
    pub key: String,
    pub value: i64,
    /// `(device_type, device_id)` from the 5-field form
    pub device: Option<(i64, i64)>,
}

/// Counters collected while reading a trace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub lines_read: usize,
    pub records_applied: usize,
    /// Lines with neither 3 nor 5 fields
    pub wrong_shape: usize,
    /// Invalid records skipped in lenient mode
    pub invalid_skipped: usize,
    pub unknown_component: usize,
}

fn parse_int(field: &'static str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| TraceError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Parse one line into a record.
///
/// Returns `Ok(None)` for lines that are not 3 or 5 fields wide.
pub fn parse_line(line: &str) -> Result<Option<Record>> {
    let fields: Vec<&str> = line.trim_end().split(',').collect();
    if fields.len() != 3 && fields.len() != 5 {
        return Ok(None);
    }

    let index = parse_int("frame index", fields[0])?;
    let key = fields[1].to_lowercase();
    let value = parse_int("timestamp", fields[2])?;

    let device = if fields.len() == 5 {
        Some((
            parse_int("device type", fields[3])?,
            parse_int("device id", fields[4])?,
        ))
    } else {
        None
    };

    Ok(Some(Record {
        index,
        key,
        value,
        device,
    }))
}

/// Apply a record to the collection.
///
/// Returns the component updated, or `None` if the component was unknown.
pub fn apply_record(frames: &mut Frames, record: &Record) -> Result<Option<Component>> {
    let component = frames.update(record.index, &record.key, record.value)?;

    if let (Some(component), Some((type_code, id))) = (component, record.device) {
        frames.update_device_info(record.index, component, type_code, id);
    }

    Ok(component)
}

/// Read every event from `reader` into a new collection.
///
/// Timestamps are left as recorded; see [`load_trace`] for the normalized form.
pub fn read_trace<R: BufRead>(reader: R, mode: ParseMode) -> Result<(Frames, IngestStats)> {
    let mut frames = Frames::new();
    let mut stats = IngestStats::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        stats.lines_read += 1;

        let applied = parse_line(&line).and_then(|record| match record {
            Some(record) => apply_record(&mut frames, &record).map(Some),
            None => Ok(None),
        });

        match applied {
            Ok(Some(Some(_))) => stats.records_applied += 1,
            Ok(Some(None)) => stats.unknown_component += 1,
            Ok(None) => {
                tracing::debug!(line = line_no, "skipping line with unexpected field count");
                stats.wrong_shape += 1;
            }
            Err(e) if mode == ParseMode::Lenient => {
                tracing::warn!(line = line_no, "skipping invalid record: {}", e);
                stats.invalid_skipped += 1;
            }
            Err(e) => return Err(e.at_line(line_no)),
        }
    }

    tracing::debug!(?stats, frames = frames.len(), "trace ingested");
    Ok((frames, stats))
}

/// Read a trace file into a new collection, without normalizing it
pub fn read_trace_file(path: &Path, mode: ParseMode) -> Result<(Frames, IngestStats)> {
    let file = File::open(path)?;
    read_trace(BufReader::new(file), mode)
}

/// Read a trace file and shift its timestamps so the first frame starts at 0
pub fn load_trace(path: &Path, mode: ParseMode) -> Result<(Frames, IngestStats)> {
    let (mut frames, stats) = read_trace_file(path, mode)?;
    frames.adjust_to_zero()?;
    Ok((frames, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_three_field_line() {
        let record = parse_line("48,EOP:PFSA:Start,1540246078613202").unwrap().unwrap();
        assert_eq!(
            record,
            Record {
                index: 48,
                key: "eop:pfsa:start".to_string(),
                value: 1_540_246_078_613_202,
                device: None,
            }
        );
    }

    #[test]
    fn test_parse_five_field_line() {
        let record = parse_line("3,eo1:pfsa:start,100,1,0\n").unwrap().unwrap();
        assert_eq!(record.device, Some((1, 0)));
    }

    #[test]
    fn test_parse_wrong_shape_is_skipped() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("1,eop:pfsa:start").unwrap(), None);
        assert_eq!(parse_line("1,eop:pfsa:start,100,1").unwrap(), None);
        assert_eq!(parse_line("1,eop:pfsa:start,100,1,0,9").unwrap(), None);
    }

    #[test]
    fn test_parse_non_numeric_field() {
        let err = parse_line("x,eop:pfsa:start,100").unwrap_err();
        assert!(matches!(err, TraceError::InvalidNumber { field: "frame index", .. }));

        let err = parse_line("1,eop:pfsa:start,100,dsp,0").unwrap_err();
        assert!(matches!(err, TraceError::InvalidNumber { field: "device type", .. }));
    }

    #[test]
    fn test_parse_tolerates_padding() {
        let record = parse_line(" 2 ,eop:pfw:end, 55 \r").unwrap().unwrap();
        assert_eq!(record.index, 2);
        assert_eq!(record.value, 55);
    }

    #[test]
    fn test_read_trace_counts_lines() {
        let input = "\
0,eop:pfsa:start,100
0,eop:pfsa:end,150
0,eo1:pfsa:start,110,1,0
this line is ignored
0,xyz:pfsa:start,120
";
        let (frames, stats) = read_trace(Cursor::new(input), ParseMode::Strict).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(
            stats,
            IngestStats {
                lines_read: 5,
                records_applied: 3,
                wrong_shape: 1,
                invalid_skipped: 0,
                unknown_component: 1,
            }
        );
        assert_eq!(frames.get(0).unwrap().device_label(), "EVE1");
    }

    #[test]
    fn test_read_trace_strict_reports_line() {
        let input = "0,eop:pfsa:start,100\n0,eop:pfsa:later,150\n";
        let err = read_trace(Cursor::new(input), ParseMode::Strict).unwrap_err();
        match err {
            TraceError::AtLine { line, source } => {
                assert_eq!(line, 2);
                assert!(matches!(*source, TraceError::InvalidPhase(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_trace_lenient_skips_invalid() {
        let input = "\
0,eop:pfsa:start,100
0,eop:pfsa:later,150
0,eop:pfsa,1
0,eop:pfsa:end,abc
";
        let (frames, stats) = read_trace(Cursor::new(input), ParseMode::Lenient).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(stats.records_applied, 1);
        assert_eq!(stats.invalid_skipped, 3);
    }

    #[test]
    fn test_read_trace_unknown_component_with_bad_phase() {
        let input = "0,eop:pfsa:start,100\n0,eop:pfsa:end,200\n0,gpu:pfsa:begin,150\n";
        let (frames, stats) = read_trace(Cursor::new(input), ParseMode::Strict).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(stats.records_applied, 2);
        assert_eq!(stats.unknown_component, 1);
        assert_eq!(stats.invalid_skipped, 0);
    }

    #[test]
    fn test_read_trace_rejects_extreme_timestamps() {
        let input = "0,eop:pfsa:start,-9000000000000000000\n0,eop:pfsa:end,9000000000000000000\n";
        let err = read_trace(Cursor::new(input), ParseMode::Strict).unwrap_err();
        match err {
            TraceError::AtLine { line, source } => {
                assert_eq!(line, 1);
                assert!(matches!(*source, TraceError::TimestampOutOfRange(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let (mut frames, stats) = read_trace(Cursor::new(input), ParseMode::Lenient).unwrap();
        assert!(frames.is_empty());
        assert_eq!(stats.invalid_skipped, 2);
        assert!(matches!(frames.adjust_to_zero(), Err(TraceError::NoFrames)));
    }

    #[test]
    fn test_invalid_device_fields_leave_no_trace() {
        let input = "0,eo1:pfsa:start,100,one,0\n";
        let (frames, stats) = read_trace(Cursor::new(input), ParseMode::Lenient).unwrap();
        assert!(frames.is_empty());
        assert_eq!(stats.invalid_skipped, 1);
    }

    #[test]
    fn test_read_trace_empty_input() {
        let (frames, stats) = read_trace(Cursor::new(""), ParseMode::Strict).unwrap();
        assert!(frames.is_empty());
        assert_eq!(stats.lines_read, 0);
    }
}
