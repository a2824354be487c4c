//! JSON output of the frame summary and timeline

use crate::frames::FrameSummary;
use crate::parser::IngestStats;
use crate::timeline::Timeline;
use serde::Serialize;

/// Complete machine-readable report
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    pub summary: &'a FrameSummary,
    /// Original timestamp that was shifted to 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub ingest: &'a IngestStats,
    pub timeline: &'a Timeline,
}

impl JsonReport<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
