//! Cross-frame collection and statistics
//!
//! [`Frames`] owns every [`FrameInfo`] built from a trace, tracks which
//! components appeared anywhere in the input, and computes the summary
//! reported once ingestion is complete.
//!
//! The collection is filled in a single pass, normalized once with
//! [`Frames::adjust_to_zero`], and only read afterwards.

use crate::component::{Component, Phase};
use crate::error::{Result, TraceError};
use crate::frame::FrameInfo;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Components observed at least once across the whole input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoundComponents([bool; 3]);

impl FoundComponents {
    /// Mark a component as seen
    pub fn insert(&mut self, component: Component) {
        self.0[component.slot()] = true;
    }

    /// True once any event for the component has been recorded
    pub fn contains(&self, component: Component) -> bool {
        self.0[component.slot()]
    }

    /// Seen components, in display order
    pub fn iter(&self) -> impl Iterator<Item = Component> + '_ {
        Component::ALL.into_iter().filter(|&c| self.contains(c))
    }
}

/// Largest accepted timestamp magnitude.
///
/// Any two accepted timestamps differ by at most `2 * MAX_TIMESTAMP`, so
/// normalization, durations and averages cannot overflow an `i64`.
pub const MAX_TIMESTAMP: i64 = 1 << 61;

/// Split a lowercase `component:api:phase` key
fn split_key(key: &str) -> Result<(&str, &str, &str)> {
    let mut parts = key.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(component), Some(api), Some(phase), None) => Ok((component, api, phase)),
        _ => Err(TraceError::InvalidKey(key.to_string())),
    }
}

/// Per-frame data across a set of frames
#[derive(Debug, Clone, Default)]
pub struct Frames {
    trace_data: BTreeMap<i64, FrameInfo>,
    found: FoundComponents,
    offset: Option<i64>,
}

impl Frames {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one `component:api:phase` timestamp for a frame.
    ///
    /// Returns the component the event was recorded against, or `None` if
    /// the component is unknown and the event was dropped. Unknown
    /// components are dropped before the phase or timestamp is checked.
    pub fn update(&mut self, index: i64, key: &str, value: i64) -> Result<Option<Component>> {
        let (name, api, phase) = split_key(key)?;

        let Some(component) = Component::from_name(name) else {
            tracing::warn!(frame = index, "Invalid component: {}", name);
            return Ok(None);
        };

        let phase: Phase = phase.parse()?;
        if !(-MAX_TIMESTAMP..=MAX_TIMESTAMP).contains(&value) {
            return Err(TraceError::TimestampOutOfRange(value));
        }

        self.trace_data
            .entry(index)
            .or_insert_with(|| FrameInfo::new(index))
            .update(component, api, phase, value);
        self.found.insert(component);

        Ok(Some(component))
    }

    /// Record execution-unit identity for a component of an existing frame
    pub fn update_device_info(
        &mut self,
        index: i64,
        component: Component,
        type_code: i64,
        id: i64,
    ) {
        if let Some(frame) = self.trace_data.get_mut(&index) {
            frame.update_device_info(component, type_code, id);
        }
    }

    /// Components seen anywhere in the input
    pub fn found(&self) -> &FoundComponents {
        &self.found
    }

    /// Frame with the given index, if any event was recorded for it
    pub fn get(&self, index: i64) -> Option<&FrameInfo> {
        self.trace_data.get(&index)
    }

    /// Frames in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = &FrameInfo> {
        self.trace_data.values()
    }

    /// Number of frames recorded
    pub fn len(&self) -> usize {
        self.trace_data.len()
    }

    /// True if no frame has been recorded
    pub fn is_empty(&self) -> bool {
        self.trace_data.is_empty()
    }

    /// Sorted list of frame indices
    pub fn indices(&self) -> Vec<i64> {
        self.trace_data.keys().copied().collect()
    }

    /// Smallest and largest frame index present
    pub fn min_max_index(&self) -> Result<(i64, i64)> {
        let first = self.trace_data.keys().next().ok_or(TraceError::NoFrames)?;
        let last = self.trace_data.keys().next_back().ok_or(TraceError::NoFrames)?;
        Ok((*first, *last))
    }

    fn first_frame(&self) -> Result<&FrameInfo> {
        self.trace_data.values().next().ok_or(TraceError::NoFrames)
    }

    fn last_frame(&self) -> Result<&FrameInfo> {
        self.trace_data.values().next_back().ok_or(TraceError::NoFrames)
    }

    /// Shift all timestamps so the earliest event of the lowest-indexed
    /// frame is 0. Returns the subtracted base timestamp.
    pub fn adjust_to_zero(&mut self) -> Result<i64> {
        let first = self.first_frame()?;
        let min_val = first.min().ok_or(TraceError::EmptyFrame(first.index()))?;

        for frame in self.trace_data.values_mut() {
            frame.subtract(min_val);
        }

        let base = self.offset.unwrap_or(0) + min_val;
        self.offset = Some(base);
        tracing::debug!(base, frames = self.len(), "adjusted timestamps to zero");

        Ok(base)
    }

    /// Original timestamp of the new zero, once normalized
    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// Average time per frame, from the first timestamp of the lowest
    /// index to the last timestamp of the highest index.
    ///
    /// Assumes frame indices increase with time; see
    /// [`Frames::out_of_order_frames`].
    pub fn average_microseconds_per_frame(&self) -> Result<f64> {
        let first = self.first_frame()?;
        let last = self.last_frame()?;
        let min_val = first.min().ok_or(TraceError::EmptyFrame(first.index()))?;
        let max_val = last.max().ok_or(TraceError::EmptyFrame(last.index()))?;

        Ok((max_val - min_val) as f64 / self.len() as f64)
    }

    /// Indices whose first timestamp is earlier than that of the preceding index
    pub fn out_of_order_frames(&self) -> Vec<i64> {
        let mut out_of_order = Vec::new();
        let mut previous: Option<i64> = None;

        for frame in self.trace_data.values() {
            let Some(start) = frame.min() else { continue };
            if previous.is_some_and(|p| start < p) {
                out_of_order.push(frame.index());
            }
            previous = Some(start);
        }

        out_of_order
    }

    /// Cross-frame statistics for the console summary
    pub fn summary(&self) -> Result<FrameSummary> {
        let (min_index, max_index) = self.min_max_index()?;
        Ok(FrameSummary {
            frame_count: self.len(),
            min_index,
            max_index,
            microseconds_per_frame: self.average_microseconds_per_frame()?,
        })
    }
}

impl fmt::Display for Frames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames:")?;
        for frame in self.trace_data.values() {
            writeln!(f, "{frame}")?;
        }
        Ok(())
    }
}

/// Frame count, index range and average frame time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    pub frame_count: usize,
    pub min_index: i64,
    pub max_index: i64,
    pub microseconds_per_frame: f64,
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} frames ({}, {}) in timestamp data, {:?} microseconds per frame",
            self.frame_count, self.min_index, self.max_index, self.microseconds_per_frame
        )
    }
}
