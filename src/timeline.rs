//! Format-independent layout of the frame execution timeline
//!
//! One row per frame, in index order. Each row holds the bars selected by
//! [`FrameInfo::barh_ranges`], colored by position, and is annotated with
//! the frame's total duration and device label.

use crate::frame::{Bar, FrameInfo, Verbosity};
use crate::frames::Frames;
use serde::Serialize;

/// Bar fill colors, assigned by bar position within a row
pub const BARH_COLORS: [&str; 8] = [
    "lightgray", "green", "blue", "yellow", "black", "orange", "red", "cyan",
];

/// Human-readable legend text for a label tag
pub fn legend_string(tag: &str) -> &str {
    match tag {
        "eop" => "ExecutionObjectPipeline",
        "eo1" => "ExecutionObject 0",
        "eo2" => "ExecutionObject 1",
        "pfw" => "Process Frame Wait",
        "pfsa" => "Process Frame Start Async",
        "ran" => "Run Async Next",
        "total" => "Total frame time",
        other => other,
    }
}

/// Expand a `:`-separated bar label into legend text,
/// e.g. `eop:pfw` -> `ExecutionObjectPipeline Process Frame Wait`
pub fn legend_text(label: &str) -> String {
    label
        .split(':')
        .map(legend_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn bar_color(position: usize) -> &'static str {
    BARH_COLORS[position % BARH_COLORS.len()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub color: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBar {
    #[serde(flatten)]
    pub bar: Bar,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineRow {
    pub index: i64,
    pub bars: Vec<TimelineBar>,
    pub min: i64,
    pub max: i64,
    /// Overall time to execute the frame
    pub total: i64,
    pub device_label: String,
}

impl TimelineRow {
    fn from_frame(frame: &FrameInfo, bars: Vec<Bar>) -> Option<Self> {
        let (min, total) = frame.max_range()?;
        Some(Self {
            index: frame.index(),
            bars: bars
                .into_iter()
                .enumerate()
                .map(|(i, bar)| TimelineBar {
                    bar,
                    color: bar_color(i),
                })
                .collect(),
            min,
            max: min + total,
            total,
            device_label: frame.device_label(),
        })
    }
}

/// Rows, legend and extent of a whole timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub title: String,
    pub legend: Vec<LegendEntry>,
    pub rows: Vec<TimelineRow>,
}

impl Timeline {
    pub fn build(frames: &Frames, verbosity: Verbosity, title: impl Into<String>) -> Self {
        let found = frames.found();
        let rows: Vec<TimelineRow> = frames
            .iter()
            .filter_map(|frame| TimelineRow::from_frame(frame, frame.barh_ranges(found, verbosity)))
            .collect();

        // Legend follows the bar order of the first row
        let legend = rows
            .first()
            .map(|row| {
                row.bars
                    .iter()
                    .map(|b| LegendEntry {
                        color: b.color,
                        text: legend_text(&b.bar.label),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title: title.into(),
            legend,
            rows,
        }
    }

    /// Smallest timestamp drawn (0 once normalized)
    pub fn x_min(&self) -> i64 {
        self.rows.iter().map(|r| r.min).min().unwrap_or(0).min(0)
    }

    /// Largest timestamp drawn
    pub fn x_max(&self) -> i64 {
        self.rows.iter().map(|r| r.max).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frames() -> Frames {
        let mut frames = Frames::new();
        for (index, key, value) in [
            (0, "eop:pfsa:start", 1000),
            (0, "eop:pfsa:end", 1010),
            (0, "eop:pfw:start", 1050),
            (0, "eop:pfw:end", 1200),
            (0, "eo1:ran:start", 1020),
            (0, "eo1:ran:end", 1150),
            (1, "eop:pfsa:start", 1210),
            (1, "eop:pfsa:end", 1220),
        ] {
            frames.update(index, key, value).unwrap();
        }
        frames.update_device_info(0, crate::component::Component::Eo1, 1, 0);
        frames.adjust_to_zero().unwrap();
        frames
    }

    #[test]
    fn test_legend_text() {
        assert_eq!(
            legend_text("eop:pfw"),
            "ExecutionObjectPipeline Process Frame Wait"
        );
        assert_eq!(legend_text("total"), "Total frame time");
        assert_eq!(legend_text("eo2:custom"), "ExecutionObject 1 custom");
    }

    #[test]
    fn test_bar_colors_cycle() {
        assert_eq!(bar_color(0), "lightgray");
        assert_eq!(bar_color(7), "cyan");
        assert_eq!(bar_color(8), "lightgray");
    }

    #[test]
    fn test_build_rows_in_index_order() {
        let timeline = Timeline::build(&sample_frames(), Verbosity::Summary, "trace.log");
        assert_eq!(timeline.title, "trace.log");
        let indices: Vec<i64> = timeline.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1]);

        let first = &timeline.rows[0];
        assert_eq!((first.min, first.max, first.total), (0, 200, 200));
        assert_eq!(first.device_label, "EVE1");
        assert_eq!(first.bars[0].bar.label, "total");
        assert_eq!(first.bars[0].color, "lightgray");
        assert_eq!(first.bars[1].bar.label, "eop:pfw");
        assert_eq!(first.bars[1].color, "green");
    }

    #[test]
    fn test_legend_from_first_row() {
        let timeline = Timeline::build(&sample_frames(), Verbosity::Summary, "t");
        let texts: Vec<&str> = timeline.legend.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Total frame time",
                "ExecutionObjectPipeline Process Frame Wait",
                "ExecutionObjectPipeline Process Frame Start Async",
            ]
        );
    }

    #[test]
    fn test_extent() {
        let timeline = Timeline::build(&sample_frames(), Verbosity::Detail, "t");
        assert_eq!(timeline.x_min(), 0);
        assert_eq!(timeline.x_max(), 220);
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = Timeline::build(&Frames::new(), Verbosity::Summary, "t");
        assert!(timeline.rows.is_empty());
        assert!(timeline.legend.is_empty());
        assert_eq!(timeline.x_max(), 0);
    }
}
