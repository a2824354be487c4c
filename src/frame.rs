//! Per-frame aggregation of API ranges
//!
//! A [`FrameInfo`] holds, for each pipeline component, the start/end range
//! of every API recorded in one frame, plus the device identity of the
//! execution units that processed it.

use crate::component::{Component, DeviceInfo, Phase};
use crate::frames::FoundComponents;
use crate::range::Range;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// API whose start opens a component's total span
pub const API_START_ASYNC: &str = "pfsa";
/// API whose end closes a component's total span
pub const API_WAIT: &str = "pfw";
/// Label of the bar spanning the whole frame
pub const TOTAL_LABEL: &str = "total";

/// Level of timeline detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Verbosity {
    /// Frame total plus one component's detail, or per-component totals
    #[default]
    #[value(name = "0")]
    Summary,
    /// Frame total plus every component:api range
    #[value(name = "1")]
    Detail,
}

/// One labelled horizontal bar: `(label, (start, duration))`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub label: String,
    pub start: i64,
    pub duration: i64,
}

impl Bar {
    pub fn new(label: impl Into<String>, (start, duration): (i64, i64)) -> Self {
        Self {
            label: label.into(),
            start,
            duration,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ComponentData {
    /// API ranges in first-seen order
    apis: Vec<(String, Range)>,
    device: Option<DeviceInfo>,
}

impl ComponentData {
    fn range(&self, api: &str) -> Option<&Range> {
        self.apis.iter().find(|(name, _)| name == api).map(|(_, r)| r)
    }

    fn range_mut(&mut self, api: &str) -> &mut Range {
        let pos = match self.apis.iter().position(|(name, _)| name == api) {
            Some(pos) => pos,
            None => {
                self.apis.push((api.to_string(), Range::default()));
                self.apis.len() - 1
            }
        };
        &mut self.apis[pos].1
    }
}

/// All recorded events for a single frame
#[derive(Debug, Clone)]
pub struct FrameInfo {
    index: i64,
    data: [ComponentData; 3],
}

impl FrameInfo {
    /// Create an empty frame aggregate
    pub fn new(index: i64) -> Self {
        Self {
            index,
            data: Default::default(),
        }
    }

    /// Frame index from the trace
    pub fn index(&self) -> i64 {
        self.index
    }

    fn component(&self, component: Component) -> &ComponentData {
        &self.data[component.slot()]
    }

    /// Set the `phase` timestamp of the `component:api` range, creating it if absent
    pub fn update(&mut self, component: Component, api: &str, phase: Phase, value: i64) {
        let range = self.data[component.slot()].range_mut(api);
        match phase {
            Phase::Start => range.set_start(value),
            Phase::End => range.set_end(value),
        }
    }

    /// Record the device type code and 0-based device index of a component
    pub fn update_device_info(&mut self, component: Component, type_code: i64, id: i64) {
        self.data[component.slot()].device = Some(DeviceInfo::new(type_code, id));
    }

    /// Device identity recorded for a component
    pub fn device_info(&self, component: Component) -> Option<DeviceInfo> {
        self.component(component).device
    }

    /// Device identity of the execution units that ran this frame, e.g. `EVE1+DSP2`.
    ///
    /// Units without recorded ranges, or without device info, are left out.
    pub fn device_label(&self) -> String {
        Component::EXECUTION_UNITS
            .iter()
            .filter(|&&c| self.has_data(c))
            .filter_map(|&c| self.device_info(c).map(|d| d.label()))
            .collect::<Vec<_>>()
            .join("+")
    }

    /// True if any API range was recorded for `component`
    pub fn has_data(&self, component: Component) -> bool {
        !self.component(component).apis.is_empty()
    }

    /// True if no component has any recorded range
    pub fn is_empty(&self) -> bool {
        Component::ALL.iter().all(|&c| !self.has_data(c))
    }

    /// Recorded ranges of a component, in first-seen order
    pub fn ranges(&self, component: Component) -> impl Iterator<Item = (&str, &Range)> {
        self.component(component)
            .apis
            .iter()
            .map(|(api, range)| (api.as_str(), range))
    }

    fn all_ranges(&self) -> impl Iterator<Item = &Range> {
        self.data.iter().flat_map(|d| d.apis.iter().map(|(_, r)| r))
    }

    /// `(start, duration)` of a `component:api` range
    pub fn get_range(&self, component: Component, api: &str) -> Option<(i64, i64)> {
        self.component(component).range(api).map(Range::get_range)
    }

    /// Lowest start timestamp in the frame
    pub fn min(&self) -> Option<i64> {
        self.all_ranges().map(|r| r.start).min()
    }

    /// Highest end timestamp in the frame
    pub fn max(&self) -> Option<i64> {
        self.all_ranges().map(|r| r.end).max()
    }

    /// `(min, max - min)` spanning every range in the frame
    pub fn max_range(&self) -> Option<(i64, i64)> {
        let min = self.min()?;
        let max = self.max()?;
        Some((min, max - min))
    }

    /// Overall time to execute the frame
    pub fn total_duration(&self) -> Option<i64> {
        self.max_range().map(|(_, duration)| duration)
    }

    /// `(start, duration)` from the start of `pfsa` to the end of `pfw`.
    ///
    /// Absent when the component has no data, or lacks either API.
    pub fn get_total(&self, component: Component) -> Option<(i64, i64)> {
        let data = self.component(component);
        if data.apis.is_empty() {
            tracing::debug!(frame = self.index, %component, "component not available");
            return None;
        }

        let start = data.range(API_START_ASYNC)?.start;
        let end = data.range(API_WAIT)?.end;
        Some((start, end - start))
    }

    /// Shift every timestamp in the frame by `-value`
    pub fn subtract(&mut self, value: i64) {
        for data in &mut self.data {
            for (_, range) in &mut data.apis {
                range.subtract(value);
            }
        }
    }

    /// One `component:api` bar per recorded range of the given components,
    /// longest first
    pub fn plot_ranges(&self, components: &[Component]) -> Vec<Bar> {
        let mut bars: Vec<Bar> = Component::ALL
            .iter()
            .filter(|c| components.contains(*c))
            .flat_map(|&c| {
                self.ranges(c)
                    .map(move |(api, range)| Bar::new(format!("{c}:{api}"), range.get_range()))
            })
            .collect();

        // Longest bars first so shorter ones are drawn on top
        bars.sort_by(|a, b| b.duration.cmp(&a.duration));
        bars
    }

    /// One bar per component spanning its total execution time, earliest first
    pub fn plot_totals(&self) -> Vec<Bar> {
        let mut bars: Vec<Bar> = Component::ALL
            .iter()
            .filter_map(|&c| self.get_total(c).map(|total| Bar::new(c.name(), total)))
            .collect();

        bars.sort_by_key(|bar| bar.start);
        bars
    }

    /// Bars to draw for this frame at the given level of detail
    pub fn barh_ranges(&self, found: &FoundComponents, verbosity: Verbosity) -> Vec<Bar> {
        let mut bars = Vec::new();

        match verbosity {
            Verbosity::Summary if found.contains(Component::Eo2) => {
                bars = self.plot_totals();
            }
            Verbosity::Summary => {
                let component = if found.contains(Component::Eop) {
                    Component::Eop
                } else {
                    Component::Eo1
                };
                bars.extend(self.max_range().map(|r| Bar::new(TOTAL_LABEL, r)));
                bars.extend(self.plot_ranges(&[component]));
            }
            Verbosity::Detail => {
                bars.extend(self.max_range().map(|r| Bar::new(TOTAL_LABEL, r)));
                for component in Component::ALL {
                    bars.extend(self.plot_ranges(&[component]));
                }
            }
        }

        bars
    }
}

impl fmt::Display for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<FI:")?;

        for component in Component::ALL {
            if !self.has_data(component) {
                continue;
            }

            write!(f, " {component} [")?;
            let mut apis: Vec<_> = self.ranges(component).collect();
            apis.sort_by_key(|(_, range)| range.start);
            for (api, range) in apis {
                let (start, duration) = range.get_range();
                write!(f, "{api}: ({start}, {duration}) ")?;
            }
            write!(f, "]")?;
        }

        write!(f, ">")
    }
}
