//! Framegraph - frame execution timelines from TIDL API trace logs
//!
//! This library ingests `frame_index,component:api:phase,timestamp` events,
//! aggregates them into per-frame ranges, normalizes timestamps, and lays
//! the frames out as a horizontal-bar timeline for text, CSV, JSON or HTML
//! output.

pub mod cli;
pub mod component;
pub mod csv_output;
pub mod error;
pub mod frame;
pub mod frames;
pub mod html_output;
pub mod json_output;
pub mod parser;
pub mod range;
pub mod text_output;
pub mod timeline;

pub use error::{Result, TraceError};
pub use frame::{Bar, FrameInfo, Verbosity};
pub use frames::{FoundComponents, FrameSummary, Frames};
pub use range::Range;
