//! Plain-text timeline for terminal output

use crate::timeline::Timeline;

const CHART_WIDTH: usize = 60;

/// Render one line per frame: index, total time, device label and a
/// proportional bar spanning the frame's extent
pub fn render_timeline(timeline: &Timeline) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>8}  {:>12}  {:<12}  {}\n",
        "frame", "total (us)", "device", "timeline"
    ));

    let min = timeline.x_min();
    let span = (timeline.x_max() - min).max(1) as f64;
    let column = |t: i64| (((t - min) as f64 / span) * CHART_WIDTH as f64).round() as usize;

    for row in &timeline.rows {
        let from = column(row.min).min(CHART_WIDTH);
        let to = column(row.max).clamp(from + 1, CHART_WIDTH.max(from + 1));

        let mut chart = " ".repeat(from);
        chart.push_str(&"#".repeat(to - from));
        chart.push_str(&" ".repeat(CHART_WIDTH.saturating_sub(to)));

        out.push_str(&format!(
            "{:>8}  {:>12}  {:<12}  |{}|\n",
            row.index, row.total, row.device_label, chart
        ));
    }

    out
}
