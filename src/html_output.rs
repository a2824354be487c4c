//! HTML report with an embedded SVG frame timeline
//!
//! Draws one horizontal broken-bar row per frame, a legend built from the
//! first frame's bars, and the frame summary as a table.

use crate::frames::FrameSummary;
use crate::timeline::{Timeline, TimelineRow};

const WIDTH: f64 = 1400.0;
const MARGIN_LEFT: f64 = 160.0;
const MARGIN_RIGHT: f64 = 90.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const ROW_HEIGHT: f64 = 20.0;
const X_TICKS: i64 = 8;

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput<'a> {
    timeline: &'a Timeline,
    summary: Option<&'a FrameSummary>,
}

impl<'a> HtmlOutput<'a> {
    pub fn new(timeline: &'a Timeline) -> Self {
        Self {
            timeline,
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: &'a FrameSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #5cb85c;
            color: white;
            font-weight: bold;
        }
        .legend {
            list-style: none;
            padding: 0;
        }
        .legend li {
            display: inline-block;
            margin-right: 16px;
        }
        .swatch {
            display: inline-block;
            width: 12px;
            height: 12px;
            margin-right: 4px;
            border: 1px solid #999;
            opacity: 0.8;
        }
        .timeline {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    fn plot_height(&self) -> f64 {
        self.timeline.rows.len().max(1) as f64 * ROW_HEIGHT
    }

    /// Map a timestamp to an x pixel position
    fn x(&self, t: i64) -> f64 {
        let min = self.timeline.x_min();
        let span = (self.timeline.x_max() - min).max(1) as f64;
        MARGIN_LEFT + (t - min) as f64 * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / span
    }

    /// Rows grow upwards from the x axis; row 0 sits at the bottom
    fn row_top(&self, row: usize) -> f64 {
        MARGIN_TOP + self.plot_height() - (row + 1) as f64 * ROW_HEIGHT
    }

    fn render_row(&self, position: usize, row: &TimelineRow) -> String {
        let top = self.row_top(position);
        let mid = top + ROW_HEIGHT / 2.0;
        let mut svg = format!("    <g class=\"frame\" data-frame=\"{}\">\n", row.index);

        for bar in &row.bars {
            let x0 = self.x(bar.bar.start);
            let x1 = self.x(bar.bar.start + bar.bar.duration);
            svg.push_str(&format!(
                "      <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" fill-opacity=\"0.8\"><title>{}: {} +{} us</title></rect>\n",
                x0,
                top,
                (x1 - x0).max(0.0),
                ROW_HEIGHT,
                bar.color,
                Self::escape_html(&bar.bar.label),
                bar.bar.start,
                bar.bar.duration
            ));
        }

        // Overall frame time after the last timestamp
        svg.push_str(&format!(
            "      <text class=\"total\" x=\"{:.1}\" y=\"{:.1}\" font-size=\"8\" dominant-baseline=\"middle\">{}</text>\n",
            self.x(row.max) + 5.0,
            mid,
            row.total
        ));

        if !row.device_label.is_empty() {
            svg.push_str(&format!(
                "      <text class=\"device\" x=\"{:.1}\" y=\"{:.1}\" font-size=\"6\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
                self.x(row.min) - 5.0,
                mid,
                Self::escape_html(&row.device_label)
            ));
        }

        svg.push_str(&format!(
            "      <text class=\"ytick\" x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            MARGIN_LEFT - 90.0,
            mid,
            row.index
        ));

        svg.push_str("    </g>\n");
        svg
    }

    fn render_axes(&self) -> String {
        let bottom = MARGIN_TOP + self.plot_height();
        let right = WIDTH - MARGIN_RIGHT;
        let mut svg = String::new();

        let min = self.timeline.x_min();
        let span = (self.timeline.x_max() - min).max(1);
        for tick in 0..=X_TICKS {
            let t = min + span * tick / X_TICKS;
            let x = self.x(t);
            svg.push_str(&format!(
                "    <line class=\"grid\" x1=\"{x:.1}\" y1=\"{MARGIN_TOP:.1}\" x2=\"{x:.1}\" y2=\"{bottom:.1}\" stroke=\"#ddd\"/>\n"
            ));
            svg.push_str(&format!(
                "    <text class=\"xtick\" x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"middle\">{}</text>\n",
                x,
                bottom + 14.0,
                t
            ));
        }

        svg.push_str(&format!(
            "    <line class=\"axis\" x1=\"{MARGIN_LEFT:.1}\" y1=\"{bottom:.1}\" x2=\"{right:.1}\" y2=\"{bottom:.1}\" stroke=\"#333\"/>\n"
        ));
        svg.push_str(&format!(
            "    <line class=\"axis\" x1=\"{MARGIN_LEFT:.1}\" y1=\"{MARGIN_TOP:.1}\" x2=\"{MARGIN_LEFT:.1}\" y2=\"{bottom:.1}\" stroke=\"#333\"/>\n"
        ));
        svg.push_str(&format!(
            "    <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\">Microseconds</text>\n",
            (MARGIN_LEFT + right) / 2.0,
            bottom + 40.0
        ));
        svg.push_str(&format!(
            "    <text x=\"20\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\" transform=\"rotate(-90 20 {:.1})\">Frames</text>\n",
            MARGIN_TOP + self.plot_height() / 2.0,
            MARGIN_TOP + self.plot_height() / 2.0
        ));

        svg
    }

    /// Render the timeline as a standalone SVG element
    pub fn render_svg(&self) -> String {
        let height = MARGIN_TOP + self.plot_height() + MARGIN_BOTTOM;
        let mut svg = format!(
            "<svg class=\"timeline\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{height}\" viewBox=\"0 0 {WIDTH} {height}\">\n"
        );
        svg.push_str(&format!(
            "    <text x=\"{:.1}\" y=\"24\" font-size=\"14\" text-anchor=\"middle\">{}</text>\n",
            WIDTH / 2.0,
            Self::escape_html(&self.timeline.title)
        ));
        svg.push_str(&self.render_axes());

        for (position, row) in self.timeline.rows.iter().enumerate() {
            svg.push_str(&self.render_row(position, row));
        }

        svg.push_str("</svg>\n");
        svg
    }

    fn render_legend(&self) -> String {
        let mut html = String::from("    <ul class=\"legend\">\n");
        for entry in &self.timeline.legend {
            html.push_str(&format!(
                "        <li><span class=\"swatch\" style=\"background-color: {}\"></span>{}</li>\n",
                entry.color,
                Self::escape_html(&entry.text)
            ));
        }
        html.push_str("    </ul>\n");
        html
    }

    fn render_summary(summary: &FrameSummary) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Summary</h2>\n");
        html.push_str("    <table class=\"stats-table\">\n");
        html.push_str("        <tr><th>frames</th><th>first index</th><th>last index</th><th>usecs/frame</th></tr>\n");
        html.push_str(&format!(
            "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
            summary.frame_count,
            summary.min_index,
            summary.max_index,
            summary.microseconds_per_frame
        ));
        html.push_str("    </table>\n");
        html
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!(
            "    <title>{} - Frame Execution Graph</title>\n",
            Self::escape_html(&self.timeline.title)
        ));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <h1>Frame Execution Graph</h1>\n");

        if let Some(summary) = self.summary {
            html.push_str(&Self::render_summary(summary));
        }

        html.push_str(&self.render_legend());
        html.push_str(&self.render_svg());

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by framegraph\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}
