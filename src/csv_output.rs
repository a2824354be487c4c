//! CSV output of timeline bars for spreadsheet analysis

use crate::timeline::Timeline;

/// CSV output formatter: one row per drawn bar
#[derive(Debug)]
pub struct CsvOutput<'a> {
    timeline: &'a Timeline,
    include_device: bool,
}

impl<'a> CsvOutput<'a> {
    pub fn new(timeline: &'a Timeline, include_device: bool) -> Self {
        Self {
            timeline,
            include_device,
        }
    }

    fn header(&self) -> String {
        let mut headers = vec!["frame", "label", "start", "duration"];

        if self.include_device {
            headers.push("device");
        }

        headers.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.header());
        output.push('\n');

        for row in &self.timeline.rows {
            for bar in &row.bars {
                let mut fields = vec![
                    row.index.to_string(),
                    Self::escape_field(&bar.bar.label),
                    bar.bar.start.to_string(),
                    bar.bar.duration.to_string(),
                ];
                if self.include_device {
                    fields.push(Self::escape_field(&row.device_label));
                }
                output.push_str(&fields.join(","));
                output.push('\n');
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::frame::Verbosity;
    use crate::frames::Frames;

    fn sample_timeline() -> Timeline {
        let mut frames = Frames::new();
        for (index, key, value) in [
            (0, "eo1:pfsa:start", 500),
            (0, "eo1:pfsa:end", 520),
            (0, "eo1:pfw:start", 600),
            (0, "eo1:pfw:end", 700),
            (1, "eo1:pfsa:start", 720),
            (1, "eo1:pfsa:end", 730),
        ] {
            frames.update(index, key, value).unwrap();
        }
        frames.update_device_info(0, Component::Eo1, 0, 1);
        frames.adjust_to_zero().unwrap();
        Timeline::build(&frames, Verbosity::Summary, "t")
    }

    #[test]
    fn test_csv_header() {
        let timeline = Timeline::build(&Frames::new(), Verbosity::Summary, "t");
        assert_eq!(CsvOutput::new(&timeline, false).header(), "frame,label,start,duration");
        assert_eq!(
            CsvOutput::new(&timeline, true).header(),
            "frame,label,start,duration,device"
        );
    }

    #[test]
    fn test_csv_rows() {
        let timeline = sample_timeline();
        let csv = CsvOutput::new(&timeline, false).to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "frame,label,start,duration",
                "0,total,0,200",
                "0,eo1:pfw,100,100",
                "0,eo1:pfsa,0,20",
                "1,total,220,10",
                "1,eo1:pfsa,220,10",
            ]
        );
    }

    #[test]
    fn test_csv_device_column() {
        let timeline = sample_timeline();
        let csv = CsvOutput::new(&timeline, true).to_csv();
        assert!(csv.contains("0,total,0,200,DSP2\n"));
        assert!(csv.contains("1,total,220,10,\n"));
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(CsvOutput::escape_field("a,b"), "\"a,b\"");
        assert_eq!(CsvOutput::escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(CsvOutput::escape_field("plain"), "plain");
    }
}
