//! Table formatting for reports.
//!
//! Provides functions to generate Typst markup for:
//! - Analysis summary (ticker, threshold, data range)
//! - Big moves table (one row per detected event)
//! - Statistics table (counts by direction, extremes)

use crate::adapters::typst_report::chart_svg::direction_color;
use crate::domain::analysis::AnalysisReport;
use crate::domain::detector::MoveEvent;
use crate::domain::summary::MoveSummary;

fn format_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

fn format_optional_pct(value: Option<f64>) -> String {
    value.map(format_pct).unwrap_or_else(|| "-".to_string())
}

/// Escape characters Typst treats as markup inside content blocks.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '#' | '[' | ']' | '*' | '_' | '$' | '@' | '<' | '>' | '\\' | '`' | '~' | '='
                | '-' | '+' | '/'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn render_title(report: &AnalysisReport) -> String {
    format!("Big Move Analyzer for {}", escape(&report.ticker))
}

pub fn render_analysis_summary(report: &AnalysisReport) -> String {
    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: 2,\n");
    output.push_str("  align: (left, right),\n");
    output.push_str("  [*Property*], [*Value*],\n");
    output.push_str(&format!("  [Ticker], [{}],\n", escape(&report.ticker)));
    output.push_str(&format!(
        "  [Big Move Threshold], [{:.2}%],\n",
        report.threshold_pct
    ));
    match report.range() {
        Some(range) => {
            output.push_str(&format!("  [First Date], [{}],\n", range.first));
            output.push_str(&format!("  [Last Date], [{}],\n", range.last));
            output.push_str(&format!("  [Trading Days], [{}],\n", range.count));
            output.push_str(&format!(
                "  [Close Range], [{:.2} - {:.2}],\n",
                range.min_close, range.max_close
            ));
        }
        None => output.push_str("  [Trading Days], [0],\n"),
    }
    output.push_str(")\n");
    output
}

pub fn render_moves_table(events: &[MoveEvent]) -> String {
    if events.is_empty() {
        return "_No big moves detected at this threshold._\n".to_string();
    }

    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: 5,\n");
    output.push_str("  align: (right, left, right, right, left),\n");
    output.push_str("  [*\\#*], [*Date*], [*Price*], [*PctChange*], [*Type*],\n");

    for (i, e) in events.iter().enumerate() {
        let color = direction_color(e.direction);
        output.push_str(&format!(
            "  [{}], [{}], [{:.2}], text(fill: {}, [{}]), text(fill: {}, [{}]),\n",
            i + 1,
            e.date.format("%Y-%m-%d"),
            e.price,
            color,
            format_pct(e.pct_change),
            color,
            e.direction
        ));
    }

    output.push_str(")\n");
    output
}

pub fn render_statistics_table(summary: &MoveSummary) -> String {
    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: 2,\n");
    output.push_str("  align: (left, right),\n");
    output.push_str("  [*Metric*], [*Value*],\n");
    output.push_str(&format!("  [Total Big Moves], [{}],\n", summary.total));
    output.push_str(&format!("  [Upside Moves], [{}],\n", summary.upside));
    output.push_str(&format!("  [Downside Moves], [{}],\n", summary.downside));
    output.push_str(&format!(
        "  [Largest Gain], [{}],\n",
        format_optional_pct(summary.largest_gain)
    ));
    output.push_str(&format!(
        "  [Largest Drop], [{}],\n",
        format_optional_pct(summary.largest_drop)
    ));
    output.push_str(")\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::analyze;
    use crate::domain::detector::Direction;
    use crate::domain::price::PricePoint;
    use chrono::NaiveDate;

    fn event(d: u32, pct_change: f64, direction: Direction) -> MoveEvent {
        MoveEvent {
            date: NaiveDate::from_ymd_opt(2024, 2, d).unwrap(),
            price: 50.0,
            pct_change,
            direction,
        }
    }

    fn sample_report(ticker: &str) -> AnalysisReport {
        let series: Vec<PricePoint> = [100.0, 120.0, 121.0, 90.0]
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PricePoint::new(NaiveDate::from_ymd_opt(2024, 2, i as u32 + 1).unwrap(), close)
            })
            .collect();
        analyze(ticker, &series, 15.0, 20).unwrap()
    }

    #[test]
    fn escape_markup_characters() {
        assert_eq!(escape("BRK#B"), "BRK\\#B");
        assert_eq!(escape("A_B*C"), "A\\_B\\*C");
        assert_eq!(escape("AAPL"), "AAPL");
        assert_eq!(escape("BRK-B"), "BRK\\-B");
        assert_eq!(escape("= X"), "\\= X");
        assert_eq!(escape("+A/B~"), "\\+A\\/B\\~");
    }

    #[test]
    fn title_names_ticker() {
        assert_eq!(render_title(&sample_report("AAPL")), "Big Move Analyzer for AAPL");
    }

    #[test]
    fn analysis_summary_lists_range() {
        let out = render_analysis_summary(&sample_report("AAPL"));
        assert!(out.contains("#table("));
        assert!(out.contains("[15.00%]"));
        assert!(out.contains("[2024-02-01]"));
        assert!(out.contains("[2024-02-04]"));
        assert!(out.contains("[Trading Days], [4]"));
        assert!(out.contains("90.00 - 121.00"));
    }

    #[test]
    fn moves_table_empty() {
        let out = render_moves_table(&[]);
        assert!(out.contains("No big moves"));
        assert!(!out.contains("#table("));
    }

    #[test]
    fn moves_table_rows() {
        let events = vec![
            event(2, 20.0, Direction::Upside),
            event(4, -25.62, Direction::Downside),
        ];
        let out = render_moves_table(&events);
        assert!(out.contains("columns: 5"));
        assert!(out.contains("[1], [2024-02-02], [50.00], text(fill: green, [+20.00%]), text(fill: green, [Upside])"));
        assert!(out.contains("[2], [2024-02-04], [50.00], text(fill: red, [-25.62%]), text(fill: red, [Downside])"));
    }

    #[test]
    fn statistics_table_counts() {
        let summary = MoveSummary {
            total: 3,
            upside: 2,
            downside: 1,
            largest_gain: Some(31.5),
            largest_drop: Some(-18.25),
        };
        let out = render_statistics_table(&summary);
        assert!(out.contains("[Total Big Moves], [3]"));
        assert!(out.contains("[Upside Moves], [2]"));
        assert!(out.contains("[Downside Moves], [1]"));
        assert!(out.contains("[Largest Gain], [+31.50%]"));
        assert!(out.contains("[Largest Drop], [-18.25%]"));
    }

    #[test]
    fn statistics_table_without_moves() {
        let out = render_statistics_table(&MoveSummary::default());
        assert!(out.contains("[Total Big Moves], [0]"));
        assert!(out.contains("[Largest Gain], [-]"));
    }
}
