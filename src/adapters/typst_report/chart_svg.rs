//! SVG chart rendering for reports.
//!
//! Both generators return an empty string when there is nothing to draw.

use chrono::NaiveDate;

use crate::domain::detector::{Direction, MoveEvent};
use crate::domain::price::PricePoint;
use crate::domain::summary::Histogram;

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

const LINE_COLOR: &str = "#2563eb";
const UPSIDE_COLOR: &str = "green";
const DOWNSIDE_COLOR: &str = "red";
const MARKER_RADIUS: f64 = 5.0;

pub fn direction_color(direction: Direction) -> &'static str {
    match direction {
        Direction::Upside => UPSIDE_COLOR,
        Direction::Downside => DOWNSIDE_COLOR,
    }
}

fn plot_width() -> f64 {
    CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn svg_open(svg: &mut String) {
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
}

fn axes(svg: &mut String) {
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
}

fn label(svg: &mut String, x: f64, y: f64, anchor: &str, size: u32, text: &str) {
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"{}\" font-size=\"{}\" fill=\"#666\">{}</text>\n",
        x, y, anchor, size, text
    ));
}

/// Close price line with a marker at every event date.
pub fn generate_price_svg(series: &[PricePoint], events: &[MoveEvent]) -> String {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return String::new();
    };

    let min_close = series.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
    let max_close = series
        .iter()
        .map(|p| p.close)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = (max_close - min_close).max(1e-9);

    let start = first.date;
    let span_days = (last.date - start).num_days().max(1) as f64;

    let x_scale = |d: NaiveDate| -> f64 {
        MARGIN_LEFT + ((d - start).num_days() as f64 / span_days) * plot_width()
    };
    let y_scale = |v: f64| -> f64 {
        MARGIN_TOP + plot_height() - ((v - min_close) / range) * plot_height()
    };

    let mut path_data = String::new();
    for (i, point) in series.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        path_data.push_str(&format!(
            "{} {:.1} {:.1}",
            cmd,
            x_scale(point.date),
            y_scale(point.close)
        ));
    }

    let mid_date = series[series.len() / 2].date;

    let mut svg = String::new();
    svg_open(&mut svg);
    label(&mut svg, CHART_WIDTH, 15.0, "end", 12, "Close Price");
    axes(&mut svg);
    label(
        &mut svg,
        MARGIN_LEFT - 5.0,
        MARGIN_TOP + 5.0,
        "end",
        10,
        &format!("{:.2}", max_close),
    );
    label(
        &mut svg,
        MARGIN_LEFT - 5.0,
        MARGIN_TOP + plot_height() / 2.0,
        "end",
        10,
        &format!("{:.2}", (max_close + min_close) / 2.0),
    );
    label(
        &mut svg,
        MARGIN_LEFT - 5.0,
        CHART_HEIGHT - MARGIN_BOTTOM - 5.0,
        "end",
        10,
        &format!("{:.2}", min_close),
    );
    label(&mut svg, MARGIN_LEFT, CHART_HEIGHT, "middle", 10, &start.to_string());
    label(
        &mut svg,
        x_scale(mid_date),
        CHART_HEIGHT,
        "middle",
        10,
        &mid_date.to_string(),
    );
    label(
        &mut svg,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT,
        "middle",
        10,
        &last.date.to_string(),
    );
    svg.push_str(&format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
        path_data, LINE_COLOR
    ));

    for e in events {
        svg.push_str(&format!(
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{}\" fill=\"{}\"/>\n",
            x_scale(e.date),
            y_scale(e.price),
            MARKER_RADIUS,
            direction_color(e.direction)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Stacked bars per bin: downside at the bottom, upside on top.
pub fn generate_histogram_svg(histogram: &Histogram) -> String {
    let tallest = histogram.max_bin_total();
    if histogram.bins.is_empty() || tallest == 0 {
        return String::new();
    }

    let bar_width = plot_width() / histogram.bins.len() as f64;
    let unit = plot_height() / tallest as f64;
    let baseline = CHART_HEIGHT - MARGIN_BOTTOM;

    let mut svg = String::new();
    svg_open(&mut svg);
    label(&mut svg, CHART_WIDTH, 15.0, "end", 12, "Distribution of Big Moves (%)");
    axes(&mut svg);
    label(
        &mut svg,
        MARGIN_LEFT - 5.0,
        MARGIN_TOP + 5.0,
        "end",
        10,
        &tallest.to_string(),
    );
    label(&mut svg, MARGIN_LEFT - 5.0, baseline - 5.0, "end", 10, "0");

    for (i, bin) in histogram.bins.iter().enumerate() {
        let x = MARGIN_LEFT + i as f64 * bar_width;
        let down_h = bin.downside as f64 * unit;
        let up_h = bin.upside as f64 * unit;

        if bin.downside > 0 {
            svg.push_str(&format!(
                "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
                x + 1.0,
                baseline - down_h,
                (bar_width - 2.0).max(1.0),
                down_h,
                DOWNSIDE_COLOR
            ));
        }
        if bin.upside > 0 {
            svg.push_str(&format!(
                "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
                x + 1.0,
                baseline - down_h - up_h,
                (bar_width - 2.0).max(1.0),
                up_h,
                UPSIDE_COLOR
            ));
        }
    }

    if let (Some(first), Some(last)) = (histogram.bins.first(), histogram.bins.last()) {
        label(
            &mut svg,
            MARGIN_LEFT,
            CHART_HEIGHT,
            "middle",
            10,
            &format!("{:+.1}%", first.lower),
        );
        label(
            &mut svg,
            CHART_WIDTH - MARGIN_RIGHT,
            CHART_HEIGHT,
            "middle",
            10,
            &format!("{:+.1}%", last.upper),
        );
    }

    svg.push_str("</svg>");
    svg
}
