//! SVG line plot of aggregated curves.
//!
//! Every curve is drawn against the shared input axis with its own colour
//! and marker, with a legend in the upper-left corner of the plot area.

use anyhow::{bail, Result};
use std::fmt::Write;

use crate::runner::TrialReport;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;
const TICKS: usize = 5;
const MARKER: f64 = 3.0;

const COLORS: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

/// Title and axis labels of the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for PlotLabels {
    fn default() -> Self {
        Self {
            title: "perf".to_string(),
            x_label: "n-th fibonacci".to_string(),
            y_label: "time (ns)".to_string(),
        }
    }
}

/// Linear mapping from data range to pixel range.
#[derive(Debug, Clone, Copy)]
struct Scale {
    min: f64,
    max: f64,
    from: f64,
    to: f64,
}

impl Scale {
    fn new(min: f64, max: f64, from: f64, to: f64) -> Self {
        let (min, max) = if max > min { (min, max) } else { (min - 1.0, max + 1.0) };
        Self { min, max, from, to }
    }

    fn map(&self, value: f64) -> f64 {
        self.from + (value - self.min) / (self.max - self.min) * (self.to - self.from)
    }

    fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=TICKS).map(move |i| self.min + (self.max - self.min) * i as f64 / TICKS as f64)
    }

    fn label(&self, value: f64) -> String {
        let span = self.max - self.min;
        if span >= 10.0 {
            format!("{:.0}", value)
        } else if span >= 1.0 {
            format!("{:.1}", value)
        } else {
            format!("{:.3}", value)
        }
    }
}

/// SVG format reporter
pub struct SvgReporter;

impl SvgReporter {
    /// Render every curve in `report` as one SVG document.
    pub fn format(report: &TrialReport, labels: &PlotLabels) -> Result<String> {
        if report.axis.is_empty() || report.curves.is_empty() {
            bail!("nothing to plot: report has no curves or no inputs");
        }

        let xs: Vec<f64> = report.axis.iter().map(|&x| x as f64).collect();
        let (x_min, x_max) = bounds(xs.iter().copied());
        let (y_min, y_max) = bounds(report.curves.iter().flat_map(|c| c.values()));
        let y_pad = (y_max - y_min) * 0.05;

        let plot_left = MARGIN_LEFT;
        let plot_right = WIDTH - MARGIN_RIGHT;
        let plot_top = MARGIN_TOP;
        let plot_bottom = HEIGHT - MARGIN_BOTTOM;

        let x_scale = Scale::new(x_min, x_max, plot_left, plot_right);
        let y_scale = Scale::new(y_min - y_pad, y_max + y_pad, plot_bottom, plot_top);

        let mut out = String::new();
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
        )?;
        writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="16" text-anchor="middle">{}</text>"#,
            (plot_left + plot_right) / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            escape(&labels.title)
        )?;

        // Frame
        writeln!(
            out,
            r#"<rect x="{plot_left}" y="{plot_top}" width="{}" height="{}" fill="none" stroke="black"/>"#,
            plot_right - plot_left,
            plot_bottom - plot_top
        )?;

        for tick in x_scale.ticks() {
            let x = x_scale.map(tick);
            writeln!(
                out,
                r#"<line x1="{x:.2}" y1="{plot_bottom}" x2="{x:.2}" y2="{}" stroke="black"/>"#,
                plot_bottom + 5.0
            )?;
            writeln!(
                out,
                r#"<text x="{x:.2}" y="{}" font-size="12" text-anchor="middle">{}</text>"#,
                plot_bottom + 20.0,
                x_scale.label(tick)
            )?;
        }

        for tick in y_scale.ticks() {
            let y = y_scale.map(tick);
            writeln!(
                out,
                r#"<line x1="{}" y1="{y:.2}" x2="{plot_left}" y2="{y:.2}" stroke="black"/>"#,
                plot_left - 5.0
            )?;
            writeln!(
                out,
                r#"<text x="{}" y="{:.2}" font-size="12" text-anchor="end">{}</text>"#,
                plot_left - 8.0,
                y + 4.0,
                y_scale.label(tick)
            )?;
        }

        writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="16" text-anchor="middle">{}</text>"#,
            (plot_left + plot_right) / 2.0,
            HEIGHT - 20.0,
            escape(&labels.x_label)
        )?;
        writeln!(
            out,
            r#"<text x="20" y="{y}" font-size="16" text-anchor="middle" transform="rotate(-90 20 {y})">{}</text>"#,
            escape(&labels.y_label),
            y = (plot_top + plot_bottom) / 2.0
        )?;

        for (index, curve) in report.curves.iter().enumerate() {
            let color = COLORS[index % COLORS.len()];
            let points: Vec<(f64, f64)> = xs
                .iter()
                .zip(curve.values())
                .map(|(&x, y)| (x_scale.map(x), y_scale.map(y)))
                .collect();

            let polyline = points
                .iter()
                .map(|(x, y)| format!("{x:.2},{y:.2}"))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                out,
                r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{polyline}"/>"#
            )?;

            for &(x, y) in &points {
                write_marker(&mut out, index, x, y, color)?;
            }
        }

        write_legend(&mut out, report, plot_left + 10.0, plot_top + 10.0)?;

        writeln!(out, "</svg>")?;
        Ok(out)
    }
}

/// `+` for the first curve, `*` for the second, a dot for the rest.
fn write_marker(out: &mut String, index: usize, x: f64, y: f64, color: &str) -> Result<()> {
    let m = MARKER;
    match index {
        0 => writeln!(
            out,
            r#"<path d="M{:.2} {y:.2}H{:.2}M{x:.2} {:.2}V{:.2}" stroke="{color}"/>"#,
            x - m,
            x + m,
            y - m,
            y + m
        )?,
        1 => writeln!(
            out,
            r#"<path d="M{:.2} {y:.2}H{:.2}M{x:.2} {:.2}V{:.2}M{:.2} {:.2}L{:.2} {:.2}M{:.2} {:.2}L{:.2} {:.2}" stroke="{color}"/>"#,
            x - m,
            x + m,
            y - m,
            y + m,
            x - m * 0.7,
            y - m * 0.7,
            x + m * 0.7,
            y + m * 0.7,
            x - m * 0.7,
            y + m * 0.7,
            x + m * 0.7,
            y - m * 0.7
        )?,
        _ => writeln!(
            out,
            r#"<circle cx="{x:.2}" cy="{y:.2}" r="{}" fill="{color}"/>"#,
            m * 0.8
        )?,
    }
    Ok(())
}

fn write_legend(out: &mut String, report: &TrialReport, left: f64, top: f64) -> Result<()> {
    let longest = report
        .curves
        .iter()
        .map(|c| c.variant.chars().count())
        .max()
        .unwrap_or(0);
    let width = 40.0 + longest as f64 * 7.5;
    let height = 10.0 + report.curves.len() as f64 * 18.0;

    writeln!(
        out,
        r##"<rect x="{left}" y="{top}" width="{width}" height="{height}" fill="white" stroke="#cccccc"/>"##
    )?;

    for (index, curve) in report.curves.iter().enumerate() {
        let color = COLORS[index % COLORS.len()];
        let y = top + 14.0 + index as f64 * 18.0;
        writeln!(
            out,
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{color}" stroke-width="1.5"/>"#,
            left + 6.0,
            left + 28.0
        )?;
        write_marker(out, index, left + 17.0, y, color)?;
        writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="12">{}</text>"#,
            left + 34.0,
            y + 4.0,
            escape(&curve.variant)
        )?;
    }
    Ok(())
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
