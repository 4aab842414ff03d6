//! SVG bar charts.
//!
//! Charts are plain SVG documents with a multi-line title, a labelled y axis
//! with five grid lines and one bar per category. Category labels are
//! rotated and thinned out when there are too many to fit.

use crate::stats::daily::DailyCount;
use crate::stats::histogram::CountryHistogram;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 110.0;
const TITLE_LINE_HEIGHT: f64 = 16.0;
const GRID_LINES: usize = 5;
/// Upper bound on x axis labels before labels are skipped
const MAX_X_LABELS: usize = 25;
/// Countries shown on a country chart
pub const MAX_COUNTRIES_PLOT: usize = 25;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: Vec<String>,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Smallest 1/2/5 x 10^n value that is at least `value`
fn nice_ceiling(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&candidate| candidate >= value)
        .unwrap_or(10.0 * magnitude)
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

impl BarChart {
    /// Attacks per day, titled with totals, top offenders and usernames.
    pub fn attacks_per_day(days: &[DailyCount], title: Vec<String>) -> Self {
        Self {
            title,
            y_label: "Number of attacks".to_string(),
            bars: days
                .iter()
                .map(|d| Bar {
                    label: d.day.format("%Y-%m-%d").to_string(),
                    value: d.attacks as f64,
                })
                .collect(),
        }
    }

    /// Percentage share of the top countries of a histogram.
    pub fn country_distribution(histogram: &CountryHistogram, first: &str, last: &str) -> Self {
        let granularity = histogram.granularity;
        Self {
            title: vec![
                granularity.chart_title().to_string(),
                format!(
                    "From {} to {} ({} {})",
                    first,
                    last,
                    histogram.total,
                    granularity.noun()
                ),
            ],
            y_label: granularity.y_label().to_string(),
            bars: histogram
                .tallies
                .iter()
                .take(MAX_COUNTRIES_PLOT)
                .map(|t| Bar {
                    label: if t.country.is_empty() {
                        "??".to_string()
                    } else {
                        t.country.clone()
                    },
                    value: t.percentage,
                })
                .collect(),
        }
    }

    pub fn render_svg(&self) -> String {
        let top = 20.0 + TITLE_LINE_HEIGHT * self.title.len() as f64;
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - top - MARGIN_BOTTOM;
        let bottom = top + plot_height;
        let max_value = self.bars.iter().map(|b| b.value).fold(0.0, f64::max);
        let y_max = nice_ceiling(max_value);

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\">\n",
            w = WIDTH,
            h = HEIGHT
        ));
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

        for (i, line) in self.title.iter().enumerate() {
            svg.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-size=\"12\" text-anchor=\"middle\">{}</text>\n",
                WIDTH / 2.0,
                20.0 + TITLE_LINE_HEIGHT * (i as f64 + 0.5),
                escape(line)
            ));
        }

        for step in 0..=GRID_LINES {
            let value = y_max * step as f64 / GRID_LINES as f64;
            let y = bottom - plot_height * step as f64 / GRID_LINES as f64;
            svg.push_str(&format!(
                "<line x1=\"{x1}\" y1=\"{y:.1}\" x2=\"{x2}\" y2=\"{y:.1}\" stroke=\"#dddddd\"/>\n",
                x1 = MARGIN_LEFT,
                x2 = MARGIN_LEFT + plot_width,
                y = y
            ));
            svg.push_str(&format!(
                "<text x=\"{}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"end\">{}</text>\n",
                MARGIN_LEFT - 6.0,
                y + 3.0,
                format_tick(value)
            ));
        }

        svg.push_str(&format!(
            "<text x=\"20\" y=\"{y:.1}\" font-size=\"12\" text-anchor=\"middle\" transform=\"rotate(-90 20 {y:.1})\">{label}</text>\n",
            y = top + plot_height / 2.0,
            label = escape(&self.y_label)
        ));

        if !self.bars.is_empty() {
            let slot = plot_width / self.bars.len() as f64;
            let label_step = (self.bars.len() + MAX_X_LABELS - 1) / MAX_X_LABELS;
            for (i, bar) in self.bars.iter().enumerate() {
                let height = plot_height * bar.value / y_max;
                let x = MARGIN_LEFT + slot * i as f64 + slot * 0.1;
                svg.push_str(&format!(
                    "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"#1f77b4\"><title>{}: {}</title></rect>\n",
                    x,
                    bottom - height,
                    slot * 0.8,
                    height,
                    escape(&bar.label),
                    bar.value
                ));
                if i % label_step == 0 {
                    let cx = MARGIN_LEFT + slot * (i as f64 + 0.5);
                    let ly = bottom + 14.0;
                    svg.push_str(&format!(
                        "<text x=\"{cx:.1}\" y=\"{ly:.1}\" font-size=\"10\" text-anchor=\"end\" transform=\"rotate(-45 {cx:.1} {ly:.1})\">{label}</text>\n",
                        cx = cx,
                        ly = ly,
                        label = escape(&bar.label)
                    ));
                }
            }
        }

        svg.push_str(&format!(
            "<line x1=\"{x}\" y1=\"{b:.1}\" x2=\"{x2}\" y2=\"{b:.1}\" stroke=\"black\"/>\n",
            x = MARGIN_LEFT,
            x2 = MARGIN_LEFT + plot_width,
            b = bottom
        ));
        svg.push_str("</svg>\n");
        svg
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render_svg())
            .with_context(|| format!("Failed to write chart: {}", path.display()))
    }
}
