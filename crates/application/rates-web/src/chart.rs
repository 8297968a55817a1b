//! Server-rendered SVG trend chart

use chrono::NaiveDateTime;
use rates_core::{format_rate, Category, RateTable};
use std::collections::BTreeSet;
use std::fmt::Write;

const TITLE: &str = "Historical Rate Trend";
const X_LABEL: &str = "Date";
const Y_LABEL: &str = "Rate (Lakhs)";

/// One colour per category, indexed by [`Category::index`], so a category
/// keeps its colour whatever else is selected.
const PALETTE: [&str; Category::COUNT] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
];

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 180.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const Y_TICKS: usize = 5;
const MAX_X_TICKS: usize = 6;

/// Categories chosen for the chart.
///
/// Read from repeated `props` query parameters. The form also sends
/// `chart=1` so that "nothing ticked" can be told apart from "first visit".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSelection {
    categories: Vec<Category>,
}

impl Default for ChartSelection {
    fn default() -> Self {
        Self {
            categories: Category::DEFAULT_CHART.to_vec(),
        }
    }
}

impl ChartSelection {
    pub fn from_query(query: Option<&str>) -> Self {
        let Some(query) = query else {
            return Self::default();
        };

        let mut submitted = false;
        let mut picked = BTreeSet::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "chart" => submitted = true,
                "props" => {
                    submitted = true;
                    if let Some(category) = Category::from_label(&value) {
                        picked.insert(category);
                    }
                }
                _ => {}
            }
        }

        if submitted {
            Self {
                categories: picked.into_iter().collect(),
            }
        } else {
            Self::default()
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Multi-series line chart with markers
#[derive(Debug, Clone, Copy)]
pub struct LineChart {
    width: f64,
    height: f64,
}

impl Default for LineChart {
    fn default() -> Self {
        Self::new(960, 420)
    }
}

impl LineChart {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    /// Render the selected categories as an SVG document fragment
    pub fn render(&self, table: &RateTable, categories: &[Category]) -> String {
        let series: Vec<(Category, Vec<(NaiveDateTime, f64)>)> = categories
            .iter()
            .map(|&c| (c, table.series(c)))
            .filter(|(_, points)| !points.is_empty())
            .collect();

        if series.is_empty() {
            return "<div class=\"chart-empty\">No data points for the selected properties.</div>"
                .to_string();
        }

        let all_points = series.iter().flat_map(|(_, p)| p.iter());
        let (mut t_min, mut t_max) = (i64::MAX, i64::MIN);
        let (mut v_min, mut v_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for (ts, v) in all_points {
            let t = ts.and_utc().timestamp();
            t_min = t_min.min(t);
            t_max = t_max.max(t);
            v_min = v_min.min(*v);
            v_max = v_max.max(*v);
        }
        if v_min == v_max {
            v_min -= 1.0;
            v_max += 1.0;
        } else {
            let pad = (v_max - v_min) * 0.05;
            v_min -= pad;
            v_max += pad;
        }

        let plot_w = self.width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = self.height - MARGIN_TOP - MARGIN_BOTTOM;
        let x_of = |t: i64| {
            if t_max == t_min {
                MARGIN_LEFT + plot_w / 2.0
            } else {
                MARGIN_LEFT + (t - t_min) as f64 / (t_max - t_min) as f64 * plot_w
            }
        };
        let y_of = |v: f64| MARGIN_TOP + (v_max - v) / (v_max - v_min) * plot_h;

        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg class=\"chart\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" preserveAspectRatio=\"xMidYMid meet\">\
             <text class=\"chart-title\" x=\"{tx:.1}\" y=\"28\" text-anchor=\"middle\">{title}</text>",
            w = self.width,
            h = self.height,
            tx = MARGIN_LEFT + plot_w / 2.0,
            title = TITLE,
        );

        // y grid + labels
        for i in 0..=Y_TICKS {
            let v = v_min + (v_max - v_min) * i as f64 / Y_TICKS as f64;
            let y = y_of(v);
            let _ = write!(
                svg,
                "<line class=\"grid\" x1=\"{x1:.1}\" y1=\"{y:.1}\" x2=\"{x2:.1}\" y2=\"{y:.1}\"/>\
                 <text class=\"tick\" x=\"{lx:.1}\" y=\"{ly:.1}\" text-anchor=\"end\">{label}</text>",
                x1 = MARGIN_LEFT,
                x2 = MARGIN_LEFT + plot_w,
                lx = MARGIN_LEFT - 8.0,
                ly = y + 4.0,
                label = format_tick(v),
            );
        }

        // x labels
        let stamps: BTreeSet<NaiveDateTime> = series
            .iter()
            .flat_map(|(_, p)| p.iter().map(|(ts, _)| *ts))
            .collect();
        for ts in pick_ticks(&stamps.into_iter().collect::<Vec<_>>(), MAX_X_TICKS) {
            let x = x_of(ts.and_utc().timestamp());
            let _ = write!(
                svg,
                "<text class=\"tick\" x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"middle\">{label}</text>",
                y = MARGIN_TOP + plot_h + 18.0,
                label = ts.format("%d %b"),
            );
        }

        // axes
        let _ = write!(
            svg,
            "<line class=\"axis\" x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\"/>\
             <line class=\"axis\" x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\"/>\
             <text class=\"axis-label\" x=\"{cx:.1}\" y=\"{xl:.1}\" text-anchor=\"middle\">{x_label}</text>\
             <text class=\"axis-label\" transform=\"translate(18 {cy:.1}) rotate(-90)\" text-anchor=\"middle\">{y_label}</text>",
            l = MARGIN_LEFT,
            r = MARGIN_LEFT + plot_w,
            t = MARGIN_TOP,
            b = MARGIN_TOP + plot_h,
            cx = MARGIN_LEFT + plot_w / 2.0,
            xl = self.height - 16.0,
            cy = MARGIN_TOP + plot_h / 2.0,
            x_label = X_LABEL,
            y_label = Y_LABEL,
        );

        // series
        for (category, points) in &series {
            let colour = PALETTE[category.index()];
            let path: Vec<String> = points
                .iter()
                .map(|(ts, v)| format!("{:.1},{:.1}", x_of(ts.and_utc().timestamp()), y_of(*v)))
                .collect();
            let _ = write!(
                svg,
                "<polyline class=\"series\" data-category=\"{label}\" fill=\"none\" stroke=\"{colour}\" stroke-width=\"2\" points=\"{points}\"/>",
                label = category.label(),
                points = path.join(" "),
            );
            for (ts, v) in points {
                let _ = write!(
                    svg,
                    "<circle class=\"marker\" cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"4\" fill=\"{colour}\">\
                     <title>{label}: {value} ({when})</title></circle>",
                    x = x_of(ts.and_utc().timestamp()),
                    y = y_of(*v),
                    label = category.label(),
                    value = format_rate(Some(*v)),
                    when = ts.format("%d %b %Y, %I:%M %p"),
                );
            }
        }

        // legend
        let legend_x = MARGIN_LEFT + plot_w + 20.0;
        for (i, (category, _)) in series.iter().enumerate() {
            let y = MARGIN_TOP + 10.0 + i as f64 * 22.0;
            let _ = write!(
                svg,
                "<rect x=\"{x:.1}\" y=\"{ry:.1}\" width=\"14\" height=\"4\" fill=\"{colour}\"/>\
                 <text class=\"legend\" x=\"{tx:.1}\" y=\"{ty:.1}\">{label}</text>",
                x = legend_x,
                ry = y - 2.0,
                colour = PALETTE[category.index()],
                tx = legend_x + 20.0,
                ty = y + 4.0,
                label = category.label(),
            );
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Up to `max` evenly spread entries, always including first and last
fn pick_ticks(stamps: &[NaiveDateTime], max: usize) -> Vec<NaiveDateTime> {
    if stamps.len() <= max || max < 2 {
        return stamps.to_vec();
    }
    let step = (stamps.len() - 1) as f64 / (max - 1) as f64;
    (0..max)
        .map(|i| stamps[((i as f64 * step).round() as usize).min(stamps.len() - 1)])
        .collect()
}

fn format_tick(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
