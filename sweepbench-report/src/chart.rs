//! Chart Rendering
//!
//! Plots elapsed time against iteration count: one panel per implementation,
//! one line per secondary parameter value. The SVG is written by hand; no
//! plotting backend is involved.

use sweepbench_core::{Dataset, SweepResults};

/// Line colors, cycled per series
const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const TICKS: usize = 5;

/// Anything that can turn sweep results into a rendered chart
pub trait ChartRenderer {
    /// Render all datasets of `results`
    fn render(&self, results: &SweepResults) -> String;
}

/// One line of a panel: every sample recorded for a single secondary value
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Secondary parameter shared by all points
    pub secondary_param: i64,
    /// `(iteration_count, elapsed_seconds)` in insertion order
    pub points: Vec<(u64, f64)>,
}

/// Split a dataset into one series per secondary value within `bounds`.
///
/// Samples are selected by value, so the grid's interleaving does not matter.
/// Values with no samples produce no series.
pub fn extract_series(dataset: &Dataset, bounds: (i64, i64)) -> Vec<Series> {
    dataset
        .secondary_values()
        .into_iter()
        .filter(|v| (bounds.0..=bounds.1).contains(v))
        .map(|secondary_param| Series {
            secondary_param,
            points: dataset
                .series(secondary_param)
                .map(|s| (s.iteration_count, s.elapsed_seconds))
                .collect(),
        })
        .collect()
}

/// Layout and labels for the SVG chart
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Title above all panels
    pub title: String,
    /// X axis label
    pub x_label: String,
    /// Y axis label
    pub y_label: String,
    /// Legend suffix for each series (e.g. "pattern bytes")
    pub series_label: String,
    /// Width of one panel in pixels
    pub panel_width: u32,
    /// Height of one panel in pixels
    pub panel_height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Time it takes to setup algorithm".to_string(),
            x_label: "Number of iterations".to_string(),
            y_label: "Time to Setup (s)".to_string(),
            series_label: "pattern bytes".to_string(),
            panel_width: 600,
            panel_height: 480,
        }
    }
}

/// Side-by-side SVG line charts
#[derive(Debug, Clone, Default)]
pub struct SvgChartRenderer {
    options: ChartOptions,
}

impl SvgChartRenderer {
    /// Create a renderer with custom options
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    fn render_panel(
        &self,
        svg: &mut String,
        offset_x: f64,
        title: &str,
        series: &[Series],
    ) {
        let width = f64::from(self.options.panel_width);
        let height = f64::from(self.options.panel_height);
        let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;

        let points = series.iter().flat_map(|s| s.points.iter());
        let (x_min, x_max) = widen(points.clone().map(|p| p.0 as f64));
        let (_, y_max) = widen(points.map(|p| p.1).chain(std::iter::once(0.0)));
        let y_min = 0.0;

        let sx = |x: f64| offset_x + MARGIN_LEFT + (x - x_min) / (x_max - x_min) * plot_w;
        let sy = |y: f64| MARGIN_TOP + plot_h - (y - y_min) / (y_max - y_min) * plot_h;

        svg.push_str(&format!(
            "  <g class=\"panel\">\n    <text class=\"title\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
            offset_x + MARGIN_LEFT + plot_w / 2.0,
            MARGIN_TOP - 15.0,
            escape(title)
        ));
        svg.push_str(&format!(
            "    <rect class=\"frame\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\"/>\n",
            offset_x + MARGIN_LEFT,
            MARGIN_TOP,
            plot_w,
            plot_h
        ));

        for i in 0..=TICKS {
            let frac = i as f64 / TICKS as f64;
            let xv = x_min + frac * (x_max - x_min);
            let yv = y_min + frac * (y_max - y_min);
            svg.push_str(&format!(
                "    <text class=\"tick\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{:.0}</text>\n",
                sx(xv),
                MARGIN_TOP + plot_h + 16.0,
                xv
            ));
            svg.push_str(&format!(
                "    <text class=\"tick\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{:.4}</text>\n",
                offset_x + MARGIN_LEFT - 6.0,
                sy(yv) + 4.0,
                yv
            ));
        }

        svg.push_str(&format!(
            "    <text class=\"label\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
            offset_x + MARGIN_LEFT + plot_w / 2.0,
            height - 12.0,
            escape(&self.options.x_label)
        ));
        svg.push_str(&format!(
            "    <text class=\"label\" transform=\"translate({:.1},{:.1}) rotate(-90)\" text-anchor=\"middle\">{}</text>\n",
            offset_x + 16.0,
            MARGIN_TOP + plot_h / 2.0,
            escape(&self.options.y_label)
        ));

        for (idx, s) in series.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            let coords: Vec<String> = s
                .points
                .iter()
                .map(|&(x, y)| format!("{:.1},{:.1}", sx(x as f64), sy(y)))
                .collect();
            svg.push_str(&format!(
                "    <polyline class=\"series\" points=\"{}\" fill=\"none\" stroke=\"{}\"/>\n",
                coords.join(" "),
                color
            ));
            for &(x, y) in &s.points {
                svg.push_str(&format!(
                    "    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"{}\"/>\n",
                    sx(x as f64),
                    sy(y),
                    color
                ));
            }

            let legend_y = MARGIN_TOP + 14.0 + idx as f64 * 16.0;
            let legend_x = offset_x + MARGIN_LEFT + 10.0;
            svg.push_str(&format!(
                "    <rect x=\"{:.1}\" y=\"{:.1}\" width=\"10\" height=\"10\" fill=\"{}\"/>\n",
                legend_x,
                legend_y - 9.0,
                color
            ));
            svg.push_str(&format!(
                "    <text class=\"legend\" x=\"{:.1}\" y=\"{:.1}\">{} {}</text>\n",
                legend_x + 14.0,
                legend_y,
                s.secondary_param,
                escape(&self.options.series_label)
            ));
        }

        svg.push_str("  </g>\n");
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, results: &SweepResults) -> String {
        let panels = results.datasets.len().max(1);
        let width = self.options.panel_width as usize * panels;
        let height = self.options.panel_height as f64 + MARGIN_TOP;

        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{:.0}\">\n",
            width, height
        ));
        svg.push_str("  <style>\n");
        svg.push_str("    .frame { stroke: #333; }\n");
        svg.push_str("    .title { font-family: sans-serif; font-size: 15px; font-weight: bold; }\n");
        svg.push_str("    .label, .legend { font-family: sans-serif; font-size: 12px; }\n");
        svg.push_str("    .tick { font-family: monospace; font-size: 10px; fill: #555; }\n");
        svg.push_str("    .series { stroke-width: 1.5; }\n");
        svg.push_str("  </style>\n");
        svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
        svg.push_str(&format!(
            "  <text class=\"title\" x=\"{:.1}\" y=\"20\" text-anchor=\"middle\">{}</text>\n",
            width as f64 / 2.0,
            escape(&self.options.title)
        ));

        // Panels sit below the global title
        svg.push_str(&format!("  <g transform=\"translate(0,{:.0})\">\n", MARGIN_TOP));
        for (idx, (id, dataset)) in results.datasets.iter().enumerate() {
            let series = extract_series(dataset, results.secondary_bounds);
            let offset_x = idx as f64 * f64::from(self.options.panel_width);
            self.render_panel(&mut svg, offset_x, &format!("{} implementation", id), &series);
        }
        svg.push_str("  </g>\n");

        svg.push_str("</svg>\n");
        svg
    }
}

/// Axis range covering all values, padded so it is never empty
fn widen(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        let pad = if min.abs() > f64::EPSILON { min.abs() * 0.1 } else { 1.0 };
        return (min - pad, max + pad);
    }
    (min, max)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweepbench_core::{ImplementationId, Sample};

    fn interleaved() -> Dataset {
        let mut dataset = Dataset::new();
        for (iterations, secs) in [(10, 0.1), (40, 0.4), (70, 0.7)] {
            for secondary in 1..=2 {
                dataset.push(Sample {
                    iteration_count: iterations,
                    secondary_param: secondary,
                    elapsed_seconds: secs * secondary as f64,
                });
            }
        }
        dataset
    }

    #[test]
    fn test_extract_series_by_value() {
        let series = extract_series(&interleaved(), (1, 2));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].secondary_param, 1);
        assert_eq!(series[0].points, vec![(10, 0.1), (40, 0.4), (70, 0.7)]);
        assert_eq!(series[1].points.len(), 3);
    }

    #[test]
    fn test_extract_series_respects_bounds() {
        let series = extract_series(&interleaved(), (2, 5));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].secondary_param, 2);
    }

    #[test]
    fn test_svg_has_panel_per_implementation() {
        let mut results = SweepResults::new((1, 2));
        results
            .datasets
            .insert(ImplementationId::new("cpp"), interleaved());
        results
            .datasets
            .insert(ImplementationId::new("go"), interleaved());

        let svg = SvgChartRenderer::default().render(&results);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("class=\"panel\"").count(), 2);
        assert_eq!(svg.matches("<polyline").count(), 4);
        assert!(svg.contains("cpp implementation"));
        assert!(svg.contains("2 pattern bytes"));
    }

    #[test]
    fn test_svg_empty_results() {
        let svg = SvgChartRenderer::default().render(&SweepResults::new((0, 0)));
        assert!(svg.contains("</svg>"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn test_widen_degenerate_range() {
        assert_eq!(widen(std::iter::empty()), (0.0, 1.0));
        let (lo, hi) = widen([5.0, 5.0].into_iter());
        assert!(lo < 5.0 && hi > 5.0);
    }
}
