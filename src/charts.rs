//! Pure SVG geometry for the dashboard charts. Handlers build these view
//! structs and the templates inline them; nothing here touches the network.

use crate::helpers::fmt_number;

pub const LINE_WIDTH: u32 = 720;
pub const LINE_HEIGHT: u32 = 240;
const PAD: f64 = 10.0;

/// Thins a sample sequence for chart display: unchanged when it already fits,
/// otherwise every `step`-th element. A zero step is a passthrough.
pub fn downsample<T: Clone>(items: &[T], step: usize) -> Vec<T> {
    if step == 0 || items.len() <= step {
        return items.to_vec();
    }
    items.iter().step_by(step).cloned().collect()
}

#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub color: &'static str,
    /// Space-separated `x,y` pairs for an SVG polyline.
    pub points: String,
    /// Peak value of the series, preformatted for the legend.
    pub max_label: String,
}

#[derive(Debug, Clone, Default)]
pub struct LineChart {
    pub width: u32,
    pub height: u32,
    pub x_labels: Vec<String>,
    pub series: Vec<Series>,
}

impl LineChart {
    /// Lays out each series against its own vertical scale (the legend carries
    /// the per-series peak), which stands in for the original dual-axis chart.
    pub fn build(x_labels: Vec<String>, series: Vec<(String, &'static str, Vec<f64>)>) -> Self {
        let w = LINE_WIDTH as f64;
        let h = LINE_HEIGHT as f64;

        // At most a dozen axis ticks, whatever the sample density.
        let x_labels = if x_labels.len() > 12 {
            downsample(&x_labels, x_labels.len().div_ceil(12))
        } else {
            x_labels
        };

        let built = series
            .into_iter()
            .map(|(name, color, values)| {
                let max = values.iter().cloned().fold(0.0f64, f64::max);
                let scale = if max > 0.0 { max } else { 1.0 };
                let n = values.len();
                let points = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| {
                        let x = if n > 1 {
                            PAD + (w - 2.0 * PAD) * i as f64 / (n - 1) as f64
                        } else {
                            w / 2.0
                        };
                        let y = h - PAD - (h - 2.0 * PAD) * (v.max(0.0) / scale);
                        format!("{:.1},{:.1}", x, y)
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                Series {
                    name,
                    color,
                    points,
                    max_label: fmt_number(max),
                }
            })
            .collect();

        Self {
            width: LINE_WIDTH,
            height: LINE_HEIGHT,
            x_labels,
            series: built,
        }
    }
}

pub const PIE_SIZE: u32 = 220;

#[derive(Debug, Clone)]
pub struct PieSlice {
    pub label: String,
    pub color: &'static str,
    /// SVG path for the wedge.
    pub path: String,
    pub pct: String,
}

#[derive(Debug, Clone, Default)]
pub struct PieChart {
    pub size: u32,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn build(entries: &[(String, f64, &'static str)]) -> Self {
        let total: f64 = entries.iter().map(|(_, v, _)| v.max(0.0)).sum();
        if total <= 0.0 {
            return Self { size: PIE_SIZE, ..Default::default() };
        }

        let c = PIE_SIZE as f64 / 2.0;
        let r = c - 2.0;
        let mut angle = -std::f64::consts::FRAC_PI_2;
        let mut slices = Vec::new();

        for (label, value, color) in entries {
            let value = value.max(0.0);
            if value == 0.0 {
                continue;
            }
            let sweep = value / total * std::f64::consts::TAU;
            let path = if (sweep - std::f64::consts::TAU).abs() < 1e-9 {
                // full circle, drawn as two half arcs
                format!(
                    "M {:.2} {:.2} A {r:.2} {r:.2} 0 1 1 {:.2} {:.2} A {r:.2} {r:.2} 0 1 1 {:.2} {:.2} Z",
                    c,
                    c - r,
                    c,
                    c + r,
                    c,
                    c - r,
                )
            } else {
                let (x0, y0) = (c + r * angle.cos(), c + r * angle.sin());
                let end = angle + sweep;
                let (x1, y1) = (c + r * end.cos(), c + r * end.sin());
                let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
                format!(
                    "M {c:.2} {c:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large} 1 {x1:.2} {y1:.2} Z"
                )
            };
            slices.push(PieSlice {
                label: label.clone(),
                color,
                path,
                pct: format!("{:.0}%", value / total * 100.0),
            });
            angle += sweep;
        }

        Self { size: PIE_SIZE, slices }
    }
}
