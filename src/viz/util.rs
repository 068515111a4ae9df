//! Utility functions for visualization: colors, categorical axes, label gutters.

use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Soft qualitative colors for box plots (ColorBrewer Set2).
const SET2: [RGBColor; 8] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(255, 217, 47),
    RGBColor(229, 196, 148),
    RGBColor(179, 179, 179),
];

/// Pastel qualitative colors for violins.
const PASTEL: [RGBColor; 8] = [
    RGBColor(161, 201, 244),
    RGBColor(255, 180, 130),
    RGBColor(141, 229, 161),
    RGBColor(255, 159, 155),
    RGBColor(208, 187, 255),
    RGBColor(222, 187, 155),
    RGBColor(250, 176, 228),
    RGBColor(207, 207, 207),
];

/// Anchors of the viridis sequential map.
pub const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

/// Anchors of the rocket sequential map (dark to light).
pub const ROCKET: [RGBColor; 5] = [
    RGBColor(3, 5, 26),
    RGBColor(94, 23, 89),
    RGBColor(203, 27, 79),
    RGBColor(245, 127, 93),
    RGBColor(250, 235, 221),
];

/// Anchors of the coolwarm diverging map (blue, neutral, red).
pub const COOLWARM: [RGBColor; 3] = [
    RGBColor(59, 76, 192),
    RGBColor(221, 221, 221),
    RGBColor(180, 4, 38),
];

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

#[inline]
pub fn set2_color(idx: usize) -> RGBColor {
    SET2[idx % SET2.len()]
}

#[inline]
pub fn pastel_color(idx: usize) -> RGBColor {
    PASTEL[idx % PASTEL.len()]
}

/// Piecewise-linear interpolation across evenly spaced anchors; `t` is clamped to `0..=1`.
pub fn gradient(anchors: &[RGBColor], t: f64) -> RGBColor {
    match anchors.len() {
        0 => BLACK,
        1 => anchors[0],
        n => {
            let pos = t.clamp(0.0, 1.0) * (n - 1) as f64;
            let i = (pos.floor() as usize).min(n - 2);
            let f = pos - i as f64;
            let (a, b) = (anchors[i], anchors[i + 1]);
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
            RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        }
    }
}

/// Position of the `i`-th of `n` items on `0..=1` (single item sits at 0).
pub fn spread(i: usize, n: usize) -> f64 {
    if n <= 1 { 0.0 } else { i as f64 / (n - 1) as f64 }
}

/// Categorical axis on a float coordinate: category `i` sits at `i as f64`, the axis runs
/// `-0.5..n-0.5`, and only integral ticks get a label.
pub fn category_range(n: usize) -> std::ops::Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

pub fn category_label<S: AsRef<str>>(labels: &[S], v: f64) -> String {
    let i = v.round();
    if (v - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels
        .get(i as usize)
        .map(|s| s.as_ref().to_string())
        .unwrap_or_default()
}

/// Width of a label gutter that fits the longest of `labels` at `font_px`, with room for
/// tick marks; clamped to avoid silly extremes.
pub fn label_gutter_px<S: AsRef<str>>(labels: &[S], font_px: u32, min: u32, max: u32) -> u32 {
    let widest = labels
        .iter()
        .map(|s| estimate_text_width_px(s.as_ref(), font_px))
        .max()
        .unwrap_or(0);
    widest.saturating_add(18).clamp(min, max)
}

/// Plotters errors are backend-generic; flatten them into `anyhow`.
pub fn plot_err<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}
