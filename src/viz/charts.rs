//! The six static charts. Each `plot_*` picks a backend from the output extension and
//! delegates to a `draw_*` helper that works on any Plotters backend.

use super::render_to;
use super::text::truncate_to_width;
use super::util::{
    COOLWARM, ROCKET, VIRIDIS, category_label, category_range, gradient, label_gutter_px,
    office_color, pastel_color, plot_err, set2_color, spread,
};
use crate::analysis::PokemonFrame;
use crate::models::{STAT_COLUMNS, stat_label};
use crate::stats;
use anyhow::{Result, anyhow};
use num_format::{Locale, ToFormattedString};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const MARGIN: u32 = 16;

/// Sans-serif text style anchored at `h`/`v`.
pub(crate) fn anchored<'a>(px: i32, h: HPos, v: VPos) -> TextStyle<'a> {
    let style: TextStyle = (FontFamily::SansSerif, px).into();
    style.pos(Pos::new(h, v))
}

/// Centered notice for a chart that has nothing to draw.
fn no_data_note<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, msg: &str) -> Result<()> {
    let (w, h) = root.dim_in_pixel();
    root.draw(&Text::new(
        msg.to_string(),
        ((w / 2) as i32, (h / 2) as i32),
        anchored(18, HPos::Center, VPos::Center),
    ))
    .map_err(plot_err)
}

fn count_fmt(v: &f64) -> String {
    (v.round() as i64).to_formatted_string(&Locale::en)
}

fn value_fmt(v: &f64) -> String {
    let a = v.abs();
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*}", prec, *v)
}

// ---------------------------------------------------------------------------
// Type distribution (bar)
// ---------------------------------------------------------------------------

/// Bar chart of how many Pokémon carry each type, most common first. A table without
/// types gives an empty chart.
pub fn plot_type_distribution<P: AsRef<Path>>(frame: &PokemonFrame, out_path: P) -> Result<()> {
    let counts = frame.type_counts();
    render_to!(out_path, (1400, 800), draw_type_distribution, &counts)
}

fn draw_type_distribution<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    counts: &[(String, usize)],
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;
    let n = counts.len();
    let labels: Vec<&str> = counts.iter().map(|(t, _)| t.as_str()).collect();
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption("Distribution of Pokémon types", (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(category_range(n), 0.0..max * 1.08)
        .map_err(plot_err)?;

    let x_fmt = |v: &f64| category_label(&labels, *v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Type")
        .y_desc("Count")
        .x_labels(n.max(1))
        .y_labels(10)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&count_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, (_, c))| {
            let x = i as f64;
            let color = gradient(&VIRIDIS, spread(i, n));
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *c as f64)], color.filled())
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(counts.iter().enumerate().map(|(i, (_, c))| {
            Text::new(
                c.to_string(),
                (i as f64, *c as f64 + max * 0.01),
                anchored(12, HPos::Center, VPos::Bottom),
            )
        }))
        .map_err(plot_err)?;
    if counts.is_empty() {
        no_data_note(&root, "no type data")?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Height vs weight (scatter + regression)
// ---------------------------------------------------------------------------

/// Scatter of height (m) against weight (kg) with a least-squares line; the five
/// heaviest Pokémon are labeled.
pub fn plot_height_weight<P: AsRef<Path>>(frame: &PokemonFrame, out_path: P) -> Result<()> {
    if frame.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    render_to!(out_path, (1200, 800), draw_height_weight, frame)
}

/// Clip `y = m x + b` over `x0..x1` to the band `y0..y1`.
fn clip_line(m: f64, b: f64, (x0, x1): (f64, f64), (y0, y1): (f64, f64)) -> Option<[(f64, f64); 2]> {
    let (mut lo, mut hi) = (x0, x1);
    if m.abs() > f64::EPSILON {
        let (xa, xb) = ((y0 - b) / m, (y1 - b) / m);
        lo = lo.max(xa.min(xb));
        hi = hi.min(xa.max(xb));
    } else if b < y0 || b > y1 {
        return None;
    }
    (lo < hi).then(|| [(lo, m * lo + b), (hi, m * hi + b)])
}

fn draw_height_weight<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, frame: &PokemonFrame) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;
    let xs: Vec<f64> = frame.rows.iter().map(|r| r.height_m()).collect();
    let ys: Vec<f64> = frame.rows.iter().map(|r| r.weight_kg()).collect();
    let x_max = xs.iter().copied().fold(0.0, f64::max).max(0.1) * 1.08;
    let y_max = ys.iter().copied().fold(0.0, f64::max).max(0.1) * 1.08;

    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption("Height vs weight of Pokémon", (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, 72)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Height (m)")
        .y_desc("Weight (kg)")
        .x_labels(12)
        .y_labels(10)
        .x_label_formatter(&value_fmt)
        .y_label_formatter(&value_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(plot_err)?;

    let dot = office_color(0).mix(0.5).filled();
    chart
        .draw_series(xs.iter().zip(&ys).map(|(x, y)| Circle::new((*x, *y), 3, dot)))
        .map_err(plot_err)?;

    let fit = stats::linear_fit(&xs, &ys).and_then(|(m, b)| clip_line(m, b, (0.0, x_max), (0.0, y_max)));
    if let Some(seg) = fit {
        chart
            .draw_series(LineSeries::new(seg, RED.stroke_width(2)))
            .map_err(plot_err)?;
    }

    let nudge = x_max * 0.008;
    chart
        .draw_series(frame.heaviest(5).into_iter().map(|r| {
            Text::new(
                r.name.clone(),
                (r.height_m() + nudge, r.weight_kg()),
                anchored(13, HPos::Left, VPos::Center),
            )
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Stat distribution (box plot)
// ---------------------------------------------------------------------------

/// One box per base stat: quartile box, median, 1.5 IQR whiskers, outlier dots.
pub fn plot_stats_distribution<P: AsRef<Path>>(frame: &PokemonFrame, out_path: P) -> Result<()> {
    let summaries = (0..STAT_COLUMNS.len())
        .map(|i| stats::summarize(&frame.stat_column(i)))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| anyhow!("no stat values to plot"))?;
    render_to!(out_path, (1400, 800), draw_stats_distribution, &summaries)
}

fn draw_stats_distribution<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    summaries: &[stats::Summary],
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;
    let labels: Vec<String> = STAT_COLUMNS.iter().map(|c| stat_label(c)).collect();
    let y_max = summaries.iter().map(|s| s.max).fold(1.0, f64::max) * 1.05;

    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption("Distribution of base stats", (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(category_range(labels.len()), 0.0..y_max)
        .map_err(plot_err)?;

    let x_fmt = |v: &f64| category_label(&labels, *v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Stat")
        .y_desc("Value")
        .x_labels(labels.len())
        .y_labels(10)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&count_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(plot_err)?;

    let half = 0.3;
    chart
        .draw_series(summaries.iter().enumerate().map(|(i, s)| {
            let x = i as f64;
            Rectangle::new([(x - half, s.q1), (x + half, s.q3)], set2_color(i).filled())
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(summaries.iter().enumerate().map(|(i, s)| {
            let x = i as f64;
            Rectangle::new([(x - half, s.q1), (x + half, s.q3)], BLACK.mix(0.7).stroke_width(1))
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(summaries.iter().enumerate().flat_map(|(i, s)| {
            let x = i as f64;
            let cap = half / 2.0;
            [
                vec![(x - half, s.median), (x + half, s.median)],
                vec![(x, s.q3), (x, s.whisker_high)],
                vec![(x, s.q1), (x, s.whisker_low)],
                vec![(x - cap, s.whisker_high), (x + cap, s.whisker_high)],
                vec![(x - cap, s.whisker_low), (x + cap, s.whisker_low)],
            ]
            .into_iter()
            .map(|pts| PathElement::new(pts, BLACK.mix(0.7).stroke_width(2)))
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(summaries.iter().enumerate().flat_map(|(i, s)| {
            s.outliers
                .iter()
                .map(move |v| Circle::new((i as f64, *v), 3, BLACK.mix(0.6).stroke_width(1)))
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Base experience by generation (violin)
// ---------------------------------------------------------------------------

struct Violin {
    label: &'static str,
    /// `(y, density / max density)` along the KDE grid.
    profile: Vec<(f64, f64)>,
    summary: stats::Summary,
    /// Density at q1/median/q3, relative to the max.
    quartile_widths: [f64; 3],
}

fn build_violin(label: &'static str, values: &[f64]) -> Option<Violin> {
    let summary = stats::summarize(values)?;
    let bw = stats::scott_bandwidth(values).unwrap_or(1.0);
    let (lo, hi) = (summary.min - 2.0 * bw, summary.max + 2.0 * bw);
    let steps = 100;
    let grid: Vec<f64> = (0..=steps)
        .map(|k| lo + (hi - lo) * k as f64 / steps as f64)
        .collect();
    let dens = stats::gaussian_kde(values, &grid);
    let dmax = dens.iter().copied().fold(0.0, f64::max);
    if dmax <= 0.0 {
        return None;
    }
    let q = stats::gaussian_kde(values, &[summary.q1, summary.median, summary.q3]);
    Some(Violin {
        label,
        profile: grid.into_iter().zip(dens.into_iter().map(|d| d / dmax)).collect(),
        summary,
        // the grid may step over the true peak
        quartile_widths: [q[0], q[1], q[2]].map(|d| (d / dmax).min(1.0)),
    })
}

/// Violin per generation of base experience, with quartile lines inside. Generations
/// without values are left out; with none at all the chart is empty.
pub fn plot_base_experience_by_generation<P: AsRef<Path>>(frame: &PokemonFrame, out_path: P) -> Result<()> {
    let violins: Vec<Violin> = frame
        .base_experience_by_generation()
        .into_iter()
        .filter_map(|(g, vals)| build_violin(g.label(), &vals))
        .collect();
    render_to!(out_path, (1400, 800), draw_violins, &violins)
}

fn draw_violins<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, violins: &[Violin]) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;
    let labels: Vec<&str> = violins.iter().map(|v| v.label).collect();
    let y_lo = violins
        .iter()
        .filter_map(|v| v.profile.first().map(|p| p.0))
        .fold(f64::INFINITY, f64::min);
    let y_hi = violins
        .iter()
        .filter_map(|v| v.profile.last().map(|p| p.0))
        .fold(f64::NEG_INFINITY, f64::max);
    let (y_lo, y_hi) = if y_lo < y_hi { (y_lo, y_hi) } else { (0.0, 1.0) };

    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption("Base experience by generation", (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(category_range(labels.len()), y_lo..y_hi)
        .map_err(plot_err)?;

    let x_fmt = |v: &f64| category_label(&labels, *v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Generation")
        .y_desc("Base experience")
        .x_labels(labels.len().max(1))
        .y_labels(10)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&count_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(plot_err)?;

    let half = 0.4;
    let outline = |i: usize, v: &Violin| -> Vec<(f64, f64)> {
        let x = i as f64;
        let mut pts: Vec<(f64, f64)> = v.profile.iter().map(|(y, d)| (x - half * d, *y)).collect();
        pts.extend(v.profile.iter().rev().map(|(y, d)| (x + half * d, *y)));
        pts
    };
    chart
        .draw_series(
            violins
                .iter()
                .enumerate()
                .map(|(i, v)| Polygon::new(outline(i, v), pastel_color(i).filled())),
        )
        .map_err(plot_err)?;
    chart
        .draw_series(violins.iter().enumerate().map(|(i, v)| {
            let mut pts = outline(i, v);
            if let Some(first) = pts.first().copied() {
                pts.push(first);
            }
            PathElement::new(pts, BLACK.mix(0.6).stroke_width(1))
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(violins.iter().enumerate().flat_map(|(i, v)| {
            let x = i as f64;
            let s = &v.summary;
            [s.q1, s.median, s.q3]
                .into_iter()
                .zip(v.quartile_widths)
                .enumerate()
                .map(move |(k, (y, w))| {
                    let stroke = if k == 1 { 2 } else { 1 };
                    PathElement::new(vec![(x - half * w, y), (x + half * w, y)], BLACK.mix(0.8).stroke_width(stroke))
                })
        }))
        .map_err(plot_err)?;

    if violins.is_empty() {
        no_data_note(&root, "no base experience data")?;
    }
    root.present().map_err(plot_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Top N by total stats (horizontal bar)
// ---------------------------------------------------------------------------

/// Horizontal bars of the `n` highest stat totals, highest on top.
pub fn plot_top_total_stats<P: AsRef<Path>>(frame: &PokemonFrame, out_path: P, n: usize) -> Result<()> {
    let top: Vec<(String, f64)> = frame
        .top_by_total(n)
        .into_iter()
        .map(|r| (r.name.clone(), r.total_stats()))
        .collect();
    if top.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    render_to!(out_path, (1400, 1000), draw_top_total_stats, &top)
}

fn draw_top_total_stats<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, top: &[(String, f64)]) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;
    let n = top.len();
    // category 0 sits at the bottom, so the largest value gets the highest slot
    let labels: Vec<String> = top
        .iter()
        .rev()
        .map(|(name, _)| truncate_to_width(name, 12, 200))
        .collect();
    let x_max = top.iter().map(|(_, v)| *v).fold(1.0, f64::max) * 1.1;
    let slot = |i: usize| (n - 1 - i) as f64;

    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption("Top Pokémon by total base stats", (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, label_gutter_px(&labels, 12, 60, 220))
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(0.0..x_max, category_range(n))
        .map_err(plot_err)?;

    let y_fmt = |v: &f64| category_label(&labels, *v);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Total base stats")
        .y_desc("Pokémon")
        .x_labels(10)
        .y_labels(n)
        .x_label_formatter(&count_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(top.iter().enumerate().map(|(i, (_, v))| {
            let y = slot(i);
            let color = gradient(&ROCKET, 0.15 + 0.7 * spread(i, n));
            Rectangle::new([(0.0, y - 0.4), (*v, y + 0.4)], color.filled())
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(top.iter().enumerate().map(|(i, (_, v))| {
            Text::new(
                count_fmt(v),
                (*v + x_max * 0.005, slot(i)),
                anchored(12, HPos::Left, VPos::Center),
            )
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Stat correlation (lower-triangle heatmap)
// ---------------------------------------------------------------------------

/// Lower-triangle Pearson heatmap of the six base stats with a −1..1 colour bar.
/// Undefined coefficients (fewer than two rows, constant column) show as `n/a`.
pub fn plot_correlation_matrix<P: AsRef<Path>>(frame: &PokemonFrame, out_path: P) -> Result<()> {
    let matrix = frame.correlation_matrix();
    render_to!(out_path, (1200, 1000), draw_correlation_matrix, &matrix)
}

fn draw_correlation_matrix<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    matrix: &crate::analysis::CorrelationMatrix,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;
    let (main, bar) = root.split_horizontally((88).percent_width());
    let n = STAT_COLUMNS.len();
    let x_labels: Vec<String> = STAT_COLUMNS.iter().map(|c| stat_label(c)).collect();
    // row 0 is drawn at the top
    let y_labels: Vec<String> = x_labels.iter().rev().cloned().collect();
    let row_y = |i: usize| (n - 1 - i) as f64;

    let mut chart = ChartBuilder::on(&main)
        .margin(MARGIN)
        .caption("Correlation between base stats", (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, label_gutter_px(&y_labels, 13, 60, 200))
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(category_range(n), category_range(n))
        .map_err(plot_err)?;

    let x_fmt = |v: &f64| category_label(&x_labels, *v);
    let y_fmt = |v: &f64| category_label(&y_labels, *v);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, 13))
        .draw()
        .map_err(plot_err)?;

    let cells: Vec<(usize, usize, Option<f64>)> = (0..n)
        .flat_map(|i| (0..i).map(move |j| (i, j)))
        .map(|(i, j)| (i, j, matrix[i][j]))
        .collect();

    let cell_rect = |i: usize, j: usize| {
        let (x, y) = (j as f64, row_y(i));
        [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)]
    };
    chart
        .draw_series(cells.iter().map(|(i, j, r)| {
            let color = match r {
                Some(r) => gradient(&COOLWARM, (r + 1.0) / 2.0),
                None => RGBColor(200, 200, 200),
            };
            Rectangle::new(cell_rect(*i, *j), color.filled())
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(
            cells
                .iter()
                .map(|(i, j, _)| Rectangle::new(cell_rect(*i, *j), WHITE.stroke_width(2))),
        )
        .map_err(plot_err)?;
    chart
        .draw_series(cells.iter().map(|(i, j, r)| {
            let (text, color) = match r {
                Some(r) if r.abs() > 0.6 => (format!("{r:.2}"), &WHITE),
                Some(r) => (format!("{r:.2}"), &BLACK),
                None => ("n/a".to_string(), &BLACK),
            };
            Text::new(
                text,
                (*j as f64, row_y(*i)),
                anchored(16, HPos::Center, VPos::Center).color(color),
            )
        }))
        .map_err(plot_err)?;

    draw_colour_bar(&bar)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

fn draw_colour_bar<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> Result<()> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(80)
        .margin_bottom(80)
        .margin_left(8)
        .margin_right(16)
        .set_label_area_size(LabelAreaPosition::Right, 48)
        .build_cartesian_2d(0.0..1.0, -1.0..1.0)
        .map_err(plot_err)?;
    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(9)
        .y_label_formatter(&|v: &f64| format!("{v:.2}"))
        .label_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(plot_err)?;
    let steps = 100;
    bar.draw_series((0..steps).map(|k| {
        let lo = -1.0 + 2.0 * k as f64 / steps as f64;
        let hi = -1.0 + 2.0 * (k + 1) as f64 / steps as f64;
        let color = gradient(&COOLWARM, (lo + hi + 2.0) / 4.0);
        Rectangle::new([(0.0, lo), (1.0, hi)], color.filled())
    }))
    .map_err(plot_err)?;
    Ok(())
}
