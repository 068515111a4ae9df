//! Self-contained interactive overview: one inline SVG (scatter, donut, grouped bars)
//! with an invisible hotspot layer that drives hover tooltips.

use super::charts::anchored;
use super::text::html_escape;
use super::util::{category_label, category_range, office_color, plot_err};
use crate::analysis::PokemonFrame;
use crate::models::{Generation, STAT_COLUMNS, stat_label};
use anyhow::{Context, Result, anyhow};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, VPos};
use plotters_svg::SVGBackend;
use std::f64::consts::PI;
use std::path::Path;

const SIZE: (u32, u32) = (1400, 900);
const DONUT_HOLE: f64 = 0.4;

/// Hover target in absolute SVG pixels.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Circle { cx: i32, cy: i32, r: i32 },
    Rect { x: i32, y: i32, w: i32, h: i32 },
    Polygon(Vec<(i32, i32)>),
}

#[derive(Debug, Clone)]
struct Hotspot {
    shape: Shape,
    tip: String,
}

/// Render the overview page for `frame` to `out_path`.
pub fn write_interactive_html<P: AsRef<Path>>(frame: &PokemonFrame, out_path: P) -> Result<()> {
    if frame.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    super::ensure_fonts_registered();
    let mut svg = String::new();
    let mut spots = Vec::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        let body = root
            .titled("Pokémon overview", (FontFamily::SansSerif, 26))
            .map_err(plot_err)?;
        let (left, right) = body.split_horizontally(SIZE.0 / 2);
        let right_h = right.dim_in_pixel().1;
        let (top_right, bottom_right) = right.split_vertically(right_h / 2);

        draw_scatter(&left, frame, &mut spots)?;
        draw_donut(&top_right, frame, &mut spots)?;
        draw_mean_bars(&bottom_right, frame, &mut spots)?;
        root.present().map_err(plot_err)?;
    }
    debug!("interactive chart: {} hotspots", spots.len());

    let page = build_page(&inject_hotspots(&svg, &spots));
    std::fs::write(out_path.as_ref(), page).with_context(|| format!("write {}", out_path.as_ref().display()))?;
    Ok(())
}

fn tip_lines(lines: &[String]) -> String {
    lines.join("\n")
}

fn draw_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &PokemonFrame,
    spots: &mut Vec<Hotspot>,
) -> Result<()> {
    let x_max = frame.rows.iter().map(|r| r.height_m()).fold(0.1, f64::max) * 1.05;
    let y_max = frame.rows.iter().map(|r| r.weight_kg()).fold(0.1, f64::max) * 1.05;
    let totals: Vec<f64> = frame.rows.iter().map(|r| r.total_stats()).collect();
    let t_min = totals.iter().copied().fold(f64::INFINITY, f64::min);
    let t_max = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let radius = |t: f64| {
        let f = if t_max > t_min { (t - t_min) / (t_max - t_min) } else { 0.5 };
        (3.0 + 9.0 * f).round() as i32
    };

    let mut chart = ChartBuilder::on(area)
        .margin(16)
        .caption("Weight vs height", (FontFamily::SansSerif, 18))
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("Height (m)")
        .y_desc("Weight (kg)")
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(plot_err)?;

    let groups = frame.by_generation();
    for (g, rows) in &groups {
        let color = office_color(generation_index(*g)).mix(0.6);
        chart
            .draw_series(
                rows.iter()
                    .map(|r| Circle::new((r.height_m(), r.weight_kg()), radius(r.total_stats()), color.filled())),
            )
            .map_err(plot_err)?
            .label(g.label())
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));

        for r in rows {
            let (cx, cy) = chart.backend_coord(&(r.height_m(), r.weight_kg()));
            let exp = r.base_experience.map(|e| format!("{e:.0}")).unwrap_or_else(|| "n/a".into());
            spots.push(Hotspot {
                shape: Shape::Circle { cx, cy, r: radius(r.total_stats()).max(4) },
                tip: tip_lines(&[
                    r.name.clone(),
                    format!("Height: {:.1} m", r.height_m()),
                    format!("Weight: {:.1} kg", r.weight_kg()),
                    format!("Base experience: {exp}"),
                    format!("Generation: {g}"),
                    format!("Total stats: {:.0}", r.total_stats()),
                    format!("Types: {}", r.types),
                ]),
            });
        }
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .label_font((FontFamily::SansSerif, 13))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(plot_err)?;
    Ok(())
}

fn generation_index(g: Generation) -> usize {
    Generation::ALL.iter().position(|x| *x == g).unwrap_or(0)
}

/// Ring segment from `a0` to `a1` (radians, clockwise from 12 o'clock) around `c`.
fn wedge(c: (f64, f64), outer: f64, inner: f64, a0: f64, a1: f64) -> Vec<(i32, i32)> {
    let steps = (((a1 - a0) / (PI / 90.0)).ceil() as usize).max(1);
    let at = |r: f64, a: f64| ((c.0 + r * a.sin()).round() as i32, (c.1 - r * a.cos()).round() as i32);
    let mut pts: Vec<(i32, i32)> = (0..=steps)
        .map(|k| at(outer, a0 + (a1 - a0) * k as f64 / steps as f64))
        .collect();
    pts.extend((0..=steps).rev().map(|k| at(inner, a0 + (a1 - a0) * k as f64 / steps as f64)));
    pts
}

fn draw_donut<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &PokemonFrame,
    spots: &mut Vec<Hotspot>,
) -> Result<()> {
    let area = area
        .titled("Type distribution", (FontFamily::SansSerif, 18))
        .map_err(plot_err)?;
    let counts = frame.type_counts();
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return Ok(());
    }
    let (w, h) = area.dim_in_pixel();
    let (ox, oy) = {
        let (xr, yr) = area.get_pixel_range();
        (xr.start, yr.start)
    };
    let outer = (w as f64 * 0.28).min(h as f64 * 0.45);
    let center = (w as f64 * 0.32, h as f64 / 2.0);

    let mut angle = 0.0;
    for (i, (name, count)) in counts.iter().enumerate() {
        let share = *count as f64 / total as f64;
        let sweep = share * 2.0 * PI;
        let pts = wedge(center, outer, outer * DONUT_HOLE, angle, angle + sweep);
        angle += sweep;
        let color = Palette99::pick(i);
        area.draw(&Polygon::new(pts.clone(), color.filled())).map_err(plot_err)?;
        let mut closed = pts.clone();
        closed.push(pts[0]);
        area.draw(&PathElement::new(closed, WHITE.stroke_width(1)))
            .map_err(plot_err)?;

        spots.push(Hotspot {
            shape: Shape::Polygon(pts.iter().map(|(x, y)| (x + ox, y + oy)).collect()),
            tip: tip_lines(&[
                name.clone(),
                format!("Count: {count}"),
                format!("Share: {:.1}%", share * 100.0),
            ]),
        });
    }

    // legend column right of the ring
    let line_h = ((h as i32 - 20) / counts.len().max(1) as i32).clamp(10, 18);
    let lx = (center.0 + outer + 30.0) as i32;
    let ly0 = (h as i32 - line_h * counts.len() as i32) / 2;
    for (i, (name, count)) in counts.iter().enumerate() {
        let y = ly0 + i as i32 * line_h;
        area.draw(&Rectangle::new(
            [(lx, y + 2), (lx + 10, y + line_h - 4)],
            Palette99::pick(i).filled(),
        ))
        .map_err(plot_err)?;
        area.draw(&Text::new(
            format!("{name} {count} ({:.1}%)", *count as f64 * 100.0 / total as f64),
            (lx + 16, y + line_h / 2 - 1),
            anchored((line_h - 5).max(9), HPos::Left, VPos::Center),
        ))
        .map_err(plot_err)?;
    }
    Ok(())
}

fn draw_mean_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &PokemonFrame,
    spots: &mut Vec<Hotspot>,
) -> Result<()> {
    let means = frame.mean_stats_by_generation();
    if means.is_empty() {
        return Ok(());
    }
    let labels: Vec<String> = STAT_COLUMNS.iter().map(|c| stat_label(c)).collect();
    let y_max = means
        .values()
        .flat_map(|m| m.iter().copied())
        .filter(|v| v.is_finite())
        .fold(1.0, f64::max)
        * 1.1;
    let groups = means.len();
    let bar_w = 0.8 / groups as f64;

    let mut chart = ChartBuilder::on(area)
        .margin(16)
        .caption("Mean base stats by generation", (FontFamily::SansSerif, 18))
        .set_label_area_size(LabelAreaPosition::Left, 56)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(category_range(labels.len()), 0.0..y_max)
        .map_err(plot_err)?;
    let x_fmt = |v: &f64| category_label(&labels, *v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&x_fmt)
        .y_desc("Mean")
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(plot_err)?;

    for (k, (g, m)) in means.iter().enumerate() {
        let color = office_color(generation_index(*g));
        // (stat index, left, right, mean)
        let bars: Vec<(usize, f64, f64, f64)> = m
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(s, v)| {
                let x0 = s as f64 - 0.4 + k as f64 * bar_w;
                (s, x0, x0 + bar_w, *v)
            })
            .collect();
        chart
            .draw_series(
                bars.iter()
                    .map(|(_, x0, x1, v)| Rectangle::new([(*x0, 0.0), (*x1, *v)], color.filled())),
            )
            .map_err(plot_err)?;

        for &(s, x0, x1, v) in &bars {
            let (ax, ay) = chart.backend_coord(&(x0, v));
            let (bx, by) = chart.backend_coord(&(x1, 0.0));
            spots.push(Hotspot {
                shape: Shape::Rect {
                    x: ax.min(bx),
                    y: ay.min(by),
                    w: (bx - ax).abs().max(1),
                    h: (by - ay).abs().max(1),
                },
                tip: tip_lines(&[
                    format!("{g}"),
                    labels[s].clone(),
                    format!("Mean: {v:.1}"),
                ]),
            });
        }
    }
    Ok(())
}

/// Append a hotspot layer just before the closing `</svg>`.
fn inject_hotspots(svg: &str, spots: &[Hotspot]) -> String {
    let mut layer = String::from("<g class=\"hotspots\">\n");
    for spot in spots {
        let tip = html_escape(&spot.tip).replace('\n', "&#10;");
        let element = match &spot.shape {
            Shape::Circle { cx, cy, r } => {
                format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}" data-tip="{tip}"/>"#)
            }
            Shape::Rect { x, y, w, h } => {
                format!(r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" data-tip="{tip}"/>"#)
            }
            Shape::Polygon(pts) => {
                let points = pts
                    .iter()
                    .map(|(x, y)| format!("{x},{y}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!(r#"<polygon points="{points}" data-tip="{tip}"/>"#)
            }
        };
        layer.push_str(&element);
        layer.push('\n');
    }
    layer.push_str("</g>\n");

    match svg.rfind("</svg>") {
        Some(end) => {
            let mut out = String::with_capacity(svg.len() + layer.len());
            out.push_str(&svg[..end]);
            out.push_str(&layer);
            out.push_str(&svg[end..]);
            out
        }
        None => format!("{svg}{layer}"),
    }
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; background: #fafafa; }
.chart { width: fit-content; margin: 16px auto; background: #fff; box-shadow: 0 1px 4px rgba(0,0,0,.15); }
.hotspots > * { fill: rgba(0,0,0,0); stroke: none; cursor: pointer; }
.hotspots > *:hover { fill: rgba(0,0,0,.12); stroke: #333; stroke-width: 1; }
#tip { position: absolute; display: none; pointer-events: none; white-space: pre;
       background: rgba(255,255,255,.95); border: 1px solid #888; border-radius: 4px;
       padding: 6px 8px; font-size: 13px; line-height: 1.35; }
"#;

const SCRIPT: &str = r#"
const tip = document.getElementById('tip');
document.querySelectorAll('.hotspots [data-tip]').forEach(el => {
  el.addEventListener('mousemove', e => {
    tip.textContent = el.dataset.tip;
    tip.style.display = 'block';
    tip.style.left = (e.pageX + 14) + 'px';
    tip.style.top = (e.pageY + 14) + 'px';
  });
  el.addEventListener('mouseleave', () => { tip.style.display = 'none'; });
});
"#;

fn build_page(svg: &str) -> String {
    let mut page = String::with_capacity(svg.len() + STYLE.len() + SCRIPT.len() + 256);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>Pokémon overview</title>\n<style>");
    page.push_str(STYLE);
    page.push_str("</style>\n</head>\n<body>\n<div class=\"chart\">\n");
    page.push_str(svg);
    page.push_str("\n</div>\n<div id=\"tip\"></div>\n<script>");
    page.push_str(SCRIPT);
    page.push_str("</script>\n</body>\n</html>\n");
    page
}
