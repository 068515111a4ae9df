//! Visualization: render the Pokémon table to **PNG** (or **SVG**) charts and one
//! interactive HTML overview.
//!
//! - Six fixed static charts (types, height vs weight, stat boxes, base experience
//!   violins, top 20 totals, stat correlations)
//! - Output format follows the file extension: `.svg` uses the SVG backend, anything
//!   else the bitmap backend
//! - The interactive overview is a self-contained HTML page (inline SVG plus hover tips)

pub mod charts;
pub mod interactive;
pub mod text;
pub mod util;

use crate::analysis::PokemonFrame;
use anyhow::{Result, anyhow};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Once;

pub const TYPES_PNG: &str = "pokemon_types_distribution.png";
pub const HEIGHT_WEIGHT_PNG: &str = "height_weight_relation.png";
pub const STATS_BOX_PNG: &str = "stats_distribution.png";
pub const BASE_EXP_PNG: &str = "base_experience_by_generation.png";
pub const TOP20_PNG: &str = "top_20_pokemon_stats.png";
pub const CORRELATION_PNG: &str = "stats_correlation_matrix.png";
pub const INTERACTIVE_HTML: &str = "pokemon_interactive_plot.html";

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

pub(crate) fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Open a drawing area for `$path` (SVG by extension, bitmap otherwise) and hand it to
/// `$draw` followed by `$args`.
macro_rules! render_to {
    ($path:expr, $size:expr, $draw:path $(, $arg:expr)*) => {{
        $crate::viz::ensure_fonts_registered();
        let out_owned = $path;
        let out_path: &::std::path::Path = out_owned.as_ref();
        let path_string = out_path.to_string_lossy().into_owned();
        if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
            let root = ::plotters_svg::SVGBackend::new(path_string.as_str(), $size).into_drawing_area();
            $draw(root $(, $arg)*)
        } else {
            let root = ::plotters_bitmap::BitMapBackend::new(path_string.as_str(), $size).into_drawing_area();
            $draw(root $(, $arg)*)
        }
    }};
}
pub(crate) use render_to;

/// Load `pokemon_csv` and write every chart into `out_dir` under its fixed file name.
///
/// Returns the written paths in rendering order. Charts with too little data (a single row,
/// no base experience values) are still written, empty or with `n/a` cells; only an empty
/// table or a write failure is an error.
pub fn render_all<P: AsRef<Path>, Q: AsRef<Path>>(pokemon_csv: P, out_dir: Q) -> Result<Vec<PathBuf>> {
    let frame = PokemonFrame::from_csv(pokemon_csv.as_ref())?;
    if frame.is_empty() {
        return Err(anyhow!("no data to plot in {}", pokemon_csv.as_ref().display()));
    }
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;
    let path = |name: &str| out_dir.join(name);

    let mut written = Vec::new();
    charts::plot_type_distribution(&frame, path(TYPES_PNG))?;
    written.push(path(TYPES_PNG));
    charts::plot_height_weight(&frame, path(HEIGHT_WEIGHT_PNG))?;
    written.push(path(HEIGHT_WEIGHT_PNG));
    charts::plot_stats_distribution(&frame, path(STATS_BOX_PNG))?;
    written.push(path(STATS_BOX_PNG));
    charts::plot_base_experience_by_generation(&frame, path(BASE_EXP_PNG))?;
    written.push(path(BASE_EXP_PNG));
    charts::plot_top_total_stats(&frame, path(TOP20_PNG), 20)?;
    written.push(path(TOP20_PNG));
    charts::plot_correlation_matrix(&frame, path(CORRELATION_PNG))?;
    written.push(path(CORRELATION_PNG));
    interactive::write_interactive_html(&frame, path(INTERACTIVE_HTML))?;
    written.push(path(INTERACTIVE_HTML));

    for p in &written {
        info!("wrote {}", p.display());
    }
    Ok(written)
}
