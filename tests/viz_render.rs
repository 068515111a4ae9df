use pokeapi_csv::analysis::PokemonFrame;
use pokeapi_csv::viz::{self, charts, interactive};
use std::fs;
use std::path::PathBuf;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/pokemon_small.csv");

fn assert_non_empty(path: &PathBuf) {
    let meta = fs::metadata(path).unwrap_or_else(|_| panic!("{} created", path.display()));
    assert!(meta.len() > 0, "{} has content", path.display());
}

#[test]
fn render_all_writes_every_chart() {
    let tmp = tempfile::tempdir().unwrap();
    let written = viz::render_all(FIXTURE, tmp.path()).unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "pokemon_types_distribution.png",
            "height_weight_relation.png",
            "stats_distribution.png",
            "base_experience_by_generation.png",
            "top_20_pokemon_stats.png",
            "stats_correlation_matrix.png",
            "pokemon_interactive_plot.html",
        ]
    );
    for p in &written {
        assert_non_empty(p);
    }
}

#[test]
fn static_charts_render_as_svg() {
    let frame = PokemonFrame::from_csv(FIXTURE).unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let path = |name: &str| tmp.path().join(name);

    charts::plot_type_distribution(&frame, path("types.svg")).unwrap();
    charts::plot_height_weight(&frame, path("hw.svg")).unwrap();
    charts::plot_stats_distribution(&frame, path("box.svg")).unwrap();
    charts::plot_base_experience_by_generation(&frame, path("violin.svg")).unwrap();
    charts::plot_top_total_stats(&frame, path("top.svg"), 5).unwrap();
    charts::plot_correlation_matrix(&frame, path("corr.svg")).unwrap();

    for name in ["types.svg", "hw.svg", "box.svg", "violin.svg", "top.svg", "corr.svg"] {
        let p = path(name);
        assert_non_empty(&p);
        assert!(fs::read_to_string(&p).unwrap().contains("<svg"));
    }
    // type names end up as axis labels
    assert!(fs::read_to_string(path("types.svg")).unwrap().contains("psychic"));
}

#[test]
fn interactive_page_carries_hover_tips() {
    let frame = PokemonFrame::from_csv(FIXTURE).unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join(viz::INTERACTIVE_HTML);
    interactive::write_interactive_html(&frame, &out).unwrap();

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<svg"));
    assert!(html.contains(r#"<g class="hotspots">"#));
    // 14 pokemon, 12 types, 7 generations x 6 stats
    assert_eq!(html.matches("data-tip=").count(), 14 + 12 + 7 * 6);
    assert!(html.contains("Types: fire, flying"));
    assert!(html.contains("Share: "));
    assert!(html.contains("Mean: "));
}

#[test]
fn empty_table_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let csv = tmp.path().join("pokeapi_pokemon.csv");
    fs::write(&csv, "id,name,height,weight,base_experience,types,abilities,stats_hp,stats_attack,stats_defense,stats_special_attack,stats_special_defense,stats_speed\n").unwrap();
    assert!(viz::render_all(&csv, tmp.path()).is_err());
    assert!(!tmp.path().join(viz::TYPES_PNG).exists());
}

const HEADER: &str = "id,name,height,weight,base_experience,types,abilities,stats_hp,stats_attack,stats_defense,stats_special_attack,stats_special_defense,stats_speed\n";

fn render_table(rows: &str) -> (tempfile::TempDir, Vec<PathBuf>) {
    let tmp = tempfile::tempdir().unwrap();
    let csv = tmp.path().join("pokeapi_pokemon.csv");
    fs::write(&csv, format!("{HEADER}{rows}")).unwrap();
    let written = viz::render_all(&csv, tmp.path()).unwrap();
    (tmp, written)
}

#[test]
fn single_row_still_renders_every_chart() {
    let (tmp, written) = render_table("25,pikachu,4,60,112,electric,static,35,55,40,50,50,90\n");
    assert_eq!(written.len(), 7);
    for p in &written {
        assert_non_empty(p);
    }
    assert!(tmp.path().join(viz::INTERACTIVE_HTML).exists());
}

#[test]
fn missing_base_experience_still_renders_every_chart() {
    let (tmp, written) = render_table(
        "10001,deoxys-attack,17,608,,psychic,pressure,50,180,20,180,20,150\n\
         10002,deoxys-defense,17,608,,psychic,pressure,50,70,160,70,160,90\n",
    );
    assert_eq!(written.len(), 7);
    assert_non_empty(&tmp.path().join(viz::BASE_EXP_PNG));
    let html = fs::read_to_string(tmp.path().join(viz::INTERACTIVE_HTML)).unwrap();
    assert!(html.contains("Base experience: n/a"));
}

#[test]
fn degenerate_correlations_render_as_na_cells() {
    let frame = PokemonFrame::from_csv(FIXTURE).unwrap();
    let one = PokemonFrame::new(frame.rows.into_iter().take(1).collect());
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("corr.svg");
    charts::plot_correlation_matrix(&one, &out).unwrap();
    assert!(fs::read_to_string(&out).unwrap().contains("n/a"));
}
