//! The Pokémon table as the charts see it: typed rows plus derived columns and aggregates.

use crate::models::{Generation, PokemonRow, STAT_COLUMNS};
use crate::stats;
use ahash::AHashMap;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Rows of `pokeapi_pokemon.csv`, in file order.
#[derive(Debug, Clone, Default)]
pub struct PokemonFrame {
    pub rows: Vec<PokemonRow>,
}

/// Pearson matrix over [`STAT_COLUMNS`]; `None` where undefined (constant column).
pub type CorrelationMatrix = [[Option<f64>; 6]; 6];

impl PokemonFrame {
    pub fn new(rows: Vec<PokemonRow>) -> Self {
        Self { rows }
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = csv::Reader::from_path(path).with_context(|| format!("open {}", path.display()))?;
        let rows = rdr
            .deserialize()
            .collect::<Result<Vec<PokemonRow>, _>>()
            .with_context(|| format!("parse {}", path.display()))?;
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one stat column (index into [`STAT_COLUMNS`]).
    pub fn stat_column(&self, idx: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r.stats()[idx]).collect()
    }

    /// How many Pokémon carry each type; count descending, then name.
    pub fn type_counts(&self) -> Vec<(String, usize)> {
        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for t in self.rows.iter().flat_map(|r| r.type_list()) {
            *counts.entry(t).or_default() += 1;
        }
        let mut out: Vec<(String, usize)> = counts.into_iter().map(|(t, n)| (t.to_string(), n)).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    /// The `n` rows with the highest `total_stats`; earlier rows win ties.
    pub fn top_by_total(&self, n: usize) -> Vec<&PokemonRow> {
        self.nlargest(n, PokemonRow::total_stats)
    }

    /// The `n` heaviest rows; earlier rows win ties.
    pub fn heaviest(&self, n: usize) -> Vec<&PokemonRow> {
        self.nlargest(n, PokemonRow::weight_kg)
    }

    fn nlargest(&self, n: usize, key: impl Fn(&PokemonRow) -> f64) -> Vec<&PokemonRow> {
        let mut rows: Vec<&PokemonRow> = self.rows.iter().collect();
        // stable sort keeps file order among equal keys
        rows.sort_by(|a, b| key(b).total_cmp(&key(a)));
        rows.truncate(n);
        rows
    }

    pub fn correlation_matrix(&self) -> CorrelationMatrix {
        let cols: Vec<Vec<f64>> = (0..STAT_COLUMNS.len()).map(|i| self.stat_column(i)).collect();
        let mut m = [[None; 6]; 6];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = stats::pearson(&cols[i], &cols[j]);
            }
        }
        m
    }

    /// Rows grouped by generation bin; ids without a bin are left out.
    pub fn by_generation(&self) -> BTreeMap<Generation, Vec<&PokemonRow>> {
        let mut groups: BTreeMap<Generation, Vec<&PokemonRow>> = BTreeMap::new();
        for r in &self.rows {
            if let Some(g) = r.generation() {
                groups.entry(g).or_default().push(r);
            }
        }
        groups
    }

    /// Mean of each stat per generation present in the data.
    pub fn mean_stats_by_generation(&self) -> BTreeMap<Generation, [f64; 6]> {
        self.by_generation()
            .into_iter()
            .map(|(g, rows)| {
                let mut means = [0.0; 6];
                for (i, m) in means.iter_mut().enumerate() {
                    let col: Vec<f64> = rows.iter().map(|r| r.stats()[i]).collect();
                    *m = stats::mean(&col).unwrap_or(f64::NAN);
                }
                (g, means)
            })
            .collect()
    }

    /// Non-empty base experience values per generation.
    pub fn base_experience_by_generation(&self) -> BTreeMap<Generation, Vec<f64>> {
        self.by_generation()
            .into_iter()
            .map(|(g, rows)| (g, rows.iter().filter_map(|r| r.base_experience).collect::<Vec<_>>()))
            .filter(|(_, v)| !v.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: &str, types: &str, weight: f64, stats: [f64; 6]) -> PokemonRow {
        PokemonRow {
            id,
            name: name.into(),
            height: 10.0,
            weight,
            base_experience: Some(100.0 + id as f64),
            types: types.into(),
            abilities: String::new(),
            stats_hp: stats[0],
            stats_attack: stats[1],
            stats_defense: stats[2],
            stats_special_attack: stats[3],
            stats_special_defense: stats[4],
            stats_speed: stats[5],
        }
    }

    fn frame() -> PokemonFrame {
        PokemonFrame::new(vec![
            row(1, "bulbasaur", "grass, poison", 69.0, [45.0, 49.0, 49.0, 65.0, 65.0, 45.0]),
            row(4, "charmander", "fire", 85.0, [39.0, 52.0, 43.0, 60.0, 50.0, 65.0]),
            row(152, "chikorita", "grass", 64.0, [45.0, 49.0, 65.0, 49.0, 65.0, 45.0]),
            row(10_001, "deoxys-attack", "psychic", 608.0, [50.0, 180.0, 20.0, 180.0, 20.0, 150.0]),
        ])
    }

    #[test]
    fn type_counts_split_and_sort() {
        let counts = frame().type_counts();
        assert_eq!(counts[0], ("grass".to_string(), 2));
        assert_eq!(counts.len(), 4);
        // ties ordered by name
        assert_eq!(counts[1].0, "fire");
    }

    #[test]
    fn top_and_heaviest() {
        let f = frame();
        let top = f.top_by_total(2);
        assert_eq!(top[0].name, "deoxys-attack");
        assert_eq!(top[0].total_stats(), 600.0);
        // bulbasaur and chikorita tie on 318; file order wins
        assert_eq!(top[1].name, "bulbasaur");
        assert_eq!(f.heaviest(1)[0].weight_kg(), 60.8);
    }

    #[test]
    fn correlation_diagonal_is_one() {
        let m = frame().correlation_matrix();
        for (i, row) in m.iter().enumerate() {
            assert!((row[i].unwrap() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn means_group_by_generation() {
        let means = frame().mean_stats_by_generation();
        assert_eq!(means.len(), 3);
        let gen1 = means[&Generation::Gen1];
        assert_eq!(gen1[0], 42.0);
        assert!(!means.contains_key(&Generation::Gen3));
        let exp = frame().base_experience_by_generation();
        assert_eq!(exp[&Generation::Gen8Plus], vec![10_101.0]);
    }
}
