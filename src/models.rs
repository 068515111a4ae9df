use serde::{Deserialize, Serialize};
use std::fmt;

/// Lightweight pointer returned by a list call; needs a follow-up fetch for the full document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    pub url: String,
}

/// List envelope returned by `GET {endpoint}?limit=N`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePage {
    #[serde(default)]
    pub count: u32,
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<ResourceRef>,
}

/// One CSV cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Rendered as an empty cell.
    Null,
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Null => Ok(()),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// One flattened resource: ordered `(field, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    cells: Vec<(&'static str, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; builder style so processors read top to bottom.
    pub fn with(mut self, field: &'static str, value: impl Into<Scalar>) -> Self {
        self.cells.push((field, value.into()));
        self
    }

    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.cells.iter().find(|(f, _)| *f == field).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(f, _)| *f)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Generation bin assigned from a national dex id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Generation {
    Gen1,
    Gen2,
    Gen3,
    Gen4,
    Gen5,
    Gen6,
    Gen7,
    Gen8Plus,
}

impl Generation {
    pub const ALL: [Generation; 8] = [
        Generation::Gen1,
        Generation::Gen2,
        Generation::Gen3,
        Generation::Gen4,
        Generation::Gen5,
        Generation::Gen6,
        Generation::Gen7,
        Generation::Gen8Plus,
    ];

    /// Right-closed bins `(0,151] (151,251] ... (809,∞)`; ids <= 0 have no generation.
    pub fn from_id(id: i64) -> Option<Self> {
        let g = match id {
            i64::MIN..=0 => return None,
            1..=151 => Generation::Gen1,
            152..=251 => Generation::Gen2,
            252..=386 => Generation::Gen3,
            387..=493 => Generation::Gen4,
            494..=649 => Generation::Gen5,
            650..=721 => Generation::Gen6,
            722..=809 => Generation::Gen7,
            _ => Generation::Gen8Plus,
        };
        Some(g)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Generation::Gen1 => "Gen 1",
            Generation::Gen2 => "Gen 2",
            Generation::Gen3 => "Gen 3",
            Generation::Gen4 => "Gen 4",
            Generation::Gen5 => "Gen 5",
            Generation::Gen6 => "Gen 6",
            Generation::Gen7 => "Gen 7",
            Generation::Gen8Plus => "Gen 8+",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The six base-stat columns of `pokeapi_pokemon.csv`, in file order.
pub const STAT_COLUMNS: [&str; 6] = [
    "stats_hp",
    "stats_attack",
    "stats_defense",
    "stats_special_attack",
    "stats_special_defense",
    "stats_speed",
];

/// `stats_special_attack` -> `Special Attack`.
pub fn stat_label(column: &str) -> String {
    column
        .trim_start_matches("stats_")
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Typed view of one line of `pokeapi_pokemon.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRow {
    pub id: i64,
    pub name: String,
    /// Decimetres.
    pub height: f64,
    /// Hectograms.
    pub weight: f64,
    pub base_experience: Option<f64>,
    pub types: String,
    pub abilities: String,
    pub stats_hp: f64,
    pub stats_attack: f64,
    pub stats_defense: f64,
    pub stats_special_attack: f64,
    pub stats_special_defense: f64,
    pub stats_speed: f64,
}

impl PokemonRow {
    pub fn height_m(&self) -> f64 {
        self.height / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight / 10.0
    }

    pub fn generation(&self) -> Option<Generation> {
        Generation::from_id(self.id)
    }

    /// Stats in `STAT_COLUMNS` order.
    pub fn stats(&self) -> [f64; 6] {
        [
            self.stats_hp,
            self.stats_attack,
            self.stats_defense,
            self.stats_special_attack,
            self.stats_special_defense,
            self.stats_speed,
        ]
    }

    pub fn total_stats(&self) -> f64 {
        self.stats().iter().sum()
    }

    pub fn type_list(&self) -> impl Iterator<Item = &str> {
        self.types.split(", ").map(str::trim).filter(|t| !t.is_empty())
    }
}
