//! The endpoint table: which resources are harvested, their CSV columns, and how each
//! detail document is flattened into a [`Record`].
//!
//! Flattening rules:
//! - lists of named references are joined with `", "`
//! - localized text takes the first entry whose `language.name` is `en`, else empty
//! - nullable named references become an empty cell
//! - nested maps of name lists are kept as compact JSON

use crate::error::ExtractError;
use crate::models::{Record, Scalar};
use serde_json::{Map, Value};

/// Maps a raw detail document to a flat record.
pub type Processor = fn(&Value) -> Result<Record, ExtractError>;

#[derive(Debug, Clone, Copy)]
pub struct EndpointConfig {
    pub name: &'static str,
    /// CSV header, in column order.
    pub fields: &'static [&'static str],
    pub processor: Processor,
}

impl EndpointConfig {
    pub fn process(&self, doc: &Value) -> Result<Record, ExtractError> {
        (self.processor)(doc)
    }

    /// `pokeapi_<endpoint>.csv`
    pub fn file_name(&self) -> String {
        format!("pokeapi_{}.csv", self.name)
    }
}

pub static ENDPOINTS: [EndpointConfig; 7] = [
    EndpointConfig {
        name: "pokemon",
        fields: &[
            "id",
            "name",
            "height",
            "weight",
            "base_experience",
            "types",
            "abilities",
            "stats_hp",
            "stats_attack",
            "stats_defense",
            "stats_special_attack",
            "stats_special_defense",
            "stats_speed",
        ],
        processor: process_pokemon,
    },
    EndpointConfig {
        name: "region",
        fields: &["id", "name", "locations", "main_generation", "pokedexes"],
        processor: process_region,
    },
    EndpointConfig {
        name: "ability",
        fields: &["id", "name", "generation", "effect", "short_effect", "pokemon"],
        processor: process_ability,
    },
    EndpointConfig {
        name: "type",
        fields: &[
            "id",
            "name",
            "damage_relations",
            "generation",
            "move_damage_class",
            "pokemon",
        ],
        processor: process_type,
    },
    EndpointConfig {
        name: "pokedex",
        fields: &["id", "name", "region", "description", "pokemon_entries"],
        processor: process_pokedex,
    },
    EndpointConfig {
        name: "nature",
        fields: &[
            "id",
            "name",
            "decreased_stat",
            "increased_stat",
            "hates_flavor",
            "likes_flavor",
        ],
        processor: process_nature,
    },
    EndpointConfig {
        name: "stat",
        fields: &[
            "id",
            "name",
            "is_battle_only",
            "affecting_moves",
            "affecting_natures",
            "characteristics",
        ],
        processor: process_stat,
    },
];

pub fn lookup(name: &str) -> Option<&'static EndpointConfig> {
    ENDPOINTS.iter().find(|e| e.name.eq_ignore_ascii_case(name.trim()))
}

pub fn names() -> impl Iterator<Item = &'static str> {
    ENDPOINTS.iter().map(|e| e.name)
}

// ---------------------------------------------------------------------------
// Processors
// ---------------------------------------------------------------------------

fn process_pokemon(d: &Value) -> Result<Record, ExtractError> {
    Ok(Record::new()
        .with("id", int(d, "id")?)
        .with("name", text(d, "name")?)
        .with("height", number(d, "height")?)
        .with("weight", number(d, "weight")?)
        .with("base_experience", number(d, "base_experience")?)
        .with("types", join_names(d, "types", &["type", "name"])?)
        .with("abilities", join_names(d, "abilities", &["ability", "name"])?)
        .with("stats_hp", base_stat(d, "hp")?)
        .with("stats_attack", base_stat(d, "attack")?)
        .with("stats_defense", base_stat(d, "defense")?)
        .with("stats_special_attack", base_stat(d, "special-attack")?)
        .with("stats_special_defense", base_stat(d, "special-defense")?)
        .with("stats_speed", base_stat(d, "speed")?))
}

fn process_region(d: &Value) -> Result<Record, ExtractError> {
    Ok(Record::new()
        .with("id", int(d, "id")?)
        .with("name", text(d, "name")?)
        .with("locations", join_names(d, "locations", &["name"])?)
        .with("main_generation", opt_named(d, "main_generation")?)
        .with("pokedexes", join_names(d, "pokedexes", &["name"])?))
}

fn process_ability(d: &Value) -> Result<Record, ExtractError> {
    Ok(Record::new()
        .with("id", int(d, "id")?)
        .with("name", text(d, "name")?)
        .with("generation", named(d, "generation")?)
        .with("effect", en_text(d, "effect_entries", "effect")?)
        .with("short_effect", en_text(d, "effect_entries", "short_effect")?)
        .with("pokemon", join_names(d, "pokemon", &["pokemon", "name"])?))
}

fn process_type(d: &Value) -> Result<Record, ExtractError> {
    Ok(Record::new()
        .with("id", int(d, "id")?)
        .with("name", text(d, "name")?)
        .with("damage_relations", name_lists(d, "damage_relations")?)
        .with("generation", named(d, "generation")?)
        .with("move_damage_class", opt_named(d, "move_damage_class")?)
        .with("pokemon", join_names(d, "pokemon", &["pokemon", "name"])?))
}

fn process_pokedex(d: &Value) -> Result<Record, ExtractError> {
    let species = array(d, "pokemon_entries")?
        .iter()
        .map(|e| path_str(e, "pokemon_entries", &["pokemon_species", "name"]).map(Value::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Record::new()
        .with("id", int(d, "id")?)
        .with("name", text(d, "name")?)
        .with("region", opt_named(d, "region")?)
        .with("description", en_text(d, "descriptions", "description")?)
        .with("pokemon_entries", Value::Array(species).to_string()))
}

fn process_nature(d: &Value) -> Result<Record, ExtractError> {
    Ok(Record::new()
        .with("id", int(d, "id")?)
        .with("name", text(d, "name")?)
        .with("decreased_stat", opt_named(d, "decreased_stat")?)
        .with("increased_stat", opt_named(d, "increased_stat")?)
        .with("hates_flavor", opt_named(d, "hates_flavor")?)
        .with("likes_flavor", opt_named(d, "likes_flavor")?))
}

fn process_stat(d: &Value) -> Result<Record, ExtractError> {
    let characteristics = array(d, "characteristics")?
        .iter()
        .map(|c| ref_label(c).ok_or_else(|| ExtractError::MissingKey("characteristics.url".into())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Record::new()
        .with("id", int(d, "id")?)
        .with("name", text(d, "name")?)
        .with("is_battle_only", boolean(d, "is_battle_only")?)
        .with("affecting_moves", name_lists(d, "affecting_moves")?)
        .with("affecting_natures", name_lists(d, "affecting_natures")?)
        .with("characteristics", characteristics.join(", ")))
}

// ---------------------------------------------------------------------------
// Extraction helpers
// ---------------------------------------------------------------------------

fn get<'a>(d: &'a Value, key: &str) -> Result<&'a Value, ExtractError> {
    d.get(key).ok_or_else(|| ExtractError::MissingKey(key.to_string()))
}

fn wrong(key: &str, expected: &'static str) -> ExtractError {
    ExtractError::WrongType { key: key.to_string(), expected }
}

fn int(d: &Value, key: &str) -> Result<i64, ExtractError> {
    get(d, key)?.as_i64().ok_or_else(|| wrong(key, "an integer"))
}

fn text(d: &Value, key: &str) -> Result<String, ExtractError> {
    get(d, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong(key, "a string"))
}

fn boolean(d: &Value, key: &str) -> Result<bool, ExtractError> {
    get(d, key)?.as_bool().ok_or_else(|| wrong(key, "a boolean"))
}

/// Integer, float or null (empty cell).
fn number(d: &Value, key: &str) -> Result<Scalar, ExtractError> {
    let v = get(d, key)?;
    if v.is_null() {
        Ok(Scalar::Null)
    } else if let Some(i) = v.as_i64() {
        Ok(Scalar::Int(i))
    } else if let Some(f) = v.as_f64() {
        Ok(Scalar::Float(f))
    } else {
        Err(wrong(key, "a number"))
    }
}

fn array<'a>(d: &'a Value, key: &str) -> Result<&'a Vec<Value>, ExtractError> {
    get(d, key)?.as_array().ok_or_else(|| wrong(key, "an array"))
}

/// Follow `path` from `v` down to a string.
fn path_str<'a>(v: &'a Value, key: &str, path: &[&str]) -> Result<&'a str, ExtractError> {
    let mut cur = v;
    for p in path {
        cur = cur
            .get(*p)
            .ok_or_else(|| ExtractError::MissingKey(format!("{}.{}", key, path.join("."))))?;
    }
    cur.as_str().ok_or_else(|| wrong(key, "a string"))
}

/// Required `{ "name": ... }` reference.
fn named(d: &Value, key: &str) -> Result<String, ExtractError> {
    path_str(get(d, key)?, key, &["name"]).map(str::to_string)
}

/// Nullable `{ "name": ... }` reference. The key itself must be present.
fn opt_named(d: &Value, key: &str) -> Result<Option<String>, ExtractError> {
    match get(d, key)? {
        Value::Null => Ok(None),
        v => path_str(v, key, &["name"]).map(|s| Some(s.to_string())),
    }
}

fn join_names(d: &Value, key: &str, path: &[&str]) -> Result<String, ExtractError> {
    let names = array(d, key)?
        .iter()
        .map(|item| path_str(item, key, path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.join(", "))
}

fn en_text(d: &Value, list_key: &str, text_key: &str) -> Result<String, ExtractError> {
    let found = array(d, list_key)?
        .iter()
        .find(|e| e.pointer("/language/name").and_then(Value::as_str) == Some("en"))
        .and_then(|e| e.get(text_key))
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok(found.to_string())
}

/// `base_stat` of the `stats[]` entry whose `stat.name` equals `stat`.
fn base_stat(d: &Value, stat: &str) -> Result<i64, ExtractError> {
    array(d, "stats")?
        .iter()
        .find(|s| s.pointer("/stat/name").and_then(Value::as_str) == Some(stat))
        .and_then(|s| s.get("base_stat"))
        .and_then(Value::as_i64)
        .ok_or_else(|| ExtractError::MissingStat(stat.to_string()))
}

/// Display name of a list item: its own `name`, a nested `move.name`, or the trailing id
/// of its `url` (characteristics only carry a url).
fn ref_label(item: &Value) -> Option<String> {
    if let Some(name) = item.get("name").and_then(Value::as_str) {
        return Some(name.to_string());
    }
    if let Some(name) = item.pointer("/move/name").and_then(Value::as_str) {
        return Some(name.to_string());
    }
    item.get("url")
        .and_then(Value::as_str)
        .and_then(|u| u.trim_end_matches('/').rsplit('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// `{relation: [ref, ...]}` -> compact JSON `{"relation":["name", ...]}`.
fn name_lists(d: &Value, key: &str) -> Result<String, ExtractError> {
    let obj = get(d, key)?.as_object().ok_or_else(|| wrong(key, "an object"))?;
    let mut out = Map::new();
    for (k, v) in obj {
        let items = v.as_array().ok_or_else(|| wrong(key, "a map of arrays"))?;
        let names = items
            .iter()
            .map(|i| {
                ref_label(i)
                    .map(Value::from)
                    .ok_or_else(|| ExtractError::MissingKey(format!("{key}.{k}.name")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        out.insert(k.clone(), Value::Array(names));
    }
    Ok(Value::Object(out).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stats_block(values: [i64; 6]) -> Value {
        let names = [
            "hp",
            "attack",
            "defense",
            "special-attack",
            "special-defense",
            "speed",
        ];
        Value::Array(
            names
                .iter()
                .zip(values)
                .map(|(n, v)| json!({"base_stat": v, "effort": 0, "stat": {"name": n, "url": ""}}))
                .collect(),
        )
    }

    #[test]
    fn endpoint_table_is_complete() {
        for cfg in ENDPOINTS.iter() {
            assert!(!cfg.fields.is_empty(), "{} has no fields", cfg.name);
            assert_eq!(cfg.fields[0], "id");
            assert_eq!(cfg.fields[1], "name");
        }
        assert_eq!(names().count(), 7);
        assert!(lookup("Pokemon").is_some());
        assert!(lookup("berry").is_none());
    }

    #[test]
    fn pokemon_is_flattened_in_header_order() {
        let doc = json!({
            "id": 1,
            "name": "bulbasaur",
            "height": 7,
            "weight": 69,
            "base_experience": 64,
            "types": [
                {"slot": 1, "type": {"name": "grass"}},
                {"slot": 2, "type": {"name": "poison"}}
            ],
            "abilities": [
                {"ability": {"name": "overgrow"}, "is_hidden": false},
                {"ability": {"name": "chlorophyll"}, "is_hidden": true}
            ],
            // stats deliberately out of order: lookup is by name
            "stats": [
                {"base_stat": 45, "stat": {"name": "speed"}},
                {"base_stat": 45, "stat": {"name": "hp"}},
                {"base_stat": 49, "stat": {"name": "attack"}},
                {"base_stat": 49, "stat": {"name": "defense"}},
                {"base_stat": 65, "stat": {"name": "special-attack"}},
                {"base_stat": 65, "stat": {"name": "special-defense"}}
            ]
        });
        let cfg = lookup("pokemon").unwrap();
        let rec = cfg.process(&doc).unwrap();
        assert_eq!(rec.fields().collect::<Vec<_>>(), cfg.fields);
        assert_eq!(rec.get("types").unwrap().to_string(), "grass, poison");
        assert_eq!(rec.get("abilities").unwrap().to_string(), "overgrow, chlorophyll");
        assert_eq!(rec.get("stats_hp"), Some(&Scalar::Int(45)));
        assert_eq!(rec.get("stats_special_attack"), Some(&Scalar::Int(65)));
    }

    #[test]
    fn missing_stat_fails_the_record() {
        let mut stats = stats_block([1, 2, 3, 4, 5, 6]);
        stats.as_array_mut().unwrap().pop();
        let doc = json!({
            "id": 2, "name": "x", "height": 1, "weight": 1, "base_experience": null,
            "types": [], "abilities": [], "stats": stats
        });
        let err = lookup("pokemon").unwrap().process(&doc).unwrap_err();
        assert_eq!(err, ExtractError::MissingStat("speed".into()));
    }

    #[test]
    fn null_base_experience_is_empty_cell() {
        let doc = json!({
            "id": 10_001, "name": "deoxys-attack", "height": 17, "weight": 608,
            "base_experience": null, "types": [], "abilities": [],
            "stats": stats_block([50, 180, 20, 180, 20, 150])
        });
        let rec = lookup("pokemon").unwrap().process(&doc).unwrap();
        assert_eq!(rec.get("base_experience"), Some(&Scalar::Null));
    }

    #[test]
    fn ability_uses_english_effect() {
        let doc = json!({
            "id": 65,
            "name": "overgrow",
            "generation": {"name": "generation-iii"},
            "effect_entries": [
                {"effect": "Erhöht", "short_effect": "kurz", "language": {"name": "de"}},
                {"effect": "Strengthens grass moves.", "short_effect": "Grass boost.", "language": {"name": "en"}}
            ],
            "pokemon": [{"pokemon": {"name": "bulbasaur"}}, {"pokemon": {"name": "ivysaur"}}]
        });
        let rec = lookup("ability").unwrap().process(&doc).unwrap();
        assert_eq!(rec.get("effect").unwrap().to_string(), "Strengthens grass moves.");
        assert_eq!(rec.get("short_effect").unwrap().to_string(), "Grass boost.");
        assert_eq!(rec.get("pokemon").unwrap().to_string(), "bulbasaur, ivysaur");
    }

    #[test]
    fn ability_without_english_effect_is_empty() {
        let doc = json!({
            "id": 300, "name": "x", "generation": {"name": "generation-ix"},
            "effect_entries": [], "pokemon": []
        });
        let rec = lookup("ability").unwrap().process(&doc).unwrap();
        assert_eq!(rec.get("effect").unwrap().to_string(), "");
    }

    #[test]
    fn type_damage_relations_are_stringified() {
        let doc = json!({
            "id": 10,
            "name": "fire",
            "damage_relations": {
                "double_damage_from": [{"name": "water"}, {"name": "rock"}],
                "no_damage_to": []
            },
            "generation": {"name": "generation-i"},
            "move_damage_class": null,
            "pokemon": []
        });
        let rec = lookup("type").unwrap().process(&doc).unwrap();
        assert_eq!(
            rec.get("damage_relations").unwrap().to_string(),
            r#"{"double_damage_from":["water","rock"],"no_damage_to":[]}"#
        );
        assert_eq!(rec.get("move_damage_class"), Some(&Scalar::Null));
    }

    #[test]
    fn stat_reads_moves_natures_and_characteristics() {
        let doc = json!({
            "id": 2,
            "name": "attack",
            "is_battle_only": false,
            "affecting_moves": {
                "increase": [{"change": 2, "move": {"name": "swords-dance"}}],
                "decrease": []
            },
            "affecting_natures": {
                "increase": [{"name": "lonely"}],
                "decrease": [{"name": "bold"}]
            },
            "characteristics": [
                {"url": "https://pokeapi.co/api/v2/characteristic/2/"},
                {"url": "https://pokeapi.co/api/v2/characteristic/8/"}
            ]
        });
        let rec = lookup("stat").unwrap().process(&doc).unwrap();
        assert_eq!(rec.get("is_battle_only"), Some(&Scalar::Bool(false)));
        assert_eq!(
            rec.get("affecting_moves").unwrap().to_string(),
            r#"{"decrease":[],"increase":["swords-dance"]}"#
        );
        assert_eq!(rec.get("characteristics").unwrap().to_string(), "2, 8");
    }

    #[test]
    fn pokedex_entries_are_a_json_list() {
        let doc = json!({
            "id": 2,
            "name": "kanto",
            "region": {"name": "kanto"},
            "descriptions": [{"description": "Kanto dex", "language": {"name": "en"}}],
            "pokemon_entries": [
                {"entry_number": 1, "pokemon_species": {"name": "bulbasaur"}},
                {"entry_number": 2, "pokemon_species": {"name": "ivysaur"}}
            ]
        });
        let rec = lookup("pokedex").unwrap().process(&doc).unwrap();
        assert_eq!(
            rec.get("pokemon_entries").unwrap().to_string(),
            r#"["bulbasaur","ivysaur"]"#
        );
    }

    #[test]
    fn nature_nullable_refs() {
        let doc = json!({
            "id": 1, "name": "hardy",
            "decreased_stat": null, "increased_stat": null,
            "hates_flavor": null, "likes_flavor": {"name": "spicy"}
        });
        let rec = lookup("nature").unwrap().process(&doc).unwrap();
        assert_eq!(rec.len(), 6);
        assert_eq!(rec.get("increased_stat"), Some(&Scalar::Null));
        assert_eq!(rec.get("likes_flavor").unwrap().to_string(), "spicy");
    }

    #[test]
    fn region_missing_key_is_reported() {
        let doc = json!({"id": 1, "name": "kanto", "locations": [], "main_generation": null});
        let err = lookup("region").unwrap().process(&doc).unwrap_err();
        assert_eq!(err, ExtractError::MissingKey("pokedexes".into()));
    }

    #[test]
    fn absent_nullable_ref_is_not_null() {
        let doc = json!({
            "id": 1, "name": "hardy",
            "decreased_stat": null, "increased_stat": null, "hates_flavor": null
        });
        let err = lookup("nature").unwrap().process(&doc).unwrap_err();
        assert_eq!(err, ExtractError::MissingKey("likes_flavor".into()));

        let doc = json!({"id": 1, "name": "kanto", "locations": [], "pokedexes": []});
        let err = lookup("region").unwrap().process(&doc).unwrap_err();
        assert_eq!(err, ExtractError::MissingKey("main_generation".into()));
    }
}
