//! Sprite and artwork URLs derived from Pokémon ids (no network access).

use anyhow::{Context, Result, anyhow};
use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use std::path::Path;

const SPRITES_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// Default output file name.
pub const IMAGES_FILE: &str = "pokemon_images.csv";

pub const IMAGE_FIELDS: [&str; 6] = [
    "id",
    "name",
    "image_url",
    "official_artwork",
    "sprite_default",
    "sprite_shiny",
];

/// One line of `pokemon_images.csv`; field order matches [`IMAGE_FIELDS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRow {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub official_artwork: String,
    pub sprite_default: String,
    pub sprite_shiny: String,
}

impl ImageRow {
    pub fn for_pokemon(id: &str, name: &str) -> Self {
        let artwork = official_artwork_url(id);
        Self {
            id: id.to_string(),
            name: name.to_string(),
            image_url: artwork.clone(),
            official_artwork: artwork,
            sprite_default: format!("{SPRITES_BASE}/{id}.png"),
            sprite_shiny: format!("{SPRITES_BASE}/shiny/{id}.png"),
        }
    }
}

pub fn official_artwork_url(id: &str) -> String {
    format!("{SPRITES_BASE}/other/official-artwork/{id}.png")
}

/// Read a Pokémon CSV (needs `id` and `name` columns) and write the image companion CSV.
///
/// Returns the number of rows written.
pub fn create_images_csv<P: AsRef<Path>, Q: AsRef<Path>>(pokemon_csv: P, output_csv: Q) -> Result<usize> {
    let (input, output) = (pokemon_csv.as_ref(), output_csv.as_ref());
    let mut rdr = csv::Reader::from_path(input).with_context(|| format!("open {}", input.display()))?;
    let headers = rdr.headers()?.clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("{} has no `{}` column", input.display(), name))
    };
    let (id_col, name_col) = (col("id")?, col("name")?);

    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_path(output)
        .with_context(|| format!("create {}", output.display()))?;
    // header goes out even when the input has no rows
    wtr.write_record(IMAGE_FIELDS)?;
    let mut n = 0usize;
    for row in rdr.records() {
        let row = row?;
        let id = row.get(id_col).unwrap_or_default();
        let name = row.get(name_col).unwrap_or_default();
        wtr.serialize(ImageRow::for_pokemon(id, name))?;
        n += 1;
    }
    wtr.flush()?;
    info!("{} written with {} Pokémon", output.display(), n);
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_templated_from_id() {
        let row = ImageRow::for_pokemon("25", "pikachu");
        assert_eq!(
            row.sprite_default,
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png"
        );
        assert_eq!(
            row.sprite_shiny,
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/shiny/25.png"
        );
        assert_eq!(row.image_url, row.official_artwork);
        assert!(row.official_artwork.ends_with("/other/official-artwork/25.png"));
        assert_eq!(row, ImageRow::for_pokemon("25", "pikachu"));
    }
}
