//! pokeapi_csv
//!
//! A small Rust library for pulling resources out of the [PokeAPI](https://pokeapi.co),
//! flattening them into CSV files, and charting the Pokémon table. Pairs with the
//! `pokecsv` CLI.
//!
//! ### Features
//! - Walk the paginated index of any supported endpoint and fetch every resource
//! - Flatten nested documents into fixed-column records (one CSV per endpoint)
//! - Derive sprite/artwork URLs for every Pokémon id
//! - Render descriptive PNG/SVG charts and one interactive HTML overview
//!
//! ### Example
//! ```no_run
//! use pokeapi_csv::{Client, FetchOptions, endpoints, pipeline};
//!
//! let client = Client::default();
//! let opts = FetchOptions::default();
//! let config = endpoints::lookup("pokemon").expect("known endpoint");
//! let report = pipeline::generate_csv_for_endpoint(&client, config, &opts)?;
//! println!("{} rows written", report.written);
//!
//! pokeapi_csv::images::create_images_csv("pokeapi_pokemon.csv", "pokemon_images.csv")?;
//! pokeapi_csv::viz::render_all("pokeapi_pokemon.csv", ".")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analysis;
pub mod api;
pub mod endpoints;
pub mod error;
pub mod images;
pub mod models;
pub mod pipeline;
pub mod stats;
pub mod storage;
pub mod viz;

pub use api::{Client, JsonSource};
pub use endpoints::EndpointConfig;
pub use models::{Generation, Record, ResourceRef, Scalar};
pub use pipeline::FetchOptions;
