//! Live API tests. Run with: `cargo test --features online -- --nocapture`
#![cfg(feature = "online")]

use pokeapi_csv::api::{self, MAX_PAGES};
use pokeapi_csv::{Client, JsonSource, endpoints};
use std::time::Duration;

#[test]
fn endpoint_directory_lists_the_harvested_endpoints() {
    let cli = Client::default();
    let dir = cli.list_endpoints().unwrap();
    for name in endpoints::names() {
        assert!(dir.contains_key(name), "{name} missing from the endpoint directory");
    }
}

#[test]
fn stat_index_is_small_and_complete() {
    let cli = Client::default();
    let first = api::index_url(&cli.base_url, "stat", 3);
    let refs = api::list_resources(&cli, &first, Duration::from_millis(50));
    assert!(refs.len() >= 6 && refs.len() < MAX_PAGES * 3);
    assert!(refs.iter().any(|r| r.name == "special-attack"));
}

#[test]
fn pikachu_flattens() {
    let cli = Client::default();
    let doc = cli.get_json(&format!("{}/pokemon/25", cli.base_url)).unwrap();
    let rec = endpoints::lookup("pokemon").unwrap().process(&doc).unwrap();
    assert_eq!(rec.get("name").map(|v| v.to_string()).as_deref(), Some("pikachu"));
    assert_eq!(rec.get("types").map(|v| v.to_string()).as_deref(), Some("electric"));
}
