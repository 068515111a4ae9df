use anyhow::Result;
use log::{Level, LevelFilter, Log, Metadata, Record};
use pokeapi_csv::models::ResourceRef;
use pokeapi_csv::{JsonSource, endpoints, pipeline};
use serde_json::{Value, json};
use std::sync::Mutex;
use std::time::Duration;

/// Keeps every record at `info` and above, the CLI's default filter.
struct Capture(Mutex<Vec<(Level, String)>>);

impl Log for Capture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.0.lock().unwrap().push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: Capture = Capture(Mutex::new(Vec::new()));

/// Serves the same nature document for every url.
struct OneNature;

impl JsonSource for OneNature {
    fn get_json(&self, _url: &str) -> Result<Value> {
        Ok(json!({
            "id": 1, "name": "hardy",
            "decreased_stat": null, "increased_stat": null,
            "hates_flavor": null, "likes_flavor": null,
        }))
    }
}

#[test]
fn progress_is_visible_at_the_default_level() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Info);

    let refs: Vec<ResourceRef> = (1..=120)
        .map(|i| ResourceRef {
            name: format!("n{i}"),
            url: format!("http://mock.test/nature/{i}/"),
        })
        .collect();
    let config = endpoints::lookup("nature").unwrap();
    let harvest = pipeline::fetch_records(&OneNature, config, &refs, Duration::ZERO);
    assert_eq!(harvest.records.len(), 120);

    let logged = LOGGER.0.lock().unwrap();
    let progress: Vec<&str> = logged
        .iter()
        .filter(|(level, msg)| *level == Level::Info && msg.contains("fetched"))
        .map(|(_, msg)| msg.as_str())
        .collect();
    assert_eq!(progress, ["nature: 50/120 fetched", "nature: 100/120 fetched"]);
}
