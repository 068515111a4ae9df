//! Harvest loop: list an endpoint, fetch and flatten every resource, write the CSV.
//!
//! Everything runs sequentially with a fixed courtesy delay before each request.
//! A resource that fails to fetch or flatten is logged and skipped; it is never retried.

use crate::api::{self, DEFAULT_BASE_URL, JsonSource};
use crate::endpoints::EndpointConfig;
use crate::models::{Record, ResourceRef};
use crate::storage;
use anyhow::Result;
use log::{info, warn};
use num_format::{Locale, ToFormattedString};
use std::path::PathBuf;
use std::time::Duration;

/// Progress is logged every this many resources.
const PROGRESS_EVERY: usize = 50;

/// Runtime knobs for a harvest run. `Default` mirrors the public API etiquette:
/// 1000 refs per index page, 100 ms between requests, output in the working directory.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub base_url: String,
    pub page_size: u32,
    pub delay: Duration,
    pub out_dir: PathBuf,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            page_size: 1000,
            delay: Duration::from_millis(100),
            out_dir: PathBuf::from("."),
        }
    }
}

/// Records that made it through, plus the refs that did not.
#[derive(Debug, Default)]
pub struct Harvest {
    pub records: Vec<Record>,
    pub failed: Vec<ResourceRef>,
}

/// Outcome of one endpoint run.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointReport {
    pub endpoint: &'static str,
    pub listed: usize,
    pub written: usize,
    pub failed: usize,
    /// `None` when nothing was written.
    pub path: Option<PathBuf>,
}

/// Fetch each ref's detail document and flatten it with `config`.
pub fn fetch_records<S: JsonSource + ?Sized>(
    source: &S,
    config: &EndpointConfig,
    refs: &[ResourceRef],
    delay: Duration,
) -> Harvest {
    let mut out = Harvest::default();
    for (i, r) in refs.iter().enumerate() {
        std::thread::sleep(delay);
        let processed = source
            .get_json(&r.url)
            .and_then(|doc| config.process(&doc).map_err(anyhow::Error::from));
        match processed {
            Ok(rec) => out.records.push(rec),
            Err(e) => {
                warn!("error processing {}: {:#}", r.url, e);
                out.failed.push(r.clone());
            }
        }
        if (i + 1) % PROGRESS_EVERY == 0 {
            info!("{}: {}/{} fetched", config.name, i + 1, refs.len());
        }
    }
    out
}

/// Run Lister -> Processor -> Writer for one endpoint.
///
/// Only a file write failure is an error; listing and per-resource failures shrink the output.
pub fn generate_csv_for_endpoint<S: JsonSource + ?Sized>(
    source: &S,
    config: &EndpointConfig,
    opts: &FetchOptions,
) -> Result<EndpointReport> {
    info!("processing {}...", config.name);
    let first = api::index_url(&opts.base_url, config.name, opts.page_size);
    let refs = api::list_resources(source, &first, opts.delay);
    info!("{}: {} resources listed", config.name, refs.len());

    let harvest = fetch_records(source, config, &refs, opts.delay);
    let mut report = EndpointReport {
        endpoint: config.name,
        listed: refs.len(),
        written: harvest.records.len(),
        failed: harvest.failed.len(),
        path: None,
    };

    if harvest.records.is_empty() {
        warn!("no valid data found for {}", config.name);
        return Ok(report);
    }

    let path = opts.out_dir.join(config.file_name());
    storage::save_records(config.fields, &harvest.records, &path)?;
    info!(
        "{} created with {} records ({} skipped)",
        path.display(),
        report.written.to_formatted_string(&Locale::en),
        report.failed
    );
    report.path = Some(path);
    Ok(report)
}

/// Run every endpoint in `configs`, in order. Stops at the first file write failure.
pub fn run_all<'a, S, I>(source: &S, configs: I, opts: &FetchOptions) -> Result<Vec<EndpointReport>>
where
    S: JsonSource + ?Sized,
    I: IntoIterator<Item = &'a EndpointConfig>,
{
    let mut reports = Vec::new();
    for config in configs {
        reports.push(generate_csv_for_endpoint(source, config, opts)?);
    }
    let failed: usize = reports.iter().map(|r| r.failed).sum();
    info!(
        "all endpoints done: {} files, {} resources skipped",
        reports.iter().filter(|r| r.path.is_some()).count(),
        failed
    );
    Ok(reports)
}
