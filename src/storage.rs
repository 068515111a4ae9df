use crate::error::StorageError;
use crate::models::Record;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::path::Path;

/// Save records as CSV with `fields` as header and column order. Overwrites `path`.
///
/// A header field missing from a record becomes an empty cell; a record field that is not
/// in the header is an error.
pub fn save_records<P: AsRef<Path>>(fields: &[&str], records: &[Record], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.write_record(fields)?;
    for rec in records {
        if let Some(extra) = rec.fields().find(|f| !fields.contains(f)) {
            return Err(StorageError::UnknownField(extra.to_string()).into());
        }
        let row: Vec<String> = fields
            .iter()
            .map(|f| rec.get(f).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}
