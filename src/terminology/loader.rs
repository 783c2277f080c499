/*!
 * Loading terminology tables from JSON record files.
 *
 * A record file is a JSON array of `{english, arabic, category?, definition?}`
 * objects. Any failure is reported as a `TerminologyError`; the caller decides
 * whether to degrade (see `TerminologyStore::from_load_results`).
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::TerminologyError;

use super::store::{TermEntry, TermTable, TerminologyStore};

/// One record of a terminology data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRecord {
    /// Source (English) term
    pub english: String,

    /// Target (Arabic) term
    pub arabic: String,

    /// Optional category
    #[serde(default)]
    pub category: Option<String>,

    /// Optional definition
    #[serde(default)]
    pub definition: Option<String>,
}

impl From<TermRecord> for TermEntry {
    fn from(record: TermRecord) -> Self {
        TermEntry::new(&record.english, &record.arabic)
            .with_category(record.category.as_deref())
            .with_definition(record.definition.as_deref())
    }
}

/// Parse a record list into a table.
///
/// Records with an empty source or target are skipped; a list with no usable
/// record is an error.
pub fn parse_records(json: &str, origin: &str) -> Result<TermTable, TerminologyError> {
    let records: Vec<TermRecord> =
        serde_json::from_str(json).map_err(|e| TerminologyError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

    let total = records.len();
    let table = TermTable::from_entries(records.into_iter().map(TermEntry::from));
    if table.is_empty() {
        return Err(TerminologyError::Empty(origin.to_string()));
    }

    debug!("Parsed {} of {} records from {}", table.len(), total, origin);
    Ok(table)
}

/// Load a table from a record file.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<TermTable, TerminologyError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let json = std::fs::read_to_string(path).map_err(|e| TerminologyError::Io {
        path: origin.clone(),
        message: e.to_string(),
    })?;
    parse_records(&json, &origin)
}

/// Load a table from a record file without blocking the runtime.
pub async fn load_table_async<P: AsRef<Path>>(path: P) -> Result<TermTable, TerminologyError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| TerminologyError::Io {
            path: origin.clone(),
            message: e.to_string(),
        })?;
    parse_records(&json, &origin)
}

/// Build a store from optional record files.
///
/// A table with no configured file uses its seed set without being marked
/// degraded; a configured file that fails to load degrades that table.
pub async fn load_store(
    domain_path: Option<&Path>,
    general_path: Option<&Path>,
) -> TerminologyStore {
    let domain = match domain_path {
        Some(path) => load_table_async(path).await,
        None => Ok(super::seed::domain_seed()),
    };
    let general = match general_path {
        Some(path) => load_table_async(path).await,
        None => Ok(super::seed::general_seed()),
    };

    let store = TerminologyStore::from_load_results(domain, general);
    let status = store.status();
    info!(
        "Terminology loaded: {} domain terms, {} general terms{}",
        status.domain_terms,
        status.general_terms,
        if status.degraded { " (degraded)" } else { "" }
    );
    store
}
