/*!
 * Two-table terminology store.
 *
 * The domain table (clinical vocabulary) is always consulted before the
 * general table. Keys are normalized to lowercase alphabetic characters and
 * matched exactly; there is no fuzzy matching.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::TerminologyError;

use super::seed;

/// Normalize a term for lookup: keep alphabetic characters only, lowercased.
pub fn normalize_term(term: &str) -> String {
    term.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One terminology entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    /// Normalized source term (lowercase, alphabetic only)
    pub source_term: String,

    /// Target language equivalent
    pub target_term: String,

    /// Optional category (symptom, medication, ...)
    #[serde(default)]
    pub category: Option<String>,

    /// Optional definition used for glossary output
    #[serde(default)]
    pub definition: Option<String>,
}

impl TermEntry {
    /// Create an entry, normalizing the source term.
    pub fn new(source_term: &str, target_term: &str) -> Self {
        Self {
            source_term: normalize_term(source_term),
            target_term: target_term.trim().to_string(),
            category: None,
            definition: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self
    }

    /// Set the definition.
    pub fn with_definition(mut self, definition: Option<&str>) -> Self {
        self.definition = definition
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }
}

/// Which table a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableSelector {
    /// Clinical vocabulary, consulted first
    Domain,
    /// General vocabulary
    General,
}

/// Result of a prioritized lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermMatch<'a> {
    /// Table the entry came from
    pub table: TableSelector,
    /// The matching entry
    pub entry: &'a TermEntry,
}

impl TermMatch<'_> {
    /// Target language text of the match.
    pub fn target(&self) -> &str {
        &self.entry.target_term
    }
}

/// A single lookup table keyed by normalized source term.
#[derive(Debug, Clone, Default)]
pub struct TermTable {
    entries: HashMap<String, TermEntry>,
}

impl TermTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from entries. Later entries overwrite earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = TermEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Insert an entry, returning the one it replaced.
    ///
    /// Entries whose key normalizes to nothing are ignored.
    pub fn insert(&mut self, entry: TermEntry) -> Option<TermEntry> {
        if entry.source_term.is_empty() || entry.target_term.is_empty() {
            return None;
        }
        self.entries.insert(entry.source_term.clone(), entry)
    }

    /// Look up an already-normalized key.
    pub fn get(&self, normalized: &str) -> Option<&TermEntry> {
        self.entries.get(normalized)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &TermEntry> {
        self.entries.values()
    }
}

/// Health of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStatus {
    /// Whether any table is running on seed data after a load failure
    pub degraded: bool,
    /// Load failures that caused degradation
    pub reasons: Vec<TerminologyError>,
    /// Number of domain entries
    pub domain_terms: usize,
    /// Number of general entries
    pub general_terms: usize,
}

/// Terminology store holding the domain and general tables.
///
/// Tables are shared behind `Arc` and never mutated while shared; `add`
/// copies on write, so pipelines holding an older version keep seeing it.
#[derive(Debug, Clone)]
pub struct TerminologyStore {
    domain: Arc<TermTable>,
    general: Arc<TermTable>,
    degraded_reasons: Vec<TerminologyError>,
}

impl TerminologyStore {
    /// Create a store from two loaded tables.
    pub fn new(domain: TermTable, general: TermTable) -> Self {
        Self {
            domain: Arc::new(domain),
            general: Arc::new(general),
            degraded_reasons: Vec::new(),
        }
    }

    /// Create a store from the built-in seed data.
    pub fn seeded() -> Self {
        Self::new(seed::domain_seed(), seed::general_seed())
    }

    /// Create a store from load results, falling back to seed data per table.
    pub fn from_load_results(
        domain: Result<TermTable, TerminologyError>,
        general: Result<TermTable, TerminologyError>,
    ) -> Self {
        let mut reasons = Vec::new();

        let domain = domain.unwrap_or_else(|e| {
            warn!("Domain terminology unavailable, using seed set: {}", e);
            reasons.push(e);
            seed::domain_seed()
        });
        let general = general.unwrap_or_else(|e| {
            warn!("General terminology unavailable, using seed set: {}", e);
            reasons.push(e);
            seed::general_seed()
        });

        Self {
            domain: Arc::new(domain),
            general: Arc::new(general),
            degraded_reasons: reasons,
        }
    }

    /// Look up a term in one table.
    pub fn lookup(&self, term: &str, selector: TableSelector) -> Option<&str> {
        let key = normalize_term(term);
        if key.is_empty() {
            return None;
        }
        self.table(selector)
            .get(&key)
            .map(|e| e.target_term.as_str())
    }

    /// Look up a term, domain table first, then the general table.
    pub fn lookup_prioritized(&self, term: &str) -> Option<TermMatch<'_>> {
        let key = normalize_term(term);
        if key.is_empty() {
            return None;
        }
        if let Some(entry) = self.domain.get(&key) {
            return Some(TermMatch {
                table: TableSelector::Domain,
                entry,
            });
        }
        self.general.get(&key).map(|entry| TermMatch {
            table: TableSelector::General,
            entry,
        })
    }

    /// Full entry for a term in one table.
    pub fn entry(&self, term: &str, selector: TableSelector) -> Option<&TermEntry> {
        self.table(selector).get(&normalize_term(term))
    }

    /// Add or overwrite a term (last write wins).
    pub fn add(
        &mut self,
        selector: TableSelector,
        term: &str,
        translation: &str,
        category: Option<&str>,
        definition: Option<&str>,
    ) {
        let entry = TermEntry::new(term, translation)
            .with_category(category)
            .with_definition(definition);
        debug!("Adding {:?} term '{}' -> '{}'", selector, entry.source_term, entry.target_term);
        let table = match selector {
            TableSelector::Domain => Arc::make_mut(&mut self.domain),
            TableSelector::General => Arc::make_mut(&mut self.general),
        };
        table.insert(entry);
    }

    /// Return a new store version with the term added.
    pub fn with_entry(
        mut self,
        selector: TableSelector,
        term: &str,
        translation: &str,
        category: Option<&str>,
        definition: Option<&str>,
    ) -> Self {
        self.add(selector, term, translation, category, definition);
        self
    }

    /// Borrow one table.
    pub fn table(&self, selector: TableSelector) -> &TermTable {
        match selector {
            TableSelector::Domain => &self.domain,
            TableSelector::General => &self.general,
        }
    }

    /// Whether the store is running on seed data after a load failure.
    pub fn is_degraded(&self) -> bool {
        !self.degraded_reasons.is_empty()
    }

    /// Current status.
    pub fn status(&self) -> StoreStatus {
        StoreStatus {
            degraded: self.is_degraded(),
            reasons: self.degraded_reasons.clone(),
            domain_terms: self.domain.len(),
            general_terms: self.general.len(),
        }
    }
}

impl Default for TerminologyStore {
    fn default() -> Self {
        Self::seeded()
    }
}
