/*!
 * Glossary of the domain terms found in a document.
 *
 * Lines are formatted `english: arabic (definition)` and sorted by the English
 * term; they become the trailing glossary unit of the output plan.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::terminology::{TableSelector, TerminologyStore, normalize_term};

/// Glossary settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryConfig {
    /// Whether a glossary unit is produced at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum number of occurrences for a term to be listed
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,

    /// Maximum number of glossary lines
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_true() -> bool {
    true
}

fn default_min_occurrences() -> usize {
    1
}

fn default_max_entries() -> usize {
    100
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            min_occurrences: default_min_occurrences(),
            max_entries: default_max_entries(),
        }
    }
}

/// Collects domain terms seen in the raw page texts.
#[derive(Debug, Clone, Default)]
pub struct GlossaryBuilder {
    config: GlossaryConfig,
}

impl GlossaryBuilder {
    pub fn new(config: GlossaryConfig) -> Self {
        Self { config }
    }

    /// Build the glossary lines; empty when disabled or nothing qualifies.
    pub fn build<S: AsRef<str>>(&self, store: &TerminologyStore, page_texts: &[S]) -> Vec<String> {
        if !self.config.enabled {
            return Vec::new();
        }

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for text in page_texts {
            for token in text.as_ref().split_whitespace() {
                let key = normalize_term(token);
                if store.entry(&key, TableSelector::Domain).is_some() {
                    *counts.entry(key).or_default() += 1;
                }
            }
        }

        counts
            .into_iter()
            .filter(|(_, count)| *count >= self.config.min_occurrences.max(1))
            .filter_map(|(key, _)| store.entry(&key, TableSelector::Domain))
            .take(self.config.max_entries)
            .map(|entry| match &entry.definition {
                Some(definition) => format!("{}: {} ({})", entry.source_term, entry.target_term, definition),
                None => format!("{}: {}", entry.source_term, entry.target_term),
            })
            .collect()
    }
}
