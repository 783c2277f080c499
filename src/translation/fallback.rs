/*!
 * Word-for-word dictionary translation used when a page's cascade fails.
 */

use std::sync::Arc;

use crate::terminology::TerminologyStore;
use crate::translation::annotation::split_affixes;

/// Dictionary-only translator. Never fails.
#[derive(Debug, Clone)]
pub struct FallbackTranslator {
    store: Arc<TerminologyStore>,
}

impl FallbackTranslator {
    pub fn new(store: Arc<TerminologyStore>) -> Self {
        Self { store }
    }

    /// Replace every known word by its prioritized translation, keeping
    /// surrounding punctuation and line structure.
    pub fn translate(&self, raw: &str) -> String {
        raw.lines()
            .map(|line| {
                line.split_whitespace()
                    .map(|token| self.translate_token(token))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn translate_token(&self, token: &str) -> String {
        let (prefix, core, suffix) = split_affixes(token);
        match self.store.lookup_prioritized(core) {
            Some(found) => format!("{}{}{}", prefix, found.target(), suffix),
            None => token.to_string(),
        }
    }
}
