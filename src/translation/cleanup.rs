/*!
 * Annotation marker cleanup.
 *
 * Collapses every `word [MED:value]` / `word [NORM:value]` into `value`.
 * Collapsing one marker can expose another that was nested in its value, so
 * cleanup repeats until no marker is left, up to a fixed number of passes.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::RuleError;

/// A word followed by its marker.
static WORD_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\w[\w'-]*\s*\[(?:MED|NORM):([^\]]*)\]").expect("Invalid word marker regex")
});

/// A marker with no word in front of it.
static BARE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?:MED|NORM):([^\]]*)\]").expect("Invalid bare marker regex"));

/// Fixed-point marker remover.
#[derive(Debug, Clone, Copy)]
pub struct MarkerCleanup {
    max_passes: usize,
}

impl Default for MarkerCleanup {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PASSES)
    }
}

impl MarkerCleanup {
    pub const DEFAULT_MAX_PASSES: usize = 8;

    /// Create a cleanup bounded to `max_passes` passes (at least one).
    pub fn new(max_passes: usize) -> Self {
        Self {
            max_passes: max_passes.max(1),
        }
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Whether the text still carries any annotation marker.
    pub fn has_markers(text: &str) -> bool {
        BARE_MARKER.is_match(text)
    }

    /// Remove every marker, failing with `CleanupDidNotConverge` when markers
    /// remain after the pass bound.
    pub fn clean(&self, text: &str) -> Result<String, RuleError> {
        let mut current = text.to_string();

        for pass in 0..self.max_passes {
            if !Self::has_markers(&current) {
                debug!("Marker cleanup converged after {} passes", pass);
                return Ok(current);
            }
            current = Self::collapse_once(&current);
        }

        if Self::has_markers(&current) {
            return Err(RuleError::CleanupDidNotConverge {
                passes: self.max_passes,
            });
        }
        Ok(current)
    }

    /// One pass: word-attached markers first, bare markers only when no
    /// word-attached marker was left to collapse.
    fn collapse_once(text: &str) -> String {
        let collapsed = WORD_MARKER.replace_all(text, "${1}");
        if collapsed != text {
            return collapsed.into_owned();
        }
        BARE_MARKER.replace_all(text, "${1}").into_owned()
    }
}
