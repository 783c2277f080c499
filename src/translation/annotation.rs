/*!
 * Annotation layer.
 *
 * Splits page text into sentences and words, looks every word up in the
 * terminology store and appends the match as an inline marker:
 * `fever` becomes `fever [MED:حمى]`, `week` becomes `week [NORM:أسبوع]`.
 * The original word is kept so later construct rules can still see it.
 */

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::errors::PageError;
use crate::terminology::{TableSelector, TerminologyStore};
use crate::translation::pipeline::PageStage;

/// Terminal punctuation run ending a sentence. A `.` inside a number
/// (e.g. `38.5`) is not followed by whitespace and does not split.
static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("Invalid sentence boundary regex"));

/// Marker attached to a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// No terminology match
    None,
    /// Match from the domain table
    DomainMatch(String),
    /// Match from the general table
    GeneralMatch(String),
}

impl Marker {
    /// Marker tag as written inline.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Marker::None => None,
            Marker::DomainMatch(_) => Some("MED"),
            Marker::GeneralMatch(_) => Some("NORM"),
        }
    }
}

/// One word with at most one attached marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedToken {
    /// The token as it appeared in the text
    pub token: String,
    /// Terminology match, if any
    pub marker: Marker,
}

impl AnnotatedToken {
    /// Render as inline text; the marker goes right after the word core,
    /// before any trailing punctuation.
    pub fn render(&self) -> String {
        let (prefix, core, suffix) = split_affixes(&self.token);
        match &self.marker {
            Marker::None => self.token.clone(),
            Marker::DomainMatch(value) | Marker::GeneralMatch(value) => format!(
                "{}{} [{}:{}]{}",
                prefix,
                core,
                self.marker.tag().unwrap_or_default(),
                value,
                suffix
            ),
        }
    }
}

/// Split a token into leading punctuation, word core and trailing punctuation.
pub fn split_affixes(token: &str) -> (&str, &str, &str) {
    let start = token
        .char_indices()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, _)| i);

    let Some(start) = start else {
        return (token, "", "");
    };

    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(token.len());

    (&token[..start], &token[start..end], &token[end..])
}

/// Split text into trimmed, non-empty sentences on terminal punctuation.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Attaches terminology markers to page text.
#[derive(Debug, Clone)]
pub struct Annotator {
    store: Arc<TerminologyStore>,
}

impl Annotator {
    /// Create an annotator over the given store.
    pub fn new(store: Arc<TerminologyStore>) -> Self {
        Self { store }
    }

    /// Annotate a single token. Domain matches always win over general ones.
    pub fn annotate_token(&self, token: &str) -> AnnotatedToken {
        let marker = match self.store.lookup_prioritized(token) {
            Some(found) if found.table == TableSelector::Domain => {
                Marker::DomainMatch(found.target().to_string())
            }
            Some(found) => Marker::GeneralMatch(found.target().to_string()),
            None => Marker::None,
        };

        AnnotatedToken {
            token: token.to_string(),
            marker,
        }
    }

    /// Annotate every whitespace-delimited token of a sentence.
    pub fn annotate_sentence(&self, sentence: &str) -> Vec<AnnotatedToken> {
        sentence
            .split_whitespace()
            .map(|token| self.annotate_token(token))
            .collect()
    }

    /// Annotate a whole page. Sentences are rejoined with `". "`, and a final
    /// `.` is kept when the page ended with terminal punctuation.
    pub fn annotate(&self, text: &str) -> String {
        let sentences: Vec<String> = split_sentences(text)
            .into_iter()
            .map(|sentence| {
                self.annotate_sentence(sentence)
                    .iter()
                    .map(AnnotatedToken::render)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();

        let mut out = sentences.join(". ");
        if !out.is_empty() && text.trim_end().ends_with(['.', '!', '?']) {
            out.push('.');
        }
        trace!("Annotated {} sentences", sentences.len());
        out
    }
}

impl PageStage for Annotator {
    fn name(&self) -> &str {
        "annotate"
    }

    fn process(&self, text: &str) -> Result<String, PageError> {
        Ok(self.annotate(text))
    }
}
