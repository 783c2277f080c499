/*!
 * Output document plan.
 *
 * The plan interleaves every original page with its translation:
 * `Original(0), Translated(0), Original(1), Translated(1), ...` followed by an
 * optional glossary unit. A page without a translation result still gets a
 * translated unit carrying an explicit placeholder, so no page is ever dropped.
 */

use anyhow::{Result, anyhow};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::translation::PageTranslationResult;

/// Text of a translated unit whose page has no result.
pub const MISSING_TRANSLATION_PLACEHOLDER: &str =
    "[Translation unavailable for this page / الترجمة غير متوفرة لهذه الصفحة]";

/// First line of the glossary unit.
pub const GLOSSARY_HEADING: &str = "Glossary / مسرد المصطلحات";

/// Kind of a page unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Original,
    Translated,
    Glossary,
}

/// What a unit renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UnitContent {
    /// Reference to an original page, rendered by the page renderer
    PageImage { page_index: usize },
    /// Text block
    Text { text: String },
}

impl UnitContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            UnitContent::Text { text } => Some(text),
            UnitContent::PageImage { .. } => None,
        }
    }
}

/// One element of the output plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageUnit {
    /// Unit kind
    pub kind: UnitKind,

    /// Original page this unit derives from (none for the glossary)
    pub source_page_index: Option<usize>,

    /// Unit content
    pub content: UnitContent,

    /// Whether the text is a fallback translation or a placeholder
    #[serde(default)]
    pub degraded: bool,
}

impl PageUnit {
    fn original(page_index: usize) -> Self {
        Self {
            kind: UnitKind::Original,
            source_page_index: Some(page_index),
            content: UnitContent::PageImage { page_index },
            degraded: false,
        }
    }

    fn translated(page_index: usize, text: &str, degraded: bool) -> Self {
        Self {
            kind: UnitKind::Translated,
            source_page_index: Some(page_index),
            content: UnitContent::Text { text: text.to_string() },
            degraded,
        }
    }

    fn glossary(lines: &[String]) -> Self {
        let mut text = String::from(GLOSSARY_HEADING);
        for line in lines {
            text.push('\n');
            text.push_str(line);
        }
        Self {
            kind: UnitKind::Glossary,
            source_page_index: None,
            content: UnitContent::Text { text },
            degraded: false,
        }
    }
}

/// Ordered list of page units handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputDocumentPlan {
    /// Number of pages in the source document
    pub original_page_count: usize,

    /// Units in output order
    pub units: Vec<PageUnit>,
}

impl OutputDocumentPlan {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn has_glossary(&self) -> bool {
        self.units.last().is_some_and(|u| u.kind == UnitKind::Glossary)
    }

    /// Units of one kind, in order.
    pub fn units_of(&self, kind: UnitKind) -> impl Iterator<Item = &PageUnit> {
        self.units.iter().filter(move |u| u.kind == kind)
    }

    /// Number of translated units that are fallbacks or placeholders.
    pub fn degraded_count(&self) -> usize {
        self.units.iter().filter(|u| u.degraded).count()
    }

    /// Check the alternating Original/Translated layout and the unit count.
    pub fn validate(&self) -> Result<()> {
        let glossary = usize::from(self.has_glossary());
        let expected = 2 * self.original_page_count + glossary;
        if self.units.len() != expected {
            return Err(anyhow!("Plan has {} units, expected {}", self.units.len(), expected));
        }

        for page_index in 0..self.original_page_count {
            let original = &self.units[2 * page_index];
            let translated = &self.units[2 * page_index + 1];
            if original.kind != UnitKind::Original || original.source_page_index != Some(page_index) {
                return Err(anyhow!("Unit {} is not the original of page {}", 2 * page_index, page_index));
            }
            if translated.kind != UnitKind::Translated || translated.source_page_index != Some(page_index) {
                return Err(anyhow!(
                    "Unit {} is not the translation of page {}",
                    2 * page_index + 1,
                    page_index
                ));
            }
        }
        Ok(())
    }
}

/// Build the output plan from the page results.
///
/// Results are matched by page index, so their order does not matter; results
/// outside `0..original_page_count` are ignored and the first result wins for
/// a duplicated index. A glossary unit is appended only for non-empty lines.
pub fn assemble(
    original_page_count: usize,
    results: &[PageTranslationResult],
    glossary_lines: Option<&[String]>,
) -> OutputDocumentPlan {
    let mut by_index: HashMap<usize, &PageTranslationResult> = HashMap::with_capacity(results.len());
    for result in results {
        if result.page_index >= original_page_count {
            warn!(
                "Ignoring result for page {} (document has {} pages)",
                result.page_index, original_page_count
            );
            continue;
        }
        by_index.entry(result.page_index).or_insert(result);
    }

    let mut units = Vec::with_capacity(2 * original_page_count + 1);
    for page_index in 0..original_page_count {
        units.push(PageUnit::original(page_index));
        match by_index.get(&page_index) {
            Some(result) => units.push(PageUnit::translated(page_index, &result.text, result.used_fallback)),
            None => {
                warn!("No translation for page {}, using placeholder", page_index);
                units.push(PageUnit::translated(page_index, MISSING_TRANSLATION_PLACEHOLDER, true));
            }
        }
    }

    if let Some(lines) = glossary_lines.filter(|lines| !lines.is_empty()) {
        units.push(PageUnit::glossary(lines));
    }

    debug!("Assembled plan with {} units", units.len());
    OutputDocumentPlan {
        original_page_count,
        units,
    }
}
