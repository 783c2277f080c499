/*!
 * Boundary contracts for text extraction and page rendering, with plain-text
 * implementations.
 *
 * Plain-text documents follow the `pdftotext` convention: pages are separated
 * by form-feed characters.
 */

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::DocumentError;

/// Page separator in plain-text documents.
pub const PAGE_SEPARATOR: char = '\u{000C}';

const RIGHT_TO_LEFT_EMBEDDING: char = '\u{202B}';
const POP_DIRECTIONAL_FORMATTING: char = '\u{202C}';

/// Reference to a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHandle {
    pub path: PathBuf,
}

impl DocumentHandle {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Writing direction of a rendered text page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// Extracts the text of every page of a document.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Page texts in page order. Failure aborts the whole document.
    async fn extract_page_texts(&self, document: &DocumentHandle) -> Result<Vec<String>, DocumentError>;
}

/// Renders pages to bytes.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render an original page of the source document.
    async fn render_original_page(&self, document: &DocumentHandle, page_index: usize)
    -> Result<Bytes, DocumentError>;

    /// Render a block of text as a page.
    async fn render_text_page(&self, text: &str, direction: TextDirection) -> Result<Bytes, DocumentError>;
}

/// Split form-feed separated text into pages. A trailing separator does not
/// start a new page.
pub fn split_pages(content: &str) -> Vec<String> {
    let mut pages: Vec<String> = content.split(PAGE_SEPARATOR).map(str::to_string).collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

/// Reads UTF-8 text files with form-feed separated pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract_page_texts(&self, document: &DocumentHandle) -> Result<Vec<String>, DocumentError> {
        let content = tokio::fs::read_to_string(&document.path).await.map_err(|e| {
            DocumentError::ExtractionFailed(format!("{}: {}", document.path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Err(DocumentError::ExtractionFailed(format!(
                "{}: document contains no text",
                document.path.display()
            )));
        }

        let pages = split_pages(&content);
        debug!("Extracted {} pages from {}", pages.len(), document.path.display());
        Ok(pages)
    }
}

/// Renders pages as UTF-8 text.
///
/// Original pages are returned as extracted; right-to-left pages have every
/// line wrapped in Unicode embedding marks.
#[derive(Debug, Clone, Default)]
pub struct PlainTextRenderer {
    pages: Vec<String>,
}

impl PlainTextRenderer {
    /// Renderer over the extracted page texts of the document.
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl PageRenderer for PlainTextRenderer {
    async fn render_original_page(
        &self,
        document: &DocumentHandle,
        page_index: usize,
    ) -> Result<Bytes, DocumentError> {
        self.pages
            .get(page_index)
            .map(|page| Bytes::from(page.trim().to_string()))
            .ok_or_else(|| {
                DocumentError::RenderingFailed(format!(
                    "{} has no page {}",
                    document.path.display(),
                    page_index
                ))
            })
    }

    async fn render_text_page(&self, text: &str, direction: TextDirection) -> Result<Bytes, DocumentError> {
        let rendered = match direction {
            TextDirection::Ltr => text.to_string(),
            TextDirection::Rtl => text
                .lines()
                .map(|line| format!("{}{}{}", RIGHT_TO_LEFT_EMBEDDING, line, POP_DIRECTIONAL_FORMATTING))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        Ok(Bytes::from(rendered))
    }
}
