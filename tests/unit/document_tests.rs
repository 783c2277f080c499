/*!
 * Tests for output plan assembly, extraction and rendering
 */

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use medtrans::document::{
    DocumentHandle, MISSING_TRANSLATION_PLACEHOLDER, PageRenderer, PlainTextExtractor, PlainTextRenderer,
    TextDirection, TextExtractor, UnitContent, UnitKind, assemble, concat_pages, render_plan,
};
use medtrans::errors::DocumentError;
use medtrans::translation::PageTranslationResult;

use crate::common;

/// Renderer whose original pages always fail
struct NoImages;

#[async_trait]
impl PageRenderer for NoImages {
    async fn render_original_page(&self, _document: &DocumentHandle, page_index: usize) -> Result<Bytes, DocumentError> {
        Err(DocumentError::RenderingFailed(format!("page {}", page_index)))
    }

    async fn render_text_page(&self, text: &str, _direction: TextDirection) -> Result<Bytes, DocumentError> {
        Ok(Bytes::from(text.to_string()))
    }
}

fn translated(page_index: usize, text: &str) -> PageTranslationResult {
    PageTranslationResult::translated(page_index, text.to_string())
}

/// Unit count is twice the page count, plus the glossary when present
#[test]
fn test_assemble_shouldProduceTwoUnitsPerPage() {
    let results: Vec<_> = (0..5).rev().map(|i| translated(i, "نص")).collect();
    let glossary = vec!["fever: حمى".to_string()];

    let plan = assemble(5, &results, Some(&glossary));

    assert_eq!(plan.len(), 11);
    assert!(plan.validate().is_ok());
    assert!(plan.has_glossary());
    for (position, unit) in plan.units.iter().take(10).enumerate() {
        let expected = if position % 2 == 0 { UnitKind::Original } else { UnitKind::Translated };
        assert_eq!(unit.kind, expected);
        assert_eq!(unit.source_page_index, Some(position / 2));
    }
}

/// Out-of-range and duplicate results do not change the layout
#[test]
fn test_assemble_withStrayResults_shouldKeepLayout() {
    let results = vec![translated(0, "أول"), translated(0, "مكرر"), translated(7, "خارج")];

    let plan = assemble(2, &results, Some(&[]));

    assert_eq!(plan.len(), 4);
    assert!(!plan.has_glossary());
    assert_eq!(plan.units[1].content.text(), Some("أول"));
    assert_eq!(plan.units[3].content.text(), Some(MISSING_TRANSLATION_PLACEHOLDER));
    assert_eq!(plan.degraded_count(), 1);
}

/// Fallback results are flagged as degraded units
#[test]
fn test_assemble_withFallbackResult_shouldMarkDegraded() {
    let results = vec![PageTranslationResult::fallback(0, "حمى".to_string(), "stage failed")];
    let plan = assemble(1, &results, None);

    assert!(plan.units[1].degraded);
    assert_eq!(plan.units[0].content, UnitContent::PageImage { page_index: 0 });
}

/// The plan serializes with tagged content
#[test]
fn test_plan_shouldSerializeToJson() -> Result<()> {
    let plan = assemble(1, &[translated(0, "حمى")], None);
    let json = serde_json::to_value(&plan)?;

    assert_eq!(json["original_page_count"], 1);
    assert_eq!(json["units"][0]["kind"], "original");
    assert_eq!(json["units"][0]["content"]["type"], "page_image");
    assert_eq!(json["units"][1]["content"]["text"], "حمى");
    Ok(())
}

/// Extraction of an empty document is fatal
#[tokio::test]
async fn test_plainTextExtractor_withEmptyFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "empty.txt", "  \n")?;

    let result = PlainTextExtractor.extract_page_texts(&DocumentHandle::new(&path)).await;
    assert!(matches!(result, Err(DocumentError::ExtractionFailed(_))));
    Ok(())
}

/// Rendering failures become placeholder pages, one per unit
#[tokio::test]
async fn test_renderPlan_withFailingRenderer_shouldKeepUnitCount() {
    let plan = assemble(2, &[translated(0, "أ"), translated(1, "ب")], None);

    let pages = render_plan(&plan, &DocumentHandle::new("doc.txt"), &NoImages).await;

    assert_eq!(pages.len(), 4);
    assert!(pages[0].placeholder && pages[2].placeholder);
    assert!(!pages[1].placeholder && !pages[3].placeholder);
}

/// Extract, render and concatenate a document
#[tokio::test]
async fn test_extractAndRender_shouldInterleavePages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_document(temp_dir.path(), "doc.txt", &["first", "second"])?;
    let handle = DocumentHandle::new(&path);

    let pages = PlainTextExtractor.extract_page_texts(&handle).await?;
    let plan = assemble(pages.len(), &[translated(0, "الأول"), translated(1, "الثاني")], None);
    let rendered = render_plan(&plan, &handle, &PlainTextRenderer::new(pages)).await;
    let output = String::from_utf8(concat_pages(&rendered).to_vec())?;

    let parts: Vec<&str> = output.split('\u{000C}').collect();
    assert_eq!(parts.len(), 4);
    assert_eq!(parts[0], "first");
    assert!(parts[1].contains("الأول"));
    assert_eq!(parts[2], "second");
    Ok(())
}
