/*!
 * Execution of an output plan against a page renderer.
 */

use bytes::{BufMut, Bytes, BytesMut};
use log::warn;

use super::collaborators::{DocumentHandle, PAGE_SEPARATOR, PageRenderer, TextDirection};
use super::reassembler::{OutputDocumentPlan, PageUnit, UnitContent, UnitKind};

/// Text of a page whose rendering failed.
pub const RENDERING_FAILED_PLACEHOLDER: &str = "[Page could not be rendered / تعذر عرض الصفحة]";

/// One rendered unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub kind: UnitKind,
    pub source_page_index: Option<usize>,
    pub bytes: Bytes,
    /// Whether `bytes` is the error placeholder
    pub placeholder: bool,
}

async fn render_unit(
    unit: &PageUnit,
    document: &DocumentHandle,
    renderer: &dyn PageRenderer,
) -> Result<Bytes, crate::errors::DocumentError> {
    match &unit.content {
        UnitContent::PageImage { page_index } => renderer.render_original_page(document, *page_index).await,
        UnitContent::Text { text } => {
            let direction = match unit.kind {
                UnitKind::Translated => TextDirection::Rtl,
                UnitKind::Original | UnitKind::Glossary => TextDirection::Ltr,
            };
            renderer.render_text_page(text, direction).await
        }
    }
}

/// Render every unit in plan order. A unit that fails to render is replaced
/// by a placeholder page, so the output always has one page per unit.
pub async fn render_plan(
    plan: &OutputDocumentPlan,
    document: &DocumentHandle,
    renderer: &dyn PageRenderer,
) -> Vec<RenderedPage> {
    let mut pages = Vec::with_capacity(plan.units.len());

    for (position, unit) in plan.units.iter().enumerate() {
        let (bytes, placeholder) = match render_unit(unit, document, renderer).await {
            Ok(bytes) => (bytes, false),
            Err(e) => {
                warn!("Unit {} ({:?}) could not be rendered: {}", position, unit.kind, e);
                let bytes = renderer
                    .render_text_page(RENDERING_FAILED_PLACEHOLDER, TextDirection::Ltr)
                    .await
                    .unwrap_or_else(|_| Bytes::from_static(RENDERING_FAILED_PLACEHOLDER.as_bytes()));
                (bytes, true)
            }
        };

        pages.push(RenderedPage {
            kind: unit.kind,
            source_page_index: unit.source_page_index,
            bytes,
            placeholder,
        });
    }

    pages
}

/// Join rendered pages with form feeds into one buffer.
pub fn concat_pages(pages: &[RenderedPage]) -> Bytes {
    let size = pages.iter().map(|p| p.bytes.len() + 1).sum();
    let mut buffer = BytesMut::with_capacity(size);
    let mut encoded = [0u8; 4];
    let separator = PAGE_SEPARATOR.encode_utf8(&mut encoded).as_bytes();

    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            buffer.put_slice(separator);
        }
        buffer.put_slice(&page.bytes);
    }
    buffer.freeze()
}
