/*!
 * Output document construction.
 *
 * - `reassembler`: builds the interleaved original/translated page plan
 * - `collaborators`: text extraction and page rendering contracts
 * - `render`: executes a plan against a renderer
 */

pub mod collaborators;
pub mod reassembler;
pub mod render;

pub use collaborators::{
    DocumentHandle, PageRenderer, PlainTextExtractor, PlainTextRenderer, TextDirection, TextExtractor,
};
pub use reassembler::{
    MISSING_TRANSLATION_PLACEHOLDER, OutputDocumentPlan, PageUnit, UnitContent, UnitKind, assemble,
};
pub use render::{RenderedPage, concat_pages, render_plan};
