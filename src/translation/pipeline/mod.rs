/*!
 * Per-document translation pipeline.
 *
 * - `orchestrator`: page stages, fallback handling, concurrent page processing
 * - `progress`: progress sinks and the shared step tracker
 */

pub mod orchestrator;
pub mod progress;

// Re-export types used externally
pub use orchestrator::{
    CancelHandle, PageStage, PageTranslationResult, PipelineConfig, PipelineState, TranslationPipeline,
};
pub use progress::{NoProgress, ProgressSink, ProgressTracker};
