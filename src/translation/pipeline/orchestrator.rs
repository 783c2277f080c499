/*!
 * Pipeline orchestrator for per-page translation.
 *
 * Every page runs through an ordered list of stages:
 * 1. OCR look-alike correction (optional)
 * 2. Annotation
 * 3. Rule-based translation
 * 4. Grammar normalization
 *
 * A stage error or panic on one page switches that page to the word-for-word
 * fallback; other pages are unaffected. Pages are processed concurrently and
 * the results are returned sorted by page index.
 */

use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::errors::{AppError, PageError};
use crate::terminology::TerminologyStore;
use crate::translation::annotation::Annotator;
use crate::translation::cleanup::MarkerCleanup;
use crate::translation::engine::TranslationEngine;
use crate::translation::fallback::FallbackTranslator;
use crate::translation::grammar::GrammarNormalizer;
use crate::translation::ocr::OcrCorrector;
use crate::translation::rules::{RuleCascade, panic_message};

use super::progress::{NoProgress, ProgressSink, ProgressTracker};

/// One step of page processing.
pub trait PageStage: Send + Sync {
    /// Stage label used in progress updates and logs
    fn name(&self) -> &str;

    /// Transform the page text.
    fn process(&self, text: &str) -> Result<String, PageError>;
}

/// Configuration for the translation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pages translated at the same time
    #[serde(default = "default_max_concurrent_pages")]
    pub max_concurrent_pages: usize,

    /// Bound on marker cleanup passes
    #[serde(default = "default_max_cleanup_passes")]
    pub max_cleanup_passes: usize,

    /// Bound on grammar normalization passes
    #[serde(default = "default_max_normalization_passes")]
    pub max_normalization_passes: usize,

    /// Rewrite OCR digit look-alikes inside words before annotation
    #[serde(default)]
    pub ocr_correction: bool,

    /// Growth factor a single rule may not exceed
    #[serde(default = "default_max_rule_growth")]
    pub max_rule_growth: usize,
}

fn default_max_concurrent_pages() -> usize {
    4
}

fn default_max_cleanup_passes() -> usize {
    MarkerCleanup::DEFAULT_MAX_PASSES
}

fn default_max_normalization_passes() -> usize {
    GrammarNormalizer::DEFAULT_MAX_PASSES
}

fn default_max_rule_growth() -> usize {
    RuleCascade::DEFAULT_MAX_GROWTH
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pages: default_max_concurrent_pages(),
            max_cleanup_passes: default_max_cleanup_passes(),
            max_normalization_passes: default_max_normalization_passes(),
            ocr_correction: false,
            max_rule_growth: default_max_rule_growth(),
        }
    }
}

impl PipelineConfig {
    /// Enable or disable OCR correction.
    pub fn with_ocr_correction(mut self, enabled: bool) -> Self {
        self.ocr_correction = enabled;
        self
    }

    /// Set the number of pages processed concurrently.
    pub fn with_max_concurrent_pages(mut self, pages: usize) -> Self {
        self.max_concurrent_pages = pages;
        self
    }

    /// Validate the bounds.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_pages == 0 {
            return Err(AppError::Config("pipeline.max_concurrent_pages must be at least 1".to_string()).into());
        }
        if self.max_cleanup_passes == 0 {
            return Err(AppError::Config("pipeline.max_cleanup_passes must be at least 1".to_string()).into());
        }
        if self.max_normalization_passes == 0 {
            return Err(AppError::Config("pipeline.max_normalization_passes must be at least 1".to_string()).into());
        }
        if self.max_rule_growth == 0 {
            return Err(AppError::Config("pipeline.max_rule_growth must be at least 1".to_string()).into());
        }
        Ok(())
    }
}

/// Outcome of translating one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTranslationResult {
    /// Zero-based page index
    pub page_index: usize,

    /// Translated (or fallback) text
    pub text: String,

    /// Whether every stage succeeded
    pub succeeded: bool,

    /// Whether the text comes from the word-for-word fallback
    pub used_fallback: bool,

    /// Why the page fell back, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl PageTranslationResult {
    /// Result of a page that went through every stage.
    pub fn translated(page_index: usize, text: String) -> Self {
        Self {
            page_index,
            text,
            succeeded: true,
            used_fallback: false,
            failure: None,
        }
    }

    /// Result of a page translated by the fallback.
    pub fn fallback(page_index: usize, text: String, failure: &str) -> Self {
        Self {
            page_index,
            text,
            succeeded: false,
            used_fallback: true,
            failure: Some(failure.to_string()),
        }
    }
}

/// Document-level pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PipelineState {
    #[default]
    Idle,
    Running {
        page_index: usize,
    },
    /// Every page translated without fallback
    Succeeded,
    /// At least one page fell back or was not processed
    Degraded,
}

/// Cooperative cancellation flag. Pages not started once it is set are omitted.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// The main translation pipeline.
#[derive(Clone)]
pub struct TranslationPipeline {
    config: PipelineConfig,
    store: Arc<TerminologyStore>,
    stages: Vec<Arc<dyn PageStage>>,
    fallback: FallbackTranslator,
    state: Arc<RwLock<PipelineState>>,
}

impl std::fmt::Debug for TranslationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationPipeline")
            .field("config", &self.config)
            .field("stages", &self.stage_names())
            .field("state", &self.state())
            .finish()
    }
}

impl TranslationPipeline {
    /// Create a pipeline with the built-in stages.
    pub fn new(config: PipelineConfig, store: Arc<TerminologyStore>) -> Self {
        let mut stages: Vec<Arc<dyn PageStage>> = Vec::new();
        if config.ocr_correction {
            stages.push(Arc::new(OcrCorrector::new()));
        }
        stages.push(Arc::new(Annotator::new(store.clone())));
        stages.push(Arc::new(TranslationEngine::new(
            config.max_cleanup_passes,
            config.max_rule_growth,
        )));
        stages.push(Arc::new(GrammarNormalizer::new(
            config.max_normalization_passes,
            config.max_rule_growth,
        )));

        Self {
            fallback: FallbackTranslator::new(store.clone()),
            config,
            store,
            stages,
            state: Arc::new(RwLock::new(PipelineState::Idle)),
        }
    }

    /// Replace the stage with the same name, or append it.
    pub fn with_stage(mut self, stage: Arc<dyn PageStage>) -> Self {
        match self.stages.iter().position(|s| s.name() == stage.name()) {
            Some(index) => self.stages[index] = stage,
            None => self.stages.push(stage),
        }
        self
    }

    /// Replace the whole stage list.
    pub fn with_stages(mut self, stages: Vec<Arc<dyn PageStage>>) -> Self {
        self.stages = stages;
        self
    }

    /// Use a custom translation engine (e.g. one with extra construct rules).
    pub fn with_engine(self, engine: TranslationEngine) -> Self {
        self.with_stage(Arc::new(engine))
    }

    /// Use a custom grammar normalizer.
    pub fn with_grammar(self, grammar: GrammarNormalizer) -> Self {
        self.with_stage(Arc::new(grammar))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<TerminologyStore> {
        &self.store
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name().to_string()).collect()
    }

    /// Current document state.
    pub fn state(&self) -> PipelineState {
        *self.state.read()
    }

    /// Return to `Idle` after a finished document.
    pub fn reset(&self) {
        *self.state.write() = PipelineState::Idle;
    }

    /// Translate one page synchronously.
    pub fn translate_page(&self, page_index: usize, text: &str) -> PageTranslationResult {
        self.translate_page_tracked(page_index, text, |_| {})
    }

    /// Translate one page, calling `on_step` with the label of every finished
    /// step. A fallback page reports its remaining steps at once.
    fn translate_page_tracked(
        &self,
        page_index: usize,
        text: &str,
        on_step: impl Fn(StepReport<'_>),
    ) -> PageTranslationResult {
        let mut current = text.to_string();

        for (position, stage) in self.stages.iter().enumerate() {
            match run_stage(stage.as_ref(), &current) {
                Ok(next) => {
                    debug!("Page {} stage '{}' done", page_index, stage.name());
                    current = next;
                    on_step(StepReport {
                        steps: 1,
                        label: stage.name(),
                    });
                }
                Err(e) => {
                    warn!("Page {} falls back to dictionary translation: {}", page_index, e);
                    on_step(StepReport {
                        steps: self.stages.len() - position,
                        label: "fallback",
                    });
                    return PageTranslationResult::fallback(page_index, self.fallback.translate(text), &e.to_string());
                }
            }
        }

        PageTranslationResult::translated(page_index, current)
    }

    /// Translate every page, reporting progress to the sink.
    pub async fn translate_document(
        &self,
        page_texts: Vec<String>,
        sink: Arc<dyn ProgressSink>,
    ) -> Vec<PageTranslationResult> {
        self.translate_document_with_cancel(page_texts, sink, CancelHandle::new())
            .await
    }

    /// Translate every page without progress reporting.
    pub async fn translate_pages(&self, page_texts: Vec<String>) -> Vec<PageTranslationResult> {
        self.translate_document(page_texts, Arc::new(NoProgress)).await
    }

    /// Translate every page; pages not yet started when `cancel` fires are
    /// left out of the result.
    pub async fn translate_document_with_cancel(
        &self,
        page_texts: Vec<String>,
        sink: Arc<dyn ProgressSink>,
        cancel: CancelHandle,
    ) -> Vec<PageTranslationResult> {
        let start_time = Instant::now();
        let page_count = page_texts.len();
        let steps_per_page = self.stages.len().max(1);
        let tracker = Arc::new(ProgressTracker::new(sink, page_count * steps_per_page));

        *self.state.write() = PipelineState::Running { page_index: 0 };
        tracker.start("starting");

        let mut results = stream::iter(page_texts.into_iter().enumerate())
            .map(|(page_index, text)| {
                let pipeline = self.clone();
                let tracker = tracker.clone();
                let cancel = cancel.clone();

                async move {
                    if cancel.is_cancelled() {
                        debug!("Page {} skipped after cancellation", page_index);
                        return None;
                    }
                    *pipeline.state.write() = PipelineState::Running { page_index };

                    let worker = pipeline.clone();
                    let raw = text.clone();
                    let task_tracker = tracker.clone();
                    let joined = tokio::task::spawn_blocking(move || {
                        worker.translate_page_tracked(page_index, &text, |step| {
                            task_tracker.advance(step.steps, &format!("page {}: {}", page_index + 1, step.label));
                        })
                    })
                    .await;

                    match joined {
                        Ok(result) => Some(result),
                        Err(e) => {
                            error!("Page {} worker failed: {}", page_index, e);
                            tracker.advance(steps_per_page, &format!("page {}: fallback", page_index + 1));
                            Some(PageTranslationResult::fallback(
                                page_index,
                                pipeline.fallback.translate(&raw),
                                &e.to_string(),
                            ))
                        }
                    }
                }
            })
            .buffer_unordered(self.config.max_concurrent_pages.max(1))
            .filter_map(futures::future::ready)
            .collect::<Vec<_>>()
            .await;

        // Pages complete out of order
        results.sort_by_key(|r| r.page_index);

        let complete = results.len() == page_count;
        let fallbacks = results.iter().filter(|r| r.used_fallback).count();
        let final_state = if complete && results.iter().all(|r| r.succeeded) {
            PipelineState::Succeeded
        } else {
            PipelineState::Degraded
        };
        *self.state.write() = final_state;

        if cancel.is_cancelled() {
            tracker.finish("cancelled", false);
        } else {
            tracker.finish("done", true);
        }

        info!(
            "Translated {}/{} pages ({} fallback) in {:.2}s",
            results.len(),
            page_count,
            fallbacks,
            start_time.elapsed().as_secs_f32()
        );
        results
    }
}

/// Progress step emitted by page processing.
struct StepReport<'a> {
    steps: usize,
    label: &'a str,
}

/// Run a stage, turning a panic into a page error.
fn run_stage(stage: &dyn PageStage, text: &str) -> Result<String, PageError> {
    match catch_unwind(AssertUnwindSafe(|| stage.process(text))) {
        Ok(Ok(out)) => Ok(out),
        Ok(Err(PageError::Rule(e))) => Err(PageError::StageFailed {
            stage: stage.name().to_string(),
            message: e.to_string(),
        }),
        Ok(Err(e)) => Err(e),
        Err(payload) => Err(PageError::StagePanicked {
            stage: stage.name().to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}
