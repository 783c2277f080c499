use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::document::{
    DocumentHandle, OutputDocumentPlan, PlainTextExtractor, PlainTextRenderer, TextExtractor, assemble, concat_pages,
    render_plan,
};
use crate::errors::AppError;
use crate::file_utils::{FileManager, FileType};
use crate::terminology::{TerminologyStore, load_store};
use crate::translation::pipeline::NoProgress;
use crate::translation::{GlossaryBuilder, PipelineState, ProgressSink, TranslationPipeline};

// @module: Application controller for document translation

/// Language code used in output file names
pub const TARGET_LANGUAGE: &str = "ar";

/// Name of the run log written next to the outputs
pub const RUN_LOG_FILE: &str = "medtrans.log";

/// Summary of one translated document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub input: PathBuf,
    pub plan_path: Option<PathBuf>,
    pub text_path: Option<PathBuf>,
    pub pages: usize,
    pub fallback_pages: usize,
    pub missing_pages: usize,
    pub glossary_entries: usize,
    pub degraded_terminology: bool,
    pub state: PipelineState,
    pub duration: Duration,
}

impl DocumentSummary {
    /// One-line description for logs.
    pub fn describe(&self) -> String {
        format!(
            "{}: {} pages, {} fallback, {} missing, {} glossary entries in {}",
            self.input.display(),
            self.pages,
            self.fallback_pages,
            self.missing_pages,
            self.glossary_entries,
            Controller::format_duration(self.duration)
        )
    }
}

/// Outcome of processing one input file
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Translated(DocumentSummary),
    /// Outputs already exist and overwriting was not requested
    Skipped(PathBuf),
}

/// Counts for a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Progress sink drawing an indicatif bar
struct BarSink {
    bar: ProgressBar,
}

impl ProgressSink for BarSink {
    fn on_progress(&self, percent: f32, stage: &str) {
        self.bar.set_position(percent.round() as u64);
        self.bar.set_message(stage.to_string());
    }
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    store: Arc<TerminologyStore>,
    pipeline: TranslationPipeline,
    extractor: Arc<dyn TextExtractor>,
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub async fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let store = Arc::new(
            load_store(
                config.terminology.domain_path.as_deref(),
                config.terminology.general_path.as_deref(),
            )
            .await,
        );
        if store.is_degraded() {
            for reason in store.status().reasons {
                warn!("Terminology running on seed data: {}", reason);
            }
        }

        let pipeline = TranslationPipeline::new(config.pipeline.clone(), store.clone());

        Ok(Self {
            config,
            store,
            pipeline,
            extractor: Arc::new(PlainTextExtractor),
            show_progress: true,
        })
    }

    /// Use another text extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Use another pipeline (e.g. with custom rules).
    pub fn with_pipeline(mut self, pipeline: TranslationPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Enable or disable the progress bar.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<TerminologyStore> {
        &self.store
    }

    pub fn pipeline(&self) -> &TranslationPipeline {
        &self.pipeline
    }

    /// Output paths (plan, text) for an input file.
    pub fn output_paths(&self, input_file: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
        (
            FileManager::generate_output_path(input_file, output_dir, TARGET_LANGUAGE, "plan.json"),
            FileManager::generate_output_path(input_file, output_dir, TARGET_LANGUAGE, "txt"),
        )
    }

    /// Run the main workflow for one input file
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<RunOutcome> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(&input_file, &output_dir, &multi_progress, force_overwrite)
            .await
    }

    async fn run_with_progress(
        &self,
        input_file: &Path,
        output_dir: &Path,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<RunOutcome> {
        let start_time = Instant::now();

        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        match FileManager::detect_file_type(input_file)? {
            FileType::PlainText => {}
            FileType::Pdf => {
                return Err(anyhow!(
                    "PDF input is not read directly; convert it with `pdftotext -layout {:?}` first",
                    input_file
                ));
            }
            FileType::Unknown => return Err(anyhow!("Unsupported input file: {:?}", input_file)),
        }

        FileManager::ensure_dir(output_dir)?;
        let (plan_path, text_path) = self.output_paths(input_file, output_dir);
        let outputs_exist = (!self.config.output.write_plan || plan_path.exists())
            && (!self.config.output.write_text || text_path.exists());
        if outputs_exist && !force_overwrite {
            warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", input_file);
            return Ok(RunOutcome::Skipped(input_file.to_path_buf()));
        }

        // Extraction failure is the only document-fatal error
        let handle = DocumentHandle::new(input_file);
        let page_texts = self
            .extractor
            .extract_page_texts(&handle)
            .await
            .map_err(|e| {
                error!("Extraction failed for {:?}: {}", input_file, e);
                AppError::from(e)
            })?;
        info!("Translating {} pages from {:?}", page_texts.len(), input_file);

        let sink: Arc<dyn ProgressSink> = if self.show_progress {
            let bar = multi_progress.add(ProgressBar::new(100));
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style.progress_chars("█▓▒░"));
            Arc::new(BarSink { bar })
        } else {
            Arc::new(NoProgress)
        };

        let results = self.pipeline.translate_document(page_texts.clone(), sink).await;
        let state = self.pipeline.state();
        self.pipeline.reset();

        let glossary_lines = GlossaryBuilder::new(self.config.glossary.clone()).build(&self.store, &page_texts);
        let plan = assemble(page_texts.len(), &results, Some(&glossary_lines));
        plan.validate().context("Assembled plan is inconsistent")?;

        let plan_written = if self.config.output.write_plan {
            Self::write_plan(&plan, &plan_path)?;
            Some(plan_path)
        } else {
            None
        };

        let text_written = if self.config.output.write_text {
            let renderer = PlainTextRenderer::new(page_texts.clone());
            let rendered = render_plan(&plan, &handle, &renderer).await;
            let placeholders = rendered.iter().filter(|p| p.placeholder).count();
            if placeholders > 0 {
                warn!("{} units of {:?} rendered as placeholders", placeholders, input_file);
            }
            FileManager::write_bytes(&text_path, &concat_pages(&rendered))?;
            Some(text_path)
        } else {
            None
        };

        let summary = DocumentSummary {
            input: input_file.to_path_buf(),
            plan_path: plan_written,
            text_path: text_written,
            pages: page_texts.len(),
            fallback_pages: results.iter().filter(|r| r.used_fallback).count(),
            missing_pages: page_texts.len().saturating_sub(results.len()),
            glossary_entries: glossary_lines.len(),
            degraded_terminology: self.store.is_degraded(),
            state,
            duration: start_time.elapsed(),
        };

        info!("Success: {}", summary.describe());
        if let Err(e) = FileManager::append_to_log_file(output_dir.join(RUN_LOG_FILE), &summary.describe()) {
            warn!("Failed to write run log: {}", e);
        }

        Ok(RunOutcome::Translated(summary))
    }

    fn write_plan(plan: &OutputDocumentPlan, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(plan).context("Failed to serialize document plan")?;
        FileManager::write_to_file(path, &json)?;
        debug!("Plan written to {:?}", path);
        Ok(())
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Process every `.txt` document in a directory (recursive).
    /// Outputs go next to each input unless `output_dir` is given.
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !input_dir.exists() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        // Our own text outputs share the extension
        let suffix = format!(".{}.txt", TARGET_LANGUAGE);
        let documents: Vec<PathBuf> = FileManager::find_files(&input_dir, "txt")?
            .into_iter()
            .filter(|p| !p.to_string_lossy().ends_with(&suffix))
            .collect();

        if documents.is_empty() {
            return Err(anyhow!("No text documents found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(documents.len() as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));
        if !self.show_progress {
            folder_pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        }

        let mut summary = FolderSummary::default();

        for document in &documents {
            let file_name = document
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let target_dir = match (&output_dir, document.parent()) {
                (Some(dir), _) => dir.clone(),
                (None, Some(parent)) => parent.to_path_buf(),
                (None, None) => input_dir.clone(),
            };

            match self
                .run_with_progress(document, &target_dir, &multi_progress, force_overwrite)
                .await
            {
                Ok(RunOutcome::Translated(_)) => summary.processed += 1,
                Ok(RunOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            summary.processed,
            summary.skipped,
            summary.errors,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }
}
