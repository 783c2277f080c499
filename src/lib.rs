/*!
 * # medtrans - English to Arabic medical document translation
 *
 * A Rust library for rule-based translation of medical documents from
 * English into Arabic, producing a bilingual output document.
 *
 * ## Features
 *
 * - Two-tier terminology store (medical terms first, general vocabulary second)
 * - Inline terminology annotation with `[MED:...]` / `[NORM:...]` markers
 * - Ordered rule cascades for constructs, phrases and function words
 * - Fixed-point marker cleanup and Arabic grammar normalization
 * - Bounded-concurrency page translation with per-page fault isolation
 * - Interleaved original/translated output plan with an optional glossary
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `terminology`: Term tables, seed vocabulary and record loading
 * - `translation`: Page text transformation:
 *   - `translation::annotation`: Segmentation and terminology markers
 *   - `translation::engine`: Rule-based translation engine
 *   - `translation::grammar`: Grammar and punctuation normalization
 *   - `translation::pipeline`: Page orchestration and progress
 * - `document`: Output plan assembly and rendering
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod terminology;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, DocumentSummary, RunOutcome};
pub use document::{OutputDocumentPlan, assemble};
pub use errors::{AppError, DocumentError, PageError, RuleError, TerminologyError};
pub use terminology::{TableSelector, TermEntry, TerminologyStore};
pub use translation::{PageTranslationResult, PipelineConfig, TranslationPipeline};
