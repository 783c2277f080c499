/*!
 * English to Arabic text transformation.
 *
 * This module contains the layered, rule-based translation of page text.
 * It is split into several submodules:
 *
 * - `annotation`: sentence/word segmentation and inline terminology markers
 * - `ocr`: optional correction of digit look-alikes inside words
 * - `rules`: substitution rules and ordered cascades
 * - `tables`: built-in construct, phrase, function-word and grammar tables
 * - `engine`: the rule-based translation engine
 * - `cleanup`: fixed-point removal of annotation markers
 * - `grammar`: Arabic grammar and punctuation normalization
 * - `fallback`: word-for-word dictionary translation
 * - `glossary`: glossary lines for the output document
 * - `pipeline`: per-page orchestration and progress reporting
 */

// Re-export main types for easier usage
pub use self::annotation::{AnnotatedToken, Annotator, Marker};
pub use self::cleanup::MarkerCleanup;
pub use self::engine::{EngineReport, TranslationEngine};
pub use self::fallback::FallbackTranslator;
pub use self::glossary::{GlossaryBuilder, GlossaryConfig};
pub use self::grammar::{GrammarNormalizer, normalize_spacing};
pub use self::ocr::OcrCorrector;
pub use self::rules::{CascadeReport, PatternRule, RuleCascade, SubstitutionRule};

// Re-export pipeline types
pub use self::pipeline::{
    CancelHandle, PageStage, PageTranslationResult, PipelineConfig, PipelineState, ProgressSink,
    TranslationPipeline,
};

// Submodules
pub mod annotation;
pub mod cleanup;
pub mod engine;
pub mod fallback;
pub mod glossary;
pub mod grammar;
pub mod ocr;
pub mod pipeline;
pub mod rules;
pub mod tables;
