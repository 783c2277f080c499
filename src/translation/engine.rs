/*!
 * Rule-based translation engine.
 *
 * Runs three cascades over annotated text, each consuming the previous one's
 * output:
 * 1. clinical construct rules (sentence templates with captured groups)
 * 2. the closed phrase table
 * 3. function-word and temporal-adverb substitutions
 *
 * and finally collapses the remaining annotation markers to their translation.
 */

use log::debug;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::errors::{PageError, RuleError};
use crate::translation::cleanup::MarkerCleanup;
use crate::translation::pipeline::PageStage;
use crate::translation::rules::{
    CascadeReport, PatternRule, RuleCascade, SubstitutionRule, expand_markers,
};
use crate::translation::tables::{
    CASED_FUNCTION_WORDS, CONSTRUCT_RULES, FUNCTION_WORDS, PHRASE_TABLE, PatternRow, PhraseRow,
};

/// Compile a pattern table. Built-in tables are fixed, so a compile failure
/// is a programming error.
pub(crate) fn compile_patterns(rows: &[PatternRow]) -> Vec<Arc<dyn SubstitutionRule>> {
    rows.iter()
        .map(|(pattern, template, description)| {
            let rule = PatternRule::new(&expand_markers(pattern), template, description)
                .expect("Invalid built-in pattern rule");
            Arc::new(rule) as Arc<dyn SubstitutionRule>
        })
        .collect()
}

/// Compile a phrase table into marker-tolerant literal rules.
pub(crate) fn compile_phrases(rows: &[PhraseRow], kind: &str) -> Vec<Arc<dyn SubstitutionRule>> {
    rows.iter()
        .map(|(phrase, replacement)| {
            let rule = PatternRule::phrase(phrase, replacement)
                .expect("Invalid built-in phrase rule")
                .with_description(&format!("{} '{}'", kind, phrase));
            Arc::new(rule) as Arc<dyn SubstitutionRule>
        })
        .collect()
}

static CONSTRUCTS: Lazy<Vec<Arc<dyn SubstitutionRule>>> = Lazy::new(|| compile_patterns(CONSTRUCT_RULES));

static PHRASES: Lazy<Vec<Arc<dyn SubstitutionRule>>> = Lazy::new(|| compile_phrases(PHRASE_TABLE, "phrase"));

static FUNCTION_WORD_RULES: Lazy<Vec<Arc<dyn SubstitutionRule>>> = Lazy::new(|| {
    let mut rules = compile_patterns(CASED_FUNCTION_WORDS);
    rules.extend(compile_phrases(FUNCTION_WORDS, "word"));
    rules
});

/// Per-cascade reports of one translation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineReport {
    pub constructs: CascadeReport,
    pub phrases: CascadeReport,
    pub function_words: CascadeReport,
}

impl EngineReport {
    /// Total number of rules skipped because they failed.
    pub fn skipped_count(&self) -> usize {
        self.constructs.skipped.len() + self.phrases.skipped.len() + self.function_words.skipped.len()
    }
}

/// Cascaded rule translator.
#[derive(Debug, Clone)]
pub struct TranslationEngine {
    constructs: RuleCascade,
    phrases: RuleCascade,
    function_words: RuleCascade,
    cleanup: MarkerCleanup,
}

impl Default for TranslationEngine {
    fn default() -> Self {
        Self::new(MarkerCleanup::DEFAULT_MAX_PASSES, RuleCascade::DEFAULT_MAX_GROWTH)
    }
}

impl TranslationEngine {
    /// Create an engine with the built-in tables.
    pub fn new(max_cleanup_passes: usize, max_rule_growth: usize) -> Self {
        Self {
            constructs: RuleCascade::from_rules("constructs", CONSTRUCTS.iter().cloned())
                .with_max_growth(max_rule_growth),
            phrases: RuleCascade::from_rules("phrases", PHRASES.iter().cloned())
                .with_max_growth(max_rule_growth),
            function_words: RuleCascade::from_rules("function-words", FUNCTION_WORD_RULES.iter().cloned())
                .with_max_growth(max_rule_growth),
            cleanup: MarkerCleanup::new(max_cleanup_passes),
        }
    }

    /// New engine whose construct stage ends with the given rule.
    pub fn with_construct_rule(mut self, rule: Arc<dyn SubstitutionRule>) -> Self {
        self.constructs.push(rule);
        self
    }

    /// Compile a custom construct rule and append it.
    pub fn with_construct_pattern(
        self,
        pattern: &str,
        template: &str,
        description: &str,
    ) -> Result<Self, RuleError> {
        let rule = PatternRule::new(&expand_markers(pattern), template, description)?;
        Ok(self.with_construct_rule(Arc::new(rule)))
    }

    pub fn constructs(&self) -> &RuleCascade {
        &self.constructs
    }

    pub fn phrases(&self) -> &RuleCascade {
        &self.phrases
    }

    pub fn function_words(&self) -> &RuleCascade {
        &self.function_words
    }

    /// Translate annotated text; fails only when marker cleanup does not converge.
    pub fn translate(&self, annotated: &str) -> Result<String, RuleError> {
        self.translate_with_report(annotated).map(|(text, _)| text)
    }

    /// Translate and return what each cascade did.
    pub fn translate_with_report(&self, annotated: &str) -> Result<(String, EngineReport), RuleError> {
        let (text, constructs) = self.constructs.apply(annotated);
        let (text, phrases) = self.phrases.apply(&text);
        let (text, function_words) = self.function_words.apply(&text);
        let text = self.cleanup.clean(&text)?;

        let report = EngineReport {
            constructs,
            phrases,
            function_words,
        };
        debug!(
            "Engine applied {} construct, {} phrase, {} word rules ({} skipped)",
            report.constructs.changed.len(),
            report.phrases.changed.len(),
            report.function_words.changed.len(),
            report.skipped_count()
        );
        Ok((text, report))
    }
}

impl PageStage for TranslationEngine {
    fn name(&self) -> &str {
        "translate"
    }

    fn process(&self, text: &str) -> Result<String, PageError> {
        Ok(self.translate(text)?)
    }
}
