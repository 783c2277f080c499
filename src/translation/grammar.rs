/*!
 * Arabic grammar normalization.
 *
 * Three steps run in order:
 * 1. structural rules (article attachment, duplicate prepositions,
 *    demonstrative spelling, gender agreement)
 * 2. common-mistake corrections
 * 3. whitespace and punctuation normalization
 *
 * The sequence is repeated until the text stops changing, so normalizing an
 * already normalized text is a no-op.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::errors::{PageError, RuleError};
use crate::translation::engine::{compile_patterns, compile_phrases};
use crate::translation::pipeline::PageStage;
use crate::translation::rules::{PatternRule, RuleCascade, SubstitutionRule};
use crate::translation::tables::{COMMON_MISTAKES, STRUCTURAL_RULES};

static STRUCTURAL: Lazy<Vec<Arc<dyn SubstitutionRule>>> = Lazy::new(|| compile_patterns(STRUCTURAL_RULES));

static MISTAKES: Lazy<Vec<Arc<dyn SubstitutionRule>>> = Lazy::new(|| compile_phrases(COMMON_MISTAKES, "mistake"));

/// Ordered whitespace and punctuation fixes.
static SPACING_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // collapse horizontal whitespace runs
        (r"[^\S\n]+", " "),
        // no spaces around line breaks
        (r" *\n *", "\n"),
        (r"\n{3,}", "\n\n"),
        // Arabic punctuation after Arabic words
        (r"(\p{Arabic}\s*),", "${1}،"),
        (r"(\p{Arabic}\s*)\?", "${1}؟"),
        (r"(\p{Arabic}\s*);", "${1}؛"),
        // no space before punctuation
        (r" +([.,;:!?،؛؟])", "${1}"),
        // one space after punctuation
        (r#"([.,;:!?،؛؟])([^\s\d.,;:!?،؛؟)\]}»"'])"#, "${1} ${2}"),
        // brackets and quotes hug their content
        (r"([(\[{«]) +", "${1}"),
        (r" +([)\]}»])", "${1}"),
        (r#""[ ]*([^"\n]*?)[ ]*""#, "\"${1}\""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("Invalid spacing regex"), replacement))
    .collect()
});

/// Whitespace and punctuation normalization, followed by a trim of every line.
pub fn normalize_spacing(text: &str) -> String {
    let mut current = text.to_string();
    for (regex, replacement) in SPACING_RULES.iter() {
        current = regex.replace_all(&current, *replacement).into_owned();
    }
    current
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Grammar normalizer with independent structural and mistake cascades.
#[derive(Debug, Clone)]
pub struct GrammarNormalizer {
    structural: RuleCascade,
    mistakes: RuleCascade,
    max_passes: usize,
}

impl Default for GrammarNormalizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PASSES, RuleCascade::DEFAULT_MAX_GROWTH)
    }
}

impl GrammarNormalizer {
    pub const DEFAULT_MAX_PASSES: usize = 8;

    /// Create a normalizer with the built-in rule tables.
    pub fn new(max_passes: usize, max_rule_growth: usize) -> Self {
        Self {
            structural: RuleCascade::from_rules("structural", STRUCTURAL.iter().cloned())
                .with_max_growth(max_rule_growth),
            mistakes: RuleCascade::from_rules("mistakes", MISTAKES.iter().cloned())
                .with_max_growth(max_rule_growth),
            max_passes: max_passes.max(1),
        }
    }

    /// New normalizer whose structural stage ends with the given rule.
    pub fn with_structural_rule(mut self, rule: Arc<dyn SubstitutionRule>) -> Self {
        self.structural.push(rule);
        self
    }

    /// Compile a custom structural rule and append it.
    pub fn with_structural_pattern(
        self,
        pattern: &str,
        template: &str,
        description: &str,
    ) -> Result<Self, RuleError> {
        let rule = PatternRule::new(pattern, template, description)?;
        Ok(self.with_structural_rule(Arc::new(rule)))
    }

    pub fn structural(&self) -> &RuleCascade {
        &self.structural
    }

    pub fn mistakes(&self) -> &RuleCascade {
        &self.mistakes
    }

    fn normalize_once(&self, text: &str) -> String {
        let (text, _) = self.structural.apply(text);
        let (text, _) = self.mistakes.apply(&text);
        normalize_spacing(&text)
    }

    /// Normalize until the output is stable.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = self.normalize_once(text);

        for pass in 1..self.max_passes {
            let next = self.normalize_once(&current);
            if next == current {
                debug!("Grammar normalization stable after {} passes", pass);
                return current;
            }
            current = next;
        }

        if self.normalize_once(&current) != current {
            warn!("Grammar normalization still changing after {} passes", self.max_passes);
        }
        current
    }
}

impl PageStage for GrammarNormalizer {
    fn name(&self) -> &str {
        "grammar"
    }

    fn process(&self, text: &str) -> Result<String, PageError> {
        Ok(self.normalize(text))
    }
}
