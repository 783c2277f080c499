/*!
 * Substitution rules and ordered rule cascades.
 *
 * A cascade applies its rules in declaration order, each rule consuming the
 * output of the previous one. The declaration index is the rule's priority.
 * A rule that fails (or panics) is skipped and logged; the cascade goes on
 * with the text as it was before that rule.
 */

use log::{debug, warn};
use regex::Regex;
use std::borrow::Cow;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::errors::RuleError;

/// Optional annotation marker trailing a word, e.g. ` [MED:حمى]`.
pub const MARKER_TAIL: &str = r"(?:\s*\[(?:MED|NORM):[^\]]*\])?";

/// Placeholder for `MARKER_TAIL` inside built-in pattern tables.
pub const MARKER_PLACEHOLDER: &str = "{M}";

/// Expand `{M}` placeholders into the marker-tolerant sub-pattern.
pub fn expand_markers(pattern: &str) -> String {
    pattern.replace(MARKER_PLACEHOLDER, MARKER_TAIL)
}

/// Build a case-insensitive pattern for a literal phrase that tolerates
/// annotation markers after each of its words.
pub fn phrase_pattern(phrase: &str) -> String {
    let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
    format!(
        r"(?i)\b{}\b{}",
        words.join(&format!(r"\b{}\s+", MARKER_TAIL)),
        MARKER_TAIL
    )
}

/// A text substitution applied as one step of a cascade.
pub trait SubstitutionRule: Send + Sync {
    /// Human-readable description used in logs and reports
    fn description(&self) -> &str;

    /// Apply the rule to the text.
    fn apply<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, RuleError>;
}

/// Regex pattern rewritten through a replacement template.
#[derive(Debug, Clone)]
pub struct PatternRule {
    matcher: Regex,
    replacement: String,
    description: String,
}

impl PatternRule {
    /// Compile a rule, validating the template against the pattern's groups.
    pub fn new(pattern: &str, replacement: &str, description: &str) -> Result<Self, RuleError> {
        let matcher = Regex::new(pattern).map_err(|e| RuleError::InvalidPattern {
            description: description.to_string(),
            message: e.to_string(),
        })?;
        validate_template(&matcher, replacement, description)?;

        Ok(Self {
            matcher,
            replacement: replacement.to_string(),
            description: description.to_string(),
        })
    }

    /// Rule replacing a literal phrase (case-insensitive, marker tolerant)
    /// with a fixed text.
    pub fn phrase(phrase: &str, replacement: &str) -> Result<Self, RuleError> {
        Self::new(
            &phrase_pattern(phrase),
            &replacement.replace('$', "$$"),
            &format!("phrase '{}'", phrase),
        )
    }

    /// Replace the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    /// The replacement template.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

impl SubstitutionRule for PatternRule {
    fn description(&self) -> &str {
        &self.description
    }

    fn apply<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, RuleError> {
        Ok(self.matcher.replace_all(text, self.replacement.as_str()))
    }
}

/// Check that every `$name` / `${name}` in the template names a group of the pattern.
fn validate_template(matcher: &Regex, template: &str, description: &str) -> Result<(), RuleError> {
    let invalid = |message: String| RuleError::InvalidTemplate {
        description: description.to_string(),
        message,
    };

    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        // `$$` is a literal dollar
        if bytes.get(i + 1) == Some(&b'$') {
            i += 2;
            continue;
        }

        let (name, next) = if bytes.get(i + 1) == Some(&b'{') {
            match template[i + 2..].find('}') {
                Some(end) => (&template[i + 2..i + 2 + end], i + 3 + end),
                None => return Err(invalid("unterminated '${' group reference".to_string())),
            }
        } else {
            let len = template[i + 1..]
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                .count();
            (&template[i + 1..i + 1 + len], i + 1 + len)
        };

        if !name.is_empty() {
            let known = match name.parse::<usize>() {
                Ok(index) => index < matcher.captures_len(),
                Err(_) => matcher.capture_names().flatten().any(|n| n == name),
            };
            if !known {
                return Err(invalid(format!("unknown group '{}'", name)));
            }
        }
        i = next;
    }
    Ok(())
}

/// Outcome of one cascade run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeReport {
    /// Descriptions of rules that changed the text, in application order
    pub changed: Vec<String>,
    /// Rules that failed and were skipped, with their priority
    pub skipped: Vec<(usize, RuleError)>,
}

impl CascadeReport {
    /// Whether every rule ran without failure.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Ordered list of substitution rules.
#[derive(Clone)]
pub struct RuleCascade {
    name: String,
    rules: Vec<Arc<dyn SubstitutionRule>>,
    max_growth: usize,
}

impl std::fmt::Debug for RuleCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleCascade")
            .field("name", &self.name)
            .field("rules", &self.descriptions())
            .field("max_growth", &self.max_growth)
            .finish()
    }
}

impl RuleCascade {
    /// Default bound on how much a single rule may grow the text.
    pub const DEFAULT_MAX_GROWTH: usize = 8;

    /// Absolute slack added to the growth bound so short inputs can expand.
    const GROWTH_SLACK: usize = 256;

    /// Create an empty cascade.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rules: Vec::new(),
            max_growth: Self::DEFAULT_MAX_GROWTH,
        }
    }

    /// Create a cascade from rules in declaration order.
    pub fn from_rules(name: &str, rules: impl IntoIterator<Item = Arc<dyn SubstitutionRule>>) -> Self {
        let mut cascade = Self::new(name);
        cascade.rules.extend(rules);
        cascade
    }

    /// Set the growth bound (output may not exceed `factor * input + slack`).
    pub fn with_max_growth(mut self, factor: usize) -> Self {
        self.max_growth = factor.max(1);
        self
    }

    /// Append a rule; it runs after every rule already in the cascade.
    pub fn push(&mut self, rule: Arc<dyn SubstitutionRule>) {
        self.rules.push(rule);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules with their priority (declaration index).
    pub fn rules(&self) -> impl Iterator<Item = (usize, &dyn SubstitutionRule)> {
        self.rules.iter().enumerate().map(|(i, r)| (i, r.as_ref()))
    }

    /// Rule descriptions in cascade order.
    pub fn descriptions(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.description()).collect()
    }

    /// Priority of the first rule with the given description.
    pub fn priority_of(&self, description: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.description() == description)
    }

    /// Run every rule in order over the text.
    pub fn apply(&self, text: &str) -> (String, CascadeReport) {
        let mut current = text.to_string();
        let mut report = CascadeReport::default();

        for (priority, rule) in self.rules.iter().enumerate() {
            match self.apply_rule(rule.as_ref(), &current) {
                Ok(Some(next)) => {
                    debug!("[{}] #{} {} applied", self.name, priority, rule.description());
                    report.changed.push(rule.description().to_string());
                    current = next;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("[{}] skipping rule #{}: {}", self.name, priority, e);
                    report.skipped.push((priority, e));
                }
            }
        }

        (current, report)
    }

    /// Apply one rule, returning `None` when the text is unchanged.
    fn apply_rule(&self, rule: &dyn SubstitutionRule, text: &str) -> Result<Option<String>, RuleError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            rule.apply(text).map(|out| match out {
                Cow::Borrowed(_) => None,
                Cow::Owned(s) if s == text => None,
                Cow::Owned(s) => Some(s),
            })
        }));

        let output = match outcome {
            Ok(result) => result?,
            Err(payload) => {
                return Err(RuleError::ApplicationFailed {
                    description: rule.description().to_string(),
                    message: format!("panicked: {}", panic_message(payload.as_ref())),
                });
            }
        };

        if let Some(ref out) = output {
            let limit = text.len().saturating_mul(self.max_growth) + Self::GROWTH_SLACK;
            if out.len() > limit {
                return Err(RuleError::ApplicationFailed {
                    description: rule.description().to_string(),
                    message: format!("output grew from {} to {} bytes", text.len(), out.len()),
                });
            }
        }
        Ok(output)
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
