/*!
 * Tests for the annotation, rule engine and grammar layers
 */

use std::borrow::Cow;
use std::sync::Arc;

use medtrans::errors::RuleError;
use medtrans::translation::{
    Annotator, GrammarNormalizer, MarkerCleanup, OcrCorrector, PatternRule, RuleCascade, SubstitutionRule,
    TranslationEngine, normalize_spacing,
};

use crate::common;

/// Rule that panics on every input
struct Exploding;

impl SubstitutionRule for Exploding {
    fn description(&self) -> &str {
        "exploding"
    }

    fn apply<'a>(&self, _text: &'a str) -> Result<Cow<'a, str>, RuleError> {
        panic!("rule blew up")
    }
}

/// Rule that multiplies its input
struct Doubling;

impl SubstitutionRule for Doubling {
    fn description(&self) -> &str {
        "doubling"
    }

    fn apply<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, RuleError> {
        Ok(Cow::Owned(text.repeat(64)))
    }
}

/// A panicking rule is skipped and later rules still run
#[test]
fn test_ruleCascade_withPanickingRule_shouldSkipAndContinue() {
    let cascade = RuleCascade::from_rules(
        "test",
        [
            Arc::new(PatternRule::new("a", "b", "a to b").unwrap()) as Arc<dyn SubstitutionRule>,
            Arc::new(Exploding),
            Arc::new(PatternRule::new("b", "c", "b to c").unwrap()),
        ],
    );

    let (out, report) = cascade.apply("aaa");

    assert_eq!(out, "ccc");
    assert_eq!(report.changed, vec!["a to b", "b to c"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, 1);
}

/// Runaway growth is treated as a rule failure
#[test]
fn test_ruleCascade_withRunawayRule_shouldRejectOutput() {
    let cascade = RuleCascade::from_rules("test", [Arc::new(Doubling) as Arc<dyn SubstitutionRule>]).with_max_growth(2);
    let input = "x".repeat(1000);

    let (out, report) = cascade.apply(&input);

    assert_eq!(out, input);
    assert!(!report.is_clean());
}

/// Invalid patterns are rejected when the rule is built
#[test]
fn test_patternRule_withInvalidPattern_shouldFail() {
    assert!(matches!(
        PatternRule::new("(unclosed", "x", "broken"),
        Err(RuleError::InvalidPattern { .. })
    ));
}

/// Annotate then translate the reference sentence
#[test]
fn test_annotateThenTranslate_withPatientSentence_shouldRemoveEnglishTerms() {
    let annotator = Annotator::new(common::sample_store());
    let engine = TranslationEngine::default();

    let annotated = annotator.annotate("The patient has fever and headache.");
    assert!(annotated.contains("fever [MED:حمى]"));
    assert!(annotated.contains("headache [MED:صداع]"));

    let translated = engine.translate(&annotated).unwrap();
    assert!(!translated.contains("fever"));
    assert!(!translated.contains("headache"));
    assert!(!MarkerCleanup::has_markers(&translated));
}

/// The construct rule keeps the reading and drops the copula
#[test]
fn test_annotateThenTranslate_withBloodPressure_shouldKeepReading() {
    let annotator = Annotator::new(common::sample_store());
    let engine = TranslationEngine::default();

    let translated = engine
        .translate(&annotator.annotate("blood pressure is 120/80"))
        .unwrap();

    assert!(translated.contains("120/80"));
    assert!(translated.contains("ضغط الدم"));
    assert!(!translated.split_whitespace().any(|w| w == "is"));
}

/// The engine output never carries markers, whatever the input
#[test]
fn test_translate_withAnyAnnotatedText_shouldLeaveNoMarkers() {
    let annotator = Annotator::new(common::sample_store());
    let engine = TranslationEngine::default();
    let samples = [
        "Severe pain in the chest for 2 weeks.",
        "Patient diagnosed with pneumonia.",
        "Take 2 tablets every morning.",
        "No known allergy. Tachycardia noted!",
        "",
    ];

    for sample in samples {
        let translated = engine.translate(&annotator.annotate(sample)).unwrap();
        assert!(!MarkerCleanup::has_markers(&translated), "input: {:?}", sample);
    }
}

/// OCR look-alikes are fixed before lookup when the stage runs
#[test]
fn test_ocrThenAnnotate_shouldFindCorrectedTerms() {
    let annotator = Annotator::new(common::sample_store());
    let corrected = OcrCorrector::new().correct("fev3r and c0ugh");

    assert_eq!(corrected, "fever and cough");
    assert_eq!(annotator.annotate(&corrected), "fever [MED:حمى] and cough [MED:سعال]");
}

/// Spacing fix from the reference example
#[test]
fn test_normalizeSpacing_withSpaceBeforePeriod_shouldYieldReference() {
    assert_eq!(normalize_spacing("text  .extra"), "text. extra");
    assert_eq!(GrammarNormalizer::default().normalize("text  .extra"), "text. extra");
}

/// Normalizing twice gives the same result as normalizing once
#[test]
fn test_grammarNormalize_shouldBeIdempotentOnEngineOutput() {
    let annotator = Annotator::new(common::sample_store());
    let engine = TranslationEngine::default();
    let grammar = GrammarNormalizer::default();

    for page in common::sample_pages() {
        let translated = engine.translate(&annotator.annotate(page)).unwrap();
        let once = grammar.normalize(&translated);
        assert_eq!(grammar.normalize(&once), once, "page: {:?}", page);
    }
}
