/*!
 * Integration tests for the page translation pipeline
 */

use parking_lot::Mutex;
use std::sync::Arc;

use medtrans::errors::PageError;
use medtrans::translation::{
    CancelHandle, MarkerCleanup, PageStage, PipelineConfig, PipelineState, ProgressSink, TranslationPipeline,
};

use crate::common;

/// Stage that fails for pages containing a trigger word
struct FailsOn {
    trigger: &'static str,
    panic: bool,
}

impl PageStage for FailsOn {
    fn name(&self) -> &str {
        "grammar"
    }

    fn process(&self, text: &str) -> Result<String, PageError> {
        if text.contains(self.trigger) {
            if self.panic {
                panic!("grammar crashed");
            }
            return Err(PageError::StageFailed {
                stage: "grammar".to_string(),
                message: "bad page".to_string(),
            });
        }
        Ok(text.to_string())
    }
}

/// Sink recording every progress event
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(f32, String)>>,
}

impl ProgressSink for RecordingSink {
    fn on_progress(&self, percent: f32, stage: &str) {
        self.events.lock().push((percent, stage.to_string()));
    }
}

fn pipeline() -> TranslationPipeline {
    common::init_test_logging();
    TranslationPipeline::new(PipelineConfig::default(), common::sample_store())
}

/// Reference sentence loses every English term and marker
#[tokio::test]
async fn test_translateDocument_withReferenceSentence_shouldProduceArabic() {
    let pipeline = pipeline();

    let results = pipeline
        .translate_pages(vec!["The patient has fever and headache.".to_string()])
        .await;

    assert_eq!(results.len(), 1);
    let text = &results[0].text;
    assert!(results[0].succeeded);
    assert!(!text.contains("fever") && !text.contains("headache"));
    assert!(!text.contains("[MED:") && !text.contains("[NORM:"));
    assert!(text.contains("حمى") && text.contains("صداع"));
}

/// Every page comes back, in order, without markers
#[tokio::test]
async fn test_translateDocument_withManyPages_shouldReturnAllInOrder() {
    let pipeline = TranslationPipeline::new(
        PipelineConfig::default().with_max_concurrent_pages(3),
        common::sample_store(),
    );
    let pages: Vec<String> = common::sample_pages()
        .iter()
        .cycle()
        .take(12)
        .map(|p| p.to_string())
        .collect();

    let results = pipeline.translate_pages(pages).await;

    assert_eq!(results.len(), 12);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.page_index, i);
        assert!(!MarkerCleanup::has_markers(&result.text));
    }
    assert_eq!(pipeline.state(), PipelineState::Succeeded);
}

/// A failing page falls back without affecting its neighbours
#[tokio::test]
async fn test_translateDocument_withFailingStage_shouldIsolatePage() {
    for panic in [false, true] {
        let pipeline = pipeline().with_stage(Arc::new(FailsOn { trigger: "صداع", panic }));
        let pages = vec![
            "The patient has cough.".to_string(),
            "Severe headache for 3 days.".to_string(),
            "Patient diagnosed with pneumonia.".to_string(),
        ];

        let results = pipeline.translate_pages(pages).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].succeeded && results[2].succeeded);
        assert!(results[1].used_fallback);
        assert_eq!(results[1].text, "شديد صداع for 3 أيام.");
        assert_eq!(pipeline.state(), PipelineState::Degraded);
    }
}

/// Progress is monotonic and ends at 100
#[tokio::test]
async fn test_translateDocument_withSink_shouldReportMonotonicProgress() {
    let pipeline = pipeline();
    let sink = Arc::new(RecordingSink::default());
    let pages: Vec<String> = common::sample_pages().iter().map(|p| p.to_string()).collect();

    pipeline.translate_document(pages, sink.clone()).await;

    let events = sink.events.lock();
    assert!(events.len() >= 2);
    assert!(events.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(events.last().map(|e| e.0), Some(100.0));
}

/// Cancelling before the run leaves every page out
#[tokio::test]
async fn test_translateDocumentWithCancel_withCancelledHandle_shouldReturnNoPages() {
    let pipeline = pipeline();
    let cancel = CancelHandle::new();
    cancel.cancel();

    let results = pipeline
        .translate_document_with_cancel(
            vec!["fever".to_string(), "cough".to_string()],
            Arc::new(medtrans::translation::pipeline::NoProgress),
            cancel,
        )
        .await;

    assert!(results.is_empty());
    assert_eq!(pipeline.state(), PipelineState::Degraded);
}

/// An empty document succeeds with no pages
#[tokio::test]
async fn test_translateDocument_withNoPages_shouldSucceed() {
    let pipeline = pipeline();
    assert!(pipeline.translate_pages(Vec::new()).await.is_empty());
    assert_eq!(pipeline.state(), PipelineState::Succeeded);
}

/// Fahrenheit readings keep every digit and their unit
#[tokio::test]
async fn test_translateDocument_withFahrenheitReading_shouldKeepValue() {
    let pipeline = pipeline();

    let results = pipeline
        .translate_pages(vec!["Temperature 100.4 F today.".to_string()])
        .await;

    let text = &results[0].text;
    assert!(results[0].succeeded);
    assert!(text.contains("100.4 درجة فهرنهايت"), "{}", text);
    assert!(!text.contains("مئوية"));
    assert!(!text.split_whitespace().any(|w| w == "F"));
}

/// Letter qualifiers of disease names survive function-word removal
#[tokio::test]
async fn test_translateDocument_withLetterQualifiers_shouldKeepLetters() {
    let pipeline = pipeline();

    let results = pipeline
        .translate_pages(vec!["Hepatitis A infection.".to_string(), "Type I diabetes.".to_string()])
        .await;

    let words: Vec<Vec<&str>> = results.iter().map(|r| r.text.split_whitespace().collect()).collect();
    assert!(words[0].contains(&"A"), "{}", results[0].text);
    assert!(results[0].text.contains("عدوى"));
    assert!(words[1].contains(&"I"), "{}", results[1].text);
    assert!(results[1].text.contains("السكري"));
    assert!(!results[1].text.contains("أنا"));
}
