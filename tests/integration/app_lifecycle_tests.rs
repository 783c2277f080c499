/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::sync::Arc;

use medtrans::app_config::Config;
use medtrans::app_controller::{Controller, RUN_LOG_FILE, RunOutcome};
use medtrans::document::{OutputDocumentPlan, UnitKind};
use medtrans::errors::DocumentError;
use medtrans::translation::PipelineState;

use crate::common;

/// Translate a three-page document and check both outputs
#[tokio::test]
async fn test_run_withTextDocument_shouldWritePlanAndText() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), "report.txt", &common::sample_pages())?;
    let output_dir = temp_dir.path().join("out");

    let controller = Controller::with_config(common::test_config(temp_dir.path())?)
        .await?
        .with_progress(false);
    let outcome = controller.run(input.clone(), output_dir.clone(), false).await?;

    let RunOutcome::Translated(summary) = outcome else {
        panic!("expected a translated document");
    };
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.fallback_pages, 0);
    assert_eq!(summary.missing_pages, 0);
    assert_eq!(summary.state, PipelineState::Succeeded);
    assert!(!summary.degraded_terminology);

    let plan_path = output_dir.join("report.ar.plan.json");
    let plan: OutputDocumentPlan = serde_json::from_str(&std::fs::read_to_string(&plan_path)?)?;
    assert!(plan.validate().is_ok());
    assert_eq!(plan.original_page_count, 3);
    assert!(plan.has_glossary());
    assert_eq!(plan.len(), 7);
    for unit in plan.units_of(UnitKind::Translated) {
        let text = unit.content.text().unwrap_or_default();
        assert!(!text.contains("[MED:") && !text.contains("[NORM:"));
    }

    let text = std::fs::read_to_string(output_dir.join("report.ar.txt"))?;
    assert_eq!(text.split('\u{000C}').count(), 7);
    assert!(text.contains("fever: حمى (Raised body temperature)"));

    assert!(output_dir.join(RUN_LOG_FILE).exists());
    Ok(())
}

/// Existing outputs are kept unless overwriting is forced
#[tokio::test]
async fn test_run_withExistingOutputs_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), "report.txt", &["Fever."])?;
    let output_dir = temp_dir.path().to_path_buf();
    let controller = Controller::with_config(Config::default()).await?.with_progress(false);

    assert!(matches!(
        controller.run(input.clone(), output_dir.clone(), false).await?,
        RunOutcome::Translated(_)
    ));
    assert!(matches!(
        controller.run(input.clone(), output_dir.clone(), false).await?,
        RunOutcome::Skipped(_)
    ));
    assert!(matches!(
        controller.run(input, output_dir, true).await?,
        RunOutcome::Translated(_)
    ));
    Ok(())
}

/// Disabling the glossary drops the trailing unit
#[tokio::test]
async fn test_run_withGlossaryDisabled_shouldOmitGlossaryUnit() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), "note.txt", &["Fever and cough.", "Rest at home."])?;
    let mut config = Config::default();
    config.glossary.enabled = false;
    config.output.write_text = false;

    let controller = Controller::with_config(config).await?.with_progress(false);
    controller.run(input, temp_dir.path().to_path_buf(), false).await?;

    let plan: OutputDocumentPlan =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("note.ar.plan.json"))?)?;
    assert_eq!(plan.len(), 4);
    assert!(!plan.has_glossary());
    assert!(!temp_dir.path().join("note.ar.txt").exists());
    Ok(())
}

/// A missing terminology file degrades instead of failing
#[tokio::test]
async fn test_withConfig_withMissingTermsFile_shouldRunDegraded() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = Config::default();
    config.terminology.domain_path = Some(temp_dir.path().join("missing.json"));

    let controller = Controller::with_config(config).await?;

    assert!(controller.store().is_degraded());
    Ok(())
}

/// An invalid configuration is rejected up front
#[tokio::test]
async fn test_withConfig_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.pipeline.max_concurrent_pages = 0;

    assert!(Controller::with_config(config).await.is_err());
}

/// An empty document aborts with an extraction error
#[tokio::test]
async fn test_run_withEmptyDocument_shouldFailExtraction() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "blank.txt", "\n\n")?;
    let controller = Controller::with_config(Config::default()).await?.with_progress(false);

    let error = controller
        .run(input, temp_dir.path().to_path_buf(), false)
        .await
        .unwrap_err();

    let app_error = error.downcast_ref::<medtrans::AppError>();
    assert!(matches!(
        app_error,
        Some(medtrans::AppError::Document(DocumentError::ExtractionFailed(_)))
    ));
    Ok(())
}

/// PDF input is refused with a conversion hint
#[tokio::test]
async fn test_run_withPdfInput_shouldAskForConversion() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "scan.pdf", "%PDF-1.4")?;
    let controller = Controller::with_config(Config::default()).await?.with_progress(false);

    let error = controller
        .run(input, temp_dir.path().to_path_buf(), false)
        .await
        .unwrap_err();
    assert!(error.to_string().contains("pdftotext"));
    Ok(())
}

/// A folder run translates inputs and ignores its own outputs
#[tokio::test]
async fn test_runFolder_shouldProcessEveryDocumentOnce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_document(temp_dir.path(), "a.txt", &["Fever."])?;
    common::create_test_document(temp_dir.path(), "b.txt", &["Cough.", "Rest."])?;
    common::create_test_file(temp_dir.path(), "empty.txt", "")?;
    let controller = Controller::with_config(Config::default())
        .await?
        .with_progress(false);

    let first = controller.run_folder(temp_dir.path().to_path_buf(), None, false).await?;
    assert_eq!((first.processed, first.skipped, first.errors), (2, 0, 1));
    assert!(temp_dir.path().join("a.ar.txt").exists());

    // Second run sees the .ar.txt outputs but does not translate them
    let second = controller.run_folder(temp_dir.path().to_path_buf(), None, false).await?;
    assert_eq!((second.processed, second.skipped, second.errors), (0, 2, 1));
    Ok(())
}

/// A custom extractor replaces the file reader
#[tokio::test]
async fn test_withExtractor_shouldUseCustomPages() -> Result<()> {
    struct Fixed;

    #[async_trait::async_trait]
    impl medtrans::document::TextExtractor for Fixed {
        async fn extract_page_texts(
            &self,
            _document: &medtrans::document::DocumentHandle,
        ) -> Result<Vec<String>, DocumentError> {
            Ok(vec!["Fever.".to_string(); 4])
        }
    }

    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "any.txt", "ignored")?;
    let controller = Controller::with_config(Config::default())
        .await?
        .with_extractor(Arc::new(Fixed))
        .with_progress(false);

    let RunOutcome::Translated(summary) = controller.run(input, temp_dir.path().to_path_buf(), false).await? else {
        panic!("expected a translated document");
    };
    assert_eq!(summary.pages, 4);
    Ok(())
}
