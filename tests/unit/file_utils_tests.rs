/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use medtrans::file_utils::{FileManager, FileType};
use std::path::Path;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.txt", "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/report.txt"),
        Path::new("/tmp/output"),
        "ar",
        "plan.json",
    );

    assert_eq!(output_path, Path::new("/tmp/output/report.ar.plan.json"));
}

/// find_files is recursive and sorted
#[test]
fn test_find_files_withNestedDirs_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    FileManager::ensure_dir(&nested)?;
    common::create_test_file(temp_dir.path(), "b.txt", "b")?;
    common::create_test_file(&nested, "a.TXT", "a")?;
    common::create_test_file(temp_dir.path(), "c.json", "{}")?;

    let files = FileManager::find_files(temp_dir.path(), ".txt")?;

    assert_eq!(files.len(), 2);
    assert!(files.windows(2).all(|w| w[0] <= w[1]));
    Ok(())
}

/// detect_file_type uses extension first, then content
#[test]
fn test_detect_file_type_shouldRecognizeTextAndPdf() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let text = common::create_test_file(temp_dir.path(), "report.txt", "Fever")?;
    let pdf = common::create_test_file(temp_dir.path(), "scan.bin", "%PDF-1.7\n")?;
    let other = common::create_test_file(temp_dir.path(), "notes", "plain words")?;

    assert_eq!(FileManager::detect_file_type(&text)?, FileType::PlainText);
    assert_eq!(FileManager::detect_file_type(&pdf)?, FileType::Pdf);
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::PlainText);
    assert!(FileManager::detect_file_type(temp_dir.path().join("missing.txt")).is_err());
    Ok(())
}

/// append_to_log_file keeps earlier lines
#[test]
fn test_append_to_log_file_shouldAppendTimestampedLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("logs").join("run.log");

    FileManager::append_to_log_file(&log_path, "first")?;
    FileManager::append_to_log_file(&log_path, "second")?;

    let content = FileManager::read_to_string(&log_path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("first"));
    assert!(lines[1].ends_with("second"));
    Ok(())
}
