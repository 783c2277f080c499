/*!
 * Tests for the terminology store and record loading
 */

use anyhow::Result;
use medtrans::errors::TerminologyError;
use medtrans::terminology::{TableSelector, TermEntry, TermTable, TerminologyStore, load_store, parse_records};

use crate::common;

/// Domain entries shadow general ones for the same key
#[test]
fn test_lookup_prioritized_withTermInBothTables_shouldPreferDomain() {
    let store = TerminologyStore::new(
        TermTable::from_entries([TermEntry::new("pain", "ألم")]),
        TermTable::from_entries([TermEntry::new("pain", "وجع"), TermEntry::new("week", "أسبوع")]),
    );

    let found = store.lookup_prioritized("Pain,").unwrap();
    assert_eq!(found.table, TableSelector::Domain);
    assert_eq!(found.target(), "ألم");

    let general = store.lookup_prioritized("WEEK").unwrap();
    assert_eq!(general.table, TableSelector::General);
    assert_eq!(store.lookup("pain", TableSelector::General), Some("وجع"));
}

/// Tokens with no letters never match
#[test]
fn test_lookup_withNonAlphabeticToken_shouldReturnNone() {
    let store = TerminologyStore::seeded();
    assert!(store.lookup_prioritized("120/80").is_none());
    assert!(store.lookup_prioritized("").is_none());
    assert!(store.lookup("--", TableSelector::Domain).is_none());
}

/// The last write for a key wins
#[test]
fn test_add_withExistingTerm_shouldOverwrite() {
    let mut store = TerminologyStore::seeded();
    store.add(TableSelector::Domain, "fever", "الحمى", Some("symptom"), Some("updated"));

    let entry = store.entry("fever", TableSelector::Domain).unwrap();
    assert_eq!(entry.target_term, "الحمى");
    assert_eq!(entry.definition.as_deref(), Some("updated"));
}

/// Record files skip rows that normalize to nothing
#[test]
fn test_parse_records_withBlankRows_shouldSkipThem() -> Result<()> {
    let table = parse_records(
        r#"[{"english": "fever", "arabic": "حمى"}, {"english": "123", "arabic": "x"}, {"english": "cough", "arabic": " "}]"#,
        "inline",
    )?;
    assert_eq!(table.len(), 1);
    Ok(())
}

/// An array without usable records is an error
#[test]
fn test_parse_records_withNoUsableRecords_shouldFail() {
    assert!(matches!(parse_records("[]", "inline"), Err(TerminologyError::Empty(_))));
    assert!(matches!(parse_records("{}", "inline"), Err(TerminologyError::Parse { .. })));
}

/// A readable record file replaces the seed table
#[tokio::test]
async fn test_load_store_withRecordFile_shouldUseIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "terms.json", common::domain_records_json())?;

    let store = load_store(Some(&path), None).await;

    assert!(!store.is_degraded());
    assert_eq!(store.status().domain_terms, 5);
    assert_eq!(store.lookup("fever", TableSelector::Domain), Some("حمى"));
    // Not in the file, only in the seed set
    assert!(store.lookup("asthma", TableSelector::Domain).is_none());
    Ok(())
}

/// A missing record file degrades to the seed set
#[tokio::test]
async fn test_load_store_withMissingFile_shouldDegradeToSeed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.json");
    let malformed = common::create_test_file(temp_dir.path(), "bad.json", "[{")?;

    let store = load_store(Some(&missing), Some(&malformed)).await;

    let status = store.status();
    assert!(status.degraded);
    assert_eq!(status.reasons.len(), 2);
    assert!(matches!(status.reasons[0], TerminologyError::Io { .. }));
    assert!(matches!(status.reasons[1], TerminologyError::Parse { .. }));
    assert_eq!(store.lookup("asthma", TableSelector::Domain), Some("الربو"));
    Ok(())
}

/// Without configured files both tables come from the seed set
#[test]
fn test_load_store_withoutPaths_shouldUseSeedWithoutDegrading() {
    let store = tokio_test::block_on(load_store(None, None));

    assert!(!store.is_degraded());
    assert_eq!(store.lookup("week", TableSelector::General), Some("أسبوع"));
    assert_eq!(store.status().domain_terms, TerminologyStore::seeded().status().domain_terms);
}

/// The shipped record files load cleanly
#[tokio::test]
async fn test_load_store_withShippedDataFiles_shouldNotDegrade() {
    let data_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("terminology");

    let store = load_store(
        Some(&data_dir.join("medical_terms.json")),
        Some(&data_dir.join("general_terms.json")),
    )
    .await;

    let status = store.status();
    assert!(!status.degraded, "{:?}", status.reasons);
    assert_eq!(status.domain_terms, 58);
    assert_eq!(status.general_terms, 33);
    assert_eq!(store.lookup("X-ray", TableSelector::Domain), Some("أشعة سينية"));
}
