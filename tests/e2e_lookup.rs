// SocLookup - tests/e2e_lookup.rs
//
// End-to-end tests for the lookup pipeline.
//
// These tests exercise the real file-backed store in a temporary directory,
// the real built-in service catalog and the real batch worker thread. Only
// the browser is replaced, by an opener that records what it was asked to
// open.

use soclookup::app::batch::{BatchProgress, BatchRequest};
use soclookup::app::state::{AppState, LookupResult};
use soclookup::core::classifier;
use soclookup::core::dispatch::UrlOpener;
use soclookup::core::export;
use soclookup::core::model::{ArtifactType, ClassificationOutcome};
use soclookup::core::resolver::{self, ServiceFilter};
use soclookup::core::store::KeyValueStore;
use soclookup::platform::config::AppConfig;
use soclookup::platform::store::FileStore;
use soclookup::util::error::BrowserError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to an on-disk fixture file.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[derive(Default)]
struct RecordingOpener {
    opened: Mutex<Vec<Url>>,
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &Url, _in_background: bool) -> Result<(), BrowserError> {
        self.opened.lock().unwrap().push(url.clone());
        Ok(())
    }
}

/// Fresh state backed by a `FileStore` in `dir`.
fn open_state(dir: &Path, opener: Arc<dyn UrlOpener>, config: AppConfig) -> AppState {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir));
    AppState::new(store, opener, config)
}

fn quiet_config() -> AppConfig {
    AppConfig {
        batch_delay: Duration::ZERO,
        ..AppConfig::default()
    }
}

// =============================================================================
// Persistence E2E
// =============================================================================

/// Service toggles and history survive a reload from disk.
#[test]
fn e2e_state_persists_across_reload() {
    let dir = TempDir::new().unwrap();

    {
        let mut state = open_state(
            dir.path(),
            Arc::new(RecordingOpener::default()),
            quiet_config(),
        );
        assert_eq!(state.catalog.toggle("shodan"), Some(false));
        state.lookup("8.8.8.8", None, false, true);
        state.lookup("example.com", None, false, true);
    }

    assert!(dir.path().join("enabledServices.json").exists());
    assert!(dir.path().join("searchHistory.json").exists());

    let state = open_state(
        dir.path(),
        Arc::new(RecordingOpener::default()),
        quiet_config(),
    );
    assert!(!state.catalog.get("shodan").unwrap().enabled);

    let history = state.history();
    let values: Vec<&str> = history.records().iter().map(|r| r.value.as_str()).collect();
    assert_eq!(values, vec!["example.com", "8.8.8.8"]);
    assert_eq!(history.records()[0].kind, ArtifactType::Domain);
}

/// A corrupt history file loads as empty instead of failing.
#[test]
fn e2e_corrupt_history_file_falls_back_to_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("searchHistory.json"), b"{ not json").unwrap();

    let state = open_state(
        dir.path(),
        Arc::new(RecordingOpener::default()),
        quiet_config(),
    );
    assert!(state.history().is_empty());
}

/// A persisted history larger than the configured bound is truncated.
#[test]
fn e2e_history_bound_applies_on_reload() {
    let dir = TempDir::new().unwrap();
    {
        let state = open_state(
            dir.path(),
            Arc::new(RecordingOpener::default()),
            quiet_config(),
        );
        for n in 1..=8 {
            state.lookup(&format!("10.0.0.{n}"), None, false, true);
        }
    }

    let config = AppConfig {
        max_history: 3,
        ..quiet_config()
    };
    let state = open_state(dir.path(), Arc::new(RecordingOpener::default()), config);
    let history = state.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history.records()[0].value, "10.0.0.8");
}

// =============================================================================
// Lookup and resolve E2E
// =============================================================================

/// Disabled services are left out of a lookup but included with `All`.
#[test]
fn e2e_lookup_opens_only_enabled_services() {
    let dir = TempDir::new().unwrap();
    let opener = Arc::new(RecordingOpener::default());
    let mut state = open_state(dir.path(), opener.clone(), quiet_config());

    state.catalog.set_enabled("vt-ip", false);

    let result = state.lookup("1.1.1.1", None, true, true);
    let urls = match result {
        LookupResult::Resolved { urls, opened, .. } => {
            assert_eq!(opened, urls.len());
            urls
        }
        other => panic!("expected resolution, got {other:?}"),
    };

    assert!(urls.iter().all(|u| u.host_str() != Some("www.virustotal.com")));
    assert_eq!(opener.opened.lock().unwrap().as_slice(), urls.as_slice());

    let all = resolver::resolve(&state.catalog, ArtifactType::Ip, "1.1.1.1", ServiceFilter::All);
    assert!(all.len() > urls.len());
}

/// "AS15169" and "15169" produce the same URLs.
#[test]
fn e2e_asn_prefix_is_normalised() {
    let dir = TempDir::new().unwrap();
    let state = open_state(
        dir.path(),
        Arc::new(RecordingOpener::default()),
        quiet_config(),
    );

    let prefixed = resolver::resolve(
        &state.catalog,
        ArtifactType::Asn,
        "AS15169",
        ServiceFilter::EnabledOnly,
    );
    let bare = resolver::resolve(
        &state.catalog,
        ArtifactType::Asn,
        "15169",
        ServiceFilter::EnabledOnly,
    );
    assert!(!prefixed.is_empty());
    assert_eq!(prefixed, bare);
    assert!(prefixed.iter().all(|u| !u.as_str().contains("ASAS")));
}

// =============================================================================
// Batch E2E
// =============================================================================

/// The fixture file runs through the real worker thread: invalid lines are
/// skipped, valid ones are opened and recorded.
#[test]
fn e2e_batch_from_fixture_file() {
    let dir = TempDir::new().unwrap();
    let opener = Arc::new(RecordingOpener::default());
    let mut state = open_state(dir.path(), opener.clone(), quiet_config());

    let text = std::fs::read_to_string(fixture("indicators.txt")).unwrap();
    state.start_batch(BatchRequest::from_text(
        &text,
        ArtifactType::Domain,
        20,
        Duration::ZERO,
    ));

    let mut skipped = Vec::new();
    let mut summary = None;
    while let Some(progress) = state.batch.recv_progress() {
        match progress {
            BatchProgress::ItemSkipped { value, .. } => skipped.push(value),
            BatchProgress::Completed(s) => summary = Some(s),
            BatchProgress::Cancelled(_) => panic!("batch was not cancelled"),
            _ => {}
        }
    }

    let summary = summary.expect("batch completed");
    assert_eq!(summary.submitted, 9);
    assert_eq!(summary.queued, 9);
    assert_eq!(summary.processed, 7);
    assert_eq!(skipped, vec!["192.168.001.1", "not an indicator"]);

    assert_eq!(state.history().len(), 7);
    assert!(state
        .history()
        .records()
        .iter()
        .all(|r| r.kind == ArtifactType::Domain));
    assert!(!opener.opened.lock().unwrap().is_empty());
}

/// Only the first `max_items` non-empty lines are processed.
#[test]
fn e2e_batch_respects_max_items() {
    let dir = TempDir::new().unwrap();
    let mut state = open_state(
        dir.path(),
        Arc::new(RecordingOpener::default()),
        quiet_config(),
    );

    state.start_batch(BatchRequest::from_text(
        "8.8.8.8\n1.1.1.1\n9.9.9.9\n8.8.4.4\n1.0.0.1",
        ArtifactType::Ip,
        3,
        Duration::ZERO,
    ));

    let mut last = None;
    while let Some(progress) = state.batch.recv_progress() {
        last = Some(progress);
    }
    match last {
        Some(BatchProgress::Completed(summary)) => {
            assert_eq!(summary.processed, 3);
            assert_eq!(summary.submitted, 5);
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

// =============================================================================
// Export E2E
// =============================================================================

/// CSV export parses back to the same (type, value) pairs in order.
#[test]
fn e2e_history_csv_round_trip() {
    let dir = TempDir::new().unwrap();
    let state = open_state(
        dir.path(),
        Arc::new(RecordingOpener::default()),
        quiet_config(),
    );
    state.lookup("example.com", None, false, true);
    state.lookup("AS15169", None, false, true);
    state.lookup("analyst@example.org", None, false, true);

    let csv_text = state.history().export_csv().unwrap();
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let rows: Vec<(String, String)> = reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[1].to_string(), r[2].to_string())
        })
        .collect();

    assert_eq!(
        rows,
        vec![
            ("Email".to_string(), "analyst@example.org".to_string()),
            ("ASN".to_string(), "AS15169".to_string()),
            ("Domain".to_string(), "example.com".to_string()),
        ]
    );
}

/// JSON export is an array of {timestamp, type, value} objects.
#[test]
fn e2e_history_json_export() {
    let dir = TempDir::new().unwrap();
    let state = open_state(
        dir.path(),
        Arc::new(RecordingOpener::default()),
        quiet_config(),
    );
    state.lookup("8.8.8.8", None, false, true);

    let json = state.history().export_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["type"], "IP");
    assert_eq!(rows[0]["value"], "8.8.8.8");
    assert!(rows[0]["timestamp"].as_str().unwrap().ends_with('Z'));
}

/// The validation report marks each fixture line valid or invalid.
#[test]
fn e2e_validation_report_from_fixture() {
    let text = std::fs::read_to_string(fixture("indicators.txt")).unwrap();
    let results = classifier::validate_batch(&text);
    assert_eq!(results.len(), 9);
    assert_eq!(results[0].1, ClassificationOutcome::Valid(ArtifactType::Ip));
    assert_eq!(results[7].1, ClassificationOutcome::Valid(ArtifactType::Ip));
    assert!(!results[8].1.is_valid());

    let mut buf = Vec::new();
    export::export_validation_csv(&results, &mut buf).unwrap();
    let report = String::from_utf8(buf).unwrap();
    let mut lines = report.lines();
    assert_eq!(lines.next(), Some("Index,Value,Status,Error"));
    assert!(report.contains("5,192.168.001.1,Invalid,unrecognized format"));
}
