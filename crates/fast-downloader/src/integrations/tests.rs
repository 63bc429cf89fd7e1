//! Session-level tests: extraction, import and batch opening end to end

use super::*;
use crate::batch::LinkStore;
use crate::config::SessionConfig;
use crate::core::{LinkError, ProgressCallback, ProgressEvent};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

/// Helper struct to capture progress events during testing
#[derive(Debug, Default, Clone)]
struct ProgressCapture {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl ProgressCapture {
    fn get_callback(&self) -> ProgressCallback {
        let events = self.events.clone();
        Arc::new(move |event| {
            events.lock().unwrap().push(event);
        })
    }

    fn get_events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    fn count(&self, matches: fn(&ProgressEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| matches(e)).count()
    }
}

/// Opener that records every link and can be told to fail on some of them
#[derive(Debug, Default, Clone)]
struct RecordingOpener {
    opened: Arc<Mutex<Vec<String>>>,
    opened_at: Arc<Mutex<Vec<Instant>>>,
    fail_containing: Option<&'static str>,
}

impl RecordingOpener {
    fn failing_on(pattern: &'static str) -> Self {
        Self {
            fail_containing: Some(pattern),
            ..Self::default()
        }
    }

    fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    fn opened_at(&self) -> Vec<Instant> {
        self.opened_at.lock().unwrap().clone()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&mut self, url: &str) -> io::Result<()> {
        self.opened_at.lock().unwrap().push(Instant::now());
        self.opened.lock().unwrap().push(url.to_string());
        match self.fail_containing {
            Some(pattern) if url.contains(pattern) => Err(io::Error::other("no browser")),
            _ => Ok(()),
        }
    }
}

/// Consent that records how often it was asked
#[derive(Debug, Clone)]
struct CountingConsent {
    answer: bool,
    asked: Arc<Mutex<usize>>,
}

impl CountingConsent {
    fn new(answer: bool) -> Self {
        Self { answer, asked: Arc::new(Mutex::new(0)) }
    }

    fn asked(&self) -> usize {
        *self.asked.lock().unwrap()
    }
}

impl OverwriteConsent for CountingConsent {
    fn allow_overwrite(&mut self, _path: &Path) -> bool {
        *self.asked.lock().unwrap() += 1;
        self.answer
    }
}

fn config(dir: &TempDir) -> SessionConfig {
    SessionConfig::default()
        .with_links_path(dir.path().join("output.txt"))
        .with_open_delay(Duration::ZERO)
}

fn session(dir: &TempDir, opener: RecordingOpener) -> LinkSession {
    LinkSession::new(config(dir))
        .unwrap()
        .with_opener(opener)
        .with_consent(AlwaysOverwrite)
}

fn manifest(mod_ids: std::ops::Range<u64>) -> Vec<u8> {
    let archives: Vec<Value> = mod_ids
        .map(|id| json!({"Name": format!("mod-{id}.7z"), "State": {"ModID": id, "FileID": id * 10, "GameName": "SkyrimSpecialEdition"}}))
        .collect();
    serde_json::to_vec(&json!({"Name": "Test List", "Archives": archives})).unwrap()
}

fn url(id: u64) -> String {
    format!("https://www.nexusmods.com/skyrimspecialedition/mods/{id}?tab=files&file_id={}", id * 10)
}

#[cfg(test)]
mod extraction_tests {
    use super::*;

    #[test]
    fn scenario_a_skips_incomplete_entry() {
        let dir = tempdir().unwrap();
        let mut session = session(&dir, RecordingOpener::default());
        let bytes = br#"{"Archives": [
            {"State": {"ModID": 1, "FileID": 10, "GameName": "Skyrim"}},
            {"State": {"ModID": 2}}
        ]}"#;

        let summary = session.extract_and_store(bytes).unwrap();

        assert_eq!(summary.total_count, 1);
        assert_eq!(summary.skipped_count, 1);
        assert_eq!(summary.total_batches, 1);
        assert_eq!(
            session.store().read().unwrap(),
            vec!["https://www.nexusmods.com/skyrim/mods/1?tab=files&file_id=10".to_string()]
        );
    }

    #[test]
    fn scenario_b_empty_manifest_has_nothing_to_import() {
        let dir = tempdir().unwrap();
        let mut session = session(&dir, RecordingOpener::default());

        let summary = session.extract_and_store(br#"{"Archives": []}"#).unwrap();
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.total_batches, 0);
        assert!(session.store().exists());

        assert_eq!(
            session.import_existing().unwrap(),
            ImportOutcome::NothingToImport { reason: NothingReason::Empty }
        );
        assert!(session.cursor().is_none());
        assert_eq!(session.next_batch().unwrap(), BatchOutcome::NoCursor);
    }

    #[test]
    fn mixed_manifest_keeps_good_links_in_order() {
        let dir = tempdir().unwrap();
        let mut session = session(&dir, RecordingOpener::default());
        let archives = json!([
            {"State": {"ModID": 1, "FileID": 10, "GameName": "SkyrimSpecialEdition"}},
            "not an entry",
            {"State": {"$type": "HttpDownloader, Wabbajack.Lib", "Url": "https://example.com/a.zip"}},
            {"State": {"ModID": 2, "FileID": 20, "GameName": "SkyrimSpecialEdition"}},
            {"State": {"ModID": 3, "FileID": 30, "GameName": "SkyrimSpecialEdition"}},
            {"NoState": true},
        ]);
        let bytes = serde_json::to_vec(&json!({"Archives": archives})).unwrap();

        let summary = session.extract_and_store(&bytes).unwrap();

        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.skipped_count, 3);
        let indices: Vec<usize> = summary.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 5]);
        assert_eq!(session.store().read().unwrap(), vec![url(1), url(2), url(3)]);
    }

    #[test]
    fn parse_error_leaves_previous_state_untouched() {
        let dir = tempdir().unwrap();
        let mut session = session(&dir, RecordingOpener::default());
        session.extract_and_store(&manifest(1..26)).unwrap();
        session.next_batch().unwrap();

        let err = session.extract_and_store(b"{ this is not json").unwrap_err();

        assert!(matches!(err, LinkError::ManifestParse { .. }));
        assert_eq!(session.store().count().unwrap(), 25);
        assert_eq!(session.tracker().processed(), 20);
        assert_eq!(session.cursor().unwrap().yielded(), 20);
    }

    #[test]
    fn declined_overwrite_keeps_old_list_and_cursor() {
        let dir = tempdir().unwrap();
        let consent = CountingConsent::new(false);
        let mut session = LinkSession::new(config(&dir))
            .unwrap()
            .with_opener(RecordingOpener::default())
            .with_consent(consent.clone());

        // No existing file: consent is not consulted
        session.extract_and_store(&manifest(1..4)).unwrap();
        assert_eq!(consent.asked(), 0);

        let err = session.extract_and_store(&manifest(10..50)).unwrap_err();

        assert!(matches!(err, LinkError::OverwriteDeclined { .. }));
        assert!(err.is_recoverable());
        assert_eq!(consent.asked(), 1);
        assert_eq!(session.store().read().unwrap(), vec![url(1), url(2), url(3)]);
        assert_eq!(session.cursor().unwrap().total(), 3);
    }

    #[test]
    fn declined_overwrite_reports_no_skips() {
        let dir = tempdir().unwrap();
        let progress = ProgressCapture::default();
        let mut session = LinkSession::new(config(&dir))
            .unwrap()
            .with_opener(RecordingOpener::default())
            .with_consent(NeverOverwrite)
            .with_progress_callback(progress.get_callback());
        std::fs::write(dir.path().join("output.txt"), "https://example.com/old\n").unwrap();

        let err = session
            .extract_and_store(br#"{"Archives": [{"State": {"ModID": 1, "FileID": 1, "GameName": "X"}}, 5]}"#)
            .unwrap_err();

        assert!(matches!(err, LinkError::OverwriteDeclined { .. }));
        assert_eq!(progress.count(|e| matches!(e, ProgressEvent::EntrySkipped { .. })), 0);
        assert_eq!(progress.count(|e| matches!(e, ProgressEvent::Extracted { .. })), 0);
    }

    #[test]
    fn missing_modlist_file_is_not_a_missing_link_list() {
        let dir = tempdir().unwrap();
        let mut session = session(&dir, RecordingOpener::default());

        let err = session.extract_file(&dir.path().join("Lorerim.wabbajack")).unwrap_err();

        assert!(matches!(err, LinkError::ModlistNotFound { .. }));
        assert!(!err.suggestion().unwrap().contains("Extract a modlist"));
        assert!(!session.store().exists());
    }

    #[test]
    fn default_session_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("output.txt"), "https://example.com/old\n").unwrap();
        let mut session = LinkSession::new(config(&dir)).unwrap();

        let err = session.extract_and_store(&manifest(1..2)).unwrap_err();
        assert_eq!(err.category(), "overwrite_declined");
    }

    #[test]
    fn extract_file_reads_wabbajack_archive() {
        use std::io::Write;

        let dir = tempdir().unwrap();
        let archive_path = dir.path().join("list.wabbajack");
        let mut writer = zip::ZipWriter::new(std::fs::File::create(&archive_path).unwrap());
        writer.start_file("modlist", zip::write::FileOptions::default()).unwrap();
        writer.write_all(&manifest(1..6)).unwrap();
        writer.finish().unwrap();

        let mut session = session(&dir, RecordingOpener::default());
        let summary = session.extract_file(&archive_path).unwrap();

        assert_eq!(summary.total_count, 5);
        assert_eq!(summary.metadata.name.as_deref(), Some("Test List"));
    }
}

#[cfg(test)]
mod import_tests {
    use super::*;

    #[test]
    fn scenario_d_missing_list_is_nothing_to_import() {
        let dir = tempdir().unwrap();
        let mut session = session(&dir, RecordingOpener::default());

        assert_eq!(
            session.import_existing().unwrap(),
            ImportOutcome::NothingToImport { reason: NothingReason::Missing }
        );
        assert_eq!(session.next_batch().unwrap(), BatchOutcome::NoCursor);
        assert_eq!(session.next_batch().unwrap().opened_count(), 0);
    }

    #[test]
    fn import_is_idempotent_without_writes() {
        let dir = tempdir().unwrap();
        LinkStore::new(dir.path().join("output.txt"))
            .write(&(1..46).map(url).collect::<Vec<_>>())
            .unwrap();
        let mut session = session(&dir, RecordingOpener::default());

        let first = session.import_existing().unwrap();
        let second = session.import_existing().unwrap();

        assert_eq!(first, second);
        assert_eq!(first, ImportOutcome::Imported(ImportSummary { total_count: 45, total_batches: 3 }));
    }

    #[test]
    fn reimport_restarts_from_the_beginning() {
        let dir = tempdir().unwrap();
        let opener = RecordingOpener::default();
        let mut session = session(&dir, opener.clone());
        session.extract_and_store(&manifest(1..6)).unwrap();
        session = LinkSession::new(config(&dir).with_batch_size(2))
            .unwrap()
            .with_opener(opener.clone());
        session.import_existing().unwrap();
        session.next_batch().unwrap();

        session.import_existing().unwrap();
        assert_eq!(session.tracker().processed(), 0);
        session.next_batch().unwrap();

        assert_eq!(opener.opened(), vec![url(1), url(2), url(1), url(2)]);
    }

    #[test]
    fn zero_batch_size_is_rejected_at_construction() {
        let dir = tempdir().unwrap();
        let err = LinkSession::new(config(&dir).with_batch_size(0)).unwrap_err();
        assert!(matches!(err, LinkError::Configuration { .. }));
    }
}

#[cfg(test)]
mod batch_tests {
    use super::*;

    #[test]
    fn scenario_c_forty_five_links_open_in_three_batches() {
        let dir = tempdir().unwrap();
        let opener = RecordingOpener::default();
        let progress = ProgressCapture::default();
        let mut session = session(&dir, opener.clone()).with_progress_callback(progress.get_callback());

        let summary = session.extract_and_store(&manifest(1..46)).unwrap();
        assert_eq!(summary.total_count, 45);
        assert_eq!(summary.total_batches, 3);

        let counts: Vec<usize> = (0..3).map(|_| session.next_batch().unwrap().opened_count()).collect();
        assert_eq!(counts, vec![20, 20, 5]);
        assert!(session.tracker().is_complete());

        assert_eq!(
            session.next_batch().unwrap(),
            BatchOutcome::Exhausted { processed_total: 45, total: 45 }
        );

        assert_eq!(opener.opened(), (1..46).map(url).collect::<Vec<_>>());
        assert_eq!(progress.count(|e| matches!(e, ProgressEvent::LinkOpened { .. })), 45);
        assert_eq!(progress.count(|e| matches!(e, ProgressEvent::BatchComplete { .. })), 3);
        assert_eq!(progress.count(|e| matches!(e, ProgressEvent::Completed { .. })), 1);
    }

    #[test]
    fn open_delay_separates_opens_but_not_the_first() {
        let dir = tempdir().unwrap();
        let delay = Duration::from_millis(150);
        let opener = RecordingOpener::default();
        let mut session = LinkSession::new(config(&dir).with_open_delay(delay))
            .unwrap()
            .with_opener(opener.clone())
            .with_consent(AlwaysOverwrite);
        session.extract_and_store(&manifest(1..4)).unwrap();

        let started = Instant::now();
        assert_eq!(session.next_batch().unwrap().opened_count(), 3);

        let opened_at = opener.opened_at();
        assert_eq!(opened_at.len(), 3);
        assert!(opened_at[0].duration_since(started) < delay);
        for pair in opened_at.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= delay);
        }
        assert!(started.elapsed() >= delay * 2);
    }

    #[test]
    fn batch_report_tracks_running_totals() {
        let dir = tempdir().unwrap();
        let mut session = session(&dir, RecordingOpener::default());
        session.extract_and_store(&manifest(1..26)).unwrap();

        match session.next_batch().unwrap() {
            BatchOutcome::Opened(report) => {
                assert_eq!(report.batch_index, 0);
                assert_eq!(report.opened_count, 20);
                assert_eq!(report.processed_total, 20);
                assert_eq!(report.total, 25);
                assert!(report.failed.is_empty());
            }
            other => panic!("expected a batch, got {other:?}"),
        }
        assert!(!session.tracker().is_complete());
    }

    #[test]
    fn failed_opens_are_reported_and_still_processed() {
        let dir = tempdir().unwrap();
        let opener = RecordingOpener::failing_on("/mods/2?");
        let progress = ProgressCapture::default();
        let mut session = session(&dir, opener.clone()).with_progress_callback(progress.get_callback());
        session.extract_and_store(&manifest(1..4)).unwrap();

        let BatchOutcome::Opened(report) = session.next_batch().unwrap() else {
            panic!("expected a batch");
        };

        assert_eq!(report.opened_count, 3);
        assert_eq!(report.failed, vec![url(2)]);
        assert_eq!(opener.opened().len(), 3);
        assert!(session.tracker().is_complete());
        assert!(progress
            .get_events()
            .contains(&ProgressEvent::OpenFailed { url: url(2), error: "no browser".into() }));
    }

    #[test]
    fn re_extraction_replaces_cursor_mid_way() {
        let dir = tempdir().unwrap();
        let opener = RecordingOpener::default();
        let mut session = session(&dir, opener.clone());
        session.extract_and_store(&manifest(1..46)).unwrap();
        session.next_batch().unwrap();

        let summary = session.extract_and_store(&manifest(100..103)).unwrap();
        assert_eq!(summary.total_count, 3);
        assert_eq!(session.tracker().processed(), 0);
        assert_eq!(session.tracker().total(), 3);

        assert_eq!(session.next_batch().unwrap().opened_count(), 3);
        assert_eq!(&opener.opened()[20..], &[url(100), url(101), url(102)]);
    }

    #[test]
    fn import_and_extract_emit_events() {
        let dir = tempdir().unwrap();
        let progress = ProgressCapture::default();
        let mut session = session(&dir, RecordingOpener::default()).with_progress_callback(progress.get_callback());

        session
            .extract_and_store(br#"{"Archives": [{"State": {"ModID": 1, "FileID": 1, "GameName": "X"}}, 5]}"#)
            .unwrap();

        let events = progress.get_events();
        assert!(events.contains(&ProgressEvent::EntrySkipped {
            index: 1,
            reason: "invalid entry format: entry is a number".into(),
        }));
        assert!(events.contains(&ProgressEvent::Extracted { total: 1, skipped: 1 }));
        assert!(events.contains(&ProgressEvent::Imported { total: 1, total_batches: 1 }));
    }

    #[test]
    fn outcomes_serialize_with_tags() {
        let outcome = ImportOutcome::NothingToImport { reason: NothingReason::Missing };
        assert_eq!(
            serde_json::to_value(outcome).unwrap(),
            json!({"outcome": "nothing_to_import", "reason": "missing"})
        );
        let outcome = ImportOutcome::Imported(ImportSummary { total_count: 45, total_batches: 3 });
        assert_eq!(
            serde_json::to_value(outcome).unwrap(),
            json!({"outcome": "imported", "total_count": 45, "total_batches": 3})
        );
        assert_eq!(serde_json::to_value(BatchOutcome::NoCursor).unwrap(), json!({"outcome": "no_cursor"}));
    }
}
