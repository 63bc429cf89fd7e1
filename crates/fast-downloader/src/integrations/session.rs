//! High-level session API
//!
//! A [`LinkSession`] ties the pieces together the way a front end uses them:
//! extract a modlist into the link list, import the list into a fresh cursor,
//! then open one batch at a time while the tracker counts progress.

use std::path::Path;
use std::thread;
use serde::Serialize;
use tracing::{debug, info, warn};
use crate::batch::{BatchCursor, BatchPull, LinkStore, ProgressTracker};
use crate::config::SessionConfig;
use crate::core::{LinkError, ProgressCallback, ProgressEvent, Result};
use crate::integrations::opener::{BrowserOpener, LinkOpener, NeverOverwrite, OverwriteConsent};
use crate::parse_wabbajack::{read_modlist, ManifestExtractor, ManifestMetadata, SkippedEntry};

/// Totals of a freshly imported link list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total_count: usize,
    pub total_batches: usize,
}

/// Why an import found nothing to work on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NothingReason {
    /// The link list file does not exist
    Missing,
    /// The link list holds no links
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    Imported(ImportSummary),
    NothingToImport { reason: NothingReason },
}

impl ImportOutcome {
    pub fn total_count(&self) -> usize {
        match self {
            ImportOutcome::Imported(summary) => summary.total_count,
            ImportOutcome::NothingToImport { .. } => 0,
        }
    }

    pub fn total_batches(&self) -> usize {
        match self {
            ImportOutcome::Imported(summary) => summary.total_batches,
            ImportOutcome::NothingToImport { .. } => 0,
        }
    }
}

/// Result of extracting a modlist into the link list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractSummary {
    pub total_count: usize,
    pub skipped_count: usize,
    pub total_batches: usize,
    pub skipped: Vec<SkippedEntry>,
    pub metadata: ManifestMetadata,
}

/// What one call to [`LinkSession::next_batch`] did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub batch_index: usize,
    /// Links handed to the opener in this call
    pub opened_count: usize,
    /// Links the opener reported an error for; they still count as processed
    pub failed: Vec<String>,
    pub processed_total: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    Opened(BatchReport),
    /// The cursor has no batches left
    Exhausted { processed_total: usize, total: usize },
    /// Nothing has been imported yet
    NoCursor,
}

impl BatchOutcome {
    /// Links processed by this call
    pub fn opened_count(&self) -> usize {
        match self {
            BatchOutcome::Opened(report) => report.opened_count,
            _ => 0,
        }
    }
}

/// Extraction, import and batch opening over one link list
pub struct LinkSession {
    config: SessionConfig,
    store: LinkStore,
    extractor: ManifestExtractor,
    cursor: Option<BatchCursor>,
    tracker: ProgressTracker,
    opener: Box<dyn LinkOpener>,
    consent: Box<dyn OverwriteConsent>,
    progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for LinkSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkSession")
            .field("config", &self.config)
            .field("cursor", &self.cursor)
            .field("tracker", &self.tracker)
            .finish()
    }
}

impl LinkSession {
    /// Create a session that opens links in the browser and never overwrites
    /// an existing list until a consent collaborator says otherwise
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: LinkStore::new(config.links_path.clone()),
            config,
            extractor: ManifestExtractor::new(),
            cursor: None,
            tracker: ProgressTracker::default(),
            opener: Box::new(BrowserOpener),
            consent: Box::new(NeverOverwrite),
            progress_callback: None,
        })
    }

    pub fn with_opener<O: LinkOpener + 'static>(mut self, opener: O) -> Self {
        self.opener = Box::new(opener);
        self
    }

    pub fn with_consent<C: OverwriteConsent + 'static>(mut self, consent: C) -> Self {
        self.consent = Box::new(consent);
        self
    }

    pub fn with_extractor(mut self, extractor: ManifestExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Use a custom progress callback
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressEvent) + Send + Sync + 'static,
    {
        self.progress_callback = Some(std::sync::Arc::new(callback));
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &LinkStore {
        &self.store
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn cursor(&self) -> Option<&BatchCursor> {
        self.cursor.as_ref()
    }

    /// Load the stored link list into a fresh cursor
    ///
    /// A missing or empty list is not an error; the session is left without a
    /// cursor and with an empty tracker.
    pub fn import_existing(&mut self) -> Result<ImportOutcome> {
        let cursor = match BatchCursor::open(&self.store, self.config.batch_size) {
            Ok(cursor) => cursor,
            Err(LinkError::NotFound { path }) => {
                info!("No link list at {}", path.display());
                self.clear();
                return Ok(ImportOutcome::NothingToImport { reason: NothingReason::Missing });
            }
            Err(e) => return Err(e),
        };

        if cursor.total() == 0 {
            info!("No URLs found in {}", self.store.path().display());
            self.clear();
            return Ok(ImportOutcome::NothingToImport { reason: NothingReason::Empty });
        }

        let summary = ImportSummary {
            total_count: cursor.total(),
            total_batches: cursor.total_batches(),
        };
        self.tracker.reset(summary.total_count);
        self.cursor = Some(cursor);

        info!(total = summary.total_count, batches = summary.total_batches, "Imported link list");
        self.emit(ProgressEvent::Imported {
            total: summary.total_count,
            total_batches: summary.total_batches,
        });
        Ok(ImportOutcome::Imported(summary))
    }

    /// Translate a manifest, store its links, and import the new list
    ///
    /// A parse failure or a declined overwrite leaves the stored list, cursor
    /// and tracker exactly as they were.
    pub fn extract_and_store(&mut self, manifest_bytes: &[u8]) -> Result<ExtractSummary> {
        let extraction = self.extractor.extract_bytes(manifest_bytes)?;

        if self.store.exists() && !self.consent.allow_overwrite(self.store.path()) {
            warn!("Not overwriting {}", self.store.path().display());
            return Err(LinkError::OverwriteDeclined {
                path: self.store.path().to_path_buf(),
            });
        }

        self.store.write(&extraction.links)?;
        self.cursor = None;
        for skipped in &extraction.skipped {
            self.emit(ProgressEvent::EntrySkipped {
                index: skipped.index,
                reason: skipped.reason.to_string(),
            });
        }
        self.emit(ProgressEvent::Extracted {
            total: extraction.len(),
            skipped: extraction.skipped_count(),
        });

        let imported = self.import_existing()?;
        Ok(ExtractSummary {
            total_count: imported.total_count(),
            skipped_count: extraction.skipped_count(),
            total_batches: imported.total_batches(),
            skipped: extraction.skipped,
            metadata: extraction.metadata,
        })
    }

    /// Read a `.wabbajack` archive or plain manifest file and extract it
    pub fn extract_file(&mut self, path: &Path) -> Result<ExtractSummary> {
        let bytes = read_modlist(path, &self.config.modlist_entry)?;
        info!("Extracting links from {}", path.display());
        self.extract_and_store(&bytes)
    }

    /// Open the next batch of links
    ///
    /// Links are opened in order with the configured pause between them, and
    /// the tracker advances once per link. A batch always runs to the end.
    pub fn next_batch(&mut self) -> Result<BatchOutcome> {
        let pull = match self.cursor.as_mut() {
            Some(cursor) => cursor.next_batch()?,
            None => {
                debug!("No cursor; import a link list first");
                return Ok(BatchOutcome::NoCursor);
            }
        };

        let batch = match pull {
            BatchPull::Batch(batch) => batch,
            BatchPull::Exhausted => {
                return Ok(BatchOutcome::Exhausted {
                    processed_total: self.tracker.processed(),
                    total: self.tracker.total(),
                });
            }
        };

        let batch_index = batch.index;
        let mut opened_count = 0;
        let mut failed = Vec::new();

        for (position, url) in batch.into_iter().enumerate() {
            if position > 0 && !self.config.open_delay.is_zero() {
                thread::sleep(self.config.open_delay);
            }

            let result = self.opener.open(&url);
            self.tracker.advance(1);
            opened_count += 1;

            match result {
                Ok(()) => self.emit(ProgressEvent::LinkOpened {
                    url,
                    processed: self.tracker.processed(),
                    total: self.tracker.total(),
                }),
                Err(e) => {
                    warn!(%url, error = %e, "Failed to open link");
                    self.emit(ProgressEvent::OpenFailed {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                    failed.push(url);
                }
            }
        }

        let report = BatchReport {
            batch_index,
            opened_count,
            failed,
            processed_total: self.tracker.processed(),
            total: self.tracker.total(),
        };
        info!(
            batch = batch_index,
            opened = report.opened_count,
            processed = report.processed_total,
            total = report.total,
            "Opened batch"
        );
        self.emit(ProgressEvent::BatchComplete {
            batch_index,
            opened: report.opened_count,
            processed: report.processed_total,
            total: report.total,
        });
        if self.tracker.is_complete() {
            self.emit(ProgressEvent::Completed { total: report.total });
        }

        Ok(BatchOutcome::Opened(report))
    }

    fn clear(&mut self) {
        self.cursor = None;
        self.tracker.reset(0);
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(ref callback) = self.progress_callback {
            callback(event);
        }
    }
}
