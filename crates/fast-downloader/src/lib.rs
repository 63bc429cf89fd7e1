//! Wabbajack modlist link extraction and batched opening
//!
//! Reads a Wabbajack modlist manifest, turns every Nexus Mods archive entry
//! into a link to the mod's files tab, stores the links one per line, and
//! opens them in fixed-size batches while counting progress.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fast_downloader::{LinkSession, SessionConfig, AlwaysOverwrite, BatchOutcome};
//! use std::path::Path;
//!
//! # fn example() -> fast_downloader::Result<()> {
//! let config = SessionConfig::default().with_batch_size(10);
//! let mut session = LinkSession::new(config)?
//!     .with_consent(AlwaysOverwrite)
//!     .with_progress(|event| println!("{:?}", event));
//!
//! let summary = session.extract_file(Path::new("Lorerim.wabbajack"))?;
//! println!("{} links, {} skipped", summary.total_count, summary.skipped_count);
//!
//! while let BatchOutcome::Opened(report) = session.next_batch()? {
//!     println!("opened {}/{}", report.processed_total, report.total);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Lenient extraction**: malformed or non-Nexus entries are skipped and reported, never fatal
//! - **Archive support**: reads the manifest straight out of a `.wabbajack` file
//! - **Atomic link list**: the list is replaced through a temporary file and a rename
//! - **Lazy batching**: the list is streamed one batch at a time
//! - **Progress events**: callbacks and reporters for every step

pub mod batch;
pub mod config;
pub mod core;
pub mod integrations;
pub mod parse_wabbajack;

// Re-export commonly used types for convenience
pub use batch::{Batch, BatchCursor, BatchPull, LinkStore, ProgressTracker};
pub use config::SessionConfig;
pub use core::{
    ConsoleProgressReporter, ErrorSeverity, IntoProgressCallback, LinkError, NullProgressReporter,
    ProgressCallback, ProgressEvent, ProgressReporter, Result,
};
pub use integrations::{
    AlwaysOverwrite, BatchOutcome, BatchReport, BrowserOpener, ExtractSummary, ImportOutcome,
    ImportSummary, LinkOpener, LinkSession, NeverOverwrite, NothingReason, OverwriteConsent, PrintOpener,
};
pub use parse_wabbajack::{extract_links, translate_entry, Extraction, ManifestExtractor, SkipReason, Translation};
