//! Configuration types for a link session

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;
use crate::core::{LinkError, Result};

/// Number of links opened per batch unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Pause between two browser opens inside one batch
pub const DEFAULT_OPEN_DELAY: Duration = Duration::from_millis(500);

/// File the extracted links are written to
pub const DEFAULT_LINKS_FILE: &str = "output.txt";

/// Name of the manifest entry inside a `.wabbajack` archive
pub const DEFAULT_MODLIST_ENTRY: &str = "modlist";

/// Configuration for a link session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where the link list is persisted
    pub links_path: PathBuf,
    /// Links per batch; must be positive
    pub batch_size: usize,
    /// Pacing delay between successive opens within one batch
    pub open_delay: Duration,
    /// Manifest entry to read from Wabbajack archives
    pub modlist_entry: String,
}

impl SessionConfig {
    pub fn with_links_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.links_path = path.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    pub fn with_modlist_entry<S: Into<String>>(mut self, entry: S) -> Self {
        self.modlist_entry = entry.into();
        self
    }

    /// Check the configuration, returning the batch size as a non-zero value
    pub fn validate(&self) -> Result<NonZeroUsize> {
        if self.modlist_entry.trim().is_empty() {
            return Err(LinkError::configuration(
                "modlist_entry",
                "archive entry name must not be empty",
                format!("Use '{}' for Wabbajack archives", DEFAULT_MODLIST_ENTRY),
            ));
        }
        batch_size(self.batch_size)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            links_path: PathBuf::from(DEFAULT_LINKS_FILE),
            batch_size: DEFAULT_BATCH_SIZE,
            open_delay: DEFAULT_OPEN_DELAY,
            modlist_entry: DEFAULT_MODLIST_ENTRY.to_string(),
        }
    }
}

/// Validate a batch size, rejecting zero
pub fn batch_size(size: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(size).ok_or_else(|| {
        LinkError::configuration(
            "batch_size",
            "batch size must be a positive number",
            format!("Use a value of at least 1 (default is {})", DEFAULT_BATCH_SIZE),
        )
    })
}
