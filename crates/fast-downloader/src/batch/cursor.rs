//! Forward-only batching over a link list
//!
//! A [`BatchCursor`] is built against the link list as it is at construction
//! time and hands out fixed-size batches on demand. It cannot be rewound: to
//! start over, or after the list has been rewritten, build a new cursor.

use std::num::NonZeroUsize;
use serde::Serialize;
use tracing::debug;
use crate::batch::store::LinkStore;
use crate::config::batch_size as checked_batch_size;
use crate::core::{LinkError, Result};

type LinkSource = Box<dyn Iterator<Item = Result<String>> + Send>;

/// Number of batches needed to cover `total` links
pub fn total_batches(total: usize, batch_size: NonZeroUsize) -> usize {
    total.div_ceil(batch_size.get())
}

/// A run of consecutive links handed out together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    /// Zero-based position of this batch in the sequence
    pub index: usize,
    /// Position of the first link in the whole list
    pub offset: usize,
    pub links: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.links.iter()
    }
}

impl IntoIterator for Batch {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

/// Outcome of pulling from a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchPull {
    Batch(Batch),
    /// Every link has been handed out
    Exhausted,
}

/// Lazy, forward-only sequence of batches
pub struct BatchCursor {
    source: LinkSource,
    total: usize,
    batch_size: NonZeroUsize,
    yielded: usize,
    batches_yielded: usize,
    finished: bool,
}

impl std::fmt::Debug for BatchCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchCursor")
            .field("total", &self.total)
            .field("batch_size", &self.batch_size)
            .field("yielded", &self.yielded)
            .field("finished", &self.finished)
            .finish()
    }
}

impl BatchCursor {
    /// Build a cursor over the current contents of `store`
    ///
    /// Counts the links first, then streams them from a new handle; links are
    /// never all held in memory at once.
    pub fn open(store: &LinkStore, batch_size: usize) -> Result<Self> {
        let batch_size = checked_batch_size(batch_size)?;
        let total = store.count()?;
        let lines = store.lines()?;
        debug!(total, batch_size = batch_size.get(), path = %store.path().display(), "Opened batch cursor");
        Ok(Self::with_source(Box::new(lines), total, batch_size))
    }

    /// Build a cursor over links already in memory
    pub fn from_links(links: Vec<String>, batch_size: usize) -> Result<Self> {
        let batch_size = checked_batch_size(batch_size)?;
        let total = links.len();
        Ok(Self::with_source(Box::new(links.into_iter().map(Ok::<String, LinkError>)), total, batch_size))
    }

    fn with_source(source: LinkSource, total: usize, batch_size: NonZeroUsize) -> Self {
        Self {
            source,
            total,
            batch_size,
            yielded: 0,
            batches_yielded: 0,
            finished: total == 0,
        }
    }

    /// Links in the list when the cursor was built
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    pub fn total_batches(&self) -> usize {
        total_batches(self.total, self.batch_size)
    }

    /// Links handed out so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    pub fn batches_yielded(&self) -> usize {
        self.batches_yielded
    }

    pub fn remaining(&self) -> usize {
        self.total - self.yielded
    }

    pub fn is_exhausted(&self) -> bool {
        self.finished
    }

    /// Pull the next batch
    ///
    /// Never yields more than [`total`](Self::total) links, even if the file
    /// grew after the cursor was built. A read error ends the cursor.
    pub fn next_batch(&mut self) -> Result<BatchPull> {
        if self.finished {
            return Ok(BatchPull::Exhausted);
        }

        let want = self.batch_size.get().min(self.remaining());
        let mut links = Vec::with_capacity(want);
        while links.len() < want {
            match self.source.next() {
                Some(Ok(link)) => links.push(link),
                Some(Err(e)) => {
                    self.finished = true;
                    return Err(e);
                }
                None => break,
            }
        }

        if links.is_empty() {
            self.finished = true;
            return Ok(BatchPull::Exhausted);
        }

        let batch = Batch {
            index: self.batches_yielded,
            offset: self.yielded,
            links,
        };
        self.yielded += batch.len();
        self.batches_yielded += 1;
        if self.yielded >= self.total {
            self.finished = true;
        }

        debug!(index = batch.index, len = batch.len(), yielded = self.yielded, total = self.total, "Yielding batch");
        Ok(BatchPull::Batch(batch))
    }
}

impl Iterator for BatchCursor {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_batch() {
            Ok(BatchPull::Batch(batch)) => Some(Ok(batch)),
            Ok(BatchPull::Exhausted) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
