//! Progress events and reporters for the presentation layer

use std::sync::Arc;

/// Progress callback for session operations
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Events emitted while extracting and opening links
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A link list was loaded and a fresh cursor built
    Imported {
        total: usize,
        total_batches: usize,
    },
    /// A manifest was translated and written to the link list
    Extracted {
        total: usize,
        skipped: usize,
    },
    /// One manifest entry was left out
    EntrySkipped {
        index: usize,
        reason: String,
    },
    LinkOpened {
        url: String,
        processed: usize,
        total: usize,
    },
    OpenFailed {
        url: String,
        error: String,
    },
    BatchComplete {
        batch_index: usize,
        opened: usize,
        processed: usize,
        total: usize,
    },
    /// Every link in the list has been handed off
    Completed {
        total: usize,
    },
}

/// Trait for progress reporting with per-event hooks
pub trait ProgressReporter: Send + Sync {
    fn on_imported(&self, _total: usize, _total_batches: usize) {}
    fn on_extracted(&self, _total: usize, _skipped: usize) {}
    fn on_entry_skipped(&self, _index: usize, _reason: &str) {}
    fn on_link_opened(&self, _url: &str, _processed: usize, _total: usize) {}
    fn on_open_failed(&self, _url: &str, _error: &str) {}
    fn on_batch_complete(&self, _batch_index: usize, _opened: usize, _processed: usize, _total: usize) {}
    fn on_completed(&self, _total: usize) {}
}

/// Extension trait to convert ProgressReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ProgressEvent::Imported { total, total_batches } => {
                self.on_imported(total, total_batches);
            }
            ProgressEvent::Extracted { total, skipped } => {
                self.on_extracted(total, skipped);
            }
            ProgressEvent::EntrySkipped { index, reason } => {
                self.on_entry_skipped(index, &reason);
            }
            ProgressEvent::LinkOpened { url, processed, total } => {
                self.on_link_opened(&url, processed, total);
            }
            ProgressEvent::OpenFailed { url, error } => {
                self.on_open_failed(&url, &error);
            }
            ProgressEvent::BatchComplete { batch_index, opened, processed, total } => {
                self.on_batch_complete(batch_index, opened, processed, total);
            }
            ProgressEvent::Completed { total } => {
                self.on_completed(total);
            }
        })
    }
}

/// Simple console progress reporter implementation
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    pub verbose: bool,
}

impl ConsoleProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn on_imported(&self, total: usize, total_batches: usize) {
        println!("📥 Imported {} URLs ({} batches)", total, total_batches);
    }

    fn on_extracted(&self, total: usize, skipped: usize) {
        if skipped > 0 {
            println!("📝 Generated {} URLs, skipped {} entries", total, skipped);
        } else {
            println!("📝 Generated {} URLs", total);
        }
    }

    fn on_entry_skipped(&self, index: usize, reason: &str) {
        if self.verbose {
            println!("⚠️  Skipping entry {}: {}", index, reason);
        }
    }

    fn on_link_opened(&self, url: &str, processed: usize, total: usize) {
        if self.verbose {
            println!("🌐 [{}/{}] {}", processed, total, url);
        }
    }

    fn on_open_failed(&self, url: &str, error: &str) {
        eprintln!("❌ Failed to open {}: {}", url, error);
    }

    fn on_batch_complete(&self, _batch_index: usize, _opened: usize, processed: usize, total: usize) {
        println!("Opened {} out of {} URLs.", processed, total);
    }

    fn on_completed(&self, total: usize) {
        println!("✅ All {} URLs opened", total);
    }
}

/// Null progress reporter that does nothing
#[derive(Debug, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counting {
        opened: Mutex<Vec<(String, usize)>>,
        completed: Mutex<Option<usize>>,
    }

    impl ProgressReporter for Arc<Counting> {
        fn on_link_opened(&self, url: &str, processed: usize, _total: usize) {
            self.opened.lock().unwrap().push((url.to_string(), processed));
        }

        fn on_completed(&self, total: usize) {
            *self.completed.lock().unwrap() = Some(total);
        }
    }

    #[test]
    fn reporter_hooks_receive_matching_events() {
        let counting = Arc::new(Counting::default());
        let callback = counting.clone().into_callback();

        callback(ProgressEvent::LinkOpened { url: "a".into(), processed: 1, total: 2 });
        callback(ProgressEvent::Imported { total: 2, total_batches: 1 });
        callback(ProgressEvent::Completed { total: 2 });

        assert_eq!(*counting.opened.lock().unwrap(), vec![("a".to_string(), 1)]);
        assert_eq!(*counting.completed.lock().unwrap(), Some(2));
    }

    #[test]
    fn null_reporter_accepts_every_event() {
        let callback = NullProgressReporter.into_callback();
        callback(ProgressEvent::OpenFailed { url: "a".into(), error: "boom".into() });
        callback(ProgressEvent::BatchComplete { batch_index: 0, opened: 0, processed: 1, total: 1 });
    }
}
