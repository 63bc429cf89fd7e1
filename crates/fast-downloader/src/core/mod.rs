//! Core types used throughout the link engine
//!
//! This module contains the fundamental types that all other modules depend on.
//! By organizing these in a core module, we make the dependency relationships clear.

pub mod error;
pub mod files;
pub mod progress;

// Re-export main types for convenience
pub use error::{LinkError, Result, ErrorSeverity, FileOperation};
pub use progress::{
    ProgressEvent, ProgressCallback, ProgressReporter, IntoProgressCallback,
    ConsoleProgressReporter, NullProgressReporter,
};
