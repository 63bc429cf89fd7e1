//! Link list persistence, batching and progress
//!
//! The store owns the on-disk list, a cursor walks one snapshot of it in
//! fixed-size batches, and the tracker counts how many links were handed off.

pub mod cursor;
pub mod store;
pub mod tracker;

pub use cursor::{total_batches, Batch, BatchCursor, BatchPull};
pub use store::{LinkLines, LinkStore};
pub use tracker::ProgressTracker;
