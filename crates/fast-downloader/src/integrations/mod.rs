//! Session-level APIs that tie extraction, import and batch opening together
//!
//! Front ends drive a [`LinkSession`] and plug in their own [`LinkOpener`] and
//! [`OverwriteConsent`] collaborators.

pub mod opener;
pub mod session;

#[cfg(test)]
mod tests;

pub use opener::{AlwaysOverwrite, BrowserOpener, LinkOpener, NeverOverwrite, OverwriteConsent, PrintOpener};
pub use session::{
    BatchOutcome, BatchReport, ExtractSummary, ImportOutcome, ImportSummary, LinkSession, NothingReason,
};
