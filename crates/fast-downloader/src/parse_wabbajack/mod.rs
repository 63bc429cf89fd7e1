//! Wabbajack modlist parsing and link generation
//!
//! This module turns a modlist manifest into the ordered list of Nexus Mods
//! download page links. Entries that cannot be translated are counted and
//! skipped rather than failing the whole manifest.

pub mod archive;
pub mod parser;
pub mod sources;

// Re-export main types
pub use archive::{is_archive, read_archive_entry, read_modlist};
pub use parser::{extract_links, normalize_quotes, Extraction, Manifest, ManifestExtractor, ManifestMetadata, SkippedEntry};
pub use sources::{translate_entry, NexusFile, SkipReason, Translation, NEXUS_MODS_BASE};
