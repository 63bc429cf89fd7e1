//! Wabbajack modlist manifest parser and link extractor
//!
//! Parses the raw `modlist` document and walks its `Archives` list, turning
//! every Nexus-backed entry into a download page link. Entries that cannot be
//! translated are recorded and skipped; they never abort the extraction.

use std::borrow::Cow;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use crate::core::{LinkError, Result};
use crate::parse_wabbajack::sources::{translate_entry, SkipReason, Translation};

/// Descriptive fields from the top level of a modlist
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ManifestMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    /// Game the modlist targets
    pub game: Option<String>,
}

impl ManifestMetadata {
    fn from_root(root: &Map<String, Value>) -> Self {
        let text = |key: &str| root.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            name: text("Name"),
            version: text("Version"),
            author: text("Author"),
            game: text("GameName"),
        }
    }
}

/// A parsed modlist: its metadata and the raw archive entries in order
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub metadata: ManifestMetadata,
    pub archives: Vec<Value>,
}

impl Manifest {
    /// Build a manifest from an already parsed JSON document
    ///
    /// A missing or null `Archives` key yields an empty archive list.
    pub fn from_value(document: Value) -> Result<Self> {
        let Value::Object(mut root) = document else {
            return Err(LinkError::manifest_shape("manifest root is not an object"));
        };

        let metadata = ManifestMetadata::from_root(&root);
        let archives = match root.remove("Archives") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(archives)) => archives,
            Some(_) => return Err(LinkError::manifest_shape("'Archives' is not a list")),
        };

        Ok(Self { metadata, archives })
    }
}

/// One archive entry that produced no link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntry {
    /// Position in the `Archives` list
    pub index: usize,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: SkipReason,
}

fn serialize_reason<S: serde::Serializer>(reason: &SkipReason, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

/// Links extracted from a manifest, in archive order
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub links: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
    pub metadata: ManifestMetadata,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Parser and link extractor for Wabbajack modlists
#[derive(Debug, Clone)]
pub struct ManifestExtractor {
    /// Retry with `'` replaced by `"` when the document is not valid JSON
    ///
    /// Works around modlists exported with single-quoted strings. Standard
    /// JSON is always parsed as-is, so apostrophes inside values survive.
    pub normalize_quotes: bool,
}

impl ManifestExtractor {
    /// Create a new extractor with default settings
    pub fn new() -> Self {
        Self {
            normalize_quotes: true,
        }
    }

    pub fn with_quote_normalization(mut self, enabled: bool) -> Self {
        self.normalize_quotes = enabled;
        self
    }

    /// Decode and parse raw manifest bytes
    pub fn parse(&self, bytes: &[u8]) -> Result<Manifest> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| LinkError::manifest("manifest is not valid UTF-8", e))?;

        let document: Value = match serde_json::from_str(text) {
            Ok(document) => document,
            Err(e) => match normalize_quotes(text) {
                Cow::Owned(normalized) if self.normalize_quotes => {
                    debug!("Manifest is not standard JSON; retrying with normalized quotes");
                    serde_json::from_str(&normalized)
                        .map_err(|_| LinkError::manifest("manifest is not valid JSON", e))?
                }
                _ => return Err(LinkError::manifest("manifest is not valid JSON", e)),
            },
        };
        Manifest::from_value(document)
    }

    /// Translate every archive entry, keeping successful links in order
    pub fn extract(&self, manifest: &Manifest) -> Extraction {
        let mut links = Vec::with_capacity(manifest.archives.len());
        let mut skipped = Vec::new();

        for (index, entry) in manifest.archives.iter().enumerate() {
            match translate_entry(entry) {
                Translation::Link(url) => {
                    debug!(index, %url, "Generated link");
                    links.push(url);
                }
                Translation::Skip(reason) => {
                    warn!(index, %reason, "Skipping archive entry");
                    skipped.push(SkippedEntry { index, reason });
                }
            }
        }

        info!(
            modlist = manifest.metadata.name.as_deref().unwrap_or("<unnamed>"),
            links = links.len(),
            skipped = skipped.len(),
            "Extracted links from manifest"
        );

        Extraction {
            links,
            skipped,
            metadata: manifest.metadata.clone(),
        }
    }

    /// Parse raw bytes and extract links in one step
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Extraction> {
        let manifest = self.parse(bytes)?;
        Ok(self.extract(&manifest))
    }
}

impl Default for ManifestExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn single-quote delimiters into double quotes
pub fn normalize_quotes(text: &str) -> Cow<'_, str> {
    if text.contains('\'') {
        Cow::Owned(text.replace('\'', "\""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Convenience function to extract links from raw manifest bytes
pub fn extract_links(bytes: &[u8]) -> Result<Extraction> {
    ManifestExtractor::new().extract_bytes(bytes)
}
