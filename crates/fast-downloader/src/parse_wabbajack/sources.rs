//! Nexus Mods file references and their download page URLs
//!
//! Each Wabbajack archive entry carries a `State` block. Entries backed by
//! Nexus Mods identify a file through `ModID`, `FileID` and `GameName`; this
//! module validates those fields and turns them into the file tab URL.

use once_cell::sync::Lazy;
use serde_json::Value;
use url::Url;

/// Root of every generated link
pub const NEXUS_MODS_BASE: &str = "https://www.nexusmods.com/";

static NEXUS_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse(NEXUS_MODS_BASE).expect("NEXUS_MODS_BASE is a valid URL"));

/// Why an archive entry produced no link
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// The entry, its state block, or one of the fields has the wrong shape
    #[error("invalid entry format: {detail}")]
    InvalidFormat { detail: String },

    #[error("missing required key '{key}'")]
    MissingKey { key: &'static str },
}

/// Result of translating one archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Link(String),
    Skip(SkipReason),
}

/// A file hosted on Nexus Mods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NexusFile {
    /// Lower-cased game domain (e.g., "skyrimspecialedition")
    pub game_name: String,
    pub mod_id: String,
    pub file_id: String,
}

impl NexusFile {
    /// Read the Nexus identifiers out of an archive entry
    pub fn from_entry(entry: &Value) -> Result<Self, SkipReason> {
        let entry = entry
            .as_object()
            .ok_or_else(|| invalid(format!("entry is {}", kind(entry))))?;
        let state = entry.get("State").ok_or(SkipReason::MissingKey { key: "State" })?;
        let state = state
            .as_object()
            .ok_or_else(|| invalid(format!("'State' is {}", kind(state))))?;

        let mod_id = identifier(state, "ModID")?;
        let file_id = identifier(state, "FileID")?;
        let game_name = match state.get("GameName") {
            None => return Err(SkipReason::MissingKey { key: "GameName" }),
            Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_lowercase(),
            Some(other) => return Err(invalid(format!("'GameName' is {}", kind(other)))),
        };

        Ok(Self { game_name, mod_id, file_id })
    }

    /// Files tab of the mod page with this file preselected
    pub fn url(&self) -> Option<Url> {
        let mut url = NEXUS_BASE.clone();
        url.path_segments_mut()
            .ok()?
            .clear()
            .extend([self.game_name.as_str(), "mods", self.mod_id.as_str()]);
        url.query_pairs_mut()
            .append_pair("tab", "files")
            .append_pair("file_id", &self.file_id);
        Some(url)
    }
}

/// Translate one archive entry into a link, or say why it was skipped
pub fn translate_entry(entry: &Value) -> Translation {
    let file = match NexusFile::from_entry(entry) {
        Ok(file) => file,
        Err(reason) => return Translation::Skip(reason),
    };
    match file.url() {
        Some(url) => Translation::Link(url.into()),
        None => Translation::Skip(invalid("identifiers do not form a URL".to_string())),
    }
}

fn identifier(state: &serde_json::Map<String, Value>, key: &'static str) -> Result<String, SkipReason> {
    match state.get(key) {
        None => Err(SkipReason::MissingKey { key }),
        Some(Value::Number(n)) if n.is_u64() => Ok(n.to_string()),
        Some(Value::String(s)) if is_digits(s.trim()) => Ok(s.trim().to_string()),
        Some(Value::Number(_) | Value::String(_)) => {
            Err(invalid(format!("'{}' is not a non-negative integer", key)))
        }
        Some(other) => Err(invalid(format!("'{}' is {}", key, kind(other)))),
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn invalid(detail: String) -> SkipReason {
    SkipReason::InvalidFormat { detail }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "an empty string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
