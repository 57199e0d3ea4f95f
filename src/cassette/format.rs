//! Cassette data structures for recording and replaying port traffic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded call on a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`"fs"`, `"llm"`, `"secrets"`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Arguments passed to the port.
    pub input: serde_json::Value,
    /// Value returned, using the `{"ok": v}` / `{"err": msg}` convention for
    /// fallible methods.
    pub output: serde_json::Value,
}

/// File content as stored in a cassette: text when it is UTF-8, otherwise
/// the raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FileContent {
    /// Valid UTF-8 content, kept readable.
    Text(String),
    /// Anything else, byte for byte.
    Bytes(Vec<u8>),
}

impl FileContent {
    /// Picks the representation for `bytes`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::Text(text.to_string()),
            Err(_) => Self::Bytes(bytes.to_vec()),
        }
    }

    /// The original bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }
}

/// A named, ordered list of interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Version of the binary that produced the recording.
    pub tool_version: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Loads a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &std::path::Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_reads_a_written_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.cassette.yaml");
        let cassette = Cassette {
            name: "summary".into(),
            recorded_at: Utc::now(),
            tool_version: "0.1.0".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "llm".into(),
                method: "complete".into(),
                input: json!({"model": "gemini-2.0-flash-exp"}),
                output: json!({"ok": {"text": "A summary."}}),
            }],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        assert_eq!(Cassette::load(&path).unwrap(), cassette);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Cassette::load(std::path::Path::new("/nonexistent/x.yaml")).unwrap_err();
        assert!(err.contains("Failed to read cassette file"));
    }

    #[test]
    fn file_content_keeps_invalid_utf8_bytes() {
        assert_eq!(FileContent::from_bytes(b"hi"), FileContent::Text("hi".into()));
        let raw = FileContent::from_bytes(&[0xff, 0x41]);
        assert_eq!(serde_json::to_value(&raw).unwrap(), json!([255, 65]));

        let back: FileContent = serde_json::from_value(json!([255, 65])).unwrap();
        assert_eq!(back.into_bytes(), vec![0xff, 0x41]);
        let text: FileContent = serde_json::from_value(json!("hi")).unwrap();
        assert_eq!(text.into_bytes(), b"hi");
    }
}
