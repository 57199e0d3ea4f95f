//! Messages exchanged between the host controller and the UI panel.
//!
//! Both directions are closed sets of variants tagged by a `command` field.
//! Request tokens (`requestId`) correlate summary responses with the request
//! that produced them so the UI can drop stale results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::FileNode;

/// Host → UI messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum HostMessage {
    /// Full scan result, sent once per panel lifetime.
    LoadData {
        /// The scanned forest.
        data: Vec<FileNode>,
    },
    /// Result of a completed summary request.
    ShowSummary {
        /// Model output, verbatim.
        summary: String,
        /// Token of the request this answers.
        #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
        request_id: Option<u64>,
    },
}

/// UI → host messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum UiMessage {
    /// Open the given absolute path in an editor.
    OpenFile {
        /// File to open.
        path: PathBuf,
    },
    /// Summarize the given absolute path.
    GetSummary {
        /// File to summarize.
        path: PathBuf,
        /// Token echoed back in the matching [`HostMessage::ShowSummary`].
        #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
        request_id: Option<u64>,
    },
}

/// Commands the host understands.
const UI_COMMANDS: &[&str] = &["open-file", "get-summary"];

/// Failure to decode an inbound UI message.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Not JSON, or a known command with missing/invalid fields.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The message has no `command` field.
    #[error("message has no command")]
    MissingCommand,
    /// A `command` the host does not handle.
    #[error("unrecognized command {0:?}")]
    UnknownCommand(String),
}

impl UiMessage {
    /// Decodes a UI message from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownCommand`] for tags outside the known
    /// set, and [`ProtocolError::Malformed`] for anything else that does not
    /// decode.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let command = value
            .get("command")
            .and_then(serde_json::Value::as_str)
            .ok_or(ProtocolError::MissingCommand)?;
        if !UI_COMMANDS.contains(&command) {
            return Err(ProtocolError::UnknownCommand(command.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl HostMessage {
    /// Encodes this message as a single line of JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a contained path is not valid UTF-8.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
