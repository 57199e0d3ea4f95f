//! Runtime settings read from the environment.
//!
//! A `.env` file in the working directory is loaded first (via `dotenvy`),
//! so every variable below can also live there.

use std::path::PathBuf;

use crate::adapters::live::editor::EditorCommand;
use crate::adapters::live::llm::DEFAULT_API_BASE;
use crate::scan::ScanOptions;
use crate::summary::{SummaryOptions, DEFAULT_MODEL};

/// Model used for summaries.
pub const ENV_MODEL: &str = "STRUCTGRAPH_MODEL";
/// Base URL of the generation API.
pub const ENV_API_BASE: &str = "STRUCTGRAPH_API_BASE";
/// Comma-separated names excluded from scans, on top of the defaults.
pub const ENV_EXCLUDE: &str = "STRUCTGRAPH_EXCLUDE";
/// Optional cap on file bytes embedded in a prompt.
pub const ENV_MAX_PROMPT_BYTES: &str = "STRUCTGRAPH_MAX_PROMPT_BYTES";
/// Override for the secrets file location.
pub const ENV_SECRETS_FILE: &str = "STRUCTGRAPH_SECRETS_FILE";
/// Non-blocking command used to open files (a GUI editor or opener). When
/// unset, `VISUAL`, then `EDITOR`, is run in the foreground instead.
pub const ENV_EDITOR: &str = "STRUCTGRAPH_EDITOR";
/// When set, port traffic is recorded to this cassette file.
pub const ENV_RECORD: &str = "STRUCTGRAPH_RECORD";

/// Everything configurable about a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Gemini model identifier.
    pub model: String,
    /// Generation API base URL.
    pub api_base: String,
    /// Scan exclusions (defaults plus extras).
    pub scan: ScanOptions,
    /// Cap on embedded file content; `None` embeds files in full.
    pub max_prompt_bytes: Option<usize>,
    /// Secrets file; `None` uses the platform config directory.
    pub secrets_file: Option<PathBuf>,
    /// Command used to open documents.
    pub editor: Option<EditorCommand>,
    /// Cassette path when recording is enabled.
    pub record_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            scan: ScanOptions::default(),
            max_prompt_bytes: None,
            secrets_file: None,
            editor: None,
            record_path: None,
        }
    }
}

impl Settings {
    /// Loads `.env` (if present) and reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error string if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error string if `STRUCTGRAPH_MAX_PROMPT_BYTES` is not a
    /// positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let max_prompt_bytes = get(ENV_MAX_PROMPT_BYTES)
            .map(|raw| match raw.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(format!("{ENV_MAX_PROMPT_BYTES} must be a positive integer, got {raw:?}")),
            })
            .transpose()?;

        let extra: Vec<String> = get(ENV_EXCLUDE)
            .map(|raw| raw.split(',').map(|name| name.trim().to_string()).collect())
            .unwrap_or_default();

        Ok(Self {
            model: get(ENV_MODEL).unwrap_or(defaults.model),
            api_base: get(ENV_API_BASE).unwrap_or(defaults.api_base),
            scan: ScanOptions::with_extra(extra),
            max_prompt_bytes,
            secrets_file: get(ENV_SECRETS_FILE).map(PathBuf::from),
            editor: get(ENV_EDITOR).map(EditorCommand::detached).or_else(|| {
                get("VISUAL").or_else(|| get("EDITOR")).map(EditorCommand::foreground)
            }),
            record_path: get(ENV_RECORD).map(PathBuf::from),
        })
    }

    /// Options handed to the summary requester.
    #[must_use]
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions { model: self.model.clone(), max_prompt_bytes: self.max_prompt_bytes }
    }
}
