//! `structgraph set-credential` and `structgraph clear-credential`.
//!
//! The key itself is never printed or logged.

use std::io::BufRead;

use tracing::info;

use crate::context::ServiceContext;
use crate::ports::API_KEY_SECRET;

/// Execute `set-credential`: read the key and persist it.
///
/// The key is read with a hidden prompt, or from the first line of stdin
/// when `from_stdin` is set. An empty key stores nothing.
///
/// # Errors
///
/// Returns an error string if input cannot be read or the key cannot be
/// stored.
pub fn set(ctx: &ServiceContext, from_stdin: bool) -> Result<(), String> {
    let key = if from_stdin { read_stdin_line()? } else { prompt_hidden()? };
    let key = key.trim();
    if key.is_empty() {
        println!("No key entered; nothing stored.");
        return Ok(());
    }

    ctx.secrets
        .store(API_KEY_SECRET, key)
        .map_err(|e| format!("Failed to store Gemini API Key: {e}"))?;
    info!(secret = API_KEY_SECRET, "credential stored");
    println!("Gemini API Key saved successfully");
    Ok(())
}

/// Execute `clear-credential`: delete the stored key.
///
/// # Errors
///
/// Returns an error string if the secret store cannot be written.
pub fn clear(ctx: &ServiceContext) -> Result<(), String> {
    ctx.secrets
        .delete(API_KEY_SECRET)
        .map_err(|e| format!("Failed to clear Gemini API Key: {e}"))?;
    info!(secret = API_KEY_SECRET, "credential cleared");
    println!("Gemini API Key cleared");
    Ok(())
}

fn prompt_hidden() -> Result<String, String> {
    dialoguer::Password::new()
        .with_prompt("Enter your Google Gemini API Key")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| format!("Failed to get user input: {e}"))
}

fn read_stdin_line() -> Result<String, String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| format!("Failed to read key from stdin: {e}"))?;
    Ok(line)
}
