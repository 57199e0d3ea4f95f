//! `structgraph serve` command: the panel host behind a JSON-lines bridge.
//!
//! Each stdin line is one UI message; each stdout line is one host message.
//! At end of input the panel finishes the work it has already started (the
//! initial `load-data` and any requested summaries), writes the results and
//! then closes, so `structgraph serve < requests.jsonl` answers every request.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tracing::{info, warn};

use super::{block_on, panel_services};
use crate::adapters::live::webview::ChannelWebview;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::panel::{PanelEvent, PanelRegistry, PanelServices};
use crate::ports::Webview;

/// Execute the `serve` command.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or stdout cannot be
/// written.
pub fn run(ctx: ServiceContext, settings: &Settings, root: &Path) -> Result<(), String> {
    block_on(serve(panel_services(ctx, settings, root, true)))?
}

async fn serve(services: Arc<PanelServices>) -> Result<(), String> {
    let registry = PanelRegistry::new();
    let (host_tx, mut host_rx) = unbounded_channel();
    let (event_tx, event_rx) = unbounded_channel();

    registry.create_or_show(&services, move || {
        let webview: Arc<dyn Webview> = Arc::new(ChannelWebview::new(host_tx));
        (webview, event_rx)
    });
    drop(services);
    tokio::spawn(forward_stdin(event_tx));

    let mut stdout = tokio::io::stdout();
    while let Some(message) = host_rx.recv().await {
        let mut line = message.to_json().map_err(|e| format!("Failed to encode message: {e}"))?;
        line.push('\n');
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| format!("Failed to write to stdout: {e}"))?;
        stdout.flush().await.map_err(|e| format!("Failed to write to stdout: {e}"))?;
    }
    info!("panel closed");
    Ok(())
}

async fn forward_stdin(events: UnboundedSender<PanelEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => {
                if events.send(PanelEvent::Raw(line)).is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read from stdin");
                break;
            }
        }
    }
    let _ = events.send(PanelEvent::InputClosed);
}
