//! `structgraph show` command: the panel with the terminal renderer.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc::unbounded_channel;

use super::{block_on, panel_services};
use crate::adapters::live::webview::ChannelWebview;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::panel::{PanelEvent, PanelRegistry, PanelServices};
use crate::ports::Webview;
use crate::ui::terminal::{parse_input, Input, LineReader, HELP};
use crate::ui::Renderer;

/// Execute the `show` command.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or stdin cannot be
/// read.
pub fn run(ctx: ServiceContext, settings: &Settings, root: &Path) -> Result<(), String> {
    block_on(show(panel_services(ctx, settings, root, false)))?
}

async fn show(services: Arc<PanelServices>) -> Result<(), String> {
    let registry = PanelRegistry::new();
    let (host_tx, mut host_rx) = unbounded_channel();
    let (event_tx, event_rx) = unbounded_channel();
    let (ui_tx, mut ui_rx) = unbounded_channel();

    registry.create_or_show(&services, move || {
        let webview: Arc<dyn Webview> = Arc::new(ChannelWebview::new(host_tx));
        (webview, event_rx)
    });

    let mut renderer = Renderer::new(ui_tx);
    let mut input = LineReader::stdin();
    draw(&renderer);

    let result = loop {
        tokio::select! {
            message = host_rx.recv() => match message {
                Some(message) => {
                    if renderer.handle(message) {
                        draw(&renderer);
                    }
                }
                None => break Ok(()),
            },
            Some(request) = ui_rx.recv() => {
                if event_tx.send(PanelEvent::Message(request)).is_err() {
                    break Ok(());
                }
            }
            line = input.next_line() => match line {
                Ok(Some(line)) => match parse_input(&line) {
                    Some(Input::Select(index)) => {
                        if renderer.select_index(index) {
                            // The panel opens the file before the next line is
                            // read; a foreground editor owns the terminal until
                            // it exits.
                            while let Ok(request) = ui_rx.try_recv() {
                                if event_tx.send(PanelEvent::Message(request)).is_err() {
                                    break;
                                }
                            }
                            tokio::task::yield_now().await;
                            draw(&renderer);
                        } else {
                            eprintln!("No entry {}", index + 1);
                        }
                    }
                    Some(Input::Summarize) => {
                        if renderer.generate_summary().is_none() {
                            eprintln!("Select a file first");
                        }
                    }
                    Some(Input::Refresh) => draw(&renderer),
                    Some(Input::Help) | None => println!("{HELP}"),
                    Some(Input::Quit) => break Ok(()),
                },
                Ok(None) => break Ok(()),
                Err(e) => break Err(format!("Failed to read input: {e}")),
            },
        }
    };

    registry.dispose();
    result
}

fn draw(renderer: &Renderer) {
    if std::io::stdout().is_terminal() {
        print!("\x1b[2J\x1b[H");
    }
    println!("{}", renderer.render());
    println!("{HELP}");
}
