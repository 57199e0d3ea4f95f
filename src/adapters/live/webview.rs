//! Channel-backed webview.
//!
//! Host messages are pushed onto an unbounded channel; whoever holds the
//! receiving end (the terminal renderer, the stdio bridge, a test) plays the
//! UI side.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::ports::{BoxError, Webview};
use crate::protocol::HostMessage;

/// Webview whose UI side is the receiving end of a channel.
pub struct ChannelWebview {
    outbox: UnboundedSender<HostMessage>,
    html: Mutex<String>,
    reveals: AtomicUsize,
    disposed: AtomicBool,
}

impl ChannelWebview {
    /// Creates a webview posting into `outbox`.
    #[must_use]
    pub fn new(outbox: UnboundedSender<HostMessage>) -> Self {
        Self {
            outbox,
            html: Mutex::new(String::new()),
            reveals: AtomicUsize::new(0),
            disposed: AtomicBool::new(false),
        }
    }

    /// The document last set with [`Webview::set_html`].
    #[must_use]
    pub fn html(&self) -> String {
        self.html.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// How many times the panel was brought to the front.
    #[must_use]
    pub fn reveal_count(&self) -> usize {
        self.reveals.load(Ordering::SeqCst)
    }

    /// Whether [`Webview::dispose`] has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl Webview for ChannelWebview {
    fn set_html(&self, html: &str) {
        *self.html.lock().unwrap_or_else(PoisonError::into_inner) = html.to_string();
    }

    fn post_message(&self, message: &HostMessage) -> Result<(), BoxError> {
        if self.is_disposed() {
            return Err("webview is disposed".into());
        }
        self.outbox.send(message.clone()).map_err(|_| -> BoxError { "UI channel closed".into() })
    }

    fn reveal(&self) {
        self.reveals.fetch_add(1, Ordering::SeqCst);
        debug!("panel revealed");
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn posts_until_disposed() {
        let (tx, mut rx) = unbounded_channel();
        let webview = ChannelWebview::new(tx);
        let message = HostMessage::ShowSummary { summary: "s".into(), request_id: None };

        webview.post_message(&message).unwrap();
        assert_eq!(rx.try_recv().unwrap(), message);

        webview.dispose();
        assert!(webview.is_disposed());
        assert!(webview.post_message(&message).is_err());
    }

    #[test]
    fn closed_receiver_is_an_error() {
        let (tx, rx) = unbounded_channel();
        drop(rx);
        let webview = ChannelWebview::new(tx);
        let message = HostMessage::LoadData { data: vec![] };
        assert!(webview.post_message(&message).is_err());
    }

    #[test]
    fn tracks_html_and_reveals() {
        let (tx, _rx) = unbounded_channel();
        let webview = ChannelWebview::new(tx);
        webview.set_html("<html></html>");
        webview.reveal();
        webview.reveal();
        assert_eq!(webview.html(), "<html></html>");
        assert_eq!(webview.reveal_count(), 2);
    }
}
