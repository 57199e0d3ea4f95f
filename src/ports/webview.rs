//! Webview port: the UI surface of the panel.

use super::BoxError;
use crate::protocol::HostMessage;

/// Host-side handle to a panel's UI surface.
///
/// Messages travel from the host to the UI through [`Webview::post_message`];
/// the reverse direction is a channel handed to the panel controller when the
/// panel is created.
pub trait Webview: Send + Sync {
    /// Replaces the static document rendered by the panel.
    fn set_html(&self, html: &str);

    /// Posts a message to the UI.
    ///
    /// # Errors
    ///
    /// Returns an error if the UI side is gone or the message cannot be encoded.
    fn post_message(&self, message: &HostMessage) -> Result<(), BoxError>;

    /// Brings the panel to the front.
    fn reveal(&self);

    /// Closes the panel surface.
    fn dispose(&self);
}
