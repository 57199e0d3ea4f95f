//! Tree/detail renderer: the UI half of the panel.
//!
//! The renderer is a pure state holder. Host messages go in through
//! [`Renderer::handle`], user actions through [`Renderer::select`] and
//! [`Renderer::generate_summary`], and requests for the host come out of the
//! outbox channel. [`Renderer::render`] draws the current state as text.

pub mod terminal;

use std::fmt::Write as _;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::model::FileNode;
use crate::panel::shell::LOADING_TEXT;
use crate::protocol::{HostMessage, UiMessage};

/// Detail pane text when nothing is selected.
pub const NO_SELECTION_TEXT: &str = "Select a file from the graph to view details";

/// Label of the summary action.
pub const GENERATE_SUMMARY_LABEL: &str = "Generate Summary";

/// A node together with its depth in the tree, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleEntry<'a> {
    /// Distance from the root level.
    pub depth: usize,
    /// The node.
    pub node: &'a FileNode,
}

/// State of the tree/detail view.
pub struct Renderer {
    nodes: Vec<FileNode>,
    selected: Option<FileNode>,
    summary: String,
    outbox: UnboundedSender<UiMessage>,
    next_request: u64,
    pending: Option<u64>,
}

impl Renderer {
    /// Creates an empty renderer that sends host requests to `outbox`.
    #[must_use]
    pub fn new(outbox: UnboundedSender<UiMessage>) -> Self {
        Self {
            nodes: Vec::new(),
            selected: None,
            summary: String::new(),
            outbox,
            next_request: 1,
            pending: None,
        }
    }

    /// Applies a host message. Returns `true` if the view changed.
    pub fn handle(&mut self, message: HostMessage) -> bool {
        match message {
            HostMessage::LoadData { data } => {
                self.nodes = data;
                true
            }
            HostMessage::ShowSummary { summary, request_id } => {
                if let Some(id) = request_id {
                    if self.pending != Some(id) {
                        debug!(request_id = id, pending = ?self.pending, "dropping stale summary");
                        return false;
                    }
                }
                self.pending = None;
                self.summary = summary;
                true
            }
        }
    }

    /// Selects `node`, clears the summary and asks the host to open files.
    pub fn select(&mut self, node: &FileNode) {
        self.selected = Some(node.clone());
        self.summary.clear();
        self.pending = None;
        if node.is_file() {
            self.send(UiMessage::OpenFile { path: node.path.clone() });
        }
    }

    /// Selects the node with `id`. Returns `false` if there is none.
    pub fn select_id(&mut self, id: &str) -> bool {
        let found = self.visible_entries().into_iter().find(|e| e.node.id == id).map(|e| e.node.clone());
        match found {
            Some(node) => {
                self.select(&node);
                true
            }
            None => false,
        }
    }

    /// Selects the `index`-th entry of [`Self::visible_entries`].
    pub fn select_index(&mut self, index: usize) -> bool {
        let found = self.visible_entries().get(index).map(|e| e.node.clone());
        match found {
            Some(node) => {
                self.select(&node);
                true
            }
            None => false,
        }
    }

    /// Whether the summary action is available.
    #[must_use]
    pub fn can_generate_summary(&self) -> bool {
        self.selected.as_ref().is_some_and(FileNode::is_file)
    }

    /// Requests a summary of the selected file and returns its token.
    ///
    /// Does nothing for directories or when nothing is selected.
    pub fn generate_summary(&mut self) -> Option<u64> {
        let path = match &self.selected {
            Some(node) if node.is_file() => node.path.clone(),
            _ => return None,
        };
        let request_id = self.next_request;
        self.next_request += 1;
        self.pending = Some(request_id);
        self.send(UiMessage::GetSummary { path, request_id: Some(request_id) });
        Some(request_id)
    }

    /// The current tree.
    #[must_use]
    pub fn nodes(&self) -> &[FileNode] {
        &self.nodes
    }

    /// The current selection.
    #[must_use]
    pub fn selected(&self) -> Option<&FileNode> {
        self.selected.as_ref()
    }

    /// The displayed summary; empty when none.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Every node, depth first, in the order it is drawn.
    #[must_use]
    pub fn visible_entries(&self) -> Vec<VisibleEntry<'_>> {
        fn walk<'a>(nodes: &'a [FileNode], depth: usize, out: &mut Vec<VisibleEntry<'a>>) {
            for node in nodes {
                out.push(VisibleEntry { depth, node });
                walk(&node.children, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.nodes, 0, &mut out);
        out
    }

    /// Draws the tree pane followed by the detail pane.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("Project Structure\n\n");
        if self.nodes.is_empty() {
            out.push_str(LOADING_TEXT);
            out.push('\n');
        } else {
            for (number, entry) in self.visible_entries().iter().enumerate() {
                let marker = if entry.node.is_file() { "-" } else { "+" };
                let suffix = if entry.node.is_file() { "" } else { "/" };
                let _ = writeln!(
                    out,
                    "{:>4}  {}{marker} {}{suffix}",
                    number + 1,
                    "  ".repeat(entry.depth),
                    entry.node.name
                );
            }
        }

        out.push_str("\nFile Details\n\n");
        let Some(node) = &self.selected else {
            out.push_str(NO_SELECTION_TEXT);
            out.push('\n');
            return out;
        };
        let _ = writeln!(out, "{}", node.name);
        let _ = writeln!(out, "Path: {}", node.path.display());
        let _ = writeln!(out, "Type: {}", node.kind.as_str());
        if node.is_file() {
            let _ = writeln!(out, "\n[{GENERATE_SUMMARY_LABEL}]");
            if !self.summary.is_empty() {
                let _ = writeln!(out, "\nSummary\n{}", self.summary);
            }
        }
        out
    }

    fn send(&self, message: UiMessage) {
        if self.outbox.send(message).is_err() {
            warn!("host is gone; request dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    use super::*;
    use crate::model::NodeKind;

    fn node(id: &str, kind: NodeKind, children: Vec<FileNode>) -> FileNode {
        FileNode {
            id: id.into(),
            name: id.rsplit('-').next().unwrap_or(id).into(),
            path: PathBuf::from(format!("/w/{}", id.replace('-', "/"))),
            kind,
            children,
        }
    }

    fn loaded() -> (Renderer, UnboundedReceiver<UiMessage>) {
        let (tx, rx) = unbounded_channel();
        let mut renderer = Renderer::new(tx);
        renderer.handle(HostMessage::LoadData {
            data: vec![
                node("src", NodeKind::Directory, vec![node("src-main.rs", NodeKind::File, vec![])]),
                node("readme.md", NodeKind::File, vec![]),
            ],
        });
        (renderer, rx)
    }

    #[test]
    fn shows_placeholders_before_data_and_selection() {
        let (tx, _rx) = unbounded_channel();
        let text = Renderer::new(tx).render();
        assert!(text.contains(LOADING_TEXT));
        assert!(text.contains(NO_SELECTION_TEXT));
    }

    #[test]
    fn selecting_a_file_opens_it_and_enables_summary() {
        let (mut renderer, mut rx) = loaded();

        assert!(renderer.select_id("readme.md"));

        assert_eq!(rx.try_recv().unwrap(), UiMessage::OpenFile { path: PathBuf::from("/w/readme.md") });
        assert!(renderer.can_generate_summary());
        assert!(renderer.render().contains("[Generate Summary]"));
    }

    #[test]
    fn selecting_a_directory_disables_summary_and_sends_nothing() {
        let (mut renderer, mut rx) = loaded();

        assert!(renderer.select_id("src"));

        assert!(rx.try_recv().is_err());
        assert!(!renderer.can_generate_summary());
        assert_eq!(renderer.generate_summary(), None);
        assert!(rx.try_recv().is_err());
        assert!(!renderer.render().contains(GENERATE_SUMMARY_LABEL));
    }

    #[test]
    fn summary_without_selection_is_a_no_op() {
        let (mut renderer, mut rx) = loaded();
        assert_eq!(renderer.generate_summary(), None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn new_selection_clears_summary_immediately() {
        let (mut renderer, mut rx) = loaded();
        renderer.select_id("readme.md");
        let token = renderer.generate_summary().unwrap();
        renderer.handle(HostMessage::ShowSummary { summary: "old".into(), request_id: Some(token) });
        assert_eq!(renderer.summary(), "old");

        renderer.select_id("src-main.rs");

        assert_eq!(renderer.summary(), "");
        assert!(!renderer.render().contains("old"));
        while rx.try_recv().is_ok() {}
    }

    #[test]
    fn stale_summaries_are_dropped() {
        let (mut renderer, mut rx) = loaded();
        renderer.select_id("readme.md");
        let first = renderer.generate_summary().unwrap();
        let second = renderer.generate_summary().unwrap();
        assert_ne!(first, second);

        let _open = rx.try_recv().unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            UiMessage::GetSummary { path: PathBuf::from("/w/readme.md"), request_id: Some(first) }
        );

        assert!(!renderer.handle(HostMessage::ShowSummary { summary: "stale".into(), request_id: Some(first) }));
        assert!(renderer.handle(HostMessage::ShowSummary { summary: "fresh".into(), request_id: Some(second) }));
        assert_eq!(renderer.summary(), "fresh");
    }

    #[test]
    fn response_after_reselect_is_dropped() {
        let (mut renderer, _rx) = loaded();
        renderer.select_id("readme.md");
        let token = renderer.generate_summary().unwrap();
        renderer.select_id("src-main.rs");

        assert!(!renderer.handle(HostMessage::ShowSummary { summary: "late".into(), request_id: Some(token) }));
        assert_eq!(renderer.summary(), "");
    }

    #[test]
    fn untagged_summary_is_shown() {
        let (mut renderer, _rx) = loaded();
        renderer.select_id("readme.md");
        renderer.handle(HostMessage::ShowSummary { summary: "SUMMARY_TEXT".into(), request_id: None });
        assert_eq!(renderer.summary(), "SUMMARY_TEXT");
        assert!(renderer.render().contains("Summary\nSUMMARY_TEXT"));
    }

    #[test]
    fn tree_is_rendered_in_depth_first_order_with_numbers() {
        let (renderer, _rx) = loaded();
        let ids: Vec<_> = renderer.visible_entries().iter().map(|e| (e.depth, e.node.id.as_str())).collect();
        assert_eq!(ids, [(0, "src"), (1, "src-main.rs"), (0, "readme.md")]);

        let text = renderer.render();
        assert!(text.contains("   1  + src/\n"));
        assert!(text.contains("   2    - main.rs\n"));
        assert!(text.contains("   3  - readme.md\n"));
    }

    #[test]
    fn select_index_and_unknown_ids() {
        let (mut renderer, _rx) = loaded();
        assert!(renderer.select_index(1));
        assert_eq!(renderer.selected().unwrap().id, "src-main.rs");
        assert!(!renderer.select_index(3));
        assert!(!renderer.select_id("nope"));
        assert_eq!(renderer.selected().unwrap().id, "src-main.rs");
    }
}
