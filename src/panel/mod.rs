//! Panel controller: lifecycle of the single visualization panel.
//!
//! [`PanelRegistry`] owns at most one open [`Panel`]. Opening installs a
//! listener for UI events, sets the shell document and starts the one scan
//! of the first workspace root. UI requests are served by spawned tasks
//! that are tracked as subscriptions and released when the panel is
//! disposed.

pub mod shell;

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::context::ServiceContext;
use crate::model::count_nodes;
use crate::ports::{Editor, Webview};
use crate::protocol::{HostMessage, UiMessage};
use crate::scan::{scan, ScanOptions};
use crate::summary::{summarize, SummaryOptions, PROGRESS_TITLE};

/// Notification shown when there is nothing to scan.
pub const NO_WORKSPACE: &str = "No workspace folder found";

/// Everything a panel needs to serve UI requests.
pub struct PanelServices {
    /// Port adapters.
    pub ctx: ServiceContext,
    /// Host editor.
    pub editor: Box<dyn Editor>,
    /// Scan filter.
    pub scan: ScanOptions,
    /// Summary settings.
    pub summary: SummaryOptions,
}

/// Something that happened on the UI side of a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// A decoded UI request.
    Message(UiMessage),
    /// Undecoded JSON text from the UI.
    Raw(String),
    /// The UI will send nothing more. Work already started (the scan,
    /// in-flight summaries) finishes and is delivered, then the panel
    /// closes.
    InputClosed,
    /// The user closed the panel.
    Disposed,
}

/// Whether a panel is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// No panel exists.
    Closed,
    /// A panel is open.
    Open,
}

/// Result of [`PanelRegistry::create_or_show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// A new panel was created.
    Created,
    /// The existing panel was brought to the front.
    Revealed,
}

/// One open panel.
pub struct Panel {
    webview: Arc<dyn Webview>,
    subscriptions: Mutex<Vec<JoinHandle<()>>>,
    pending_work: watch::Sender<usize>,
    disposed: AtomicBool,
}

/// Counts one unit of panel work for as long as it is alive.
struct WorkGuard(Arc<Panel>);

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.0.pending_work.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl Panel {
    fn new(webview: Arc<dyn Webview>) -> Self {
        Self {
            webview,
            subscriptions: Mutex::new(Vec::new()),
            pending_work: watch::Sender::new(0),
            disposed: AtomicBool::new(false),
        }
    }

    /// Whether this panel has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Number of tracked tasks that have not finished yet.
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        let subscriptions = self.subscriptions.lock().unwrap_or_else(PoisonError::into_inner);
        subscriptions.iter().filter(|handle| !handle.is_finished()).count()
    }

    fn track(&self, handle: JoinHandle<()>) {
        if self.is_disposed() {
            handle.abort();
            return;
        }
        let mut subscriptions = self.subscriptions.lock().unwrap_or_else(PoisonError::into_inner);
        subscriptions.retain(|handle| !handle.is_finished());
        subscriptions.push(handle);
    }

    /// Number of scans and summaries that have not finished yet.
    #[must_use]
    pub fn pending_work(&self) -> usize {
        *self.pending_work.borrow()
    }

    /// Spawns `work` as a tracked subscription counted by [`Self::pending_work`].
    /// The count drops when the task finishes or is aborted.
    fn spawn_work<F>(self: &Arc<Self>, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.pending_work.send_modify(|n| *n += 1);
        let guard = WorkGuard(Arc::clone(self));
        self.track(tokio::spawn(async move {
            let _guard = guard;
            work.await;
        }));
    }

    async fn wait_for_idle(&self) {
        let mut pending = self.pending_work.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = pending.wait_for(|n| *n == 0).await;
    }

    /// Releases every subscription and closes the webview. Runs once.
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let subscriptions = std::mem::take(
            &mut *self.subscriptions.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for handle in &subscriptions {
            handle.abort();
        }
        self.webview.dispose();
        info!(released = subscriptions.len(), "panel disposed");
    }

    fn post(&self, message: &HostMessage) {
        if let Err(e) = self.webview.post_message(message) {
            warn!(error = %e, "failed to post message to panel");
        }
    }
}

/// Holder of the single open panel.
///
/// Clones share the same slot. `create_or_show` and `dispose` are the only
/// operations that change it.
#[derive(Clone, Default)]
pub struct PanelRegistry {
    slot: Arc<Mutex<Option<Arc<Panel>>>>,
}

impl PanelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the panel, or reveals it when one is already open.
    ///
    /// `open` is called only when a new panel is needed and returns the
    /// webview plus the stream of UI events for it. Must be called from
    /// within a tokio runtime.
    pub fn create_or_show<F>(&self, services: &Arc<PanelServices>, open: F) -> ShowOutcome
    where
        F: FnOnce() -> (Arc<dyn Webview>, UnboundedReceiver<PanelEvent>),
    {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(panel) = slot.as_ref() {
            panel.webview.reveal();
            return ShowOutcome::Revealed;
        }

        let (webview, events) = open();
        let panel = Arc::new(Panel::new(webview));

        panel.track(tokio::spawn(listen(
            self.clone(),
            Arc::clone(services),
            Arc::clone(&panel),
            events,
        )));
        panel.webview.set_html(&shell::shell_html(&shell::new_nonce()));

        match services.editor.workspace_roots().into_iter().next() {
            Some(root) => {
                panel.spawn_work(load_project_structure(
                    Arc::clone(services),
                    Arc::clone(&panel),
                    root,
                ));
            }
            None => services.editor.show_error(NO_WORKSPACE),
        }

        *slot = Some(panel);
        info!("panel created");
        ShowOutcome::Created
    }

    /// Disposes the open panel, if any.
    pub fn dispose(&self) {
        let panel = self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(panel) = panel {
            panel.dispose();
        }
    }

    /// Whether a panel is open.
    #[must_use]
    pub fn state(&self) -> PanelState {
        if self.slot.lock().unwrap_or_else(PoisonError::into_inner).is_some() {
            PanelState::Open
        } else {
            PanelState::Closed
        }
    }

    /// The open panel, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Panel>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Empties the slot if it still holds `panel`, then disposes `panel`.
    fn release(&self, panel: &Arc<Panel>) {
        {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, panel)) {
                *slot = None;
            }
        }
        panel.dispose();
    }
}

async fn listen(
    registry: PanelRegistry,
    services: Arc<PanelServices>,
    panel: Arc<Panel>,
    mut events: UnboundedReceiver<PanelEvent>,
) {
    while let Some(event) = events.recv().await {
        match event {
            PanelEvent::Message(message) => handle_message(&services, &panel, message),
            PanelEvent::Raw(text) => match UiMessage::parse(&text) {
                Ok(message) => handle_message(&services, &panel, message),
                Err(e) => warn!(error = %e, "ignoring message from panel"),
            },
            PanelEvent::InputClosed => {
                debug!(pending = panel.pending_work(), "panel input closed");
                panel.wait_for_idle().await;
                break;
            }
            PanelEvent::Disposed => break,
        }
    }
    debug!("panel listener stopped");
    registry.release(&panel);
}

fn handle_message(services: &Arc<PanelServices>, panel: &Arc<Panel>, message: UiMessage) {
    match message {
        UiMessage::OpenFile { path } => {
            if let Err(e) = services.editor.open_document(&path) {
                services.editor.show_error(&format!("Failed to open file: {e}"));
            }
        }
        UiMessage::GetSummary { path, request_id } => {
            panel.spawn_work(generate_summary(
                Arc::clone(services),
                Arc::clone(panel),
                path,
                request_id,
            ));
        }
    }
}

async fn load_project_structure(services: Arc<PanelServices>, panel: Arc<Panel>, root: PathBuf) {
    let scanner = Arc::clone(&services);
    let scanned = tokio::task::spawn_blocking(move || {
        scan(scanner.ctx.fs.as_ref(), &root, &scanner.scan)
    })
    .await;

    match scanned {
        Ok(data) => {
            info!(nodes = count_nodes(&data), "project structure loaded");
            panel.post(&HostMessage::LoadData { data });
        }
        Err(e) => error!(error = %e, "scan task failed"),
    }
}

async fn generate_summary(
    services: Arc<PanelServices>,
    panel: Arc<Panel>,
    path: PathBuf,
    request_id: Option<u64>,
) {
    let editor = services.editor.as_ref();
    let result = summarize(&services.ctx, &path, &services.summary, |step| {
        editor.report_progress(PROGRESS_TITLE, step.percent());
    })
    .await;

    match result {
        Ok(summary) => panel.post(&HostMessage::ShowSummary { summary, request_id }),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "summary failed");
            editor.show_error(&e.user_message());
        }
    }
}
