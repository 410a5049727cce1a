//! View controller.
//!
//! Owns one [`AppState`], turns [`Action`]s into state transitions and
//! re-renders after each change. A render is recorded by bumping the state's
//! revision; the markup itself is produced on demand by
//! [`templates::render_app`], which is a pure function of the state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::models::{Action, AppState, ProcessingStatus, Tab};
use crate::server::templates;
use crate::services::{ProcessingTasks, TaskKind, TaskToken};

/// Timing and scheduling behaviour of a controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Delay before received files are marked processed.
    pub upload_delay: Duration,
    /// Delay before a requested quiz is marked ready.
    pub quiz_delay: Duration,
    /// Cancel pending processing when a new one is triggered.
    pub coalesce_tasks: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            upload_delay: Duration::from_millis(2000),
            quiz_delay: Duration::from_millis(1500),
            coalesce_tasks: false,
        }
    }
}

/// Result of dispatching an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// State changed and the view re-rendered at this revision.
    Rendered { revision: u64 },
    /// Nothing changed; no render happened.
    Unchanged,
}

impl Dispatch {
    pub fn rendered(&self) -> bool {
        matches!(self, Dispatch::Rendered { .. })
    }
}

struct Shared {
    state: RwLock<AppState>,
    revisions: watch::Sender<u64>,
}

impl Shared {
    /// Record a render of the current state.
    fn commit(&self, state: &mut AppState) -> u64 {
        state.revision += 1;
        self.revisions.send_replace(state.revision);
        state.revision
    }

    async fn complete(&self, kind: TaskKind) {
        let mut state = self.state.write().await;
        state.processing_status = ProcessingStatus::Complete;
        let revision = self.commit(&mut state);
        debug!("{} complete, revision {}", kind, revision);
    }
}

/// Controller for one page instance.
pub struct ViewController {
    shared: Arc<Shared>,
    tasks: ProcessingTasks,
    config: ControllerConfig,
}

impl ViewController {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self::with_state(AppState::new(), config)
    }

    /// Start from an explicit state, e.g. for rendering snapshots.
    pub fn with_state(state: AppState, config: ControllerConfig) -> Self {
        let (revisions, _) = watch::channel(state.revision);
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(state),
                revisions,
            }),
            tasks: ProcessingTasks::with_coalescing(config.coalesce_tasks),
            config,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn tasks(&self) -> &ProcessingTasks {
        &self.tasks
    }

    /// Apply an action.
    pub async fn dispatch(&self, action: Action) -> Dispatch {
        debug!("Dispatching {}", action.binding());
        match action {
            Action::SelectTab { tab } => self.select_tab(tab).await,
            Action::ReceiveFiles { files } => self.receive_files(files).await.0,
            Action::GenerateQuiz => self.generate_quiz().await.0,
            Action::SelectFile { name } => self.select_file(&name).await,
        }
    }

    pub async fn select_tab(&self, tab: Tab) -> Dispatch {
        let mut state = self.shared.state.write().await;
        state.current_tab = tab;
        let revision = self.shared.commit(&mut state);
        debug!("Switched to {} tab", tab);
        Dispatch::Rendered { revision }
    }

    /// Append selected file names and start the simulated processing.
    ///
    /// An empty selection (the picker was cancelled) changes nothing.
    pub async fn receive_files(&self, files: Vec<String>) -> (Dispatch, Option<TaskToken>) {
        if files.is_empty() {
            debug!("Empty file selection ignored");
            return (Dispatch::Unchanged, None);
        }

        let revision = {
            let mut state = self.shared.state.write().await;
            debug!("Received {} file(s)", files.len());
            state.uploaded_files.extend(files);
            state.processing_status = ProcessingStatus::Processing;
            self.shared.commit(&mut state)
        };

        let token = self.start_processing(TaskKind::FileProcessing, self.config.upload_delay);
        (Dispatch::Rendered { revision }, Some(token))
    }

    /// Start the simulated quiz generation. A no-op while no files exist.
    pub async fn generate_quiz(&self) -> (Dispatch, Option<TaskToken>) {
        let revision = {
            let mut state = self.shared.state.write().await;
            if !state.has_files() {
                debug!("Quiz generation ignored: no files uploaded");
                return (Dispatch::Unchanged, None);
            }
            state.processing_status = ProcessingStatus::Processing;
            self.shared.commit(&mut state)
        };

        let token = self.start_processing(TaskKind::QuizGeneration, self.config.quiz_delay);
        (Dispatch::Rendered { revision }, Some(token))
    }

    /// Highlight a listed file. Names not in the list are ignored.
    pub async fn select_file(&self, name: &str) -> Dispatch {
        let mut state = self.shared.state.write().await;
        if !state.uploaded_files.iter().any(|f| f == name) {
            debug!("Ignoring selection of unknown file {:?}", name);
            return Dispatch::Unchanged;
        }
        state.selected_file = Some(name.to_string());
        Dispatch::Rendered {
            revision: self.shared.commit(&mut state),
        }
    }

    fn start_processing(&self, kind: TaskKind, delay: Duration) -> TaskToken {
        let shared = Arc::clone(&self.shared);
        self.tasks
            .schedule(kind, delay, async move { shared.complete(kind).await })
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> AppState {
        self.shared.state.read().await.clone()
    }

    pub fn revision(&self) -> u64 {
        *self.shared.revisions.borrow()
    }

    /// Markup for the current state.
    pub async fn render(&self) -> String {
        let state = self.shared.state.read().await;
        templates::render_app(&state)
    }

    /// Render together with the revision it reflects.
    pub async fn render_with_revision(&self) -> (u64, String) {
        let state = self.shared.state.read().await;
        (state.revision, templates::render_app(&state))
    }

    /// Wait until the revision moves past `after`, returning the new one.
    pub async fn wait_for_revision(&self, after: u64) -> u64 {
        let mut rx = self.shared.revisions.subscribe();
        let revision = match rx.wait_for(|revision| *revision > after).await {
            Ok(revision) => *revision,
            // The sender lives as long as `self`.
            Err(_) => self.revision(),
        };
        revision
    }

    /// Wait for all pending processing to finish.
    pub async fn settle(&self) -> usize {
        self.tasks.join_all().await
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(files: &[&str]) -> Vec<String> {
        files.iter().map(|f| f.to_string()).collect()
    }

    #[tokio::test]
    async fn test_select_tab_rerenders() {
        let controller = ViewController::new();
        let outcome = controller.select_tab(Tab::Analytics).await;
        assert_eq!(outcome, Dispatch::Rendered { revision: 1 });
        assert_eq!(controller.snapshot().await.current_tab, Tab::Analytics);

        // Re-selecting the active tab still renders, like a click would.
        assert!(controller.select_tab(Tab::Analytics).await.rendered());
        assert_eq!(controller.revision(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_receive_files_appends_in_order() {
        let controller = ViewController::new();
        controller.receive_files(names(&["a.pdf", "b.txt"])).await;
        controller.receive_files(names(&["c.docx", "a.pdf"])).await;

        let state = controller.snapshot().await;
        assert_eq!(
            state.uploaded_files,
            names(&["a.pdf", "b.txt", "c.docx", "a.pdf"])
        );
        assert_eq!(state.processing_status, ProcessingStatus::Processing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_selection_is_ignored() {
        let controller = ViewController::new();
        let before = controller.snapshot().await;

        let (outcome, token) = controller.receive_files(Vec::new()).await;
        assert_eq!(outcome, Dispatch::Unchanged);
        assert!(token.is_none());
        assert_eq!(controller.snapshot().await, before);
        assert!(controller.tasks().pending().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_quiz_requires_files() {
        let controller = ViewController::new();
        let (outcome, token) = controller.generate_quiz().await;
        assert_eq!(outcome, Dispatch::Unchanged);
        assert!(token.is_none());
        assert_eq!(controller.revision(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_completes_after_upload_delay() {
        let controller = ViewController::new();
        let (_, token) = controller.receive_files(names(&["notes.pdf"])).await;
        let token = token.unwrap();

        tokio::time::advance(Duration::from_millis(1999)).await;
        tokio::task::yield_now().await;
        assert_eq!(
            controller.snapshot().await.processing_status,
            ProcessingStatus::Processing
        );

        assert!(controller.tasks().join(token).await);
        let state = controller.snapshot().await;
        assert_eq!(state.processing_status, ProcessingStatus::Complete);
        assert_eq!(state.revision, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_file_goes_through_render() {
        let controller = ViewController::new();
        controller.receive_files(names(&["a.pdf", "b.txt"])).await;

        let outcome = controller.select_file("b.txt").await;
        assert!(outcome.rendered());
        assert_eq!(
            controller.snapshot().await.selected_file.as_deref(),
            Some("b.txt")
        );

        assert_eq!(controller.select_file("zzz.pdf").await, Dispatch::Unchanged);
        assert_eq!(
            controller.snapshot().await.selected_file.as_deref(),
            Some("b.txt")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_revision_sees_timer_render() {
        let controller = ViewController::new();
        let (outcome, _) = controller.receive_files(names(&["a.pdf"])).await;
        let Dispatch::Rendered { revision } = outcome else {
            panic!("expected a render");
        };

        let next = controller.wait_for_revision(revision).await;
        assert_eq!(next, revision + 1);
        assert_eq!(
            controller.snapshot().await.processing_status,
            ProcessingStatus::Complete
        );
    }
}
