use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::NotebookBackend;
use crate::config::WorkspaceConfig;
use crate::error::{LecternError, Result};
use crate::models::{ChatMessage, Document, GraphView};

use super::{
    ChatSession, DocumentListState, DocumentPoller, DocumentUploader, GraphFetchGate,
    NotebookLoader, NotebookState, SendOutcome,
};

/// One open notebook workspace: the notebook's metadata, its polled
/// document list, the derived graph snapshot, a chat transcript, and the
/// upload path, wired together with a shared cancellation scope.
///
/// All state is owned by this session. Opening a different notebook means
/// closing this session and opening a new one, which is what resets the
/// document list, error flags, and graph snapshot and tears down the poll
/// timer bound to the old notebook id.
pub struct WorkspaceSession {
    notebook_id: i64,
    cancel: CancellationToken,
    loader: NotebookLoader,
    poller: Arc<DocumentPoller>,
    gate: Arc<GraphFetchGate>,
    chat: ChatSession,
    uploader: DocumentUploader,
}

impl WorkspaceSession {
    /// Enter the workspace: load notebook metadata once, do the initial
    /// explicit document refresh, and start the background poll task.
    pub async fn open(
        backend: Arc<dyn NotebookBackend>,
        notebook_id: i64,
        config: &WorkspaceConfig,
    ) -> Self {
        let cancel = CancellationToken::new();
        let session = Self {
            notebook_id,
            loader: NotebookLoader::new(backend.clone(), notebook_id),
            poller: Arc::new(DocumentPoller::new(
                backend.clone(),
                notebook_id,
                cancel.child_token(),
            )),
            gate: Arc::new(GraphFetchGate::new(backend.clone())),
            chat: ChatSession::new(backend.clone(), notebook_id),
            uploader: DocumentUploader::new(backend, Some(notebook_id)),
            cancel,
        };

        session.loader.load().await;
        session.refresh_documents().await;
        session.spawn_poll_loop(config.poll_interval_secs);
        session
    }

    /// The background poll task. It holds only the poller and gate (not
    /// the whole session), so dropping the session ends the loop via the
    /// cancellation token rather than keeping the session alive.
    fn spawn_poll_loop(&self, interval_secs: u64) {
        let poller = Arc::clone(&self.poller);
        let gate = Arc::clone(&self.gate);
        let token = self.cancel.child_token();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Document poll loop shutting down");
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_secs(interval_secs)) => {
                        poller.refresh(false).await;
                        gate.sync(&poller.documents().await).await;
                    }
                }
            }
        });
    }

    /// Explicit, user-visible refresh of the document list, followed by
    /// graph reconciliation.
    pub async fn refresh_documents(&self) {
        self.poller.refresh(true).await;
        self.gate.sync(&self.poller.documents().await).await;
    }

    /// Upload a file from disk into this notebook. On success the
    /// document list is refreshed immediately instead of waiting for the
    /// next poll tick.
    pub async fn upload_file(&self, path: &Path) -> Result<Document> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| LecternError::Validation("invalid file name".to_string()))?
            .to_string();
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        let content = tokio::fs::read(path).await?;

        let document = self.uploader.upload(&filename, &mime_type, content).await?;
        self.refresh_documents().await;
        Ok(document)
    }

    pub async fn send_chat(&self, text: &str) -> SendOutcome {
        self.chat.send(text).await
    }

    pub fn notebook_id(&self) -> i64 {
        self.notebook_id
    }

    pub async fn notebook_state(&self) -> NotebookState {
        self.loader.state().await
    }

    pub async fn document_state(&self) -> DocumentListState {
        self.poller.state().await
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.poller.documents().await
    }

    pub async fn graph(&self) -> Option<GraphView> {
        self.gate.graph().await
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.chat.transcript().await
    }

    pub fn chat_in_flight(&self) -> bool {
        self.chat.is_in_flight()
    }

    pub fn is_upload_busy(&self) -> bool {
        self.uploader.is_busy()
    }

    /// Leave the workspace, cancelling the poll task.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for WorkspaceSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
