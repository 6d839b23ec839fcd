use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::api::NotebookBackend;
use crate::models::Document;

/// What the document panel renders: the list plus its loading/error flags.
#[derive(Debug, Clone, Default)]
pub struct DocumentListState {
    pub documents: Vec<Document>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Keeps the document list for one notebook eventually consistent with
/// backend state. Processing is asynchronous server-side, so the list is
/// re-fetched on a fixed interval for the lifetime of the workspace; an
/// explicit refresh (initial load, post-upload) additionally drives the
/// loading and error flags.
pub struct DocumentPoller {
    backend: Arc<dyn NotebookBackend>,
    notebook_id: i64,
    cancel: CancellationToken,
    state: RwLock<DocumentListState>,
}

impl DocumentPoller {
    pub fn new(
        backend: Arc<dyn NotebookBackend>,
        notebook_id: i64,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            backend,
            notebook_id,
            cancel,
            state: RwLock::new(DocumentListState::default()),
        }
    }

    /// Fetch the document list once.
    ///
    /// `explicit = true` is a user-visible action: the loading flag is set
    /// for the call's duration and a failure raises the error state.
    /// `explicit = false` is a background tick: failures are logged and
    /// swallowed so transient blips never clear data already on screen.
    pub async fn refresh(&self, explicit: bool) {
        if self.cancel.is_cancelled() {
            return;
        }
        if explicit {
            self.state.write().await.loading = true;
        }

        let result = self.backend.list_documents(Some(self.notebook_id)).await;

        // The session may have been torn down while the request was in
        // flight; a late response must not touch state owned by a view
        // that no longer exists.
        if self.cancel.is_cancelled() {
            if explicit {
                self.state.write().await.loading = false;
            }
            return;
        }

        let mut state = self.state.write().await;
        match result {
            Ok(documents) => {
                state.documents = documents;
                state.error = None;
            }
            Err(e) => {
                if explicit {
                    state.error = Some("Failed to load documents".to_string());
                } else {
                    warn!(notebook_id = self.notebook_id, error = %e, "Background document poll failed");
                }
            }
        }
        if explicit {
            state.loading = false;
        }
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.state.read().await.documents.clone()
    }

    pub async fn state(&self) -> DocumentListState {
        self.state.read().await.clone()
    }
}
