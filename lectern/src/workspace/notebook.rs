use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::error;

use crate::api::NotebookBackend;
use crate::models::Notebook;

/// Observable state of the one-shot notebook metadata fetch.
#[derive(Debug, Clone)]
pub enum NotebookState {
    Loading,
    /// Terminal for this session; cleared only by opening the workspace again.
    Failed(String),
    Loaded(Notebook),
}

pub struct NotebookLoader {
    backend: Arc<dyn NotebookBackend>,
    notebook_id: i64,
    state: RwLock<NotebookState>,
}

impl NotebookLoader {
    pub fn new(backend: Arc<dyn NotebookBackend>, notebook_id: i64) -> Self {
        Self {
            backend,
            notebook_id,
            state: RwLock::new(NotebookState::Loading),
        }
    }

    /// Fetch the notebook's metadata. Called once per workspace open; a
    /// failure is not retried automatically.
    pub async fn load(&self) {
        match self.backend.get_notebook(self.notebook_id).await {
            Ok(notebook) => {
                *self.state.write().await = NotebookState::Loaded(notebook);
            }
            Err(e) => {
                error!(notebook_id = self.notebook_id, error = %e, "Failed to load notebook");
                *self.state.write().await = NotebookState::Failed(
                    "Failed to load notebook. It might not exist or the server is down."
                        .to_string(),
                );
            }
        }
    }

    pub async fn state(&self) -> NotebookState {
        self.state.read().await.clone()
    }

    pub async fn notebook(&self) -> Option<Notebook> {
        match &*self.state.read().await {
            NotebookState::Loaded(notebook) => Some(notebook.clone()),
            _ => None,
        }
    }
}
