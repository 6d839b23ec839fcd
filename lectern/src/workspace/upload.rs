use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::NotebookBackend;
use crate::error::{LecternError, Result};
use crate::models::Document;

/// Submits files into the active notebook. One upload at a time; a
/// failure leaves nothing half-applied, so the caller can simply retry.
pub struct DocumentUploader {
    backend: Arc<dyn NotebookBackend>,
    notebook_id: Option<i64>,
    busy: AtomicBool,
}

impl DocumentUploader {
    pub fn new(backend: Arc<dyn NotebookBackend>, notebook_id: Option<i64>) -> Self {
        Self {
            backend,
            notebook_id,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Upload one file. Rejects before any network call when no notebook
    /// is active or another upload is still running.
    pub async fn upload(
        &self,
        filename: &str,
        mime_type: &str,
        content: Vec<u8>,
    ) -> Result<Document> {
        let Some(notebook_id) = self.notebook_id else {
            return Err(LecternError::Validation(
                "Please select a notebook first.".to_string(),
            ));
        };

        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LecternError::Validation(
                "An upload is already in progress.".to_string(),
            ));
        }

        let result = self
            .backend
            .upload_document(notebook_id, filename, mime_type, content)
            .await;
        self.busy.store(false, Ordering::SeqCst);
        result
    }
}
