use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    CreateDocumentRequest, CreateNotebookRequest, Document, GraphData, Notebook,
};

/// Everything the workspace needs from the remote service, as a trait so
/// the synchronization logic can be exercised against a scripted backend
/// in tests. `HttpBackend` is the production implementation.
#[async_trait]
pub trait NotebookBackend: Send + Sync {
    async fn list_notebooks(&self) -> Result<Vec<Notebook>>;
    async fn create_notebook(&self, request: &CreateNotebookRequest) -> Result<Notebook>;
    async fn get_notebook(&self, id: i64) -> Result<Notebook>;
    async fn delete_notebook(&self, id: i64) -> Result<()>;

    /// List documents, optionally scoped to one notebook.
    async fn list_documents(&self, notebook_id: Option<i64>) -> Result<Vec<Document>>;
    async fn create_document(&self, request: &CreateDocumentRequest) -> Result<Document>;

    /// Multipart upload of a file into a notebook. The payload is the raw
    /// file content; the backend creates the document record and queues
    /// processing.
    async fn upload_document(
        &self,
        notebook_id: i64,
        filename: &str,
        mime_type: &str,
        content: Vec<u8>,
    ) -> Result<Document>;

    /// Fetch the knowledge graph extracted from one document.
    async fn document_graph(&self, document_id: i64) -> Result<GraphData>;

    /// Ask a question against a notebook's documents; returns the answer text.
    async fn chat(&self, notebook_id: i64, query: &str) -> Result<String>;
}
