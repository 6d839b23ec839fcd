#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::{Mutex, Notify};

use lectern::api::NotebookBackend;
use lectern::error::{LecternError, Result};
use lectern::models::{
    CreateDocumentRequest, CreateNotebookRequest, Document, GraphData, Notebook,
    ProcessingStatus,
};

/// Scripted responses carry plain strings for failures; they are lifted
/// into `LecternError::Api` when replayed.
type Scripted<T> = std::result::Result<T, String>;

fn lift<T>(scripted: Scripted<T>) -> Result<T> {
    scripted.map_err(|message| LecternError::Api {
        status: 500,
        message,
    })
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
}

pub fn make_notebook(id: i64) -> Notebook {
    Notebook {
        id,
        title: format!("Notebook {id}"),
        description: "test notebook".to_string(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn make_document(id: i64, status: ProcessingStatus) -> Document {
    Document {
        id,
        filename: format!("doc-{id}.pdf"),
        file_path: format!("/data/uploads/doc-{id}.pdf"),
        mime_type: "application/pdf".to_string(),
        file_size: 1024,
        status,
        error_message: None,
        summary: None,
        created_at: fixed_time(),
        updated_at: fixed_time(),
        is_deleted: false,
        notebook_id: Some(5),
    }
}

pub fn make_graph() -> GraphData {
    serde_json::from_value(serde_json::json!({
        "nodes": [
            {"id": 1, "name": "Alice", "label": "Person"},
            {"id": 2, "name": "New York", "label": "Location"}
        ],
        "edges": [
            {"source_node_id": 1, "target_node_id": 2, "relation_type": "LIVES_IN"}
        ]
    }))
    .unwrap()
}

/// An in-memory `NotebookBackend` with scripted responses and call
/// counters, standing in for the remote service in controller tests.
///
/// Document-list responses are consumed from a queue; the last entry is
/// replayed once the queue is down to one, which models a backend whose
/// state has stopped changing.
#[derive(Default)]
pub struct StubBackend {
    pub notebook: Mutex<Option<Scripted<Notebook>>>,
    pub document_lists: Mutex<VecDeque<Scripted<Vec<Document>>>>,
    pub graph: Mutex<Option<Scripted<GraphData>>>,
    pub chat_replies: Mutex<VecDeque<Scripted<String>>>,
    /// When set, `chat` blocks until the notify fires, letting tests hold
    /// an exchange in flight.
    pub chat_gate: Mutex<Option<Arc<Notify>>>,
    pub upload_result: Mutex<Option<Scripted<Document>>>,
    /// `(notebook_id, filename)` for every upload call received.
    pub uploads: Mutex<Vec<(i64, String)>>,
    pub list_document_calls: AtomicUsize,
    pub graph_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
}

impl StubBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn script_document_lists(&self, lists: Vec<Scripted<Vec<Document>>>) {
        *self.document_lists.lock().await = lists.into();
    }

    pub async fn script_graph(&self, graph: Scripted<GraphData>) {
        *self.graph.lock().await = Some(graph);
    }

    pub async fn script_chat_reply(&self, reply: Scripted<String>) {
        self.chat_replies.lock().await.push_back(reply);
    }

    pub fn list_document_calls(&self) -> usize {
        self.list_document_calls.load(Ordering::SeqCst)
    }

    pub fn graph_calls(&self) -> usize {
        self.graph_calls.load(Ordering::SeqCst)
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotebookBackend for StubBackend {
    async fn list_notebooks(&self) -> Result<Vec<Notebook>> {
        Ok(vec![make_notebook(5)])
    }

    async fn create_notebook(&self, request: &CreateNotebookRequest) -> Result<Notebook> {
        let mut notebook = make_notebook(1);
        notebook.title = request.title.clone();
        notebook.description = request.description.clone();
        Ok(notebook)
    }

    async fn get_notebook(&self, id: i64) -> Result<Notebook> {
        match self.notebook.lock().await.clone() {
            Some(scripted) => lift(scripted),
            None => Ok(make_notebook(id)),
        }
    }

    async fn delete_notebook(&self, _id: i64) -> Result<()> {
        Ok(())
    }

    async fn list_documents(&self, _notebook_id: Option<i64>) -> Result<Vec<Document>> {
        self.list_document_calls.fetch_add(1, Ordering::SeqCst);
        let mut lists = self.document_lists.lock().await;
        let scripted = if lists.len() > 1 {
            lists.pop_front().unwrap()
        } else {
            lists.front().cloned().unwrap_or_else(|| Ok(Vec::new()))
        };
        lift(scripted)
    }

    async fn create_document(&self, request: &CreateDocumentRequest) -> Result<Document> {
        let mut document = make_document(1, ProcessingStatus::Pending);
        document.filename = request.filename.clone();
        Ok(document)
    }

    async fn upload_document(
        &self,
        notebook_id: i64,
        filename: &str,
        _mime_type: &str,
        _content: Vec<u8>,
    ) -> Result<Document> {
        self.uploads
            .lock()
            .await
            .push((notebook_id, filename.to_string()));
        match self.upload_result.lock().await.clone() {
            Some(scripted) => lift(scripted),
            None => {
                let mut document = make_document(1, ProcessingStatus::Pending);
                document.filename = filename.to_string();
                document.notebook_id = Some(notebook_id);
                Ok(document)
            }
        }
    }

    async fn document_graph(&self, _document_id: i64) -> Result<GraphData> {
        self.graph_calls.fetch_add(1, Ordering::SeqCst);
        match self.graph.lock().await.clone() {
            Some(scripted) => lift(scripted),
            None => Ok(make_graph()),
        }
    }

    async fn chat(&self, _notebook_id: i64, _query: &str) -> Result<String> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.chat_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.chat_replies.lock().await.pop_front() {
            Some(scripted) => lift(scripted),
            None => Ok("stub answer".to_string()),
        }
    }
}
