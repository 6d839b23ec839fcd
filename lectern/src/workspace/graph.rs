use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::api::NotebookBackend;
use crate::models::{Document, GraphView, ProcessingStatus};

struct Snapshot {
    /// Which document this graph was fetched for. Replacing the primary
    /// document invalidates the snapshot even if the list never passed
    /// through an empty state between polls.
    document_id: i64,
    view: GraphView,
}

/// Gates graph requests on document processing state.
///
/// The graph is derived from the notebook's primary document (the first
/// one in the list as the backend returns it) and only exists once that
/// document has completed processing. The gate fetches it exactly once
/// per completed document and holds the snapshot across poll ticks; it
/// clears the snapshot whenever the primary document disappears, changes
/// identity, or leaves the completed state.
pub struct GraphFetchGate {
    backend: Arc<dyn NotebookBackend>,
    snapshot: RwLock<Option<Snapshot>>,
    sync_lock: Mutex<()>,
}

impl GraphFetchGate {
    pub fn new(backend: Arc<dyn NotebookBackend>) -> Self {
        Self {
            backend,
            snapshot: RwLock::new(None),
            sync_lock: Mutex::new(()),
        }
    }

    /// Reconcile the held snapshot against the latest document list,
    /// fetching or clearing as needed. Fetch failures degrade to "no
    /// graph" and are never surfaced as blocking errors.
    ///
    /// Syncs are serialized: an explicit refresh racing a background
    /// poll tick must not produce a second fetch for the same document.
    pub async fn sync(&self, documents: &[Document]) {
        let _guard = self.sync_lock.lock().await;
        let primary = documents
            .first()
            .filter(|doc| doc.status == ProcessingStatus::Completed);

        let Some(primary) = primary else {
            let mut held = self.snapshot.write().await;
            if held.is_some() {
                debug!("Primary document gone or not completed, clearing graph snapshot");
                *held = None;
            }
            return;
        };

        if let Some(held) = &*self.snapshot.read().await {
            if held.document_id == primary.id {
                return;
            }
        }

        match self.backend.document_graph(primary.id).await {
            Ok(data) => {
                let view = GraphView::from(data);
                debug!(
                    document_id = primary.id,
                    nodes = view.nodes.len(),
                    links = view.links.len(),
                    "Graph snapshot loaded"
                );
                *self.snapshot.write().await = Some(Snapshot {
                    document_id: primary.id,
                    view,
                });
            }
            Err(e) => {
                warn!(document_id = primary.id, error = %e, "Failed to load graph");
                *self.snapshot.write().await = None;
            }
        }
    }

    pub async fn graph(&self) -> Option<GraphView> {
        self.snapshot.read().await.as_ref().map(|s| s.view.clone())
    }
}
