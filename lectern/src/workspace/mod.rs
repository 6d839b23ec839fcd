mod chat;
mod documents;
mod graph;
mod notebook;
mod session;
mod upload;

pub use chat::{ChatSession, SendOutcome, ASSISTANT_GREETING, FALLBACK_REPLY};
pub use documents::{DocumentListState, DocumentPoller};
pub use graph::GraphFetchGate;
pub use notebook::{NotebookLoader, NotebookState};
pub use session::WorkspaceSession;
pub use upload::DocumentUploader;
