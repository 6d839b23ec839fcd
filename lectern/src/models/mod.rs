mod chat;
mod common;
mod document;
mod graph;
mod notebook;

pub use chat::*;
pub use common::*;
pub use document::*;
pub use graph::*;
pub use notebook::*;
