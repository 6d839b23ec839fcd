use std::collections::HashMap;

/// Opaque attribute bag carried by graph nodes and edges. The backend is
/// free to attach fields the client does not know about; they are kept
/// verbatim and round-tripped untouched.
pub type Attributes = HashMap<String, serde_json::Value>;
