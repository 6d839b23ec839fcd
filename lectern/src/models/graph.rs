use serde::{Deserialize, Serialize};

use super::Attributes;

/// A node in a document's knowledge graph. `name` is the display text
/// ("Alice"), `label` the entity category ("Person"). Anything else the
/// backend attaches rides along in `attrs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: i64,
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub attrs: Attributes,
}

/// An edge as returned by the backend: endpoints referenced by node id.
/// Both ids must resolve to nodes in the same snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source_node_id: i64,
    pub target_node_id: i64,
    #[serde(flatten)]
    pub attrs: Attributes,
}

/// Graph payload exactly as fetched from `/documents/{id}/graph`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// A renderer-neutral link: `source`/`target` duplicate the edge's node
/// references under the names force-directed layouts expect, while the
/// original edge is kept intact alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: i64,
    pub target: i64,
    #[serde(flatten)]
    pub edge: GraphEdge,
}

impl From<GraphEdge> for GraphLink {
    fn from(edge: GraphEdge) -> Self {
        Self {
            source: edge.source_node_id,
            target: edge.target_node_id,
            edge,
        }
    }
}

/// The projected snapshot held by the workspace: nodes pass through
/// unchanged, edges become links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl From<GraphData> for GraphView {
    fn from(data: GraphData) -> Self {
        Self {
            nodes: data.nodes,
            links: data.edges.into_iter().map(GraphLink::from).collect(),
        }
    }
}
