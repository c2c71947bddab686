//! Graph node type.

use serde::{Deserialize, Serialize};

/// Identifier of a node. Assigned by the caller and stable for the graph's lifetime.
pub type NodeId = usize;

/// A vertex of the graph.
///
/// # Examples
///
/// ```
/// use u_evopath::models::Node;
///
/// let node = Node::new(3, "Depot");
/// assert_eq!(node.id(), 3);
/// assert_eq!(node.label(), "Depot");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    label: String,
}

impl Node {
    /// Creates a node with the given id and display label.
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// Node identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_new() {
        let n = Node::new(1, String::from("B"));
        assert_eq!(n.id(), 1);
        assert_eq!(n.label(), "B");
    }

    #[test]
    fn test_node_serde() {
        let n = Node::new(7, "Hub");
        let json = serde_json::to_string(&n).expect("serialize");
        let back: Node = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, n);
    }
}
