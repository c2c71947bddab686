//! Directed, attributed link between two nodes.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Identifier of a link.
pub type LinkId = usize;

/// A directed edge `source → target` carrying an attribute bundle `T`.
///
/// Multiple links between the same ordered pair are not merged; the first
/// one listed wins when a path is measured.
///
/// # Examples
///
/// ```
/// use u_evopath::models::{Cost, Link};
///
/// let link = Link::new(0, 1, 2, Cost::new(5.0, 1.5));
/// assert_eq!(link.source(), 1);
/// assert_eq!(link.target(), 2);
/// assert!(link.connects(1, 2));
/// assert!(!link.connects(2, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link<T> {
    id: LinkId,
    source: NodeId,
    target: NodeId,
    value: T,
}

impl<T> Link<T> {
    /// Creates a link.
    pub fn new(id: LinkId, source: NodeId, target: NodeId, value: T) -> Self {
        Self {
            id,
            source,
            target,
            value,
        }
    }

    /// Link identifier.
    pub fn id(&self) -> LinkId {
        self.id
    }

    /// Node the link leaves from.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Node the link points to.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Attribute bundle (distance, cost, ...).
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns `true` if this link goes exactly from `source` to `target`.
    pub fn connects(&self, source: NodeId, target: NodeId) -> bool {
        self.source == source && self.target == target
    }
}
