//! Feature graph: the arena of word/feature nodes a parse hangs off.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Error, Result};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque node identifier: an index into one graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-unique graph identifier. Minted per constructed graph, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity of a node across every graph in the process.
///
/// Keys compare by handle, never by content: two nodes with identical
/// features are still distinct word instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub graph: GraphId,
    pub node: NodeId,
}

/// Feature list of a map node. Most nodes carry a handful of features.
pub type Features = SmallVec<[(String, NodeId); 4]>;

/// A node is either a leaf carrying a string, or a map of named features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureNode {
    Leaf(String),
    Map(Features),
}

/// Arena-backed feature graph.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureGraph {
    #[serde(skip, default = "GraphId::next")]
    id: GraphId,
    nodes: Vec<FeatureNode>,
}

impl Default for FeatureGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for FeatureGraph {
    /// A clone holds distinct node instances, so it gets its own identity.
    fn clone(&self) -> Self {
        Self { id: GraphId::next(), nodes: self.nodes.clone() }
    }
}

impl FeatureGraph {
    pub fn new() -> Self {
        Self { id: GraphId::next(), nodes: Vec::new() }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add an empty map node.
    pub fn add_map(&mut self) -> NodeId {
        self.push(FeatureNode::Map(Features::new()))
    }

    /// Add a valued leaf node.
    pub fn add_leaf(&mut self, value: impl Into<String>) -> NodeId {
        self.push(FeatureNode::Leaf(value.into()))
    }

    fn push(&mut self, node: FeatureNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Point feature `name` of `node` at `target`, replacing any previous target.
    pub fn set(&mut self, node: NodeId, name: impl Into<String>, target: NodeId) -> Result<()> {
        if target.0 as usize >= self.nodes.len() {
            return Err(Error::InvalidGraph(format!("feature target {} does not exist", target)));
        }
        let name = name.into();
        match self.nodes.get_mut(node.0 as usize) {
            Some(FeatureNode::Map(features)) => {
                match features.iter_mut().find(|(n, _)| *n == name) {
                    Some(slot) => slot.1 = target,
                    None => features.push((name, target)),
                }
                Ok(())
            }
            Some(FeatureNode::Leaf(_)) => Err(Error::InvalidGraph(format!(
                "cannot set feature '{}' on leaf node {}",
                name, node
            ))),
            None => Err(Error::InvalidGraph(format!("node {} does not exist", node))),
        }
    }

    /// Create a leaf holding `value` and attach it as feature `name` of `node`.
    pub fn set_value(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<NodeId> {
        let leaf = self.add_leaf(value);
        self.set(node, name, leaf)?;
        Ok(leaf)
    }

    /// Borrow a view of a node.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes.get(id.0 as usize).map(|_| NodeRef { graph: self, id })
    }

    pub fn key(&self, id: NodeId) -> NodeKey {
        NodeKey { graph: self.id, node: id }
    }

    /// Check that every feature edge lands inside the arena.
    pub fn validate(&self) -> Result<()> {
        for (index, node) in self.nodes.iter().enumerate() {
            if let FeatureNode::Map(features) = node {
                for (name, target) in features {
                    if target.0 as usize >= self.nodes.len() {
                        return Err(Error::InvalidGraph(format!(
                            "node {} feature '{}' points at missing node {}",
                            index, name, target
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Borrowed view of one node inside a [`FeatureGraph`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g FeatureGraph,
    id: NodeId,
}

impl<'g> NodeRef<'g> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> NodeKey {
        self.graph.key(self.id)
    }

    fn raw(&self) -> &'g FeatureNode {
        &self.graph.nodes[self.id.0 as usize]
    }

    /// Follow feature `name`, if this is a map node carrying it.
    pub fn get(&self, name: &str) -> Option<NodeRef<'g>> {
        match self.raw() {
            FeatureNode::Map(features) => features
                .iter()
                .find(|(n, _)| n == name)
                .and_then(|(_, target)| self.graph.node(*target)),
            FeatureNode::Leaf(_) => None,
        }
    }

    /// Leaf value, or `None` for map nodes.
    pub fn value(&self) -> Option<&'g str> {
        match self.raw() {
            FeatureNode::Leaf(v) => Some(v),
            FeatureNode::Map(_) => None,
        }
    }

    pub fn is_valued(&self) -> bool {
        matches!(self.raw(), FeatureNode::Leaf(_))
    }

    /// The node's `name` leaf: the surface form of a word instance.
    pub fn name(&self) -> Option<&'g str> {
        self.get("name")?.value()
    }

    /// Features in insertion order. Empty for leaves.
    pub fn features(self) -> impl Iterator<Item = (&'g str, NodeRef<'g>)> + 'g {
        let graph = self.graph;
        let features: &'g [(String, NodeId)] = match self.raw() {
            FeatureNode::Map(features) => features.as_slice(),
            FeatureNode::Leaf(_) => &[],
        };
        features
            .iter()
            .filter_map(move |(name, target)| graph.node(*target).map(|n| (name.as_str(), n)))
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for NodeRef<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut g = FeatureGraph::new();
        let word = g.add_map();
        g.set_value(word, "name", "dog").unwrap();
        let node = g.node(word).unwrap();
        assert_eq!(node.name(), Some("dog"));
        assert!(node.get("pos").is_none());
        assert!(!node.is_valued());
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut g = FeatureGraph::new();
        let word = g.add_map();
        g.set_value(word, "pos", "noun").unwrap();
        g.set_value(word, "tense", "past").unwrap();
        g.set_value(word, "pos", "verb").unwrap();
        let names: Vec<_> = g.node(word).unwrap().features().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["pos", "tense"]);
        assert_eq!(g.node(word).unwrap().get("pos").unwrap().value(), Some("verb"));
    }

    #[test]
    fn test_set_on_leaf_fails() {
        let mut g = FeatureGraph::new();
        let leaf = g.add_leaf("x");
        let other = g.add_map();
        assert!(matches!(g.set(leaf, "a", other), Err(Error::InvalidGraph(_))));
        assert!(matches!(g.set(other, "a", NodeId(99)), Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn test_keys_differ_across_graphs() {
        let mut a = FeatureGraph::new();
        let mut b = FeatureGraph::new();
        let na = a.add_map();
        let nb = b.add_map();
        assert_eq!(na, nb);
        assert_ne!(a.key(na), b.key(nb));
        assert_ne!(a.clone().key(na), a.key(na));
    }

    #[test]
    fn test_identity_not_content() {
        let mut g = FeatureGraph::new();
        let x = g.add_map();
        let y = g.add_map();
        assert_ne!(g.node(x).unwrap(), g.node(y).unwrap());
        assert_eq!(g.node(x).unwrap(), g.node(x).unwrap());
    }
}
