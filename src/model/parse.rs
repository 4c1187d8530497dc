//! Parse: one grammatical analysis of one sentence.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{FeatureGraph, NodeId, NodeRef};
use crate::{Error, Result};

/// A single parse: word slots over a feature graph, plus ranking data.
///
/// Slot 0 is the LEFT-WALL sentinel and is never rendered; words start
/// at slot 1. A slot may be empty when its word was merged into a
/// multi-word unit carried by a neighbouring slot.
///
/// The graph sits behind an [`Arc`]: clones of a parse, and parses built
/// with [`ParseBuilder::over`], share it and therefore share word-instance
/// identity. A parse loaded from JSON always gets a graph of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parse {
    id: String,
    sentence_id: String,
    confidence: f64,
    graph: Arc<FeatureGraph>,
    words: Vec<Option<NodeId>>,
}

impl Parse {
    pub fn new(
        id: impl Into<String>,
        sentence_id: impl Into<String>,
        confidence: f64,
        graph: impl Into<Arc<FeatureGraph>>,
        words: Vec<Option<NodeId>>,
    ) -> Result<Self> {
        let parse = Self {
            id: id.into(),
            sentence_id: sentence_id.into(),
            confidence,
            graph: graph.into(),
            words,
        };
        parse.validate()?;
        Ok(parse)
    }

    /// Load a parse from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let parse: Parse = serde_json::from_str(json)?;
        parse.validate()?;
        Ok(parse)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        self.graph.validate()?;
        for (slot, word) in self.words.iter().enumerate() {
            if let Some(node) = word {
                if self.graph.node(*node).is_none() {
                    return Err(Error::InvalidGraph(format!(
                        "word slot {} points at missing node {}",
                        slot, node
                    )));
                }
            }
        }
        Ok(())
    }

    /// Display identifier of the parse, e.g. `sentence@…_parse_0`.
    pub fn id_string(&self) -> &str {
        &self.id
    }

    pub fn sentence_id(&self) -> &str {
        &self.sentence_id
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Number of word slots, sentinel included.
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Word-slot node at index `i`, if the slot exists and is populated.
    pub fn word_node(&self, i: usize) -> Option<NodeRef<'_>> {
        self.words.get(i).copied().flatten().and_then(|id| self.graph.node(id))
    }

    pub fn graph(&self) -> &FeatureGraph {
        &self.graph
    }

    /// Handle to the graph, for building further parses over it.
    pub fn shared_graph(&self) -> &Arc<FeatureGraph> {
        &self.graph
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Incremental construction of a [`Parse`].
///
/// Every word gets a slot node whose `ref` feature points at the canonical
/// word-instance node; attributes and relations live on the canonical node.
///
/// `confidence` is the parse's rank score in `(0, 1)`; it is rendered as its
/// leading decimal digits, so pass the scorer's value rather than a round one.
pub struct ParseBuilder {
    id: String,
    sentence_id: String,
    confidence: f64,
    graph: Arc<FeatureGraph>,
    words: Vec<Option<NodeId>>,
}

impl ParseBuilder {
    pub fn new(id: impl Into<String>, sentence_id: impl Into<String>, confidence: f64) -> Self {
        let mut graph = FeatureGraph::new();
        let wall = graph.add_map();
        Self {
            id: id.into(),
            sentence_id: sentence_id.into(),
            confidence,
            graph: Arc::new(graph),
            words: vec![Some(wall)],
        }
    }

    /// Start another parse of `base`'s sentence over the same graph.
    ///
    /// The wall slot is carried over; add word slots with [`slot`](Self::slot)
    /// or [`merged_word`](Self::merged_word). The graph is frozen, so the
    /// node-creating helpers return [`Error::SharedGraph`].
    pub fn over(base: &Parse, id: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: id.into(),
            sentence_id: base.sentence_id.clone(),
            confidence,
            graph: Arc::clone(&base.graph),
            words: base.words.iter().take(1).copied().collect(),
        }
    }

    /// Append an existing word-slot node.
    pub fn slot(&mut self, node: NodeId) -> Result<()> {
        if self.graph.node(node).is_none() {
            return Err(Error::InvalidGraph(format!("slot node {} does not exist", node)));
        }
        self.words.push(Some(node));
        Ok(())
    }

    /// Append a word slot with a fresh canonical node named `surface`.
    /// Returns the canonical node.
    pub fn word(&mut self, surface: &str) -> Result<NodeId> {
        let graph = self.graph_mut()?;
        let canonical = graph.add_map();
        graph.set_value(canonical, "name", surface)?;
        self.alias(canonical)?;
        Ok(canonical)
    }

    /// Append a word slot that resolves to an existing canonical node.
    pub fn alias(&mut self, canonical: NodeId) -> Result<()> {
        let graph = self.graph_mut()?;
        let slot = graph.add_map();
        graph.set(slot, "ref", canonical)?;
        self.words.push(Some(slot));
        Ok(())
    }

    /// Append a word slot with no node at all (absorbed into a neighbour).
    pub fn merged_word(&mut self) {
        self.words.push(None);
    }

    /// Append a word slot whose canonical node carries no `name`.
    pub fn unnamed_word(&mut self) -> Result<NodeId> {
        let canonical = self.graph_mut()?.add_map();
        self.alias(canonical)?;
        Ok(canonical)
    }

    pub fn attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.graph_mut()?.set_value(node, name, value)?;
        Ok(())
    }

    /// Record relation `name` from `src` to `tgt` under the source's `links` map.
    pub fn relation(&mut self, name: &str, src: NodeId, tgt: NodeId) -> Result<()> {
        let existing = self.graph.node(src).and_then(|n| n.get("links")).map(|n| n.id());
        let graph = self.graph_mut()?;
        let links = match existing {
            Some(links) => links,
            None => {
                let links = graph.add_map();
                graph.set(src, "links", links)?;
                links
            }
        };
        graph.set(links, name, tgt)
    }

    /// Direct access for shapes the helpers don't cover.
    pub fn graph_mut(&mut self) -> Result<&mut FeatureGraph> {
        Arc::get_mut(&mut self.graph).ok_or(Error::SharedGraph)
    }

    pub fn build(self) -> Result<Parse> {
        Parse::new(self.id, self.sentence_id, self.confidence, self.graph, self.words)
    }
}
