//! # Relation Traversal
//!
//! A single pass over a parse's feature graph that reports every word
//! attribute and every relation between word instances to a
//! [`RelationVisitor`]. The exporter is one visitor; [`RelationDumper`]
//! is another.
//!
//! ## Visit order
//!
//! Word slots are walked left to right (slot 0, the wall, is skipped).
//! Each slot is resolved through its `ref` feature to the canonical
//! word-instance node, and each canonical node is visited once:
//!
//! 1. `binary_head` if the node heads at least one relation
//! 2. `unary_attribute` for every leaf-valued, non-structural feature
//! 3. `binary_relation` for every entry of its `links` map
//!
//! Any callback returning `true` stops the walk immediately.

pub mod dump;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::model::{NodeKey, NodeRef, Parse};

pub use dump::RelationDumper;

// ============================================================================
// Visitor contract
// ============================================================================

/// Callbacks invoked by [`traverse`]. Each returns `true` to stop.
pub trait RelationVisitor {
    /// `attr` is a leaf-valued feature of `source`.
    fn unary_attribute(&mut self, source: NodeRef<'_>, attr: &str) -> bool;

    /// `relation` links `source` to `target`.
    fn binary_relation(
        &mut self,
        relation: &str,
        source: NodeRef<'_>,
        target: NodeRef<'_>,
    ) -> bool;

    /// `head` is about to have its relations reported.
    fn binary_head(&mut self, head: NodeRef<'_>) -> bool;
}

// ============================================================================
// Configuration
// ============================================================================

/// Which features are bookkeeping rather than word attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Features never reported through `unary_attribute`.
    pub structural: Vec<String>,
    /// Feature holding the relation map of a word instance.
    pub links: String,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            structural: ["name", "ref", "links", "head", "background", "str", "orig_str"]
                .into_iter()
                .map(String::from)
                .collect(),
            links: "links".to_string(),
        }
    }
}

impl TraversalConfig {
    pub fn is_structural(&self, attr: &str) -> bool {
        attr == self.links || self.structural.iter().any(|s| s == attr)
    }
}

// ============================================================================
// Traversal
// ============================================================================

/// Walk `parse` with the default configuration. Returns `true` if stopped early.
pub fn traverse<V: RelationVisitor + ?Sized>(parse: &Parse, visitor: &mut V) -> bool {
    traverse_with(parse, visitor, &TraversalConfig::default())
}

/// Walk `parse`, reporting to `visitor`. Returns `true` if stopped early.
pub fn traverse_with<V: RelationVisitor + ?Sized>(
    parse: &Parse,
    visitor: &mut V,
    config: &TraversalConfig,
) -> bool {
    let mut seen: HashSet<NodeKey> = HashSet::new();

    for slot in 1..parse.num_words() {
        let Some(canonical) = parse.word_node(slot).and_then(|w| w.get("ref")) else {
            continue;
        };
        if !seen.insert(canonical.key()) {
            continue;
        }
        if visit_node(canonical, visitor, config) {
            tracing::debug!(parse = parse.id_string(), slot, "traversal stopped by visitor");
            return true;
        }
    }
    false
}

fn visit_node<V: RelationVisitor + ?Sized>(
    node: NodeRef<'_>,
    visitor: &mut V,
    config: &TraversalConfig,
) -> bool {
    let relations: Vec<(&str, NodeRef<'_>)> = node
        .get(&config.links)
        .map(|links| links.features().filter(|(_, target)| !target.is_valued()).collect())
        .unwrap_or_default();

    if !relations.is_empty() && visitor.binary_head(node) {
        return true;
    }

    for (attr, value) in node.features() {
        if config.is_structural(attr) || !value.is_valued() {
            continue;
        }
        if visitor.unary_attribute(node, attr) {
            return true;
        }
    }

    for (relation, target) in relations {
        if visitor.binary_relation(relation, node, target) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParseBuilder;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        stop_after: Option<usize>,
    }

    impl Recorder {
        fn record(&mut self, event: String) -> bool {
            self.events.push(event);
            self.stop_after.is_some_and(|n| self.events.len() >= n)
        }
    }

    impl RelationVisitor for Recorder {
        fn unary_attribute(&mut self, source: NodeRef<'_>, attr: &str) -> bool {
            let name = source.name().unwrap_or("?").to_string();
            self.record(format!("unary {} {}", name, attr))
        }

        fn binary_relation(
            &mut self,
            relation: &str,
            source: NodeRef<'_>,
            target: NodeRef<'_>,
        ) -> bool {
            let event = format!(
                "binary {} {} {}",
                relation,
                source.name().unwrap_or("?"),
                target.name().unwrap_or("?")
            );
            self.record(event)
        }

        fn binary_head(&mut self, head: NodeRef<'_>) -> bool {
            let name = head.name().unwrap_or("?").to_string();
            self.record(format!("head {}", name))
        }
    }

    fn sample() -> Parse {
        let mut b = ParseBuilder::new("p", "s", 0.654321);
        let dog = b.word("dog").unwrap();
        let ran = b.word("ran").unwrap();
        b.attribute(dog, "pos", "noun").unwrap();
        b.attribute(ran, "pos", "verb").unwrap();
        b.attribute(ran, "tense", "past").unwrap();
        b.relation("_subj", ran, dog).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_visit_order() {
        let parse = sample();
        let mut rec = Recorder::default();
        assert!(!traverse(&parse, &mut rec));
        assert_eq!(
            rec.events,
            vec![
                "unary dog pos",
                "head ran",
                "unary ran pos",
                "unary ran tense",
                "binary _subj ran dog",
            ]
        );
    }

    #[test]
    fn test_stop_signal() {
        let parse = sample();
        let mut rec = Recorder { stop_after: Some(2), ..Default::default() };
        assert!(traverse(&parse, &mut rec));
        assert_eq!(rec.events.len(), 2);
    }

    #[test]
    fn test_aliased_slots_visited_once() {
        let mut b = ParseBuilder::new("p", "s", 0.654321);
        let ny = b.word("New_York").unwrap();
        b.alias(ny).unwrap();
        b.attribute(ny, "pos", "noun").unwrap();
        let parse = b.build().unwrap();

        let mut rec = Recorder::default();
        traverse(&parse, &mut rec);
        assert_eq!(rec.events, vec!["unary New_York pos"]);
    }

    #[test]
    fn test_custom_structural_attributes() {
        let parse = sample();
        let mut config = TraversalConfig::default();
        config.structural.push("tense".into());
        let mut rec = Recorder::default();
        traverse_with(&parse, &mut rec, &config);
        assert!(!rec.events.iter().any(|e| e.contains("tense")));
    }
}
