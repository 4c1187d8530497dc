//! Atomese export: serialize one parse as OpenCog link notation.
//!
//! Produces the Scheme text the OpenCog importer loads for a single parse:
//!
//! ```text
//! Parse → rank fact → one reference pair per word → attribute/relation facts
//!   → (ParseLink …) (ReferenceLink …) (ParseInstanceLink …) (EvaluationLink …)
//! ```
//!
//! Identifiers are minted during the reference pass only. The relation
//! pass looks them up and drops any fact whose endpoints have none.

pub mod fact;
pub mod format;

use std::io::Write;

use rand::RngCore;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::identity::IdentityMap;
use crate::model::{NodeRef, Parse};
use crate::traverse::{RelationVisitor, TraversalConfig, traverse_with};
use crate::{Error, Result};

pub use fact::{Fact, FactKind, FactLog};

// ============================================================================
// Configuration
// ============================================================================

/// Knobs of the output format. The defaults are what the importer expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Characters of the confidence's decimal text kept in the rank fact.
    pub confidence_width: usize,
    /// Attribute-name suffix marking a boolean flag.
    pub flag_suffix: String,
    /// Attribute name of the hypothesis marker.
    pub hypothesis_attr: String,
    /// Attribute name rendered as a `PartOfSpeechLink`.
    pub pos_attr: String,
    pub traversal: TraversalConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            confidence_width: 6,
            flag_suffix: "-FLAG".to_string(),
            hypothesis_attr: "HYP".to_string(),
            pos_attr: "pos".to_string(),
            traversal: TraversalConfig::default(),
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders the parse it was last handed.
///
/// ```rust
/// use relex_atomese::{IdentityMap, ParseBuilder, SchemeRenderer};
///
/// # fn main() -> relex_atomese::Result<()> {
/// let mut b = ParseBuilder::new("sentence_parse_0", "sentence", 0.912345);
/// let dog = b.word("dog")?;
/// b.attribute(dog, "pos", "noun")?;
/// let parse = b.build()?;
///
/// let mut ids = IdentityMap::new();
/// let mut renderer = SchemeRenderer::new();
/// renderer.set_parse(&parse, Some(&mut ids));
/// let text = renderer.render()?;
/// assert!(text.starts_with("(ParseLink"));
/// assert!(text.contains("(PartOfSpeechLink"));
/// # Ok(())
/// # }
/// ```
pub struct SchemeRenderer<'a, R = StdRng> {
    config: RenderConfig,
    parse: Option<&'a Parse>,
    ids: Option<&'a mut IdentityMap<R>>,
}

impl<'a, R: RngCore> Default for SchemeRenderer<'a, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, R: RngCore> SchemeRenderer<'a, R> {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config, parse: None, ids: None }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Select the parse to render and the identity map to mint into.
    ///
    /// Pass the same map for every parse of one sentence to keep word
    /// instance identifiers stable across those parses.
    pub fn set_parse(&mut self, parse: &'a Parse, ids: Option<&'a mut IdentityMap<R>>) {
        self.parse = Some(parse);
        self.ids = ids;
    }

    /// Render to text.
    pub fn render(&mut self) -> Result<String> {
        Ok(self.render_facts()?.into_text())
    }

    /// Render to an ordered fact log: rank, references, then attributes and relations.
    pub fn render_facts(&mut self) -> Result<FactLog> {
        let parse = self.parse.ok_or(Error::NoParse)?;
        let mut facts = FactLog::new();

        let width = self.config.confidence_width;
        let confidence = format::truncate_confidence(parse.confidence(), width)?;
        facts.push(Fact::new(
            FactKind::ParseLink,
            format::rank_link(parse.id_string(), &confidence, parse.sentence_id()),
        ));

        let minted = emit_word_refs(parse, self.ids.as_deref_mut(), &mut facts)?;

        let mut emitter = LinkEmitter {
            ids: self.ids.as_deref(),
            config: &self.config,
            facts: &mut facts,
        };
        traverse_with(parse, &mut emitter, &self.config.traversal);

        tracing::debug!(
            parse = parse.id_string(),
            facts = facts.len(),
            minted,
            "rendered parse"
        );
        Ok(facts)
    }
}

/// Render `parse`, minting identifiers into `ids`.
pub fn render<R: RngCore>(parse: &Parse, ids: &mut IdentityMap<R>) -> Result<String> {
    let mut renderer = SchemeRenderer::new();
    renderer.set_parse(parse, Some(ids));
    renderer.render()
}

/// Render `parse` and write the text to `writer`.
pub fn write_scheme<R: RngCore>(
    parse: &Parse,
    ids: &mut IdentityMap<R>,
    writer: &mut dyn Write,
) -> Result<()> {
    let text = render(parse, ids)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

// ============================================================================
// Reference pass
// ============================================================================

/// One `ReferenceLink`/`ParseInstanceLink` pair per named word slot.
/// Returns how many identifiers were newly minted.
fn emit_word_refs<R: RngCore>(
    parse: &Parse,
    mut ids: Option<&mut IdentityMap<R>>,
    facts: &mut FactLog,
) -> Result<usize> {
    let parse_id = parse.id_string();
    let mut minted = 0;

    for slot in 1..parse.num_words() {
        // Slots merged into a multi-word unit ("New" of "New_York") have no node.
        let Some(word) = parse.word_node(slot) else {
            tracing::debug!(slot, "word slot has no node, skipped");
            continue;
        };
        let Some(canonical) = word.get("ref") else {
            tracing::debug!(slot, "word slot has no ref, skipped");
            continue;
        };
        let Some(name) = canonical.name() else {
            tracing::debug!(slot, "word instance has no name, skipped");
            continue;
        };

        let map = ids.as_deref_mut().ok_or(Error::NoIdentityMap)?;
        let known = map.contains(canonical.key());
        let guid = map.ensure(canonical.key(), name);
        if !known {
            minted += 1;
        }

        facts.push(Fact::new(FactKind::ReferenceLink, format::reference_link(guid, name)));
        facts.push(Fact::new(
            FactKind::ParseInstanceLink,
            format::parse_instance_link(guid, parse_id),
        ));
    }
    Ok(minted)
}

// ============================================================================
// Attribute / relation pass
// ============================================================================

struct LinkEmitter<'r, R> {
    ids: Option<&'r IdentityMap<R>>,
    config: &'r RenderConfig,
    facts: &'r mut FactLog,
}

impl<'r, R> LinkEmitter<'r, R> {
    fn guid(&self, node: NodeRef<'_>) -> Option<&'r str> {
        self.ids.and_then(|ids| ids.get(node.key()))
    }
}

impl<R> RelationVisitor for LinkEmitter<'_, R> {
    fn unary_attribute(&mut self, source: NodeRef<'_>, attr: &str) -> bool {
        let Some(src_name) = source.name() else {
            return false;
        };
        let Some(raw) = source.get(attr).and_then(|a| a.value()) else {
            tracing::debug!(attr, word = src_name, "attribute is not valued, skipped");
            return false;
        };
        let Some(guid) = self.guid(source) else {
            tracing::debug!(attr, word = src_name, "no identifier for word, attribute skipped");
            return false;
        };

        let value = format::attribute_value(attr, raw, self.config);
        let kind = format::attribute_kind(attr, self.config);
        let link = format::attribute_link(kind, guid, &value);

        self.facts.push(Fact::new(FactKind::Comment, format::comment(attr, src_name, raw)));
        self.facts.push(Fact::new(kind, link));
        false
    }

    fn binary_relation(
        &mut self,
        relation: &str,
        source: NodeRef<'_>,
        target: NodeRef<'_>,
    ) -> bool {
        let (Some(src_name), Some(tgt_name)) = (source.name(), target.name()) else {
            return false;
        };
        let (Some(src_guid), Some(tgt_guid)) = (self.guid(source), self.guid(target)) else {
            tracing::debug!(
                relation,
                src = src_name,
                tgt = tgt_name,
                "no identifier for endpoint, relation skipped"
            );
            return false;
        };

        let link = format::evaluation_link(relation, src_guid, tgt_guid);
        let note = format::comment(relation, src_name, tgt_name);
        self.facts.push(Fact::new(FactKind::Comment, note));
        self.facts.push(Fact::new(FactKind::EvaluationLink, link));
        false
    }

    fn binary_head(&mut self, _head: NodeRef<'_>) -> bool {
        false
    }
}
