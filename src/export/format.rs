//! Text templates for each fact shape.
//!
//! Keyword names, nesting depth and argument order are read structurally
//! by the importer and must not change. Indentation is cosmetic.

use std::borrow::Cow;

use super::RenderConfig;
use super::fact::FactKind;
use crate::{Error, Result};

const INDENT: &str = "   ";

/// Quote a string literal, escaping `\` and `"`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Leading `width` characters of the confidence's decimal form. No rounding.
pub fn truncate_confidence(confidence: f64, width: usize) -> Result<String> {
    let text = confidence.to_string();
    match text.get(..width) {
        Some(prefix) => Ok(prefix.to_string()),
        None => Err(Error::ConfidenceFormat { text, width }),
    }
}

pub fn rank_link(parse_id: &str, confidence: &str, sentence_id: &str) -> String {
    format!(
        "(ParseLink\n{i}(ConceptNode {} (stv 1.0 {}))\n{i}(SentenceNode {})\n)\n",
        quote(parse_id),
        confidence,
        quote(sentence_id),
        i = INDENT,
    )
}

pub fn reference_link(guid: &str, word: &str) -> String {
    format!(
        "(ReferenceLink\n{i}(ConceptNode {})\n{i}(WordNode {})\n)\n",
        quote(guid),
        quote(word),
        i = INDENT,
    )
}

pub fn parse_instance_link(guid: &str, parse_id: &str) -> String {
    format!(
        "(ParseInstanceLink\n{i}(ConceptNode {})\n{i}(ConceptNode {})\n)\n",
        quote(guid),
        quote(parse_id),
        i = INDENT,
    )
}

/// `; name (source, other)`. Line breaks in any argument become spaces so
/// the comment cannot spill into the next line.
pub fn comment(name: &str, source: &str, other: &str) -> String {
    format!("; {} ({}, {})\n", one_line(name), one_line(source), one_line(other))
}

fn one_line(s: &str) -> Cow<'_, str> {
    if s.contains(['\n', '\r']) {
        Cow::Owned(s.replace(['\n', '\r'], " "))
    } else {
        Cow::Borrowed(s)
    }
}

/// `kind` is `InheritanceLink` or `PartOfSpeechLink`.
pub fn attribute_link(kind: FactKind, guid: &str, value: &str) -> String {
    format!(
        "({}\n{i}(ConceptNode {})\n{i}(DefinedLinguisticConceptNode {})\n)\n",
        kind.keyword().unwrap_or("InheritanceLink"),
        quote(guid),
        quote(value),
        i = INDENT,
    )
}

pub fn evaluation_link(relation: &str, src_guid: &str, tgt_guid: &str) -> String {
    format!(
        "(EvaluationLink\n\
         {i}(DefinedLinguisticRelationshipNode {})\n\
         {i}(ListLink\n\
         {i}{i}(ConceptNode {})\n\
         {i}{i}(ConceptNode {})\n\
         {i})\n\
         )\n",
        quote(relation),
        quote(src_guid),
        quote(tgt_guid),
        i = INDENT,
    )
}

/// Value emitted for attribute `attr`.
///
/// Flags and the hypothesis marker are presence-only: their stored value
/// is dropped and the lower-cased attribute name is emitted instead.
pub fn attribute_value<'v>(attr: &str, raw: &'v str, config: &RenderConfig) -> Cow<'v, str> {
    if let Some(flag) = attr.strip_suffix(config.flag_suffix.as_str()) {
        Cow::Owned(flag.to_lowercase())
    } else if attr == config.hypothesis_attr {
        Cow::Owned(attr.to_lowercase())
    } else {
        Cow::Borrowed(raw)
    }
}

/// Link kind for attribute `attr`.
pub fn attribute_kind(attr: &str, config: &RenderConfig) -> FactKind {
    if attr == config.pos_attr {
        FactKind::PartOfSpeechLink
    } else {
        FactKind::InheritanceLink
    }
}
