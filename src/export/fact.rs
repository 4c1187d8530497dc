//! Fact blocks and the append-only log they accumulate in.

use std::fmt;

/// What a fact block is. Every kind except `Comment` is a top-level link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKind {
    Comment,
    ParseLink,
    ReferenceLink,
    ParseInstanceLink,
    InheritanceLink,
    PartOfSpeechLink,
    EvaluationLink,
}

impl FactKind {
    /// Link keyword as it appears in the output, `None` for comments.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            FactKind::Comment => None,
            FactKind::ParseLink => Some("ParseLink"),
            FactKind::ReferenceLink => Some("ReferenceLink"),
            FactKind::ParseInstanceLink => Some("ParseInstanceLink"),
            FactKind::InheritanceLink => Some("InheritanceLink"),
            FactKind::PartOfSpeechLink => Some("PartOfSpeechLink"),
            FactKind::EvaluationLink => Some("EvaluationLink"),
        }
    }

    pub fn is_link(&self) -> bool {
        self.keyword().is_some()
    }
}

/// One self-contained block of output text. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    kind: FactKind,
    text: Box<str>,
}

impl Fact {
    pub fn new(kind: FactKind, text: impl Into<Box<str>>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn kind(&self) -> FactKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered, append-only sequence of facts. Nothing pushed is ever changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactLog {
    facts: Vec<Fact>,
}

impl FactLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fact: Fact) {
        tracing::trace!(kind = ?fact.kind, "fact emitted");
        self.facts.push(fact);
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fact> {
        self.facts.iter()
    }

    pub fn kinds(&self) -> Vec<FactKind> {
        self.facts.iter().map(Fact::kind).collect()
    }

    /// Number of link blocks, comments excluded.
    pub fn link_count(&self) -> usize {
        self.facts.iter().filter(|f| f.kind.is_link()).count()
    }

    /// Concatenate every block, in order.
    pub fn into_text(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FactLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fact in &self.facts {
            f.write_str(&fact.text)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FactLog {
    type Item = &'a Fact;
    type IntoIter = std::slice::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}
