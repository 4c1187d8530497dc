//! Plain-text relation dump, for eyeballing what a traversal reports.
//!
//! ```text
//! pos(dog, noun)
//! _subj(ran, dog)
//! ```

use super::RelationVisitor;
use crate::model::NodeRef;

/// Collects one `name(source, value)` line per attribute or relation.
#[derive(Debug, Default)]
pub struct RelationDumper {
    lines: Vec<String>,
}

impl RelationDumper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_text(self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

impl RelationVisitor for RelationDumper {
    fn unary_attribute(&mut self, source: NodeRef<'_>, attr: &str) -> bool {
        let (Some(name), Some(value)) = (source.name(), source.get(attr).and_then(|a| a.value()))
        else {
            return false;
        };
        self.lines.push(format!("{}({}, {})", attr, name, value));
        false
    }

    fn binary_relation(
        &mut self,
        relation: &str,
        source: NodeRef<'_>,
        target: NodeRef<'_>,
    ) -> bool {
        if let (Some(src), Some(tgt)) = (source.name(), target.name()) {
            self.lines.push(format!("{}({}, {})", relation, src, tgt));
        }
        false
    }

    fn binary_head(&mut self, _head: NodeRef<'_>) -> bool {
        false
    }
}
