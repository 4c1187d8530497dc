//! # relex-atomese: Parse Graphs as OpenCog Atomese
//!
//! Renders one linguistic parse of a sentence (word/feature nodes joined by
//! grammatical relations) into the link notation the OpenCog importer reads.
//!
//! ## Design Principles
//!
//! 1. **Visitor-first**: `RelationVisitor` is the contract between the graph walk and its consumers
//! 2. **Identity by handle**: word instances are keyed by `NodeKey`, never by content
//! 3. **Mint once, look up after**: identifiers are created in the reference pass only
//! 4. **Append-only output**: facts are pushed in order and never edited
//!
//! ## Quick Start
//!
//! ```rust
//! use relex_atomese::{IdentityMap, ParseBuilder};
//!
//! # fn main() -> relex_atomese::Result<()> {
//! let mut b = ParseBuilder::new("sentence@1_parse_0", "sentence@1", 0.874012);
//! let ran = b.word("ran")?;
//! let dog = b.word("dog")?;
//! b.attribute(ran, "tense", "past")?;
//! b.relation("_subj", ran, dog)?;
//! let parse = b.build()?;
//!
//! let mut ids = IdentityMap::new();
//! let text = relex_atomese::render(&parse, &mut ids)?;
//! assert!(text.contains("(stv 1.0 0.8740)"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Output Shapes
//!
//! | Fact | Link | Emitted |
//! |------|------|---------|
//! | Rank | `ParseLink` | once per parse |
//! | Reference | `ReferenceLink` + `ParseInstanceLink` | once per named word slot |
//! | Attribute | `InheritanceLink` / `PartOfSpeechLink` | per word attribute |
//! | Relation | `EvaluationLink` | per relation between word instances |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod traverse;
pub mod identity;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    FeatureGraph, FeatureNode, NodeId, NodeKey, NodeRef,
    Parse, ParseBuilder,
};

// ============================================================================
// Re-exports: Traversal, identity, export
// ============================================================================

pub use traverse::{RelationVisitor, RelationDumper, TraversalConfig, traverse, traverse_with};
pub use identity::IdentityMap;
pub use export::{
    Fact, FactKind, FactLog, RenderConfig, SchemeRenderer,
    render, write_scheme,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No parse set on renderer")]
    NoParse,

    #[error("Identity map required: parse has named word instances")]
    NoIdentityMap,

    #[error("Confidence '{text}' is shorter than the {width}-character rank field")]
    ConfidenceFormat { text: String, width: usize },

    #[error("Invalid feature graph: {0}")]
    InvalidGraph(String),

    #[error("Feature graph is shared with another parse and cannot be extended")]
    SharedGraph,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
