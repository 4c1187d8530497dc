//! # Parse Model
//!
//! The feature graph and the parse that indexes into it. These are the
//! provider-side types: the traversal and the exporter only read them.
//!
//! Design rule: no formatting, no identifiers, no randomness here.
//! This module is pure data.

pub mod feature;
pub mod parse;

pub use feature::{FeatureGraph, FeatureNode, Features, GraphId, NodeId, NodeKey, NodeRef};
pub use parse::{Parse, ParseBuilder};
