//! Identity assignment: one `word@uuid` identifier per word instance.
//!
//! Identifiers are minted lazily, the first time a canonical node is seen,
//! and never change afterwards. The map is keyed by node identity
//! ([`NodeKey`]), so two word slots that alias one canonical node share an
//! identifier while two distinct nodes with the same surface form do not.
//!
//! The random source is injected. Production code uses an entropy-seeded
//! [`StdRng`]; tests can pass a fixed generator and assert exact strings.

use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::model::NodeKey;

/// Per-session map from canonical node to its minted identifier.
///
/// Share one map across several parses of the same sentence to give each
/// word instance the same identifier in every parse. Not for concurrent use.
#[derive(Debug)]
pub struct IdentityMap<R = StdRng> {
    ids: HashMap<NodeKey, String>,
    rng: R,
}

impl IdentityMap<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for IdentityMap<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> IdentityMap<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { ids: HashMap::new(), rng }
    }

    /// Identifier for `node`, minting `word@<uuid>` on first sight.
    pub fn ensure(&mut self, node: NodeKey, word: &str) -> &str {
        let rng = &mut self.rng;
        self.ids.entry(node).or_insert_with(|| {
            let id = format!("{}@{}", word, fresh_token(rng));
            tracing::trace!(id = %id, "minted word instance identifier");
            id
        })
    }
}

impl<R> IdentityMap<R> {
    pub fn get(&self, node: NodeKey) -> Option<&str> {
        self.ids.get(&node).map(String::as_str)
    }

    pub fn contains(&self, node: NodeKey) -> bool {
        self.ids.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &str)> {
        self.ids.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// 128 random bits, formatted as a hyphenated version-4 UUID.
pub fn fresh_token<R: RngCore + ?Sized>(rng: &mut R) -> uuid::Uuid {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}
