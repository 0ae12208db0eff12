//! Authenticated sparse Merkle map over BN254 field elements.
//!
//! The map assigns an `Fr` value to every key in a fixed-depth binary index
//! space, with `Fr::zero()` as the default at unvisited indices, and collapses
//! the whole assignment into a single root commitment. A [`Witness`] carries
//! the sibling hashes from one key's leaf to the root, which is enough to
//!
//! - verify that the key currently maps to a claimed value under a root, and
//! - recompute the root after replacing only that key's value (siblings are
//!   untouched by a single-leaf update, so the same witness folds both ways).
//!
//! Both checks are pure functions of their inputs. The party that holds the
//! full assignment is the [`MirrorMap`]; verifiers only ever fold witnesses
//! against a root they already trust.

use halo2curves_axiom::{
    bn256::Fr,
    ff::{Field, PrimeField},
};
use msgbox_common::poseidon_hash;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Depth of the binary index space. Witnesses carry one sibling per level.
pub const MAP_DEPTH: usize = 64;

// EMPTY_SUBTREE[l] is the root of a depth-l subtree with every leaf at the
// default value.
static EMPTY_SUBTREE: Lazy<[Fr; MAP_DEPTH + 1]> = Lazy::new(|| {
    let mut table = [Fr::zero(); MAP_DEPTH + 1];
    for level in 1..=MAP_DEPTH {
        table[level] = node_hash(table[level - 1], table[level - 1]);
    }
    table
});

/// Hash of an interior node from its two children.
pub fn node_hash(left: Fr, right: Fr) -> Fr {
    poseidon_hash(&[left, right])
}

/// Root of the map with every key at the default value.
pub fn empty_root() -> Fr {
    EMPTY_SUBTREE[MAP_DEPTH]
}

/// Leaf index for a key: the low [`MAP_DEPTH`] bits of its canonical
/// little-endian representation. Keys are hash digests, so indices are
/// uniformly distributed over the index space.
pub fn leaf_index(key: &Fr) -> u64 {
    let repr = key.to_repr();
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&repr.as_ref()[..8]);
    u64::from_le_bytes(buf)
}

/// Membership witness: sibling hashes ordered leaf to root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    #[serde(with = "serde_fr_siblings")]
    siblings: [Fr; MAP_DEPTH],
}

impl Witness {
    pub fn new(siblings: [Fr; MAP_DEPTH]) -> Self {
        Self { siblings }
    }

    pub fn siblings(&self) -> &[Fr; MAP_DEPTH] {
        &self.siblings
    }

    /// Fold the witness from a claimed leaf value up to a root.
    pub fn fold(&self, key: &Fr, value: Fr) -> Fr {
        let index = leaf_index(key);
        let mut acc = value;
        for (level, sibling) in self.siblings.iter().enumerate() {
            acc = if (index >> level) & 1 == 0 {
                node_hash(acc, *sibling)
            } else {
                node_hash(*sibling, acc)
            };
        }
        acc
    }

    /// Check that this witness proves `key -> value` under `root`.
    ///
    /// Exact-root-match only: a witness generated against a superseded root
    /// fails here and the caller must fetch a fresh one.
    pub fn verifies(&self, root: &Fr, key: &Fr, value: Fr) -> bool {
        self.fold(key, value) == *root
    }

    /// Root of the map after replacing the key's leaf with `new_value`,
    /// reusing this witness's siblings.
    pub fn new_root(&self, key: &Fr, new_value: Fr) -> Fr {
        self.fold(key, new_value)
    }
}

/// The full key/value assignment, held off-process by the collaborator that
/// produces witnesses.
///
/// Interior node hashes are stored per level and updated incrementally on
/// [`set`](MirrorMap::set), so `witness_for` is a pure lookup. The mirror is
/// never authoritative for verifiers: they only trust witnesses that fold to
/// their own current root, which is what forces the mirror to replay every
/// committed update in order.
#[derive(Clone, Debug)]
pub struct MirrorMap {
    // nodes[level][index]; absent entries are empty subtrees.
    nodes: Vec<HashMap<u64, Fr>>,
}

impl Default for MirrorMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorMap {
    pub fn new() -> Self {
        Self {
            nodes: vec![HashMap::new(); MAP_DEPTH + 1],
        }
    }

    fn node(&self, level: usize, index: u64) -> Fr {
        self.nodes[level]
            .get(&index)
            .copied()
            .unwrap_or(EMPTY_SUBTREE[level])
    }

    /// Current value at `key` (default value if never set).
    pub fn get(&self, key: &Fr) -> Fr {
        self.node(0, leaf_index(key))
    }

    /// Write `key -> value` and rehash the path to the root.
    pub fn set(&mut self, key: &Fr, value: Fr) {
        let mut index = leaf_index(key);
        self.nodes[0].insert(index, value);
        for level in 1..=MAP_DEPTH {
            let left = self.node(level - 1, index & !1);
            let right = self.node(level - 1, index | 1);
            index >>= 1;
            self.nodes[level].insert(index, node_hash(left, right));
        }
    }

    /// Current root commitment over the whole assignment.
    pub fn root(&self) -> Fr {
        self.node(MAP_DEPTH, 0)
    }

    /// Produce the sibling path for `key` against the current contents.
    pub fn witness_for(&self, key: &Fr) -> Witness {
        let index = leaf_index(key);
        let mut siblings = [Fr::zero(); MAP_DEPTH];
        for (level, sibling) in siblings.iter_mut().enumerate() {
            *sibling = self.node(level, (index >> level) ^ 1);
        }
        Witness::new(siblings)
    }
}

mod serde_fr_siblings {
    use super::{Fr, MAP_DEPTH};
    use halo2curves_axiom::ff::Field;
    use msgbox_common::{fr_from_hex, fr_to_hex};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(siblings: &[Fr; MAP_DEPTH], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hex: Vec<String> = siblings.iter().map(fr_to_hex).collect();
        hex.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[Fr; MAP_DEPTH], D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex: Vec<String> = Vec::deserialize(deserializer)?;
        if hex.len() != MAP_DEPTH {
            return Err(de::Error::custom(format!(
                "expected {} siblings, got {}",
                MAP_DEPTH,
                hex.len()
            )));
        }
        let mut siblings = [Fr::zero(); MAP_DEPTH];
        for (slot, value) in siblings.iter_mut().zip(hex.iter()) {
            *slot = fr_from_hex(value).map_err(de::Error::custom)?;
        }
        Ok(siblings)
    }
}
