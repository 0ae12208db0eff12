//! Shared field-element plumbing for the message-box registry.
//!
//! Everything that crosses the registry boundary is expressed over the BN254
//! scalar field `Fr`: identity digests, map commitments, slot values and
//! deposit messages. This crate provides the native Poseidon hash those
//! commitments are built from, byte/hex conversions for `Fr`, and the serde
//! adapter the other crates use to put field elements into JSON.

use anyhow::{anyhow, ensure, Result};
use halo2curves_axiom::{
    bn256::Fr,
    ff::{Field, PrimeField},
};
use poseidon_primitives::poseidon::primitives::{ConstantLength, Hash as PoseidonHash, Spec};
use serde::{Deserialize, Serialize};

/// Poseidon state width.
pub const POSEIDON_T: usize = 6;
/// Poseidon sponge rate.
pub const POSEIDON_RATE: usize = 5;
/// Number of full rounds.
pub const POSEIDON_FULL_ROUNDS: usize = 8;
/// Number of partial rounds.
pub const POSEIDON_PARTIAL_ROUNDS: usize = 57;

/// Poseidon specification over BN254 `Fr` used for every commitment in the
/// registry: identity digests, map node hashes and therefore the map root.
#[derive(Debug)]
pub struct ZkPoseidonSpec;

impl Spec<Fr, POSEIDON_T, POSEIDON_RATE> for ZkPoseidonSpec {
    fn full_rounds() -> usize {
        POSEIDON_FULL_ROUNDS
    }

    fn partial_rounds() -> usize {
        POSEIDON_PARTIAL_ROUNDS
    }

    fn sbox(val: Fr) -> Fr {
        val.pow_vartime([5])
    }

    fn secure_mds() -> usize {
        0
    }
}

/// Fixed-length native Poseidon hash over `Fr`, with the input length bound
/// into the capacity element.
pub fn poseidon_hash<const L: usize>(inputs: &[Fr; L]) -> Fr {
    PoseidonHash::<Fr, ZkPoseidonSpec, ConstantLength<L>, POSEIDON_T, POSEIDON_RATE>::init()
        .hash(*inputs)
}

/// An external party's public credential.
///
/// The raw coordinates never cross the registry boundary; only the digest
/// computed by [`identity_digest`] is stored or compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

/// Fixed-width one-way digest of an [`Identity`].
///
/// Doubles as the map key for the identity's slot and, separately, as the
/// stored administrator reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDigest(#[serde(with = "crate::serde_fr_bytes")] Fr);

impl IdentityDigest {
    /// The underlying field element, usable as a map key.
    pub fn as_fr(&self) -> &Fr {
        &self.0
    }
}

/// Digest an identity: reduce each credential limb into `Fr` and hash the
/// pair with Poseidon.
pub fn identity_digest(identity: &Identity) -> IdentityDigest {
    let x = reduce_be_bytes_to_fr(&identity.x);
    let y = reduce_be_bytes_to_fr(&identity.y);
    IdentityDigest(poseidon_hash(&[x, y]))
}

pub fn fr_to_bytes(fr: &Fr) -> [u8; 32] {
    let repr = fr.to_repr();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(repr.as_ref());
    bytes
}

pub fn fr_from_bytes(bytes: &[u8; 32]) -> Result<Fr> {
    Fr::from_bytes(bytes)
        .into_option()
        .ok_or_else(|| anyhow!("invalid bn256 scalar encoding"))
}

/// Fold 32 big-endian bytes into `Fr` by repeated multiply-add, reducing
/// modulo the field order.
pub fn reduce_be_bytes_to_fr(bytes: &[u8; 32]) -> Fr {
    let mut acc = Fr::zero();
    let base = Fr::from(256);
    for byte in bytes.iter() {
        acc = acc * base + Fr::from(*byte as u64);
    }
    acc
}

/// Encode `Fr` as `0x`-prefixed hex of its canonical little-endian repr.
pub fn fr_to_hex(fr: &Fr) -> String {
    format!("0x{}", hex::encode(fr_to_bytes(fr)))
}

/// Parse `Fr` from a 32-byte hex string, with or without a `0x` prefix.
pub fn fr_from_hex(value: &str) -> Result<Fr> {
    let hex_str = value.strip_prefix("0x").unwrap_or(value);
    ensure!(
        hex_str.len() == 64,
        "expected 64 hex chars, got {}",
        hex_str.len()
    );
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut bytes)?;
    fr_from_bytes(&bytes)
}

/// Serde adapter storing `Fr` as 32-byte hex (little-endian, matching
/// halo2's `to_repr`). Use with `#[serde(with = "msgbox_common::serde_fr_bytes")]`.
pub mod serde_fr_bytes {
    use super::*;
    use serde::{de, Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(fr: &Fr, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&fr_to_hex(fr))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fr, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FrVisitor;

        impl de::Visitor<'_> for FrVisitor {
            type Value = Fr;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a 32-byte hex string (with or without 0x prefix)")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                fr_from_hex(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(FrVisitor)
    }
}
