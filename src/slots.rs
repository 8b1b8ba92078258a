//! Storage-slot derivation for versioned record mappings.
//!
//! The target resolver lays every record out as
//! `mapping(version => mapping(node => mapping(subKey… => value)))`, so the
//! slot of a value is a chain of keccak256 hashes over tight-packed
//! operands:
//!
//!   h0 = keccak256(uint256(version) ++ uint256(baseSlot))
//!   h1 = keccak256(node ++ h0)
//!   h_i = keccak256(pack(subKey_i) ++ h_{i-1})
//!
//! Fold order follows field declaration order in the target contract and
//! must reproduce the compiler's nested-mapping rule bit-exactly; getting
//! it wrong yields a slot that proves the wrong value with no error.
//! Integers and node hashes pack as 32-byte big-endian words, string keys
//! as raw UTF-8 bytes.

use alloy_primitives::{keccak256, Keccak256, B256, U256};
use serde::Deserialize;

/// A mapping sub-key folded into the slot hash chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubKey<'a> {
    /// 32-byte word operand (coin types, ABI content types, DNS resources).
    Word(U256),
    /// 32-byte hash operand (DNS record-name hashes).
    Hash(B256),
    /// Tight-packed UTF-8 string operand (text record keys).
    Str(&'a str),
}

fn hash_pair(lhs: &[u8], rhs: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(lhs);
    hasher.update(rhs);
    hasher.finalize()
}

fn word(value: u64) -> [u8; 32] {
    U256::from(value).to_be_bytes::<32>()
}

/// Derive the storage slot for `(base, version, node, subkeys…)`.
///
/// Version 0 and the all-zero node are ordinary inputs; neither is
/// special-cased.
pub fn derive_slot(base: u64, version: u64, node: B256, subkeys: &[SubKey<'_>]) -> B256 {
    let h0 = hash_pair(&word(version), &word(base));
    let mut h = hash_pair(node.as_slice(), h0.as_slice());
    for subkey in subkeys {
        h = match subkey {
            SubKey::Word(value) => hash_pair(&value.to_be_bytes::<32>(), h.as_slice()),
            SubKey::Hash(value) => hash_pair(value.as_slice(), h.as_slice()),
            SubKey::Str(value) => hash_pair(value.as_bytes(), h.as_slice()),
        };
    }
    h
}

/// Slot of the per-name version counter itself.
///
/// The counter mapping is not version-indexed, so its inner hash carries
/// only the base slot index. Proving this slot alongside a data slot lets
/// the verifier reject values from a superseded generation.
pub fn version_slot(table: &SlotTable, node: B256) -> B256 {
    let inner = keccak256(word(table.version));
    hash_pair(node.as_slice(), inner.as_slice())
}

/// Base slot index per record type.
///
/// Assigned by the target contract's field declaration order; a deployment
/// input, not something this gateway chooses. Resolver generations differ
/// (texts at 11 in one deployment, 14 in another), so the table is loaded
/// from configuration with the layout below as the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SlotTable {
    pub version: u64,
    pub abi: u64,
    pub addr: u64,
    pub contenthash: u64,
    pub zonehash: u64,
    pub dns_record: u64,
    pub has_dns_records: u64,
    pub name: u64,
    pub pubkey: u64,
    pub text: u64,
}

impl Default for SlotTable {
    fn default() -> Self {
        Self {
            version: 0,
            abi: 2,
            addr: 3,
            contenthash: 4,
            zonehash: 5,
            dns_record: 6,
            has_dns_records: 7,
            name: 9,
            pubkey: 10,
            text: 11,
        }
    }
}
