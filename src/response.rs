use alloy_primitives::{Address, Bytes, B256};
use serde::{Serialize, Serializer};

/// Proof shape of a record's storage.
///
/// The downstream proof generator builds a single-word inclusion proof for
/// `Fixed` and a multi-slot proof for `Dynamic`; the tag is part of the
/// gateway's wire format (0 = fixed, 1 = dynamic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageLayout {
    /// Value occupies a single 32-byte word at the derived slot.
    Fixed = 0,
    /// Variable-length value spanning one or more slots.
    Dynamic = 1,
}

impl Serialize for StorageLayout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// One storage attestation handed to the downstream proof step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofTask {
    /// Derived storage slot holding the value.
    pub slot: B256,
    /// Contract whose storage is proven.
    pub target: Address,
    /// Proof shape of the slot's contents.
    pub layout: StorageLayout,
    /// ABI-encoded answer, shaped as a direct call to the decoded record
    /// accessor would have returned it (raw word for fixed layouts).
    pub result: Bytes,
}

/// Gateway answer: one proof task, or an ordered list.
///
/// Ordering is a contract with the downstream verifier (version proof
/// before data proof) and is never permuted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CcipResponse {
    Single(ProofTask),
    Ordered(Vec<ProofTask>),
}

impl CcipResponse {
    /// All tasks in response order.
    pub fn tasks(&self) -> &[ProofTask] {
        match self {
            CcipResponse::Single(task) => std::slice::from_ref(task),
            CcipResponse::Ordered(tasks) => tasks,
        }
    }
}
