//! Record-profile dispatch.
//!
//! Closed mapping from a decoded record query to slot-derivation inputs,
//! fetch strategy, and proof layout. Every `match` below is exhaustive, so
//! adding a profile is checked at compile time rather than discovered as a
//! runtime string mismatch.

use alloy_primitives::U256;
use alloy_sol_types::{sol_data, SolType};

use crate::codec::RecordQuery;
use crate::errors::GatewayError;
use crate::response::StorageLayout;
use crate::slots::{SlotTable, SubKey};

/// ENSIP-9 coin type for ETH; plain `addr(bytes32)` answers live under it.
pub const ETH_COIN_TYPE: u64 = 60;

/// The closed set of record types the gateway serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Text,
    Addr,
    AddrCoinType,
    Abi,
    ContentHash,
    Name,
    Pubkey,
    DnsRecord,
    HasDnsRecords,
    ZoneHash,
}

/// How the value behind a derived slot is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// Raw storage word at the derived slot, returned unmodified.
    StorageWord,
    /// View call on the target; the accessor assembles multi-word data and
    /// the return is re-encoded per the decoded signature's result shape.
    AccessorCall,
}

impl Profile {
    /// Profile of a decoded record query.
    pub fn of(query: &RecordQuery) -> Self {
        match query {
            RecordQuery::Text { .. } => Profile::Text,
            RecordQuery::Addr { .. } => Profile::Addr,
            RecordQuery::AddrCoinType { .. } => Profile::AddrCoinType,
            RecordQuery::Abi { .. } => Profile::Abi,
            RecordQuery::ContentHash { .. } => Profile::ContentHash,
            RecordQuery::Name { .. } => Profile::Name,
            RecordQuery::Pubkey { .. } => Profile::Pubkey,
            RecordQuery::DnsRecord { .. } => Profile::DnsRecord,
            RecordQuery::HasDnsRecords { .. } => Profile::HasDnsRecords,
            RecordQuery::ZoneHash { .. } => Profile::ZoneHash,
        }
    }

    /// Base slot index in the target's storage layout.
    pub fn base_slot(self, table: &SlotTable) -> u64 {
        match self {
            Profile::Text => table.text,
            Profile::Addr | Profile::AddrCoinType => table.addr,
            Profile::Abi => table.abi,
            Profile::ContentHash => table.contenthash,
            Profile::Name => table.name,
            Profile::Pubkey => table.pubkey,
            Profile::DnsRecord => table.dns_record,
            Profile::HasDnsRecords => table.has_dns_records,
            Profile::ZoneHash => table.zonehash,
        }
    }

    /// Proof shape of the record's storage.
    pub fn layout(self) -> StorageLayout {
        match self {
            Profile::Addr | Profile::HasDnsRecords => StorageLayout::Fixed,
            Profile::Text
            | Profile::AddrCoinType
            | Profile::Abi
            | Profile::ContentHash
            | Profile::Name
            | Profile::Pubkey
            | Profile::DnsRecord
            | Profile::ZoneHash => StorageLayout::Dynamic,
        }
    }

    /// Fetch strategy; fixed-word profiles read storage directly.
    pub fn fetch(self) -> Fetch {
        match self.layout() {
            StorageLayout::Fixed => Fetch::StorageWord,
            StorageLayout::Dynamic => Fetch::AccessorCall,
        }
    }
}

/// Mapping sub-keys folded into the slot hash, in the target contract's
/// declaration order. The DNS pair folds name hash before resource type;
/// never reorder.
pub fn subkeys(query: &RecordQuery) -> Vec<SubKey<'_>> {
    match query {
        RecordQuery::Text { key, .. } => vec![SubKey::Str(key)],
        RecordQuery::Addr { .. } => vec![SubKey::Word(U256::from(ETH_COIN_TYPE))],
        RecordQuery::AddrCoinType { coin_type, .. } => vec![SubKey::Word(*coin_type)],
        RecordQuery::Abi { content_types, .. } => vec![SubKey::Word(*content_types)],
        RecordQuery::ContentHash { .. }
        | RecordQuery::Name { .. }
        | RecordQuery::Pubkey { .. }
        | RecordQuery::ZoneHash { .. } => Vec::new(),
        RecordQuery::DnsRecord {
            name_hash, resource, ..
        } => vec![SubKey::Hash(*name_hash), SubKey::Word(U256::from(*resource))],
        RecordQuery::HasDnsRecords { name_hash, .. } => vec![SubKey::Hash(*name_hash)],
    }
}

/// Validate an accessor's raw return data against the profile's result
/// shape and re-encode it exactly as a direct call to the decoded record
/// signature would have returned it.
pub fn reencode_result(profile: Profile, raw: &[u8]) -> Result<Vec<u8>, GatewayError> {
    fn shape_err(err: alloy_sol_types::Error) -> GatewayError {
        GatewayError::Upstream(format!("accessor returned malformed data: {err}"))
    }

    match profile {
        Profile::Text | Profile::Name => {
            let value = <sol_data::String>::abi_decode(raw).map_err(shape_err)?;
            Ok(<sol_data::String>::abi_encode(&value))
        }
        Profile::AddrCoinType
        | Profile::ContentHash
        | Profile::DnsRecord
        | Profile::ZoneHash => {
            let value = <sol_data::Bytes>::abi_decode(raw).map_err(shape_err)?;
            Ok(<sol_data::Bytes>::abi_encode(&value))
        }
        Profile::Abi => {
            let value = <(sol_data::Uint<256>, sol_data::Bytes)>::abi_decode_params(raw)
                .map_err(shape_err)?;
            Ok(<(sol_data::Uint<256>, sol_data::Bytes)>::abi_encode_params(&value))
        }
        Profile::Pubkey => {
            let value = <(sol_data::FixedBytes<32>, sol_data::FixedBytes<32>)>::abi_decode_params(
                raw,
            )
            .map_err(shape_err)?;
            Ok(<(sol_data::FixedBytes<32>, sol_data::FixedBytes<32>)>::abi_encode_params(&value))
        }
        Profile::Addr | Profile::HasDnsRecords => Err(GatewayError::Upstream(
            "fixed-layout profile has no accessor result".into(),
        )),
    }
}
