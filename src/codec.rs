//! Calldata codec for the off-chain-lookup envelope and the record
//! accessor signatures.
//!
//! The signature surface is closed: the envelope is one of the two
//! `resolve` overloads, and the inner payload must match one of the record
//! accessors below. A malformed envelope is a protocol violation (400); an
//! unknown inner selector is merely unsupported (404).

use alloy_primitives::{keccak256, Bytes, B256, U256};
use alloy_sol_types::{sol_data, SolType};

use crate::errors::GatewayError;

/// Compute the Solidity function selector (first 4 bytes of keccak256(signature)).
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Frozen selectors for the supported signature surface.
///
/// Values are pinned so a typo in a signature string fails a test instead
/// of silently changing the wire protocol.
pub mod selectors {
    /// resolve(bytes,bytes)
    pub const RESOLVE: [u8; 4] = [0x90, 0x61, 0xb9, 0x23];
    /// resolve(bytes,bytes,bytes)
    pub const RESOLVE_WITH_CONTEXT: [u8; 4] = [0x8e, 0xf9, 0x8a, 0x7e];
    /// text(bytes32,string)
    pub const TEXT: [u8; 4] = [0x59, 0xd1, 0xd4, 0x3c];
    /// addr(bytes32)
    pub const ADDR: [u8; 4] = [0x3b, 0x3b, 0x57, 0xde];
    /// addr(bytes32,uint256)
    pub const ADDR_COIN_TYPE: [u8; 4] = [0xf1, 0xcb, 0x7e, 0x06];
    /// ABI(bytes32,uint256)
    pub const ABI: [u8; 4] = [0x22, 0x03, 0xab, 0x56];
    /// ABI(bytes,bytes32,uint256)
    pub const ABI_WITH_CONTEXT: [u8; 4] = [0x00, 0xbf, 0x40, 0x01];
    /// contenthash(bytes32)
    pub const CONTENTHASH: [u8; 4] = [0xbc, 0x1c, 0x58, 0xd1];
    /// contenthash(bytes,bytes32)
    pub const CONTENTHASH_WITH_CONTEXT: [u8; 4] = [0xc4, 0xb8, 0x29, 0x06];
    /// name(bytes,bytes32)
    pub const NAME: [u8; 4] = [0x49, 0x3c, 0xf9, 0x4d];
    /// pubkey(bytes,bytes32)
    pub const PUBKEY: [u8; 4] = [0x63, 0x9d, 0x1d, 0x1b];
    /// dnsRecord(bytes32,bytes32,uint16)
    pub const DNS_RECORD: [u8; 4] = [0xa8, 0xfa, 0x56, 0x82];
    /// dnsRecord(bytes,bytes32,bytes32,uint16)
    pub const DNS_RECORD_WITH_CONTEXT: [u8; 4] = [0x18, 0x3f, 0x51, 0x6b];
    /// hasDNSRecords(bytes,bytes32,bytes32)
    pub const HAS_DNS_RECORDS: [u8; 4] = [0xa5, 0x4e, 0x34, 0x9d];
    /// zonehash(bytes32)
    pub const ZONEHASH: [u8; 4] = [0x5c, 0x98, 0x04, 0x2b];
    /// zonehash(bytes,bytes32)
    pub const ZONEHASH_WITH_CONTEXT: [u8; 4] = [0x09, 0xcb, 0x26, 0x87];
    /// recordVersions(bytes32)
    pub const RECORD_VERSIONS: [u8; 4] = [0xd7, 0x00, 0xff, 0x33];
}

/// Decoded outer off-chain-lookup call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEnvelope {
    /// DNS-encoded name being resolved; opaque to the core.
    pub name: Bytes,
    /// Inner record-accessor calldata.
    pub data: Bytes,
    /// Opaque verifier data selecting the tenant/target, when present.
    pub context: Option<Bytes>,
}

/// Inner record request, decoded against the fixed signature table.
///
/// Context-carrying signature variants decode their leading `bytes`
/// argument for validation but do not surface it here; the whole inner
/// calldata is forwarded verbatim when an accessor call is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordQuery {
    Text { node: B256, key: String },
    Addr { node: B256 },
    AddrCoinType { node: B256, coin_type: U256 },
    Abi { node: B256, content_types: U256 },
    ContentHash { node: B256 },
    Name { node: B256 },
    Pubkey { node: B256 },
    DnsRecord { node: B256, name_hash: B256, resource: u16 },
    HasDnsRecords { node: B256, name_hash: B256 },
    ZoneHash { node: B256 },
}

impl RecordQuery {
    /// Name node the request addresses.
    pub fn node(&self) -> B256 {
        match self {
            RecordQuery::Text { node, .. }
            | RecordQuery::Addr { node }
            | RecordQuery::AddrCoinType { node, .. }
            | RecordQuery::Abi { node, .. }
            | RecordQuery::ContentHash { node }
            | RecordQuery::Name { node }
            | RecordQuery::Pubkey { node }
            | RecordQuery::DnsRecord { node, .. }
            | RecordQuery::HasDnsRecords { node, .. }
            | RecordQuery::ZoneHash { node } => *node,
        }
    }
}

fn split_selector(calldata: &[u8]) -> Result<([u8; 4], &[u8]), GatewayError> {
    if calldata.len() < 4 {
        return Err(GatewayError::Decode(format!(
            "calldata shorter than a selector ({} bytes)",
            calldata.len()
        )));
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&calldata[..4]);
    Ok((selector, &calldata[4..]))
}

/// Decode the outer off-chain-lookup envelope.
///
/// Anything other than a well-formed `resolve` overload is a decode error,
/// never a silent "unsupported".
pub fn decode_envelope(calldata: &[u8]) -> Result<LookupEnvelope, GatewayError> {
    let (selector, payload) = split_selector(calldata)?;
    match selector {
        selectors::RESOLVE => {
            let (name, data) = <(sol_data::Bytes, sol_data::Bytes)>::abi_decode_params(payload)
                .map_err(GatewayError::decode)?;
            Ok(LookupEnvelope {
                name,
                data,
                context: None,
            })
        }
        selectors::RESOLVE_WITH_CONTEXT => {
            let (name, data, context) =
                <(sol_data::Bytes, sol_data::Bytes, sol_data::Bytes)>::abi_decode_params(payload)
                    .map_err(GatewayError::decode)?;
            Ok(LookupEnvelope {
                name,
                data,
                context: Some(context),
            })
        }
        other => Err(GatewayError::Decode(format!(
            "unknown envelope selector 0x{}",
            hex::encode(other)
        ))),
    }
}

/// Decode the inner record request.
///
/// `Ok(None)` means the selector is outside the supported surface; a known
/// selector with malformed arguments is a decode error.
pub fn decode_record_query(data: &[u8]) -> Result<Option<RecordQuery>, GatewayError> {
    let (selector, payload) = split_selector(data)?;
    let query = match selector {
        selectors::TEXT => {
            let (node, key) = <(sol_data::FixedBytes<32>, sol_data::String)>::abi_decode_params(
                payload,
            )
            .map_err(GatewayError::decode)?;
            RecordQuery::Text { node, key }
        }
        selectors::ADDR => {
            let node =
                <sol_data::FixedBytes<32>>::abi_decode(payload).map_err(GatewayError::decode)?;
            RecordQuery::Addr { node }
        }
        selectors::ADDR_COIN_TYPE => {
            let (node, coin_type) =
                <(sol_data::FixedBytes<32>, sol_data::Uint<256>)>::abi_decode_params(payload)
                    .map_err(GatewayError::decode)?;
            RecordQuery::AddrCoinType { node, coin_type }
        }
        selectors::ABI => {
            let (node, content_types) =
                <(sol_data::FixedBytes<32>, sol_data::Uint<256>)>::abi_decode_params(payload)
                    .map_err(GatewayError::decode)?;
            RecordQuery::Abi {
                node,
                content_types,
            }
        }
        selectors::ABI_WITH_CONTEXT => {
            let (_context, node, content_types) =
                <(sol_data::Bytes, sol_data::FixedBytes<32>, sol_data::Uint<256>)>::abi_decode_params(
                    payload,
                )
                .map_err(GatewayError::decode)?;
            RecordQuery::Abi {
                node,
                content_types,
            }
        }
        selectors::CONTENTHASH => {
            let node =
                <sol_data::FixedBytes<32>>::abi_decode(payload).map_err(GatewayError::decode)?;
            RecordQuery::ContentHash { node }
        }
        selectors::CONTENTHASH_WITH_CONTEXT => {
            let (_context, node) =
                <(sol_data::Bytes, sol_data::FixedBytes<32>)>::abi_decode_params(payload)
                    .map_err(GatewayError::decode)?;
            RecordQuery::ContentHash { node }
        }
        selectors::NAME => {
            let (_context, node) =
                <(sol_data::Bytes, sol_data::FixedBytes<32>)>::abi_decode_params(payload)
                    .map_err(GatewayError::decode)?;
            RecordQuery::Name { node }
        }
        selectors::PUBKEY => {
            let (_context, node) =
                <(sol_data::Bytes, sol_data::FixedBytes<32>)>::abi_decode_params(payload)
                    .map_err(GatewayError::decode)?;
            RecordQuery::Pubkey { node }
        }
        selectors::DNS_RECORD => {
            let (node, name_hash, resource) =
                <(sol_data::FixedBytes<32>, sol_data::FixedBytes<32>, sol_data::Uint<16>)>::abi_decode_params(
                    payload,
                )
                .map_err(GatewayError::decode)?;
            RecordQuery::DnsRecord {
                node,
                name_hash,
                resource,
            }
        }
        selectors::DNS_RECORD_WITH_CONTEXT => {
            let (_context, node, name_hash, resource) = <(
                sol_data::Bytes,
                sol_data::FixedBytes<32>,
                sol_data::FixedBytes<32>,
                sol_data::Uint<16>,
            )>::abi_decode_params(payload)
            .map_err(GatewayError::decode)?;
            RecordQuery::DnsRecord {
                node,
                name_hash,
                resource,
            }
        }
        selectors::HAS_DNS_RECORDS => {
            let (_context, node, name_hash) =
                <(sol_data::Bytes, sol_data::FixedBytes<32>, sol_data::FixedBytes<32>)>::abi_decode_params(
                    payload,
                )
                .map_err(GatewayError::decode)?;
            RecordQuery::HasDnsRecords { node, name_hash }
        }
        selectors::ZONEHASH => {
            let node =
                <sol_data::FixedBytes<32>>::abi_decode(payload).map_err(GatewayError::decode)?;
            RecordQuery::ZoneHash { node }
        }
        selectors::ZONEHASH_WITH_CONTEXT => {
            let (_context, node) =
                <(sol_data::Bytes, sol_data::FixedBytes<32>)>::abi_decode_params(payload)
                    .map_err(GatewayError::decode)?;
            RecordQuery::ZoneHash { node }
        }
        _ => return Ok(None),
    };
    Ok(Some(query))
}

/// Build calldata for the target's `recordVersions(bytes32)` accessor.
pub fn encode_record_versions_call(node: B256) -> Bytes {
    let mut out = selectors::RECORD_VERSIONS.to_vec();
    out.extend(<sol_data::FixedBytes<32>>::abi_encode(&node));
    out.into()
}

/// Decode the return of `recordVersions(bytes32)`.
pub fn decode_record_versions_return(data: &[u8]) -> Result<u64, alloy_sol_types::Error> {
    <sol_data::Uint<64>>::abi_decode(data)
}

/// Build an off-chain-lookup envelope (the counterpart of [`decode_envelope`]).
pub fn encode_envelope(name: &Bytes, data: &Bytes, context: Option<&Bytes>) -> Bytes {
    match context {
        None => {
            let mut out = selectors::RESOLVE.to_vec();
            out.extend(<(sol_data::Bytes, sol_data::Bytes)>::abi_encode_params(&(
                name.clone(),
                data.clone(),
            )));
            out.into()
        }
        Some(context) => {
            let mut out = selectors::RESOLVE_WITH_CONTEXT.to_vec();
            out.extend(
                <(sol_data::Bytes, sol_data::Bytes, sol_data::Bytes)>::abi_encode_params(&(
                    name.clone(),
                    data.clone(),
                    context.clone(),
                )),
            );
            out.into()
        }
    }
}
