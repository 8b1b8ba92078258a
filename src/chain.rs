//! Read-only chain access.
//!
//! The core consumes the chain through the narrow [`ChainReader`] seam: raw
//! storage words plus view-function calls. Production reads go through an
//! alloy HTTP provider, which multiplexes concurrent requests over a pooled
//! connection; no locking happens here and nothing is cached.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::TransactionRequest;
use async_trait::async_trait;

use crate::codec;
use crate::errors::GatewayError;

/// Trait for reading target-contract state.
///
/// In production: implemented by [`RpcChainReader`] over JSON-RPC.
/// In tests: implemented by an in-memory mock.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Read one storage word. Unset storage reads as the zero word.
    async fn read_storage(&self, address: Address, slot: B256) -> Result<B256, GatewayError>;

    /// Invoke a view function and return its raw return data.
    async fn call(&self, address: Address, calldata: Bytes) -> Result<Bytes, GatewayError>;
}

/// [`ChainReader`] backed by an alloy HTTP provider.
pub struct RpcChainReader {
    provider: RootProvider,
}

impl RpcChainReader {
    /// Create a reader over an HTTP JSON-RPC endpoint.
    pub fn new(url: url::Url) -> Self {
        Self {
            provider: RootProvider::new_http(url),
        }
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn read_storage(&self, address: Address, slot: B256) -> Result<B256, GatewayError> {
        let value = self
            .provider
            .get_storage_at(address, U256::from_be_bytes(slot.0))
            .await
            .map_err(GatewayError::upstream)?;
        Ok(B256::from(value.to_be_bytes::<32>()))
    }

    async fn call(&self, address: Address, calldata: Bytes) -> Result<Bytes, GatewayError> {
        let request = TransactionRequest::default()
            .with_to(address)
            .with_input(calldata);
        self.provider
            .call(request)
            .await
            .map_err(GatewayError::upstream)
    }
}

/// Current record version for a name, via one `recordVersions(bytes32)`
/// call on the target.
///
/// Always re-read: a stale version derives a slot for a different
/// generation of the value, which is exactly the soft-delete mechanism the
/// version overlay exists for.
pub async fn record_version(
    reader: &dyn ChainReader,
    target: Address,
    node: B256,
) -> Result<u64, GatewayError> {
    let ret = reader
        .call(target, codec::encode_record_versions_call(node))
        .await?;
    codec::decode_record_versions_return(&ret)
        .map_err(|e| GatewayError::Upstream(format!("recordVersions returned malformed data: {e}")))
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::BTreeMap;

    /// In-memory chain state for unit tests: storage words plus canned
    /// view-call returns keyed by `(address, calldata)`.
    #[derive(Debug, Default)]
    pub(crate) struct MockChain {
        storage: BTreeMap<(Address, B256), B256>,
        calls: BTreeMap<(Address, Bytes), Bytes>,
    }

    impl MockChain {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn set_storage(&mut self, address: Address, slot: B256, value: B256) {
            self.storage.insert((address, slot), value);
        }

        pub(crate) fn set_call(&mut self, address: Address, calldata: Bytes, ret: Bytes) {
            self.calls.insert((address, calldata), ret);
        }

        pub(crate) fn set_record_version(&mut self, address: Address, node: B256, version: u64) {
            let ret = U256::from(version).to_be_bytes::<32>();
            self.set_call(
                address,
                codec::encode_record_versions_call(node),
                Bytes::copy_from_slice(&ret),
            );
        }
    }

    #[async_trait]
    impl ChainReader for MockChain {
        async fn read_storage(&self, address: Address, slot: B256) -> Result<B256, GatewayError> {
            Ok(self
                .storage
                .get(&(address, slot))
                .copied()
                .unwrap_or(B256::ZERO))
        }

        async fn call(&self, address: Address, calldata: Bytes) -> Result<Bytes, GatewayError> {
            self.calls
                .get(&(address, calldata))
                .cloned()
                .ok_or_else(|| GatewayError::Upstream("mock: no canned return for call".into()))
        }
    }
}
