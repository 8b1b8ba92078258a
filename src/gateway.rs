//! Request orchestration: decode → dispatch → derive → fetch → assemble.
//!
//! One lookup is a strict sequential chain: the current record version must
//! be read before a version-dependent slot can be derived, and the value
//! must be fetched before the response is assembled. Requests are mutually
//! independent; the only shared resource is the upstream RPC connection.

use alloy_primitives::{Address, Bytes};
use tracing::debug;

use crate::chain::{self, ChainReader};
use crate::codec::{self, LookupEnvelope};
use crate::config::GatewayConfig;
use crate::errors::GatewayError;
use crate::profiles::{self, Fetch, Profile};
use crate::response::{CcipResponse, ProofTask, StorageLayout};
use crate::slots;

/// The lookup core, generic over the chain-access seam.
pub struct Gateway<R> {
    reader: R,
    config: GatewayConfig,
}

impl<R: ChainReader> Gateway<R> {
    pub fn new(reader: R, config: GatewayConfig) -> Self {
        Self { reader, config }
    }

    /// Answer one off-chain lookup.
    ///
    /// `Ok(None)` means the inner signature is unsupported (the transport
    /// answers 404); decode and upstream failures propagate unchanged, and
    /// no sub-step ever substitutes a default for a failed read.
    pub async fn handle(
        &self,
        sender: Address,
        calldata: &[u8],
    ) -> Result<Option<CcipResponse>, GatewayError> {
        let envelope = codec::decode_envelope(calldata)?;
        let Some(query) = codec::decode_record_query(&envelope.data)? else {
            return Ok(None);
        };

        let target = self.resolve_target(sender, &envelope);
        let profile = Profile::of(&query);
        let node = query.node();

        let version = chain::record_version(&self.reader, target, node).await?;
        let slot = slots::derive_slot(
            profile.base_slot(&self.config.slots),
            version,
            node,
            &profiles::subkeys(&query),
        );
        debug!(?profile, %target, %node, version, %slot, "derived record slot");

        let result: Bytes = match profile.fetch() {
            Fetch::StorageWord => {
                let word = self.reader.read_storage(target, slot).await?;
                Bytes::copy_from_slice(word.as_slice())
            }
            Fetch::AccessorCall => {
                let raw = self.reader.call(target, envelope.data.clone()).await?;
                profiles::reencode_result(profile, &raw)?.into()
            }
        };

        let data_task = ProofTask {
            slot,
            target,
            layout: profile.layout(),
            result,
        };

        let response = if self.config.versioned {
            let version_task = ProofTask {
                slot: slots::version_slot(&self.config.slots, node),
                target,
                layout: StorageLayout::Fixed,
                result: version_bytes(version),
            };
            // Version proof strictly first: the verifier checks it before
            // trusting the data proof.
            CcipResponse::Ordered(vec![version_task, data_task])
        } else {
            CcipResponse::Single(data_task)
        };
        Ok(Some(response))
    }

    /// Target selection: explicit deployment config wins, then a 20-byte
    /// verifier context, then the sender path segment.
    fn resolve_target(&self, sender: Address, envelope: &LookupEnvelope) -> Address {
        if let Some(target) = self.config.target {
            return target;
        }
        if let Some(context) = &envelope.context {
            if context.len() == Address::len_bytes() {
                return Address::from_slice(context);
            }
        }
        sender
    }
}

/// Version counter as minimal big-endian bytes; version 0 encodes empty.
fn version_bytes(version: u64) -> Bytes {
    if version == 0 {
        return Bytes::new();
    }
    let be = version.to_be_bytes();
    let start = be.iter().position(|b| *b != 0).unwrap_or(be.len() - 1);
    Bytes::copy_from_slice(&be[start..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockChain;
    use crate::codec::selectors;
    use crate::slots::{SlotTable, SubKey};
    use alloy_primitives::{address, b256, B256, U256};
    use alloy_sol_types::{sol_data, SolType};

    const SENDER: Address = address!("00000000000000000000000000000000000000aa");
    const TARGET: Address = address!("00000000000000000000000000000000000000cc");
    const ALICE: Address = address!("8111dfd23b99233a7ae871b7c09ccf0722847d89");

    fn node() -> B256 {
        b256!("787192fc5378cc32aa956ddfdedbf26b24e8d78e40109add0eea2c1a012c3dec")
    }

    fn encode_addr_call(node: B256) -> Bytes {
        let mut out = selectors::ADDR.to_vec();
        out.extend(<sol_data::FixedBytes<32>>::abi_encode(&node));
        out.into()
    }

    fn encode_text_call(node: B256, key: &str) -> Bytes {
        let mut out = selectors::TEXT.to_vec();
        out.extend(
            <(sol_data::FixedBytes<32>, sol_data::String)>::abi_encode_params(&(
                node,
                key.to_string(),
            )),
        );
        out.into()
    }

    fn gateway(chain: MockChain, versioned: bool) -> Gateway<MockChain> {
        Gateway::new(
            chain,
            GatewayConfig {
                target: Some(TARGET),
                slots: SlotTable::default(),
                versioned,
            },
        )
    }

    fn envelope_for(data: &Bytes) -> Bytes {
        codec::encode_envelope(&Bytes::from_static(b"\x05alice\x03eth\x00"), data, None)
    }

    // =========================================================================
    // addr: fixed layout, raw storage word
    // =========================================================================

    #[tokio::test]
    async fn test_addr_returns_fixed_layout_raw_word() {
        let mut chain = MockChain::new();
        chain.set_record_version(TARGET, node(), 0);

        let slot = slots::derive_slot(3, 0, node(), &[SubKey::Word(U256::from(60))]);
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(ALICE.as_slice());
        chain.set_storage(TARGET, slot, B256::from(word));

        let calldata = envelope_for(&encode_addr_call(node()));
        let response = gateway(chain, false)
            .handle(SENDER, &calldata)
            .await
            .unwrap()
            .unwrap();

        let tasks = response.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].slot, slot);
        assert_eq!(tasks[0].target, TARGET);
        assert_eq!(tasks[0].layout, StorageLayout::Fixed);
        // Left-zero-padded 20-byte address, unmodified.
        assert_eq!(tasks[0].result.len(), 32);
        assert_eq!(&tasks[0].result[..12], &[0u8; 12]);
        assert_eq!(&tasks[0].result[12..], ALICE.as_slice());
    }

    #[tokio::test]
    async fn test_addr_unset_storage_returns_zero_word() {
        let mut chain = MockChain::new();
        chain.set_record_version(TARGET, node(), 0);

        let calldata = envelope_for(&encode_addr_call(node()));
        let response = gateway(chain, false)
            .handle(SENDER, &calldata)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.tasks()[0].result, Bytes::copy_from_slice(&[0u8; 32]));
    }

    // =========================================================================
    // text: dynamic layout, accessor call
    // =========================================================================

    #[tokio::test]
    async fn test_text_returns_dynamic_layout_encoded_string() {
        let mut chain = MockChain::new();
        chain.set_record_version(TARGET, node(), 2);

        let inner = encode_text_call(node(), "avatar");
        let encoded = <sol_data::String>::abi_encode(&"ipfs://Qm...".to_string());
        chain.set_call(TARGET, inner.clone(), encoded.clone().into());

        let response = gateway(chain, false)
            .handle(SENDER, &envelope_for(&inner))
            .await
            .unwrap()
            .unwrap();

        let tasks = response.tasks();
        assert_eq!(tasks[0].layout, StorageLayout::Dynamic);
        assert_eq!(
            tasks[0].slot,
            slots::derive_slot(11, 2, node(), &[SubKey::Str("avatar")])
        );
        assert_eq!(tasks[0].result, Bytes::from(encoded));
    }

    #[tokio::test]
    async fn test_text_unknown_record_returns_empty_result_not_error() {
        let mut chain = MockChain::new();
        chain.set_record_version(TARGET, node(), 0);

        let inner = encode_text_call(node(), "unknown record");
        let empty = <sol_data::String>::abi_encode(&String::new());
        chain.set_call(TARGET, inner.clone(), empty.clone().into());

        let response = gateway(chain, false)
            .handle(SENDER, &envelope_for(&inner))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.tasks()[0].result, Bytes::from(empty));
    }

    // =========================================================================
    // Versioned mode: version proof strictly first
    // =========================================================================

    #[tokio::test]
    async fn test_versioned_mode_emits_version_task_at_index_zero() {
        let mut chain = MockChain::new();
        chain.set_record_version(TARGET, node(), 3);

        let inner = encode_text_call(node(), "avatar");
        let encoded = <sol_data::String>::abi_encode(&"x".to_string());
        chain.set_call(TARGET, inner.clone(), encoded.into());

        let response = gateway(chain, true)
            .handle(SENDER, &envelope_for(&inner))
            .await
            .unwrap()
            .unwrap();

        let tasks = response.tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].slot, slots::version_slot(&SlotTable::default(), node()));
        assert_eq!(tasks[0].layout, StorageLayout::Fixed);
        assert_eq!(tasks[0].result, Bytes::from_static(&[0x03]));
        assert_eq!(
            tasks[1].slot,
            slots::derive_slot(11, 3, node(), &[SubKey::Str("avatar")])
        );
    }

    #[tokio::test]
    async fn test_versioned_mode_version_zero_encodes_empty() {
        let mut chain = MockChain::new();
        chain.set_record_version(TARGET, node(), 0);

        let mut word = [0u8; 32];
        word[31] = 1;
        let slot = slots::derive_slot(3, 0, node(), &[SubKey::Word(U256::from(60))]);
        chain.set_storage(TARGET, slot, B256::from(word));

        let response = gateway(chain, true)
            .handle(SENDER, &envelope_for(&encode_addr_call(node())))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.tasks()[0].result, Bytes::new());
    }

    // =========================================================================
    // Error taxonomy
    // =========================================================================

    #[tokio::test]
    async fn test_unsupported_signature_yields_none() {
        let mut data = codec::function_selector("name(bytes32)").to_vec();
        data.extend(<sol_data::FixedBytes<32>>::abi_encode(&node()));
        let calldata = envelope_for(&data.into());

        let response = gateway(MockChain::new(), false)
            .handle(SENDER, &calldata)
            .await
            .unwrap();
        assert_eq!(response, None);
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_decode_error() {
        let err = gateway(MockChain::new(), false)
            .handle(SENDER, &[0xde, 0xad, 0xbe, 0xef])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates_untouched() {
        // No canned recordVersions return: the version read fails and no
        // default is substituted.
        let calldata = envelope_for(&encode_addr_call(node()));
        let err = gateway(MockChain::new(), false)
            .handle(SENDER, &calldata)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Upstream(_)));
    }

    // =========================================================================
    // Target selection
    // =========================================================================

    #[tokio::test]
    async fn test_twenty_byte_context_selects_target_when_unconfigured() {
        let mut chain = MockChain::new();
        chain.set_record_version(TARGET, node(), 0);

        let inner = encode_addr_call(node());
        let context = Bytes::copy_from_slice(TARGET.as_slice());
        let calldata = codec::encode_envelope(
            &Bytes::from_static(b"\x05alice\x03eth\x00"),
            &inner,
            Some(&context),
        );

        let gateway = Gateway::new(
            chain,
            GatewayConfig {
                target: None,
                ..GatewayConfig::default()
            },
        );
        let response = gateway.handle(SENDER, &calldata).await.unwrap().unwrap();
        assert_eq!(response.tasks()[0].target, TARGET);
    }

    #[tokio::test]
    async fn test_sender_is_target_of_last_resort() {
        let mut chain = MockChain::new();
        chain.set_record_version(SENDER, node(), 0);

        let calldata = envelope_for(&encode_addr_call(node()));
        let gateway = Gateway::new(chain, GatewayConfig::default());
        let response = gateway.handle(SENDER, &calldata).await.unwrap().unwrap();
        assert_eq!(response.tasks()[0].target, SENDER);
    }

    // =========================================================================
    // version_bytes
    // =========================================================================

    #[test]
    fn test_version_bytes_trims_leading_zeros() {
        assert_eq!(version_bytes(0), Bytes::new());
        assert_eq!(version_bytes(1), Bytes::from_static(&[0x01]));
        assert_eq!(version_bytes(0x0100), Bytes::from_static(&[0x01, 0x00]));
        assert_eq!(
            version_bytes(u64::MAX),
            Bytes::from_static(&[0xFF; 8])
        );
    }
}
