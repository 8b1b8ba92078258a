//! # CCIP-Read storage gateway
//!
//! Read-only gateway answering off-chain lookups (ERC-3668) on behalf of a
//! naming-service resolver whose records live in another contract's
//! storage: decode the lookup calldata, replay the target's storage-layout
//! hash chain to find the record's slot, fetch the value, and return proof
//! tasks for the downstream verification step.

pub mod chain;
pub mod cli;
pub mod codec;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod profiles;
pub mod response;
pub mod server;
pub mod slots;
