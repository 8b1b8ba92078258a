//! Deployment configuration for the gateway.

use std::path::Path;

use alloy_primitives::Address;
use eyre::WrapErr;

use crate::slots::SlotTable;

/// Per-deployment gateway configuration.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// Records contract whose storage is proven. When unset, a 20-byte
    /// verifier context in the request (or, failing that, the sender path
    /// segment) selects the target.
    pub target: Option<Address>,
    /// Base-slot indices of the target deployment's storage layout.
    pub slots: SlotTable,
    /// Versioned-generation targets get a version proof task ahead of each
    /// data proof task.
    pub versioned: bool,
}

/// Load a base-slot table from a JSON file.
///
/// Fields missing from the file keep their default layout values, so a
/// deployment only overrides what differs (e.g. `{"text": 14}`).
pub fn load_slot_table(path: &Path) -> eyre::Result<SlotTable> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read slot table {}", path.display()))?;
    serde_json::from_str(&raw)
        .wrap_err_with(|| format!("failed to parse slot table {}", path.display()))
}
