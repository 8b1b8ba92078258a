use thiserror::Error;

/// Errors surfaced by the lookup core.
///
/// An unsupported record signature is deliberately not an error (the
/// dispatcher reports it as `None` and the transport answers 404), and an
/// empty record value is an ordinary result.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The outer lookup envelope or the inner record call is malformed.
    #[error("malformed calldata: {0}")]
    Decode(String),

    /// The chain node was unreachable, the call reverted, or it returned
    /// data that does not match the accessor's result shape.
    #[error("upstream rpc request failed: {0}")]
    Upstream(String),
}

impl GatewayError {
    /// Decode error from an ABI decoding failure in request calldata.
    pub(crate) fn decode(err: alloy_sol_types::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }

    /// Upstream error from a transport or return-shape failure.
    pub(crate) fn upstream(err: impl std::fmt::Display) -> Self {
        GatewayError::Upstream(err.to_string())
    }
}
