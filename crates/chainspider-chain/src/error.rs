//! Chain layer error types

use chainspider_net::NetError;
use chainspider_wire::WireError;
use thiserror::Error;

/// Chain layer errors
#[derive(Debug, Error)]
pub enum ChainError {
    /// A chain with this name is already registered
    #[error("chain already registered: {0}")]
    DuplicateChain(String),

    /// No chain registered under this name
    #[error("unknown chain: {0}")]
    UnknownChain(String),

    /// Chain implementations must carry a non-empty name
    #[error("chain name must not be empty")]
    EmptyName,

    /// Transport failure during a crawl operation
    #[error(transparent)]
    Net(#[from] NetError),

    /// Codec failure while interpreting a peer's messages
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Result type for chain operations
pub type ChainResult<T> = Result<T, ChainError>;
