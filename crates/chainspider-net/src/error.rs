//! Network error types

use chainspider_wire::WireError;
use std::net::Ipv6Addr;
use thiserror::Error;

/// Network errors
#[derive(Debug, Error)]
pub enum NetError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to establish a transport connection, after any IPv4 fallback
    #[error("connection to [{addr}]:{port} failed: {source}")]
    ConnectionFailed {
        /// Target address (canonical IPv6 form)
        addr: Ipv6Addr,
        /// Target port
        port: u16,
        /// Underlying IO failure
        source: std::io::Error,
    },

    /// Operation requires an open connection
    #[error("node is not connected")]
    NotConnected,

    /// An inbound message stream is already consuming this connection
    #[error("inbound stream already running")]
    AlreadyRunning,

    /// Wire codec failure while decoding an inbound frame
    #[error("codec error: {0}")]
    Codec(#[from] WireError),

    /// Inbound message channel closed
    #[error("message channel closed")]
    ChannelClosed,
}

/// Result type for network operations
pub type NetResult<T> = Result<T, NetError>;
