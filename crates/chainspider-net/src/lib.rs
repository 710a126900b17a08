//! # chainspider-net
//!
//! Peer connection lifecycle and message streaming for chainspider.
//!
//! This crate provides:
//! - [`NodeAddr`]: canonical IPv6 peer addressing (IPv4 stored mapped)
//! - [`Node`]: one peer endpoint with a lazily-opened, reference-counted
//!   connection, IPv4 fallback on refused connects, and a level-triggered
//!   stop signal
//! - [`MessageStream`]: a lazy, backpressured sequence of decoded inbound
//!   messages driven by a `tokio_util` [`Decoder`](tokio_util::codec::Decoder)
//!
//! ## Lifecycle
//!
//! ```text
//! idle --connect/acquire--> connected --run--> running
//!  ^                            |                 |
//!  +-------- close <-- release(last) <-- terminate/EOF
//! ```
//!
//! Scoped acquisition counts entries: only the 0→1 transition connects and
//! only the 1→0 transition closes, so nested scopes share one physical
//! connection.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod addr;
mod codec;
mod error;
mod node;
mod public_ip;
mod stream;

pub use addr::NodeAddr;
pub use codec::RecordDecoder;
pub use error::{NetError, NetResult};
pub use node::{ConnectionGuard, Message, Node, StopSignal};
pub use public_ip::public_ip;
pub use stream::MessageStream;
