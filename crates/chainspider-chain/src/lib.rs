//! # chainspider-chain
//!
//! Abstract blockchain crawl operations and the process-wide chain
//! registry for chainspider.
//!
//! A [`Blockchain`] implementation speaks one chain's peer-to-peer
//! protocol: it enumerates bootstrap seeds, discovers a peer's neighbors,
//! queries versions, and classifies miners. Implementations register into
//! the [`registry`] by name at process start-up; the crawler front end
//! looks them up by name with no static knowledge of the chain set.
//!
//! ```
//! use chainspider_chain::{registry, ChainError};
//!
//! // Lookup of an unregistered chain fails with UnknownChain
//! assert!(matches!(
//!     registry().lookup("no-such-chain"),
//!     Err(ChainError::UnknownChain(_))
//! ));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod chain;
mod error;
mod registry;

pub use chain::{Blockchain, MinerStatus, Version};
pub use error::{ChainError, ChainResult};
pub use registry::{registry, ChainRegistry};
