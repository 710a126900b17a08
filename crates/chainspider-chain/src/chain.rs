//! The abstract per-chain crawl capability

use crate::error::ChainResult;
use async_trait::async_trait;
use chainspider_net::Node;
use chainspider_wire::UInt8;
use std::collections::HashSet;

/// What is known about a peer's participation in block production.
///
/// Tri-state knowledge, not a guarantee: `Unknown` means the question has
/// not been answered yet, or could not be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum MinerStatus {
    /// Not yet determined
    #[default]
    Unknown = 0,
    /// Confirmed to produce blocks
    Miner = 1,
    /// Confirmed not to produce blocks
    NotMiner = 2,
}

impl MinerStatus {
    /// Wire representation as an unsigned byte.
    pub fn to_wire(self) -> UInt8 {
        UInt8::from(self as u8)
    }

    /// Reconstructs from the wire byte; unrecognized discriminants are
    /// `Unknown`.
    pub fn from_wire(value: UInt8) -> Self {
        match value.get() {
            1 => MinerStatus::Miner,
            2 => MinerStatus::NotMiner,
            _ => MinerStatus::Unknown,
        }
    }
}

/// A peer's self-reported protocol version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    /// Version string as reported by the peer
    pub version: String,
    /// Peer-reported timestamp (seconds since the UNIX epoch)
    pub timestamp: u64,
}

impl Version {
    /// Creates a version report.
    pub fn new(version: impl Into<String>, timestamp: u64) -> Self {
        Self {
            version: version.into(),
            timestamp,
        }
    }
}

/// Abstract crawl operations for one blockchain network.
///
/// Implementations speak their chain's peer-to-peer protocol over [`Node`]
/// connections. Duplicate peers collapse through `Node`'s endpoint-based
/// equality. Failures against one peer are independent: `Node` state is
/// strictly per endpoint, so an errored operation corrupts nothing else.
#[async_trait]
pub trait Blockchain: Send + Sync + std::fmt::Debug {
    /// Unique chain name used as the registry key.
    fn name(&self) -> &'static str;

    /// Default peer-to-peer port for this chain.
    fn default_port(&self) -> u16;

    /// Well-known bootstrap peers; finite, produced fresh per call.
    async fn default_seeds(&self) -> ChainResult<Vec<Node>>;

    /// The set of peers that `node` currently reports as known to it.
    async fn get_neighbors(&self, node: &Node) -> ChainResult<HashSet<Node>>;

    /// The peer's self-reported version, or `None` if it does not answer.
    async fn get_version(&self, node: &Node) -> ChainResult<Option<Version>>;

    /// Miner status for a single peer.
    async fn is_miner(&self, node: &Node) -> ChainResult<MinerStatus>;

    /// All peers across the crawl known to be miners; aggregation policy
    /// is chain-specific.
    async fn get_miners(&self) -> ChainResult<HashSet<Node>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miner_status_wire_mapping() {
        assert_eq!(MinerStatus::Unknown.to_wire().get(), 0);
        assert_eq!(MinerStatus::Miner.to_wire().get(), 1);
        assert_eq!(MinerStatus::NotMiner.to_wire().get(), 2);

        for status in [
            MinerStatus::Unknown,
            MinerStatus::Miner,
            MinerStatus::NotMiner,
        ] {
            assert_eq!(MinerStatus::from_wire(status.to_wire()), status);
        }
    }

    #[test]
    fn test_unknown_discriminant_is_unknown() {
        assert_eq!(
            MinerStatus::from_wire(UInt8::from(7)),
            MinerStatus::Unknown
        );
    }

    #[test]
    fn test_version_fields() {
        let v = Version::new("/Satoshi:25.0.0/", 1_700_000_000);
        assert_eq!(v.version, "/Satoshi:25.0.0/");
        assert_eq!(v.timestamp, 1_700_000_000);
    }
}
