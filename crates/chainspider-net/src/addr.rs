//! Canonical peer addresses
//!
//! Peers are keyed by IPv6 address; IPv4 addresses are stored in their
//! IPv4-mapped form (`::ffff:a.b.c.d`) so equality and hashing are uniform
//! across address families.

use std::fmt;
use std::net::{AddrParseError, IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// A peer endpoint address in canonical IPv6 form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeAddr(Ipv6Addr);

impl NodeAddr {
    /// The canonical IPv6 address.
    pub const fn ip(self) -> Ipv6Addr {
        self.0
    }

    /// The embedded IPv4 address, if this is an IPv4-mapped address.
    pub fn ipv4_mapped(self) -> Option<Ipv4Addr> {
        self.0.to_ipv4_mapped()
    }

    /// Raw 16-byte address.
    pub const fn octets(self) -> [u8; 16] {
        self.0.octets()
    }
}

impl From<Ipv6Addr> for NodeAddr {
    fn from(addr: Ipv6Addr) -> Self {
        Self(addr)
    }
}

impl From<Ipv4Addr> for NodeAddr {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr.to_ipv6_mapped())
    }
}

impl From<IpAddr> for NodeAddr {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<[u8; 4]> for NodeAddr {
    fn from(octets: [u8; 4]) -> Self {
        Ipv4Addr::from(octets).into()
    }
}

impl From<[u8; 16]> for NodeAddr {
    fn from(octets: [u8; 16]) -> Self {
        Ipv6Addr::from(octets).into()
    }
}

impl FromStr for NodeAddr {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IpAddr::from_str(s).map(Into::into)
    }
}

impl fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(addr: &NodeAddr) -> u64 {
        let mut hasher = DefaultHasher::new();
        addr.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_ipv4_normalizes_to_mapped() {
        let addr: NodeAddr = "127.0.0.1".parse().unwrap();
        let mapped: NodeAddr = "::ffff:127.0.0.1".parse().unwrap();
        assert_eq!(addr, mapped);
        assert_eq!(hash_of(&addr), hash_of(&mapped));
        assert_eq!(addr.ipv4_mapped(), Some(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_ipv6_has_no_mapped_v4() {
        let addr: NodeAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(addr.ipv4_mapped(), None);
    }

    #[test]
    fn test_raw_byte_constructors() {
        let v4: NodeAddr = [10, 0, 0, 1].into();
        assert_eq!(v4, "10.0.0.1".parse().unwrap());

        let mut octets = [0u8; 16];
        octets[15] = 1;
        let v6: NodeAddr = octets.into();
        assert_eq!(v6, "::1".parse().unwrap());
    }

    #[test]
    fn test_display_is_canonical_v6() {
        let addr: NodeAddr = "192.168.1.1".parse().unwrap();
        assert_eq!(addr.to_string(), "::ffff:192.168.1.1");
    }

    #[test]
    fn test_parse_failure() {
        assert!("not-an-address".parse::<NodeAddr>().is_err());
    }
}
