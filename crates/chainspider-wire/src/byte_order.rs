//! Wire endianness selection

/// Byte order used when encoding multi-byte values.
///
/// `Network` is big-endian with standard widths and is the conventional
/// choice for peer-to-peer wire formats; every pack/unpack call site takes
/// the order explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Host byte order
    Native,
    /// Little-endian
    Little,
    /// Big-endian
    Big,
    /// Network order (big-endian, standard sizes)
    #[default]
    Network,
}

impl ByteOrder {
    /// All byte orders, for exhaustive round-trip testing.
    pub const ALL: [ByteOrder; 4] = [
        ByteOrder::Native,
        ByteOrder::Little,
        ByteOrder::Big,
        ByteOrder::Network,
    ];

    /// Returns true if values encode least-significant byte first.
    pub const fn is_little(self) -> bool {
        match self {
            ByteOrder::Little => true,
            ByteOrder::Big | ByteOrder::Network => false,
            ByteOrder::Native => cfg!(target_endian = "little"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_network() {
        assert_eq!(ByteOrder::default(), ByteOrder::Network);
    }

    #[test]
    fn test_network_is_big_endian() {
        assert!(!ByteOrder::Network.is_little());
        assert!(!ByteOrder::Big.is_little());
        assert!(ByteOrder::Little.is_little());
    }

    #[test]
    fn test_native_matches_target() {
        assert_eq!(
            ByteOrder::Native.is_little(),
            cfg!(target_endian = "little")
        );
    }
}
