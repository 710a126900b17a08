//! Bounds-checked sized integers
//!
//! Each kind is generated from its backing primitive, so width, bit count,
//! signedness, and bounds are derived rather than hand-maintained.

use crate::byte_order::ByteOrder;
use crate::error::{WireError, WireResult};
use crate::packable::Packable;
use bytes::{BufMut, BytesMut};
use std::fmt;

macro_rules! sized_int {
    ($(#[$meta:meta])* $name:ident, $prim:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($prim);

        impl $name {
            /// Bit width of this kind.
            pub const BITS: u32 = <$prim>::BITS;
            /// True for two's-complement signed kinds.
            pub const SIGNED: bool = <$prim>::MIN != 0;
            /// Smallest representable value.
            pub const MIN: i128 = <$prim>::MIN as i128;
            /// Largest representable value.
            pub const MAX: i128 = <$prim>::MAX as i128;

            /// Creates an instance, rejecting values outside
            /// [`MIN`](Self::MIN)..=[`MAX`](Self::MAX). No clamping, no
            /// wraparound.
            pub fn new(value: i128) -> WireResult<Self> {
                if value < Self::MIN || value > Self::MAX {
                    return Err(WireError::Range {
                        value,
                        min: Self::MIN,
                        max: Self::MAX,
                    });
                }
                Ok(Self(value as $prim))
            }

            /// Returns the wrapped value.
            pub const fn get(self) -> $prim {
                self.0
            }

            /// C type name for this kind, e.g. `uint16_t`.
            pub fn c_type() -> String {
                format!("{}int{}_t", if Self::SIGNED { "" } else { "u" }, Self::BITS)
            }
        }

        impl From<$prim> for $name {
            fn from(value: $prim) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i128 {
            fn from(value: $name) -> i128 {
                value.0 as i128
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", Self::c_type(), self.0)
            }
        }

        impl Packable for $name {
            const WIDTH: usize = std::mem::size_of::<$prim>();

            fn pack_into(&self, buf: &mut BytesMut, order: ByteOrder) {
                if order.is_little() {
                    buf.put_slice(&self.0.to_le_bytes());
                } else {
                    buf.put_slice(&self.0.to_be_bytes());
                }
            }

            fn unpack(data: &[u8], order: ByteOrder) -> WireResult<Self> {
                Self::check_width(data)?;
                let mut raw = [0u8; std::mem::size_of::<$prim>()];
                raw.copy_from_slice(data);
                let value = if order.is_little() {
                    <$prim>::from_le_bytes(raw)
                } else {
                    <$prim>::from_be_bytes(raw)
                };
                // Construction re-applies the range check
                Self::new(value as i128)
            }
        }
    };
}

sized_int!(
    /// Signed 8-bit integer
    Int8,
    i8
);
sized_int!(
    /// Unsigned 8-bit integer
    UInt8,
    u8
);
sized_int!(
    /// Signed 16-bit integer
    Int16,
    i16
);
sized_int!(
    /// Unsigned 16-bit integer
    UInt16,
    u16
);
sized_int!(
    /// Signed 32-bit integer
    Int32,
    i32
);
sized_int!(
    /// Unsigned 32-bit integer
    UInt32,
    u32
);
sized_int!(
    /// Signed 64-bit integer
    Int64,
    i64
);
sized_int!(
    /// Unsigned 64-bit integer
    UInt64,
    u64
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_metadata() {
        assert_eq!(UInt8::WIDTH, 1);
        assert_eq!(Int16::WIDTH, 2);
        assert_eq!(UInt32::WIDTH, 4);
        assert_eq!(Int64::WIDTH, 8);

        assert!(Int8::SIGNED);
        assert!(!UInt8::SIGNED);

        assert_eq!(UInt8::MIN, 0);
        assert_eq!(UInt8::MAX, 255);
        assert_eq!(Int8::MIN, -128);
        assert_eq!(Int8::MAX, 127);
        assert_eq!(UInt64::MAX, u64::MAX as i128);
        assert_eq!(Int64::MIN, i64::MIN as i128);
    }

    #[test]
    fn test_bounds_accepted() {
        assert!(UInt8::new(UInt8::MIN).is_ok());
        assert!(UInt8::new(UInt8::MAX).is_ok());
        assert!(Int16::new(Int16::MIN).is_ok());
        assert!(Int16::new(Int16::MAX).is_ok());
        assert!(UInt64::new(UInt64::MAX).is_ok());
        assert!(Int64::new(Int64::MIN).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            UInt8::new(UInt8::MAX + 1),
            Err(WireError::Range { value: 256, min: 0, max: 255 })
        ));
        assert!(matches!(
            UInt8::new(UInt8::MIN - 1),
            Err(WireError::Range { value: -1, .. })
        ));
        assert!(matches!(Int8::new(128), Err(WireError::Range { .. })));
        assert!(matches!(Int8::new(-129), Err(WireError::Range { .. })));
        assert!(matches!(
            Int64::new(Int64::MAX + 1),
            Err(WireError::Range { .. })
        ));
        assert!(matches!(
            UInt64::new(UInt64::MAX + 1),
            Err(WireError::Range { .. })
        ));
    }

    #[test]
    fn test_pack_network_order() {
        let v = UInt16::new(300).unwrap();
        assert_eq!(&v.pack(ByteOrder::Network)[..], &[0x01, 0x2c]);
        assert_eq!(&v.pack(ByteOrder::Big)[..], &[0x01, 0x2c]);
        assert_eq!(&v.pack(ByteOrder::Little)[..], &[0x2c, 0x01]);
    }

    #[test]
    fn test_pack_signed_twos_complement() {
        let v = Int8::new(-1).unwrap();
        assert_eq!(&v.pack(ByteOrder::Network)[..], &[0xff]);

        let v = Int16::new(-2).unwrap();
        assert_eq!(&v.pack(ByteOrder::Network)[..], &[0xff, 0xfe]);
        assert_eq!(&v.pack(ByteOrder::Little)[..], &[0xfe, 0xff]);
    }

    #[test]
    fn test_unpack_roundtrip_all_orders() {
        for order in ByteOrder::ALL {
            for value in [Int32::MIN, -1, 0, 1, 0x12345678, Int32::MAX] {
                let v = Int32::new(value).unwrap();
                let packed = v.pack(order);
                assert_eq!(Int32::unpack(&packed, order).unwrap(), v);
            }
        }
    }

    #[test]
    fn test_unpack_wrong_width() {
        let err = UInt32::unpack(&[0x01, 0x02], ByteOrder::Network).unwrap_err();
        assert_eq!(
            err,
            WireError::Length {
                expected: 4,
                actual: 2
            }
        );
        assert!(UInt8::unpack(&[], ByteOrder::Network).is_err());
        assert!(UInt8::unpack(&[1, 2], ByteOrder::Network).is_err());
    }

    #[test]
    fn test_c_type_display() {
        assert_eq!(UInt16::c_type(), "uint16_t");
        assert_eq!(Int64::c_type(), "int64_t");
        let v = UInt16::new(300).unwrap();
        assert_eq!(v.to_string(), "uint16_t(300)");
    }
}
