//! The fixed-layout serialization contract

use crate::byte_order::ByteOrder;
use crate::error::{WireError, WireResult};
use bytes::{Bytes, BytesMut};

/// Capability contract for fixed-layout binary serialization.
///
/// Implementors occupy exactly [`WIDTH`](Packable::WIDTH) bytes on the wire
/// under every byte order. The contract is:
///
/// - `unpack(pack(v, o), o) == v` for every valid `v` and order `o`
/// - `pack` never fails for a value that satisfied construction
/// - `unpack` fails with [`WireError::Length`] unless the input is exactly
///   `WIDTH` bytes
pub trait Packable: Sized {
    /// Exact serialized byte width.
    const WIDTH: usize;

    /// Appends the wire representation to `buf`.
    fn pack_into(&self, buf: &mut BytesMut, order: ByteOrder);

    /// Serializes to a fresh buffer.
    fn pack(&self, order: ByteOrder) -> Bytes {
        let mut buf = BytesMut::with_capacity(Self::WIDTH);
        self.pack_into(&mut buf, order);
        buf.freeze()
    }

    /// Reconstructs a value from exactly [`WIDTH`](Packable::WIDTH) bytes.
    fn unpack(data: &[u8], order: ByteOrder) -> WireResult<Self>;

    /// Checks the exact-width precondition shared by all `unpack` impls.
    fn check_width(data: &[u8]) -> WireResult<()> {
        if data.len() != Self::WIDTH {
            return Err(WireError::Length {
                expected: Self::WIDTH,
                actual: data.len(),
            });
        }
        Ok(())
    }
}
