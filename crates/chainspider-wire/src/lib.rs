//! # chainspider-wire
//!
//! Fixed-layout binary wire codec for chainspider.
//!
//! This crate provides:
//! - Explicit byte-order selection for every encode/decode
//! - Bounds-checked sized integers (8/16/32/64-bit, signed and unsigned)
//! - Composite records packed as straight field concatenation
//!
//! ## Wire format
//!
//! Every [`Packable`] value serializes to a contiguous byte sequence with
//! no padding, no length prefix, and no alignment. A record is the ordered
//! concatenation of its fields' serializations; field order is wire order.
//! Widths are exactly 1, 2, 4, or 8 bytes as declared.
//!
//! ## Usage
//!
//! ```
//! use chainspider_wire::{ByteOrder, FieldKind, Packable, Schema, UInt16};
//!
//! let schema = Schema::builder("Ping")
//!     .field("cookie", FieldKind::UInt16)
//!     .build()
//!     .unwrap();
//! let record = schema.record(&[("cookie", 300.into())], []).unwrap();
//! assert_eq!(&record.pack(ByteOrder::Network)[..], &[0x01, 0x2c]);
//!
//! let v = UInt16::unpack(&[0x01, 0x2c], ByteOrder::Network).unwrap();
//! assert_eq!(v.get(), 300);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod byte_order;
mod error;
mod int;
mod packable;
mod record;

pub use byte_order::ByteOrder;
pub use error::{WireError, WireResult};
pub use int::{Int16, Int32, Int64, Int8, UInt16, UInt32, UInt64, UInt8};
pub use packable::Packable;
pub use record::{FieldInput, FieldKind, FieldValue, Record, Schema, SchemaBuilder};
