//! Schema-driven frame decoding

use crate::error::NetError;
use bytes::{Buf, BytesMut};
use chainspider_wire::{ByteOrder, Record, Schema};
use tokio_util::codec::Decoder;

/// Decodes consecutive fixed-width [`Record`] frames of one [`Schema`].
///
/// The schema's total width is the frame size; there is no length prefix
/// on the wire. Suitable for protocols whose messages are fixed-layout
/// records, which is exactly what [`Schema`] describes.
#[derive(Debug, Clone)]
pub struct RecordDecoder {
    schema: Schema,
    order: ByteOrder,
}

impl RecordDecoder {
    /// Creates a decoder for `schema` in network byte order.
    pub fn new(schema: Schema) -> Self {
        Self::with_order(schema, ByteOrder::Network)
    }

    /// Creates a decoder for `schema` in an explicit byte order.
    pub fn with_order(schema: Schema, order: ByteOrder) -> Self {
        Self { schema, order }
    }

    /// The schema this decoder splits frames by.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Decoder for RecordDecoder {
    type Item = Record;
    type Error = NetError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Record>, NetError> {
        let width = self.schema.width();
        if width == 0 || src.len() < width {
            return Ok(None);
        }
        let record = self.schema.unpack(&src[..width], self.order)?;
        src.advance(width);
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainspider_wire::FieldKind;

    fn schema() -> Schema {
        Schema::builder("Frame")
            .field("a", FieldKind::UInt8)
            .field("b", FieldKind::UInt16)
            .build()
            .unwrap()
    }

    #[test]
    fn test_decodes_consecutive_frames() {
        let mut decoder = RecordDecoder::new(schema());
        let mut buf = BytesMut::from(&[0x05, 0x01, 0x2c, 0x07, 0x00, 0x01][..]);

        let first = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.get("a").unwrap().as_i128(), Some(5));
        assert_eq!(first.get("b").unwrap().as_i128(), Some(300));

        let second = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.get("a").unwrap().as_i128(), Some(7));
        assert_eq!(second.get("b").unwrap().as_i128(), Some(1));

        assert!(decoder.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_partial_frame_waits_for_more() {
        let mut decoder = RecordDecoder::new(schema());
        let mut buf = BytesMut::from(&[0x05, 0x01][..]);
        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(&[0x2c]);
        let record = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(record.get("b").unwrap().as_i128(), Some(300));
    }

    #[test]
    fn test_little_endian_frames() {
        let mut decoder = RecordDecoder::with_order(schema(), ByteOrder::Little);
        let mut buf = BytesMut::from(&[0x05, 0x2c, 0x01][..]);
        let record = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(record.get("b").unwrap().as_i128(), Some(300));
    }
}
