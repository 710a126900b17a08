//! Composite records: ordered, named collections of packable fields
//!
//! A [`Schema`] is declared once per composite record type as an explicit
//! ordered list of (name, kind) pairs; a [`Record`] holds one value per
//! declared field. Records pack as the concatenation of their fields' wire
//! forms in declaration order with no padding or alignment.

use crate::byte_order::ByteOrder;
use crate::error::{WireError, WireResult};
use crate::int::{Int16, Int32, Int64, Int8, UInt16, UInt32, UInt64, UInt8};
use crate::packable::Packable;
use bytes::{Bytes, BytesMut};
use std::fmt;
use std::sync::Arc;

/// Kind descriptor for one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    UInt8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    UInt16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    UInt32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// Nested composite record
    Record(Schema),
}

impl FieldKind {
    /// Fixed serialized width of this kind in bytes.
    pub fn width(&self) -> usize {
        match self {
            FieldKind::Int8 => Int8::WIDTH,
            FieldKind::UInt8 => UInt8::WIDTH,
            FieldKind::Int16 => Int16::WIDTH,
            FieldKind::UInt16 => UInt16::WIDTH,
            FieldKind::Int32 => Int32::WIDTH,
            FieldKind::UInt32 => UInt32::WIDTH,
            FieldKind::Int64 => Int64::WIDTH,
            FieldKind::UInt64 => UInt64::WIDTH,
            FieldKind::Record(schema) => schema.width(),
        }
    }

    /// Builds a value of this kind from a raw integer, range-checked.
    ///
    /// Fails with [`WireError::Argument`] for [`FieldKind::Record`], which
    /// has no integer representation.
    pub fn value_of(&self, value: i128) -> WireResult<FieldValue> {
        Ok(match self {
            FieldKind::Int8 => FieldValue::Int8(Int8::new(value)?),
            FieldKind::UInt8 => FieldValue::UInt8(UInt8::new(value)?),
            FieldKind::Int16 => FieldValue::Int16(Int16::new(value)?),
            FieldKind::UInt16 => FieldValue::UInt16(UInt16::new(value)?),
            FieldKind::Int32 => FieldValue::Int32(Int32::new(value)?),
            FieldKind::UInt32 => FieldValue::UInt32(UInt32::new(value)?),
            FieldKind::Int64 => FieldValue::Int64(Int64::new(value)?),
            FieldKind::UInt64 => FieldValue::UInt64(UInt64::new(value)?),
            FieldKind::Record(schema) => {
                return Err(WireError::Argument(format!(
                    "field of record kind `{}` cannot be built from an integer",
                    schema.name()
                )))
            }
        })
    }

    /// Reconstructs a value of this kind from exactly `width()` bytes.
    pub fn unpack(&self, data: &[u8], order: ByteOrder) -> WireResult<FieldValue> {
        Ok(match self {
            FieldKind::Int8 => FieldValue::Int8(Int8::unpack(data, order)?),
            FieldKind::UInt8 => FieldValue::UInt8(UInt8::unpack(data, order)?),
            FieldKind::Int16 => FieldValue::Int16(Int16::unpack(data, order)?),
            FieldKind::UInt16 => FieldValue::UInt16(UInt16::unpack(data, order)?),
            FieldKind::Int32 => FieldValue::Int32(Int32::unpack(data, order)?),
            FieldKind::UInt32 => FieldValue::UInt32(UInt32::unpack(data, order)?),
            FieldKind::Int64 => FieldValue::Int64(Int64::unpack(data, order)?),
            FieldKind::UInt64 => FieldValue::UInt64(UInt64::unpack(data, order)?),
            FieldKind::Record(schema) => FieldValue::Record(schema.unpack(data, order)?),
        })
    }

    fn coerce(&self, input: FieldInput) -> WireResult<FieldValue> {
        match input {
            FieldInput::Int(value) => self.value_of(value),
            FieldInput::Value(value) => {
                if &value.kind() != self {
                    return Err(WireError::Argument(format!(
                        "expected a {:?} value, got {:?}",
                        self,
                        value.kind()
                    )));
                }
                Ok(value)
            }
        }
    }
}

/// One field's value inside a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Signed 8-bit value
    Int8(Int8),
    /// Unsigned 8-bit value
    UInt8(UInt8),
    /// Signed 16-bit value
    Int16(Int16),
    /// Unsigned 16-bit value
    UInt16(UInt16),
    /// Signed 32-bit value
    Int32(Int32),
    /// Unsigned 32-bit value
    UInt32(UInt32),
    /// Signed 64-bit value
    Int64(Int64),
    /// Unsigned 64-bit value
    UInt64(UInt64),
    /// Nested record value
    Record(Record),
}

impl FieldValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Int8(_) => FieldKind::Int8,
            FieldValue::UInt8(_) => FieldKind::UInt8,
            FieldValue::Int16(_) => FieldKind::Int16,
            FieldValue::UInt16(_) => FieldKind::UInt16,
            FieldValue::Int32(_) => FieldKind::Int32,
            FieldValue::UInt32(_) => FieldKind::UInt32,
            FieldValue::Int64(_) => FieldKind::Int64,
            FieldValue::UInt64(_) => FieldKind::UInt64,
            FieldValue::Record(record) => FieldKind::Record(record.schema().clone()),
        }
    }

    /// Serialized width in bytes.
    pub fn width(&self) -> usize {
        self.kind().width()
    }

    /// Appends the wire representation to `buf`.
    pub fn pack_into(&self, buf: &mut BytesMut, order: ByteOrder) {
        match self {
            FieldValue::Int8(v) => v.pack_into(buf, order),
            FieldValue::UInt8(v) => v.pack_into(buf, order),
            FieldValue::Int16(v) => v.pack_into(buf, order),
            FieldValue::UInt16(v) => v.pack_into(buf, order),
            FieldValue::Int32(v) => v.pack_into(buf, order),
            FieldValue::UInt32(v) => v.pack_into(buf, order),
            FieldValue::Int64(v) => v.pack_into(buf, order),
            FieldValue::UInt64(v) => v.pack_into(buf, order),
            FieldValue::Record(v) => v.pack_into(buf, order),
        }
    }

    /// Serializes to a fresh buffer.
    pub fn pack(&self, order: ByteOrder) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.width());
        self.pack_into(&mut buf, order);
        buf.freeze()
    }

    /// The numeric value for integer kinds, `None` for nested records.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            FieldValue::Int8(v) => Some((*v).into()),
            FieldValue::UInt8(v) => Some((*v).into()),
            FieldValue::Int16(v) => Some((*v).into()),
            FieldValue::UInt16(v) => Some((*v).into()),
            FieldValue::Int32(v) => Some((*v).into()),
            FieldValue::UInt32(v) => Some((*v).into()),
            FieldValue::Int64(v) => Some((*v).into()),
            FieldValue::UInt64(v) => Some((*v).into()),
            FieldValue::Record(_) => None,
        }
    }

    /// The nested record for record kinds, `None` otherwise.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int8(v) => write!(f, "{}", v),
            FieldValue::UInt8(v) => write!(f, "{}", v),
            FieldValue::Int16(v) => write!(f, "{}", v),
            FieldValue::UInt16(v) => write!(f, "{}", v),
            FieldValue::Int32(v) => write!(f, "{}", v),
            FieldValue::UInt32(v) => write!(f, "{}", v),
            FieldValue::Int64(v) => write!(f, "{}", v),
            FieldValue::UInt64(v) => write!(f, "{}", v),
            FieldValue::Record(v) => write!(f, "{}", v.schema().name()),
        }
    }
}

macro_rules! field_value_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for FieldValue {
                fn from(value: $variant) -> Self {
                    FieldValue::$variant(value)
                }
            }
        )*
    };
}

field_value_from!(Int8, UInt8, Int16, UInt16, Int32, UInt32, Int64, UInt64);

impl From<Record> for FieldValue {
    fn from(record: Record) -> Self {
        FieldValue::Record(record)
    }
}

/// Loosely-typed input accepted by [`Schema::record`].
///
/// Raw integers are range-checked against the declared field kind at
/// construction time.
#[derive(Debug, Clone)]
pub enum FieldInput {
    /// Raw integer, coerced through the declared kind
    Int(i128),
    /// Already-typed value; its kind must match the declaration
    Value(FieldValue),
}

impl From<i128> for FieldInput {
    fn from(value: i128) -> Self {
        FieldInput::Int(value)
    }
}

impl From<FieldValue> for FieldInput {
    fn from(value: FieldValue) -> Self {
        FieldInput::Value(value)
    }
}

impl From<Record> for FieldInput {
    fn from(record: Record) -> Self {
        FieldInput::Value(FieldValue::Record(record))
    }
}

#[derive(Debug, PartialEq, Eq)]
struct SchemaInner {
    name: String,
    fields: Vec<(String, FieldKind)>,
    width: usize,
}

/// Declared shape of a composite record: an ordered, unique-named list of
/// (field name, kind) pairs. Built once via [`Schema::builder`] and never
/// mutated; cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

impl Schema {
    /// Starts declaring a schema with the given record-type name.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Record-type name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    /// True if the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Total serialized width: the sum of all field widths.
    pub fn width(&self) -> usize {
        self.inner.width
    }

    /// True if `name` is a declared field.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Declared field names, in wire order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Declared (name, kind) pairs, in wire order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldKind)> {
        self.inner
            .fields
            .iter()
            .map(|(name, kind)| (name.as_str(), kind))
    }

    /// Kind declared for `name`.
    pub fn kind_of(&self, name: &str) -> WireResult<&FieldKind> {
        self.index_of(name)
            .map(|i| &self.inner.fields[i].1)
            .ok_or_else(|| WireError::UnknownField(name.into()))
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.inner.fields.iter().position(|(n, _)| n == name)
    }

    /// Builds a [`Record`] from named and positional field values.
    ///
    /// Named values bind first; positional values fill the remaining
    /// declared fields in order. Fails with [`WireError::Argument`] when
    /// the positional count does not exactly match the unnamed-but-required
    /// fields, and with [`WireError::UnknownField`] for a name the schema
    /// does not declare.
    pub fn record<I>(&self, named: &[(&str, FieldInput)], positional: I) -> WireResult<Record>
    where
        I: IntoIterator<Item = FieldInput>,
    {
        let mut slots: Vec<Option<FieldValue>> = vec![None; self.len()];

        for (name, input) in named {
            let index = self
                .index_of(name)
                .ok_or_else(|| WireError::UnknownField((*name).into()))?;
            if slots[index].is_some() {
                return Err(WireError::Argument(format!(
                    "duplicate value for field `{}`",
                    name
                )));
            }
            slots[index] = Some(self.inner.fields[index].1.coerce(input.clone())?);
        }

        let mut positional = positional.into_iter();
        for (index, slot) in slots.iter_mut().enumerate() {
            if slot.is_none() {
                match positional.next() {
                    Some(input) => {
                        *slot = Some(self.inner.fields[index].1.coerce(input)?);
                    }
                    None => {
                        return Err(WireError::Argument(format!(
                            "missing value for field `{}`",
                            self.inner.fields[index].0
                        )))
                    }
                }
            }
        }
        if positional.next().is_some() {
            return Err(WireError::Argument("unexpected positional value".into()));
        }

        let values = slots.into_iter().map(|slot| slot.unwrap()).collect();
        Ok(Record {
            schema: self.clone(),
            values,
        })
    }

    /// Reconstructs a [`Record`] by splitting `data` into consecutive
    /// fixed-width slices in declared field order.
    ///
    /// Fails with [`WireError::Length`] unless `data.len()` equals
    /// [`width`](Schema::width) exactly; never truncates or pads.
    pub fn unpack(&self, data: &[u8], order: ByteOrder) -> WireResult<Record> {
        if data.len() != self.width() {
            return Err(WireError::Length {
                expected: self.width(),
                actual: data.len(),
            });
        }
        let mut offset = 0;
        let mut values = Vec::with_capacity(self.len());
        for (_, kind) in &self.inner.fields {
            let width = kind.width();
            values.push(kind.unpack(&data[offset..offset + width], order)?);
            offset += width;
        }
        Ok(Record {
            schema: self.clone(),
            values,
        })
    }
}

/// Incremental [`Schema`] declaration.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<(String, FieldKind)>,
}

impl SchemaBuilder {
    /// Appends a field; declaration order is wire order.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push((name.into(), kind));
        self
    }

    /// Finalizes the schema, rejecting duplicate field names.
    pub fn build(self) -> WireResult<Schema> {
        for (i, (name, _)) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|(n, _)| n == name) {
                return Err(WireError::DuplicateField(name.clone()));
            }
        }
        let width = self.fields.iter().map(|(_, kind)| kind.width()).sum();
        Ok(Schema {
            inner: Arc::new(SchemaInner {
                name: self.name,
                fields: self.fields,
                width,
            }),
        })
    }
}

/// One value per declared schema field, in schema order.
///
/// Effectively immutable after construction. Equality is structural: two
/// records are equal iff they hold the same number of fields and all field
/// values compare equal pairwise, independent of schema identity.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Schema,
    values: Vec<FieldValue>,
}

impl Record {
    /// The schema this record was built against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the record holds no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True if `name` is a declared field.
    pub fn contains(&self, name: &str) -> bool {
        self.schema.contains(name)
    }

    /// The value of the field called `name`.
    pub fn get(&self, name: &str) -> WireResult<&FieldValue> {
        self.schema
            .index_of(name)
            .map(|i| &self.values[i])
            .ok_or_else(|| WireError::UnknownField(name.into()))
    }

    /// (name, value) pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.schema
            .names()
            .zip(self.values.iter())
    }

    /// Field values in wire order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Appends the wire representation to `buf`: each field's packed bytes
    /// concatenated in declared order, no padding.
    pub fn pack_into(&self, buf: &mut BytesMut, order: ByteOrder) {
        for value in &self.values {
            value.pack_into(buf, order);
        }
    }

    /// Serializes to a fresh buffer.
    pub fn pack(&self, order: ByteOrder) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.schema.width());
        self.pack_into(&mut buf, order);
        buf.freeze()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a == b)
    }
}

impl Eq for Record {}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "typedef struct {{")?;
        for (name, value) in self.iter() {
            writeln!(f, "    {} = {};", name, value)?;
        }
        write!(f, "}} {}", self.schema.name())
    }
}
