use crate::{
    codec::{Reader, Writer},
    error::Error,
    registry::{ReaderRegistry, ValueRead, ValueWrite, WriterRegistry},
    tag::{marker, TypeTag},
    value::{CustomValue, EnumCodec, FromValue, IntoValue, Value},
};
use std::{collections::HashMap, hash::Hash};
use tracing::trace;

/// Object graph writer: a primitive [`Writer`] plus the custom writer
/// registry. One instance per serialization session; [`into_bytes`]
/// finishes the session.
///
/// [`into_bytes`]: ObjectWriter::into_bytes
#[derive(Default)]
pub struct ObjectWriter {
    pub raw: Writer,
    writers: WriterRegistry,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self {
            raw: Writer::new(),
            writers: WriterRegistry::default(),
        }
    }

    /// Registers a custom writer. Resolution is first match in
    /// registration order, so overlapping writers must be registered
    /// most-specific first.
    pub fn register(&mut self, writer: impl ValueWrite + 'static) {
        self.writers.register(writer);
    }

    pub fn writers(&self) -> &WriterRegistry {
        &self.writers
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.raw.into_bytes()
    }

    /// Writes one self-describing value: tag first, payload after.
    /// A null must carry a concrete declared type; `Null(Dynamic)` is
    /// the untyped-null error.
    pub fn write_object(&mut self, value: &Value) -> Result<(), Error> {
        trace!(kind = value.kind(), "write object");
        match value {
            Value::Null(tag) => {
                if *tag == TypeTag::Dynamic {
                    return Err(Error::UntypedNull);
                }
                self.raw.write_u8(marker::NULL);
                tag.encode(&mut self.raw);
                Ok(())
            }
            Value::Custom(c) => self.write_custom(&**c),
            other => {
                let tag = other.payload_tag().ok_or(Error::MalformedEncoding)?;
                self.raw.write_u8(tag.marker());
                self.write_payload(other)
            }
        }
    }

    pub fn write_object_as<T: IntoValue>(&mut self, value: T) -> Result<(), Error> {
        self.write_object(&value.into_value())
    }

    /// Nullable scalar through the generic object path; `None` travels
    /// as a typed null of `T`.
    pub fn write_nullable<T: IntoValue>(&mut self, value: Option<T>) -> Result<(), Error> {
        self.write_object(&value.into_value())
    }

    /// Sequence envelope: element tag, signed count, then elements.
    /// A concrete `T` gives the homogeneous layout (payloads only);
    /// `T = Value` forces a full tag per element.
    pub fn write_enumerable<T: IntoValue>(
        &mut self,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), Error> {
        let items = items
            .into_iter()
            .map(IntoValue::into_value)
            .collect::<Vec<_>>();
        self.write_object(&Value::Seq {
            elem: T::tag(),
            items,
        })
    }

    /// Map envelope: key tag, value tag, signed pair count, then
    /// interleaved pairs.
    pub fn write_dictionary<K: IntoValue, V: IntoValue>(
        &mut self,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), Error> {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into_value(), v.into_value()))
            .collect::<Vec<_>>();
        self.write_object(&Value::Map {
            key: K::tag(),
            value: V::tag(),
            entries,
        })
    }

    pub fn write_enum<E: EnumCodec>(&mut self, value: &E) -> Result<(), Error> {
        self.write_object(&Value::from_enum(value))
    }

    fn write_custom(&mut self, value: &dyn CustomValue) -> Result<(), Error> {
        let Some(writer) = self.writers.resolve(value.as_any()) else {
            return Err(Error::UnregisteredWriter(format!("{value:?}")));
        };
        self.raw.write_u8(marker::CUSTOM);
        self.raw.write_str(writer.type_key());
        writer.write_value(value.as_any(), self)
    }

    fn write_payload(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Bool(v) => self.raw.write_bool(*v),
            Value::I8(v) => self.raw.write_i8(*v),
            Value::U8(v) => self.raw.write_u8(*v),
            Value::I16(v) => self.raw.write_i16(*v),
            Value::U16(v) => self.raw.write_u16(*v),
            Value::I32(v) => self.raw.write_i32(*v),
            Value::U32(v) => self.raw.write_u32(*v),
            Value::I64(v) => self.raw.write_i64(*v),
            Value::U64(v) => self.raw.write_u64(*v),
            Value::F32(v) => self.raw.write_f32(*v),
            Value::F64(v) => self.raw.write_f64(*v),
            Value::Decimal(v) => self.raw.write_decimal(*v),
            Value::Char(v) => self.raw.write_char(*v),
            Value::Str(v) => self.raw.write_str(v),
            Value::Bytes(v) => self.raw.write_bytes(v),
            Value::Uuid(v) => self.raw.write_uuid(*v),
            Value::Time(v) => self.raw.write_time(*v),
            Value::Span(v) => self.raw.write_span(*v)?,
            Value::Enum { type_key, variant } => {
                self.raw.write_str(type_key);
                self.raw.write_str(variant);
            }
            Value::Seq { elem, items } => self.write_seq_payload(elem, items)?,
            Value::Map {
                key,
                value,
                entries,
            } => self.write_map_payload(key, value, entries)?,
            // nulls and customs only exist as fully tagged values
            Value::Null(_) | Value::Custom(_) => return Err(Error::MalformedEncoding),
        }
        Ok(())
    }

    fn write_seq_payload(&mut self, elem: &TypeTag, items: &[Value]) -> Result<(), Error> {
        elem.encode(&mut self.raw);
        self.write_count(items.len())?;
        for item in items {
            self.write_elem(elem, item)?;
        }
        Ok(())
    }

    fn write_map_payload(
        &mut self,
        key: &TypeTag,
        value: &TypeTag,
        entries: &[(Value, Value)],
    ) -> Result<(), Error> {
        key.encode(&mut self.raw);
        value.encode(&mut self.raw);
        self.write_count(entries.len())?;
        for (k, v) in entries {
            self.write_elem(key, k)?;
            self.write_elem(value, v)?;
        }
        Ok(())
    }

    fn write_elem(&mut self, tag: &TypeTag, item: &Value) -> Result<(), Error> {
        match (tag, item) {
            (TypeTag::Dynamic, _) => self.write_object(item),
            (TypeTag::Custom(key), Value::Custom(c)) => {
                let Some(writer) = self.writers.resolve((**c).as_any()) else {
                    return Err(Error::UnregisteredWriter(format!("{c:?}")));
                };
                if writer.type_key() != key.as_str() {
                    return Err(Error::InvalidCast {
                        requested: tag.to_string(),
                        found: writer.type_key().to_owned(),
                    });
                }
                writer.write_value((**c).as_any(), self)
            }
            _ if item.payload_tag().as_ref() == Some(tag) => self.write_payload(item),
            _ => Err(Error::InvalidCast {
                requested: tag.to_string(),
                found: item.kind().to_owned(),
            }),
        }
    }

    fn write_count(&mut self, len: usize) -> Result<(), Error> {
        self.raw
            .write_i32(i32::try_from(len).map_err(|_| Error::Overflow)?);
        Ok(())
    }
}

/// Object graph reader over one input buffer. The reader registry must
/// mirror the writer registry that produced the stream.
pub struct ObjectReader<'a> {
    pub raw: Reader<'a>,
    readers: ReaderRegistry,
}

impl<'a> ObjectReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            raw: Reader::new(input),
            readers: ReaderRegistry::default(),
        }
    }

    pub fn register(&mut self, reader: impl ValueRead + 'static) {
        self.readers.register(reader);
    }

    pub fn readers(&self) -> &ReaderRegistry {
        &self.readers
    }

    /// Mirrors [`ObjectWriter::write_object`]: reads the tag, then the
    /// payload the tag selects.
    pub fn read_object(&mut self) -> Result<Value, Error> {
        let m = self.raw.read_u8()?;
        trace!(marker = m, "read object");
        match m {
            marker::NULL => Ok(Value::Null(TypeTag::decode(&mut self.raw)?)),
            marker::CUSTOM => {
                let key = self.raw.read_str()?;
                self.read_custom(key)
            }
            other => {
                let tag = TypeTag::from_marker(other)?;
                self.read_payload(&tag)
            }
        }
    }

    /// Typed read: decodes, then converts; a kind mismatch is an
    /// invalid-cast error.
    pub fn read_object_as<T: FromValue>(&mut self) -> Result<T, Error> {
        T::from_value(self.read_object()?)
    }

    pub fn read_nullable<T: FromValue>(&mut self) -> Result<Option<T>, Error> {
        self.read_object_as()
    }

    pub fn read_enumerable<T: FromValue>(&mut self) -> Result<Vec<T>, Error> {
        match self.read_object()? {
            Value::Seq { items, .. } => items.into_iter().map(T::from_value).collect(),
            other => Err(Error::cast::<Vec<T>>(&other)),
        }
    }

    pub fn read_dictionary<K, V>(&mut self) -> Result<HashMap<K, V>, Error>
    where
        K: FromValue + Eq + Hash,
        V: FromValue,
    {
        match self.read_object()? {
            Value::Map { entries, .. } => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(Error::cast::<HashMap<K, V>>(&other)),
        }
    }

    pub fn read_enum<E: EnumCodec>(&mut self) -> Result<E, Error> {
        self.read_object()?.into_enum()
    }

    fn read_custom(&mut self, key: String) -> Result<Value, Error> {
        let Some(reader) = self.readers.resolve(&key) else {
            return Err(Error::UnknownType(key));
        };
        Ok(Value::Custom(reader.read_value(self)?))
    }

    fn read_payload(&mut self, tag: &TypeTag) -> Result<Value, Error> {
        Ok(match tag {
            TypeTag::Bool => Value::Bool(self.raw.read_bool()?),
            TypeTag::I8 => Value::I8(self.raw.read_i8()?),
            TypeTag::U8 => Value::U8(self.raw.read_u8()?),
            TypeTag::I16 => Value::I16(self.raw.read_i16()?),
            TypeTag::U16 => Value::U16(self.raw.read_u16()?),
            TypeTag::I32 => Value::I32(self.raw.read_i32()?),
            TypeTag::U32 => Value::U32(self.raw.read_u32()?),
            TypeTag::I64 => Value::I64(self.raw.read_i64()?),
            TypeTag::U64 => Value::U64(self.raw.read_u64()?),
            TypeTag::F32 => Value::F32(self.raw.read_f32()?),
            TypeTag::F64 => Value::F64(self.raw.read_f64()?),
            TypeTag::Decimal => Value::Decimal(self.raw.read_decimal()?),
            TypeTag::Char => Value::Char(self.raw.read_char()?),
            TypeTag::Str => Value::Str(self.raw.read_str()?),
            TypeTag::Bytes => Value::Bytes(self.raw.read_bytes()?),
            TypeTag::Uuid => Value::Uuid(self.raw.read_uuid()?),
            TypeTag::Time => Value::Time(self.raw.read_time()?),
            TypeTag::Span => Value::Span(self.raw.read_span()?),
            TypeTag::Enum => Value::Enum {
                type_key: self.raw.read_str()?,
                variant: self.raw.read_str()?,
            },
            TypeTag::Seq => {
                let elem = TypeTag::decode(&mut self.raw)?;
                let n = self.read_count()?;
                let mut items = Vec::with_capacity(n);
                for _ in 0..n {
                    items.push(self.read_elem(&elem)?);
                }
                Value::Seq { elem, items }
            }
            TypeTag::Map => {
                let key = TypeTag::decode(&mut self.raw)?;
                let value = TypeTag::decode(&mut self.raw)?;
                let n = self.read_count()?;
                let mut entries = Vec::with_capacity(n);
                for _ in 0..n {
                    let k = self.read_elem(&key)?;
                    let v = self.read_elem(&value)?;
                    entries.push((k, v));
                }
                Value::Map {
                    key,
                    value,
                    entries,
                }
            }
            TypeTag::Custom(key) => return self.read_custom(key.clone()),
            TypeTag::Dynamic => return self.read_object(),
        })
    }

    fn read_elem(&mut self, tag: &TypeTag) -> Result<Value, Error> {
        if *tag == TypeTag::Dynamic {
            self.read_object()
        } else {
            self.read_payload(tag)
        }
    }

    fn read_count(&mut self) -> Result<usize, Error> {
        let n = self.raw.read_i32()?;
        let n = usize::try_from(n).map_err(|_| Error::MalformedEncoding)?;
        // every element payload occupies at least one byte
        if n > self.raw.remaining() {
            return Err(Error::TooLargeAlloc);
        }
        Ok(n)
    }
}
