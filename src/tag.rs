use crate::{
    codec::{Reader, Writer},
    error::Error,
};
use std::fmt;

/// Wire marker bytes. `NULL` prefixes a typed null value and is never a
/// valid tag on its own.
pub(crate) mod marker {
    pub const NULL: u8 = 0x00;
    pub const BOOL: u8 = 0x01;
    pub const I8: u8 = 0x02;
    pub const U8: u8 = 0x03;
    pub const I16: u8 = 0x04;
    pub const U16: u8 = 0x05;
    pub const I32: u8 = 0x06;
    pub const U32: u8 = 0x07;
    pub const I64: u8 = 0x08;
    pub const U64: u8 = 0x09;
    pub const F32: u8 = 0x0A;
    pub const F64: u8 = 0x0B;
    pub const DECIMAL: u8 = 0x0C;
    pub const CHAR: u8 = 0x0D;
    pub const STR: u8 = 0x0E;
    pub const BYTES: u8 = 0x0F;
    pub const UUID: u8 = 0x10;
    pub const TIME: u8 = 0x11;
    pub const SPAN: u8 = 0x12;
    pub const ENUM: u8 = 0x13;
    pub const SEQ: u8 = 0x14;
    pub const MAP: u8 = 0x15;
    pub const CUSTOM: u8 = 0x16;
    pub const DYNAMIC: u8 = 0x17;
}

/// Stable value type identity carried on the wire.
///
/// Well-known kinds encode as a single marker byte; [`TypeTag::Custom`]
/// additionally carries the registered type key. [`TypeTag::Dynamic`] is
/// the "object" marker: as a sequence or map component tag it forces a
/// full tag per element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeTag {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    Char,
    Str,
    Bytes,
    Uuid,
    Time,
    Span,
    Enum,
    Seq,
    Map,
    Custom(String),
    Dynamic,
}

impl TypeTag {
    pub fn marker(&self) -> u8 {
        match self {
            Self::Bool => marker::BOOL,
            Self::I8 => marker::I8,
            Self::U8 => marker::U8,
            Self::I16 => marker::I16,
            Self::U16 => marker::U16,
            Self::I32 => marker::I32,
            Self::U32 => marker::U32,
            Self::I64 => marker::I64,
            Self::U64 => marker::U64,
            Self::F32 => marker::F32,
            Self::F64 => marker::F64,
            Self::Decimal => marker::DECIMAL,
            Self::Char => marker::CHAR,
            Self::Str => marker::STR,
            Self::Bytes => marker::BYTES,
            Self::Uuid => marker::UUID,
            Self::Time => marker::TIME,
            Self::Span => marker::SPAN,
            Self::Enum => marker::ENUM,
            Self::Seq => marker::SEQ,
            Self::Map => marker::MAP,
            Self::Custom(_) => marker::CUSTOM,
            Self::Dynamic => marker::DYNAMIC,
        }
    }

    pub(crate) fn encode(&self, out: &mut Writer) {
        out.write_u8(self.marker());
        if let Self::Custom(key) = self {
            out.write_str(key);
        }
    }

    pub(crate) fn decode(buf: &mut Reader<'_>) -> Result<Self, Error> {
        let m = buf.read_u8()?;
        if m == marker::CUSTOM {
            return Ok(Self::Custom(buf.read_str()?));
        }
        Self::from_marker(m)
    }

    /// Tag for a bare marker byte. `CUSTOM` carries a key and must go
    /// through [`TypeTag::decode`].
    pub(crate) fn from_marker(m: u8) -> Result<Self, Error> {
        Ok(match m {
            marker::BOOL => Self::Bool,
            marker::I8 => Self::I8,
            marker::U8 => Self::U8,
            marker::I16 => Self::I16,
            marker::U16 => Self::U16,
            marker::I32 => Self::I32,
            marker::U32 => Self::U32,
            marker::I64 => Self::I64,
            marker::U64 => Self::U64,
            marker::F32 => Self::F32,
            marker::F64 => Self::F64,
            marker::DECIMAL => Self::Decimal,
            marker::CHAR => Self::Char,
            marker::STR => Self::Str,
            marker::BYTES => Self::Bytes,
            marker::UUID => Self::Uuid,
            marker::TIME => Self::Time,
            marker::SPAN => Self::Span,
            marker::ENUM => Self::Enum,
            marker::SEQ => Self::Seq,
            marker::MAP => Self::Map,
            marker::DYNAMIC => Self::Dynamic,
            other => return Err(Error::UnknownTag(other)),
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
            Self::Char => "char",
            Self::Str => "str",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
            Self::Time => "time",
            Self::Span => "span",
            Self::Enum => "enum",
            Self::Seq => "seq",
            Self::Map => "map",
            Self::Custom(key) => return write!(f, "custom `{key}`"),
            Self::Dynamic => "dynamic",
        };
        f.write_str(name)
    }
}
