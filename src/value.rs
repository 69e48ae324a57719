use crate::{error::Error, tag::TypeTag};
use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use std::{any::Any, fmt};
use uuid::Uuid;

/// Payload of a [`Value::Custom`]. Blanket-implemented for any
/// `Any + Debug` type, so user structs qualify as-is.
pub trait CustomValue: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any + fmt::Debug> CustomValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Enum serialization capability: a stable wire key plus variant names.
/// The wire carries `(NAME, variant)` as two strings; reads resolve the
/// key and parse the variant back.
pub trait EnumCodec: Sized + Any {
    const NAME: &'static str;

    fn variant(&self) -> &'static str;

    fn from_variant(variant: &str) -> Option<Self>;
}

/// Self-describing value as it travels through the object path.
///
/// A null always carries the declared type of the absent value, so the
/// reading side can produce a correctly typed `None`.
#[derive(Debug)]
pub enum Value {
    Null(TypeTag),
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Char(char),
    Str(String),
    Bytes(Bytes),
    Uuid(Uuid),
    Time(DateTime<Utc>),
    Span(TimeDelta),
    Enum { type_key: String, variant: String },
    Seq { elem: TypeTag, items: Vec<Value> },
    Map {
        key: TypeTag,
        value: TypeTag,
        entries: Vec<(Value, Value)>,
    },
    Custom(Box<dyn CustomValue>),
}

impl Value {
    pub fn custom<T: Any + fmt::Debug>(v: T) -> Self {
        Self::Custom(Box::new(v))
    }

    pub fn from_enum<E: EnumCodec>(v: &E) -> Self {
        Self::Enum {
            type_key: E::NAME.to_owned(),
            variant: v.variant().to_owned(),
        }
    }

    pub fn into_enum<E: EnumCodec>(self) -> Result<E, Error> {
        match self {
            Self::Enum { type_key, variant } => {
                if type_key != E::NAME {
                    return Err(Error::UnknownType(type_key));
                }
                E::from_variant(&variant)
                    .ok_or(Error::UnknownVariant(type_key, variant))
            }
            other => Err(Error::cast::<E>(&other)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    pub fn downcast<T: Any>(self) -> Result<T, Error> {
        match self {
            Self::Custom(c) => c
                .into_any()
                .downcast::<T>()
                .map(|v| *v)
                .map_err(|_| Error::InvalidCast {
                    requested: std::any::type_name::<T>().to_owned(),
                    found: "custom".to_owned(),
                }),
            other => Err(Error::cast::<T>(&other)),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(c) => (**c).as_any().downcast_ref(),
            _ => None,
        }
    }

    /// Tag of the payload this value would encode as, or `None` for the
    /// kinds that only exist as fully tagged values (nulls and customs).
    pub(crate) fn payload_tag(&self) -> Option<TypeTag> {
        Some(match self {
            Self::Bool(_) => TypeTag::Bool,
            Self::I8(_) => TypeTag::I8,
            Self::U8(_) => TypeTag::U8,
            Self::I16(_) => TypeTag::I16,
            Self::U16(_) => TypeTag::U16,
            Self::I32(_) => TypeTag::I32,
            Self::U32(_) => TypeTag::U32,
            Self::I64(_) => TypeTag::I64,
            Self::U64(_) => TypeTag::U64,
            Self::F32(_) => TypeTag::F32,
            Self::F64(_) => TypeTag::F64,
            Self::Decimal(_) => TypeTag::Decimal,
            Self::Char(_) => TypeTag::Char,
            Self::Str(_) => TypeTag::Str,
            Self::Bytes(_) => TypeTag::Bytes,
            Self::Uuid(_) => TypeTag::Uuid,
            Self::Time(_) => TypeTag::Time,
            Self::Span(_) => TypeTag::Span,
            Self::Enum { .. } => TypeTag::Enum,
            Self::Seq { .. } => TypeTag::Seq,
            Self::Map { .. } => TypeTag::Map,
            Self::Null(_) | Self::Custom(_) => return None,
        })
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Null(_) => "null",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::U8(_) => "u8",
            Self::I16(_) => "i16",
            Self::U16(_) => "u16",
            Self::I32(_) => "i32",
            Self::U32(_) => "u32",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Decimal(_) => "decimal",
            Self::Char(_) => "char",
            Self::Str(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::Uuid(_) => "uuid",
            Self::Time(_) => "time",
            Self::Span(_) => "span",
            Self::Enum { .. } => "enum",
            Self::Seq { .. } => "seq",
            Self::Map { .. } => "map",
            Self::Custom(_) => "custom",
        }
    }
}

/// Structural equality; custom payloads are opaque and never compare
/// equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null(a), Self::Null(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Span(a), Self::Span(b)) => a == b,
            (
                Self::Enum { type_key, variant },
                Self::Enum {
                    type_key: other_key,
                    variant: other_variant,
                },
            ) => type_key == other_key && variant == other_variant,
            (
                Self::Seq { elem, items },
                Self::Seq {
                    elem: other_elem,
                    items: other_items,
                },
            ) => elem == other_elem && items == other_items,
            (
                Self::Map {
                    key,
                    value,
                    entries,
                },
                Self::Map {
                    key: other_key,
                    value: other_value,
                    entries: other_entries,
                },
            ) => key == other_key && value == other_value && entries == other_entries,
            _ => false,
        }
    }
}

/// Conversion into the object path. `tag()` is the element tag used by
/// the homogeneous sequence/map envelopes; types whose values may be
/// absent report [`TypeTag::Dynamic`] so every element stays fully
/// tagged.
pub trait IntoValue {
    fn tag() -> TypeTag;

    fn into_value(self) -> Value;
}

/// Strict-kind extraction out of the object path; a kind mismatch is an
/// invalid-cast error.
pub trait FromValue: Sized {
    fn from_value(v: Value) -> Result<Self, Error>;
}

macro_rules! impl_value_scalar {
    ($ty:ty, $variant:ident) => {
        impl IntoValue for $ty {
            fn tag() -> TypeTag {
                TypeTag::$variant
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl FromValue for $ty {
            fn from_value(v: Value) -> Result<Self, Error> {
                match v {
                    Value::$variant(x) => Ok(x),
                    other => Err(Error::cast::<$ty>(&other)),
                }
            }
        }
    };
}

impl_value_scalar!(bool, Bool);
impl_value_scalar!(i8, I8);
impl_value_scalar!(u8, U8);
impl_value_scalar!(i16, I16);
impl_value_scalar!(u16, U16);
impl_value_scalar!(i32, I32);
impl_value_scalar!(u32, U32);
impl_value_scalar!(i64, I64);
impl_value_scalar!(u64, U64);
impl_value_scalar!(f32, F32);
impl_value_scalar!(f64, F64);
impl_value_scalar!(Decimal, Decimal);
impl_value_scalar!(char, Char);
impl_value_scalar!(Bytes, Bytes);
impl_value_scalar!(Uuid, Uuid);
impl_value_scalar!(TimeDelta, Span);

impl IntoValue for String {
    fn tag() -> TypeTag {
        TypeTag::Str
    }

    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl FromValue for String {
    fn from_value(v: Value) -> Result<Self, Error> {
        match v {
            Value::Str(x) => Ok(x),
            other => Err(Error::cast::<String>(&other)),
        }
    }
}

impl IntoValue for &str {
    fn tag() -> TypeTag {
        TypeTag::Str
    }

    fn into_value(self) -> Value {
        Value::Str(self.to_owned())
    }
}

impl IntoValue for DateTime<Utc> {
    fn tag() -> TypeTag {
        TypeTag::Time
    }

    fn into_value(self) -> Value {
        Value::Time(self)
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(v: Value) -> Result<Self, Error> {
        match v {
            Value::Time(x) => Ok(x),
            other => Err(Error::cast::<DateTime<Utc>>(&other)),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn tag() -> TypeTag {
        // absent elements cannot be expressed payload-only
        TypeTag::Dynamic
    }

    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null(T::tag()),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(v: Value) -> Result<Self, Error> {
        if v.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::from_value(v)?))
        }
    }
}

impl IntoValue for Value {
    fn tag() -> TypeTag {
        TypeTag::Dynamic
    }

    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(v: Value) -> Result<Self, Error> {
        Ok(v)
    }
}
