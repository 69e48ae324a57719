use crate::value::Value;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("malformed encoding")]
    MalformedEncoding,
    #[error("non canonical encoding")]
    NonCanonicalEncoding,
    #[error("invalid utf-8 string payload")]
    InvalidUtf8,
    #[error("value overflow")]
    Overflow,
    #[error("too large allocation")]
    TooLargeAlloc,
    #[error("all serialized values must be typed or have a non-null value")]
    UntypedNull,
    #[error("unknown type marker {0:#04x}")]
    UnknownTag(u8),
    #[error("unknown type key `{0}`")]
    UnknownType(String),
    #[error("no registered writer matches value {0}")]
    UnregisteredWriter(String),
    #[error("unknown variant `{1}` of enum `{0}`")]
    UnknownVariant(String, String),
    #[error("cannot decode {found} value as {requested}")]
    InvalidCast { requested: String, found: String },
    #[error("custom error")]
    Custom(&'static str),
}

impl Error {
    pub(crate) fn cast<T>(found: &Value) -> Self {
        Self::InvalidCast {
            requested: std::any::type_name::<T>().to_owned(),
            found: found.kind().to_owned(),
        }
    }
}
