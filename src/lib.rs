mod codec;
mod error;
mod object;
mod prim;
mod registry;
mod tag;
mod value;

pub use self::{
    codec::{Reader, Writer},
    error::Error,
    object::{ObjectReader, ObjectWriter},
    registry::{ReaderRegistry, TypeMatch, ValueRead, ValueWrite, WriterRegistry},
    tag::TypeTag,
    value::{CustomValue, EnumCodec, FromValue, IntoValue, Value},
};
use auto_impl::auto_impl;

#[auto_impl(&, Box, Arc)]
pub trait Encode {
    fn encode(&self, out: &mut Writer);
}

pub trait Decode: Sized {
    fn decode(buf: &mut Reader<'_>) -> Result<Self, Error>;
}
