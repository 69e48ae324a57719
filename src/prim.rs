use super::{codec::{Reader, Writer}, error::Error, Decode, Encode};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

macro_rules! impl_fixed_width {
    ($ty:ty, $write:ident, $read:ident) => {
        impl Encode for $ty {
            fn encode(&self, out: &mut Writer) {
                out.$write(*self)
            }
        }

        impl Decode for $ty {
            fn decode(buf: &mut Reader<'_>) -> Result<Self, Error> {
                buf.$read()
            }
        }
    };
}

impl_fixed_width!(bool, write_bool, read_bool);
impl_fixed_width!(u8, write_u8, read_u8);
impl_fixed_width!(i8, write_i8, read_i8);
impl_fixed_width!(u16, write_u16, read_u16);
impl_fixed_width!(i16, write_i16, read_i16);
impl_fixed_width!(u32, write_u32, read_u32);
impl_fixed_width!(i32, write_i32, read_i32);
impl_fixed_width!(u64, write_u64, read_u64);
impl_fixed_width!(i64, write_i64, read_i64);
impl_fixed_width!(f32, write_f32, read_f32);
impl_fixed_width!(f64, write_f64, read_f64);
impl_fixed_width!(Decimal, write_decimal, read_decimal);
impl_fixed_width!(char, write_char, read_char);
impl_fixed_width!(Uuid, write_uuid, read_uuid);
impl_fixed_width!(DateTime<Utc>, write_time, read_time);

impl Encode for &[u8] {
    fn encode(&self, out: &mut Writer) {
        out.write_bytes(self)
    }
}

impl Encode for Bytes {
    fn encode(&self, out: &mut Writer) {
        out.write_bytes(self)
    }
}

impl Decode for Bytes {
    fn decode(buf: &mut Reader<'_>) -> Result<Self, Error> {
        buf.read_bytes()
    }
}

impl Encode for &str {
    fn encode(&self, out: &mut Writer) {
        out.write_str(self)
    }
}

impl Encode for String {
    fn encode(&self, out: &mut Writer) {
        out.write_str(self)
    }
}

impl Decode for String {
    fn decode(buf: &mut Reader<'_>) -> Result<Self, Error> {
        buf.read_str()
    }
}

impl<T> Encode for Option<T>
where
    T: Encode,
{
    fn encode(&self, out: &mut Writer) {
        if let Some(v) = self {
            out.write_bool(true);
            v.encode(out);
        } else {
            out.write_bool(false);
        }
    }
}

impl<T> Decode for Option<T>
where
    T: Decode,
{
    fn decode(buf: &mut Reader<'_>) -> Result<Self, Error> {
        let is_some = bool::decode(buf)?;

        Ok(if is_some {
            Some(T::decode(buf)?)
        } else {
            None
        })
    }
}

impl<T> Encode for Vec<T>
where
    T: Encode,
{
    fn encode(&self, out: &mut Writer) {
        out.write_i32(i32::try_from(self.len()).unwrap());
        for item in self {
            item.encode(out)
        }
    }
}

impl<T> Decode for Vec<T>
where
    T: Decode,
{
    fn decode(buf: &mut Reader<'_>) -> Result<Self, Error> {
        let len = usize::try_from(buf.read_i32()?).map_err(|_| Error::MalformedEncoding)?;
        if len > buf.remaining() {
            return Err(Error::TooLargeAlloc);
        }

        let mut v = Vec::with_capacity(len);
        for _ in 0..len {
            v.push(T::decode(buf)?);
        }

        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_roundtrip() {
        let mut w = Writer::new();
        true.encode(&mut w);
        0x7f_i8.encode(&mut w);
        0xBEEF_u16.encode(&mut w);
        (-42_i32).encode(&mut w);
        u64::MAX.encode(&mut w);
        1.25_f32.encode(&mut w);
        (-0.5_f64).encode(&mut w);
        'x'.encode(&mut w);
        "répertoire".encode(&mut w);
        Bytes::from_static(b"\x00\x01").encode(&mut w);

        let mut r = Reader::new(&w.buf);
        assert_eq!(bool::decode(&mut r), Ok(true));
        assert_eq!(i8::decode(&mut r), Ok(0x7f));
        assert_eq!(u16::decode(&mut r), Ok(0xBEEF));
        assert_eq!(i32::decode(&mut r), Ok(-42));
        assert_eq!(u64::decode(&mut r), Ok(u64::MAX));
        assert_eq!(f32::decode(&mut r), Ok(1.25));
        assert_eq!(f64::decode(&mut r), Ok(-0.5));
        assert_eq!(char::decode(&mut r), Ok('x'));
        assert_eq!(String::decode(&mut r).unwrap(), "répertoire");
        assert_eq!(Bytes::decode(&mut r).unwrap(), Bytes::from_static(b"\x00\x01"));
        assert!(r.is_empty());
    }

    #[test]
    fn option_roundtrip() {
        let mut w = Writer::new();
        Some(7_u32).encode(&mut w);
        None::<u32>.encode(&mut w);

        let mut r = Reader::new(&w.buf);
        assert_eq!(Option::<u32>::decode(&mut r), Ok(Some(7)));
        assert_eq!(Option::<u32>::decode(&mut r), Ok(None));
        assert!(r.is_empty());
    }

    #[test]
    fn vec_roundtrip() {
        let exp = vec![3_u16, 1, 4, 1, 5];

        let mut w = Writer::new();
        exp.encode(&mut w);

        let mut r = Reader::new(&w.buf);
        assert_eq!(Vec::<u16>::decode(&mut r), Ok(exp));
        assert!(r.is_empty());
    }

    #[test]
    fn vec_length_guard() {
        // claims i32::MAX elements on a 4-byte input
        let mut r = Reader::new(&[0xFF, 0xFF, 0xFF, 0x7F]);
        assert_eq!(Vec::<u8>::decode(&mut r), Err(Error::TooLargeAlloc));
    }
}
