use crate::error::Error;
use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Byte sink with one typed write operation per primitive.
///
/// The buffer is owned by the writer for the session and handed back
/// by [`Writer::into_bytes`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Writer {
    pub buf: Vec<u8>,
}

/// Byte source over a borrowed input slice. The cursor advances
/// monotonically; every read must mirror the write that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl Writer {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(200),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_raw(&mut self, v: &[u8]) {
        self.buf.extend_from_slice(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.push(v as u8);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_decimal(&mut self, v: Decimal) {
        self.write_raw(&v.serialize());
    }

    pub fn write_char(&mut self, v: char) {
        self.write_u32(v as u32);
    }

    pub fn write_uvarint(&mut self, mut v: u64) {
        loop {
            let mut chunk = v & 0b0111_1111;
            v >>= 7;
            if v == 0 {
                // stop flag
                chunk |= 0b1000_0000;
            }
            self.buf.push(chunk as u8);
            if v == 0 {
                break;
            }
        }
    }

    pub fn write_bytes(&mut self, v: &[u8]) {
        self.write_uvarint(u64::try_from(v.len()).unwrap());
        self.write_raw(v);
    }

    pub fn write_str(&mut self, v: &str) {
        self.write_bytes(v.as_bytes());
    }

    /// Optional string: has-value flag, then the string iff present. The
    /// only encoding that can carry an absent string; must be read back
    /// with [`Reader::read_opt_str`].
    pub fn write_opt_str(&mut self, v: Option<&str>) {
        match v {
            Some(s) => {
                self.write_bool(true);
                self.write_str(s);
            }
            None => self.write_bool(false),
        }
    }

    pub fn write_uuid(&mut self, v: Uuid) {
        self.write_raw(v.as_bytes());
    }

    pub fn write_time(&mut self, v: DateTime<Utc>) {
        self.write_i64(v.timestamp_micros());
    }

    pub fn write_span(&mut self, v: TimeDelta) -> Result<(), Error> {
        self.write_i64(v.num_microseconds().ok_or(Error::Overflow)?);
        Ok(())
    }
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Read n bytes.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self.offset.checked_add(n).ok_or(Error::MalformedEncoding)?;
        let res = self.buf.get(self.offset..end).ok_or(Error::MalformedEncoding)?;
        self.offset = end;

        Ok(res)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut v = [0; N];
        v.copy_from_slice(self.read(N)?);
        Ok(v)
    }

    // Position of internal cursor.
    pub fn position(&self) -> usize {
        self.offset
    }

    // Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::MalformedEncoding),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let res = self
            .buf
            .get(self.offset)
            .copied()
            .ok_or(Error::MalformedEncoding)?;
        self.offset += 1;

        Ok(res)
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, Error> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, Error> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, Error> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    pub fn read_decimal(&mut self) -> Result<Decimal, Error> {
        Ok(Decimal::deserialize(self.read_array()?))
    }

    pub fn read_char(&mut self) -> Result<char, Error> {
        char::from_u32(self.read_u32()?).ok_or(Error::MalformedEncoding)
    }

    pub fn read_uvarint(&mut self) -> Result<u64, Error> {
        let mut v = 0_u64;
        let mut stop = false;
        let mut i = 0;
        while !stop {
            let chunk = u64::from(self.read_u8()?);
            stop = (chunk & 0b1000_0000) != 0;
            let word = chunk & 0b0111_1111;
            v |= word
                .checked_shl(i * 7)
                .ok_or(Error::NonCanonicalEncoding)?;
            // last byte cannot be zero
            if i > 0 && stop && word == 0 {
                return Err(Error::NonCanonicalEncoding);
            }

            i += 1;
        }

        Ok(v)
    }

    pub fn read_bytes(&mut self) -> Result<Bytes, Error> {
        let len = usize::try_from(self.read_uvarint()?).map_err(|_| Error::Overflow)?;
        Ok(Bytes::copy_from_slice(self.read(len)?))
    }

    pub fn read_str(&mut self) -> Result<String, Error> {
        let len = usize::try_from(self.read_uvarint()?).map_err(|_| Error::Overflow)?;
        String::from_utf8(self.read(len)?.to_vec()).map_err(|_| Error::InvalidUtf8)
    }

    pub fn read_opt_str(&mut self) -> Result<Option<String>, Error> {
        if self.read_bool()? {
            Ok(Some(self.read_str()?))
        } else {
            Ok(None)
        }
    }

    pub fn read_uuid(&mut self) -> Result<Uuid, Error> {
        Ok(Uuid::from_bytes(self.read_array()?))
    }

    pub fn read_time(&mut self) -> Result<DateTime<Utc>, Error> {
        DateTime::from_timestamp_micros(self.read_i64()?).ok_or(Error::Overflow)
    }

    pub fn read_span(&mut self) -> Result<TimeDelta, Error> {
        Ok(TimeDelta::microseconds(self.read_i64()?))
    }
}
