//! TLV encoder into a growable buffer

use crate::types::*;
use crate::value::{Status, Value};
use bytes::{BufMut, Bytes, BytesMut};
use sml_core::{SmlError, SmlResult};

/// Writer context for encoding one message file
#[derive(Debug, Default)]
pub struct SmlWriter {
    buffer: BytesMut,
}

impl SmlWriter {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Bytes written since offset `start`
    pub fn written_since(&self, start: usize) -> &[u8] {
        &self.buffer[start.min(self.buffer.len())..]
    }

    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }

    /// Write a type-length header
    ///
    /// Scalar lengths include the TL bytes themselves; list lengths are the
    /// plain element count. The minimum number of TL bytes is used.
    pub fn write_type_and_length(&mut self, sml_type: SmlType, len: usize) -> SmlResult<()> {
        let is_list = sml_type == SmlType::List;
        let mut tl_bytes = 1usize;
        loop {
            let capacity = 1u64 << (4 * tl_bytes);
            let fits = if is_list {
                (len as u64) < capacity
            } else {
                ((len + tl_bytes) as u64) < capacity
            };
            if fits {
                break;
            }
            tl_bytes += 1;
            if tl_bytes > MAX_TL_BYTES {
                return Err(SmlError::LengthMismatch {
                    expected: u32::MAX as usize,
                    found: len,
                });
            }
        }

        let encoded = if is_list { len } else { len + tl_bytes };
        for i in (0..tl_bytes).rev() {
            let mut byte = ((encoded >> (4 * i)) as u8) & LENGTH_FIELD;
            if i == tl_bytes - 1 {
                byte |= sml_type.bits();
            }
            if i > 0 {
                byte |= ANOTHER_TL;
            }
            self.buffer.put_u8(byte);
        }
        Ok(())
    }

    /// Write the marker of a skipped optional field
    pub fn write_optional_skipped(&mut self) {
        self.buffer.put_u8(OPTIONAL_SKIPPED);
    }

    pub fn write_list_header(&mut self, count: usize) -> SmlResult<()> {
        self.write_type_and_length(SmlType::List, count)
    }

    pub fn write_octet_string(&mut self, bytes: &[u8]) -> SmlResult<()> {
        self.write_type_and_length(SmlType::OctetString, bytes.len())?;
        self.buffer.put_slice(bytes);
        Ok(())
    }

    pub fn write_boolean(&mut self, value: bool) -> SmlResult<()> {
        self.write_type_and_length(SmlType::Boolean, 1)?;
        self.buffer.put_u8(if value { 0xFF } else { 0x00 });
        Ok(())
    }

    /// Write an integer with the full width of its type, big-endian
    pub fn write_number<N: SmlNumber>(&mut self, value: N) -> SmlResult<()> {
        self.write_type_and_length(N::sml_type(), N::WIDTH)?;
        let raw = value.to_raw().to_be_bytes();
        self.buffer.put_slice(&raw[8 - N::WIDTH..]);
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> SmlResult<()> {
        self.write_number(value)
    }

    pub fn write_u16(&mut self, value: u16) -> SmlResult<()> {
        self.write_number(value)
    }

    pub fn write_u32(&mut self, value: u32) -> SmlResult<()> {
        self.write_number(value)
    }

    pub fn write_u64(&mut self, value: u64) -> SmlResult<()> {
        self.write_number(value)
    }

    pub fn write_i8(&mut self, value: i8) -> SmlResult<()> {
        self.write_number(value)
    }

    pub fn write_i16(&mut self, value: i16) -> SmlResult<()> {
        self.write_number(value)
    }

    pub fn write_i32(&mut self, value: i32) -> SmlResult<()> {
        self.write_number(value)
    }

    pub fn write_i64(&mut self, value: i64) -> SmlResult<()> {
        self.write_number(value)
    }

    pub fn write_value(&mut self, value: &Value) -> SmlResult<()> {
        match value {
            Value::Bool(v) => self.write_boolean(*v),
            Value::Bytes(v) => self.write_octet_string(v),
            Value::I8(v) => self.write_number(*v),
            Value::I16(v) => self.write_number(*v),
            Value::I32(v) => self.write_number(*v),
            Value::I64(v) => self.write_number(*v),
            Value::U8(v) => self.write_number(*v),
            Value::U16(v) => self.write_number(*v),
            Value::U32(v) => self.write_number(*v),
            Value::U64(v) => self.write_number(*v),
        }
    }

    pub fn write_status(&mut self, status: &Status) -> SmlResult<()> {
        match *status {
            Status::U8(v) => self.write_number(v),
            Status::U16(v) => self.write_number(v),
            Status::U32(v) => self.write_number(v),
            Status::U64(v) => self.write_number(v),
        }
    }

    /// Append bytes verbatim
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buffer.put_slice(bytes);
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.buffer.put_u8(byte);
    }
}
