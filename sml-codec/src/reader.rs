//! TLV decoder over a borrowed byte slice

use crate::octet_string::OctetString;
use crate::types::*;
use crate::value::{Status, Value};
use sml_core::{SmlError, SmlResult};

/// Decoded type-length header of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeLength {
    pub sml_type: SmlType,
    /// Payload bytes for scalars, element count for lists
    pub length: usize,
    /// Number of TL bytes the header occupies
    pub tl_bytes: usize,
}

/// Reader context for decoding one message file
///
/// The first failure is recorded and every later call returns it again
/// without touching the buffer, so a failed decode cannot continue on
/// misaligned input.
#[derive(Debug)]
pub struct SmlReader<'a> {
    buffer: &'a [u8],
    position: usize,
    error: Option<SmlError>,
}

impl<'a> SmlReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
            error: None,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// The recorded failure, if any
    pub fn error(&self) -> Option<&SmlError> {
        self.error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Bytes consumed between `start` and the current position
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        let buffer = self.buffer;
        &buffer[start.min(self.position)..self.position]
    }

    /// Record `err` as the reader failure and hand it back for returning
    pub fn fail(&mut self, err: SmlError) -> SmlError {
        if self.error.is_none() {
            self.error = Some(err.clone());
        }
        err
    }

    fn check(&self) -> SmlResult<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn track<T>(&mut self, result: SmlResult<T>) -> SmlResult<T> {
        result.map_err(|err| self.fail(err))
    }

    /// Current byte without advancing
    pub fn peek_byte(&mut self) -> SmlResult<u8> {
        self.check()?;
        let result = self.current_byte();
        self.track(result)
    }

    /// Type of the next field without advancing
    pub fn peek_type(&mut self) -> SmlResult<SmlType> {
        self.check()?;
        let result = self.current_byte().and_then(SmlType::from_tl);
        self.track(result)
    }

    /// Type-length header of the next field without advancing
    pub fn peek_type_length(&mut self) -> SmlResult<TypeLength> {
        self.check()?;
        let result = self.parse_type_length();
        self.track(result)
    }

    /// Read the type-length header of the next field
    pub fn read_type_length(&mut self) -> SmlResult<TypeLength> {
        self.check()?;
        let result = self.parse_type_length().map(|tl| {
            self.position += tl.tl_bytes;
            tl
        });
        self.track(result)
    }

    /// Read a type-length header of type `expected`, returning its length
    pub fn read_length(&mut self, expected: SmlType) -> SmlResult<usize> {
        self.check()?;
        let result = self.expect_type(expected);
        self.track(result)
    }

    /// Consume a skipped optional field marker if one is next
    pub fn skip_if_optional(&mut self) -> SmlResult<bool> {
        self.check()?;
        let result = self.current_byte().map(|byte| {
            if byte == OPTIONAL_SKIPPED {
                self.position += 1;
                true
            } else {
                false
            }
        });
        self.track(result)
    }

    /// Read `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> SmlResult<&'a [u8]> {
        self.check()?;
        let result = self.take(len);
        self.track(result)
    }

    pub fn read_octet_string(&mut self) -> SmlResult<OctetString> {
        self.check()?;
        let result = self.octet_string();
        self.track(result)
    }

    /// Read a boolean; any non-zero payload byte is true
    pub fn read_boolean(&mut self) -> SmlResult<bool> {
        self.check()?;
        let result = self.boolean();
        self.track(result)
    }

    /// Read an integer of type `N`, sign-extending shorter signed payloads
    pub fn read_number<N: SmlNumber>(&mut self) -> SmlResult<N> {
        self.check()?;
        let result = self.number::<N>();
        self.track(result)
    }

    pub fn read_u8(&mut self) -> SmlResult<u8> {
        self.read_number()
    }

    pub fn read_u16(&mut self) -> SmlResult<u16> {
        self.read_number()
    }

    pub fn read_u32(&mut self) -> SmlResult<u32> {
        self.read_number()
    }

    pub fn read_u64(&mut self) -> SmlResult<u64> {
        self.read_number()
    }

    pub fn read_i8(&mut self) -> SmlResult<i8> {
        self.read_number()
    }

    pub fn read_i16(&mut self) -> SmlResult<i16> {
        self.read_number()
    }

    pub fn read_i32(&mut self) -> SmlResult<i32> {
        self.read_number()
    }

    pub fn read_i64(&mut self) -> SmlResult<i64> {
        self.read_number()
    }

    pub fn read_value(&mut self) -> SmlResult<Value> {
        self.check()?;
        let result = self.value();
        self.track(result)
    }

    pub fn read_status(&mut self) -> SmlResult<Status> {
        self.check()?;
        let result = self.status();
        self.track(result)
    }

    /// Read a list header and return its element count
    pub fn read_list_len(&mut self) -> SmlResult<usize> {
        self.read_length(SmlType::List)
    }

    /// Read a list header that must announce exactly `expected` elements
    pub fn read_list_header(&mut self, expected: usize) -> SmlResult<()> {
        self.check()?;
        let result = self.expect_type(SmlType::List).and_then(|found| {
            if found == expected {
                Ok(())
            } else {
                Err(SmlError::LengthMismatch { expected, found })
            }
        });
        self.track(result)
    }

    /// Skip one complete element, nested lists included
    pub fn skip_element(&mut self) -> SmlResult<()> {
        self.check()?;
        let result = self.skip();
        self.track(result)
    }

    fn current_byte(&self) -> SmlResult<u8> {
        self.buffer
            .get(self.position)
            .copied()
            .ok_or(SmlError::BufferExhausted {
                needed: 1,
                available: 0,
            })
    }

    fn take(&mut self, len: usize) -> SmlResult<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(SmlError::BufferExhausted {
                needed: len,
                available,
            });
        }
        let buffer = self.buffer;
        let bytes = &buffer[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn parse_type_length(&self) -> SmlResult<TypeLength> {
        let rest = &self.buffer[self.position..];
        let first = *rest.first().ok_or(SmlError::BufferExhausted {
            needed: 1,
            available: 0,
        })?;
        let sml_type = SmlType::from_tl(first)?;

        let mut length = 0usize;
        let mut tl_bytes = 0usize;
        loop {
            let byte = *rest.get(tl_bytes).ok_or(SmlError::BufferExhausted {
                needed: tl_bytes + 1,
                available: rest.len(),
            })?;
            tl_bytes += 1;
            if tl_bytes > MAX_TL_BYTES {
                return Err(SmlError::LengthMismatch {
                    expected: MAX_TL_BYTES,
                    found: tl_bytes,
                });
            }
            length = (length << 4) | (byte & LENGTH_FIELD) as usize;
            if byte & ANOTHER_TL == 0 {
                break;
            }
        }

        // Scalar lengths count the TL bytes themselves
        if sml_type != SmlType::List {
            length = length
                .checked_sub(tl_bytes)
                .ok_or(SmlError::LengthMismatch {
                    expected: tl_bytes,
                    found: length,
                })?;
        }

        Ok(TypeLength {
            sml_type,
            length,
            tl_bytes,
        })
    }

    fn expect_type(&mut self, expected: SmlType) -> SmlResult<usize> {
        let first = self.current_byte()?;
        let tl = self.parse_type_length()?;
        if tl.sml_type != expected {
            return Err(SmlError::TypeMismatch {
                expected: expected.name(),
                found: first,
            });
        }
        self.position += tl.tl_bytes;
        Ok(tl.length)
    }

    fn octet_string(&mut self) -> SmlResult<OctetString> {
        let len = self.expect_type(SmlType::OctetString)?;
        Ok(OctetString::from(self.take(len)?))
    }

    fn boolean(&mut self) -> SmlResult<bool> {
        let len = self.expect_type(SmlType::Boolean)?;
        if len != 1 {
            return Err(SmlError::LengthMismatch {
                expected: 1,
                found: len,
            });
        }
        Ok(self.take(1)?[0] != 0x00)
    }

    fn number<N: SmlNumber>(&mut self) -> SmlResult<N> {
        let len = self.expect_type(N::sml_type())?;
        if len > N::WIDTH {
            return Err(SmlError::LengthMismatch {
                expected: N::WIDTH,
                found: len,
            });
        }

        let bytes = self.take(len)?;
        let mut raw = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
        if N::SIGNED && (1..8).contains(&len) && bytes[0] & 0x80 != 0 {
            raw |= u64::MAX << (8 * len);
        }
        Ok(N::from_raw(raw))
    }

    fn value(&mut self) -> SmlResult<Value> {
        let first = self.current_byte()?;
        let tl = self.parse_type_length()?;
        let value = match tl.sml_type {
            SmlType::OctetString => Value::Bytes(self.octet_string()?),
            SmlType::Boolean => Value::Bool(self.boolean()?),
            SmlType::Integer => match width_for_len(tl.length)? {
                1 => Value::I8(self.number()?),
                2 => Value::I16(self.number()?),
                4 => Value::I32(self.number()?),
                _ => Value::I64(self.number()?),
            },
            SmlType::Unsigned => match width_for_len(tl.length)? {
                1 => Value::U8(self.number()?),
                2 => Value::U16(self.number()?),
                4 => Value::U32(self.number()?),
                _ => Value::U64(self.number()?),
            },
            SmlType::List => {
                return Err(SmlError::TypeMismatch {
                    expected: "value",
                    found: first,
                });
            }
        };
        Ok(value)
    }

    fn status(&mut self) -> SmlResult<Status> {
        let first = self.current_byte()?;
        let tl = self.parse_type_length()?;
        if tl.sml_type != SmlType::Unsigned {
            return Err(SmlError::TypeMismatch {
                expected: "status",
                found: first,
            });
        }
        let status = match width_for_len(tl.length)? {
            1 => Status::U8(self.number()?),
            2 => Status::U16(self.number()?),
            4 => Status::U32(self.number()?),
            _ => Status::U64(self.number()?),
        };
        Ok(status)
    }

    fn skip(&mut self) -> SmlResult<()> {
        let mut pending = 1usize;
        while pending > 0 {
            pending -= 1;
            if self.current_byte()? == OPTIONAL_SKIPPED {
                self.position += 1;
                continue;
            }
            let tl = self.parse_type_length()?;
            self.position += tl.tl_bytes;
            if tl.sml_type == SmlType::List {
                pending += tl.length;
            } else {
                self.take(tl.length)?;
            }
        }
        Ok(())
    }
}
