//! Decode/encode traits shared by all SML structures

use crate::octet_string::OctetString;
use crate::reader::SmlReader;
use crate::value::{Status, Value};
use crate::writer::SmlWriter;
use sml_core::SmlResult;

/// Types that can be decoded from an SML reader
pub trait SmlDecode: Sized {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self>;
}

/// Types that can be encoded into an SML writer
pub trait SmlEncode {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()>;
}

/// Optional fields: `0x01` on the wire is `None`
impl<T: SmlDecode> SmlDecode for Option<T> {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        if reader.skip_if_optional()? {
            return Ok(None);
        }
        T::decode(reader).map(Some)
    }
}

impl<T: SmlEncode> SmlEncode for Option<T> {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        match self {
            Some(value) => value.encode(writer),
            None => {
                writer.write_optional_skipped();
                Ok(())
            }
        }
    }
}

/// Sequences: a list header followed by exactly that many elements
impl<T: SmlDecode> SmlDecode for Vec<T> {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        let count = reader.read_list_len()?;
        let mut elements = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            elements.push(T::decode(reader)?);
        }
        Ok(elements)
    }
}

impl<T: SmlEncode> SmlEncode for Vec<T> {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        writer.write_list_header(self.len())?;
        for element in self {
            element.encode(writer)?;
        }
        Ok(())
    }
}

macro_rules! impl_number_codec {
    ($($ty:ty),*) => {
        $(
            impl SmlDecode for $ty {
                fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
                    reader.read_number()
                }
            }

            impl SmlEncode for $ty {
                fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
                    writer.write_number(*self)
                }
            }
        )*
    };
}

impl_number_codec!(u8, u16, u32, u64, i8, i16, i32, i64);

impl SmlDecode for bool {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        reader.read_boolean()
    }
}

impl SmlEncode for bool {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        writer.write_boolean(*self)
    }
}

impl SmlDecode for OctetString {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        reader.read_octet_string()
    }
}

impl SmlEncode for OctetString {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        writer.write_octet_string(self)
    }
}

impl SmlDecode for Value {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        reader.read_value()
    }
}

impl SmlEncode for Value {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        writer.write_value(self)
    }
}

impl SmlDecode for Status {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        reader.read_status()
    }
}

impl SmlEncode for Status {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        writer.write_status(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_from_slice, encode_to_bytes};

    #[test]
    fn test_optional_none_is_single_byte() {
        let bytes = encode_to_bytes(&None::<u32>).unwrap();
        assert_eq!(&bytes[..], &[0x01]);

        let mut reader = SmlReader::new(&[0x01, 0x62, 0x07]);
        assert_eq!(Option::<u8>::decode(&mut reader).unwrap(), None);
        assert_eq!(reader.position(), 1);
        assert_eq!(Option::<u8>::decode(&mut reader).unwrap(), Some(7));
    }

    #[test]
    fn test_sequence_roundtrip() {
        let seq = vec![
            OctetString::from("a"),
            OctetString::from_hex("0100010800FF").unwrap(),
        ];
        let bytes = encode_to_bytes(&seq).unwrap();
        assert_eq!(bytes[0], 0x72);
        let decoded: Vec<OctetString> = decode_from_slice(&bytes).unwrap();
        assert_eq!(decoded, seq);
    }

    #[test]
    fn test_sequence_element_error_aborts() {
        // Second element has the wrong type
        let bytes = [0x72, 0x62, 0x01, 0x52, 0x02];
        assert!(decode_from_slice::<Vec<u8>>(&bytes).is_err());
    }

    #[test]
    fn test_number_extremes_roundtrip() {
        for value in [i64::MIN, -1, 0, 1, i64::MAX] {
            let bytes = encode_to_bytes(&value).unwrap();
            assert_eq!(decode_from_slice::<i64>(&bytes).unwrap(), value);
        }
        for value in [0u64, 1, u64::MAX] {
            let bytes = encode_to_bytes(&value).unwrap();
            assert_eq!(decode_from_slice::<u64>(&bytes).unwrap(), value);
        }
    }
}
