//! SML time values

use crate::reader::SmlReader;
use crate::traits::{SmlDecode, SmlEncode};
use crate::types::SmlType;
use crate::writer::SmlWriter;
use serde::{Deserialize, Serialize};
use sml_core::{SmlError, SmlResult};

pub const TIME_TAG_SEC_INDEX: u8 = 0x01;
pub const TIME_TAG_TIMESTAMP: u8 = 0x02;
pub const TIME_TAG_LOCAL_TIMESTAMP: u8 = 0x03;

/// TL byte of a bare u32, as sent by Holley DTZ541 meters in place of a
/// tagged seconds index
const DTZ541_SEC_INDEX_TL: u8 = 0x65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Time {
    /// Seconds since an unspecified epoch (meter uptime counter)
    SecIndex(u32),
    /// Seconds since the Unix epoch
    Timestamp(u32),
    /// Local timestamp with offsets; the values are not retained
    LocalTimestamp,
}

impl Time {
    pub fn tag(&self) -> u8 {
        match self {
            Time::SecIndex(_) => TIME_TAG_SEC_INDEX,
            Time::Timestamp(_) => TIME_TAG_TIMESTAMP,
            Time::LocalTimestamp => TIME_TAG_LOCAL_TIMESTAMP,
        }
    }

    pub fn value(&self) -> Option<u32> {
        match *self {
            Time::SecIndex(v) | Time::Timestamp(v) => Some(v),
            Time::LocalTimestamp => None,
        }
    }
}

/// Read and drop the (timestamp, local offset, season offset) triple whose
/// list header has already been consumed
fn discard_local_timestamp(reader: &mut SmlReader<'_>) -> SmlResult<()> {
    let timestamp = Option::<u32>::decode(reader)?;
    let local_offset = Option::<i16>::decode(reader)?;
    let season_offset = Option::<i16>::decode(reader)?;
    log::warn!(
        "time as list[3]: ignoring timestamp={:?} local_offset={:?} season_offset={:?}",
        timestamp,
        local_offset,
        season_offset
    );
    Ok(())
}

impl SmlDecode for Time {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        if reader.peek_byte()? == DTZ541_SEC_INDEX_TL {
            return reader.read_u32().map(Time::SecIndex);
        }

        match reader.read_list_len()? {
            2 => {}
            3 => {
                discard_local_timestamp(reader)?;
                return Ok(Time::LocalTimestamp);
            }
            found => {
                return Err(reader.fail(SmlError::LengthMismatch { expected: 2, found }));
            }
        }

        let tag = reader.read_u8()?;
        if tag == TIME_TAG_LOCAL_TIMESTAMP && reader.skip_if_optional()? {
            return Ok(Time::LocalTimestamp);
        }
        if reader.peek_type()? == SmlType::List {
            reader.read_list_header(3)?;
            discard_local_timestamp(reader)?;
            return Ok(Time::LocalTimestamp);
        }

        let value = reader.read_u32()?;
        match tag {
            TIME_TAG_SEC_INDEX => Ok(Time::SecIndex(value)),
            TIME_TAG_TIMESTAMP => Ok(Time::Timestamp(value)),
            // Any other tag with a plain u32 fails the whole file
            _ => Err(reader.fail(SmlError::InvalidData(format!(
                "Unknown time tag: {}",
                tag
            )))),
        }
    }
}

impl SmlEncode for Time {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        writer.write_list_header(2)?;
        writer.write_u8(self.tag())?;
        match self.value() {
            Some(value) => writer.write_number(value),
            None => {
                writer.write_optional_skipped();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_from_slice, encode_to_bytes};

    #[test]
    fn test_tagged_times() {
        let bytes = [0x72, 0x62, 0x01, 0x65, 0x00, 0x00, 0x10, 0x00];
        assert_eq!(
            decode_from_slice::<Time>(&bytes).unwrap(),
            Time::SecIndex(0x1000)
        );

        let bytes = [0x72, 0x62, 0x02, 0x65, 0x5F, 0x5E, 0x10, 0x00];
        assert_eq!(
            decode_from_slice::<Time>(&bytes).unwrap(),
            Time::Timestamp(0x5F5E1000)
        );
    }

    #[test]
    fn test_dtz541_untagged_sec_index() {
        let bytes = [0x65, 0x00, 0x1A, 0x2B, 0x3C];
        let mut reader = SmlReader::new(&bytes);
        assert_eq!(
            Option::<Time>::decode(&mut reader).unwrap(),
            Some(Time::SecIndex(0x001A2B3C))
        );
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_three_element_timestamp_is_discarded() {
        let bytes = [
            0x72, 0x62, 0x02, 0x73, 0x65, 0x5F, 0x5E, 0x10, 0x00, 0x53, 0x00, 0x3C, 0x53, 0x00,
            0x00, 0x62, 0x09,
        ];
        let mut reader = SmlReader::new(&bytes);
        assert_eq!(Time::decode(&mut reader).unwrap(), Time::LocalTimestamp);
        assert_eq!(reader.read_u8().unwrap(), 9);
    }

    #[test]
    fn test_bare_three_element_list() {
        let bytes = [0x73, 0x65, 0x5F, 0x5E, 0x10, 0x00, 0x53, 0x00, 0x3C, 0x01];
        assert_eq!(
            decode_from_slice::<Time>(&bytes).unwrap(),
            Time::LocalTimestamp
        );
    }

    #[test]
    fn test_unknown_tag_fails() {
        let bytes = [0x72, 0x62, 0x07, 0x65, 0x00, 0x00, 0x00, 0x01];
        assert!(matches!(
            decode_from_slice::<Time>(&bytes),
            Err(SmlError::InvalidData(_))
        ));
    }

    #[test]
    fn test_encode_time() {
        let bytes = encode_to_bytes(&Time::SecIndex(0x01020304)).unwrap();
        assert_eq!(&bytes[..], &[0x72, 0x62, 0x01, 0x65, 0x01, 0x02, 0x03, 0x04]);

        let bytes = encode_to_bytes(&Time::LocalTimestamp).unwrap();
        assert_eq!(&bytes[..], &[0x72, 0x62, 0x03, 0x01]);
        assert_eq!(
            decode_from_slice::<Time>(&bytes).unwrap(),
            Time::LocalTimestamp
        );
    }
}
