//! SML message envelope

use crate::body::MessageBody;
use serde::{Deserialize, Serialize};
use sml_codec::{OctetString, SmlDecode, SmlEncode, SmlReader, SmlWriter};
use sml_codec::types::MESSAGE_END;
use sml_core::{crc16, SmlError, SmlResult};

/// Number of elements in the message list
pub const MESSAGE_FIELD_COUNT: usize = 6;

/// One message of a message file
///
/// `crc` holds the checksum as received. Encoding ignores it and always
/// writes the checksum of the freshly encoded bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub transaction_id: Option<OctetString>,
    pub group_id: Option<u8>,
    pub abort_on_error: Option<u8>,
    pub message_body: MessageBody,
    pub crc: Option<u16>,
}

impl Message {
    /// New message with a random transaction id
    pub fn new(body: MessageBody) -> Self {
        Self {
            transaction_id: Some(OctetString::generate_uuid()),
            group_id: Some(0),
            abort_on_error: Some(0),
            message_body: body,
            crc: None,
        }
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<OctetString>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn with_group_id(mut self, group_id: u8) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_abort_on_error(mut self, abort_on_error: u8) -> Self {
        self.abort_on_error = Some(abort_on_error);
        self
    }

    pub fn tag(&self) -> u32 {
        self.message_body.tag()
    }

    pub fn body(&self) -> &MessageBody {
        &self.message_body
    }
}

impl SmlDecode for Message {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        let start = reader.position();
        reader.read_list_header(MESSAGE_FIELD_COUNT)?;

        let transaction_id = Option::<OctetString>::decode(reader)?;
        let group_id = Option::<u8>::decode(reader)?;
        let abort_on_error = Option::<u8>::decode(reader)?;
        let message_body = MessageBody::decode(reader)?;

        let computed = crc16(reader.consumed_since(start));
        let crc = Option::<u16>::decode(reader)?;
        if let Some(expected) = crc {
            if expected != computed {
                return Err(reader.fail(SmlError::ChecksumMismatch { expected, computed }));
            }
        }

        if !reader.is_at_end() && reader.peek_byte()? == MESSAGE_END {
            reader.read_bytes(1)?;
        }

        Ok(Self {
            transaction_id,
            group_id,
            abort_on_error,
            message_body,
            crc,
        })
    }
}

impl SmlEncode for Message {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        let start = writer.len();
        writer.write_list_header(MESSAGE_FIELD_COUNT)?;
        self.transaction_id.encode(writer)?;
        self.group_id.encode(writer)?;
        self.abort_on_error.encode(writer)?;
        self.message_body.encode(writer)?;

        let crc = crc16(writer.written_since(start));
        writer.write_u16(crc)?;
        writer.write_byte(MESSAGE_END);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::close::CloseResponse;
    use sml_codec::{decode_from_slice, encode_to_bytes};

    const CLOSE_MESSAGE: [u8; 22] = [
        0x76, 0x05, 0x01, 0x02, 0x03, 0x04, 0x62, 0x00, 0x62, 0x00, 0x72, 0x65, 0x00, 0x00,
        0x02, 0x01, 0x71, 0x01, 0x63, 0xBB, 0xB5, 0x00,
    ];

    fn close_message() -> Message {
        Message::new(MessageBody::CloseResponse(CloseResponse::default()))
            .with_transaction_id(vec![0x01, 0x02, 0x03, 0x04])
    }

    #[test]
    fn test_encode_close_message() {
        let bytes = encode_to_bytes(&close_message()).unwrap();
        assert_eq!(&bytes[..], &CLOSE_MESSAGE[..]);
    }

    #[test]
    fn test_decode_close_message() {
        let mut reader = SmlReader::new(&CLOSE_MESSAGE);
        let message = Message::decode(&mut reader).unwrap();
        assert!(reader.is_at_end());
        assert_eq!(message.crc, Some(0xBBB5));
        assert_eq!(message.tag(), 0x0201);
        assert_eq!(message.transaction_id, Some(OctetString::new(vec![1, 2, 3, 4])));
        assert_eq!(message.group_id, Some(0));
    }

    #[test]
    fn test_crc_mismatch() {
        let mut bytes = CLOSE_MESSAGE;
        bytes[20] ^= 0x01;
        let result: SmlResult<Message> = decode_from_slice(&bytes);
        assert!(matches!(
            result,
            Err(SmlError::ChecksumMismatch {
                expected: 0xBBB4,
                computed: 0xBBB5
            })
        ));
    }

    #[test]
    fn test_absent_crc_and_end_marker() {
        let bytes = &[
            0x76, 0x01, 0x01, 0x01, 0x72, 0x65, 0x00, 0x00, 0x02, 0x01, 0x71, 0x01, 0x01,
        ];
        let message: Message = decode_from_slice(bytes).unwrap();
        assert_eq!(message.transaction_id, None);
        assert_eq!(message.crc, None);
        assert!(message.body().as_close_response().is_some());
    }

    #[test]
    fn test_new_generates_transaction_id() {
        let first = Message::new(MessageBody::CloseRequest(Default::default()));
        let second = Message::new(MessageBody::CloseRequest(Default::default()));
        assert_eq!(first.transaction_id.as_ref().map(|id| id.len()), Some(16));
        assert_ne!(first.transaction_id, second.transaction_id);
    }
}
