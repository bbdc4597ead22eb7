//! Message file: the sequence of messages carried by one transport frame

use crate::body::MessageBody;
use crate::get_list::GetListResponse;
use crate::message::Message;
use serde::{Deserialize, Serialize};
use sml_codec::types::MESSAGE_END;
use sml_codec::{SmlDecode, SmlEncode, SmlReader, SmlWriter};
use sml_core::SmlResult;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct File {
    pub messages: Vec<Message>,
}

impl File {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// All `SML_GetList.Res` bodies in file order
    pub fn get_list_responses(&self) -> impl Iterator<Item = &GetListResponse> {
        self.messages
            .iter()
            .filter_map(|message| message.message_body.as_get_list_response())
    }

    /// Decode a complete, unframed message file
    pub fn parse(bytes: &[u8]) -> SmlResult<Self> {
        let mut reader = SmlReader::new(bytes);
        Self::decode(&mut reader)
    }

    pub fn to_bytes(&self) -> SmlResult<bytes::Bytes> {
        let mut writer = SmlWriter::new();
        self.encode(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

impl SmlDecode for File {
    /// Reads messages until the input is exhausted
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        let mut messages = Vec::new();
        while !reader.is_at_end() {
            if reader.peek_byte()? == MESSAGE_END {
                reader.read_bytes(1)?;
                continue;
            }
            let message = Message::decode(reader)?;
            if let MessageBody::Unknown { tag, .. } = &message.message_body {
                log::debug!("file continues after unknown message 0x{:04X}", tag);
            }
            messages.push(message);
        }
        Ok(Self { messages })
    }
}

impl SmlEncode for File {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        for message in &self.messages {
            message.encode(writer)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a File {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::close::CloseResponse;
    use crate::open::OpenResponse;
    use sml_codec::{List, ListEntry, OctetString, Value};
    use sml_core::SmlError;

    fn sample_file() -> File {
        let open = OpenResponse {
            req_file_id: Some(OctetString::from("file")),
            server_id: Some(OctetString::from_hex("0A01445A4700").unwrap()),
            ..Default::default()
        };
        let list = GetListResponse {
            server_id: Some(OctetString::from_hex("0A01445A4700").unwrap()),
            val_list: Some(List::new(vec![ListEntry {
                obj_name: Some(OctetString::from_hex("0100100700FF").unwrap()),
                unit: Some(27),
                scaler: Some(0),
                value: Some(Value::I32(312)),
                ..Default::default()
            }])),
            ..Default::default()
        };
        File::new(vec![
            Message::new(MessageBody::OpenResponse(open)).with_group_id(1),
            Message::new(MessageBody::GetListResponse(list)).with_group_id(1),
            Message::new(MessageBody::CloseResponse(CloseResponse::default())).with_group_id(1),
        ])
    }

    #[test]
    fn test_file_roundtrip() {
        let file = sample_file();
        let bytes = file.to_bytes().unwrap();
        let decoded = File::parse(&bytes).unwrap();
        assert_eq!(decoded.len(), 3);
        for (left, right) in decoded.iter().zip(file.iter()) {
            assert_eq!(left.message_body, right.message_body);
            assert_eq!(left.transaction_id, right.transaction_id);
            assert!(left.crc.is_some());
        }
        assert_eq!(decoded.get_list_responses().count(), 1);
    }

    #[test]
    fn test_trailing_padding_is_skipped() {
        let mut bytes = sample_file().to_bytes().unwrap().to_vec();
        bytes.extend_from_slice(&[0x00, 0x00]);
        assert_eq!(File::parse(&bytes).unwrap().len(), 3);
    }

    #[test]
    fn test_error_aborts_file() {
        let mut bytes = sample_file().to_bytes().unwrap().to_vec();
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(
            File::parse(&bytes),
            Err(SmlError::BufferExhausted { .. })
        ));
    }

    #[test]
    fn test_empty_file() {
        assert!(File::parse(&[]).unwrap().is_empty());
    }
}
