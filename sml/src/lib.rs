//! sml_rs - Rust implementation of the Smart Message Language
//!
//! Decodes the SML 1.04 binary protocol spoken by electricity, gas and
//! heat meters into owned message trees, and encodes such trees back into
//! bit-exact frames.
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `sml-core`: Error handling, CRC16 and OBIS codes
//! - `sml-codec`: TLV primitives, lists, trees and time values
//! - `sml-message`: Message bodies, messages and message files
//! - `sml-transport`: Escape-sequence framing and frame readers
//!
//! Known encoder bugs of deployed meters (DZG DVS74 signed power values,
//! Holley DTZ541 untagged times, three-element time lists) are tolerated.
//!
//! # Usage
//!
//! ```no_run
//! use std::fs::File;
//!
//! let port = File::open("/dev/ttyUSB0").unwrap();
//! let mut reader = sml::SmlTransportReader::new(port);
//! while let Some(file) = sml::read_file(&mut reader).unwrap() {
//!     for response in file.get_list_responses() {
//!         for entry in response.entries() {
//!             println!("{:?} = {:?}", entry.obis(), entry.scaled_value());
//!         }
//!     }
//! }
//! ```

use std::io::Read;

// Re-export core types
pub use sml_core::{crc16, crc16_kermit, ObisCode, SmlError, SmlResult};

// Re-export codec types
pub use sml_codec::{
    List, ListEntry, OctetString, PeriodEntry, ProcParValue, SmlDecode, SmlEncode, SmlReader,
    SmlWriter, Status, Time, Tree, TreePath, TupelEntry, Value,
};

// Re-export message types
pub use sml_message::{File, Message, MessageBody, MessageTag};

// Re-export transport types
pub use sml_transport::{SmlTransportReader, TransportSettings, write_frame};

#[cfg(feature = "tokio")]
pub use sml_transport::AsyncSmlTransportReader;

/// Message bodies
pub mod messages {
    pub use sml_message::attention::*;
    pub use sml_message::close::*;
    pub use sml_message::get_list::*;
    pub use sml_message::open::*;
    pub use sml_message::proc_parameter::*;
    pub use sml_message::profile::*;
}

/// Verify and decode one complete frame, start marker through CRC
pub fn decode_frame(frame: &[u8]) -> SmlResult<File> {
    sml_transport::decode_frame(frame)
}

/// Decode an unframed message file
pub fn decode_file(payload: &[u8]) -> SmlResult<File> {
    File::parse(payload)
}

/// Encode `file` into a padded, checksummed frame
pub fn encode_file(file: &File) -> SmlResult<bytes::Bytes> {
    sml_transport::encode_file(file)
}

/// Read and decode the next frame from a blocking reader
///
/// Returns `Ok(None)` when the source ends between frames.
pub fn read_file<R: Read>(reader: &mut SmlTransportReader<R>) -> SmlResult<Option<File>> {
    reader.read_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{CloseResponse, GetListResponse, OpenRequest, OpenResponse};
    use sml_codec::{decode_from_slice, encode_to_bytes};
    use std::io::Cursor;

    const OPEN_REQUEST: [u8; 25] = [
        0x77, 0x01, 0x07, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x05, 0x66, 0x69, 0x6C, 0x65,
        0x07, 0x0A, 0x01, 0x44, 0x5A, 0x47, 0x00, 0x01, 0x01, 0x62, 0x01,
    ];

    fn open_request() -> OpenRequest {
        OpenRequest {
            codepage: None,
            client_id: Some(OctetString::from_hex("0A0B0C0D0E0F").unwrap()),
            req_file_id: Some(OctetString::from("file")),
            server_id: Some(OctetString::from_hex("0A01445A4700").unwrap()),
            username: None,
            password: None,
            sml_version: Some(1),
        }
    }

    #[test]
    fn test_open_request_literal() {
        let request: OpenRequest = decode_from_slice(&OPEN_REQUEST).unwrap();
        assert_eq!(request, open_request());
        assert_eq!(&encode_to_bytes(&request).unwrap()[..], &OPEN_REQUEST[..]);
    }

    #[test]
    fn test_frame_roundtrip() {
        let file = File::new(vec![
            Message::new(MessageBody::OpenRequest(open_request())),
            Message::new(MessageBody::CloseResponse(CloseResponse::default())),
        ]);
        let frame = encode_file(&file).unwrap();
        assert_eq!((frame.len() - 16) % 4, 0);

        let decoded = decode_frame(&frame).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(
            decoded.messages[0].message_body.as_open_request(),
            Some(&open_request())
        );
        assert_eq!(decoded.messages[1].tag(), 0x0201);

        // Re-encoding reproduces the frame bit for bit
        assert_eq!(encode_file(&decoded).unwrap(), frame);
    }

    #[test]
    fn test_read_file_from_stream() {
        let open = OpenResponse {
            req_file_id: Some(OctetString::from("42")),
            server_id: Some(OctetString::from_hex("0A01454D4800007F4A1B").unwrap()),
            ref_time: Some(Time::SecIndex(1000)),
            ..Default::default()
        };
        let file = File::new(vec![Message::new(MessageBody::OpenResponse(open.clone()))]);

        let mut stream = vec![0xFF, 0x1B, 0x00];
        write_frame(&mut stream, &file).unwrap();
        write_frame(&mut stream, &file).unwrap();

        let mut reader = SmlTransportReader::new(Cursor::new(stream));
        let mut count = 0;
        while let Some(decoded) = read_file(&mut reader).unwrap() {
            assert_eq!(decoded.messages[0].message_body.as_open_response(), Some(&open));
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_decode_file_with_unknown_message() {
        let mut writer = SmlWriter::new();
        let unknown = Message::new(MessageBody::Unknown {
            tag: 0x0000_0800,
            raw: OctetString::from_hex("7262016200").unwrap(),
        });
        unknown.encode(&mut writer).unwrap();
        Message::new(MessageBody::CloseResponse(CloseResponse::default()))
            .encode(&mut writer)
            .unwrap();

        let file = decode_file(writer.as_bytes()).unwrap();
        assert_eq!(file.len(), 2);
        assert!(file.messages[0].message_body.is_unknown());
        assert_eq!(file.messages[1].tag(), 0x0201);
    }

    #[test]
    fn test_dzg_power_values() {
        let serial_entry = "77 07 0100600100FF 01 01 01 01 0B 0A01445A470002AEA540 01";
        let power_entry = "77 07 0100100700FF 01 01 62 1B 52 FE 53 8025 01";
        let body = format!(
            "77 01 07 0A01445A4700 01 01 72 {} {} 01 01",
            serial_entry, power_entry
        );
        let bytes = OctetString::from_hex(&body).unwrap();

        let response: GetListResponse = decode_from_slice(&bytes).unwrap();
        let power = response
            .entries()
            .iter()
            .find(|entry| entry.obis() == Some(ObisCode::ACTIVE_POWER))
            .unwrap();
        assert_eq!(power.value, Some(Value::U16(0x8025)));
        assert_eq!(power.scaled_value(), Some(328.05));
    }

    #[test]
    fn test_signed_power_from_other_meters() {
        let power_entry = "77 07 0100100700FF 01 01 62 1B 52 FE 53 8025 01";
        let body = format!("77 01 07 0A01454D4800 01 01 71 {} 01 01", power_entry);
        let bytes = OctetString::from_hex(&body).unwrap();

        let response: GetListResponse = decode_from_slice(&bytes).unwrap();
        assert_eq!(response.entries()[0].value, Some(Value::I16(-32731)));
    }

    #[test]
    fn test_vendor_time_encodings() {
        // DTZ541 sends a bare u32 in place of the tagged seconds index
        let body = "77 01 07 0A01445A4700 01 65 00001234 70 01 01";
        let response: GetListResponse =
            decode_from_slice(&OctetString::from_hex(body).unwrap()).unwrap();
        assert_eq!(response.act_sensor_time, Some(Time::SecIndex(0x1234)));

        // Three-element local time list without tag
        let body = "77 01 07 0A01445A4700 01 73 65 5F5E1000 53 003C 53 0000 70 01 01";
        let response: GetListResponse =
            decode_from_slice(&OctetString::from_hex(body).unwrap()).unwrap();
        assert_eq!(response.act_sensor_time, Some(Time::LocalTimestamp));
        assert!(response.entries().is_empty());
    }

    #[test]
    fn test_corrupted_frame_rejected() {
        let file = File::new(vec![Message::new(MessageBody::CloseResponse(
            CloseResponse::default(),
        ))]);
        let mut frame = encode_file(&file).unwrap().to_vec();
        frame[10] ^= 0x40;
        assert!(matches!(
            decode_frame(&frame),
            Err(SmlError::ChecksumMismatch { .. })
        ));
    }
}
