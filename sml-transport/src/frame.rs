//! SML transport frame (version 1)
//!
//! Wire format:
//! ```text
//! 1B 1B 1B 1B 01 01 01 01 | payload | 00.. | 1B 1B 1B 1B 1A | pad | CRC
//!     start marker          message   zero   end marker        count  (2B)
//!                           file      padding
//! ```
//! The payload is padded to a multiple of four bytes and the CRC covers
//! everything from the start marker through the padding count.

use bytes::{BufMut, Bytes, BytesMut};
use sml_core::{crc16, crc16_kermit, SmlError, SmlResult};
use sml_message::File;

use crate::settings::TransportSettings;

/// Escape sequence opening every marker
pub const ESCAPE: [u8; 4] = [0x1B; 4];

/// Start marker of a version 1 frame
pub const START_SEQUENCE: [u8; 8] = [0x1B, 0x1B, 0x1B, 0x1B, 0x01, 0x01, 0x01, 0x01];

/// First byte after the escape that marks the frame end
pub const END_MARK: u8 = 0x1A;

/// Escape, end mark, padding count and CRC
pub const TRAILER_LEN: usize = 8;

/// Largest legal padding count
pub const MAX_PADDING: usize = 3;

/// Checksum variant a frame was sealed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameChecksum {
    X25,
    Kermit,
}

/// Frame the encoded message file `payload`
///
/// The payload is copied as is. An escape sequence `1B 1B 1B 1B` at a
/// four-byte aligned offset of `payload` is not escaped, and
/// [`FrameScanner`](crate::FrameScanner) rejects the resulting frame.
pub fn encode_frame(payload: &[u8]) -> Bytes {
    let padding = (4 - payload.len() % 4) % 4;
    let mut buf = BytesMut::with_capacity(START_SEQUENCE.len() + payload.len() + 3 + TRAILER_LEN);

    buf.put_slice(&START_SEQUENCE);
    buf.put_slice(payload);
    buf.put_bytes(0x00, padding);
    buf.put_slice(&ESCAPE);
    buf.put_u8(END_MARK);
    buf.put_u8(padding as u8);

    let crc = crc16(&buf);
    buf.put_u16(crc);
    buf.freeze()
}

/// Verify a complete frame and return its payload without padding
///
/// Only the X-25 checksum is accepted.
pub fn unwrap_frame(frame: &[u8]) -> SmlResult<&[u8]> {
    verify_frame(frame, false).map(|(payload, _)| payload)
}

/// Like [`unwrap_frame`], also accepting a CRC-16/Kermit checksum
///
/// Reports which checksum variant matched.
pub fn unwrap_frame_lenient(frame: &[u8]) -> SmlResult<(&[u8], FrameChecksum)> {
    verify_frame(frame, true)
}

fn verify_frame(frame: &[u8], accept_kermit: bool) -> SmlResult<(&[u8], FrameChecksum)> {
    let min_len = START_SEQUENCE.len() + TRAILER_LEN;
    if frame.len() < min_len {
        return Err(SmlError::BufferExhausted {
            needed: min_len,
            available: frame.len(),
        });
    }
    if frame[..START_SEQUENCE.len()] != START_SEQUENCE {
        return Err(SmlError::UnrecognizedFraming(frame[START_SEQUENCE.len() - 1]));
    }

    let trailer = frame.len() - TRAILER_LEN;
    if frame[trailer..trailer + 4] != ESCAPE {
        return Err(SmlError::UnrecognizedFraming(frame[trailer]));
    }
    if frame[trailer + 4] != END_MARK {
        return Err(SmlError::UnrecognizedFraming(frame[trailer + 4]));
    }

    let covered = &frame[..frame.len() - 2];
    let expected = u16::from_be_bytes([frame[frame.len() - 2], frame[frame.len() - 1]]);
    let computed = crc16(covered);
    let checksum = if expected == computed {
        FrameChecksum::X25
    } else if accept_kermit && expected == crc16_kermit(covered) {
        log::debug!("frame checksum matches CRC-16/Kermit");
        FrameChecksum::Kermit
    } else {
        return Err(SmlError::ChecksumMismatch { expected, computed });
    };

    let padding = frame[trailer + 5] as usize;
    let payload = &frame[START_SEQUENCE.len()..trailer];
    if padding > MAX_PADDING || padding > payload.len() {
        return Err(SmlError::InvalidData(format!(
            "invalid frame padding count: {}",
            padding
        )));
    }

    Ok((&payload[..payload.len() - padding], checksum))
}

/// Verify and decode one complete frame
pub fn decode_frame(frame: &[u8]) -> SmlResult<File> {
    decode_frame_with(frame, &TransportSettings::default())
}

/// Verify and decode one complete frame, honouring the checksum options
/// in `settings`
pub fn decode_frame_with(frame: &[u8], settings: &TransportSettings) -> SmlResult<File> {
    let (payload, _) = verify_frame(frame, settings.accept_kermit_crc)?;
    log::debug!("decoding frame with {} payload bytes", payload.len());
    File::parse(payload)
}

/// Encode and frame a message file
pub fn encode_file(file: &File) -> SmlResult<Bytes> {
    let payload = file.to_bytes()?;
    Ok(encode_frame(&payload))
}
