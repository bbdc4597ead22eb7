//! Frame boundary detection on a raw byte stream
//!
//! The scanner holds no I/O of its own. Readers push every received byte
//! and get a complete frame back once its trailer has arrived.

use crate::frame::{END_MARK, ESCAPE, START_SEQUENCE, TRAILER_LEN};
use crate::settings::TransportSettings;
use bytes::{Bytes, BytesMut};
use sml_core::{SmlError, SmlResult};

const STRIDE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Matching the start marker; `matched` bytes seen so far
    Hunting { matched: usize },
    /// Collecting payload strides
    Body,
    /// Collecting the stride after an escape sequence
    Trailer,
}

/// Incremental frame scanner
#[derive(Debug)]
pub struct FrameScanner {
    buffer: BytesMut,
    state: ScanState,
    max_frame_size: usize,
}

impl FrameScanner {
    pub fn new(settings: &TransportSettings) -> Self {
        Self {
            buffer: BytesMut::new(),
            state: ScanState::Hunting { matched: 0 },
            max_frame_size: settings.max_frame_size,
        }
    }

    /// Whether part of a frame (or of its start marker) has been seen
    pub fn in_frame(&self) -> bool {
        self.state != ScanState::Hunting { matched: 0 }
    }

    /// Bytes still missing before the current stride or marker is complete
    pub fn needed(&self) -> usize {
        match self.state {
            ScanState::Hunting { matched } => START_SEQUENCE.len() - matched,
            ScanState::Body | ScanState::Trailer => {
                let offset = (self.buffer.len() - START_SEQUENCE.len()) % STRIDE;
                STRIDE - offset
            }
        }
    }

    /// Bytes collected for the frame in progress
    pub fn buffered(&self) -> usize {
        match self.state {
            ScanState::Hunting { matched } => matched,
            ScanState::Body | ScanState::Trailer => self.buffer.len(),
        }
    }

    /// Drop any partial frame and hunt for the next start marker
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = ScanState::Hunting { matched: 0 };
    }

    /// Feed one byte, returning the complete frame it finishes
    ///
    /// On error the partial frame is discarded and scanning restarts with
    /// the next byte.
    pub fn push(&mut self, byte: u8) -> SmlResult<Option<Bytes>> {
        match self.state {
            ScanState::Hunting { matched } => {
                self.state = ScanState::Hunting {
                    matched: next_match(matched, byte),
                };
                if self.state == (ScanState::Hunting { matched: START_SEQUENCE.len() }) {
                    log::debug!("frame start detected");
                    self.buffer.clear();
                    self.buffer.extend_from_slice(&START_SEQUENCE);
                    self.state = ScanState::Body;
                }
                Ok(None)
            }
            ScanState::Body => {
                self.append(byte)?;
                if self.stride_complete() && self.buffer[self.buffer.len() - STRIDE..] == ESCAPE {
                    self.state = ScanState::Trailer;
                }
                Ok(None)
            }
            ScanState::Trailer => {
                if self.stride_offset() == 0 && byte != END_MARK {
                    self.reset();
                    return Err(SmlError::UnrecognizedFraming(byte));
                }
                self.append(byte)?;
                if !self.stride_complete() {
                    return Ok(None);
                }
                let frame = self.buffer.split().freeze();
                self.reset();
                log::debug!("frame complete, {} bytes", frame.len());
                Ok(Some(frame))
            }
        }
    }

    fn append(&mut self, byte: u8) -> SmlResult<()> {
        if self.buffer.len() >= self.max_frame_size {
            let found = self.buffer.len() + 1;
            self.reset();
            return Err(SmlError::LengthMismatch {
                expected: self.max_frame_size,
                found,
            });
        }
        self.buffer.extend_from_slice(&[byte]);
        Ok(())
    }

    fn stride_offset(&self) -> usize {
        (self.buffer.len() - START_SEQUENCE.len()) % STRIDE
    }

    fn stride_complete(&self) -> bool {
        self.buffer.len() > START_SEQUENCE.len() && self.stride_offset() == 0
    }
}

/// Start marker progress after `byte`, given `matched` bytes so far
fn next_match(matched: usize, byte: u8) -> usize {
    if byte == START_SEQUENCE[matched] {
        matched + 1
    } else if matched == ESCAPE.len() && byte == ESCAPE[0] {
        // Still four escape bytes in a row
        matched
    } else if byte == ESCAPE[0] {
        1
    } else {
        0
    }
}

/// Frame length implied by a payload of `payload_len` bytes
pub fn frame_len(payload_len: usize) -> usize {
    START_SEQUENCE.len() + payload_len + TRAILER_LEN
}
