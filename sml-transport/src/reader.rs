//! Blocking frame reader over any `std::io::Read` source

use crate::frame::{decode_frame_with, encode_file};
use crate::scanner::FrameScanner;
use crate::settings::TransportSettings;
use bytes::{Buf, Bytes, BytesMut};
use sml_core::{SmlError, SmlResult};
use sml_message::File;
use std::io::{ErrorKind, Read, Write};

pub(crate) const READ_CHUNK_SIZE: usize = 512;

/// Reads complete SML frames from a byte stream
///
/// Reads block until a frame is complete, the source reports EOF or an
/// I/O error occurs. There is no internal timeout; configure one on the
/// source itself.
///
/// A non-blocking source that reports [`ErrorKind::WouldBlock`] surfaces
/// as [`SmlError::Io`]. Bytes already buffered and a partially scanned
/// frame are kept, so calling [`read_frame`](Self::read_frame) again once
/// the source is readable resumes where it left off.
#[derive(Debug)]
pub struct SmlTransportReader<R> {
    inner: R,
    settings: TransportSettings,
    scanner: FrameScanner,
    pending: BytesMut,
}

impl<R: Read> SmlTransportReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_settings(inner, TransportSettings::default())
    }

    pub fn with_settings(inner: R, settings: TransportSettings) -> Self {
        Self {
            inner,
            settings,
            scanner: FrameScanner::new(&settings),
            pending: BytesMut::with_capacity(READ_CHUNK_SIZE),
        }
    }

    /// Read the next raw frame, start marker through CRC
    ///
    /// Returns `Ok(None)` on EOF between frames.
    pub fn read_frame(&mut self) -> SmlResult<Option<Bytes>> {
        loop {
            while self.pending.has_remaining() {
                let byte = self.pending.get_u8();
                if let Some(frame) = self.scanner.push(byte)? {
                    return Ok(Some(frame));
                }
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(SmlError::Io(err)),
            };

            if read == 0 {
                return end_of_stream(&mut self.scanner);
            }
            self.pending.extend_from_slice(&chunk[..read]);
        }
    }

    /// Read and decode the next frame
    pub fn read_file(&mut self) -> SmlResult<Option<File>> {
        match self.read_frame()? {
            Some(frame) => decode_frame_with(&frame, &self.settings).map(Some),
            None => Ok(None),
        }
    }

    /// Iterate over raw frames until EOF
    pub fn frames(&mut self) -> Frames<'_, R> {
        Frames {
            reader: self,
            done: false,
        }
    }

    /// Decode frames until EOF, handing each file to `callback`
    ///
    /// Frames that fail to verify or decode are logged and skipped. I/O
    /// errors, including `WouldBlock`, and a stream ending inside a frame
    /// stop the loop.
    pub fn listen<F>(&mut self, mut callback: F) -> SmlResult<()>
    where
        F: FnMut(File),
    {
        loop {
            match self.read_frame() {
                Ok(Some(frame)) => match decode_frame_with(&frame, &self.settings) {
                    Ok(file) => callback(file),
                    Err(err) => log::warn!("discarding undecodable frame: {}", err),
                },
                Ok(None) => return Ok(()),
                Err(err) if is_fatal(&err) => return Err(err),
                Err(err) => log::warn!("discarding malformed frame: {}", err),
            }
        }
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Iterator over the raw frames of a [`SmlTransportReader`]
#[derive(Debug)]
pub struct Frames<'a, R> {
    reader: &'a mut SmlTransportReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Frames<'_, R> {
    type Item = SmlResult<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = is_fatal(&err) && !would_block(&err);
                Some(Err(err))
            }
        }
    }
}

/// Frame and write `file` to `writer`
///
/// Escape sequences inside the payload are not escaped. A file encoding to
/// `1B 1B 1B 1B` at a four-byte aligned offset produces a frame that
/// [`FrameScanner`] rejects, so it does not read back through
/// [`SmlTransportReader`].
pub fn write_frame<W: Write>(mut writer: W, file: &File) -> SmlResult<()> {
    let frame = encode_file(file)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn end_of_stream(scanner: &mut FrameScanner) -> SmlResult<Option<Bytes>> {
    if !scanner.in_frame() {
        return Ok(None);
    }
    let err = SmlError::BufferExhausted {
        needed: scanner.needed(),
        available: scanner.buffered(),
    };
    scanner.reset();
    Err(err)
}

/// Errors after which no further frame can be read
pub(crate) fn is_fatal(err: &SmlError) -> bool {
    matches!(err, SmlError::Io(_) | SmlError::BufferExhausted { .. })
}

/// A non-blocking source with nothing to read yet
pub(crate) fn would_block(err: &SmlError) -> bool {
    matches!(err, SmlError::Io(io) if io.kind() == ErrorKind::WouldBlock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::decode_frame;
    use crate::frame::tests::{kermit_close_frame, CLOSE_FRAME};
    use std::io::Cursor;

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
        interrupted: bool,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    /// Hands out the bytes in two halves with a `WouldBlock` in between
    struct NonBlockingReader {
        bytes: Vec<u8>,
        pos: usize,
        blocked: bool,
    }

    impl Read for NonBlockingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let half = self.bytes.len() / 2;
            if self.pos == half && !self.blocked {
                self.blocked = true;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            let end = if self.pos < half { half } else { self.bytes.len() };
            let n = (end - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_read_frame() {
        let mut reader = SmlTransportReader::new(Cursor::new(CLOSE_FRAME.to_vec()));
        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(&frame[..], &CLOSE_FRAME[..]);
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_partial_reads_and_interrupts() {
        let mut reader = SmlTransportReader::new(ByteByByteReader {
            bytes: CLOSE_FRAME.to_vec(),
            pos: 0,
            interrupted: false,
        });
        let file = reader.read_file().unwrap().unwrap();
        assert_eq!(file.len(), 1);
    }

    #[test]
    fn test_would_block_resumes_frame() {
        let mut reader = SmlTransportReader::new(NonBlockingReader {
            bytes: CLOSE_FRAME.to_vec(),
            pos: 0,
            blocked: false,
        });
        match reader.read_frame() {
            Err(SmlError::Io(err)) => assert_eq!(err.kind(), ErrorKind::WouldBlock),
            other => panic!("expected WouldBlock, got {:?}", other),
        }
        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(&frame[..], &CLOSE_FRAME[..]);
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_frames_iterator_continues_after_would_block() {
        let mut reader = SmlTransportReader::new(NonBlockingReader {
            bytes: CLOSE_FRAME.to_vec(),
            pos: 0,
            blocked: false,
        });
        let results: Vec<_> = reader.frames().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(&results[1].as_ref().unwrap()[..], &CLOSE_FRAME[..]);
    }

    #[test]
    fn test_kermit_frames_need_opt_in() {
        let frame = kermit_close_frame();

        let mut strict = SmlTransportReader::new(Cursor::new(frame.to_vec()));
        assert!(matches!(
            strict.read_file(),
            Err(SmlError::ChecksumMismatch { .. })
        ));

        let settings = TransportSettings::new().with_kermit_crc(true);
        let mut lenient = SmlTransportReader::with_settings(Cursor::new(frame.to_vec()), settings);
        assert!(lenient.settings().accept_kermit_crc);
        assert_eq!(lenient.read_file().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_eof_mid_frame() {
        let mut reader = SmlTransportReader::new(Cursor::new(CLOSE_FRAME[..20].to_vec()));
        assert!(matches!(
            reader.read_frame(),
            Err(SmlError::BufferExhausted { .. })
        ));
    }

    #[test]
    fn test_empty_stream() {
        let mut reader = SmlTransportReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(reader.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_frames_iterator() {
        let mut bytes = CLOSE_FRAME.to_vec();
        bytes.extend_from_slice(&[0x00, 0x42]);
        bytes.extend_from_slice(&CLOSE_FRAME);
        let mut reader = SmlTransportReader::new(Cursor::new(bytes));
        let frames: Vec<_> = reader.frames().collect::<SmlResult<_>>().unwrap();
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn test_listen_skips_bad_frames() {
        let mut corrupted = CLOSE_FRAME;
        corrupted[39] ^= 0x01;
        let mut bytes = corrupted.to_vec();
        bytes.extend_from_slice(&CLOSE_FRAME);
        let mut reader = SmlTransportReader::new(Cursor::new(bytes));

        let mut files = Vec::new();
        reader.listen(|file| files.push(file)).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_write_frame() {
        let file = decode_frame(&CLOSE_FRAME).unwrap();
        let mut out = Vec::new();
        write_frame(&mut out, &file).unwrap();
        assert_eq!(out, CLOSE_FRAME.to_vec());
    }
}
