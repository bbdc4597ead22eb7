//! Frame reader for tokio sources

use crate::frame::decode_frame_with;
use crate::reader::{end_of_stream, is_fatal, READ_CHUNK_SIZE};
use crate::scanner::FrameScanner;
use crate::settings::TransportSettings;
use bytes::{Buf, Bytes, BytesMut};
use sml_core::{SmlError, SmlResult};
use sml_message::File;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Async counterpart of [`crate::SmlTransportReader`]
///
/// Wrap calls in `tokio::time::timeout` to bound the wait for a frame.
#[derive(Debug)]
pub struct AsyncSmlTransportReader<R> {
    inner: R,
    settings: TransportSettings,
    scanner: FrameScanner,
    pending: BytesMut,
}

impl<R: AsyncRead + Unpin> AsyncSmlTransportReader<R> {
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

    /// Read the next raw frame; `Ok(None)` on EOF between frames
    pub async fn read_frame(&mut self) -> SmlResult<Option<Bytes>> {
        loop {
            while self.pending.has_remaining() {
                let byte = self.pending.get_u8();
                if let Some(frame) = self.scanner.push(byte)? {
                    return Ok(Some(frame));
                }
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk).await {
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

    pub async fn read_file(&mut self) -> SmlResult<Option<File>> {
        match self.read_frame().await? {
            Some(frame) => decode_frame_with(&frame, &self.settings).map(Some),
            None => Ok(None),
        }
    }

    /// Decode frames until EOF, handing each file to `callback`
    pub async fn listen<F>(&mut self, mut callback: F) -> SmlResult<()>
    where
        F: FnMut(File),
    {
        loop {
            match self.read_frame().await {
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

    pub fn into_inner(self) -> R {
        self.inner
    }
}
