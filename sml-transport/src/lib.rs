//! SML transport layer
//!
//! Delimits message files in a raw byte stream using the SML transport
//! protocol version 1 (escape sequences, padding and a CRC16 trailer).
//!
//! - `frame`: frame encoding and verification
//! - `scanner`: incremental frame boundary detection
//! - `reader`: blocking reader for `std::io::Read` sources
//! - `async_reader`: tokio reader (feature `tokio`)

pub mod frame;
pub mod reader;
pub mod scanner;
pub mod settings;

#[cfg(feature = "tokio")]
pub mod async_reader;

pub use frame::{
    decode_frame, decode_frame_with, encode_file, encode_frame, unwrap_frame, unwrap_frame_lenient,
    FrameChecksum,
};
pub use reader::{write_frame, Frames, SmlTransportReader};
pub use scanner::FrameScanner;
pub use settings::TransportSettings;

#[cfg(feature = "tokio")]
pub use async_reader::AsyncSmlTransportReader;
