//! Core types and utilities for the SML protocol
//!
//! This crate provides the error taxonomy, the CRC16 checksum shared by the
//! message and transport layers, and OBIS object identifiers used as SML
//! object names.

pub mod crc16;
pub mod error;
pub mod obis_code;

pub use crc16::{crc16, crc16_kermit, Crc16};
pub use error::{SmlError, SmlResult};
pub use obis_code::ObisCode;
