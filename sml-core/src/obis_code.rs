use crate::error::{SmlError, SmlResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reduced ID notation as printed on meter displays, e.g. `1-0:1.8.0*255`
static REDUCED_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3})-(\d{1,3}):(\d{1,3})\.(\d{1,3})\.(\d{1,3})(?:\*(\d{1,3}))?$")
        .unwrap_or_else(|e| panic!("invalid OBIS pattern: {e}"))
});

/// OBIS (Object Identification System) code
///
/// SML object names are 6-byte octet strings; for meter readings they carry
/// an OBIS code such as `1-0:1.8.0*255` (total imported energy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObisCode {
    bytes: [u8; 6],
}

impl ObisCode {
    /// Meter serial number (`1-0:96.1.0*255`)
    pub const SERIAL_NUMBER: ObisCode = ObisCode::new(1, 0, 96, 1, 0, 255);
    /// Total active power (`1-0:16.7.0*255`)
    pub const ACTIVE_POWER: ObisCode = ObisCode::new(1, 0, 16, 7, 0, 255);
    /// Total imported energy (`1-0:1.8.0*255`)
    pub const ENERGY_IMPORT_TOTAL: ObisCode = ObisCode::new(1, 0, 1, 8, 0, 255);
    /// Total exported energy (`1-0:2.8.0*255`)
    pub const ENERGY_EXPORT_TOTAL: ObisCode = ObisCode::new(1, 0, 2, 8, 0, 255);

    pub const fn new(a: u8, b: u8, c: u8, d: u8, e: u8, f: u8) -> Self {
        Self {
            bytes: [a, b, c, d, e, f],
        }
    }

    /// Interpret an SML object name as OBIS code
    ///
    /// Returns `None` unless `bytes` is exactly six bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; 6] = bytes.try_into().ok()?;
        Some(Self { bytes })
    }

    /// Parse an OBIS code from string format
    ///
    /// Supports formats like:
    /// - "1.0.1.8.0.255"
    /// - "1-0:1.8.0*255"
    /// - "1-0:1.8.0" (F defaults to 255)
    pub fn from_string(s: &str) -> SmlResult<Self> {
        if let Ok(code) = Self::parse_dot_format(s) {
            return Ok(code);
        }

        if let Ok(code) = Self::parse_extended_format(s) {
            return Ok(code);
        }

        Err(SmlError::InvalidData(format!("Invalid OBIS code format: {}", s)))
    }

    fn parse_dot_format(s: &str) -> SmlResult<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 6 {
            return Err(SmlError::InvalidData("Expected 6 dot-separated values".to_string()));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = parse_group(part)?;
        }

        Ok(Self { bytes })
    }

    fn parse_extended_format(s: &str) -> SmlResult<Self> {
        let caps = REDUCED_ID
            .captures(s)
            .ok_or_else(|| SmlError::InvalidData(format!("Not in A-B:C.D.E*F form: {}", s)))?;

        let mut bytes = [0u8; 6];
        for (i, byte) in bytes.iter_mut().take(5).enumerate() {
            *byte = parse_group(&caps[i + 1])?;
        }
        bytes[5] = match caps.get(6) {
            Some(m) => parse_group(m.as_str())?,
            None => 255,
        };

        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> [u8; 6] {
        self.bytes
    }

    /// Medium (1 = electricity)
    pub fn a(&self) -> u8 {
        self.bytes[0]
    }

    /// Channel
    pub fn b(&self) -> u8 {
        self.bytes[1]
    }

    /// Physical quantity
    pub fn c(&self) -> u8 {
        self.bytes[2]
    }

    /// Measurement type
    pub fn d(&self) -> u8 {
        self.bytes[3]
    }

    /// Tariff
    pub fn e(&self) -> u8 {
        self.bytes[4]
    }

    /// Historical value
    pub fn f(&self) -> u8 {
        self.bytes[5]
    }
}

fn parse_group(part: &str) -> SmlResult<u8> {
    part.parse::<u8>()
        .map_err(|_| SmlError::InvalidData(format!("Invalid byte value: {}", part)))
}

impl fmt::Display for ObisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}:{}.{}.{}*{}",
            self.bytes[0], self.bytes[1], self.bytes[2],
            self.bytes[3], self.bytes[4], self.bytes[5]
        )
    }
}

impl std::str::FromStr for ObisCode {
    type Err = SmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obis_code_new() {
        let code = ObisCode::new(1, 0, 1, 8, 0, 255);
        assert_eq!(code.a(), 1);
        assert_eq!(code.c(), 1);
        assert_eq!(code.f(), 255);
    }

    #[test]
    fn test_obis_code_from_dot_string() {
        let code = ObisCode::from_string("1.0.1.8.0.255").unwrap();
        assert_eq!(code, ObisCode::ENERGY_IMPORT_TOTAL);
    }

    #[test]
    fn test_obis_code_from_extended_string() {
        let code = ObisCode::from_string("1-0:16.7.0*255").unwrap();
        assert_eq!(code, ObisCode::ACTIVE_POWER);

        let code: ObisCode = "1-0:96.1.0".parse().unwrap();
        assert_eq!(code, ObisCode::SERIAL_NUMBER);
    }

    #[test]
    fn test_obis_code_rejects_garbage() {
        assert!(ObisCode::from_string("1-0:1.8").is_err());
        assert!(ObisCode::from_string("1-0:1.8.0*256").is_err());
        assert!(ObisCode::from_string("a.b.c.d.e.f").is_err());
    }

    #[test]
    fn test_obis_code_from_bytes() {
        let code = ObisCode::from_bytes(&[1, 0, 2, 8, 0, 255]).unwrap();
        assert_eq!(code, ObisCode::ENERGY_EXPORT_TOTAL);
        assert!(ObisCode::from_bytes(&[1, 0, 2, 8, 0]).is_none());
    }

    #[test]
    fn test_obis_code_display() {
        assert_eq!(ObisCode::ENERGY_IMPORT_TOTAL.to_string(), "1-0:1.8.0*255");
    }
}
