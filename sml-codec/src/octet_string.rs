//! Owned SML octet strings

use serde::{Deserialize, Serialize};
use sml_core::{SmlError, SmlResult};
use std::fmt;
use std::ops::Deref;

/// Owned byte string used for identifiers, names, signatures and raw data
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OctetString(#[serde(with = "serde_bytes")] Vec<u8>);

impl OctetString {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse from hex text; ASCII whitespace between digits is ignored
    pub fn from_hex(hex: &str) -> SmlResult<Self> {
        let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
        if digits.len() % 2 != 0 {
            return Err(SmlError::InvalidData(format!(
                "Odd number of hex digits: {}",
                digits.len()
            )));
        }

        let mut bytes = Vec::with_capacity(digits.len() / 2);
        for pair in digits.chunks(2) {
            let hi = hex_nibble(pair[0])?;
            let lo = hex_nibble(pair[1])?;
            bytes.push((hi << 4) | lo);
        }
        Ok(Self(bytes))
    }

    /// Random RFC 4122 version 4 UUID, used as transaction id
    pub fn generate_uuid() -> Self {
        let mut bytes: [u8; 16] = rand::random();
        bytes[6] = (bytes[6] & 0x0F) | 0x40;
        bytes[8] = (bytes[8] & 0x3F) | 0x80;
        Self(bytes.to_vec())
    }

    /// Lowercase hex representation
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Compare with hex text, case-insensitive; invalid hex never matches
    pub fn eq_hex(&self, hex: &str) -> bool {
        Self::from_hex(hex).is_ok_and(|other| other == *self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

fn hex_nibble(digit: u8) -> SmlResult<u8> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(SmlError::InvalidData(format!(
            "Invalid hex digit: {:?}",
            digit as char
        ))),
    }
}

impl Deref for OctetString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for OctetString {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for OctetString {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for OctetString {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl fmt::Display for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OctetString({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let s = OctetString::from_hex("0A01 445A47").unwrap();
        assert_eq!(s.as_bytes(), &[0x0A, 0x01, b'D', b'Z', b'G']);
        assert!(OctetString::from_hex("ABC").is_err());
        assert!(OctetString::from_hex("zz").is_err());
    }

    #[test]
    fn test_hex_display_roundtrip() {
        let s = OctetString::new(vec![0x01, 0x00, 0xFF]);
        assert_eq!(s.to_string(), "0100ff");
        assert!(s.eq_hex("0100FF"));
        assert!(!s.eq_hex("0100"));
        assert!(!s.eq_hex("not hex"));
    }

    #[test]
    fn test_generate_uuid() {
        let id = OctetString::generate_uuid();
        assert_eq!(id.len(), 16);
        assert_eq!(id[6] & 0xF0, 0x40);
        assert_eq!(id[8] & 0xC0, 0x80);
        assert_ne!(id, OctetString::generate_uuid());
    }
}
