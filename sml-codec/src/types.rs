//! SML TLV types and wire constants

use sml_core::{SmlError, SmlResult};

/// Bit set on a TL byte when another TL byte follows
pub const ANOTHER_TL: u8 = 0x80;
/// Mask selecting the type bits of the first TL byte
pub const TYPE_FIELD: u8 = 0x70;
/// Mask selecting the length nibble of a TL byte
pub const LENGTH_FIELD: u8 = 0x0F;
/// Marker for a skipped optional field
pub const OPTIONAL_SKIPPED: u8 = 0x01;
/// Terminates every encoded message
pub const MESSAGE_END: u8 = 0x00;
/// Maximum number of TL bytes accepted for one field (32 length bits)
pub const MAX_TL_BYTES: usize = 8;

/// SML TLV type, taken from bits 6..4 of the first TL byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmlType {
    OctetString = 0x00,
    Boolean = 0x40,
    Integer = 0x50,
    Unsigned = 0x60,
    List = 0x70,
}

impl SmlType {
    /// Get type from the first TL byte
    pub fn from_tl(byte: u8) -> SmlResult<Self> {
        match byte & TYPE_FIELD {
            0x00 => Ok(SmlType::OctetString),
            0x40 => Ok(SmlType::Boolean),
            0x50 => Ok(SmlType::Integer),
            0x60 => Ok(SmlType::Unsigned),
            0x70 => Ok(SmlType::List),
            _ => Err(SmlError::TypeMismatch {
                expected: "SML type",
                found: byte,
            }),
        }
    }

    /// Type bits as written into the first TL byte
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            SmlType::OctetString => "octet string",
            SmlType::Boolean => "boolean",
            SmlType::Integer => "integer",
            SmlType::Unsigned => "unsigned",
            SmlType::List => "list",
        }
    }
}

/// Fixed-width integer as carried by SML `Integer`/`Unsigned` fields
///
/// Values are transported through a `u64` holding the two's complement
/// bit pattern: `from_raw` truncates, `to_raw` sign- or zero-extends.
pub trait SmlNumber: Copy + Sized {
    /// Width in bytes (1, 2, 4 or 8)
    const WIDTH: usize;
    const SIGNED: bool;

    fn from_raw(raw: u64) -> Self;
    fn to_raw(self) -> u64;

    /// Wire type matching the signedness
    fn sml_type() -> SmlType {
        if Self::SIGNED {
            SmlType::Integer
        } else {
            SmlType::Unsigned
        }
    }
}

macro_rules! impl_sml_number {
    ($($ty:ty => $signed:expr),* $(,)?) => {
        $(
            impl SmlNumber for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                const SIGNED: bool = $signed;

                fn from_raw(raw: u64) -> Self {
                    raw as $ty
                }

                fn to_raw(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_sml_number! {
    u8 => false,
    u16 => false,
    u32 => false,
    u64 => false,
    i8 => true,
    i16 => true,
    i32 => true,
    i64 => true,
}

/// Power-of-two width an encoder used for a payload of `len` bytes
pub fn width_for_len(len: usize) -> SmlResult<usize> {
    if len > 8 {
        return Err(SmlError::LengthMismatch {
            expected: 8,
            found: len,
        });
    }
    Ok(len.max(1).next_power_of_two())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_tl() {
        assert_eq!(SmlType::from_tl(0x72).unwrap(), SmlType::List);
        assert_eq!(SmlType::from_tl(0xF1).unwrap(), SmlType::List);
        assert_eq!(SmlType::from_tl(0x62).unwrap(), SmlType::Unsigned);
        assert_eq!(SmlType::from_tl(0x55).unwrap(), SmlType::Integer);
        assert_eq!(SmlType::from_tl(0x42).unwrap(), SmlType::Boolean);
        assert_eq!(SmlType::from_tl(0x07).unwrap(), SmlType::OctetString);
        assert!(SmlType::from_tl(0x22).is_err());
    }

    #[test]
    fn test_number_raw_conversion() {
        assert_eq!((-1i16).to_raw(), u64::MAX);
        assert_eq!(i16::from_raw(0xFFFF_FFFF_FFFF_8025), -32731);
        assert_eq!(u8::from_raw(0x1FF), 0xFF);
        assert_eq!(<i32 as SmlNumber>::WIDTH, 4);
        assert_eq!(<u64 as SmlNumber>::sml_type(), SmlType::Unsigned);
    }

    #[test]
    fn test_width_for_len() {
        assert_eq!(width_for_len(0).unwrap(), 1);
        assert_eq!(width_for_len(3).unwrap(), 4);
        assert_eq!(width_for_len(5).unwrap(), 8);
        assert!(width_for_len(9).is_err());
    }
}
