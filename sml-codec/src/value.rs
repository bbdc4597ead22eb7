//! SML values and status words

use crate::octet_string::OctetString;
use serde::{Deserialize, Serialize};

/// A measured or configured value
///
/// Integer variants record the power-of-two width the producing encoder
/// used, which is also the width written back on encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Bytes(OctetString),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl Value {
    /// Numeric value as f64; `None` for booleans and octet strings
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::I8(v) => Some(v as f64),
            Value::I16(v) => Some(v as f64),
            Value::I32(v) => Some(v as f64),
            Value::I64(v) => Some(v as f64),
            Value::U8(v) => Some(v as f64),
            Value::U16(v) => Some(v as f64),
            Value::U32(v) => Some(v as f64),
            Value::U64(v) => Some(v as f64),
            Value::Bool(_) | Value::Bytes(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(v) => Some(v as i64),
            Value::I16(v) => Some(v as i64),
            Value::I32(v) => Some(v as i64),
            Value::I64(v) => Some(v),
            Value::U8(v) => Some(v as i64),
            Value::U16(v) => Some(v as i64),
            Value::U32(v) => Some(v as i64),
            Value::U64(v) => i64::try_from(v).ok(),
            Value::Bool(_) | Value::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&OctetString> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::I64(_)
        )
    }

    /// Reinterpret a signed integer as the unsigned integer of equal width
    pub fn to_unsigned_bits(&self) -> Value {
        match *self {
            Value::I8(v) => Value::U8(v as u8),
            Value::I16(v) => Value::U16(v as u16),
            Value::I32(v) => Value::U32(v as u32),
            Value::I64(v) => Value::U64(v as u64),
            ref other => other.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<OctetString> for Value {
    fn from(v: OctetString) -> Self {
        Value::Bytes(v)
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_value_from! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
}

/// Status word of a list entry or period, always unsigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl Status {
    pub fn value(&self) -> u64 {
        match *self {
            Status::U8(v) => v as u64,
            Status::U16(v) => v as u64,
            Status::U32(v) => v as u64,
            Status::U64(v) => v,
        }
    }
}
