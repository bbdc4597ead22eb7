//! SML TLV codec
//!
//! Primitive fields (octet strings, booleans, integers) are read through an
//! [`SmlReader`] and written through an [`SmlWriter`]. Composite structures
//! (lists, sequences, times and parameter trees) implement [`SmlDecode`] and
//! [`SmlEncode`] on top of them; `Option<T>` maps to the skipped-field
//! marker and `Vec<T>` to an SML sequence.

pub mod list;
pub mod octet_string;
pub mod reader;
pub mod record;
pub mod time;
pub mod traits;
pub mod tree;
pub mod types;
pub mod value;
pub mod writer;

pub use list::{List, ListEntry};
pub use octet_string::OctetString;
pub use reader::{SmlReader, TypeLength};
pub use sml_core::{SmlError, SmlResult};
pub use time::Time;
pub use traits::{SmlDecode, SmlEncode};
pub use tree::{PeriodEntry, ProcParValue, Tree, TreePath, TupelEntry};
pub use types::{SmlNumber, SmlType};
pub use value::{Status, Value};
pub use writer::SmlWriter;

/// Sequence of elements encoded as an SML list
pub type Sequence<T> = Vec<T>;

/// Decode a single `T` from the start of `bytes`
pub fn decode_from_slice<T: SmlDecode>(bytes: &[u8]) -> SmlResult<T> {
    let mut reader = SmlReader::new(bytes);
    T::decode(&mut reader)
}

/// Encode `value` into a fresh buffer
pub fn encode_to_bytes<T: SmlEncode + ?Sized>(value: &T) -> SmlResult<bytes::Bytes> {
    let mut writer = SmlWriter::new();
    value.encode(&mut writer)?;
    Ok(writer.into_bytes())
}
