//! SML value lists (`SML_List`) and their entries

use crate::octet_string::OctetString;
use crate::reader::SmlReader;
use crate::time::Time;
use crate::traits::{SmlDecode, SmlEncode};
use crate::types::{ANOTHER_TL, LENGTH_FIELD};
use crate::value::{Status, Value};
use crate::writer::SmlWriter;
use serde::{Deserialize, Serialize};
use sml_core::{ObisCode, SmlResult};
use std::ops::Deref;

const LIST_ENTRY_FIELDS: usize = 7;

/// Serial number prefix of DZG meters: length/type marker and manufacturer
const DZG_SERIAL_PREFIX: [u8; 5] = [0x0A, 0x01, b'D', b'Z', b'G'];
const DZG_SERIAL_LENGTH: usize = 10;

/// DVS74 serial ranges that encode unsigned power readings as signed
/// integers; firmware from serial 60000000 on is fixed
const DZG_DVS74_BROKEN_RANGES: [(u64, u64); 2] =
    [(42_000_000, 48_999_999), (55_000_000, 58_999_999)];

/// One reading in a list: object name, status, time, unit, scaler, value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListEntry {
    pub obj_name: Option<OctetString>,
    pub status: Option<Status>,
    pub val_time: Option<Time>,
    /// DLMS unit code
    pub unit: Option<u8>,
    /// Decimal exponent applied to `value`
    pub scaler: Option<i8>,
    pub value: Option<Value>,
    pub value_signature: Option<OctetString>,
}

impl ListEntry {
    /// Object name as OBIS code, if it is six bytes long
    pub fn obis(&self) -> Option<ObisCode> {
        self.obj_name
            .as_ref()
            .and_then(|name| ObisCode::from_bytes(name))
    }

    /// Numeric value with the scaler applied
    pub fn scaled_value(&self) -> Option<f64> {
        let value = self.value.as_ref()?.as_f64()?;
        let scaler = self.scaler.unwrap_or(0);
        let factor = 10f64.powi(scaler.unsigned_abs() as i32);
        Some(if scaler < 0 { value / factor } else { value * factor })
    }

    fn has_obis(&self, code: ObisCode) -> bool {
        self.obj_name
            .as_ref()
            .is_some_and(|name| name.as_bytes() == code.as_bytes())
    }

    fn decode_with(reader: &mut SmlReader<'_>, quirks: &mut ListQuirks) -> SmlResult<Self> {
        reader.read_list_header(LIST_ENTRY_FIELDS)?;

        let obj_name = Option::<OctetString>::decode(reader)?;
        let status = Option::<Status>::decode(reader)?;
        let val_time = Option::<Time>::decode(reader)?;
        let unit = Option::<u8>::decode(reader)?;
        let scaler = Option::<i8>::decode(reader)?;
        let value_tl = reader.peek_byte()?;
        let value = Option::<Value>::decode(reader)?;
        let value_signature = Option::<OctetString>::decode(reader)?;

        let mut entry = ListEntry {
            obj_name,
            status,
            val_time,
            unit,
            scaler,
            value,
            value_signature,
        };
        quirks.apply(&mut entry, value_tl);
        Ok(entry)
    }
}

impl SmlEncode for ListEntry {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        writer.write_list_header(LIST_ENTRY_FIELDS)?;
        self.obj_name.encode(writer)?;
        self.status.encode(writer)?;
        self.val_time.encode(writer)?;
        self.unit.encode(writer)?;
        self.scaler.encode(writer)?;
        self.value.encode(writer)?;
        self.value_signature.encode(writer)
    }
}

/// Vendor workarounds tracked across the entries of one list
#[derive(Debug, Default)]
struct ListQuirks {
    old_dzg_dvs74: bool,
}

impl ListQuirks {
    fn apply(&mut self, entry: &mut ListEntry, value_tl: u8) {
        if is_buggy_dzg_dvs74(entry) {
            log::debug!("DZG DVS74 with signed power encoding detected");
            self.old_dzg_dvs74 = true;
            return;
        }

        // DVS74 sends e.g. 53 80 25 (-327.31 W) for 63 80 25 (328.05 W).
        // Negative values are never compressed, so a single TL byte with at
        // most two payload bytes was meant to be unsigned.
        if self.old_dzg_dvs74
            && entry.has_obis(ObisCode::ACTIVE_POWER)
            && matches!(value_tl & (ANOTHER_TL | LENGTH_FIELD), 1..=3)
        {
            if let Some(value) = entry.value.as_mut().filter(|v| v.is_signed()) {
                log::debug!("reading DZG DVS74 power value {:?} as unsigned", value);
                *value = value.to_unsigned_bits();
            }
        }
    }
}

fn is_buggy_dzg_dvs74(entry: &ListEntry) -> bool {
    if !entry.has_obis(ObisCode::SERIAL_NUMBER) {
        return false;
    }

    let serial = match entry.value.as_ref().and_then(Value::as_bytes) {
        Some(serial) if serial.len() == DZG_SERIAL_LENGTH => serial,
        _ => return false,
    };
    if !serial.starts_with(&DZG_SERIAL_PREFIX) {
        return false;
    }

    let number = serial[DZG_SERIAL_PREFIX.len()..]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | b as u64);
    DZG_DVS74_BROKEN_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&number))
}

/// Ordered entries of one value list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct List(pub Vec<ListEntry>);

impl List {
    pub fn new(entries: Vec<ListEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.0
    }

    /// First entry whose object name equals `code`
    pub fn find(&self, code: ObisCode) -> Option<&ListEntry> {
        self.0.iter().find(|entry| entry.has_obis(code))
    }
}

impl Deref for List {
    type Target = [ListEntry];

    fn deref(&self) -> &[ListEntry] {
        &self.0
    }
}

impl From<Vec<ListEntry>> for List {
    fn from(entries: Vec<ListEntry>) -> Self {
        Self(entries)
    }
}

impl IntoIterator for List {
    type Item = ListEntry;
    type IntoIter = std::vec::IntoIter<ListEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a ListEntry;
    type IntoIter = std::slice::Iter<'a, ListEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl SmlDecode for List {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        let count = reader.read_list_len()?;
        let mut quirks = ListQuirks::default();
        let mut entries = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            entries.push(ListEntry::decode_with(reader, &mut quirks)?);
        }
        Ok(List(entries))
    }
}

impl SmlEncode for List {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        writer.write_list_header(self.0.len())?;
        for entry in &self.0 {
            entry.encode(writer)?;
        }
        Ok(())
    }
}
