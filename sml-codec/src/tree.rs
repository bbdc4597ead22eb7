//! Parameter trees for the proc-parameter and profile messages

use crate::octet_string::OctetString;
use crate::reader::SmlReader;
use crate::time::Time;
use crate::traits::{SmlDecode, SmlEncode};
use crate::value::Value;
use crate::writer::SmlWriter;
use serde::{Deserialize, Serialize};
use sml_core::{SmlError, SmlResult};

/// Nesting limit for decoded trees
pub const MAX_TREE_DEPTH: usize = 64;

const TREE_FIELDS: usize = 3;

pub const PROC_PAR_VALUE_TAG_VALUE: u8 = 0x01;
pub const PROC_PAR_VALUE_TAG_PERIOD_ENTRY: u8 = 0x02;
pub const PROC_PAR_VALUE_TAG_TUPEL_ENTRY: u8 = 0x03;
pub const PROC_PAR_VALUE_TAG_TIME: u8 = 0x04;

/// Path of parameter names from the tree root
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreePath(pub Vec<OctetString>);

impl TreePath {
    pub fn new(entries: Vec<OctetString>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[OctetString] {
        &self.0
    }
}

impl SmlDecode for TreePath {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        let count = reader.read_list_len()?;
        let mut entries = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            // Skipped path entries carry nothing
            if let Some(entry) = Option::<OctetString>::decode(reader)? {
                entries.push(entry);
            }
        }
        Ok(TreePath(entries))
    }
}

impl SmlEncode for TreePath {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        self.0.encode(writer)
    }
}

crate::sml_record! {
    /// Single profile value with unit and scaler
    pub struct PeriodEntry {
        pub obj_name: Option<OctetString>,
        pub unit: Option<u8>,
        pub scaler: Option<i8>,
        pub value: Option<Value>,
        pub value_signature: Option<OctetString>,
    }
}

crate::sml_record! {
    /// Signed measurement tuple of a tariff device
    pub struct TupelEntry {
        pub server_id: Option<OctetString>,
        pub sec_index: Option<Time>,
        pub status: Option<u64>,
        pub unit_pa: Option<u8>,
        pub scaler_pa: Option<i8>,
        pub value_pa: Option<i64>,
        pub unit_r1: Option<u8>,
        pub scaler_r1: Option<i8>,
        pub value_r1: Option<i64>,
        pub unit_r4: Option<u8>,
        pub scaler_r4: Option<i8>,
        pub value_r4: Option<i64>,
        pub signature_pa_r1_r4: Option<OctetString>,
        pub unit_ma: Option<u8>,
        pub scaler_ma: Option<i8>,
        pub value_ma: Option<i64>,
        pub unit_r2: Option<u8>,
        pub scaler_r2: Option<i8>,
        pub value_r2: Option<i64>,
        pub unit_r3: Option<u8>,
        pub scaler_r3: Option<i8>,
        pub value_r3: Option<i64>,
        pub signature_ma_r2_r3: Option<OctetString>,
    }
}

/// Payload of a tree node, selected by a u8 tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcParValue {
    Value(Value),
    PeriodEntry(PeriodEntry),
    TupelEntry(TupelEntry),
    Time(Time),
}

impl ProcParValue {
    pub fn tag(&self) -> u8 {
        match self {
            ProcParValue::Value(_) => PROC_PAR_VALUE_TAG_VALUE,
            ProcParValue::PeriodEntry(_) => PROC_PAR_VALUE_TAG_PERIOD_ENTRY,
            ProcParValue::TupelEntry(_) => PROC_PAR_VALUE_TAG_TUPEL_ENTRY,
            ProcParValue::Time(_) => PROC_PAR_VALUE_TAG_TIME,
        }
    }
}

impl SmlDecode for ProcParValue {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        reader.read_list_header(2)?;
        let tag = reader.read_u8()?;
        match tag {
            PROC_PAR_VALUE_TAG_VALUE => Value::decode(reader).map(ProcParValue::Value),
            PROC_PAR_VALUE_TAG_PERIOD_ENTRY => {
                PeriodEntry::decode(reader).map(ProcParValue::PeriodEntry)
            }
            PROC_PAR_VALUE_TAG_TUPEL_ENTRY => {
                TupelEntry::decode(reader).map(ProcParValue::TupelEntry)
            }
            PROC_PAR_VALUE_TAG_TIME => Time::decode(reader).map(ProcParValue::Time),
            _ => Err(reader.fail(SmlError::InvalidData(format!(
                "Unknown proc parameter value tag: {}",
                tag
            )))),
        }
    }
}

impl SmlEncode for ProcParValue {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        writer.write_list_header(2)?;
        writer.write_u8(self.tag())?;
        match self {
            ProcParValue::Value(v) => v.encode(writer),
            ProcParValue::PeriodEntry(v) => v.encode(writer),
            ProcParValue::TupelEntry(v) => v.encode(writer),
            ProcParValue::Time(v) => v.encode(writer),
        }
    }
}

/// Parameter tree node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tree {
    pub parameter_name: Option<OctetString>,
    pub parameter_value: Option<ProcParValue>,
    pub child_list: Vec<Tree>,
}

impl Tree {
    pub fn new(name: impl Into<OctetString>) -> Self {
        Self {
            parameter_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: ProcParValue) -> Self {
        self.parameter_value = Some(value);
        self
    }

    pub fn with_child(mut self, child: Tree) -> Self {
        self.child_list.push(child);
        self
    }

    /// Depth-first search for the node at `path`, starting below `self`
    pub fn find(&self, path: &TreePath) -> Option<&Tree> {
        let mut node = self;
        for name in path.entries() {
            node = node
                .child_list
                .iter()
                .find(|child| child.parameter_name.as_ref() == Some(name))?;
        }
        Some(node)
    }
}

/// Node under construction and the number of children still to read
struct PendingNode {
    tree: Tree,
    children_left: usize,
}

fn decode_node_head(reader: &mut SmlReader<'_>) -> SmlResult<PendingNode> {
    reader.read_list_header(TREE_FIELDS)?;
    let parameter_name = Option::<OctetString>::decode(reader)?;
    let parameter_value = Option::<ProcParValue>::decode(reader)?;
    let children_left = if reader.skip_if_optional()? {
        0
    } else {
        reader.read_list_len()?
    };

    Ok(PendingNode {
        tree: Tree {
            parameter_name,
            parameter_value,
            child_list: Vec::new(),
        },
        children_left,
    })
}

impl SmlDecode for Tree {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        let mut stack = vec![decode_node_head(reader)?];

        while let Some(top) = stack.last_mut() {
            if top.children_left == 0 {
                let finished = match stack.pop() {
                    Some(node) => node.tree,
                    None => break,
                };
                match stack.last_mut() {
                    Some(parent) => parent.tree.child_list.push(finished),
                    None => return Ok(finished),
                }
                continue;
            }

            top.children_left -= 1;
            if reader.skip_if_optional()? {
                continue;
            }
            if stack.len() >= MAX_TREE_DEPTH {
                return Err(reader.fail(SmlError::LengthMismatch {
                    expected: MAX_TREE_DEPTH,
                    found: stack.len() + 1,
                }));
            }
            stack.push(decode_node_head(reader)?);
        }

        Err(reader.fail(SmlError::InvalidData(
            "Tree decode ended without a root".to_string(),
        )))
    }
}

impl SmlEncode for Tree {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        let mut stack = vec![self];
        while let Some(tree) = stack.pop() {
            writer.write_list_header(TREE_FIELDS)?;
            tree.parameter_name.encode(writer)?;
            tree.parameter_value.encode(writer)?;
            if tree.child_list.is_empty() {
                writer.write_optional_skipped();
            } else {
                writer.write_list_header(tree.child_list.len())?;
                stack.extend(tree.child_list.iter().rev());
            }
        }
        Ok(())
    }
}
