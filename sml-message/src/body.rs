//! Message body dispatch by tag

use crate::attention::AttentionResponse;
use crate::close::{CloseRequest, CloseResponse};
use crate::get_list::{GetListRequest, GetListResponse};
use crate::open::{OpenRequest, OpenResponse};
use crate::proc_parameter::{
    GetProcParameterRequest, GetProcParameterResponse, SetProcParameterRequest,
};
use crate::profile::{GetProfileRequest, GetProfileListResponse, GetProfilePackResponse};
use serde::{Deserialize, Serialize};
use sml_codec::{OctetString, SmlDecode, SmlEncode, SmlReader, SmlWriter};
use sml_core::{SmlError, SmlResult};

/// Message body tags
///
/// Each SML message kind has a unique 32-bit tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageTag {
    OpenRequest = 0x0000_0100,
    OpenResponse = 0x0000_0101,
    CloseRequest = 0x0000_0200,
    CloseResponse = 0x0000_0201,
    GetProfilePackRequest = 0x0000_0300,
    GetProfilePackResponse = 0x0000_0301,
    GetProfileListRequest = 0x0000_0400,
    GetProfileListResponse = 0x0000_0401,
    GetProcParameterRequest = 0x0000_0500,
    GetProcParameterResponse = 0x0000_0501,
    SetProcParameterRequest = 0x0000_0600,
    GetListRequest = 0x0000_0700,
    GetListResponse = 0x0000_0701,
    AttentionResponse = 0x0000_FF01,
}

impl MessageTag {
    /// Create from the wire value
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0x0100 => Some(Self::OpenRequest),
            0x0101 => Some(Self::OpenResponse),
            0x0200 => Some(Self::CloseRequest),
            0x0201 => Some(Self::CloseResponse),
            0x0300 => Some(Self::GetProfilePackRequest),
            0x0301 => Some(Self::GetProfilePackResponse),
            0x0400 => Some(Self::GetProfileListRequest),
            0x0401 => Some(Self::GetProfileListResponse),
            0x0500 => Some(Self::GetProcParameterRequest),
            0x0501 => Some(Self::GetProcParameterResponse),
            0x0600 => Some(Self::SetProcParameterRequest),
            0x0700 => Some(Self::GetListRequest),
            0x0701 => Some(Self::GetListResponse),
            0xFF01 => Some(Self::AttentionResponse),
            _ => None,
        }
    }

    /// Get the wire value
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}

/// Body of one message, one variant per message kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageBody {
    OpenRequest(OpenRequest),
    OpenResponse(OpenResponse),
    CloseRequest(CloseRequest),
    CloseResponse(CloseResponse),
    GetProfilePackRequest(GetProfileRequest),
    GetProfilePackResponse(GetProfilePackResponse),
    GetProfileListRequest(GetProfileRequest),
    GetProfileListResponse(GetProfileListResponse),
    GetProcParameterRequest(GetProcParameterRequest),
    GetProcParameterResponse(GetProcParameterResponse),
    SetProcParameterRequest(SetProcParameterRequest),
    GetListRequest(GetListRequest),
    GetListResponse(GetListResponse),
    AttentionResponse(AttentionResponse),
    /// Body with an unsupported tag; `raw` holds its undecoded wire bytes
    Unknown { tag: u32, raw: OctetString },
}

impl MessageBody {
    pub fn tag(&self) -> u32 {
        match self {
            MessageBody::OpenRequest(_) => MessageTag::OpenRequest.to_u32(),
            MessageBody::OpenResponse(_) => MessageTag::OpenResponse.to_u32(),
            MessageBody::CloseRequest(_) => MessageTag::CloseRequest.to_u32(),
            MessageBody::CloseResponse(_) => MessageTag::CloseResponse.to_u32(),
            MessageBody::GetProfilePackRequest(_) => MessageTag::GetProfilePackRequest.to_u32(),
            MessageBody::GetProfilePackResponse(_) => {
                MessageTag::GetProfilePackResponse.to_u32()
            }
            MessageBody::GetProfileListRequest(_) => MessageTag::GetProfileListRequest.to_u32(),
            MessageBody::GetProfileListResponse(_) => {
                MessageTag::GetProfileListResponse.to_u32()
            }
            MessageBody::GetProcParameterRequest(_) => {
                MessageTag::GetProcParameterRequest.to_u32()
            }
            MessageBody::GetProcParameterResponse(_) => {
                MessageTag::GetProcParameterResponse.to_u32()
            }
            MessageBody::SetProcParameterRequest(_) => {
                MessageTag::SetProcParameterRequest.to_u32()
            }
            MessageBody::GetListRequest(_) => MessageTag::GetListRequest.to_u32(),
            MessageBody::GetListResponse(_) => MessageTag::GetListResponse.to_u32(),
            MessageBody::AttentionResponse(_) => MessageTag::AttentionResponse.to_u32(),
            MessageBody::Unknown { tag, .. } => *tag,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MessageBody::OpenRequest(_) => "OpenRequest",
            MessageBody::OpenResponse(_) => "OpenResponse",
            MessageBody::CloseRequest(_) => "CloseRequest",
            MessageBody::CloseResponse(_) => "CloseResponse",
            MessageBody::GetProfilePackRequest(_) => "GetProfilePackRequest",
            MessageBody::GetProfilePackResponse(_) => "GetProfilePackResponse",
            MessageBody::GetProfileListRequest(_) => "GetProfileListRequest",
            MessageBody::GetProfileListResponse(_) => "GetProfileListResponse",
            MessageBody::GetProcParameterRequest(_) => "GetProcParameterRequest",
            MessageBody::GetProcParameterResponse(_) => "GetProcParameterResponse",
            MessageBody::SetProcParameterRequest(_) => "SetProcParameterRequest",
            MessageBody::GetListRequest(_) => "GetListRequest",
            MessageBody::GetListResponse(_) => "GetListResponse",
            MessageBody::AttentionResponse(_) => "AttentionResponse",
            MessageBody::Unknown { .. } => "Unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, MessageBody::Unknown { .. })
    }

    pub fn as_open_request(&self) -> Option<&OpenRequest> {
        match self {
            MessageBody::OpenRequest(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_open_response(&self) -> Option<&OpenResponse> {
        match self {
            MessageBody::OpenResponse(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_close_request(&self) -> Option<&CloseRequest> {
        match self {
            MessageBody::CloseRequest(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_close_response(&self) -> Option<&CloseResponse> {
        match self {
            MessageBody::CloseResponse(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_get_profile_pack_request(&self) -> Option<&GetProfileRequest> {
        match self {
            MessageBody::GetProfilePackRequest(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_get_profile_pack_response(&self) -> Option<&GetProfilePackResponse> {
        match self {
            MessageBody::GetProfilePackResponse(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_get_profile_list_request(&self) -> Option<&GetProfileRequest> {
        match self {
            MessageBody::GetProfileListRequest(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_get_profile_list_response(&self) -> Option<&GetProfileListResponse> {
        match self {
            MessageBody::GetProfileListResponse(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_get_proc_parameter_request(&self) -> Option<&GetProcParameterRequest> {
        match self {
            MessageBody::GetProcParameterRequest(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_get_proc_parameter_response(&self) -> Option<&GetProcParameterResponse> {
        match self {
            MessageBody::GetProcParameterResponse(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_set_proc_parameter_request(&self) -> Option<&SetProcParameterRequest> {
        match self {
            MessageBody::SetProcParameterRequest(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_get_list_request(&self) -> Option<&GetListRequest> {
        match self {
            MessageBody::GetListRequest(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_get_list_response(&self) -> Option<&GetListResponse> {
        match self {
            MessageBody::GetListResponse(body) => Some(body),
            _ => None,
        }
    }

    pub fn as_attention_response(&self) -> Option<&AttentionResponse> {
        match self {
            MessageBody::AttentionResponse(body) => Some(body),
            _ => None,
        }
    }
}

impl SmlDecode for MessageBody {
    fn decode(reader: &mut SmlReader<'_>) -> SmlResult<Self> {
        reader.read_list_header(2)?;
        let tag = reader.read_u32()?;

        let Some(known) = MessageTag::from_u32(tag) else {
            let start = reader.position();
            reader.skip_element()?;
            let raw = OctetString::from(reader.consumed_since(start));
            log::warn!(
                "message type 0x{:04X} not implemented, skipped {} bytes",
                tag,
                raw.len()
            );
            return Ok(MessageBody::Unknown { tag, raw });
        };

        let body = match known {
            MessageTag::OpenRequest => MessageBody::OpenRequest(SmlDecode::decode(reader)?),
            MessageTag::OpenResponse => MessageBody::OpenResponse(SmlDecode::decode(reader)?),
            MessageTag::CloseRequest => MessageBody::CloseRequest(SmlDecode::decode(reader)?),
            MessageTag::CloseResponse => MessageBody::CloseResponse(SmlDecode::decode(reader)?),
            MessageTag::GetProfilePackRequest => {
                MessageBody::GetProfilePackRequest(SmlDecode::decode(reader)?)
            }
            MessageTag::GetProfilePackResponse => {
                MessageBody::GetProfilePackResponse(SmlDecode::decode(reader)?)
            }
            MessageTag::GetProfileListRequest => {
                MessageBody::GetProfileListRequest(SmlDecode::decode(reader)?)
            }
            MessageTag::GetProfileListResponse => {
                MessageBody::GetProfileListResponse(SmlDecode::decode(reader)?)
            }
            MessageTag::GetProcParameterRequest => {
                MessageBody::GetProcParameterRequest(SmlDecode::decode(reader)?)
            }
            MessageTag::GetProcParameterResponse => {
                MessageBody::GetProcParameterResponse(SmlDecode::decode(reader)?)
            }
            MessageTag::SetProcParameterRequest => {
                MessageBody::SetProcParameterRequest(SmlDecode::decode(reader)?)
            }
            MessageTag::GetListRequest => MessageBody::GetListRequest(SmlDecode::decode(reader)?),
            MessageTag::GetListResponse => {
                MessageBody::GetListResponse(SmlDecode::decode(reader)?)
            }
            MessageTag::AttentionResponse => {
                MessageBody::AttentionResponse(SmlDecode::decode(reader)?)
            }
        };
        Ok(body)
    }
}

impl SmlEncode for MessageBody {
    fn encode(&self, writer: &mut SmlWriter) -> SmlResult<()> {
        if let MessageBody::Unknown { tag, raw } = self {
            if raw.is_empty() {
                return Err(SmlError::UnknownMessageTag(*tag));
            }
        }

        writer.write_list_header(2)?;
        writer.write_u32(self.tag())?;
        match self {
            MessageBody::OpenRequest(body) => body.encode(writer),
            MessageBody::OpenResponse(body) => body.encode(writer),
            MessageBody::CloseRequest(body) => body.encode(writer),
            MessageBody::CloseResponse(body) => body.encode(writer),
            MessageBody::GetProfilePackRequest(body) => body.encode(writer),
            MessageBody::GetProfilePackResponse(body) => body.encode(writer),
            MessageBody::GetProfileListRequest(body) => body.encode(writer),
            MessageBody::GetProfileListResponse(body) => body.encode(writer),
            MessageBody::GetProcParameterRequest(body) => body.encode(writer),
            MessageBody::GetProcParameterResponse(body) => body.encode(writer),
            MessageBody::SetProcParameterRequest(body) => body.encode(writer),
            MessageBody::GetListRequest(body) => body.encode(writer),
            MessageBody::GetListResponse(body) => body.encode(writer),
            MessageBody::AttentionResponse(body) => body.encode(writer),
            MessageBody::Unknown { raw, .. } => {
                writer.write_raw(raw);
                Ok(())
            }
        }
    }
}
