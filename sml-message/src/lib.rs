//! SML message layer
//!
//! This crate provides the message bodies of SML 1.04, the message
//! envelope with its checksum, and the message file:
//! - `open` / `close`: session handshake bodies
//! - `get_list`: value lists pushed by most meters
//! - `profile`: load profile requests and responses
//! - `proc_parameter`: parameter tree access
//! - `attention`: error and hint responses
//! - `body`: tag dispatch over all of the above

pub mod attention;
pub mod body;
pub mod close;
pub mod file;
pub mod get_list;
pub mod message;
pub mod open;
pub mod proc_parameter;
pub mod profile;

pub use attention::AttentionResponse;
pub use body::{MessageBody, MessageTag};
pub use close::{CloseRequest, CloseResponse};
pub use file::File;
pub use get_list::{GetListRequest, GetListResponse};
pub use message::Message;
pub use open::{OpenRequest, OpenResponse};
pub use proc_parameter::{GetProcParameterRequest, GetProcParameterResponse, SetProcParameterRequest};
pub use profile::{
    GetProfileListRequest, GetProfileListResponse, GetProfilePackRequest, GetProfilePackResponse,
    GetProfileRequest, ProfObjHeaderEntry, ProfObjPeriodEntry, ValueEntry,
};
