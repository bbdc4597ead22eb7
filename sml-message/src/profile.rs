//! Load profile requests and responses

use sml_codec::{sml_record, OctetString, PeriodEntry, Time, Tree, TreePath, Value};

sml_record! {
    /// Request body shared by `SML_GetProfilePack.Req` and
    /// `SML_GetProfileList.Req`
    pub struct GetProfileRequest {
        pub server_id: Option<OctetString>,
        pub username: Option<OctetString>,
        pub password: Option<OctetString>,
        pub with_rawdata: Option<bool>,
        pub begin_time: Option<Time>,
        pub end_time: Option<Time>,
        pub parameter_tree_path: Option<TreePath>,
        pub object_list: Option<Vec<OctetString>>,
        pub das_details: Option<Tree>,
    }
}

pub type GetProfilePackRequest = GetProfileRequest;
pub type GetProfileListRequest = GetProfileRequest;

sml_record! {
    /// Column description of a profile pack
    pub struct ProfObjHeaderEntry {
        pub obj_name: Option<OctetString>,
        pub unit: Option<u8>,
        pub scaler: Option<i8>,
    }
}

sml_record! {
    pub struct ValueEntry {
        pub value: Option<Value>,
        pub value_signature: Option<OctetString>,
    }
}

sml_record! {
    /// One capture period of a profile pack, values ordered as the headers
    pub struct ProfObjPeriodEntry {
        pub val_time: Option<Time>,
        pub status: Option<u64>,
        pub value_list: Option<Vec<ValueEntry>>,
        pub period_signature: Option<OctetString>,
    }
}

sml_record! {
    /// `SML_GetProfilePack.Res`
    pub struct GetProfilePackResponse {
        pub server_id: Option<OctetString>,
        pub act_time: Option<Time>,
        pub reg_period: Option<u32>,
        pub parameter_tree_path: Option<TreePath>,
        pub header_list: Option<Vec<ProfObjHeaderEntry>>,
        pub period_list: Option<Vec<ProfObjPeriodEntry>>,
        pub rawdata: Option<OctetString>,
        pub profile_signature: Option<OctetString>,
    }
}

sml_record! {
    /// `SML_GetProfileList.Res`
    pub struct GetProfileListResponse {
        pub server_id: Option<OctetString>,
        pub act_time: Option<Time>,
        pub reg_period: Option<u32>,
        pub parameter_tree_path: Option<TreePath>,
        pub val_time: Option<Time>,
        pub status: Option<u64>,
        pub period_list: Option<Vec<PeriodEntry>>,
        pub rawdata: Option<OctetString>,
        pub period_signature: Option<OctetString>,
    }
}
