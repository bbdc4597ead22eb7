//! Parameter tree access

use sml_codec::{sml_record, OctetString, Tree, TreePath};

sml_record! {
    /// `SML_GetProcParameter.Req`
    pub struct GetProcParameterRequest {
        pub server_id: Option<OctetString>,
        pub username: Option<OctetString>,
        pub password: Option<OctetString>,
        pub parameter_tree_path: Option<TreePath>,
        pub attribute: Option<OctetString>,
    }
}

sml_record! {
    /// `SML_GetProcParameter.Res`
    pub struct GetProcParameterResponse {
        pub server_id: Option<OctetString>,
        pub parameter_tree_path: Option<TreePath>,
        pub parameter_tree: Option<Tree>,
    }
}

sml_record! {
    /// `SML_SetProcParameter.Req`
    pub struct SetProcParameterRequest {
        pub server_id: Option<OctetString>,
        pub username: Option<OctetString>,
        pub password: Option<OctetString>,
        pub parameter_tree_path: Option<TreePath>,
        pub parameter_tree: Option<Tree>,
    }
}
