use sml_codec::{sml_record, OctetString};

sml_record! {
    /// `SML_PublicClose.Req`
    pub struct CloseRequest {
        pub global_signature: Option<OctetString>,
    }
}

sml_record! {
    /// `SML_PublicClose.Res`
    pub struct CloseResponse {
        pub global_signature: Option<OctetString>,
    }
}
