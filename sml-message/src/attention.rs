use sml_codec::{sml_record, OctetString, Tree};

sml_record! {
    /// `SML_Attention.Res`, sent by a server to report errors or hints
    pub struct AttentionResponse {
        pub server_id: Option<OctetString>,
        /// Attention code, an OBIS-like six byte identifier
        pub attention_number: Option<OctetString>,
        pub attention_message: Option<OctetString>,
        pub attention_details: Option<Tree>,
    }
}
