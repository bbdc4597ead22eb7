//! Value list exchange, the message most meters push unsolicited

use sml_codec::{sml_record, List, OctetString, Time};

sml_record! {
    /// `SML_GetList.Req`
    pub struct GetListRequest {
        pub client_id: Option<OctetString>,
        pub server_id: Option<OctetString>,
        pub username: Option<OctetString>,
        pub password: Option<OctetString>,
        pub list_name: Option<OctetString>,
    }
}

sml_record! {
    /// `SML_GetList.Res`
    pub struct GetListResponse {
        pub client_id: Option<OctetString>,
        pub server_id: Option<OctetString>,
        pub list_name: Option<OctetString>,
        pub act_sensor_time: Option<Time>,
        pub val_list: Option<List>,
        pub list_signature: Option<OctetString>,
        pub act_gateway_time: Option<Time>,
    }
}

impl GetListResponse {
    /// Entries of the value list, empty when the list was skipped
    pub fn entries(&self) -> &[sml_codec::ListEntry] {
        self.val_list.as_ref().map(|list| list.entries()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sml_codec::{decode_from_slice, Value};
    use sml_core::ObisCode;

    #[test]
    fn test_decode_get_list_response() {
        let bytes = [
            0x77, 0x01, 0x0B, 0x0A, 0x01, 0x45, 0x4D, 0x48, 0x00, 0x00, 0x7F, 0x4A, 0x1B, 0x07,
            0x01, 0x00, 0x62, 0x0A, 0xFF, 0xFF, 0x72, 0x62, 0x01, 0x65, 0x00, 0x02, 0x7E, 0x8A,
            0x71, 0x77, 0x07, 0x01, 0x00, 0x01, 0x08, 0x00, 0xFF, 0x64, 0x01, 0x01, 0x82, 0x01,
            0x62, 0x1E, 0x52, 0xFF, 0x59, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x8C, 0xA9, 0x01,
            0x01, 0x01,
        ];
        let response: GetListResponse = decode_from_slice(&bytes).unwrap();
        assert_eq!(response.client_id, None);
        assert_eq!(
            response.server_id.as_ref().map(|id| id.to_hex()),
            Some("0a01454d4800007f4a1b".to_string())
        );
        assert_eq!(response.act_sensor_time, Some(Time::SecIndex(0x00027E8A)));

        let entries = response.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].obis(), Some(ObisCode::ENERGY_IMPORT_TOTAL));
        assert_eq!(entries[0].value, Some(Value::I64(0x0C8CA9)));
        assert_eq!(entries[0].scaled_value(), Some(82244.1));
        assert_eq!(response.act_gateway_time, None);
    }
}
