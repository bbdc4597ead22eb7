//! Session opening handshake

use sml_codec::{sml_record, OctetString, Time};

sml_record! {
    /// `SML_PublicOpen.Req`
    pub struct OpenRequest {
        pub codepage: Option<OctetString>,
        pub client_id: Option<OctetString>,
        pub req_file_id: Option<OctetString>,
        pub server_id: Option<OctetString>,
        pub username: Option<OctetString>,
        pub password: Option<OctetString>,
        pub sml_version: Option<u8>,
    }
}

sml_record! {
    /// `SML_PublicOpen.Res`
    pub struct OpenResponse {
        pub codepage: Option<OctetString>,
        pub client_id: Option<OctetString>,
        pub req_file_id: Option<OctetString>,
        pub server_id: Option<OctetString>,
        pub ref_time: Option<Time>,
        pub sml_version: Option<u8>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sml_codec::{decode_from_slice, encode_to_bytes};

    #[test]
    fn test_open_request_layout() {
        let request = OpenRequest {
            client_id: Some(OctetString::from("c")),
            req_file_id: Some(OctetString::from("f")),
            sml_version: Some(1),
            ..Default::default()
        };
        let bytes = encode_to_bytes(&request).unwrap();
        assert_eq!(
            &bytes[..],
            &[0x77, 0x01, 0x02, b'c', 0x02, b'f', 0x01, 0x01, 0x01, 0x62, 0x01]
        );
        assert_eq!(decode_from_slice::<OpenRequest>(&bytes).unwrap(), request);
    }

    #[test]
    fn test_open_response_with_dtz541_time() {
        let bytes = [
            0x76, 0x01, 0x01, 0x02, 0x33, 0x03, 0x01, 0x02, 0x65, 0x00, 0x00, 0x00, 0x2A, 0x01,
        ];
        let response: OpenResponse = decode_from_slice(&bytes).unwrap();
        assert_eq!(response.req_file_id, Some(OctetString::new(vec![0x33])));
        assert_eq!(response.server_id, Some(OctetString::new(vec![0x01, 0x02])));
        assert_eq!(response.ref_time, Some(Time::SecIndex(42)));
        assert_eq!(response.sml_version, None);
    }
}
