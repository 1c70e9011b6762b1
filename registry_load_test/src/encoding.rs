//! Identifier and query encodings used when addressing the registry.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use url::form_urlencoded;

use crate::error::EncodingError;

/// How a shell id is placed into the read-back URL path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdEncoding {
    /// The id is used verbatim (legacy `/registry` API)
    Raw,
    /// URL-safe base64 with padding (v3 API)
    Base64Url,
}

impl IdEncoding {
    pub fn encode(self, id: &str) -> String {
        match self {
            IdEncoding::Raw => id.to_string(),
            IdEncoding::Base64Url => URL_SAFE.encode(id.as_bytes()),
        }
    }

    pub fn decode(self, encoded: &str) -> Result<String, EncodingError> {
        match self {
            IdEncoding::Raw => Ok(encoded.to_string()),
            IdEncoding::Base64Url => {
                let bytes = URL_SAFE.decode(encoded)?;
                Ok(String::from_utf8(bytes)?)
            }
        }
    }
}

/// Form-style percent-encoding of a single query value.
///
/// Spaces become `+`; everything outside `[A-Za-z0-9*-._]` is `%XX` escaped.
pub fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64url_matches_registry_encoding() {
        let id = "11111111-1111-1111-1111-111111111111";
        assert_eq!(
            IdEncoding::Base64Url.encode(id),
            "MTExMTExMTEtMTExMS0xMTExLTExMTEtMTExMTExMTExMTEx"
        );
    }

    #[test]
    fn base64url_uses_url_safe_alphabet_with_padding() {
        assert_eq!(IdEncoding::Base64Url.encode("urn:uuid:???"), "dXJuOnV1aWQ6Pz8_");
        assert_eq!(IdEncoding::Base64Url.encode("a>b?c~"), "YT5iP2N-");
        assert_eq!(IdEncoding::Base64Url.encode("urn:uuid:a?b>c"), "dXJuOnV1aWQ6YT9iPmM=");
    }

    #[test]
    fn encodings_round_trip() {
        for id in [
            "11111111-1111-1111-1111-111111111111",
            "urn:uuid:???",
            "shell?>>>",
            "",
        ] {
            for encoding in [IdEncoding::Raw, IdEncoding::Base64Url] {
                let encoded = encoding.encode(id);
                assert_eq!(encoding.decode(&encoded).unwrap(), id);
            }
        }
    }

    #[test]
    fn raw_encoding_is_identity() {
        let id = "4a738a24-b7d8-4989-9cd6-387772f40565";
        assert_eq!(IdEncoding::Raw.encode(id), id);
    }

    #[test]
    fn base64url_decode_rejects_garbage() {
        assert!(IdEncoding::Base64Url.decode("not base64!").is_err());
    }

    #[test]
    fn query_value_is_form_encoded() {
        assert_eq!(
            encode_query_value(r#"[{"key":"MaterialId","value":"abc"}]"#),
            "%5B%7B%22key%22%3A%22MaterialId%22%2C%22value%22%3A%22abc%22%7D%5D"
        );
        assert_eq!(encode_query_value("a b"), "a+b");
    }
}
