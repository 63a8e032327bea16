//! Session tokens.
//!
//! A token is the standard base64 encoding of the username. It identifies a
//! user for the mock backend and carries no secret.

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD as BASE64_STANDARD},
        DecodePaddingMode,
    },
    Engine,
};

/// Decoding accepts tokens with or without `=` padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

pub fn encode_token(username: &str) -> String {
    BASE64_STANDARD.encode(username.as_bytes())
}

/// Returns `None` when the token is not base64 or not UTF-8.
pub fn decode_token(token: &str) -> Option<String> {
    let bytes = LENIENT.decode(token.trim()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Pulls the token out of an `Authorization` header value.
pub fn bearer_token(header: &str) -> &str {
    header.strip_prefix("Bearer ").unwrap_or(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_base64_of_username() {
        assert_eq!(encode_token("demo"), "ZGVtbw==");
        assert_eq!(decode_token("ZGVtbw==").as_deref(), Some("demo"));
    }

    #[test]
    fn padding_is_optional() {
        assert_eq!(decode_token("ZGVtbw").as_deref(), Some("demo"));
        assert_eq!(decode_token("YWxpY2U").as_deref(), Some("alice"));
    }

    #[test]
    fn garbage_does_not_decode() {
        assert_eq!(decode_token("not base64!"), None);
        assert_eq!(decode_token("/w=="), None);
    }

    #[test]
    fn bearer_prefix_is_optional() {
        assert_eq!(bearer_token("Bearer abc"), "abc");
        assert_eq!(bearer_token("abc"), "abc");
    }
}
