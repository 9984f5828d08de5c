//! OAuth 1.0a request signing (HMAC-SHA1, RFC 5849).

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::Rng;
use rand::distr::Alphanumeric;
use ring::hmac;

use crate::domain::config::Credentials;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// RFC 3986 percent-encoding: everything but `A-Z a-z 0-9 - . _ ~`.
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Joins pairs as `k=v&k=v` with both sides percent-encoded, preserving order.
pub fn encode_pairs(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Request-specific inputs to a signature.
pub struct SignatureInput<'a> {
    pub method: &'a str,
    /// Base URL without query string.
    pub url: &'a str,
    /// Query and form parameters, unencoded.
    pub params: &'a [(&'a str, String)],
    pub nonce: &'a str,
    pub timestamp: i64,
}

fn oauth_params(
    credentials: &Credentials,
    input: &SignatureInput<'_>,
) -> Vec<(&'static str, String)> {
    vec![
        ("oauth_consumer_key", credentials.consumer_key.clone()),
        ("oauth_nonce", input.nonce.to_string()),
        ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
        ("oauth_timestamp", input.timestamp.to_string()),
        ("oauth_token", credentials.access_key.clone()),
        ("oauth_version", OAUTH_VERSION.to_string()),
    ]
}

/// Normalized, sorted parameter string covering request and oauth parameters.
fn parameter_string(credentials: &Credentials, input: &SignatureInput<'_>) -> String {
    let mut encoded: Vec<(String, String)> = input
        .params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .chain(
            oauth_params(credentials, input)
                .into_iter()
                .map(|(k, v)| (encode(k), encode(&v))),
        )
        .collect();
    encoded.sort();
    encoded
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn signature(credentials: &Credentials, input: &SignatureInput<'_>) -> String {
    let base = format!(
        "{}&{}&{}",
        input.method.to_uppercase(),
        encode(input.url),
        encode(&parameter_string(credentials, input))
    );
    let signing_key = format!(
        "{}&{}",
        encode(&credentials.consumer_secret),
        encode(&credentials.access_secret)
    );
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, signing_key.as_bytes());
    STANDARD.encode(hmac::sign(&key, base.as_bytes()).as_ref())
}

/// Value for the `Authorization` header.
pub fn authorization_header(credentials: &Credentials, input: &SignatureInput<'_>) -> String {
    let mut params = oauth_params(credentials, input);
    params.push(("oauth_signature", signature(credentials, input)));
    params.sort();
    let fields = params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Published Twitter example for "Creating a signature".
    fn example() -> (Credentials, Vec<(&'static str, String)>) {
        let credentials = Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        );
        let params = vec![
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!".to_string()),
            ("include_entities", "true".to_string()),
        ];
        (credentials, params)
    }

    #[test]
    fn test_percent_encoding() {
        assert_eq!(encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(encode("An encoded string!"), "An%20encoded%20string%21");
        assert_eq!(encode("Dogs, Cats & Mice"), "Dogs%2C%20Cats%20%26%20Mice");
        assert_eq!(encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(encode("☃"), "%E2%98%83");
    }

    #[test]
    fn test_parameter_string() {
        let (credentials, params) = example();
        let input = SignatureInput {
            method: "POST",
            url: "https://api.twitter.com/1.1/statuses/update.json",
            params: &params,
            nonce: "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            timestamp: 1318622958,
        };
        assert_eq!(
            parameter_string(&credentials, &input),
            "include_entities=true&oauth_consumer_key=xvz1evFS4wEEPTGEFPHBog\
             &oauth_nonce=kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg\
             &oauth_signature_method=HMAC-SHA1&oauth_timestamp=1318622958\
             &oauth_token=370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb\
             &oauth_version=1.0\
             &status=Hello%20Ladies%20%2B%20Gentlemen%2C%20a%20signed%20OAuth%20request%21"
        );
    }

    #[test]
    fn test_signature_matches_published_example() {
        let (credentials, params) = example();
        let input = SignatureInput {
            method: "post",
            url: "https://api.twitter.com/1.1/statuses/update.json",
            params: &params,
            nonce: "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            timestamp: 1318622958,
        };
        assert_eq!(signature(&credentials, &input), "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");

        let header = authorization_header(&credentials, &input);
        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", "));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.ends_with("oauth_version=\"1.0\""));
    }

    #[test]
    fn test_nonce_shape() {
        let a = nonce();
        let b = nonce();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_encode_pairs_keeps_order() {
        let pairs = vec![("q", "big widget".to_string()), ("count", "50".to_string())];
        assert_eq!(encode_pairs(&pairs), "q=big%20widget&count=50");
    }
}
