//! Pusher REST request signing.
//!
//! Requests carry `auth_key`, `auth_timestamp`, `auth_version` and
//! `body_md5` query parameters; `auth_signature` is the hex HMAC-SHA256 of
//! `METHOD\nPATH\nsorted-query` keyed with the app secret.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const AUTH_VERSION: &str = "1.0";

pub fn body_md5(body: &[u8]) -> String {
    hex::encode(Md5::digest(body))
}

pub fn compute_hmac_sha256(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// `METHOD\nPATH\nk1=v1&k2=v2`, keys in lexical order
pub fn string_to_sign(method: &str, path: &str, params: &BTreeMap<String, String>) -> String {
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}\n{}\n{}", method.to_ascii_uppercase(), path, query)
}

/// Query parameters for a signed request, `auth_signature` included
pub fn signed_query(
    key: &str,
    secret: &str,
    method: &str,
    path: &str,
    body: &[u8],
    timestamp: i64,
) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    params.insert("auth_key".to_string(), key.to_string());
    params.insert("auth_timestamp".to_string(), timestamp.to_string());
    params.insert("auth_version".to_string(), AUTH_VERSION.to_string());
    params.insert("body_md5".to_string(), body_md5(body));

    let signature = compute_hmac_sha256(
        secret.as_bytes(),
        string_to_sign(method, path, &params).as_bytes(),
    );
    params.insert("auth_signature".to_string(), signature);
    params
}
