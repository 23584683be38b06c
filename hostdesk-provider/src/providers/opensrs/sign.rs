//! OpenSRS request signature
//!
//! `X-Signature = md5_hex(md5_hex(body + api_key) + api_key)`
//! Reference: <https://domains.opensrs.guide/docs/quickstart>

use md5::{Digest, Md5};

use super::OpensrsProvider;

fn md5_hex(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Signature over the exact request body bytes.
pub(crate) fn signature(body: &str, api_key: &str) -> String {
    let inner = md5_hex(format!("{body}{api_key}").as_bytes());
    md5_hex(format!("{inner}{api_key}").as_bytes())
}

impl OpensrsProvider {
    /// Sign a request body with this provider's API key
    pub(crate) fn sign(&self, body: &str) -> String {
        signature(body, &self.api_key)
    }
}
