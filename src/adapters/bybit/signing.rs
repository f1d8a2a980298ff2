//! Bybit v5 request signing
//!
//! Signature = lowercase hex HMAC-SHA256 of
//! `timestamp + api_key + recv_window + payload`, where payload is the
//! query string for GET and the raw JSON body for POST.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_API_KEY: &str = "X-BAPI-API-KEY";
pub const HEADER_TIMESTAMP: &str = "X-BAPI-TIMESTAMP";
pub const HEADER_SIGN: &str = "X-BAPI-SIGN";
pub const HEADER_RECV_WINDOW: &str = "X-BAPI-RECV-WINDOW";

/// Headers attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub api_key: String,
    pub timestamp: String,
    pub signature: String,
    pub recv_window: String,
}

impl SignedHeaders {
    /// Header name/value pairs in the order Bybit documents them
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            (HEADER_API_KEY, self.api_key.as_str()),
            (HEADER_TIMESTAMP, self.timestamp.as_str()),
            (HEADER_SIGN, self.signature.as_str()),
            (HEADER_RECV_WINDOW, self.recv_window.as_str()),
        ]
    }
}

/// Compute the hex signature for one request
pub fn sign_payload(
    api_secret: &str,
    api_key: &str,
    timestamp_ms: u64,
    recv_window_ms: u64,
    payload: &str,
) -> ExchangeResult<String> {
    let mut mac = HmacSha256::new_from_slice(api_secret.as_bytes())
        .map_err(|e| ExchangeError::AuthenticationFailed(format!("Invalid API secret: {}", e)))?;
    mac.update(timestamp_ms.to_string().as_bytes());
    mac.update(api_key.as_bytes());
    mac.update(recv_window_ms.to_string().as_bytes());
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Sign a payload and package the four auth headers
pub fn signed_headers(
    api_key: &str,
    api_secret: &str,
    timestamp_ms: u64,
    recv_window_ms: u64,
    payload: &str,
) -> ExchangeResult<SignedHeaders> {
    let signature = sign_payload(api_secret, api_key, timestamp_ms, recv_window_ms, payload)?;
    Ok(SignedHeaders {
        api_key: api_key.to_string(),
        timestamp: timestamp_ms.to_string(),
        signature,
        recv_window: recv_window_ms.to_string(),
    })
}
