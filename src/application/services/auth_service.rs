//! Authentication service for admin API tokens.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI uses the
/// same function to produce `ADMIN_TOKEN_HASH`.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service for authenticating admin requests via Bearer tokens.
///
/// Only the HMAC of the admin token is configured, so the plain token never
/// sits in the environment. Comparison is constant-time.
pub struct AuthService {
    signing_secret: String,
    expected_mac: Vec<u8>,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key; must match the value used by `admin token hash`
    /// - `token_hash` - hex-encoded HMAC of the admin token
    ///
    /// # Errors
    ///
    /// Returns an error if `token_hash` is not valid hex.
    pub fn new(signing_secret: String, token_hash: &str) -> Result<Self, hex::FromHexError> {
        Ok(Self {
            signing_secret,
            expected_mac: hex::decode(token_hash)?,
        })
    }

    /// Authenticates a raw bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());

        mac.verify_slice(&self.expected_mac).map_err(|_| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid token" }))
        })
    }
}
