//! Identity provider response types.

use serde::Deserialize;

/// Response to a passcode request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequestResponse {
    pub vonage_request_id: String,
}

/// Tokens issued after a passcode check or a refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: i64,
    #[serde(default, alias = "uid")]
    pub user_id: Option<String>,
}
