//! Persisted session record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::Credential;

/// Refresh this long before the provider-reported expiry.
const EXPIRY_LEEWAY_SECONDS: i64 = 60;

/// Authentication state persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub identity_id: String,
    pub expiry_timestamp: DateTime<Utc>,
    /// Device identifier generated at login and sent with every request.
    #[serde(default)]
    pub device_id: String,
}

impl Session {
    /// Whether the access token must be refreshed before use at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_LEEWAY_SECONDS) >= self.expiry_timestamp
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Credential for outbound requests.
    pub fn credential(&self) -> Credential<'_> {
        Credential {
            access_token: &self.access_token,
            device_id: &self.device_id,
        }
    }
}
