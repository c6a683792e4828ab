//! Login and token refresh state machine.

use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::Method;
use serde_json::{json, Value};

use crate::api::endpoints::{self, Endpoint};
use crate::api::{OtpRequestResponse, TokenResponse, Transport};
use crate::config::validation::{validate_otp_code, validate_phone_number};
use crate::error::{Error, Result, TransportError};
use crate::session::model::Session;
use crate::session::store::SessionStore;

/// Opaque handle tying a passcode check to the request that sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpHandle {
    request_id: String,
    device_id: String,
}

/// Where the login flow currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    NoSession,
    OtpPending(OtpHandle),
    Authenticated(Session),
}

/// Owns the session and is the only code that replaces it.
pub struct SessionManager<S: SessionStore> {
    transport: Arc<dyn Transport>,
    store: S,
    state: AuthState,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(transport: Arc<dyn Transport>, store: S) -> Self {
        Self {
            transport,
            store,
            state: AuthState::NoSession,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current session, if authenticated.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    fn current(&self) -> Result<&Session> {
        self.session().ok_or(Error::NoSession)
    }

    /// Load the stored session into memory.
    pub fn load(&mut self) -> Result<&Session> {
        let session = self.store.load()?;
        tracing::debug!("Loaded session for {}", session.identity_id);
        self.state = AuthState::Authenticated(session);
        self.current()
    }

    /// Write the current session through to the store.
    pub fn persist(&self) -> Result<()> {
        self.store.persist(self.current()?)
    }

    /// Return a valid session, refreshing it once if it has expired.
    pub async fn ensure_authenticated(&mut self) -> Result<&Session> {
        if self.session().is_none() {
            self.load()?;
        }

        if self.current()?.is_expired() {
            tracing::info!("Session expired, refreshing tokens");
            return self.refresh().await;
        }

        self.current()
    }

    /// Exchange the refresh token for a new session, persisting it before returning.
    pub async fn refresh(&mut self) -> Result<&Session> {
        if self.session().is_none() {
            self.load()?;
        }
        let current = self.current()?;

        let body = json!({
            "grant_type": "refresh_token",
            "client_id": endpoints::CLIENT_ID,
            "refresh_token": current.refresh_token,
        });
        let response = self
            .transport
            .request(
                Method::POST,
                &Endpoint::auth(endpoints::REFRESH_TOKEN),
                None,
                Some(&body),
            )
            .await
            .map_err(|e| match e {
                TransportError::Unauthorized
                | TransportError::BadRequest(_)
                | TransportError::NotFound => Error::AuthExpired(e.to_string()),
                TransportError::RateLimited => Error::RateLimited,
                other => Error::Transport(other),
            })?;

        let tokens: TokenResponse = decode(response, "token refresh")?;
        let session = Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            identity_id: tokens
                .user_id
                .unwrap_or_else(|| current.identity_id.clone()),
            expiry_timestamp: Utc::now() + Duration::seconds(tokens.expires_in),
            device_id: current.device_id.clone(),
        };

        self.store.persist(&session)?;
        tracing::debug!("Session refreshed, valid until {}", session.expiry_timestamp);
        self.state = AuthState::Authenticated(session);
        self.current()
    }

    /// Ask the provider to text a one-time passcode to `phone_number`.
    ///
    /// Any session held in memory is dropped; the stored one is only replaced
    /// once `complete_login` succeeds.
    pub async fn begin_login(&mut self, phone_number: &str) -> Result<OtpHandle> {
        let phone_number = validate_phone_number(phone_number)?;
        self.state = AuthState::NoSession;

        let device_id = uuid::Uuid::new_v4().to_string();
        let body = json!({
            "phoneNumber": phone_number,
            "deviceId": device_id,
        });
        let response = self
            .transport
            .request(
                Method::POST,
                &Endpoint::auth(endpoints::REQUEST_OTP),
                None,
                Some(&body),
            )
            .await
            .map_err(|e| match e {
                TransportError::RateLimited => Error::RateLimited,
                TransportError::BadRequest(_)
                | TransportError::Unauthorized
                | TransportError::NotFound => {
                    Error::InvalidPhone(format!("{} ({})", phone_number, e))
                }
                other => Error::Transport(other),
            })?;

        let otp: OtpRequestResponse = decode(response, "passcode request")?;
        let handle = OtpHandle {
            request_id: otp.vonage_request_id,
            device_id,
        };
        self.state = AuthState::OtpPending(handle.clone());
        Ok(handle)
    }

    /// Exchange the passcode for a session and persist it.
    pub async fn complete_login(&mut self, handle: &OtpHandle, otp_code: &str) -> Result<&Session> {
        let otp_code = otp_code.trim();
        validate_otp_code(otp_code)?;

        let body = json!({
            "vonageRequestId": handle.request_id,
            "code": otp_code,
            "deviceId": handle.device_id,
        });
        let response = self
            .transport
            .request(
                Method::POST,
                &Endpoint::auth(endpoints::VERIFY_OTP),
                None,
                Some(&body),
            )
            .await
            .map_err(|e| match e {
                TransportError::RateLimited => Error::RateLimited,
                TransportError::BadRequest(_)
                | TransportError::Unauthorized
                | TransportError::NotFound => Error::InvalidOtp(e.to_string()),
                other => Error::Transport(other),
            })?;

        let tokens: TokenResponse = decode(response, "passcode check")?;
        let identity_id = tokens
            .user_id
            .ok_or_else(|| Error::Api("passcode check returned no user id".into()))?;

        let session = Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            identity_id,
            expiry_timestamp: Utc::now() + Duration::seconds(tokens.expires_in),
            device_id: handle.device_id.clone(),
        };

        self.store.persist(&session)?;
        tracing::info!("Logged in as {}", session.identity_id);
        self.state = AuthState::Authenticated(session);
        self.current()
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::Api(format!("Failed to parse {} response: {}", what, e)))
}
