//! Scripted transport and in-memory session store for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde_json::Value;

use crate::api::{Credential, Download, Endpoint, MediaProbe, Transport};
use crate::error::{Result, TransportError};
use crate::session::{Session, SessionStore};

/// A request seen by the fake transport.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorized: bool,
    pub body: Option<Value>,
}

/// Transport answering from queued responses keyed by endpoint path.
///
/// Unscripted requests, downloads and probes answer `NotFound`.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<HashMap<String, VecDeque<std::result::Result<Value, TransportError>>>>,
    media: Mutex<HashMap<String, Download>>,
    probes: Mutex<HashMap<String, MediaProbe>>,
    requests: Mutex<Vec<RecordedRequest>>,
    downloads: Mutex<Vec<String>>,
    probed: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, path: &str, response: std::result::Result<Value, TransportError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn respond(&self, path: &str, value: Value) {
        self.push(path, Ok(value));
    }

    pub fn fail(&self, path: &str, error: TransportError) {
        self.push(path, Err(error));
    }

    /// Serve `bytes` for `url` and make it exist for probes.
    pub fn add_media(&self, url: &str, bytes: &[u8], content_type: Option<&str>) {
        self.media.lock().unwrap().insert(
            url.to_string(),
            Download {
                bytes: bytes.to_vec(),
                content_type: content_type.map(str::to_string),
            },
        );
        self.probes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert_with(|| MediaProbe {
                content_type: content_type.map(str::to_string),
                content_length: Some(bytes.len() as u64),
                ..MediaProbe::default()
            });
    }

    pub fn add_probe(&self, url: &str, last_modified: Option<DateTime<Utc>>) {
        self.probes.lock().unwrap().insert(
            url.to_string(),
            MediaProbe {
                last_modified,
                ..MediaProbe::default()
            },
        );
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    pub fn total_requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn was_authorized(&self, path: &str) -> bool {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.path == path && r.authorized)
    }

    pub fn last_body(&self, path: &str) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.path == path)
            .and_then(|r| r.body.clone())
    }

    pub fn download_count(&self, url: &str) -> usize {
        self.downloads
            .lock()
            .unwrap()
            .iter()
            .filter(|u| *u == url)
            .count()
    }

    pub fn total_downloads(&self) -> usize {
        self.downloads.lock().unwrap().len()
    }

    pub fn probe_count(&self, url: &str) -> usize {
        self.probed
            .lock()
            .unwrap()
            .iter()
            .filter(|u| *u == url)
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &Endpoint,
        credential: Option<Credential<'_>>,
        body: Option<&Value>,
    ) -> std::result::Result<Value, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: endpoint.path.clone(),
            authorized: credential.is_some(),
            body: body.cloned(),
        });

        self.responses
            .lock()
            .unwrap()
            .get_mut(&endpoint.path)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Err(TransportError::NotFound))
    }

    async fn download(&self, url: &str) -> std::result::Result<Download, TransportError> {
        self.downloads.lock().unwrap().push(url.to_string());
        self.media
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or(TransportError::NotFound)
    }

    async fn probe(&self, url: &str) -> std::result::Result<MediaProbe, TransportError> {
        self.probed.lock().unwrap().push(url.to_string());
        self.probes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or(TransportError::NotFound)
    }
}

/// Session store kept in memory, counting writes.
#[derive(Default)]
pub struct MemoryStore {
    session: Mutex<Option<Session>>,
    persists: Mutex<usize>,
}

impl MemoryStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            persists: Mutex::new(0),
        }
    }

    pub fn persist_count(&self) -> usize {
        *self.persists.lock().unwrap()
    }

    pub fn stored(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Session> {
        self.stored().ok_or(crate::error::Error::NoSession)
    }

    fn persist(&self, session: &Session) -> Result<()> {
        *self.session.lock().unwrap() = Some(session.clone());
        *self.persists.lock().unwrap() += 1;
        Ok(())
    }
}

/// A session valid for another hour.
pub fn test_session() -> Session {
    Session {
        access_token: "access".into(),
        refresh_token: "refresh".into(),
        identity_id: "me".into(),
        expiry_timestamp: Utc::now() + Duration::hours(1),
        device_id: "device".into(),
    }
}
