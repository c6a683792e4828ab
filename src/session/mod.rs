//! Session module.
//!
//! This module provides:
//! - The persisted session record
//! - File-backed session storage with atomic writes
//! - The login / refresh state machine

pub mod manager;
pub mod model;
pub mod store;

pub use manager::{AuthState, OtpHandle, SessionManager};
pub use model::Session;
pub use store::{FileSessionStore, SessionStore};
