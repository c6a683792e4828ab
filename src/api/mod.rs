//! BeReal API module.
//!
//! This module provides:
//! - The transport abstraction used by every outbound request
//! - A reqwest-backed HTTP transport
//! - Endpoint definitions and wire types for the identity provider

pub mod endpoints;
pub mod http;
pub mod transport;
pub mod types;

pub use endpoints::{Endpoint, Host};
pub use http::HttpTransport;
pub use transport::{Credential, Download, MediaProbe, Transport};
pub use types::*;
