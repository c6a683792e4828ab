//! Path templates.
//!
//! Provides:
//! - Parsing of `{name}` placeholder templates
//! - Concrete and deferred (memoized) field values
//! - Two-pass resolution that only runs deferred fields the template references

pub mod fields;
pub mod parse;
pub mod resolve;

pub use fields::{Deferred, Field, Fields};
pub use parse::{Segment, Template};
pub use resolve::{resolve, Staged};
