//! Media module.
//!
//! Provides lazy references to remote photos and videos.

pub mod lazy;

pub use lazy::LazyMediaReference;
