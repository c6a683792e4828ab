//! Field values available to a template.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::OnceCell;

use crate::error::Result;

type Thunk<'a> = Box<dyn Fn() -> BoxFuture<'a, Result<String>> + Send + Sync + 'a>;

/// A value that costs a network round trip, computed at most once.
pub struct Deferred<'a> {
    thunk: Thunk<'a>,
    value: OnceCell<String>,
}

impl<'a> Deferred<'a> {
    pub fn new<F, Fut>(provider: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = Result<String>> + Send + 'a,
    {
        Self {
            thunk: Box::new(move || provider().boxed()),
            value: OnceCell::new(),
        }
    }

    /// Run the provider on first use and return the cached value afterwards.
    pub async fn get(&self) -> Result<&str> {
        self.value
            .get_or_try_init(|| (self.thunk)())
            .await
            .map(String::as_str)
    }

    pub fn is_resolved(&self) -> bool {
        self.value.initialized()
    }
}

impl fmt::Debug for Deferred<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("value", &self.value.get())
            .finish()
    }
}

/// A field is either known up front or deferred.
#[derive(Debug)]
pub enum Field<'a> {
    Value(String),
    Deferred(Deferred<'a>),
}

/// Named fields for one template resolution.
#[derive(Debug, Default)]
pub struct Fields<'a> {
    map: BTreeMap<String, Field<'a>>,
}

impl<'a> Fields<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a concrete value.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.map.insert(name.to_string(), Field::Value(value.into()));
        self
    }

    /// Add a deferred value.
    pub fn with_deferred<F, Fut>(mut self, name: &str, provider: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = Result<String>> + Send + 'a,
    {
        self.map
            .insert(name.to_string(), Field::Deferred(Deferred::new(provider)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field<'a>> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Field names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.map.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_deferred_runs_once() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let deferred = Deferred::new(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("2024-01-01".to_string())
        });

        assert!(!deferred.is_resolved());
        assert_eq!(deferred.get().await.unwrap(), "2024-01-01");
        assert_eq!(deferred.get().await.unwrap(), "2024-01-01");
        assert!(deferred.is_resolved());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_deferred_is_not_cached() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let deferred = Deferred::new(move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(crate::error::Error::Api("boom".into()))
            } else {
                Ok("later".to_string())
            }
        });

        assert!(deferred.get().await.is_err());
        assert_eq!(deferred.get().await.unwrap(), "later");
    }

    #[test]
    fn test_builder_names() {
        let fields = Fields::new()
            .with("user", "alice")
            .with_deferred("date", || async { Ok(String::new()) });
        assert!(fields.contains("user"));
        assert!(fields.contains("date"));
        assert_eq!(fields.names(), vec!["date", "user"]);
        assert!(matches!(fields.get("user"), Some(Field::Value(v)) if v == "alice"));
    }
}
