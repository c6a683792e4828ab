//! Two-pass template resolution.
//!
//! The first pass checks every placeholder against the available fields and
//! substitutes the concrete ones. Deferred fields stay pending, and the second
//! pass runs only the providers still referenced, each at most once.

use crate::error::{Error, Result};
use crate::template::fields::{Field, Fields};
use crate::template::parse::{Segment, Template};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Pending(String),
}

/// A template with its concrete fields substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged {
    parts: Vec<Part>,
}

impl Staged {
    /// First pass. Fails on unknown placeholders without running any provider.
    pub fn first_pass(template: &Template, fields: &Fields<'_>) -> Result<Self> {
        let mut parts: Vec<Part> = Vec::new();

        for segment in template.segments() {
            let text = match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Placeholder(name) => match fields.get(name) {
                    Some(Field::Value(value)) => value.clone(),
                    Some(Field::Deferred(_)) => {
                        parts.push(Part::Pending(name.clone()));
                        continue;
                    }
                    None => {
                        return Err(Error::UnknownPlaceholder {
                            name: name.clone(),
                            template: template.as_str().to_string(),
                        })
                    }
                },
            };

            match parts.last_mut() {
                Some(Part::Text(existing)) => existing.push_str(&text),
                _ => parts.push(Part::Text(text)),
            }
        }

        Ok(Self { parts })
    }

    /// Names of the deferred fields still to resolve, repeats included.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            Part::Pending(name) => Some(name.as_str()),
            Part::Text(_) => None,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.pending().next().is_none()
    }

    /// Second pass: run referenced providers and substitute their values.
    pub async fn finish(self, fields: &Fields<'_>) -> Result<String> {
        let mut out = String::new();

        for part in self.parts {
            match part {
                Part::Text(text) => out.push_str(&text),
                Part::Pending(name) => match fields.get(&name) {
                    Some(Field::Deferred(deferred)) => out.push_str(deferred.get().await?),
                    Some(Field::Value(value)) => out.push_str(value),
                    None => {
                        return Err(Error::UnknownPlaceholder {
                            name,
                            template: out,
                        })
                    }
                },
            }
        }

        Ok(out)
    }
}

/// Expand `template` against `fields`.
pub async fn resolve(template: &Template, fields: &Fields<'_>) -> Result<String> {
    Staged::first_pass(template, fields)?.finish(fields).await
}
