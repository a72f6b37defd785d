//! Resource path templates.
//!
//! A template such as `customers/{customer_id}/subscriptions` is a sequence of
//! literal and placeholder segments. Composition substitutes placeholders with
//! caller-supplied identifiers, outermost parent first, and fails before any
//! request is made when the identifiers do not match the placeholders.

use crate::errors::{OpenpayError, Result};
use std::fmt;

/// Characters that would change how an identifier is resolved against the base URL.
const RESERVED: [char; 5] = ['/', '?', '#', '%', '\\'];

/// One segment of a [`PathTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Passed through unchanged
    Literal(String),
    /// Replaced by an identifier at call time
    Placeholder(String),
}

/// Literal + placeholder description of where a resource collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a `/`-separated template; `{name}` segments are placeholders.
    ///
    /// # Examples
    ///
    /// ```
    /// use openpay_rs::path::PathTemplate;
    ///
    /// let template = PathTemplate::parse("customers/{customer_id}/subscriptions");
    /// assert_eq!(template.placeholder_count(), 1);
    /// assert_eq!(
    ///     template.collection(&["ag4nktpdzebjiye1tlze"]).unwrap(),
    ///     "customers/ag4nktpdzebjiye1tlze/subscriptions"
    /// );
    /// assert!(template.collection(&[]).is_err());
    /// ```
    pub fn parse(template: &str) -> Self {
        let segments = template
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Placeholder(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of parent identifiers this template needs.
    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Placeholder(_)))
            .count()
    }

    /// Composes the collection path from exactly one identifier per placeholder.
    pub fn collection(&self, parent_ids: &[&str]) -> Result<String> {
        let mut ids = parent_ids.iter();
        let mut parts = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => parts.push(literal.as_str()),
                Segment::Placeholder(name) => {
                    let id = ids
                        .next()
                        .ok_or_else(|| self.invalid(format!("missing identifier for '{}'", name)))?;
                    self.check_identifier(name, id)?;
                    parts.push(*id);
                }
            }
        }

        if ids.next().is_some() {
            return Err(self.invalid(format!(
                "expected {} identifier(s), got {}",
                self.placeholder_count(),
                parent_ids.len()
            )));
        }

        Ok(parts.join("/"))
    }

    /// Composes the path of one item inside the collection.
    pub fn item(&self, parent_ids: &[&str], id: &str) -> Result<String> {
        self.check_identifier("id", id)?;
        Ok(format!("{}/{}", self.collection(parent_ids)?, id))
    }

    /// An identifier must stay a single path segment once the URL is resolved.
    fn check_identifier(&self, name: &str, id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(self.invalid(format!("empty identifier for '{}'", name)));
        }
        let escapes = id == "."
            || id == ".."
            || id.contains(&RESERVED[..])
            || id.chars().any(char::is_control);
        if escapes {
            return Err(self.invalid(format!(
                "identifier '{}' for '{}' is not a single path segment",
                id, name
            )));
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> OpenpayError {
        OpenpayError::InvalidPath {
            template: self.to_string(),
            reason,
        }
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match segment {
                Segment::Literal(literal) => f.write_str(literal)?,
                Segment::Placeholder(name) => write!(f, "{{{}}}", name)?,
            }
        }
        Ok(())
    }
}
