//! Model validation.
//!
//! Independent of routing: controllers validate decoded payloads with a
//! [`Validator`] and render the collected [`ModelErrors`] with
//! `RequestContext::render_model_errors`.

use std::collections::BTreeMap;
use std::fmt::Display;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Field name → error messages. Fields are kept sorted by name; the
/// messages of one field stay in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelErrors(BTreeMap<String, Vec<String>>);

impl ModelErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Number of fields with at least one error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Accumulates validation errors for one model.
///
/// ```ignore
/// let mut v = Validator::new();
/// v.presence("title", &page.title)
///     .length("title", &page.title, None, Some(120));
/// if !v.is_valid() {
///     ctx.render_model_errors(StatusCode::UNPROCESSABLE_ENTITY, v.errors());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    errors: ModelErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `value` must not be empty.
    pub fn presence(&mut self, field: &str, value: &str) -> &mut Self {
        if value.is_empty() {
            self.errors.add(field, "can't be blank");
        }
        self
    }

    /// Character count of `value` must lie within the given limits.
    pub fn length(&mut self, field: &str, value: &str, min: Option<usize>, max: Option<usize>) -> &mut Self {
        let count = value.chars().count();
        if let Some(min) = min {
            if count < min {
                self.errors.add(field, format!("minimum length is {min}"));
            }
        }
        if let Some(max) = max {
            if count > max {
                self.errors.add(field, format!("maximum length is {max}"));
            }
        }
        self
    }

    /// `value` must lie within the given limits.
    pub fn range<T>(&mut self, field: &str, value: T, min: Option<T>, max: Option<T>) -> &mut Self
    where
        T: PartialOrd + Display,
    {
        if let Some(min) = min {
            if value < min {
                self.errors.add(field, format!("minimum value is {min}"));
            }
        }
        if let Some(max) = max {
            if value > max {
                self.errors.add(field, format!("maximum value is {max}"));
            }
        }
        self
    }

    /// `value` must match `pattern`.
    ///
    /// ```ignore
    /// let ip = Regex::new(r"\A(\d{1,3}\.){3}\d{1,3}\z")?;
    /// v.format("ip address", &host.ip, &ip);
    /// ```
    pub fn format(&mut self, field: &str, value: &str, pattern: &Regex) -> &mut Self {
        if !pattern.is_match(value) {
            self.errors.add(field, "invalid format");
        }
        self
    }

    /// Record `message` for `field` unless `ok` holds.
    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.add(field, message);
        }
        self
    }

    pub fn add_error(&mut self, field: &str, message: &str) -> &mut Self {
        self.errors.add(field, message);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &ModelErrors {
        &self.errors
    }

    pub fn into_errors(self) -> ModelErrors {
        self.errors
    }

    pub fn reset(&mut self) {
        self.errors.clear();
    }
}
