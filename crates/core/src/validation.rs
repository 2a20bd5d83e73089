//! Collector for field-rule violations.
//!
//! Rules are checked exhaustively so a client sees every violated rule in a
//! single response instead of fixing them one round trip at a time.

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` when `holds` is false.
    pub fn check(&mut self, holds: bool, message: impl Into<String>) -> &mut Self {
        if !holds {
            self.messages.push(message.into());
        }
        self
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Require a value to be present, recording `message` otherwise.
    pub fn require<'a, T>(&mut self, value: &'a Option<T>, message: &str) -> Option<&'a T> {
        if value.is_none() {
            self.messages.push(message.to_string());
        }
        value.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    pub fn into_result(self) -> DomainResult<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.messages))
        }
    }
}

/// `true` when the value is present and has at least one non-whitespace char.
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
