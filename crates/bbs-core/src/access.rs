//! Origin access gate.
//!
//! The front door injects a fixed header into every request it forwards.
//! Requests that do not carry the expected value did not come through it and
//! are refused before any backend logic runs.

use std::fmt;

use crate::error::{AccessError, ConfigError};

/// Accept/reject decision for inbound requests.
#[derive(Clone)]
pub struct OriginGate {
    expected: String,
    dev_mode: bool,
}

// The expected value is a shared secret; keep it out of logs.
impl fmt::Debug for OriginGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OriginGate")
            .field("expected", &"<redacted>")
            .field("dev_mode", &self.dev_mode)
            .finish()
    }
}

impl OriginGate {
    /// Build a gate from the configured secret and the development flag.
    ///
    /// Outside development mode the secret must be present and non-empty,
    /// otherwise a request without the header could match it.
    pub fn new(expected: Option<String>, dev_mode: bool) -> Result<Self, ConfigError> {
        let expected = expected.unwrap_or_default();
        if !dev_mode && expected.is_empty() {
            return Err(ConfigError::MissingOriginSecret);
        }
        Ok(Self { expected, dev_mode })
    }

    /// A gate that lets everything through.
    pub fn development() -> Self {
        Self {
            expected: String::new(),
            dev_mode: true,
        }
    }

    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// Check the header value presented by a request.
    ///
    /// `None` covers both an absent header and one that is not valid text.
    pub fn check(&self, presented: Option<&str>) -> Result<(), AccessError> {
        if self.dev_mode {
            return Ok(());
        }
        match presented {
            Some(value) if value == self.expected => Ok(()),
            _ => Err(AccessError::Forbidden),
        }
    }
}
