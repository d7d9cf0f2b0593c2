// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of an endpoint name.
const MAX_ENDPOINT_NAME_LEN: usize = 64;

/// Highest representable permission mode (setuid/setgid/sticky plus rwxrwxrwx).
const MAX_MODE_BITS: u32 = 0o7777;

/// The monitored process identifier.
///
/// Non-negative by construction; the sentinel value 0 means "no process
/// selected". Negative candidates are rejected here, before any shared
/// state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MonitoredPid(i64);

impl MonitoredPid {
    /// The "no process selected" sentinel.
    pub const NONE: MonitoredPid = MonitoredPid(0);

    /// Create a new MonitoredPid with validation.
    pub fn new(pid: i64) -> Result<Self, ValidationError> {
        if pid < 0 {
            return Err(ValidationError::NegativePid { value: pid });
        }
        Ok(Self(pid))
    }

    /// Get the inner PID value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Whether this is the sentinel "no process selected" value.
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for MonitoredPid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for MonitoredPid {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonitoredPid> for i64 {
    fn from(pid: MonitoredPid) -> Self {
        pid.0
    }
}

/// Validated endpoint name.
/// Must be non-empty, alphanumeric with hyphens/underscores/dots, max 64 chars.
/// Path separators are rejected so a name can never escape its directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointName(String);

impl EndpointName {
    /// Create a new EndpointName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ValidationError::InvalidEndpointName {
                name,
                reason: "endpoint name cannot be empty".to_string(),
            });
        }

        if name.len() > MAX_ENDPOINT_NAME_LEN {
            return Err(ValidationError::InvalidEndpointName {
                reason: format!(
                    "endpoint name too long: {} chars (max {})",
                    name.len(),
                    MAX_ENDPOINT_NAME_LEN
                ),
                name,
            });
        }

        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(ValidationError::InvalidEndpointName {
                name,
                reason: "endpoint name must contain only alphanumeric characters, hyphens, underscores, and dots".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EndpointName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EndpointName> for String {
    fn from(name: EndpointName) -> Self {
        name.0
    }
}

/// Validated permission bits for a registered endpoint.
///
/// World-read plus owner-write (0644) is the conventional mode for a
/// control file that anyone may inspect but only an administrator mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Mode(u32);

impl Mode {
    /// World-read, owner-write.
    pub const WORLD_READ_ADMIN_WRITE: Mode = Mode(0o644);

    /// Create a new Mode with bounds validation.
    pub fn new(bits: u32) -> Result<Self, ValidationError> {
        if bits > MAX_MODE_BITS {
            return Err(ValidationError::InvalidMode {
                input: format!("{:o}", bits),
                reason: format!("mode exceeds {:04o}", MAX_MODE_BITS),
            });
        }
        Ok(Self(bits))
    }

    /// Parse an octal mode string such as `"0644"` or `"0o644"`.
    pub fn from_octal_str(input: &str) -> Result<Self, ValidationError> {
        let digits = input.strip_prefix("0o").unwrap_or(input);
        let bits = u32::from_str_radix(digits, 8).map_err(|e| ValidationError::InvalidMode {
            input: input.to_string(),
            reason: format!("not an octal number: {}", e),
        })?;
        Self::new(bits)
    }

    /// Get the raw permission bits.
    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::WORLD_READ_ADMIN_WRITE
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl TryFrom<u32> for Mode {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mode> for u32 {
    fn from(mode: Mode) -> Self {
        mode.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitored_pid_valid() {
        assert!(MonitoredPid::new(0).is_ok());
        assert!(MonitoredPid::new(1).is_ok());
        assert!(MonitoredPid::new(i64::MAX).is_ok());
    }

    #[test]
    fn test_monitored_pid_negative_rejected() {
        assert!(MonitoredPid::new(-1).is_err());
        assert!(MonitoredPid::new(i64::MIN).is_err());
    }

    #[test]
    fn test_monitored_pid_sentinel() {
        assert!(MonitoredPid::NONE.is_none());
        assert!(!MonitoredPid::new(42).unwrap().is_none());
        assert_eq!(MonitoredPid::NONE.value(), 0);
    }

    #[test]
    fn test_endpoint_name_valid() {
        assert!(EndpointName::new("my_proc").is_ok());
        assert!(EndpointName::new("watch-1").is_ok());
        assert!(EndpointName::new("node.pid").is_ok());
    }

    #[test]
    fn test_endpoint_name_invalid() {
        assert!(EndpointName::new("").is_err());
        assert!(EndpointName::new("a".repeat(65)).is_err());
        assert!(EndpointName::new("proc/nested").is_err());
        assert!(EndpointName::new("my proc").is_err());
    }

    #[test]
    fn test_mode_valid() {
        assert_eq!(Mode::new(0o644).unwrap().bits(), 0o644);
        assert_eq!(Mode::default(), Mode::WORLD_READ_ADMIN_WRITE);
        assert!(Mode::new(0o7777).is_ok());
    }

    #[test]
    fn test_mode_invalid() {
        assert!(Mode::new(0o10000).is_err());
    }

    #[test]
    fn test_mode_from_octal_str() {
        assert_eq!(Mode::from_octal_str("0644").unwrap().bits(), 0o644);
        assert_eq!(Mode::from_octal_str("0o600").unwrap().bits(), 0o600);
        assert_eq!(Mode::from_octal_str("644").unwrap().bits(), 0o644);
        assert!(Mode::from_octal_str("rw-r--r--").is_err());
        assert!(Mode::from_octal_str("99").is_err());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::new(0o644).unwrap().to_string(), "0644");
        assert_eq!(Mode::new(0o20).unwrap().to_string(), "0020");
    }
}
