//! Custom error types for pidwatch.
//!
//! This module defines explicit enum error types as per coding guidelines.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.
//!
//! Every operation error carries an errno mapping so hosts that speak the
//! kernel's negative-error-code convention can report failures unchanged.

use std::path::PathBuf;

use thiserror::Error;

use crate::endpoint::INPUT_CAPACITY;
use crate::types::EndpointName;

/// Broad classification of control-operation failures.
///
/// Matches the four failure classes an endpoint host has to distinguish:
/// a caller that may not mutate, a caller that sent garbage, a caller whose
/// memory could not be transferred, and an exhausted resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    PermissionDenied,
    InvalidArgument,
    Fault,
    ResourceExhausted,
}

/// Errors produced by the two control-endpoint operations.
#[derive(Debug, Error)]
pub enum ControlError {
    // =========================================================================
    // Write Path - Checked Before Any State Mutation
    // =========================================================================
    #[error("caller lacks the administrative capability")]
    PermissionDenied,

    #[error("payload of {len} bytes exceeds the {max}-byte input bound")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("payload is not a base-10 integer: {payload:?}")]
    UnparsablePid { payload: String },

    #[error("negative pid {value} rejected")]
    NegativePid { value: i64 },

    #[error("payload transfer failed: {reason}")]
    Fault { reason: String },

    // =========================================================================
    // Read Path
    // =========================================================================
    #[error("response needs {needed} bytes but caller buffer holds {capacity}")]
    ResponseTruncated { needed: usize, capacity: usize },
}

impl ControlError {
    /// Classify this error into one of the four host-visible failure classes.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::PermissionDenied => ErrorClass::PermissionDenied,
            Self::PayloadTooLarge { .. } | Self::UnparsablePid { .. } | Self::NegativePid { .. } => {
                ErrorClass::InvalidArgument
            }
            Self::Fault { .. } => ErrorClass::Fault,
            Self::ResponseTruncated { .. } => ErrorClass::ResourceExhausted,
        }
    }

    /// Negative errno for hosts that report failures the kernel way.
    pub fn as_errno(&self) -> i32 {
        match self.class() {
            ErrorClass::PermissionDenied => -libc::EPERM,
            ErrorClass::InvalidArgument => -libc::EINVAL,
            ErrorClass::Fault => -libc::EFAULT,
            ErrorClass::ResourceExhausted => -libc::ENOMEM,
        }
    }

    /// Shorthand for the oversized-payload rejection against the fixed bound.
    pub fn payload_too_large(len: usize) -> Self {
        Self::PayloadTooLarge {
            len,
            max: INPUT_CAPACITY - 1,
        }
    }
}

impl From<ControlError> for std::io::Error {
    fn from(err: ControlError) -> Self {
        std::io::Error::from_raw_os_error(-err.as_errno())
    }
}

/// Errors from the endpoint registration surface.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("endpoint already registered: {name}")]
    EndpointExists { name: EndpointName },

    #[error("endpoint not registered: {name}")]
    EndpointNotFound { name: EndpointName },

    #[error("failed to register endpoint {name}: {reason}")]
    RegistrationFailed { name: EndpointName, reason: String },
}

impl RegistryError {
    /// Negative errno for hosts that report failures the kernel way.
    pub fn as_errno(&self) -> i32 {
        match self {
            Self::EndpointExists { .. } => -libc::EEXIST,
            Self::EndpointNotFound { .. } => -libc::ENOENT,
            Self::RegistrationFailed { .. } => -libc::ENOMEM,
        }
    }
}

/// Field-level validation errors for the typed newtypes.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("monitored pid must be non-negative, got {value}")]
    NegativePid { value: i64 },

    #[error("invalid endpoint name {name:?}: {reason}")]
    InvalidEndpointName { name: String, reason: String },

    #[error("invalid permission mode {input:?}: {reason}")]
    InvalidMode { input: String, reason: String },
}

/// Configuration loading errors - fail fast before any endpoint exists.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("configuration parse error: {message}")]
    Parse { message: String },

    #[error("invalid configuration field: {0}")]
    Validation(#[from] ValidationError),
}
