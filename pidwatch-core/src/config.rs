// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict schema validation.
//!
//! Validates the control-endpoint configuration before anything is
//! registered. Any invalid field fails the load; a host never starts with a
//! half-valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{EndpointName, Mode};

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawControlConfig {
    #[serde(default = "default_endpoint")]
    endpoint: String,
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default = "default_socket_path")]
    socket_path: String,
}

fn default_endpoint() -> String {
    "my_proc".to_string()
}

fn default_mode() -> String {
    "0644".to_string()
}

fn default_socket_path() -> String {
    "/tmp/pidwatch/control.sock".to_string()
}

impl Default for RawControlConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            mode: default_mode(),
            socket_path: default_socket_path(),
        }
    }
}

/// Validated control-endpoint configuration.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    /// Name the endpoint registers under.
    pub endpoint: EndpointName,
    /// Permission bits advertised for the endpoint.
    pub mode: Mode,
    /// Unix socket the CLI host listens on.
    pub socket_path: PathBuf,
}

impl ControlConfig {
    fn from_raw(raw: RawControlConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: EndpointName::new(raw.endpoint)?,
            mode: Mode::from_octal_str(&raw.mode)?,
            socket_path: PathBuf::from(raw.socket_path),
        })
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::from_raw(RawControlConfig::default()).expect("built-in defaults validate")
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<ControlConfig, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        Self::load_str(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn load_str(contents: &str) -> Result<ControlConfig, ConfigError> {
        let raw: RawControlConfig =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                message: e.to_string(),
            })?;
        ControlConfig::from_raw(raw)
    }
}
