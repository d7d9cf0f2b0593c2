// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI command implementations.

pub mod get;
pub mod serve;
pub mod set;
pub mod validate;

pub(crate) mod protocol;

use std::path::PathBuf;

use pidwatch_core::{ConfigError, ConfigLoader, ControlConfig};

/// Load the configuration file when one was given, built-in defaults otherwise.
pub(crate) fn load_config(path: Option<&str>) -> Result<ControlConfig, ConfigError> {
    match path {
        Some(p) => ConfigLoader::load_file(p),
        None => Ok(ControlConfig::default()),
    }
}

/// Resolve the host socket path: explicit override first, then configuration.
pub(crate) fn resolve_socket(
    config: Option<&str>,
    socket: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    match socket {
        Some(path) => Ok(path),
        None => Ok(load_config(config)?.socket_path),
    }
}
