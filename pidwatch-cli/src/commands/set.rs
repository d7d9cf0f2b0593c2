// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `pidwatch set` command - Update the monitored PID.
//!
//! The value travels as raw payload text so the endpoint's own validation
//! is what accepts or rejects it, exactly as a direct writer would see.

use std::path::PathBuf;

use super::protocol;

pub async fn execute(
    config_path: Option<&str>,
    socket: Option<PathBuf>,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let socket = super::resolve_socket(config_path, socket)?;
    tracing::debug!(socket = %socket.display(), value = %value, "updating monitored pid");

    let request = format!("SET {}\n", value);
    let reply = protocol::roundtrip(&socket, request.as_bytes()).await?;
    match protocol::parse_reply(&reply) {
        Ok(body) => {
            let body = String::from_utf8_lossy(body);
            println!("✓ monitored pid set to {} ({})", value, body.trim_end());
            Ok(())
        }
        Err(errno) => {
            eprintln!("✗ update rejected: {}", protocol::errno_message(errno));
            std::process::exit(1);
        }
    }
}
