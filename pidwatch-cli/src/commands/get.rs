// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `pidwatch get` command - Read the currently monitored PID.

use std::path::PathBuf;

use super::protocol;

pub async fn execute(
    config_path: Option<&str>,
    socket: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let socket = super::resolve_socket(config_path, socket)?;
    tracing::debug!(socket = %socket.display(), "reading monitored pid");

    let reply = protocol::roundtrip(&socket, b"GET\n").await?;
    match protocol::parse_reply(&reply) {
        Ok(body) => {
            print!("{}", String::from_utf8_lossy(body));
            Ok(())
        }
        Err(errno) => {
            eprintln!("✗ read failed: {}", protocol::errno_message(errno));
            std::process::exit(1);
        }
    }
}
