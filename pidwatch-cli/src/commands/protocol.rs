// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Wire protocol between the CLI client commands and the `serve` host.
//!
//! One connection carries one request and one reply. A request is either
//! `GET\n` or `SET <payload>` where the payload (trailing newline included)
//! is handed to the endpoint verbatim. The reply is the raw response line
//! for a read, `OK <count>\n` for an accepted write, and `ERR <errno>\n`
//! with a negative errno for any failure.

use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

/// Upper bound on a request frame. The endpoint's own payload bound is far
/// smaller; this only keeps a hostile client from streaming forever.
pub const REQUEST_MAX: usize = 256;

/// Render an error reply from a negative errno.
pub fn err_reply(errno: i32) -> Vec<u8> {
    format!("ERR {}\n", errno).into_bytes()
}

/// Human-readable message for a negative errno.
pub fn errno_message(errno: i32) -> String {
    std::io::Error::from_raw_os_error(-errno).to_string()
}

/// Send one request and collect the full reply.
pub async fn roundtrip(socket: &Path, request: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut stream = UnixStream::connect(socket).await?;
    stream.write_all(request).await?;
    stream.shutdown().await?;

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await?;
    Ok(reply)
}

/// Split a reply into its body, or the negative errno it carries.
pub fn parse_reply(reply: &[u8]) -> Result<&[u8], i32> {
    match reply.strip_prefix(b"ERR ") {
        Some(rest) => {
            let code = std::str::from_utf8(rest)
                .ok()
                .and_then(|s| s.trim().parse::<i32>().ok())
                .unwrap_or(-libc::EIO);
            Err(code)
        }
        None => Ok(reply),
    }
}
