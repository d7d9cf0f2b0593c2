// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `pidwatch serve` command - Host the control endpoint.
//!
//! Registers the configured endpoint, listens on a Unix socket, and serves
//! one request per connection until Ctrl+C. Caller privilege derives from
//! the socket peer credentials: uid 0 carries the administrative
//! capability, every other uid does not.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};

use pidwatch_core::{
    ControlEndpoint, ControlError, Credentials, EndpointName, EndpointRegistry, PidCell,
    RegistryError, RESPONSE_CAPACITY,
};

use super::protocol::{err_reply, REQUEST_MAX};

pub async fn execute(config_path: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    // Load and validate configuration - fail fast on invalid config
    let config = super::load_config(config_path)?;

    tracing::info!(
        endpoint = %config.endpoint,
        mode = %config.mode,
        socket = %config.socket_path.display(),
        "starting control host"
    );

    let registry = EndpointRegistry::new_shared();
    let endpoint = Arc::new(ControlEndpoint::with_capability_gate(PidCell::new_shared()));

    // Registration failure aborts startup before the socket exists.
    registry.register(config.endpoint.clone(), config.mode, endpoint)?;

    let listener = match bind_socket(&config.socket_path) {
        Ok(listener) => listener,
        Err(e) => {
            registry.unregister(&config.endpoint);
            let err = RegistryError::RegistrationFailed {
                name: config.endpoint.clone(),
                reason: e.to_string(),
            };
            eprintln!("✗ failed to host endpoint: {}", err);
            return Err(err.into());
        }
    };

    println!(
        "▶ endpoint '{}' (mode {}) listening on {}",
        config.endpoint,
        config.mode,
        config.socket_path.display()
    );
    println!("Press Ctrl+C to stop...");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _)) => {
                    let registry = Arc::clone(&registry);
                    let name = config.endpoint.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_session(registry, name, stream).await {
                            tracing::warn!(error = %e, "session failed");
                        }
                    });
                }
                Err(e) => tracing::warn!(error = %e, "accept failed"),
            },
        }
    }

    println!();
    println!("Shutting down...");
    tracing::info!("shutting down control host");

    // Teardown tolerates an endpoint that never made it into the registry.
    if registry.unregister(&config.endpoint) {
        tracing::info!(endpoint = %config.endpoint, "endpoint removed");
    }
    let _ = std::fs::remove_file(&config.socket_path);

    println!("Control host stopped.");
    Ok(())
}

/// Bind the host socket, replacing a stale socket file from a dead host.
fn bind_socket(path: &std::path::Path) -> std::io::Result<UnixListener> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = std::fs::remove_file(path);
    UnixListener::bind(path)
}

/// Serve one request on one connection.
async fn handle_session(
    registry: Arc<EndpointRegistry>,
    name: EndpointName,
    mut stream: UnixStream,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let caller = match peer_credentials(&stream) {
        Ok(caller) => caller,
        Err(e) => {
            // No identity, no request: answer as a failed transfer.
            let fault = ControlError::Fault {
                reason: format!("peer credentials unavailable: {}", e),
            };
            stream.write_all(&err_reply(fault.as_errno())).await?;
            return Err(fault.into());
        }
    };

    let mut request = Vec::new();
    if let Err(e) = (&mut stream)
        .take(REQUEST_MAX as u64)
        .read_to_end(&mut request)
        .await
    {
        // The caller's bytes could not be pulled across the socket.
        let fault = ControlError::Fault {
            reason: e.to_string(),
        };
        let _ = stream.write_all(&err_reply(fault.as_errno())).await;
        return Err(fault.into());
    }

    tracing::debug!(uid = caller.uid(), bytes = request.len(), "request received");

    let reply = dispatch(&registry, &name, &caller, &request);
    stream.write_all(&reply).await?;
    Ok(())
}

/// Route a raw request frame to the snapshot or update operation.
fn dispatch(
    registry: &EndpointRegistry,
    name: &EndpointName,
    caller: &Credentials,
    request: &[u8],
) -> Vec<u8> {
    let verb = request.strip_suffix(b"\n").unwrap_or(request);

    if verb == b"GET" {
        let mut handle = match registry.open(name) {
            Ok(handle) => handle,
            Err(e) => return err_reply(e.as_errno()),
        };

        // One connection is one open handle: drain it to end-of-data.
        let mut reply = Vec::new();
        let mut buf = [0u8; RESPONSE_CAPACITY];
        loop {
            match handle.read(&mut buf) {
                Ok(0) => return reply,
                Ok(n) => reply.extend_from_slice(&buf[..n]),
                Err(e) => return err_reply(e.as_errno()),
            }
        }
    }

    if let Some(payload) = request.strip_prefix(b"SET ") {
        let handle = match registry.open(name) {
            Ok(handle) => handle,
            Err(e) => return err_reply(e.as_errno()),
        };
        return match handle.write(caller, payload) {
            Ok(count) => format!("OK {}\n", count).into_bytes(),
            Err(e) => err_reply(e.as_errno()),
        };
    }

    err_reply(-libc::EINVAL)
}

/// Derive caller credentials from the connection's peer uid.
fn peer_credentials(stream: &UnixStream) -> std::io::Result<Credentials> {
    let cred = stream.peer_cred()?;
    Ok(Credentials::from_uid(cred.uid()))
}
