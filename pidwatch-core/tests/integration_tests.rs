// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! End-to-end integration tests for pidwatch.
//!
//! These tests drive the full flow: configuration, registration, handle
//! reads, privileged writes, and teardown.

use std::sync::Arc;

use tempfile::TempDir;

use pidwatch_core::{
    ConfigLoader, ControlEndpoint, Credentials, EndpointRegistry, PidCell, RESPONSE_CAPACITY,
};

fn read_line(registry: &EndpointRegistry, name: &pidwatch_core::EndpointName) -> String {
    let mut handle = registry.open(name).expect("endpoint registered");
    let mut buf = [0u8; RESPONSE_CAPACITY];
    let n = handle.read(&mut buf).expect("snapshot succeeds");
    String::from_utf8(buf[..n].to_vec()).expect("response is UTF-8")
}

/// Configuration file drives registration; reads and writes flow through
/// the registered endpoint.
#[test]
fn test_config_to_registered_endpoint_flow() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let config_path = temp_dir.path().join("pidwatch.yaml");

    std::fs::write(
        &config_path,
        r#"
endpoint: my_proc
mode: "0644"
"#,
    )
    .expect("failed to write config");

    let config = ConfigLoader::load_file(&config_path).expect("failed to load config");
    assert_eq!(config.endpoint.as_str(), "my_proc");

    let registry = EndpointRegistry::new_shared();
    let cell = PidCell::new_shared();
    let endpoint = Arc::new(ControlEndpoint::with_capability_gate(Arc::clone(&cell)));

    registry
        .register(config.endpoint.clone(), config.mode, endpoint)
        .expect("registration succeeds");

    // Fresh endpoint reports the sentinel.
    assert_eq!(
        read_line(&registry, &config.endpoint),
        "Currently monitoring PID: 0\n"
    );

    // A privileged write round-trips through a subsequent read.
    let handle = registry.open(&config.endpoint).unwrap();
    let accepted = handle.write(&Credentials::root(), b"31337\n").unwrap();
    assert_eq!(accepted, 6);
    assert_eq!(
        read_line(&registry, &config.endpoint),
        "Currently monitoring PID: 31337\n"
    );

    // Teardown, then a second teardown of the same name is tolerated.
    assert!(registry.unregister(&config.endpoint));
    assert!(!registry.unregister(&config.endpoint));
    assert!(registry.open(&config.endpoint).is_err());
}

/// An unauthorized writer changes nothing; the next reader still sees the
/// value a privileged writer stored.
#[test]
fn test_privilege_gate_end_to_end() {
    let registry = EndpointRegistry::new_shared();
    let name = pidwatch_core::EndpointName::new("my_proc").unwrap();
    let endpoint = Arc::new(ControlEndpoint::with_capability_gate(PidCell::new_shared()));
    registry
        .register(name.clone(), pidwatch_core::Mode::default(), endpoint)
        .unwrap();

    let handle = registry.open(&name).unwrap();
    handle.write(&Credentials::root(), b"77\n").unwrap();

    let err = handle
        .write(&Credentials::unprivileged(1000), b"42\n")
        .unwrap_err();
    assert_eq!(err.as_errno(), -libc::EPERM);

    assert_eq!(read_line(&registry, &name), "Currently monitoring PID: 77\n");
}

/// Concurrent writers and readers against a registered endpoint: every
/// observed value was actually written.
#[test]
fn test_concurrent_access_through_registry() {
    use std::thread;

    let registry = EndpointRegistry::new_shared();
    let name = pidwatch_core::EndpointName::new("my_proc").unwrap();
    let endpoint = Arc::new(ControlEndpoint::with_capability_gate(PidCell::new_shared()));
    registry
        .register(name.clone(), pidwatch_core::Mode::default(), endpoint)
        .unwrap();

    let written: Vec<i64> = (1..=16).map(|i| i * 104_729).collect();

    let writers: Vec<_> = written
        .iter()
        .map(|&v| {
            let registry = Arc::clone(&registry);
            let name = name.clone();
            thread::spawn(move || {
                let handle = registry.open(&name).unwrap();
                handle
                    .write(&Credentials::root(), format!("{}\n", v).as_bytes())
                    .unwrap();
            })
        })
        .collect();

    let readers: Vec<_> = (0..16)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let name = name.clone();
            thread::spawn(move || {
                let mut handle = registry.open(&name).unwrap();
                let mut buf = [0u8; RESPONSE_CAPACITY];
                let n = handle.read(&mut buf).unwrap();
                String::from_utf8(buf[..n].to_vec()).unwrap()
            })
        })
        .collect();

    for w in writers {
        w.join().unwrap();
    }
    for r in readers {
        let line = r.join().unwrap();
        let value: i64 = line
            .strip_prefix("Currently monitoring PID: ")
            .and_then(|rest| rest.trim_end().parse().ok())
            .expect("well-formed response line");
        assert!(value == 0 || written.contains(&value));
    }
}
