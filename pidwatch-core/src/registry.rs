//! Thread-safe endpoint registry using DashMap.
//!
//! The registration surface: named entry points are created at startup and
//! removed at teardown. Registration and deregistration are not expected to
//! race with themselves, but lookups run concurrently with everything.

use std::sync::Arc;

use dashmap::DashMap;

use crate::endpoint::{ControlEndpoint, EndpointHandle};
use crate::error::RegistryError;
use crate::types::{EndpointName, Mode};

/// Entry in the endpoint registry.
struct RegisteredEndpoint {
    endpoint: Arc<ControlEndpoint>,
    mode: Mode,
}

/// Registry of named control endpoints.
#[derive(Default)]
pub struct EndpointRegistry {
    endpoints: DashMap<EndpointName, RegisteredEndpoint>,
}

impl EndpointRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            endpoints: DashMap::new(),
        }
    }

    /// Create a registry wrapped in an Arc for sharing across threads.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a named endpoint with the given permission mode.
    ///
    /// Fails with `EndpointExists` on a duplicate name. A failure here must
    /// abort the host's startup; nothing is partially registered.
    pub fn register(
        &self,
        name: EndpointName,
        mode: Mode,
        endpoint: Arc<ControlEndpoint>,
    ) -> Result<(), RegistryError> {
        if self.endpoints.contains_key(&name) {
            return Err(RegistryError::EndpointExists { name });
        }

        tracing::debug!(endpoint = %name, mode = %mode, "registering control endpoint");
        self.endpoints
            .insert(name, RegisteredEndpoint { endpoint, mode });
        Ok(())
    }

    /// Remove a named endpoint.
    ///
    /// Idempotent: returns `false` when the name was never registered, so
    /// teardown can run unconditionally even after a failed startup.
    pub fn unregister(&self, name: &EndpointName) -> bool {
        let removed = self.endpoints.remove(name).is_some();
        if removed {
            tracing::debug!(endpoint = %name, "removed control endpoint");
        }
        removed
    }

    /// Open a fresh handle on a registered endpoint.
    pub fn open(&self, name: &EndpointName) -> Result<EndpointHandle, RegistryError> {
        self.endpoints
            .get(name)
            .map(|entry| entry.endpoint.open())
            .ok_or_else(|| RegistryError::EndpointNotFound { name: name.clone() })
    }

    /// Permission mode of a registered endpoint.
    pub fn mode(&self, name: &EndpointName) -> Result<Mode, RegistryError> {
        self.endpoints
            .get(name)
            .map(|entry| entry.mode)
            .ok_or_else(|| RegistryError::EndpointNotFound { name: name.clone() })
    }

    /// Check if an endpoint is registered.
    pub fn contains(&self, name: &EndpointName) -> bool {
        self.endpoints.contains_key(name)
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Names of all registered endpoints.
    pub fn names(&self) -> Vec<EndpointName> {
        self.endpoints.iter().map(|r| r.key().clone()).collect()
    }
}
