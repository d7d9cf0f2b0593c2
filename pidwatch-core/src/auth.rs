// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Caller credentials and the pluggable write-authorization gate.
//!
//! Mutating the monitored PID requires the administrative capability. The
//! check is a predicate injected into the endpoint rather than a hard-coded
//! platform privilege probe, so the same gate logic runs under test
//! credentials and under real peer credentials alike. The gate sees only
//! the caller, never the payload: authorization is decided before a single
//! payload byte is inspected.

use std::collections::HashSet;

/// Capabilities a caller can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// May alter system-monitoring state.
    SysAdmin,
}

/// Identity and capability set of a caller.
#[derive(Debug, Clone)]
pub struct Credentials {
    uid: u32,
    caps: HashSet<Capability>,
}

impl Credentials {
    /// Build credentials from an explicit capability set.
    pub fn new(uid: u32, caps: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            uid,
            caps: caps.into_iter().collect(),
        }
    }

    /// Root credentials holding the administrative capability.
    pub fn root() -> Self {
        Self::new(0, [Capability::SysAdmin])
    }

    /// Credentials with no capabilities at all.
    pub fn unprivileged(uid: u32) -> Self {
        Self::new(uid, [])
    }

    /// Derive credentials from a uid: uid 0 carries the administrative
    /// capability, everyone else carries none.
    pub fn from_uid(uid: u32) -> Self {
        if uid == 0 {
            Self::root()
        } else {
            Self::unprivileged(uid)
        }
    }

    /// Credentials of the calling process, from its effective uid.
    pub fn current() -> Self {
        Self::from_uid(nix::unistd::geteuid().as_raw())
    }

    pub fn uid(&self) -> u32 {
        self.uid
    }

    pub fn has(&self, cap: Capability) -> bool {
        self.caps.contains(&cap)
    }
}

/// Authorization predicate for the update operation.
pub trait Authorizer: Send + Sync {
    /// Whether `caller` may mutate the monitored value.
    fn allows(&self, caller: &Credentials) -> bool;
}

/// The default gate: the caller must hold [`Capability::SysAdmin`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityGate;

impl Authorizer for CapabilityGate {
    fn allows(&self, caller: &Credentials) -> bool {
        caller.has(Capability::SysAdmin)
    }
}

/// Accepts every caller. For tests and trusted single-user setups only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn allows(&self, _caller: &Credentials) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_uid_root_gets_sysadmin() {
        let creds = Credentials::from_uid(0);
        assert!(creds.has(Capability::SysAdmin));
        assert_eq!(creds.uid(), 0);
    }

    #[test]
    fn test_from_uid_nonroot_gets_nothing() {
        let creds = Credentials::from_uid(1000);
        assert!(!creds.has(Capability::SysAdmin));
        assert_eq!(creds.uid(), 1000);
    }

    #[test]
    fn test_current_matches_effective_uid() {
        let creds = Credentials::current();
        assert_eq!(creds.uid(), nix::unistd::geteuid().as_raw());
        assert_eq!(creds.has(Capability::SysAdmin), creds.uid() == 0);
    }

    #[test]
    fn test_capability_gate() {
        let gate = CapabilityGate;

        assert!(gate.allows(&Credentials::root()));
        assert!(!gate.allows(&Credentials::unprivileged(1000)));

        // Capability decides, not the uid itself.
        let capable_nonroot = Credentials::new(1000, [Capability::SysAdmin]);
        assert!(gate.allows(&capable_nonroot));
    }

    #[test]
    fn test_allow_all() {
        assert!(AllowAll.allows(&Credentials::unprivileged(1000)));
    }
}
