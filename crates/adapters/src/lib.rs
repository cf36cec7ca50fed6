// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external collaborators: the secret store and git

pub mod repo;
pub mod secret;
pub mod traced;

pub use repo::{GitAdapter, RepoAdapter, RepoError};
pub use secret::{
    Credential, DatabaseCredentials, SecretError, SecretStore, VaultConfig, VaultSecretStore,
};
pub use traced::{TracedRepoAdapter, TracedSecretStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use repo::{FakeRepoAdapter, RepoCall};
#[cfg(any(test, feature = "test-support"))]
pub use secret::{FakeSecretStore, SecretCall};
