// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed entity identifiers
//!
//! Identifiers are allocated by the store, monotonically per entity kind, so
//! ordering by id is insertion order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self)
            }
        }
    };
}

define_id!(
    /// Project identifier
    ProjectId
);
define_id!(
    /// Environment identifier (dev, staging, prod, ...)
    EnvironmentId
);
define_id!(
    /// Git repository attached to a project
    RepoId
);
define_id!(
    /// Job identifier
    JobId
);
define_id!(
    /// Run identifier
    RunId
);
define_id!(
    /// Calendar event identifier
    EventId
);
define_id!(
    /// User identity as produced by the authentication layer
    UserId
);

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
