// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! opscal-storage: durable entity storage
//!
//! A JSON-lines write-ahead log of [`opscal_core::Operation`]s, replayed
//! into a [`MaterializedState`] on open.

mod state;
mod store;
mod wal;

pub use state::{LastIds, MaterializedState};
pub use store::{Store, StoreError};
pub use wal::{Wal, WalError};
