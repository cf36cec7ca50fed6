// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar conflict detection
//!
//! Events occupy half-open intervals `[start, effective_end)`, so two
//! back-to-back events (`a.end == b.start`) do not conflict. Detection
//! sorts by start and sweeps forward, which visits each overlapping pair
//! once instead of testing every pair.

use crate::event::Event;
use crate::id::EventId;
use chrono::Duration;

/// Span assumed for an event without an explicit end
pub const DEFAULT_EVENT_DURATION: Duration = Duration::hours(1);

/// Half-open overlap test between two events
pub fn overlaps(a: &Event, b: &Event) -> bool {
    a.start < b.effective_end() && b.start < a.effective_end()
}

/// Compute the conflict flag of every event.
///
/// The result holds one entry per input event, in input order. Ties on
/// `start` keep input order, so callers pass events in id order.
pub fn conflict_flags(events: &[Event]) -> Vec<(EventId, bool)> {
    let mut order: Vec<usize> = (0..events.len()).collect();
    // sort_by_key is stable
    order.sort_by_key(|&i| events[i].start);

    let mut flags = vec![false; events.len()];
    for (pos, &i) in order.iter().enumerate() {
        let end = events[i].effective_end();
        for &j in &order[pos + 1..] {
            if events[j].start >= end {
                break;
            }
            // j starts inside i; only an inverted end on j can still miss
            if overlaps(&events[i], &events[j]) {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }

    events.iter().map(|e| e.id).zip(flags).collect()
}

#[cfg(test)]
#[path = "conflict_tests.rs"]
mod tests;
