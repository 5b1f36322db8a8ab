// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Deferred and repeating timers for a round.
//!
//! Timers are polled rather than scheduled: the UI calls [`TimerSet::due`]
//! every frame with the current time. Each timer remembers the round it was
//! armed for, and the whole set is cleared in one call on round transition.

/// What a timer triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerKind {
    /// Countdown step
    Tick,
    /// Hint reveal
    Hint,
    /// Round time is up
    Timeout,
}

#[derive(Debug, Clone)]
struct Timer {
    round_id: u64,
    kind: TimerKind,
    due_ms: u64,
    period_ms: Option<u64>,
}

/// A timer that came due, tagged with the round it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub round_id: u64,
    pub kind: TimerKind,
    pub at_ms: u64,
}

/// Set of pending timers.
#[derive(Debug, Default)]
pub struct TimerSet {
    timers: Vec<Timer>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot timer.
    pub fn arm(&mut self, round_id: u64, kind: TimerKind, due_ms: u64) {
        self.timers.push(Timer {
            round_id,
            kind,
            due_ms,
            period_ms: None,
        });
    }

    /// Arm a timer that fires every `period_ms`, first at `first_ms`.
    pub fn arm_repeating(&mut self, round_id: u64, kind: TimerKind, first_ms: u64, period_ms: u64) {
        self.timers.push(Timer {
            round_id,
            kind,
            due_ms: first_ms,
            period_ms: Some(period_ms.max(1)),
        });
    }

    /// Drop every pending timer.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Collect every firing up to `now_ms`, in time order.
    ///
    /// One-shot timers are removed once fired; repeating timers fire once per
    /// elapsed period and stay armed.
    pub fn due(&mut self, now_ms: u64) -> Vec<Firing> {
        let mut firings = Vec::new();

        self.timers.retain_mut(|timer| {
            while timer.due_ms <= now_ms {
                firings.push(Firing {
                    round_id: timer.round_id,
                    kind: timer.kind,
                    at_ms: timer.due_ms,
                });
                match timer.period_ms {
                    Some(period) => timer.due_ms += period,
                    None => return false,
                }
            }
            true
        });

        firings.sort_by_key(|f| (f.at_ms, f.kind));
        firings
    }
}
