// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-tap accumulation.

use smallvec::SmallVec;
use understory_animation::Timeout;

use crate::delegate::TapEvent;
use crate::settings::TapSettings;

/// Taps ready for delivery, oldest first.
pub(crate) type Taps = SmallVec<[TapEvent; 2]>;

/// Accumulates taps into multi-taps.
///
/// A tap continues the pending sequence when it arrives within the
/// between-taps window, with the same button, within `max_distance` of the
/// first tap. A sequence is delivered when it reaches `max_count` or when its
/// window closes; a tap that cannot continue the pending sequence flushes it
/// and starts a new one. A window that is due but not yet polled counts as
/// closed.
#[derive(Clone, Debug, Default)]
pub(crate) struct TapCounter {
    pending: Option<TapEvent>,
    window: Timeout,
}

impl TapCounter {
    pub(crate) fn register(&mut self, tap: TapEvent, now: u64, settings: &TapSettings) -> Taps {
        let mut ready = Taps::new();
        let continued = match self.pending.as_mut() {
            Some(pending)
                if self.window.is_running(now)
                    && pending.button == tap.button
                    && (tap.location - pending.location).hypot() <= settings.max_distance =>
            {
                pending.count += 1;
                true
            }
            _ => false,
        };
        if !continued {
            ready.extend(self.pending.take());
            self.pending = Some(TapEvent { count: 1, ..tap });
        }

        if self.pending.is_some_and(|p| p.count >= settings.max_count) {
            ready.extend(self.pending.take());
            self.window.cancel();
        } else {
            self.window.schedule(now, settings.between_taps_ms);
        }
        ready
    }

    /// Delivers the pending sequence once its window has closed.
    pub(crate) fn poll(&mut self, now: u64) -> Option<TapEvent> {
        if self.window.poll(now) {
            self.pending.take()
        } else {
            None
        }
    }

    pub(crate) fn deadline(&self) -> Option<u64> {
        self.window.deadline()
    }

    pub(crate) fn clear(&mut self) {
        self.pending = None;
        self.window.cancel();
    }
}
