// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::easing::Easing;

/// Timing of a single animation.
///
/// Tracks the furthest linear progress observed so far, so the reported
/// fraction never decreases even if the caller's clock steps backwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animation {
    start: u64,
    duration: u64,
    easing: Easing,
    progress: f64,
}

impl Animation {
    /// Creates an animation starting at `start` and lasting `duration` milliseconds.
    #[must_use]
    pub fn new(start: u64, duration: u64, easing: Easing) -> Self {
        Self {
            start,
            duration,
            easing,
            progress: 0.0,
        }
    }

    /// Start timestamp in milliseconds.
    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Duration in milliseconds.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Easing curve.
    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Eased fraction at the last call to [`Animation::advance`].
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.easing.apply(self.progress)
    }

    /// Returns `true` once linear progress has reached `1.0`.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Advances to `now` and returns the eased fraction.
    ///
    /// Linear progress is `clamp((now - start) / duration, 0, 1)`; a zero
    /// duration finishes immediately.
    pub fn advance(&mut self, now: u64) -> f64 {
        let linear = if self.duration == 0 {
            1.0
        } else {
            #[expect(
                clippy::cast_precision_loss,
                reason = "millisecond spans are far below 2^52"
            )]
            let elapsed = now.saturating_sub(self.start) as f64 / self.duration as f64;
            elapsed.clamp(0.0, 1.0)
        };
        self.progress = self.progress.max(linear);
        self.fraction()
    }
}
