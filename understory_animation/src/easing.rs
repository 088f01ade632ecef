// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::{FRAC_PI_2, PI};

/// Easing curve applied to the linear progress of an animation.
///
/// All curves are shaped with a cosine and map `0 → 0` and `1 → 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Starts slow, ends fast: `1 - cos(f·π/2)`.
    EaseIn,
    /// Starts fast, ends slow: `cos(f·π/2 - π/2)`.
    EaseOut,
    /// Slow at both ends: `cos(f·π - π) / 2 + 0.5`.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress.
    ///
    /// Input outside `[0, 1]` is clamped first. The endpoints are returned
    /// exactly so that a finished animation always lands on its target.
    #[must_use]
    pub fn apply(self, fraction: f64) -> f64 {
        let f = fraction.clamp(0.0, 1.0);
        if f == 0.0 || f == 1.0 {
            return f;
        }
        match self {
            Self::Linear => f,
            Self::EaseIn => 1.0 - (f * FRAC_PI_2).cos(),
            Self::EaseOut => (f * FRAC_PI_2 - FRAC_PI_2).cos(),
            Self::EaseInOut => (f * PI - PI).cos() / 2.0 + 0.5,
        }
    }
}
