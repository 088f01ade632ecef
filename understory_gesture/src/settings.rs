// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for the gesture engine.

use crate::input::InputProfile;

/// Momentum tuning. Velocities are in pixels per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentumSettings {
    /// Minimum release speed that starts momentum.
    pub start_threshold: f64,
    /// Speed below which momentum stops.
    pub stop_threshold: f64,
    /// Per-frame velocity multiplier when nothing else overrides it.
    pub dampening: f64,
    /// A release velocity older than this (ms) is treated as zero.
    pub velocity_stale_ms: u64,
}

impl Default for MomentumSettings {
    fn default() -> Self {
        Self {
            start_threshold: 2.0,
            stop_threshold: 0.02,
            dampening: 0.98,
            velocity_stale_ms: 100,
        }
    }
}

/// Tap recognition tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapSettings {
    /// Longest press that still counts as a tap (ms).
    pub max_duration_ms: u64,
    /// Largest travel that still counts as a tap, and largest distance
    /// between taps of one multi-tap (screen px).
    pub max_distance: f64,
    /// Window in which the next tap continues a multi-tap (ms).
    pub between_taps_ms: u64,
    /// Tap count delivered without waiting for the window to close.
    pub max_count: u32,
}

impl Default for TapSettings {
    fn default() -> Self {
        Self {
            max_duration_ms: 300,
            max_distance: 10.0,
            between_taps_ms: 300,
            max_count: 2,
        }
    }
}

/// Engine configuration.
///
/// All fields are public; the `with_*` helpers cover the common toggles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSettings {
    /// Which platform callbacks are driven.
    pub profile: InputProfile,
    /// Released pointers and thrown drags coast when enabled.
    pub physics_enabled: bool,
    /// Two-finger and option-scroll rotation.
    pub rotation_enabled: bool,
    /// Plain scroll pans when enabled; when disabled every scroll zooms.
    pub trackpad_enabled: bool,
    /// Pinch and magnify scale about the viewport center without panning or rotating.
    pub magnify_in_place: bool,
    /// Smallest allowed scale.
    pub min_scale: f64,
    /// Largest allowed scale.
    pub max_scale: f64,
    /// Momentum tuning.
    pub momentum: MomentumSettings,
    /// Tap tuning.
    pub tap: TapSettings,
    /// Pinch rotation (degrees) suppressed before the canvas starts to turn.
    pub initial_rotation_threshold: f64,
    /// Duration of the animation replaying the suppressed rotation (ms).
    pub rotation_catch_up_ms: u64,
    /// Angle step (degrees) the canvas settles to after rotating, if any.
    pub snap_angle: Option<f64>,
    /// Largest distance (degrees) to a snap angle that still snaps.
    pub snap_angle_threshold: f64,
    /// Duration of the snap-to-angle animation (ms).
    pub snap_angle_animation_ms: u64,
    /// A dragged item closer than this to its grid point is placed without animating.
    pub snap_grid_radius: f64,
    /// Duration of the snap-to-grid animation (ms).
    pub snap_grid_animation_ms: u64,
    /// An interaction without updates for this long is dropped (ms).
    pub interaction_timeout_ms: u64,
    /// Quiet period that ends a scroll sequence (ms).
    pub scroll_end_ms: u64,
    /// Vertical scroll distance that halves or doubles the scale, roughly.
    pub scroll_zoom_divisor: f64,
    /// Degrees of rotation per pixel of option-scroll.
    pub scroll_rotation_per_px: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            profile: InputProfile::Touch,
            physics_enabled: true,
            rotation_enabled: true,
            trackpad_enabled: true,
            magnify_in_place: false,
            min_scale: 0.01,
            max_scale: 100.0,
            momentum: MomentumSettings::default(),
            tap: TapSettings::default(),
            initial_rotation_threshold: 10.0,
            rotation_catch_up_ms: 200,
            snap_angle: None,
            snap_angle_threshold: 5.0,
            snap_angle_animation_ms: 300,
            snap_grid_radius: 0.2,
            snap_grid_animation_ms: 250,
            interaction_timeout_ms: 10_000,
            scroll_end_ms: 200,
            scroll_zoom_divisor: 500.0,
            scroll_rotation_per_px: 0.25,
        }
    }
}

impl CanvasSettings {
    /// Sets the input profile.
    #[must_use]
    pub fn with_profile(mut self, profile: InputProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Enables or disables momentum.
    #[must_use]
    pub fn with_physics(mut self, enabled: bool) -> Self {
        self.physics_enabled = enabled;
        self
    }

    /// Enables or disables rotation.
    #[must_use]
    pub fn with_rotation(mut self, enabled: bool) -> Self {
        self.rotation_enabled = enabled;
        self
    }

    /// Enables or disables trackpad panning.
    #[must_use]
    pub fn with_trackpad(mut self, enabled: bool) -> Self {
        self.trackpad_enabled = enabled;
        self
    }

    /// Enables or disables magnify-in-place.
    #[must_use]
    pub fn with_magnify_in_place(mut self, enabled: bool) -> Self {
        self.magnify_in_place = enabled;
        self
    }

    /// Sets the snap angle step in degrees.
    #[must_use]
    pub fn with_snap_angle(mut self, step: Option<f64>) -> Self {
        self.snap_angle = step;
        self
    }

    /// Clamps a scale ratio so `scale * ratio` stays within the scale limits.
    #[must_use]
    pub fn clamp_ratio(&self, scale: f64, ratio: f64) -> f64 {
        let target = (scale * ratio).clamp(self.min_scale, self.max_scale);
        target / scale
    }
}
