// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pointer tracking record.
//!
//! ## Usage
//!
//! 1) A pointer-down creates an [`Interaction`] at the initial screen location.
//! 2) Each pointer-move updates the location; the last delta is kept as the
//!    velocity and the watchdog is rescheduled.
//! 3) A pointer-up releases the interaction. It is then either removed or
//!    kept alive in momentum (`auto`), decaying its velocity once per frame.
//!
//! Roles (pan, pinch, drag) consume movement as the difference between the
//! current location and the location applied in the previous arbitration
//! step, so momentum and pointer moves feed them the same way.

use kurbo::{Point, Vec2};
use understory_animation::Timeout;

use crate::input::{InteractionId, InteractionInfo};

/// The two interactions driving a pinch, in pointer-down order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PinchInteraction {
    /// Earlier of the two pointers.
    pub first: InteractionId,
    /// Later of the two pointers.
    pub second: InteractionId,
}

impl PinchInteraction {
    /// Returns `true` if `id` is one of the two members.
    #[must_use]
    pub fn contains(&self, id: InteractionId) -> bool {
        self.first == id || self.second == id
    }
}

/// Tracking record for one pointer, from pointer-down until removal.
#[derive(Clone, Debug)]
pub struct Interaction {
    id: InteractionId,
    info: InteractionInfo,
    start_location: Point,
    location: Point,
    applied_location: Point,
    velocity: Vec2,
    predicted_end_location: Option<Point>,
    content_center_offset: Option<Vec2>,
    pub(crate) initial_rotation: f64,
    pub(crate) initial_rotation_threshold_reached: bool,
    active: bool,
    auto: bool,
    timeout: bool,
    cancelled: bool,
    velocity_dampening: Option<f64>,
    start_time: u64,
    last_update: u64,
    watchdog: Timeout,
}

impl Interaction {
    pub(crate) fn new(
        id: InteractionId,
        location: Point,
        info: InteractionInfo,
        now: u64,
        watchdog_ms: u64,
    ) -> Self {
        let mut watchdog = Timeout::new();
        watchdog.schedule(now, watchdog_ms);
        Self {
            id,
            info,
            start_location: location,
            location,
            applied_location: location,
            velocity: Vec2::ZERO,
            predicted_end_location: None,
            content_center_offset: None,
            initial_rotation: 0.0,
            initial_rotation_threshold_reached: false,
            active: true,
            auto: false,
            timeout: false,
            cancelled: false,
            velocity_dampening: None,
            start_time: now,
            last_update: now,
            watchdog,
        }
    }

    /// Host-assigned id.
    #[must_use]
    pub fn id(&self) -> InteractionId {
        self.id
    }

    /// Device information captured at pointer-down.
    #[must_use]
    pub fn info(&self) -> &InteractionInfo {
        &self.info
    }

    /// Screen location of the pointer-down.
    #[must_use]
    pub fn start_location(&self) -> Point {
        self.start_location
    }

    /// Current screen location (advanced by momentum after release).
    #[must_use]
    pub fn location(&self) -> Point {
        self.location
    }

    /// Last per-update location delta.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Where momentum is expected to come to rest, once in momentum.
    #[must_use]
    pub fn predicted_end_location(&self) -> Option<Point> {
        self.predicted_end_location
    }

    /// Offset between the pointer's content position and the dragged item's
    /// position, captured when a drag starts.
    #[must_use]
    pub fn content_center_offset(&self) -> Option<Vec2> {
        self.content_center_offset
    }

    /// Rotation (radians) suppressed so far by the pinch rotation threshold.
    #[must_use]
    pub fn initial_rotation(&self) -> f64 {
        self.initial_rotation
    }

    /// Whether the pinch rotation threshold has been crossed.
    #[must_use]
    pub fn initial_rotation_threshold_reached(&self) -> bool {
        self.initial_rotation_threshold_reached
    }

    /// `true` while the pointer is down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `true` while the interaction is in momentum.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// `true` once the watchdog has fired.
    #[must_use]
    pub fn is_timed_out(&self) -> bool {
        self.timeout
    }

    /// Per-interaction momentum dampening override.
    #[must_use]
    pub fn velocity_dampening(&self) -> Option<f64> {
        self.velocity_dampening
    }

    /// Timestamp of the pointer-down.
    #[must_use]
    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Timestamp of the last pointer update.
    #[must_use]
    pub fn last_update(&self) -> u64 {
        self.last_update
    }

    /// Total displacement since pointer-down.
    #[must_use]
    pub fn total_offset(&self) -> Vec2 {
        self.location - self.start_location
    }

    /// Milliseconds since pointer-down.
    #[must_use]
    pub fn duration(&self, now: u64) -> u64 {
        now.saturating_sub(self.start_time)
    }

    /// `true` while the interaction can drive a pan or pinch.
    #[must_use]
    pub fn is_live(&self) -> bool {
        (self.active || self.auto) && !self.timeout && !self.cancelled
    }

    /// `true` when the interaction ended normally (not by cancel or watchdog).
    pub(crate) fn ended_cleanly(&self) -> bool {
        !self.timeout && !self.cancelled
    }

    /// Movement not yet consumed by the arbitration step.
    pub(crate) fn applied_delta(&self) -> Vec2 {
        self.location - self.applied_location
    }

    pub(crate) fn applied_location(&self) -> Point {
        self.applied_location
    }

    pub(crate) fn commit(&mut self) {
        self.applied_location = self.location;
    }

    /// Records a pointer move and returns the delta since the previous one.
    pub(crate) fn update(&mut self, location: Point, now: u64, watchdog_ms: u64) -> Vec2 {
        let delta = location - self.location;
        self.location = location;
        self.velocity = delta;
        self.last_update = now;
        self.watchdog.schedule(now, watchdog_ms);
        delta
    }

    /// Marks the pointer as lifted. A velocity older than `stale_ms` is dropped.
    pub(crate) fn release(&mut self, now: u64, stale_ms: u64) {
        self.active = false;
        if now.saturating_sub(self.last_update) > stale_ms {
            self.velocity = Vec2::ZERO;
        }
    }

    /// Drops the interaction on the next expiry pass without momentum or taps.
    pub(crate) fn cancel(&mut self) {
        self.active = false;
        self.cancelled = true;
    }

    pub(crate) fn set_velocity_dampening(&mut self, dampening: Option<f64>) {
        self.velocity_dampening = dampening;
    }

    pub(crate) fn set_content_center_offset(&mut self, offset: Option<Vec2>) {
        self.content_center_offset = offset;
    }

    /// Fires the watchdog if its deadline has passed; returns `true` when it fires.
    pub(crate) fn poll_watchdog(&mut self, now: u64) -> bool {
        let fired = self.watchdog.poll(now);
        if fired {
            self.timeout = true;
            self.active = false;
        }
        fired
    }

    pub(crate) fn watchdog_deadline(&self) -> Option<u64> {
        self.watchdog.deadline()
    }

    pub(crate) fn needs_removal(&self) -> bool {
        self.timeout || self.cancelled
    }

    /// Enters momentum with per-frame `dampening`.
    pub(crate) fn begin_momentum(&mut self, dampening: f64) {
        self.auto = true;
        self.velocity_dampening = Some(dampening);
        self.predicted_end_location = Some(self.location + self.velocity * (dampening / (1.0 - dampening)));
    }

    /// One momentum frame. Returns `false` once the velocity decayed below `stop`.
    pub(crate) fn advance_momentum(&mut self, stop: f64) -> bool {
        let dampening = self.velocity_dampening.unwrap_or(0.0);
        self.velocity *= dampening;
        if self.velocity.hypot() < stop {
            self.velocity = Vec2::ZERO;
            return false;
        }
        self.location += self.velocity;
        true
    }
}
