// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll wheel, trackpad scroll, magnify and rotate input.
//!
//! These arrive as discrete deltas without a pointer lifecycle. A sequence
//! of them forms one move with [`MoveSource::Scroll`]; it ends when
//! [`CanvasSession::gesture_ended`] is called or when no delta arrives for
//! `scroll_end_ms`.

use kurbo::{Point, Vec2};
use understory_coordinate::Coordinate;

use crate::input::{Modifiers, MoveSource};
use crate::session::CanvasSession;

impl CanvasSession {
    /// Scroll by a screen-space `delta`.
    ///
    /// With option held (and rotation enabled) the canvas rotates about the
    /// mouse; with command or control held, or when trackpad panning is
    /// disabled, it zooms about the mouse; otherwise it pans.
    pub fn scroll(&mut self, delta: Vec2, now: u64) {
        self.poll_scroll_end(now);
        let settings = self.settings;
        let anchor = self.mouse_location.unwrap_or_else(|| self.viewport_center());
        let next = if self.modifiers.contains(Modifiers::OPTION) && settings.rotation_enabled {
            let degrees = delta.y * settings.scroll_rotation_per_px;
            Some(self.coordinate.rotated_about(anchor, degrees.to_radians()))
        } else if self.modifiers.intersects(Modifiers::COMMAND | Modifiers::CONTROL)
            || !settings.trackpad_enabled
        {
            self.zoomed(anchor, 1.0 - delta.y / settings.scroll_zoom_divisor)
        } else {
            Some(self.coordinate.translated(delta))
        };
        self.scroll_to(next, anchor, now);
    }

    /// Trackpad magnify: scales by `1 + amount` about `location`, or about
    /// the viewport center when magnifying in place.
    pub fn magnify(&mut self, amount: f64, location: Point, now: u64) {
        self.poll_scroll_end(now);
        let anchor = if self.settings.magnify_in_place {
            self.viewport_center()
        } else {
            location
        };
        let next = self.zoomed(anchor, 1.0 + amount);
        self.scroll_to(next, anchor, now);
    }

    /// Trackpad rotate by `degrees` about `location`.
    pub fn rotate(&mut self, degrees: f64, location: Point, now: u64) {
        if !self.settings.rotation_enabled || self.settings.magnify_in_place {
            return;
        }
        self.poll_scroll_end(now);
        let next = self.coordinate.rotated_about(location, degrees.to_radians());
        self.scroll_to(Some(next), location, now);
    }

    /// The platform reported the end of a scroll, magnify or rotate gesture.
    pub fn gesture_ended(&mut self, now: u64) {
        if self.scroll.moving {
            self.end_scroll(now);
        }
    }

    /// Ends the sequence if its quiet period elapsed, even when no frame
    /// polled it in between.
    pub(crate) fn poll_scroll_end(&mut self, now: u64) {
        if self.scroll.timeout.poll(now) {
            self.end_scroll(now);
        }
    }

    pub(crate) fn end_scroll(&mut self, now: u64) {
        self.scroll.timeout.cancel();
        if !core::mem::take(&mut self.scroll.moving) {
            return;
        }
        log::debug!("scroll sequence ended");
        self.settle(self.scroll.anchor, MoveSource::Scroll, now);
    }

    fn zoomed(&self, anchor: Point, factor: f64) -> Option<Coordinate> {
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("ignoring zoom factor {factor}");
            return None;
        }
        let ratio = self.settings.clamp_ratio(self.coordinate.scale(), factor);
        Some(self.coordinate.scaled_about(anchor, ratio))
    }

    fn scroll_to(&mut self, next: Option<Coordinate>, anchor: Point, now: u64) {
        self.scroll.anchor = anchor;
        self.scroll.timeout.schedule(now, self.settings.scroll_end_ms);
        let Some(next) = next else {
            return;
        };
        if self.commit_coordinate(next) {
            self.announce_move(MoveSource::Scroll, self.scroll.moving);
            self.scroll.moving = true;
        }
    }
}
