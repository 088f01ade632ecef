// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Settling animations: snap-to-grid for dropped items, snap-to-angle for
//! the canvas, and the catch-up of held-back pinch rotation.

use kurbo::Point;
use understory_animation::{Easing, Frame};
use understory_coordinate::normalize_degrees;

use crate::drag::{Drag, DragId};
use crate::input::MoveSource;
use crate::session::CanvasSession;

/// What an animation in the session scheduler drives.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Effect {
    /// Moves a dropped item onto its grid point; ends the drag when done.
    SnapDrag { drag: Drag, from: Point, to: Point },
    /// Rotates the canvas about `center` by `delta` radians towards the
    /// absolute angle `target`; ends the move when done.
    SnapAngle {
        center: Point,
        delta: f64,
        target: f64,
        source: MoveSource,
    },
    /// Replays held-back pinch rotation; progress lives in the session.
    CatchUpRotation,
}

/// Rotation (degrees) that brings `degrees` onto the nearest multiple of
/// `step`, when that multiple is within `threshold`.
///
/// Candidates are `-180 + k * step` for `k` in `0..=360 / step`. Only the
/// candidates around the current angle are evaluated, so tiny steps cost the
/// same as coarse ones. Ties go to the smaller `k`.
#[must_use]
pub fn snap_angle_delta(degrees: f64, step: f64, threshold: f64) -> Option<f64> {
    if !(step.is_finite() && step > 0.0 && degrees.is_finite()) {
        return None;
    }
    let current = normalize_degrees(degrees);
    let last = (360.0 / step).floor();
    let nearest = ((current + 180.0) / step).round();
    [nearest - 1.0, nearest, nearest + 1.0]
        .into_iter()
        .map(|k| k.clamp(0.0, last))
        .map(|k| -180.0 + k * step - current)
        .filter(|diff| diff.abs() <= threshold)
        .min_by(|a, b| a.abs().total_cmp(&b.abs()))
}

impl CanvasSession {
    /// Ends a drag: will-end, optional grid snap, then did-end.
    pub(crate) fn end_drag(&mut self, drag: Drag, now: u64) {
        let coordinate = self.coordinate;
        self.notify(|d| d.drag_will_end(&drag));
        if let Some(grid) = drag.snap_grid {
            if let Some(from) = self.delegate.with(|d| d.drag_position(&drag, &coordinate)) {
                let to = grid.snap(from);
                if (to - from).hypot() >= self.settings.snap_grid_radius {
                    log::debug!("drag {:?} snapping from {from:?} to {to:?}", drag.id);
                    let (_, frame) = self.animations.start(
                        now,
                        self.settings.snap_grid_animation_ms,
                        Easing::EaseOut,
                        Effect::SnapDrag { drag, from, to },
                    );
                    self.apply_effect(frame);
                    return;
                }
                if to != from {
                    self.notify(|d| d.set_drag_position(&drag, to, &coordinate));
                }
            }
        }
        self.notify(|d| d.drag_did_end(&drag));
    }

    /// Completes pending grid snaps of `id` at once, so a new drag of the
    /// same item starts from its settled position.
    pub(crate) fn finish_drag_snaps(&mut self, id: DragId) {
        let coordinate = self.coordinate;
        let finished = self
            .animations
            .cancel_where(|e| matches!(e, Effect::SnapDrag { drag, .. } if drag.id == id));
        for effect in finished {
            if let Effect::SnapDrag { drag, to, .. } = effect {
                self.notify(|d| {
                    d.set_drag_position(&drag, to, &coordinate);
                    d.drag_did_end(&drag);
                });
            }
        }
    }

    /// Snaps the canvas angle if configured, then ends the move.
    pub(crate) fn settle(&mut self, center: Point, source: MoveSource, now: u64) {
        let settings = self.settings;
        let delta = settings
            .snap_angle
            .filter(|_| settings.rotation_enabled)
            .and_then(|step| snap_angle_delta(self.coordinate.degrees(), step, settings.snap_angle_threshold))
            .filter(|delta| *delta != 0.0);
        let Some(delta) = delta else {
            let coordinate = self.coordinate;
            self.notify(|d| d.move_ended(source, &coordinate));
            return;
        };

        let delta = delta.to_radians();
        log::debug!("snapping canvas angle by {:.2}°", delta.to_degrees());
        let effect = Effect::SnapAngle {
            center,
            delta,
            target: self.coordinate.angle() + delta,
            source,
        };
        let (_, frame) = self.animations.start(now, settings.snap_angle_animation_ms, Easing::EaseOut, effect);
        self.apply_effect(frame);
    }

    /// Applies any remaining catch-up rotation at once.
    pub(crate) fn finish_catch_up(&mut self) {
        let Some(catch_up) = self.catch_up.take() else {
            return;
        };
        self.animations.cancel(catch_up.id);
        let rest = (1.0 - catch_up.applied) * catch_up.delta;
        let next = self.coordinate.rotated_about(self.last_pinch_center, rest);
        if self.commit_coordinate(next) {
            self.announce_move(MoveSource::Pointer, true);
        }
    }

    pub(crate) fn apply_effect(&mut self, frame: Frame<Effect>) {
        match frame.payload {
            Effect::SnapDrag { drag, from, to } => {
                let coordinate = self.coordinate;
                let position = from.lerp(to, frame.fraction);
                self.notify(|d| {
                    d.set_drag_position(&drag, position, &coordinate);
                    if frame.done {
                        d.drag_did_end(&drag);
                    }
                });
            }
            Effect::SnapAngle {
                center,
                delta,
                target,
                source,
            } => {
                let mut next = self
                    .coordinate
                    .rotated_about(center, (frame.fraction - frame.previous) * delta);
                if frame.done {
                    // Absorb rounding from the incremental steps.
                    let residual = target - next.angle();
                    if residual.abs() < 1e-6 {
                        next = next.rotated_about(center, residual);
                    }
                }
                if self.commit_coordinate(next) {
                    self.announce_move(source, true);
                }
                if frame.done {
                    let coordinate = self.coordinate;
                    self.notify(|d| d.move_ended(source, &coordinate));
                }
            }
            Effect::CatchUpRotation => {
                let Some(mut catch_up) = self.catch_up.filter(|c| c.id == frame.id) else {
                    return;
                };
                let step = (frame.fraction - catch_up.applied) * catch_up.delta;
                catch_up.applied = frame.fraction;
                self.catch_up = (!frame.done).then_some(catch_up);
                let next = self.coordinate.rotated_about(self.last_pinch_center, step);
                if self.commit_coordinate(next) {
                    self.announce_move(MoveSource::Pointer, true);
                }
            }
        }
    }
}
