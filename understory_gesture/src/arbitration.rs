// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The arbitration step.
//!
//! Runs after every pointer event and on every frame, in a fixed order:
//!
//! 1. Expire interactions: watchdog, cancel, release into momentum or
//!    removal, one momentum frame when ticking.
//! 2. Tear down drags whose pointer is gone, then hit-test unclaimed pointers
//!    for new drags.
//! 3. End a pinch that lost a member, form one from the first two candidates.
//! 4. End a pan that lost its pointer, form one from a lone candidate.
//! 5. Track the rubber-band selection (pointer profile).
//! 6. Apply pan, pinch and drag movement.
//! 7. Mark all movement as applied.

use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;
use understory_animation::Easing;
use understory_coordinate::{Coordinate, normalize_radians};

use crate::drag::DragInteraction;
use crate::input::{InteractionId, MoveSource};
use crate::interaction::{Interaction, PinchInteraction};
use crate::session::{CanvasSession, CatchUp, PanState, PinchState, SelectionState};
use crate::snapping::Effect;

type Candidates = SmallVec<[InteractionId; 4]>;

impl CanvasSession {
    pub(crate) fn step(&mut self, now: u64, advance: bool) {
        self.expire(now, advance);
        self.resolve_drags(now);
        self.resolve_pinch(now);
        self.resolve_pan();
        self.resolve_selection();
        self.apply_pan();
        self.apply_pinch(now);
        self.apply_drags();
        for interaction in &mut self.interactions {
            interaction.commit();
        }
    }

    fn expire(&mut self, now: u64, advance: bool) {
        let mut index = 0;
        while index < self.interactions.len() {
            if self.keep(index, now, advance) {
                index += 1;
            } else {
                let interaction = self.interactions.remove(index);
                log::debug!("interaction {:?} removed", interaction.id());
            }
        }
    }

    fn keep(&mut self, index: usize, now: u64, advance: bool) -> bool {
        let dampening = self.momentum_dampening(&self.interactions[index]);
        let momentum = self.settings.momentum;
        let interaction = &mut self.interactions[index];
        if interaction.poll_watchdog(now) {
            log::debug!("interaction {:?} timed out", interaction.id());
        }
        if interaction.needs_removal() {
            return false;
        }
        if interaction.is_active() {
            return true;
        }
        if !interaction.is_auto() {
            return match dampening {
                Some(d) if interaction.velocity().hypot() > momentum.start_threshold => {
                    interaction.begin_momentum(d);
                    log::debug!(
                        "interaction {:?} coasting towards {:?}",
                        interaction.id(),
                        interaction.predicted_end_location()
                    );
                    true
                }
                _ => false,
            };
        }
        if !advance {
            return true;
        }
        let moving = interaction.advance_momentum(momentum.stop_threshold);
        log::trace!(
            "interaction {:?} momentum {:?} at {:?}",
            interaction.id(),
            interaction.velocity(),
            interaction.location()
        );
        moving
    }

    /// Dampening for a released interaction, or `None` if it must not coast.
    fn momentum_dampening(&self, interaction: &Interaction) -> Option<f64> {
        if !self.settings.physics_enabled {
            return None;
        }
        let dampening = match self.drag_of(interaction.id()) {
            Some(di) => di.drag.physics.dampening(),
            None if self.is_selection_pointer(interaction) => None,
            None => Some(
                interaction
                    .velocity_dampening()
                    .unwrap_or(self.settings.momentum.dampening),
            ),
        };
        dampening.filter(|d| *d > 0.0 && *d < 1.0)
    }

    fn is_dragging(&self, id: InteractionId) -> bool {
        self.drag_of(id).is_some()
    }

    fn is_selecting_with(&self, id: InteractionId) -> bool {
        self.selection.is_some_and(|s| s.id == id)
    }

    /// Live interactions free to pan or pinch, in pointer-down order.
    fn candidates(&self) -> Candidates {
        self.interactions
            .iter()
            .filter(|i| {
                i.is_live() && !self.is_dragging(i.id()) && !self.is_selection_pointer(i)
            })
            .map(Interaction::id)
            .collect()
    }

    fn resolve_drags(&mut self, now: u64) {
        let mut index = 0;
        while index < self.drags.len() {
            let di = self.drags[index];
            if self.interaction(di.interaction).is_some() {
                index += 1;
            } else {
                self.drags.remove(index);
                log::debug!("drag {:?} released by {:?}", di.drag.id, di.interaction);
                self.end_drag(di.drag, now);
            }
        }

        if !self.delegate.is_attached() {
            return;
        }
        let unclaimed: SmallVec<[_; 4]> = self
            .interactions
            .iter()
            .filter(|i| {
                i.is_active()
                    && !self.is_dragging(i.id())
                    && !self.is_selecting_with(i.id())
                    && self.pan.is_none_or(|p| p.id != i.id())
                    && self.pinch.is_none_or(|p| !p.pair.contains(i.id()))
            })
            .map(|i| (i.id(), i.location()))
            .collect();

        for (id, location) in unclaimed {
            let coordinate = self.coordinate;
            let position = coordinate.position_at(location);
            let hit = self
                .delegate
                .with(|d| d.drag_hit_test(position, &coordinate))
                .flatten();
            let Some(drag) = hit else {
                continue;
            };
            if self.drags.iter().any(|other| other.drag.id == drag.id) {
                log::debug!("drag {:?} already claimed", drag.id);
                continue;
            }
            self.finish_drag_snaps(drag.id);
            let Some(item) = self.delegate.with(|d| d.drag_position(&drag, &coordinate)) else {
                continue;
            };
            if let Some(interaction) = self.interaction_mut(id) {
                interaction.set_content_center_offset(Some(position - item));
            }
            self.drags.push(DragInteraction {
                drag,
                interaction: id,
            });
            log::debug!("drag {:?} started by {id:?}", drag.id);
            self.notify(|d| d.drag_started(&drag, &coordinate));
        }
    }

    fn resolve_pinch(&mut self, now: u64) {
        let candidates = self.candidates();
        if let Some(pinch) = self.pinch {
            let intact = candidates.contains(&pinch.pair.first) && candidates.contains(&pinch.pair.second);
            if !intact {
                self.end_pinch(now);
            }
        }
        if self.pinch.is_some() || candidates.len() < 2 {
            return;
        }

        let pair = PinchInteraction {
            first: candidates[0],
            second: candidates[1],
        };
        // A pan in progress hands its move lifecycle over to the pinch.
        let moving = self.pan.take().is_some_and(|pan| pan.moving);
        let reached = self.settings.initial_rotation_threshold <= 0.0;
        for id in [pair.first, pair.second] {
            if let Some(interaction) = self.interaction_mut(id) {
                interaction.initial_rotation = 0.0;
                interaction.initial_rotation_threshold_reached = reached;
            }
        }
        log::debug!("pinch started by {:?} and {:?}", pair.first, pair.second);
        self.pinch = Some(PinchState { pair, moving });
    }

    fn end_pinch(&mut self, now: u64) {
        let Some(pinch) = self.pinch.take() else {
            return;
        };
        log::debug!("pinch by {:?} and {:?} ended", pinch.pair.first, pinch.pair.second);
        self.finish_catch_up();
        if pinch.moving {
            self.settle(self.last_pinch_center, MoveSource::Pointer, now);
        }
    }

    fn resolve_pan(&mut self) {
        let candidates = self.candidates();
        if let Some(pan) = self.pan {
            if self.pinch.is_some() || !candidates.contains(&pan.id) {
                self.pan = None;
                log::debug!("pan by {:?} ended", pan.id);
                if pan.moving {
                    let coordinate = self.coordinate;
                    self.notify(|d| d.move_ended(MoveSource::Pointer, &coordinate));
                }
            }
        }
        if self.pan.is_none() && self.pinch.is_none() && candidates.len() == 1 {
            log::debug!("pan started by {:?}", candidates[0]);
            self.pan = Some(PanState {
                id: candidates[0],
                moving: false,
            });
        }
    }

    fn resolve_selection(&mut self) {
        if let Some(selection) = self.selection {
            if self.interaction(selection.id).is_none() {
                self.selection = None;
                if selection.started {
                    self.notify(|d| d.selection_ended(selection.rect, selection.modifiers));
                }
            }
        }

        if self.selection.is_none() {
            let coordinate = self.coordinate;
            self.selection = self
                .interactions
                .iter()
                .find(|i| i.is_active() && self.is_selection_pointer(i) && !self.is_dragging(i.id()))
                .map(|i| {
                    let origin = coordinate.position_at(i.start_location());
                    SelectionState {
                        id: i.id(),
                        origin,
                        rect: Rect::from_points(origin, origin),
                        started: false,
                        modifiers: i.info().modifiers,
                    }
                });
        }

        let Some(mut selection) = self.selection else {
            return;
        };
        let Some(interaction) = self.interaction(selection.id) else {
            return;
        };
        let moved = interaction.applied_delta() != Vec2::ZERO;
        let travelled = interaction.total_offset().hypot() > self.settings.tap.max_distance;
        let rect = Rect::from_points(selection.origin, self.coordinate.position_at(interaction.location()));
        if !selection.started && travelled {
            selection.started = true;
            selection.rect = rect;
            self.notify(|d| d.selection_started(rect, selection.modifiers));
        } else if selection.started && moved {
            selection.rect = rect;
            self.notify(|d| d.selection_changed(rect, selection.modifiers));
        }
        self.selection = Some(selection);
    }

    fn apply_pan(&mut self) {
        let Some(mut pan) = self.pan else {
            return;
        };
        let Some(delta) = self.interaction(pan.id).map(Interaction::applied_delta) else {
            return;
        };
        if delta == Vec2::ZERO {
            return;
        }
        if self.commit_coordinate(self.coordinate.translated(delta)) {
            self.announce_move(MoveSource::Pointer, pan.moving);
            pan.moving = true;
            self.pan = Some(pan);
        }
    }

    fn apply_pinch(&mut self, now: u64) {
        let Some(mut pinch) = self.pinch else {
            return;
        };
        let (Some(a), Some(b)) = (
            self.interaction(pinch.pair.first),
            self.interaction(pinch.pair.second),
        ) else {
            return;
        };
        let (a0, a1) = (a.applied_location(), a.location());
        let (b0, b1) = (b.applied_location(), b.location());
        if a0 == a1 && b0 == b1 {
            return;
        }

        let settings = self.settings;
        let mut next = self.coordinate;
        let center = if settings.magnify_in_place {
            self.viewport_center()
        } else {
            next = next.translated(((a1 - a0) + (b1 - b0)) / 2.0);
            a1.midpoint(b1)
        };

        let (before, after) = (b0 - a0, b1 - a1);
        let (ratio, rotation) = if before.hypot() < f64::EPSILON || after.hypot() < f64::EPSILON {
            log::warn!("pinch pointers coincide; scale and rotation skipped");
            (1.0, 0.0)
        } else {
            (
                settings.clamp_ratio(next.scale(), after.hypot() / before.hypot()),
                normalize_radians(after.atan2() - before.atan2()),
            )
        };
        next = next.scaled_about(center, ratio);
        if settings.rotation_enabled && !settings.magnify_in_place && rotation != 0.0 {
            next = self.gate_rotation(next, pinch.pair, center, rotation, now);
        }

        self.last_pinch_center = center;
        if self.commit_coordinate(next) {
            self.announce_move(MoveSource::Pointer, pinch.moving);
            pinch.moving = true;
            self.pinch = Some(pinch);
        }
    }

    /// Holds back pinch rotation until it accumulates past the threshold,
    /// then replays the held-back angle with a catch-up animation.
    fn gate_rotation(
        &mut self,
        next: Coordinate,
        pair: PinchInteraction,
        center: Point,
        rotation: f64,
        now: u64,
    ) -> Coordinate {
        let threshold = self.settings.initial_rotation_threshold.to_radians();
        let Some(first) = self.interaction_mut(pair.first) else {
            return next;
        };
        if first.initial_rotation_threshold_reached {
            return next.rotated_about(center, rotation);
        }
        first.initial_rotation += rotation;
        let accumulated = first.initial_rotation;
        let reached = accumulated.abs() >= threshold;
        first.initial_rotation_threshold_reached = reached;
        if let Some(second) = self.interaction_mut(pair.second) {
            second.initial_rotation = accumulated;
            second.initial_rotation_threshold_reached = reached;
        }
        if !reached {
            return next;
        }

        log::debug!("pinch rotation threshold reached at {:.1}°", accumulated.to_degrees());
        let (id, frame) = self.animations.start(
            now,
            self.settings.rotation_catch_up_ms,
            Easing::EaseInOut,
            Effect::CatchUpRotation,
        );
        if frame.done {
            return next.rotated_about(center, accumulated);
        }
        self.catch_up = Some(CatchUp {
            id,
            delta: accumulated,
            applied: 0.0,
        });
        next
    }

    fn apply_drags(&mut self) {
        let coordinate = self.coordinate;
        let canvas_moved = coordinate != self.drag_coordinate;
        self.drag_coordinate = coordinate;
        for di in &self.drags {
            let Some(interaction) = self.interaction(di.interaction) else {
                continue;
            };
            if !canvas_moved && interaction.applied_delta() == Vec2::ZERO {
                continue;
            }
            let Some(offset) = interaction.content_center_offset() else {
                continue;
            };
            let position = coordinate.position_at(interaction.location()) - offset;
            if !position.is_finite() {
                log::warn!("drag {:?} position is not finite; update skipped", di.drag.id);
                continue;
            }
            self.notify(|d| d.set_drag_position(&di.drag, position, &coordinate));
        }
    }
}
