// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_animation::{AnimationId, Scheduler, Timeout};
use understory_coordinate::Coordinate;

use crate::delegate::{CanvasDelegate, DelegateLink, TapEvent};
use crate::drag::DragInteraction;
use crate::input::{
    InputProfile, InteractionId, InteractionInfo, Modifiers, MoveSource, PointerButton, PointerDevice,
};
use crate::interaction::{Interaction, PinchInteraction};
use crate::settings::CanvasSettings;
use crate::snapping::Effect;
use crate::tap::TapCounter;

#[derive(Clone, Copy, Debug)]
pub(crate) struct PanState {
    pub(crate) id: InteractionId,
    pub(crate) moving: bool,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct PinchState {
    pub(crate) pair: PinchInteraction,
    pub(crate) moving: bool,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct SelectionState {
    pub(crate) id: InteractionId,
    /// Content position of the pointer-down.
    pub(crate) origin: Point,
    pub(crate) rect: Rect,
    pub(crate) started: bool,
    pub(crate) modifiers: Modifiers,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ScrollState {
    pub(crate) timeout: Timeout,
    pub(crate) moving: bool,
    pub(crate) anchor: Point,
}

/// Replay of pinch rotation suppressed by the initial threshold.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CatchUp {
    pub(crate) id: AnimationId,
    pub(crate) delta: f64,
    pub(crate) applied: f64,
}

/// Gesture arbitration for one canvas.
///
/// The session owns every tracked pointer and decides, after each input
/// event and on each display frame, which of them pan the canvas, which pair
/// pinches it and which ones drag delegate-owned items. All time is supplied
/// by the caller in milliseconds; momentum advances once per [`frame`].
///
/// ```rust
/// use kurbo::{Point, Size, Vec2};
/// use understory_gesture::{CanvasSession, CanvasSettings, InteractionId, InteractionInfo};
///
/// let mut session = CanvasSession::with_settings(
///     Size::new(800.0, 600.0),
///     CanvasSettings::default().with_physics(false),
/// );
/// let finger = InteractionId(1);
/// session.pointer_down(finger, Point::new(100.0, 100.0), InteractionInfo::touch(), 0);
/// session.pointer_move(finger, Point::new(130.0, 90.0), 16);
/// session.pointer_up(finger, 32);
///
/// assert_eq!(session.coordinate().offset(), Vec2::new(30.0, -10.0));
/// assert!(session.interactions().is_empty());
/// ```
///
/// [`frame`]: CanvasSession::frame
#[derive(Debug)]
pub struct CanvasSession {
    pub(crate) coordinate: Coordinate,
    pub(crate) size: Size,
    pub(crate) settings: CanvasSettings,
    pub(crate) interactions: Vec<Interaction>,
    pub(crate) pan: Option<PanState>,
    pub(crate) pinch: Option<PinchState>,
    pub(crate) drags: Vec<DragInteraction>,
    pub(crate) selection: Option<SelectionState>,
    pub(crate) modifiers: Modifiers,
    pub(crate) mouse_location: Option<Point>,
    pub(crate) animations: Scheduler<Effect>,
    pub(crate) catch_up: Option<CatchUp>,
    pub(crate) last_pinch_center: Point,
    pub(crate) drag_coordinate: Coordinate,
    pub(crate) taps: TapCounter,
    pub(crate) scroll: ScrollState,
    pub(crate) delegate: DelegateLink,
}

impl CanvasSession {
    /// Creates a session for a viewport of `size` with default settings.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self::with_settings(size, CanvasSettings::default())
    }

    /// Creates a session with explicit settings.
    #[must_use]
    pub fn with_settings(size: Size, settings: CanvasSettings) -> Self {
        Self {
            coordinate: Coordinate::IDENTITY,
            size,
            settings,
            interactions: Vec::new(),
            pan: None,
            pinch: None,
            drags: Vec::new(),
            selection: None,
            modifiers: Modifiers::empty(),
            mouse_location: None,
            animations: Scheduler::new(),
            catch_up: None,
            last_pinch_center: Point::ZERO,
            drag_coordinate: Coordinate::IDENTITY,
            taps: TapCounter::default(),
            scroll: ScrollState::default(),
            delegate: DelegateLink::default(),
        }
    }

    // --- queries ---

    /// Current canvas transform.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Viewport size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    /// Tracked interactions in pointer-down order.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Looks up a tracked interaction.
    #[must_use]
    pub fn interaction(&self, id: InteractionId) -> Option<&Interaction> {
        self.interactions.iter().find(|i| i.id() == id)
    }

    /// The interaction panning the canvas, if any.
    #[must_use]
    pub fn pan_interaction(&self) -> Option<InteractionId> {
        self.pan.map(|pan| pan.id)
    }

    /// The pair pinching the canvas, if any.
    #[must_use]
    pub fn pinch_interaction(&self) -> Option<PinchInteraction> {
        self.pinch.map(|pinch| pinch.pair)
    }

    /// Drags in progress, in start order.
    #[must_use]
    pub fn drag_interactions(&self) -> &[DragInteraction] {
        &self.drags
    }

    /// `true` while a rubber-band selection is tracked.
    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.selection.is_some()
    }

    /// Last known modifiers.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Last known mouse location.
    #[must_use]
    pub fn mouse_location(&self) -> Option<Point> {
        self.mouse_location
    }

    /// `true` while momentum or an animation needs [`CanvasSession::frame`] calls.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        !self.animations.is_empty() || self.interactions.iter().any(Interaction::is_auto)
    }

    /// Earliest pending timer (tap window, scroll end, watchdog).
    ///
    /// A host that stops ticking when [`CanvasSession::needs_frame`] is
    /// `false` should call [`CanvasSession::frame`] at this time.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.interactions
            .iter()
            .filter_map(Interaction::watchdog_deadline)
            .chain(self.taps.deadline())
            .chain(self.scroll.timeout.deadline())
            .min()
    }

    // --- configuration ---

    /// Sets the viewport size.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Replaces the canvas transform without move notifications.
    ///
    /// Non-finite transforms are ignored.
    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        if coordinate.is_finite() && coordinate.scale() > 0.0 {
            self.coordinate = coordinate;
        } else {
            log::warn!("ignoring invalid canvas transform {coordinate:?}");
        }
    }

    /// Replaces the settings. Roles in progress keep running.
    pub fn set_settings(&mut self, settings: CanvasSettings) {
        self.settings = settings;
    }

    /// Records the modifiers currently held.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Attaches a delegate. The session only keeps a weak reference.
    pub fn set_delegate<D: CanvasDelegate + 'static>(&mut self, delegate: &Rc<RefCell<D>>) {
        self.delegate.set(delegate);
    }

    /// Detaches the delegate.
    pub fn clear_delegate(&mut self) {
        self.delegate.clear();
    }

    /// Overrides the momentum dampening of one interaction.
    ///
    /// A drag force still takes precedence. Values outside `(0, 1)` disable
    /// momentum for the interaction.
    pub fn set_velocity_dampening(&mut self, id: InteractionId, dampening: Option<f64>) {
        if let Some(interaction) = self.interaction_mut(id) {
            interaction.set_velocity_dampening(dampening);
        }
    }

    // --- pointer input ---

    /// A pointer went down at a screen `location`.
    ///
    /// Interactions still in momentum are stopped. Reusing a tracked id
    /// restarts that interaction. Mouse buttons other than left, right and
    /// middle are reported to the delegate and not tracked.
    pub fn pointer_down(&mut self, id: InteractionId, location: Point, info: InteractionInfo, now: u64) {
        if let PointerDevice::Mouse(button) = info.device {
            self.mouse_location = Some(location);
            if let PointerButton::Other(_) = button {
                let modifiers = info.modifiers;
                self.notify(|d| d.pointer_button_pressed(button, location, modifiers));
                return;
            }
        }

        let mut halted = false;
        for interaction in &mut self.interactions {
            if interaction.is_auto() || interaction.id() == id {
                interaction.cancel();
                halted = true;
            }
        }
        if halted {
            self.step(now, false);
        }

        log::debug!("pointer {id:?} down at {location:?}");
        let watchdog = self.settings.interaction_timeout_ms;
        self.interactions
            .push(Interaction::new(id, location, info, now, watchdog));
        self.step(now, false);
    }

    /// A tracked pointer moved to a screen `location`.
    pub fn pointer_move(&mut self, id: InteractionId, location: Point, now: u64) {
        let watchdog = self.settings.interaction_timeout_ms;
        let Some(interaction) = self.interaction_mut(id) else {
            return;
        };
        if !interaction.is_active() {
            return;
        }
        interaction.update(location, now, watchdog);
        if interaction.info().button().is_some() {
            self.mouse_location = Some(location);
        }
        self.step(now, false);
    }

    /// A tracked pointer lifted.
    pub fn pointer_up(&mut self, id: InteractionId, now: u64) {
        let stale = self.settings.momentum.velocity_stale_ms;
        let Some(interaction) = self.interaction_mut(id) else {
            return;
        };
        if !interaction.is_active() {
            return;
        }
        interaction.release(now, stale);
        let velocity = interaction.velocity();
        // Taps are judged at release, before momentum moves the pointer on.
        let released = interaction.clone();
        if let Some(drag) = self.drag_of(id).map(|di| di.drag) {
            self.notify(|d| d.drag_released(&drag, velocity));
        }
        let tapping = self.pan.is_some_and(|p| p.id == id)
            || self.selection.is_some_and(|s| s.id == id && !s.started);
        self.step(now, false);
        if tapping {
            self.detect_tap(&released, now);
        }
    }

    /// The platform cancelled a pointer: it is dropped without momentum or taps.
    pub fn pointer_cancel(&mut self, id: InteractionId, now: u64) {
        let Some(interaction) = self.interaction_mut(id) else {
            return;
        };
        interaction.cancel();
        self.step(now, false);
    }

    /// The mouse moved without a button pressed.
    pub fn hover(&mut self, location: Point) {
        self.mouse_location = Some(location);
    }

    /// Display tick: fires due timers, advances animations and momentum.
    pub fn frame(&mut self, now: u64) {
        if let Some(tap) = self.taps.poll(now) {
            self.deliver_tap(&tap);
        }
        self.poll_scroll_end(now);
        for frame in self.animations.tick(now) {
            self.apply_effect(frame);
        }
        self.step(now, true);
    }

    /// Ends every role, completes pending snaps at once and drops all
    /// interactions and timers.
    pub fn reset(&mut self) {
        self.taps.clear();
        self.scroll.timeout.cancel();
        self.catch_up = None;
        let coordinate = self.coordinate;
        for effect in self.animations.cancel_where(|_| true) {
            match effect {
                Effect::SnapDrag { drag, to, .. } => self.notify(|d| {
                    d.set_drag_position(&drag, to, &coordinate);
                    d.drag_did_end(&drag);
                }),
                Effect::SnapAngle { source, .. } => {
                    self.notify(|d| d.move_ended(source, &coordinate));
                }
                Effect::CatchUpRotation => {}
            }
        }
        for di in core::mem::take(&mut self.drags) {
            self.notify(|d| {
                d.drag_will_end(&di.drag);
                d.drag_did_end(&di.drag);
            });
        }
        let pointer_moving = self.pan.take().is_some_and(|p| p.moving)
            | self.pinch.take().is_some_and(|p| p.moving);
        if pointer_moving {
            self.notify(|d| d.move_ended(MoveSource::Pointer, &coordinate));
        }
        if core::mem::take(&mut self.scroll.moving) {
            self.notify(|d| d.move_ended(MoveSource::Scroll, &coordinate));
        }
        if let Some(selection) = self.selection.take().filter(|s| s.started) {
            self.notify(|d| d.selection_ended(selection.rect, selection.modifiers));
        }
        self.interactions.clear();
        log::debug!("canvas session reset");
    }

    // --- shared helpers ---

    pub(crate) fn interaction_mut(&mut self, id: InteractionId) -> Option<&mut Interaction> {
        self.interactions.iter_mut().find(|i| i.id() == id)
    }

    pub(crate) fn drag_of(&self, id: InteractionId) -> Option<&DragInteraction> {
        self.drags.iter().find(|di| di.interaction == id)
    }

    pub(crate) fn viewport_center(&self) -> Point {
        self.size.to_rect().center()
    }

    /// Left-button mouse interactions select under the pointer profile.
    pub(crate) fn is_selection_pointer(&self, interaction: &Interaction) -> bool {
        self.settings.profile == InputProfile::Pointer
            && interaction.info().button() == Some(PointerButton::Left)
    }

    pub(crate) fn notify(&self, f: impl FnOnce(&mut dyn CanvasDelegate)) {
        self.delegate.with(f);
    }

    /// Installs `next` if it is a usable transform; returns `true` if it changed.
    pub(crate) fn commit_coordinate(&mut self, next: Coordinate) -> bool {
        if !next.is_finite() || next.scale() <= 0.0 {
            log::warn!("dropping invalid canvas transform {next:?}");
            return false;
        }
        if next == self.coordinate {
            return false;
        }
        self.coordinate = next;
        true
    }

    /// Reports an applied move, starting the move lifecycle if needed.
    pub(crate) fn announce_move(&self, source: MoveSource, was_moving: bool) {
        let coordinate = self.coordinate;
        self.notify(|d| {
            if !was_moving {
                d.move_started(source, &coordinate);
            }
            d.move_updated(source, &coordinate);
        });
    }

    pub(crate) fn deliver_tap(&self, tap: &TapEvent) {
        log::debug!("tap x{} at {:?}", tap.count, tap.location);
        self.notify(|d| d.tap(tap));
    }

    /// Registers a finished pan or click as a tap if it was short and still.
    pub(crate) fn detect_tap(&mut self, interaction: &Interaction, now: u64) {
        let tap = self.settings.tap;
        if !interaction.ended_cleanly()
            || interaction.duration(now) > tap.max_duration_ms
            || interaction.total_offset().hypot() > tap.max_distance
        {
            return;
        }
        let location = interaction.location();
        let event = TapEvent {
            location,
            position: self.coordinate.position_at(location),
            count: 1,
            button: interaction.info().button(),
            modifiers: interaction.info().modifiers,
        };
        for ready in self.taps.register(event, now, &tap) {
            self.deliver_tap(&ready);
        }
    }
}
