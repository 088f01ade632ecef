// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary between the engine and the host application.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use kurbo::{Point, Rect, Vec2};
use understory_coordinate::Coordinate;

use crate::drag::Drag;
use crate::input::{Modifiers, MoveSource, PointerButton};

/// A recognized tap (or multi-tap).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapEvent {
    /// Screen location of the first tap.
    pub location: Point,
    /// Content position under `location` when the tap was recognized.
    pub position: Point,
    /// Number of taps in the sequence.
    pub count: u32,
    /// Mouse button, for mouse taps.
    pub button: Option<PointerButton>,
    /// Modifiers held at pointer-down.
    pub modifiers: Modifiers,
}

/// Callbacks from the engine to the host.
///
/// Every method has an empty default body. The engine holds the delegate
/// weakly; once the host drops it every call becomes a no-op.
///
/// `drag_hit_test` and `drag_position` are queries and must not call back
/// into the session.
#[allow(unused_variables, reason = "default bodies ignore their arguments")]
pub trait CanvasDelegate {
    /// Returns the draggable item at a content `position`, if any.
    fn drag_hit_test(&self, position: Point, coordinate: &Coordinate) -> Option<Drag> {
        None
    }

    /// Current content position of a dragged item.
    fn drag_position(&self, drag: &Drag, coordinate: &Coordinate) -> Point {
        Point::ZERO
    }

    /// Moves a dragged item to a content `position`.
    fn set_drag_position(&mut self, drag: &Drag, position: Point, coordinate: &Coordinate) {}

    /// A drag was claimed by a pointer.
    fn drag_started(&mut self, drag: &Drag, coordinate: &Coordinate) {}

    /// The pointer moving a drag lifted; `velocity` is in screen px per frame.
    fn drag_released(&mut self, drag: &Drag, velocity: Vec2) {}

    /// The drag stopped moving; a snap animation may follow.
    fn drag_will_end(&mut self, drag: &Drag) {}

    /// The drag is over, including any snap animation.
    fn drag_did_end(&mut self, drag: &Drag) {}

    /// The canvas started moving.
    fn move_started(&mut self, source: MoveSource, coordinate: &Coordinate) {}

    /// The canvas moved.
    fn move_updated(&mut self, source: MoveSource, coordinate: &Coordinate) {}

    /// The canvas stopped moving.
    fn move_ended(&mut self, source: MoveSource, coordinate: &Coordinate) {}

    /// A tap or multi-tap was recognized.
    fn tap(&mut self, tap: &TapEvent) {}

    // Pointer profile.

    /// A rubber-band selection started; `rect` is in content space.
    fn selection_started(&mut self, rect: Rect, modifiers: Modifiers) {}

    /// The rubber-band rectangle changed.
    fn selection_changed(&mut self, rect: Rect, modifiers: Modifiers) {}

    /// The rubber-band selection finished.
    fn selection_ended(&mut self, rect: Rect, modifiers: Modifiers) {}

    /// A button the engine does not track was pressed.
    fn pointer_button_pressed(&mut self, button: PointerButton, location: Point, modifiers: Modifiers) {}
}

/// Weak link from the session to its delegate.
#[derive(Default)]
pub(crate) struct DelegateLink {
    delegate: Option<Weak<RefCell<dyn CanvasDelegate>>>,
}

impl fmt::Debug for DelegateLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateLink")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl DelegateLink {
    pub(crate) fn set<D: CanvasDelegate + 'static>(&mut self, delegate: &Rc<RefCell<D>>) {
        let delegate: Rc<RefCell<dyn CanvasDelegate>> = delegate.clone();
        self.delegate = Some(Rc::downgrade(&delegate));
    }

    pub(crate) fn clear(&mut self) {
        self.delegate = None;
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.delegate.as_ref().is_some_and(|d| d.strong_count() > 0)
    }

    /// Runs `f` against the delegate, or returns `None` if it is gone or busy.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut dyn CanvasDelegate) -> R) -> Option<R> {
        let delegate = self.delegate.as_ref()?.upgrade()?;
        let Ok(mut delegate) = delegate.try_borrow_mut() else {
            log::warn!("canvas delegate is already borrowed; callback skipped");
            return None;
        };
        Some(f(&mut *delegate))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use kurbo::Point;
    use understory_coordinate::Coordinate;

    use super::{CanvasDelegate, DelegateLink};
    use crate::drag::{Drag, DragId};

    #[derive(Default)]
    struct Counter {
        moved: usize,
    }

    impl CanvasDelegate for Counter {
        fn set_drag_position(&mut self, _: &Drag, _: Point, _: &Coordinate) {
            self.moved += 1;
        }
    }

    fn poke(link: &DelegateLink) -> Option<()> {
        link.with(|d| d.set_drag_position(&Drag::new(DragId(0)), Point::ZERO, &Coordinate::IDENTITY))
    }

    #[test]
    fn calls_reach_a_live_delegate() {
        let counter = Rc::new(RefCell::new(Counter::default()));
        let mut link = DelegateLink::default();
        link.set(&counter);
        assert!(poke(&link).is_some());
        assert_eq!(counter.borrow().moved, 1);
    }

    #[test]
    fn dropped_delegate_turns_calls_into_no_ops() {
        let mut link = DelegateLink::default();
        assert!(poke(&link).is_none());
        {
            let counter = Rc::new(RefCell::new(Counter::default()));
            link.set(&counter);
        }
        assert!(!link.is_attached());
        assert!(poke(&link).is_none());
    }

    #[test]
    fn busy_delegate_is_skipped() {
        let counter = Rc::new(RefCell::new(Counter::default()));
        let mut link = DelegateLink::default();
        link.set(&counter);
        let guard = counter.borrow();
        assert!(poke(&link).is_none());
        drop(guard);
        assert_eq!(counter.borrow().moved, 0);
    }
}
