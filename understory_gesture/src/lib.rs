// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: pointer arbitration for an infinite 2D canvas.
//!
//! A [`CanvasSession`] turns raw pointer, scroll and magnify input into
//! canvas transforms ([`Coordinate`](understory_coordinate::Coordinate)) and
//! item drags. It decides which pointer pans, which pair pinches (translate,
//! scale and rotate together), and which pointers drag items owned by the
//! host, and it keeps released pointers moving with momentum.
//!
//! The host supplies:
//! - Input events with a millisecond timestamp.
//! - A display tick ([`CanvasSession::frame`]) while
//!   [`CanvasSession::needs_frame`] is `true`.
//! - A [`CanvasDelegate`] that hit-tests draggable items, owns their
//!   positions and receives move, drag, tap and selection callbacks.
//!
//! Arbitration rules:
//! - A pointer that lands on a draggable item drags it; each item is dragged
//!   by at most one pointer.
//! - Two free pointers pinch. A third pointer stays idle until one of the
//!   pinching pointers lifts.
//! - A single free pointer pans.
//! - Released pointers coast with per-frame velocity decay and keep driving
//!   whatever role they had until they stop.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Size};
//! use understory_coordinate::Coordinate;
//! use understory_gesture::{
//!     CanvasDelegate, CanvasSession, InteractionId, InteractionInfo, MoveSource,
//! };
//!
//! #[derive(Default)]
//! struct Moves(usize);
//!
//! impl CanvasDelegate for Moves {
//!     fn move_updated(&mut self, _: MoveSource, _: &Coordinate) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let moves = Rc::new(RefCell::new(Moves::default()));
//! let mut session = CanvasSession::new(Size::new(800.0, 600.0));
//! session.set_delegate(&moves);
//!
//! let (a, b) = (InteractionId(1), InteractionId(2));
//! session.pointer_down(a, Point::new(300.0, 300.0), InteractionInfo::touch(), 0);
//! session.pointer_down(b, Point::new(500.0, 300.0), InteractionInfo::touch(), 0);
//! session.pointer_move(b, Point::new(700.0, 300.0), 16);
//!
//! // The fingers moved apart: zoomed in.
//! assert!(session.pinch_interaction().is_some());
//! assert!(session.coordinate().scale() > 1.9);
//! assert_eq!(moves.borrow().0, 1);
//! ```
//!
//! ## Snapping
//!
//! With [`CanvasSettings::snap_angle`] set, a rotated canvas settles onto the
//! nearest multiple of the step when it is close enough. Items whose
//! [`Drag`] carries a snap grid settle onto the grid when dropped. Both
//! animate; the move or drag is reported as ended once they finish.
//!
//! This crate is `std`: it relies on `Rc`/`RefCell` for the delegate link
//! and on floating-point trigonometry.

mod arbitration;
mod delegate;
mod drag;
mod input;
mod interaction;
mod scroll;
mod session;
mod settings;
mod snapping;
mod tap;

pub use delegate::{CanvasDelegate, TapEvent};
pub use drag::{Drag, DragForce, DragId, DragInteraction, DragPhysics};
pub use input::{
    InputProfile, InteractionId, InteractionInfo, Modifiers, MoveSource, PointerButton,
    PointerDevice,
};
pub use interaction::{Interaction, PinchInteraction};
pub use session::CanvasSession;
pub use settings::{CanvasSettings, MomentumSettings, TapSettings};
pub use snapping::snap_angle_delta;
