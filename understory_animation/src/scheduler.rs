// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Payload-carrying animation scheduler.
//!
//! ## Usage
//!
//! 1) Call [`Scheduler::start`] with the current time and a payload that
//!    describes what is being animated. Apply the returned fraction-0 frame.
//! 2) On each display refresh call [`Scheduler::tick`] and apply every
//!    returned [`Frame`]. A frame with `done == true` is the last one for its
//!    animation; run any completion logic then.
//! 3) Drop, [`Scheduler::cancel`] or [`Scheduler::clear`] to discard pending
//!    animations without completing them.
//!
//! The payload is cloned into each frame, so it should be a small value
//! (targets, ids, start/end states) rather than a large buffer.

use crate::animation::Animation;
use crate::easing::Easing;

/// Handle to an animation started by a [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

/// One step of an animation.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<T> {
    /// Which animation produced this frame.
    pub id: AnimationId,
    /// The payload given to [`Scheduler::start`].
    pub payload: T,
    /// Eased fraction in `[0, 1]`.
    pub fraction: f64,
    /// Eased fraction of the previous frame (`0.0` on the first frame).
    pub previous: f64,
    /// `true` on the final frame only.
    pub done: bool,
}

#[derive(Clone, Debug)]
struct Running<T> {
    id: AnimationId,
    animation: Animation,
    payload: T,
}

/// Runs animations carrying payloads of type `T`.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    running: Vec<Running<T>>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Creates an empty scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            running: Vec::new(),
            next_id: 0,
        }
    }

    /// Returns `true` when no animation is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Number of animations in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.running.len()
    }

    /// Returns `true` if the animation is still in flight.
    #[must_use]
    pub fn contains(&self, id: AnimationId) -> bool {
        self.running.iter().any(|r| r.id == id)
    }

    /// Iterates the payloads of animations in flight, in start order.
    pub fn payloads(&self) -> impl Iterator<Item = (AnimationId, &T)> {
        self.running.iter().map(|r| (r.id, &r.payload))
    }

    /// Discards an animation without producing a final frame.
    ///
    /// Returns the payload if the animation was still in flight.
    pub fn cancel(&mut self, id: AnimationId) -> Option<T> {
        let index = self.running.iter().position(|r| r.id == id)?;
        Some(self.running.remove(index).payload)
    }

    /// Discards animations whose payload matches `predicate`, returning their payloads.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        let mut cancelled = Vec::new();
        let mut kept = Vec::with_capacity(self.running.len());
        for r in self.running.drain(..) {
            if predicate(&r.payload) {
                cancelled.push(r.payload);
            } else {
                kept.push(r);
            }
        }
        self.running = kept;
        cancelled
    }

    /// Discards every animation without producing final frames.
    pub fn clear(&mut self) {
        self.running.clear();
    }
}

impl<T: Clone> Scheduler<T> {
    /// Starts an animation and returns its id together with its first frame.
    ///
    /// The first frame has fraction `0.0`, unless `duration` is zero: then it
    /// is the final frame (fraction `1.0`, `done == true`) and nothing is
    /// scheduled.
    pub fn start(
        &mut self,
        now: u64,
        duration: u64,
        easing: Easing,
        payload: T,
    ) -> (AnimationId, Frame<T>) {
        let id = AnimationId(self.next_id);
        self.next_id += 1;

        let mut animation = Animation::new(now, duration, easing);
        if duration == 0 {
            let fraction = animation.advance(now);
            let frame = Frame {
                id,
                payload,
                fraction,
                previous: 0.0,
                done: true,
            };
            return (id, frame);
        }

        let frame = Frame {
            id,
            payload: payload.clone(),
            fraction: 0.0,
            previous: 0.0,
            done: false,
        };
        self.running.push(Running {
            id,
            animation,
            payload,
        });
        (id, frame)
    }

    /// Advances every animation to `now`, in start order.
    ///
    /// Finished animations are removed after their final frame is returned.
    pub fn tick(&mut self, now: u64) -> Vec<Frame<T>> {
        let mut frames = Vec::with_capacity(self.running.len());
        for r in &mut self.running {
            let previous = r.animation.fraction();
            let fraction = r.animation.advance(now);
            frames.push(Frame {
                id: r.id,
                payload: r.payload.clone(),
                fraction,
                previous,
                done: r.animation.is_finished(),
            });
        }
        self.running.retain(|r| !r.animation.is_finished());
        frames
    }
}
