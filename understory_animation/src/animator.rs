// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::easing::Easing;
use crate::scheduler::{AnimationId, Scheduler};

type OnTick = Box<dyn FnMut(f64)>;
type OnDone = Box<dyn FnOnce()>;

struct Callbacks {
    id: AnimationId,
    on_tick: OnTick,
    on_done: Option<OnDone>,
}

/// Closure-driven animations.
///
/// [`Animator::animate`] calls `on_tick(0.0)` immediately, then `on_tick`
/// with the eased fraction on every [`Animator::tick`] until the fraction
/// reaches `1.0`, then `on_done` exactly once. Dropping the animator discards
/// pending animations without calling `on_done`.
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use understory_animation::{Animator, Easing};
///
/// let log = Rc::new(RefCell::new(Vec::new()));
/// let mut animator = Animator::new();
/// let (ticks, done) = (log.clone(), log.clone());
/// animator.animate(
///     0,
///     100,
///     Easing::Linear,
///     move |f| ticks.borrow_mut().push(f),
///     move || done.borrow_mut().push(-1.0),
/// );
/// animator.tick(50);
/// animator.tick(100);
/// assert_eq!(*log.borrow(), [0.0, 0.5, 1.0, -1.0]);
/// ```
#[derive(Default)]
pub struct Animator {
    scheduler: Scheduler<()>,
    callbacks: Vec<Callbacks>,
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("scheduler", &self.scheduler)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Animator {
    /// Creates an animator with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when no animation is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Starts an animation; `on_tick(0.0)` runs before this returns.
    pub fn animate(
        &mut self,
        now: u64,
        duration: u64,
        easing: Easing,
        on_tick: impl FnMut(f64) + 'static,
        on_done: impl FnOnce() + 'static,
    ) -> AnimationId {
        let mut on_tick: OnTick = Box::new(on_tick);
        on_tick(0.0);
        let (id, frame) = self.scheduler.start(now, duration, easing, ());
        if frame.done {
            on_tick(frame.fraction);
            on_done();
            return id;
        }
        self.callbacks.push(Callbacks {
            id,
            on_tick,
            on_done: Some(Box::new(on_done)),
        });
        id
    }

    /// Advances every animation to `now`.
    pub fn tick(&mut self, now: u64) {
        for frame in self.scheduler.tick(now) {
            let Some(index) = self.callbacks.iter().position(|c| c.id == frame.id) else {
                continue;
            };
            let callbacks = &mut self.callbacks[index];
            (callbacks.on_tick)(frame.fraction);
            if frame.done {
                let mut finished = self.callbacks.remove(index);
                if let Some(on_done) = finished.on_done.take() {
                    on_done();
                }
            }
        }
    }

    /// Discards an animation without calling its `on_done`.
    pub fn cancel(&mut self, id: AnimationId) {
        self.scheduler.cancel(id);
        self.callbacks.retain(|c| c.id != id);
    }
}
