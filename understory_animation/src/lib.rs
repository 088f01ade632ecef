// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_animation --heading-base-level=0

//! Understory Animation: cooperative, tick-driven animations and timeouts.
//!
//! Everything in this crate is driven by the caller. There are no threads and
//! no clocks: every operation takes the current time `now` as a monotonic
//! millisecond timestamp, typically read once per display refresh. This keeps
//! behavior deterministic and lets tests step time explicitly.
//!
//! The crate provides:
//! - [`Easing`]: cosine-shaped easing curves.
//! - [`Animation`]: the timing of one animation (start, duration, easing).
//! - [`Scheduler`]: runs many animations, each carrying a caller-defined
//!   payload, and reports [`Frame`]s on every tick.
//! - [`Animator`]: the same contract with `on_tick` / `on_done` closures.
//! - [`Timeout`]: a cancellable one-shot deadline with
//!   cancel-and-replace rescheduling.
//!
//! ## Guarantees
//!
//! For every animation:
//! - A fraction-0 frame is produced as soon as it starts.
//! - Fractions never decrease.
//! - Exactly one frame is marked `done`, its fraction is `1.0`, and nothing is
//!   reported for that animation afterwards.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_animation::{Easing, Scheduler};
//!
//! let mut scheduler = Scheduler::new();
//! let (_, first) = scheduler.start(1_000, 200, Easing::EaseOut, "fade");
//! assert_eq!(first.fraction, 0.0);
//!
//! let frames = scheduler.tick(1_100);
//! assert!(frames[0].fraction > 0.5);
//! assert!(!frames[0].done);
//!
//! let frames = scheduler.tick(1_250);
//! assert_eq!(frames[0].fraction, 1.0);
//! assert!(frames[0].done);
//! assert!(scheduler.is_empty());
//! ```

mod animation;
mod animator;
mod easing;
mod scheduler;
mod timeout;

pub use animation::Animation;
pub use animator::Animator;
pub use easing::Easing;
pub use scheduler::{AnimationId, Frame, Scheduler};
pub use timeout::Timeout;
