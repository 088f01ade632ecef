// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_coordinate --heading-base-level=0

//! Understory Coordinate: the pan/zoom/rotate transform of an infinite canvas.
//!
//! This crate provides a small, immutable value type describing how an
//! unbounded content plane is placed on screen. It focuses on:
//! - Conversion between screen (view) points and content positions.
//! - Deriving new transforms by translating, scaling or rotating about a
//!   fixed screen point (the building blocks of pan, pinch, scroll-zoom and
//!   rotate gestures).
//! - Interpolating between two transforms for animations.
//!
//! A [`Coordinate`] is replaced wholesale on every update: there is no
//! interior mutability and no partial update, so a reader never observes a
//! half-applied gesture.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_coordinate::Coordinate;
//!
//! // Content is shifted by (100, 50) and zoomed 2x.
//! let coordinate = Coordinate::new(Vec2::new(100.0, 50.0), 2.0, 0.0);
//!
//! // Screen → content, for hit testing.
//! let content = coordinate.position_at(Point::new(120.0, 70.0));
//! assert!((content - Point::new(10.0, 10.0)).hypot() < 1e-9);
//!
//! // Content → screen, for placing things.
//! let screen = coordinate.location_at(content);
//! assert!((screen - Point::new(120.0, 70.0)).hypot() < 1e-9);
//! ```
//!
//! ## Gesture helpers
//!
//! Gestures are expressed as derived coordinates. Zooming about the pointer
//! keeps the content under the pointer fixed:
//!
//! ```rust
//! use kurbo::Point;
//! use understory_coordinate::Coordinate;
//!
//! let anchor = Point::new(400.0, 300.0);
//! let before = Coordinate::IDENTITY;
//! let after = before.scaled_about(anchor, 2.0).rotated_about(anchor, 0.5);
//!
//! let under_pointer = before.position_at(anchor);
//! let moved = after.position_at(anchor);
//! assert!((under_pointer - moved).hypot() < 1e-9);
//! ```
//!
//! ## Rotation
//!
//! Rotation of a vector is performed by an explicit polar round-trip
//! (`atan2`/`hypot`, add the angle, convert back) rather than a 2x2 matrix
//! multiply; see [`rotate`]. Renderers that want a matrix can use
//! [`Coordinate::to_affine`].

mod coordinate;
mod rotation;

pub use coordinate::{Coordinate, CoordinateError};
pub use rotation::{normalize_degrees, normalize_radians, rotate, rotate_point};
