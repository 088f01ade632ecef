// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

/// Rotates `vector` by `angle` radians.
///
/// The vector is converted to polar form (`atan2`, `hypot`), the angle is
/// added, and the result is converted back. Every non-zero vector takes the
/// round-trip, a zero angle included, so results match other implementations
/// of the same conversion bit for bit. A zero vector has no defined direction
/// but also no length, so it is returned unchanged.
#[must_use]
pub fn rotate(vector: Vec2, angle: f64) -> Vec2 {
    let radius = vector.hypot();
    if radius == 0.0 {
        return vector;
    }
    Vec2::from_angle(vector.atan2() + angle) * radius
}

/// Rotates `point` by `angle` radians around `about`.
#[must_use]
pub fn rotate_point(point: Point, angle: f64, about: Point) -> Point {
    about + rotate(point - about, angle)
}

/// Wraps an angle in degrees into `(-180, 180]`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Wraps an angle in radians into `(-π, π]`.
#[must_use]
pub fn normalize_radians(radians: f64) -> f64 {
    use core::f64::consts::{PI, TAU};
    let wrapped = radians % TAU;
    if wrapped > PI {
        wrapped - TAU
    } else if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}
