// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Affine, Point, Vec2};

use crate::rotation::{normalize_degrees, rotate};

/// Error returned by [`Coordinate::try_new`] for parameters that would break
/// the transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CoordinateError {
    /// The scale was zero or negative.
    NonPositiveScale(f64),
    /// The offset, scale or angle was NaN or infinite.
    NonFinite,
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveScale(scale) => {
                write!(f, "coordinate scale must be positive, got {scale}")
            }
            Self::NonFinite => f.write_str("coordinate has a non-finite component"),
        }
    }
}

impl core::error::Error for CoordinateError {}

/// Placement of the infinite content plane on screen.
///
/// A content position `p` appears on screen at
/// `rotate(p, angle) * scale + offset`. The inverse maps screen points back to
/// content positions. `scale` is always positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    offset: Vec2,
    scale: f64,
    angle: f64,
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Coordinate {
    /// Content and screen coincide.
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        scale: 1.0,
        angle: 0.0,
    };

    /// Creates a coordinate from an offset (screen pixels), a scale and an
    /// angle in radians.
    ///
    /// Callers are expected to pass a positive, finite scale; this is checked
    /// in debug builds. Use [`Coordinate::try_new`] for untrusted input.
    #[must_use]
    pub fn new(offset: Vec2, scale: f64, angle: f64) -> Self {
        debug_assert!(scale > 0.0, "coordinate scale must be positive");
        Self {
            offset,
            scale,
            angle,
        }
    }

    /// Creates a coordinate, rejecting non-finite components and
    /// non-positive scales.
    pub fn try_new(offset: Vec2, scale: f64, angle: f64) -> Result<Self, CoordinateError> {
        if !offset.is_finite() || !scale.is_finite() || !angle.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if scale <= 0.0 {
            return Err(CoordinateError::NonPositiveScale(scale));
        }
        Ok(Self {
            offset,
            scale,
            angle,
        })
    }

    /// Screen-space translation of the content origin.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Uniform zoom factor.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Rotation in degrees.
    #[must_use]
    pub fn degrees(&self) -> f64 {
        self.angle.to_degrees()
    }

    /// Returns `true` if no component is NaN or infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.offset.is_finite() && self.scale.is_finite() && self.angle.is_finite()
    }

    /// Returns a copy with a different offset.
    #[must_use]
    pub fn with_offset(self, offset: Vec2) -> Self {
        Self { offset, ..self }
    }

    /// Returns a copy with a different scale.
    #[must_use]
    pub fn with_scale(self, scale: f64) -> Self {
        Self::new(self.offset, scale, self.angle)
    }

    /// Returns a copy with a different angle (radians).
    #[must_use]
    pub fn with_angle(self, angle: f64) -> Self {
        Self { angle, ..self }
    }

    /// Converts a screen point into a content position.
    #[must_use]
    pub fn position_at(&self, screen: Point) -> Point {
        rotate((screen.to_vec2() - self.offset) / self.scale, -self.angle).to_point()
    }

    /// Converts a content position into a screen point.
    #[must_use]
    pub fn location_at(&self, content: Point) -> Point {
        (self.scale_rotate(content.to_vec2()) + self.offset).to_point()
    }

    /// Maps a content-space vector into a screen-space vector (no offset).
    #[must_use]
    pub fn scale_rotate(&self, vector: Vec2) -> Vec2 {
        rotate(vector, self.angle) * self.scale
    }

    /// Moves the content by a screen-space delta.
    #[must_use]
    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            offset: self.offset + delta,
            ..self
        }
    }

    /// Multiplies the scale by `ratio`, keeping the screen point `center`
    /// over the same content position.
    #[must_use]
    pub fn scaled_about(self, center: Point, ratio: f64) -> Self {
        let center = center.to_vec2();
        Self {
            offset: center + (self.offset - center) * ratio,
            scale: self.scale * ratio,
            angle: self.angle,
        }
    }

    /// Adds `delta` radians to the angle, keeping the screen point `center`
    /// over the same content position.
    #[must_use]
    pub fn rotated_about(self, center: Point, delta: f64) -> Self {
        let center = center.to_vec2();
        Self {
            offset: center + rotate(self.offset - center, delta),
            scale: self.scale,
            angle: self.angle + delta,
        }
    }

    /// Interpolates towards `other`.
    ///
    /// Offset and scale are interpolated linearly; the angle is interpolated
    /// linearly in degrees, so a transition from 350° to 10° sweeps back
    /// through 180°. See [`Coordinate::cross`] for the shortest arc.
    #[must_use]
    pub fn lerp(&self, other: &Self, fraction: f64) -> Self {
        let from = self.degrees();
        let to = other.degrees();
        self.blend(other, fraction, from + (to - from) * fraction)
    }

    /// Interpolates towards `other` along the shortest angular arc.
    ///
    /// Identical to [`Coordinate::lerp`] for offset and scale; the angle
    /// difference is wrapped into `(-180°, 180°]` before interpolating.
    #[must_use]
    pub fn cross(&self, other: &Self, fraction: f64) -> Self {
        let from = self.degrees();
        let sweep = normalize_degrees(other.degrees() - from);
        self.blend(other, fraction, from + sweep * fraction)
    }

    fn blend(&self, other: &Self, fraction: f64, degrees: f64) -> Self {
        Self {
            offset: self.offset + (other.offset - self.offset) * fraction,
            scale: self.scale + (other.scale - self.scale) * fraction,
            angle: degrees.to_radians(),
        }
    }

    /// Returns the content → screen transform as an affine matrix.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::rotate(self.angle) * Affine::scale(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use kurbo::{Point, Vec2};

    use super::{Coordinate, CoordinateError};

    fn near(a: Point, b: Point, eps: f64) -> bool {
        (a - b).hypot() <= eps
    }

    fn samples() -> [Coordinate; 4] {
        [
            Coordinate::IDENTITY,
            Coordinate::new(Vec2::new(100.0, -40.0), 2.5, 0.0),
            Coordinate::new(Vec2::new(-12.0, 7.0), 0.25, 1.1),
            Coordinate::new(Vec2::new(3e4, 2e4), 40.0, -2.9),
        ]
    }

    #[test]
    fn position_location_roundtrip() {
        for c in samples() {
            for p in [
                Point::ZERO,
                Point::new(1.0, 2.0),
                Point::new(-250.0, 13.5),
                Point::new(1e5, -1e5),
            ] {
                let back = c.position_at(c.location_at(p));
                assert!(near(back, p, 1e-9 * p.to_vec2().hypot().max(1.0)), "{c:?} {p:?}");
            }
        }
    }

    #[test]
    fn quarter_turn_places_content_x_axis_downwards() {
        let c = Coordinate::new(Vec2::ZERO, 2.0, FRAC_PI_2);
        assert!(near(c.location_at(Point::new(1.0, 0.0)), Point::new(0.0, 2.0), 1e-12));
    }

    #[test]
    fn affine_matches_location_at() {
        for c in samples() {
            let p = Point::new(17.0, -3.0);
            assert!(near(c.to_affine() * p, c.location_at(p), 1e-6));
        }
    }

    #[test]
    fn scaled_about_keeps_center_fixed() {
        let c = Coordinate::new(Vec2::new(30.0, 40.0), 1.5, 0.4);
        let center = Point::new(200.0, 120.0);
        let before = c.position_at(center);
        let after = c.scaled_about(center, 3.0);
        assert!((after.scale() - 4.5).abs() < 1e-12);
        assert!(near(after.position_at(center), before, 1e-9));
    }

    #[test]
    fn rotated_about_keeps_center_fixed() {
        let c = Coordinate::new(Vec2::new(30.0, 40.0), 1.5, 0.4);
        let center = Point::new(-20.0, 60.0);
        let before = c.position_at(center);
        let after = c.rotated_about(center, -1.3);
        assert!((after.angle() - (0.4 - 1.3)).abs() < 1e-12);
        assert!(near(after.position_at(center), before, 1e-9));
    }

    #[test]
    fn lerp_is_linear_in_degrees() {
        let a = Coordinate::new(Vec2::new(0.0, 0.0), 1.0, 350_f64.to_radians());
        let b = Coordinate::new(Vec2::new(10.0, -20.0), 3.0, 10_f64.to_radians());

        let mid = a.lerp(&b, 0.5);
        assert!((mid.degrees() - 180.0).abs() < 1e-9);
        assert_eq!(mid.offset(), Vec2::new(5.0, -10.0));
        assert!((mid.scale() - 2.0).abs() < 1e-12);

        assert_eq!(a.lerp(&b, 0.0).offset(), a.offset());
        assert!((a.lerp(&b, 1.0).degrees() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn cross_takes_shortest_arc() {
        let a = Coordinate::new(Vec2::ZERO, 1.0, 350_f64.to_radians());
        let b = Coordinate::new(Vec2::ZERO, 1.0, 10_f64.to_radians());
        let mid = a.cross(&b, 0.5);
        assert!((mid.degrees() - 360.0).abs() < 1e-9);
    }

    #[test]
    fn try_new_rejects_degenerate_values() {
        assert_eq!(
            Coordinate::try_new(Vec2::ZERO, 0.0, 0.0),
            Err(CoordinateError::NonPositiveScale(0.0))
        );
        assert_eq!(
            Coordinate::try_new(Vec2::new(f64::NAN, 0.0), 1.0, 0.0),
            Err(CoordinateError::NonFinite)
        );
        assert_eq!(
            Coordinate::try_new(Vec2::ZERO, f64::INFINITY, 0.0),
            Err(CoordinateError::NonFinite)
        );
        assert!(Coordinate::try_new(Vec2::ZERO, 1.0, PI).is_ok());
    }

    #[test]
    fn non_finite_is_detected() {
        let c = Coordinate::IDENTITY.translated(Vec2::new(f64::NAN, 1.0));
        assert!(!c.is_finite());
        assert!(Coordinate::IDENTITY.is_finite());
    }
}
