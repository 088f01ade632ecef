// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_snap --heading-base-level=0

//! Understory Snap: quantize content positions onto a square or triangular grid.
//!
//! The functions here are pure and deterministic. They are shared by code
//! that releases dragged content onto a grid and by code that draws the grid,
//! so both always agree on where grid points are.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_snap::SnapGrid;
//!
//! let grid = SnapGrid::Square(10.0);
//! assert_eq!(grid.snap(Point::new(13.0, -6.0)), Point::new(10.0, -10.0));
//!
//! // Triangular grids tile the plane with equilateral triangles whose rows
//! // are `size` apart.
//! let grid = SnapGrid::Triangle(10.0);
//! assert_eq!(grid.snap(Point::ZERO), Point::ZERO);
//! ```
//!
//! ## Triangular lattice
//!
//! A triangle grid of size `s` has columns `w = s / sqrt(0.75)` apart (the
//! triangle side) and rows `s` apart. It is the union of two rectangular
//! lattices with spacing `(w, 2s)`: lattice A passes through the origin and
//! lattice B is lattice A shifted by `(w / 2, s)`. A point snaps to the nearer
//! of its nearest A point and its nearest B point; exact ties go to A.

use kurbo::Point;

/// A grid that released content snaps onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapGrid {
    /// Axis-aligned square grid with the given spacing.
    Square(f64),
    /// Triangular grid with the given row spacing.
    Triangle(f64),
}

impl SnapGrid {
    /// Returns the grid point nearest to `point`.
    ///
    /// Grids with a non-positive or non-finite size leave `point` unchanged.
    #[must_use]
    pub fn snap(&self, point: Point) -> Point {
        match *self {
            Self::Square(size) => snap_square(point, size),
            Self::Triangle(size) => snap_triangle(point, size),
        }
    }

    /// Grid spacing as given at construction.
    #[must_use]
    pub fn size(&self) -> f64 {
        match *self {
            Self::Square(size) | Self::Triangle(size) => size,
        }
    }
}

fn usable(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

/// Rounds each axis independently to the nearest multiple of `size`.
#[must_use]
pub fn snap_square(point: Point, size: f64) -> Point {
    if !usable(size) {
        return point;
    }
    Point::new(
        (point.x / size).round() * size,
        (point.y / size).round() * size,
    )
}

/// Snaps to the nearest point of a triangular grid with row spacing `size`.
#[must_use]
pub fn snap_triangle(point: Point, size: f64) -> Point {
    if !usable(size) {
        return point;
    }
    let width = size / 0.75_f64.sqrt();
    let height = size;

    let a = Point::new(
        (point.x / width).round() * width,
        (point.y / (2.0 * height)).round() * 2.0 * height,
    );
    let b = Point::new(
        ((point.x - width / 2.0) / width).round() * width + width / 2.0,
        ((point.y - height) / (2.0 * height)).round() * 2.0 * height + height,
    );
    nearer(point, a, b)
}

/// Picks whichever of `a` and `b` is closer to `point`, preferring `a` on ties.
fn nearer(point: Point, a: Point, b: Point) -> Point {
    if point.distance(a) <= point.distance(b) {
        a
    } else {
        b
    }
}
