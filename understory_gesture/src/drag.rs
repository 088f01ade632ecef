// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draggable items as described by the delegate.

use core::hash::{Hash, Hasher};

use understory_snap::SnapGrid;

use crate::input::InteractionId;

/// Delegate-assigned identity of a draggable item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DragId(pub u64);

/// How heavily a thrown item is slowed down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragForce {
    /// Same decay as the canvas (0.98 per frame).
    Standard,
    /// Stops sooner (0.955 per frame).
    Heavy,
}

impl DragForce {
    /// Per-frame velocity multiplier.
    #[must_use]
    pub fn dampening(self) -> f64 {
        match self {
            Self::Standard => 0.98,
            Self::Heavy => 0.955,
        }
    }
}

/// Whether a released drag keeps moving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragPhysics {
    /// The item stops when the pointer lifts.
    #[default]
    Inactive,
    /// The item coasts with the given force.
    Active(DragForce),
}

impl DragPhysics {
    /// Dampening of the active force, if any.
    #[must_use]
    pub fn dampening(self) -> Option<f64> {
        match self {
            Self::Inactive => None,
            Self::Active(force) => Some(force.dampening()),
        }
    }
}

/// A draggable item returned by the delegate's hit test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drag {
    /// Item identity.
    pub id: DragId,
    /// Momentum behaviour after release.
    pub physics: DragPhysics,
    /// Grid the item settles onto when the drag ends.
    pub snap_grid: Option<SnapGrid>,
}

impl Drag {
    /// A drag with no momentum and no snapping.
    #[must_use]
    pub const fn new(id: DragId) -> Self {
        Self {
            id,
            physics: DragPhysics::Inactive,
            snap_grid: None,
        }
    }

    /// Sets the physics.
    #[must_use]
    pub const fn with_physics(self, physics: DragPhysics) -> Self {
        Self { physics, ..self }
    }

    /// Sets the snap grid.
    #[must_use]
    pub const fn with_snap_grid(self, snap_grid: SnapGrid) -> Self {
        Self {
            snap_grid: Some(snap_grid),
            ..self
        }
    }

    /// `true` if a released drag enters momentum.
    #[must_use]
    pub fn has_force(&self) -> bool {
        matches!(self.physics, DragPhysics::Active(_))
    }
}

/// A drag bound to the interaction moving it.
///
/// Equality and hashing use the drag id and the interaction id only.
#[derive(Clone, Copy, Debug)]
pub struct DragInteraction {
    /// The item being dragged.
    pub drag: Drag,
    /// The pointer moving it.
    pub interaction: InteractionId,
}

impl PartialEq for DragInteraction {
    fn eq(&self, other: &Self) -> bool {
        self.drag.id == other.drag.id && self.interaction == other.interaction
    }
}

impl Eq for DragInteraction {}

impl Hash for DragInteraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.drag.id.hash(state);
        self.interaction.hash(state);
    }
}
