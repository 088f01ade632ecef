// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized pointer input model.

/// Host-assigned identifier of a pointer contact (finger, mouse button, pen).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractionId(pub u64);

/// Mouse button identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
    /// Any additional button (back, forward, …), by platform number.
    Other(u16),
}

/// Kind of device that produced an interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerDevice {
    /// A finger on a touch screen.
    Touch,
    /// A stylus.
    Pen,
    /// A mouse or trackpad click with the given button.
    Mouse(PointerButton),
}

bitflags::bitflags! {
    /// Keyboard modifiers held during input.
    ///
    /// The engine only consults these to choose between rotate, zoom and pan
    /// for scroll input; otherwise they are passed through to the delegate.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Option / Alt.
        const OPTION  = 0b0000_0100;
        /// Command / Meta.
        const COMMAND = 0b0000_1000;
    }
}

/// Device information captured when an interaction starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InteractionInfo {
    /// Which device produced the interaction.
    pub device: PointerDevice,
    /// Modifiers held at pointer-down.
    pub modifiers: Modifiers,
}

impl InteractionInfo {
    /// A finger touch.
    #[must_use]
    pub const fn touch() -> Self {
        Self {
            device: PointerDevice::Touch,
            modifiers: Modifiers::empty(),
        }
    }

    /// A mouse press with `button`.
    #[must_use]
    pub const fn mouse(button: PointerButton) -> Self {
        Self {
            device: PointerDevice::Mouse(button),
            modifiers: Modifiers::empty(),
        }
    }

    /// Returns a copy with `modifiers` recorded.
    #[must_use]
    pub const fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    /// The mouse button, for mouse interactions.
    #[must_use]
    pub fn button(&self) -> Option<PointerButton> {
        match self.device {
            PointerDevice::Mouse(button) => Some(button),
            PointerDevice::Touch | PointerDevice::Pen => None,
        }
    }
}

impl Default for InteractionInfo {
    fn default() -> Self {
        Self::touch()
    }
}

/// Which family of platform callbacks the engine drives.
///
/// This is chosen once, in [`CanvasSettings`](crate::CanvasSettings), rather
/// than per event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputProfile {
    /// Touch screens: every contact can pan, pinch or drag.
    #[default]
    Touch,
    /// Mouse and trackpad: the left button selects (rubber band), right and
    /// middle buttons pan, extra buttons are reported as button presses.
    Pointer,
}

/// What drove a canvas move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveSource {
    /// A pan or pinch driven by tracked pointers.
    Pointer,
    /// Scroll wheel, trackpad scroll, magnify or rotate gestures.
    Scroll,
}
