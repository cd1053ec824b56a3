// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the check tree: entry identifiers, flags, and per-entry data.

use alloc::string::String;

/// Identifier for an entry in a [`Tree`](crate::Tree) (generational).
///
/// The third field tags the tree that minted the id, so an id handed to a
/// different tree is rejected instead of aliasing an unrelated slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntryId(pub(crate) u32, pub(crate) u32, pub(crate) u32);

impl EntryId {
    pub(crate) const fn new(idx: u32, generation: u32, tree: u32) -> Self {
        Self(idx, generation, tree)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-entry toggle and display flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EntryFlags: u8 {
        /// A toggle control is rendered for this entry.
        const TOGGLE_VISIBLE = 0b0000_0001;
        /// The toggle is checked. Persists even while the toggle is hidden.
        const CHECKED        = 0b0000_0010;
        /// The icon (if any) is displayed.
        const ICON_VISIBLE   = 0b0000_0100;
    }
}

impl Default for EntryFlags {
    fn default() -> Self {
        Self::TOGGLE_VISIBLE | Self::ICON_VISIBLE
    }
}

/// Opaque icon handle. The host decides what it refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IconId(pub u64);

/// 8-bit RGBA color.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from its red, green and blue components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

/// Optional text color overrides. `None` leaves the choice to the renderer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextColors {
    /// Text color.
    pub foreground: Option<Rgba8>,
    /// Background behind the text.
    pub background: Option<Rgba8>,
}

/// Data carried by a single tree entry.
///
/// Structure (parent and children) is owned by the [`Tree`](crate::Tree); an
/// `Entry` only holds display and toggle state plus a user payload `T`.
///
/// ```rust
/// use understory_check_tree::{Entry, IconId};
///
/// let entry = Entry::new("Pizza").with_checked(true).with_icon(IconId(7));
/// assert!(entry.checked());
/// assert!(entry.toggle_visible());
/// assert_eq!(entry.icon, Some(IconId(7)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entry<T = ()> {
    /// Display label.
    pub text: String,
    /// Toggle and icon flags.
    pub flags: EntryFlags,
    /// Optional icon, display-only.
    pub icon: Option<IconId>,
    /// Optional text colors, display-only.
    pub colors: TextColors,
    /// User payload.
    pub data: T,
}

impl Entry {
    /// Create an entry with the given label and a visible, unchecked toggle.
    ///
    /// Use [`Entry::with_data`] to attach a payload.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flags: EntryFlags::default(),
            icon: None,
            colors: TextColors::default(),
            data: (),
        }
    }
}

impl<T> Entry<T> {
    /// Set the user payload, possibly changing its type.
    pub fn with_data<U>(self, data: U) -> Entry<U> {
        Entry {
            text: self.text,
            flags: self.flags,
            icon: self.icon,
            colors: self.colors,
            data,
        }
    }

    /// Set the checked state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.flags.set(EntryFlags::CHECKED, checked);
        self
    }

    /// Hide the toggle control.
    pub fn with_toggle_hidden(self) -> Self {
        self.with_toggle_visible(false)
    }

    /// Show or hide the toggle control.
    pub fn with_toggle_visible(mut self, visible: bool) -> Self {
        self.flags.set(EntryFlags::TOGGLE_VISIBLE, visible);
        self
    }

    /// Set the icon.
    pub fn with_icon(mut self, icon: IconId) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Show or hide the icon.
    pub fn with_icon_visible(mut self, visible: bool) -> Self {
        self.flags.set(EntryFlags::ICON_VISIBLE, visible);
        self
    }

    /// Set the text color overrides.
    pub fn with_colors(mut self, colors: TextColors) -> Self {
        self.colors = colors;
        self
    }

    /// Whether a toggle control is rendered for this entry.
    pub fn toggle_visible(&self) -> bool {
        self.flags.contains(EntryFlags::TOGGLE_VISIBLE)
    }

    /// Current toggle state.
    pub fn checked(&self) -> bool {
        self.flags.contains(EntryFlags::CHECKED)
    }

    /// Whether the icon is displayed (when there is one).
    pub fn icon_visible(&self) -> bool {
        self.flags.contains(EntryFlags::ICON_VISIBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_defaults() {
        let e = Entry::new("Food");
        assert_eq!(e.text, "Food");
        assert!(e.toggle_visible());
        assert!(!e.checked());
        assert!(e.icon_visible());
        assert_eq!(e.icon, None);
        assert_eq!(e.colors, TextColors::default());
    }

    #[test]
    fn hidden_toggle_keeps_checked_state() {
        let e = Entry::new("x").with_checked(true).with_toggle_hidden();
        assert!(!e.toggle_visible());
        assert!(e.checked(), "checked persists while the toggle is hidden");
    }

    #[test]
    fn with_data_changes_payload_type() {
        let e = Entry::new("x").with_checked(true).with_data(42_u32);
        assert_eq!(e.data, 42);
        assert!(e.checked());
    }
}
