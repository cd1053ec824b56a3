// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Toggle Hit: two-zone hit testing for the toggle control at the start of a tree row.
//!
//! A checkbox tree row is laid out as a leading region holding the toggle
//! control, followed by the icon and label:
//!
//! ```text
//! ┌──────── leading region ────────┬──────── label ────────┐
//! │   ┌───────┐                    │                       │
//! │   │control│       dead zone    │  row selection        │
//! │   └───────┘                    │                       │
//! └────────────────────────────────┴───────────────────────┘
//! ```
//!
//! - The **activation zone** is the control rectangle. A press there toggles the entry.
//! - The **dead zone** is the rest of the leading region. A press there does
//!   nothing, so a slightly missed toggle click does not change the selection.
//! - Everything else is outside both zones and falls through to the host's
//!   normal row handling.
//!
//! Within the leading region the two zones are mutually exclusive and
//! jointly exhaustive. [`ZoneLayout::classify`] returns exactly one [`HitZone`].
//!
//! This crate only does geometry. Enable `model_adapter` for
//! `adapters::model::handle_press`, which routes a press through an
//! `understory_check_tree::Tree`.
//!
//! ## Coordinates
//!
//! Row bounds and the pointer are given in the same (tree-relative) space.
//! [`ZoneLayout::control`] is relative to the leading region's origin, which
//! coincides with the row origin. Containment follows [`Rect::contains`]:
//! the top and left edges are inside, the bottom and right edges are not.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_toggle_hit::{HitZone, ZoneLayout};
//!
//! let layout = ZoneLayout::default();
//! let row = Rect::new(0.0, 0.0, 500.0, 20.0);
//! assert_eq!(layout.classify(row, Point::new(10.0, 10.0)), HitZone::Activation);
//! assert_eq!(layout.classify(row, Point::new(25.0, 10.0)), HitZone::DeadZone);
//! assert_eq!(layout.classify(row, Point::new(200.0, 10.0)), HitZone::Outside);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Point, Rect, Size, Vec2};

pub mod adapters;

/// Which part of a row a point falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitZone {
    /// Inside the toggle control.
    Activation,
    /// Inside the leading region but not the toggle control.
    DeadZone,
    /// Not in the leading region.
    Outside,
}

impl HitZone {
    /// Returns `true` for either zone of the leading region.
    pub fn is_leading(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// Geometry of the leading region and its toggle control.
///
/// The default matches a 13×13 control inset by 4 with a 13 wide gap before
/// the label: `control = (4, 4)–(17, 17)`, `leading_width = 30`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneLayout {
    /// Width of the leading region. It spans the full row height.
    pub leading_width: f64,
    /// Toggle control rectangle, relative to the leading region's origin.
    pub control: Rect,
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self::from_control(Size::new(13.0, 13.0), 4.0, 13.0)
    }
}

impl ZoneLayout {
    /// Create a layout from explicit values.
    pub const fn new(leading_width: f64, control: Rect) -> Self {
        Self {
            leading_width,
            control,
        }
    }

    /// Place a control of `size` at `(inset, inset)` and end the leading
    /// region `trailing_gap` past its right edge.
    pub fn from_control(size: Size, inset: f64, trailing_gap: f64) -> Self {
        let control = Rect::from_origin_size(Point::new(inset, inset), size);
        Self {
            leading_width: control.x1 + trailing_gap,
            control,
        }
    }

    /// The leading region of `row_bounds`, in the same space as `row_bounds`.
    pub fn leading_region(&self, row_bounds: Rect) -> Rect {
        Rect::from_origin_size(
            row_bounds.origin(),
            Size::new(self.leading_width, row_bounds.height()),
        )
    }

    /// The toggle control of `row_bounds`, in the same space as `row_bounds`.
    pub fn activation_zone(&self, row_bounds: Rect) -> Rect {
        self.control + row_bounds.origin().to_vec2()
    }

    /// Whether `point` is inside the toggle control of the row at `row_bounds`.
    ///
    /// The control is clipped to the leading region: on a row shorter than the
    /// control, or a layout whose control is wider than `leading_width`, the
    /// overhang is not part of the activation zone.
    pub fn is_inside_activation_zone(&self, row_bounds: Rect, point: Point) -> bool {
        if !self.in_leading(row_bounds, point) {
            return false;
        }
        // Row-relative, then control-relative.
        let in_row = point - row_origin(row_bounds);
        let in_control = in_row - self.control.origin().to_vec2();
        Rect::from_origin_size(Point::ORIGIN, self.control.size()).contains(in_control)
    }

    /// Whether `point` is in the leading region of the row but not in its toggle control.
    pub fn is_inside_dead_zone(&self, row_bounds: Rect, point: Point) -> bool {
        self.in_leading(row_bounds, point) && !self.is_inside_activation_zone(row_bounds, point)
    }

    /// Classify `point` against the row at `row_bounds`.
    pub fn classify(&self, row_bounds: Rect, point: Point) -> HitZone {
        if self.is_inside_activation_zone(row_bounds, point) {
            HitZone::Activation
        } else if self.in_leading(row_bounds, point) {
            HitZone::DeadZone
        } else {
            HitZone::Outside
        }
    }

    fn in_leading(&self, row_bounds: Rect, point: Point) -> bool {
        let in_row = point - row_origin(row_bounds);
        Rect::new(0.0, 0.0, self.leading_width, row_bounds.height()).contains(in_row)
    }
}

fn row_origin(row_bounds: Rect) -> Vec2 {
    row_bounds.origin().to_vec2()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: Rect = Rect::new(0.0, 0.0, 500.0, 20.0);

    #[test]
    fn default_layout_geometry() {
        let layout = ZoneLayout::default();
        assert_eq!(layout.control, Rect::new(4.0, 4.0, 17.0, 17.0));
        assert_eq!(layout.leading_width, 30.0);
        assert_eq!(layout.leading_region(ROW), Rect::new(0.0, 0.0, 30.0, 20.0));
    }

    #[test]
    fn reference_row_classification() {
        let layout = ZoneLayout::default();
        let toggle = Point::new(10.0, 10.0);
        let gap = Point::new(25.0, 10.0);
        let label = Point::new(200.0, 10.0);

        assert!(layout.is_inside_activation_zone(ROW, toggle));
        assert!(!layout.is_inside_dead_zone(ROW, toggle));

        assert!(!layout.is_inside_activation_zone(ROW, gap));
        assert!(layout.is_inside_dead_zone(ROW, gap));

        assert!(!layout.is_inside_activation_zone(ROW, label));
        assert!(!layout.is_inside_dead_zone(ROW, label));
        assert_eq!(layout.classify(ROW, label), HitZone::Outside);
    }

    #[test]
    fn control_edges_are_half_open() {
        let layout = ZoneLayout::default();
        assert_eq!(layout.classify(ROW, Point::new(4.0, 4.0)), HitZone::Activation);
        assert_eq!(layout.classify(ROW, Point::new(16.9, 16.9)), HitZone::Activation);
        assert_eq!(layout.classify(ROW, Point::new(17.0, 10.0)), HitZone::DeadZone);
        assert_eq!(layout.classify(ROW, Point::new(10.0, 17.0)), HitZone::DeadZone);
        assert_eq!(layout.classify(ROW, Point::new(3.9, 10.0)), HitZone::DeadZone);
        assert_eq!(layout.classify(ROW, Point::new(30.0, 10.0)), HitZone::Outside);
        assert_eq!(layout.classify(ROW, Point::new(0.0, 0.0)), HitZone::DeadZone);
    }

    #[test]
    fn rows_are_translated() {
        let layout = ZoneLayout::default();
        // Third row, indented by one level.
        let row = Rect::new(20.0, 40.0, 500.0, 60.0);
        assert_eq!(layout.classify(row, Point::new(30.0, 50.0)), HitZone::Activation);
        assert_eq!(layout.classify(row, Point::new(45.0, 50.0)), HitZone::DeadZone);
        assert_eq!(layout.classify(row, Point::new(10.0, 50.0)), HitZone::Outside);
        assert_eq!(layout.classify(row, Point::new(30.0, 10.0)), HitZone::Outside);
        assert_eq!(layout.activation_zone(row), Rect::new(24.0, 44.0, 37.0, 57.0));
    }

    #[test]
    fn control_overhang_is_not_activation() {
        let short_row = Rect::new(0.0, 0.0, 500.0, 10.0);
        let layout = ZoneLayout::default();
        // Below the row, though still inside the control rectangle.
        assert!(!layout.is_inside_activation_zone(short_row, Point::new(10.0, 15.0)));
        assert_eq!(layout.classify(short_row, Point::new(10.0, 15.0)), HitZone::Outside);
        assert_eq!(layout.classify(short_row, Point::new(10.0, 8.0)), HitZone::Activation);

        let narrow = ZoneLayout::new(10.0, Rect::new(4.0, 4.0, 17.0, 17.0));
        assert!(!narrow.is_inside_activation_zone(ROW, Point::new(14.0, 10.0)));
        assert_eq!(narrow.classify(ROW, Point::new(14.0, 10.0)), HitZone::Outside);
        assert_eq!(narrow.classify(ROW, Point::new(8.0, 10.0)), HitZone::Activation);
    }

    #[test]
    fn from_control_places_the_control() {
        let layout = ZoneLayout::from_control(Size::new(16.0, 16.0), 2.0, 6.0);
        assert_eq!(layout.control, Rect::new(2.0, 2.0, 18.0, 18.0));
        assert_eq!(layout.leading_width, 24.0);
        assert!(HitZone::DeadZone.is_leading());
        assert!(!HitZone::Outside.is_leading());
    }
}
