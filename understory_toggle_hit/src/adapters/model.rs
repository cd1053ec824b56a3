// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-press handling for Understory Check Tree.
//!
//! ## Feature
//!
//! Enable with `model_adapter`.
//!
//! ## Notes
//!
//! The host owns row layout and reports it through [`RowGeometry`].
//! [`handle_press`] decides what a press does:
//!
//! - Tree disabled, or no row under the pointer: [`PressOutcome::Default`].
//! - Outside the row's leading region: [`PressOutcome::Default`], so the host
//!   selects the row as usual.
//! - Activation zone with a visible toggle: flips `checked` and returns
//!   [`PressOutcome::Toggled`].
//! - Anywhere else in the leading region: [`PressOutcome::Absorbed`].
//!
//! Every outcome except `Default` means the host must skip its own press handling.

use kurbo::{Point, Rect};
use understory_check_tree::{EntryId, Tree, TreeError};

use crate::{HitZone, ZoneLayout};

/// Row layout as seen by the host widget.
pub trait RowGeometry {
    /// The visible row under `point`, if any.
    fn row_for_location(&self, point: Point) -> Option<usize>;

    /// Bounds of `row`, or `None` if the row is not laid out.
    fn row_bounds(&self, row: usize) -> Option<Rect>;

    /// The entry displayed by `row`.
    fn entry_for_row(&self, row: usize) -> Option<EntryId>;

    /// Whether the widget accepts input at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// What a press did, and whether the host should still handle it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    /// The entry's checked state was flipped.
    Toggled(EntryId),
    /// The press landed in the leading region without toggling anything.
    Absorbed,
    /// Not ours; run the host's default row handling.
    Default,
}

impl PressOutcome {
    /// Returns `true` if the host must not run its default handling.
    pub fn prevents_default(self) -> bool {
        !matches!(self, Self::Default)
    }
}

/// Route a pointer press at `point` (tree-relative) through `tree`.
///
/// Fails only if `rows` maps the row to an id that is stale or foreign to `tree`;
/// the tree is untouched in that case.
pub fn handle_press<T, R: RowGeometry + ?Sized>(
    tree: &mut Tree<T>,
    rows: &R,
    layout: &ZoneLayout,
    point: Point,
) -> Result<PressOutcome, TreeError> {
    if !rows.is_enabled() {
        return Ok(PressOutcome::Default);
    }
    let Some(row) = rows.row_for_location(point) else {
        return Ok(PressOutcome::Default);
    };
    let Some(bounds) = rows.row_bounds(row) else {
        return Ok(PressOutcome::Default);
    };
    match layout.classify(bounds, point) {
        HitZone::Outside => Ok(PressOutcome::Default),
        HitZone::DeadZone => Ok(PressOutcome::Absorbed),
        HitZone::Activation => {
            let Some(id) = rows.entry_for_row(row) else {
                return Ok(PressOutcome::Absorbed);
            };
            tree.validate(id)?;
            if !tree.entry(id).is_some_and(|e| e.toggle_visible()) {
                return Ok(PressOutcome::Absorbed);
            }
            let checked = tree.toggle_checked(id)?;
            log::debug!("press on row {row} set {id:?} checked={checked}");
            Ok(PressOutcome::Toggled(id))
        }
    }
}
