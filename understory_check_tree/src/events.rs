// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notifications queued by [`crate::Tree`] mutations.

use alloc::vec::Vec;

use crate::types::EntryId;

/// A single change to the tree.
///
/// Structural events carry the affected parent and child index so an
/// incremental view can patch its rows; content edits produce [`TreeEvent::Changed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeEvent {
    /// `entry` was inserted into `parent` at `index`.
    Inserted {
        /// New parent.
        parent: EntryId,
        /// Position in the parent's children.
        index: usize,
        /// The inserted entry.
        entry: EntryId,
    },
    /// `entry` was removed from `parent`, where it was at `index`.
    Removed {
        /// Former parent.
        parent: EntryId,
        /// Former position in the parent's children.
        index: usize,
        /// The removed entry.
        entry: EntryId,
    },
    /// The root was replaced. The whole view should be rebuilt.
    RootReplaced {
        /// Previous root, if any.
        old: Option<EntryId>,
        /// New root.
        new: EntryId,
    },
    /// Display or toggle state of a single entry changed.
    Changed {
        /// The changed entry.
        entry: EntryId,
    },
}

impl TreeEvent {
    /// Returns `true` for events that change the shape of the tree.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Changed { .. })
    }
}

/// Receiver for change notifications, usually implemented by the host view.
pub trait ChangeSink {
    /// Called once per event, in the order the mutations happened.
    fn notify(&mut self, event: TreeEvent);
}

impl ChangeSink for Vec<TreeEvent> {
    fn notify(&mut self, event: TreeEvent) {
        self.push(event);
    }
}

impl<F: FnMut(TreeEvent)> ChangeSink for F {
    fn notify(&mut self, event: TreeEvent) {
        self(event);
    }
}
