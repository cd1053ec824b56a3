// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for tree mutation, validation, and traversal.

use crate::types::EntryId;

/// Errors reported by [`Tree`](crate::Tree) and [`Traversal`](crate::Traversal).
///
/// Every error is raised synchronously by the offending call, and a failing
/// call leaves the tree unmodified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id was not minted by this tree.
    #[error("entry id does not belong to this tree")]
    InvalidEntryType,
    /// The id refers to an entry that has been destroyed.
    #[error("entry is absent (destroyed or never created)")]
    NullEntry,
    /// Insertion index outside `0..=len`.
    #[error("child index {index} out of range for {len} children")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of children the parent had.
        len: usize,
    },
    /// The traversal has no more matching entries.
    #[error("traversal has no more elements")]
    NoMoreElements,
    /// The tree was structurally modified after the traversal was created.
    #[error("tree structure changed since the traversal was created")]
    StaleTraversalState,
    /// The entry cannot become (or stop being) the root.
    #[error("entry cannot be used as the tree root")]
    InvalidRoot,
    /// Attaching would make an entry its own ancestor.
    #[error("cannot attach an entry beneath itself or its own descendant")]
    CyclicAttachment,
    /// Integrity check found a parent pointer that disagrees with its owner's child list.
    #[error("entry {0:?} has a parent link that disagrees with the child list")]
    BrokenParentLink(EntryId),
}
