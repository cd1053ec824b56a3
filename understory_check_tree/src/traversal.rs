// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filtered preorder traversal.
//!
//! ## Overview
//!
//! A traversal walks a subtree in preorder and yields only the entries that
//! pass every active filter, testing them in this order:
//!
//! 1. Root inclusion: the tree's root is skipped unless [`TraversalOptions::include_root`] is set.
//! 2. [`CheckedFilter`] on the entry's checked flag.
//! 3. [`ExpandedFilter`], which asks the host's [`TreeView`] about the entry's path.
//!
//! The walk keeps one matching entry of lookahead, so "is there more" is
//! answered without touching the tree.
//!
//! ## Two front-ends
//!
//! - [`Traversal`] is a detached cursor. It holds no borrow, so the host may
//!   edit entry content (for example flip `checked`) between steps. Structural
//!   edits make it stale: every call checks the tree's version and fails with
//!   [`TreeError::StaleTraversalState`].
//! - [`Entries`] borrows the tree and implements [`Iterator`]. It cannot go
//!   stale because the tree cannot be mutated while it is alive.

use crate::error::TreeError;
use crate::tree::Tree;
use crate::types::EntryId;
use crate::view::TreeView;

/// Filter on the checked flag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CheckedFilter {
    /// Accept every entry.
    #[default]
    Ignore,
    /// Accept only checked entries.
    CheckedOnly,
    /// Accept only unchecked entries.
    UncheckedOnly,
}

impl CheckedFilter {
    /// Whether an entry with the given checked state passes.
    pub fn accepts(self, checked: bool) -> bool {
        match self {
            Self::Ignore => true,
            Self::CheckedOnly => checked,
            Self::UncheckedOnly => !checked,
        }
    }
}

/// Filter on the expanded state reported by the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpandedFilter {
    /// Accept every entry without querying the view.
    #[default]
    Ignore,
    /// Accept only expanded entries.
    ExpandedOnly,
    /// Accept only collapsed entries.
    CollapsedOnly,
}

/// Traversal configuration.
///
/// The default includes the root and ignores checked and expanded state.
/// Use [`TraversalOptions::for_view`] to include the root only when the host
/// displays it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraversalOptions {
    /// Yield the tree's root when it is encountered.
    pub include_root: bool,
    /// Checked-state filter.
    pub checked: CheckedFilter,
    /// Expanded-state filter.
    pub expanded: ExpandedFilter,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            include_root: true,
            checked: CheckedFilter::Ignore,
            expanded: ExpandedFilter::Ignore,
        }
    }
}

impl TraversalOptions {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default options, including the root only if `view` displays it.
    pub fn for_view<V: TreeView + ?Sized>(view: &V) -> Self {
        Self::default().include_root(view.is_root_visible())
    }

    /// Set root inclusion.
    pub fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Only yield checked entries.
    pub fn checked_only(mut self) -> Self {
        self.checked = CheckedFilter::CheckedOnly;
        self
    }

    /// Only yield unchecked entries.
    pub fn unchecked_only(mut self) -> Self {
        self.checked = CheckedFilter::UncheckedOnly;
        self
    }

    /// Only yield expanded entries.
    pub fn expanded_only(mut self) -> Self {
        self.expanded = ExpandedFilter::ExpandedOnly;
        self
    }

    /// Only yield collapsed entries.
    pub fn collapsed_only(mut self) -> Self {
        self.expanded = ExpandedFilter::CollapsedOnly;
        self
    }
}

/// Detached, forward-only traversal cursor.
///
/// The first match is found eagerly by [`Traversal::new`]. Each
/// [`Traversal::take_next`] returns the cached match and scans ahead for the
/// next one. Once exhausted, a traversal stays exhausted; build a new one to
/// walk again.
///
/// ```rust
/// use understory_check_tree::{Entry, Traversal, TraversalOptions, Tree, TreeError};
///
/// let mut tree = Tree::with_root(Entry::new("root"));
/// let root = tree.root().unwrap();
/// let a = tree.create(Entry::new("a").with_checked(true));
/// let b = tree.create(Entry::new("b"));
/// tree.append_child(root, a).unwrap();
/// tree.append_child(root, b).unwrap();
///
/// let options = TraversalOptions::new().include_root(false);
/// let mut walk = Traversal::new(&tree, root, options, &()).unwrap();
/// assert_eq!(walk.take_next(&tree, &()), Ok(a));
///
/// // Content edits between steps are fine.
/// tree.set_checked(b, true).unwrap();
/// assert_eq!(walk.take_next(&tree, &()), Ok(b));
/// assert_eq!(walk.take_next(&tree, &()), Err(TreeError::NoMoreElements));
/// ```
#[derive(Clone, Debug)]
pub struct Traversal {
    /// Subtree being walked.
    start: EntryId,
    /// Tree root at construction, for the root-inclusion filter.
    root: Option<EntryId>,
    options: TraversalOptions,
    /// Next entry to hand out; `None` once exhausted.
    lookahead: Option<EntryId>,
    /// Tree version captured at construction.
    version: u64,
}

impl Traversal {
    /// Start a traversal of the subtree rooted at `start`.
    ///
    /// `start` itself is the first candidate. Fails if `start` is not a live
    /// entry of `tree`.
    pub fn new<T, V: TreeView + ?Sized>(
        tree: &Tree<T>,
        start: EntryId,
        options: TraversalOptions,
        view: &V,
    ) -> Result<Self, TreeError> {
        tree.validate(start)?;
        let mut traversal = Self {
            start,
            root: tree.root(),
            options,
            lookahead: None,
            version: tree.version(),
        };
        traversal.lookahead = traversal.scan(tree, Some(start), view);
        Ok(traversal)
    }

    /// Start a traversal of the whole tree.
    ///
    /// Fails with [`TreeError::NullEntry`] if the tree has no root.
    pub fn over_tree<T, V: TreeView + ?Sized>(
        tree: &Tree<T>,
        options: TraversalOptions,
        view: &V,
    ) -> Result<Self, TreeError> {
        let root = tree.root().ok_or(TreeError::NullEntry)?;
        Self::new(tree, root, options, view)
    }

    /// Whether another matching entry is available.
    ///
    /// Does not advance or rescan. Fails if `tree` changed structurally since
    /// construction.
    pub fn has_more<T>(&self, tree: &Tree<T>) -> Result<bool, TreeError> {
        self.check_version(tree)?;
        Ok(self.lookahead.is_some())
    }

    /// Return the next matching entry and scan ahead for the following one.
    pub fn take_next<T, V: TreeView + ?Sized>(
        &mut self,
        tree: &Tree<T>,
        view: &V,
    ) -> Result<EntryId, TreeError> {
        self.check_version(tree)?;
        let current = self.lookahead.ok_or(TreeError::NoMoreElements)?;
        let successor = tree.next_preorder_within(current, Some(self.start));
        self.lookahead = self.scan(tree, successor, view);
        Ok(current)
    }

    /// Returns `true` once every match has been handed out.
    pub fn is_exhausted(&self) -> bool {
        self.lookahead.is_none()
    }

    /// The options this traversal was built with.
    pub fn options(&self) -> TraversalOptions {
        self.options
    }

    fn check_version<T>(&self, tree: &Tree<T>) -> Result<(), TreeError> {
        if tree.version() != self.version {
            return Err(TreeError::StaleTraversalState);
        }
        Ok(())
    }

    /// First entry at or after `candidate` (in preorder, within the subtree) that passes all filters.
    fn scan<T, V: TreeView + ?Sized>(
        &self,
        tree: &Tree<T>,
        mut candidate: Option<EntryId>,
        view: &V,
    ) -> Option<EntryId> {
        while let Some(id) = candidate {
            if self.accepts(tree, id, view) {
                return Some(id);
            }
            candidate = tree.next_preorder_within(id, Some(self.start));
        }
        None
    }

    fn accepts<T, V: TreeView + ?Sized>(&self, tree: &Tree<T>, id: EntryId, view: &V) -> bool {
        if !self.options.include_root && Some(id) == self.root {
            return false;
        }
        let Some(entry) = tree.entry(id) else {
            return false;
        };
        if !self.options.checked.accepts(entry.checked()) {
            return false;
        }
        match self.options.expanded {
            ExpandedFilter::Ignore => true,
            ExpandedFilter::ExpandedOnly => view.is_expanded(&tree.path_to_root(id)),
            ExpandedFilter::CollapsedOnly => !view.is_expanded(&tree.path_to_root(id)),
        }
    }
}

/// Borrowing iterator over a filtered preorder traversal.
///
/// Created by [`Tree::iter`] and [`Tree::iter_from`].
#[derive(Debug)]
pub struct Entries<'a, T, V: ?Sized> {
    tree: &'a Tree<T>,
    view: &'a V,
    /// `None` when there was nothing to traverse.
    traversal: Option<Traversal>,
}

impl<T, V: TreeView + ?Sized> Iterator for Entries<'_, T, V> {
    type Item = EntryId;

    fn next(&mut self) -> Option<EntryId> {
        self.traversal.as_mut()?.take_next(self.tree, self.view).ok()
    }
}

impl<T, V: TreeView + ?Sized> core::iter::FusedIterator for Entries<'_, T, V> {}

impl<T> Tree<T> {
    /// Iterate the whole tree with `options`, consulting `view` for expansion.
    ///
    /// Yields nothing if the tree has no root.
    pub fn iter<'a, V: TreeView + ?Sized>(
        &'a self,
        options: TraversalOptions,
        view: &'a V,
    ) -> Entries<'a, T, V> {
        Entries {
            tree: self,
            view,
            traversal: Traversal::over_tree(self, options, view).ok(),
        }
    }

    /// Iterate the subtree rooted at `start`.
    pub fn iter_from<'a, V: TreeView + ?Sized>(
        &'a self,
        start: EntryId,
        options: TraversalOptions,
        view: &'a V,
    ) -> Result<Entries<'a, T, V>, TreeError> {
        let traversal = Traversal::new(self, start, options, view)?;
        Ok(Entries {
            tree: self,
            view,
            traversal: Some(traversal),
        })
    }
}
