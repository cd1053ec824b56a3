// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Check Tree: a tree model whose entries carry checkbox state.
//!
//! Understory Check Tree is the data side of a tree widget where every row has
//! an optional checkbox (the "toggle"), an optional icon, a label, and colors.
//!
//! - Stores a single-rooted hierarchy of entries behind generational [`EntryId`] handles.
//! - Keeps parent links consistent with child lists; only structural calls write them.
//! - Queues [`TreeEvent`]s for every mutation so a view can update incrementally.
//! - Walks entries in preorder with filters on checked and expanded state.
//!
//! ## Not a widget
//!
//! This crate does not draw, lay out rows, or own expansion state. Hosts report
//! expansion and root visibility through [`TreeView`], or use the bundled
//! [`ExpansionSet`]. Pointer handling for the toggle lives in
//! `understory_toggle_hit`.
//!
//! ## API overview
//!
//! - [`Tree`]: arena of entries plus the root, a structural version, and an event queue.
//! - [`Entry`]: per-entry content (text, [`EntryFlags`], [`IconId`], [`TextColors`], payload).
//! - [`EntryId`]: generational handle tagged with its owning tree.
//! - [`Traversal`]: detached, filtered preorder cursor that detects structural edits.
//! - [`Entries`]: borrowing iterator built by [`Tree::iter`] and [`Tree::iter_from`].
//! - [`TreeError`]: every failure a tree or traversal reports.
//!
//! Key operations:
//! - [`Tree::create`] → [`EntryId`], then [`Tree::append_child`] / [`Tree::insert_child`].
//! - [`Tree::remove_from_parent`] detaches; [`Tree::destroy`] frees a whole subtree.
//! - [`Tree::set_root`] replaces the root and returns the previous one.
//! - [`Tree::set_checked`] / [`Tree::toggle_checked`] / [`Tree::set_toggle_visible`] edit content
//!   without invalidating traversals.
//! - [`Tree::next_preorder`] and [`Tree::prev_preorder`] step through the whole tree.
//! - [`Tree::verify_all_entries`] checks parent/child agreement from the root down.
//! - [`Tree::take_events`] / [`Tree::flush_events`] deliver queued [`TreeEvent`]s.
//!
//! ## Example
//!
//! ```rust
//! use understory_check_tree::{Entry, ExpansionSet, TraversalOptions, Tree};
//!
//! let mut tree = Tree::with_root(Entry::new("Project"));
//! let root = tree.root().unwrap();
//! let src = tree.create(Entry::new("src").with_checked(true));
//! let docs = tree.create(Entry::new("docs"));
//! let lib = tree.create(Entry::new("lib.rs").with_checked(true));
//! tree.append_child(root, src).unwrap();
//! tree.append_child(root, docs).unwrap();
//! tree.append_child(src, lib).unwrap();
//!
//! let view = ExpansionSet::new();
//! let checked: Vec<_> = tree
//!     .iter(TraversalOptions::for_view(&view).checked_only(), &view)
//!     .collect();
//! assert_eq!(checked, [src, lib]);
//!
//! tree.toggle_checked(docs).unwrap();
//! assert_eq!(tree.take_events().len(), 4);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod events;
mod traversal;
mod tree;
mod types;
mod view;

pub use error::TreeError;
pub use events::{ChangeSink, TreeEvent};
pub use traversal::{CheckedFilter, Entries, ExpandedFilter, Traversal, TraversalOptions};
pub use tree::{EntryPath, Tree};
pub use types::{Entry, EntryFlags, EntryId, IconId, Rgba8, TextColors};
pub use view::{ExpansionSet, TreeView};
