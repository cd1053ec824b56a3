// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View state consulted by traversals: expansion and root visibility.
//!
//! The tree model does not own presentation state. Hosts implement [`TreeView`]
//! over whatever their widget keeps; [`ExpansionSet`] is a ready-made
//! implementation for hosts that do not track expansion themselves.

use hashbrown::HashSet;

use crate::Tree;
use crate::types::EntryId;

/// Presentation state queried by [`Traversal`](crate::Traversal) filters.
pub trait TreeView {
    /// Whether the entry at the end of `path` is currently expanded.
    ///
    /// `path` runs from the root to the candidate entry, inclusive.
    fn is_expanded(&self, path: &[EntryId]) -> bool;

    /// Whether the root entry is displayed as a row.
    ///
    /// Used by [`TraversalOptions::for_view`](crate::TraversalOptions::for_view)
    /// to pick a root-inclusion default.
    fn is_root_visible(&self) -> bool {
        true
    }
}

/// A view with nothing expanded and a visible root.
impl TreeView for () {
    fn is_expanded(&self, _path: &[EntryId]) -> bool {
        false
    }
}

impl<V: TreeView + ?Sized> TreeView for &V {
    fn is_expanded(&self, path: &[EntryId]) -> bool {
        (**self).is_expanded(path)
    }

    fn is_root_visible(&self) -> bool {
        (**self).is_root_visible()
    }
}

/// Set of expanded entries.
///
/// A path counts as expanded only when every entry along it is expanded, so
/// collapsing an ancestor hides the expansion of its descendants without
/// forgetting it. A hidden root is always treated as expanded.
#[derive(Clone, Debug, Default)]
pub struct ExpansionSet {
    expanded: HashSet<EntryId>,
    /// Reported through [`TreeView::is_root_visible`]. Defaults to `false`.
    pub root_visible: bool,
}

impl ExpansionSet {
    /// Create an empty set with a hidden root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `entry` as expanded.
    pub fn expand(&mut self, entry: EntryId) {
        self.expanded.insert(entry);
    }

    /// Mark `entry` as collapsed.
    pub fn collapse(&mut self, entry: EntryId) {
        self.expanded.remove(&entry);
    }

    /// Flip the expansion of `entry`. Returns the new state.
    pub fn toggle(&mut self, entry: EntryId) -> bool {
        if self.expanded.remove(&entry) {
            false
        } else {
            self.expanded.insert(entry);
            true
        }
    }

    /// Whether `entry` itself is marked expanded, regardless of its ancestors.
    pub fn contains(&self, entry: EntryId) -> bool {
        self.expanded.contains(&entry)
    }

    /// Expand every entry with children reachable from the root of `tree`.
    ///
    /// Leaves are never marked: they cannot be expanded.
    pub fn expand_all<T>(&mut self, tree: &Tree<T>) {
        if let Some(root) = tree.root() {
            self.expand_subtree(tree, root);
        }
    }

    /// Expand `id` and every entry with children below it.
    ///
    /// Ancestors of `id` are left alone, so the subtree only shows once they
    /// are expanded too. Does nothing for stale ids.
    pub fn expand_subtree<T>(&mut self, tree: &Tree<T>, id: EntryId) {
        if !tree.is_alive(id) {
            return;
        }
        let mut current = Some(id);
        while let Some(entry) = current {
            if !tree.is_leaf(entry) {
                self.expanded.insert(entry);
            }
            current = tree.next_preorder_within(entry, Some(id));
        }
    }

    /// Collapse everything.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Drop entries that are no longer alive in `tree`.
    pub fn retain_alive<T>(&mut self, tree: &Tree<T>) {
        self.expanded.retain(|id| tree.is_alive(*id));
    }
}

impl TreeView for ExpansionSet {
    /// A hidden root cannot be collapsed by the user, so while
    /// `root_visible` is `false` the first entry of `path` counts as expanded.
    fn is_expanded(&self, path: &[EntryId]) -> bool {
        let Some((first, rest)) = path.split_first() else {
            return false;
        };
        (!self.root_visible || self.expanded.contains(first))
            && rest.iter().all(|id| self.expanded.contains(id))
    }

    fn is_root_visible(&self) -> bool {
        self.root_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entry;

    #[test]
    fn expansion_requires_every_ancestor() {
        let mut tree = Tree::with_root(Entry::new("root"));
        let root = tree.root().unwrap();
        let a = tree.create(Entry::new("a"));
        let b = tree.create(Entry::new("b"));
        tree.append_child(root, a).unwrap();
        tree.append_child(a, b).unwrap();

        let mut view = ExpansionSet::new();
        view.root_visible = true;
        view.expand(a);
        assert!(!view.is_expanded(&tree.path_to_root(a)), "root is collapsed");
        view.expand(root);
        assert!(view.is_expanded(&tree.path_to_root(a)));
        view.collapse(root);
        assert!(view.contains(a), "collapsing an ancestor keeps the mark");
    }

    #[test]
    fn expand_all_skips_leaves() {
        let mut tree = Tree::with_root(Entry::new("root"));
        let root = tree.root().unwrap();
        let folder = tree.create(Entry::new("folder"));
        let leaf = tree.create(Entry::new("leaf"));
        tree.append_child(root, folder).unwrap();
        tree.append_child(folder, leaf).unwrap();

        let mut view = ExpansionSet::new();
        view.expand_all(&tree);
        assert!(view.contains(root));
        assert!(view.contains(folder));
        assert!(!view.contains(leaf));
    }

    #[test]
    fn hidden_root_counts_as_expanded() {
        let mut tree = Tree::with_root(Entry::new("root"));
        let root = tree.root().unwrap();
        let a = tree.create(Entry::new("a"));
        let a1 = tree.create(Entry::new("a1"));
        tree.append_child(root, a).unwrap();
        tree.append_child(a, a1).unwrap();

        let mut view = ExpansionSet::new();
        assert!(view.is_expanded(&tree.path_to_root(root)));
        assert!(!view.is_expanded(&tree.path_to_root(a)));
        view.expand(a);
        assert!(view.is_expanded(&tree.path_to_root(a)));

        view.root_visible = true;
        assert!(!view.is_expanded(&tree.path_to_root(a)), "visible root is collapsed");
        assert!(!view.is_expanded(&[]));
    }

    #[test]
    fn expand_subtree_leaves_siblings_and_ancestors() {
        // root -> [a -> [a1 -> [a11]], b -> [b1]]
        let mut tree = Tree::with_root(Entry::new("root"));
        let root = tree.root().unwrap();
        let [a, a1, a11, b, b1] =
            ["a", "a1", "a11", "b", "b1"].map(|t| tree.create(Entry::new(t)));
        tree.append_child(root, a).unwrap();
        tree.append_child(a, a1).unwrap();
        tree.append_child(a1, a11).unwrap();
        tree.append_child(root, b).unwrap();
        tree.append_child(b, b1).unwrap();

        let mut view = ExpansionSet::new();
        view.expand_subtree(&tree, a);
        assert!(view.contains(a));
        assert!(view.contains(a1));
        assert!(!view.contains(a11), "leaves are not marked");
        assert!(!view.contains(b));
        assert!(!view.contains(root));
        assert!(view.is_expanded(&tree.path_to_root(a1)));

        tree.destroy(b1).unwrap();
        view.expand_subtree(&tree, b1);
        assert!(!view.contains(b1));
    }

    #[test]
    fn toggle_and_retain_alive() {
        let mut tree = Tree::with_root(Entry::new("root"));
        let root = tree.root().unwrap();
        let a = tree.create(Entry::new("a"));
        tree.append_child(root, a).unwrap();

        let mut view = ExpansionSet::new();
        assert!(view.toggle(a));
        assert!(!view.toggle(a));
        view.expand(a);
        tree.destroy(a).unwrap();
        view.retain_alive(&tree);
        assert!(!view.contains(a));
    }

    #[test]
    fn unit_view_expands_nothing() {
        let tree = Tree::with_root(Entry::new("root"));
        let root = tree.root().unwrap();
        assert!(!().is_expanded(&tree.path_to_root(root)));
        assert!(().is_root_visible());
    }
}
