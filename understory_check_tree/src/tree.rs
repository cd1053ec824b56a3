// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, content updates, queries, integrity check.

use alloc::{vec, vec::Vec};
use core::sync::atomic::{AtomicU32, Ordering};

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::error::TreeError;
use crate::events::{ChangeSink, TreeEvent};
use crate::types::{Entry, EntryFlags, EntryId, IconId, TextColors};

/// Path from the root to an entry, inclusive at both ends.
pub type EntryPath = SmallVec<[EntryId; 8]>;

static NEXT_TREE_TAG: AtomicU32 = AtomicU32::new(1);

/// Checkbox tree model.
///
/// Entries live in a generational arena. Each entry has at most one parent
/// and an ordered list of children; both sides of that relation are written
/// together by [`Tree::insert_child`], [`Tree::append_child`] and
/// [`Tree::remove_from_parent`], and by nothing else.
///
/// Entries can be created detached with [`Tree::create`] and attached later,
/// so subtrees may be assembled before they are hung under the root.
///
/// Every mutation queues a [`TreeEvent`]. Hosts drain the queue with
/// [`Tree::take_events`] or [`Tree::flush_events`] to schedule repaints.
///
/// ## Example
///
/// ```rust
/// use understory_check_tree::{Entry, Tree, TreeEvent};
///
/// let mut tree = Tree::with_root(Entry::new("root"));
/// let root = tree.root().unwrap();
/// let food = tree.create(Entry::new("Food"));
/// tree.append_child(root, food).unwrap();
///
/// assert_eq!(tree.parent_of(food), Some(root));
/// assert_eq!(tree.children_of(root), &[food]);
///
/// tree.take_events();
/// tree.toggle_checked(food).unwrap();
/// assert_eq!(tree.take_events(), vec![TreeEvent::Changed { entry: food }]);
/// ```
pub struct Tree<T = ()> {
    /// slots
    nodes: Vec<Option<Node<T>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    tag: u32,
    root: Option<EntryId>,
    /// bumped on every structural change
    version: u64,
    events: Vec<TreeEvent>,
}

impl<T> core::fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("entries_total", &total)
            .field("entries_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .field("version", &self.version)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    generation: u32,
    parent: Option<EntryId>,
    children: Vec<EntryId>,
    entry: Entry<T>,
}

impl<T> Node<T> {
    fn new(generation: u32, entry: Entry<T>) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            entry,
        }
    }
}

impl<T> Tree<T> {
    /// Create an empty tree with no root.
    ///
    /// Assign a root with [`Tree::set_root`] before traversing.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            tag: NEXT_TREE_TAG.fetch_add(1, Ordering::Relaxed),
            root: None,
            version: 0,
            events: Vec::new(),
        }
    }

    /// Create a tree whose root is `root`.
    pub fn with_root(root: Entry<T>) -> Self {
        let mut tree = Self::new();
        let id = tree.create(root);
        tree.root = Some(id);
        tree
    }

    /// Create a detached entry.
    ///
    /// The entry is live but unreachable until it is attached below the root
    /// or made the root itself.
    pub fn create(&mut self, entry: Entry<T>) -> EntryId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, entry));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "EntryId stores 32-bit slot indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, entry)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "EntryId stores 32-bit slot indices."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        EntryId::new(idx, generation, self.tag)
    }

    /// Detach `id` and free it together with its whole subtree.
    ///
    /// All freed ids become stale. The root cannot be destroyed; replace it
    /// with [`Tree::set_root`] first.
    pub fn destroy(&mut self, id: EntryId) -> Result<(), TreeError> {
        self.slot(id)?;
        if self.root == Some(id) {
            return Err(TreeError::InvalidRoot);
        }
        self.remove_from_parent(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes[current.idx()].take() else {
                unreachable!("children of a live entry are live");
            };
            stack.extend(node.children);
            self.free_list.push(current.idx());
        }
        self.version += 1;
        log::trace!("destroyed subtree at {id:?}");
        Ok(())
    }

    /// The root entry, or `None` before one has been assigned.
    pub fn root(&self) -> Option<EntryId> {
        self.root
    }

    /// Replace the root with `id`, returning the previous root.
    ///
    /// The previous root stays alive as a detached entry. Fails with
    /// [`TreeError::InvalidRoot`] when `id` is stale, foreign, or has a parent.
    ///
    /// Outstanding [`Traversal`](crate::Traversal)s become stale.
    pub fn set_root(&mut self, id: EntryId) -> Result<Option<EntryId>, TreeError> {
        let idx = self.slot(id).map_err(|_| TreeError::InvalidRoot)?;
        if self.node(idx).parent.is_some() {
            return Err(TreeError::InvalidRoot);
        }
        let old = self.root;
        if old == Some(id) {
            return Ok(old);
        }
        self.root = Some(id);
        self.version += 1;
        self.events.push(TreeEvent::RootReplaced { old, new: id });
        log::trace!("root replaced: {old:?} -> {id:?}");
        Ok(old)
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent it is moved, emitting
    /// [`TreeEvent::Removed`] before [`TreeEvent::Inserted`].
    pub fn append_child(&mut self, parent: EntryId, child: EntryId) -> Result<(), TreeError> {
        let len = self.validate_attach(parent, child)?;
        self.attach(parent, child, len);
        Ok(())
    }

    /// Attach `child` to `parent` at `index`.
    ///
    /// `index` is interpreted after `child` has been detached from its current
    /// parent, so `0..=len` is valid where `len` excludes `child` itself.
    /// Nothing is modified when validation fails.
    pub fn insert_child(
        &mut self,
        parent: EntryId,
        child: EntryId,
        index: usize,
    ) -> Result<(), TreeError> {
        let len = self.validate_attach(parent, child)?;
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        self.attach(parent, child, index);
        Ok(())
    }

    /// Detach `id` from its parent. Does nothing if `id` has no parent.
    pub fn remove_from_parent(&mut self, id: EntryId) -> Result<(), TreeError> {
        let idx = self.slot(id)?;
        let Some(parent) = self.node(idx).parent else {
            return Ok(());
        };
        let siblings = &mut self.node_mut(parent.idx()).children;
        let Some(index) = siblings.iter().position(|&c| c == id) else {
            unreachable!("parent link without a matching child entry");
        };
        siblings.remove(index);
        self.node_mut(idx).parent = None;
        self.version += 1;
        self.events.push(TreeEvent::Removed {
            parent,
            index,
            entry: id,
        });
        log::trace!("removed {id:?} from {parent:?} at {index}");
        Ok(())
    }

    /// Set the checked state of `id`.
    pub fn set_checked(&mut self, id: EntryId, checked: bool) -> Result<(), TreeError> {
        self.update(id, |e| set_flag(&mut e.flags, EntryFlags::CHECKED, checked))
    }

    /// Flip the checked state of `id` and return the new state.
    pub fn toggle_checked(&mut self, id: EntryId) -> Result<bool, TreeError> {
        let idx = self.slot(id)?;
        let flags = &mut self.node_mut(idx).entry.flags;
        flags.toggle(EntryFlags::CHECKED);
        let checked = flags.contains(EntryFlags::CHECKED);
        self.events.push(TreeEvent::Changed { entry: id });
        Ok(checked)
    }

    /// Show or hide the toggle control of `id`.
    pub fn set_toggle_visible(&mut self, id: EntryId, visible: bool) -> Result<(), TreeError> {
        self.update(id, |e| {
            set_flag(&mut e.flags, EntryFlags::TOGGLE_VISIBLE, visible)
        })
    }

    /// Show or hide the icon of `id`.
    pub fn set_icon_visible(&mut self, id: EntryId, visible: bool) -> Result<(), TreeError> {
        self.update(id, |e| {
            set_flag(&mut e.flags, EntryFlags::ICON_VISIBLE, visible)
        })
    }

    /// Set the label of `id`.
    pub fn set_text(&mut self, id: EntryId, text: &str) -> Result<(), TreeError> {
        self.update(id, |e| {
            if e.text == text {
                return false;
            }
            e.text.clear();
            e.text.push_str(text);
            true
        })
    }

    /// Set or clear the icon of `id`.
    pub fn set_icon(&mut self, id: EntryId, icon: Option<IconId>) -> Result<(), TreeError> {
        self.update(id, |e| replace_if_changed(&mut e.icon, icon))
    }

    /// Set the text color overrides of `id`.
    pub fn set_colors(&mut self, id: EntryId, colors: TextColors) -> Result<(), TreeError> {
        self.update(id, |e| replace_if_changed(&mut e.colors, colors))
    }

    /// Edit the entry data of `id` in place. Always emits [`TreeEvent::Changed`].
    pub fn modify(&mut self, id: EntryId, f: impl FnOnce(&mut Entry<T>)) -> Result<(), TreeError> {
        self.update(id, |e| {
            f(e);
            true
        })
    }

    /// Entry data for a live id.
    pub fn entry(&self, id: EntryId) -> Option<&Entry<T>> {
        let idx = self.slot(id).ok()?;
        Some(&self.node(idx).entry)
    }

    /// Mutable access to the user payload of a live id. Emits no event.
    pub fn data_mut(&mut self, id: EntryId) -> Option<&mut T> {
        let idx = self.slot(id).ok()?;
        Some(&mut self.node_mut(idx).entry.data)
    }

    /// Returns `true` if `id` was minted by this tree and has not been destroyed.
    pub fn is_alive(&self, id: EntryId) -> bool {
        self.slot(id).is_ok()
    }

    /// Like [`Tree::is_alive`], but reports why an id is unusable.
    ///
    /// Fails with [`TreeError::InvalidEntryType`] for a foreign id and
    /// [`TreeError::NullEntry`] for a destroyed one.
    pub fn validate(&self, id: EntryId) -> Result<(), TreeError> {
        self.slot(id).map(|_| ())
    }

    /// Number of live entries, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Returns `true` if there are no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Structural version, bumped by every insert, removal, root change, or destroy.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the parent of a live entry, or `None` for roots, detached entries, and stale ids.
    pub fn parent_of(&self, id: EntryId) -> Option<EntryId> {
        let idx = self.slot(id).ok()?;
        self.node(idx).parent
    }

    /// Children of a live entry in order, or an empty slice for stale ids.
    pub fn children_of(&self, id: EntryId) -> &[EntryId] {
        let Ok(idx) = self.slot(id) else {
            return &[];
        };
        &self.node(idx).children
    }

    /// Number of children of `id`.
    pub fn child_count(&self, id: EntryId) -> usize {
        self.children_of(id).len()
    }

    /// Child of `parent` at `index`.
    pub fn child_at(&self, parent: EntryId, index: usize) -> Option<EntryId> {
        self.children_of(parent).get(index).copied()
    }

    /// Position of `child` among the children of `parent`.
    pub fn index_of_child(&self, parent: EntryId, child: EntryId) -> Option<usize> {
        self.children_of(parent).iter().position(|&c| c == child)
    }

    /// Returns `true` if `id` has no children. Stale ids have no children.
    pub fn is_leaf(&self, id: EntryId) -> bool {
        self.children_of(id).is_empty()
    }

    /// Path from the topmost ancestor of `id` down to `id`, inclusive.
    ///
    /// For attached entries the path starts at the root. Empty for stale ids.
    pub fn path_to_root(&self, id: EntryId) -> EntryPath {
        let mut path = EntryPath::new();
        if !self.is_alive(id) {
            return path;
        }
        let mut current = Some(id);
        while let Some(node) = current {
            path.push(node);
            current = self.parent_of(node);
        }
        path.reverse();
        path
    }

    /// Next entry in preorder (parent before children, children left to right).
    ///
    /// Returns `None` at the end of the tree or for stale ids.
    pub fn next_preorder(&self, current: EntryId) -> Option<EntryId> {
        if !self.is_alive(current) {
            return None;
        }
        self.next_preorder_within(current, None)
    }

    /// Previous entry in preorder.
    ///
    /// Returns `None` at the topmost entry or for stale ids.
    pub fn prev_preorder(&self, current: EntryId) -> Option<EntryId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(prev_sibling) = self.prev_sibling(current) {
            return Some(self.last_in_subtree(prev_sibling));
        }
        self.parent_of(current)
    }

    /// First leaf of the subtree rooted at `id`: `id` itself if it has no children.
    pub fn first_leaf(&self, id: EntryId) -> Option<EntryId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut node = id;
        while let Some(&first) = self.children_of(node).first() {
            node = first;
        }
        Some(node)
    }

    /// Last leaf of the subtree rooted at `id`: `id` itself if it has no children.
    pub fn last_leaf(&self, id: EntryId) -> Option<EntryId> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.last_in_subtree(id))
    }

    /// The leaf that follows the subtree of `id` in preorder.
    ///
    /// For a leaf this is simply the next leaf of the tree. Returns `None`
    /// after the last leaf or for stale ids.
    pub fn next_leaf(&self, id: EntryId) -> Option<EntryId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut node = id;
        loop {
            if let Some(sibling) = self.next_sibling(node) {
                return self.first_leaf(sibling);
            }
            node = self.parent_of(node)?;
        }
    }

    /// The leaf that precedes `id` in preorder, skipping its ancestors.
    ///
    /// Returns `None` before the first leaf or for stale ids.
    pub fn prev_leaf(&self, id: EntryId) -> Option<EntryId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut node = id;
        loop {
            if let Some(sibling) = self.prev_sibling(node) {
                return Some(self.last_in_subtree(sibling));
            }
            node = self.parent_of(node)?;
        }
    }

    /// Nearest entry that is an ancestor of both `a` and `b`.
    ///
    /// An entry counts as its own ancestor. Returns `None` when the two are in
    /// disconnected subtrees or either id is stale.
    pub fn shared_ancestor(&self, a: EntryId, b: EntryId) -> Option<EntryId> {
        let path_a = self.path_to_root(a);
        let path_b = self.path_to_root(b);
        path_a
            .iter()
            .zip(path_b.iter())
            .take_while(|(x, y)| x == y)
            .last()
            .map(|(&x, _)| x)
    }

    /// Preorder successor of a live `current`, not leaving the subtree rooted at `anchor`.
    pub(crate) fn next_preorder_within(
        &self,
        current: EntryId,
        anchor: Option<EntryId>,
    ) -> Option<EntryId> {
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        while Some(node) != anchor {
            let parent = self.parent_of(node)?;
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    /// Walk every entry reachable from the root and check the structure.
    ///
    /// Returns the number of reachable entries. Fails with
    /// [`TreeError::NullEntry`] when there is no root or a child id is stale,
    /// [`TreeError::InvalidEntryType`] when a child id is foreign, and
    /// [`TreeError::BrokenParentLink`] when a parent pointer disagrees with a
    /// child list or an entry is reachable twice.
    pub fn verify_all_entries(&self) -> Result<usize, TreeError> {
        self.verify_reachable()
            .inspect_err(|err| log::debug!("tree integrity check failed: {err}"))
    }

    /// Drain queued change notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<TreeEvent> {
        core::mem::take(&mut self.events)
    }

    /// Deliver queued change notifications to `sink`, oldest first.
    pub fn flush_events<S: ChangeSink + ?Sized>(&mut self, sink: &mut S) {
        for event in self.events.drain(..) {
            sink.notify(event);
        }
    }

    /// Returns `true` if notifications are waiting to be drained.
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    // --- internals ---

    /// Resolve `id` to its slot index.
    fn slot(&self, id: EntryId) -> Result<usize, TreeError> {
        if id.2 != self.tag {
            return Err(TreeError::InvalidEntryType);
        }
        match self.nodes.get(id.idx()) {
            Some(Some(node)) if node.generation == id.1 => Ok(id.idx()),
            Some(_) => Err(TreeError::NullEntry),
            None => Err(TreeError::InvalidEntryType),
        }
    }

    /// Access a node by resolved slot; panics if the slot is empty.
    pub(crate) fn node(&self, idx: usize) -> &Node<T> {
        self.nodes[idx].as_ref().expect("dangling EntryId")
    }

    /// Access a node mutably by resolved slot; panics if the slot is empty.
    pub(crate) fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        self.nodes[idx].as_mut().expect("dangling EntryId")
    }

    /// Check that `child` may be attached under `parent` and return the
    /// number of children `parent` will have before the insertion.
    fn validate_attach(&self, parent: EntryId, child: EntryId) -> Result<usize, TreeError> {
        let p = self.slot(parent)?;
        let c = self.slot(child)?;
        let mut ancestor = Some(parent);
        while let Some(a) = ancestor {
            if a == child {
                return Err(TreeError::CyclicAttachment);
            }
            ancestor = self.parent_of(a);
        }
        if self.root == Some(child) {
            return Err(TreeError::InvalidRoot);
        }
        let len = self.node(p).children.len();
        if self.node(c).parent == Some(parent) {
            Ok(len - 1)
        } else {
            Ok(len)
        }
    }

    /// Link a validated `child` under `parent` at `index`.
    fn attach(&mut self, parent: EntryId, child: EntryId, index: usize) {
        if let Err(err) = self.remove_from_parent(child) {
            unreachable!("attach after validation failed: {err}");
        }
        self.node_mut(parent.idx()).children.insert(index, child);
        self.node_mut(child.idx()).parent = Some(parent);
        self.version += 1;
        self.events.push(TreeEvent::Inserted {
            parent,
            index,
            entry: child,
        });
        log::trace!("inserted {child:?} into {parent:?} at {index}");
    }

    /// Apply a content edit; `f` returns whether anything changed.
    fn update(
        &mut self,
        id: EntryId,
        f: impl FnOnce(&mut Entry<T>) -> bool,
    ) -> Result<(), TreeError> {
        let idx = self.slot(id)?;
        if f(&mut self.node_mut(idx).entry) {
            self.events.push(TreeEvent::Changed { entry: id });
        }
        Ok(())
    }

    fn next_sibling(&self, node: EntryId) -> Option<EntryId> {
        let parent = self.parent_of(node)?;
        let pos = self.index_of_child(parent, node)?;
        self.child_at(parent, pos + 1)
    }

    fn prev_sibling(&self, node: EntryId) -> Option<EntryId> {
        let parent = self.parent_of(node)?;
        let pos = self.index_of_child(parent, node)?;
        pos.checked_sub(1).and_then(|p| self.child_at(parent, p))
    }

    fn last_in_subtree(&self, mut node: EntryId) -> EntryId {
        while let Some(&last) = self.children_of(node).last() {
            node = last;
        }
        node
    }

    fn verify_reachable(&self) -> Result<usize, TreeError> {
        let root = self.root.ok_or(TreeError::NullEntry)?;
        let root_idx = self.slot(root)?;
        if self.node(root_idx).parent.is_some() {
            return Err(TreeError::BrokenParentLink(root));
        }
        let mut visited: HashSet<EntryId> = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                return Err(TreeError::BrokenParentLink(id));
            }
            for &child in self.node(id.idx()).children.iter().rev() {
                let c = self.slot(child)?;
                if self.node(c).parent != Some(id) {
                    return Err(TreeError::BrokenParentLink(child));
                }
                stack.push(child);
            }
        }
        Ok(visited.len())
    }
}

fn set_flag(flags: &mut EntryFlags, flag: EntryFlags, value: bool) -> bool {
    if flags.contains(flag) == value {
        return false;
    }
    flags.set(flag, value);
    true
}

fn replace_if_changed<V: PartialEq>(slot: &mut V, value: V) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
