// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for structural edits.
//!
//! Random sequences of attach, insert, remove, destroy, and root replacement
//! over a small pool of entries must keep these true after every step:
//!
//! 1. `verify_all_entries` succeeds and counts exactly the reachable entries.
//! 2. Every child's `parent_of` names the entry whose child list holds it.
//! 3. A failed operation leaves the version and the event queue untouched.
//! 4. The version only moves when a structural event is queued.
//! 5. The borrowing iterator and manual `next_preorder` stepping agree.

use proptest::prelude::*;
use understory_check_tree::{Entry, EntryId, TraversalOptions, Tree, TreeEvent};

// ── Helpers ─────────────────────────────────────────────────────────────

const POOL: usize = 12;

#[derive(Clone, Debug)]
enum Op {
    Append { parent: usize, child: usize },
    Insert { parent: usize, child: usize, index: usize },
    Remove { entry: usize },
    Destroy { entry: usize },
    SetRoot { entry: usize },
    Toggle { entry: usize },
}

fn op() -> impl Strategy<Value = Op> {
    let slot = 0..POOL;
    prop_oneof![
        4 => (slot.clone(), slot.clone()).prop_map(|(parent, child)| Op::Append { parent, child }),
        3 => (slot.clone(), slot.clone(), 0_usize..6)
            .prop_map(|(parent, child, index)| Op::Insert { parent, child, index }),
        2 => slot.clone().prop_map(|entry| Op::Remove { entry }),
        1 => slot.clone().prop_map(|entry| Op::Destroy { entry }),
        1 => slot.clone().prop_map(|entry| Op::SetRoot { entry }),
        1 => slot.prop_map(|entry| Op::Toggle { entry }),
    ]
}

fn build() -> (Tree, Vec<EntryId>) {
    let mut tree = Tree::with_root(Entry::new("root"));
    let mut pool = vec![tree.root().unwrap()];
    for i in 1..POOL {
        pool.push(tree.create(Entry::new(format!("e{i}"))));
    }
    (tree, pool)
}

fn apply(tree: &mut Tree, pool: &[EntryId], op: &Op) -> bool {
    match *op {
        Op::Append { parent, child } => tree.append_child(pool[parent], pool[child]).is_ok(),
        Op::Insert {
            parent,
            child,
            index,
        } => tree
            .insert_child(pool[parent], pool[child], index)
            .is_ok(),
        Op::Remove { entry } => tree.remove_from_parent(pool[entry]).is_ok(),
        Op::Destroy { entry } => tree.destroy(pool[entry]).is_ok(),
        Op::SetRoot { entry } => tree.set_root(pool[entry]).is_ok(),
        Op::Toggle { entry } => tree.toggle_checked(pool[entry]).is_ok(),
    }
}

fn reachable(tree: &Tree) -> Vec<EntryId> {
    let mut out = Vec::new();
    let mut current = tree.root();
    while let Some(id) = current {
        out.push(id);
        current = tree.next_preorder(id);
    }
    out
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Structure stays consistent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn structure_stays_consistent(ops in proptest::collection::vec(op(), 1..60)) {
        let (mut tree, pool) = build();
        for op in &ops {
            apply(&mut tree, &pool, op);

            let walked = reachable(&tree);
            prop_assert_eq!(tree.verify_all_entries(), Ok(walked.len()), "after {:?}", op);

            for &id in pool.iter().filter(|id| tree.is_alive(**id)) {
                for &child in tree.children_of(id) {
                    prop_assert_eq!(tree.parent_of(child), Some(id));
                }
                if let Some(parent) = tree.parent_of(id) {
                    prop_assert!(tree.index_of_child(parent, id).is_some());
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3 + 4. Version and events track structural edits
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn failures_do_not_mutate(ops in proptest::collection::vec(op(), 1..60)) {
        let (mut tree, pool) = build();
        for op in &ops {
            let version = tree.version();
            let ok = apply(&mut tree, &pool, op);
            let events = tree.take_events();
            if !ok {
                prop_assert_eq!(tree.version(), version, "failed {:?} bumped the version", op);
                prop_assert!(events.is_empty(), "failed {:?} queued {:?}", op, events);
            } else if events.iter().any(TreeEvent::is_structural) {
                prop_assert!(tree.version() > version);
            } else if !matches!(op, Op::Destroy { .. }) {
                // Destroying a detached entry emits nothing but still invalidates ids.
                prop_assert_eq!(tree.version(), version);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Iterator agrees with manual stepping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn iterator_matches_preorder_stepping(ops in proptest::collection::vec(op(), 1..40)) {
        let (mut tree, pool) = build();
        for op in &ops {
            apply(&mut tree, &pool, op);
        }
        let iterated: Vec<_> = tree.iter(TraversalOptions::new(), &()).collect();
        prop_assert_eq!(&iterated, &reachable(&tree));

        let checked: Vec<_> = tree.iter(TraversalOptions::new().checked_only(), &()).collect();
        let expected: Vec<_> = iterated
            .iter()
            .copied()
            .filter(|id| tree.entry(*id).is_some_and(|e| e.checked()))
            .collect();
        prop_assert_eq!(checked, expected);
    }
}
