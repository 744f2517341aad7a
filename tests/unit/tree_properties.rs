//! Checkbox tree invariants checked over generated trees and edit sequences.

use context_copy::core::Location;
use context_copy::tree::{CheckboxTree, NodeKind, NodeRef};

/// Small deterministic generator so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 33) as usize) % bound
    }
}

/// Tree of `size` nodes where each node hangs under a random earlier node.
fn generated_tree(size: usize, seed: u64) -> (CheckboxTree, NodeRef, Vec<NodeRef>) {
    let mut rng = Lcg(seed);
    let mut tree = CheckboxTree::new();
    let root = tree.create("root", Location::file_start("root.py"), NodeKind::File, None);
    let mut nodes = vec![root];
    for i in 1..size {
        let parent = nodes[rng.next(nodes.len())];
        let node = tree.create(
            format!("n{i}"),
            Location::file_start(format!("n{i}.py")),
            NodeKind::File,
            Some(parent),
        );
        nodes.push(node);
    }
    (tree, root, nodes)
}

/// Apply a random sequence of edits so stored flags end up mixed.
fn scramble(tree: &mut CheckboxTree, nodes: &[NodeRef], rng: &mut Lcg, edits: usize) {
    for _ in 0..edits {
        let node = nodes[rng.next(nodes.len())];
        if rng.next(2) == 0 {
            tree.toggle_checked(node);
        } else {
            tree.toggle_children(node);
        }
    }
}

fn ancestors(tree: &CheckboxTree, node: NodeRef) -> Vec<NodeRef> {
    let mut out = Vec::new();
    let mut current = tree.node(node).parent();
    while let Some(parent) = current {
        out.push(parent);
        current = tree.node(parent).parent();
    }
    out
}

#[test]
fn test_toggle_checked_propagates_to_every_descendant() {
    for seed in 0..20 {
        let (mut tree, _, nodes) = generated_tree(60, seed);
        let mut rng = Lcg(seed ^ 0xabcd);
        scramble(&mut tree, &nodes, &mut rng, 40);

        let target = nodes[rng.next(nodes.len())];
        tree.toggle_checked(target);
        let state = tree.node(target).is_checked();
        for descendant in tree.descendants(target) {
            assert_eq!(tree.node(descendant).is_checked(), state, "seed {seed}");
        }
    }
}

#[test]
fn test_toggle_children_leaves_node_alone_and_flips_block() {
    for seed in 0..20 {
        let (mut tree, _, nodes) = generated_tree(60, seed);
        let mut rng = Lcg(seed.wrapping_add(7));
        scramble(&mut tree, &nodes, &mut rng, 40);

        let target = nodes[rng.next(nodes.len())];
        let own_state = tree.node(target).is_checked();
        let children = tree.node(target).children().to_vec();
        let before: Vec<bool> = tree.descendants(target).iter().map(|n| tree.node(*n).is_checked()).collect();
        let all_checked = children.iter().all(|c| tree.node(*c).is_checked());

        tree.toggle_children(target);
        assert_eq!(tree.node(target).is_checked(), own_state);

        if children.is_empty() {
            let after: Vec<bool> =
                tree.descendants(target).iter().map(|n| tree.node(*n).is_checked()).collect();
            assert_eq!(before, after);
            continue;
        }
        for child in children {
            for node in tree.descendants(child) {
                assert_eq!(tree.node(node).is_checked(), !all_checked, "seed {seed}");
            }
        }
    }
}

#[test]
fn test_collect_checked_prunes_unchecked_subtrees() {
    for seed in 0..20 {
        let (mut tree, root, nodes) = generated_tree(80, seed);
        let mut rng = Lcg(seed.wrapping_mul(31));
        scramble(&mut tree, &nodes, &mut rng, 60);

        let collected = tree.collect_checked(root);
        for node in &nodes {
            let pruned = !tree.node(*node).is_checked()
                || ancestors(&tree, *node).iter().any(|a| !tree.node(*a).is_checked());
            assert_eq!(collected.contains(node), !pruned, "seed {seed}, node {}", tree.node(*node).id());
        }
    }
}

#[test]
fn test_collect_checked_is_pre_order() {
    let (tree, root, _) = generated_tree(40, 3);
    let collected = tree.collect_checked(root);
    assert_eq!(collected, tree.descendants(root));
    for (i, node) in collected.iter().enumerate() {
        if let Some(parent) = tree.node(*node).parent() {
            let parent_pos = collected.iter().position(|n| *n == parent).unwrap();
            assert!(parent_pos < i);
        }
    }
}

#[test]
fn test_ids_are_unique() {
    let mut tree = CheckboxTree::new();
    let root = tree.create("main.py", Location::file_start("main.py"), NodeKind::File, None);
    let a = tree.create("util.py", Location::file_start("a/util.py"), NodeKind::File, Some(root));
    let b = tree.create("util.py", Location::file_start("b/util.py"), NodeKind::File, Some(root));
    assert_ne!(tree.node(a).id(), tree.node(b).id());
    assert_eq!(tree.find(tree.node(b).id()), Some(b));
}
