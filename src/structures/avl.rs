use std::cmp::Ordering;

use crate::{
    ast::{StructureKind, TraversalOrder},
    error::{StructureError, StructureResult},
    interpreter::value::core::Value,
    structures::{
        core::{NodeId, SearchHit, Snapshot, Structure, TreeData, TreeOps},
        step::{AnimationType, Step, StepKind},
        tree::{Link, Node, TreeCore},
    },
};

/// Self-balancing search tree. Every node's subtrees differ in height by at
/// most one; violations are repaired with rotations on the way back up from an
/// insert or delete.
#[derive(Debug, Clone, Default)]
pub struct AvlTree {
    core: TreeCore,
}

/// A rotation performed while rebalancing: narration and the nodes involved.
type Rotation = (String, [NodeId; 2]);

impl AvlTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record_rotations(&mut self, rotations: Vec<Rotation>) {
        for (description, ids) in rotations {
            self.core.record(StepKind::Rotate, description, ids, AnimationType::Move);
        }
    }
}

fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

fn update_height(node: &mut Node) {
    node.height = 1 + height(&node.left).max(height(&node.right));
}

fn leans_left(node: &Node) -> bool {
    height(&node.left) > height(&node.right)
}

fn leans_right(node: &Node) -> bool {
    height(&node.right) > height(&node.left)
}

fn rotate_right(mut node: Box<Node>, rotations: &mut Vec<Rotation>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    rotations.push((format!("Rotate right at {}", node.value), [node.id, pivot.id]));
    node.left = pivot.right.take();
    update_height(&mut node);
    pivot.right = Some(node);
    update_height(&mut pivot);
    pivot
}

fn rotate_left(mut node: Box<Node>, rotations: &mut Vec<Rotation>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    rotations.push((format!("Rotate left at {}", node.value), [node.id, pivot.id]));
    node.right = pivot.left.take();
    update_height(&mut node);
    pivot.left = Some(node);
    update_height(&mut pivot);
    pivot
}

/// Restores the balance of `node`, assuming both subtrees are balanced.
fn rebalance(mut node: Box<Node>, rotations: &mut Vec<Rotation>) -> Box<Node> {
    update_height(&mut node);
    let (left, right) = (height(&node.left), height(&node.right));
    if left > right + 1 {
        if let Some(left) = node.left.take() {
            // Left-right case turns into left-left first.
            node.left = Some(if leans_right(&left) { rotate_left(left, rotations) } else { left });
        }
        return rotate_right(node, rotations);
    }
    if right > left + 1 {
        if let Some(right) = node.right.take() {
            node.right = Some(if leans_left(&right) { rotate_right(right, rotations) } else { right });
        }
        return rotate_left(node, rotations);
    }
    node
}

fn insert_node(link: Link, child: Box<Node>, rotations: &mut Vec<Rotation>) -> Box<Node> {
    let Some(mut node) = link else {
        return child;
    };
    if child.value < node.value {
        node.left = Some(insert_node(node.left.take(), child, rotations));
    } else {
        node.right = Some(insert_node(node.right.take(), child, rotations));
    }
    rebalance(node, rotations)
}

fn remove_node(link: Link, value: &Value, rotations: &mut Vec<Rotation>) -> Link {
    let mut node = link?;
    match value.cmp(&node.value) {
        Ordering::Less => node.left = remove_node(node.left.take(), value, rotations),
        Ordering::Greater => node.right = remove_node(node.right.take(), value, rotations),
        Ordering::Equal => {
            return match (node.left.take(), node.right.take()) {
                (None, None) => None,
                (Some(child), None) | (None, Some(child)) => Some(child),
                (Some(left), Some(right)) => {
                    let (mut successor, rest) = take_min(right, rotations);
                    successor.left = Some(left);
                    successor.right = rest;
                    Some(rebalance(successor, rotations))
                },
            };
        },
    }
    Some(rebalance(node, rotations))
}

fn take_min(mut node: Box<Node>, rotations: &mut Vec<Rotation>) -> (Box<Node>, Link) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (node, rest)
        },
        Some(left) => {
            let (min, rest) = take_min(left, rotations);
            node.left = rest;
            (min, Some(rebalance(node, rotations)))
        },
    }
}

impl Structure for AvlTree {
    fn kind(&self) -> StructureKind {
        StructureKind::Avl
    }

    fn size(&self) -> usize {
        self.core.size()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Tree(self.core.tree_data())
    }

    fn search(&mut self, value: &Value) -> SearchHit {
        self.core.search_ordered(value)
    }

    fn clear(&mut self) {
        self.core.reset();
        self.core.record(StepKind::Clear, "Cleared tree".to_string(), [], AnimationType::Fade);
    }

    fn operation_history(&self) -> &[Step] {
        self.core.log.steps()
    }

    fn clear_operation_history(&mut self) {
        self.core.log.clear();
    }

    fn as_tree(&mut self) -> Option<&mut dyn TreeOps> {
        Some(self)
    }
}

impl TreeOps for AvlTree {
    fn insert(&mut self, value: Value) -> StructureResult<NodeId> {
        let (path, existing) = self.core.ordered_path(&value);
        self.core.record_path(&value, path);
        if existing.is_some() {
            return Err(StructureError::Duplicate(value.to_string()));
        }

        let child = self.core.node(value.clone(), None);
        let id = child.id;
        let mut rotations = Vec::new();
        self.core.root = Some(insert_node(self.core.root.take(), child, &mut rotations));
        self.core.record(StepKind::Insert, format!("Insert {value}"), [id], AnimationType::Move);
        self.record_rotations(rotations);
        Ok(id)
    }

    fn delete(&mut self, value: &Value) -> StructureResult<()> {
        let (path, existing) = self.core.ordered_path(value);
        self.core.record_path(value, path);
        if existing.is_none() {
            return Err(StructureError::ValueNotFound(value.to_string()));
        }

        let mut rotations = Vec::new();
        self.core.root = remove_node(self.core.root.take(), value, &mut rotations);
        self.core.record(StepKind::Delete, format!("Delete {value}"), [], AnimationType::Fade);
        self.record_rotations(rotations);
        Ok(())
    }

    fn traverse(&mut self, order: TraversalOrder) -> Vec<Value> {
        self.core.traverse_summary(order)
    }

    fn traverse_with_animation(&mut self, order: TraversalOrder, recursive: bool) -> Option<Vec<Value>> {
        Some(self.core.traverse_animated(order, recursive))
    }

    fn height(&self) -> usize {
        height(&self.core.root)
    }

    fn min(&mut self) -> Option<Option<Value>> {
        Some(self.core.extreme(false))
    }

    fn max(&mut self) -> Option<Option<Value>> {
        Some(self.core.extreme(true))
    }

    fn build(&mut self, values: Vec<Value>) -> Option<StructureResult<()>> {
        self.core.reset();
        let count = values.len();
        for value in values {
            if let Err(err) = self.insert(value) {
                return Some(Err(err));
            }
        }
        self.core.record(StepKind::Build,
                         format!("Built tree from {count} values"),
                         [],
                         AnimationType::Instant);
        Some(Ok(()))
    }

    fn tree_data(&self) -> TreeData {
        self.core.tree_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::tree;

    fn tree_of(items: &[i64]) -> AvlTree {
        let mut tree = AvlTree::new();
        for &v in items {
            tree.insert(Value::from(v)).unwrap();
        }
        tree
    }

    fn values(items: &[i64]) -> Vec<Value> {
        items.iter().copied().map(Value::from).collect()
    }

    fn assert_balanced(link: &Link) -> usize {
        let Some(node) = link else {
            return 0;
        };
        let left = assert_balanced(&node.left);
        let right = assert_balanced(&node.right);
        assert!(left.abs_diff(right) <= 1, "unbalanced at {}", node.value);
        assert_eq!(node.height, 1 + left.max(right));
        1 + left.max(right)
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = tree_of(&[10, 20, 30]);
        assert_eq!(tree.traverse(TraversalOrder::Preorder), values(&[20, 10, 30]));
        let rotations = tree.operation_history()
                            .iter()
                            .filter(|step| step.operation_kind == StepKind::Rotate)
                            .count();
        assert!(rotations >= 1);

        let tree = tree_of(&(1..=100).collect::<Vec<_>>());
        assert_eq!(assert_balanced(&tree.core.root), 7);
        assert_eq!(tree::count(&tree.core.root), 100);
    }

    #[test]
    fn left_right_case() {
        let mut tree = tree_of(&[30, 10, 20]);
        assert_eq!(tree.traverse(TraversalOrder::Preorder), values(&[20, 10, 30]));
    }

    #[test]
    fn deletes_rebalance() {
        let mut tree = tree_of(&[50, 30, 70, 20, 40, 60, 80, 10]);
        for v in [70_i64, 60, 80] {
            TreeOps::delete(&mut tree, &Value::from(v)).unwrap();
            assert_balanced(&tree.core.root);
        }
        assert_eq!(tree.traverse(TraversalOrder::Inorder), values(&[10, 20, 30, 40, 50]));
        assert!(TreeOps::delete(&mut tree, &Value::from(70_i64)).is_err());
    }
}
