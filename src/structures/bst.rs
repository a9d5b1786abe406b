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

/// Binary search tree without rebalancing. Duplicate keys are rejected.
#[derive(Debug, Clone, Default)]
pub struct BinarySearchTree {
    core: TreeCore,
}

impl BinarySearchTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Removes the node holding `value` below `link`, returning its id.
///
/// A node with two children is replaced by its in-order successor, which keeps
/// its own id.
fn remove(link: &mut Link, value: &Value) -> Option<NodeId> {
    let node = link.as_mut()?;
    match value.cmp(&node.value) {
        Ordering::Less => remove(&mut node.left, value),
        Ordering::Greater => remove(&mut node.right, value),
        Ordering::Equal => {
            let mut node = link.take()?;
            let id = node.id;
            *link = match (node.left.take(), node.right.take()) {
                (None, None) => None,
                (Some(child), None) | (None, Some(child)) => Some(child),
                (Some(left), Some(right)) => {
                    let (mut successor, rest) = take_min(right);
                    successor.left = Some(left);
                    successor.right = rest;
                    Some(successor)
                },
            };
            Some(id)
        },
    }
}

/// Splits the minimum node off a subtree.
fn take_min(mut node: Box<Node>) -> (Box<Node>, Link) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (node, rest)
        },
        Some(left) => {
            let (min, rest) = take_min(left);
            node.left = rest;
            (min, Some(node))
        },
    }
}

impl Structure for BinarySearchTree {
    fn kind(&self) -> StructureKind {
        StructureKind::Bst
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

impl TreeOps for BinarySearchTree {
    fn insert(&mut self, value: Value) -> StructureResult<NodeId> {
        let (path, existing) = self.core.ordered_path(&value);
        self.core.record_path(&value, path);
        if existing.is_some() {
            return Err(StructureError::Duplicate(value.to_string()));
        }

        let child = self.core.node(value.clone(), None);
        let id = child.id;
        let mut link = &mut self.core.root;
        while let Some(node) = link {
            link = if value < node.value { &mut node.left } else { &mut node.right };
        }
        *link = Some(child);
        self.core.record(StepKind::Insert, format!("Insert {value}"), [id], AnimationType::Move);
        Ok(id)
    }

    fn delete(&mut self, value: &Value) -> StructureResult<()> {
        let (path, _) = self.core.ordered_path(value);
        self.core.record_path(value, path);
        remove(&mut self.core.root, value).ok_or_else(|| StructureError::ValueNotFound(value.to_string()))?;
        self.core.record(StepKind::Delete, format!("Delete {value}"), [], AnimationType::Fade);
        Ok(())
    }

    fn traverse(&mut self, order: TraversalOrder) -> Vec<Value> {
        self.core.traverse_summary(order)
    }

    fn traverse_with_animation(&mut self, order: TraversalOrder, recursive: bool) -> Option<Vec<Value>> {
        Some(self.core.traverse_animated(order, recursive))
    }

    fn height(&self) -> usize {
        self.core.height()
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

    fn tree_of(items: &[i64]) -> BinarySearchTree {
        let mut tree = BinarySearchTree::new();
        for &v in items {
            tree.insert(Value::from(v)).unwrap();
        }
        tree
    }

    fn values(items: &[i64]) -> Vec<Value> {
        items.iter().copied().map(Value::from).collect()
    }

    #[test]
    fn inorder_is_sorted() {
        let mut tree = tree_of(&[50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(tree.traverse(TraversalOrder::Inorder), values(&[20, 30, 40, 50, 60, 70, 80]));
        assert_eq!(tree.traverse(TraversalOrder::Preorder), values(&[50, 30, 20, 40, 70, 60, 80]));
        assert_eq!(TreeOps::height(&tree), 3);
    }

    #[test]
    fn rejects_duplicates() {
        let mut tree = tree_of(&[5, 3]);
        assert_eq!(tree.insert(Value::from(3_i64)), Err(StructureError::Duplicate("3".into())));
        assert_eq!(tree.size(), 2);
    }

    #[test]
    fn delete_with_two_children_uses_successor() {
        let mut tree = tree_of(&[50, 30, 70, 60, 80, 65]);
        TreeOps::delete(&mut tree, &Value::from(50_i64)).unwrap();
        assert_eq!(tree.traverse(TraversalOrder::Preorder), values(&[60, 30, 70, 65, 80]));
        assert_eq!(TreeOps::delete(&mut tree, &Value::from(50_i64)),
                   Err(StructureError::ValueNotFound("50".into())));
    }

    #[test]
    fn min_and_max() {
        let mut tree = tree_of(&[8, 3, 10, 1, 14]);
        assert_eq!(tree.min(), Some(Some(Value::from(1_i64))));
        assert_eq!(tree.max(), Some(Some(Value::from(14_i64))));
        assert_eq!(BinarySearchTree::new().min(), Some(None));
    }

    #[test]
    fn search_records_the_path() {
        let mut tree = tree_of(&[8, 3, 10, 6]);
        tree.clear_operation_history();
        assert!(matches!(tree.search(&Value::from(6_i64)), SearchHit::Node { .. }));
        let compares = tree.operation_history()
                           .iter()
                           .filter(|step| step.operation_kind == StepKind::Compare)
                           .count();
        assert_eq!(compares, 3);
    }
}
