use std::collections::VecDeque;

use crate::{
    ast::{Direction, StructureKind, TraversalOrder},
    error::{StructureError, StructureResult},
    interpreter::value::core::Value,
    structures::{
        core::{NodeId, SearchHit, Snapshot, Structure, TreeData, TreeOps},
        step::{AnimationType, Step, StepKind},
        tree::{self, Node, TreeCore},
    },
};

/// Binary tree without an ordering invariant.
///
/// Plain inserts fill the first free slot in level order, which keeps the tree
/// complete. Explicit placement under a parent node is available through
/// [`TreeOps::insert_under`].
#[derive(Debug, Clone, Default)]
pub struct BinaryTree {
    core: TreeCore,
}

impl BinaryTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn attach(&mut self, parent: NodeId, side: Direction, child: Box<Node>) -> StructureResult<NodeId> {
        let id = child.id;
        let value = child.value.clone();
        let node = tree::find_mut(&mut self.core.root, parent).ok_or_else(|| parent_not_found(parent))?;
        let slot = match side {
            Direction::Left => &mut node.left,
            Direction::Right => &mut node.right,
        };
        if slot.is_some() {
            return Err(StructureError::ChildOccupied { parent: to_i64(parent),
                                                       side:   side_name(side), });
        }
        *slot = Some(child);
        let parent_value = node.value.clone();
        self.core.record(StepKind::Insert,
                         format!("Insert {value} as {} child of {parent_value}", side_name(side)),
                         [id],
                         AnimationType::Move);
        Ok(id)
    }

    fn free_side(node: &Node) -> Option<Direction> {
        if node.left.is_none() {
            Some(Direction::Left)
        } else if node.right.is_none() {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

fn to_i64(id: NodeId) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}

fn parent_not_found(parent: NodeId) -> StructureError {
    StructureError::ParentNotFound(to_i64(parent))
}

const fn side_name(side: Direction) -> &'static str {
    match side {
        Direction::Left => "left",
        Direction::Right => "right",
    }
}

impl Structure for BinaryTree {
    fn kind(&self) -> StructureKind {
        StructureKind::Binary
    }

    fn size(&self) -> usize {
        self.core.size()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Tree(self.core.tree_data())
    }

    fn search(&mut self, value: &Value) -> SearchHit {
        self.core.search_level_order(value)
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

impl TreeOps for BinaryTree {
    fn insert(&mut self, value: Value) -> StructureResult<NodeId> {
        let target = tree::level_order(&self.core.root).into_iter()
                                                       .find_map(|node| Self::free_side(node).map(|side| (node.id, side)));
        let child = self.core.node(value, None);
        match target {
            Some((parent, side)) => self.attach(parent, side, child),
            None => {
                let id = child.id;
                let value = child.value.clone();
                self.core.root = Some(child);
                self.core.record(StepKind::Insert, format!("Insert {value} as root"), [id], AnimationType::Move);
                Ok(id)
            },
        }
    }

    fn insert_under(&mut self,
                    value: Value,
                    parent: NodeId,
                    direction: Option<Direction>)
                    -> Option<StructureResult<NodeId>> {
        let side = match direction {
            Some(side) => side,
            None => {
                let node = tree::level_order(&self.core.root).into_iter().find(|node| node.id == parent);
                match node {
                    None => return Some(Err(parent_not_found(parent))),
                    Some(node) => match Self::free_side(node) {
                        Some(side) => side,
                        None => {
                            return Some(Err(StructureError::ChildOccupied { parent: to_i64(parent),
                                                                            side:   "both", }));
                        },
                    },
                }
            },
        };
        let child = self.core.node(value, None);
        Some(self.attach(parent, side, child))
    }

    fn delete(&mut self, value: &Value) -> StructureResult<()> {
        let nodes: Vec<(NodeId, Value)> = tree::level_order(&self.core.root).into_iter()
                                                                            .map(|node| (node.id, node.value.clone()))
                                                                            .collect();
        let target = nodes.iter()
                          .find(|(_, candidate)| candidate == value)
                          .map(|(id, _)| *id)
                          .ok_or_else(|| StructureError::ValueNotFound(value.to_string()))?;
        let Some((deepest, deepest_value)) = nodes.last().cloned() else {
            return Err(StructureError::ValueNotFound(value.to_string()));
        };

        if target != deepest
           && let Some(node) = tree::find_mut(&mut self.core.root, target)
        {
            node.value = deepest_value.clone();
            self.core.record(StepKind::Delete,
                             format!("Replace {value} with deepest value {deepest_value}"),
                             [target, deepest],
                             AnimationType::Move);
        }
        tree::detach(&mut self.core.root, deepest);
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

    /// Builds a tree from a level-order listing in which `null` marks a
    /// missing child.
    fn build(&mut self, values: Vec<Value>) -> Option<StructureResult<()>> {
        self.core.reset();
        let mut values = values.into_iter();
        let first = values.next().filter(|value| !value.is_null());
        if let Some(first) = first {
            let root = self.core.node(first, None);
            let mut parents = VecDeque::from([root.id]);
            self.core.root = Some(root);
            while let Some(parent) = parents.pop_front() {
                for side in [Direction::Left, Direction::Right] {
                    let Some(value) = values.next() else {
                        parents.clear();
                        break;
                    };
                    if value.is_null() {
                        continue;
                    }
                    let child = self.core.node(value, None);
                    let id = child.id;
                    if let Some(node) = tree::find_mut(&mut self.core.root, parent) {
                        match side {
                            Direction::Left => node.left = Some(child),
                            Direction::Right => node.right = Some(child),
                        }
                        parents.push_back(id);
                    }
                }
            }
        }
        self.core.record(StepKind::Build,
                         format!("Built tree with {} nodes", self.core.size()),
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

    fn values(items: &[i64]) -> Vec<Value> {
        items.iter().copied().map(Value::from).collect()
    }

    #[test]
    fn inserts_fill_level_order() {
        let mut tree = BinaryTree::new();
        for v in 1..=5_i64 {
            tree.insert(Value::from(v)).unwrap();
        }
        assert_eq!(tree.traverse(TraversalOrder::LevelOrder), values(&[1, 2, 3, 4, 5]));
        assert_eq!(tree.traverse(TraversalOrder::Inorder), values(&[4, 2, 5, 1, 3]));
        assert_eq!(TreeOps::height(&tree), 3);
    }

    #[test]
    fn build_skips_null_holes() {
        let mut tree = BinaryTree::new();
        let input = vec![Value::from(1_i64), Value::Null, Value::from(2_i64), Value::from(3_i64)];
        tree.build(input).unwrap().unwrap();
        assert_eq!(tree.traverse(TraversalOrder::Preorder), values(&[1, 2, 3]));
        assert_eq!(TreeOps::height(&tree), 3);
    }

    #[test]
    fn delete_moves_deepest_value_up() {
        let mut tree = BinaryTree::new();
        tree.build(values(&[1, 2, 3, 4])).unwrap().unwrap();
        TreeOps::delete(&mut tree, &Value::from(2_i64)).unwrap();
        assert_eq!(tree.traverse(TraversalOrder::LevelOrder), values(&[1, 4, 3]));
        assert!(TreeOps::delete(&mut tree, &Value::from(9_i64)).is_err());
    }

    #[test]
    fn insert_under_reports_occupied_slot() {
        let mut tree = BinaryTree::new();
        let root = tree.insert(Value::from(1_i64)).unwrap();
        tree.insert_under(Value::from(2_i64), root, Some(Direction::Right)).unwrap().unwrap();
        let err = tree.insert_under(Value::from(3_i64), root, Some(Direction::Right)).unwrap().unwrap_err();
        assert!(matches!(err, StructureError::ChildOccupied { side: "right", .. }));
        let err = tree.insert_under(Value::from(3_i64), 42, None).unwrap().unwrap_err();
        assert!(matches!(err, StructureError::ParentNotFound(42)));
    }
}
