use std::{cmp::Ordering, collections::VecDeque};

use crate::{
    ast::TraversalOrder,
    interpreter::value::core::Value,
    structures::{
        core::{NodeData, NodeId, SearchHit, Snapshot, TreeData},
        step::{AnimationType, Step, StepKind, StepLog},
    },
};

/// Tree step logs keep at most this many steps...
pub const STEP_LIMIT: usize = 100;
/// ...and are cut back to this many once they overflow.
pub const STEP_KEEP: usize = 50;

pub type Link = Option<Box<Node>>;

/// A tree node.
#[derive(Debug, Clone)]
pub struct Node {
    pub id:     NodeId,
    pub value:  Value,
    /// Huffman weight.
    pub weight: Option<f64>,
    /// Cached subtree height, maintained by the AVL backend only.
    pub height: usize,
    pub left:   Link,
    pub right:  Link,
}

impl Node {
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Number of levels below and including `link`.
#[must_use]
pub fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| 1 + height(&node.left).max(height(&node.right)))
}

/// Number of nodes below and including `link`.
#[must_use]
pub fn count(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| 1 + count(&node.left) + count(&node.right))
}

fn node_data(link: &Link) -> Option<NodeData> {
    link.as_ref().map(|node| NodeData { id:      node.id,
                                        value:   node.value.clone(),
                                        weight:  node.weight,
                                        is_leaf: node.is_leaf(),
                                        left:    node_data(&node.left).map(Box::new),
                                        right:   node_data(&node.right).map(Box::new), })
}

/// Nodes in `order`, walking the tree by recursion.
fn collect_recursive<'t>(link: &'t Link, order: TraversalOrder, out: &mut Vec<&'t Node>) {
    let Some(node) = link else {
        return;
    };
    match order {
        TraversalOrder::Preorder => {
            out.push(node);
            collect_recursive(&node.left, order, out);
            collect_recursive(&node.right, order, out);
        },
        TraversalOrder::Inorder => {
            collect_recursive(&node.left, order, out);
            out.push(node);
            collect_recursive(&node.right, order, out);
        },
        TraversalOrder::Postorder => {
            collect_recursive(&node.left, order, out);
            collect_recursive(&node.right, order, out);
            out.push(node);
        },
        TraversalOrder::LevelOrder => {
            for depth in 0..height(link) {
                collect_level(link, depth, out);
            }
        },
    }
}

fn collect_level<'t>(link: &'t Link, depth: usize, out: &mut Vec<&'t Node>) {
    if let Some(node) = link {
        if depth == 0 {
            out.push(node);
        } else {
            collect_level(&node.left, depth - 1, out);
            collect_level(&node.right, depth - 1, out);
        }
    }
}

/// Nodes in `order`, walking the tree with an explicit stack or queue.
fn collect_iterative(root: &Link, order: TraversalOrder) -> Vec<&Node> {
    let mut out = Vec::new();
    match order {
        TraversalOrder::Preorder => {
            let mut stack: Vec<&Node> = root.as_deref().into_iter().collect();
            while let Some(node) = stack.pop() {
                out.push(node);
                stack.extend(node.right.as_deref());
                stack.extend(node.left.as_deref());
            }
        },
        TraversalOrder::Inorder => {
            let mut stack = Vec::new();
            let mut current = root.as_deref();
            while current.is_some() || !stack.is_empty() {
                while let Some(node) = current {
                    stack.push(node);
                    current = node.left.as_deref();
                }
                if let Some(node) = stack.pop() {
                    out.push(node);
                    current = node.right.as_deref();
                }
            }
        },
        TraversalOrder::Postorder => {
            let mut stack: Vec<&Node> = root.as_deref().into_iter().collect();
            while let Some(node) = stack.pop() {
                out.push(node);
                stack.extend(node.left.as_deref());
                stack.extend(node.right.as_deref());
            }
            out.reverse();
        },
        TraversalOrder::LevelOrder => out = level_order(root),
    }
    out
}

/// Nodes in breadth-first order.
#[must_use]
pub fn level_order(root: &Link) -> Vec<&Node> {
    let mut out = Vec::new();
    let mut queue: VecDeque<&Node> = root.as_deref().into_iter().collect();
    while let Some(node) = queue.pop_front() {
        out.push(node);
        queue.extend(node.left.as_deref());
        queue.extend(node.right.as_deref());
    }
    out
}

/// The node with `id`, for in-place edits.
pub fn find_mut(link: &mut Link, id: NodeId) -> Option<&mut Node> {
    let node = link.as_deref_mut()?;
    if node.id == id {
        return Some(node);
    }
    if let Some(found) = find_mut(&mut node.left, id) {
        return Some(found);
    }
    find_mut(&mut node.right, id)
}

/// Cuts the subtree rooted at `id` out of the tree and returns it.
pub fn detach(link: &mut Link, id: NodeId) -> Option<Box<Node>> {
    if link.as_ref().is_some_and(|node| node.id == id) {
        return link.take();
    }
    let node = link.as_deref_mut()?;
    detach(&mut node.left, id).or_else(|| detach(&mut node.right, id))
}

/// Storage and bookkeeping shared by every tree backend.
#[derive(Debug, Clone)]
pub struct TreeCore {
    pub root: Link,
    next_id:  NodeId,
    pub log:  StepLog,
}

impl Default for TreeCore {
    fn default() -> Self {
        Self { root:    None,
               next_id: 0,
               log:     StepLog::bounded(STEP_LIMIT, STEP_KEEP), }
    }
}

impl TreeCore {
    /// Allocates a detached node with a fresh id.
    pub fn node(&mut self, value: Value, weight: Option<f64>) -> Box<Node> {
        let id = self.next_id;
        self.next_id += 1;
        Box::new(Node { id,
                        value,
                        weight,
                        height: 1,
                        left: None,
                        right: None })
    }

    /// Drops every node and restarts id allocation.
    pub fn reset(&mut self) {
        self.root = None;
        self.next_id = 0;
    }

    #[must_use]
    pub fn size(&self) -> usize {
        count(&self.root)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    #[must_use]
    pub fn tree_data(&self) -> TreeData {
        TreeData { root:          node_data(&self.root),
                   size:          self.size(),
                   height:        self.height(),
                   huffman_codes: None, }
    }

    pub fn record(&mut self,
                  kind: StepKind,
                  description: String,
                  highlight: impl IntoIterator<Item = NodeId>,
                  animation: AnimationType) {
        let step = Step::new(kind, description, Snapshot::Tree(self.tree_data())).highlight(highlight)
                                                                                .animate(animation);
        self.log.record(step);
    }

    /// `(id, value)` pairs in `order`.
    #[must_use]
    pub fn ordered(&self, order: TraversalOrder, recursive: bool) -> Vec<(NodeId, Value)> {
        let nodes = if recursive {
            let mut out = Vec::new();
            collect_recursive(&self.root, order, &mut out);
            out
        } else {
            collect_iterative(&self.root, order)
        };
        nodes.into_iter().map(|node| (node.id, node.value.clone())).collect()
    }

    /// Traversal recorded as one summary step.
    pub fn traverse_summary(&mut self, order: TraversalOrder) -> Vec<Value> {
        let (ids, values): (Vec<_>, Vec<_>) = self.ordered(order, true).into_iter().unzip();
        self.record(StepKind::Visit,
                    format!("{} traversal: {}", order.keyword(), join(&values)),
                    ids,
                    AnimationType::Highlight);
        values
    }

    /// Traversal recorded as one step per visited node.
    pub fn traverse_animated(&mut self, order: TraversalOrder, recursive: bool) -> Vec<Value> {
        let visits = self.ordered(order, recursive);
        let mode = if recursive { "recursive" } else { "iterative" };
        let mut values = Vec::with_capacity(visits.len());
        for (id, value) in visits {
            self.record(StepKind::Visit,
                        format!("Visit {value} ({} {mode})", order.keyword()),
                        [id],
                        AnimationType::Highlight);
            values.push(value);
        }
        self.record(StepKind::Visit,
                    format!("{} traversal: {}", order.keyword(), join(&values)),
                    [],
                    AnimationType::Instant);
        values
    }

    /// Breadth-first search for the first node equal to `value`.
    pub fn search_level_order(&mut self, value: &Value) -> SearchHit {
        let visits: Vec<(NodeId, Value)> =
            level_order(&self.root).into_iter().map(|node| (node.id, node.value.clone())).collect();
        for (id, candidate) in visits {
            let found = candidate == *value;
            self.record(StepKind::Compare,
                        format!("Compare {candidate} with {value}"),
                        [id],
                        AnimationType::Highlight);
            if found {
                self.record(StepKind::Search, format!("Found {value}"), [id], AnimationType::Highlight);
                return SearchHit::Node { node_id: id,
                                         value:   candidate, };
            }
        }
        self.record(StepKind::Search, format!("{value} not found"), [], AnimationType::Instant);
        SearchHit::NotFound
    }

    /// Nodes compared while looking for `value` in a search tree, and the id
    /// of the node holding it.
    #[must_use]
    pub fn ordered_path(&self, value: &Value) -> (Vec<(NodeId, Value)>, Option<NodeId>) {
        let mut path = Vec::new();
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            path.push((node.id, node.value.clone()));
            match value.cmp(&node.value) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return (path, Some(node.id)),
            }
        }
        (path, None)
    }

    /// Records one compare step per node on `path`.
    pub fn record_path(&mut self, value: &Value, path: Vec<(NodeId, Value)>) {
        for (id, candidate) in path {
            self.record(StepKind::Compare,
                        format!("Compare {value} with {candidate}"),
                        [id],
                        AnimationType::Highlight);
        }
    }

    /// Search that follows the ordering of a search tree.
    pub fn search_ordered(&mut self, value: &Value) -> SearchHit {
        let (path, hit) = self.ordered_path(value);
        self.record_path(value, path);
        match hit {
            Some(node_id) => {
                self.record(StepKind::Search, format!("Found {value}"), [node_id], AnimationType::Highlight);
                SearchHit::Node { node_id,
                                  value: value.clone() }
            },
            None => {
                self.record(StepKind::Search, format!("{value} not found"), [], AnimationType::Instant);
                SearchHit::NotFound
            },
        }
    }

    /// Leftmost (`rightmost == false`) or rightmost value, recording the path.
    pub fn extreme(&mut self, rightmost: bool) -> Option<Value> {
        let mut path = Vec::new();
        let mut value = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            path.push(node.id);
            value = Some(node.value.clone());
            current = if rightmost { node.right.as_deref() } else { node.left.as_deref() };
        }
        let value = value?;
        let label = if rightmost { "Maximum" } else { "Minimum" };
        self.record(StepKind::Search, format!("{label} is {value}"), path, AnimationType::Highlight);
        Some(value)
    }
}

/// Formats values as `a, b, c`.
#[must_use]
pub fn join(values: &[Value]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
