use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    ast::{Direction, StructureKind, TraversalOrder},
    error::StructureResult,
    interpreter::value::core::Value,
    structures::step::Step,
};

/// Identifier of a tree node, unique within one tree until it is cleared.
pub type NodeId = usize;

/// Serializable state of a structure.
///
/// List families snapshot as a plain array, tree families as a nested node
/// record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    /// Elements in logical order.
    List(Vec<Value>),
    /// Tree shape.
    Tree(TreeData),
}

impl Snapshot {
    /// The element list, if this is a list snapshot.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(values) => Some(values),
            Self::Tree(_) => None,
        }
    }

    /// The tree record, if this is a tree snapshot.
    #[must_use]
    pub const fn as_tree(&self) -> Option<&TreeData> {
        match self {
            Self::Tree(data) => Some(data),
            Self::List(_) => None,
        }
    }
}

/// Snapshot of a tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeData {
    /// Root node, or `None` for an empty tree.
    pub root:          Option<NodeData>,
    /// Number of nodes.
    pub size:          usize,
    /// Number of levels; `0` for an empty tree.
    pub height:        usize,
    /// Code table of a Huffman tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub huffman_codes: Option<BTreeMap<String, String>>,
}

/// Snapshot of one tree node and its subtrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub id:      NodeId,
    pub value:   Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight:  Option<f64>,
    pub is_leaf: bool,
    pub left:    Option<Box<NodeData>>,
    pub right:   Option<Box<NodeData>>,
}

/// Where a searched value was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchHit {
    /// Position in a list.
    Index(usize),
    /// A tree node.
    Node {
        node_id: NodeId,
        value:   Value,
    },
    /// Not present; serializes as `null`.
    NotFound,
}

/// Result of encoding text with a Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encoding {
    /// The bit string, as `'0'`/`'1'` characters.
    pub bits:  String,
    /// Size comparison against 8 bits per character.
    pub stats: EncodingStats,
}

/// Compression statistics of an [`Encoding`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodingStats {
    pub original_bits:     usize,
    pub compressed_bits:   usize,
    /// Percentage saved, formatted with two decimals, e.g. `"74.43%"`.
    pub compression_ratio: String,
    pub savings_bits:      i64,
}

/// The contract every structure backend fulfils.
///
/// The core methods are mandatory. Family specific operations are reached
/// through the `as_*` accessors, which return `None` when the backend does
/// not offer that capability set. Backends are `Send` so an interpreter can
/// be handed to another thread.
pub trait Structure: Send {
    /// Family of the backend.
    fn kind(&self) -> StructureKind;

    /// Number of stored elements (or nodes).
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Current contents; `List` for list families, `Tree` for trees.
    fn snapshot(&self) -> Snapshot;

    /// Looks a value up, recording comparison steps.
    fn search(&mut self, value: &Value) -> SearchHit;

    /// Removes every element.
    fn clear(&mut self);

    /// Steps recorded since the last call to `clear_operation_history`.
    fn operation_history(&self) -> &[Step];

    /// Starts a fresh animation trace.
    fn clear_operation_history(&mut self);

    fn as_sequence(&mut self) -> Option<&mut dyn SequenceOps> {
        None
    }

    fn as_stack(&mut self) -> Option<&mut dyn StackOps> {
        None
    }

    fn as_queue(&mut self) -> Option<&mut dyn QueueOps> {
        None
    }

    fn as_tree(&mut self) -> Option<&mut dyn TreeOps> {
        None
    }

    fn as_huffman(&mut self) -> Option<&mut dyn HuffmanOps> {
        None
    }
}

/// Positional access, offered by every list family.
pub trait SequenceOps {
    /// Replaces the contents in one step. `None` when the backend has no
    /// bulk loader.
    fn initlist(&mut self, _values: Vec<Value>) -> Option<StructureResult<()>> {
        None
    }

    /// Inserts at `index`, `0..=len`.
    fn insert(&mut self, index: usize, value: Value) -> StructureResult<()>;

    /// Removes and returns the element at `index`, `0..len`.
    fn delete(&mut self, index: usize) -> StructureResult<Value>;

    /// Reads the element at `index`.
    fn get(&mut self, index: usize) -> StructureResult<Value>;

    /// Elements in logical order.
    fn to_list(&self) -> Vec<Value>;

    /// Empties the structure and resets its storage to `capacity` slots.
    fn reset_capacity(&mut self, _capacity: usize) -> Option<StructureResult<()>> {
        None
    }

    /// Reverses the elements in place.
    fn reverse(&mut self) -> Option<()> {
        None
    }
}

/// Last-in first-out access.
pub trait StackOps {
    fn push(&mut self, value: Value) -> StructureResult<()>;
    fn pop(&mut self) -> StructureResult<Value>;
    fn peek(&mut self) -> StructureResult<Value>;
}

/// First-in first-out access.
pub trait QueueOps {
    fn enqueue(&mut self, value: Value) -> StructureResult<()>;
    fn dequeue(&mut self) -> StructureResult<Value>;
    fn front(&mut self) -> StructureResult<Value>;
    fn rear(&mut self) -> StructureResult<Value>;
}

/// Operations shared by the tree families.
pub trait TreeOps {
    /// Inserts a value where the backend decides, returning the new node id.
    fn insert(&mut self, value: Value) -> StructureResult<NodeId>;

    /// Inserts a value as a child of `parent`. `direction` picks the slot; when
    /// absent the first free slot (left, then right) is used. `None` when the
    /// backend places nodes itself.
    fn insert_under(&mut self,
                    _value: Value,
                    _parent: NodeId,
                    _direction: Option<Direction>)
                    -> Option<StructureResult<NodeId>> {
        None
    }

    /// Removes the node holding `value`.
    fn delete(&mut self, value: &Value) -> StructureResult<()>;

    /// Values in the given order, recording a single summary step.
    fn traverse(&mut self, order: TraversalOrder) -> Vec<Value>;

    /// Values in the given order, recording one step per visited node.
    /// `None` when the backend has no animated traversal.
    fn traverse_with_animation(&mut self,
                               _order: TraversalOrder,
                               _recursive: bool)
                               -> Option<Vec<Value>> {
        None
    }

    /// Number of levels.
    fn height(&self) -> usize;

    /// Smallest value; the inner `None` means the tree is empty. The outer
    /// `None` means the backend keeps no order.
    fn min(&mut self) -> Option<Option<Value>> {
        None
    }

    /// Largest value, see [`TreeOps::min`].
    fn max(&mut self) -> Option<Option<Value>> {
        None
    }

    /// Replaces the tree with one built from `values`. `None` when the
    /// backend has no bulk builder.
    fn build(&mut self, _values: Vec<Value>) -> Option<StructureResult<()>> {
        None
    }

    /// Snapshot of the tree.
    fn tree_data(&self) -> TreeData;
}

/// Huffman tree construction and coding.
pub trait HuffmanOps {
    /// Builds the tree from character frequencies of `text`.
    fn build_from_text(&mut self, text: &str) -> StructureResult<()>;

    /// Builds the tree from explicit weights, one leaf per number.
    fn build_from_numbers(&mut self, weights: Vec<Value>) -> StructureResult<()>;

    fn encode(&mut self, text: &str) -> StructureResult<Encoding>;

    fn decode(&mut self, bits: &str) -> StructureResult<String>;

    /// Code of every leaf label.
    fn codes(&self) -> BTreeMap<String, String>;
}
