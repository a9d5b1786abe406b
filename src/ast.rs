use std::fmt;

use serde::Serialize;

/// The eight structure families a declaration can name.
///
/// The source keyword (`Sequential`, `BST`, ...) and the backend name used in
/// results (`sequential`, `bst`, ...) are both derived from this enum, so the
/// keyword to backend mapping is total by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    /// Array backed list.
    Sequential,
    /// Singly linked list.
    Linked,
    /// Array backed stack.
    Stack,
    /// Circular queue.
    Queue,
    /// Free binary tree, filled in level order.
    Binary,
    /// Binary search tree.
    Bst,
    /// Self balancing AVL tree.
    Avl,
    /// Huffman coding tree.
    Huffman,
}

impl StructureKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 8] = [Self::Sequential,
                                Self::Linked,
                                Self::Stack,
                                Self::Queue,
                                Self::Binary,
                                Self::Bst,
                                Self::Avl,
                                Self::Huffman];

    /// Backend type name reported in results, e.g. `"bst"`.
    #[must_use]
    pub const fn backend_name(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Linked => "linked",
            Self::Stack => "stack",
            Self::Queue => "queue",
            Self::Binary => "binary",
            Self::Bst => "bst",
            Self::Avl => "avl",
            Self::Huffman => "huffman",
        }
    }

    /// Canonical source spelling, e.g. `"BST"`.
    #[must_use]
    pub const fn dsl_name(self) -> &'static str {
        match self {
            Self::Sequential => "Sequential",
            Self::Linked => "Linked",
            Self::Stack => "Stack",
            Self::Queue => "Queue",
            Self::Binary => "Binary",
            Self::Bst => "BST",
            Self::Avl => "AVL",
            Self::Huffman => "Huffman",
        }
    }

    /// Looks up a kind from a lower-cased keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.backend_name() == word)
    }

    /// Whether the family snapshots as a tree rather than a list.
    #[must_use]
    pub const fn is_tree(self) -> bool {
        matches!(self, Self::Binary | Self::Bst | Self::Avl | Self::Huffman)
    }

    /// Tree families whose shape is decided by the backend, not the caller.
    #[must_use]
    pub const fn is_ordered_tree(self) -> bool {
        matches!(self, Self::Bst | Self::Avl | Self::Huffman)
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dsl_name())
    }
}

/// Tree traversal orders accepted by `traverse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    /// Node, left, right.
    Preorder,
    /// Left, node, right.
    Inorder,
    /// Left, right, node.
    Postorder,
    /// Breadth first.
    #[serde(rename = "levelorder")]
    LevelOrder,
}

impl TraversalOrder {
    /// Every order.
    pub const ALL: [Self; 4] = [Self::Preorder, Self::Inorder, Self::Postorder, Self::LevelOrder];

    /// Source keyword for the order.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Preorder => "preorder",
            Self::Inorder => "inorder",
            Self::Postorder => "postorder",
            Self::LevelOrder => "levelorder",
        }
    }

    /// Looks up an order from a lower-cased keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order| order.keyword() == word)
    }
}

/// Child side used by explicit binary tree inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The left child slot.
    Left,
    /// The right child slot.
    Right,
}

/// A `random(min, max)` call.
///
/// The call is a value leaf: it may appear wherever a literal value is
/// expected and is drawn exactly once when the surrounding operation runs.
/// The single-argument form `random(max)` is stored as `min = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomCall {
    /// Inclusive lower bound.
    pub min:    i64,
    /// Inclusive upper bound.
    pub max:    i64,
    /// Line of the `random` keyword.
    pub line:   usize,
    /// Column of the `random` keyword.
    pub column: usize,
}

/// A value position in the grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    /// An integer literal.
    Integer(i64),
    /// A floating point literal.
    Float(f64),
    /// A string literal, escapes already resolved.
    Text(String),
    /// A bare identifier; resolved against interpreter variables at run time.
    Identifier(String),
    /// A random draw.
    Random(RandomCall),
    /// `null` or `none`.
    Null,
}

impl fmt::Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::Random(call) => write!(f, "random({}, {})", call.min, call.max),
            Self::Null => write!(f, "null"),
        }
    }
}

/// Operand of `delete`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget<V = ValueExpr> {
    /// `delete at N`.
    Index(i64),
    /// `delete <value>`.
    Value(V),
}

/// Every operation form of the language.
///
/// One variant per keyword. The payload type `V` is `ValueExpr` in the
/// syntax tree; once random draws and variable lookups are done the same
/// shape is carried with concrete runtime values.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationKind<V = ValueExpr> {
    /// `init [v, ...] [capacity N]`
    Init {
        /// Initial contents.
        values:   Vec<V>,
        /// Storage capacity to reset to before loading.
        capacity: Option<i64>,
    },
    /// `insert v [at N] [left|right]`
    Insert {
        /// Value to insert.
        value:     V,
        /// Position (sequences) or parent node id (binary trees).
        index:     Option<i64>,
        /// Child side for binary trees.
        direction: Option<Direction>,
    },
    /// `delete at N` or `delete v`
    Delete(DeleteTarget<V>),
    /// `search v`
    Search(V),
    /// `clear`
    Clear,
    /// `push v`
    Push(V),
    /// `pop`
    Pop,
    /// `peek`
    Peek,
    /// `enqueue v`
    Enqueue(V),
    /// `dequeue`
    Dequeue,
    /// `front`
    Front,
    /// `rear`
    Rear,
    /// `build [v, ...]`
    Build(Vec<V>),
    /// `build_text "..."`
    BuildText(String),
    /// `build_numbers [n, ...]`
    BuildNumbers(Vec<V>),
    /// `traverse <order> [recursive|iterative]`
    Traverse {
        /// Visiting order.
        order:     TraversalOrder,
        /// `false` when `iterative` was written.
        recursive: bool,
    },
    /// `height`
    Height,
    /// `min`
    Min,
    /// `max`
    Max,
    /// `reverse`
    Reverse,
    /// `encode "..."`
    Encode(String),
    /// `decode "..."`
    Decode(String),
    /// `show_codes`
    ShowCodes,
    /// `insert_head v`
    InsertHead(V),
    /// `insert_tail v`
    InsertTail(V),
    /// `delete_head`
    DeleteHead,
    /// `delete_tail`
    DeleteTail,
    /// `get N`
    Get(i64),
    /// `size`
    Size,
    /// `speed v`
    Speed(V),
    /// `pause [v]`
    Pause(Option<V>),
}

impl<V> OperationKind<V> {
    /// The keyword that introduces the operation, used as the operation kind
    /// in log records.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Insert { .. } => "insert",
            Self::Delete(_) => "delete",
            Self::Search(_) => "search",
            Self::Clear => "clear",
            Self::Push(_) => "push",
            Self::Pop => "pop",
            Self::Peek => "peek",
            Self::Enqueue(_) => "enqueue",
            Self::Dequeue => "dequeue",
            Self::Front => "front",
            Self::Rear => "rear",
            Self::Build(_) => "build",
            Self::BuildText(_) => "build_text",
            Self::BuildNumbers(_) => "build_numbers",
            Self::Traverse { .. } => "traverse",
            Self::Height => "height",
            Self::Min => "min",
            Self::Max => "max",
            Self::Reverse => "reverse",
            Self::Encode(_) => "encode",
            Self::Decode(_) => "decode",
            Self::ShowCodes => "show_codes",
            Self::InsertHead(_) => "insert_head",
            Self::InsertTail(_) => "insert_tail",
            Self::DeleteHead => "delete_head",
            Self::DeleteTail => "delete_tail",
            Self::Get(_) => "get",
            Self::Size => "size",
            Self::Speed(_) => "speed",
            Self::Pause(_) => "pause",
        }
    }

    /// Converts every value operand with `f`, keeping the shape.
    ///
    /// Operands are visited in source order and `f` is called exactly once
    /// per operand; the first error stops the conversion.
    ///
    /// # Example
    /// ```
    /// use dsviz::ast::OperationKind;
    ///
    /// let op: OperationKind<i32> = OperationKind::Push(20);
    /// let doubled = op.try_map(|v| Ok::<_, ()>(v * 2)).unwrap();
    /// assert_eq!(doubled, OperationKind::Push(40));
    /// ```
    pub fn try_map<W, E, F>(&self, mut f: F) -> Result<OperationKind<W>, E>
        where F: FnMut(&V) -> Result<W, E>
    {
        let mut all = |values: &[V]| values.iter().map(&mut f).collect::<Result<Vec<_>, E>>();

        Ok(match self {
            Self::Init { values, capacity } => OperationKind::Init { values:   all(values)?,
                                                                     capacity: *capacity, },
            Self::Build(values) => OperationKind::Build(all(values)?),
            Self::BuildNumbers(values) => OperationKind::BuildNumbers(all(values)?),
            Self::Insert { value,
                           index,
                           direction, } => OperationKind::Insert { value:     f(value)?,
                                                                   index:     *index,
                                                                   direction: *direction, },
            Self::Delete(DeleteTarget::Index(i)) => OperationKind::Delete(DeleteTarget::Index(*i)),
            Self::Delete(DeleteTarget::Value(v)) => {
                OperationKind::Delete(DeleteTarget::Value(f(v)?))
            },
            Self::Search(v) => OperationKind::Search(f(v)?),
            Self::Push(v) => OperationKind::Push(f(v)?),
            Self::Enqueue(v) => OperationKind::Enqueue(f(v)?),
            Self::InsertHead(v) => OperationKind::InsertHead(f(v)?),
            Self::InsertTail(v) => OperationKind::InsertTail(f(v)?),
            Self::Speed(v) => OperationKind::Speed(f(v)?),
            Self::Pause(v) => OperationKind::Pause(v.as_ref().map(&mut f).transpose()?),
            Self::Clear => OperationKind::Clear,
            Self::Pop => OperationKind::Pop,
            Self::Peek => OperationKind::Peek,
            Self::Dequeue => OperationKind::Dequeue,
            Self::Front => OperationKind::Front,
            Self::Rear => OperationKind::Rear,
            Self::BuildText(text) => OperationKind::BuildText(text.clone()),
            Self::Traverse { order, recursive } => OperationKind::Traverse { order:     *order,
                                                                             recursive: *recursive, },
            Self::Height => OperationKind::Height,
            Self::Min => OperationKind::Min,
            Self::Max => OperationKind::Max,
            Self::Reverse => OperationKind::Reverse,
            Self::Encode(text) => OperationKind::Encode(text.clone()),
            Self::Decode(bits) => OperationKind::Decode(bits.clone()),
            Self::ShowCodes => OperationKind::ShowCodes,
            Self::DeleteHead => OperationKind::DeleteHead,
            Self::DeleteTail => OperationKind::DeleteTail,
            Self::Get(i) => OperationKind::Get(*i),
            Self::Size => OperationKind::Size,
        })
    }
}

/// Renders a list of operands as `[a, b, c]`.
fn write_list<V: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[V]) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{value}")?;
    }
    write!(f, "]")
}

impl<V: fmt::Display> fmt::Display for OperationKind<V> {
    /// Renders the operation back in source form, e.g. `insert 10 at 2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        match self {
            Self::Init { values, capacity } => {
                write!(f, " ")?;
                write_list(f, values)?;
                if let Some(capacity) = capacity {
                    write!(f, " capacity {capacity}")?;
                }
                Ok(())
            },
            Self::Insert { value,
                           index,
                           direction, } => {
                write!(f, " {value}")?;
                if let Some(index) = index {
                    write!(f, " at {index}")?;
                }
                match direction {
                    Some(Direction::Left) => write!(f, " left"),
                    Some(Direction::Right) => write!(f, " right"),
                    None => Ok(()),
                }
            },
            Self::Delete(DeleteTarget::Index(i)) => write!(f, " at {i}"),
            Self::Build(values) | Self::BuildNumbers(values) => {
                write!(f, " ")?;
                write_list(f, values)
            },
            Self::Delete(DeleteTarget::Value(v))
            | Self::Search(v)
            | Self::Push(v)
            | Self::Enqueue(v)
            | Self::InsertHead(v)
            | Self::InsertTail(v)
            | Self::Speed(v)
            | Self::Pause(Some(v)) => write!(f, " {v}"),
            Self::BuildText(text) | Self::Encode(text) | Self::Decode(text) => {
                write!(f, " \"{text}\"")
            },
            Self::Traverse { order, recursive } => {
                write!(f, " {}", order.keyword())?;
                if *recursive { Ok(()) } else { write!(f, " iterative") }
            },
            Self::Get(i) => write!(f, " {i}"),
            _ => Ok(()),
        }
    }
}

/// A single operation with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// What to do.
    pub kind:   OperationKind,
    /// Line of the operation keyword.
    pub line:   usize,
    /// Column of the operation keyword.
    pub column: usize,
}

/// `Kind [name] { operations }`
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDeclaration {
    /// Declared structure family.
    pub kind:       StructureKind,
    /// Binding name; `default` when omitted.
    pub name:       String,
    /// Operations in source order.
    pub operations: Vec<Operation>,
    /// Line of the kind keyword.
    pub line:       usize,
    /// Column of the kind keyword.
    pub column:     usize,
}

/// A parsed program: declarations in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level declarations.
    pub structures: Vec<StructureDeclaration>,
}

impl Program {
    /// Total number of operations across all declarations.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.structures.iter().map(|decl| decl.operations.len()).sum()
    }
}
