use crate::{
    ast::StructureKind,
    structures::{
        avl::AvlTree, binary::BinaryTree, bst::BinarySearchTree, core::Structure, huffman::HuffmanTree,
        linked::LinkedList, queue::CircularQueue, sequential::SequentialList, stack::SequentialStack,
    },
};

/// Default number of slots of array backed structures.
pub const DEFAULT_CAPACITY: usize = 100;

/// Creates structure backends.
///
/// Returning `None` means the factory cannot produce the requested family;
/// the interpreter reports that as an unknown structure type.
pub trait StructureFactory: Send {
    fn create(&self, kind: StructureKind) -> Option<Box<dyn Structure>>;
}

/// Factory for the built-in backends.
///
/// # Example
/// ```
/// use dsviz::{
///     ast::StructureKind,
///     structures::{
///         core::Structure,
///         factory::{DefaultFactory, StructureFactory},
///     },
/// };
///
/// let factory = DefaultFactory::default();
/// for kind in StructureKind::ALL {
///     let structure = factory.create(kind).unwrap();
///     assert_eq!(structure.kind(), kind);
///     assert!(structure.is_empty());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultFactory {
    /// Initial capacity of sequential lists, stacks and queues.
    pub capacity: usize,
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY }
    }
}

impl StructureFactory for DefaultFactory {
    fn create(&self, kind: StructureKind) -> Option<Box<dyn Structure>> {
        let structure: Box<dyn Structure> = match kind {
            StructureKind::Sequential => Box::new(SequentialList::new(self.capacity)),
            StructureKind::Linked => Box::new(LinkedList::new()),
            StructureKind::Stack => Box::new(SequentialStack::new(self.capacity)),
            StructureKind::Queue => Box::new(CircularQueue::new(self.capacity)),
            StructureKind::Binary => Box::new(BinaryTree::new()),
            StructureKind::Bst => Box::new(BinarySearchTree::new()),
            StructureKind::Avl => Box::new(AvlTree::new()),
            StructureKind::Huffman => Box::new(HuffmanTree::new()),
        };
        Some(structure)
    }
}
