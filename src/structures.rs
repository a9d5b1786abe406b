//! Structure backends and the capability contract the interpreter drives.
//!
//! Every backend implements [`core::Structure`]; optional capability sets
//! (sequence, stack, queue, tree, Huffman) are exposed through
//! `Option`-returning accessors so the interpreter can pick a primary path, a
//! fallback, or report the operation as unsupported without any runtime
//! reflection.

/// Capability traits and the snapshot types they return.
pub mod core;
/// Fine-grained animation steps recorded by backends.
pub mod step;
/// Creates backends by kind.
pub mod factory;
/// Process-wide store of shared instances keyed by correlation id.
pub mod registry;

/// Array backed list with growable capacity.
pub mod sequential;
/// Singly linked list.
pub mod linked;
/// Bounded array stack.
pub mod stack;
/// Circular queue with growth.
pub mod queue;

/// Node storage, traversals and snapshots shared by the tree backends.
pub mod tree;
/// Free binary tree.
pub mod binary;
/// Binary search tree.
pub mod bst;
/// AVL tree.
pub mod avl;
/// Huffman coding tree.
pub mod huffman;
