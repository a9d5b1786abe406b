use dsviz::{
    ast::{StructureKind, TraversalOrder},
    error::StructureError,
    interpreter::value::core::Value,
    structures::{
        avl::AvlTree,
        bst::BinarySearchTree,
        core::{QueueOps, SearchHit, SequenceOps, Snapshot, StackOps, Structure, TreeOps},
        linked::LinkedList,
        queue::CircularQueue,
        sequential::SequentialList,
        stack::SequentialStack,
        step::StepKind,
        tree::STEP_LIMIT,
    },
};

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

fn kinds(structure: &dyn Structure) -> Vec<StepKind> {
    structure.operation_history().iter().map(|step| step.operation_kind).collect()
}

#[test]
fn sequential_list_grows_when_full() {
    let mut list = SequentialList::new(2);
    list.insert(0, Value::from(1_i64)).unwrap();
    list.insert(1, Value::from(2_i64)).unwrap();
    list.clear_operation_history();

    list.insert(1, Value::from(9_i64)).unwrap();
    assert_eq!(list.capacity(), 3);
    assert_eq!(kinds(&list), [StepKind::Expand, StepKind::Insert]);
    assert_eq!(list.to_list(), ints(&[1, 9, 2]));
}

#[test]
fn sequential_list_bounds() {
    let mut list = SequentialList::new(4);
    assert!(matches!(list.insert(1, Value::Null), Err(StructureError::IndexOutOfRange { index: 1, size: 0 })));
    assert!(matches!(list.get(0), Err(StructureError::IndexOutOfRange { .. })));
    assert!(matches!(list.delete(0), Err(StructureError::IndexOutOfRange { .. })));
    assert!(list.reset_capacity(0).unwrap().is_err());
}

#[test]
fn sequential_list_search_and_reverse() {
    let mut list = SequentialList::new(4);
    list.initlist(ints(&[3, 1, 4])).unwrap().unwrap();
    assert_eq!(list.search(&Value::from(4_i64)), SearchHit::Index(2));
    assert_eq!(list.search(&Value::from(7_i64)), SearchHit::NotFound);
    list.reverse().unwrap();
    assert_eq!(list.snapshot(), Snapshot::List(ints(&[4, 1, 3])));
}

#[test]
fn linked_list_positions() {
    let mut list = LinkedList::new();
    list.insert(0, Value::from("b")).unwrap();
    list.insert(0, Value::from("a")).unwrap();
    list.insert(2, Value::from("c")).unwrap();
    assert_eq!(list.to_list(), vec![Value::from("a"), Value::from("b"), Value::from("c")]);

    assert_eq!(list.delete(1).unwrap(), Value::from("b"));
    assert_eq!(list.size(), 2);
    assert!(matches!(list.delete(2), Err(StructureError::IndexOutOfRange { index: 2, size: 2 })));
    assert!(list.insert(5, Value::Null).is_err());
}

#[test]
fn linked_list_get_visits_each_node() {
    let mut list = LinkedList::new();
    list.initlist(ints(&[10, 20, 30])).unwrap().unwrap();
    list.clear_operation_history();

    assert_eq!(list.get(2).unwrap(), Value::from(30_i64));
    assert_eq!(kinds(&list), [StepKind::Visit, StepKind::Visit, StepKind::Visit]);
}

#[test]
fn long_linked_list_drops_cleanly() {
    let mut list = LinkedList::new();
    list.initlist((0..100_000_i64).map(Value::from).collect()).unwrap().unwrap();
    assert_eq!(list.size(), 100_000);
    drop(list);
}

#[test]
fn stack_capacity_is_fixed() {
    let mut stack = SequentialStack::new(2);
    stack.push(Value::from(1_i64)).unwrap();
    stack.push(Value::from(2_i64)).unwrap();
    assert_eq!(stack.push(Value::from(3_i64)), Err(StructureError::CapacityExceeded { capacity: 2 }));

    assert_eq!(stack.peek().unwrap(), Value::from(2_i64));
    assert_eq!(stack.pop().unwrap(), Value::from(2_i64));
    assert_eq!(stack.pop().unwrap(), Value::from(1_i64));
    assert_eq!(stack.pop(), Err(StructureError::Empty("stack")));
    assert_eq!(stack.kind(), StructureKind::Stack);
}

#[test]
fn stack_reset_capacity_empties_it() {
    let mut stack = SequentialStack::new(1);
    stack.push(Value::from(1_i64)).unwrap();
    stack.reset_capacity(3).unwrap().unwrap();
    assert!(stack.is_empty());
    for n in 0..3_i64 {
        stack.push(Value::from(n)).unwrap();
    }
    assert_eq!(stack.to_list(), ints(&[0, 1, 2]));
}

#[test]
fn queue_wraps_around_and_grows() {
    let mut queue = CircularQueue::new(3);
    for n in 1..=3_i64 {
        queue.enqueue(Value::from(n)).unwrap();
    }
    assert_eq!(queue.dequeue().unwrap(), Value::from(1_i64));
    queue.enqueue(Value::from(4_i64)).unwrap();
    assert_eq!(queue.capacity(), 3);
    assert_eq!(queue.to_list(), ints(&[2, 3, 4]));

    queue.clear_operation_history();
    queue.enqueue(Value::from(5_i64)).unwrap();
    assert_eq!(queue.capacity(), 4);
    assert_eq!(kinds(&queue), [StepKind::Expand, StepKind::Enqueue]);
    assert_eq!(queue.to_list(), ints(&[2, 3, 4, 5]));
    assert_eq!(queue.front().unwrap(), Value::from(2_i64));
    assert_eq!(queue.rear().unwrap(), Value::from(5_i64));
    assert_eq!(queue.get(1).unwrap(), Value::from(3_i64));
}

#[test]
fn empty_queue_errors() {
    let mut queue = CircularQueue::new(2);
    assert_eq!(queue.dequeue(), Err(StructureError::Empty("queue")));
    assert_eq!(queue.front(), Err(StructureError::Empty("queue")));
    assert_eq!(queue.rear(), Err(StructureError::Empty("queue")));
}

#[test]
fn capabilities_per_family() {
    let mut list = SequentialList::new(1);
    assert!(list.as_sequence().is_some());
    assert!(list.as_stack().is_none());
    assert!(list.as_tree().is_none());

    let mut queue = CircularQueue::new(1);
    assert!(queue.as_queue().is_some());
    assert!(queue.as_stack().is_none());

    let mut tree = AvlTree::new();
    assert!(tree.as_tree().is_some());
    assert!(tree.as_sequence().is_none());
    assert!(tree.as_huffman().is_none());
}

#[test]
fn tree_step_log_is_bounded() {
    let mut tree = AvlTree::new();
    for n in 0..200_i64 {
        tree.insert(Value::from(n)).unwrap();
    }
    assert!(tree.operation_history().len() <= STEP_LIMIT);

    tree.clear_operation_history();
    let values = tree.traverse_with_animation(TraversalOrder::Inorder, false).unwrap();
    assert_eq!(values, (0..200_i64).map(Value::from).collect::<Vec<_>>());
    assert!(tree.operation_history().len() <= STEP_LIMIT);
    assert!(tree.operation_history()
                .last()
                .is_some_and(|step| step.description.starts_with("inorder traversal")));
}

#[test]
fn tree_snapshot_shape() {
    let mut tree = AvlTree::new();
    tree.build(ints(&[2, 1, 3])).unwrap().unwrap();
    let data = tree.tree_data();
    assert_eq!(data.size, 3);
    assert_eq!(data.height, 2);
    let root = data.root.unwrap();
    assert_eq!(root.value, Value::from(2_i64));
    assert!(!root.is_leaf);
    assert!(root.left.as_ref().is_some_and(|left| left.is_leaf));
    assert!(data.huffman_codes.is_none());
}

#[test]
fn queue_capacity_is_not_preallocated() {
    let mut queue = CircularQueue::new(usize::MAX);
    queue.initlist(ints(&[1, 2])).unwrap().unwrap();
    queue.enqueue(Value::from(3_i64)).unwrap();
    assert_eq!(queue.dequeue().unwrap(), Value::from(1_i64));
    assert_eq!(queue.capacity(), usize::MAX);
    assert_eq!(queue.to_list(), ints(&[2, 3]));
    assert!(queue.reset_capacity(usize::MAX).unwrap().is_ok());
    assert!(queue.is_empty());
}

#[test]
fn oversized_initlist_is_rejected_whole() {
    let mut stack = SequentialStack::new(2);
    stack.push(Value::from(9_i64)).unwrap();
    assert_eq!(stack.initlist(ints(&[1, 2, 3])), Some(Err(StructureError::CapacityExceeded { capacity: 2 })));
    assert_eq!(stack.to_list(), ints(&[9]));

    let mut queue = CircularQueue::new(2);
    assert_eq!(queue.initlist(ints(&[1, 2, 3])), Some(Err(StructureError::CapacityExceeded { capacity: 2 })));
    assert!(queue.is_empty());
}

#[test]
fn integers_and_reals_compare_exactly() {
    let big = 1_i64 << 53;
    let real = Value::from(9_007_199_254_740_992.0);
    assert_eq!(Value::from(big), real);
    assert!(Value::from(big + 1) > real);
    assert!(Value::from(i64::MAX) < Value::from(f64::INFINITY));
    assert!(Value::from(i64::MIN) > Value::from(-1e19));
    assert!(Value::from(2_i64) > Value::from(1.5));
    assert!(Value::from(-2_i64) < Value::from(-1.5));
    assert!(Value::from(-1_i64) > Value::from(-1.5));
    assert!(Value::from(i64::MAX) < Value::from(f64::NAN));

    let mut tree = BinarySearchTree::new();
    TreeOps::insert(&mut tree, Value::from(big)).unwrap();
    TreeOps::insert(&mut tree, Value::from(big + 1)).unwrap();
    assert!(TreeOps::insert(&mut tree, real).is_err());
    assert_eq!(tree.size(), 2);
}
