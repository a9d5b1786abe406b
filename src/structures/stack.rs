use crate::{
    ast::StructureKind,
    error::{StructureError, StructureResult},
    interpreter::value::core::Value,
    structures::{
        core::{SearchHit, SequenceOps, Snapshot, StackOps, Structure},
        sequential::out_of_range,
        step::{AnimationType, Step, StepKind, StepLog},
    },
};

/// Array backed stack with a fixed capacity.
///
/// Positional `insert` and `delete` behave as `push` and `pop`; the index is
/// ignored because a stack only changes at its top.
#[derive(Debug, Clone)]
pub struct SequentialStack {
    items:    Vec<Value>,
    capacity: usize,
    log:      StepLog,
}

impl SequentialStack {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { items:    Vec::new(),
               capacity: capacity.max(1),
               log:      StepLog::unbounded(), }
    }

    fn top(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    fn record(&mut self, kind: StepKind, description: String, animation: AnimationType) {
        let step = Step::new(kind, description, self.snapshot()).highlight(self.top())
                                                                 .animate(animation);
        self.log.record(step);
    }
}

impl Structure for SequentialStack {
    fn kind(&self) -> StructureKind {
        StructureKind::Stack
    }

    fn size(&self) -> usize {
        self.items.len()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::List(self.items.clone())
    }

    fn search(&mut self, value: &Value) -> SearchHit {
        // Scan from the top down, the way a stack is inspected.
        let hit = self.items.iter().rposition(|v| v == value);
        let description = match hit {
            Some(i) => format!("Found {value} at depth {}", self.items.len() - 1 - i),
            None => format!("{value} not on the stack"),
        };
        let step = Step::new(StepKind::Search, description, self.snapshot()).highlight(hit)
                                                                            .animate(AnimationType::Highlight);
        self.log.record(step);
        hit.map_or(SearchHit::NotFound, SearchHit::Index)
    }

    fn clear(&mut self) {
        self.items.clear();
        self.record(StepKind::Clear, "Cleared stack".to_string(), AnimationType::Fade);
    }

    fn operation_history(&self) -> &[Step] {
        self.log.steps()
    }

    fn clear_operation_history(&mut self) {
        self.log.clear();
    }

    fn as_sequence(&mut self) -> Option<&mut dyn SequenceOps> {
        Some(self)
    }

    fn as_stack(&mut self) -> Option<&mut dyn StackOps> {
        Some(self)
    }
}

impl StackOps for SequentialStack {
    fn push(&mut self, value: Value) -> StructureResult<()> {
        if self.items.len() >= self.capacity {
            return Err(StructureError::CapacityExceeded { capacity: self.capacity });
        }
        let description = format!("Push {value}");
        self.items.push(value);
        self.record(StepKind::Push, description, AnimationType::Move);
        Ok(())
    }

    fn pop(&mut self) -> StructureResult<Value> {
        let value = self.items.pop().ok_or(StructureError::Empty("stack"))?;
        self.record(StepKind::Pop, format!("Pop {value}"), AnimationType::Fade);
        Ok(value)
    }

    fn peek(&mut self) -> StructureResult<Value> {
        let value = self.items.last().cloned().ok_or(StructureError::Empty("stack"))?;
        self.record(StepKind::Peek, format!("Top is {value}"), AnimationType::Highlight);
        Ok(value)
    }
}

impl SequenceOps for SequentialStack {
    /// The first value ends up at the bottom. A list longer than the
    /// capacity is rejected whole and the stack is left as it was.
    fn initlist(&mut self, values: Vec<Value>) -> Option<StructureResult<()>> {
        if values.len() > self.capacity {
            self.record(StepKind::Init,
                        format!("Cannot load {} elements into {} slots", values.len(), self.capacity),
                        AnimationType::Instant);
            return Some(Err(StructureError::CapacityExceeded { capacity: self.capacity }));
        }
        self.items = values;
        let step = Step::new(StepKind::Init,
                             format!("Loaded {} elements bottom to top", self.items.len()),
                             self.snapshot()).highlight(0..self.items.len())
                                             .animate(AnimationType::Instant);
        self.log.record(step);
        Some(Ok(()))
    }

    fn insert(&mut self, _index: usize, value: Value) -> StructureResult<()> {
        self.push(value)
    }

    fn delete(&mut self, _index: usize) -> StructureResult<Value> {
        self.pop()
    }

    fn get(&mut self, index: usize) -> StructureResult<Value> {
        let value = self.items
                        .get(index)
                        .cloned()
                        .ok_or_else(|| out_of_range(index, self.items.len()))?;
        let step = Step::new(StepKind::Access,
                             format!("Read {value} at position {index}"),
                             self.snapshot()).highlight([index])
                                             .animate(AnimationType::Highlight);
        self.log.record(step);
        Ok(value)
    }

    fn to_list(&self) -> Vec<Value> {
        self.items.clone()
    }

    fn reset_capacity(&mut self, capacity: usize) -> Option<StructureResult<()>> {
        if capacity == 0 {
            return Some(Err(StructureError::InvalidArgument("capacity must be positive".into())));
        }
        self.items.clear();
        self.capacity = capacity;
        self.record(StepKind::Init,
                    format!("Storage reset to {capacity} slots"),
                    AnimationType::Instant);
        Some(Ok(()))
    }
}
