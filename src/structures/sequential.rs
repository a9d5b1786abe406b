use crate::{
    ast::StructureKind,
    error::{StructureError, StructureResult},
    interpreter::value::core::Value,
    structures::{
        core::{SearchHit, SequenceOps, Snapshot, Structure},
        step::{AnimationType, Step, StepKind, StepLog},
    },
};

/// Growth applied when a full array needs one more slot.
///
/// # Example
/// ```
/// use dsviz::structures::sequential::grown_capacity;
///
/// assert_eq!(grown_capacity(10), 15);
/// assert_eq!(grown_capacity(1), 2);
/// assert_eq!(grown_capacity(0), 1);
/// ```
#[must_use]
pub const fn grown_capacity(capacity: usize) -> usize {
    let scaled = capacity.saturating_mul(3) / 2;
    if scaled > capacity { scaled } else { capacity.saturating_add(1) }
}

/// Array backed list.
///
/// Storage has a nominal capacity; inserting into a full list grows it by
/// half and records an `expand` step first.
#[derive(Debug, Clone)]
pub struct SequentialList {
    items:    Vec<Value>,
    capacity: usize,
    log:      StepLog,
}

impl SequentialList {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { items:    Vec::new(),
               capacity: capacity.max(1),
               log:      StepLog::unbounded(), }
    }

    /// Nominal number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn record(&mut self, kind: StepKind, description: String, highlight: Option<usize>) {
        let step = Step::new(kind, description, self.snapshot()).highlight(highlight)
                                                                 .animate(AnimationType::Highlight);
        self.log.record(step);
    }

    fn ensure_room(&mut self, needed: usize) {
        while needed > self.capacity {
            let old = self.capacity;
            self.capacity = grown_capacity(old);
            self.record(StepKind::Expand,
                        format!("Capacity {old} exhausted, expanding to {}", self.capacity),
                        None);
        }
    }

    fn check_index(&self, index: usize) -> StructureResult<()> {
        if index >= self.items.len() {
            return Err(out_of_range(index, self.items.len()));
        }
        Ok(())
    }
}

pub(crate) fn out_of_range(index: usize, size: usize) -> StructureError {
    StructureError::IndexOutOfRange { index: i64::try_from(index).unwrap_or(i64::MAX),
                                      size }
}

impl Structure for SequentialList {
    fn kind(&self) -> StructureKind {
        StructureKind::Sequential
    }

    fn size(&self) -> usize {
        self.items.len()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::List(self.items.clone())
    }

    fn search(&mut self, value: &Value) -> SearchHit {
        for i in 0..self.items.len() {
            let found = self.items[i] == *value;
            self.record(StepKind::Compare,
                        format!("Compare position {i} ({}) with {value}", self.items[i]),
                        Some(i));
            if found {
                self.record(StepKind::Search, format!("Found {value} at position {i}"), Some(i));
                return SearchHit::Index(i);
            }
        }
        self.record(StepKind::Search, format!("{value} not found"), None);
        SearchHit::NotFound
    }

    fn clear(&mut self) {
        self.items.clear();
        self.record(StepKind::Clear, "Cleared list".to_string(), None);
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
}

impl SequenceOps for SequentialList {
    fn initlist(&mut self, values: Vec<Value>) -> Option<StructureResult<()>> {
        self.items.clear();
        self.ensure_room(values.len());
        self.items = values;
        self.record(StepKind::Init,
                    format!("Initialised with {} elements", self.items.len()),
                    None);
        Some(Ok(()))
    }

    fn insert(&mut self, index: usize, value: Value) -> StructureResult<()> {
        if index > self.items.len() {
            return Err(out_of_range(index, self.items.len()));
        }
        self.ensure_room(self.items.len() + 1);
        let shifted = self.items.len() - index;
        let description = format!("Insert {value} at position {index}, shifting {shifted} elements");
        self.items.insert(index, value);
        let step = Step::new(StepKind::Insert, description, self.snapshot()).highlight([index])
                                                                            .animate(AnimationType::Move);
        self.log.record(step);
        Ok(())
    }

    fn delete(&mut self, index: usize) -> StructureResult<Value> {
        self.check_index(index)?;
        let removed = self.items.remove(index);
        let step = Step::new(StepKind::Delete,
                             format!("Delete {removed} at position {index}"),
                             self.snapshot()).highlight([index])
                                             .animate(AnimationType::Fade);
        self.log.record(step);
        Ok(removed)
    }

    fn get(&mut self, index: usize) -> StructureResult<Value> {
        self.check_index(index)?;
        let value = self.items[index].clone();
        self.record(StepKind::Access, format!("Read {value} at position {index}"), Some(index));
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
        self.record(StepKind::Init, format!("Storage reset to {capacity} slots"), None);
        Some(Ok(()))
    }

    fn reverse(&mut self) -> Option<()> {
        self.items.reverse();
        self.record(StepKind::Reverse, "Reversed list".to_string(), None);
        Some(())
    }
}
