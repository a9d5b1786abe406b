use crate::{
    ast::StructureKind,
    error::{StructureError, StructureResult},
    interpreter::value::core::Value,
    structures::{
        core::{QueueOps, SearchHit, SequenceOps, Snapshot, Structure},
        sequential::{grown_capacity, out_of_range},
        step::{AnimationType, Step, StepKind, StepLog},
    },
};

/// Circular queue over a ring of slots.
///
/// When the ring is full an enqueue grows it by half, re-laying the elements
/// from slot zero, and records an `expand` step. Positional `insert` and
/// `delete` behave as `enqueue` and `dequeue`.
///
/// The capacity is nominal. Slots are materialised as the rear first reaches
/// them, so until the ring has wrapped `head + len == slots.len()`.
#[derive(Debug, Clone)]
pub struct CircularQueue {
    slots:    Vec<Option<Value>>,
    capacity: usize,
    head:     usize,
    len:      usize,
    log:      StepLog,
}

impl CircularQueue {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { slots:    Vec::new(),
               capacity: capacity.max(1),
               head:     0,
               len:      0,
               log:      StepLog::unbounded(), }
    }

    /// Number of slots in the ring.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn slot(&self, position: usize) -> usize {
        (self.head + position) % self.capacity
    }

    fn reset(&mut self) {
        self.slots.clear();
        self.head = 0;
        self.len = 0;
    }

    fn iter(&self) -> impl Iterator<Item = &Value> {
        (0..self.len).filter_map(|i| self.slots[self.slot(i)].as_ref())
    }

    fn expand(&mut self) {
        let old = self.capacity;
        let (head, len) = (self.head, self.len);
        let slots = (0..len).map(|i| self.slots[(head + i) % old].take()).collect();
        self.slots = slots;
        self.head = 0;
        self.capacity = grown_capacity(old);
        self.record(StepKind::Expand,
                    format!("Queue full at {old} slots, expanding to {}", self.capacity()),
                    None);
    }

    fn record(&mut self, kind: StepKind, description: String, highlight: Option<usize>) {
        let step = Step::new(kind, description, self.snapshot()).highlight(highlight)
                                                                 .animate(AnimationType::Highlight);
        self.log.record(step);
    }

    fn end(&self, position: usize) -> StructureResult<Value> {
        if self.len == 0 {
            return Err(StructureError::Empty("queue"));
        }
        self.slots[self.slot(position)].clone().ok_or(StructureError::Empty("queue"))
    }
}

impl Structure for CircularQueue {
    fn kind(&self) -> StructureKind {
        StructureKind::Queue
    }

    fn size(&self) -> usize {
        self.len
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::List(self.to_list())
    }

    fn search(&mut self, value: &Value) -> SearchHit {
        let hit = self.iter().position(|v| v == value);
        let description = hit.map_or_else(|| format!("{value} not in queue"),
                                          |i| format!("Found {value} at position {i}"));
        self.record(StepKind::Search, description, hit);
        hit.map_or(SearchHit::NotFound, SearchHit::Index)
    }

    fn clear(&mut self) {
        self.reset();
        self.record(StepKind::Clear, "Cleared queue".to_string(), None);
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

    fn as_queue(&mut self) -> Option<&mut dyn QueueOps> {
        Some(self)
    }
}

impl QueueOps for CircularQueue {
    fn enqueue(&mut self, value: Value) -> StructureResult<()> {
        if self.len == self.capacity {
            self.expand();
        }
        let description = format!("Enqueue {value} at the rear");
        let tail = self.slot(self.len);
        if tail == self.slots.len() {
            self.slots.push(Some(value));
        } else {
            self.slots[tail] = Some(value);
        }
        self.len += 1;
        let step = Step::new(StepKind::Enqueue, description, self.snapshot()).highlight([self.len - 1])
                                                                             .animate(AnimationType::Move);
        self.log.record(step);
        Ok(())
    }

    fn dequeue(&mut self) -> StructureResult<Value> {
        if self.len == 0 {
            return Err(StructureError::Empty("queue"));
        }
        let value = self.slots[self.head].take().ok_or(StructureError::Empty("queue"))?;
        self.head = (self.head + 1) % self.capacity;
        self.len -= 1;
        let step = Step::new(StepKind::Dequeue, format!("Dequeue {value}"), self.snapshot())
                       .animate(AnimationType::Fade);
        self.log.record(step);
        Ok(value)
    }

    fn front(&mut self) -> StructureResult<Value> {
        let value = self.end(0)?;
        self.record(StepKind::Peek, format!("Front is {value}"), Some(0));
        Ok(value)
    }

    fn rear(&mut self) -> StructureResult<Value> {
        let last = self.len.saturating_sub(1);
        let value = self.end(last)?;
        self.record(StepKind::Peek, format!("Rear is {value}"), Some(last));
        Ok(value)
    }
}

impl SequenceOps for CircularQueue {
    fn initlist(&mut self, values: Vec<Value>) -> Option<StructureResult<()>> {
        if values.len() > self.capacity {
            self.record(StepKind::Init,
                        format!("Cannot load {} elements into {} slots", values.len(), self.capacity),
                        None);
            return Some(Err(StructureError::CapacityExceeded { capacity: self.capacity }));
        }
        self.len = values.len();
        self.head = 0;
        self.slots = values.into_iter().map(Some).collect();
        let step = Step::new(StepKind::Init,
                             format!("Loaded {} elements front to rear", self.len),
                             self.snapshot()).highlight(0..self.len)
                                             .animate(AnimationType::Instant);
        self.log.record(step);
        Some(Ok(()))
    }

    fn insert(&mut self, _index: usize, value: Value) -> StructureResult<()> {
        self.enqueue(value)
    }

    fn delete(&mut self, _index: usize) -> StructureResult<Value> {
        self.dequeue()
    }

    fn get(&mut self, index: usize) -> StructureResult<Value> {
        if index >= self.len {
            return Err(out_of_range(index, self.len));
        }
        let value = self.end(index)?;
        self.record(StepKind::Access, format!("Read {value} at position {index}"), Some(index));
        Ok(value)
    }

    fn to_list(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    fn reset_capacity(&mut self, capacity: usize) -> Option<StructureResult<()>> {
        if capacity == 0 {
            return Some(Err(StructureError::InvalidArgument("capacity must be positive".into())));
        }
        self.reset();
        self.capacity = capacity;
        self.record(StepKind::Init, format!("Ring reset to {capacity} slots"), None);
        Some(Ok(()))
    }
}
