use crate::{
    ast::StructureKind,
    error::StructureResult,
    interpreter::value::core::Value,
    structures::{
        core::{SearchHit, SequenceOps, Snapshot, Structure},
        sequential::out_of_range,
        step::{AnimationType, Step, StepKind, StepLog},
    },
};

type Link = Option<Box<ListNode>>;

#[derive(Debug, Clone)]
struct ListNode {
    value: Value,
    next:  Link,
}

/// Singly linked list.
#[derive(Debug, Default)]
pub struct LinkedList {
    head: Link,
    len:  usize,
    log:  StepLog,
}

impl LinkedList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn iter(&self) -> impl Iterator<Item = &Value> {
        std::iter::successors(self.head.as_deref(), |node| node.next.as_deref())
            .map(|node| &node.value)
    }

    /// The link that owns position `index`, `0..=len`.
    fn link_at(&mut self, index: usize) -> StructureResult<&mut Link> {
        let size = self.len;
        let mut link = &mut self.head;
        for _ in 0..index {
            match link {
                Some(node) => link = &mut node.next,
                None => return Err(out_of_range(index, size)),
            }
        }
        Ok(link)
    }

    fn record(&mut self, kind: StepKind, description: String, highlight: Option<usize>) {
        let step = Step::new(kind, description, self.snapshot()).highlight(highlight)
                                                                 .animate(AnimationType::Highlight);
        self.log.record(step);
    }

    /// Drops nodes one at a time so long lists do not recurse in `Drop`.
    fn unlink_all(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
        self.len = 0;
    }
}

impl Drop for LinkedList {
    fn drop(&mut self) {
        self.unlink_all();
    }
}

impl Structure for LinkedList {
    fn kind(&self) -> StructureKind {
        StructureKind::Linked
    }

    fn size(&self) -> usize {
        self.len
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::List(self.to_list())
    }

    fn search(&mut self, value: &Value) -> SearchHit {
        let position = self.iter().position(|v| v == value);
        let visited = position.map_or(self.len, |p| p + 1);
        for i in 0..visited {
            self.record(StepKind::Visit, format!("Visit node {i}"), Some(i));
        }
        match position {
            Some(i) => {
                self.record(StepKind::Search, format!("Found {value} at node {i}"), Some(i));
                SearchHit::Index(i)
            },
            None => {
                self.record(StepKind::Search, format!("{value} not found"), None);
                SearchHit::NotFound
            },
        }
    }

    fn clear(&mut self) {
        self.unlink_all();
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

impl SequenceOps for LinkedList {
    fn initlist(&mut self, values: Vec<Value>) -> Option<StructureResult<()>> {
        self.unlink_all();
        self.len = values.len();
        self.head = values.into_iter()
                          .rev()
                          .fold(None, |next, value| Some(Box::new(ListNode { value, next })));
        self.record(StepKind::Init, format!("Linked {} nodes", self.len), None);
        Some(Ok(()))
    }

    fn insert(&mut self, index: usize, value: Value) -> StructureResult<()> {
        if index > self.len {
            return Err(out_of_range(index, self.len));
        }
        let description = format!("Link new node {value} at position {index}");
        let link = self.link_at(index)?;
        let next = link.take();
        *link = Some(Box::new(ListNode { value, next }));
        self.len += 1;
        let step = Step::new(StepKind::Insert, description, self.snapshot()).highlight([index])
                                                                            .animate(AnimationType::Move);
        self.log.record(step);
        Ok(())
    }

    fn delete(&mut self, index: usize) -> StructureResult<Value> {
        if index >= self.len {
            return Err(out_of_range(index, self.len));
        }
        let size = self.len;
        let link = self.link_at(index)?;
        let Some(node) = link.take() else {
            return Err(out_of_range(index, size));
        };
        let ListNode { value, next } = *node;
        *link = next;
        self.len -= 1;
        let step = Step::new(StepKind::Delete,
                             format!("Unlink node {value} at position {index}"),
                             self.snapshot()).highlight([index])
                                             .animate(AnimationType::Fade);
        self.log.record(step);
        Ok(value)
    }

    fn get(&mut self, index: usize) -> StructureResult<Value> {
        let value = self.iter()
                        .nth(index)
                        .cloned()
                        .ok_or_else(|| out_of_range(index, self.len))?;
        for i in 0..=index {
            self.record(StepKind::Visit, format!("Visit node {i}"), Some(i));
        }
        Ok(value)
    }

    fn to_list(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    fn reverse(&mut self) -> Option<()> {
        let mut reversed = None;
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
            node.next = reversed;
            reversed = Some(node);
        }
        self.head = reversed;
        self.record(StepKind::Reverse, "Reversed links".to_string(), None);
        Some(())
    }
}
