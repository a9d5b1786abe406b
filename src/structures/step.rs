use serde::Serialize;

use crate::structures::core::Snapshot;

/// Default duration of one animation frame, in seconds.
pub const DEFAULT_DURATION: f64 = 0.5;

/// What a backend did in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Init,
    Insert,
    Delete,
    Search,
    Compare,
    Visit,
    Access,
    Expand,
    Push,
    Pop,
    Peek,
    Enqueue,
    Dequeue,
    Reverse,
    Clear,
    Build,
    Rotate,
    Merge,
    Encode,
    Decode,
}

/// How the front end should animate a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    Instant,
    Move,
    Fade,
    Highlight,
}

/// One animation frame.
///
/// Steps are produced only by backends; the interpreter never builds them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    /// What happened.
    pub operation_kind: StepKind,
    /// Human readable narration.
    pub description:    String,
    /// Indices (lists) or node ids (trees) to highlight.
    pub highlight_ids:  Vec<usize>,
    /// State of the structure after the step.
    pub snapshot:       Snapshot,
    /// Animation style.
    pub animation_type: AnimationType,
    /// Duration in seconds.
    pub duration:       f64,
}

impl Step {
    /// Creates an instant step with no highlights.
    #[must_use]
    pub fn new(operation_kind: StepKind, description: impl Into<String>, snapshot: Snapshot) -> Self {
        Self { operation_kind,
               description: description.into(),
               highlight_ids: Vec::new(),
               snapshot,
               animation_type: AnimationType::Instant,
               duration: DEFAULT_DURATION }
    }

    /// Highlights the given indices or node ids.
    #[must_use]
    pub fn highlight(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.highlight_ids.extend(ids);
        self
    }

    /// Sets the animation style.
    #[must_use]
    pub const fn animate(mut self, animation_type: AnimationType) -> Self {
        self.animation_type = animation_type;
        self
    }
}

/// An append-only step log, optionally bounded.
///
/// A bounded log that grows past `limit` entries drops its oldest entries,
/// keeping the newest `keep`.
#[derive(Debug, Clone, Default)]
pub struct StepLog {
    steps: Vec<Step>,
    bound: Option<(usize, usize)>,
}

impl StepLog {
    /// A log without a size limit.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { steps: Vec::new(),
               bound: None }
    }

    /// A log that trims itself to `keep` entries once it exceeds `limit`.
    ///
    /// # Example
    /// ```
    /// use dsviz::structures::{
    ///     core::Snapshot,
    ///     step::{Step, StepKind, StepLog},
    /// };
    ///
    /// let mut log = StepLog::bounded(4, 2);
    /// for i in 0..5 {
    ///     log.record(Step::new(StepKind::Visit, format!("step {i}"), Snapshot::List(vec![])));
    /// }
    /// assert_eq!(log.steps().len(), 2);
    /// assert_eq!(log.steps()[1].description, "step 4");
    /// ```
    #[must_use]
    pub const fn bounded(limit: usize, keep: usize) -> Self {
        Self { steps: Vec::new(),
               bound: Some((limit, keep)) }
    }

    /// Appends a step.
    pub fn record(&mut self, step: Step) {
        self.steps.push(step);
        if let Some((limit, keep)) = self.bound
           && self.steps.len() > limit
        {
            let excess = self.steps.len() - keep.min(limit);
            self.steps.drain(..excess);
        }
    }

    /// Recorded steps, oldest first.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Forgets every step.
    pub fn clear(&mut self) {
        self.steps.clear();
    }
}
