use std::{collections::HashMap, sync::Arc};

use tracing::info;

use crate::{interpreter::evaluator::core::Interpreter, structures::registry::StructureRegistry};

/// Caller-managed sessions sharing one structure registry.
///
/// Each session is an [`Interpreter`] whose bindings persist between
/// `execute` calls until the session is destroyed. Destroying a session
/// leaves structures it published in the registry.
///
/// # Example
/// ```
/// use dsviz::{parse_program, session::Sessions};
///
/// let mut sessions = Sessions::new();
/// let program = parse_program("Stack s { push 1 }").unwrap();
/// sessions.open("alice").execute(&program);
/// sessions.open("alice").execute(&program);
///
/// let size = sessions.open("alice").with_structure("s", |s| s.size()).unwrap();
/// assert_eq!(size, 2);
/// assert!(sessions.destroy("alice"));
/// assert!(sessions.is_empty());
/// ```
#[derive(Default)]
pub struct Sessions {
    registry: Arc<StructureRegistry>,
    sessions: HashMap<String, Interpreter>,
}

impl Sessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions that publish into an existing registry.
    #[must_use]
    pub fn with_registry(registry: Arc<StructureRegistry>) -> Self {
        Self { registry,
               sessions: HashMap::new() }
    }

    /// The session named `id`, created on first use.
    pub fn open(&mut self, id: &str) -> &mut Interpreter {
        let registry = &self.registry;
        self.sessions.entry(id.to_string()).or_insert_with(|| {
                                                 info!(session = id, "opening session");
                                                 Interpreter::new().with_registry(Arc::clone(registry))
                                             })
    }

    /// Inserts a preconfigured interpreter as session `id`, replacing any
    /// existing one. The interpreter is switched to the shared registry.
    pub fn insert(&mut self, id: &str, interpreter: Interpreter) -> &mut Interpreter {
        let interpreter = interpreter.with_registry(Arc::clone(&self.registry));
        self.sessions.insert(id.to_string(), interpreter);
        self.open(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Interpreter> {
        self.sessions.get(id)
    }

    /// Tears the session down and forgets it. Returns `false` if there was no
    /// such session.
    pub fn destroy(&mut self, id: &str) -> bool {
        let Some(mut interpreter) = self.sessions.remove(id) else {
            return false;
        };
        interpreter.teardown();
        info!(session = id, "destroyed session");
        true
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<StructureRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
