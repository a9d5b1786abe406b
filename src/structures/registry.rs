use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use serde::Serialize;

use crate::structures::core::Structure;

/// Handle of a published structure instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CorrelationId(u64);

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A structure instance that several bindings may share.
pub type SharedStructure = Arc<Mutex<Box<dyn Structure>>>;

/// Store of published structure instances.
///
/// Instances are keyed by a [`CorrelationId`]; names are aliases onto ids, so
/// a program in any session that declares a published name binds to the same
/// instance. The registry is shared through `Arc`; an instance is locked
/// only for the length of one access, and an instance locked elsewhere is
/// reported as busy rather than waited on.
///
/// # Example
/// ```
/// use dsviz::{
///     ast::StructureKind,
///     structures::{
///         factory::{DefaultFactory, StructureFactory},
///         registry::StructureRegistry,
///     },
/// };
///
/// let registry = StructureRegistry::default();
/// let list = DefaultFactory::default().create(StructureKind::Linked).unwrap();
/// let id = registry.register(list);
/// registry.alias("shared", id);
///
/// assert_eq!(registry.lookup("shared"), Some(id));
/// assert!(registry.resolve(id).is_some());
///
/// registry.remove(id);
/// assert_eq!(registry.lookup("shared"), None);
/// assert!(registry.is_empty());
/// ```
#[derive(Default)]
pub struct StructureRegistry {
    instances: Mutex<HashMap<CorrelationId, SharedStructure>>,
    aliases:   Mutex<HashMap<String, CorrelationId>>,
    next_id:   AtomicU64,
}

/// Locks a registry table. The tables stay consistent under a panic, so a
/// poisoned lock is taken over.
fn table<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl fmt::Debug for StructureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructureRegistry")
         .field("instances", &table(&self.instances).len())
         .field("aliases", &*table(&self.aliases))
         .finish()
    }
}

impl StructureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an instance and returns its fresh id.
    pub fn register(&self, structure: Box<dyn Structure>) -> CorrelationId {
        self.register_shared(Arc::new(Mutex::new(structure)))
    }

    /// Stores an already shared instance.
    pub fn register_shared(&self, structure: SharedStructure) -> CorrelationId {
        let id = CorrelationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        table(&self.instances).insert(id, structure);
        id
    }

    /// The instance behind `id`, if it is still registered.
    #[must_use]
    pub fn resolve(&self, id: CorrelationId) -> Option<SharedStructure> {
        table(&self.instances).get(&id).cloned()
    }

    /// Points `name` at `id`, replacing any previous alias of that name.
    pub fn alias(&self, name: impl Into<String>, id: CorrelationId) {
        table(&self.aliases).insert(name.into(), id);
    }

    /// The id a name is aliased to, if that instance is still registered.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<CorrelationId> {
        let id = *table(&self.aliases).get(name)?;
        table(&self.instances).contains_key(&id).then_some(id)
    }

    /// Drops an instance together with every alias pointing at it.
    pub fn remove(&self, id: CorrelationId) -> Option<SharedStructure> {
        table(&self.aliases).retain(|_, target| *target != id);
        table(&self.instances).remove(&id)
    }

    /// Number of registered instances.
    #[must_use]
    pub fn len(&self) -> usize {
        table(&self.instances).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
