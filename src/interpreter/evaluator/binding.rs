use std::{fmt, sync::TryLockError};

use crate::{
    ast::StructureKind,
    error::RuntimeError,
    interpreter::evaluator::core::{EvalResult, ExecutionContext},
    structures::{
        core::Structure,
        registry::{CorrelationId, StructureRegistry},
    },
};

/// Where a binding's instance lives.
pub enum Slot {
    /// Owned by the session.
    Owned(Box<dyn Structure>),
    /// Published in the registry; re-resolved on every access.
    Pinned(CorrelationId),
}

/// A declaration name bound to a structure instance.
pub struct Binding {
    /// Kind written in the most recent declaration of the name.
    pub declared: StructureKind,
    pub slot:     Slot,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Binding");
        out.field("declared", &self.declared);
        match &self.slot {
            Slot::Owned(structure) => out.field("owned", &structure.kind()),
            Slot::Pinned(id) => out.field("pinned", id),
        };
        out.finish()
    }
}

impl Binding {
    #[must_use]
    pub fn owned(declared: StructureKind, structure: Box<dyn Structure>) -> Self {
        Self { declared,
               slot: Slot::Owned(structure) }
    }

    #[must_use]
    pub const fn pinned(declared: StructureKind, id: CorrelationId) -> Self {
        Self { declared,
               slot: Slot::Pinned(id) }
    }

    /// The registry id of a pinned binding.
    #[must_use]
    pub const fn correlation_id(&self) -> Option<CorrelationId> {
        match self.slot {
            Slot::Pinned(id) => Some(id),
            Slot::Owned(_) => None,
        }
    }

    /// Kind of the live instance; `None` when a pinned id no longer resolves.
    #[must_use]
    pub fn live_kind(&self, registry: &StructureRegistry) -> Option<StructureKind> {
        match &self.slot {
            Slot::Owned(structure) => Some(structure.kind()),
            Slot::Pinned(id) => registry_kind(registry, *id),
        }
    }
}

/// Kind of a registered instance, if it is live and not locked elsewhere.
#[must_use]
pub fn registry_kind(registry: &StructureRegistry, id: CorrelationId) -> Option<StructureKind> {
    let shared = registry.resolve(id)?;
    let kind = match shared.try_lock() {
        Ok(structure) => structure.kind(),
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().kind(),
        Err(TryLockError::WouldBlock) => return None,
    };
    Some(kind)
}

/// Runs `f` on the instance bound to `name`.
///
/// Pinned bindings are resolved through `registry` on every call.
///
/// # Errors
/// - `StructureNotFound` if the name is unbound or its registry entry was
///   removed.
/// - `StructureBusy` if the shared instance is locked elsewhere.
pub fn with_binding<T>(context: &mut ExecutionContext,
                       registry: &StructureRegistry,
                       name: &str,
                       f: impl FnOnce(&mut dyn Structure) -> T)
                       -> EvalResult<T> {
    let binding = context.structures
                         .get_mut(name)
                         .ok_or_else(|| RuntimeError::StructureNotFound(name.to_string()))?;
    match &mut binding.slot {
        Slot::Owned(structure) => Ok(f(&mut **structure)),
        Slot::Pinned(id) => {
            let shared = registry.resolve(*id)
                                 .ok_or_else(|| RuntimeError::StructureNotFound(name.to_string()))?;
            let mut structure = match shared.try_lock() {
                Ok(structure) => structure,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => return Err(RuntimeError::StructureBusy(name.to_string())),
            };
            Ok(f(&mut **structure))
        },
    }
}
