use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use serde::Serialize;
use serde_json::{Map, Value as Json, json};
use tracing::{debug, info, warn};

use crate::{
    ast::{OperationKind, Program, StructureDeclaration, StructureKind},
    error::{RuntimeError, StructureError},
    interpreter::{
        evaluator::{
            binding::{Binding, Slot, registry_kind, with_binding},
            command::{Command, evaluate, parse_speed},
            dispatch::{Outcome, Route, dispatch, operands},
        },
        value::core::Value,
    },
    structures::{
        core::{Snapshot, Structure},
        factory::{DefaultFactory, StructureFactory},
        registry::{CorrelationId, StructureRegistry},
    },
    util::rng::RandomStream,
};

/// Result type used by the evaluator.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Animation speed multiplier before any `speed` operation.
pub const DEFAULT_SPEED: f64 = 1.0;

/// Stores the state a session keeps between `execute` calls.
#[derive(Debug)]
pub struct ExecutionContext {
    /// Declaration names and the instances bound to them.
    pub structures:      HashMap<String, Binding>,
    /// Values that identifiers in operands resolve to.
    pub variables:       HashMap<String, Value>,
    /// Multiplier set by `speed`.
    pub animation_speed: f64,
    /// Switched on by a `pause` without a duration.
    pub step_mode:       bool,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self { structures:      HashMap::new(),
               variables:       HashMap::new(),
               animation_speed: DEFAULT_SPEED,
               step_mode:       false, }
    }
}

/// Coarse log entry appended once per executed operation.
#[derive(Debug, Clone, Serialize)]
pub struct OpRecord {
    pub structure_name: String,
    /// Operation keyword, e.g. `"insert"`.
    pub operation_kind: &'static str,
    /// Operands, `result`, and `error`/`warnings` when present.
    pub details:        Json,
    pub route:          Route,
    /// Source line of the operation.
    pub line:           usize,
    /// The evaluated command; `None` when evaluation itself failed.
    #[serde(skip)]
    pub command:        Option<Command>,
}

impl OpRecord {
    /// The `result` entry of the details.
    #[must_use]
    pub fn result(&self) -> &Json {
        self.details.get("result").unwrap_or(&Json::Null)
    }

    /// The `error` entry of the details, if the operation failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.details.get("error").and_then(Json::as_str)
    }
}

/// Outcome of one declaration.
#[derive(Debug, Clone, Serialize)]
pub struct DeclarationResult {
    /// Kind of the bound instance, which may differ from the declared kind
    /// when the name is pinned to a shared instance.
    #[serde(rename = "type")]
    pub kind:             StructureKind,
    /// Final contents; `None` when the declaration failed before binding.
    pub data:             Option<Snapshot>,
    /// Number of operations run.
    pub operations_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:            Option<String>,
}

/// Envelope returned by [`Interpreter::execute`].
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// `false` when any declaration failed.
    pub success:           bool,
    pub results:           BTreeMap<String, DeclarationResult>,
    /// Narration produced by this call.
    pub execution_log:     Vec<String>,
    /// Op records produced by this call.
    pub operation_history: Vec<OpRecord>,
}

/// Executes programs against a session's structure bindings.
///
/// One interpreter is one session: names declared in earlier `execute` calls
/// stay bound, so a later program that declares the same name continues
/// working on the same instance.
///
/// # Example
/// ```
/// use dsviz::{execute_source, interpreter::evaluator::core::Interpreter};
///
/// let mut interpreter = Interpreter::new().with_seed(1);
/// execute_source(&mut interpreter, "Linked L { init [1, 2] }").unwrap();
/// let result = execute_source(&mut interpreter, "Linked L { insert_tail 3 }").unwrap();
///
/// let data = result.results["L"].data.as_ref().unwrap();
/// assert_eq!(data.as_list().unwrap().len(), 3);
/// ```
pub struct Interpreter {
    context:           ExecutionContext,
    factory:           Box<dyn StructureFactory>,
    registry:          Arc<StructureRegistry>,
    rng:               RandomStream,
    execution_log:     Vec<String>,
    operation_history: Vec<OpRecord>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter with the built-in backends, a private registry
    /// and a clock-seeded random stream.
    #[must_use]
    pub fn new() -> Self {
        Self { context:           ExecutionContext::default(),
               factory:           Box::new(DefaultFactory::default()),
               registry:          Arc::new(StructureRegistry::new()),
               rng:               RandomStream::from_clock(),
               execution_log:     Vec::new(),
               operation_history: Vec::new(), }
    }

    /// Shares `registry` with other interpreters.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<StructureRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Creates structures with `factory`.
    #[must_use]
    pub fn with_factory(mut self, factory: impl StructureFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    /// Makes random draws reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = RandomStream::new(seed);
        self
    }

    #[must_use]
    pub const fn context(&self) -> &ExecutionContext {
        &self.context
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<StructureRegistry> {
        &self.registry
    }

    /// Every narration line since the interpreter was created.
    #[must_use]
    pub fn execution_log(&self) -> &[String] {
        &self.execution_log
    }

    /// Every op record since the interpreter was created.
    #[must_use]
    pub fn operation_history(&self) -> &[OpRecord] {
        &self.operation_history
    }

    /// Defines a variable that identifier operands resolve to.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.context.variables.insert(name.into(), value.into());
    }

    fn log(&mut self, line: impl Into<String>) {
        self.execution_log.push(line.into());
    }

    /// Executes every declaration of `program` in source order.
    ///
    /// A declaration that cannot be bound, or whose structure disappears
    /// mid-way, gets an `error` and turns `success` off; the remaining
    /// declarations still run. Failures of single operations are recorded on
    /// their op records only.
    pub fn execute(&mut self, program: &Program) -> ExecutionResult {
        let log_start = self.execution_log.len();
        let history_start = self.operation_history.len();

        let mut success = true;
        let mut results = BTreeMap::new();
        for declaration in &program.structures {
            let result = self.execute_declaration(declaration);
            success &= result.error.is_none();
            results.insert(declaration.name.clone(), result);
        }

        ExecutionResult { success,
                          results,
                          execution_log: self.execution_log[log_start..].to_vec(),
                          operation_history: self.operation_history[history_start..].to_vec() }
    }

    fn execute_declaration(&mut self, declaration: &StructureDeclaration) -> DeclarationResult {
        let name = declaration.name.as_str();
        self.log(format!("Executing {} {name}", declaration.kind));
        info!(structure = name, kind = %declaration.kind, "executing declaration");

        let mut operations_count = 0;
        let mut error = self.bind(name, declaration.kind).err();
        if error.is_none() {
            for operation in &declaration.operations {
                if let Err(err) = self.execute_operation(name, &operation.kind, operation.line) {
                    error = Some(err);
                    break;
                }
                operations_count += 1;
            }
        }
        if let Some(err) = &error {
            self.log(format!("  {err}"));
            warn!(structure = name, "{err}");
        }

        let state = with_binding(&mut self.context, &self.registry, name, |structure| {
                        (structure.kind(), structure.snapshot())
                    });
        let (kind, data) = match state {
            Ok((kind, data)) => (kind, Some(data)),
            Err(_) => (declaration.kind, None),
        };
        DeclarationResult { kind,
                            data,
                            operations_count,
                            error: error.map(|err| err.to_string()) }
    }

    /// Binds `name` for a declaration of kind `declared`.
    ///
    /// 1. A name already bound in this session is reused when the kinds
    ///    match. On a mismatch a pinned binding is kept with a warning, an
    ///    owned one is rebuilt.
    /// 2. A name published in the registry is bound to that instance.
    /// 3. Otherwise the factory creates a new instance.
    fn bind(&mut self, name: &str, declared: StructureKind) -> EvalResult<()> {
        let current = self.context
                          .structures
                          .get(name)
                          .map(|binding| (binding.live_kind(&self.registry), binding.correlation_id()));
        match current {
            Some((Some(existing), _)) if existing == declared => {
                self.set_declared(name, declared);
                self.log(format!("  Reusing {existing} {name}"));
                debug!(structure = name, "reusing binding");
                return Ok(());
            },
            Some((Some(existing), Some(id))) => {
                self.set_declared(name, declared);
                self.warn_override(name, existing, declared, id);
                return Ok(());
            },
            Some((Some(existing), None)) => {
                let mismatch = RuntimeError::StructureTypeMismatch { name:     name.to_string(),
                                                                     existing: existing.dsl_name(),
                                                                     declared: declared.dsl_name(), };
                self.log(format!("  {mismatch}; rebuilding as {declared}"));
                warn!(structure = name, "{mismatch}");
                self.context.structures.remove(name);
            },
            Some((None, Some(id))) if self.registry.resolve(id).is_some() => {
                return Err(RuntimeError::StructureBusy(name.to_string()));
            },
            Some((None, _)) => {
                self.log(format!("  Shared instance of {name} is gone; recreating"));
                warn!(structure = name, "pinned instance no longer registered");
                self.context.structures.remove(name);
            },
            None => {},
        }

        if let Some(id) = self.registry.lookup(name) {
            self.context.structures.insert(name.to_string(), Binding::pinned(declared, id));
            self.log(format!("  Bound {name} to shared instance {id}"));
            info!(structure = name, %id, "bound to shared instance");
            if let Some(existing) = registry_kind(&self.registry, id).filter(|kind| *kind != declared) {
                self.warn_override(name, existing, declared, id);
            }
            return Ok(());
        }

        let structure =
            self.factory
                .create(declared)
                .ok_or_else(|| RuntimeError::UnknownStructureType(declared.dsl_name().to_string()))?;
        self.context.structures.insert(name.to_string(), Binding::owned(declared, structure));
        self.log(format!("  Created {declared} {name}"));
        debug!(structure = name, kind = %declared, "created structure");
        Ok(())
    }

    fn set_declared(&mut self, name: &str, declared: StructureKind) {
        if let Some(binding) = self.context.structures.get_mut(name) {
            binding.declared = declared;
        }
    }

    fn warn_override(&mut self,
                     name: &str,
                     existing: StructureKind,
                     declared: StructureKind,
                     id: CorrelationId) {
        self.log(format!("  Warning: {name} is pinned to shared {existing} instance {id}; \
                          declared type {declared} ignored"));
        warn!(structure = name, %existing, %declared, %id, "declared type overridden by shared instance");
    }

    /// Evaluates and runs one operation. Only fatal errors are returned.
    fn execute_operation(&mut self, name: &str, kind: &OperationKind, line: usize) -> EvalResult<()> {
        let command = match evaluate(kind, &self.context.variables, &mut self.rng) {
            Ok(command) => command,
            Err(err) => {
                self.log(format!("  {kind}"));
                self.log(format!("    error: {err}"));
                warn!(structure = name, operation = kind.name(), "{err}");
                let mut details = Map::new();
                details.insert("error".into(), json!(err.to_string()));
                self.operation_history.push(OpRecord { structure_name: name.to_string(),
                                                       operation_kind: kind.name(),
                                                       details: Json::Object(details),
                                                       route: Route::Primary,
                                                       line,
                                                       command: None });
                return Ok(());
            },
        };
        let record = self.run(name, command, line)?;
        self.operation_history.push(record);
        Ok(())
    }

    /// Runs an evaluated command and builds its op record.
    fn run(&mut self, name: &str, command: Command, line: usize) -> EvalResult<OpRecord> {
        self.log(format!("  {command}"));
        debug!(structure = name, operation = command.name(), "{command}");

        let mut outcome = Outcome { details: operands(&command),
                                    ..Outcome::default() };
        let result = match &command {
            OperationKind::Speed(value) => Ok(self.set_speed(value, &mut outcome)),
            OperationKind::Pause(duration) => Ok(self.pause(duration.as_ref(), &mut outcome)),
            _ => with_binding(&mut self.context, &self.registry, name, |structure| {
                     structure.clear_operation_history();
                     dispatch(structure, &command, &mut outcome)
                 })?,
        };

        let Outcome { mut route,
                      mut details,
                      mut warnings, } = outcome;
        match result {
            Ok(value) => {
                if !value.is_null() {
                    self.log(format!("    result: {value}"));
                }
                details.insert("result".into(), value);
            },
            Err(err @ StructureError::Unsupported { .. }) => {
                route = Route::Unsupported;
                warnings.push(err.to_string());
                details.insert("result".into(), Json::Null);
            },
            Err(err) => {
                self.log(format!("    error: {err}"));
                warn!(structure = name, operation = command.name(), "{err}");
                details.insert("error".into(), json!(err.to_string()));
            },
        }
        for warning in &warnings {
            self.log(format!("    warning: {warning}"));
            warn!(structure = name, operation = command.name(), "{warning}");
        }
        if !warnings.is_empty() {
            details.insert("warnings".into(), json!(warnings));
        }

        Ok(OpRecord { structure_name: name.to_string(),
                      operation_kind: command.name(),
                      details: Json::Object(details),
                      route,
                      line,
                      command: Some(command) })
    }

    fn set_speed(&mut self, value: &Value, outcome: &mut Outcome) -> Json {
        if let Some(speed) = parse_speed(value) {
            self.context.animation_speed = speed;
            self.log(format!("    Animation speed set to {speed}x"));
        } else {
            outcome.warnings.push(format!("invalid speed {value}; keeping {}x", self.context.animation_speed));
        }
        json!(self.context.animation_speed)
    }

    fn pause(&mut self, duration: Option<&Value>, outcome: &mut Outcome) -> Json {
        let Some(value) = duration else {
            self.context.step_mode = true;
            self.log("    Step mode enabled");
            return Json::Null;
        };
        match value.as_real().filter(|seconds| seconds.is_finite() && *seconds >= 0.0) {
            Some(seconds) => {
                self.log(format!("    Pause for {seconds}s"));
                json!(seconds)
            },
            None => {
                outcome.warnings.push(format!("invalid pause duration {value}"));
                Json::Null
            },
        }
    }

    /// Re-runs recorded operations with their recorded operands.
    ///
    /// Random values are not drawn again. Records whose evaluation failed are
    /// skipped.
    ///
    /// # Errors
    /// Returns the first fatal error, e.g. `StructureNotFound` when a record
    /// names a structure this session no longer binds.
    pub fn replay(&mut self, records: &[OpRecord]) -> EvalResult<Vec<OpRecord>> {
        let mut replayed = Vec::with_capacity(records.len());
        for record in records {
            let Some(command) = &record.command else {
                continue;
            };
            let record = self.run(&record.structure_name, command.clone(), record.line)?;
            self.operation_history.push(record.clone());
            replayed.push(record);
        }
        Ok(replayed)
    }

    /// Moves the instance bound to `name` into the registry and pins the
    /// binding to it. Other sessions sharing the registry that declare `name`
    /// will bind to the same instance.
    ///
    /// # Errors
    /// Returns `StructureNotFound` if `name` is unbound.
    pub fn publish(&mut self, name: &str) -> EvalResult<CorrelationId> {
        let binding = self.context
                          .structures
                          .remove(name)
                          .ok_or_else(|| RuntimeError::StructureNotFound(name.to_string()))?;
        let id = match binding.slot {
            Slot::Owned(structure) => self.registry.register(structure),
            Slot::Pinned(id) => id,
        };
        self.registry.alias(name, id);
        self.context.structures.insert(name.to_string(), Binding::pinned(binding.declared, id));
        self.log(format!("Published {name} as {id}"));
        info!(structure = name, %id, "published structure");
        Ok(id)
    }

    /// Current contents of the structure bound to `name`.
    ///
    /// # Errors
    /// See [`Interpreter::with_structure`].
    pub fn snapshot(&mut self, name: &str) -> EvalResult<Snapshot> {
        self.with_structure(name, |structure| structure.snapshot())
    }

    /// Runs `f` on the structure bound to `name`.
    ///
    /// # Errors
    /// Returns `StructureNotFound` if `name` is unbound or its shared instance
    /// was removed, `StructureBusy` if the shared instance is borrowed.
    pub fn with_structure<T>(&mut self, name: &str, f: impl FnOnce(&mut dyn Structure) -> T) -> EvalResult<T> {
        with_binding(&mut self.context, &self.registry, name, f)
    }

    /// Drops every binding of this session. Published instances stay in the
    /// registry until removed there.
    pub fn teardown(&mut self) {
        let count = self.context.structures.len();
        self.context.structures.clear();
        self.log(format!("Session torn down ({count} bindings dropped)"));
        info!(bindings = count, "session torn down");
    }
}
