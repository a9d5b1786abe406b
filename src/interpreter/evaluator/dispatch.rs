use serde::Serialize;
use serde_json::{Map, Value as Json, json};

use crate::{
    ast::{DeleteTarget, Direction, OperationKind, StructureKind},
    error::{StructureError, StructureResult},
    interpreter::{evaluator::command::Command, value::core::Value},
    structures::core::{SearchHit, SequenceOps, Structure},
    util::num::i64_to_usize_checked,
};

/// Which path an operation took through the dispatch table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// The capability named by the operation ran.
    #[default]
    Primary,
    /// A generic capability stood in for a missing specific one.
    Fallback,
    /// The backend offers neither; the operation was a no-op.
    Unsupported,
}

/// Everything dispatch learns besides the result value.
#[derive(Debug, Default)]
pub struct Outcome {
    pub route:    Route,
    /// Operands and extra facts reported in the op record.
    pub details:  Map<String, Json>,
    pub warnings: Vec<String>,
}

impl Outcome {
    fn fallback(&mut self) {
        self.route = Route::Fallback;
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

fn to_json<T: Serialize>(value: &T) -> Json {
    serde_json::to_value(value).unwrap_or_default()
}

fn list_json(values: &[Value]) -> Json {
    Json::Array(values.iter().map(Json::from).collect())
}

fn unsupported(structure: &dyn Structure, command: &Command) -> StructureError {
    StructureError::Unsupported { operation: command.name(),
                                  structure: structure.kind().backend_name(), }
}

fn to_index(index: i64, size: usize) -> StructureResult<usize> {
    i64_to_usize_checked(index, StructureError::IndexOutOfRange { index, size })
}

/// Index of the last element, or `Empty` for an empty structure.
fn last_index(structure: &dyn Structure) -> StructureResult<usize> {
    structure.size()
             .checked_sub(1)
             .ok_or(StructureError::Empty(structure.kind().backend_name()))
}

fn first_index(structure: &dyn Structure) -> StructureResult<usize> {
    if structure.is_empty() {
        return Err(StructureError::Empty(structure.kind().backend_name()));
    }
    Ok(0)
}

fn sequence<'s>(structure: &'s mut dyn Structure, command: &Command) -> StructureResult<&'s mut dyn SequenceOps> {
    let err = unsupported(structure, command);
    structure.as_sequence().ok_or(err)
}

/// Operands of a command, as reported in the op record.
#[must_use]
pub fn operands(command: &Command) -> Map<String, Json> {
    let mut details = Map::new();
    match command {
        OperationKind::Init { values, capacity } => {
            details.insert("values".into(), list_json(values));
            if let Some(capacity) = capacity {
                details.insert("capacity".into(), json!(capacity));
            }
        },
        OperationKind::Insert { value,
                                index,
                                direction, } => {
            details.insert("value".into(), Json::from(value));
            if let Some(index) = index {
                details.insert("index".into(), json!(index));
            }
            if let Some(direction) = direction {
                details.insert("direction".into(), to_json(direction));
            }
        },
        OperationKind::Delete(DeleteTarget::Index(index)) | OperationKind::Get(index) => {
            details.insert("index".into(), json!(index));
        },
        OperationKind::Delete(DeleteTarget::Value(value))
        | OperationKind::Search(value)
        | OperationKind::Push(value)
        | OperationKind::Enqueue(value)
        | OperationKind::InsertHead(value)
        | OperationKind::InsertTail(value)
        | OperationKind::Speed(value)
        | OperationKind::Pause(Some(value)) => {
            details.insert("value".into(), Json::from(value));
        },
        OperationKind::Build(values) | OperationKind::BuildNumbers(values) => {
            details.insert("values".into(), list_json(values));
        },
        OperationKind::BuildText(text) | OperationKind::Encode(text) => {
            details.insert("text".into(), json!(text));
        },
        OperationKind::Decode(bits) => {
            details.insert("bits".into(), json!(bits));
        },
        OperationKind::Traverse { order, recursive } => {
            details.insert("order".into(), to_json(order));
            details.insert("recursive".into(), json!(recursive));
        },
        _ => {},
    }
    details
}

/// Runs a command against a structure.
///
/// # Parameters
/// - `structure`: The bound instance.
/// - `command`: The evaluated operation. `speed` and `pause` never reach a
///   structure and evaluate to `null` here.
/// - `outcome`: Receives the route taken and any warnings.
///
/// # Returns
/// The operation's result as JSON, `null` for pure mutations.
///
/// # Errors
/// Returns the backend's error. A capability the backend lacks is reported as
/// `StructureError::Unsupported`.
pub fn dispatch(structure: &mut dyn Structure, command: &Command, outcome: &mut Outcome) -> StructureResult<Json> {
    let kind = structure.kind();
    match command {
        OperationKind::Init { values, capacity } => {
            if let Some(capacity) = capacity {
                let capacity = i64_to_usize_checked(*capacity,
                                                    StructureError::InvalidArgument(format!("capacity {capacity} must be positive")))?;
                match structure.as_sequence().and_then(|seq| seq.reset_capacity(capacity)) {
                    Some(result) => result?,
                    None => {
                        outcome.fallback();
                        outcome.warn(format!("{} has no configurable capacity", kind.backend_name()));
                    },
                }
            }
            init(structure, values.clone(), command, outcome)?;
            Ok(Json::Null)
        },
        OperationKind::Insert { value,
                                index,
                                direction, } => insert(structure, value.clone(), *index, *direction, command, outcome),
        OperationKind::Delete(target) => delete(structure, target, command, outcome),
        OperationKind::Search(value) => Ok(to_json(&structure.search(value))),
        OperationKind::Clear => {
            structure.clear();
            Ok(Json::Null)
        },
        OperationKind::Push(value) => {
            if let Some(stack) = structure.as_stack() {
                stack.push(value.clone())?;
            } else {
                let at = structure.size();
                sequence(structure, command)?.insert(at, value.clone())?;
                outcome.fallback();
            }
            Ok(Json::Null)
        },
        OperationKind::Pop => {
            if let Some(stack) = structure.as_stack() {
                return Ok(Json::from(&stack.pop()?));
            }
            let at = last_index(structure)?;
            outcome.fallback();
            Ok(Json::from(&sequence(structure, command)?.delete(at)?))
        },
        OperationKind::Peek => {
            if let Some(stack) = structure.as_stack() {
                return Ok(Json::from(&stack.peek()?));
            }
            let at = last_index(structure)?;
            outcome.fallback();
            Ok(Json::from(&sequence(structure, command)?.get(at)?))
        },
        OperationKind::Enqueue(value) => {
            if let Some(queue) = structure.as_queue() {
                queue.enqueue(value.clone())?;
            } else {
                let at = structure.size();
                sequence(structure, command)?.insert(at, value.clone())?;
                outcome.fallback();
            }
            Ok(Json::Null)
        },
        OperationKind::Dequeue => {
            if let Some(queue) = structure.as_queue() {
                return Ok(Json::from(&queue.dequeue()?));
            }
            let at = first_index(structure)?;
            outcome.fallback();
            Ok(Json::from(&sequence(structure, command)?.delete(at)?))
        },
        OperationKind::Front => {
            if let Some(queue) = structure.as_queue() {
                return Ok(Json::from(&queue.front()?));
            }
            let at = first_index(structure)?;
            outcome.fallback();
            Ok(Json::from(&sequence(structure, command)?.get(at)?))
        },
        OperationKind::Rear => {
            if let Some(queue) = structure.as_queue() {
                return Ok(Json::from(&queue.rear()?));
            }
            let at = last_index(structure)?;
            outcome.fallback();
            Ok(Json::from(&sequence(structure, command)?.get(at)?))
        },
        OperationKind::Build(values) => {
            let err = unsupported(structure, command);
            let tree = structure.as_tree().ok_or(err)?;
            if let Some(result) = tree.build(values.clone()) {
                result?;
            } else {
                outcome.fallback();
                structure.clear();
                if let Some(tree) = structure.as_tree() {
                    for value in values {
                        tree.insert(value.clone())?;
                    }
                }
            }
            Ok(Json::Null)
        },
        OperationKind::BuildText(text) => {
            let err = unsupported(structure, command);
            structure.as_huffman().ok_or(err)?.build_from_text(text)?;
            Ok(Json::Null)
        },
        OperationKind::BuildNumbers(values) => {
            let err = unsupported(structure, command);
            structure.as_huffman().ok_or(err)?.build_from_numbers(values.clone())?;
            Ok(Json::Null)
        },
        OperationKind::Traverse { order, recursive } => {
            let err = unsupported(structure, command);
            let tree = structure.as_tree().ok_or(err)?;
            let values = match tree.traverse_with_animation(*order, *recursive) {
                Some(values) => values,
                None => {
                    outcome.fallback();
                    tree.traverse(*order)
                },
            };
            Ok(list_json(&values))
        },
        OperationKind::Height => {
            let err = unsupported(structure, command);
            Ok(json!(structure.as_tree().ok_or(err)?.height()))
        },
        OperationKind::Min | OperationKind::Max => {
            let err = unsupported(structure, command);
            let tree = structure.as_tree().ok_or_else(|| err.clone())?;
            let extreme = if matches!(command, OperationKind::Min) { tree.min() } else { tree.max() };
            extreme.map(|value| value.as_ref().map_or(Json::Null, Json::from)).ok_or(err)
        },
        OperationKind::Reverse => {
            let err = unsupported(structure, command);
            sequence(structure, command)?.reverse().ok_or(err)?;
            Ok(Json::Null)
        },
        OperationKind::Encode(text) => {
            let err = unsupported(structure, command);
            Ok(to_json(&structure.as_huffman().ok_or(err)?.encode(text)?))
        },
        OperationKind::Decode(bits) => {
            let err = unsupported(structure, command);
            Ok(json!(structure.as_huffman().ok_or(err)?.decode(bits)?))
        },
        OperationKind::ShowCodes => {
            let err = unsupported(structure, command);
            Ok(to_json(&structure.as_huffman().ok_or(err)?.codes()))
        },
        OperationKind::InsertHead(value) => {
            sequence(structure, command)?.insert(0, value.clone())?;
            Ok(Json::Null)
        },
        OperationKind::InsertTail(value) => {
            let at = structure.size();
            sequence(structure, command)?.insert(at, value.clone())?;
            Ok(Json::Null)
        },
        OperationKind::DeleteHead => {
            let at = first_index(structure)?;
            Ok(Json::from(&sequence(structure, command)?.delete(at)?))
        },
        OperationKind::DeleteTail => {
            let at = last_index(structure)?;
            Ok(Json::from(&sequence(structure, command)?.delete(at)?))
        },
        OperationKind::Get(index) => {
            let at = to_index(*index, structure.size())?;
            Ok(Json::from(&sequence(structure, command)?.get(at)?))
        },
        OperationKind::Size => Ok(json!(structure.size())),
        // Interpreter-local; handled before dispatch.
        OperationKind::Speed(_) | OperationKind::Pause(_) => Ok(Json::Null),
    }
}

/// Bulk load: `initlist` when the backend has one, otherwise clear and insert
/// one value at a time.
fn init(structure: &mut dyn Structure,
        values: Vec<Value>,
        command: &Command,
        outcome: &mut Outcome)
        -> StructureResult<()> {
    if structure.kind().is_tree() {
        outcome.fallback();
        structure.clear();
        let err = unsupported(structure, command);
        let tree = structure.as_tree().ok_or(err)?;
        for value in values {
            tree.insert(value)?;
        }
        return Ok(());
    }

    let seq = sequence(structure, command)?;
    if let Some(result) = seq.initlist(values.clone()) {
        return result;
    }
    outcome.fallback();
    structure.clear();
    let seq = sequence(structure, command)?;
    for (at, value) in values.into_iter().enumerate() {
        seq.insert(at, value)?;
    }
    Ok(())
}

fn insert(structure: &mut dyn Structure,
          value: Value,
          index: Option<i64>,
          direction: Option<Direction>,
          command: &Command,
          outcome: &mut Outcome)
          -> StructureResult<Json> {
    let kind = structure.kind();

    if kind == StructureKind::Stack
       && let Some(stack) = structure.as_stack()
    {
        if index.is_some() {
            outcome.warn("stack inserts always push; index ignored".to_string());
        }
        stack.push(value)?;
        return Ok(Json::Null);
    }

    if let Some(tree) = structure.as_tree() {
        if let Some(parent) = index.filter(|_| kind == StructureKind::Binary) {
            let parent = i64_to_usize_checked(parent, StructureError::ParentNotFound(parent))?;
            if let Some(result) = tree.insert_under(value.clone(), parent, direction) {
                return Ok(json!(result?));
            }
            outcome.fallback();
            outcome.warn(format!("{} does not support explicit placement", kind.backend_name()));
        } else if kind == StructureKind::Binary && direction.is_some() {
            outcome.warn("a direction needs `at <parent>`; placed in level order".to_string());
        } else if index.is_some() || direction.is_some() {
            outcome.warn(format!("{} decides node placement; position ignored", kind.backend_name()));
        }
        return Ok(json!(tree.insert(value)?));
    }

    if direction.is_some() {
        outcome.warn(format!("{} has no child direction; ignored", kind.backend_name()));
    }
    let size = structure.size();
    let at = index.map_or(Ok(size), |index| to_index(index, size))?;
    sequence(structure, command)?.insert(at, value)?;
    Ok(Json::Null)
}

/// Tree families always delete by value: `delete at N` removes the node whose
/// value is `N`. Sequence families delete by position, or search first when
/// given a value.
fn delete(structure: &mut dyn Structure,
          target: &DeleteTarget<Value>,
          command: &Command,
          outcome: &mut Outcome)
          -> StructureResult<Json> {
    if let Some(tree) = structure.as_tree() {
        let value = match target {
            DeleteTarget::Index(index) => Value::Integer(*index),
            DeleteTarget::Value(value) => value.clone(),
        };
        tree.delete(&value)?;
        return Ok(Json::from(&value));
    }

    let at = match target {
        DeleteTarget::Index(index) => to_index(*index, structure.size())?,
        DeleteTarget::Value(value) => match structure.search(value) {
            SearchHit::Index(at) => at,
            _ => {
                outcome.warn(format!("{value} not found; nothing deleted"));
                return Ok(Json::Null);
            },
        },
    };
    Ok(Json::from(&sequence(structure, command)?.delete(at)?))
}
