use std::{sync::Arc, thread};

use dsviz::{
    ast::StructureKind,
    execute_source,
    interpreter::{
        evaluator::{
            core::{ExecutionResult, Interpreter},
            dispatch::Route,
        },
        value::core::Value,
    },
    parse_program,
    session::Sessions,
    structures::{
        core::{Snapshot, Structure},
        factory::{DefaultFactory, StructureFactory},
        registry::StructureRegistry,
        step::StepKind,
    },
};
use serde_json::json;

fn exec(interpreter: &mut Interpreter, src: &str) -> ExecutionResult {
    execute_source(interpreter, src).unwrap_or_else(|e| panic!("Script failed to parse: {e}"))
}

fn list(result: &ExecutionResult, name: &str) -> Vec<Value> {
    result.results[name].data
                        .as_ref()
                        .and_then(Snapshot::as_list)
                        .unwrap_or_else(|| panic!("{name} has no list data"))
                        .to_vec()
}

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

fn logged(result: &ExecutionResult, needle: &str) -> bool {
    result.execution_log.iter().any(|line| line.contains(needle))
}

#[test]
fn names_persist_across_calls() {
    let mut interpreter = Interpreter::new();
    exec(&mut interpreter, "Linked L { insert_tail 1 }");
    let result = exec(&mut interpreter, "Linked L { insert_tail 2 }");

    assert_eq!(list(&result, "L"), ints(&[1, 2]));
    assert!(logged(&result, "Reusing Linked L"));
}

#[test]
fn each_call_returns_only_its_own_records() {
    let mut interpreter = Interpreter::new();
    let first = exec(&mut interpreter, "Stack s { push 1 push 2 }");
    let second = exec(&mut interpreter, "Stack s { pop }");

    assert_eq!(first.operation_history.len(), 2);
    assert_eq!(second.operation_history.len(), 1);
    assert_eq!(second.operation_history[0].result(), &json!(2));
    assert_eq!(interpreter.operation_history().len(), 3);
    assert!(second.execution_log.len() < interpreter.execution_log().len());
    assert_eq!(second.execution_log[0], "Executing Stack s");
}

#[test]
fn redeclaring_with_another_kind_rebuilds() {
    let mut interpreter = Interpreter::new();
    exec(&mut interpreter, "Stack x { push 1 }");
    let result = exec(&mut interpreter, "Queue x { enqueue 2 }");

    assert!(result.success);
    assert_eq!(result.results["x"].kind, StructureKind::Queue);
    assert_eq!(list(&result, "x"), ints(&[2]));
    assert!(logged(&result, "already exists with different type: Stack vs Queue"));
}

#[test]
fn variables_resolve_in_operands() {
    let mut interpreter = Interpreter::new();
    interpreter.set_variable("answer", 42_i64);
    let result = exec(&mut interpreter, "Stack s { push answer push other }");

    assert_eq!(list(&result, "s"), vec![Value::from(42_i64), Value::from("other")]);
}

#[test]
fn random_draws_are_in_range() {
    let mut interpreter = Interpreter::new().with_seed(99);
    let program = parse_program("Sequential l { insert random(-3, 3) insert random(4) }").unwrap();

    for _ in 0..200 {
        let result = interpreter.execute(&program);
        let values = &result.operation_history;
        let first = values[0].details["value"].as_i64().unwrap();
        let second = values[1].details["value"].as_i64().unwrap();
        assert!((-3..=3).contains(&first), "{first} out of range");
        assert!((0..=4).contains(&second), "{second} out of range");
    }
}

#[test]
fn seeded_interpreters_draw_the_same_values() {
    let src = "Sequential l { init [random(1, 1000), random(1, 1000), random(1, 1000)] }";
    let a = exec(&mut Interpreter::new().with_seed(5), src);
    let b = exec(&mut Interpreter::new().with_seed(5), src);
    assert_eq!(list(&a, "l"), list(&b, "l"));
}

#[test]
fn replay_reuses_drawn_values() {
    let mut interpreter = Interpreter::new().with_seed(3);
    let result = exec(&mut interpreter, "Sequential l { insert random(1, 1000000) }");
    let drawn = result.operation_history[0].details["value"].clone();

    let replayed = interpreter.replay(&result.operation_history).unwrap();
    assert_eq!(replayed.len(), 1);
    assert_eq!(replayed[0].details["value"], drawn);

    let data = interpreter.snapshot("l").unwrap();
    let values = data.as_list().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0], values[1]);
}

#[test]
fn invalid_random_range_is_recorded_and_skipped_on_replay() {
    let mut interpreter = Interpreter::new();
    let result = exec(&mut interpreter, "Stack s { push random(5, 1) push 2 }");

    assert!(result.success);
    let failed = &result.operation_history[0];
    assert!(failed.error().unwrap().contains("Invalid random range: 5 > 1"));
    assert!(failed.command.is_none());
    assert_eq!(list(&result, "s"), ints(&[2]));

    let replayed = interpreter.replay(&result.operation_history).unwrap();
    assert_eq!(replayed.len(), 1);
    assert_eq!(interpreter.snapshot("s").unwrap().as_list().unwrap().len(), 2);
}

#[test]
fn replay_of_an_unbound_name_fails() {
    let mut source = Interpreter::new();
    let result = exec(&mut source, "Stack s { push 1 }");

    let mut other = Interpreter::new();
    let err = other.replay(&result.operation_history).unwrap_err();
    assert_eq!(err.to_string(), "[Interpreter Error] Structure s not found");
}

#[test]
fn primary_route() {
    let result = exec(&mut Interpreter::new(), "Sequential l { init [1, 2] }");
    assert_eq!(result.operation_history[0].route, Route::Primary);
}

#[test]
fn stack_and_queue_init_load_in_one_step() {
    let result = exec(&mut Interpreter::new(), "Stack s { push 9 init [1, 2, 3] }\nQueue q { init [4, 5] }");
    assert_eq!(result.operation_history[1].route, Route::Primary);
    assert_eq!(result.operation_history[2].route, Route::Primary);
    assert_eq!(list(&result, "s"), ints(&[1, 2, 3]));
    assert_eq!(list(&result, "q"), ints(&[4, 5]));
}

#[test]
fn oversized_init_loads_nothing() {
    let result = exec(&mut Interpreter::new(),
                      "Stack s { init [1, 2, 3] capacity 2 push 7 }\nQueue q { init [1, 2, 3] capacity 2 }");
    assert!(result.success);

    let init = &result.operation_history[0];
    assert_eq!(init.route, Route::Primary);
    assert!(init.error().is_some_and(|e| e.contains("capacity of 2 exceeded")));
    assert_eq!(list(&result, "s"), ints(&[7]));

    assert!(result.operation_history[2].error().is_some_and(|e| e.contains("capacity of 2 exceeded")));
    assert!(list(&result, "q").is_empty());
}

#[test]
fn huge_capacity_is_nominal() {
    let src = "Sequential l { init [1] capacity 9223372036854775807 insert 2 at 1 }
               Queue q { init [1] capacity 9223372036854775807 enqueue 2 dequeue }
               Stack s { init [1] capacity 9223372036854775807 push 2 }";
    let result = exec(&mut Interpreter::new(), src);
    assert!(result.success);
    assert!(result.operation_history.iter().all(|record| record.error().is_none()));
    assert_eq!(list(&result, "l"), ints(&[1, 2]));
    assert_eq!(list(&result, "q"), ints(&[2]));
    assert_eq!(list(&result, "s"), ints(&[1, 2]));
}

#[test]
fn step_log_holds_only_the_latest_operation() {
    let mut interpreter = Interpreter::new();
    exec(&mut interpreter, "Sequential l { init [1, 2, 3] search 3 }");
    let kinds = interpreter.with_structure("l", |s| {
                               s.operation_history().iter().map(|step| step.operation_kind).collect::<Vec<_>>()
                           })
                           .unwrap();
    assert_eq!(kinds, [StepKind::Compare, StepKind::Compare, StepKind::Compare, StepKind::Search]);
}

#[test]
fn list_push_and_pop_fall_back_to_positions() {
    let result = exec(&mut Interpreter::new(), "Sequential l { push 5 push 6 pop }");
    let routes: Vec<_> = result.operation_history.iter().map(|r| r.route).collect();
    assert_eq!(routes, [Route::Fallback, Route::Fallback, Route::Fallback]);
    assert_eq!(result.operation_history[2].result(), &json!(6));
    assert_eq!(list(&result, "l"), ints(&[5]));
}

#[test]
fn huffman_traverse_falls_back() {
    let result = exec(&mut Interpreter::new(), "Huffman h { build_text \"AAB\" traverse inorder }");
    let traverse = &result.operation_history[1];
    assert_eq!(traverse.route, Route::Fallback);
    assert_eq!(traverse.result().as_array().map(Vec::len), Some(3));
}

#[test]
fn unsupported_operation_is_a_no_op() {
    let result = exec(&mut Interpreter::new(), "Linked l { insert_tail 1 height insert_tail 2 }");
    assert!(result.success);

    let height = &result.operation_history[1];
    assert_eq!(height.route, Route::Unsupported);
    assert_eq!(height.result(), &json!(null));
    assert!(height.error().is_none());
    assert_eq!(height.details["warnings"], json!(["height is not supported by linked"]));
    assert_eq!(list(&result, "l"), ints(&[1, 2]));
}

#[test]
fn routes_serialize_in_lowercase() {
    let result = exec(&mut Interpreter::new(), "Stack s { insert 1 at 0 size }");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["operation_history"][0]["route"], json!("primary"));
    assert_eq!(json["results"]["s"]["type"], json!("stack"));
    assert_eq!(json["results"]["s"]["data"], json!([1]));

    let result = exec(&mut Interpreter::new(), "Sequential l { push 1 }");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["operation_history"][0]["route"], json!("fallback"));
}

// Trees read `delete at N` as "delete the value N" while lists read it as a
// position. Programs depend on both readings, so they are kept as they are.
#[test]
fn delete_at_means_value_for_trees_and_index_for_lists() {
    let tree = exec(&mut Interpreter::new(), "BST t { build [5, 2, 8] delete at 2 traverse inorder }");
    assert_eq!(tree.operation_history[1].result(), &json!(2));
    assert_eq!(tree.operation_history[2].result(), &json!([5, 8]));

    let missing = exec(&mut Interpreter::new(), "BST t { build [5, 2, 8] delete at 1 }");
    assert_eq!(missing.operation_history[1].error(), Some("value 1 not found"));

    let list_result = exec(&mut Interpreter::new(), "Sequential l { init [5, 2, 8] delete at 2 }");
    assert_eq!(list_result.operation_history[1].result(), &json!(8));
    assert_eq!(list(&list_result, "l"), ints(&[5, 2]));
}

#[test]
fn delete_by_value_on_lists() {
    let result = exec(&mut Interpreter::new(), "Linked l { init [4, 7, 9] delete 7 delete 100 }");
    assert_eq!(result.operation_history[1].result(), &json!(7));
    assert_eq!(result.operation_history[2].result(), &json!(null));
    assert!(result.operation_history[2].details.get("warnings").is_some());
    assert_eq!(list(&result, "l"), ints(&[4, 9]));
}

#[test]
fn binary_tree_explicit_placement() {
    let result = exec(&mut Interpreter::new(),
                      "Binary b { insert 1 insert 2 at 0 right insert 3 at 0 right insert 4 traverse levelorder }");
    assert_eq!(result.operation_history[1].result(), &json!(1));
    assert_eq!(result.operation_history[2].error(),
               Some("right child of node 0 is already occupied"));
    assert_eq!(result.operation_history[4].result(), &json!([1, 4, 2]));
}

#[test]
fn binary_direction_without_parent_asks_for_one() {
    let result = exec(&mut Interpreter::new(), "Binary b { insert 1 insert 2 left }\nBST t { insert 1 left }");
    let binary = &result.operation_history[1];
    assert_eq!(binary.details["warnings"],
               json!(["a direction needs `at <parent>`; placed in level order"]));
    assert!(binary.error().is_none());
    assert_eq!(result.operation_history[2].details["warnings"],
               json!(["bst decides node placement; position ignored"]));
}

#[test]
fn speed_and_pause() {
    let mut interpreter = Interpreter::new();
    let result = exec(&mut interpreter, "Stack s { speed \"2x\" push 1 speed 0 pause 3 pause }");

    assert!(result.success);
    assert_eq!(result.operation_history[0].result(), &json!(2.0));
    assert!(result.operation_history[2].details["warnings"][0].as_str()
                                                               .unwrap()
                                                               .starts_with("invalid speed 0"));
    assert_eq!(result.operation_history[3].result(), &json!(3.0));
    assert_eq!(interpreter.context().animation_speed, 2.0);
    assert!(interpreter.context().step_mode);
    assert!(logged(&result, "Animation speed set to 2x"));
    assert!(logged(&result, "Step mode enabled"));
    assert_eq!(list(&result, "s"), ints(&[1]));
}

struct ListsOnly;

impl StructureFactory for ListsOnly {
    fn create(&self, kind: StructureKind) -> Option<Box<dyn Structure>> {
        if kind.is_tree() {
            return None;
        }
        DefaultFactory::default().create(kind)
    }
}

#[test]
fn unknown_structure_type_fails_the_declaration() {
    let mut interpreter = Interpreter::new().with_factory(ListsOnly);
    let result = exec(&mut interpreter, "BST t { insert 1 } Stack s { push 1 }");

    assert!(!result.success);
    let failed = &result.results["t"];
    assert_eq!(failed.error.as_deref(), Some("[Interpreter Error] Unknown structure type: BST"));
    assert_eq!(failed.operations_count, 0);
    assert!(failed.data.is_none());
    assert!(result.results["s"].error.is_none());
    assert_eq!(list(&result, "s"), ints(&[1]));
}

#[test]
fn published_structures_are_shared_between_sessions() {
    let mut sessions = Sessions::new();
    exec(sessions.open("alice"), "Stack shared { push 1 }");
    let id = sessions.open("alice").publish("shared").unwrap();
    assert_eq!(sessions.registry().lookup("shared"), Some(id));

    let result = exec(sessions.open("bob"), "Stack shared { push 2 }");
    assert!(logged(&result, "Bound shared to shared instance"));
    assert_eq!(list(&result, "shared"), ints(&[1, 2]));

    let seen_by_alice = sessions.open("alice").snapshot("shared").unwrap();
    assert_eq!(seen_by_alice.as_list().unwrap(), ints(&[1, 2]).as_slice());
}

#[test]
fn shared_instance_keeps_its_kind() {
    let mut sessions = Sessions::new();
    exec(sessions.open("a"), "Stack shared { push 1 }");
    sessions.open("a").publish("shared").unwrap();

    let result = exec(sessions.open("b"), "Queue shared { size }");
    assert!(result.success);
    assert_eq!(result.results["shared"].kind, StructureKind::Stack);
    assert_eq!(result.operation_history[0].result(), &json!(1));
    assert!(logged(&result, "declared type Queue ignored"));
}

#[test]
fn destroying_a_session_keeps_published_instances() {
    let mut sessions = Sessions::new();
    exec(sessions.open("a"), "Queue q { enqueue 1 } Stack local { push 1 }");
    sessions.open("a").publish("q").unwrap();

    assert!(sessions.destroy("a"));
    assert!(!sessions.destroy("a"));
    assert!(sessions.get("a").is_none());
    assert_eq!(sessions.registry().len(), 1);

    let result = exec(sessions.open("b"), "Queue q { front } Stack local { size }");
    assert_eq!(result.operation_history[0].result(), &json!(1));
    assert_eq!(result.operation_history[1].result(), &json!(0));
}

#[test]
fn removed_shared_instance_is_recreated() {
    let registry = Arc::new(StructureRegistry::new());
    let mut interpreter = Interpreter::new().with_registry(Arc::clone(&registry));
    exec(&mut interpreter, "Stack s { push 1 }");
    let id = interpreter.publish("s").unwrap();

    assert!(registry.remove(id).is_some());
    let result = exec(&mut interpreter, "Stack s { push 2 }");
    assert!(logged(&result, "Shared instance of s is gone; recreating"));
    assert_eq!(list(&result, "s"), ints(&[2]));
}

#[test]
fn borrowed_shared_instance_is_busy() {
    let registry = Arc::new(StructureRegistry::new());
    let mut interpreter = Interpreter::new().with_registry(Arc::clone(&registry));
    exec(&mut interpreter, "Stack s { push 1 }");
    let id = interpreter.publish("s").unwrap();

    let shared = registry.resolve(id).unwrap();
    let guard = shared.lock().unwrap();
    let result = exec(&mut interpreter, "Stack s { push 2 }");
    assert!(!result.success);
    assert_eq!(result.results["s"].error.as_deref(),
               Some("[Interpreter Error] Structure s is in use"));
    drop(guard);

    let result = exec(&mut interpreter, "Stack s { push 2 }");
    assert!(result.success);
    assert_eq!(list(&result, "s"), ints(&[1, 2]));
}

#[test]
fn sessions_run_on_their_own_threads() {
    let registry = Arc::new(StructureRegistry::new());
    let mut owner = Interpreter::new().with_registry(Arc::clone(&registry));
    exec(&mut owner, "Queue shared { enqueue 1 }");
    owner.publish("shared").unwrap();

    let workers: Vec<_> = (0..4_i64).map(|n| {
                                        let registry = Arc::clone(&registry);
                                        thread::spawn(move || {
                                            let mut own = Interpreter::new().with_registry(registry);
                                            let src = format!("Stack local {{ push {n} push {n} }}");
                                            let result = exec(&mut own, &src);
                                            list(&result, "local")
                                        })
                                    })
                                    .collect();
    for (n, worker) in (0..4_i64).zip(workers) {
        assert_eq!(worker.join().unwrap(), ints(&[n, n]));
    }

    let mut moved = thread::spawn(move || {
                        exec(&mut owner, "Queue shared { enqueue 2 }");
                        owner
                    }).join()
                      .unwrap();
    let result = exec(&mut moved, "Queue shared { size }");
    assert_eq!(result.operation_history[0].result(), &json!(2));
}

#[test]
fn teardown_forgets_bindings() {
    let mut interpreter = Interpreter::new();
    exec(&mut interpreter, "Stack s { push 1 }");
    interpreter.teardown();
    assert!(interpreter.snapshot("s").is_err());

    let result = exec(&mut interpreter, "Stack s { size }");
    assert_eq!(result.operation_history[0].result(), &json!(0));
}
