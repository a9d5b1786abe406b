use std::fs::{self};

use dsviz::{
    execute_source,
    interpreter::{
        evaluator::core::{ExecutionResult, Interpreter},
        value::core::Value,
    },
    parse_program,
    structures::core::Snapshot,
};
use serde_json::json;
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_dsl_blocks(&content).into_iter().enumerate() {
            count += 1;
            let mut interpreter = Interpreter::new().with_seed(7);
            match execute_source(&mut interpreter, &code) {
                Ok(result) if result.success => {},
                Ok(result) => panic!("DSL example {} in {:?} failed:\n{}\nLog: {:#?}",
                                     i + 1,
                                     path,
                                     code,
                                     result.execution_log),
                Err(e) => panic!("DSL example {} in {:?} failed:\n{}\nError: {}", i + 1, path, code, e),
            }
        }
    }

    assert!(count > 0, "No DSL examples found in book/src");
}

fn extract_dsl_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```dsl") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn run(src: &str) -> ExecutionResult {
    let mut interpreter = Interpreter::new().with_seed(1);
    execute_source(&mut interpreter, src).unwrap_or_else(|e| panic!("Script failed to parse: {e}"))
}

fn assert_success(src: &str) -> ExecutionResult {
    let result = run(src);
    assert!(result.success, "Script failed: {:#?}", result.execution_log);
    result
}

fn assert_failure(src: &str) {
    if parse_program(src).is_ok() {
        panic!("Script parsed but was expected to fail")
    }
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

#[test]
fn sequential_insert_at_index() {
    let result = assert_success("Sequential myList { init [1,2,3] insert 10 at 2 }");
    assert_eq!(list(&result, "myList"), ints(&[1, 2, 10, 3]));
    assert_eq!(list(&result, "myList").len(), 4);
}

#[test]
fn stack_pop_reports_value() {
    let result = assert_success("Stack s { push 1 push 2 pop }");
    assert_eq!(list(&result, "s"), ints(&[1]));
    let pop = &result.operation_history[2];
    assert_eq!(pop.operation_kind, "pop");
    assert_eq!(pop.result(), &json!(2));
}

#[test]
fn bst_inorder_traversal() {
    let result = assert_success("BST t { insert 50 insert 30 insert 70 traverse inorder }");
    assert_eq!(result.operation_history[3].result(), &json!([30, 50, 70]));
}

#[test]
fn unterminated_string_fails_before_execution() {
    assert_failure("Huffman h { build_text \"ABRA }");
}

#[test]
fn grammar_errors_fail() {
    assert_failure("Stack s { push }");
    assert_failure("Stack s { push 1");
    assert_failure("s { push 1 }");
    assert_failure("BST t { traverse sideways }");
    assert_failure("Linked l { get \"first\" }");
    assert_failure("Sequential l { init [1, 2 }");
    assert_failure("Stack s { push 1 # }");
}

#[test]
fn list_operations() {
    let result = assert_success(
                                "Linked l {
            insert_tail 2
            insert_head 1
            insert_tail 3
            reverse
            delete_head
            get 0
        }",
    );
    assert_eq!(list(&result, "l"), ints(&[2, 1]));
    assert_eq!(result.operation_history[4].result(), &json!(3));
    assert_eq!(result.operation_history[5].result(), &json!(2));
}

#[test]
fn queue_operations() {
    let result = assert_success("Queue q { enqueue 1 enqueue 2 enqueue 3 dequeue front rear size }");
    assert_eq!(list(&result, "q"), ints(&[2, 3]));
    let results: Vec<_> = result.operation_history[3..].iter().map(|r| r.result().clone()).collect();
    assert_eq!(results, [json!(1), json!(2), json!(3), json!(2)]);
}

#[test]
fn comments_and_newlines_are_ignored() {
    let result = assert_success(
                                "// a stack
        Stack s {
            push 1 /* inline */ push 2
            /* spanning
               lines */
            push 3
        }",
    );
    assert_eq!(list(&result, "s"), ints(&[1, 2, 3]));
}

#[test]
fn keywords_are_case_insensitive() {
    let result = assert_success("STACK s { PUSH 1 Push 2 pop }");
    assert_eq!(list(&result, "s"), ints(&[1]));
}

#[test]
fn unnamed_declaration_is_called_default() {
    let result = assert_success("Queue { enqueue 4 }");
    assert_eq!(list(&result, "default"), ints(&[4]));
}

#[test]
fn multiple_declarations() {
    let result = assert_success("Stack a { push 1 } Queue b { enqueue 2 enqueue 3 }");
    assert_eq!(result.results.len(), 2);
    assert_eq!(result.results["a"].operations_count, 1);
    assert_eq!(result.results["b"].operations_count, 2);
}

#[test]
fn values_of_every_type() {
    let result = assert_success("Sequential l { init [1, 2.5, \"three\", null, word] }");
    assert_eq!(list(&result, "l"),
               vec![Value::from(1_i64),
                    Value::from(2.5_f64),
                    Value::from("three"),
                    Value::Null,
                    Value::from("word")]);
}

#[test]
fn random_values_stay_in_range() {
    let result = assert_success("Sequential l { init [random(1, 6), random(3), random(5, 5)] }");
    let values = list(&result, "l");
    let drawn: Vec<i64> = values.iter().filter_map(Value::as_integer).collect();
    assert_eq!(drawn.len(), 3);
    assert!((1..=6).contains(&drawn[0]));
    assert!((0..=3).contains(&drawn[1]));
    assert_eq!(drawn[2], 5);
}

#[test]
fn huffman_round_trip() {
    let result = assert_success("Huffman h { build_text \"ABRACADABRA\" encode \"ABRA\" decode \"01101110\" }");
    let encoded = result.operation_history[1].result();
    assert_eq!(encoded["bits"], json!("01101110"));
    assert_eq!(result.operation_history[2].result(), &json!("ABRA"));
}

#[test]
fn tree_queries() {
    let result = assert_success("AVL t { build [10, 20, 30, 40, 50] height min max search 40 }");
    let results: Vec<_> = result.operation_history[1..4].iter().map(|r| r.result().clone()).collect();
    assert_eq!(results, [json!(3), json!(10), json!(50)]);
    assert_eq!(result.operation_history[4].result()["value"], json!(40));
}

#[test]
fn operation_errors_do_not_fail_the_program() {
    let result = assert_success("Stack s { pop push 1 }");
    assert!(result.operation_history[0].error().is_some());
    assert_eq!(list(&result, "s"), ints(&[1]));
    assert_eq!(result.results["s"].operations_count, 2);
}
