use std::collections::HashMap;

use crate::{
    ast::{OperationKind, RandomCall, ValueExpr},
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::rng::RandomStream,
};

/// An operation whose operands have been evaluated.
///
/// Commands are what the dispatcher runs and what op records keep, so
/// replaying a record repeats the drawn random values instead of drawing new
/// ones.
pub type Command = OperationKind<Value>;

/// Evaluates every operand of `kind`.
///
/// # Errors
/// Returns `RuntimeError::InvalidRandomRange` when a random call has
/// `min > max`.
pub fn evaluate(kind: &OperationKind,
                variables: &HashMap<String, Value>,
                rng: &mut RandomStream)
                -> EvalResult<Command> {
    kind.try_map(|expr| evaluate_value(expr, variables, rng))
}

/// Evaluates one operand.
///
/// Identifiers that name a variable evaluate to its value; any other
/// identifier stands for itself as text.
///
/// # Example
/// ```
/// use std::collections::HashMap;
///
/// use dsviz::{
///     ast::ValueExpr,
///     interpreter::{evaluator::command::evaluate_value, value::core::Value},
///     util::rng::RandomStream,
/// };
///
/// let mut rng = RandomStream::new(7);
/// let variables = HashMap::from([("n".to_string(), Value::from(3_i64))]);
///
/// let n = evaluate_value(&ValueExpr::Identifier("n".into()), &variables, &mut rng).unwrap();
/// assert_eq!(n, Value::from(3_i64));
/// let word = evaluate_value(&ValueExpr::Identifier("apple".into()), &variables, &mut rng).unwrap();
/// assert_eq!(word, Value::from("apple"));
/// ```
pub fn evaluate_value(expr: &ValueExpr,
                      variables: &HashMap<String, Value>,
                      rng: &mut RandomStream)
                      -> EvalResult<Value> {
    match expr {
        ValueExpr::Integer(n) => Ok(Value::Integer(*n)),
        ValueExpr::Float(x) => Ok(Value::from(*x)),
        ValueExpr::Text(s) => Ok(Value::Text(s.clone())),
        ValueExpr::Identifier(name) => {
            Ok(variables.get(name).cloned().unwrap_or_else(|| Value::Text(name.clone())))
        },
        ValueExpr::Random(call) => draw(call, rng),
        ValueExpr::Null => Ok(Value::Null),
    }
}

/// Draws a random call uniformly from `min..=max`.
pub fn draw(call: &RandomCall, rng: &mut RandomStream) -> EvalResult<Value> {
    rng.range_inclusive(call.min, call.max)
       .map(Value::Integer)
       .ok_or(RuntimeError::InvalidRandomRange { min:  call.min,
                                                 max:  call.max,
                                                 line: call.line, })
}

/// Parses an animation speed such as `2`, `0.5` or `"2x"`.
///
/// Returns `None` for anything that is not a finite positive number.
///
/// # Example
/// ```
/// use dsviz::interpreter::{evaluator::command::parse_speed, value::core::Value};
///
/// assert_eq!(parse_speed(&Value::from("2x")), Some(2.0));
/// assert_eq!(parse_speed(&Value::from(0.5)), Some(0.5));
/// assert_eq!(parse_speed(&Value::from(0_i64)), None);
/// assert_eq!(parse_speed(&Value::from("fast")), None);
/// ```
#[must_use]
pub fn parse_speed(value: &Value) -> Option<f64> {
    let speed = match value {
        Value::Text(text) => text.trim().trim_end_matches(['x', 'X']).trim().parse::<f64>().ok()?,
        other => other.as_real()?,
    };
    (speed.is_finite() && speed > 0.0).then_some(speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_draws_stay_in_range() {
        let mut rng = RandomStream::new(42);
        let call = RandomCall { min:    -3,
                                max:    3,
                                line:   1,
                                column: 1, };
        for _ in 0..500 {
            let Value::Integer(v) = draw(&call, &mut rng).unwrap() else {
                panic!("random draw is not an integer");
            };
            assert!((-3..=3).contains(&v));
        }
    }

    #[test]
    fn inverted_range_is_an_error() {
        let mut rng = RandomStream::new(1);
        let call = RandomCall { min:    5,
                                max:    1,
                                line:   4,
                                column: 9, };
        assert_eq!(draw(&call, &mut rng),
                   Err(RuntimeError::InvalidRandomRange { min: 5, max: 1, line: 4 }));
    }

    #[test]
    fn evaluate_draws_each_operand_once() {
        let mut rng = RandomStream::new(9);
        let call = RandomCall { min:    10,
                                max:    10,
                                line:   1,
                                column: 1, };
        let kind = OperationKind::Init { values:   vec![ValueExpr::Random(call), ValueExpr::Integer(1)],
                                         capacity: None, };
        let command = evaluate(&kind, &HashMap::new(), &mut rng).unwrap();
        assert_eq!(command,
                   OperationKind::Init { values:   vec![Value::from(10_i64), Value::from(1_i64)],
                                         capacity: None, });
    }
}
