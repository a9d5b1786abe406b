use std::{cmp::Ordering, fmt};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::util::num::{f64_to_i64_checked, i64_to_f64_checked, i64_to_usize_checked};

/// Represents a runtime value stored in or produced by a structure.
///
/// Values are what DSL literals, drawn random numbers and resolved variables
/// evaluate to. They serialize as plain JSON scalars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A 64 bit integer.
    Integer(i64),
    /// A double precision number with a total order.
    Real(OrderedFloat<f64>),
    /// A string, or an identifier that did not name a variable.
    Text(String),
    /// The absent value, written `null` or `none` in source.
    Null,
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(OrderedFloat(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl Value {
    /// Returns `true` for `Value::Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for integers and reals.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Real(_))
    }

    /// Short lower-case type name used in log messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Null => "null",
        }
    }

    /// Interprets the value as an integer.
    ///
    /// Integral reals such as `4.0` are accepted.
    ///
    /// # Example
    /// ```
    /// use dsviz::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::from(4.0).as_integer(), Some(4));
    /// assert_eq!(Value::from(4.5).as_integer(), None);
    /// assert_eq!(Value::from("4").as_integer(), None);
    /// ```
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Real(r) => f64_to_i64_checked(r.0, ()).ok(),
            _ => None,
        }
    }

    /// Interprets the value as a non-negative container index.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        self.as_integer().and_then(|n| i64_to_usize_checked(n, ()).ok())
    }

    /// Interprets the value as a numeric weight.
    #[must_use]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => i64_to_f64_checked(*n, ()).ok(),
            Self::Real(r) => Some(r.0),
            _ => None,
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Integer(_) | Self::Real(_) => 1,
            Self::Text(_) => 2,
        }
    }
}

/// Compares an integer with a float without rounding the integer.
///
/// NaN sorts above every number, as it does for `OrderedFloat`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn cmp_integer_real(a: i64, b: OrderedFloat<f64>) -> Ordering {
    // 2^63, exactly representable.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if b.is_nan() {
        return Ordering::Less;
    }
    let whole = b.trunc();
    if whole >= LIMIT {
        return Ordering::Less;
    }
    if whole < -LIMIT {
        return Ordering::Greater;
    }
    match a.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(b.0 - whole)).unwrap_or(Ordering::Equal),
        unequal => unequal,
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Real(a), Self::Real(b)) => a.cmp(b),
            (Self::Integer(a), Self::Real(b)) => cmp_integer_real(*a, *b),
            (Self::Real(a), Self::Integer(b)) => cmp_integer_real(*b, *a).reverse(),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{}", r.0),
            Self::Text(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Integer(n) => Self::from(*n),
            Value::Real(r) => serde_json::Number::from_f64(r.0).map_or(Self::Null, Self::Number),
            Value::Text(s) => Self::String(s.clone()),
            Value::Null => Self::Null,
        }
    }
}
