//! Condition inputs accepted by the compiler.
//!
//! A [`Condition`] is a closed union over every shape a caller may pass to a
//! `WHERE` or `HAVING` clause. Conversions from strings, maps, lists, structs
//! and compiled sub-queries build it eagerly, so the compiler only ever
//! dispatches over this enum.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::clause::CompiledClause;
use crate::error::{Error, Result};
use crate::value::{SqlValue, ToSqlValue};

/// How two conditions are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joiner {
    And,
    Or,
}

impl Joiner {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Ordered key/value pairs, from a map or a struct.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields {
    /// Pairs in insertion or declaration order.
    pub pairs: IndexMap<String, SqlValue>,
    /// Set for parameter objects; forces nil pairs to be omitted.
    pub params: bool,
}

/// A condition of any supported shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A single value.
    Scalar(SqlValue),
    /// Alternating keys and values (even length) or a run of fragments and
    /// their arguments (odd length).
    List(Vec<SqlValue>),
    /// One key with one value.
    KeyValue(String, SqlValue),
    /// Several key/value pairs, AND-joined.
    Map(Fields),
    /// A hand-written fragment and its arguments.
    Raw(String, Vec<SqlValue>),
    /// A compiled nested query.
    SubQuery(CompiledClause),
    /// Two conditions joined by AND or OR.
    Composite(Box<Condition>, Joiner, Box<Condition>),
}

/// Types that project themselves into ordered condition fields.
///
/// Usually implemented with `#[derive(Where)]`.
pub trait WhereFields {
    /// Whether the type is a parameter object (nil fields are omitted).
    const PARAMS: bool = false;

    /// Returns the fields in declaration order.
    fn where_fields(&self) -> Vec<(String, SqlValue)>;
}

impl Condition {
    /// Creates a key/value condition.
    pub fn key_value(key: impl Into<String>, value: impl ToSqlValue) -> Self {
        Self::KeyValue(key.into(), value.to_sql_value())
    }

    /// Creates a fragment condition with its arguments.
    pub fn raw(text: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self::Raw(text.into(), args)
    }

    /// Projects a struct into an ordered map condition.
    pub fn fields<T: WhereFields + ?Sized>(value: &T) -> Self {
        Self::Map(Fields {
            pairs: value.where_fields().into_iter().collect(),
            params: T::PARAMS,
        })
    }

    /// Turns a bare value into `{key: value}`.
    ///
    /// Maps, composites, sub-queries and fragments that carry arguments are
    /// returned unchanged.
    #[must_use]
    pub fn primary(key: &str, condition: Self) -> Self {
        match condition {
            Self::Scalar(value) => Self::KeyValue(key.to_string(), value),
            Self::Raw(text, args) if args.is_empty() => {
                Self::KeyValue(key.to_string(), SqlValue::Text(text))
            }
            Self::List(values) => Self::KeyValue(key.to_string(), SqlValue::List(values)),
            other => other,
        }
    }

    /// Joins `self` and `other` with AND.
    #[must_use]
    pub fn and(self, other: impl Into<Self>) -> Self {
        Self::Composite(Box::new(self), Joiner::And, Box::new(other.into()))
    }

    /// Joins `self` and `other` with OR.
    #[must_use]
    pub fn or(self, other: impl Into<Self>) -> Self {
        Self::Composite(Box::new(self), Joiner::Or, Box::new(other.into()))
    }

    /// Attaches extra arguments to the condition.
    ///
    /// Only fragments accept extra arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedShape`] when arguments are given to any
    /// other shape.
    pub fn bind(self, args: Vec<SqlValue>) -> Result<Self> {
        if args.is_empty() {
            return Ok(self);
        }
        match self {
            Self::Raw(text, mut bound) => {
                bound.extend(args);
                Ok(Self::Raw(text, bound))
            }
            Self::Scalar(SqlValue::Text(text) | SqlValue::Raw(text)) => Ok(Self::Raw(text, args)),
            other => Err(Error::unsupported(format!(
                "{} condition does not take extra arguments",
                other.shape()
            ))),
        }
    }

    /// Returns a short name of the condition shape.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::List(_) => "list",
            Self::KeyValue(..) => "key/value",
            Self::Map(_) => "map",
            Self::Raw(..) => "fragment",
            Self::SubQuery(_) => "sub-query",
            Self::Composite(..) => "composite",
        }
    }
}

impl From<&str> for Condition {
    fn from(text: &str) -> Self {
        Self::Raw(text.to_string(), Vec::new())
    }
}

impl From<String> for Condition {
    fn from(text: String) -> Self {
        Self::Raw(text, Vec::new())
    }
}

impl From<&String> for Condition {
    fn from(text: &String) -> Self {
        Self::Raw(text.clone(), Vec::new())
    }
}

impl From<SqlValue> for Condition {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Text(text) | SqlValue::Raw(text) => Self::Raw(text, Vec::new()),
            SqlValue::List(values) => Self::List(values),
            SqlValue::SubQuery(clause) => Self::SubQuery(*clause),
            SqlValue::Json(serde_json::Value::Object(object)) => Self::Map(Fields {
                pairs: object
                    .into_iter()
                    .map(|(k, v)| (k, v.to_sql_value()))
                    .collect(),
                params: false,
            }),
            other => Self::Scalar(other),
        }
    }
}

impl From<serde_json::Value> for Condition {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(_) => Self::from(SqlValue::Json(value)),
            other => Self::from(other.to_sql_value()),
        }
    }
}

impl From<CompiledClause> for Condition {
    fn from(clause: CompiledClause) -> Self {
        Self::SubQuery(clause)
    }
}

impl<T: ToSqlValue> From<Vec<T>> for Condition {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(ToSqlValue::to_sql_value).collect())
    }
}

impl<K: Into<String>, V: ToSqlValue> From<IndexMap<K, V>> for Condition {
    fn from(map: IndexMap<K, V>) -> Self {
        Self::Map(Fields {
            pairs: map
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_sql_value()))
                .collect(),
            params: false,
        })
    }
}

impl<K: Into<String>, V: ToSqlValue> From<BTreeMap<K, V>> for Condition {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Map(Fields {
            pairs: map
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_sql_value()))
                .collect(),
            params: false,
        })
    }
}

/// Hash maps have no order, so their pairs are sorted by key.
impl<K: Into<String>, V: ToSqlValue, S> From<HashMap<K, V, S>> for Condition {
    fn from(map: HashMap<K, V, S>) -> Self {
        let mut pairs: Vec<(String, SqlValue)> = map
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_sql_value()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Self::Map(Fields {
            pairs: pairs.into_iter().collect(),
            params: false,
        })
    }
}
