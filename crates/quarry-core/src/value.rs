//! SQL values and parameter handling.
//!
//! Every caller value travels as a [`SqlValue`]. Only [`SqlValue::Raw`] is ever
//! written into statement text; everything else is bound as an argument.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::clause::CompiledClause;

/// Canonical textual form of timestamp arguments.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// A value that renders itself through [`fmt::Display`].
///
/// The normalizer turns it into [`SqlValue::Text`] before binding.
#[derive(Clone)]
pub struct Stringer(Arc<dyn fmt::Display + Send + Sync>);

impl Stringer {
    /// Wraps a displayable value.
    pub fn new<T: fmt::Display + Send + Sync + 'static>(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl fmt::Display for Stringer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Stringer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Stringer").field(&self.0.to_string()).finish()
    }
}

impl PartialEq for Stringer {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_string() == other.0.to_string()
    }
}

/// A SQL value that can be used as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value. Never expanded as a list.
    Blob(Vec<u8>),
    /// Timezone-qualified timestamp.
    Timestamp(DateTime<FixedOffset>),
    /// A list of values, expanded into `?,?,...` by the flattener.
    List(Vec<SqlValue>),
    /// A JSON document (map or object argument).
    Json(serde_json::Value),
    /// Caller-asserted safe SQL, written verbatim into the statement.
    Raw(String),
    /// A compiled nested query, inlined in parentheses.
    SubQuery(Box<CompiledClause>),
    /// A value converted with its `Display` implementation.
    Stringer(Stringer),
}

impl SqlValue {
    /// Creates a raw SQL fragment value.
    ///
    /// **Warning**: the text is concatenated into the statement unchanged.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Creates a sub-query value.
    #[must_use]
    pub fn sub_query(clause: CompiledClause) -> Self {
        Self::SubQuery(Box::new(clause))
    }

    /// Creates a value that is stringified before binding.
    pub fn stringer<T: fmt::Display + Send + Sync + 'static>(value: T) -> Self {
        Self::Stringer(Stringer::new(value))
    }

    /// Returns true for `NULL`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for list values (blobs are scalars).
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns true for values considered empty when `omit_empty` is set:
    /// null, zero numbers, `false`, empty text, lists, blobs and documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Int(n) => *n == 0,
            Self::Float(f) => *f == 0.0,
            Self::Text(s) | Self::Raw(s) => s.is_empty(),
            Self::Blob(b) => b.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Json(json) => match json {
                serde_json::Value::Null => true,
                serde_json::Value::Array(a) => a.is_empty(),
                serde_json::Value::Object(o) => o.is_empty(),
                serde_json::Value::String(s) => s.is_empty(),
                _ => false,
            },
            Self::Timestamp(_) | Self::SubQuery(_) | Self::Stringer(_) => false,
        }
    }

    /// Returns a short name of the value kind, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
            Self::Timestamp(_) => "timestamp",
            Self::List(_) => "list",
            Self::Json(_) => "json",
            Self::Raw(_) => "raw",
            Self::SubQuery(_) => "sub-query",
            Self::Stringer(_) => "stringer",
        }
    }

    /// Converts the value into a JSON document.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(n) => Value::from(*n),
            Self::Float(f) => Value::from(*f),
            Self::Text(s) | Self::Raw(s) => Value::String(s.clone()),
            Self::Blob(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
            Self::Timestamp(t) => Value::String(t.format(TIMESTAMP_FORMAT).to_string()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Json(json) => json.clone(),
            Self::SubQuery(clause) => Value::String(clause.text.clone()),
            Self::Stringer(s) => Value::String(s.to_string()),
        }
    }

    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: this is for logs and dry runs only. Statements sent to a
    /// driver must bind values as arguments.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("null"),
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => quote_literal(s),
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Self::Timestamp(t) => quote_literal(&t.format(TIMESTAMP_FORMAT).to_string()),
            Self::List(_) => quote_literal(&self.to_json().to_string()),
            Self::Json(serde_json::Value::String(s)) => quote_literal(s),
            Self::Json(json) => quote_literal(&json.to_string()),
            Self::Raw(s) => s.clone(),
            Self::SubQuery(clause) => {
                format!("({})", crate::debug::render_for_debug(&clause.text, &clause.args))
            }
            Self::Stringer(s) => quote_literal(&s.to_string()),
        }
    }
}

/// Quotes `s` as a string literal, doubling embedded single quotes.
fn quote_literal(s: &str) -> String {
    let escaped = s.replace('\'', "''");
    format!("'{escaped}'")
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

macro_rules! impl_to_sql_value_int {
    ($($ty:ty),*) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::Int(i64::from(self))
                }
            }
        )*
    };
}

impl_to_sql_value_int!(i64, i32, i16, i8, u32, u16, u8);

impl ToSqlValue for u64 {
    fn to_sql_value(self) -> SqlValue {
        i64::try_from(self).map_or_else(|_| SqlValue::Text(self.to_string()), SqlValue::Int)
    }
}

impl ToSqlValue for usize {
    fn to_sql_value(self) -> SqlValue {
        i64::try_from(self).map_or_else(|_| SqlValue::Text(self.to_string()), SqlValue::Int)
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for &String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

impl<T: ToSqlValue> ToSqlValue for Vec<T> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::List(self.into_iter().map(ToSqlValue::to_sql_value).collect())
    }
}

impl<T: ToSqlValue, const N: usize> ToSqlValue for [T; N] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::List(self.into_iter().map(ToSqlValue::to_sql_value).collect())
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl<Tz: TimeZone> ToSqlValue for DateTime<Tz> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self.fixed_offset())
    }
}

impl ToSqlValue for NaiveDateTime {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self.and_utc().fixed_offset())
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.format("%Y-%m-%d").to_string())
    }
}

impl ToSqlValue for CompiledClause {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::sub_query(self)
    }
}

impl ToSqlValue for serde_json::Value {
    fn to_sql_value(self) -> SqlValue {
        use serde_json::Value;
        match self {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => SqlValue::Int(i),
                (None, Some(f)) if n.is_f64() => SqlValue::Float(f),
                _ => SqlValue::Text(n.to_string()),
            },
            Value::String(s) => SqlValue::Text(s),
            Value::Array(items) => {
                SqlValue::List(items.into_iter().map(ToSqlValue::to_sql_value).collect())
            }
            object @ Value::Object(_) => SqlValue::Json(object),
        }
    }
}
