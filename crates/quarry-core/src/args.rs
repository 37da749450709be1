//! Conversion of caller arguments into positional values.

use crate::value::{SqlValue, ToSqlValue};

/// An explicit list of already-converted arguments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args(pub Vec<SqlValue>);

impl Args {
    /// Creates an empty argument list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends one argument.
    #[must_use]
    pub fn push<T: ToSqlValue>(mut self, value: T) -> Self {
        self.0.push(value.to_sql_value());
        self
    }
}

/// Types that can be passed as the extra arguments of a condition.
///
/// `()` means no arguments, a single value is one argument, and a tuple is
/// one argument per element. A `Vec` is a single list argument; use [`Args`]
/// for a runtime-sized argument list.
pub trait IntoArgs {
    /// Converts `self` into positional arguments.
    fn into_args(self) -> Vec<SqlValue>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<SqlValue> {
        Vec::new()
    }
}

impl IntoArgs for Args {
    fn into_args(self) -> Vec<SqlValue> {
        self.0
    }
}

impl<T: ToSqlValue> IntoArgs for T {
    fn into_args(self) -> Vec<SqlValue> {
        vec![self.to_sql_value()]
    }
}

macro_rules! impl_into_args_tuple {
    ($($name:ident),+) => {
        impl<$($name: ToSqlValue),+> IntoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<SqlValue> {
                let ($($name,)+) = self;
                vec![$($name.to_sql_value()),+]
            }
        }
    };
}

impl_into_args_tuple!(A);
impl_into_args_tuple!(A, B);
impl_into_args_tuple!(A, B, C);
impl_into_args_tuple!(A, B, C, D);
impl_into_args_tuple!(A, B, C, D, E);
impl_into_args_tuple!(A, B, C, D, E, F);
impl_into_args_tuple!(A, B, C, D, E, F, G);
impl_into_args_tuple!(A, B, C, D, E, F, G, H);
