//! Comparison rules between expected and observed response values.

use std::fmt;

use crate::model::entry::QueryResult;

/// A value the scoreboard can hold as an expectation and compare against an
/// observed response.
pub trait Expect: Clone + fmt::Display {
    /// Whether `actual` satisfies `self` as an expectation.
    fn matches(&self, actual: &Self) -> bool;
}

/// Structural equality for plain port values.
macro_rules! impl_expect_eq {
    ($($t:ty),* $(,)?) => {
        $(
            impl Expect for $t {
                fn matches(&self, actual: &Self) -> bool {
                    self == actual
                }
            }
        )*
    };
}

impl_expect_eq!(bool, u8, u16, u32, u64, usize);

impl Expect for QueryResult {
    /// Once either side flags an error only the flags are compared: both
    /// erroring is a match, a single error is a mismatch. Otherwise key,
    /// size and list size must agree.
    fn matches(&self, actual: &Self) -> bool {
        if self.error || actual.error {
            return self.error == actual.error;
        }
        self.key == actual.key && self.size == actual.size && self.list_size == actual.list_size
    }
}
