use serde::{Deserialize, Serialize};

/// A single expense row as consumed by the filter and the aggregation.
///
/// The amount stays a string: it is only interpreted (and possibly found
/// malformed) during aggregation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub category: String,
    pub amount: String,
    pub date: String,
}

impl ExpenseRecord {
    pub fn new(
        category: impl Into<String>,
        amount: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            amount: amount.into(),
            date: date.into(),
        }
    }
}
