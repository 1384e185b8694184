use serde::{Deserialize, Serialize};

pub mod expense {
    use super::*;

    /// One row of the `/expenses` endpoint.
    ///
    /// The server pre-aggregates expenses per category and day, and sends the
    /// amount as a decimal string (e.g. `"45.99"`). The id is optional and
    /// never used for grouping.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseByCategorySummary {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub expense_by_category_summary_id: Option<String>,
        pub category: String,
        pub amount: String,
        pub date: String,
    }

    impl ExpenseByCategorySummary {
        pub fn new(
            category: impl Into<String>,
            amount: impl Into<String>,
            date: impl Into<String>,
        ) -> Self {
            Self {
                expense_by_category_summary_id: None,
                category: category.into(),
                amount: amount.into(),
                date: date.into(),
            }
        }
    }
}

pub mod error {
    use super::*;

    /// Body returned by the API alongside a non-2xx status.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: String,
    }
}
