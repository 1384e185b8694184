use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ExpenseRecord, date::normalize_day};

/// Named categories offered by the category selector, after `All`.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Office", "Professional", "Salaries"];

const ALL_LABEL: &str = "All";

/// Category selection: the `All` sentinel or one exact category name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CategoryChoice {
    #[default]
    All,
    Named(String),
}

impl CategoryChoice {
    pub fn named(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_LABEL,
            Self::Named(name) => name.as_str(),
        }
    }

    /// Returns `true` if a record of `category` is selected.
    pub fn admits(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category,
        }
    }
}

impl From<String> for CategoryChoice {
    fn from(value: String) -> Self {
        if value == ALL_LABEL {
            Self::All
        } else {
            Self::Named(value)
        }
    }
}

impl From<CategoryChoice> for String {
    fn from(value: CategoryChoice) -> Self {
        match value {
            CategoryChoice::All => ALL_LABEL.to_string(),
            CategoryChoice::Named(name) => name,
        }
    }
}

impl FromStr for CategoryChoice {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for CategoryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The user's current category and date-range selection.
///
/// Dates are `YYYY-MM-DD` strings, empty when unset. The range only applies
/// when both bounds are set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub selected_category: CategoryChoice,
    pub start_date: String,
    pub end_date: String,
}

impl FilterState {
    /// Returns `true` when both date bounds are set.
    pub fn date_range_active(&self) -> bool {
        !self.start_date.is_empty() && !self.end_date.is_empty()
    }

    fn admits_day(&self, raw_date: &str) -> bool {
        if !self.date_range_active() {
            return true;
        }
        // Lexical order equals calendar order on zero-padded ISO days.
        match normalize_day(raw_date) {
            Some(day) => {
                day.as_str() >= self.start_date.as_str() && day.as_str() <= self.end_date.as_str()
            }
            None => false,
        }
    }
}

/// Returns `true` if `record` passes `filter`.
///
/// The record must belong to the selected category (any category for `All`)
/// and, when both date bounds are set, its UTC day must fall within
/// `[start_date, end_date]` inclusive. A single bound on its own filters
/// nothing. Records with an unreadable date are dropped by an active range.
pub fn matches(record: &ExpenseRecord, filter: &FilterState) -> bool {
    filter.selected_category.admits(&record.category) && filter.admits_day(&record.date)
}
