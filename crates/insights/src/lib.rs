//! Client-side expense insights.
//!
//! This crate turns a flat list of expense rows into chart-ready category
//! totals:
//!
//! - [`matches`] decides whether a record passes the current [`FilterState`].
//! - [`aggregate`] groups the passing records by category and sums them.
//! - [`Dashboard`] owns the filter state and re-derives a [`DashboardView`]
//!   every time a [`DashboardEvent`] changes something.
//!
//! Nothing here performs I/O or returns errors: malformed amounts are folded
//! into a [`Total::NotANumber`] instead.
pub use aggregate::{AggregatedEntry, aggregate, grand_total};
pub use amount::{ParsedAmount, Total, parse_amount};
pub use color::{ColorMode, ColorSource, HIGHLIGHT, HashedPalette, RandomColors, Rgb};
pub use dashboard::{
    Dashboard, DashboardEvent, DashboardView, Highlight, ViewObserver,
};
pub use date::{is_calendar_day, normalize_day};
pub use filter::{CategoryChoice, DEFAULT_CATEGORIES, FilterState, matches};
pub use record::ExpenseRecord;

mod aggregate;
mod amount;
mod color;
mod dashboard;
mod date;
mod filter;
mod record;
