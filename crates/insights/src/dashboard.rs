//! Explicit update loop for the expenses view.
//!
//! A [`Dashboard`] owns the raw records, the [`FilterState`] and the
//! highlighted slice. Every mutation goes through [`Dashboard::apply`], which
//! re-derives the [`DashboardView`] and hands it to the subscribed
//! [`ViewObserver`]s.
use std::fmt;

use crate::{
    AggregatedEntry, CategoryChoice, ColorSource, ExpenseRecord, FilterState, Total,
    aggregate::{aggregate, grand_total},
};

/// Index of the highlighted slice in the current entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Highlight(usize);

impl Highlight {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Resets the index to 0 when it no longer points into `len` entries.
    #[must_use]
    pub const fn clamp(self, len: usize) -> Self {
        if self.0 < len { self } else { Self(0) }
    }

    /// Next slice, wrapping around.
    #[must_use]
    pub const fn next(self, len: usize) -> Self {
        if len == 0 {
            return Self(0);
        }
        Self((self.0 + 1) % len)
    }

    /// Previous slice, wrapping around.
    #[must_use]
    pub const fn prev(self, len: usize) -> Self {
        if len == 0 {
            return Self(0);
        }
        if self.0 == 0 || self.0 >= len {
            Self(len - 1)
        } else {
            Self(self.0 - 1)
        }
    }
}

/// Derived, chart-ready state. Rebuilt from scratch, never patched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardView {
    pub entries: Vec<AggregatedEntry>,
    pub highlight: Highlight,
    pub total: Total,
}

impl DashboardView {
    pub fn highlighted(&self) -> Option<&AggregatedEntry> {
        self.entries.get(self.highlight.index())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A change requested by the user or the data source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DashboardEvent {
    SelectCategory(CategoryChoice),
    SetStartDate(String),
    SetEndDate(String),
    HighlightSegment(usize),
    ReplaceRecords(Vec<ExpenseRecord>),
}

/// Receives every freshly derived view.
pub trait ViewObserver {
    fn on_view(&mut self, view: &DashboardView);
}

impl<F> ViewObserver for F
where
    F: FnMut(&DashboardView),
{
    fn on_view(&mut self, view: &DashboardView) {
        self(view)
    }
}

pub struct Dashboard<C> {
    records: Vec<ExpenseRecord>,
    filter: FilterState,
    colors: C,
    view: DashboardView,
    observers: Vec<Box<dyn ViewObserver + Send>>,
}

impl<C: ColorSource> Dashboard<C> {
    /// Builds a dashboard with the default filter and derives the first view.
    pub fn new(records: Vec<ExpenseRecord>, colors: C) -> Self {
        let mut dashboard = Self {
            records,
            filter: FilterState::default(),
            colors,
            view: DashboardView::default(),
            observers: Vec::new(),
        };
        dashboard.recompute();
        dashboard
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Registers an observer. It is called right away with the current view.
    pub fn subscribe(&mut self, mut observer: Box<dyn ViewObserver + Send>) {
        observer.on_view(&self.view);
        self.observers.push(observer);
    }

    /// Applies `event`, re-derives the view and notifies observers.
    ///
    /// Returns `false` when the event changed nothing.
    pub fn apply(&mut self, event: DashboardEvent) -> bool {
        let changed = match event {
            DashboardEvent::SelectCategory(choice) => {
                replace(&mut self.filter.selected_category, choice)
            }
            DashboardEvent::SetStartDate(day) => replace(&mut self.filter.start_date, day),
            DashboardEvent::SetEndDate(day) => replace(&mut self.filter.end_date, day),
            DashboardEvent::ReplaceRecords(records) => {
                self.records = records;
                true
            }
            DashboardEvent::HighlightSegment(index) => {
                let next = Highlight::new(index).clamp(self.view.entries.len());
                // Colors are kept: moving the highlight is not a recomputation.
                let moved = replace(&mut self.view.highlight, next);
                if moved {
                    self.notify();
                }
                return moved;
            }
        };

        if changed {
            self.recompute();
            self.notify();
        }
        changed
    }

    pub fn highlight_next(&mut self) -> bool {
        let next = self.view.highlight.next(self.view.entries.len());
        self.apply(DashboardEvent::HighlightSegment(next.index()))
    }

    pub fn highlight_prev(&mut self) -> bool {
        let prev = self.view.highlight.prev(self.view.entries.len());
        self.apply(DashboardEvent::HighlightSegment(prev.index()))
    }

    fn recompute(&mut self) {
        let entries = aggregate(&self.records, &self.filter, &mut self.colors);
        let highlight = self.view.highlight.clamp(entries.len());
        if highlight != self.view.highlight {
            tracing::debug!(
                "highlight {} out of range for {} entries, reset",
                self.view.highlight.index(),
                entries.len()
            );
        }
        self.view = DashboardView {
            total: grand_total(&entries),
            entries,
            highlight,
        };
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer.on_view(&self.view);
        }
    }
}

impl<C> fmt::Debug for Dashboard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("records", &self.records.len())
            .field("filter", &self.filter)
            .field("view", &self.view)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{HashedPalette, RandomColors};

    fn records() -> Vec<ExpenseRecord> {
        vec![
            ExpenseRecord::new("Office", "100", "2024-01-05"),
            ExpenseRecord::new("Office", "50", "2024-02-01"),
            ExpenseRecord::new("Salaries", "1000", "2024-01-10"),
            ExpenseRecord::new("Professional", "300", "2024-03-10"),
        ]
    }

    #[test]
    fn highlight_wraps_and_clamps() {
        assert_eq!(Highlight::new(2).next(3), Highlight::new(0));
        assert_eq!(Highlight::new(0).prev(3), Highlight::new(2));
        assert_eq!(Highlight::new(5).clamp(2), Highlight::new(0));
        assert_eq!(Highlight::new(1).clamp(2), Highlight::new(1));
        assert_eq!(Highlight::new(1).next(0), Highlight::new(0));
    }

    #[test]
    fn narrowing_the_filter_resets_a_stale_highlight() {
        let mut dashboard = Dashboard::new(records(), HashedPalette::default());
        assert!(dashboard.apply(DashboardEvent::HighlightSegment(2)));
        assert_eq!(dashboard.view().highlight.index(), 2);

        dashboard.apply(DashboardEvent::SelectCategory(CategoryChoice::named("Office")));
        assert_eq!(dashboard.view().entries.len(), 1);
        assert_eq!(dashboard.view().highlight.index(), 0);
        assert_eq!(
            dashboard.view().highlighted().map(|e| e.category_name.as_str()),
            Some("Office")
        );
    }

    #[test]
    fn highlight_out_of_range_is_clamped() {
        let mut dashboard = Dashboard::new(records(), HashedPalette::default());
        dashboard.apply(DashboardEvent::HighlightSegment(1));
        dashboard.apply(DashboardEvent::HighlightSegment(42));
        assert_eq!(dashboard.view().highlight.index(), 0);
    }

    #[test]
    fn unchanged_filter_does_not_notify() {
        let seen = Arc::new(Mutex::new(0usize));
        let mut dashboard = Dashboard::new(records(), HashedPalette::default());
        let counter = Arc::clone(&seen);
        dashboard.subscribe(Box::new(move |_: &DashboardView| {
            *counter.lock().unwrap() += 1;
        }));
        assert_eq!(*seen.lock().unwrap(), 1);

        assert!(!dashboard.apply(DashboardEvent::SelectCategory(CategoryChoice::All)));
        assert!(!dashboard.apply(DashboardEvent::SetStartDate(String::new())));
        assert_eq!(*seen.lock().unwrap(), 1);

        assert!(dashboard.apply(DashboardEvent::SetStartDate("2024-01-01".to_string())));
        assert_eq!(*seen.lock().unwrap(), 2);
    }

    #[test]
    fn date_range_applies_once_both_bounds_are_set() {
        let mut dashboard = Dashboard::new(records(), HashedPalette::default());
        dashboard.apply(DashboardEvent::SetStartDate("2024-01-01".to_string()));
        assert_eq!(dashboard.view().total, Total::Amount(1450));

        dashboard.apply(DashboardEvent::SetEndDate("2024-01-31".to_string()));
        assert_eq!(dashboard.view().total, Total::Amount(1100));
        assert_eq!(dashboard.view().entries.len(), 2);
    }

    #[test]
    fn highlight_alone_keeps_random_colors() {
        let mut dashboard = Dashboard::new(records(), RandomColors::seeded(9));
        let before: Vec<_> = dashboard
            .view()
            .entries
            .iter()
            .map(|e| e.display_color)
            .collect();
        dashboard.highlight_next();
        let after: Vec<_> = dashboard
            .view()
            .entries
            .iter()
            .map(|e| e.display_color)
            .collect();
        assert_eq!(before, after);
        assert_eq!(dashboard.view().highlight.index(), 1);
    }

    #[test]
    fn replacing_records_recomputes() {
        let mut dashboard = Dashboard::new(Vec::new(), HashedPalette::default());
        assert!(dashboard.view().is_empty());
        dashboard.apply(DashboardEvent::ReplaceRecords(records()));
        assert_eq!(dashboard.view().entries.len(), 3);
        assert_eq!(dashboard.records().len(), 4);
    }
}
