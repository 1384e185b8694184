use std::collections::HashMap;

use crate::{
    ColorSource, ExpenseRecord, FilterState, ParsedAmount, Rgb, Total, amount::parse_amount,
    filter::matches,
};

/// One category's total, ready to be drawn as a chart slice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatedEntry {
    pub category_name: String,
    pub total_amount: Total,
    pub display_color: Rgb,
}

/// Filters `records` and sums the survivors per category.
///
/// Categories are compared by exact name. Entries come out in the order each
/// category first appears in `records`. `colors` is asked once per category.
/// Amounts are truncated to whole numbers; a malformed amount turns its
/// category total into [`Total::NotANumber`].
pub fn aggregate<'a, I, C>(records: I, filter: &FilterState, mut colors: C) -> Vec<AggregatedEntry>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
    C: ColorSource,
{
    let mut entries: Vec<AggregatedEntry> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut skipped = 0usize;

    for record in records {
        if !matches(record, filter) {
            skipped += 1;
            continue;
        }

        let slot = *index.entry(record.category.as_str()).or_insert_with(|| {
            entries.push(AggregatedEntry {
                category_name: record.category.clone(),
                total_amount: Total::ZERO,
                display_color: colors.color_for(&record.category),
            });
            entries.len() - 1
        });

        let amount = parse_amount(&record.amount);
        if amount == ParsedAmount::NotANumber {
            tracing::debug!(
                "amount {:?} of category {} is not a number",
                record.amount,
                record.category
            );
        }
        entries[slot].total_amount += amount;
    }

    tracing::debug!(
        "aggregated {} categories ({} records filtered out)",
        entries.len(),
        skipped
    );
    entries
}

/// Sum of all entry totals.
pub fn grand_total(entries: &[AggregatedEntry]) -> Total {
    entries.iter().map(|entry| entry.total_amount).sum()
}
