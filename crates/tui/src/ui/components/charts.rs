use insights::{AggregatedEntry, DashboardView, HIGHLIGHT, Total};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::{
    components::pie::{PieChart, Slice},
    theme::{Theme, color},
};

/// Builds the pie for the current view.
pub fn pie_chart(view: &DashboardView, theme: &Theme) -> PieChart {
    let slices = view
        .entries
        .iter()
        .map(|entry| Slice {
            value: entry.total_amount.as_chart_value(),
            color: color(entry.display_color),
        })
        .collect();

    PieChart::new(slices)
        .highlight(view.highlight.index(), color(HIGHLIGHT))
        .empty_color(theme.empty_slice)
}

/// Renders one legend row per entry: swatch, name, amount, share.
pub fn render_legend(frame: &mut Frame<'_>, area: Rect, view: &DashboardView, theme: &Theme) {
    let total = view.total.amount().unwrap_or(0);
    let highlighted = view.highlight.index();

    let rows: Vec<Line> = view
        .entries
        .iter()
        .enumerate()
        .take(area.height as usize)
        .map(|(index, entry)| legend_line(entry, index == highlighted, total, theme))
        .collect();

    frame.render_widget(Paragraph::new(rows), area);
}

fn legend_line(
    entry: &AggregatedEntry,
    highlighted: bool,
    total: i64,
    theme: &Theme,
) -> Line<'static> {
    let swatch = if highlighted {
        color(HIGHLIGHT)
    } else {
        color(entry.display_color)
    };
    let name_style = if highlighted {
        Style::default()
            .fg(theme.text)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let pct = entry
        .total_amount
        .amount()
        .map(|value| compute_percentage(value, total))
        .map(|pct| format!("{pct:>3}%"))
        .unwrap_or_else(|| "   -".to_string());

    Line::from(vec![
        Span::styled("■ ", Style::default().fg(swatch)),
        Span::styled(
            format!("{:<14}", truncate_string(&entry.category_name, 13)),
            name_style,
        ),
        Span::styled(
            format!("{:>10}", format_total(entry.total_amount)),
            Style::default().fg(theme.text),
        ),
        Span::styled(format!(" {pct}"), Style::default().fg(theme.dim)),
    ])
}

/// Formats a total with thousands separators, `NaN` when corrupted.
#[must_use]
pub fn format_total(total: Total) -> String {
    let Some(value) = total.amount() else {
        return total.to_string();
    };

    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Computes the percentage of value relative to max.
#[must_use]
pub fn compute_percentage(value: i64, max: i64) -> u16 {
    if max == 0 {
        return 0;
    }
    ((value.abs() as f64 / max.abs() as f64) * 100.0)
        .round()
        .min(100.0) as u16
}

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
