use insights::{Dashboard, DashboardView};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{Colors, FilterField, FilterForm},
    ui::{
        components::{
            card::Card,
            charts::{format_total, pie_chart, render_legend},
        },
        theme::Theme,
    },
};

const FILTERS_WIDTH: u16 = 34;
const LEGEND_WIDTH: u16 = 34;

/// Areas of the ready screen body.
pub struct BodyLayout {
    pub filters: Rect,
    pub chart: Rect,
    pub pie: Rect,
    pub legend: Rect,
    pub tooltip: Rect,
}

pub fn layout(area: Rect, theme: &Theme) -> BodyLayout {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FILTERS_WIDTH), Constraint::Min(0)])
        .split(area);

    let chart = columns[1];
    let inner = Card::new("", theme).inner(chart);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(LEGEND_WIDTH)])
        .split(rows[0]);

    BodyLayout {
        filters: columns[0],
        chart,
        pie: split[0],
        legend: split[1],
        tooltip: rows[1],
    }
}

pub fn render(
    frame: &mut Frame<'_>,
    area: Rect,
    dashboard: &Dashboard<Colors>,
    form: &FilterForm,
    theme: &Theme,
) {
    let body = layout(area, theme);
    render_filters(frame, body.filters, form, theme);
    render_chart(frame, &body, dashboard.view(), theme);
}

fn render_filters(frame: &mut Frame<'_>, area: Rect, form: &FilterForm, theme: &Theme) {
    let card = Card::new("Filter by Category and Date", theme).focused(true);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Category label
            Constraint::Length(1), // Category value
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Start label
            Constraint::Length(1), // Start value
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // End label
            Constraint::Length(1), // End value
        ])
        .margin(1)
        .split(inner);

    let category = form.selected();
    let category_display = format!("◀ {} ▶", category.label());
    render_field(
        frame,
        (rows[0], rows[1]),
        "Category",
        &category_display,
        form.focus == FilterField::Category,
        theme,
    );
    render_field(
        frame,
        (rows[3], rows[4]),
        "Start Date",
        &date_display(&form.start_input),
        form.focus == FilterField::StartDate,
        theme,
    );
    render_field(
        frame,
        (rows[6], rows[7]),
        "End Date",
        &date_display(&form.end_input),
        form.focus == FilterField::EndDate,
        theme,
    );
}

fn date_display(input: &str) -> String {
    if input.is_empty() {
        "yyyy-mm-dd".to_string()
    } else {
        input.to_string()
    }
}

fn render_field(
    frame: &mut Frame<'_>,
    (label_area, value_area): (Rect, Rect),
    label: &str,
    value: &str,
    focused: bool,
    theme: &Theme,
) {
    frame.render_widget(
        Paragraph::new(Span::styled(label, Style::default().fg(theme.dim))),
        label_area,
    );

    let cursor = if focused { "│" } else { "" };
    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!("{value}{cursor}"), style)),
        value_area,
    );
}

fn render_chart(frame: &mut Frame<'_>, body: &BodyLayout, view: &DashboardView, theme: &Theme) {
    let card = Card::new("Expenses by Category", theme);
    card.render_frame(frame, body.chart);

    if view.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No expenses match the current filters",
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center),
            body.pie,
        );
        return;
    }

    frame.render_widget(&pie_chart(view, theme), body.pie);
    render_legend(frame, body.legend, view, theme);
    render_tooltip(frame, body.tooltip, view, theme);
}

fn render_tooltip(frame: &mut Frame<'_>, area: Rect, view: &DashboardView, theme: &Theme) {
    let Some(entry) = view.highlighted() else {
        return;
    };

    let line = Line::from(vec![
        Span::styled(
            entry.category_name.clone(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" : ", Style::default().fg(theme.dim)),
        Span::styled(
            format_total(entry.total_amount),
            Style::default().fg(theme.accent),
        ),
        Span::styled("   total ", Style::default().fg(theme.dim)),
        Span::styled(format_total(view.total), Style::default().fg(theme.text)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Slice under the pointer at (`x`, `y`) for a body laid out in `area`.
pub fn slice_at(area: Rect, view: &DashboardView, x: u16, y: u16) -> Option<usize> {
    let body = layout(area, &Theme::default());
    pie_chart(view, &Theme::default()).slice_at(body.pie, x, y)
}
