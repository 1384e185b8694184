pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use insights::DashboardView;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, LoadState};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

use components::hints;

struct ShellLayout {
    header: Rect,
    body: Rect,
    bottom: Rect,
}

fn shell_layout(area: Rect) -> ShellLayout {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title + subtitle
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    ShellLayout {
        header: layout[0],
        body: layout[1],
        bottom: layout[2],
    }
}

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let shell = shell_layout(frame.area());

    match &state.load {
        LoadState::Loading => {
            screens::status::render_loading(frame, shell.body, &state.endpoint, &theme);
        }
        LoadState::Error(cause) => {
            screens::status::render_error(frame, shell.body, cause, &theme);
        }
        LoadState::Ready(dashboard) => {
            render_header(frame, shell.header, state, &theme);
            screens::expenses::render(frame, shell.body, dashboard, &state.form, &theme);
        }
    }

    render_bottom_bar(frame, shell.bottom, state, &theme);
}

/// Slice under the pointer for a frame of size `area`.
pub fn slice_at(area: Rect, view: &DashboardView, x: u16, y: u16) -> Option<usize> {
    screens::expenses::slice_at(shell_layout(area).body, view, x, y)
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Expenses",
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("Refresh", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {refresh}")),
        ]),
        Line::from(Span::styled(
            "A Visual representation of expenses over time.",
            Style::default().fg(theme.dim),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = Vec::new();

    if state.dashboard().is_some() {
        parts.extend(hints::hints_to_spans(&hints::filter_hints(), theme));
        parts.push(hints::hint_separator(theme));
        parts.extend(hints::hints_to_spans(&hints::chart_hints(), theme));
        parts.push(hints::hint_separator(theme));
    }
    parts.extend(hints::hints_to_spans(&hints::global_hints(), theme));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
