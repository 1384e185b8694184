use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

pub fn render_loading(frame: &mut Frame<'_>, area: Rect, endpoint: &str, theme: &Theme) {
    let rows = centered_rows(area, 2);
    frame.render_widget(
        Paragraph::new(Span::styled("Loading...", Style::default().fg(theme.text)))
            .alignment(Alignment::Center),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(endpoint, Style::default().fg(theme.dim)))
            .alignment(Alignment::Center),
        rows[1],
    );
}

pub fn render_error(frame: &mut Frame<'_>, area: Rect, cause: &str, theme: &Theme) {
    let rows = centered_rows(area, 3);
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Failed to Fetch expenses",
            Style::default().fg(theme.error),
        ))
        .alignment(Alignment::Center),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(cause, Style::default().fg(theme.dim)))
            .alignment(Alignment::Center),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Press "),
            Span::styled("r", Style::default().fg(theme.accent)),
            Span::raw(" to retry."),
        ]))
        .alignment(Alignment::Center),
        rows[2],
    );
}

fn centered_rows(area: Rect, count: u16) -> Vec<Rect> {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(count),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); count as usize])
        .split(vertical[1])
        .to_vec()
}
