use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use crate::ui::theme::Theme;

/// Rounded, titled container used for every dashboard panel.
pub struct Card<'a> {
    title: &'a str,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> Card<'a> {
    pub fn new(title: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            theme,
            focused: false,
        }
    }

    /// Mark this card as focused (uses accent border color).
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn block(&self) -> Block<'a> {
        let border_color = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };

        Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(self.theme.accent),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(self.theme.surface))
    }

    /// Returns the inner area after accounting for borders.
    pub fn inner(&self, area: Rect) -> Rect {
        self.block().inner(area)
    }

    /// Renders the card border/frame without content.
    pub fn render_frame(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(self.block(), area);
    }
}
