use insights::Rgb;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub surface: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub error: Color,
    pub empty_slice: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(170, 170, 170),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            border: Color::Rgb(60, 70, 80),
            border_focused: Color::Rgb(80, 160, 160),
            error: Color::Rgb(200, 80, 80),
            empty_slice: Color::Rgb(0x88, 0x8f, 0xd8),
        }
    }
}

/// Converts a domain color into a terminal color.
pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}
