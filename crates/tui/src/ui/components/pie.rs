use std::f64::consts::TAU;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::Widget,
};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// One slice of a [`PieChart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub value: u64,
    pub color: Color,
}

/// A filled pie drawn with block characters.
///
/// Slices start at twelve o'clock and run clockwise in input order; each
/// angle is proportional to the slice value. The highlighted slice is
/// painted with `highlight_color`.
#[derive(Debug, Clone)]
pub struct PieChart {
    slices: Vec<Slice>,
    highlight: Option<usize>,
    highlight_color: Color,
    empty_color: Color,
}

impl PieChart {
    pub fn new(slices: Vec<Slice>) -> Self {
        Self {
            slices,
            highlight: None,
            highlight_color: Color::Blue,
            empty_color: Color::DarkGray,
        }
    }

    pub fn highlight(mut self, index: usize, color: Color) -> Self {
        self.highlight = Some(index);
        self.highlight_color = color;
        self
    }

    /// Fill used when there is nothing to draw (no slices or all zero).
    pub fn empty_color(mut self, color: Color) -> Self {
        self.empty_color = color;
        self
    }

    /// Index of the slice drawn at cell (`x`, `y`), if any.
    pub fn slice_at(&self, area: Rect, x: u16, y: u16) -> Option<usize> {
        let values: Vec<u64> = self.slices.iter().map(|slice| slice.value).collect();
        slice_at(&values, area, x, y)
    }

    fn cell_color(&self, area: Rect, x: u16, y: u16) -> Option<Color> {
        let geometry = Geometry::new(area)?;
        let angle = geometry.angle_at(x, y)?;

        let total = weight_total(self.slices.iter().map(|slice| slice.value));
        if total == 0.0 {
            return Some(self.empty_color);
        }

        let index = index_for_angle(self.slices.iter().map(|s| s.value), total, angle)?;
        if self.highlight == Some(index) {
            Some(self.highlight_color)
        } else {
            Some(self.slices[index].color)
        }
    }
}

impl Widget for PieChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        (&self).render(area, buf);
    }
}

impl Widget for &PieChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(color) = self.cell_color(area, x, y) {
                    buf[(x, y)]
                        .set_symbol(symbols::block::FULL)
                        .set_style(Style::default().fg(color));
                }
            }
        }
    }
}

/// Index of the slice of `values` drawn at cell (`x`, `y`) of `area`.
///
/// Returns `None` outside the disc and when every value is zero.
pub fn slice_at(values: &[u64], area: Rect, x: u16, y: u16) -> Option<usize> {
    if !area.contains((x, y).into()) {
        return None;
    }
    let angle = Geometry::new(area)?.angle_at(x, y)?;
    let total = weight_total(values.iter().copied());
    if total == 0.0 {
        return None;
    }
    index_for_angle(values.iter().copied(), total, angle)
}

/// Sum of the weights as `f64`; saturated totals would overflow `u64`.
fn weight_total(values: impl Iterator<Item = u64>) -> f64 {
    values.map(|value| value as f64).sum()
}

/// Slices with no value are never selected.
fn index_for_angle(values: impl Iterator<Item = u64>, total: f64, angle: f64) -> Option<usize> {
    let target = angle / TAU;
    let mut start = 0.0;
    let mut last = None;
    for (index, value) in values.enumerate() {
        if value == 0 {
            continue;
        }
        let end = start + value as f64 / total;
        if target < end {
            return Some(index);
        }
        start = end;
        last = Some(index);
    }
    // Rounding can leave the very last sliver uncovered.
    last
}

struct Geometry {
    cx: f64,
    cy: f64,
    radius: f64,
}

impl Geometry {
    fn new(area: Rect) -> Option<Self> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let radius = (f64::from(area.width) / 2.0).min(f64::from(area.height) * CELL_ASPECT / 2.0);
        Some(Self {
            cx: f64::from(area.x) + f64::from(area.width) / 2.0,
            cy: f64::from(area.y) + f64::from(area.height) / 2.0,
            radius,
        })
    }

    /// Clockwise angle from twelve o'clock in `[0, TAU)` for a cell inside
    /// the disc.
    fn angle_at(&self, x: u16, y: u16) -> Option<f64> {
        let dx = f64::from(x) + 0.5 - self.cx;
        let dy = (f64::from(y) + 0.5 - self.cy) * CELL_ASPECT;
        if dx.hypot(dy) > self.radius {
            return None;
        }
        let angle = dx.atan2(-dy);
        Some(if angle < 0.0 { angle + TAU } else { angle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 20,
        height: 10,
    };

    #[test]
    fn halves_split_left_and_right() {
        let values = [1, 1];
        // Right of center is the first half (clockwise from the top).
        assert_eq!(slice_at(&values, AREA, 14, 5), Some(0));
        assert_eq!(slice_at(&values, AREA, 5, 5), Some(1));
    }

    #[test]
    fn corners_are_outside_the_disc() {
        assert_eq!(slice_at(&[1], AREA, 0, 0), None);
        assert_eq!(slice_at(&[1], AREA, 19, 9), None);
        assert_eq!(slice_at(&[1], AREA, 25, 5), None);
    }

    #[test]
    fn zero_values_are_never_hit() {
        assert_eq!(slice_at(&[0, 0], AREA, 10, 5), None);
        assert_eq!(slice_at(&[0, 3], AREA, 14, 5), Some(1));
        assert_eq!(slice_at(&[0, 3], AREA, 5, 5), Some(1));
    }

    #[test]
    fn renders_highlight_color() {
        let chart = PieChart::new(vec![
            Slice {
                value: 1,
                color: Color::Red,
            },
            Slice {
                value: 1,
                color: Color::Green,
            },
        ])
        .highlight(1, Color::Blue);

        let mut buf = Buffer::empty(AREA);
        (&chart).render(AREA, &mut buf);
        assert_eq!(buf[(14, 5)].fg, Color::Red);
        assert_eq!(buf[(5, 5)].fg, Color::Blue);
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(chart.slice_at(AREA, 5, 5), Some(1));
    }

    #[test]
    fn saturated_weights_do_not_overflow() {
        let values = [u64::MAX / 2, u64::MAX / 2, u64::MAX / 2];
        let chart = PieChart::new(
            values
                .iter()
                .map(|&value| Slice {
                    value,
                    color: Color::Red,
                })
                .collect(),
        );

        let mut buf = Buffer::empty(AREA);
        (&chart).render(AREA, &mut buf);
        assert_eq!(buf[(14, 5)].fg, Color::Red);
        // Three equal thirds: right of center is the first, left is the last.
        assert_eq!(slice_at(&values, AREA, 14, 5), Some(0));
        assert_eq!(slice_at(&values, AREA, 5, 5), Some(2));
    }

    #[test]
    fn empty_chart_uses_empty_color() {
        let chart = PieChart::new(Vec::new()).empty_color(Color::Gray);
        let mut buf = Buffer::empty(AREA);
        chart.render(AREA, &mut buf);
        assert_eq!(buf[(10, 5)].fg, Color::Gray);
    }
}
