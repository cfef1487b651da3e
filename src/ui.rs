use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::button::{HoldButton, HoldPhase};
use crate::ripple::RippleBurst;

/// Accent fill color (hex 0x86fc1e in the original palette).
pub const ACCENT: Color = Color::Rgb(0x86, 0xfc, 0x1e);
/// Resting capsule color (hex 0xaaaaaa).
pub const BASE: Color = Color::Rgb(0xaa, 0xaa, 0xaa);

const RIPPLE_COLORS: [Color; 5] = [
    ACCENT,
    Color::Yellow,
    Color::Cyan,
    Color::Magenta,
    Color::White,
];

/// Capsule size at scale 1.0, in cells.
const BUTTON_WIDTH: u16 = 34;
const BUTTON_HEIGHT: u16 = 3;

/// Rect the capsule occupies inside `area` after the scale and shake
/// transforms. Also used by the event loop for mouse hit-testing.
pub fn button_rect(area: Rect, scale: f32, shake_offset: f32) -> Rect {
    let width = ((BUTTON_WIDTH as f32 * scale).round() as u16)
        .clamp(4, area.width.saturating_sub(2).max(4));
    let height = BUTTON_HEIGHT.min(area.height);
    let x = (area.x + area.width.saturating_sub(width) / 2).saturating_add_signed(
        shake_offset.round() as i16,
    );
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x: x.min(area.right().saturating_sub(width)),
        y,
        width,
        height,
    }
}

/// The demo screen: a capsule button with a proportional-width fill overlay,
/// the ripple burst, and a status footer.
pub struct Screen<'a> {
    pub button: &'a HoldButton,
    pub ripple: &'a RippleBurst,
    pub completions: u32,
}

impl Widget for Screen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let title = Paragraph::new(Line::from(Span::styled(
            "Button with press-and-hold effect",
            bold_style,
        )))
        .alignment(Alignment::Center);
        if area.height > 4 {
            title.render(Rect { height: 1, ..area }, buf);
        }

        let rect = button_rect(area, self.button.scale(), self.button.shake_offset());
        self.render_capsule(rect, buf);
        self.render_ripple(area, buf);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("hold with the mouse", dim_style),
            Span::raw("  ·  "),
            Span::styled("(r)eset  (q)uit", dim_style),
            Span::raw("  ·  "),
            Span::styled(format!("completions: {}", self.completions), bold_style),
        ]))
        .alignment(Alignment::Center);
        if area.height > 4 {
            let bottom = Rect {
                y: area.bottom().saturating_sub(1),
                height: 1,
                ..area
            };
            footer.render(bottom, buf);
        }
    }
}

impl Screen<'_> {
    fn render_capsule(&self, rect: Rect, buf: &mut Buffer) {
        let border_color = match self.button.phase() {
            HoldPhase::Completed => ACCENT,
            _ => BASE,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(rect);
        block.render(rect, buf);

        // Proportional-width fill overlay, left to right.
        let filled = (inner.width as f32 * self.button.fill_fraction()).round() as u16;
        for y in inner.top()..inner.bottom() {
            for x in inner.left()..inner.right() {
                let bg = if x < inner.left() + filled { ACCENT } else { BASE };
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(bg);
                }
            }
        }

        let label = self.button.label().get();
        let label_style = Style::default().fg(Color::Black).add_modifier(Modifier::BOLD);
        Paragraph::new(Line::from(Span::styled(label, label_style)))
            .alignment(Alignment::Center)
            .render(
                Rect {
                    y: inner.y + inner.height / 2,
                    height: 1.min(inner.height),
                    ..inner
                },
                buf,
            );
    }

    fn render_ripple(&self, area: Rect, buf: &mut Buffer) {
        for p in &self.ripple.particles {
            let x = p.x.round() as i32;
            let y = p.y.round() as i32;
            if x < area.x as i32
                || y < area.y as i32
                || x >= area.right() as i32
                || y >= area.bottom() as i32
            {
                continue;
            }
            let color = RIPPLE_COLORS[p.color_index % RIPPLE_COLORS.len()];
            if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
                cell.set_char(p.symbol).set_fg(color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    #[test]
    fn button_rect_is_centered_at_rest() {
        let rect = button_rect(area(), 1.0, 0.0);
        assert_eq!(rect.width, BUTTON_WIDTH);
        assert_eq!(rect.x, (80 - BUTTON_WIDTH) / 2);
    }

    #[test]
    fn scale_widens_the_capsule() {
        let rest = button_rect(area(), 1.0, 0.0);
        let grown = button_rect(area(), 1.2, 0.0);
        assert!(grown.width > rest.width);
    }

    #[test]
    fn shake_offsets_the_capsule() {
        let rest = button_rect(area(), 1.0, 0.0);
        let shaken = button_rect(area(), 1.0, 2.0);
        assert_eq!(shaken.x, rest.x + 2);
    }

    #[test]
    fn button_rect_stays_inside_small_areas() {
        let tiny = Rect::new(0, 0, 10, 2);
        let rect = button_rect(tiny, 1.5, 2.0);
        assert!(rect.right() <= tiny.right());
        assert!(rect.bottom() <= tiny.bottom());
    }
}
