//! The dialogue overlay: speech bubbles stacked from the bottom of the
//! monitor, newest last.

use cs_core::Alignment;
use cs_engine::BubbleView;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Widget};

use crate::shared::wrap;

/// Glyph of the proceed affordance.
pub const PROCEED_MARKER: &str = "\u{25b6}";

const MIN_BUBBLE_WIDTH: u16 = 8;

/// Border color for a speaker style slug.
pub fn speaker_color(slug: &str) -> Color {
    match slug {
        "engineer" => Color::Cyan,
        "manager" => Color::Yellow,
        "managersmom" => Color::Magenta,
        _ => Color::White,
    }
}

fn bubble_width(area: Rect) -> u16 {
    (area.width * 3 / 5).max(24).min(area.width.saturating_sub(2))
}

// Borders and horizontal padding.
fn text_width(bubble_width: u16) -> usize {
    usize::from(bubble_width.saturating_sub(4))
}

/// Where each bubble lands inside `area`. Bubbles are stacked upward from
/// the bottom; older ones that no longer fit get `None`.
pub fn bubble_areas(area: Rect, bubbles: &[BubbleView]) -> Vec<Option<Rect>> {
    let mut areas = vec![None; bubbles.len()];
    let width = bubble_width(area);
    if width < MIN_BUBBLE_WIDTH {
        return areas;
    }

    let mut bottom = area.bottom().saturating_sub(1);
    for (slot, bubble) in areas.iter_mut().zip(bubbles).rev() {
        let lines = wrap(&bubble.text, text_width(width)).len();
        let height = u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2);
        if bottom < area.y.saturating_add(height) {
            break;
        }
        let y = bottom - height;
        let x = match bubble.alignment {
            Alignment::Left => area.x + 1,
            Alignment::Right => area.right() - width - 1,
        };
        *slot = Some(Rect::new(x, y, width, height));
        bottom = y;
    }
    areas
}

/// Speech bubbles over the monitor.
#[derive(Debug, Clone, Copy)]
pub struct DialogueOverlay<'a> {
    /// Bubbles to draw, oldest first.
    pub bubbles: &'a [BubbleView],
    /// The overlay has priority over the monitor; dimmed otherwise.
    pub raised: bool,
}

impl Widget for DialogueOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let areas = bubble_areas(area, self.bubbles);
        for (bubble, rect) in self.bubbles.iter().zip(areas) {
            if let Some(rect) = rect {
                render_bubble(bubble, self.raised, rect, buf);
            }
        }
    }
}

fn render_bubble(bubble: &BubbleView, raised: bool, area: Rect, buf: &mut Buffer) {
    let color = speaker_color(&bubble.slug);
    let mut text_style = Style::default().fg(Color::White).bg(Color::Black);
    if !raised {
        text_style = text_style.add_modifier(Modifier::DIM);
    }

    let mut block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .padding(Padding::horizontal(1))
        .title(
            Line::from(format!(" {} ", bubble.speaker))
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
        );
    if bubble.alignment == Alignment::Right {
        block = block.title_alignment(ratatui::layout::Alignment::Right);
    }
    if bubble.proceed_visible {
        let marker_style = if bubble.proceed_enabled {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        block = block.title_bottom(
            Line::from(format!(" {PROCEED_MARKER} "))
                .style(marker_style)
                .right_aligned(),
        );
    }

    let lines: Vec<Line> = wrap(&bubble.text, text_width(area.width))
        .into_iter()
        .map(Line::from)
        .collect();

    Clear.render(area, buf);
    Paragraph::new(lines)
        .block(block)
        .style(text_style)
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bubble(text: &str, alignment: Alignment) -> BubbleView {
        BubbleView {
            id: "a".repeat(30),
            speaker: "ENGINEER".into(),
            slug: "engineer".into(),
            text: text.into(),
            len: text.chars().count(),
            alignment,
            proceed_id: format!("proceed-button-{}", "a".repeat(30)),
            proceed_visible: true,
            proceed_enabled: true,
        }
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn bubbles_stack_upward_by_alignment() {
        let area = Rect::new(0, 0, 100, 30);
        let bubbles = [bubble("one", Alignment::Left), bubble("two", Alignment::Right)];
        let areas = bubble_areas(area, &bubbles);

        let first = areas[0].unwrap();
        let second = areas[1].unwrap();
        assert_eq!(second.bottom(), 29);
        assert_eq!(first.bottom(), second.y);
        assert_eq!(first.x, 1);
        assert_eq!(second.right(), 99);
        assert_eq!(second.height, 3);
    }

    #[test]
    fn old_bubbles_fall_off_the_top() {
        let area = Rect::new(0, 0, 100, 8);
        let bubbles = [
            bubble("one", Alignment::Left),
            bubble("two", Alignment::Left),
            bubble("three", Alignment::Left),
        ];
        let areas = bubble_areas(area, &bubbles);
        assert_eq!(areas[0], None);
        assert!(areas[1].is_some());
        assert!(areas[2].is_some());
    }

    #[test]
    fn tiny_area_draws_nothing() {
        let areas = bubble_areas(Rect::new(0, 0, 6, 10), &[bubble("x", Alignment::Left)]);
        assert_eq!(areas, vec![None]);
    }

    #[test]
    fn renders_speaker_text_and_marker() {
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        let bubbles = [bubble("hello there", Alignment::Left)];
        DialogueOverlay {
            bubbles: &bubbles,
            raised: true,
        }
        .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("ENGINEER"));
        assert!(text.contains("hello there"));
        assert!(text.contains(PROCEED_MARKER));
    }

    #[test]
    fn hidden_affordance_has_no_marker() {
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        let mut b = bubble("hi", Alignment::Right);
        b.proceed_visible = false;
        DialogueOverlay {
            bubbles: &[b],
            raised: false,
        }
        .render(area, &mut buf);
        assert!(!buffer_text(&buf).contains(PROCEED_MARKER));
    }
}
