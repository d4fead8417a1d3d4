//! The CRT monitor: a 4:3 bezel around a screen showing the boot
//! animation or the CV page.

use cs_core::DisplayState;
use cs_engine::Viewport;
use ratatui::buffer::Buffer;
use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Widget};

use crate::cv::{CvPage, LoadingBar};

/// Bezel and screen positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorLayout {
    /// Outer frame, 4:3.
    pub bezel: Rect,
    /// Drawable screen inside the bezel.
    pub screen: Rect,
}

/// Fit the largest 4:3 monitor into `area`, centered.
pub fn layout(area: Rect) -> MonitorLayout {
    let viewport = Viewport {
        width: area.width,
        height: area.height,
    };
    let (width, height) = viewport.monitor_size();
    let bezel = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    MonitorLayout {
        bezel,
        screen: bezel.inner(Margin::new(2, 1)),
    }
}

/// The monitor widget.
#[derive(Debug, Clone, Copy)]
pub struct Monitor {
    /// Display variables as seen by the page.
    pub display: DisplayState,
    /// A scene is playing; the page is dimmed and inert.
    pub paused: bool,
    /// Animation frame.
    pub tick: u64,
}

impl Widget for Monitor {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = layout(area);

        Block::bordered()
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(Color::Gray))
            .title_bottom(Line::from(" crt ").centered())
            .render(layout.bezel, buf);

        let screen = if self.display.monitor_on {
            Style::default().fg(Color::Green).bg(Color::Black)
        } else {
            Style::default().bg(Color::Black)
        };
        buf.set_style(layout.screen, screen);
        if !self.display.monitor_on {
            return;
        }

        if self.display.show_loading {
            LoadingBar { tick: self.tick }.render(layout.screen, buf);
        }
        if self.display.show_content {
            CvPage {
                enabled: !self.paused,
            }
            .render(layout.screen, buf);
        }
        if self.paused {
            buf.set_style(layout.screen, Style::default().add_modifier(Modifier::DIM));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn layout_is_centered_four_by_three() {
        let area = Rect::new(0, 0, 120, 40);
        let MonitorLayout { bezel, screen } = layout(area);
        assert_eq!(Viewport::monitor_height_for(bezel.width), bezel.height);
        assert!(bezel.height <= 40);
        assert_eq!(bezel.x, (120 - bezel.width) / 2);
        assert_eq!(screen, bezel.inner(Margin::new(2, 1)));
    }

    #[test]
    fn powered_off_screen_is_blank() {
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        Monitor {
            display: DisplayState {
                show_content: true,
                ..DisplayState::default()
            },
            paused: false,
            tick: 0,
        }
        .render(area, &mut buf);
        assert!(!buffer_text(&buf).contains("Work History"));
    }

    #[test]
    fn shows_loading_then_content() {
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        Monitor {
            display: DisplayState {
                monitor_on: true,
                show_loading: true,
                ..DisplayState::default()
            },
            paused: true,
            tick: 3,
        }
        .render(area, &mut buf);
        assert!(buffer_text(&buf).contains("LOADING"));

        let mut buf = Buffer::empty(area);
        Monitor {
            display: DisplayState {
                monitor_on: true,
                show_content: true,
                ..DisplayState::default()
            },
            paused: false,
            tick: 0,
        }
        .render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Work History"));
        assert!(text.contains("Shopliftr"));
        assert!(!text.contains("LOADING"));
    }
}
