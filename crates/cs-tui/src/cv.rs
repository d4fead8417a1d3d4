//! The CV page shown on the monitor once the boot scene finishes.
//!
//! Each section of the page is clickable and starts its own scene.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::shared::{center, wrap};

/// Page heading.
pub const HEADING: &str = "Curriculum Vitae";
/// Line under the heading.
pub const TAGLINE: &str = "I build experiences.";
/// Employers, most recent first.
pub const WORK_HISTORY: [&str; 4] = ["Kinaxis", "Cinchy", "Shopliftr", "Local Line"];
/// Degree line.
pub const EDUCATION: &str =
    "University of Waterloo, BASc in Computer Engineering, Honours, Co-op";
/// Contact channels.
pub const CONTACT: [&str; 3] = ["email", "github", "phone"];

const HEADER_HEIGHT: u16 = 3;
const LOADING_SEGMENTS: u64 = 6;

/// A clickable section of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Employers.
    WorkHistory,
    /// Degree.
    Education,
    /// Contact channels.
    Contact,
}

impl Section {
    /// All sections in page order.
    pub const ALL: [Section; 3] = [Section::WorkHistory, Section::Education, Section::Contact];

    /// Scene started by this section.
    pub fn scene(self) -> &'static str {
        match self {
            Self::WorkHistory => "workHistory",
            Self::Education => "education",
            Self::Contact => "contact",
        }
    }

    /// Section heading.
    pub fn title(self) -> &'static str {
        match self {
            Self::WorkHistory => "Work History",
            Self::Education => "Education",
            Self::Contact => "Contact",
        }
    }

    /// Keyboard shortcut.
    pub fn key(self) -> char {
        match self {
            Self::WorkHistory => 'w',
            Self::Education => 'e',
            Self::Contact => 'c',
        }
    }

    /// Section bound to a keyboard shortcut.
    pub fn from_key(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    fn body(self, width: usize) -> Vec<String> {
        match self {
            Self::WorkHistory => WORK_HISTORY.iter().map(|c| format!("  {c}")).collect(),
            Self::Education => wrap(EDUCATION, width.saturating_sub(2))
                .into_iter()
                .map(|l| format!("  {l}"))
                .collect(),
            Self::Contact => vec![format!("  {}", CONTACT.join(" \u{b7} "))],
        }
    }

    /// Rows taken by the section: heading, body and a rule.
    fn height(self, width: usize) -> u16 {
        let body = u16::try_from(self.body(width).len()).unwrap_or(u16::MAX);
        body.saturating_add(2)
    }
}

/// Where the page parts land on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// Heading and tagline.
    pub header: Rect,
    /// Clickable sections in page order.
    pub sections: [(Section, Rect); 3],
}

impl PageLayout {
    /// The section under a screen position.
    pub fn section_at(&self, column: u16, row: u16) -> Option<Section> {
        self.sections
            .iter()
            .find(|(_, area)| area.contains((column, row).into()))
            .map(|(section, _)| *section)
    }
}

/// Lay the page out inside the monitor screen.
pub fn page_layout(screen: Rect) -> PageLayout {
    let inner = screen.inner(Margin::new(1, 0));
    let width = usize::from(inner.width);
    let [header, work, education, contact, _] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(Section::WorkHistory.height(width)),
        Constraint::Length(Section::Education.height(width)),
        Constraint::Length(Section::Contact.height(width)),
        Constraint::Min(0),
    ])
    .areas(inner);
    PageLayout {
        header,
        sections: [
            (Section::WorkHistory, work),
            (Section::Education, education),
            (Section::Contact, contact),
        ],
    }
}

/// The CV page.
#[derive(Debug, Clone, Copy)]
pub struct CvPage {
    /// Sections react to clicks and shortcuts.
    pub enabled: bool,
}

impl Widget for CvPage {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = page_layout(area);
        let width = usize::from(layout.header.width);

        let header = vec![
            Line::from(Span::styled(
                HEADING,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                TAGLINE,
                Style::default().add_modifier(Modifier::ITALIC),
            )),
            Line::from("\u{2500}".repeat(width)),
        ];
        Paragraph::new(header)
            .alignment(Alignment::Center)
            .render(layout.header, buf);

        let title_style = if self.enabled {
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        for (section, rect) in layout.sections {
            let mut lines = vec![Line::from(vec![
                Span::styled(section.title(), title_style),
                Span::styled(
                    format!(" [{}]", section.key()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])];
            lines.extend(section.body(width).into_iter().map(Line::from));
            lines.push(Line::from("\u{2500}".repeat(width)));
            Paragraph::new(lines).render(rect, buf);
        }
    }
}

/// The boot-time loading bar; fills one segment per tick.
#[derive(Debug, Clone, Copy)]
pub struct LoadingBar {
    /// Animation frame.
    pub tick: u64,
}

impl LoadingBar {
    /// Segments filled at this frame.
    pub fn filled(&self) -> usize {
        // At most LOADING_SEGMENTS.
        (self.tick % (LOADING_SEGMENTS + 1)) as usize
    }
}

impl Widget for LoadingBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let filled = self.filled();
        let empty = LOADING_SEGMENTS as usize - filled;
        let bar = format!("[{}{}]", "\u{25a0}".repeat(filled), "\u{25a1}".repeat(empty));
        let lines = vec![
            Line::from(Span::styled(
                "LOADING",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(bar),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(center(area, 12, 3), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_map_to_scenes_and_keys() {
        for section in Section::ALL {
            assert_eq!(Section::from_key(section.key()), Some(section));
        }
        assert_eq!(Section::from_key('x'), None);
        assert_eq!(Section::WorkHistory.scene(), "workHistory");
    }

    #[test]
    fn sections_stack_below_the_header() {
        let layout = page_layout(Rect::new(0, 0, 60, 30));
        let mut top = layout.header.bottom();
        for (_, area) in layout.sections {
            assert_eq!(area.y, top);
            assert!(area.height > 0);
            top = area.bottom();
        }
        // Heading, four employers, rule.
        assert_eq!(layout.sections[0].1.height, 6);
    }

    #[test]
    fn section_hit_test() {
        let layout = page_layout(Rect::new(0, 0, 60, 30));
        let work = layout.sections[0].1;
        assert_eq!(layout.section_at(work.x, work.y), Some(Section::WorkHistory));
        assert_eq!(layout.section_at(0, 0), None);
        assert_eq!(layout.section_at(30, 29), None);
    }

    #[test]
    fn loading_bar_cycles() {
        assert_eq!(LoadingBar { tick: 0 }.filled(), 0);
        assert_eq!(LoadingBar { tick: 6 }.filled(), 6);
        assert_eq!(LoadingBar { tick: 7 }.filled(), 0);
    }
}
