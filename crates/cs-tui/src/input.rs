//! Keyboard and mouse mapping.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use cs_engine::{EngineSnapshot, InputEvent};
use ratatui::layout::Rect;

use crate::cv::{PageLayout, Section};

/// What a terminal event asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Forward to the engine.
    Engine(InputEvent),
    /// Leave the app.
    Quit,
}

/// Whether the CV sections accept clicks and shortcuts.
pub fn sections_enabled(snapshot: &EngineSnapshot) -> bool {
    let display = snapshot.display_state();
    display.monitor_on && display.show_content && !snapshot.interaction_disabled()
}

fn trigger(section: Section) -> Action {
    Action::Engine(InputEvent::Trigger(section.scene().to_string()))
}

/// Map a key press.
pub fn map_key(key: KeyEvent, snapshot: &EngineSnapshot) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter => Some(Action::Engine(InputEvent::Confirm)),
        KeyCode::Char(' ') => Some(Action::Engine(InputEvent::Proceed)),
        KeyCode::Char('r') => Some(Action::Engine(InputEvent::Restart)),
        KeyCode::Char(c) => Section::from_key(c)
            .filter(|_| sections_enabled(snapshot))
            .map(trigger),
        _ => None,
    }
}

/// Map a left click at (`column`, `row`). Bubbles take precedence over
/// the page beneath them.
pub fn map_click(
    column: u16,
    row: u16,
    snapshot: &EngineSnapshot,
    bubbles: &[Option<Rect>],
    page: &PageLayout,
) -> Option<Action> {
    let on_bubble = bubbles
        .iter()
        .flatten()
        .any(|area| area.contains((column, row).into()));
    if on_bubble {
        return Some(Action::Engine(InputEvent::Proceed));
    }

    if !sections_enabled(snapshot) {
        return None;
    }
    page.section_at(column, row).map(trigger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::page_layout;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn cv_visible() -> EngineSnapshot {
        let mut snapshot = EngineSnapshot::default();
        snapshot.variables.set("isMonitorOn", true);
        snapshot.variables.set("showCVContent", true);
        snapshot
    }

    #[test]
    fn control_keys() {
        let idle = EngineSnapshot::default();
        assert_eq!(map_key(press(KeyCode::Char('q')), &idle), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Esc), &idle), Some(Action::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &idle),
            Some(Action::Quit)
        );
        assert_eq!(
            map_key(press(KeyCode::Enter), &idle),
            Some(Action::Engine(InputEvent::Confirm))
        );
        assert_eq!(
            map_key(press(KeyCode::Char(' ')), &idle),
            Some(Action::Engine(InputEvent::Proceed))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('r')), &idle),
            Some(Action::Engine(InputEvent::Restart))
        );
        assert_eq!(map_key(press(KeyCode::Char('x')), &idle), None);
    }

    #[test]
    fn section_shortcuts_need_visible_content() {
        let idle = EngineSnapshot::default();
        assert_eq!(map_key(press(KeyCode::Char('w')), &idle), None);

        assert_eq!(
            map_key(press(KeyCode::Char('w')), &cv_visible()),
            Some(Action::Engine(InputEvent::Trigger("workHistory".into())))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('c')), &cv_visible()),
            Some(Action::Engine(InputEvent::Trigger("contact".into())))
        );
    }

    #[test]
    fn section_shortcuts_ignored_while_playing() {
        let mut playing = cv_visible();
        playing.scene_active = true;
        assert_eq!(map_key(press(KeyCode::Char('e')), &playing), None);
    }

    #[test]
    fn clicks_hit_bubbles_then_sections() {
        let page = page_layout(Rect::new(0, 0, 60, 30));
        let (_, education) = page.sections[1];
        let bubble = Rect::new(education.x, education.y, 10, 3);

        assert_eq!(
            map_click(education.x, education.y, &cv_visible(), &[Some(bubble)], &page),
            Some(Action::Engine(InputEvent::Proceed))
        );
        assert_eq!(
            map_click(education.x, education.y, &cv_visible(), &[None], &page),
            Some(Action::Engine(InputEvent::Trigger("education".into())))
        );
        assert_eq!(
            map_click(education.x, education.y, &EngineSnapshot::default(), &[], &page),
            None
        );
    }
}
