//! Application state: the latest engine snapshot plus the layout needed to
//! hit-test mouse clicks.

use cs_engine::{EngineHandle, EngineSnapshot, InputEvent, Renderer, RendererBridge};
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tracing::warn;

use crate::cv::{self, PageLayout};
use crate::dialogue::{self, DialogueOverlay};
use crate::input::{self, Action};
use crate::monitor::{self, Monitor};

const STATUS_HINT: &str = "Enter:confirm  Space:proceed  w/e/c:sections  r:restart  q:quit";

/// Main application state for the terminal renderer.
pub struct TuiApp {
    bridge: RendererBridge,
    /// Latest engine snapshot.
    pub snapshot: EngineSnapshot,
    /// Animation frame counter.
    pub tick: u64,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Last engine error, shown in the status bar.
    pub status: Option<String>,
    page: Option<PageLayout>,
    bubbles: Vec<Option<Rect>>,
}

impl TuiApp {
    /// Create an app driving `handle`.
    pub fn new(handle: EngineHandle) -> Self {
        let snapshot = handle.snapshot();
        Self {
            bridge: RendererBridge::new(handle),
            snapshot,
            tick: 0,
            should_quit: false,
            status: None,
            page: None,
            bubbles: Vec::new(),
        }
    }

    /// The bridge to the engine.
    pub fn bridge(&self) -> &RendererBridge {
        &self.bridge
    }

    /// Action for a key press.
    pub fn key_action(&self, key: KeyEvent) -> Option<Action> {
        input::map_key(key, &self.snapshot)
    }

    /// Action for a left click. Needs a drawn frame to hit-test against.
    pub fn click_action(&self, column: u16, row: u16) -> Option<Action> {
        let page = self.page.as_ref()?;
        input::map_click(column, row, &self.snapshot, &self.bubbles, page)
    }

    /// Carry out an action.
    pub async fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Engine(event) => {
                if let Err(e) = self.bridge.dispatch(event).await {
                    warn!(error = %e, "input rejected");
                    self.status = Some(e.to_string());
                } else {
                    self.status = None;
                }
                self.snapshot = self.bridge.snapshot();
            }
        }
    }

    /// Record the terminal size on the bridge.
    pub async fn resize(&mut self, width: u16, height: u16) {
        self.handle_action(Action::Engine(InputEvent::Resize { width, height }))
            .await;
    }

    /// Advance the animation clock.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Draw one frame and remember the layout for hit-testing.
    pub fn draw(&mut self, frame: &mut Frame) {
        let [content, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        let layout = monitor::layout(content);
        frame.render_widget(
            Monitor {
                display: self.snapshot.display_state(),
                paused: self.snapshot.interaction_disabled(),
                tick: self.tick,
            },
            content,
        );
        frame.render_widget(
            DialogueOverlay {
                bubbles: &self.snapshot.bubbles,
                raised: self.snapshot.dialogue_priority(),
            },
            layout.bezel,
        );

        self.page = Some(cv::page_layout(layout.screen));
        self.bubbles = dialogue::bubble_areas(layout.bezel, &self.snapshot.bubbles);

        frame.render_widget(self.status_line(), status);
    }

    fn status_line(&self) -> Paragraph<'static> {
        let right = match (&self.status, &self.snapshot.scene) {
            (Some(err), _) => Span::styled(format!(" {err} "), Style::default().fg(Color::Red)),
            (None, Some(scene)) => Span::raw(format!(
                " {scene} #{} ",
                self.snapshot.step_index.unwrap_or_default()
            )),
            (None, None) => Span::raw(" idle "),
        };
        Paragraph::new(Line::from(vec![Span::raw(STATUS_HINT), Span::raw("  "), right]))
            .style(Style::default().fg(Color::Black).bg(Color::White))
    }
}

impl Renderer for TuiApp {
    fn render(&mut self, snapshot: &EngineSnapshot) {
        self.snapshot = snapshot.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{Alignment, Scene, ScriptRegistry, Step};
    use cs_engine::EngineConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn registry() -> ScriptRegistry {
        let scenes = ["workHistory", "education", "contact"].map(|name| {
            Scene::new(
                name,
                vec![
                    Step::dialogue("MANAGER", "tell me more", Alignment::Right),
                    Step::complete(),
                ],
            )
            .unwrap()
        });
        ScriptRegistry::from_scenes(scenes).unwrap()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn clicking_a_section_starts_its_scene() {
        let handle = EngineHandle::spawn(registry(), EngineConfig::default().with_seed(1));
        let mut app = TuiApp::new(handle);
        let mut cv = EngineSnapshot::default();
        cv.variables.set("isMonitorOn", true);
        cv.variables.set("showCVContent", true);
        app.render(&cv);

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        assert!(screen_text(&terminal).contains("Education"));
        assert!(screen_text(&terminal).contains(" idle "));

        let (_, area) = app.page.unwrap().sections[1];
        let action = app.click_action(area.x, area.y).unwrap();
        assert_eq!(
            action,
            Action::Engine(InputEvent::Trigger("education".into()))
        );

        app.handle_action(action).await;
        assert_eq!(app.snapshot.scene.as_deref(), Some("education"));
        assert!(app.status.is_none());

        terminal.draw(|frame| app.draw(frame)).unwrap();
        assert!(screen_text(&terminal).contains("MANAGER"));
        assert!(screen_text(&terminal).contains("education #0"));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_scene_lands_in_status() {
        let handle = EngineHandle::spawn(registry(), EngineConfig::default());
        let mut app = TuiApp::new(handle);
        app.handle_action(Action::Engine(InputEvent::Trigger("nope".into())))
            .await;
        assert_eq!(app.status.as_deref(), Some("scene not found: \"nope\""));
    }

    #[tokio::test(start_paused = true)]
    async fn quit_and_resize() {
        let handle = EngineHandle::spawn(registry(), EngineConfig::default());
        let mut app = TuiApp::new(handle);
        assert_eq!(app.click_action(0, 0), None);

        app.resize(120, 50).await;
        assert_eq!(app.bridge().viewport().map(|v| v.width), Some(120));

        app.handle_action(Action::Quit).await;
        assert!(app.should_quit);
    }
}
