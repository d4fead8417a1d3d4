//! Terminal setup, teardown, and main event loop.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use cs_core::ScriptRegistry;
use cs_engine::{EngineConfig, EngineError, EngineHandle, InputEvent, Renderer};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::app::TuiApp;
use crate::input::Action;

/// Frame interval for the loading animation.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(120);

const INPUT_POLL: Duration = Duration::from_millis(50);

/// Launch the renderer and start `scene`.
pub async fn run(registry: ScriptRegistry, scene: &str) -> Result<(), String> {
    if !registry.contains(scene) {
        return Err(EngineError::SceneNotFound(scene.to_string()).to_string());
    }

    let handle = EngineHandle::spawn(registry, EngineConfig::default());
    let mut app = TuiApp::new(handle.clone());

    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let result = run_loop(&mut terminal, &mut app, scene).await;

    handle.shutdown().await;
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

/// Main event loop.
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
    scene: &str,
) -> Result<(), String> {
    let size = terminal.size().map_err(|e| format!("terminal error: {e}"))?;
    app.resize(size.width, size.height).await;
    app.handle_action(Action::Engine(InputEvent::Trigger(scene.to_string())))
        .await;

    let mut snapshots = app.bridge().handle().subscribe();
    let cancel = CancellationToken::new();
    let (events_tx, mut events_rx) = mpsc::channel(64);
    let reader = {
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || read_events(&events_tx, &cancel))
    };

    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(format!("draw error: {e}"));
        }
        if app.should_quit {
            break Ok(());
        }

        tokio::select! {
            event = events_rx.recv() => match event {
                Some(Ok(event)) => handle_event(app, event).await,
                Some(Err(e)) => break Err(format!("event error: {e}")),
                None => break Ok(()),
            },
            Ok(()) = snapshots.changed() => {
                let snapshot = snapshots.borrow_and_update().clone();
                app.render(&snapshot);
            }
            _ = frames.tick() => app.on_tick(),
        }
    };

    cancel.cancel();
    reader.await.ok();
    info!("renderer stopped");
    result
}

/// Read crossterm events on a blocking thread until cancelled.
fn read_events(tx: &mpsc::Sender<io::Result<Event>>, cancel: &CancellationToken) {
    while !cancel.is_cancelled() {
        match event::poll(INPUT_POLL) {
            Ok(false) => {}
            Ok(true) => {
                let event = event::read();
                let failed = event.is_err();
                if tx.blocking_send(event).is_err() || failed {
                    return;
                }
            }
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                return;
            }
        }
    }
    debug!("input reader cancelled");
}

/// Handle a crossterm event.
async fn handle_event(app: &mut TuiApp, event: Event) {
    let action = match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => app.key_action(key),
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            app.click_action(mouse.column, mouse.row)
        }
        Event::Resize(width, height) => {
            app.resize(width, height).await;
            None
        }
        _ => None,
    };
    if let Some(action) = action {
        app.handle_action(action).await;
    }
}
