//! The playback controller: a synchronous state machine over
//! {Idle, Running(session)}.
//!
//! Every entry point returns the [`Pending`] effect the new current step is
//! waiting on, if any. Whoever drives the controller runs that effect and
//! reports back through [`Controller::reveal`] and [`Controller::resolve`]
//! with the effect's ticket. The async engine does this with spawned timer
//! tasks; tests and the headless player do it by hand.

use std::sync::Arc;

use cs_core::{ScriptRegistry, StepKind};
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::interpreter::{Effect, Interpreter, Pending};
use crate::snapshot::EngineSnapshot;
use crate::state::{EngineState, Ticket};

/// Owns the playback state and sequences step execution.
#[derive(Debug)]
pub struct Controller {
    registry: ScriptRegistry,
    interpreter: Interpreter,
    state: EngineState,
}

impl Controller {
    /// Create an idle controller over `registry`.
    pub fn new(registry: ScriptRegistry, config: &EngineConfig) -> Self {
        Self {
            registry,
            interpreter: Interpreter::new(config),
            state: EngineState::new(),
        }
    }

    /// The scene registry.
    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    /// The playback state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Capture the state for renderers.
    pub fn snapshot(&self, version: u64) -> EngineSnapshot {
        EngineSnapshot::capture(&self.state, version)
    }

    /// Start `name` at step 0. A no-op while another scene plays.
    pub fn trigger(&mut self, name: &str) -> EngineResult<Option<Pending>> {
        if let Some(session) = self.state.session() {
            warn!(
                requested = name,
                active = session.scene().name(),
                "trigger ignored, a scene is already playing"
            );
            return Ok(None);
        }

        let scene = self.registry.get_scene(name)?;
        info!(scene = name, steps = scene.len(), "scene started");
        // A settle left by the previous scene's COMPLETE must not reach this one.
        if let Some(ticket) = self.state.cancel_effect() {
            debug!(%ticket, "previous scene's effect dropped");
        }
        self.state.start_session(scene);
        self.begin()
    }

    /// Leave the current step and execute the next one. A no-op when idle.
    ///
    /// The step's running effect is cancelled; an unfinished typing
    /// animation shows its full text.
    pub fn proceed(&mut self) -> EngineResult<Option<Pending>> {
        if !self.state.is_active() {
            debug!("proceed ignored, no scene playing");
            return Ok(None);
        }
        self.leave_step();
        self.begin()
    }

    /// Handle confirm input: proceed if the current step is skippable, or
    /// if it is a dialogue that finished typing. Otherwise ignored.
    pub fn skip_input(&mut self) -> EngineResult<Option<Pending>> {
        let Some(step) = self.state.current_step() else {
            debug!("skip input ignored, no scene playing");
            return Ok(None);
        };

        let kind = step.kind();
        let honored = step.skippable || (kind == StepKind::Dialogue && !self.state.is_typing());
        if !honored {
            debug!(kind = %kind, "skip input ignored");
            return Ok(None);
        }
        if kind == StepKind::Delay {
            debug!("delay cut short by skip input");
        }
        self.proceed()
    }

    /// Abort the playing scene and start it again from step 0. A no-op when
    /// idle.
    pub fn restart(&mut self) -> EngineResult<Option<Pending>> {
        let Some(session) = self.state.session() else {
            debug!("restart ignored, no scene playing");
            return Ok(None);
        };

        let name = session.scene().name().to_string();
        info!(scene = %name, step = session.cursor(), "scene restarted");
        self.clear_playback();
        self.trigger(&name)
    }

    /// Reveal the next character of the typing bubble. Returns whether
    /// anything changed.
    pub fn reveal(&mut self, ticket: Ticket) -> bool {
        if !self.state.is_current(ticket) || !self.state.is_typing() {
            debug!(%ticket, "stale reveal ignored");
            return false;
        }
        self.state
            .last_bubble_mut()
            .is_some_and(|bubble| bubble.reveal_next())
    }

    /// Mark the effect with `ticket` as finished, auto-advancing if the step
    /// asks for it. Stale tickets are ignored.
    pub fn resolve(&mut self, ticket: Ticket) -> EngineResult<Option<Pending>> {
        let Some(resolved) = self.state.finish_effect(ticket) else {
            debug!(%ticket, "stale completion ignored");
            return Ok(None);
        };

        if resolved.typing {
            self.state.complete_typing();
        }
        if resolved.auto_advance {
            return self.proceed();
        }
        Ok(None)
    }

    /// Execute steps from the cursor until one has an effect to wait on or
    /// waits for input.
    fn begin(&mut self) -> EngineResult<Option<Pending>> {
        loop {
            let Some(session) = self.state.session() else {
                return Ok(None);
            };
            let scene = Arc::clone(session.scene());
            let index = session.cursor();

            let Some(step) = scene.step(index) else {
                let err = EngineError::CursorOverrun {
                    scene: scene.name().to_string(),
                    index,
                };
                error!(scene = scene.name(), index, "cursor overran the scene, aborting");
                self.clear_playback();
                return Err(err);
            };

            debug!(scene = scene.name(), index, kind = %step.kind(), "executing step");
            let effect = self.interpreter.execute(step, &mut self.state);
            if step.is_complete() {
                info!(scene = scene.name(), "scene complete");
            }

            if effect != Effect::Immediate {
                let typing = matches!(effect, Effect::Type { .. });
                let ticket = self.state.start_effect(step.auto_advance, typing);
                return Ok(Some(Pending { ticket, effect }));
            }
            if !step.auto_advance || !self.state.is_active() {
                return Ok(None);
            }
            self.leave_step();
        }
    }

    fn leave_step(&mut self) {
        let leaving_dialogue = self
            .state
            .current_step()
            .is_some_and(|s| s.kind() == StepKind::Dialogue);

        if let Some(ticket) = self.state.cancel_effect() {
            debug!(%ticket, "effect cancelled");
        }
        if leaving_dialogue {
            if let Some(bubble) = self.state.last_bubble_mut() {
                bubble.hide_proceed();
            }
        }
        self.state.advance_cursor();
    }

    fn clear_playback(&mut self) {
        self.state.cancel_effect();
        self.state.set_typing(false);
        self.state.clear_bubbles();
        self.state.end_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::{Alignment, DisplayValue, Scene, Step};

    fn controller(scenes: Vec<Scene>) -> Controller {
        let registry = ScriptRegistry::from_scenes(scenes).unwrap();
        Controller::new(registry, &EngineConfig::default().with_seed(3))
    }

    fn greet() -> Scene {
        Scene::new(
            "greet",
            vec![
                Step::dialogue("ENGINEER", "hi", Alignment::Left),
                Step::complete(),
            ],
        )
        .unwrap()
    }

    /// Run a typing effect to the end by hand.
    fn finish_typing(c: &mut Controller, pending: Pending) -> EngineResult<Option<Pending>> {
        let Effect::Type { chars } = pending.effect else {
            panic!("expected typing, got {:?}", pending.effect);
        };
        for _ in 0..chars {
            assert!(c.reveal(pending.ticket));
        }
        c.resolve(pending.ticket)
    }

    #[test]
    fn greet_plays_to_idle() {
        let mut c = controller(vec![greet()]);
        let typing = c.trigger("greet").unwrap().unwrap();
        assert!(c.state().is_typing());
        assert_eq!(c.snapshot(0).current_step, Some(StepKind::Dialogue));

        assert_eq!(finish_typing(&mut c, typing).unwrap(), None);
        assert!(!c.state().is_typing());
        assert_eq!(c.state().bubbles()[0].visible_text(), "hi");
        assert!(c.snapshot(0).can_proceed());

        let settle = c.proceed().unwrap().unwrap();
        assert!(matches!(settle.effect, Effect::Settle(_)));
        assert!(!c.state().is_active());
        assert!(c.state().bubbles().is_empty());
        assert_eq!(c.resolve(settle.ticket).unwrap(), None);
        assert!(!c.snapshot(0).interaction_disabled());
    }

    #[test]
    fn unknown_scene_is_not_found() {
        let mut c = controller(vec![greet()]);
        assert_eq!(
            c.trigger("nope").unwrap_err(),
            EngineError::SceneNotFound("nope".into())
        );
        assert!(!c.state().is_active());
    }

    #[test]
    fn trigger_while_active_is_noop() {
        let other = Scene::new("other", vec![Step::complete()]).unwrap();
        let mut c = controller(vec![greet(), other]);
        let typing = c.trigger("greet").unwrap().unwrap();

        assert_eq!(c.trigger("other").unwrap(), None);
        assert_eq!(c.trigger("greet").unwrap(), None);
        let session = c.state().session().unwrap();
        assert_eq!(session.scene().name(), "greet");
        assert_eq!(session.cursor(), 0);
        assert!(c.state().is_current(typing.ticket));
    }

    #[test]
    fn proceed_when_idle_is_noop() {
        let mut c = controller(vec![greet()]);
        assert_eq!(c.proceed().unwrap(), None);
        assert_eq!(c.skip_input().unwrap(), None);
        assert_eq!(c.restart().unwrap(), None);
    }

    #[test]
    fn auto_chain_stalls_at_manual_step() {
        let scene = Scene::new(
            "chain",
            vec![
                Step::set_value([("a", true)]).with_auto_advance(true),
                Step::set_value([("b", true)]).with_auto_advance(true),
                Step::set_value([("c", true)]),
                Step::complete(),
            ],
        )
        .unwrap();
        let mut c = controller(vec![scene]);
        assert_eq!(c.trigger("chain").unwrap(), None);

        let state = c.state();
        assert_eq!(state.session().unwrap().cursor(), 2);
        assert!(state.is_waiting());
        assert!(state.variables().flag("a"));
        assert!(state.variables().flag("b"));
        assert!(state.variables().flag("c"));
    }

    #[test]
    fn skip_on_delay_advances_once() {
        let scene = Scene::new(
            "boot",
            vec![
                Step::delay(1000).with_skippable(true).with_auto_advance(true),
                Step::dialogue("ENGINEER", "Finally.", Alignment::Right),
                Step::complete(),
            ],
        )
        .unwrap();
        let mut c = controller(vec![scene]);
        let delay = c.trigger("boot").unwrap().unwrap();
        assert_eq!(delay.effect, Effect::Delay(std::time::Duration::from_secs(1)));

        let typing = c.skip_input().unwrap().unwrap();
        assert!(matches!(typing.effect, Effect::Type { chars: 8 }));
        assert_eq!(c.state().session().unwrap().cursor(), 1);

        // The timer firing late must not proceed a second time.
        assert_eq!(c.resolve(delay.ticket).unwrap(), None);
        assert_eq!(c.state().session().unwrap().cursor(), 1);

        // Typing, not skippable: ignored.
        assert_eq!(c.skip_input().unwrap(), None);
        assert_eq!(c.state().session().unwrap().cursor(), 1);
        assert!(c.state().is_current(typing.ticket));
    }

    #[test]
    fn unskippable_delay_ignores_skip() {
        let scene = Scene::new(
            "wait",
            vec![Step::delay(1000).with_auto_advance(true), Step::complete()],
        )
        .unwrap();
        let mut c = controller(vec![scene]);
        let delay = c.trigger("wait").unwrap().unwrap();
        assert_eq!(c.skip_input().unwrap(), None);
        assert!(c.state().is_current(delay.ticket));

        let settle = c.resolve(delay.ticket).unwrap().unwrap();
        assert!(matches!(settle.effect, Effect::Settle(_)));
        assert!(!c.state().is_active());
    }

    #[test]
    fn skip_mid_typing_reveals_full_text() {
        let scene = Scene::new(
            "talk",
            vec![
                Step::dialogue("MANAGER", "MOOOOM!", Alignment::Left).with_skippable(true),
                Step::dialogue("MANAGER'S MOM", "Yes dear?", Alignment::Right),
                Step::complete(),
            ],
        )
        .unwrap();
        let mut c = controller(vec![scene]);
        let first = c.trigger("talk").unwrap().unwrap();
        assert!(c.reveal(first.ticket));
        assert!(c.reveal(first.ticket));

        let second = c.skip_input().unwrap().unwrap();
        let bubbles = c.state().bubbles();
        assert_eq!(bubbles[0].visible_text(), "MOOOOM!");
        assert!(!bubbles[0].proceed_visible);
        assert_eq!(bubbles[1].visible_text(), "");

        // Late ticks of the cancelled animation change nothing.
        assert!(!c.reveal(first.ticket));
        assert_eq!(c.resolve(first.ticket).unwrap(), None);
        assert_eq!(c.state().bubbles()[0].visible_text(), "MOOOOM!");
        assert!(c.state().is_current(second.ticket));
    }

    #[test]
    fn dialogue_done_typing_accepts_skip() {
        let mut c = controller(vec![greet()]);
        let typing = c.trigger("greet").unwrap().unwrap();
        assert_eq!(c.skip_input().unwrap(), None);
        finish_typing(&mut c, typing).unwrap();

        let settle = c.skip_input().unwrap().unwrap();
        assert!(matches!(settle.effect, Effect::Settle(_)));
        assert!(!c.state().is_active());
    }

    #[test]
    fn typing_reveals_exactly_n_ticks() {
        let mut c = controller(vec![greet()]);
        let typing = c.trigger("greet").unwrap().unwrap();
        assert_eq!(typing.effect, Effect::Type { chars: 2 });

        let mut last = 0;
        for _ in 0..2 {
            assert!(c.reveal(typing.ticket));
            let len = c.state().bubbles()[0].revealed();
            assert!(len > last);
            last = len;
        }
        assert!(c.state().is_typing());
        c.resolve(typing.ticket).unwrap();
        assert!(!c.state().is_typing());
        assert_eq!(last, 2);
    }

    #[test]
    fn reset_then_new_dialogue() {
        let scene = Scene::new(
            "clear",
            vec![
                Step::dialogue("ENGINEER", "a", Alignment::Left).with_auto_advance(true),
                Step::reset().with_auto_advance(true),
                Step::dialogue("MANAGER", "b", Alignment::Right),
                Step::complete(),
            ],
        )
        .unwrap();
        let mut c = controller(vec![scene]);
        let first = c.trigger("clear").unwrap().unwrap();
        let settle = finish_typing(&mut c, first).unwrap().unwrap();
        assert!(matches!(settle.effect, Effect::Settle(_)));
        assert!(c.state().bubbles().is_empty());

        let second = c.resolve(settle.ticket).unwrap().unwrap();
        assert!(matches!(second.effect, Effect::Type { chars: 1 }));
        assert_eq!(c.state().bubbles().len(), 1);
        assert_eq!(c.state().bubbles()[0].line.text, "b");
    }

    #[test]
    fn restart_returns_to_step_zero() {
        let scene = Scene::new(
            "loop",
            vec![
                Step::dialogue("ENGINEER", "one", Alignment::Left),
                Step::dialogue("MANAGER", "two", Alignment::Right),
                Step::complete(),
            ],
        )
        .unwrap();
        let mut c = controller(vec![scene]);
        let first = c.trigger("loop").unwrap().unwrap();
        finish_typing(&mut c, first).unwrap();
        let second = c.proceed().unwrap().unwrap();
        assert_eq!(c.state().bubbles().len(), 2);

        let again = c.restart().unwrap().unwrap();
        assert_eq!(c.state().session().unwrap().cursor(), 0);
        assert_eq!(c.state().bubbles().len(), 1);
        assert_eq!(c.state().bubbles()[0].visible_text(), "");
        assert!(!c.reveal(second.ticket));
        assert!(c.state().is_current(again.ticket));
    }

    #[test]
    fn set_value_applies_and_keeps_other_keys() {
        let scene = Scene::new(
            "vars",
            vec![
                Step::set_value([("x", 1_i64), ("y", 2_i64)]).with_auto_advance(true),
                Step::complete(),
            ],
        )
        .unwrap();
        let mut c = controller(vec![scene]);
        c.trigger("vars").unwrap();
        let vars = c.state().variables();
        assert_eq!(vars.get("x"), Some(&DisplayValue::Int(1)));
        assert_eq!(vars.get("y"), Some(&DisplayValue::Int(2)));
        assert!(!c.state().is_active());
    }

    #[test]
    fn empty_dialogue_waits_without_typing() {
        let scene = Scene::new(
            "quiet",
            vec![
                Step::dialogue("ENGINEER", "", Alignment::Left),
                Step::complete(),
            ],
        )
        .unwrap();
        let mut c = controller(vec![scene]);
        assert_eq!(c.trigger("quiet").unwrap(), None);
        assert!(c.state().is_waiting());
        assert!(!c.state().is_typing());
        assert!(c.snapshot(0).can_proceed());
    }

    #[test]
    fn trigger_during_settle_drops_the_old_effect() {
        let first = Scene::new("first", vec![Step::complete().with_auto_advance(true)]).unwrap();
        let second = Scene::new(
            "second",
            vec![
                Step::set_value([("isMonitorOn", true)]),
                Step::dialogue("ENGINEER", "x", Alignment::Left),
                Step::complete(),
            ],
        )
        .unwrap();
        let mut c = controller(vec![first, second]);

        let settle = c.trigger("first").unwrap().unwrap();
        assert!(matches!(settle.effect, Effect::Settle(_)));
        assert!(!c.state().is_active());

        assert_eq!(c.trigger("second").unwrap(), None);
        assert!(c.state().is_waiting());
        assert!(c.snapshot(0).waiting);
        assert!(!c.state().is_current(settle.ticket));

        assert_eq!(c.resolve(settle.ticket).unwrap(), None);
        assert_eq!(c.state().session().unwrap().cursor(), 0);
        assert!(c.state().bubbles().is_empty());
    }
}
