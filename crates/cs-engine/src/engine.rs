//! The async playback actor.
//!
//! [`PlaybackEngine`] owns a [`Controller`] and is the only place playback
//! state is mutated. Commands arrive over an `mpsc` queue, step effects run
//! as spawned timer tasks that report back over a second queue, and every
//! change is published as an [`EngineSnapshot`] on a `watch` channel.

use std::time::Duration;

use cs_core::ScriptRegistry;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::controller::Controller;
use crate::error::EngineResult;
use crate::interpreter::{Effect, Pending};
use crate::snapshot::EngineSnapshot;
use crate::state::Ticket;

/// Commands accepted by the engine, each with a reply channel.
#[derive(Debug)]
pub(crate) enum EngineCommand {
    Trigger {
        scene: String,
        response: oneshot::Sender<EngineResult<()>>,
    },
    Proceed {
        response: oneshot::Sender<EngineResult<()>>,
    },
    SkipInput {
        response: oneshot::Sender<EngineResult<()>>,
    },
    Restart {
        response: oneshot::Sender<EngineResult<()>>,
    },
}

/// Progress reports from effect tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EffectEvent {
    Reveal(Ticket),
    Resolved(Ticket),
}

/// The playback actor. Create one through
/// [`EngineHandle::spawn`](crate::EngineHandle::spawn).
pub struct PlaybackEngine {
    controller: Controller,
    type_interval: Duration,
    state_tx: watch::Sender<EngineSnapshot>,
    events_tx: mpsc::UnboundedSender<EffectEvent>,
    effect: Option<(Ticket, CancellationToken)>,
    version: u64,
}

impl PlaybackEngine {
    pub(crate) fn new(
        registry: ScriptRegistry,
        config: &EngineConfig,
        events_tx: mpsc::UnboundedSender<EffectEvent>,
    ) -> Self {
        let controller = Controller::new(registry, config);
        let (state_tx, _) = watch::channel(controller.snapshot(0));
        info!(scenes = controller.registry().len(), "PlaybackEngine created");
        Self {
            controller,
            type_interval: config.type_interval,
            state_tx,
            events_tx,
            effect: None,
            version: 0,
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.state_tx.subscribe()
    }

    pub(crate) async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<EngineCommand>,
        mut events_rx: mpsc::UnboundedReceiver<EffectEvent>,
        cancel: CancellationToken,
    ) {
        info!("Playback engine started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Playback engine cancelled");
                    break;
                }

                cmd = command_rx.recv() => match cmd {
                    Some(cmd) => {
                        let (response, result) = self.handle_command(cmd);
                        // Publish first so the caller sees the new state.
                        self.publish();
                        let _ = response.send(result);
                    }
                    None => {
                        debug!("all engine handles dropped");
                        break;
                    }
                },

                Some(event) = events_rx.recv() => {
                    self.handle_event(event);
                    self.publish();
                }
            }
        }

        self.cancel_effect();
    }

    fn handle_command(
        &mut self,
        cmd: EngineCommand,
    ) -> (oneshot::Sender<EngineResult<()>>, EngineResult<()>) {
        let (response, result) = match cmd {
            EngineCommand::Trigger { scene, response } => (response, self.controller.trigger(&scene)),
            EngineCommand::Proceed { response } => (response, self.controller.proceed()),
            EngineCommand::SkipInput { response } => (response, self.controller.skip_input()),
            EngineCommand::Restart { response } => (response, self.controller.restart()),
        };
        (response, self.schedule(result))
    }

    fn handle_event(&mut self, event: EffectEvent) {
        match event {
            EffectEvent::Reveal(ticket) => {
                self.controller.reveal(ticket);
            }
            EffectEvent::Resolved(ticket) => {
                let result = self.controller.resolve(ticket);
                // Aborted chains are logged by the controller; nobody awaits them.
                let _ = self.schedule(result);
            }
        }
    }

    /// Stop the effect task if the controller moved past it, then start the
    /// new one.
    fn schedule(&mut self, result: EngineResult<Option<Pending>>) -> EngineResult<()> {
        let stale = self
            .effect
            .as_ref()
            .is_some_and(|(ticket, _)| !self.controller.state().is_current(*ticket));
        if stale {
            self.cancel_effect();
        }

        if let Some(pending) = result? {
            self.spawn_effect(pending);
        }
        Ok(())
    }

    fn spawn_effect(&mut self, pending: Pending) {
        self.cancel_effect();
        let token = CancellationToken::new();
        tokio::spawn(run_effect(
            pending,
            self.type_interval,
            self.events_tx.clone(),
            token.clone(),
        ));
        self.effect = Some((pending.ticket, token));
    }

    fn cancel_effect(&mut self) {
        if let Some((ticket, token)) = self.effect.take() {
            debug!(%ticket, "effect task cancelled");
            token.cancel();
        }
    }

    fn publish(&mut self) {
        let mut next = self.controller.snapshot(self.version);
        if *self.state_tx.borrow() == next {
            return;
        }
        self.version += 1;
        next.version = self.version;
        self.state_tx.send_replace(next);
    }
}

/// Wait out one effect, reporting reveal ticks and completion.
async fn run_effect(
    pending: Pending,
    type_interval: Duration,
    events: mpsc::UnboundedSender<EffectEvent>,
    cancel: CancellationToken,
) {
    let Pending { ticket, effect } = pending;
    match effect {
        Effect::Type { chars } => {
            for _ in 0..chars {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(type_interval) => {}
                }
                if events.send(EffectEvent::Reveal(ticket)).is_err() {
                    return;
                }
            }
        }
        Effect::Delay(duration) | Effect::Settle(duration) => {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(duration) => {}
            }
        }
        Effect::Immediate => {}
    }
    let _ = events.send(EffectEvent::Resolved(ticket));
}
