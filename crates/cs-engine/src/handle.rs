//! A cloneable handle for driving a running engine task.

use std::sync::Arc;

use cs_core::ScriptRegistry;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::EngineConfig;
use crate::engine::{EngineCommand, PlaybackEngine};
use crate::error::{EngineError, EngineResult};
use crate::snapshot::EngineSnapshot;

/// Cloneable façade over a running [`PlaybackEngine`].
#[derive(Debug, Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<EngineCommand>,
    state_rx: watch::Receiver<EngineSnapshot>,
    task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
    cancel_token: CancellationToken,
}

impl EngineHandle {
    /// Spawn an engine on the current tokio runtime.
    pub fn spawn(registry: ScriptRegistry, config: EngineConfig) -> Self {
        let cancel_token = CancellationToken::new();
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let engine = PlaybackEngine::new(registry, &config, events_tx);
        let state_rx = engine.subscribe();
        let task_handle = tokio::spawn(engine.run(command_rx, events_rx, cancel_token.clone()));

        info!("EngineHandle created");

        Self {
            command_tx,
            state_rx,
            task_handle: Arc::new(Mutex::new(Some(task_handle))),
            cancel_token,
        }
    }

    async fn send(
        &self,
        make: impl FnOnce(oneshot::Sender<EngineResult<()>>) -> EngineCommand,
    ) -> EngineResult<()> {
        let (tx, rx) = oneshot::channel();
        self.command_tx
            .send(make(tx))
            .await
            .map_err(|_| EngineError::EngineUnavailable)?;
        rx.await.map_err(|_| EngineError::EngineUnavailable)?
    }

    /// Start a scene. Ignored while another scene plays.
    pub async fn trigger(&self, scene: impl Into<String>) -> EngineResult<()> {
        let scene = scene.into();
        self.send(|response| EngineCommand::Trigger { scene, response })
            .await
    }

    /// Leave the current step.
    pub async fn proceed(&self) -> EngineResult<()> {
        self.send(|response| EngineCommand::Proceed { response })
            .await
    }

    /// Confirm input: proceeds only when the current step allows it.
    pub async fn skip_input(&self) -> EngineResult<()> {
        self.send(|response| EngineCommand::SkipInput { response })
            .await
    }

    /// Restart the playing scene from its first step.
    pub async fn restart(&self) -> EngineResult<()> {
        self.send(|response| EngineCommand::Restart { response })
            .await
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.state_rx.borrow().clone()
    }

    /// A receiver notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.state_rx.clone()
    }

    /// Whether the engine task still accepts commands.
    pub fn is_running(&self) -> bool {
        !self.command_tx.is_closed()
    }

    /// Stop the engine and wait for its task to end.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.task_handle.lock().await.take() {
            let _ = handle.await;
        }
    }
}
