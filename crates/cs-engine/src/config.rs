//! Configuration for the playback engine.

use std::time::Duration;

/// Delay between two revealed characters of a dialogue bubble.
pub const TYPE_INTERVAL: Duration = Duration::from_millis(20);

/// Pause after bubbles are cleared so exit animations can finish.
pub const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Configuration for a playback engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Delay between revealed characters.
    pub type_interval: Duration,
    /// Pause after a `Reset` or `Complete` clears the bubbles.
    pub settle_delay: Duration,
    /// Scale applied to scripted `Delay` durations (1.0 plays them as written).
    pub delay_scale: f64,
    /// RNG seed for reproducible bubble ids; entropy when `None`.
    pub seed: Option<u64>,
    /// Capacity of the engine's command queue.
    pub command_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            type_interval: TYPE_INTERVAL,
            settle_delay: SETTLE_DELAY,
            delay_scale: 1.0,
            seed: None,
            command_buffer: 32,
        }
    }
}

impl EngineConfig {
    /// A configuration where every timer fires immediately.
    pub fn instant() -> Self {
        Self::default()
            .with_type_interval(Duration::ZERO)
            .with_settle_delay(Duration::ZERO)
            .with_delay_scale(0.0)
    }

    /// Set the typing interval.
    pub fn with_type_interval(mut self, interval: Duration) -> Self {
        self.type_interval = interval;
        self
    }

    /// Set the settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the scripted delay scale (clamped to be non-negative).
    pub fn with_delay_scale(mut self, scale: f64) -> Self {
        self.delay_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the command queue capacity (at least 1).
    pub fn with_command_buffer(mut self, capacity: usize) -> Self {
        self.command_buffer = capacity.max(1);
        self
    }

    /// How long a scripted delay of `duration` actually waits.
    pub fn scaled_delay(&self, duration: Duration) -> Duration {
        if self.delay_scale == 1.0 {
            return duration;
        }
        duration.mul_f64(self.delay_scale)
    }
}
