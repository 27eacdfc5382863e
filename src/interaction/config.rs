/// Tunables for [`InteractionManager`](super::InteractionManager).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// Update hover highlighting on pointer moves while no drag is active.
    pub hover_enabled: bool,
    /// Longest step a single `tick` may advance spring-back animations by.
    pub max_tick_ms: f32,
    /// Upper bound on queued listener commands applied per public call.
    pub max_command_rounds: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hover_enabled: true,
            max_tick_ms: 100.0,
            max_command_rounds: 32,
        }
    }
}

impl InteractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hover(mut self, enabled: bool) -> Self {
        self.hover_enabled = enabled;
        self
    }

    pub fn with_max_tick_ms(mut self, max_tick_ms: f32) -> Self {
        self.max_tick_ms = max_tick_ms;
        self
    }

    pub fn with_max_command_rounds(mut self, rounds: usize) -> Self {
        self.max_command_rounds = rounds;
        self
    }

    /// Clamps a host-supplied frame time to `[0, max_tick_ms]`.
    pub fn clamp_tick(&self, dt_ms: f32) -> f32 {
        if dt_ms.is_finite() {
            dt_ms.clamp(0.0, self.max_tick_ms.max(0.0))
        } else {
            0.0
        }
    }
}
