use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_SAMPLING_BIAS: f32 = 0.7;
pub const DEFAULT_RECURRENCE_STEPS: u32 = 4;

/// Generation options sent with every submission.
///
/// These are fixed for the lifetime of a client rather than chosen per call.
/// On the wire they travel as `max_tokens`, `alpha` and `recurrence`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub max_tokens: u32,
    pub sampling_bias: f32,
    pub recurrence_steps: u32,
}

impl GenerationParameters {
    pub fn new(max_tokens: u32, sampling_bias: f32, recurrence_steps: u32) -> Self {
        Self {
            max_tokens,
            sampling_bias,
            recurrence_steps,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_sampling_bias(mut self, sampling_bias: f32) -> Self {
        self.sampling_bias = sampling_bias;
        self
    }

    pub fn with_recurrence_steps(mut self, recurrence_steps: u32) -> Self {
        self.recurrence_steps = recurrence_steps;
        self
    }
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_TOKENS,
            DEFAULT_SAMPLING_BIAS,
            DEFAULT_RECURRENCE_STEPS,
        )
    }
}
