use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

pub const MIN_BRUSH_SIZE: f32 = 0.05;
pub const MAX_BRUSH_SIZE: f32 = 1.0;

/// Range and skew of generated prize amounts.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrizeConfig {
    pub min: u32,
    pub max: u32,
    pub exponent: f32,
}

impl Default for PrizeConfig {
    fn default() -> Self {
        Self {
            min: 1,
            max: 150_000,
            exponent: 20.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketConfig {
    /// Brush radius in world units, converted per surface so every texture scratches alike.
    pub brush_size_world: f32,
    pub scratch_threshold: f32,
    /// Player cells that must be revealed before the round can settle.
    pub required_cells: u32,
    /// Pause before announcing settlement, lets animations finish.
    pub settle_delay_secs: f32,
    /// Length of the strike-through animation when a row card is matched.
    pub removal_animation_secs: f32,
    pub prize: PrizeConfig,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            brush_size_world: 0.2,
            scratch_threshold: DEFAULT_SCRATCH_THRESHOLD,
            required_cells: 33,
            settle_delay_secs: 2.0,
            removal_animation_secs: 1.0,
            prize: PrizeConfig::default(),
        }
    }
}

impl TicketConfig {
    /// Checks ranges and clamps the brush into its supported size.
    pub fn validate(mut self) -> Result<Self> {
        let invalid = |msg: &str| Err(GameError::InvalidConfig(msg.into()));

        if !self.brush_size_world.is_finite() {
            return invalid("brush_size_world must be finite");
        }
        self.brush_size_world = self.brush_size_world.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);

        if !(self.scratch_threshold > 0.0 && self.scratch_threshold <= 1.0) {
            return invalid("scratch_threshold must be within (0, 1]");
        }
        if self.required_cells == 0 {
            return invalid("required_cells must be at least 1");
        }
        for secs in [self.settle_delay_secs, self.removal_animation_secs] {
            if Duration::try_from_secs_f32(secs).is_err() {
                return invalid("delays must be finite and non-negative");
            }
        }
        if self.prize.min > self.prize.max {
            return invalid("prize.min must not exceed prize.max");
        }
        if !(self.prize.exponent.is_finite() && self.prize.exponent > 0.0) {
            return invalid("prize.exponent must be positive");
        }
        Ok(self)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::try_from_secs_f32(self.settle_delay_secs).unwrap_or_default()
    }

    pub fn removal_animation(&self) -> Duration {
        Duration::try_from_secs_f32(self.removal_animation_secs).unwrap_or_default()
    }
}
