use serde::{Deserialize, Serialize};

use crate::*;

/// Default fraction of a cell that must be scratched before it counts as revealed.
pub const DEFAULT_SCRATCH_THRESHOLD: f32 = 0.5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Unrevealed,
    Revealed,
}

/// What a cell means to the rest of the ticket once it is revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellRole {
    /// Player card; revealing it strikes matching cards off every row.
    Card(Card),
    /// Prize amount for a row.
    Prize(RowId),
}

/// Result of offering one mask update to a cell.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellOutcome {
    /// Different surface, no overlap, or already revealed.
    Ignored,
    /// Sampled but still below the threshold.
    Sampled(f32),
    /// Crossed the threshold on this update.
    Revealed(f32),
}

/// Watches one rectangle of a mask and flips to revealed exactly once per round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellWatcher {
    surface: SurfaceId,
    bounds: Bounds,
    threshold: f32,
    role: CellRole,
    state: CellState,
}

impl CellWatcher {
    pub fn new(surface: SurfaceId, bounds: Bounds, role: CellRole) -> Self {
        Self {
            surface,
            bounds,
            threshold: DEFAULT_SCRATCH_THRESHOLD,
            role,
            state: CellState::Unrevealed,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn role(&self) -> CellRole {
        self.role
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    /// Fraction of this cell that `mask` shows as scratched.
    pub fn coverage(&self, mask: &ScratchMask, mask_bounds: &Bounds) -> Coverage {
        let rect = PixelRect::project(&self.bounds, mask_bounds, mask.size());
        mask.coverage(rect)
    }

    pub fn observe(&mut self, update: &MaskUpdate<'_>) -> CellOutcome {
        if self.is_revealed()
            || update.surface != self.surface
            || !self.bounds.intersects(&update.bounds)
        {
            return CellOutcome::Ignored;
        }

        let ratio = self.coverage(update.mask, &update.bounds).ratio();
        if ratio >= self.threshold {
            self.state = CellState::Revealed;
            log::debug!("cell {:?} revealed at {:.2}", self.role, ratio);
            CellOutcome::Revealed(ratio)
        } else {
            CellOutcome::Sampled(ratio)
        }
    }

    pub fn reset(&mut self) {
        self.state = CellState::Unrevealed;
    }
}
