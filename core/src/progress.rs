use serde::{Deserialize, Serialize};

/// Round-wide counters deciding when a ticket is done.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    completed_cells: u32,
    required_cells: u32,
    pending_prizes: u32,
    finished: bool,
}

impl GameProgress {
    pub fn new(required_cells: u32) -> Self {
        Self {
            required_cells,
            ..Default::default()
        }
    }

    pub fn completed_cells(&self) -> u32 {
        self.completed_cells
    }

    pub fn required_cells(&self) -> u32 {
        self.required_cells
    }

    pub fn pending_prizes(&self) -> u32 {
        self.pending_prizes
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether settlement may start now.
    pub fn is_settleable(&self) -> bool {
        self.finished && self.pending_prizes == 0
    }

    /// Counts one revealed player cell, returns `true` on the call that finishes the round.
    pub fn cell_completed(&mut self) -> bool {
        self.completed_cells += 1;
        if self.completed_cells >= self.required_cells && !self.finished {
            self.finished = true;
            log::debug!(
                "all {} cells complete, {} prize(s) pending",
                self.required_cells,
                self.pending_prizes
            );
            return true;
        }
        false
    }

    pub fn prize_pending(&mut self) {
        self.pending_prizes += 1;
    }

    pub fn prize_collected(&mut self) {
        self.pending_prizes = self.pending_prizes.saturating_sub(1);
    }

    /// Closes the round if nothing is pending, resetting the counters for the next one.
    pub fn settle(&mut self) -> bool {
        if !self.is_settleable() {
            return false;
        }
        self.completed_cells = 0;
        self.finished = false;
        true
    }

    pub fn reset(&mut self, required_cells: u32) {
        *self = Self::new(required_cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishes_exactly_once() {
        let mut progress = GameProgress::new(2);

        assert!(!progress.cell_completed());
        assert!(progress.cell_completed());
        assert!(!progress.cell_completed());
        assert!(progress.is_finished());
    }

    #[test]
    fn settlement_waits_for_pending_prizes() {
        let mut progress = GameProgress::new(33);
        progress.prize_pending();
        progress.prize_pending();
        for _ in 0..33 {
            progress.cell_completed();
        }

        assert!(progress.is_finished());
        assert!(!progress.settle());
        progress.prize_collected();
        assert!(!progress.settle());
        progress.prize_collected();
        assert!(progress.settle());

        assert_eq!(progress.completed_cells(), 0);
        assert!(!progress.is_finished());
        assert!(!progress.settle());
    }

    #[test]
    fn collected_never_underflows() {
        let mut progress = GameProgress::new(1);
        progress.prize_collected();

        assert_eq!(progress.pending_prizes(), 0);
    }
}
