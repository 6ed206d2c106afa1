use serde::{Deserialize, Serialize};

use crate::*;

/// The two independent signals a row prize waits for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeState {
    pub declared_winner: bool,
    pub fully_scratched: bool,
    pub paid: bool,
}

impl PrizeState {
    /// Won but the prize cell has not been scratched yet.
    pub fn is_pending(&self) -> bool {
        self.declared_winner && !self.fully_scratched
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrizeOutcome {
    /// Repeated signal, nothing changed.
    Ignored,
    /// Scratched, row not won (yet).
    Waiting,
    /// Won, payout deferred until the prize cell is scratched.
    Deferred,
    /// Paid the parsed amount.
    Paid(u64),
    /// Settled, but the prize text did not parse so nothing was credited.
    Unpaid,
}

/// Running total shown to the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winnings {
    total: u64,
    display: String,
}

impl Winnings {
    pub fn new(format: &dyn CurrencyFormat) -> Self {
        Self {
            total: 0,
            display: format.format(0),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn credit(&mut self, amount: u64, format: &dyn CurrencyFormat) -> &str {
        self.total = self.total.saturating_add(amount);
        self.display = format.format(self.total);
        &self.display
    }
}

/// Collaborators a prize touches when it settles.
pub struct PrizeLedger<'a> {
    pub progress: &'a mut GameProgress,
    pub winnings: &'a mut Winnings,
    pub format: &'a dyn CurrencyFormat,
}

/// Prize for one row; pays once both the win and the scratch have happened, in either order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeTracker {
    label: String,
    state: PrizeState,
}

impl PrizeTracker {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: PrizeState::default(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn state(&self) -> PrizeState {
        self.state
    }

    pub fn declare_winner(&mut self, ledger: &mut PrizeLedger<'_>) -> PrizeOutcome {
        if self.state.declared_winner {
            return PrizeOutcome::Ignored;
        }
        self.state.declared_winner = true;

        if self.state.fully_scratched {
            self.pay(ledger)
        } else {
            ledger.progress.prize_pending();
            PrizeOutcome::Deferred
        }
    }

    pub fn notify_fully_scratched(&mut self, ledger: &mut PrizeLedger<'_>) -> PrizeOutcome {
        if self.state.fully_scratched {
            return PrizeOutcome::Ignored;
        }
        self.state.fully_scratched = true;

        if self.state.declared_winner {
            let outcome = self.pay(ledger);
            ledger.progress.prize_collected();
            outcome
        } else {
            PrizeOutcome::Waiting
        }
    }

    fn pay(&mut self, ledger: &mut PrizeLedger<'_>) -> PrizeOutcome {
        if self.state.paid {
            return PrizeOutcome::Ignored;
        }
        self.state.paid = true;

        match ledger.format.parse(&self.label) {
            Ok(amount) => {
                let display = ledger.winnings.credit(amount, ledger.format);
                log::debug!("paid {} ({}), winnings now {}", amount, self.label, display);
                PrizeOutcome::Paid(amount)
            }
            Err(err) => {
                log::error!("prize not credited: {err}");
                PrizeOutcome::Unpaid
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = PrizeState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        progress: GameProgress,
        winnings: Winnings,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                progress: GameProgress::new(1),
                winnings: Winnings::new(&Dollars),
            }
        }

        fn ledger(&mut self) -> PrizeLedger<'_> {
            PrizeLedger {
                progress: &mut self.progress,
                winnings: &mut self.winnings,
                format: &Dollars,
            }
        }
    }

    #[test]
    fn win_then_scratch_pays_once() {
        let mut fx = Fixture::new();
        let mut prize = PrizeTracker::new("$2k");

        assert_eq!(prize.declare_winner(&mut fx.ledger()), PrizeOutcome::Deferred);
        assert_eq!(fx.progress.pending_prizes(), 1);
        assert!(prize.state().is_pending());

        assert_eq!(
            prize.notify_fully_scratched(&mut fx.ledger()),
            PrizeOutcome::Paid(2000)
        );
        assert_eq!(fx.progress.pending_prizes(), 0);
        assert_eq!(fx.winnings.display(), "$2,000");

        assert_eq!(prize.declare_winner(&mut fx.ledger()), PrizeOutcome::Ignored);
        assert_eq!(
            prize.notify_fully_scratched(&mut fx.ledger()),
            PrizeOutcome::Ignored
        );
        assert_eq!(fx.winnings.total(), 2000);
    }

    #[test]
    fn scratch_then_win_pays_once_without_pending() {
        let mut fx = Fixture::new();
        let mut prize = PrizeTracker::new("$150");

        assert_eq!(
            prize.notify_fully_scratched(&mut fx.ledger()),
            PrizeOutcome::Waiting
        );
        assert_eq!(prize.declare_winner(&mut fx.ledger()), PrizeOutcome::Paid(150));
        assert_eq!(fx.progress.pending_prizes(), 0);

        assert_eq!(prize.declare_winner(&mut fx.ledger()), PrizeOutcome::Ignored);
        assert_eq!(fx.winnings.total(), 150);
        assert!(prize.state().paid);
    }

    #[test]
    fn malformed_label_settles_without_credit() {
        let mut fx = Fixture::new();
        let mut prize = PrizeTracker::new("free spin");

        prize.declare_winner(&mut fx.ledger());
        assert_eq!(
            prize.notify_fully_scratched(&mut fx.ledger()),
            PrizeOutcome::Unpaid
        );
        assert_eq!(fx.progress.pending_prizes(), 0);
        assert_eq!(fx.winnings.total(), 0);
        assert_eq!(fx.winnings.display(), "$0");
    }

    #[test]
    fn reset_allows_another_payout() {
        let mut fx = Fixture::new();
        let mut prize = PrizeTracker::new("$5");
        prize.notify_fully_scratched(&mut fx.ledger());
        prize.declare_winner(&mut fx.ledger());

        prize.reset();
        assert_eq!(prize.state(), PrizeState::default());
        prize.notify_fully_scratched(&mut fx.ledger());
        prize.declare_winner(&mut fx.ledger());

        assert_eq!(fx.winnings.total(), 10);
    }
}
