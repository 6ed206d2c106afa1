use core::time::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Where a scratchable cell sits.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellSlot {
    pub surface: SurfaceId,
    pub bounds: Bounds,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowLayout {
    /// Board cards dealt into this row.
    pub card_slots: usize,
    pub prize: CellSlot,
}

/// Everything the visual layer provides about a ticket.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketLayout {
    pub surfaces: Vec<ScratchSurface>,
    /// Player cells, filled from the player deck in order.
    pub card_cells: Vec<CellSlot>,
    pub rows: Vec<RowLayout>,
}

/// Deferred work owned by a ticket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketTask {
    Remove(RowRemoval),
    Settle,
}

impl From<RowRemoval> for TicketTask {
    fn from(removal: RowRemoval) -> Self {
        Self::Remove(removal)
    }
}

/// Things the UI may want to react to, in the order they happened within one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TicketEvent {
    CellRevealed { cell: usize, role: CellRole },
    CardStruck { row: RowId, key: String },
    RowWon(RowId),
    PrizePending(RowId),
    PrizePaid { row: RowId, amount: u64 },
    PrizeUnpaid(RowId),
    WinningsUpdated(String),
    RoundSettled { round: u32 },
}

/// Forwards mask updates to every cell and remembers which ones flipped.
struct CellDispatch<'a> {
    cells: &'a mut [CellWatcher],
    revealed: Vec<usize>,
}

impl MaskObserver for CellDispatch<'_> {
    fn mask_updated(&mut self, update: &MaskUpdate<'_>) {
        for (index, cell) in self.cells.iter_mut().enumerate() {
            if let CellOutcome::Revealed(_) = cell.observe(update) {
                self.revealed.push(index);
            }
        }
    }
}

/// One lottery ticket: masks, cells, rows, prizes and round bookkeeping.
pub struct Ticket<F: CurrencyFormat = Dollars> {
    config: TicketConfig,
    layout: TicketLayout,
    format: F,
    engine: ScratchEngine,
    cells: Vec<CellWatcher>,
    rows: Vec<RowTracker>,
    progress: GameProgress,
    winnings: Winnings,
    scheduler: Scheduler<TicketTask>,
    settle_scheduled: bool,
    round: u32,
}

impl Ticket<Dollars> {
    pub fn new(layout: TicketLayout, config: TicketConfig) -> Result<Self> {
        Self::with_format(layout, config, Dollars)
    }
}

impl<F: CurrencyFormat> Ticket<F> {
    /// Wires a ticket onto `layout`; every cell must sit on a registered surface.
    pub fn with_format(layout: TicketLayout, config: TicketConfig, format: F) -> Result<Self> {
        let config = config.validate()?;

        let mut engine = ScratchEngine::new(config.brush_size_world);
        for surface in &layout.surfaces {
            engine.register(*surface);
        }

        let known = |slot: &CellSlot| engine.surface(slot.surface).is_some();
        if let Some((index, slot)) = layout
            .card_cells
            .iter()
            .enumerate()
            .find(|(_, slot)| !known(*slot))
        {
            return Err(GameError::MissingCollaborator(format!(
                "surface {:?} for card cell {index}",
                slot.surface
            )));
        }
        for (index, row) in layout.rows.iter().enumerate() {
            if !known(&row.prize) {
                return Err(GameError::MissingCollaborator(format!(
                    "surface {:?} for prize of row {index}",
                    row.prize.surface
                )));
            }
            if row.card_slots == 0 {
                return Err(GameError::InvalidConfig(format!(
                    "row {index} has no card slots"
                )));
            }
        }

        let rows = (0..layout.rows.len())
            .map(|index| RowTracker::new(RowId(index as u32)))
            .collect();
        let winnings = Winnings::new(&format);

        Ok(Self {
            progress: GameProgress::new(config.required_cells),
            config,
            layout,
            format,
            engine,
            cells: Vec::new(),
            rows,
            winnings,
            scheduler: Scheduler::new(),
            settle_scheduled: false,
            round: 0,
        })
    }

    pub fn config(&self) -> &TicketConfig {
        &self.config
    }

    pub fn engine(&self) -> &ScratchEngine {
        &self.engine
    }

    pub fn cells(&self) -> &[CellWatcher] {
        &self.cells
    }

    pub fn rows(&self) -> &[RowTracker] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&RowTracker> {
        self.rows.get(id.0 as usize)
    }

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    pub fn winnings(&self) -> &Winnings {
        &self.winnings
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Time elapsed on the ticket clock.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Strike-through progress for a board card, for rendering.
    pub fn slot_progress(&self, row: RowId, slot: usize) -> f32 {
        self.row(row)
            .map_or(0.0, |row| row.slot_progress(slot, &self.scheduler))
    }

    /// Deals a fresh ticket: new decks, new prizes, clean masks.
    ///
    /// Running out of cards is not fatal; the remaining slots simply stay empty.
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut player_deck = Deck::shuffled(DeckRule::Player, rng);
        let mut board_deck = Deck::shuffled(DeckRule::Board, rng);

        self.cells.clear();
        let required = self.config.required_cells as usize;
        for slot in self.layout.card_cells.iter().take(required) {
            let card = match player_deck.draw() {
                Ok(card) => card,
                Err(err) => {
                    log::warn!("player cells only partly dealt: {err}");
                    break;
                }
            };
            let cell = self.cell(*slot, CellRole::Card(card));
            self.cells.push(cell);
        }

        for (row, layout) in self.rows.iter_mut().zip(&self.layout.rows) {
            let mut cards = Vec::with_capacity(layout.card_slots);
            for _ in 0..layout.card_slots {
                match board_deck.draw() {
                    Ok(card) => cards.push(card),
                    Err(err) => {
                        log::warn!("{:?} only partly dealt: {err}", row.id());
                        break;
                    }
                }
            }
            row.index(cards);
            row.prize_mut().set_label(draw_prize(&self.config.prize, rng));
        }
        for (row, layout) in self.rows.iter().zip(&self.layout.rows) {
            let cell = self.cell(layout.prize, CellRole::Prize(row.id()));
            self.cells.push(cell);
        }

        self.round += 1;
        self.restart();
        log::debug!(
            "dealt round {} with {} cells over {} rows",
            self.round,
            self.cells.len(),
            self.rows.len()
        );
    }

    /// Clears every scratch and strike on the current deal without dealing new cards.
    pub fn restart(&mut self) {
        self.scheduler.clear();
        self.engine.reset();
        self.settle_scheduled = false;
        for cell in &mut self.cells {
            cell.reset();
        }
        for row in &mut self.rows {
            row.enable();
            row.prize_mut().reset();
        }

        let dealt = self
            .cells
            .iter()
            .filter(|cell| matches!(cell.role(), CellRole::Card(_)))
            .count() as u32;
        let required = self.config.required_cells.min(dealt);
        if required < self.config.required_cells {
            log::warn!(
                "only {} of {} player cells dealt",
                dealt,
                self.config.required_cells
            );
        }
        self.progress.reset(required);
    }

    /// Hides a row: its animations stop, its index and prize are cleared.
    pub fn disable_row(&mut self, id: RowId) -> Result<()> {
        let row = self
            .rows
            .get_mut(id.0 as usize)
            .ok_or_else(|| GameError::MissingCollaborator(format!("{id:?}")))?;
        let dropped_claim = row.prize().state().is_pending();
        row.disable(&mut self.scheduler);
        if dropped_claim {
            // nobody can scratch a hidden prize
            self.progress.prize_collected();
            self.schedule_settle();
        }
        Ok(())
    }

    /// Shows a hidden row again with all of its dealt cards unstruck.
    pub fn enable_row(&mut self, id: RowId) -> Result<()> {
        let row = self
            .rows
            .get_mut(id.0 as usize)
            .ok_or_else(|| GameError::MissingCollaborator(format!("{id:?}")))?;
        row.enable();
        Ok(())
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.engine.handle_pointer(event);
    }

    /// Runs one frame: at most one stroke, then any deferred work that came due after `dt`.
    pub fn tick(&mut self, dt: Duration) -> Vec<TicketEvent> {
        let mut events = Vec::new();

        let mut dispatch = CellDispatch {
            cells: &mut self.cells,
            revealed: Vec::new(),
        };
        self.engine.tick(&mut dispatch);
        for index in dispatch.revealed {
            self.on_cell_revealed(index, &mut events);
        }

        self.scheduler.advance(dt);
        while let Some(task) = self.scheduler.pop_due() {
            match task {
                TicketTask::Remove(removal) => self.on_removal(removal, &mut events),
                TicketTask::Settle => self.on_settle(&mut events),
            }
        }

        events
    }

    fn cell(&self, slot: CellSlot, role: CellRole) -> CellWatcher {
        CellWatcher::new(slot.surface, slot.bounds, role)
            .with_threshold(self.config.scratch_threshold)
    }

    fn on_cell_revealed(&mut self, index: usize, events: &mut Vec<TicketEvent>) {
        let role = self.cells[index].role();
        events.push(TicketEvent::CellRevealed { cell: index, role });

        match role {
            CellRole::Card(card) => {
                let identity = card.identity();
                let animation = self.config.removal_animation();
                for row in &mut self.rows {
                    row.notify_revealed(&identity, &mut self.scheduler, animation);
                }
                self.progress.cell_completed();
            }
            CellRole::Prize(id) => {
                let Some(row) = self.rows.get_mut(id.0 as usize) else {
                    return;
                };
                let mut ledger = PrizeLedger {
                    progress: &mut self.progress,
                    winnings: &mut self.winnings,
                    format: &self.format,
                };
                let outcome = row.prize_mut().notify_fully_scratched(&mut ledger);
                self.record_prize(id, outcome, events);
            }
        }
        self.schedule_settle();
    }

    fn on_removal(&mut self, removal: RowRemoval, events: &mut Vec<TicketEvent>) {
        let Some(row) = self.rows.get_mut(removal.row.0 as usize) else {
            return;
        };
        let outcome = row.complete_removal(&removal.key);
        if outcome == RemovalOutcome::Stale {
            return;
        }
        events.push(TicketEvent::CardStruck {
            row: removal.row,
            key: removal.key,
        });

        if outcome == RemovalOutcome::Won {
            events.push(TicketEvent::RowWon(removal.row));
            let mut ledger = PrizeLedger {
                progress: &mut self.progress,
                winnings: &mut self.winnings,
                format: &self.format,
            };
            let outcome = row.prize_mut().declare_winner(&mut ledger);
            self.record_prize(removal.row, outcome, events);
            self.schedule_settle();
        }
    }

    fn on_settle(&mut self, events: &mut Vec<TicketEvent>) {
        self.settle_scheduled = false;
        if self.progress.settle() {
            log::info!(
                "round {} settled, winnings {}",
                self.round,
                self.winnings.display()
            );
            events.push(TicketEvent::RoundSettled { round: self.round });
        } else {
            log::debug!(
                "settlement deferred, {} prize(s) pending",
                self.progress.pending_prizes()
            );
        }
    }

    fn record_prize(&self, row: RowId, outcome: PrizeOutcome, events: &mut Vec<TicketEvent>) {
        match outcome {
            PrizeOutcome::Ignored | PrizeOutcome::Waiting => {}
            PrizeOutcome::Deferred => events.push(TicketEvent::PrizePending(row)),
            PrizeOutcome::Paid(amount) => {
                events.push(TicketEvent::PrizePaid { row, amount });
                events.push(TicketEvent::WinningsUpdated(self.winnings.display().into()));
            }
            PrizeOutcome::Unpaid => events.push(TicketEvent::PrizeUnpaid(row)),
        }
    }

    /// Starts the settle delay once the round is finished with nothing pending.
    fn schedule_settle(&mut self) {
        if self.settle_scheduled || !self.progress.is_settleable() {
            return;
        }
        self.settle_scheduled = true;
        self.scheduler
            .schedule(TaskGroup::Round, self.config.settle_delay(), TicketTask::Settle);
    }
}
