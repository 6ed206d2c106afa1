use core::time::Duration;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Key suffix for the second copy of a card within one row.
pub const DUPLICATE_SUFFIX: &str = "_second";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u32);

/// Payload of a deferred strike-through, resolved by [`RowTracker::complete_removal`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRemoval {
    pub row: RowId,
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct RowEntry {
    slot: usize,
    removal: Option<TaskId>,
}

/// Result of telling a row that a card was revealed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    NotFound,
    /// Every entry for this card is already animating out.
    AlreadyRemoving,
    Scheduled(SmallVec<[String; 2]>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalOutcome {
    /// Entry no longer indexed, e.g. the row was reset mid-animation.
    Stale,
    Removed,
    /// Last entry gone; reported once per round.
    Won,
}

/// Board cards still standing in one row, plus the prize riding on it.
#[derive(Clone, Debug, PartialEq)]
pub struct RowTracker {
    id: RowId,
    slots: Vec<Card>,
    entries: HashMap<String, RowEntry>,
    won: bool,
    prize: PrizeTracker,
}

impl RowTracker {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            slots: Vec::new(),
            entries: HashMap::new(),
            won: false,
            prize: PrizeTracker::default(),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    /// Cards in layout order, including ones already struck off.
    pub fn slots(&self) -> &[Card] {
        &self.slots
    }

    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn prize(&self) -> &PrizeTracker {
        &self.prize
    }

    pub fn prize_mut(&mut self) -> &mut PrizeTracker {
        &mut self.prize
    }

    /// Indexes `cards` by identity, replacing whatever the row held before.
    ///
    /// A second copy of a card goes under its identity plus [`DUPLICATE_SUFFIX`]; further copies
    /// cannot be represented and are left out of the index.
    pub fn index(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.entries.clear();
        self.slots.clear();
        self.won = false;

        for (slot, card) in cards.into_iter().enumerate() {
            self.slots.push(card);
            let identity = card.identity();
            let key = if !self.entries.contains_key(&identity) {
                identity
            } else {
                let second = format!("{identity}{DUPLICATE_SUFFIX}");
                if self.entries.contains_key(&second) {
                    log::warn!("{:?}: third copy of {} not indexed", self.id, identity);
                    continue;
                }
                second
            };
            self.entries.insert(
                key,
                RowEntry {
                    slot,
                    removal: None,
                },
            );
        }
    }

    /// Schedules the strike-through of `identity` and its duplicate, if this row has them.
    pub fn notify_revealed<T: From<RowRemoval>>(
        &mut self,
        identity: &str,
        scheduler: &mut Scheduler<T>,
        animation: Duration,
    ) -> Lookup {
        if !self.entries.contains_key(identity) {
            return Lookup::NotFound;
        }

        let mut scheduled = SmallVec::new();
        for key in [identity.to_string(), format!("{identity}{DUPLICATE_SUFFIX}")] {
            let Some(entry) = self.entries.get_mut(&key) else {
                continue;
            };
            if entry.removal.is_some() {
                continue;
            }
            let removal = RowRemoval {
                row: self.id,
                key: key.clone(),
            };
            entry.removal = Some(scheduler.schedule(
                TaskGroup::Row(self.id),
                animation,
                removal.into(),
            ));
            scheduled.push(key);
        }

        if scheduled.is_empty() {
            Lookup::AlreadyRemoving
        } else {
            log::debug!("{:?}: striking {:?}", self.id, scheduled);
            Lookup::Scheduled(scheduled)
        }
    }

    /// Drops `key` once its animation finished and reports whether that emptied the row.
    pub fn complete_removal(&mut self, key: &str) -> RemovalOutcome {
        if self.entries.remove(key).is_none() {
            return RemovalOutcome::Stale;
        }
        if self.entries.is_empty() && !self.won {
            self.won = true;
            log::debug!("{:?} complete", self.id);
            RemovalOutcome::Won
        } else {
            RemovalOutcome::Removed
        }
    }

    /// Strike-through progress of the card in `slot`: `0.0` untouched, `1.0` struck off.
    pub fn slot_progress<T>(&self, slot: usize, scheduler: &Scheduler<T>) -> f32 {
        if slot >= self.slots.len() {
            return 0.0;
        }
        match self.entries.values().find(|entry| entry.slot == slot) {
            Some(RowEntry {
                removal: Some(task),
                ..
            }) => scheduler.progress(*task).unwrap_or(1.0),
            Some(_) => 0.0,
            None => 1.0,
        }
    }

    /// Tears the row down: in-flight animations are cancelled, the index and prize are cleared.
    ///
    /// The dealt cards stay in [`slots`](Self::slots) so [`enable`](Self::enable) can rebuild.
    pub fn disable<T>(&mut self, scheduler: &mut Scheduler<T>) {
        scheduler.cancel_group(TaskGroup::Row(self.id));
        self.entries.clear();
        self.won = false;
        self.prize.reset();
    }

    /// Re-indexes the dealt cards, undoing every strike.
    pub fn enable(&mut self) {
        let cards = std::mem::take(&mut self.slots);
        self.index(cards);
    }
}
