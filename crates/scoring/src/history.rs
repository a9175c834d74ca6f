use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One recorded scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub score: Decimal,
    /// Change against the previous pass; zero for the very first pass.
    pub delta: Decimal,
}

/// How an entry is annotated in the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Initial,
    Up,
    Down,
    Flat,
}

/// A sliding window over a user's most recent totals, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistory {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl ScoreHistory {
    pub fn new(capacity: usize) -> Self {
        // A zero capacity would silently drop every entry.
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a pass, evicting the oldest entry once the window is full. Returns the delta.
    pub fn record(&mut self, timestamp: DateTime<Utc>, score: Decimal) -> Decimal {
        let delta = match self.entries.back() {
            Some(last) => score - last.score,
            None => Decimal::ZERO,
        };

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            timestamp,
            score,
            delta,
        });
        delta
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Entries oldest to newest with their trend. The oldest retained entry is always `Initial`.
    pub fn trail(&self) -> impl Iterator<Item = (&HistoryEntry, Trend)> {
        self.entries.iter().enumerate().map(|(i, entry)| {
            let trend = if i == 0 {
                Trend::Initial
            } else if entry.delta > Decimal::ZERO {
                Trend::Up
            } else if entry.delta < Decimal::ZERO {
                Trend::Down
            } else {
                Trend::Flat
            };
            (entry, trend)
        })
    }
}
