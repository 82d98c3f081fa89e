use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::CarId;
use crate::race::RaceOutcome;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinnerRow {
    pub id: CarId,
    pub name: String,
    pub wins: u32,
    pub best_time_ms: f64,
}

impl WinnerRow {
    pub fn best_time_secs(&self) -> f64 {
        self.best_time_ms / 1000.0
    }
}

/// Wins collected during this page session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WinnersBoard {
    rows: HashMap<CarId, WinnerRow>,
}

impl WinnersBoard {
    pub fn record(&mut self, outcome: &RaceOutcome) {
        let Some(finish) = outcome.winner() else {
            return;
        };
        let row = self.rows.entry(finish.id).or_insert_with(|| WinnerRow {
            id: finish.id,
            name: finish.name.clone(),
            wins: 0,
            best_time_ms: finish.time_ms,
        });
        row.wins += 1;
        row.name = finish.name.clone();
        row.best_time_ms = row.best_time_ms.min(finish.time_ms);
    }

    /// Most wins first, ties broken by the faster best time.
    pub fn rows(&self) -> Vec<WinnerRow> {
        let mut rows: Vec<WinnerRow> = self.rows.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(a.best_time_ms.total_cmp(&b.best_time_ms))
        });
        rows
    }

    /// Drops a car that was removed from the garage.
    pub fn forget(&mut self, id: CarId) -> bool {
        self.rows.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
