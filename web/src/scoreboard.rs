use leptos::prelude::*;
use shared::fsm::{RaceControls, RaceState};
use shared::race::{RaceOutcome, Scoreboard};
use shared::winners::WinnersBoard;

/// Race-level display backed by signals the views read from.
#[derive(Clone, Copy)]
pub struct SignalScoreboard {
    pub controls: RwSignal<RaceControls>,
    pub banner: RwSignal<Option<String>>,
    pub winners: RwSignal<WinnersBoard>,
}

impl SignalScoreboard {
    pub fn new() -> Self {
        Self {
            controls: RwSignal::new(RaceState::Idle.controls()),
            banner: RwSignal::new(None),
            winners: RwSignal::new(WinnersBoard::default()),
        }
    }
}

impl Scoreboard for SignalScoreboard {
    fn show_controls(&self, controls: RaceControls) {
        self.controls.set(controls);
    }

    fn show_outcome(&self, outcome: Option<&RaceOutcome>) {
        self.banner.set(outcome.map(RaceOutcome::message));
        if let Some(outcome) = outcome {
            self.winners.update(|board| board.record(outcome));
        }
    }
}
