//! A track and scoreboard that report to the log instead of a screen.

use std::collections::HashMap;

use shared::animation::{Animation, EngineControls, Track};
use shared::fsm::RaceControls;
use shared::model::{Car, CarId};
use shared::race::{RaceOutcome, Scoreboard};
use tokio::time::Instant;
use tracing::{debug, info};

pub struct TerminalAnimation {
    name: String,
    started: Instant,
    duration_ms: f64,
}

impl TerminalAnimation {
    /// Share of the track covered so far, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let elapsed = self.started.elapsed().as_secs_f64() * 1000.0;
        (elapsed / self.duration_ms).clamp(0.0, 1.0)
    }
}

impl Animation for TerminalAnimation {
    fn pause(&self) {
        info!("{} stopped at {:.0}% of the track", self.name, self.progress() * 100.0);
    }

    fn cancel(&self) {
        debug!("{} back at the start", self.name);
    }
}

/// Knows the cars of one page; anything else counts as not shown.
pub struct LogTrack {
    names: HashMap<CarId, String>,
}

impl LogTrack {
    pub fn new(cars: &[Car]) -> Self {
        Self {
            names: cars.iter().map(|car| (car.id, car.name.clone())).collect(),
        }
    }
}

impl Track for LogTrack {
    type Handle = TerminalAnimation;

    fn animate(&self, id: CarId, duration_ms: f64) -> Option<TerminalAnimation> {
        let name = self.names.get(&id).cloned()?;
        info!("{} drives off, {:.2}s to the flag", name, duration_ms / 1000.0);
        Some(TerminalAnimation {
            name,
            started: Instant::now(),
            duration_ms,
        })
    }

    fn rewind(&self, id: CarId) {
        debug!("car {} rewound", id);
    }

    fn set_engine_controls(&self, id: CarId, controls: EngineControls) {
        debug!("car {} engine controls {:?}", id, controls);
    }
}

pub struct LogScoreboard;

impl Scoreboard for LogScoreboard {
    fn show_controls(&self, controls: RaceControls) {
        debug!("race controls {:?}", controls);
    }

    fn show_outcome(&self, outcome: Option<&RaceOutcome>) {
        if let Some(outcome) = outcome {
            info!("{}", outcome.message());
        }
    }
}
