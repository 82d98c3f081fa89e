//! Race orchestration: one engine session per rendered car, first finisher wins.

use std::cell::Cell;

use futures::stream::{FuturesUnordered, StreamExt};
use rust_fsm::StateMachineImpl;
use tracing::{debug, info};

use crate::animation::{AnimationController, Track};
use crate::config::GarageConfig;
use crate::engine::{run_engine, EngineApi, EngineSession, Finish};
use crate::error::{ControlError, RaceError};
use crate::fsm::{RaceControls, RaceEvent, RaceState};
use crate::model::{CarId, RaceEntry};

/// Where race-level state is shown to the user.
pub trait Scoreboard {
    fn show_controls(&self, controls: RaceControls);

    /// `None` clears the previous result.
    fn show_outcome(&self, outcome: Option<&RaceOutcome>);
}

#[derive(Clone, Debug, PartialEq)]
pub enum RaceOutcome {
    Winner(Finish),
    NoFinisher,
}

impl RaceOutcome {
    pub fn winner(&self) -> Option<&Finish> {
        match self {
            RaceOutcome::Winner(finish) => Some(finish),
            RaceOutcome::NoFinisher => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            RaceOutcome::Winner(finish) => format!("!!! {} won the race !!!", finish.name),
            RaceOutcome::NoFinisher => "No car reached the finish line!".to_string(),
        }
    }
}

/// Every settled session of one race.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceReport {
    pub outcome: RaceOutcome,
    pub finished: Vec<Finish>,
    pub failures: Vec<RaceError>,
}

/// Outcome bookkeeping owned by a single `start_race` call.
#[derive(Default)]
struct RaceTally {
    winner: Option<Finish>,
    finished: Vec<Finish>,
    failures: Vec<RaceError>,
}

impl RaceTally {
    /// Returns the winner if this result is the first success.
    fn record(&mut self, result: Result<Finish, RaceError>) -> Option<RaceOutcome> {
        match result {
            Ok(finish) => {
                self.finished.push(finish.clone());
                if self.winner.is_none() {
                    self.winner = Some(finish.clone());
                    return Some(RaceOutcome::Winner(finish));
                }
                None
            }
            Err(err) => {
                self.failures.push(err);
                None
            }
        }
    }

    fn into_report(self) -> RaceReport {
        RaceReport {
            outcome: self
                .winner
                .map(RaceOutcome::Winner)
                .unwrap_or(RaceOutcome::NoFinisher),
            finished: self.finished,
            failures: self.failures,
        }
    }
}

pub struct RaceCoordinator<E, T: Track, S> {
    api: E,
    animations: AnimationController<T>,
    scoreboard: S,
    default_distance: f64,
    state: Cell<RaceState>,
    epoch: Cell<u64>,
}

impl<E, T, S> RaceCoordinator<E, T, S>
where
    E: EngineApi,
    T: Track,
    S: Scoreboard,
{
    pub fn new(api: E, track: T, scoreboard: S, config: &GarageConfig) -> Self {
        Self {
            api,
            animations: AnimationController::new(track),
            scoreboard,
            default_distance: config.default_distance,
            state: Cell::new(RaceState::default()),
            epoch: Cell::new(0),
        }
    }

    pub fn api(&self) -> &E {
        &self.api
    }

    pub fn animations(&self) -> &AnimationController<T> {
        &self.animations
    }

    pub fn scoreboard(&self) -> &S {
        &self.scoreboard
    }

    pub fn state(&self) -> RaceState {
        self.state.get()
    }

    fn session(&self) -> EngineSession<'_, E, T> {
        EngineSession::new(&self.api, &self.animations, self.default_distance)
    }

    fn apply(&self, event: RaceEvent) -> bool {
        let current = self.state.get();
        match RaceState::transition(&current, &event) {
            Some(next) => {
                debug!("race controls {:?} -> {:?}", current, next);
                self.state.set(next);
                self.scoreboard.show_controls(next.controls());
                true
            }
            None => false,
        }
    }

    fn bump_epoch(&self) -> u64 {
        let epoch = self.epoch.get() + 1;
        self.epoch.set(epoch);
        epoch
    }

    fn conclude(&self, epoch: u64, outcome: &RaceOutcome) {
        if self.epoch.get() != epoch {
            debug!("race was reset, dropping outcome {:?}", outcome);
            return;
        }
        if self.apply(RaceEvent::Finish) {
            info!("{}", outcome.message());
            self.scoreboard.show_outcome(Some(outcome));
        }
    }

    /// Runs every entry concurrently. The first session that *succeeds* is
    /// announced as soon as it settles; the remaining sessions are still
    /// awaited so late breakdowns pause their cars.
    pub async fn start_race(&self, entries: Vec<RaceEntry>) -> Result<RaceReport, ControlError> {
        let current = self.state.get();
        if current != RaceState::Idle {
            return Err(ControlError::NotIdle(current));
        }
        self.apply(RaceEvent::Start);
        self.scoreboard.show_outcome(None);
        let epoch = self.bump_epoch();
        info!("race started with {} cars", entries.len());

        let session = self.session();
        let mut pending: FuturesUnordered<_> =
            entries.iter().map(|entry| session.run(entry)).collect();
        let mut tally = RaceTally::default();

        while let Some(result) = pending.next().await {
            if let Some(outcome) = tally.record(result) {
                self.conclude(epoch, &outcome);
            }
        }
        drop(pending);

        let report = tally.into_report();
        if report.outcome == RaceOutcome::NoFinisher {
            self.conclude(epoch, &report.outcome);
        }
        info!(
            "race settled: {} finished, {} failed",
            report.finished.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Rewinds every listed car and returns the controls to idle. Safe to call
    /// at any time.
    pub fn reset_race(&self, ids: &[CarId]) {
        self.bump_epoch();
        for &id in ids {
            self.animations.reset_animation(id);
        }
        let stray = self.animations.cancel_all();
        if stray > 0 {
            debug!("cancelled {} animations of cars no longer shown", stray);
        }
        self.scoreboard.show_outcome(None);
        self.apply(RaceEvent::Reset);
    }

    /// The per-car GO button.
    pub async fn run_single(&self, entry: &RaceEntry) -> Result<Finish, RaceError> {
        run_engine(&self.api, &self.animations, entry, self.default_distance).await
    }

    /// The per-car BACK button.
    pub fn stop_single(&self, id: CarId) {
        self.animations.reset_animation(id);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::animation::EngineControls;
    use crate::error::EngineFault;
    use crate::testing::{
        BoardEvent, Motion, RecordingScoreboard, RecordingTrack, Script, ScriptedEngine, TrackEvent,
    };

    type TestCoordinator = RaceCoordinator<ScriptedEngine, RecordingTrack, RecordingScoreboard>;

    fn coordinator(scripts: Vec<(CarId, Script)>) -> TestCoordinator {
        RaceCoordinator::new(
            ScriptedEngine::new(scripts),
            RecordingTrack::default(),
            RecordingScoreboard::default(),
            &GarageConfig::default(),
        )
    }

    fn entries(names: &[(CarId, &str)]) -> Vec<RaceEntry> {
        names
            .iter()
            .map(|(id, name)| RaceEntry {
                id: *id,
                name: name.to_string(),
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_wins_over_earlier_failure() {
        let race = coordinator(vec![
            (1, Script::breaks_down(10)),
            (2, Script::finishes(50)),
            (3, Script::finishes(200)),
            (4, Script::drive_fault(5, EngineFault::Transport("reset by peer".into()))),
        ]);

        let report = race
            .start_race(entries(&[(1, "Car A"), (2, "Car B"), (3, "Car C"), (4, "Car D")]))
            .await
            .unwrap();

        assert_eq!(report.outcome.winner().map(|f| f.name.as_str()), Some("Car B"));
        assert_eq!(report.finished.len(), 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(
            race.scoreboard().announced_at().map(|(_, m)| m),
            Some("!!! Car B won the race !!!".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_winner_announced_before_stragglers_settle() {
        let race = coordinator(vec![(1, Script::finishes(50)), (2, Script::breaks_down(300))]);
        let started = tokio::time::Instant::now();

        let report = race
            .start_race(entries(&[(1, "Volvo XC 90"), (2, "Ford Mustang")]))
            .await
            .unwrap();

        let (at, _) = race.scoreboard().announced_at().unwrap();
        assert!(at - started < Duration::from_millis(100));
        assert!(started.elapsed() >= Duration::from_millis(300));

        assert!(report.failures[0].is_breakdown());
        assert_eq!(race.animations().track().motion(2), Some(Motion::Paused));
        assert_eq!(race.state(), RaceState::AwaitingReset);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failures_report_no_finisher() {
        let race = coordinator(vec![
            (1, Script::breaks_down(10)),
            (2, Script::start_fault(EngineFault::Status(500))),
            (3, Script::drive_fault(30, EngineFault::Status(503))),
        ]);

        let report = race
            .start_race(entries(&[(1, "A"), (2, "B"), (3, "C")]))
            .await
            .unwrap();

        assert_eq!(report.outcome, RaceOutcome::NoFinisher);
        assert_eq!(report.failures.len(), 3);
        assert_eq!(
            race.scoreboard().announced_at().map(|(_, m)| m),
            Some("No car reached the finish line!".to_string())
        );
        assert_eq!(race.state(), RaceState::AwaitingReset);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_race_has_no_finisher() {
        let race = coordinator(vec![]);
        let report = race.start_race(Vec::new()).await.unwrap();
        assert_eq!(report.outcome, RaceOutcome::NoFinisher);
        assert_eq!(race.state(), RaceState::AwaitingReset);
    }

    #[tokio::test(start_paused = true)]
    async fn test_control_lifecycle() {
        let race = coordinator(vec![(1, Script::finishes(10))]);

        race.start_race(entries(&[(1, "A")])).await.unwrap();
        let events = race.scoreboard().events();
        assert_eq!(events[0], BoardEvent::Controls(RaceState::Racing.controls()));
        assert_eq!(events[1], BoardEvent::Outcome(None));
        assert_eq!(
            race.scoreboard().last_controls(),
            Some(RaceState::AwaitingReset.controls())
        );

        // Generate and race stay off until reset.
        let err = race.start_race(entries(&[(1, "A")])).await.unwrap_err();
        assert_eq!(err, ControlError::NotIdle(RaceState::AwaitingReset));

        race.reset_race(&[1]);
        let idle = race.scoreboard().last_controls().unwrap();
        assert!(idle.generate && idle.race && !idle.reset);
        assert_eq!(race.scoreboard().events().last(), Some(&BoardEvent::Controls(idle)));
        assert_eq!(race.animations().track().motion(1), Some(Motion::AtStart));
        assert_eq!(
            race.animations().track().controls(1),
            Some(EngineControls::PARKED)
        );
        assert!(race.animations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_without_race_is_harmless() {
        let race = coordinator(vec![]);
        race.reset_race(&[1, 2]);
        race.reset_race(&[]);
        assert_eq!(race.state(), RaceState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_results_after_reset_are_ignored() {
        let race = coordinator(vec![(1, Script::finishes(100)), (2, Script::breaks_down(150))]);

        let racing = race.start_race(entries(&[(1, "A"), (2, "B")]));
        let resetting = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            race.reset_race(&[1, 2]);
        };
        let (report, ()) = tokio::join!(racing, resetting);
        let report = report.unwrap();

        // The winner still settles inside the report but is never announced.
        assert!(report.outcome.winner().is_some());
        assert_eq!(race.scoreboard().announced_at(), None);
        assert_eq!(race.state(), RaceState::Idle);

        // The breakdown after the reset must not freeze the rewound car.
        assert_eq!(
            race.animations()
                .track()
                .count(|e| matches!(e, TrackEvent::Pause { .. })),
            0
        );
        assert_eq!(race.animations().track().motion(2), Some(Motion::AtStart));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_car_go_and_back() {
        let race = coordinator(vec![(6, Script::finishes(10))]);
        let entry = RaceEntry {
            id: 6,
            name: "Nissan Qashqai".into(),
        };

        let finish = race.run_single(&entry).await.unwrap();
        assert_eq!(finish.id, 6);
        assert!(race.animations().is_active(6));
        assert_eq!(race.state(), RaceState::Idle);

        race.stop_single(6);
        assert!(!race.animations().is_active(6));
        assert_eq!(
            race.animations().track().controls(6),
            Some(EngineControls::PARKED)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_reply_after_reset_never_moves_car() {
        let race = coordinator(vec![
            (1, Script::finishes(10)),
            (2, Script::finishes(30).start_after(100)),
        ]);

        let racing = race.start_race(entries(&[(1, "A"), (2, "B")]));
        let resetting = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert_eq!(race.state(), RaceState::AwaitingReset);
            race.reset_race(&[1, 2]);
        };
        let (report, ()) = tokio::join!(racing, resetting);
        let report = report.unwrap();

        assert_eq!(report.outcome.winner().map(|f| f.id), Some(1));
        assert_eq!(report.failures, vec![RaceError::Withdrawn { id: 2 }]);

        let track = race.animations().track();
        assert_eq!(track.count(|e| matches!(e, TrackEvent::Animate { id: 2, .. })), 0);
        assert_eq!(track.motion(2), Some(Motion::AtStart));
        assert_eq!(track.controls(2), Some(EngineControls::PARKED));
        assert!(race.animations().is_empty());
        assert_eq!(race.state(), RaceState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_while_starting_keeps_car_parked() {
        let race = coordinator(vec![(3, Script::finishes(10).start_after(100))]);
        let entry = RaceEntry {
            id: 3,
            name: "Skoda Octavia".into(),
        };

        let driving = race.run_single(&entry);
        let stopping = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            race.stop_single(3);
        };
        let (result, ()) = tokio::join!(driving, stopping);

        assert_eq!(result, Err(RaceError::Withdrawn { id: 3 }));
        let track = race.animations().track();
        assert_eq!(track.count(|e| matches!(e, TrackEvent::Animate { .. })), 0);
        assert_eq!(track.controls(3), Some(EngineControls::PARKED));
        assert!(!race.animations().is_active(3));
    }
}
