use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::animation::{validate_duration, AnimationController, Track};
use crate::error::{AnimationError, EngineFault, RaceError};
use crate::model::{CarId, EngineStart, RaceEntry};

/// The backend's engine endpoint.
#[async_trait(?Send)]
pub trait EngineApi {
    /// `PATCH /engine?id={id}&status=started`
    async fn start_engine(&self, id: CarId) -> Result<EngineStart, EngineFault>;

    /// `PATCH /engine?id={id}&status=drive`, resolving once the car reaches the finish.
    async fn drive(&self, id: CarId) -> Result<(), EngineFault>;
}

/// A car that reached the finish line.
#[derive(Clone, Debug, PartialEq)]
pub struct Finish {
    pub id: CarId,
    pub name: String,
    pub time_ms: f64,
}

/// Milliseconds the car needs to cover the track. Velocity and distance must
/// both be positive on their own, not just their quotient.
pub fn race_duration(start: &EngineStart, default_distance: f64) -> Result<f64, AnimationError> {
    let distance = start.distance.unwrap_or(default_distance);
    if !(start.velocity > 0.0 && distance > 0.0) {
        return Err(AnimationError::InvalidReply {
            velocity: start.velocity,
            distance,
        });
    }
    validate_duration(distance / start.velocity)
}

fn start_error(id: CarId, fault: EngineFault) -> RaceError {
    match fault {
        EngineFault::Transport(reason) => RaceError::NetworkFailure { id, reason },
        other => RaceError::StartFailure {
            id,
            reason: other.to_string(),
        },
    }
}

fn drive_error(id: CarId, name: &str, fault: EngineFault) -> RaceError {
    match fault {
        EngineFault::Breakdown => RaceError::Breakdown {
            id,
            name: name.to_string(),
        },
        other => RaceError::NetworkFailure {
            id,
            reason: other.to_string(),
        },
    }
}

/// One car's start → animate → drive attempt.
pub struct EngineSession<'a, E: ?Sized, T: Track> {
    api: &'a E,
    animations: &'a AnimationController<T>,
    default_distance: f64,
}

impl<'a, E, T> EngineSession<'a, E, T>
where
    E: EngineApi + ?Sized,
    T: Track,
{
    pub fn new(api: &'a E, animations: &'a AnimationController<T>, default_distance: f64) -> Self {
        Self {
            api,
            animations,
            default_distance,
        }
    }

    pub async fn run(&self, entry: &RaceEntry) -> Result<Finish, RaceError> {
        let id = entry.id;
        let engaged = self.animations.engage(id);

        let start = match self.api.start_engine(id).await {
            Ok(start) => start,
            Err(fault) => {
                let err = start_error(id, fault);
                warn!("{}", err);
                return Err(err);
            }
        };
        if !self.animations.holds(engaged) {
            debug!("car {} was reset while starting, dropping the start reply", id);
            return Err(RaceError::Withdrawn { id });
        }

        let ticket = race_duration(&start, self.default_distance)
            .and_then(|duration| {
                self.animations
                    .start_animation(id, duration)
                    .map(|ticket| (ticket, duration))
            })
            .map_err(|err| RaceError::StartFailure {
                id,
                reason: err.to_string(),
            });
        let (ticket, time_ms) = match ticket {
            Ok(started) => started,
            Err(err) => {
                warn!("{}", err);
                return Err(err);
            }
        };
        debug!(
            "car {} ({}) started at velocity {}, {:.0}ms to go",
            id, entry.name, start.velocity, time_ms
        );

        match self.api.drive(id).await {
            Ok(()) => {
                info!("car {} ({}) crossed the finish line", id, entry.name);
                Ok(Finish {
                    id,
                    name: entry.name.clone(),
                    time_ms,
                })
            }
            Err(fault) => {
                self.animations.pause_ticket(ticket);
                let err = drive_error(id, &entry.name, fault);
                warn!("{}", err);
                Err(err)
            }
        }
    }
}

/// Runs one session outside of any race.
pub async fn run_engine<E, T>(
    api: &E,
    animations: &AnimationController<T>,
    entry: &RaceEntry,
    default_distance: f64,
) -> Result<Finish, RaceError>
where
    E: EngineApi + ?Sized,
    T: Track,
{
    EngineSession::new(api, animations, default_distance)
        .run(entry)
        .await
}
