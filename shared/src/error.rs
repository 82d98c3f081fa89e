use thiserror::Error;

use crate::fsm::RaceState;
use crate::model::CarId;

/// Why a single engine session did not finish the race.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RaceError {
    #[error("car {id}: engine failed to start ({reason})")]
    StartFailure { id: CarId, reason: String },

    #[error("car {name} has been stopped suddenly, its engine was broken down")]
    Breakdown { id: CarId, name: String },

    #[error("car {id}: network failure ({reason})")]
    NetworkFailure { id: CarId, reason: String },

    /// The car was reset while its engine was still starting.
    #[error("car {id} was called back before it drove off")]
    Withdrawn { id: CarId },
}

impl RaceError {
    pub fn is_breakdown(&self) -> bool {
        matches!(self, RaceError::Breakdown { .. })
    }
}

/// Failures of the garage CRUD endpoints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{url} answered with status {status}")]
    Status { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("response carries no usable X-Total-Count header")]
    MissingTotalCount,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("refusing to animate with duration {0}")]
    InvalidDuration(f64),

    #[error("engine reported velocity {velocity} over distance {distance}")]
    InvalidReply { velocity: f64, distance: f64 },

    #[error("no track rendered for car {0}")]
    Detached(CarId),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("a race can only start from the idle state (currently {0:?})")]
    NotIdle(RaceState),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Please, enter the car name!")]
    EmptyName,
}

/// Raw failure reported by an engine endpoint, before it is tied to a car.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineFault {
    #[error("status {0}")]
    Status(u16),

    #[error("engine broken")]
    Breakdown,

    #[error("malformed reply: {0}")]
    Malformed(String),

    #[error("{0}")]
    Transport(String),
}
