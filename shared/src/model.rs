use serde::{Deserialize, Serialize};

use crate::error::DraftError;

/// Server-assigned car identifier.
pub type CarId = u32;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Car {
    pub id: CarId,
    pub name: String,
    pub color: String,
}

/// Body of `POST /garage` and `PUT /garage/{id}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CarDraft {
    pub name: String,
    pub color: String,
}

impl CarDraft {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Result<Self, DraftError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DraftError::EmptyName);
        }
        Ok(Self {
            name,
            color: color.into(),
        })
    }
}

/// One page of `GET /garage` plus the `X-Total-Count` header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarPage {
    pub cars: Vec<Car>,
    pub total_count: usize,
}

/// Reply of `PATCH /engine?status=started`. Older backends omit `distance`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct EngineStart {
    pub velocity: f64,
    #[serde(default)]
    pub distance: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    Started,
    Drive,
}

impl EngineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineStatus::Started => "started",
            EngineStatus::Drive => "drive",
        }
    }
}

/// Snapshot of a rendered car taken when a race starts.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceEntry {
    pub id: CarId,
    pub name: String,
}

impl From<&Car> for RaceEntry {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id,
            name: car.name.clone(),
        }
    }
}
