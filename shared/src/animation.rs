//! Per-car visual progress along the road.
//!
//! The controller owns the only cross-session shared structure: the map from
//! car id to its running animation. Everything runs on one cooperative thread,
//! so the map lives in a `RefCell` and no borrow is ever held across an await.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::debug;

use crate::error::AnimationError;
use crate::model::CarId;

/// A live, time-based transition for one car.
pub trait Animation {
    /// Freeze at the current position.
    fn pause(&self);
    /// Drop every visual effect of the transition.
    fn cancel(&self);
}

/// GO / BACK button enablement of one car row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineControls {
    pub go: bool,
    pub stop: bool,
}

impl EngineControls {
    pub const PARKED: Self = Self { go: true, stop: false };
    pub const DRIVING: Self = Self { go: false, stop: true };
}

/// The surface cars are drawn on. Implementations must treat an id whose row
/// is no longer rendered as a no-op.
pub trait Track {
    type Handle: Animation;

    /// Start a linear, fill-forwards move from the start offset to the end of
    /// the road. `None` when the car has no rendered row.
    fn animate(&self, id: CarId, duration_ms: f64) -> Option<Self::Handle>;

    /// Put the car back at the start offset.
    fn rewind(&self, id: CarId);

    fn set_engine_controls(&self, id: CarId, controls: EngineControls);
}

/// Identifies one engagement or animation of a car. A ticket goes stale once
/// the car is reset or animated again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub id: CarId,
    generation: u64,
}

struct Slot<H> {
    generation: u64,
    handle: H,
}

pub fn validate_duration(duration_ms: f64) -> Result<f64, AnimationError> {
    if duration_ms.is_finite() && duration_ms > 0.0 {
        Ok(duration_ms)
    } else {
        Err(AnimationError::InvalidDuration(duration_ms))
    }
}

pub struct AnimationController<T: Track> {
    track: T,
    handles: RefCell<HashMap<CarId, Slot<T::Handle>>>,
    engaged: RefCell<HashMap<CarId, u64>>,
    generation: Cell<u64>,
}

impl<T: Track> AnimationController<T> {
    pub fn new(track: T) -> Self {
        Self {
            track,
            handles: RefCell::new(HashMap::new()),
            engaged: RefCell::new(HashMap::new()),
            generation: Cell::new(0),
        }
    }

    pub fn track(&self) -> &T {
        &self.track
    }

    fn next_generation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    /// GO off, BACK on. The ticket stays valid until the car is reset or
    /// engaged again.
    pub fn engage(&self, id: CarId) -> Ticket {
        let generation = self.next_generation();
        self.engaged.borrow_mut().insert(id, generation);
        self.track.set_engine_controls(id, EngineControls::DRIVING);
        Ticket { id, generation }
    }

    /// Whether the engagement behind `ticket` was not called back since.
    pub fn holds(&self, ticket: Ticket) -> bool {
        self.engaged.borrow().get(&ticket.id) == Some(&ticket.generation)
    }

    pub fn start_animation(&self, id: CarId, duration_ms: f64) -> Result<Ticket, AnimationError> {
        let duration_ms = validate_duration(duration_ms)?;

        let previous = self.handles.borrow_mut().remove(&id);
        if let Some(previous) = previous {
            previous.handle.cancel();
        }

        let handle = self
            .track
            .animate(id, duration_ms)
            .ok_or(AnimationError::Detached(id))?;

        let generation = self.next_generation();
        self.handles
            .borrow_mut()
            .insert(id, Slot { generation, handle });

        debug!("car {} animating over {:.0}ms", id, duration_ms);
        Ok(Ticket { id, generation })
    }

    pub fn pause_animation(&self, id: CarId) {
        if let Some(slot) = self.handles.borrow().get(&id) {
            slot.handle.pause();
        }
    }

    /// Pause only if `ticket` still names the car's current animation.
    pub fn pause_ticket(&self, ticket: Ticket) -> bool {
        match self.handles.borrow().get(&ticket.id) {
            Some(slot) if slot.generation == ticket.generation => {
                slot.handle.pause();
                true
            }
            _ => {
                debug!("ignoring late pause for car {}", ticket.id);
                false
            }
        }
    }

    /// Cancel, rewind and park the car. Safe on ids without an animation.
    pub fn reset_animation(&self, id: CarId) {
        self.engaged.borrow_mut().remove(&id);
        let slot = self.handles.borrow_mut().remove(&id);
        if let Some(slot) = slot {
            slot.handle.cancel();
        }
        self.track.rewind(id);
        self.track.set_engine_controls(id, EngineControls::PARKED);
    }

    /// Cancel whatever is left in the map, e.g. cars of a page no longer shown.
    pub fn cancel_all(&self) -> usize {
        self.engaged.borrow_mut().clear();
        let slots: Vec<Slot<T::Handle>> = self.handles.borrow_mut().drain().map(|(_, s)| s).collect();
        for slot in &slots {
            slot.handle.cancel();
        }
        slots.len()
    }

    pub fn is_active(&self, id: CarId) -> bool {
        self.handles.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.handles.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
