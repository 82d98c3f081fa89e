//! Test doubles for the engine endpoint, the track and the score display.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use crate::animation::{Animation, EngineControls, Track};
use crate::engine::EngineApi;
use crate::error::EngineFault;
use crate::fsm::RaceControls;
use crate::model::{CarId, EngineStart};
use crate::race::{RaceOutcome, Scoreboard};

/// Ordered record shared between doubles, to assert cross-component ordering.
pub type Journal = Rc<RefCell<Vec<String>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    Moving,
    Paused,
    AtStart,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TrackEvent {
    Animate { id: CarId, serial: usize, duration_ms: f64 },
    Pause { id: CarId, serial: usize },
    Cancel { id: CarId, serial: usize },
    Rewind(CarId),
    Controls(CarId, EngineControls),
}

#[derive(Default)]
struct TrackLog {
    events: Vec<TrackEvent>,
    motion: HashMap<CarId, Motion>,
    controls: HashMap<CarId, EngineControls>,
}

#[derive(Clone, Default)]
pub struct RecordingTrack {
    log: Rc<RefCell<TrackLog>>,
    detached: Rc<RefCell<HashSet<CarId>>>,
    serial: Rc<Cell<usize>>,
    journal: Option<Journal>,
}

impl RecordingTrack {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal: Some(journal),
            ..Self::default()
        }
    }

    pub fn detach(&self, id: CarId) {
        self.detached.borrow_mut().insert(id);
    }

    pub fn events(&self) -> Vec<TrackEvent> {
        self.log.borrow().events.clone()
    }

    pub fn count(&self, pred: impl Fn(&TrackEvent) -> bool) -> usize {
        self.log.borrow().events.iter().filter(|e| pred(e)).count()
    }

    pub fn motion(&self, id: CarId) -> Option<Motion> {
        self.log.borrow().motion.get(&id).copied()
    }

    pub fn controls(&self, id: CarId) -> Option<EngineControls> {
        self.log.borrow().controls.get(&id).copied()
    }

    fn note(&self, entry: String) {
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(entry);
        }
    }
}

pub struct RecordedAnimation {
    id: CarId,
    serial: usize,
    log: Rc<RefCell<TrackLog>>,
}

impl Animation for RecordedAnimation {
    fn pause(&self) {
        let mut log = self.log.borrow_mut();
        log.events.push(TrackEvent::Pause { id: self.id, serial: self.serial });
        log.motion.insert(self.id, Motion::Paused);
    }

    fn cancel(&self) {
        let mut log = self.log.borrow_mut();
        log.events.push(TrackEvent::Cancel { id: self.id, serial: self.serial });
        log.motion.insert(self.id, Motion::AtStart);
    }
}

impl Track for RecordingTrack {
    type Handle = RecordedAnimation;

    fn animate(&self, id: CarId, duration_ms: f64) -> Option<Self::Handle> {
        if self.detached.borrow().contains(&id) {
            return None;
        }
        let serial = self.serial.get();
        self.serial.set(serial + 1);
        {
            let mut log = self.log.borrow_mut();
            log.events.push(TrackEvent::Animate { id, serial, duration_ms });
            log.motion.insert(id, Motion::Moving);
        }
        self.note(format!("track:animate:{id}"));
        Some(RecordedAnimation {
            id,
            serial,
            log: self.log.clone(),
        })
    }

    fn rewind(&self, id: CarId) {
        let mut log = self.log.borrow_mut();
        log.events.push(TrackEvent::Rewind(id));
        log.motion.insert(id, Motion::AtStart);
    }

    fn set_engine_controls(&self, id: CarId, controls: EngineControls) {
        let mut log = self.log.borrow_mut();
        log.events.push(TrackEvent::Controls(id, controls));
        log.controls.insert(id, controls);
        drop(log);
        self.note(format!("track:controls:{id}"));
    }
}

#[derive(Clone, Debug)]
pub enum StartReply {
    Ok(EngineStart),
    Fault(EngineFault),
}

#[derive(Clone, Debug)]
pub struct Script {
    pub start_after_ms: u64,
    pub start: StartReply,
    pub drive_after_ms: u64,
    pub drive: Result<(), EngineFault>,
}

impl Script {
    /// Starts instantly and reaches the finish after `drive_after_ms`.
    pub fn finishes(drive_after_ms: u64) -> Self {
        Self {
            start_after_ms: 0,
            start: StartReply::Ok(EngineStart {
                velocity: 100.0,
                distance: Some(500_000.0),
            }),
            drive_after_ms,
            drive: Ok(()),
        }
    }

    pub fn breaks_down(drive_after_ms: u64) -> Self {
        Self {
            drive: Err(EngineFault::Breakdown),
            ..Self::finishes(drive_after_ms)
        }
    }

    pub fn drive_fault(drive_after_ms: u64, fault: EngineFault) -> Self {
        Self {
            drive: Err(fault),
            ..Self::finishes(drive_after_ms)
        }
    }

    pub fn start_fault(fault: EngineFault) -> Self {
        Self {
            start: StartReply::Fault(fault),
            ..Self::finishes(0)
        }
    }

    pub fn start_reply(start: EngineStart) -> Self {
        Self {
            start: StartReply::Ok(start),
            ..Self::finishes(0)
        }
    }

    /// Delays the start reply by `start_after_ms`.
    pub fn start_after(self, start_after_ms: u64) -> Self {
        Self {
            start_after_ms,
            ..self
        }
    }
}

#[derive(Default)]
pub struct ScriptedEngine {
    scripts: HashMap<CarId, Script>,
    journal: Option<Journal>,
}

impl ScriptedEngine {
    pub fn new(scripts: impl IntoIterator<Item = (CarId, Script)>) -> Self {
        Self {
            scripts: scripts.into_iter().collect(),
            journal: None,
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    fn script(&self, id: CarId) -> Result<&Script, EngineFault> {
        self.scripts
            .get(&id)
            .ok_or_else(|| EngineFault::Status(404))
    }

    fn note(&self, entry: String) {
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(entry);
        }
    }
}

#[async_trait(?Send)]
impl EngineApi for ScriptedEngine {
    async fn start_engine(&self, id: CarId) -> Result<EngineStart, EngineFault> {
        let script = self.script(id)?;
        sleep(Duration::from_millis(script.start_after_ms)).await;
        self.note(format!("engine:started:{id}"));
        match &script.start {
            StartReply::Ok(start) => Ok(*start),
            StartReply::Fault(fault) => Err(fault.clone()),
        }
    }

    async fn drive(&self, id: CarId) -> Result<(), EngineFault> {
        let script = self.script(id)?;
        self.note(format!("engine:drive:{id}"));
        sleep(Duration::from_millis(script.drive_after_ms)).await;
        script.drive.clone()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BoardEvent {
    Controls(RaceControls),
    Outcome(Option<String>),
}

#[derive(Clone, Default)]
pub struct RecordingScoreboard {
    events: Rc<RefCell<Vec<(Instant, BoardEvent)>>>,
}

impl RecordingScoreboard {
    pub fn events(&self) -> Vec<BoardEvent> {
        self.events.borrow().iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn last_controls(&self) -> Option<RaceControls> {
        self.events.borrow().iter().rev().find_map(|(_, e)| match e {
            BoardEvent::Controls(c) => Some(*c),
            _ => None,
        })
    }

    /// When the last non-empty outcome was shown.
    pub fn announced_at(&self) -> Option<(Instant, String)> {
        self.events.borrow().iter().rev().find_map(|(at, e)| match e {
            BoardEvent::Outcome(Some(message)) => Some((*at, message.clone())),
            _ => None,
        })
    }
}

impl Scoreboard for RecordingScoreboard {
    fn show_controls(&self, controls: RaceControls) {
        self.events
            .borrow_mut()
            .push((Instant::now(), BoardEvent::Controls(controls)));
    }

    fn show_outcome(&self, outcome: Option<&RaceOutcome>) {
        self.events
            .borrow_mut()
            .push((Instant::now(), BoardEvent::Outcome(outcome.map(RaceOutcome::message))));
    }
}
