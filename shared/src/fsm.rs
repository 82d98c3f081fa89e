use rust_fsm::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of the global race controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceState {
    Idle,
    Racing,
    AwaitingReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaceEvent {
    Start,
    Finish,
    Reset,
}

/// Enablement of the generate / race / reset buttons, `true` meaning clickable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceControls {
    pub generate: bool,
    pub race: bool,
    pub reset: bool,
}

impl RaceState {
    pub fn controls(self) -> RaceControls {
        match self {
            RaceState::Idle => RaceControls {
                generate: true,
                race: true,
                reset: false,
            },
            RaceState::Racing => RaceControls {
                generate: false,
                race: false,
                reset: false,
            },
            RaceState::AwaitingReset => RaceControls {
                generate: false,
                race: false,
                reset: true,
            },
        }
    }
}

impl StateMachineImpl for RaceState {
    type Input = RaceEvent;
    type State = RaceState;
    type Output = RaceControls;

    const INITIAL_STATE: Self::State = RaceState::Idle;

    fn transition(state: &Self::State, input: &Self::Input) -> Option<Self::State> {
        match (state, input) {
            (RaceState::Idle, RaceEvent::Start) => Some(RaceState::Racing),
            (RaceState::Racing, RaceEvent::Finish) => Some(RaceState::AwaitingReset),
            (RaceState::AwaitingReset, RaceEvent::Reset) => Some(RaceState::Idle),
            // Early or repeated resets just restore idle.
            (RaceState::Racing, RaceEvent::Reset) => Some(RaceState::Idle),
            (RaceState::Idle, RaceEvent::Reset) => Some(RaceState::Idle),
            _ => None,
        }
    }

    fn output(state: &Self::State, input: &Self::Input) -> Option<Self::Output> {
        Self::transition(state, input).map(RaceState::controls)
    }
}

impl Default for RaceState {
    fn default() -> Self {
        RaceState::Idle
    }
}
