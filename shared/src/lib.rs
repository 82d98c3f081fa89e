pub mod animation;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod generator;
pub mod model;
pub mod pagination;
pub mod protocol;
pub mod race;
pub mod router;
pub mod session;
pub mod winners;

#[cfg(test)]
mod testing;
