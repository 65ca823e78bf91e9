//! # Fleet Core
//!
//! Deterministic combat and fleet-state engine for the starfleet
//! engagement simulator.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No randomness
//! - No floating-point math (exact integers, fixed-point for ratios)
//!
//! This separation enables:
//! - Headless drivers and scripted battles
//! - Determinism testing via [`game::Game::state_hash`]
//!
//! ## Crate Structure
//!
//! - [`components`] - Ids, sectors and id allocation
//! - [`starship`] - Mobile combat units
//! - [`starbase`] - Stationary strongpoints and their garrison bonus
//! - [`fleet`] - One side's units, docking and fleet-wide orders
//! - [`game`] - Turn state, win conditions and command routing
//! - [`combat`] - Damage, casualty and downtime formulas
//! - [`data`] - Unit classes and starting rosters (RON)
//! - [`math`] - Exact rounding helpers and fixed-point ratios

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod combat;
pub mod components;
pub mod data;
pub mod error;
pub mod fleet;
pub mod game;
pub mod math;
pub mod outcome;
pub mod player;
pub mod starbase;
pub mod starship;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::combat::{Strike, Target};
    pub use crate::components::{Sector, ShipId, StarbaseId};
    pub use crate::data::{GameSetup, Roster, ShipClass, StarbaseClass};
    pub use crate::error::{GameError, Result};
    pub use crate::fleet::{Fleet, Volley};
    pub use crate::game::Game;
    pub use crate::math::Fixed;
    pub use crate::outcome::{Blocked, Outcome};
    pub use crate::player::Player;
    pub use crate::starbase::Starbase;
    pub use crate::starship::Starship;
}
