//! Data structures for game configuration.
//!
//! Pure data that defines unit classes and starting rosters. All structs
//! are designed to be deserialized from RON.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `fleet_headless`.

mod class_data;
mod roster_data;

pub use class_data::{ShipClass, StarbaseClass};
pub use roster_data::{
    GameSetup, Roster, ShipPlacement, StarbasePlacement, PLAYER_ONE_HOME, PLAYER_TWO_HOME,
    MAX_ROSTER_SHIPS, STANDARD_SHIP_COUNT,
};
