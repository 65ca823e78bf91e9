//! Error types for game configuration.
//!
//! Unit actions never fail with an error; they report an
//! [`Outcome`](crate::outcome::Outcome). Errors only arise while building a
//! game from caller-supplied rosters.

use thiserror::Error;

use crate::player::Player;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for game setup.
#[derive(Debug, Error)]
pub enum GameError {
    /// A starship class has stats that break the combat formulas.
    #[error("Invalid ship class: {0}")]
    InvalidShipClass(String),

    /// A starbase class has stats that break the combat formulas.
    #[error("Invalid starbase class: {0}")]
    InvalidStarbaseClass(String),

    /// A roster would start the game already defeated.
    #[error("Roster for {0} has no starbases")]
    EmptyRoster(Player),

    /// A roster commissions more starships than a game can hold.
    #[error("Roster for {player} commissions {ships} starships, more than a game can hold")]
    RosterTooLarge {
        /// Side the roster belongs to.
        player: Player,
        /// Starships the roster asked for.
        ships: u64,
    },
}
