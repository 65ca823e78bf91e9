//! Unit class data: the maximum stats a starship or starbase is built with.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Maximum stats of a starship class.
///
/// # Example RON
///
/// ```ron
/// ShipClass(
///     max_attack: 30,
///     max_defence: 10,
///     max_crew: 10,
///     max_health: 100,
/// )
/// ```
///
/// Omitted fields take the standard frigate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipClass {
    /// Attack strength at full health.
    #[serde(default = "default_ship_attack")]
    pub max_attack: u32,

    /// Defence strength at full health and crew.
    #[serde(default = "default_ship_defence")]
    pub max_defence: u32,

    /// Crew complement.
    #[serde(default = "default_ship_crew")]
    pub max_crew: u32,

    /// Hull points.
    #[serde(default = "default_ship_health")]
    pub max_health: u32,
}

const fn default_ship_attack() -> u32 {
    30
}

const fn default_ship_defence() -> u32 {
    10
}

const fn default_ship_crew() -> u32 {
    10
}

const fn default_ship_health() -> u32 {
    100
}

impl ShipClass {
    /// The standard starship every fleet starts with.
    pub const STANDARD: Self = Self {
        max_attack: default_ship_attack(),
        max_defence: default_ship_defence(),
        max_crew: default_ship_crew(),
        max_health: default_ship_health(),
    };

    /// Check that the class can be simulated.
    ///
    /// A ship needs hull points to exist and at least one crew member,
    /// since surviving crew never drops below one.
    pub fn validate(&self) -> Result<()> {
        if self.max_health == 0 {
            return Err(GameError::InvalidShipClass(
                "max_health must be at least 1".to_string(),
            ));
        }
        if self.max_crew == 0 {
            return Err(GameError::InvalidShipClass(
                "max_crew must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ShipClass {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Maximum stats of a starbase class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StarbaseClass {
    /// Structure points.
    #[serde(default = "default_starbase_health")]
    pub max_health: u32,

    /// Defence strength at full health with nothing docked.
    #[serde(default = "default_starbase_defence")]
    pub max_defence: u32,
}

const fn default_starbase_health() -> u32 {
    500
}

const fn default_starbase_defence() -> u32 {
    20
}

impl StarbaseClass {
    /// The standard starbase every fleet starts with.
    pub const STANDARD: Self = Self {
        max_health: default_starbase_health(),
        max_defence: default_starbase_defence(),
    };

    /// Check that the class can be simulated.
    ///
    /// `max_defence` divides the docked-ship bonus, so it must be non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_health == 0 {
            return Err(GameError::InvalidStarbaseClass(
                "max_health must be at least 1".to_string(),
            ));
        }
        if self.max_defence == 0 {
            return Err(GameError::InvalidStarbaseClass(
                "max_defence must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StarbaseClass {
    fn default() -> Self {
        Self::STANDARD
    }
}
