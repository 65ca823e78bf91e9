//! Starting rosters: which units each side begins the game with.

use serde::{Deserialize, Serialize};

use super::class_data::{ShipClass, StarbaseClass};
use crate::components::Sector;
use crate::error::{GameError, Result};
use crate::player::Player;

/// Sector player one starts in on the standard layout.
pub const PLAYER_ONE_HOME: &str = "Sector 1";

/// Sector player two starts in on the standard layout.
pub const PLAYER_TWO_HOME: &str = "Sector 2";

/// Starships per side on the standard layout.
pub const STANDARD_SHIP_COUNT: u32 = 3;

/// Most starships one roster may commission.
pub const MAX_ROSTER_SHIPS: u64 = 10_000;

/// A starbase to found at game start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarbasePlacement {
    /// Sector the starbase is anchored to.
    pub sector: Sector,

    /// Starbase stats.
    #[serde(default)]
    pub class: StarbaseClass,
}

/// A group of identical starships to commission at game start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipPlacement {
    /// Sector the ships start in.
    pub sector: Sector,

    /// Ship stats.
    #[serde(default)]
    pub class: ShipClass,

    /// Number of ships in the group.
    #[serde(default = "default_count")]
    pub count: u32,
}

const fn default_count() -> u32 {
    1
}

/// Starting units of one side, in commissioning order.
///
/// # Example RON
///
/// ```ron
/// Roster(
///     starbases: [(sector: "Sector 1")],
///     starships: [(sector: "Sector 1", count: 3)],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roster {
    /// Starbases, founded in order.
    #[serde(default)]
    pub starbases: Vec<StarbasePlacement>,

    /// Starship groups, commissioned in order.
    #[serde(default)]
    pub starships: Vec<ShipPlacement>,
}

impl Roster {
    /// One standard starbase and three standard starships in `home`.
    #[must_use]
    pub fn standard(home: impl Into<Sector>) -> Self {
        let home = home.into();
        Self {
            starbases: vec![StarbasePlacement {
                sector: home.clone(),
                class: StarbaseClass::STANDARD,
            }],
            starships: vec![ShipPlacement {
                sector: home,
                class: ShipClass::STANDARD,
                count: STANDARD_SHIP_COUNT,
            }],
        }
    }

    /// Total number of starships this roster commissions.
    #[must_use]
    pub fn ship_count(&self) -> u64 {
        self.starships
            .iter()
            .map(|group| u64::from(group.count))
            .sum()
    }

    /// Check every class, that the side starts with a starbase and that
    /// it commissions at most [`MAX_ROSTER_SHIPS`] starships.
    pub fn validate(&self, player: Player) -> Result<()> {
        if self.starbases.is_empty() {
            return Err(GameError::EmptyRoster(player));
        }
        let ships = self.ship_count();
        if ships > MAX_ROSTER_SHIPS {
            return Err(GameError::RosterTooLarge { player, ships });
        }
        for placement in &self.starbases {
            placement.class.validate()?;
        }
        for group in &self.starships {
            group.class.validate()?;
        }
        Ok(())
    }
}

/// Starting rosters for both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    /// Player one's starting units.
    pub player_one: Roster,

    /// Player two's starting units.
    pub player_two: Roster,
}

impl GameSetup {
    /// The standard layout: each side has one starbase and three starships
    /// in its home sector.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            player_one: Roster::standard(PLAYER_ONE_HOME),
            player_two: Roster::standard(PLAYER_TWO_HOME),
        }
    }

    /// The roster of one player.
    #[must_use]
    pub const fn roster(&self, player: Player) -> &Roster {
        match player {
            Player::One => &self.player_one,
            Player::Two => &self.player_two,
        }
    }

    /// Validate both rosters.
    pub fn validate(&self) -> Result<()> {
        self.player_one.validate(Player::One)?;
        self.player_two.validate(Player::Two)
    }
}

impl Default for GameSetup {
    fn default() -> Self {
        Self::standard()
    }
}
