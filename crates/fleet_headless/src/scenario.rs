//! Scenario loading and configuration.
//!
//! Scenarios name a starting layout for headless sessions: which starbases
//! and starships each side begins with, and where.
//!
//! # Example RON
//!
//! ```ron
//! Scenario(
//!     name: "Border skirmish",
//!     description: "Two frigates each, the bases one sector apart",
//!     setup: (
//!         player_one: (
//!             starbases: [(sector: "Vega")],
//!             starships: [(sector: "Vega", count: 2)],
//!         ),
//!         player_two: (
//!             starbases: [(sector: "Deneb", class: (max_health: 800))],
//!             starships: [(sector: "Deneb", count: 2, class: (max_attack: 40))],
//!         ),
//!     ),
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fleet_core::data::GameSetup;
use fleet_core::error::GameError;
use fleet_core::game::Game;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// The rosters were parsed but cannot start a game.
    #[error("Invalid scenario: {0}")]
    Invalid(#[from] GameError),
}

/// A complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Starting rosters. Omitted means the standard layout.
    #[serde(default)]
    pub setup: GameSetup,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::standard()
    }
}

impl Scenario {
    /// The standard layout: one starbase and three starships per side.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            name: "Standard engagement".to_string(),
            description: "One starbase and three starships per side, one sector apart"
                .to_string(),
            setup: GameSetup::standard(),
        }
    }

    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Check that the scenario can start a game.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.setup.validate()?;
        Ok(())
    }

    /// Start a game from this scenario.
    pub fn build_game(&self) -> Result<Game, ScenarioError> {
        let game = Game::from_setup(&self.setup)?;
        tracing::info!(
            scenario = %self.name,
            player_one_ships = self.setup.player_one.ship_count(),
            player_two_ships = self.setup.player_two.ship_count(),
            "Scenario loaded"
        );
        Ok(game)
    }
}

/// Load the scenario at `path`, or the standard one when no path is given.
pub fn load_or_standard(path: Option<&Path>) -> Result<Scenario, ScenarioError> {
    match path {
        Some(path) => Scenario::load(path),
        None => Ok(Scenario::standard()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::player::Player;

    #[test]
    fn test_parse_minimal_scenario() {
        let scenario = Scenario::from_ron_str(r#"Scenario(name: "Plain")"#).unwrap();
        assert_eq!(scenario.name, "Plain");
        assert!(scenario.description.is_empty());
        assert_eq!(scenario.setup, GameSetup::standard());
    }

    #[test]
    fn test_parse_custom_rosters() {
        let ron = r#"
            Scenario(
                name: "Border skirmish",
                setup: (
                    player_one: (
                        starbases: [(sector: "Vega")],
                        starships: [(sector: "Vega", count: 2)],
                    ),
                    player_two: (
                        starbases: [(sector: "Deneb")],
                        starships: [(sector: "Deneb", class: (max_attack: 40))],
                    ),
                ),
            )
        "#;
        let scenario = Scenario::from_ron_str(ron).unwrap();
        let game = scenario.build_game().unwrap();
        assert_eq!(game.fleet(Player::One).starships().len(), 2);
        assert_eq!(game.fleet(Player::Two).starships()[0].max_attack(), 40);
        assert_eq!(
            game.available_sectors()
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>(),
            vec!["Deneb", "Vega"]
        );
    }

    #[test]
    fn test_invalid_rosters_rejected() {
        let ron = r#"
            Scenario(
                name: "No base",
                setup: (
                    player_one: (starbases: [(sector: "Vega")]),
                    player_two: (starships: [(sector: "Deneb")]),
                ),
            )
        "#;
        let scenario = Scenario::from_ron_str(ron).unwrap();
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::Invalid(GameError::EmptyRoster(Player::Two)))
        ));
        assert!(scenario.build_game().is_err());
    }

    #[test]
    fn test_oversized_roster_rejected_before_counting() {
        let ron = r#"
            Scenario(
                name: "Armada",
                setup: (
                    player_one: (
                        starbases: [(sector: "Vega")],
                        starships: [
                            (sector: "Vega", count: 4294967295),
                            (sector: "Vega", count: 2),
                        ],
                    ),
                    player_two: (starbases: [(sector: "Deneb")]),
                ),
            )
        "#;
        let scenario = Scenario::from_ron_str(ron).unwrap();
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::Invalid(GameError::RosterTooLarge {
                player: Player::One,
                ..
            }))
        ));
        assert!(matches!(
            scenario.build_game(),
            Err(ScenarioError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Scenario::from_ron_str("Scenario(name: 7)"),
            Err(ScenarioError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Scenario::load("/nonexistent/scenario.ron"),
            Err(ScenarioError::FileNotFound(_))
        ));
    }
}
