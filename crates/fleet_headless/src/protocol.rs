//! JSON protocol for headless game communication.
//!
//! The headless runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Commands from the controller
//! **Output (stdout):** Responses and game state
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready","version":"1.0",...}`
//! 2. Controller sends commands as JSON lines, on behalf of whoever's turn
//!    it is
//! 3. Runner answers every command with one or more responses
//! 4. After an `end_turn` that finds a fleet defeated, the runner outputs
//!    `{"type":"game_over",...}`
//!
//! Ship and starbase indices refer to the current player's fleet; target
//! indices refer to the opponent's fleet. Indices are positions in fleet
//! order as reported by `query`.
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","turn":1,"current_player":"Player 1"}
//! -> {"cmd":"fleet_move","sector":"Sector 2"}
//! <- {"type":"outcome","cmd":"fleet_move","results":[...]}
//! -> {"cmd":"attack","ship":0,"target":{"kind":"starbase","index":0}}
//! <- {"type":"outcome","cmd":"attack","results":[{"ship":1,"status":"applied",...}]}
//! -> {"cmd":"end_turn"}
//! <- {"type":"turn_ended","turn":1,"current_player":"Player 2"}
//! ```

use serde::{Deserialize, Serialize};

use fleet_core::combat::Strike;
use fleet_core::components::ShipId;
use fleet_core::game::Game;
use fleet_core::outcome::Outcome;
use fleet_core::player::Player;
use fleet_core::starbase::Starbase;
use fleet_core::starship::Starship;

/// Protocol version reported in the ready message.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (Controller -> Runner)
// ============================================================================

/// Commands that can be sent to the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Move one ship to a sector.
    Move { ship: usize, sector: String },

    /// Dock a ship at one of its fleet's starbases.
    Dock { ship: usize, starbase: usize },

    /// Undock a ship.
    Undock { ship: usize },

    /// Repair a docked ship.
    Repair { ship: usize },

    /// One ship attacks an opponent unit.
    Attack { ship: usize, target: TargetRef },

    /// Move every undocked ship to a sector.
    FleetMove { sector: String },

    /// Every eligible ship attacks an opponent unit.
    FleetAttack { target: TargetRef },

    /// Hand control to the other player.
    EndTurn,

    /// Query the full game state.
    Query,

    /// List occupied sectors.
    Sectors,

    /// Report the state hash (for determinism verification).
    Hash,

    /// Run the scripted battle on the current game.
    Simulate,

    /// Quit the session.
    Quit,
}

/// Kind of opponent unit a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// An opponent starship.
    Ship,
    /// An opponent starbase.
    Starbase,
}

/// An opponent unit, by position in the opponent's fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub index: usize,
}

// ============================================================================
// Output Responses (Runner -> Controller)
// ============================================================================

/// Responses sent from the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept commands.
    Ready {
        version: String,
        turn: u32,
        current_player: String,
    },

    /// Error processing a command. Nothing reached the game.
    Error {
        message: String,
        cmd: Option<String>,
    },

    /// What a unit command did, one result per ship that acted.
    Outcome {
        cmd: String,
        results: Vec<ActionResult>,
    },

    /// Current game state.
    State {
        turn: u32,
        current_player: String,
        game_status: GameStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<String>,
        fleets: Vec<FleetState>,
        hash: u64,
    },

    /// Occupied sectors, sorted.
    Sectors { sectors: Vec<String> },

    /// Control passed to the other player.
    TurnEnded { turn: u32, current_player: String },

    /// A fleet has been defeated.
    GameOver { winner: Option<String>, turn: u32 },

    /// The scripted battle finished.
    Simulated { summary: BattleSummary },

    /// State hash for determinism verification.
    StateHash { turn: u32, hash: u64 },

    /// Goodbye message before shutdown.
    Bye,
}

// ============================================================================
// Report Types
// ============================================================================

/// Overall status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Over,
}

/// How a single action went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Applied,
    Skipped,
    Blocked,
}

/// Hit report for an attack that landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeReport {
    pub damage: u32,
    pub crew_lost: u32,
    pub target_health: u32,
    pub destroyed: bool,
}

impl From<&Strike> for StrikeReport {
    fn from(strike: &Strike) -> Self {
        Self {
            damage: strike.damage,
            crew_lost: strike.crew_lost,
            target_health: strike.remaining_health,
            destroyed: strike.destroyed,
        }
    }
}

/// Result of one ship's action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Id of the acting ship.
    pub ship: u32,
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Downtime left after a skipped action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
    /// Downtime assigned by a repair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<StrikeReport>,
    /// The acting ship after the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<ShipState>,
}

impl ActionResult {
    /// Summarise an outcome without its report.
    pub fn new<T>(ship: ShipId, outcome: &Outcome<T>) -> Self {
        let (status, reason, remaining) = match outcome {
            Outcome::Applied(_) => (ActionStatus::Applied, None, None),
            Outcome::Skipped { remaining } => (ActionStatus::Skipped, None, Some(*remaining)),
            Outcome::Blocked(reason) => {
                (ActionStatus::Blocked, Some(reason.as_str().to_string()), None)
            }
        };
        Self {
            ship: ship.0,
            status,
            reason,
            remaining,
            downtime: None,
            strike: None,
            unit: None,
        }
    }

    /// Summarise a repair.
    pub fn repair(ship: ShipId, outcome: &Outcome<u32>) -> Self {
        Self {
            downtime: outcome.applied().copied(),
            ..Self::new(ship, outcome)
        }
    }

    /// Summarise an attack.
    pub fn attack(ship: ShipId, outcome: &Outcome<Strike>) -> Self {
        Self {
            strike: outcome.applied().map(StrikeReport::from),
            ..Self::new(ship, outcome)
        }
    }

    /// Attach the current state of the acting ship, if it still exists.
    #[must_use]
    pub fn with_unit(mut self, game: &Game) -> Self {
        let id = ShipId(self.ship);
        self.unit = game.owner_of_ship(id).and_then(|owner| {
            let fleet = game.fleet(owner);
            let index = fleet.starships().iter().position(|s| s.id() == id)?;
            Some(ShipState::capture(index, &fleet.starships()[index]))
        });
        self
    }
}

/// State of a single starship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipState {
    pub index: usize,
    pub id: u32,
    pub sector: String,
    pub health: u32,
    pub max_health: u32,
    pub crew: u32,
    pub max_crew: u32,
    pub attack: u32,
    pub defence: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docked_at: Option<u32>,
    pub actions_to_skip: u32,
}

impl ShipState {
    /// Capture a ship at `index` in its fleet.
    #[must_use]
    pub fn capture(index: usize, ship: &Starship) -> Self {
        Self {
            index,
            id: ship.id().0,
            sector: ship.sector().to_string(),
            health: ship.health(),
            max_health: ship.max_health(),
            crew: ship.crew(),
            max_crew: ship.max_crew(),
            attack: ship.current_attack_strength(),
            defence: ship.current_defence_strength(),
            docked_at: ship.docked_at().map(|base| base.0),
            actions_to_skip: ship.actions_to_skip(),
        }
    }
}

/// State of a single starbase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarbaseState {
    pub index: usize,
    pub id: u32,
    pub sector: String,
    pub health: u32,
    pub max_health: u32,
    /// Defence including the garrison bonus.
    pub defence: u32,
    /// Ids of docked ships.
    pub docked: Vec<u32>,
}

impl StarbaseState {
    /// Capture a starbase at `index` in its fleet.
    #[must_use]
    pub fn capture(index: usize, starbase: &Starbase, defence: u32) -> Self {
        Self {
            index,
            id: starbase.id().0,
            sector: starbase.sector().to_string(),
            health: starbase.health(),
            max_health: starbase.max_health(),
            defence,
            docked: starbase.docked_ships().iter().map(|ship| ship.0).collect(),
        }
    }
}

/// State of one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetState {
    pub player: String,
    pub defeated: bool,
    pub starbases: Vec<StarbaseState>,
    pub starships: Vec<ShipState>,
}

impl FleetState {
    /// Capture `player`'s fleet.
    #[must_use]
    pub fn capture(game: &Game, player: Player) -> Self {
        let fleet = game.fleet(player);
        Self {
            player: player.label().to_string(),
            defeated: fleet.is_defeated(),
            starbases: fleet
                .starbases()
                .iter()
                .enumerate()
                .map(|(index, base)| {
                    let defence = fleet.starbase_defence(base.id()).unwrap_or(0);
                    StarbaseState::capture(index, base, defence)
                })
                .collect(),
            starships: fleet
                .starships()
                .iter()
                .enumerate()
                .map(|(index, ship)| ShipState::capture(index, ship))
                .collect(),
        }
    }
}

/// Summary of a scripted battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSummary {
    /// Player two ships docked before the fighting.
    pub docked: usize,
    /// Hits landed in the opening skirmish.
    pub skirmish_hits: usize,
    /// Downtime given to the repaired ship, if one was repaired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_downtime: Option<u32>,
    /// Fleet volleys fired at the starbase.
    pub volleys: u32,
    pub starbase_destroyed: bool,
    pub winner: Option<String>,
}

// ============================================================================
// Helpers
// ============================================================================

impl Response {
    /// Create a ready response.
    pub fn ready(game: &Game) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            turn: game.turn_number(),
            current_player: game.current_player().label().to_string(),
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Create a full state response.
    pub fn state(game: &Game) -> Self {
        Self::State {
            turn: game.turn_number(),
            current_player: game.current_player().label().to_string(),
            game_status: if game.is_game_over() {
                GameStatus::Over
            } else {
                GameStatus::InProgress
            },
            winner: game.winner().map(|p| p.label().to_string()),
            fleets: [Player::One, Player::Two]
                .into_iter()
                .map(|player| FleetState::capture(game, player))
                .collect(),
            hash: game.state_hash(),
        }
    }

    /// Create a game over response.
    pub fn game_over(game: &Game) -> Self {
        Self::GameOver {
            winner: game.winner().map(|p| p.label().to_string()),
            turn: game.turn_number(),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"Serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get command name for responses.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Dock { .. } => "dock",
            Self::Undock { .. } => "undock",
            Self::Repair { .. } => "repair",
            Self::Attack { .. } => "attack",
            Self::FleetMove { .. } => "fleet_move",
            Self::FleetAttack { .. } => "fleet_attack",
            Self::EndTurn => "end_turn",
            Self::Query => "query",
            Self::Sectors => "sectors",
            Self::Hash => "hash",
            Self::Simulate => "simulate",
            Self::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::outcome::Blocked;

    #[test]
    fn test_parse_attack_command() {
        let json = r#"{"cmd":"attack","ship":1,"target":{"kind":"starbase","index":0}}"#;
        let cmd = Command::from_json(json).unwrap();
        assert_eq!(
            cmd,
            Command::Attack {
                ship: 1,
                target: TargetRef {
                    kind: TargetKind::Starbase,
                    index: 0,
                },
            }
        );
        assert_eq!(cmd.name(), "attack");
    }

    #[test]
    fn test_parse_unit_commands() {
        let cmd = Command::from_json(r#"{"cmd":"fleet_move","sector":"Sector 2"}"#).unwrap();
        assert!(matches!(cmd, Command::FleetMove { ref sector } if sector == "Sector 2"));

        let cmd = Command::from_json(r#"{"cmd":"end_turn"}"#).unwrap();
        assert_eq!(cmd, Command::EndTurn);
    }

    #[test]
    fn test_reject_unknown_target_kind() {
        let json = r#"{"cmd":"fleet_attack","target":{"kind":"planet","index":0}}"#;
        assert!(Command::from_json(json).is_err());
    }

    #[test]
    fn test_serialize_state_response() {
        let game = Game::new();
        let json = Response::state(&game).to_json_line();
        assert!(json.ends_with('\n'));
        assert!(json.contains(r#""type":"state""#));
        assert!(json.contains(r#""game_status":"in_progress""#));
        assert!(json.contains(r#""player":"Player 2""#));
        assert!(!json.contains("winner"));
    }

    #[test]
    fn test_blocked_result_carries_reason() {
        let outcome: Outcome = Outcome::Blocked(Blocked::TargetDocked);
        let result = ActionResult::new(ShipId(4), &outcome);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"ship":4,"status":"blocked","reason":"target_docked"}"#
        );
    }
}
