//! Headless fleet-combat runner for AI testing and CI verification.
//!
//! This crate provides a headless game runner that can be controlled via
//! JSON commands on stdin, with game state output on stdout. This enables:
//!
//! - **AI testing**: An agent can play either side without a UI
//! - **CI verification**: The scripted battle and state hashes check the
//!   rules end to end
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from controller (move, dock, attack, end_turn, etc.)
//! - **stdout**: State updates and responses (JSON)
//! - **stderr**: Debug logs (human-readable)
//!
//! See [`protocol`] module for the full command/response specification.
//!
//! # Example
//!
//! ```bash
//! # Run interactively
//! echo '{"cmd":"query"}' | cargo run -p fleet_headless
//!
//! # Run a scenario
//! cargo run -p fleet_headless -- run --scenario scenarios/border.ron
//! ```

pub mod battle;
pub mod protocol;
pub mod runner;
pub mod scenario;

pub use battle::run_scripted_battle;
pub use protocol::{BattleSummary, Command, Response};
pub use runner::HeadlessRunner;
pub use scenario::{Scenario, ScenarioError};
