//! Headless game runner implementation.
//!
//! The runner owns a [`Game`] and turns protocol commands into engine
//! calls. Indices in commands are resolved against the fleets here; a
//! command with an out-of-range index is answered with an error and never
//! reaches the engine.

use std::io::{self, BufRead, Write};

use fleet_core::combat::Target;
use fleet_core::components::{ShipId, StarbaseId};
use fleet_core::game::Game;

use crate::battle::run_scripted_battle;
use crate::protocol::{ActionResult, Command, Response, TargetKind, TargetRef};

/// Headless runner for controller-driven play.
#[derive(Debug, Clone)]
pub struct HeadlessRunner {
    game: Game,
    should_quit: bool,
}

impl HeadlessRunner {
    /// Create a runner on the standard layout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_game(Game::new())
    }

    /// Create a runner for an existing game.
    #[must_use]
    pub fn with_game(game: Game) -> Self {
        Self {
            game,
            should_quit: false,
        }
    }

    /// The game being played.
    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Whether a `quit` command has been received.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the command loop until `quit` or end of input.
    ///
    /// Writes a ready message first and a goodbye message last.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        write_response(&mut output, &Response::ready(&self.game))?;

        for line in input.lines() {
            let line = line?;
            for response in self.handle_line(&line) {
                write_response(&mut output, &response)?;
            }
            if self.should_quit {
                return Ok(());
            }
        }

        write_response(&mut output, &Response::Bye)
    }

    /// Parse and handle one input line. Blank lines produce no output.
    pub fn handle_line(&mut self, line: &str) -> Vec<Response> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }
        match Command::from_json(line) {
            Ok(cmd) => self.handle(cmd),
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable command");
                vec![Response::error(format!("Parse error: {e}"), None)]
            }
        }
    }

    /// Handle one command.
    pub fn handle(&mut self, cmd: Command) -> Vec<Response> {
        let name = cmd.name();
        tracing::debug!(cmd = name, player = %self.game.current_player(), "Handling command");
        match self.dispatch(cmd) {
            Ok(responses) => responses,
            Err(message) => {
                tracing::debug!(cmd = name, %message, "Command rejected");
                vec![Response::error(message, Some(name))]
            }
        }
    }

    fn dispatch(&mut self, cmd: Command) -> Result<Vec<Response>, String> {
        let name = cmd.name();
        let response = match cmd {
            Command::Move { ship, sector } => {
                let id = self.own_ship(ship)?;
                let outcome = self.game.move_ship(id, sector);
                self.outcome(name, vec![ActionResult::new(id, &outcome)])
            }
            Command::Dock { ship, starbase } => {
                let id = self.own_ship(ship)?;
                let base = self.own_starbase(starbase)?;
                let outcome = self.game.dock(id, base);
                self.outcome(name, vec![ActionResult::new(id, &outcome)])
            }
            Command::Undock { ship } => {
                let id = self.own_ship(ship)?;
                let outcome = self.game.undock(id);
                self.outcome(name, vec![ActionResult::new(id, &outcome)])
            }
            Command::Repair { ship } => {
                let id = self.own_ship(ship)?;
                let outcome = self.game.repair(id);
                self.outcome(name, vec![ActionResult::repair(id, &outcome)])
            }
            Command::Attack { ship, target } => {
                let id = self.own_ship(ship)?;
                let target = self.enemy_target(target)?;
                let outcome = self.game.attack(id, target);
                self.outcome(name, vec![ActionResult::attack(id, &outcome)])
            }
            Command::FleetMove { sector } => {
                let player = self.game.current_player();
                let results = self
                    .game
                    .mobilise(player, sector)
                    .iter()
                    .map(|(id, outcome)| ActionResult::new(*id, outcome))
                    .collect();
                self.outcome(name, results)
            }
            Command::FleetAttack { target } => {
                let target = self.enemy_target(target)?;
                let player = self.game.current_player();
                let results = self
                    .game
                    .fleet_attack(player, target)
                    .attacks
                    .iter()
                    .map(|(id, outcome)| ActionResult::attack(*id, outcome))
                    .collect();
                self.outcome(name, results)
            }
            Command::EndTurn => return Ok(self.end_turn()),
            Command::Query => Response::state(&self.game),
            Command::Sectors => Response::Sectors {
                sectors: self
                    .game
                    .available_sectors()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            },
            Command::Hash => Response::StateHash {
                turn: self.game.turn_number(),
                hash: self.game.state_hash(),
            },
            Command::Simulate => Response::Simulated {
                summary: run_scripted_battle(&mut self.game),
            },
            Command::Quit => {
                self.should_quit = true;
                Response::Bye
            }
        };
        Ok(vec![response])
    }

    fn outcome(&self, cmd: &str, results: Vec<ActionResult>) -> Response {
        Response::Outcome {
            cmd: cmd.to_string(),
            results: results
                .into_iter()
                .map(|result| result.with_unit(&self.game))
                .collect(),
        }
    }

    fn end_turn(&mut self) -> Vec<Response> {
        self.game.switch_turn();
        let mut responses = vec![Response::TurnEnded {
            turn: self.game.turn_number(),
            current_player: self.game.current_player().label().to_string(),
        }];
        if self.game.is_game_over() {
            tracing::info!(winner = ?self.game.winner(), "Game over");
            responses.push(Response::game_over(&self.game));
        }
        responses
    }

    fn own_ship(&self, index: usize) -> Result<ShipId, String> {
        self.game
            .current_fleet()
            .starships()
            .get(index)
            .map(|ship| ship.id())
            .ok_or_else(|| format!("Invalid ship index: {index}"))
    }

    fn own_starbase(&self, index: usize) -> Result<StarbaseId, String> {
        self.game
            .current_fleet()
            .starbases()
            .get(index)
            .map(|base| base.id())
            .ok_or_else(|| format!("Invalid starbase index: {index}"))
    }

    fn enemy_target(&self, target: TargetRef) -> Result<Target, String> {
        let enemy = self.game.opponent_fleet();
        match target.kind {
            TargetKind::Ship => enemy
                .starships()
                .get(target.index)
                .map(|ship| Target::Ship(ship.id()))
                .ok_or_else(|| format!("Invalid target ship index: {}", target.index)),
            TargetKind::Starbase => enemy
                .starbases()
                .get(target.index)
                .map(|base| Target::Starbase(base.id()))
                .ok_or_else(|| format!("Invalid target starbase index: {}", target.index)),
        }
    }
}

impl Default for HeadlessRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn write_response<W: Write>(output: &mut W, response: &Response) -> io::Result<()> {
    output.write_all(response.to_json_line().as_bytes())?;
    output.flush()
}
