//! Scripted player actions.
//!
//! A [`GameAction`] names units by position rather than id, relative to
//! whoever's turn it is: ship and starbase indices pick from the current
//! player's fleet, target indices from the opponent's. Indices wrap around
//! the fleet size, so any generated action sequence is meaningful on any
//! game. This makes actions a good input for property tests.

use fleet_core::combat::Target;
use fleet_core::components::Sector;
use fleet_core::game::Game;

/// Sectors scripted moves choose from.
pub const SECTORS: [&str; 3] = ["Sector 1", "Sector 2", "Sector 3"];

/// A target chosen by position in the opponent's fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPick {
    /// The n-th ship of the opponent.
    Ship(usize),
    /// The n-th starbase of the opponent.
    Starbase(usize),
}

/// One player action, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move a ship to one of [`SECTORS`].
    Move {
        /// Ship index.
        ship: usize,
        /// Sector index.
        sector: usize,
    },
    /// Dock a ship at a starbase of its own fleet.
    Dock {
        /// Ship index.
        ship: usize,
        /// Starbase index.
        starbase: usize,
    },
    /// Undock a ship.
    Undock {
        /// Ship index.
        ship: usize,
    },
    /// Repair a ship.
    Repair {
        /// Ship index.
        ship: usize,
    },
    /// One ship attacks an opponent unit.
    Attack {
        /// Ship index.
        ship: usize,
        /// Opponent unit.
        target: TargetPick,
    },
    /// Move the whole fleet to one of [`SECTORS`].
    Mobilise {
        /// Sector index.
        sector: usize,
    },
    /// The whole fleet attacks an opponent unit.
    FleetAttack {
        /// Opponent unit.
        target: TargetPick,
    },
    /// Hand control to the other player.
    EndTurn,
}

fn pick<T: Copy>(items: &[T], index: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[index % items.len()])
    }
}

fn sector(index: usize) -> Sector {
    Sector::new(SECTORS[index % SECTORS.len()])
}

fn resolve_target(game: &Game, target: TargetPick) -> Option<Target> {
    let enemy = game.opponent_fleet();
    match target {
        TargetPick::Ship(index) => {
            let ids: Vec<_> = enemy.starships().iter().map(|s| s.id()).collect();
            pick(&ids, index).map(Target::Ship)
        }
        TargetPick::Starbase(index) => {
            let ids: Vec<_> = enemy.starbases().iter().map(|b| b.id()).collect();
            pick(&ids, index).map(Target::Starbase)
        }
    }
}

/// Apply one action to `game`.
///
/// Returns whether anything took effect. Actions that name a unit the
/// current fleet does not have are dropped.
pub fn apply_action(game: &mut Game, action: GameAction) -> bool {
    let player = game.current_player();
    let ships: Vec<_> = game.current_fleet().starships().iter().map(|s| s.id()).collect();
    let bases: Vec<_> = game.current_fleet().starbases().iter().map(|b| b.id()).collect();

    tracing::trace!(?action, %player, "Applying scripted action");

    match action {
        GameAction::Move { ship, sector: to } => {
            pick(&ships, ship).is_some_and(|id| game.move_ship(id, sector(to)).is_applied())
        }
        GameAction::Dock { ship, starbase } => match (pick(&ships, ship), pick(&bases, starbase)) {
            (Some(id), Some(base)) => game.dock(id, base).is_applied(),
            _ => false,
        },
        GameAction::Undock { ship } => {
            pick(&ships, ship).is_some_and(|id| game.undock(id).is_applied())
        }
        GameAction::Repair { ship } => {
            pick(&ships, ship).is_some_and(|id| game.repair(id).is_applied())
        }
        GameAction::Attack { ship, target } => {
            match (pick(&ships, ship), resolve_target(game, target)) {
                (Some(id), Some(target)) => game.attack(id, target).is_applied(),
                _ => false,
            }
        }
        GameAction::Mobilise { sector: to } => game
            .mobilise(player, sector(to))
            .iter()
            .any(|(_, outcome)| outcome.is_applied()),
        GameAction::FleetAttack { target } => match resolve_target(game, target) {
            Some(target) => game.fleet_attack(player, target).strikes().next().is_some(),
            None => false,
        },
        GameAction::EndTurn => {
            game.switch_turn();
            true
        }
    }
}

/// Apply a sequence of actions. Returns how many took effect.
pub fn run_script(game: &mut Game, actions: &[GameAction]) -> usize {
    actions
        .iter()
        .filter(|&&action| apply_action(game, action))
        .count()
}
