//! Scripted battle.
//!
//! A fixed sequence of orders that exercises every rule of the engine:
//! movement, docking, ship-to-ship combat, repair downtime and a full
//! starbase siege. On the standard layout it always ends with player two
//! defeated.

use fleet_core::combat::Target;
use fleet_core::components::ShipId;
use fleet_core::game::Game;
use fleet_core::player::Player;
use fleet_core::starship::Starship;

use crate::protocol::BattleSummary;

/// Upper bound on fleet volleys fired at the starbase.
pub const MAX_SIEGE_VOLLEYS: u32 = 200;

/// Ships of player two sent to dock before the fighting.
const GARRISON_SIZE: usize = 2;

/// Hits player one's lead ship fires in the opening skirmish.
const SKIRMISH_HITS: usize = 2;

fn first_undocked(game: &Game, player: Player) -> Option<ShipId> {
    game.fleet(player)
        .starships()
        .iter()
        .find(|ship| !ship.is_docked() && !ship.is_disabled())
        .map(Starship::id)
}

fn attackers_in_range(game: &Game, target: Target) -> bool {
    let Target::Starbase(base) = target else {
        return false;
    };
    let Some(sector) = game.starbase(base).map(|b| b.sector().clone()) else {
        return false;
    };
    game.fleet(Player::One)
        .starships()
        .iter()
        .any(|ship| !ship.is_disabled() && !ship.is_docked() && *ship.sector() == sector)
}

/// Run the scripted battle on `game`.
///
/// 1. Player one mobilises to player two's first starbase.
/// 2. Up to two undocked player-two ships in that sector dock there.
/// 3. Player one's lead ship hits the first undocked player-two ship twice.
/// 4. The next undocked player-two ship docks and repairs.
/// 5. Player one's fleet besieges the starbase until it falls, moving
///    stragglers back into the sector and giving up once nobody can reach
///    it or [`MAX_SIEGE_VOLLEYS`] have been fired.
pub fn run_scripted_battle(game: &mut Game) -> BattleSummary {
    let mut summary = BattleSummary {
        docked: 0,
        skirmish_hits: 0,
        repair_downtime: None,
        volleys: 0,
        starbase_destroyed: false,
        winner: None,
    };

    let Some((base, sector)) = game
        .fleet(Player::Two)
        .starbases()
        .first()
        .map(|b| (b.id(), b.sector().clone()))
    else {
        tracing::info!("Player two has no starbase; nothing to besiege");
        summary.winner = game.winner().map(|p| p.label().to_string());
        return summary;
    };

    tracing::info!(sector = %sector, "Player one mobilising");
    game.mobilise(Player::One, sector.clone());

    let garrison: Vec<ShipId> = game
        .fleet(Player::Two)
        .starships()
        .iter()
        .filter(|ship| !ship.is_docked() && *ship.sector() == sector)
        .take(GARRISON_SIZE)
        .map(Starship::id)
        .collect();
    for ship in garrison {
        if game.dock(ship, base).is_applied() {
            summary.docked += 1;
        }
    }
    tracing::info!(docked = summary.docked, "Player two garrisoned its starbase");

    let lead = game
        .fleet(Player::One)
        .starships()
        .iter()
        .find(|ship| !ship.is_disabled())
        .map(Starship::id);
    if let (Some(lead), Some(victim)) = (lead, first_undocked(game, Player::Two)) {
        for _ in 0..SKIRMISH_HITS {
            let outcome = game.attack(lead, victim);
            if let Some(strike) = outcome.applied() {
                summary.skirmish_hits += 1;
                if strike.destroyed {
                    break;
                }
            }
        }
        tracing::info!(hits = summary.skirmish_hits, "Opening skirmish over");
    }

    if let Some(straggler) = first_undocked(game, Player::Two) {
        let out_of_place = game
            .ship(straggler)
            .is_some_and(|ship| *ship.sector() != sector);
        if out_of_place {
            game.move_ship(straggler, sector.clone());
        }
        game.dock(straggler, base);
        summary.repair_downtime = game.repair(straggler).applied().copied();
        tracing::info!(downtime = ?summary.repair_downtime, "Player two repaired a ship");
    }

    let target = Target::Starbase(base);
    while game.starbase(base).is_some() && summary.volleys < MAX_SIEGE_VOLLEYS {
        let volley = game.fleet_attack(Player::One, target);
        summary.volleys += 1;
        tracing::debug!(
            volley = summary.volleys,
            damage = volley.total_damage(),
            health = game.starbase(base).map_or(0, |b| b.health()),
            "Siege volley"
        );

        if game.starbase(base).is_some() && !attackers_in_range(game, target) {
            game.mobilise(Player::One, sector.clone());
            if !attackers_in_range(game, target) {
                tracing::info!("No attackers can reach the starbase; siege abandoned");
                break;
            }
        }
    }

    summary.starbase_destroyed = game.starbase(base).is_none();
    summary.winner = game.winner().map(|p| p.label().to_string());
    tracing::info!(
        volleys = summary.volleys,
        destroyed = summary.starbase_destroyed,
        winner = ?summary.winner,
        "Scripted battle complete"
    );
    summary
}
