//! Test fixtures and helpers.
//!
//! Pre-built games and unit classes for consistent testing. Fixtures
//! panic on invalid input; they are only meant for tests and benches.

use fleet_core::components::{ShipId, StarbaseId};
use fleet_core::data::{
    GameSetup, Roster, ShipClass, ShipPlacement, StarbaseClass, StarbasePlacement,
};
use fleet_core::game::Game;
use fleet_core::player::Player;

/// Sector shared by both ships in [`duel`].
pub const DUEL_SECTOR: &str = "Sector 1";

/// Build a ship class from its four stats.
#[must_use]
pub const fn ship_class(
    max_attack: u32,
    max_defence: u32,
    max_crew: u32,
    max_health: u32,
) -> ShipClass {
    ShipClass {
        max_attack,
        max_defence,
        max_crew,
        max_health,
    }
}

/// Build a starbase class from its two stats.
#[must_use]
pub const fn starbase_class(max_health: u32, max_defence: u32) -> StarbaseClass {
    StarbaseClass {
        max_health,
        max_defence,
    }
}

/// The standard two-sided layout.
#[must_use]
pub fn standard_game() -> Game {
    Game::new()
}

/// Build a game from rosters.
///
/// # Panics
///
/// Panics if the rosters fail validation.
#[must_use]
pub fn game_from(player_one: Roster, player_two: Roster) -> Game {
    let setup = GameSetup {
        player_one,
        player_two,
    };
    Game::from_setup(&setup).expect("fixture rosters must be valid")
}

/// A roster with one starbase and `ships` standard ships, all in `sector`.
#[must_use]
pub fn outpost(sector: &str, ships: u32) -> Roster {
    Roster {
        starbases: vec![StarbasePlacement {
            sector: sector.into(),
            class: StarbaseClass::STANDARD,
        }],
        starships: if ships == 0 {
            Vec::new()
        } else {
            vec![ShipPlacement {
                sector: sector.into(),
                class: ShipClass::STANDARD,
                count: ships,
            }]
        },
    }
}

/// Two standard ships of opposing sides facing each other in
/// [`DUEL_SECTOR`]. Each side keeps a starbase at home.
///
/// Returns the game, player one's ship and player two's ship.
///
/// # Panics
///
/// Panics if the game does not contain the expected ships.
#[must_use]
pub fn duel() -> (Game, ShipId, ShipId) {
    let mut player_two = outpost("Sector 2", 0);
    player_two.starships.push(ShipPlacement {
        sector: DUEL_SECTOR.into(),
        class: ShipClass::STANDARD,
        count: 1,
    });
    let game = game_from(outpost(DUEL_SECTOR, 1), player_two);

    let red = ship_ids(&game, Player::One)[0];
    let blue = ship_ids(&game, Player::Two)[0];
    (game, red, blue)
}

/// Player one brings `attackers` ships to player two's starbase, which
/// has `garrison` ships docked.
///
/// Returns the game and the besieged starbase.
///
/// # Panics
///
/// Panics if the garrison cannot dock.
#[must_use]
pub fn siege(attackers: u32, garrison: u32) -> (Game, StarbaseId) {
    let mut game = game_from(outpost("Sector 1", 0), outpost("Sector 2", garrison));
    for _ in 0..attackers {
        game.commission_ship(Player::One, "Sector 2", ShipClass::STANDARD);
    }

    let base = starbase_ids(&game, Player::Two)[0];
    for ship in ship_ids(&game, Player::Two) {
        assert!(game.dock(ship, base).is_applied(), "garrison must dock");
    }
    (game, base)
}

/// Ids of `player`'s ships in fleet order.
#[must_use]
pub fn ship_ids(game: &Game, player: Player) -> Vec<ShipId> {
    game.fleet(player).starships().iter().map(|s| s.id()).collect()
}

/// Ids of `player`'s starbases in fleet order.
#[must_use]
pub fn starbase_ids(game: &Game, player: Player) -> Vec<StarbaseId> {
    game.fleet(player).starbases().iter().map(|b| b.id()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duel_ships_share_a_sector() {
        let (game, red, blue) = duel();
        let red = game.ship(red).expect("red ship");
        let blue = game.ship(blue).expect("blue ship");
        assert_eq!(red.sector(), blue.sector());
        assert_ne!(red.owner(), blue.owner());
    }

    #[test]
    fn test_siege_garrison_is_docked() {
        let (game, base) = siege(3, 2);
        assert_eq!(game.fleet(Player::One).starships().len(), 3);
        assert_eq!(game.starbase(base).map(|b| b.docked_ships().len()), Some(2));
        // 20 + 20 * 2 / 20
        assert_eq!(game.starbase_defence(base), Some(22));
    }

    #[test]
    fn test_class_builders() {
        assert_eq!(ship_class(30, 10, 10, 100), ShipClass::STANDARD);
        assert_eq!(starbase_class(500, 20), StarbaseClass::STANDARD);
    }
}
