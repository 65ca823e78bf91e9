//! Game session: both fleets, the turn state machine and command routing.
//!
//! Commands name units by id. The game resolves which fleet owns a unit
//! and hands the order to that fleet, so callers never juggle fleets
//! themselves.
//!
//! # Turns
//!
//! Player one moves first. [`Game::switch_turn`] flips control and the
//! turn counter advances each time control returns to player one.
//! Turn order is advisory: commands are not checked against the current
//! player, and the game never ends itself. Drivers consult
//! [`Game::is_game_over`] and [`Game::winner`].
//!
//! # Example
//!
//! ```
//! use fleet_core::game::Game;
//! use fleet_core::player::Player;
//!
//! let mut game = Game::new();
//! let scout = game.fleet(Player::One).starships()[0].id();
//!
//! assert!(game.move_ship(scout, "Sector 2").is_applied());
//! game.switch_turn();
//! assert_eq!(game.current_player(), Player::Two);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::combat::{Strike, Target};
use crate::components::{IdDispenser, Sector, ShipId, StarbaseId};
use crate::data::{GameSetup, Roster, ShipClass, StarbaseClass};
use crate::error::Result;
use crate::fleet::{Fleet, Volley};
use crate::outcome::{Blocked, Outcome};
use crate::player::Player;
use crate::starbase::Starbase;
use crate::starship::Starship;

/// State of one engagement between two fleets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Game {
    player_one: Fleet,
    player_two: Fleet,
    current: Player,
    turn: u32,
    ids: IdDispenser,
}

impl Game {
    /// Start a game on the standard layout.
    #[must_use]
    pub fn new() -> Self {
        Self::empty().populated(&GameSetup::standard())
    }

    /// Start a game from caller-supplied rosters.
    ///
    /// # Errors
    ///
    /// Returns an error if either roster fails validation.
    pub fn from_setup(setup: &GameSetup) -> Result<Self> {
        setup.validate()?;
        Ok(Self::empty().populated(setup))
    }

    fn empty() -> Self {
        Self {
            player_one: Fleet::new(Player::One),
            player_two: Fleet::new(Player::Two),
            current: Player::One,
            turn: 1,
            ids: IdDispenser::new(),
        }
    }

    fn populated(mut self, setup: &GameSetup) -> Self {
        for player in [Player::One, Player::Two] {
            self.deploy(player, setup.roster(player));
        }
        self
    }

    fn deploy(&mut self, player: Player, roster: &Roster) {
        for placement in &roster.starbases {
            self.found_starbase(player, placement.sector.clone(), placement.class);
        }
        for group in &roster.starships {
            for _ in 0..group.count {
                self.commission_ship(player, group.sector.clone(), group.class);
            }
        }
    }

    /// Add a new starship to `player`'s fleet.
    pub fn commission_ship(
        &mut self,
        player: Player,
        sector: impl Into<Sector>,
        class: ShipClass,
    ) -> ShipId {
        let id = self.ids.next_ship();
        self.fleet_mut(player)
            .add_starship(Starship::new(id, player, sector, class));
        id
    }

    /// Add a new starbase to `player`'s fleet.
    pub fn found_starbase(
        &mut self,
        player: Player,
        sector: impl Into<Sector>,
        class: StarbaseClass,
    ) -> StarbaseId {
        let id = self.ids.next_starbase();
        self.fleet_mut(player)
            .add_starbase(Starbase::new(id, player, sector, class));
        id
    }

    /// The fleet of `player`.
    #[must_use]
    pub const fn fleet(&self, player: Player) -> &Fleet {
        match player {
            Player::One => &self.player_one,
            Player::Two => &self.player_two,
        }
    }

    /// Mutable access to the fleet of `player`.
    pub fn fleet_mut(&mut self, player: Player) -> &mut Fleet {
        match player {
            Player::One => &mut self.player_one,
            Player::Two => &mut self.player_two,
        }
    }

    /// Both fleets at once, `player`'s first.
    fn engaged(&mut self, player: Player) -> (&mut Fleet, &mut Fleet) {
        match player {
            Player::One => (&mut self.player_one, &mut self.player_two),
            Player::Two => (&mut self.player_two, &mut self.player_one),
        }
    }

    /// The player whose turn it is.
    #[must_use]
    pub const fn current_player(&self) -> Player {
        self.current
    }

    /// The fleet of the player whose turn it is.
    #[must_use]
    pub const fn current_fleet(&self) -> &Fleet {
        self.fleet(self.current)
    }

    /// The fleet of the player waiting for their turn.
    #[must_use]
    pub const fn opponent_fleet(&self) -> &Fleet {
        self.fleet(self.current.opponent())
    }

    /// Turn counter, starting at 1.
    #[must_use]
    pub const fn turn_number(&self) -> u32 {
        self.turn
    }

    /// Hand control to the other player.
    ///
    /// The turn counter advances when control returns to player one.
    pub fn switch_turn(&mut self) {
        self.current = self.current.opponent();
        if self.current == Player::One {
            self.turn += 1;
        }
        tracing::debug!(turn = self.turn, player = %self.current, "Turn switched");
    }

    /// Whether either fleet has been defeated.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.player_one.is_defeated() || self.player_two.is_defeated()
    }

    /// The only player still in the game, if exactly one is.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        match (self.player_one.is_defeated(), self.player_two.is_defeated()) {
            (false, true) => Some(Player::One),
            (true, false) => Some(Player::Two),
            _ => None,
        }
    }

    /// Sorted, de-duplicated sectors occupied by any unit of either side.
    #[must_use]
    pub fn available_sectors(&self) -> Vec<Sector> {
        let mut sectors = BTreeSet::new();
        for fleet in [&self.player_one, &self.player_two] {
            sectors.extend(fleet.starships().iter().map(Starship::sector));
            sectors.extend(fleet.starbases().iter().map(Starbase::sector));
        }
        sectors.into_iter().cloned().collect()
    }

    /// The player owning a ship, if it still exists.
    #[must_use]
    pub fn owner_of_ship(&self, id: ShipId) -> Option<Player> {
        [Player::One, Player::Two]
            .into_iter()
            .find(|&player| self.fleet(player).ship(id).is_some())
    }

    /// The player owning a starbase, if it still exists.
    #[must_use]
    pub fn owner_of_starbase(&self, id: StarbaseId) -> Option<Player> {
        [Player::One, Player::Two]
            .into_iter()
            .find(|&player| self.fleet(player).starbase(id).is_some())
    }

    /// Look up a ship in either fleet.
    #[must_use]
    pub fn ship(&self, id: ShipId) -> Option<&Starship> {
        self.player_one.ship(id).or_else(|| self.player_two.ship(id))
    }

    /// Look up a starbase in either fleet.
    #[must_use]
    pub fn starbase(&self, id: StarbaseId) -> Option<&Starbase> {
        self.player_one
            .starbase(id)
            .or_else(|| self.player_two.starbase(id))
    }

    /// Current defence of a starbase including its garrison bonus.
    #[must_use]
    pub fn starbase_defence(&self, id: StarbaseId) -> Option<u32> {
        let owner = self.owner_of_starbase(id)?;
        self.fleet(owner).starbase_defence(id)
    }

    /// Move a ship to `sector`.
    pub fn move_ship(&mut self, ship: ShipId, sector: impl Into<Sector>) -> Outcome {
        match self.owner_of_ship(ship) {
            Some(owner) => self.fleet_mut(owner).move_ship(ship, sector),
            None => Outcome::Blocked(Blocked::UnknownUnit),
        }
    }

    /// Dock a ship at a friendly starbase in its sector.
    pub fn dock(&mut self, ship: ShipId, starbase: StarbaseId) -> Outcome {
        match self.owner_of_ship(ship) {
            Some(owner) => self.fleet_mut(owner).dock_ship(ship, starbase),
            None => Outcome::Blocked(Blocked::UnknownUnit),
        }
    }

    /// Release a ship from its starbase.
    pub fn undock(&mut self, ship: ShipId) -> Outcome {
        match self.owner_of_ship(ship) {
            Some(owner) => self.fleet_mut(owner).undock_ship(ship),
            None => Outcome::Blocked(Blocked::UnknownUnit),
        }
    }

    /// Repair a docked ship. Reports the downtime it was given.
    pub fn repair(&mut self, ship: ShipId) -> Outcome<u32> {
        match self.owner_of_ship(ship) {
            Some(owner) => self.fleet_mut(owner).repair_ship(ship),
            None => Outcome::Blocked(Blocked::UnknownUnit),
        }
    }

    /// Order a ship to attack a target.
    pub fn attack(&mut self, ship: ShipId, target: impl Into<Target>) -> Outcome<Strike> {
        let Some(owner) = self.owner_of_ship(ship) else {
            return Outcome::Blocked(Blocked::UnknownUnit);
        };
        let (own, enemy) = self.engaged(owner);
        own.order_attack(ship, enemy, target.into())
    }

    /// Move every undocked ship of `player` to `sector`.
    pub fn mobilise(
        &mut self,
        player: Player,
        sector: impl Into<Sector>,
    ) -> Vec<(ShipId, Outcome)> {
        self.fleet_mut(player).mobilise_to_sector(sector)
    }

    /// Attack `target` with every eligible ship of `player`.
    pub fn fleet_attack(&mut self, player: Player, target: impl Into<Target>) -> Volley {
        let (own, enemy) = self.engaged(player);
        let volley = own.attack_target(enemy, target.into());
        if self.is_game_over() {
            tracing::info!(winner = ?self.winner(), turn = self.turn, "Game over");
        }
        volley
    }

    /// Hash of the complete game state.
    ///
    /// Two games that received the same commands from the same setup
    /// produce the same hash.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ShipPlacement, StarbasePlacement};
    use crate::error::GameError;

    fn ships(game: &Game, player: Player) -> Vec<ShipId> {
        game.fleet(player).starships().iter().map(Starship::id).collect()
    }

    fn home_base(game: &Game, player: Player) -> StarbaseId {
        game.fleet(player).starbases()[0].id()
    }

    #[test]
    fn test_standard_layout() {
        let game = Game::new();
        for (player, home) in [(Player::One, "Sector 1"), (Player::Two, "Sector 2")] {
            let fleet = game.fleet(player);
            assert_eq!(fleet.starbases().len(), 1);
            assert_eq!(fleet.starships().len(), 3);
            assert_eq!(fleet.starbases()[0].health(), 500);
            assert_eq!(fleet.starbases()[0].max_defence(), 20);
            assert!(fleet.starships().iter().all(|s| s.sector().as_str() == home));
            assert!(fleet.starships().iter().all(|s| s.max_attack() == 30));
        }
        assert_eq!(game.turn_number(), 1);
        assert_eq!(game.current_player(), Player::One);
        assert!(!game.is_game_over());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_ids_are_unique_across_fleets() {
        let game = Game::new();
        let mut all: Vec<u32> = [Player::One, Player::Two]
            .into_iter()
            .flat_map(|p| ships(&game, p))
            .map(|id| id.0)
            .collect();
        all.extend(
            [Player::One, Player::Two]
                .into_iter()
                .map(|p| home_base(&game, p).0),
        );
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn test_turn_counter_advances_on_return_to_player_one() {
        let mut game = Game::new();
        game.switch_turn();
        assert_eq!(game.current_player(), Player::Two);
        assert_eq!(game.turn_number(), 1);
        assert_eq!(game.current_fleet().owner(), Player::Two);
        assert_eq!(game.opponent_fleet().owner(), Player::One);

        game.switch_turn();
        assert_eq!(game.current_player(), Player::One);
        assert_eq!(game.turn_number(), 2);
    }

    #[test]
    fn test_available_sectors_sorted_and_unique() {
        let mut game = Game::new();
        let scout = ships(&game, Player::Two)[0];
        assert!(game.move_ship(scout, "Andromeda").is_applied());

        let sectors: Vec<String> = game
            .available_sectors()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(sectors, ["Andromeda", "Sector 1", "Sector 2"]);
    }

    #[test]
    fn test_commands_route_to_owner() {
        let mut game = Game::new();
        let attacker = ships(&game, Player::One)[0];
        let defender = ships(&game, Player::Two)[0];

        assert!(game.move_ship(attacker, "Sector 2").is_applied());
        let strike = game
            .attack(attacker, defender)
            .into_applied()
            .expect("co-located enemy should be hit");
        assert_eq!(strike.damage, 20);
        assert_eq!(game.ship(defender).map(Starship::health), Some(80));
        assert_eq!(game.ship(defender).map(Starship::crew), Some(8));

        // Player two can answer without switching turns
        let counter = game.attack(defender, attacker).into_applied();
        assert!(counter.is_some());
    }

    #[test]
    fn test_unknown_units_are_blocked() {
        let mut game = Game::new();
        let ghost = ShipId(999);
        let base = home_base(&game, Player::Two);
        assert_eq!(
            game.move_ship(ghost, "Sector 1"),
            Outcome::Blocked(Blocked::UnknownUnit)
        );
        assert_eq!(game.repair(ghost), Outcome::Blocked(Blocked::UnknownUnit));
        assert_eq!(
            game.attack(ghost, base),
            Outcome::Blocked(Blocked::UnknownUnit)
        );
    }

    #[test]
    fn test_dock_repair_cycle() {
        let mut game = Game::new();
        let attacker = ships(&game, Player::One)[0];
        let defender = ships(&game, Player::Two)[0];
        let base = home_base(&game, Player::Two);

        assert!(game.move_ship(attacker, "Sector 2").is_applied());
        assert!(game.attack(attacker, defender).is_applied());
        assert!(game.attack(attacker, defender).is_applied());
        assert_eq!(game.ship(defender).map(Starship::health), Some(58));
        assert_eq!(game.ship(defender).map(Starship::crew), Some(6));

        assert!(game.dock(defender, base).is_applied());
        assert_eq!(
            game.attack(attacker, defender),
            Outcome::Blocked(Blocked::TargetDocked)
        );
        assert_eq!(game.repair(defender), Outcome::Applied(2));
        assert_eq!(game.ship(defender).map(Starship::health), Some(100));

        // Downtime eats the next two actions
        assert_eq!(game.undock(defender), Outcome::Skipped { remaining: 1 });
        assert_eq!(game.undock(defender), Outcome::Skipped { remaining: 0 });
        assert!(game.undock(defender).is_applied());
    }

    #[test]
    fn test_docking_at_enemy_base_is_refused() {
        let mut game = Game::new();
        let ship = ships(&game, Player::One)[0];
        let enemy_base = home_base(&game, Player::Two);
        assert!(game.move_ship(ship, "Sector 2").is_applied());
        assert_eq!(
            game.dock(ship, enemy_base),
            Outcome::Blocked(Blocked::ForeignStarbase)
        );
    }

    #[test]
    fn test_siege_ends_the_game() {
        let mut game = Game::new();
        let base = home_base(&game, Player::Two);
        game.mobilise(Player::One, "Sector 2");

        let mut volleys = 0;
        while !game.is_game_over() {
            let volley = game.fleet_attack(Player::One, base);
            assert!(!volley.attacks.is_empty());
            volleys += 1;
            assert!(volleys < 100);
        }

        assert!(game.starbase(base).is_none());
        assert!(game.fleet(Player::Two).is_defeated());
        assert_eq!(game.winner(), Some(Player::One));
        // Undocked defenders survive the loss of their base
        assert_eq!(game.fleet(Player::Two).starships().len(), 3);
    }

    #[test]
    fn test_both_defeated_has_no_winner() {
        let mut game = Game::new();
        for player in [Player::One, Player::Two] {
            let base = home_base(&game, player);
            game.fleet_mut(player).remove_starbase(base);
        }
        assert!(game.is_game_over());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_from_setup_validates() {
        let mut setup = GameSetup::standard();
        setup.player_two = Roster {
            starbases: Vec::new(),
            starships: vec![ShipPlacement {
                sector: Sector::new("Sector 2"),
                class: ShipClass::STANDARD,
                count: 2,
            }],
        };
        assert!(matches!(
            Game::from_setup(&setup),
            Err(GameError::EmptyRoster(Player::Two))
        ));

        setup.player_two.starbases.push(StarbasePlacement {
            sector: Sector::new("Sector 9"),
            class: StarbaseClass::STANDARD,
        });
        let game = Game::from_setup(&setup).expect("valid setup");
        assert_eq!(game.fleet(Player::Two).starships().len(), 2);
        assert_eq!(
            game.fleet(Player::Two).starbases()[0].sector().as_str(),
            "Sector 9"
        );
    }

    #[test]
    fn test_state_hash_tracks_changes() {
        let mut a = Game::new();
        let b = Game::new();
        assert_eq!(a.state_hash(), b.state_hash());

        let ship = ships(&a, Player::One)[0];
        assert!(a.move_ship(ship, "Sector 3").is_applied());
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
