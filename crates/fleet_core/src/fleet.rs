//! Fleets: every starship and starbase belonging to one side.
//!
//! The fleet is the authority over its units. It resolves ids, keeps the
//! ship/starbase docking relation consistent on both ends, and removes
//! units as soon as a hit disables them.
//!
//! # Iteration
//!
//! Fleet-wide orders run over a snapshot of ship ids taken before the
//! first ship acts. Each ship (and the target) is looked up again on
//! every step, so units destroyed mid-order are neither skipped over nor
//! visited twice.

use crate::combat::{calculate_damage, Strike, Target};
use crate::components::{Sector, ShipId, StarbaseId};
use crate::outcome::{Blocked, Outcome};
use crate::player::Player;
use crate::starbase::Starbase;
use crate::starship::Starship;

/// Result of a fleet-wide attack order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volley {
    /// What the fleet fired on.
    pub target: Target,
    /// Each participating ship and what its attack did, in fleet order.
    pub attacks: Vec<(ShipId, Outcome<Strike>)>,
    /// Whether the target was destroyed during the volley.
    pub target_destroyed: bool,
}

impl Volley {
    fn new(target: Target) -> Self {
        Self {
            target,
            attacks: Vec::new(),
            target_destroyed: false,
        }
    }

    /// Attacks that landed.
    pub fn strikes(&self) -> impl Iterator<Item = &Strike> {
        self.attacks
            .iter()
            .filter_map(|(_, outcome)| outcome.applied())
    }

    /// Total damage dealt by the volley.
    #[must_use]
    pub fn total_damage(&self) -> u32 {
        self.strikes().map(|strike| strike.damage).sum()
    }
}

/// Where a potential target sits and whether it can be fired upon.
struct Bearing<'a> {
    owner: Player,
    sector: &'a Sector,
    docked: bool,
}

/// All units of one side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fleet {
    owner: Player,
    starships: Vec<Starship>,
    starbases: Vec<Starbase>,
}

impl Fleet {
    /// Create an empty fleet for `owner`.
    #[must_use]
    pub const fn new(owner: Player) -> Self {
        Self {
            owner,
            starships: Vec::new(),
            starbases: Vec::new(),
        }
    }

    /// The side this fleet belongs to.
    #[must_use]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    /// Display label of the owning player.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.owner.label()
    }

    /// Starships in insertion order.
    #[must_use]
    pub fn starships(&self) -> &[Starship] {
        &self.starships
    }

    /// Starbases in insertion order.
    #[must_use]
    pub fn starbases(&self) -> &[Starbase] {
        &self.starbases
    }

    /// Look up a starship by id.
    #[must_use]
    pub fn ship(&self, id: ShipId) -> Option<&Starship> {
        self.starships.iter().find(|ship| ship.id() == id)
    }

    /// Look up a starbase by id.
    #[must_use]
    pub fn starbase(&self, id: StarbaseId) -> Option<&Starbase> {
        self.starbases.iter().find(|base| base.id() == id)
    }

    pub(crate) fn ship_mut(&mut self, id: ShipId) -> Option<&mut Starship> {
        self.starships.iter_mut().find(|ship| ship.id() == id)
    }

    fn starbase_mut(&mut self, id: StarbaseId) -> Option<&mut Starbase> {
        self.starbases.iter_mut().find(|base| base.id() == id)
    }

    /// Whether `target` is one of this fleet's units.
    #[must_use]
    pub fn contains(&self, target: Target) -> bool {
        match target {
            Target::Ship(id) => self.ship(id).is_some(),
            Target::Starbase(id) => self.starbase(id).is_some(),
        }
    }

    /// Whether the fleet has lost every starbase.
    ///
    /// A fleet with starbases but no ships is still in the game.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.starbases.is_empty()
    }

    /// Add a starship.
    ///
    /// Returns whether the ship joined. Ships owned by the other player
    /// are refused, and adding a ship whose id is already present is a
    /// no-op.
    pub fn add_starship(&mut self, ship: Starship) -> bool {
        if ship.owner() != self.owner {
            tracing::warn!(fleet = self.label(), ship = %ship.id(), "Refused foreign starship");
            return false;
        }
        if self.ship(ship.id()).is_some() {
            return false;
        }
        self.starships.push(ship);
        true
    }

    /// Add a starbase.
    ///
    /// Returns whether the starbase joined. Starbases owned by the other
    /// player are refused, and adding a starbase whose id is already
    /// present is a no-op.
    pub fn add_starbase(&mut self, starbase: Starbase) -> bool {
        if starbase.owner() != self.owner {
            tracing::warn!(
                fleet = self.label(),
                starbase = %starbase.id(),
                "Refused foreign starbase"
            );
            return false;
        }
        if self.starbase(starbase.id()).is_some() {
            return false;
        }
        self.starbases.push(starbase);
        true
    }

    /// Remove a starship, undocking it first if needed.
    pub fn remove_starship(&mut self, id: ShipId) -> Option<Starship> {
        let index = self.starships.iter().position(|ship| ship.id() == id)?;
        let mut ship = self.starships.remove(index);
        if let Some(base) = ship.detach() {
            if let Some(base) = self.starbase_mut(base) {
                base.undock_ship(id);
            }
        }
        Some(ship)
    }

    /// Remove a starbase together with every ship docked at it.
    ///
    /// Docked ships are released without consulting their downtime and
    /// then removed from the fleet.
    pub fn remove_starbase(&mut self, id: StarbaseId) -> Option<Starbase> {
        let index = self.starbases.iter().position(|base| base.id() == id)?;
        let starbase = self.starbases.remove(index);

        for &ship in starbase.docked_ships() {
            if let Some(docked) = self.ship_mut(ship) {
                docked.detach();
            }
            self.remove_starship(ship);
        }

        tracing::info!(
            fleet = self.label(),
            starbase = %id,
            garrison_lost = starbase.docked_ships().len(),
            "Starbase destroyed"
        );
        if self.is_defeated() {
            tracing::info!(fleet = self.label(), "Fleet defeated");
        }
        Some(starbase)
    }

    /// Current defence of one of this fleet's starbases, including the
    /// bonus from its docked ships.
    #[must_use]
    pub fn starbase_defence(&self, id: StarbaseId) -> Option<u32> {
        let base = self.starbase(id)?;
        let garrison = base
            .docked_ships()
            .iter()
            .filter_map(|&ship| self.ship(ship));
        Some(base.current_defence_strength(garrison))
    }

    /// Current defence of any unit of this fleet.
    #[must_use]
    pub fn defence_of(&self, target: Target) -> Option<u32> {
        match target {
            Target::Ship(id) => self.ship(id).map(Starship::current_defence_strength),
            Target::Starbase(id) => self.starbase_defence(id),
        }
    }

    fn bearing(&self, target: Target) -> Option<Bearing<'_>> {
        match target {
            Target::Ship(id) => self.ship(id).map(|ship| Bearing {
                owner: ship.owner(),
                sector: ship.sector(),
                docked: ship.is_docked(),
            }),
            Target::Starbase(id) => self.starbase(id).map(|base| Bearing {
                owner: base.owner(),
                sector: base.sector(),
                docked: false,
            }),
        }
    }

    /// Move one ship to `sector`.
    pub fn move_ship(&mut self, id: ShipId, sector: impl Into<Sector>) -> Outcome {
        match self.ship_mut(id) {
            Some(ship) => ship.move_to_sector(sector),
            None => Outcome::Blocked(Blocked::UnknownUnit),
        }
    }

    /// Repair one docked ship. Reports the downtime it was given.
    pub fn repair_ship(&mut self, id: ShipId) -> Outcome<u32> {
        match self.ship_mut(id) {
            Some(ship) => ship.repair(),
            None => Outcome::Blocked(Blocked::UnknownUnit),
        }
    }

    /// Dock a ship at one of this fleet's starbases in the same sector.
    ///
    /// A starbase id that does not belong to this fleet is reported as
    /// [`Blocked::ForeignStarbase`].
    pub fn dock_ship(&mut self, ship_id: ShipId, base_id: StarbaseId) -> Outcome {
        let Some(ship) = self.ship_mut(ship_id) else {
            return Outcome::Blocked(Blocked::UnknownUnit);
        };
        if let Some(skipped) = ship.stand_down() {
            return skipped;
        }
        if ship.is_docked() {
            return Outcome::Blocked(Blocked::AlreadyDocked);
        }
        let ship_sector = ship.sector().clone();

        let Some(base) = self.starbase_mut(base_id) else {
            return Outcome::Blocked(Blocked::ForeignStarbase);
        };
        if *base.sector() != ship_sector {
            return Outcome::Blocked(Blocked::OutOfSector);
        }
        base.dock_ship(ship_id);

        if let Some(ship) = self.ship_mut(ship_id) {
            ship.attach(base_id);
        }
        tracing::debug!(ship = %ship_id, starbase = %base_id, "Ship docked");
        Outcome::DONE
    }

    /// Release a ship from the starbase it is docked at.
    pub fn undock_ship(&mut self, ship_id: ShipId) -> Outcome {
        let Some(ship) = self.ship_mut(ship_id) else {
            return Outcome::Blocked(Blocked::UnknownUnit);
        };
        if let Some(skipped) = ship.stand_down() {
            return skipped;
        }
        let Some(base_id) = ship.detach() else {
            return Outcome::Blocked(Blocked::NotDocked);
        };
        if let Some(base) = self.starbase_mut(base_id) {
            base.undock_ship(ship_id);
        }
        tracing::debug!(ship = %ship_id, starbase = %base_id, "Ship undocked");
        Outcome::DONE
    }

    /// Order one of this fleet's ships to attack a unit of `enemy`.
    ///
    /// Targets that belong to this fleet are refused as friendly. The
    /// strike is applied to `enemy`, which removes the target if it is
    /// destroyed.
    pub fn order_attack(
        &mut self,
        attacker: ShipId,
        enemy: &mut Fleet,
        target: Target,
    ) -> Outcome<Strike> {
        let Some(ship) = self.ship_mut(attacker) else {
            return Outcome::Blocked(Blocked::UnknownUnit);
        };
        if let Some(skipped) = ship.stand_down() {
            return skipped;
        }

        let Some(ship) = self.ship(attacker) else {
            return Outcome::Blocked(Blocked::UnknownUnit);
        };
        if ship.is_docked() {
            return Outcome::Blocked(Blocked::Docked);
        }
        let Some(bearing) = self.bearing(target).or_else(|| enemy.bearing(target)) else {
            return Outcome::Blocked(Blocked::TargetMissing);
        };
        if let Err(reason) = ship.engagement_check(bearing.owner, bearing.sector) {
            return Outcome::Blocked(reason);
        }
        if bearing.docked {
            return Outcome::Blocked(Blocked::TargetDocked);
        }

        let attack = ship.current_attack_strength();
        let defence = enemy.defence_of(target).unwrap_or(0);
        let damage = calculate_damage(attack, defence);

        match enemy.take_hit(attacker, target, damage) {
            Some(strike) => Outcome::Applied(strike),
            None => Outcome::Blocked(Blocked::TargetMissing),
        }
    }

    /// Apply `damage` to one of this fleet's units and remove it if the
    /// hit disabled it.
    fn take_hit(&mut self, attacker: ShipId, target: Target, damage: u32) -> Option<Strike> {
        let (crew_lost, remaining_health, destroyed) = match target {
            Target::Ship(id) => {
                let ship = self.ship_mut(id)?;
                let crew_lost = ship.absorb(damage);
                (crew_lost, ship.health(), ship.is_disabled())
            }
            Target::Starbase(id) => {
                let base = self.starbase_mut(id)?;
                base.absorb(damage);
                (0, base.health(), base.is_disabled())
            }
        };

        tracing::debug!(
            attacker = %attacker,
            target = ?target,
            damage,
            crew_lost,
            remaining_health,
            "Strike landed"
        );

        if destroyed {
            match target {
                Target::Ship(id) => {
                    self.remove_starship(id);
                    tracing::info!(fleet = self.label(), ship = %id, "Starship destroyed");
                }
                Target::Starbase(id) => {
                    self.remove_starbase(id);
                }
            }
        }

        Some(Strike {
            attacker,
            target,
            damage,
            crew_lost,
            remaining_health,
            destroyed,
        })
    }

    /// Ships able to take fleet orders: not docked and not disabled.
    fn ready_ships(&self) -> impl Iterator<Item = &Starship> {
        self.starships
            .iter()
            .filter(|ship| !ship.is_docked() && !ship.is_disabled())
    }

    /// Move every undocked ship to `sector`.
    ///
    /// Ships with pending downtime spend it instead of moving.
    pub fn mobilise_to_sector(&mut self, sector: impl Into<Sector>) -> Vec<(ShipId, Outcome)> {
        let sector = sector.into();
        let snapshot: Vec<ShipId> = self.ready_ships().map(Starship::id).collect();

        let moves: Vec<(ShipId, Outcome)> = snapshot
            .into_iter()
            .map(|id| (id, self.move_ship(id, sector.clone())))
            .collect();

        tracing::debug!(
            fleet = self.label(),
            sector = %sector,
            ships = moves.len(),
            "Fleet mobilised"
        );
        moves
    }

    /// Attack `target` with every undocked ship in its sector, in fleet
    /// order.
    ///
    /// Targets that are not units of `enemy` produce an empty volley.
    /// Once the target is destroyed the remaining ships hold fire.
    pub fn attack_target(&mut self, enemy: &mut Fleet, target: Target) -> Volley {
        let mut volley = Volley::new(target);

        let Some(bearing) = enemy.bearing(target) else {
            return volley;
        };
        let sector = bearing.sector.clone();
        let snapshot: Vec<ShipId> = self
            .ready_ships()
            .filter(|ship| *ship.sector() == sector)
            .map(Starship::id)
            .collect();

        for id in snapshot {
            if !enemy.contains(target) {
                volley.target_destroyed = true;
                break;
            }
            let outcome = self.order_attack(id, enemy, target);
            if outcome.applied().is_some_and(|strike| strike.destroyed) {
                volley.target_destroyed = true;
            }
            volley.attacks.push((id, outcome));
        }

        tracing::debug!(
            fleet = self.label(),
            target = ?target,
            attacks = volley.attacks.len(),
            damage = volley.total_damage(),
            destroyed = volley.target_destroyed,
            "Volley resolved"
        );
        volley
    }
}
