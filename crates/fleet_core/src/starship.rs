//! Starships: the mobile combat units of a fleet.
//!
//! A starship owns its own location, health, crew and docking state. Any
//! action attempted while repair downtime is pending is consumed as a
//! no-op (see [`Starship::actions_to_skip`]).
//!
//! Docking, undocking and attacking involve a second unit, so they are
//! driven by [`Fleet`](crate::fleet::Fleet); this type supplies the
//! per-ship rules they are built from.

use crate::combat::{crew_casualties, repair_downtime_for};
use crate::components::{Sector, ShipId, StarbaseId};
use crate::data::ShipClass;
use crate::math::{ratio, scaled_ceil, scaled_floor, Fixed};
use crate::outcome::{Blocked, Outcome};
use crate::player::Player;

/// A mobile combat unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Starship {
    id: ShipId,
    owner: Player,
    sector: Sector,
    class: ShipClass,
    health: u32,
    crew: u32,
    docked_at: Option<StarbaseId>,
    actions_to_skip: u32,
}

impl Starship {
    /// Create a ship at full health and crew.
    #[must_use]
    pub fn new(id: ShipId, owner: Player, sector: impl Into<Sector>, class: ShipClass) -> Self {
        Self {
            id,
            owner,
            sector: sector.into(),
            class,
            health: class.max_health,
            crew: class.max_crew,
            docked_at: None,
            actions_to_skip: 0,
        }
    }

    /// Unique id of this ship.
    #[must_use]
    pub const fn id(&self) -> ShipId {
        self.id
    }

    /// The player whose fleet this ship belongs to.
    #[must_use]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    /// Current sector.
    #[must_use]
    pub const fn sector(&self) -> &Sector {
        &self.sector
    }

    /// The class this ship was built from.
    #[must_use]
    pub const fn class(&self) -> &ShipClass {
        &self.class
    }

    /// Current hull points.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Maximum hull points.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.class.max_health
    }

    /// Current crew.
    #[must_use]
    pub const fn crew(&self) -> u32 {
        self.crew
    }

    /// Crew complement.
    #[must_use]
    pub const fn max_crew(&self) -> u32 {
        self.class.max_crew
    }

    /// Attack strength at full health.
    #[must_use]
    pub const fn max_attack(&self) -> u32 {
        self.class.max_attack
    }

    /// Defence strength at full health and crew.
    #[must_use]
    pub const fn max_defence(&self) -> u32 {
        self.class.max_defence
    }

    /// The starbase this ship is docked at, if any.
    #[must_use]
    pub const fn docked_at(&self) -> Option<StarbaseId> {
        self.docked_at
    }

    /// Whether the ship is docked.
    #[must_use]
    pub const fn is_docked(&self) -> bool {
        self.docked_at.is_some()
    }

    /// Repair downtime: how many upcoming actions will be skipped.
    #[must_use]
    pub const fn actions_to_skip(&self) -> u32 {
        self.actions_to_skip
    }

    /// Whether the ship has no hull points left.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.health == 0
    }

    /// Fraction of hull points remaining.
    #[must_use]
    pub fn health_ratio(&self) -> Fixed {
        ratio(self.health, self.class.max_health)
    }

    /// Attack strength, scaled by remaining hull and rounded up.
    ///
    /// ```text
    /// Attack = ceil(Max Attack × Health / Max Health)
    /// ```
    #[must_use]
    pub fn current_attack_strength(&self) -> u32 {
        if self.is_disabled() {
            return 0;
        }
        scaled_ceil(self.class.max_attack, self.health, self.class.max_health)
    }

    /// Defence strength, scaled by remaining hull and crew and rounded down.
    ///
    /// ```text
    /// Defence = floor(Max Defence × (Health + Crew) / (Max Health + Max Crew))
    /// ```
    #[must_use]
    pub fn current_defence_strength(&self) -> u32 {
        if self.is_disabled() {
            return 0;
        }
        let condition = self.health.saturating_add(self.crew);
        let capacity = self.class.max_health.saturating_add(self.class.max_crew);
        scaled_floor(self.class.max_defence, condition, capacity)
    }

    /// Consume one point of downtime, if any is pending.
    ///
    /// Returns the `Skipped` outcome the action must report instead of
    /// taking effect.
    pub(crate) fn stand_down<T>(&mut self) -> Option<Outcome<T>> {
        if self.actions_to_skip == 0 {
            return None;
        }
        self.actions_to_skip -= 1;
        Some(Outcome::Skipped {
            remaining: self.actions_to_skip,
        })
    }

    /// Move to another sector.
    ///
    /// Movement is a plain relabel; there is no distance between sectors.
    /// Docked ships cannot move.
    pub fn move_to_sector(&mut self, sector: impl Into<Sector>) -> Outcome {
        if let Some(skipped) = self.stand_down() {
            return skipped;
        }
        if self.is_docked() {
            return Outcome::Blocked(Blocked::Docked);
        }
        self.sector = sector.into();
        Outcome::DONE
    }

    /// Restore hull and crew to maximum while docked.
    ///
    /// Applies downtime based on the hull fraction before the repair and
    /// reports it.
    pub fn repair(&mut self) -> Outcome<u32> {
        if let Some(skipped) = self.stand_down() {
            return skipped;
        }
        if !self.is_docked() {
            return Outcome::Blocked(Blocked::NotDocked);
        }
        let downtime = repair_downtime_for(self.health, self.class.max_health);
        self.health = self.class.max_health;
        self.crew = self.class.max_crew;
        self.actions_to_skip = downtime;
        tracing::debug!(ship = %self.id, downtime, "Ship repaired");
        Outcome::Applied(downtime)
    }

    /// Check whether this ship may fire on a unit of `owner` in `sector`.
    pub(crate) fn engagement_check(&self, owner: Player, sector: &Sector) -> Result<(), Blocked> {
        if self.is_docked() {
            return Err(Blocked::Docked);
        }
        if owner == self.owner {
            return Err(Blocked::FriendlyTarget);
        }
        if *sector != self.sector {
            return Err(Blocked::OutOfSector);
        }
        Ok(())
    }

    /// Take a hit. Returns the crew incapacitated.
    ///
    /// Crew never drops below one while the ship exists; only hull damage
    /// destroys a ship.
    pub(crate) fn absorb(&mut self, damage: u32) -> u32 {
        self.health = self.health.saturating_sub(damage);
        let casualties = crew_casualties(damage, self.crew, self.class.max_health);
        let crew = self.crew.saturating_sub(casualties).max(1);
        let lost = self.crew.saturating_sub(crew);
        self.crew = crew;
        lost
    }

    /// Record the docking relation on the ship's side.
    pub(crate) fn attach(&mut self, starbase: StarbaseId) {
        self.docked_at = Some(starbase);
    }

    /// Clear the docking relation on the ship's side.
    pub(crate) fn detach(&mut self) -> Option<StarbaseId> {
        self.docked_at.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frigate() -> Starship {
        Starship::new(ShipId(1), Player::One, "Sector 1", ShipClass::STANDARD)
    }

    #[test]
    fn test_new_ship_is_fully_crewed() {
        let ship = frigate();
        assert_eq!(ship.health(), 100);
        assert_eq!(ship.crew(), 10);
        assert_eq!(ship.actions_to_skip(), 0);
        assert!(!ship.is_docked());
        assert!(!ship.is_disabled());
        assert_eq!(ship.health_ratio(), Fixed::ONE);
    }

    #[test]
    fn test_derived_stats_at_full_health() {
        let ship = frigate();
        assert_eq!(ship.current_attack_strength(), 30);
        assert_eq!(ship.current_defence_strength(), 10);
    }

    #[test]
    fn test_derived_stats_after_damage() {
        let mut ship = frigate();
        ship.absorb(20);
        assert_eq!(ship.health(), 80);
        assert_eq!(ship.crew(), 8);
        // ceil(30 * 80 / 100) = 24
        assert_eq!(ship.current_attack_strength(), 24);
        // floor(10 * 88 / 110) = 8
        assert_eq!(ship.current_defence_strength(), 8);
    }

    #[test]
    fn test_attack_rounds_up() {
        let mut ship = frigate();
        ship.absorb(99);
        assert_eq!(ship.health(), 1);
        // ceil(30 * 1 / 100) = 1
        assert_eq!(ship.current_attack_strength(), 1);
    }

    #[test]
    fn test_disabled_ship_has_no_strength() {
        let mut ship = frigate();
        ship.absorb(500);
        assert!(ship.is_disabled());
        assert_eq!(ship.health(), 0);
        assert_eq!(ship.crew(), 1);
        assert_eq!(ship.current_attack_strength(), 0);
        assert_eq!(ship.current_defence_strength(), 0);
    }

    #[test]
    fn test_crew_never_below_one() {
        let mut ship = frigate();
        for _ in 0..10 {
            ship.absorb(9);
        }
        assert_eq!(ship.health(), 10);
        assert_eq!(ship.crew(), 1);
    }

    #[test]
    fn test_move_relabels_sector() {
        let mut ship = frigate();
        assert!(ship.move_to_sector("Sector 9").is_applied());
        assert_eq!(ship.sector(), &Sector::new("Sector 9"));
    }

    #[test]
    fn test_docked_ship_cannot_move() {
        let mut ship = frigate();
        ship.attach(StarbaseId(7));
        assert_eq!(
            ship.move_to_sector("Sector 9"),
            Outcome::Blocked(Blocked::Docked)
        );
        assert_eq!(ship.sector(), &Sector::new("Sector 1"));
    }

    #[test]
    fn test_repair_requires_docking() {
        let mut ship = frigate();
        ship.absorb(50);
        assert_eq!(ship.repair(), Outcome::Blocked(Blocked::NotDocked));
        assert_eq!(ship.health(), 50);
    }

    #[test]
    fn test_repair_at_twenty_percent() {
        let mut ship = frigate();
        ship.absorb(80);
        assert_eq!(ship.health(), 20);
        ship.attach(StarbaseId(7));

        assert_eq!(ship.repair(), Outcome::Applied(4));
        assert_eq!(ship.health(), 100);
        assert_eq!(ship.crew(), 10);
        assert_eq!(ship.actions_to_skip(), 4);
    }

    #[test]
    fn test_undamaged_repair_still_costs_an_action() {
        let mut ship = frigate();
        ship.attach(StarbaseId(7));
        assert_eq!(ship.repair(), Outcome::Applied(1));
        assert_eq!(ship.actions_to_skip(), 1);
    }

    #[test]
    fn test_downtime_consumes_actions_one_by_one() {
        let mut ship = frigate();
        ship.absorb(60);
        ship.attach(StarbaseId(7));
        assert_eq!(ship.repair(), Outcome::Applied(3));

        assert_eq!(ship.repair(), Outcome::Skipped { remaining: 2 });
        assert_eq!(ship.repair(), Outcome::Skipped { remaining: 1 });
        assert_eq!(ship.repair(), Outcome::Skipped { remaining: 0 });
        assert_eq!(ship.actions_to_skip(), 0);

        // The next repair takes effect again
        assert_eq!(ship.repair(), Outcome::Applied(1));
    }

    #[test]
    fn test_skipped_move_leaves_sector() {
        let mut ship = frigate();
        ship.attach(StarbaseId(7));
        ship.repair();
        ship.detach();

        assert_eq!(
            ship.move_to_sector("Sector 4"),
            Outcome::Skipped { remaining: 0 }
        );
        assert_eq!(ship.sector(), &Sector::new("Sector 1"));
    }

    #[test]
    fn test_engagement_rules() {
        let ship = frigate();
        let here = Sector::new("Sector 1");
        let there = Sector::new("Sector 2");

        assert_eq!(ship.engagement_check(Player::Two, &here), Ok(()));
        assert_eq!(
            ship.engagement_check(Player::One, &here),
            Err(Blocked::FriendlyTarget)
        );
        assert_eq!(
            ship.engagement_check(Player::Two, &there),
            Err(Blocked::OutOfSector)
        );

        let mut docked = frigate();
        docked.attach(StarbaseId(3));
        assert_eq!(
            docked.engagement_check(Player::Two, &here),
            Err(Blocked::Docked)
        );
    }
}
