//! Starbases: stationary strongpoints that shelter docked ships.

use crate::components::{Sector, ShipId, StarbaseId};
use crate::data::StarbaseClass;
use crate::math::{narrow, ratio, Fixed};
use crate::player::Player;
use crate::starship::Starship;

/// A stationary strongpoint anchored to one sector.
///
/// Starbases never attack. Their defence grows with the ships docked at
/// them, so the garrison is passed in when defence is computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Starbase {
    id: StarbaseId,
    owner: Player,
    sector: Sector,
    class: StarbaseClass,
    health: u32,
    docked: Vec<ShipId>,
}

impl Starbase {
    /// Create a starbase at full health with nothing docked.
    #[must_use]
    pub fn new(
        id: StarbaseId,
        owner: Player,
        sector: impl Into<Sector>,
        class: StarbaseClass,
    ) -> Self {
        Self {
            id,
            owner,
            sector: sector.into(),
            class,
            health: class.max_health,
            docked: Vec::new(),
        }
    }

    /// Unique id of this starbase.
    #[must_use]
    pub const fn id(&self) -> StarbaseId {
        self.id
    }

    /// The player whose fleet this starbase belongs to.
    #[must_use]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    /// The sector this starbase is anchored to.
    #[must_use]
    pub const fn sector(&self) -> &Sector {
        &self.sector
    }

    /// The class this starbase was built from.
    #[must_use]
    pub const fn class(&self) -> &StarbaseClass {
        &self.class
    }

    /// Current structure points.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Maximum structure points.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.class.max_health
    }

    /// Defence at full health with nothing docked.
    #[must_use]
    pub const fn max_defence(&self) -> u32 {
        self.class.max_defence
    }

    /// Ids of docked ships, in docking order.
    #[must_use]
    pub fn docked_ships(&self) -> &[ShipId] {
        &self.docked
    }

    /// Whether `ship` is docked here.
    #[must_use]
    pub fn hosts(&self, ship: ShipId) -> bool {
        self.docked.contains(&ship)
    }

    /// Whether the starbase has no structure points left.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.health == 0
    }

    /// Fraction of structure points remaining.
    #[must_use]
    pub fn health_ratio(&self) -> Fixed {
        ratio(self.health, self.class.max_health)
    }

    /// Defence strength given the ships currently docked here.
    ///
    /// ```text
    /// Base   = Max Defence × Health / Max Health
    /// Bonus  = (Σ docked defence) × Docked Count / Max Defence
    /// Defence = floor(Base + Bonus)
    /// ```
    ///
    /// The docked count multiplies the summed defence, so a
    /// larger garrison raises the bonus faster than linearly. Both terms
    /// are summed over a common denominator before rounding.
    #[must_use]
    pub fn current_defence_strength<'a>(
        &self,
        garrison: impl IntoIterator<Item = &'a Starship>,
    ) -> u32 {
        let (docked_defence, docked_count) = garrison
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), ship| {
                (sum + u64::from(ship.current_defence_strength()), count + 1)
            });

        let max_defence = u128::from(self.class.max_defence);
        let max_health = u128::from(self.class.max_health);
        let denominator = max_health * max_defence;
        if denominator == 0 {
            return 0;
        }

        let base = max_defence * u128::from(self.health) * max_defence;
        let bonus = u128::from(docked_defence) * u128::from(docked_count) * max_health;
        narrow(u64::try_from((base + bonus) / denominator).unwrap_or(u64::MAX))
    }

    /// Register a docked ship. Docking twice is a no-op.
    pub(crate) fn dock_ship(&mut self, ship: ShipId) {
        if !self.docked.contains(&ship) {
            self.docked.push(ship);
        }
    }

    /// Deregister a docked ship. Unknown ships are ignored.
    pub(crate) fn undock_ship(&mut self, ship: ShipId) {
        self.docked.retain(|&docked| docked != ship);
    }

    /// Take a hit.
    pub(crate) fn absorb(&mut self, damage: u32) {
        self.health = self.health.saturating_sub(damage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ShipClass;

    fn station() -> Starbase {
        Starbase::new(StarbaseId(1), Player::One, "Sector 1", StarbaseClass::STANDARD)
    }

    fn frigate(id: u32) -> Starship {
        Starship::new(ShipId(id), Player::One, "Sector 1", ShipClass::STANDARD)
    }

    #[test]
    fn test_undefended_defence_scales_with_health() {
        let mut base = station();
        assert_eq!(base.current_defence_strength([]), 20);

        base.absorb(10);
        // floor(20 * 490 / 500) = 19
        assert_eq!(base.current_defence_strength([]), 19);

        base.absorb(480);
        assert_eq!(base.health(), 10);
        assert_eq!(base.current_defence_strength([]), 0);
    }

    #[test]
    fn test_garrison_bonus_counts_ships_twice() {
        let base = station();
        let ships = [frigate(2), frigate(3), frigate(4)];

        // One ship: 20 + 10 * 1 / 20 = 20.5
        assert_eq!(base.current_defence_strength(&ships[..1]), 20);
        // Two ships: 20 + 20 * 2 / 20 = 22
        assert_eq!(base.current_defence_strength(&ships[..2]), 22);
        // Three ships: 20 + 30 * 3 / 20 = 24.5
        assert_eq!(base.current_defence_strength(&ships), 24);
    }

    #[test]
    fn test_fractional_terms_round_together() {
        let mut base = station();
        base.absorb(255);
        // 20 * 245 / 500 = 9.8 and 30 * 3 / 20 = 4.5; flooring each term
        // separately would give 13.
        let ships = [frigate(2), frigate(3), frigate(4)];
        assert_eq!(base.current_defence_strength(&ships), 14);
    }

    #[test]
    fn test_docking_is_idempotent() {
        let mut base = station();
        base.dock_ship(ShipId(5));
        base.dock_ship(ShipId(5));
        assert_eq!(base.docked_ships(), &[ShipId(5)]);
        assert!(base.hosts(ShipId(5)));

        base.undock_ship(ShipId(5));
        base.undock_ship(ShipId(5));
        assert!(base.docked_ships().is_empty());
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut base = station();
        base.absorb(600);
        assert_eq!(base.health(), 0);
        assert!(base.is_disabled());
        assert_eq!(base.health_ratio(), Fixed::ZERO);
    }
}
