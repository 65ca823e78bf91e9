//! Flat-defence combat formulas.
//!
//! This module implements the combat rules shared by every attack:
//! - Damage is attack minus the target's current defence
//! - Every successful attack deals at least [`MIN_DAMAGE`]
//! - Ships lose crew in proportion to the hull damage taken
//! - Repairs impose downtime proportional to how damaged the ship was

use crate::components::{ShipId, StarbaseId};
use crate::math::{ratio, scaled_ceil, Fixed};

/// Minimum damage floor - every attack that lands has effect.
pub const MIN_DAMAGE: u32 = 5;

/// Something a starship can attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// An enemy starship.
    Ship(ShipId),
    /// An enemy starbase.
    Starbase(StarbaseId),
}

impl From<ShipId> for Target {
    fn from(id: ShipId) -> Self {
        Self::Ship(id)
    }
}

impl From<StarbaseId> for Target {
    fn from(id: StarbaseId) -> Self {
        Self::Starbase(id)
    }
}

/// Report of one attack that landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    /// The attacking ship.
    pub attacker: ShipId,
    /// What was hit.
    pub target: Target,
    /// Hull damage dealt.
    pub damage: u32,
    /// Crew incapacitated (always 0 for starbases).
    pub crew_lost: u32,
    /// Target health after the hit.
    pub remaining_health: u32,
    /// Whether the hit destroyed the target.
    pub destroyed: bool,
}

/// Calculate damage from attack and defence strength.
///
/// Formula:
/// ```text
/// Damage = max(Attack - Defence, 5)
/// ```
#[must_use]
pub fn calculate_damage(attack: u32, defence: u32) -> u32 {
    attack.saturating_sub(defence).max(MIN_DAMAGE)
}

/// Crew incapacitated by a hit on a ship.
///
/// Formula:
/// ```text
/// Incapacitated = ceil(Damage / Max Health × Current Crew)
/// ```
#[must_use]
pub fn crew_casualties(damage: u32, current_crew: u32, max_health: u32) -> u32 {
    scaled_ceil(damage, current_crew, max_health)
}

/// Actions a ship must skip after a repair, from its health before repair.
///
/// | Health before repair | Downtime |
/// |----------------------|----------|
/// | below 25%            | 4        |
/// | below 50%            | 3        |
/// | below 75%            | 2        |
/// | otherwise            | 1        |
#[must_use]
pub fn repair_downtime(health_ratio: Fixed) -> u32 {
    let quarters = health_ratio.saturating_mul(Fixed::from_num(4));
    if quarters < Fixed::from_num(1) {
        4
    } else if quarters < Fixed::from_num(2) {
        3
    } else if quarters < Fixed::from_num(3) {
        2
    } else {
        1
    }
}

/// Downtime for a ship with `health` out of `max_health`.
#[must_use]
pub fn repair_downtime_for(health: u32, max_health: u32) -> u32 {
    repair_downtime(ratio(health, max_health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_is_attack_minus_defence() {
        assert_eq!(calculate_damage(30, 10), 20);
        assert_eq!(calculate_damage(30, 20), 10);
    }

    #[test]
    fn test_damage_minimum() {
        assert_eq!(calculate_damage(30, 26), MIN_DAMAGE);
        assert_eq!(calculate_damage(30, 30), MIN_DAMAGE);
        assert_eq!(calculate_damage(0, 100), MIN_DAMAGE);
    }

    #[test]
    fn test_crew_casualties_round_up() {
        // 20 / 100 * 10 = 2
        assert_eq!(crew_casualties(20, 10, 100), 2);
        // 22 / 100 * 8 = 1.76
        assert_eq!(crew_casualties(22, 8, 100), 2);
        // 5 / 100 * 1 = 0.05
        assert_eq!(crew_casualties(5, 1, 100), 1);
        assert_eq!(crew_casualties(5, 0, 100), 0);
    }

    #[test]
    fn test_repair_downtime_thresholds() {
        assert_eq!(repair_downtime_for(0, 100), 4);
        assert_eq!(repair_downtime_for(20, 100), 4);
        assert_eq!(repair_downtime_for(24, 100), 4);
        assert_eq!(repair_downtime_for(25, 100), 3);
        assert_eq!(repair_downtime_for(49, 100), 3);
        assert_eq!(repair_downtime_for(50, 100), 2);
        assert_eq!(repair_downtime_for(58, 100), 2);
        assert_eq!(repair_downtime_for(74, 100), 2);
        assert_eq!(repair_downtime_for(75, 100), 1);
        assert_eq!(repair_downtime_for(100, 100), 1);
    }

    #[test]
    fn test_repair_downtime_odd_hull_sizes() {
        // 1/3 sits between a quarter and a half
        assert_eq!(repair_downtime_for(1, 3), 3);
        // 2/3 sits between a half and three quarters
        assert_eq!(repair_downtime_for(2, 3), 2);
        assert_eq!(repair_downtime_for(3, 4), 1);
        assert_eq!(repair_downtime_for(2, 7), 3);
    }
}
