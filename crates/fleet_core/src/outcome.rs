//! Status values for unit actions.
//!
//! An action that cannot take effect is never an error: it is a legal game
//! situation. Callers that only care whether anything happened use
//! [`Outcome::is_applied`]; callers that report to a player can use the
//! [`Blocked`] reason.

use std::fmt;

/// Why an action had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blocked {
    /// The acting unit does not exist (never existed or was destroyed).
    UnknownUnit,
    /// The ship is docked and cannot move or attack.
    Docked,
    /// The ship must be docked for this action.
    NotDocked,
    /// The ship is already docked somewhere.
    AlreadyDocked,
    /// The starbase does not belong to the ship's fleet.
    ForeignStarbase,
    /// The two units are not in the same sector.
    OutOfSector,
    /// The target belongs to the attacker's own fleet.
    FriendlyTarget,
    /// The target ship is docked and immune to attack.
    TargetDocked,
    /// The target no longer exists.
    TargetMissing,
}

impl Blocked {
    /// Stable snake_case name, used in protocol output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownUnit => "unknown_unit",
            Self::Docked => "docked",
            Self::NotDocked => "not_docked",
            Self::AlreadyDocked => "already_docked",
            Self::ForeignStarbase => "foreign_starbase",
            Self::OutOfSector => "out_of_sector",
            Self::FriendlyTarget => "friendly_target",
            Self::TargetDocked => "target_docked",
            Self::TargetMissing => "target_missing",
        }
    }
}

impl fmt::Display for Blocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single unit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    /// The action took effect.
    Applied(T),
    /// Repair downtime consumed the action. `remaining` is the counter
    /// after the decrement.
    Skipped {
        /// Actions still to be skipped.
        remaining: u32,
    },
    /// The action was inapplicable and changed nothing.
    Blocked(Blocked),
}

impl<T> Outcome<T> {
    /// Whether the intended effect occurred.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// The report of an applied action.
    #[must_use]
    pub const fn applied(&self) -> Option<&T> {
        match self {
            Self::Applied(value) => Some(value),
            _ => None,
        }
    }

    /// Take the report of an applied action.
    #[must_use]
    pub fn into_applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            _ => None,
        }
    }

    /// The block reason, if the action was blocked.
    #[must_use]
    pub const fn blocked_reason(&self) -> Option<Blocked> {
        match self {
            Self::Blocked(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Map the applied report, keeping skip and block statuses.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Applied(value) => Outcome::Applied(f(value)),
            Self::Skipped { remaining } => Outcome::Skipped { remaining },
            Self::Blocked(reason) => Outcome::Blocked(reason),
        }
    }
}

impl Outcome {
    /// An applied action with no report.
    pub const DONE: Self = Self::Applied(());
}
