//! Player (side) identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two opposing sides. Each side owns exactly one fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Player {
    /// The side that moves first each turn.
    One,
    /// The side that moves second each turn.
    Two,
}

impl Player {
    /// Get the display label for this player.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::One => "Player 1",
            Self::Two => "Player 2",
        }
    }

    /// Get the opposing player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
