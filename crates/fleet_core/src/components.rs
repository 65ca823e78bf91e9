//! Identifiers and value types shared by the entity model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a starship within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipId(pub u32);

/// Unique identifier for a starbase within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StarbaseId(pub u32);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ship#{}", self.0)
    }
}

impl fmt::Display for StarbaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "starbase#{}", self.0)
    }
}

/// An opaque location label.
///
/// Two units are co-located when their sectors compare equal. There is no
/// notion of distance or adjacency between sectors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sector(String);

impl Sector {
    /// Create a sector from any label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The sector label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sector {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Sector {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Hands out ship and starbase ids for one game.
///
/// Ids are never reused, so a stale id of a destroyed unit can never
/// resolve to a different unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdDispenser {
    next: u32,
}

impl IdDispenser {
    /// Create a dispenser starting at id 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    fn advance(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Allocate the next starship id.
    pub fn next_ship(&mut self) -> ShipId {
        ShipId(self.advance())
    }

    /// Allocate the next starbase id.
    pub fn next_starbase(&mut self) -> StarbaseId {
        StarbaseId(self.advance())
    }
}

impl Default for IdDispenser {
    fn default() -> Self {
        Self::new()
    }
}
