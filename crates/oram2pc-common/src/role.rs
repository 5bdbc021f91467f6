use core::fmt;

use serde::{Deserialize, Serialize};

/// The role of a party in a two-party protocol.
///
/// The protocol logic is symmetric between the two roles, they differ only in
/// which side of each two-party exchange is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The first party.
    Party0,
    /// The second party.
    Party1,
}

impl Role {
    /// Returns the role of the peer.
    #[inline]
    pub fn peer(self) -> Role {
        match self {
            Role::Party0 => Role::Party1,
            Role::Party1 => Role::Party0,
        }
    }

    /// Returns `true` if this is the first party.
    #[inline]
    pub fn is_first(self) -> bool {
        matches!(self, Role::Party0)
    }

    /// Returns the index of the role, `0` or `1`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Role::Party0 => 0,
            Role::Party1 => 1,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Party0 => write!(f, "party0"),
            Role::Party1 => write!(f, "party1"),
        }
    }
}

/// An opaque party identifier, naming one endpoint of the channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyId(String);

impl PartyId {
    /// Creates a new party ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the party ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PartyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_peer() {
        assert_eq!(Role::Party0.peer(), Role::Party1);
        assert_eq!(Role::Party1.peer(), Role::Party0);
        assert_eq!(Role::Party0.peer().peer(), Role::Party0);
    }

    #[test]
    fn test_role_index() {
        assert!(Role::Party0.is_first());
        assert!(!Role::Party1.is_first());
        assert_eq!(Role::Party0.index(), 0);
        assert_eq!(Role::Party1.index(), 1);
    }
}
