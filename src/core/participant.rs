use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a participant in the settlement.
///
/// A participant is anyone with a net balance to settle: a player at the
/// poker table, a housemate on the utilities bill, a counterparty on a
/// trading desk. The engine treats the identity as opaque; the position a
/// participant occupies in the ledger supplies its internal graph ordinal.
///
/// # Examples
///
/// ```
/// use settle_engine::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new("@alice");
/// let bob = ParticipantId::new("@bob");
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a new participant identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this participant ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
