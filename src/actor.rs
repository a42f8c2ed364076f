use std::fmt;

/// Identifier of the actor (user or service) performing a mutating call.
///
/// Actor ids are opaque numeric keys issued by the hosting application's
/// identity layer; this crate only carries them into audit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(i64);

impl ActorId {
    /// Creates an actor id from its raw numeric key.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric key.
    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl From<i64> for ActorId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
