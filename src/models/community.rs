use std::fmt;

use serde::{Deserialize, Serialize};
use serenity::all::GuildId;

/// Opaque guild identifier, the key for every per-guild counter and cooldown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommunityId(String);

impl CommunityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CommunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<GuildId> for CommunityId {
    fn from(id: GuildId) -> Self {
        Self(id.to_string())
    }
}
