use serde::{Deserialize, Serialize};

/// Owner of an experience as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: u64,
    pub name: String,
    /// "User" or "Group".
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, rename = "isRNVAccount")]
    pub is_rnv_account: bool,
    #[serde(default)]
    pub has_verified_badge: bool,
}

/// Display metadata for one experience, assembled per lookup.
///
/// Serialized with the field names the `/api/game-info` endpoint exposes:
/// live player count as `playing` and lifetime visits as `visits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub creator: Creator,
    #[serde(rename = "playing", default)]
    pub concurrent_players: u64,
    #[serde(rename = "visits", default)]
    pub total_visits: u64,
    #[serde(default)]
    pub icon_url: Option<String>,
}

impl GameDescriptor {
    /// Creator label like "by Slugmoon Studios" with a check mark for
    /// verified creators.
    pub fn creator_label(&self) -> String {
        if self.creator.has_verified_badge {
            format!("by {} ✓", self.creator.name)
        } else {
            format!("by {}", self.creator.name)
        }
    }
}
