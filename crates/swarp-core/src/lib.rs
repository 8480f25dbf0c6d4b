pub mod error;
pub mod game;
pub mod launch;
pub mod place;

pub use error::ResolveError;
pub use game::{Creator, GameDescriptor};
pub use launch::{LaunchRequest, normalize_instance_id};
pub use place::{InvalidPlaceId, PlaceId};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game::{Creator, GameDescriptor};

    /// A fully populated descriptor for tests.
    pub fn make_game(name: &str) -> GameDescriptor {
        GameDescriptor {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            creator: Creator {
                id: 1,
                name: "Slugmoon".to_string(),
                kind: "Group".to_string(),
                is_rnv_account: false,
                has_verified_badge: true,
            },
            concurrent_players: 42,
            total_visits: 1_000_000,
            icon_url: Some("https://tr.rbxcdn.com/icon/512/512/Image/Png".to_string()),
        }
    }
}
