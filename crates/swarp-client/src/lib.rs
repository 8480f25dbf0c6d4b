pub mod api;
pub mod builder;
pub mod cache;
pub mod dispatch;
pub mod notify;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use builder::{ConfirmDialog, ConfirmOutcome, LaunchForm, LaunchPhase};
pub use cache::{GameInfoCache, LookupState};
pub use session::Session;
