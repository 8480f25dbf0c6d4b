//! The join form as an explicit state machine.
//!
//! ```text
//! Idle ──submit──▶ Validating ──ok──▶ ConfirmPending ──confirm──▶ Launched
//!                      │                    │
//!                      └──invalid──▶ Error  └──cancel──▶ Idle
//! ```
//!
//! Editing either field clears an error, a stale dialog, or a finished launch
//! and returns to `Idle`.

use swarp_core::{GameDescriptor, InvalidPlaceId, LaunchRequest, PlaceId};

use crate::cache::GameInfoCache;
use crate::dispatch::{DispatchError, UrlDispatcher};
use crate::notify::{Notification, NotificationQueue};

/// Shown in the dialog when metadata could not be loaded.
pub const DETAILS_UNAVAILABLE_NOTICE: &str = "Could not load full game details";

/// Everything the confirmation dialog displays, plus the URL it will launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub url: String,
    pub place_id: PlaceId,
    pub instance_id: Option<String>,
    pub game: Option<GameDescriptor>,
}

impl ConfirmDialog {
    /// Game name, or the raw place id when metadata is missing.
    pub fn title(&self) -> String {
        match &self.game {
            Some(game) => game.name.clone(),
            None => format!("Place {}", self.place_id),
        }
    }

    pub fn server_label(&self) -> &str {
        self.instance_id.as_deref().unwrap_or("Any available server")
    }

    pub fn details_unavailable(&self) -> bool {
        self.game.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPhase {
    Idle,
    Validating,
    Error(String),
    ConfirmPending(ConfirmDialog),
    Launched { place_id: PlaceId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    InvalidInput(InvalidPlaceId),
}

impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LaunchError {}

/// Result of a confirmation click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The URL went to the dispatcher.
    Launched(String),
    /// No dialog was open; nothing happened.
    NothingPending,
    /// The dispatcher refused. The URL is consumed all the same.
    DispatchFailed(DispatchError),
}

/// Form fields plus the current phase.
pub struct LaunchForm {
    place_id: String,
    instance_id: String,
    phase: LaunchPhase,
}

impl Default for LaunchForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchForm {
    pub fn new() -> Self {
        Self {
            place_id: String::new(),
            instance_id: String::new(),
            phase: LaunchPhase::Idle,
        }
    }

    pub fn place_id(&self) -> &str {
        &self.place_id
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn phase(&self) -> &LaunchPhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            LaunchPhase::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn set_place_id(&mut self, value: impl Into<String>) {
        self.place_id = value.into();
        self.back_to_idle();
    }

    pub fn set_instance_id(&mut self, value: impl Into<String>) {
        self.instance_id = value.into();
        self.back_to_idle();
    }

    fn back_to_idle(&mut self) {
        if !matches!(self.phase, LaunchPhase::Idle) {
            self.phase = LaunchPhase::Idle;
        }
    }

    /// Validate the fields and, on success, open the confirmation dialog
    /// with whatever metadata `lookup` holds for this place id. Never touches
    /// the network.
    pub fn submit(&mut self, lookup: &GameInfoCache) -> Result<ConfirmDialog, LaunchError> {
        self.phase = LaunchPhase::Validating;

        let place_id = match PlaceId::parse(self.place_id.trim()) {
            Ok(id) => id,
            Err(e) => {
                self.phase = LaunchPhase::Error(e.to_string());
                return Err(LaunchError::InvalidInput(e));
            },
        };

        let request = LaunchRequest::new(place_id.clone(), &self.instance_id);
        let instance_id = request.instance_id.clone();
        let dialog = ConfirmDialog {
            url: request.into_url(),
            game: lookup.resolved_for(&place_id).cloned(),
            place_id,
            instance_id,
        };

        self.phase = LaunchPhase::ConfirmPending(dialog.clone());
        Ok(dialog)
    }

    /// Launch the pending URL. The URL leaves the state before the dispatcher
    /// sees it, so a second call finds nothing to launch.
    pub fn confirm(
        &mut self,
        dispatcher: &dyn UrlDispatcher,
        notifications: &mut NotificationQueue,
    ) -> ConfirmOutcome {
        let dialog = match std::mem::replace(&mut self.phase, LaunchPhase::Idle) {
            LaunchPhase::ConfirmPending(dialog) => dialog,
            other => {
                self.phase = other;
                return ConfirmOutcome::NothingPending;
            },
        };

        let label = dialog
            .game
            .as_ref()
            .map_or_else(|| "game".to_string(), |g| g.name.clone());

        match dispatcher.dispatch(&dialog.url) {
            Ok(()) => {
                notifications.push(Notification::info(
                    "Launching Roblox",
                    format!("Joining {label}..."),
                ));
                self.phase = LaunchPhase::Launched {
                    place_id: dialog.place_id,
                };
                ConfirmOutcome::Launched(dialog.url)
            },
            Err(e) => {
                tracing::warn!(error = %e, "Launch URL dispatch failed");
                notifications.push(Notification::error(
                    "Error",
                    "Failed to join game. Please try again.",
                ));
                ConfirmOutcome::DispatchFailed(e)
            },
        }
    }

    /// Close the dialog without launching. Returns whether a dialog was open.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.phase, LaunchPhase::ConfirmPending(_)) {
            self.phase = LaunchPhase::Idle;
            true
        } else {
            false
        }
    }
}
