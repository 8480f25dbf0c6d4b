//! Game metadata keyed on the place id currently in the form.
//!
//! Lookups are never cancelled. Every key change bumps a generation counter,
//! and a result whose ticket carries an older generation is dropped on
//! arrival, so only the latest key's answer is ever shown.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use swarp_core::{GameDescriptor, PlaceId};

use crate::api::ApiError;

/// How long a resolved descriptor is reused without asking the server again.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// What the form should show next to the place id field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupState {
    /// No valid place id entered.
    Idle,
    Pending,
    Resolved(GameDescriptor),
    Failed(ApiError),
}

/// Handed out when a fetch is needed; returned with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub place_id: PlaceId,
    generation: u64,
}

pub struct GameInfoCache {
    key: Option<PlaceId>,
    generation: u64,
    state: LookupState,
    memo: HashMap<PlaceId, (Instant, GameDescriptor)>,
    stale_after: Duration,
}

impl Default for GameInfoCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GameInfoCache {
    pub fn new() -> Self {
        Self::with_stale_after(DEFAULT_STALE_AFTER)
    }

    pub fn with_stale_after(stale_after: Duration) -> Self {
        Self {
            key: None,
            generation: 0,
            state: LookupState::Idle,
            memo: HashMap::new(),
            stale_after,
        }
    }

    /// Follow the place id field. Returns a ticket when the new key needs a
    /// fetch; `None` when the key is unchanged, invalid, or memoized.
    pub fn track(&mut self, raw_place_id: &str) -> Option<LookupTicket> {
        let key = PlaceId::parse(raw_place_id.trim()).ok();
        if key == self.key {
            return None;
        }

        self.generation += 1;
        self.key = key.clone();

        let Some(place_id) = key else {
            self.state = LookupState::Idle;
            return None;
        };

        if let Some(game) = self.fresh(&place_id).cloned() {
            self.state = LookupState::Resolved(game);
            return None;
        }

        self.state = LookupState::Pending;
        Some(LookupTicket {
            place_id,
            generation: self.generation,
        })
    }

    /// Apply a finished lookup. Returns `false` when the ticket was superseded
    /// and the result was not shown.
    pub fn complete(
        &mut self,
        ticket: LookupTicket,
        result: Result<GameDescriptor, ApiError>,
    ) -> bool {
        if let Ok(game) = &result {
            let stale_after = self.stale_after;
            self.memo.retain(|_, (at, _)| at.elapsed() < stale_after);
            self.memo
                .insert(ticket.place_id.clone(), (Instant::now(), game.clone()));
        }

        if ticket.generation != self.generation {
            tracing::debug!(place_id = %ticket.place_id, "Discarding superseded lookup");
            return false;
        }

        self.state = match result {
            Ok(game) => LookupState::Resolved(game),
            Err(e) => {
                tracing::warn!(place_id = %ticket.place_id, error = %e, "Could not load game info");
                LookupState::Failed(e)
            },
        };
        true
    }

    fn fresh(&self, place_id: &PlaceId) -> Option<&GameDescriptor> {
        self.memo
            .get(place_id)
            .filter(|(at, _)| at.elapsed() < self.stale_after)
            .map(|(_, game)| game)
    }

    pub fn key(&self) -> Option<&PlaceId> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LookupState::Pending)
    }

    /// Descriptor resolved for `place_id`, if it is the current key.
    pub fn resolved_for(&self, place_id: &PlaceId) -> Option<&GameDescriptor> {
        match &self.state {
            LookupState::Resolved(game) if self.key.as_ref() == Some(place_id) => Some(game),
            _ => None,
        }
    }
}
