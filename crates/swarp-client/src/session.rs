//! Ties the form, the metadata cache, and the API client together.
//!
//! Each place id edit that needs a fetch spawns a task; finished lookups come
//! back over a channel and are applied on the session's own task, where stale
//! ones are dropped by [`GameInfoCache::complete`].

use tokio::sync::mpsc;

use swarp_core::GameDescriptor;

use crate::api::{ApiClient, ApiError};
use crate::builder::{ConfirmDialog, ConfirmOutcome, LaunchError, LaunchForm};
use crate::cache::{GameInfoCache, LookupTicket};
use crate::dispatch::UrlDispatcher;
use crate::notify::{Notification, NotificationQueue};

type LookupResult = (LookupTicket, Result<GameDescriptor, ApiError>);

pub struct Session {
    api: ApiClient,
    form: LaunchForm,
    lookups: GameInfoCache,
    notifications: NotificationQueue,
    dispatcher: Box<dyn UrlDispatcher>,
    results_tx: mpsc::UnboundedSender<LookupResult>,
    results_rx: mpsc::UnboundedReceiver<LookupResult>,
    in_flight: usize,
}

impl Session {
    pub fn new(api: ApiClient, dispatcher: Box<dyn UrlDispatcher>) -> Self {
        Self::with_cache(api, dispatcher, GameInfoCache::new())
    }

    pub fn with_cache(
        api: ApiClient,
        dispatcher: Box<dyn UrlDispatcher>,
        lookups: GameInfoCache,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            api,
            form: LaunchForm::new(),
            lookups,
            notifications: NotificationQueue::new(),
            dispatcher,
            results_tx,
            results_rx,
            in_flight: 0,
        }
    }

    /// Update the place id field, starting a background lookup if the new
    /// value is a valid id with no fresh metadata. Must be called from within
    /// a tokio runtime.
    pub fn edit_place_id(&mut self, value: &str) {
        self.form.set_place_id(value);
        let Some(ticket) = self.lookups.track(value) else {
            return;
        };

        tracing::debug!(place_id = %ticket.place_id, "Starting game info lookup");
        let api = self.api.clone();
        let tx = self.results_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = api.game_info(&ticket.place_id).await;
            let _ = tx.send((ticket, result));
        });
    }

    pub fn edit_instance_id(&mut self, value: &str) {
        self.form.set_instance_id(value);
    }

    fn apply(&mut self, (ticket, result): LookupResult) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.lookups.complete(ticket, result);
    }

    /// Apply every lookup that has already finished. Returns how many.
    pub fn poll_lookups(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.results_rx.try_recv() {
            self.apply(result);
            applied += 1;
        }
        applied
    }

    /// Wait until the current place id's lookup has an answer.
    pub async fn settle(&mut self) {
        self.poll_lookups();
        while self.lookups.is_pending() && self.in_flight > 0 {
            match self.results_rx.recv().await {
                Some(result) => self.apply(result),
                None => break,
            }
        }
    }

    /// Wait for every outstanding lookup, superseded ones included.
    pub async fn wait_idle(&mut self) {
        while self.in_flight > 0 {
            match self.results_rx.recv().await {
                Some(result) => self.apply(result),
                None => break,
            }
        }
    }

    pub fn submit(&mut self) -> Result<ConfirmDialog, LaunchError> {
        self.poll_lookups();
        self.form.submit(&self.lookups)
    }

    pub fn confirm(&mut self) -> ConfirmOutcome {
        self.form
            .confirm(self.dispatcher.as_ref(), &mut self.notifications)
    }

    pub fn cancel(&mut self) -> bool {
        self.form.cancel()
    }

    pub fn form(&self) -> &LaunchForm {
        &self.form
    }

    pub fn lookups(&self) -> &GameInfoCache {
        &self.lookups
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }
}
