//! Process-wide de-duplication of token refreshes.
//!
//! Refresh tokens are single use on the backend, so two concurrent refreshes
//! with the same token would log the user out. The first caller becomes the
//! leader and performs the refresh; everyone arriving while it is in flight
//! waits for the leader's outcome instead.

use std::future::Future;

use hemolink_core::{ApiError, RefreshGrant};
use tokio::sync::{Mutex, watch};

type Outcome = Result<RefreshGrant, ApiError>;

#[derive(Default)]
pub struct RefreshCoordinator {
    in_flight: Mutex<Option<watch::Receiver<Option<Outcome>>>>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_refreshing(&self) -> bool {
        self.in_flight.lock().await.is_some()
    }

    /// Run `refresh` unless a refresh is already in flight, in which case its
    /// outcome is shared.
    pub async fn run<F, Fut>(&self, refresh: F) -> Outcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome>,
    {
        loop {
            let mut slot = self.in_flight.lock().await;

            let Some(mut pending) = slot.clone() else {
                let (tx, rx) = watch::channel(None);
                *slot = Some(rx);
                drop(slot);

                let outcome = refresh().await;
                tx.send_replace(Some(outcome.clone()));
                self.in_flight.lock().await.take();
                return outcome;
            };
            drop(slot);
            tracing::debug!("refresh already in flight, waiting");

            let shared = pending
                .wait_for(Option::is_some)
                .await
                .map(|outcome| outcome.clone());
            match shared {
                Ok(Some(outcome)) => return outcome,
                _ => {
                    // The leader was cancelled before finishing. Clear its
                    // slot, unless someone already did, and try again.
                    let mut slot = self.in_flight.lock().await;
                    if slot.as_ref().is_some_and(|rx| rx.same_channel(&pending)) {
                        slot.take();
                    }
                }
            }
        }
    }
}
