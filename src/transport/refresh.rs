//! Single-flight bookkeeping for access-token refresh.
//!
//! The first caller to hit an expired token becomes the leader and performs
//! the refresh. Everyone arriving while it runs is queued (FIFO) and receives
//! the leader's outcome. The flag check and the queue push happen under one
//! lock, so two leaders can never coexist.

use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::{ApiError, AppError};

pub type RefreshOutcome = Result<String, AppError>;

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// What a caller must do after [`RefreshCoordinator::join`].
pub enum RefreshTicket<'a> {
    /// Perform the refresh and settle the guard with its outcome.
    Leader(RefreshGuard<'a>),
    /// Wait for the leader's outcome.
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn join(&self) -> RefreshTicket<'_> {
        let mut state = self.lock();
        if state.in_flight {
            let (sender, receiver) = oneshot::channel();
            state.waiters.push_back(sender);
            debug!("Refresh in flight, queued request ({} waiting)", state.waiters.len());
            RefreshTicket::Waiter(receiver)
        } else {
            state.in_flight = true;
            debug!("Starting token refresh");
            RefreshTicket::Leader(RefreshGuard {
                coordinator: self,
                settled: false,
            })
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().in_flight
    }

    /// Number of callers waiting on the refresh in flight.
    pub fn pending(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Clears the flag, then hands `outcome` to every waiter in arrival order.
    fn release(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.lock();
            state.in_flight = false;
            mem::take(&mut state.waiters)
        };
        debug!("Releasing {} queued request(s)", waiters.len());
        for waiter in waiters {
            // A waiter whose caller went away simply misses the outcome.
            let _ = waiter.send(outcome.clone());
        }
    }
}

impl fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("RefreshCoordinator")
            .field("in_flight", &state.in_flight)
            .field("pending", &state.waiters.len())
            .finish()
    }
}

fn abandoned() -> AppError {
    AppError::Network(ApiError::network("token refresh was abandoned"))
}

/// Held by the leader while the refresh runs.
///
/// Dropping it without settling releases the waiters with an error, so the
/// in-flight flag never outlives the leader.
pub struct RefreshGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshGuard<'_> {
    pub fn settle(mut self, outcome: RefreshOutcome) {
        self.settled = true;
        self.coordinator.release(outcome);
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Token refresh dropped before settling");
            self.coordinator.release(Err(abandoned()));
        }
    }
}

/// Waits for the leader's outcome on a queued ticket.
pub async fn wait_for(receiver: oneshot::Receiver<RefreshOutcome>) -> RefreshOutcome {
    receiver.await.unwrap_or_else(|_| Err(abandoned()))
}
