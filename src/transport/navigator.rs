use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Side effect fired when the session ends without a way to recover it.
///
/// A UI layer maps this to "go to the login screen".
#[cfg_attr(test, mockall::automock)]
pub trait LoginNavigator: Send + Sync {
    fn navigate_to_login(&self);
}

/// Only records the redirect in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl LoginNavigator for LoggingNavigator {
    fn navigate_to_login(&self) {
        warn!("Session ended, login required");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginRedirect {
    pub at: DateTime<Utc>,
}

/// Publishes every redirect on a broadcast channel.
#[derive(Debug)]
pub struct BroadcastNavigator {
    sender: broadcast::Sender<LoginRedirect>,
    redirects: AtomicUsize,
}

impl BroadcastNavigator {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            redirects: AtomicUsize::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LoginRedirect> {
        self.sender.subscribe()
    }

    /// Redirects fired so far, whether or not anyone was listening.
    pub fn redirect_count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Default for BroadcastNavigator {
    fn default() -> Self {
        Self::new(16)
    }
}

impl LoginNavigator for BroadcastNavigator {
    fn navigate_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        let event = LoginRedirect { at: Utc::now() };
        if self.sender.send(event).is_err() {
            debug!("Login redirect fired with no subscribers");
        }
    }
}
