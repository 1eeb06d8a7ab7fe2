use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Revoked-token store. Entries live only until the token's own expiry.
///
/// A shared key-value store with per-key TTL can implement this to share
/// revocations between instances.
pub trait TokenDenylist: Send + Sync {
    fn revoke(&self, token: &str, expires_at: DateTime<Utc>);
    fn is_revoked(&self, token: &str, now: DateTime<Utc>) -> bool;
    /// Drops entries whose expiry has passed, returning how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> usize;
}

/// Process-local denylist keyed by the raw token.
#[derive(Debug, Default)]
pub struct InMemoryTokenDenylist {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryTokenDenylist {
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenDenylist for InMemoryTokenDenylist {
    fn revoke(&self, token: &str, expires_at: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(token.to_string(), expires_at);
        info!(revoked = entries.len(), "token added to denylist");
    }

    fn is_revoked(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .map(|expires_at| *expires_at > now)
            .unwrap_or(false)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }
}

/// Periodically purges expired denylist entries until the task is aborted.
pub fn spawn_sweeper(denylist: Arc<dyn TokenDenylist>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = denylist.purge_expired(Utc::now());
            if purged > 0 {
                debug!(purged, "expired tokens purged from denylist");
            }
        }
    })
}
