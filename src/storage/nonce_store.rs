//! Concurrent nonce lifecycle store for replay-attack prevention.
//!
//! **Storage model:** an in-memory sharded map from nonce to its record.
//! A persistent or distributed backend is a valid extension point (see
//! the docs on `mark_used`), but is not part of the core: nonces only
//! need to survive a single process's uptime for the single-use
//! guarantee to hold.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::constants::NONCE_REAP_GRACE_SECONDS;

/// Snapshot of a nonce's state at the moment of a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceRecord {
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

struct NonceEntry {
    expires_at: DateTime<Utc>,
    used: AtomicBool,
}

/// Concurrent map from nonce to `(expiry, used-flag)`.
///
/// `mark_used` is a genuine compare-and-swap on the `used` flag: under a
/// race where two callers both observe `used == false`, exactly one CAS
/// wins. The loser's `false` return must be treated by the caller as a
/// rejection (`nonce_used`), never as success — a distributed backend
/// replacing this store must preserve that same atomicity, since a naive
/// get-then-put loses the single-use guarantee under concurrency.
pub struct NonceStore {
    entries: DashMap<String, NonceEntry>,
}

impl Default for NonceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Atomic insert-if-absent. Returns `false` on collision — the pipeline
    /// treats a collision at issuance as a fatal entropy failure, never a
    /// retry against the same value.
    pub fn try_add(&self, nonce: &str, expires_at: DateTime<Utc>) -> bool {
        use dashmap::mapref::entry::Entry;

        match self.entries.entry(nonce.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(v) => {
                v.insert(NonceEntry {
                    expires_at,
                    used: AtomicBool::new(false),
                });
                true
            }
        }
    }

    /// Read the current state of a nonce, if it exists.
    pub fn try_get(&self, nonce: &str) -> Option<NonceRecord> {
        self.entries.get(nonce).map(|entry| NonceRecord {
            expires_at: entry.expires_at,
            used: entry.used.load(Ordering::SeqCst),
        })
    }

    /// Compare-and-swap the `used` flag from `false` to `true`.
    ///
    /// Returns `false` if the nonce is absent *or* the CAS lost the race
    /// (someone else already transitioned it). Both cases must be treated
    /// as `nonce_used` by the caller — see module docs.
    pub fn mark_used(&self, nonce: &str) -> bool {
        match self.entries.get(nonce) {
            Some(entry) => entry
                .used
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok(),
            None => false,
        }
    }

    /// Periodic maintenance: remove entries past `expires_at + grace`.
    /// Bounds memory; never removes a record still inside its validity
    /// (or replay-detection) window.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - chrono::Duration::seconds(NONCE_REAP_GRACE_SECONDS);
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > cutoff);
        let removed = before - self.entries.len();
        if removed > 0 {
            info!(removed, "swept expired nonces");
        } else {
            debug!("nonce sweep found nothing to reap");
        }
        removed
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Log a warning when the final mark-used CAS in the verification pipeline
/// loses a race after a signature has already been verified — the request
/// is rejected, but this is worth surfacing as an anomaly, not a routine
/// rejection.
pub fn log_mark_used_race(nonce: &str) {
    warn!(nonce, "mark_used lost a race at the final pipeline step");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn later(seconds: i64) -> DateTime<Utc> {
        Utc::now() + chrono::Duration::seconds(seconds)
    }

    #[test]
    fn first_insert_wins() {
        let store = NonceStore::new();
        assert!(store.try_add("n1", later(120)));
        assert!(!store.try_add("n1", later(120)));
    }

    #[test]
    fn try_get_reflects_insert() {
        let store = NonceStore::new();
        let exp = later(120);
        store.try_add("n1", exp);
        let record = store.try_get("n1").unwrap();
        assert_eq!(record.expires_at, exp);
        assert!(!record.used);
    }

    #[test]
    fn try_get_missing_is_none() {
        let store = NonceStore::new();
        assert!(store.try_get("missing").is_none());
    }

    #[test]
    fn mark_used_is_monotonic() {
        let store = NonceStore::new();
        store.try_add("n1", later(120));

        assert!(store.mark_used("n1"));
        assert!(store.try_get("n1").unwrap().used);

        // Second call loses the CAS: already used.
        assert!(!store.mark_used("n1"));
    }

    #[test]
    fn mark_used_on_missing_nonce_fails() {
        let store = NonceStore::new();
        assert!(!store.mark_used("ghost"));
    }

    #[test]
    fn concurrent_mark_used_has_exactly_one_winner() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(NonceStore::new());
        store.try_add("n1", later(120));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || store.mark_used("n1")));
        }

        let wins: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();

        assert_eq!(wins, 1, "exactly one concurrent mark_used must win");
    }

    #[test]
    fn sweep_removes_only_past_grace_period() {
        let store = NonceStore::new();
        let now = Utc::now();
        store.try_add("fresh", now + chrono::Duration::seconds(120));
        store.try_add("long_expired", now - chrono::Duration::seconds(1000));

        let removed = store.sweep_expired(now);
        assert_eq!(removed, 1);
        assert!(store.try_get("fresh").is_some());
        assert!(store.try_get("long_expired").is_none());
    }

    #[test]
    fn sweep_preserves_entries_within_grace() {
        let store = NonceStore::new();
        let now = Utc::now();
        // Expired, but within the grace window — must survive for replay defense.
        store.try_add("just_expired", now - chrono::Duration::seconds(10));

        let removed = store.sweep_expired(now);
        assert_eq!(removed, 0);
        assert!(store.try_get("just_expired").is_some());
    }
}
