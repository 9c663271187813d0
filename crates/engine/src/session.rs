//! Session store with sliding-window expiry.
//!
//! Sessions decay from inactivity, not from wall-clock age: every
//! successful read refreshes `last_accessed_at` and recomputes `expires_at`
//! as `last_accessed_at + TTL`. A session accessed more often than the TTL
//! never expires.
//!
//! Misses are `None`, never errors, and the three causes - never issued,
//! explicitly deleted, naturally expired - are indistinguishable to the
//! caller. A read that observes a past-due `expires_at` removes the record
//! on the spot, so a dead id can never be resurrected with stale data.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use statewise_core::{SessionId, UserId};

/// Default session TTL in seconds (15 minutes).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 15 * 60;

/// A session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session token.
    pub id: SessionId,
    /// The user this session belongs to, if any.
    pub user_id: Option<UserId>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session was last read or updated.
    pub last_accessed_at: DateTime<Utc>,
    /// When the session becomes eligible for expiry
    /// (`last_accessed_at + TTL`, recomputed on every access).
    pub expires_at: DateTime<Utc>,
    /// Arbitrary attached state (workflow step counters, visit counts, ...).
    pub data: HashMap<String, Value>,
}

/// In-memory session store.
///
/// Constructed explicitly and passed via dependency injection - no
/// module-level singleton - so tests can instantiate isolated stores.
///
/// Every mutating operation (including the refresh side effect of a read)
/// runs entirely under the write lock, which makes read-then-refresh atomic
/// and keeps [`SessionStore::sweep_expired`] from racing an in-flight
/// refresh: whichever acquires the lock first wins.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionStore {
    /// Create a store with the given sliding-window TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The configured TTL.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of live session records (expired-but-unswept included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether the store holds no session records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Create a new session with a freshly generated token.
    ///
    /// Always succeeds. `created_at` and `last_accessed_at` are set to now,
    /// `expires_at` to now + TTL.
    pub fn create(&self, user_id: Option<UserId>, initial_data: HashMap<String, Value>) -> Session {
        self.create_at(user_id, initial_data, Utc::now())
    }

    /// Read a session, refreshing its expiry.
    ///
    /// On a hit, `last_accessed_at` is set to now and `expires_at`
    /// recomputed - atomically with the read. On a miss (never issued,
    /// deleted, or expired) returns `None`; the causes are deliberately
    /// indistinguishable.
    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.get_at(id, Utc::now())
    }

    /// Merge `partial` into the session's data (shallow) and refresh expiry.
    ///
    /// Keys present in `partial` overwrite; all other keys are untouched.
    /// Nested maps are replaced wholesale, not deep-merged. Returns `None`
    /// on a missing or expired id.
    pub fn update(&self, id: &SessionId, partial: HashMap<String, Value>) -> Option<Session> {
        self.update_at(id, partial, Utc::now())
    }

    /// Remove a session record.
    ///
    /// Idempotent: returns whether something was actually removed; deleting
    /// twice returns `true` then `false` with no error. The cart cascade
    /// lives on [`crate::StateEngine::delete_session`], which calls this.
    pub fn delete(&self, id: &SessionId) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    /// Remove every session whose `expires_at` has passed.
    ///
    /// Returns the removed ids so dependent state (carts) can be cascaded;
    /// the swept count is the vec's length. Runs under the write lock, so a
    /// session that was refreshed after its prior expiry computation is
    /// never removed on a stale comparison.
    pub fn sweep_expired(&self) -> Vec<SessionId> {
        self.sweep_expired_at(Utc::now())
    }

    // =========================================================================
    // Clock-explicit variants
    //
    // The public methods above delegate here with `Utc::now()`; tests drive
    // these directly with synthetic times so expiry behavior is verifiable
    // without sleeping.
    // =========================================================================

    fn create_at(
        &self,
        user_id: Option<UserId>,
        initial_data: HashMap<String, Value>,
        now: DateTime<Utc>,
    ) -> Session {
        let session = Session {
            id: SessionId::generate(),
            user_id,
            created_at: now,
            last_accessed_at: now,
            expires_at: now + self.ttl,
            data: initial_data,
        };
        self.sessions
            .write()
            .insert(session.id.clone(), session.clone());
        session
    }

    fn get_at(&self, id: &SessionId, now: DateTime<Utc>) -> Option<Session> {
        let mut sessions = self.sessions.write();

        if Self::entry_expired(&sessions, id, now) {
            sessions.remove(id);
            return None;
        }

        let session = sessions.get_mut(id)?;
        session.last_accessed_at = now;
        session.expires_at = now + self.ttl;
        Some(session.clone())
    }

    fn update_at(
        &self,
        id: &SessionId,
        partial: HashMap<String, Value>,
        now: DateTime<Utc>,
    ) -> Option<Session> {
        let mut sessions = self.sessions.write();

        if Self::entry_expired(&sessions, id, now) {
            sessions.remove(id);
            return None;
        }

        let session = sessions.get_mut(id)?;
        for (key, value) in partial {
            session.data.insert(key, value);
        }
        session.last_accessed_at = now;
        session.expires_at = now + self.ttl;
        Some(session.clone())
    }

    fn sweep_expired_at(&self, now: DateTime<Utc>) -> Vec<SessionId> {
        let mut sessions = self.sessions.write();
        let expired: Vec<SessionId> = sessions
            .iter()
            .filter(|(_, session)| session.expires_at <= now)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            sessions.remove(id);
        }
        expired
    }

    fn entry_expired(
        sessions: &HashMap<SessionId, Session>,
        id: &SessionId,
        now: DateTime<Utc>,
    ) -> bool {
        sessions
            .get(id)
            .is_some_and(|session| session.expires_at <= now)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Duration::minutes(15))
    }

    #[test]
    fn test_create_sets_timestamps() {
        let store = store();
        let now = Utc::now();

        let session = store.create_at(Some(UserId::new("u1")), HashMap::new(), now);

        assert_eq!(session.created_at, now);
        assert_eq!(session.last_accessed_at, now);
        assert_eq!(session.expires_at, now + Duration::minutes(15));
        assert_eq!(session.user_id, Some(UserId::new("u1")));
    }

    #[test]
    fn test_get_refreshes_expiry() {
        let store = store();
        let t0 = Utc::now();
        let session = store.create_at(None, HashMap::new(), t0);

        let t1 = t0 + Duration::minutes(10);
        let refreshed = store.get_at(&session.id, t1).unwrap();

        assert_eq!(refreshed.last_accessed_at, t1);
        assert_eq!(refreshed.expires_at, t1 + Duration::minutes(15));
        // Creation time is not touched by reads
        assert_eq!(refreshed.created_at, t0);
    }

    #[test]
    fn test_expiry_is_sliding_not_fixed() {
        let store = store();
        let t0 = Utc::now();
        let session = store.create_at(None, HashMap::new(), t0);

        // Access every 10 minutes for over an hour: with a 15-minute TTL the
        // session must never expire, despite 70 minutes of wall-clock age.
        for i in 1..=7 {
            let t = t0 + Duration::minutes(10 * i);
            assert!(
                store.get_at(&session.id, t).is_some(),
                "session expired at +{} minutes despite regular access",
                10 * i
            );
        }
    }

    #[test]
    fn test_idle_past_ttl_is_a_miss() {
        let store = store();
        let t0 = Utc::now();
        let session = store.create_at(None, HashMap::new(), t0);

        let t1 = t0 + Duration::minutes(16);
        assert!(store.get_at(&session.id, t1).is_none());
    }

    #[test]
    fn test_expired_id_is_not_resurrected() {
        let store = store();
        let t0 = Utc::now();
        let session = store.create_at(None, HashMap::new(), t0);

        // The read that observes the past-due deadline removes the record...
        assert!(store.get_at(&session.id, t0 + Duration::minutes(16)).is_none());
        // ...so an immediately following read at a "live" time is still a miss.
        assert!(store.get_at(&session.id, t0 + Duration::minutes(1)).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_miss_causes_are_indistinguishable() {
        let store = store();
        let t0 = Utc::now();

        let never_issued = SessionId::generate();

        let deleted = store.create_at(None, HashMap::new(), t0);
        assert!(store.delete(&deleted.id));

        let expired = store.create_at(None, HashMap::new(), t0);
        let t_late = t0 + Duration::minutes(16);

        assert!(store.get_at(&never_issued, t_late).is_none());
        assert!(store.get_at(&deleted.id, t_late).is_none());
        assert!(store.get_at(&expired.id, t_late).is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = store();
        let session = store.create(None, HashMap::new());

        assert!(store.delete(&session.id));
        assert!(!store.delete(&session.id));
    }

    #[test]
    fn test_update_shallow_merge() {
        let store = store();
        let t0 = Utc::now();

        let mut initial = HashMap::new();
        initial.insert("step".to_owned(), json!(1));
        initial.insert("profile".to_owned(), json!({"a": 1, "b": 2}));
        let session = store.create_at(None, initial, t0);

        let mut partial = HashMap::new();
        partial.insert("step".to_owned(), json!(2));
        partial.insert("profile".to_owned(), json!({"a": 9}));
        let updated = store.update_at(&session.id, partial, t0 + Duration::minutes(1)).unwrap();

        // Overwritten key
        assert_eq!(updated.data.get("step"), Some(&json!(2)));
        // Shallow merge: the nested map is replaced wholesale, not deep-merged
        assert_eq!(updated.data.get("profile"), Some(&json!({"a": 9})));
    }

    #[test]
    fn test_update_preserves_untouched_keys() {
        let store = store();
        let t0 = Utc::now();

        let mut initial = HashMap::new();
        initial.insert("kept".to_owned(), json!("value"));
        let session = store.create_at(None, initial, t0);

        let mut partial = HashMap::new();
        partial.insert("added".to_owned(), json!(true));
        let updated = store.update_at(&session.id, partial, t0).unwrap();

        assert_eq!(updated.data.get("kept"), Some(&json!("value")));
        assert_eq!(updated.data.get("added"), Some(&json!(true)));
    }

    #[test]
    fn test_update_refreshes_expiry() {
        let store = store();
        let t0 = Utc::now();
        let session = store.create_at(None, HashMap::new(), t0);

        let t1 = t0 + Duration::minutes(10);
        let updated = store.update_at(&session.id, HashMap::new(), t1).unwrap();
        assert_eq!(updated.expires_at, t1 + Duration::minutes(15));
    }

    #[test]
    fn test_update_expired_is_a_miss() {
        let store = store();
        let t0 = Utc::now();
        let session = store.create_at(None, HashMap::new(), t0);

        let result = store.update_at(&session.id, HashMap::new(), t0 + Duration::minutes(20));
        assert!(result.is_none());
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let store = store();
        let t0 = Utc::now();

        let stale = store.create_at(None, HashMap::new(), t0);
        let fresh = store.create_at(None, HashMap::new(), t0 + Duration::minutes(10));

        let swept = store.sweep_expired_at(t0 + Duration::minutes(16));
        assert_eq!(swept, vec![stale.id]);
        assert!(store.get_at(&fresh.id, t0 + Duration::minutes(16)).is_some());
    }

    #[test]
    fn test_sweep_never_removes_refreshed_session() {
        let store = store();
        let t0 = Utc::now();
        let session = store.create_at(None, HashMap::new(), t0);

        // Refresh at +10 pushes the deadline to +25; a sweep at +16 compares
        // against the refreshed deadline, never the stale one.
        store.get_at(&session.id, t0 + Duration::minutes(10)).unwrap();
        let swept = store.sweep_expired_at(t0 + Duration::minutes(16));

        assert!(swept.is_empty());
        assert!(store.get_at(&session.id, t0 + Duration::minutes(16)).is_some());
    }

    #[test]
    fn test_sweep_empty_store() {
        let store = store();
        assert!(store.sweep_expired().is_empty());
    }

    #[test]
    fn test_len_and_is_empty() {
        let store = store();
        assert!(store.is_empty());

        store.create(None, HashMap::new());
        store.create(None, HashMap::new());
        assert_eq!(store.len(), 2);
    }
}
