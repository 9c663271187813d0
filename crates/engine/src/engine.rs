//! The `StateEngine` facade.
//!
//! Composes the four stores and owns the behaviors that cross store
//! boundaries: cascade-deleting a session's cart, and the expiry sweep.
//! Handlers receive a shared reference to one engine instance (dependency
//! injection, no globals), so tests can build isolated engines at will.

use std::sync::Arc;

use chrono::Duration;

use statewise_core::SessionId;

use crate::cart::CartStore;
use crate::catalog::CatalogStore;
use crate::counter::RequestCounter;
use crate::session::SessionStore;

/// The in-memory state engine.
///
/// All state lives in this object and dies with the process; construction
/// order follows the dependency chain (catalog first, carts depend on it,
/// sessions and the counter are independent).
#[derive(Debug)]
pub struct StateEngine {
    catalog: Arc<CatalogStore>,
    sessions: SessionStore,
    carts: CartStore,
    counter: RequestCounter,
}

impl StateEngine {
    /// Create an engine with an empty catalog and the given session TTL.
    #[must_use]
    pub fn new(session_ttl: Duration) -> Self {
        Self::with_catalog(Arc::new(CatalogStore::new()), session_ttl)
    }

    /// Create an engine around an existing catalog.
    #[must_use]
    pub fn with_catalog(catalog: Arc<CatalogStore>, session_ttl: Duration) -> Self {
        let carts = CartStore::new(Arc::clone(&catalog));
        Self {
            catalog,
            sessions: SessionStore::new(session_ttl),
            carts,
            counter: RequestCounter::new(),
        }
    }

    /// Create an engine seeded with the demonstration catalog.
    #[must_use]
    pub fn with_demo_catalog(session_ttl: Duration) -> Self {
        Self::with_catalog(Arc::new(CatalogStore::with_demo_data()), session_ttl)
    }

    /// The catalog store.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// The session store.
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// The cart store.
    #[must_use]
    pub const fn carts(&self) -> &CartStore {
        &self.carts
    }

    /// The stateless request counter.
    #[must_use]
    pub const fn counter(&self) -> &RequestCounter {
        &self.counter
    }

    /// Delete a session and cascade to its cart.
    ///
    /// Returns whether a session was actually removed (idempotent, like
    /// [`SessionStore::delete`]). The cart is removed regardless, which also
    /// reaps a cart orphaned by a session that already expired on read.
    pub fn delete_session(&self, id: &SessionId) -> bool {
        let removed = self.sessions.delete(id);
        self.carts.delete_cart(id);
        removed
    }

    /// Sweep expired sessions and cascade to their carts.
    ///
    /// Returns the number of sessions removed.
    pub fn sweep_expired(&self) -> usize {
        let swept = self.sessions.sweep_expired();
        for id in &swept {
            self.carts.delete_cart(id);
        }
        if !swept.is_empty() {
            tracing::debug!(count = swept.len(), "swept expired sessions");
        }
        swept.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use statewise_core::ProductId;

    use super::*;

    fn engine() -> StateEngine {
        StateEngine::with_demo_catalog(Duration::minutes(15))
    }

    #[test]
    fn test_delete_session_cascades_to_cart() {
        let engine = engine();
        let session = engine.sessions().create(None, HashMap::new());
        engine
            .carts()
            .add_item(&session.id, &ProductId::new("p1"), 2)
            .unwrap();
        assert_eq!(engine.carts().len(), 1);

        assert!(engine.delete_session(&session.id));

        assert!(engine.sessions().get(&session.id).is_none());
        assert_eq!(engine.carts().len(), 0);
    }

    #[test]
    fn test_delete_session_twice() {
        let engine = engine();
        let session = engine.sessions().create(None, HashMap::new());

        assert!(engine.delete_session(&session.id));
        assert!(!engine.delete_session(&session.id));
    }

    #[test]
    fn test_sweep_with_nothing_expired() {
        let engine = engine();
        engine.sessions().create(None, HashMap::new());

        assert_eq!(engine.sweep_expired(), 0);
        assert_eq!(engine.sessions().len(), 1);
    }

    #[test]
    fn test_sweep_cascades_carts() {
        // Millisecond TTL so the session expires without a synthetic clock.
        let engine = StateEngine::with_demo_catalog(Duration::milliseconds(0));
        let session = engine.sessions().create(None, HashMap::new());
        engine
            .carts()
            .add_item(&session.id, &ProductId::new("p1"), 1)
            .unwrap();

        assert_eq!(engine.sweep_expired(), 1);
        assert_eq!(engine.sessions().len(), 0);
        assert_eq!(engine.carts().len(), 0);
    }

    #[test]
    fn test_restart_semantics() {
        // A fresh engine is an empty engine: nothing survives construction,
        // which is the documented restart behavior.
        let first = engine();
        first.sessions().create(None, HashMap::new());
        first.counter().increment_and_get();

        let second = engine();
        assert_eq!(second.sessions().len(), 0);
        assert_eq!(second.counter().get(), 0);
    }
}
