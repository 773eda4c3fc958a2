use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

use evep_core::AppResult;

/// Named platform queries that mutations invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `GET /auth/me`
    Identity,
    /// `GET /rbac/roles/`
    Roles,
    /// `GET /rbac/permissions/`
    Permissions,
    /// `GET /rbac/user-roles/`
    UserRoles,
    /// `GET /user-management/`
    Users,
    /// `GET /screenings/sessions`
    Sessions,
    /// `GET /dashboard/stats`
    DashboardStats,
    /// `GET /admin/settings`
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheSlot {
    scope: String,
    key: QueryKey,
    params: String,
}

#[derive(Debug)]
struct CachedValue {
    value: Value,
    stored_at: Instant,
}

/// Short-lived store of platform query results.
///
/// Entries are partitioned by caller scope (a token fingerprint) because
/// the platform answers per caller. Values are stored as JSON and parsed
/// again on read, so a slot written with one type and read with another is
/// treated as a miss.
#[derive(Debug)]
pub struct QueryCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheSlot, CachedValue>>,
}

impl QueryCache {
    /// Creates a cache whose entries live for `ttl`. A zero TTL disables caching.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value or runs `fetch` and stores its success.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        scope: &str,
        key: QueryKey,
        params: &str,
        fetch: F,
    ) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let slot = CacheSlot {
            scope: scope.to_owned(),
            key,
            params: params.to_owned(),
        };

        if let Some(value) = self.lookup::<T>(&slot).await {
            debug!(?key, params, "query cache hit");
            return Ok(value);
        }

        let value = fetch().await?;
        self.store(slot, &value).await;
        Ok(value)
    }

    /// Drops every slot for the given keys, across all callers.
    pub async fn invalidate(&self, keys: &[QueryKey]) {
        let mut entries = self.entries.write().await;
        entries.retain(|slot, _| !keys.contains(&slot.key));
        debug!(?keys, "query cache invalidated");
    }

    /// Drops every slot belonging to one caller.
    pub async fn invalidate_scope(&self, scope: &str) {
        self.entries
            .write()
            .await
            .retain(|slot, _| slot.scope != scope);
    }

    /// Returns the number of stored slots, including expired ones not yet
    /// swept by a later store.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn lookup<T: DeserializeOwned>(&self, slot: &CacheSlot) -> Option<T> {
        if self.ttl.is_zero() {
            return None;
        }

        let entries = self.entries.read().await;
        let cached = entries.get(slot)?;
        if cached.stored_at.elapsed() >= self.ttl {
            return None;
        }

        serde_json::from_value(cached.value.clone()).ok()
    }

    async fn store<T: Serialize>(&self, slot: CacheSlot, value: &T) {
        if self.ttl.is_zero() {
            return;
        }

        match serde_json::to_value(value) {
            Ok(value) => {
                let mut entries = self.entries.write().await;
                entries.retain(|_, cached| cached.stored_at.elapsed() < self.ttl);
                entries.insert(
                    slot,
                    CachedValue {
                        value,
                        stored_at: Instant::now(),
                    },
                );
            }
            Err(error) => {
                warn!(key = ?slot.key, error = %error, "query result is not cacheable");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use evep_core::{AppError, AppResult};

    use super::{QueryCache, QueryKey};

    async fn fetch_counted(counter: &AtomicUsize, value: u32) -> AppResult<u32> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_fetch("alice", QueryKey::Roles, "", || fetch_counted(&calls, 7))
            .await;
        let second = cache
            .get_or_fetch("alice", QueryKey::Roles, "", || fetch_counted(&calls, 8))
            .await;

        assert_eq!(first.ok(), Some(7));
        assert_eq!(second.ok(), Some(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn scopes_and_params_do_not_share_slots() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let calls = AtomicUsize::new(0);

        let _ = cache
            .get_or_fetch("alice", QueryKey::Users, "page=1", || fetch_counted(&calls, 1))
            .await;
        let other_page = cache
            .get_or_fetch("alice", QueryKey::Users, "page=2", || fetch_counted(&calls, 2))
            .await;
        let other_caller = cache
            .get_or_fetch("bob", QueryKey::Users, "page=1", || fetch_counted(&calls, 3))
            .await;

        assert_eq!(other_page.ok(), Some(2));
        assert_eq!(other_caller.ok(), Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn invalidation_drops_key_for_every_caller() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let calls = AtomicUsize::new(0);

        for scope in ["alice", "bob"] {
            let _ = cache
                .get_or_fetch(scope, QueryKey::Roles, "", || fetch_counted(&calls, 1))
                .await;
        }
        let _ = cache
            .get_or_fetch("alice", QueryKey::Settings, "", || fetch_counted(&calls, 1))
            .await;

        cache.invalidate(&[QueryKey::Roles]).await;

        assert_eq!(cache.len().await, 1);
        let refreshed = cache
            .get_or_fetch("bob", QueryKey::Roles, "", || fetch_counted(&calls, 9))
            .await;
        assert_eq!(refreshed.ok(), Some(9));
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = QueryCache::new(Duration::from_secs(5));
        let calls = AtomicUsize::new(0);

        let _ = cache
            .get_or_fetch("alice", QueryKey::DashboardStats, "", || {
                fetch_counted(&calls, 1)
            })
            .await;
        tokio::time::advance(Duration::from_secs(6)).await;
        let refreshed = cache
            .get_or_fetch("alice", QueryKey::DashboardStats, "", || {
                fetch_counted(&calls, 2)
            })
            .await;

        assert_eq!(refreshed.ok(), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn storing_sweeps_expired_slots() {
        let cache = QueryCache::new(Duration::from_secs(5));
        let calls = AtomicUsize::new(0);

        for scope in ["alice", "bob"] {
            let _ = cache
                .get_or_fetch(scope, QueryKey::Users, "page=1", || fetch_counted(&calls, 1))
                .await;
        }
        assert_eq!(cache.len().await, 2);

        tokio::time::advance(Duration::from_secs(6)).await;
        let _ = cache
            .get_or_fetch("carol", QueryKey::Settings, "", || fetch_counted(&calls, 2))
            .await;

        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = QueryCache::new(Duration::from_secs(30));

        let failed: AppResult<u32> = cache
            .get_or_fetch("alice", QueryKey::Settings, "", || async {
                Err(AppError::Unavailable("down".to_owned()))
            })
            .await;

        assert!(failed.is_err());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn zero_ttl_disables_caching() {
        let cache = QueryCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);

        for value in [1, 2] {
            let _ = cache
                .get_or_fetch("alice", QueryKey::Roles, "", || fetch_counted(&calls, value))
                .await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
