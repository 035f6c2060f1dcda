//! User store.
//!
//! The user and tutor listings change rarely, so they sit behind a TTL
//! cache (five minutes). A non-forced fetch that hits a fresh cache
//! entry performs no network call and returns the cached listing unchanged;
//! a forced fetch always goes to the network and refreshes the entry.
//! Mutations that could affect either listing call [`UserStore::invalidate`].

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::SecretString;
use tokio::sync::RwLock;

use tutorhub_core::UserSummary;

use crate::api::{ApiClient, ApiError};

use super::{Phase, StoreError, Ticket, TicketCounter};

/// Freshness window for the cached listings.
pub const LIST_TTL: Duration = Duration::from_secs(5 * 60);

/// Which cached listing an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ListKey {
    Users,
    Tutors,
}

/// Slice state for users.
#[derive(Debug, Clone, Default)]
pub struct UserState {
    /// Full user listing (admin pages).
    pub users: Vec<UserSummary>,
    /// Tutor listing (assign-tutor page).
    pub tutors: Vec<UserSummary>,
    /// The authenticated user.
    pub me: Option<UserSummary>,
    /// Request-lifecycle flags.
    pub phase: Phase,
}

/// Store owning the local copies of the user and tutor listings.
pub struct UserStore {
    state: RwLock<UserState>,
    tickets: TicketCounter,
    cache: Cache<ListKey, Arc<Vec<UserSummary>>>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(LIST_TTL)
    }

    /// Construct with a custom freshness window (used by tests).
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(UserState::default()),
            tickets: TicketCounter::default(),
            cache: Cache::builder().max_capacity(2).time_to_live(ttl).build(),
        }
    }

    /// Cloned snapshot of the slice state.
    pub async fn snapshot(&self) -> UserState {
        self.state.read().await.clone()
    }

    /// Drop both cached listings.
    ///
    /// Called by any mutation that could change who the listings contain
    /// (registration is the only such mutation reachable from this client).
    pub async fn invalidate(&self) {
        self.cache.invalidate(&ListKey::Users).await;
        self.cache.invalidate(&ListKey::Tutors).await;
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn fetch_me(
        &self,
        api: &ApiClient,
        token: &SecretString,
    ) -> Result<UserSummary, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.current_user(token).await;
        self.resolve(ticket, outcome, |state, me| {
            state.me = Some(me.clone());
        })
        .await
    }

    /// Fetch the full user listing (admin only).
    ///
    /// With `force = false` a fresh cache entry is served without any
    /// network call.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn fetch_all(
        &self,
        api: &ApiClient,
        token: &SecretString,
        force: bool,
    ) -> Result<Vec<UserSummary>, StoreError> {
        self.fetch_listing(ListKey::Users, api, token, force).await
    }

    /// Fetch the tutor listing (admin only), with the same cache policy as
    /// [`UserStore::fetch_all`].
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn fetch_tutors(
        &self,
        api: &ApiClient,
        token: &SecretString,
        force: bool,
    ) -> Result<Vec<UserSummary>, StoreError> {
        self.fetch_listing(ListKey::Tutors, api, token, force).await
    }

    async fn fetch_listing(
        &self,
        key: ListKey,
        api: &ApiClient,
        token: &SecretString,
        force: bool,
    ) -> Result<Vec<UserSummary>, StoreError> {
        if !force
            && let Some(cached) = self.cache.get(&key).await
        {
            tracing::debug!(?key, "serving listing from cache");
            let list = (*cached).clone();
            let mut state = self.state.write().await;
            state.phase.fulfill();
            Self::store_listing(&mut state, key, &list);
            return Ok(list);
        }

        let ticket = self.begin().await;
        let outcome = match key {
            ListKey::Users => api.list_users(token).await,
            ListKey::Tutors => api.list_tutors(token).await,
        };
        let list = self
            .resolve(ticket, outcome, |state, list| {
                Self::store_listing(state, key, list);
            })
            .await?;
        self.cache.insert(key, Arc::new(list.clone())).await;
        Ok(list)
    }

    fn store_listing(state: &mut UserState, key: ListKey, list: &[UserSummary]) {
        match key {
            ListKey::Users => state.users = list.to_vec(),
            ListKey::Tutors => state.tutors = list.to_vec(),
        }
    }

    async fn begin(&self) -> Ticket {
        let ticket = self.tickets.begin();
        self.state.write().await.phase.begin();
        ticket
    }

    async fn resolve<T: Clone>(
        &self,
        ticket: Ticket,
        outcome: Result<T, ApiError>,
        apply: impl FnOnce(&mut UserState, &T),
    ) -> Result<T, StoreError> {
        let mut state = self.state.write().await;
        if !self.tickets.is_current(ticket) {
            tracing::debug!("discarding superseded user response");
            return Err(StoreError::Superseded);
        }
        match outcome {
            Ok(value) => {
                state.phase.fulfill();
                apply(&mut state, &value);
                Ok(value)
            }
            Err(err) => {
                let message = err.to_string();
                state.phase.reject(message.clone());
                Err(StoreError::Api(message))
            }
        }
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore").finish_non_exhaustive()
    }
}
