//! Session-scoped application context.
//!
//! Every logged-in session gets an explicit context created at login
//! and torn down at logout: the authenticated identity, the bearer
//! credential, and one store per resource. Pages reach the context through
//! the [`RequireAuth`](crate::middleware::RequireAuth) extractor.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::CurrentUser;
use crate::store::{AssignmentStore, CommentStore, SubjectStore, UserStore};

/// Everything one logged-in session owns.
#[derive(Debug)]
pub struct SessionContext {
    user: CurrentUser,
    token: SecretString,
    assignments: AssignmentStore,
    subjects: SubjectStore,
    users: UserStore,
    comments: CommentStore,
}

impl SessionContext {
    /// Build a fresh context for a newly authenticated user.
    #[must_use]
    pub fn new(user: CurrentUser, token: SecretString) -> Self {
        Self {
            user,
            token,
            assignments: AssignmentStore::new(),
            subjects: SubjectStore::new(),
            users: UserStore::new(),
            comments: CommentStore::new(),
        }
    }

    /// The authenticated identity.
    #[must_use]
    pub const fn user(&self) -> &CurrentUser {
        &self.user
    }

    /// The bearer credential for upstream calls.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// The assignment store.
    #[must_use]
    pub const fn assignments(&self) -> &AssignmentStore {
        &self.assignments
    }

    /// The subject store.
    #[must_use]
    pub const fn subjects(&self) -> &SubjectStore {
        &self.subjects
    }

    /// The user store.
    #[must_use]
    pub const fn users(&self) -> &UserStore {
        &self.users
    }

    /// The comment store.
    #[must_use]
    pub const fn comments(&self) -> &CommentStore {
        &self.comments
    }
}

/// Registry of live session contexts, keyed by the id stored in the cookie
/// session.
#[derive(Debug, Default)]
pub struct ContextRegistry {
    inner: RwLock<HashMap<Uuid, Arc<SessionContext>>>,
}

impl ContextRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a context and return its id.
    pub async fn insert(&self, context: SessionContext) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.insert(id, Arc::new(context));
        id
    }

    /// Look up a live context.
    pub async fn get(&self, id: Uuid) -> Option<Arc<SessionContext>> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Tear down a context (logout).
    pub async fn remove(&self, id: Uuid) -> Option<Arc<SessionContext>> {
        self.inner.write().await.remove(&id)
    }
}
