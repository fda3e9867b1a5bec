//! Session context.
//!
//! Sessions live behind an injectable store port so permission checks can
//! be unit-tested without HTTP or a browser. The server wires in the
//! in-memory implementation once at startup; anything implementing
//! `SessionStore` (a persistent cache, a test double) drops in unchanged.

use anyhow::Result;
use log::info;
use shared::{PermissionEntry, UserSession};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::permissions;

/// Port over session persistence: get/set/clear by token.
pub trait SessionStore: Send + Sync {
    fn get(&self, token: &str) -> Result<Option<UserSession>>;
    fn set(&self, session: &UserSession) -> Result<()>;
    fn clear(&self, token: &str) -> Result<()>;
}

/// Process-local session store.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, UserSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, token: &str) -> Result<Option<UserSession>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.get(token).cloned())
    }

    fn set(&self, session: &UserSession) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    fn clear(&self, token: &str) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.remove(token);
        Ok(())
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Open a session for an authenticated user, resolving the permission
    /// grants into the allowed-route set once at login time.
    pub fn open_session(
        &self,
        user_code: &str,
        user_name: &str,
        role: &str,
        grants: &[PermissionEntry],
    ) -> Result<UserSession> {
        let mut routes: Vec<String> = permissions::allowed_routes(grants).into_iter().collect();
        routes.sort();

        let session = UserSession {
            token: Uuid::new_v4().to_string(),
            user_code: user_code.to_string(),
            user_name: user_name.to_string(),
            role: role.to_string(),
            allowed_routes: routes,
        };

        self.store.set(&session)?;
        info!("Opened session for user {} ({} routes)", user_name, session.allowed_routes.len());

        Ok(session)
    }

    pub fn get_session(&self, token: &str) -> Result<Option<UserSession>> {
        self.store.get(token)
    }

    pub fn close_session(&self, token: &str) -> Result<()> {
        info!("Closing session {}", token);
        self.store.clear(token)
    }

    /// True when the session exists and its route set admits the path.
    pub fn is_route_allowed(&self, token: &str, path: &str) -> Result<bool> {
        match self.store.get(token)? {
            Some(session) => {
                let routes = session.allowed_routes.iter().cloned().collect();
                Ok(permissions::is_route_allowed(path, &routes))
            }
            None => Ok(false),
        }
    }
}
