//! In-memory session registry.
//!
//! One [`ScopeFacade`] per signed-in session, keyed by an opaque bearer
//! token. Removing the entry on sign-out drops the principal and clears the
//! scope in a single step, so the two can never desynchronize.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use scopegate_auth::Principal;
use scopegate_session::{ScopeFacade, TenantDirectory};

struct Session {
    facade: ScopeFacade,
    established_at: DateTime<Utc>,
}

pub struct SessionRegistry {
    directory: Arc<dyn TenantDirectory>,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionRegistry {
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self {
            directory,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Establish a session for the principal; returns the bearer token.
    pub fn sign_in(&self, principal: Principal) -> String {
        let token = Uuid::now_v7().to_string();
        let mut facade = ScopeFacade::new(self.directory.clone());
        facade.sign_in(principal);
        self.sessions.lock().unwrap().insert(
            token.clone(),
            Session {
                facade,
                established_at: Utc::now(),
            },
        );
        token
    }

    /// Tear down a session. Principal drop and scope clear happen together.
    pub fn sign_out(&self, token: &str) -> bool {
        self.sessions.lock().unwrap().remove(token).is_some()
    }

    /// Run `f` against the session's facade, if the token is live.
    pub fn with_session<R>(&self, token: &str, f: impl FnOnce(&mut ScopeFacade) -> R) -> Option<R> {
        self.sessions
            .lock()
            .unwrap()
            .get_mut(token)
            .map(|s| f(&mut s.facade))
    }

    pub fn established_at(&self, token: &str) -> Option<DateTime<Utc>> {
        self.sessions
            .lock()
            .unwrap()
            .get(token)
            .map(|s| s.established_at)
    }
}
