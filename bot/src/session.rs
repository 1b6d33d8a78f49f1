//! Per-user conversation state
//!
//! The adapter owns all of it; the engine never sees sessions.

use dashmap::DashMap;
use tapcoin_core::UserId;

/// Prompt the adapter is waiting on for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingInput {
    AdminPassword,
}

#[derive(Debug, Clone, Copy, Default)]
struct Session {
    admin: bool,
    pending: Option<PendingInput>,
}

/// Conversation state keyed by user id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<UserId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            sessions: DashMap::new(),
        }
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.sessions
            .get(&user_id)
            .map(|s| s.admin)
            .unwrap_or(false)
    }

    pub fn set_admin(&self, user_id: UserId, admin: bool) {
        self.sessions.entry(user_id).or_default().admin = admin;
    }

    /// Remove and return the pending prompt, if any
    pub fn take_pending(&self, user_id: UserId) -> Option<PendingInput> {
        self.sessions
            .get_mut(&user_id)
            .and_then(|mut s| s.pending.take())
    }

    pub fn set_pending(&self, user_id: UserId, pending: PendingInput) {
        self.sessions.entry(user_id).or_default().pending = Some(pending);
    }
}
