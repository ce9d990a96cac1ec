use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use upf_core::{PfcpError, Result};
use upf_shared::INVALID_SEID;

use crate::session::PfcpSession;

/// Session table using DashMap for concurrent access
#[derive(Debug, Default)]
pub struct SessionStore {
    /// Map of local SEID -> session
    sessions: DashMap<u64, Arc<PfcpSession>>,
}

impl SessionStore {
    /// Create new session store
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Insert a session under its local SEID.
    ///
    /// Never replaces a live session: an occupied key is reported as
    /// [`PfcpError::DuplicateSeid`] and the store is left untouched.
    pub fn insert(&self, session: Arc<PfcpSession>) -> Result<()> {
        let seid = session.local_seid();
        if seid == INVALID_SEID {
            return Err(PfcpError::InternalError(
                "refusing to store session with invalid seid".to_string(),
            ));
        }

        match self.sessions.entry(seid) {
            Entry::Occupied(_) => Err(PfcpError::DuplicateSeid(seid)),
            Entry::Vacant(slot) => {
                slot.insert(session);
                Ok(())
            }
        }
    }

    /// Detach a session from the store
    pub fn remove(&self, seid: u64) -> Option<Arc<PfcpSession>> {
        self.sessions.remove(&seid).map(|(_, session)| session)
    }

    /// Get session without removing
    pub fn get(&self, seid: u64) -> Option<Arc<PfcpSession>> {
        self.sessions.get(&seid).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, seid: u64) -> bool {
        self.sessions.contains_key(&seid)
    }

    /// Local SEIDs of all live sessions
    pub fn seids(&self) -> Vec<u64> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    /// Get number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
