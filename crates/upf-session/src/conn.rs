use std::sync::Arc;

use tracing::{debug, error, warn};
use upf_config::SessionConfig;
use upf_core::{PfcpError, Result};
use upf_metrics::{SessionMetrics, SessionRecorder};
use upf_shared::{NodeIds, INVALID_SEID};

use crate::fseid::FseidGenerator;
use crate::session::PfcpSession;
use crate::store::SessionStore;

/// Session-owning side of one PFCP association
pub struct PfcpConn {
    node_id: NodeIds,
    store: SessionStore,
    generator: Arc<dyn FseidGenerator>,
    recorder: Arc<dyn SessionRecorder>,
    max_items: usize,
    max_seid_retries: u32,
}

impl PfcpConn {
    pub fn new(
        node_id: NodeIds,
        config: &SessionConfig,
        generator: Arc<dyn FseidGenerator>,
        recorder: Arc<dyn SessionRecorder>,
    ) -> Self {
        Self {
            node_id,
            store: SessionStore::new(),
            generator,
            recorder,
            max_items: config.max_items,
            max_seid_retries: config.max_seid_retries.max(1),
        }
    }

    pub fn node_id(&self) -> &NodeIds {
        &self.node_id
    }

    /// Draw a local SEID that is non-zero and not held by a live session
    pub fn generate_fseid(&self) -> Result<u64> {
        for _ in 0..self.max_seid_retries {
            let seid = self.generator.generate()?;
            if seid == INVALID_SEID || self.store.contains(seid) {
                continue;
            }
            return Ok(seid);
        }
        Err(PfcpError::FseidExhausted(self.max_seid_retries))
    }

    /// Allocate a session for `remote_seid`.
    ///
    /// Returns the local SEID, or [`INVALID_SEID`] if none could be
    /// allocated; the failure is logged here.
    pub fn new_pfcp_session(&self, remote_seid: u64) -> u64 {
        match self.try_new_pfcp_session(remote_seid) {
            Ok(session) => session.local_seid(),
            Err(e) => {
                error!(
                    remote_seid,
                    node_id = %self.node_id.remote,
                    cause = e.to_cause(),
                    severity = %e.severity(),
                    "Failed to generate session Id: {}",
                    e
                );
                INVALID_SEID
            }
        }
    }

    /// Allocate a session for `remote_seid`, returning the stored entity
    pub fn try_new_pfcp_session(&self, remote_seid: u64) -> Result<Arc<PfcpSession>> {
        let local_seid = self.generate_fseid()?;

        let session = Arc::new(PfcpSession::new(
            local_seid,
            remote_seid,
            self.max_items,
            SessionMetrics::new(self.node_id.remote.to_string(), local_seid),
        ));

        // Held across insert and save so a racing removal flushes its
        // deletion strictly after the creation.
        let metrics = session.metrics();

        if let Err(e) = self.store.insert(Arc::clone(&session)) {
            if let PfcpError::DuplicateSeid(seid) = &e {
                error!(
                    local_seid = *seid,
                    remote_seid,
                    severity = %e.severity(),
                    "Session id generator returned a live id; keeping existing session"
                );
            }
            return Err(e);
        }

        self.recorder.save(&metrics);
        drop(metrics);

        debug!(local_seid, remote_seid, node_id = %self.node_id.remote, "Session created");
        Ok(session)
    }

    /// Remove the session with `local_seid`. Unknown ids are ignored.
    pub fn remove_session(&self, local_seid: u64) {
        self.detach_session(local_seid);
    }

    fn detach_session(&self, local_seid: u64) -> bool {
        let Some(session) = self.store.remove(local_seid) else {
            return false;
        };

        let mut metrics = session.metrics();
        metrics.delete();
        self.recorder.save(&metrics);

        debug!(
            local_seid,
            remote_seid = session.remote_seid(),
            lifetime_ms = metrics.lifetime().as_millis() as u64,
            "Session removed"
        );
        true
    }

    /// Look up a live session
    pub fn get_session(&self, local_seid: u64) -> Option<Arc<PfcpSession>> {
        self.store.get(local_seid)
    }

    /// Look up a live session, failing with the PFCP "not found" error
    pub fn session(&self, local_seid: u64) -> Result<Arc<PfcpSession>> {
        self.get_session(local_seid)
            .ok_or(PfcpError::SessionNotFound(local_seid))
    }

    /// Remove every session, e.g. on association release.
    ///
    /// Returns the number of sessions removed.
    pub fn release_sessions(&self) -> usize {
        let removed = self
            .store
            .seids()
            .into_iter()
            .filter(|&seid| self.detach_session(seid))
            .count();
        if removed > 0 {
            warn!(node_id = %self.node_id.remote, removed, "Released all sessions of association");
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.store.len()
    }

    pub fn seids(&self) -> Vec<u64> {
        self.store.seids()
    }
}
