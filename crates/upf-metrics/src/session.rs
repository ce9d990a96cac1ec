use std::time::{Duration, Instant};

use crate::{
    SESSIONS_ACTIVE, SESSIONS_CREATED_TOTAL, SESSIONS_DELETED_TOTAL, SESSION_DURATION_SECONDS,
};

/// Accounting record for one PFCP session.
///
/// Created alongside the session and flushed through a [`SessionRecorder`]
/// once on creation and once after [`SessionMetrics::delete`].
#[derive(Debug, Clone)]
pub struct SessionMetrics {
    node_id: String,
    local_seid: u64,
    created_at: Instant,
    deleted_at: Option<Instant>,
}

impl SessionMetrics {
    pub fn new(node_id: impl Into<String>, local_seid: u64) -> Self {
        Self {
            node_id: node_id.into(),
            local_seid,
            created_at: Instant::now(),
            deleted_at: None,
        }
    }

    /// Mark the record as removed. Repeated calls keep the first deletion time.
    pub fn delete(&mut self) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(Instant::now());
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn local_seid(&self) -> u64 {
        self.local_seid
    }

    /// Time the session has been (or was) alive
    pub fn lifetime(&self) -> Duration {
        match self.deleted_at {
            Some(deleted) => deleted.duration_since(self.created_at),
            None => self.created_at.elapsed(),
        }
    }
}

/// Sink for session lifecycle accounting
pub trait SessionRecorder: Send + Sync {
    /// Publish the current state of `session`
    fn save(&self, session: &SessionMetrics);
}

/// Records sessions into the global Prometheus registry
#[derive(Debug, Default, Clone, Copy)]
pub struct PromSessionRecorder;

impl PromSessionRecorder {
    pub fn new() -> Self {
        crate::register_metrics();
        Self
    }

    /// Live sessions currently accounted for `node_id`
    pub fn active(&self, node_id: &str) -> i64 {
        SESSIONS_ACTIVE.with_label_values(&[node_id]).get()
    }
}

impl SessionRecorder for PromSessionRecorder {
    fn save(&self, session: &SessionMetrics) {
        let labels = [session.node_id()];
        if session.is_deleted() {
            SESSIONS_ACTIVE.with_label_values(&labels).dec();
            SESSIONS_DELETED_TOTAL.with_label_values(&labels).inc();
            SESSION_DURATION_SECONDS.observe(session.lifetime().as_secs_f64());
        } else {
            SESSIONS_ACTIVE.with_label_values(&labels).inc();
            SESSIONS_CREATED_TOTAL.with_label_values(&labels).inc();
        }
    }
}
