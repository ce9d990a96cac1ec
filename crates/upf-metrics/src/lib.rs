use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use lazy_static::lazy_static;
use std::sync::Once;

pub mod session;

pub use session::{PromSessionRecorder, SessionMetrics, SessionRecorder};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Session accounting, labelled by remote PFCP node
    pub static ref SESSIONS_ACTIVE: IntGaugeVec = IntGaugeVec::new(
        Opts::new("upf_pfcp_sessions_active", "Number of live PFCP sessions"),
        &["node_id"]
    ).unwrap();

    pub static ref SESSIONS_CREATED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("upf_pfcp_sessions_created_total", "Total number of PFCP sessions created"),
        &["node_id"]
    ).unwrap();

    pub static ref SESSIONS_DELETED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("upf_pfcp_sessions_deleted_total", "Total number of PFCP sessions deleted"),
        &["node_id"]
    ).unwrap();

    pub static ref SESSION_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("upf_pfcp_session_duration_seconds", "Lifetime of deleted PFCP sessions")
            .buckets(vec![1.0, 10.0, 60.0, 300.0, 1800.0, 3600.0, 21600.0, 86400.0])
    ).unwrap();
}

static REGISTER: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY.register(Box::new(SESSIONS_ACTIVE.clone())).unwrap();
        REGISTRY.register(Box::new(SESSIONS_CREATED_TOTAL.clone())).unwrap();
        REGISTRY.register(Box::new(SESSIONS_DELETED_TOTAL.clone())).unwrap();
        REGISTRY.register(Box::new(SESSION_DURATION_SECONDS.clone())).unwrap();
    });
}

/// Gather metrics in Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
