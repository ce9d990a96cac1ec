use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::conn::PfcpConn;

/// Input to the notification actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierMessage {
    /// Dataplane buffered downlink packets for a session
    DownlinkData { seid: u64, pdr_id: u32 },
    /// Peer answered the Session Report Request
    ReportAcknowledged { seid: u64 },
}

/// Session Report Request to be sent to the control plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub local_seid: u64,
    pub remote_seid: u64,
    pub pdr_id: u32,
}

/// Delivers downlink data notifications, at most one in flight per session.
pub struct NotificationActor {
    conn: Arc<PfcpConn>,
    receiver: mpsc::Receiver<NotifierMessage>,
    outbound_tx: mpsc::Sender<SessionReport>,
}

impl NotificationActor {
    pub fn new(
        conn: Arc<PfcpConn>,
        receiver: mpsc::Receiver<NotifierMessage>,
        outbound_tx: mpsc::Sender<SessionReport>,
    ) -> Self {
        Self {
            conn,
            receiver,
            outbound_tx,
        }
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            if !self.handle_message(msg).await {
                break;
            }
        }
        debug!("Notification actor stopped");
    }

    /// Returns `false` once the outbound side is gone.
    async fn handle_message(&self, msg: NotifierMessage) -> bool {
        match msg {
            NotifierMessage::DownlinkData { seid, pdr_id } => {
                let Some(session) = self.conn.get_session(seid) else {
                    debug!(local_seid = seid, "Discarding notification for unknown session");
                    return true;
                };

                if !session.try_begin_notify() {
                    debug!(local_seid = seid, pdr_id, "Notification already pending");
                    return true;
                }

                let report = SessionReport {
                    local_seid: seid,
                    remote_seid: session.remote_seid(),
                    pdr_id,
                };
                if let Err(e) = self.outbound_tx.send(report).await {
                    warn!(local_seid = seid, "Failed to send session report: {}", e);
                    session.set_notify_flag(false);
                    return false;
                }
                true
            }
            NotifierMessage::ReportAcknowledged { seid } => {
                if let Some(session) = self.conn.get_session(seid) {
                    session.set_notify_flag(false);
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fseid::SequentialFseidGenerator;
    use std::net::{IpAddr, Ipv4Addr};
    use upf_config::SessionConfig;
    use upf_metrics::{SessionMetrics, SessionRecorder};
    use upf_shared::{NodeId, NodeIds};

    struct NullRecorder;

    impl SessionRecorder for NullRecorder {
        fn save(&self, _session: &SessionMetrics) {}
    }

    fn conn() -> Arc<PfcpConn> {
        let ip = NodeId::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST));
        Arc::new(PfcpConn::new(
            NodeIds::new(ip.clone(), ip),
            &SessionConfig::default(),
            Arc::new(SequentialFseidGenerator::new(1001)),
            Arc::new(NullRecorder),
        ))
    }

    fn spawn_actor(
        conn: Arc<PfcpConn>,
    ) -> (mpsc::Sender<NotifierMessage>, mpsc::Receiver<SessionReport>) {
        let (tx, rx) = mpsc::channel(16);
        let (out_tx, out_rx) = mpsc::channel(16);
        tokio::spawn(NotificationActor::new(conn, rx, out_tx).run());
        (tx, out_rx)
    }

    #[tokio::test]
    async fn test_single_report_until_ack() {
        let conn = conn();
        let seid = conn.new_pfcp_session(55);
        let (tx, mut out_rx) = spawn_actor(Arc::clone(&conn));

        tx.send(NotifierMessage::DownlinkData { seid, pdr_id: 2 }).await.unwrap();
        tx.send(NotifierMessage::DownlinkData { seid, pdr_id: 2 }).await.unwrap();
        tx.send(NotifierMessage::ReportAcknowledged { seid }).await.unwrap();
        tx.send(NotifierMessage::DownlinkData { seid, pdr_id: 3 }).await.unwrap();

        let first = out_rx.recv().await.unwrap();
        assert_eq!(
            first,
            SessionReport {
                local_seid: seid,
                remote_seid: 55,
                pdr_id: 2
            }
        );
        let second = out_rx.recv().await.unwrap();
        assert_eq!(second.pdr_id, 3);

        drop(tx);
        assert!(out_rx.recv().await.is_none());
        assert!(conn.get_session(seid).unwrap().notify_flag());
    }

    #[tokio::test]
    async fn test_unknown_session_discarded() {
        let conn = conn();
        let (tx, mut out_rx) = spawn_actor(conn);

        tx.send(NotifierMessage::DownlinkData { seid: 9999, pdr_id: 1 }).await.unwrap();
        drop(tx);

        assert!(out_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_removed_session_not_reported() {
        let conn = conn();
        let seid = conn.new_pfcp_session(55);
        conn.remove_session(seid);
        let (tx, mut out_rx) = spawn_actor(conn);

        tx.send(NotifierMessage::DownlinkData { seid, pdr_id: 1 }).await.unwrap();
        drop(tx);

        assert!(out_rx.recv().await.is_none());
    }
}
