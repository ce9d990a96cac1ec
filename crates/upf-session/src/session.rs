use std::fmt;

use parking_lot::{Mutex, MutexGuard};
use upf_metrics::SessionMetrics;
use upf_shared::{Far, Pdr, Qer};

use crate::rules::PacketForwardingRules;

/// Pending-notification marker with its own lock.
///
/// Read and written by the notification path independently of rule updates.
#[derive(Debug, Default)]
pub struct NotifyFlag {
    flag: Mutex<bool>,
}

impl NotifyFlag {
    pub fn get(&self) -> bool {
        *self.flag.lock()
    }

    pub fn set(&self, value: bool) {
        *self.flag.lock() = value;
    }

    /// Set the flag, returning `true` if it was previously clear.
    pub fn test_and_set(&self) -> bool {
        let mut flag = self.flag.lock();
        let was_clear = !*flag;
        *flag = true;
        was_clear
    }
}

/// One PFCP session
#[derive(Debug)]
pub struct PfcpSession {
    local_seid: u64,
    remote_seid: u64,
    notification_flag: NotifyFlag,
    metrics: Mutex<SessionMetrics>,
    rules: Mutex<PacketForwardingRules>,
}

impl PfcpSession {
    pub(crate) fn new(
        local_seid: u64,
        remote_seid: u64,
        max_items: usize,
        metrics: SessionMetrics,
    ) -> Self {
        Self {
            local_seid,
            remote_seid,
            notification_flag: NotifyFlag::default(),
            metrics: Mutex::new(metrics),
            rules: Mutex::new(PacketForwardingRules::new(max_items)),
        }
    }

    pub fn local_seid(&self) -> u64 {
        self.local_seid
    }

    pub fn remote_seid(&self) -> u64 {
        self.remote_seid
    }

    pub fn notify_flag(&self) -> bool {
        self.notification_flag.get()
    }

    pub fn set_notify_flag(&self, value: bool) {
        self.notification_flag.set(value);
    }

    /// Claim the right to send a notification for this session
    pub fn try_begin_notify(&self) -> bool {
        self.notification_flag.test_and_set()
    }

    pub(crate) fn metrics(&self) -> MutexGuard<'_, SessionMetrics> {
        self.metrics.lock()
    }

    /// Read the rule set under the session's rule lock
    pub fn with_rules<T>(&self, f: impl FnOnce(&PacketForwardingRules) -> T) -> T {
        f(&self.rules.lock())
    }

    /// Mutate the rule set under the session's rule lock.
    ///
    /// Several updates made in one closure are observed atomically by
    /// [`PfcpSession::snapshot`].
    pub fn with_rules_mut<T>(&self, f: impl FnOnce(&mut PacketForwardingRules) -> T) -> T {
        f(&mut self.rules.lock())
    }

    /// Consistent copy of all rules, for the dataplane layer
    pub fn snapshot(&self) -> PacketForwardingRules {
        self.rules.lock().clone()
    }

    pub fn add_or_update_pdr(&self, pdr: Pdr) -> bool {
        self.with_rules_mut(|r| r.add_or_update_pdr(pdr))
    }

    pub fn add_or_update_far(&self, far: Far) -> bool {
        self.with_rules_mut(|r| r.add_or_update_far(far))
    }

    pub fn add_or_update_qer(&self, qer: Qer) -> bool {
        self.with_rules_mut(|r| r.add_or_update_qer(qer))
    }

    pub fn remove_pdr(&self, pdr_id: u32) -> Option<Pdr> {
        self.with_rules_mut(|r| r.remove_pdr(pdr_id))
    }

    pub fn remove_far(&self, far_id: u32) -> Option<Far> {
        self.with_rules_mut(|r| r.remove_far(far_id))
    }

    pub fn remove_qer(&self, qer_id: u32) -> Option<Qer> {
        self.with_rules_mut(|r| r.remove_qer(qer_id))
    }

    pub fn get_pdr(&self, pdr_id: u32) -> Option<Pdr> {
        self.with_rules(|r| r.get_pdr(pdr_id).cloned())
    }

    pub fn get_far(&self, far_id: u32) -> Option<Far> {
        self.with_rules(|r| r.get_far(far_id).cloned())
    }

    pub fn get_qer(&self, qer_id: u32) -> Option<Qer> {
        self.with_rules(|r| r.get_qer(qer_id).cloned())
    }
}

impl fmt::Display for PfcpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session(lseid={:#x}, rseid={:#x}): {}",
            self.local_seid,
            self.remote_seid,
            self.rules.lock()
        )
    }
}
