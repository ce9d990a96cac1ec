use std::fmt;

use upf_shared::{Far, Pdr, Qer, QosLevel, Rule};

/// Ordered collection of one kind of rule, keyed by rule id.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleList<R> {
    items: Vec<R>,
}

impl<R: Rule> RuleList<R> {
    /// Create an empty list with room for `capacity` rules.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Add or replace the rule with the same id.
    ///
    /// Returns `true` if an existing rule was replaced.
    pub fn upsert(&mut self, rule: R) -> bool {
        if let Some(existing) = self.items.iter_mut().find(|r| r.rule_id() == rule.rule_id()) {
            *existing = rule;
            true
        } else {
            self.items.push(rule);
            false
        }
    }

    pub fn remove(&mut self, id: u32) -> Option<R> {
        let idx = self.items.iter().position(|r| r.rule_id() == id)?;
        Some(self.items.remove(idx))
    }

    pub fn get(&self, id: u32) -> Option<&R> {
        self.items.iter().find(|r| r.rule_id() == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut R> {
        self.items.iter_mut().find(|r| r.rule_id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.items
    }
}

impl<R: Rule> fmt::Display for RuleList<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, rule) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{rule}")?;
        }
        write!(f, "]")
    }
}

/// PDR, FAR and QER sets of one session
#[derive(Debug, Clone, PartialEq)]
pub struct PacketForwardingRules {
    pub pdrs: RuleList<Pdr>,
    pub fars: RuleList<Far>,
    pub qers: RuleList<Qer>,
}

impl PacketForwardingRules {
    /// Empty containers, each pre-sized to `max_items`
    pub fn new(max_items: usize) -> Self {
        Self {
            pdrs: RuleList::with_capacity(max_items),
            fars: RuleList::with_capacity(max_items),
            qers: RuleList::with_capacity(max_items),
        }
    }

    pub fn add_or_update_pdr(&mut self, pdr: Pdr) -> bool {
        self.pdrs.upsert(pdr)
    }

    pub fn add_or_update_far(&mut self, far: Far) -> bool {
        self.fars.upsert(far)
    }

    pub fn add_or_update_qer(&mut self, qer: Qer) -> bool {
        self.qers.upsert(qer)
    }

    pub fn remove_pdr(&mut self, pdr_id: u32) -> Option<Pdr> {
        self.pdrs.remove(pdr_id)
    }

    pub fn remove_far(&mut self, far_id: u32) -> Option<Far> {
        self.fars.remove(far_id)
    }

    pub fn remove_qer(&mut self, qer_id: u32) -> Option<Qer> {
        self.qers.remove(qer_id)
    }

    pub fn get_pdr(&self, pdr_id: u32) -> Option<&Pdr> {
        self.pdrs.get(pdr_id)
    }

    pub fn get_far(&self, far_id: u32) -> Option<&Far> {
        self.fars.get(far_id)
    }

    pub fn get_qer(&self, qer_id: u32) -> Option<&Qer> {
        self.qers.get(qer_id)
    }

    /// FAR referenced by the given PDR
    pub fn far_for_pdr(&self, pdr_id: u32) -> Option<&Far> {
        let pdr = self.pdrs.get(pdr_id)?;
        self.fars.get(pdr.far_id)
    }

    /// QER ids shared by every PDR of the session.
    ///
    /// Only meaningful when each PDR carries at least two QERs (one
    /// application level, one session level); empty otherwise.
    pub fn session_qer_ids(&self) -> Vec<u32> {
        let mut pdrs = self.pdrs.iter();
        let Some(first) = pdrs.next() else {
            return Vec::new();
        };
        if self.pdrs.iter().any(|p| p.qer_ids.len() < 2) {
            return Vec::new();
        }

        let mut common: Vec<u32> = first.qer_ids.clone();
        for pdr in pdrs {
            common.retain(|id| pdr.qer_ids.contains(id));
        }
        common
    }

    /// Flag session-wide QERs as [`QosLevel::Session`].
    ///
    /// Returns the number of QERs marked.
    pub fn mark_session_qers(&mut self) -> usize {
        let mut marked = 0;
        for qer_id in self.session_qer_ids() {
            if let Some(qer) = self.qers.get_mut(qer_id) {
                qer.qos_level = QosLevel::Session;
                marked += 1;
            }
        }
        marked
    }

    pub fn is_empty(&self) -> bool {
        self.pdrs.is_empty() && self.fars.is_empty() && self.qers.is_empty()
    }
}

impl fmt::Display for PacketForwardingRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PDRs={}, FARs={}, QERs={}", self.pdrs, self.fars, self.qers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upf_shared::ApplyAction;

    #[test]
    fn test_new_containers_are_presized() {
        let rules = PacketForwardingRules::new(10);
        assert!(rules.is_empty());
        assert!(rules.pdrs.capacity() >= 10);
        assert!(rules.fars.capacity() >= 10);
        assert!(rules.qers.capacity() >= 10);
    }

    #[test]
    fn test_upsert_replaces_existing_pdr() {
        let mut rules = PacketForwardingRules::new(4);
        assert!(!rules.add_or_update_pdr(Pdr::new(1, 1)));
        assert!(!rules.add_or_update_pdr(Pdr::new(2, 1)));
        assert_eq!(rules.pdrs.len(), 2);

        let mut updated = Pdr::new(1, 7);
        updated.precedence = 100;
        assert!(rules.add_or_update_pdr(updated.clone()));

        assert_eq!(rules.pdrs.len(), 2);
        assert_eq!(rules.get_pdr(1), Some(&updated));
    }

    #[test]
    fn test_growth_beyond_capacity() {
        let mut rules = PacketForwardingRules::new(2);
        for id in 0..5 {
            rules.add_or_update_far(Far::new(id, ApplyAction::Forward));
        }
        assert_eq!(rules.fars.len(), 5);
    }

    #[test]
    fn test_remove_rules() {
        let mut rules = PacketForwardingRules::new(4);
        rules.add_or_update_qer(Qer::new(1, 9));
        rules.add_or_update_qer(Qer::new(2, 5));

        assert_eq!(rules.remove_qer(1).map(|q| q.qer_id), Some(1));
        assert!(rules.remove_qer(1).is_none());
        assert!(rules.remove_pdr(42).is_none());
        assert_eq!(rules.qers.len(), 1);
    }

    #[test]
    fn test_id_namespaces_are_independent() {
        let mut rules = PacketForwardingRules::new(4);
        rules.add_or_update_pdr(Pdr::new(1, 1));
        rules.add_or_update_far(Far::new(1, ApplyAction::Drop));
        rules.add_or_update_qer(Qer::new(1, 9));

        rules.remove_far(1);
        assert!(rules.get_pdr(1).is_some());
        assert!(rules.get_qer(1).is_some());
        assert!(rules.get_far(1).is_none());
    }

    #[test]
    fn test_far_for_pdr() {
        let mut rules = PacketForwardingRules::new(4);
        rules.add_or_update_pdr(Pdr::new(1, 10));
        rules.add_or_update_far(Far::new(10, ApplyAction::BufferAndNotify));

        assert_eq!(rules.far_for_pdr(1).map(|f| f.far_id), Some(10));
        assert!(rules.far_for_pdr(2).is_none());
    }

    #[test]
    fn test_mark_session_qers() {
        let mut rules = PacketForwardingRules::new(4);
        rules.add_or_update_pdr(Pdr::new(1, 1).with_qers(vec![1, 3]));
        rules.add_or_update_pdr(Pdr::new(2, 2).with_qers(vec![2, 3]));
        for id in 1..=3 {
            rules.add_or_update_qer(Qer::new(id, 9));
        }

        assert_eq!(rules.session_qer_ids(), vec![3]);
        assert_eq!(rules.mark_session_qers(), 1);
        assert_eq!(rules.get_qer(3).unwrap().qos_level, QosLevel::Session);
        assert_eq!(rules.get_qer(1).unwrap().qos_level, QosLevel::Application);
    }

    #[test]
    fn test_no_session_qer_with_single_qer_pdr() {
        let mut rules = PacketForwardingRules::new(4);
        rules.add_or_update_pdr(Pdr::new(1, 1).with_qers(vec![1, 3]));
        rules.add_or_update_pdr(Pdr::new(2, 2).with_qers(vec![3]));

        assert!(rules.session_qer_ids().is_empty());
        assert_eq!(rules.mark_session_qers(), 0);
    }

    #[test]
    fn test_display() {
        let mut rules = PacketForwardingRules::new(4);
        rules.add_or_update_far(Far::new(1, ApplyAction::Drop));

        assert_eq!(
            rules.to_string(),
            "PDRs=[], FARs=[{id=1 action=Drop dst=Core}], QERs=[]"
        );
    }
}
