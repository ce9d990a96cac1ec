use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// A forwarding rule addressable by its own identifier.
///
/// PDR, FAR and QER identifiers are independent namespaces.
pub trait Rule: Clone + fmt::Debug + fmt::Display {
    /// Short name used in diagnostics ("PDR", "FAR", "QER")
    const KIND: &'static str;

    fn rule_id(&self) -> u32;
}

/// Interface a PDR matches traffic on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceInterface {
    #[default]
    Access,
    Core,
    SgiLanN6Lan,
    CpFunction,
}

/// Interface a FAR forwards traffic to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationInterface {
    Access,
    #[default]
    Core,
    SgiLanN6Lan,
    CpFunction,
}

/// What to do with packets matched by the owning PDR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyAction {
    #[default]
    Drop,
    Forward,
    Buffer,
    /// Buffer and notify the control plane (downlink data notification)
    BufferAndNotify,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QosLevel {
    #[default]
    Application,
    Session,
}

/// GTP-U outer header to add on egress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OuterHeader {
    pub teid: u32,
    pub peer: Ipv4Addr,
}

/// Packet Detection Rule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pdr {
    pub pdr_id: u32,
    pub precedence: u32,
    pub src_iface: SourceInterface,
    pub ue_address: Option<Ipv4Addr>,
    pub tunnel_teid: Option<u32>,
    pub tunnel_ip4_dst: Option<Ipv4Addr>,
    pub far_id: u32,
    pub qer_ids: Vec<u32>,
    pub need_decap: bool,
}

/// Forwarding Action Rule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Far {
    pub far_id: u32,
    pub apply_action: ApplyAction,
    pub dst_iface: DestinationInterface,
    pub outer_header: Option<OuterHeader>,
}

/// QoS Enforcement Rule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Qer {
    pub qer_id: u32,
    pub qfi: u8,
    pub ul_gate: GateStatus,
    pub dl_gate: GateStatus,
    pub ul_mbr: u64,
    pub dl_mbr: u64,
    pub ul_gbr: u64,
    pub dl_gbr: u64,
    pub qos_level: QosLevel,
}

impl Pdr {
    pub fn new(pdr_id: u32, far_id: u32) -> Self {
        Self {
            pdr_id,
            far_id,
            ..Default::default()
        }
    }

    pub fn with_qers(mut self, qer_ids: Vec<u32>) -> Self {
        self.qer_ids = qer_ids;
        self
    }
}

impl Far {
    pub fn new(far_id: u32, apply_action: ApplyAction) -> Self {
        Self {
            far_id,
            apply_action,
            ..Default::default()
        }
    }

    /// Whether the dataplane should raise a downlink data notification
    pub fn notifies_cp(&self) -> bool {
        self.apply_action == ApplyAction::BufferAndNotify
    }
}

impl Qer {
    pub fn new(qer_id: u32, qfi: u8) -> Self {
        Self {
            qer_id,
            qfi,
            ..Default::default()
        }
    }
}

impl Rule for Pdr {
    const KIND: &'static str = "PDR";

    fn rule_id(&self) -> u32 {
        self.pdr_id
    }
}

impl Rule for Far {
    const KIND: &'static str = "FAR";

    fn rule_id(&self) -> u32 {
        self.far_id
    }
}

impl Rule for Qer {
    const KIND: &'static str = "QER";

    fn rule_id(&self) -> u32 {
        self.qer_id
    }
}

impl fmt::Display for Pdr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id={} prec={} src={:?} far={} qers={:?}",
            self.pdr_id, self.precedence, self.src_iface, self.far_id, self.qer_ids
        )?;
        if let Some(ue) = self.ue_address {
            write!(f, " ue={ue}")?;
        }
        if let Some(teid) = self.tunnel_teid {
            write!(f, " teid={teid:#x}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Far {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id={} action={:?} dst={:?}",
            self.far_id, self.apply_action, self.dst_iface
        )?;
        if let Some(oh) = self.outer_header {
            write!(f, " teid={:#x} peer={}", oh.teid, oh.peer)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Qer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id={} qfi={} level={:?} mbr={}/{} gbr={}/{}}}",
            self.qer_id,
            self.qfi,
            self.qos_level,
            self.ul_mbr,
            self.dl_mbr,
            self.ul_gbr,
            self.dl_gbr
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_ids() {
        let pdr = Pdr::new(1, 2).with_qers(vec![3, 4]);
        let far = Far::new(2, ApplyAction::Forward);
        let qer = Qer::new(3, 9);

        assert_eq!(pdr.rule_id(), 1);
        assert_eq!(far.rule_id(), 2);
        assert_eq!(qer.rule_id(), 3);
        assert_eq!(Pdr::KIND, "PDR");
    }

    #[test]
    fn test_far_notifies_cp() {
        assert!(Far::new(1, ApplyAction::BufferAndNotify).notifies_cp());
        assert!(!Far::new(1, ApplyAction::Buffer).notifies_cp());
    }

    #[test]
    fn test_pdr_display() {
        let mut pdr = Pdr::new(7, 1);
        pdr.tunnel_teid = Some(0x10);
        assert_eq!(
            pdr.to_string(),
            "{id=7 prec=0 src=Access far=1 qers=[] teid=0x10}"
        );
    }

    #[test]
    fn test_rule_serialization() {
        let far = Far {
            far_id: 5,
            apply_action: ApplyAction::Forward,
            dst_iface: DestinationInterface::Access,
            outer_header: Some(OuterHeader {
                teid: 0xbeef,
                peer: Ipv4Addr::new(192, 168, 1, 10),
            }),
        };

        let json = serde_json::to_string(&far).unwrap();
        assert!(json.contains("\"apply_action\":\"forward\""));

        let deserialized: Far = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, far);
    }
}
