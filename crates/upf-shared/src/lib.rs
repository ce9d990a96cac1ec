use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

pub mod rule;

pub use rule::{
    ApplyAction, DestinationInterface, Far, GateStatus, OuterHeader, Pdr, Qer, QosLevel, Rule,
    SourceInterface,
};

// Session identifiers
pub const INVALID_SEID: u64 = 0;

// Default pre-allocation per rule container
pub const MAX_ITEMS: usize = 10;

// PFCP Cause values (TS 29.244 8.2.1)
pub const CAUSE_REQUEST_ACCEPTED: u8 = 1;
pub const CAUSE_REQUEST_REJECTED: u8 = 64;
pub const CAUSE_SESSION_CONTEXT_NOT_FOUND: u8 = 65;
pub const CAUSE_MANDATORY_IE_MISSING: u8 = 66;
pub const CAUSE_RULE_CREATION_MODIFICATION_FAILURE: u8 = 73;
pub const CAUSE_NO_RESOURCES_AVAILABLE: u8 = 75;

/// PFCP Node ID as carried in the association setup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeId {
    Ip(IpAddr),
    Fqdn(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(addr) => write!(f, "{addr}"),
            Self::Fqdn(name) => write!(f, "{name}"),
        }
    }
}

/// Local and remote identity of one PFCP association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIds {
    pub local: NodeId,
    pub remote: NodeId,
}

impl NodeIds {
    pub fn new(local: NodeId, remote: NodeId) -> Self {
        Self { local, remote }
    }
}
