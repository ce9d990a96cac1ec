//! PFCP session table for the UPF control-plane agent.
//!
//! A [`PfcpConn`] owns the sessions of one association. Sessions are shared
//! as `Arc<PfcpSession>`; removing one from the table only detaches it, so
//! callers holding a reference keep a valid entity.

pub mod conn;
pub mod fseid;
pub mod notifier;
pub mod rules;
pub mod session;
pub mod store;

pub use conn::PfcpConn;
pub use fseid::{build_generator, FseidGenerator, RandomFseidGenerator, SequentialFseidGenerator};
pub use notifier::{NotificationActor, NotifierMessage, SessionReport};
pub use rules::{PacketForwardingRules, RuleList};
pub use session::{NotifyFlag, PfcpSession};
pub use store::SessionStore;
