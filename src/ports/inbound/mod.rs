/// Inbound ports (Driving ports) - Use case interfaces
pub mod audit_port;

pub use audit_port::{ProjectAuditPort, ProjectAuditRequest, ProjectAuditResponse};
