pub mod audit_project;

pub use audit_project::AuditProjectUseCase;
