/// Vulnerability audit core - domain models and services
///
/// This is the heart of the application: path-preserving dependency graph
/// construction, vulnerability attribution, remediation recommendation and
/// action deduplication. Everything in here is pure and I/O-free.
pub mod domain;
pub mod services;
