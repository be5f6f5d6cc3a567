/// Crate-wide Result alias over anyhow::Error, so the domain services,
/// adapters and application layer share one propagation convention.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
