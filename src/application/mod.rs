/// Application layer - Use cases and orchestration
///
/// This layer coordinates the domain services and outbound ports to
/// implement the audit workflow. It depends on ports, never on adapters.
pub mod dto;
pub mod factories;
pub mod use_cases;
