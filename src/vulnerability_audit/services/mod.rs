/// Audit services containing the pure, I/O-free core algorithms
mod action_deduper;
mod aggregator;
mod graph_builder;
mod remediation;

pub use action_deduper::ActionDeduper;
pub use aggregator::VulnerabilityAggregator;
pub use graph_builder::GraphBuilder;
pub use remediation::RemediationRecommender;
