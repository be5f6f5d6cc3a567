pub mod caching_registry_client;
pub mod registry_client;

pub use caching_registry_client::CachingRegistryClient;
pub use registry_client::HttpRegistryClient;
