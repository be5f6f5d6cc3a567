use crate::ports::outbound::PackageRegistry;
use crate::shared::Result;
use crate::vulnerability_audit::domain::{PackageId, PackageMetadata};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// CachingRegistryClient wraps a PackageRegistry and adds in-memory caching.
///
/// This adapter implements the decorator pattern to add caching capability
/// to any PackageRegistry implementation. The cache is thread-safe and
/// suitable for concurrent access.
///
/// # Architecture
/// In hexagonal architecture, caching is an implementation detail of the
/// adapter layer. The domain layer only cares about fetching metadata -
/// whether it comes from cache or network is transparent to the domain.
pub struct CachingRegistryClient<R: PackageRegistry> {
    inner: R,
    cache: Arc<DashMap<PackageId, PackageMetadata>>,
}

impl<R: PackageRegistry> CachingRegistryClient<R> {
    /// Creates a new caching client wrapping the given inner registry
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: PackageRegistry> PackageRegistry for CachingRegistryClient<R> {
    async fn fetch_package(&self, id: &PackageId) -> Result<PackageMetadata> {
        if let Some(cached) = self.cache.get(id) {
            return Ok(cached.clone());
        }

        let metadata = self.inner.fetch_package(id).await?;
        self.cache.insert(id.clone(), metadata.clone());

        Ok(metadata)
    }
}
