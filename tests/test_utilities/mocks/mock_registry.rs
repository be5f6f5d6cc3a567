use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vulnpath::prelude::*;
use vulnpath::vulnerability_audit::domain::{
    Advisory, PackageMetadata, PackageRelease, Severity as DomainSeverity,
};

/// Mock PackageRegistry serving canned metadata, counting fetches
pub struct MockRegistry {
    packages: HashMap<PackageId, PackageMetadata>,
    fetch_count: Arc<AtomicUsize>,
    should_fail: bool,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            packages: HashMap::new(),
            fetch_count: Arc::new(AtomicUsize::new(0)),
            should_fail: false,
        }
    }

    pub fn with_failure() -> Self {
        Self {
            packages: HashMap::new(),
            fetch_count: Arc::new(AtomicUsize::new(0)),
            should_fail: true,
        }
    }

    /// Registers a package with releases given as (version, advisory ids).
    pub fn with_package(mut self, id: &str, releases: &[(&str, &[(&str, DomainSeverity)])]) -> Self {
        let id = PackageId::new(id).unwrap();
        let releases = releases
            .iter()
            .map(|(version, advisories)| PackageRelease {
                version: PackageVersion::parse(version).unwrap(),
                advisories: advisories
                    .iter()
                    .map(|(advisory_id, severity)| Advisory {
                        id: advisory_id.to_string(),
                        url: format!("https://github.com/advisories/{}", advisory_id),
                        severity: *severity,
                    })
                    .collect(),
            })
            .collect();
        self.packages.insert(
            id.clone(),
            PackageMetadata { id, releases },
        );
        self
    }

    /// Handle that keeps counting after the registry moves into a use case.
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetch_count)
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageRegistry for MockRegistry {
    async fn fetch_package(&self, id: &PackageId) -> Result<PackageMetadata> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            anyhow::bail!("Mock registry failure");
        }
        Ok(self
            .packages
            .get(id)
            .cloned()
            .unwrap_or_else(|| PackageMetadata::empty(id.clone())))
    }
}
