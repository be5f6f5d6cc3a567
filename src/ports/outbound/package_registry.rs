use crate::shared::Result;
use crate::vulnerability_audit::domain::{PackageId, PackageMetadata};
use async_trait::async_trait;

/// PackageRegistry port for fetching package release and advisory data
///
/// This port abstracts the external data source (registry API or a local
/// snapshot) used to retrieve known releases and security advisories for
/// packages.
///
/// # Async Support
/// All methods are async for efficient parallel metadata fetching.
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Fetches every known release of a package with its advisories
    ///
    /// # Arguments
    /// * `id` - Identifier of the package
    ///
    /// # Returns
    /// The package's metadata. Packages unknown to the registry yield
    /// empty metadata, not an error.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The network request fails
    /// - The registry returns an unexpected status code
    /// - The response cannot be parsed
    async fn fetch_package(&self, id: &PackageId) -> Result<PackageMetadata>;
}
