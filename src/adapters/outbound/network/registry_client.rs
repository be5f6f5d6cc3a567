use crate::ports::outbound::PackageRegistry;
use crate::shared::error::AuditError;
use crate::shared::Result;
use crate::vulnerability_audit::domain::{
    Advisory, PackageId, PackageMetadata, PackageRelease, PackageVersion, Severity,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RegistryPackageDto {
    #[serde(default)]
    releases: Vec<RegistryReleaseDto>,
}

#[derive(Debug, Deserialize)]
struct RegistryReleaseDto {
    version: String,
    #[serde(default)]
    advisories: Vec<RegistryAdvisoryDto>,
}

#[derive(Debug, Deserialize)]
struct RegistryAdvisoryDto {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    severity: Option<String>,
}

/// HttpRegistryClient adapter for fetching package metadata over HTTP
///
/// This adapter implements the PackageRegistry port, providing async network
/// access to a registry's package metadata endpoint.
///
/// # Async Support
/// Uses async reqwest client for non-blocking HTTP requests, enabling parallel
/// metadata fetching for improved performance.
pub struct HttpRegistryClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl HttpRegistryClient {
    /// Creates a new registry client with default configuration
    pub fn new(base_url: String) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("vulnpath/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 3,
        })
    }

    /// Fetches package metadata with retry logic (async)
    async fn fetch_with_retry(&self, id: &PackageId) -> Result<PackageMetadata> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.fetch_from_registry(id).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        // Retry after a short wait (async)
                        tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap())
    }

    /// Validates a package id for URL safety
    fn validate_url_component(component: &str) -> Result<()> {
        // Security: Prevent URL injection attacks
        if component.contains('/') || component.contains('\\') || component.contains("..") {
            anyhow::bail!("Security: Package id contains path traversal characters");
        }
        if component.contains('#') || component.contains('?') || component.contains('@') {
            anyhow::bail!("Security: Package id contains URL-unsafe characters");
        }
        Ok(())
    }

    /// Fetches package metadata from the registry API (async)
    async fn fetch_from_registry(&self, id: &PackageId) -> Result<PackageMetadata> {
        Self::validate_url_component(id.as_str())?;

        let encoded_id = urlencoding::encode(id.as_str());
        let url = format!("{}/v1/packages/{}", self.base_url, encoded_id);

        let response = self.client.get(&url).send().await?;

        // a registry that has never seen the package is a valid answer
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(PackageMetadata::empty(id.clone()));
        }

        if !response.status().is_success() {
            anyhow::bail!("Registry returned status code {}", response.status());
        }

        let dto: RegistryPackageDto = response.json().await?;
        Self::convert(id, dto)
    }

    fn convert(id: &PackageId, dto: RegistryPackageDto) -> Result<PackageMetadata> {
        let releases = dto
            .releases
            .into_iter()
            .map(|release| {
                Ok(PackageRelease {
                    version: PackageVersion::parse(&release.version)?,
                    advisories: release
                        .advisories
                        .into_iter()
                        .map(|advisory| Advisory {
                            id: advisory.id,
                            url: advisory.url.unwrap_or_default(),
                            severity: advisory
                                .severity
                                .as_deref()
                                .map(Severity::parse)
                                .unwrap_or(Severity::None),
                        })
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PackageMetadata {
            id: id.clone(),
            releases,
        })
    }
}

#[async_trait]
impl PackageRegistry for HttpRegistryClient {
    async fn fetch_package(&self, id: &PackageId) -> Result<PackageMetadata> {
        self.fetch_with_retry(id).await.map_err(|e| {
            AuditError::RegistryError {
                package_id: id.to_string(),
                details: e.to_string(),
            }
            .into()
        })
    }
}
