use crate::application::dto::{AuditRequest, AuditResponse};
use crate::ports::inbound::{ProjectAuditPort, ProjectAuditRequest, ProjectAuditResponse};
use crate::ports::outbound::{ManifestReader, PackageRegistry, ProgressReporter};
use crate::shared::Result;
use crate::vulnerability_audit::domain::{
    AdvisoryIndex, AuditReport, DependencyGraph, FrameworkAudit, PackageId, PackageMetadata,
    PackageVersion, ProjectManifest, ReportProblem, TopLevelAttribution, VulnerablePackage,
};
use crate::vulnerability_audit::services::{
    ActionDeduper, GraphBuilder, RemediationRecommender, VulnerabilityAggregator,
};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// AuditProjectUseCase - Core use case for the vulnerability audit
///
/// This use case orchestrates the audit workflow using generic dependency
/// injection for all infrastructure dependencies.
///
/// # Type Parameters
/// * `MR` - ManifestReader implementation
/// * `REG` - PackageRegistry implementation
/// * `PR` - ProgressReporter implementation
pub struct AuditProjectUseCase<MR, REG, PR> {
    manifest_reader: MR,
    registry: REG,
    progress_reporter: PR,
}

impl<MR, REG, PR> AuditProjectUseCase<MR, REG, PR>
where
    MR: ManifestReader,
    REG: PackageRegistry,
    PR: ProgressReporter,
{
    /// Creates a new AuditProjectUseCase with injected dependencies
    pub fn new(manifest_reader: MR, registry: REG, progress_reporter: PR) -> Self {
        Self {
            manifest_reader,
            registry,
            progress_reporter,
        }
    }

    /// Executes the audit use case
    ///
    /// # Arguments
    /// * `request` - Audit request containing the manifest path and options
    ///
    /// # Returns
    /// AuditResponse carrying the report and the threshold verdict
    pub async fn execute(&self, request: AuditRequest) -> Result<AuditResponse> {
        let mut problems: Vec<ReportProblem> = Vec::new();

        // Step 1: Read the manifest and narrow to the requested frameworks
        let manifest = self.read_manifest(&request, &mut problems)?;

        // Step 2: Fetch registry metadata for every resolved package
        let metadata = self.fetch_metadata(&manifest, request.max_parallel).await?;

        // Step 3: Index advisories and find vulnerable packages
        let index = AdvisoryIndex::from_metadata(
            metadata,
            &request.ignore_advisories,
            request.include_prerelease,
        );
        let vulnerable_packages = Self::find_vulnerable_packages(&manifest, &index);

        if vulnerable_packages.is_empty() {
            self.progress_reporter
                .report_completion("✅ No known vulnerabilities found");
            let report = Self::build_report(
                &manifest,
                request.manifest_path.clone(),
                problems,
                vec![],
                vec![],
            );
            return Ok(AuditResponse::new(report, false));
        }

        self.progress_reporter.report(&format!(
            "🔐 {} vulnerable package(s) found, tracing dependency paths...",
            vulnerable_packages.len()
        ));

        // Step 4: Build per-target graphs and attribute vulnerabilities
        let frameworks = Self::build_framework_audits(
            &manifest,
            &vulnerable_packages,
            &index,
            &mut problems,
        );

        let report = Self::build_report(
            &manifest,
            request.manifest_path.clone(),
            problems,
            vulnerable_packages,
            frameworks,
        );

        let threshold_exceeded = match request.severity_threshold {
            Some(threshold) => report
                .max_severity()
                .map(|max| max >= threshold)
                .unwrap_or(false),
            None => report.has_findings(),
        };

        Ok(AuditResponse::new(report, threshold_exceeded))
    }

    /// Reads the manifest and applies the framework filter, collecting a
    /// warning for every requested framework the manifest does not resolve.
    fn read_manifest(
        &self,
        request: &AuditRequest,
        problems: &mut Vec<ReportProblem>,
    ) -> Result<ProjectManifest> {
        self.progress_reporter.report(&format!(
            "📖 Loading manifest from: {}",
            request.manifest_path.display()
        ));

        let mut manifest = self.manifest_reader.read_manifest(&request.manifest_path)?;

        if !request.frameworks.is_empty() {
            for requested in &request.frameworks {
                if !manifest
                    .frameworks
                    .iter()
                    .any(|f| f.framework.eq_ignore_ascii_case(requested))
                {
                    problems.push(ReportProblem::warning(format!(
                        "Framework \"{}\" is not resolved in the manifest",
                        requested
                    )));
                }
            }
            manifest.frameworks.retain(|f| {
                request
                    .frameworks
                    .iter()
                    .any(|requested| requested.eq_ignore_ascii_case(&f.framework))
            });

            if manifest.frameworks.is_empty() {
                anyhow::bail!(
                    "None of the requested frameworks are resolved in the manifest. \
                     Check the --framework values against the project's target frameworks."
                );
            }
        }

        let package_count: usize = manifest.frameworks.iter().map(|f| f.libraries.len()).sum();
        self.progress_reporter.report(&format!(
            "✅ Detected {} framework(s), {} resolved package(s)",
            manifest.frameworks.len(),
            package_count
        ));

        Ok(manifest)
    }

    /// Fetches registry metadata for every distinct package id with a bounded
    /// number of parallel requests.
    ///
    /// Completions are consumed sequentially; the first failure drops the
    /// stream, which cancels the requests still in flight.
    async fn fetch_metadata(
        &self,
        manifest: &ProjectManifest,
        max_parallel: usize,
    ) -> Result<Vec<PackageMetadata>> {
        let ids: BTreeSet<PackageId> = manifest
            .frameworks
            .iter()
            .flat_map(|f| f.libraries.iter().map(|l| l.id.clone()))
            .collect();
        let total = ids.len();

        self.progress_reporter
            .report("🔍 Fetching registry metadata...");

        let registry = &self.registry;
        let mut results = stream::iter(ids)
            .map(|id| async move { registry.fetch_package(&id).await })
            .buffer_unordered(max_parallel.max(1));

        let mut metadata = Vec::with_capacity(total);
        while let Some(result) = results.next().await {
            metadata.push(result?);
            self.progress_reporter.report_progress(
                metadata.len(),
                total,
                Some("Fetching registry metadata..."),
            );
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Registry metadata fetched for {} package(s)",
            total
        ));

        Ok(metadata)
    }

    /// Scans every framework's resolved libraries against the advisory index.
    /// One package resolved at the same version under several frameworks is
    /// listed once with all of them.
    fn find_vulnerable_packages(
        manifest: &ProjectManifest,
        index: &AdvisoryIndex,
    ) -> Vec<VulnerablePackage> {
        let mut found: BTreeMap<(PackageId, PackageVersion), VulnerablePackage> = BTreeMap::new();

        for framework in &manifest.frameworks {
            for library in &framework.libraries {
                let advisories = index.advisories_for(&library.id, &library.version);
                if advisories.is_empty() {
                    continue;
                }
                found
                    .entry((library.id.clone(), library.version.clone()))
                    .or_insert_with(|| VulnerablePackage {
                        id: library.id.clone(),
                        version: library.version.clone(),
                        advisories: advisories.to_vec(),
                        frameworks: Vec::new(),
                    })
                    .frameworks
                    .push(framework.framework.clone());
            }
        }

        found.into_values().collect()
    }

    /// Builds one graph per (framework, vulnerable target), merges them per
    /// framework into an attribution forest and annotates update candidates.
    fn build_framework_audits(
        manifest: &ProjectManifest,
        vulnerable_packages: &[VulnerablePackage],
        index: &AdvisoryIndex,
        problems: &mut Vec<ReportProblem>,
    ) -> Vec<FrameworkAudit> {
        let targets: BTreeSet<&PackageId> =
            vulnerable_packages.iter().map(|p| &p.id).collect();

        let mut graphs_by_framework: BTreeMap<String, Vec<DependencyGraph>> = BTreeMap::new();
        for target in targets {
            for (framework, graph) in GraphBuilder::build_graphs(manifest, target) {
                match graph {
                    Some(graph) => {
                        graphs_by_framework.entry(framework).or_default().push(graph);
                    }
                    None => {
                        problems.push(ReportProblem::warning(format!(
                            "Package \"{}\" is resolved in {} but not reachable from any top-level reference",
                            target, framework
                        )));
                    }
                }
            }
        }

        // manifest order, not map order, for the final report
        let mut audits = Vec::new();
        for framework in &manifest.frameworks {
            let Some(graphs) = graphs_by_framework.get(&framework.framework) else {
                continue;
            };
            let graph_refs: Vec<&DependencyGraph> = graphs.iter().collect();
            let mut forest: Vec<TopLevelAttribution> =
                VulnerabilityAggregator::attribute(&framework.framework, &graph_refs, index);
            RemediationRecommender::annotate_forest(&mut forest, index);
            audits.push(FrameworkAudit {
                framework: framework.framework.clone(),
                top_level: forest,
            });
        }

        audits
    }

    fn build_report(
        manifest: &ProjectManifest,
        manifest_path: PathBuf,
        problems: Vec<ReportProblem>,
        vulnerable_packages: Vec<VulnerablePackage>,
        frameworks: Vec<FrameworkAudit>,
    ) -> AuditReport {
        let forests: Vec<&[TopLevelAttribution]> = frameworks
            .iter()
            .map(|audit| audit.top_level.as_slice())
            .collect();
        let actions = ActionDeduper::collapse(&forests);

        AuditReport {
            project_name: manifest.project_name.clone(),
            manifest_path,
            problems,
            vulnerable_packages,
            frameworks,
            actions,
        }
    }
}

#[async_trait(?Send)]
impl<MR, REG, PR> ProjectAuditPort for AuditProjectUseCase<MR, REG, PR>
where
    MR: ManifestReader,
    REG: PackageRegistry,
    PR: ProgressReporter,
{
    async fn audit_project(&self, request: ProjectAuditRequest) -> Result<ProjectAuditResponse> {
        let mut audit_request = AuditRequest::new(request.manifest_path);
        audit_request.frameworks = request.frameworks;

        let response = self.execute(audit_request).await?;
        Ok(ProjectAuditResponse::new(response.report))
    }
}
