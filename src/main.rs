use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process;

use vulnpath::application::dto::{AuditRequest, OutputFormat, DEFAULT_MAX_PARALLEL};
use vulnpath::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use vulnpath::application::use_cases::AuditProjectUseCase;
use vulnpath::cli::{parse_severity, Args};
use vulnpath::config::{discover_config, load_config_from_path, ConfigFile};
use vulnpath::prelude::*;
use vulnpath::shared::error::{AuditError, ExitCode};

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    let exit_code = match run(args).await {
        Ok(threshold_exceeded) => {
            if threshold_exceeded {
                ExitCode::VulnerabilitiesDetected
            } else {
                ExitCode::Success
            }
        }
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            classify_error(&e)
        }
    };

    process::exit(exit_code.as_i32());
}

fn classify_error(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<AuditError>() {
        Some(AuditError::InvalidManifestPath { .. }) => ExitCode::InvalidArguments,
        _ => ExitCode::ApplicationError,
    }
}

/// Where release and advisory metadata comes from.
#[derive(Debug)]
enum RegistrySource {
    Http(String),
    Offline(PathBuf),
}

/// Fully resolved options after merging CLI arguments over the config file.
#[derive(Debug)]
struct Settings {
    request: AuditRequest,
    format: OutputFormat,
    output: Option<PathBuf>,
    registry: RegistrySource,
}

async fn run(args: Args) -> Result<bool> {
    validate_manifest_path(&args.manifest)?;

    let config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => {
            let manifest_dir = args.manifest.parent().unwrap_or_else(|| Path::new("."));
            discover_config(manifest_dir)?.unwrap_or_default()
        }
    };

    let settings = merge_settings(args, config)?;

    let manifest_reader = AssetsManifestReader::new();
    let progress_reporter = StderrProgressReporter::new();

    let response = match &settings.registry {
        RegistrySource::Offline(snapshot_path) => {
            let registry = OfflineRegistry::from_file(snapshot_path)?;
            let use_case = AuditProjectUseCase::new(manifest_reader, registry, progress_reporter);
            use_case.execute(settings.request.clone()).await?
        }
        RegistrySource::Http(base_url) => {
            let registry = CachingRegistryClient::new(HttpRegistryClient::new(base_url.clone())?);
            let use_case = AuditProjectUseCase::new(manifest_reader, registry, progress_reporter);
            use_case.execute(settings.request.clone()).await?
        }
    };

    let formatter = FormatterFactory::create(settings.format);
    let formatted_output = formatter.format(&response.report)?;

    let presenter_type = match settings.output {
        Some(path) => PresenterType::File(path),
        None => PresenterType::Stdout,
    };
    PresenterFactory::create(presenter_type).present(&formatted_output)?;

    Ok(response.threshold_exceeded)
}

/// Merges CLI arguments over config file values. CLI wins on every option.
fn merge_settings(args: Args, config: ConfigFile) -> Result<Settings> {
    let format = match args.format {
        Some(format) => format,
        None => match config.format.as_deref() {
            Some(value) => value
                .parse::<OutputFormat>()
                .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?,
            None => OutputFormat::Console,
        },
    };

    let severity_threshold = match args.severity_threshold {
        Some(threshold) => Some(threshold),
        None => config
            .severity_threshold
            .as_deref()
            .map(|value| {
                parse_severity(value).map_err(|e| anyhow::anyhow!("Invalid config: {}", e))
            })
            .transpose()?,
    };

    let mut ignore_advisories: HashSet<String> = args.ignore_advisories.into_iter().collect();
    if let Some(entries) = config.ignore_advisories {
        ignore_advisories.extend(entries.into_iter().map(|entry| entry.id));
    }

    let registry = if let Some(snapshot) = args.offline_registry {
        RegistrySource::Offline(snapshot)
    } else if let Some(url) = args.registry_url {
        RegistrySource::Http(url)
    } else if let Some(snapshot) = config.offline_registry {
        RegistrySource::Offline(PathBuf::from(snapshot))
    } else if let Some(url) = config.registry_url {
        RegistrySource::Http(url)
    } else {
        anyhow::bail!(
            "No registry configured.\n\n💡 Hint: Pass --registry-url or --offline-registry, \
             or set registry_url in vulnpath.config.yml."
        );
    };

    let mut request = AuditRequest::new(args.manifest);
    request.frameworks = if args.frameworks.is_empty() {
        config.frameworks.unwrap_or_default()
    } else {
        args.frameworks
    };
    request.include_prerelease =
        args.include_prerelease || config.include_prerelease.unwrap_or(false);
    request.max_parallel = args
        .max_parallel
        .or(config.max_parallel)
        .unwrap_or(DEFAULT_MAX_PARALLEL);
    request.ignore_advisories = ignore_advisories;
    request.severity_threshold = severity_threshold;

    Ok(Settings {
        request,
        format,
        output: args.output,
        registry,
    })
}

fn validate_manifest_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(AuditError::InvalidManifestPath {
            path: path.to_path_buf(),
            reason: "File does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for manifest paths
    let metadata =
        std::fs::symlink_metadata(path).map_err(|e| AuditError::InvalidManifestPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read path metadata: {}", e),
        })?;

    if metadata.is_symlink() {
        return Err(AuditError::InvalidManifestPath {
            path: path.to_path_buf(),
            reason: "Security: Manifest path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        return Err(AuditError::InvalidManifestPath {
            path: path.to_path_buf(),
            reason: "Not a regular file".to_string(),
        }
        .into());
    }

    Ok(())
}
