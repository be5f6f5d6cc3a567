use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no vulnerabilities detected, or all below threshold
    Success = 0,
    /// Vulnerabilities were detected at or above the configured threshold
    VulnerabilitiesDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (registry error, network error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::VulnerabilitiesDetected => write!(f, "Vulnerabilities Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for the dependency audit.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Manifest file not found: {path}\n\n💡 Hint: {suggestion}")]
    ManifestNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse manifest file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the manifest is a valid resolved-dependency JSON document")]
    ManifestParseError { path: PathBuf, details: String },

    #[error("Registry request failed for package '{package_id}'\nDetails: {details}\n\n💡 Hint: Check your network connection and the registry URL")]
    RegistryError { package_id: String, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Invalid manifest path: {path}\nReason: {reason}\n\n💡 Hint: Please point vulnpath at a resolved-dependency manifest file")]
    InvalidManifestPath { path: PathBuf, reason: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::VulnerabilitiesDetected.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::VulnerabilitiesDetected),
            "Vulnerabilities Detected (1)"
        );
    }

    #[test]
    fn test_manifest_not_found_display() {
        let error = AuditError::ManifestNotFound {
            path: PathBuf::from("/test/project.assets.json"),
            suggestion: "Run a restore first".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Manifest file not found"));
        assert!(display.contains("/test/project.assets.json"));
        assert!(display.contains("💡 Hint:"));
        assert!(display.contains("Run a restore first"));
    }

    #[test]
    fn test_registry_error_display() {
        let error = AuditError::RegistryError {
            package_id: "Newtonsoft.Json".to_string(),
            details: "connection refused".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Registry request failed"));
        assert!(display.contains("Newtonsoft.Json"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_security_error_display() {
        let error = AuditError::SecurityError {
            path: PathBuf::from("/test/symlink"),
            reason: "Symbolic links are not allowed".to_string(),
            hint: "Use a regular file instead".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Security violation"));
        assert!(display.contains("Symbolic links are not allowed"));
    }
}
