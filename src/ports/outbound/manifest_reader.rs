use crate::shared::Result;
use crate::vulnerability_audit::domain::ProjectManifest;
use std::path::Path;

/// ManifestReader port for reading resolved dependency manifests
///
/// This port abstracts the file system operations needed to read and parse
/// a project's resolved dependency manifest (project.assets.json).
pub trait ManifestReader {
    /// Reads and parses the manifest at the specified path
    ///
    /// # Arguments
    /// * `manifest_path` - Path to the manifest file
    ///
    /// # Returns
    /// The parsed project manifest with all frameworks resolved
    ///
    /// # Errors
    /// Returns an error if:
    /// - The manifest file does not exist
    /// - The file cannot be read due to permissions or I/O errors
    /// - The content is not valid manifest JSON
    fn read_manifest(&self, manifest_path: &Path) -> Result<ProjectManifest>;
}
