/// Mock implementations for testing
mod mock_manifest_reader;
mod mock_progress_reporter;
mod mock_registry;

pub use mock_manifest_reader::{
    library, single_framework_manifest, top_level, MockManifestReader,
};
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_registry::MockRegistry;
