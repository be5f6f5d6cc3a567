pub mod file_writer;
pub mod manifest_reader;
pub mod offline_registry;

pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use manifest_reader::AssetsManifestReader;
pub use offline_registry::OfflineRegistry;
