pub mod config;
pub mod error;
pub mod infrastructure;
pub mod services;
pub mod utils;

pub use config::{MirrorConfig, SOURCE_NAMESPACE};
pub use error::MirrorError;
pub use services::mirror::{MirrorService, RunReport};
pub use services::storage::{ObjectDescriptor, ObjectStore};
pub use services::transform::{ArchiveKind, ExpandedArtifact};
pub use utils::scratch::ScratchArena;
