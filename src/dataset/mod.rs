//! @ai:module:intent Task dataset definitions and loading
//! @ai:module:layer domain
//! @ai:module:public_api Task, TaskKind, TaskCategory, Language, DatasetLoader

pub mod loader;
pub mod task;

pub use loader::{DatasetLoader, DatasetLoaderTrait};
pub use task::{Language, Task, TaskCategory, TaskKind};
