//! Application layer: the async workspace orchestrator and its timers.

pub mod autosave;
pub mod workspace;

pub use autosave::LayoutAutosave;
pub use workspace::{Workspace, WorkspaceError};
