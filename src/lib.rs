//! storytell - workspace engine of a narrative editor.
//!
//! Module layout:
//! - models: blob tree, compiled AST shapes, panels, layout, projects
//! - kernel: headless state/action/effect core, panel and playback state
//!   machines, service ports and adapters
//! - app: async orchestration against the gateway, layout autosave
//! - logging: tracing subscriber setup

pub mod app;
pub mod kernel;
pub mod logging;
pub mod models;

pub use app::{Workspace, WorkspaceError};
pub use kernel::services::ports::{WorkspaceConfig, WorkspaceGateway};
