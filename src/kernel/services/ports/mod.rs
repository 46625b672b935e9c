//! Service ports: traits + data contracts.

pub mod config;
pub mod gateway;
pub mod settings;

pub use config::WorkspaceConfig;
pub use gateway::{GatewayError, GatewayFuture, GatewayOp, GatewayResult, WorkspaceGateway};
pub use settings::{Settings, WorkspaceSettings};
