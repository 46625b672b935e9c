//! Service adapters: concrete gateway, settings file and OS paths.

pub mod memory_gateway;
pub mod paths;
pub mod settings;

pub use memory_gateway::{Compiler, MemoryGateway};
pub use paths::{ensure_log_dir, get_app_data_dir, get_config_dir, get_log_dir};
pub use settings::{
    ensure_settings_file, ensure_settings_file_at, get_settings_path, load_settings,
    load_settings_from,
};
