//! Services layer (ports + adapters).
//!
//! - `ports`: contracts and data types the kernel depends on.
//! - `adapters`: concrete implementations (in-memory backend, files, paths).

pub mod adapters;
pub mod bus;
pub mod ports;

pub use bus::{kernel_bus, KernelBusReceiver, KernelBusSender, KernelMessage};
