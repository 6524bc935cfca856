//! Resource managers for each cloud service.
//!
//! Each module pairs [`ResourceKind`](crate::manager::ResourceKind)
//! descriptors with typed filters and request bodies.

pub mod baremetal;
pub mod block_storage;
pub mod identity;
pub mod monitoring;

pub use baremetal::ServerManager;
pub use block_storage::VolumeManager;
pub use identity::{TenantManager, UserManager};
pub use monitoring::{AlarmManager, MeterManager};
