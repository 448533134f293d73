//! Remote API clients for the UniFi Protect and UniFi Network subsystems.

pub mod api;
pub mod mock;
pub mod models;
pub mod network;
pub mod protect;
pub mod transport;

pub use api::{ApiClient, Envelope};
pub use mock::MockBackend;
pub use network::{NetworkClient, SiteCollection};
pub use protect::{ProtectClient, ProtectResource};
pub use transport::{ApiRequest, ApiResponse, AuthScheme, HttpBackend, ReqwestBackend};
