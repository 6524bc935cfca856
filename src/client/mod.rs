//! SDK layer: authentication, service catalog and the HTTP client shared by
//! every resource manager.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod http;

pub use auth::{Credentials, Session, TenantScope};
pub use catalog::{CatalogEntry, EndpointFilter, Interface, ServiceCatalog};
pub use error::{ApiError, ApiErrorKind, ClientError};
pub use http::{ApiRequest, AuthState, ClientConfig, HttpClient, RequestTiming};
