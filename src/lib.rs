#![forbid(unsafe_code)]

pub mod acme;
mod client;
mod client_defaults;
mod credentials;
mod error;
mod models;
mod retry;
mod token;
mod transport;

pub use client::{AdminClient, AdminClientBuilder, ListOptions, ProvisionerSelector};
pub use client_defaults::{DEFAULT_PAGE_SIZE, DEFAULT_TOKEN_VALIDITY};
pub use credentials::{CredentialMaterial, SigningAlgorithm};
pub use error::{Error, ErrorKind, ResourceError};
pub use models::{
    Admin, AdminType, AdminsPage, CreateAdminRequest, Provisioner, ProvisionerType,
    ProvisionersPage, Timestamp, UpdateAdminRequest,
};
pub use retry::{RetryController, RetryPredicate, RetryState};
pub use token::{AdminClaims, AdminToken, TokenMinter};
pub use transport::{PemSource, TransportManager, TransportOptions};
