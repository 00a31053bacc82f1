use crate::client_defaults::{DEFAULT_PAGE_SIZE, DEFAULT_TOKEN_VALIDITY};
use crate::credentials::CredentialMaterial;
use crate::error::Error;
use crate::retry::{RetryController, RetryPredicate};
use crate::token::TokenMinter;
use crate::transport::{TransportManager, TransportOptions};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

mod admins;
mod common;
mod executor;
mod options;
mod pagination;
mod provisioners;

pub use options::{ListOptions, ProvisionerSelector};

pub struct AdminClientBuilder {
    endpoint: Url,
    credentials: Option<CredentialMaterial>,
    transport: TransportOptions,
    retry: Option<RetryPredicate>,
    page_size: u32,
    token_validity: Duration,
}

impl AdminClientBuilder {
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self, Error> {
        Ok(Self {
            endpoint: Url::parse(endpoint.as_ref())?,
            credentials: None,
            transport: TransportOptions::default(),
            retry: None,
            page_size: DEFAULT_PAGE_SIZE,
            token_validity: DEFAULT_TOKEN_VALIDITY,
        })
    }

    /// Key and certificate chain used to sign every request.
    pub fn credentials(mut self, credentials: CredentialMaterial) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replaces the transport configuration. It is kept so the transport can
    /// be rebuilt when a retry asks for it.
    pub fn transport(mut self, options: TransportOptions) -> Self {
        self.transport = options;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.timeout(timeout);
        self
    }

    /// Statuses for which a failed call rebuilds the transport and is replayed
    /// once.
    pub fn retry_on<F>(mut self, predicate: F) -> Self
    where
        F: Fn(u16) -> bool + Send + Sync + 'static,
    {
        self.retry = Some(Arc::new(predicate));
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Lifetime of each minted token. Must be at least one second; `build`
    /// fails otherwise.
    pub fn token_validity(mut self, validity: Duration) -> Self {
        self.token_validity = validity;
        self
    }

    pub fn build(self) -> Result<AdminClient, Error> {
        let credentials = self.credentials.ok_or_else(|| {
            Error::Credential("admin client requires credential material".to_string())
        })?;
        if self.endpoint.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(self.endpoint.to_string()));
        }
        let minter = TokenMinter::new(credentials).with_validity(self.token_validity);
        minter.expiry(0)?;
        let transport = TransportManager::new(self.transport)?;
        Ok(AdminClient {
            endpoint: self.endpoint,
            minter,
            transport,
            retry: RetryController::new(self.retry),
            page_size: self.page_size,
        })
    }
}

/// Client for the CA admin API. Every request is authenticated with a fresh
/// token scoped to its path.
pub struct AdminClient {
    endpoint: Url,
    minter: TokenMinter,
    transport: TransportManager,
    retry: RetryController,
    page_size: u32,
}

impl AdminClient {
    pub fn builder(endpoint: impl AsRef<str>) -> Result<AdminClientBuilder, Error> {
        AdminClientBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of times the transport has been rebuilt.
    pub fn transport_generation(&self) -> u64 {
        self.transport.generation()
    }

    pub fn credentials(&self) -> &CredentialMaterial {
        self.minter.credentials()
    }
}
