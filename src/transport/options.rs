use crate::client_defaults::DEFAULT_TIMEOUT;
use crate::error::Error;
use reqwest::blocking::Client as HttpClient;
use reqwest::{Certificate, Identity, Proxy};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where a piece of PEM material comes from. File sources are read again on
/// every build, so a rotated file on disk is picked up by the next rebuild.
#[derive(Debug, Clone)]
pub enum PemSource {
    Bytes(Vec<u8>),
    File(PathBuf),
}

impl PemSource {
    fn load(&self) -> Result<Vec<u8>, Error> {
        match self {
            PemSource::Bytes(bytes) => Ok(bytes.clone()),
            PemSource::File(path) => Ok(fs::read(path)?),
        }
    }
}

#[derive(Debug, Clone)]
enum IdentitySource {
    Combined(PemSource),
    Parts { cert: PemSource, key: PemSource },
}

/// Everything needed to (re)build the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    timeout: Option<Duration>,
    identity: Option<IdentitySource>,
    root_certs: Vec<PemSource>,
    proxy: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            identity: None,
            root_certs: Vec::new(),
            proxy: None,
        }
    }
}

impl TransportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Client certificate and key concatenated in one PEM document.
    pub fn mtls_identity_from_pem(mut self, identity_pem: &[u8]) -> Self {
        self.identity = Some(IdentitySource::Combined(PemSource::Bytes(
            identity_pem.to_vec(),
        )));
        self
    }

    pub fn mtls_identity_from_parts(mut self, cert_pem: &[u8], key_pem: &[u8]) -> Self {
        self.identity = Some(IdentitySource::Parts {
            cert: PemSource::Bytes(cert_pem.to_vec()),
            key: PemSource::Bytes(key_pem.to_vec()),
        });
        self
    }

    pub fn mtls_identity_from_files(
        mut self,
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
    ) -> Self {
        self.identity = Some(IdentitySource::Parts {
            cert: PemSource::File(cert_path.as_ref().to_path_buf()),
            key: PemSource::File(key_path.as_ref().to_path_buf()),
        });
        self
    }

    pub fn add_ca_cert_pem(mut self, ca_pem: &[u8]) -> Self {
        self.root_certs.push(PemSource::Bytes(ca_pem.to_vec()));
        self
    }

    pub fn add_ca_cert_file(mut self, path: impl AsRef<Path>) -> Self {
        self.root_certs
            .push(PemSource::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy = Some(proxy_url.into());
        self
    }

    /// Builds a fresh HTTP client. Redirects are never followed since every
    /// request carries a bearer token.
    pub fn build_http(&self) -> Result<HttpClient, Error> {
        let mut builder = HttpClient::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(identity) = &self.identity {
            builder = builder.identity(load_identity(identity)?);
        }
        for source in &self.root_certs {
            for cert in Certificate::from_pem_bundle(&source.load()?)? {
                builder = builder.add_root_certificate(cert);
            }
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(Proxy::all(proxy.as_str())?);
        }
        Ok(builder.build()?)
    }
}

fn load_identity(source: &IdentitySource) -> Result<Identity, Error> {
    let pem = match source {
        IdentitySource::Combined(pem) => pem.load()?,
        IdentitySource::Parts { cert, key } => {
            let mut combined = cert.load()?;
            if !combined.ends_with(b"\n") {
                combined.push(b'\n');
            }
            combined.extend_from_slice(&key.load()?);
            combined
        }
    };
    Ok(Identity::from_pem(&pem)?)
}
