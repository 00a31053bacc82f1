//! Swappable HTTP transport.
//!
//! The active client lives in an [`ArcSwap`]: requests load the handle once at
//! dispatch and keep it for their whole exchange, while [`TransportManager::rotate`]
//! stores a freshly built one for subsequent requests.

mod options;

pub use options::{PemSource, TransportOptions};

use crate::error::Error;
use arc_swap::ArcSwap;
use reqwest::blocking::Client as HttpClient;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct TransportManager {
    options: TransportOptions,
    current: ArcSwap<HttpClient>,
    generation: AtomicU64,
}

impl TransportManager {
    pub fn new(options: TransportOptions) -> Result<Self, Error> {
        let http = options.build_http()?;
        Ok(Self {
            options,
            current: ArcSwap::from_pointee(http),
            generation: AtomicU64::new(0),
        })
    }

    /// Handle to use for one request exchange.
    pub fn current(&self) -> Arc<HttpClient> {
        self.current.load_full()
    }

    /// Rebuilds the transport from the stored options and swaps it in.
    /// On failure the previous handle stays active.
    pub fn rotate(&self) -> Result<u64, Error> {
        let http = self.options.build_http()?;
        self.current.store(Arc::new(http));
        Ok(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Number of successful rotations so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
