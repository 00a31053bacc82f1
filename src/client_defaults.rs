use std::time::Duration;

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Path prefix shared by every administrative endpoint.
pub(crate) const ADMIN_URL_PREFIX: &str = "admin";

/// Page size used when aggregating list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Validity window of a freshly minted admin token.
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::from_secs(5 * 60);

pub(crate) const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;
