use serde::{Deserialize, Serialize};

/// Registered claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub jti: String,
    pub iss: String,
    pub sub: String,
    /// Path of the request the token authorizes.
    pub aud: String,
    pub iat: u64,
    pub nbf: u64,
    pub exp: u64,
}

#[derive(Debug, Serialize)]
pub(super) struct JwsHeader<'a> {
    pub(super) alg: &'static str,
    pub(super) kid: &'a str,
    pub(super) typ: &'static str,
    pub(super) x5c: &'a [String],
}

/// A signed compact JWS together with the claims it was minted from.
#[derive(Debug, Clone)]
pub struct AdminToken {
    token: String,
    claims: AdminClaims,
}

impl AdminToken {
    pub(super) fn new(token: String, claims: AdminClaims) -> Self {
        Self { token, claims }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &AdminClaims {
        &self.claims
    }
}
