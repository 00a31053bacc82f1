use crate::client_defaults::DEFAULT_TOKEN_VALIDITY;
use crate::credentials::{CredentialMaterial, PrivateKey, SigningAlgorithm};
use crate::error::Error;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use p256::ecdsa::Signature as P256Signature;
use p384::ecdsa::Signature as P384Signature;
use p521::ecdsa::Signature as P521Signature;
use rand::RngCore;
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use sha2::{Sha256, Sha384, Sha512};
use signature::SignatureEncoding;
use signature::Signer as SignatureSigner;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::claims::{AdminClaims, AdminToken, JwsHeader};

const JTI_BYTES: usize = 32;

/// Mints short-lived x5c tokens scoped to a single request path.
#[derive(Debug, Clone)]
pub struct TokenMinter {
    credentials: CredentialMaterial,
    validity: Duration,
}

impl TokenMinter {
    pub fn new(credentials: CredentialMaterial) -> Self {
        Self {
            credentials,
            validity: DEFAULT_TOKEN_VALIDITY,
        }
    }

    /// Claims carry whole seconds, so a fractional part is dropped. Less than
    /// one second is rejected when a token is minted.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    pub fn credentials(&self) -> &CredentialMaterial {
        &self.credentials
    }

    /// Signs a fresh token whose audience is `audience` and whose validity
    /// window starts now.
    pub fn mint(&self, audience: &str) -> Result<AdminToken, Error> {
        self.mint_at(audience, unix_time_now())
    }

    /// Same as [`Self::mint`] with an explicit issue time in unix seconds.
    pub fn mint_at(&self, audience: &str, issued_at: u64) -> Result<AdminToken, Error> {
        let creds = &self.credentials;
        if creds.subject().is_empty() {
            return Err(Error::Credential(
                "token subject is empty; set one explicitly or use a leaf certificate with a common name".to_string(),
            ));
        }
        let alg = creds.algorithm();
        if !creds.key().supports(alg) {
            return Err(Error::UnsupportedAlg(format!(
                "{alg} cannot be used with a {} key",
                creds.key().kind()
            )));
        }

        let exp = self.expiry(issued_at)?;
        let claims = AdminClaims {
            jti: random_jti(),
            iss: creds.issuer().to_string(),
            sub: creds.subject().to_string(),
            aud: audience.to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp,
        };
        let header = JwsHeader {
            alg: alg.as_str(),
            kid: creds.key_id(),
            typ: "JWT",
            x5c: creds.certificate_chain(),
        };

        let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = sign(creds.key(), alg, signing_input.as_bytes())?;
        let token = format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature));
        Ok(AdminToken::new(token, claims))
    }

    /// Expiry for a token issued at `issued_at`. Also used by the client
    /// builder to reject a bad validity before any request is made.
    pub(crate) fn expiry(&self, issued_at: u64) -> Result<u64, Error> {
        let secs = self.validity.as_secs();
        if secs == 0 {
            return Err(Error::Credential(format!(
                "token validity must be at least one second, got {:?}",
                self.validity
            )));
        }
        issued_at.checked_add(secs).ok_or_else(|| {
            Error::Credential(format!(
                "token validity {:?} overflows the expiry time",
                self.validity
            ))
        })
    }
}

/// JWS signature bytes: PKCS#1 v1.5 for RSA, fixed-size `r||s` for ECDSA.
fn sign(key: &PrivateKey, alg: SigningAlgorithm, input: &[u8]) -> Result<Vec<u8>, Error> {
    let signature = match (key, alg) {
        (PrivateKey::Rsa(rsa_key), SigningAlgorithm::RS256) => {
            RsaSigningKey::<Sha256>::new(rsa_key.clone()).sign(input).to_vec()
        }
        (PrivateKey::Rsa(rsa_key), SigningAlgorithm::RS384) => {
            RsaSigningKey::<Sha384>::new(rsa_key.clone()).sign(input).to_vec()
        }
        (PrivateKey::Rsa(rsa_key), SigningAlgorithm::RS512) => {
            RsaSigningKey::<Sha512>::new(rsa_key.clone()).sign(input).to_vec()
        }
        (PrivateKey::P256(signing_key), SigningAlgorithm::ES256) => {
            let sig: P256Signature = signing_key.sign(input);
            sig.to_bytes().to_vec()
        }
        (PrivateKey::P384(signing_key), SigningAlgorithm::ES384) => {
            let sig: P384Signature = signing_key.sign(input);
            sig.to_bytes().to_vec()
        }
        (PrivateKey::P521(signing_key), SigningAlgorithm::ES512) => {
            let sig: P521Signature = signing_key.sign(input);
            sig.to_bytes().to_vec()
        }
        (key, alg) => {
            return Err(Error::UnsupportedAlg(format!(
                "{alg} cannot be used with a {} key",
                key.kind()
            )))
        }
    };
    Ok(signature)
}

fn random_jti() -> String {
    let mut buf = [0u8; JTI_BYTES];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

fn unix_time_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
