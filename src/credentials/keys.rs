use crate::error::Error;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use p256::ecdsa::{SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey};
use p384::ecdsa::{SigningKey as P384SigningKey, VerifyingKey as P384VerifyingKey};
use p521::ecdsa::{SigningKey as P521SigningKey, VerifyingKey as P521VerifyingKey};
use pem::parse_many;
use pkcs8::{DecodePrivateKey, EncodePublicKey};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use super::SigningAlgorithm;

#[derive(Clone)]
pub(crate) enum PrivateKey {
    Rsa(RsaPrivateKey),
    P256(P256SigningKey),
    P384(P384SigningKey),
    P521(P521SigningKey),
}

impl PrivateKey {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            PrivateKey::Rsa(_) => "RSA",
            PrivateKey::P256(_) => "P-256",
            PrivateKey::P384(_) => "P-384",
            PrivateKey::P521(_) => "P-521",
        }
    }

    pub(crate) fn default_algorithm(&self) -> SigningAlgorithm {
        match self {
            PrivateKey::Rsa(_) => SigningAlgorithm::RS256,
            PrivateKey::P256(_) => SigningAlgorithm::ES256,
            PrivateKey::P384(_) => SigningAlgorithm::ES384,
            PrivateKey::P521(_) => SigningAlgorithm::ES512,
        }
    }

    /// RSA keys sign with any RS* digest; EC keys only with their own curve.
    pub(crate) fn supports(&self, alg: SigningAlgorithm) -> bool {
        match self {
            PrivateKey::Rsa(_) => matches!(
                alg,
                SigningAlgorithm::RS256 | SigningAlgorithm::RS384 | SigningAlgorithm::RS512
            ),
            PrivateKey::P256(_) => alg == SigningAlgorithm::ES256,
            PrivateKey::P384(_) => alg == SigningAlgorithm::ES384,
            PrivateKey::P521(_) => alg == SigningAlgorithm::ES512,
        }
    }

    /// DER-encoded SubjectPublicKeyInfo of the matching public key.
    pub(crate) fn public_key_der(&self) -> Result<Vec<u8>, Error> {
        let doc = match self {
            PrivateKey::Rsa(key) => RsaPublicKey::from(key).to_public_key_der(),
            PrivateKey::P256(key) => {
                let point = P256VerifyingKey::from(key).to_encoded_point(false);
                p256::PublicKey::from_sec1_bytes(point.as_bytes())
                    .map_err(|e| Error::Credential(format!("p256 public key error: {e}")))?
                    .to_public_key_der()
            }
            PrivateKey::P384(key) => {
                let point = P384VerifyingKey::from(key).to_encoded_point(false);
                p384::PublicKey::from_sec1_bytes(point.as_bytes())
                    .map_err(|e| Error::Credential(format!("p384 public key error: {e}")))?
                    .to_public_key_der()
            }
            PrivateKey::P521(key) => {
                let point = P521VerifyingKey::from(key).to_encoded_point(false);
                p521::PublicKey::from_sec1_bytes(point.as_bytes())
                    .map_err(|e| Error::Credential(format!("p521 public key error: {e}")))?
                    .to_public_key_der()
            }
        };
        doc.map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| Error::Credential(format!("public key encoding error: {e}")))
    }

    /// RFC 7638 SHA-256 thumbprint of the public JWK.
    pub(crate) fn jwk_thumbprint(&self) -> Result<String, Error> {
        let canonical = match self {
            PrivateKey::Rsa(key) => {
                let public = RsaPublicKey::from(key);
                format!(
                    r#"{{"e":"{}","kty":"RSA","n":"{}"}}"#,
                    URL_SAFE_NO_PAD.encode(public.e().to_bytes_be()),
                    URL_SAFE_NO_PAD.encode(public.n().to_bytes_be()),
                )
            }
            PrivateKey::P256(key) => {
                let point = P256VerifyingKey::from(key).to_encoded_point(false);
                ec_thumbprint_input("P-256", point.x(), point.y())?
            }
            PrivateKey::P384(key) => {
                let point = P384VerifyingKey::from(key).to_encoded_point(false);
                ec_thumbprint_input("P-384", point.x(), point.y())?
            }
            PrivateKey::P521(key) => {
                let point = P521VerifyingKey::from(key).to_encoded_point(false);
                ec_thumbprint_input("P-521", point.x(), point.y())?
            }
        };
        Ok(URL_SAFE_NO_PAD.encode(Sha256::digest(canonical.as_bytes())))
    }
}

fn ec_thumbprint_input<B: AsRef<[u8]>>(
    crv: &str,
    x: Option<B>,
    y: Option<B>,
) -> Result<String, Error> {
    let (Some(x), Some(y)) = (x, y) else {
        return Err(Error::Credential(format!(
            "{crv} public key has no affine coordinates"
        )));
    };
    Ok(format!(
        r#"{{"crv":"{crv}","kty":"EC","x":"{}","y":"{}"}}"#,
        URL_SAFE_NO_PAD.encode(x.as_ref()),
        URL_SAFE_NO_PAD.encode(y.as_ref()),
    ))
}

/// Loads the first usable private key. Accepts PKCS#1 RSA, PKCS#8 (RSA or
/// EC) and SEC1 `EC PRIVATE KEY` blocks; other blocks are skipped. When a key
/// block is present but cannot be decoded, that decoding error is returned.
pub(crate) fn load_private_key(pem_bytes: &[u8]) -> Result<PrivateKey, Error> {
    let blocks =
        parse_many(pem_bytes).map_err(|e| Error::Credential(format!("pem parse error: {e}")))?;
    let mut last_err = None;
    for block in &blocks {
        let decoded = match block.tag() {
            "RSA PRIVATE KEY" => decode_pkcs1(block.contents()),
            "PRIVATE KEY" => decode_pkcs8(block.contents()),
            "EC PRIVATE KEY" => decode_sec1(block.contents()),
            _ => continue,
        };
        match decoded {
            Ok(key) => return Ok(key),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        Error::Credential("no private key block found in pem input".to_string())
    }))
}

/// Returns the DER contents of every `CERTIFICATE` block, in input order.
pub(crate) fn load_certificate_chain(pem_bytes: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
    let blocks =
        parse_many(pem_bytes).map_err(|e| Error::Credential(format!("pem parse error: {e}")))?;
    let chain: Vec<Vec<u8>> = blocks
        .into_iter()
        .filter(|block| block.tag() == "CERTIFICATE")
        .map(|block| block.into_contents())
        .collect();
    if chain.is_empty() {
        return Err(Error::Credential(
            "no certificates found in pem input".to_string(),
        ));
    }
    Ok(chain)
}

fn decode_pkcs1(der: &[u8]) -> Result<PrivateKey, Error> {
    RsaPrivateKey::from_pkcs1_der(der)
        .map(PrivateKey::Rsa)
        .map_err(|e| Error::Credential(format!("rsa private key error: {e}")))
}

fn decode_pkcs8(der: &[u8]) -> Result<PrivateKey, Error> {
    if let Ok(key) = RsaPrivateKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::Rsa(key));
    }
    if let Ok(secret) = p256::SecretKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::P256(secret.into()));
    }
    if let Ok(secret) = p384::SecretKey::from_pkcs8_der(der) {
        return Ok(PrivateKey::P384(secret.into()));
    }
    if let Ok(secret) = p521::SecretKey::from_pkcs8_der(der) {
        return p521_key(&secret);
    }
    Err(Error::Credential(
        "pkcs8 private key is neither RSA nor EC on P-256, P-384 or P-521".to_string(),
    ))
}

// p521's signing key wraps the generic one and only builds from raw bytes.
fn p521_key(secret: &p521::SecretKey) -> Result<PrivateKey, Error> {
    P521SigningKey::from_bytes(&secret.to_bytes())
        .map(PrivateKey::P521)
        .map_err(|e| Error::Credential(format!("p521 signing key error: {e}")))
}

/// The curve is taken from the key's own parameters; a key for another curve
/// fails to decode, so trying each curve in turn is unambiguous.
fn decode_sec1(der: &[u8]) -> Result<PrivateKey, Error> {
    if let Ok(secret) = p256::SecretKey::from_sec1_der(der) {
        return Ok(PrivateKey::P256(secret.into()));
    }
    if let Ok(secret) = p384::SecretKey::from_sec1_der(der) {
        return Ok(PrivateKey::P384(secret.into()));
    }
    if let Ok(secret) = p521::SecretKey::from_sec1_der(der) {
        return p521_key(&secret);
    }
    Err(Error::Credential(
        "ec private key is not on P-256, P-384 or P-521".to_string(),
    ))
}
