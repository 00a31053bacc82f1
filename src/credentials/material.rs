use crate::error::Error;
use base64::engine::general_purpose::STANDARD as BASE64_STD;
use base64::Engine as _;
use std::fmt;
use std::fs;
use std::path::Path;

use super::keys::{load_certificate_chain, load_private_key, PrivateKey};
use super::SigningAlgorithm;

/// Signing key and certificate chain the client proves its identity with.
///
/// The leaf certificate (first in the chain) must carry the public half of
/// the signing key. Unless overridden, the subject is taken from the leaf's
/// common name, the key id is the RFC 7638 thumbprint of the public key and
/// the algorithm follows from the key type.
#[derive(Clone)]
pub struct CredentialMaterial {
    key: PrivateKey,
    algorithm: SigningAlgorithm,
    key_id: String,
    x5c: Vec<String>,
    issuer: String,
    subject: String,
}

impl CredentialMaterial {
    /// Loads credentials from a PEM certificate chain (leaf first) and a PEM
    /// private key.
    pub fn from_pem(
        cert_chain_pem: &[u8],
        key_pem: &[u8],
        issuer: impl Into<String>,
    ) -> Result<Self, Error> {
        let key = load_private_key(key_pem)?;
        let chain = load_certificate_chain(cert_chain_pem)?;
        let subject = leaf_common_name(&chain[0], &key)?;
        Ok(Self {
            algorithm: key.default_algorithm(),
            key_id: key.jwk_thumbprint()?,
            x5c: chain.iter().map(|der| BASE64_STD.encode(der)).collect(),
            issuer: issuer.into(),
            subject,
            key,
        })
    }

    /// Reads the certificate chain and private key from disk.
    pub fn from_files(
        cert_chain_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
        issuer: impl Into<String>,
    ) -> Result<Self, Error> {
        let chain = read_file(cert_chain_path.as_ref())?;
        let key = read_file(key_path.as_ref())?;
        Self::from_pem(&chain, &key, issuer)
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = key_id.into();
        self
    }

    /// Overrides the signing algorithm. Compatibility with the key is checked
    /// when a token is minted.
    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Base64 (standard alphabet) DER certificates, leaf first.
    pub fn certificate_chain(&self) -> &[String] {
        &self.x5c
    }

    pub(crate) fn key(&self) -> &PrivateKey {
        &self.key
    }

    #[cfg(test)]
    pub(crate) fn from_key_for_tests(key_pem: &[u8], issuer: &str, subject: &str) -> Self {
        let key = load_private_key(key_pem).expect("key");
        Self {
            algorithm: key.default_algorithm(),
            key_id: key.jwk_thumbprint().expect("thumbprint"),
            x5c: vec!["MIIB".to_string()],
            issuer: issuer.to_string(),
            subject: subject.to_string(),
            key,
        }
    }
}

impl fmt::Debug for CredentialMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialMaterial")
            .field("key", &self.key.kind())
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .field("certificates", &self.x5c.len())
            .field("issuer", &self.issuer)
            .field("subject", &self.subject)
            .finish()
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|e| Error::Credential(format!("read {}: {e}", path.display())))
}

fn leaf_common_name(leaf_der: &[u8], key: &PrivateKey) -> Result<String, Error> {
    let (_, leaf) = x509_parser::parse_x509_certificate(leaf_der)
        .map_err(|e| Error::Credential(format!("leaf certificate parse error: {e}")))?;
    if leaf.public_key().raw != key.public_key_der()?.as_slice() {
        return Err(Error::Credential(
            "leaf certificate does not match the signing key".to_string(),
        ));
    }
    let common_name = leaf
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .unwrap_or_default();
    Ok(common_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::test_support::self_signed;
    use pkcs8::DecodePrivateKey;
    use std::io::Write;

    #[test]
    fn derives_subject_key_id_and_algorithm_from_leaf() {
        let (cert_pem, key) = self_signed("admin@example.com", &rcgen::PKCS_ECDSA_P256_SHA256);
        let creds = CredentialMaterial::from_pem(
            cert_pem.as_bytes(),
            key.serialize_pem().as_bytes(),
            "admin-provisioner",
        )
        .expect("credentials");

        assert_eq!(creds.subject(), "admin@example.com");
        assert_eq!(creds.issuer(), "admin-provisioner");
        assert_eq!(creds.algorithm(), SigningAlgorithm::ES256);
        assert_eq!(creds.key_id(), creds.key().jwk_thumbprint().expect("kid"));
        assert_eq!(creds.certificate_chain().len(), 1);

        let der = BASE64_STD
            .decode(&creds.certificate_chain()[0])
            .expect("base64 der");
        assert!(x509_parser::parse_x509_certificate(&der).is_ok());
    }

    #[test]
    fn accepts_sec1_key_for_leaf() {
        let (cert_pem, key) = self_signed("ops@example.com", &rcgen::PKCS_ECDSA_P384_SHA384);
        let secret = p384::SecretKey::from_pkcs8_der(&key.serialize_der()).expect("pkcs8");
        let sec1 = secret
            .to_sec1_pem(pkcs8::LineEnding::LF)
            .expect("sec1 pem");
        let creds = CredentialMaterial::from_pem(cert_pem.as_bytes(), sec1.as_bytes(), "iss")
            .expect("credentials");
        assert_eq!(creds.subject(), "ops@example.com");
        assert_eq!(creds.algorithm(), SigningAlgorithm::ES384);
    }

    #[test]
    fn keeps_chain_order() {
        let (leaf_pem, key) = self_signed("leaf", &rcgen::PKCS_ECDSA_P256_SHA256);
        let (intermediate_pem, _) = self_signed("intermediate", &rcgen::PKCS_ECDSA_P256_SHA256);
        let chain = format!("{leaf_pem}{intermediate_pem}");
        let creds =
            CredentialMaterial::from_pem(chain.as_bytes(), key.serialize_pem().as_bytes(), "iss")
                .expect("credentials");
        assert_eq!(creds.certificate_chain().len(), 2);
        assert_eq!(creds.subject(), "leaf");
    }

    #[test]
    fn rejects_leaf_for_another_key() {
        let (cert_pem, _) = self_signed("admin", &rcgen::PKCS_ECDSA_P256_SHA256);
        let other = rcgen::KeyPair::generate().expect("key");
        let err = CredentialMaterial::from_pem(
            cert_pem.as_bytes(),
            other.serialize_pem().as_bytes(),
            "iss",
        )
        .expect_err("mismatch");
        assert!(matches!(err, Error::Credential(_)));
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn overrides_apply() {
        let (cert_pem, key) = self_signed("admin", &rcgen::PKCS_ECDSA_P384_SHA384);
        let creds = CredentialMaterial::from_pem(
            cert_pem.as_bytes(),
            key.serialize_pem().as_bytes(),
            "iss",
        )
        .expect("credentials")
        .with_subject("root@example.com")
        .with_key_id("kid-1")
        .with_algorithm(SigningAlgorithm::ES512);
        assert_eq!(creds.subject(), "root@example.com");
        assert_eq!(creds.key_id(), "kid-1");
        assert_eq!(creds.algorithm(), SigningAlgorithm::ES512);
    }

    #[test]
    fn loads_from_files() {
        let (cert_pem, key) = self_signed("file-admin", &rcgen::PKCS_ECDSA_P256_SHA256);
        let mut cert_file = tempfile::NamedTempFile::new().expect("cert file");
        cert_file.write_all(cert_pem.as_bytes()).expect("write cert");
        let mut key_file = tempfile::NamedTempFile::new().expect("key file");
        key_file
            .write_all(key.serialize_pem().as_bytes())
            .expect("write key");

        let creds = CredentialMaterial::from_files(cert_file.path(), key_file.path(), "iss")
            .expect("credentials");
        assert_eq!(creds.subject(), "file-admin");
    }

    #[test]
    fn missing_file_is_a_credential_error() {
        let err = CredentialMaterial::from_files("/nonexistent/cert.pem", "/nonexistent/key.pem", "iss")
            .expect_err("missing");
        assert!(matches!(err, Error::Credential(_)));
    }

    #[test]
    fn debug_does_not_print_key_material() {
        let (cert_pem, key) = self_signed("admin", &rcgen::PKCS_ECDSA_P256_SHA256);
        let key_pem = key.serialize_pem();
        let creds = CredentialMaterial::from_pem(cert_pem.as_bytes(), key_pem.as_bytes(), "iss")
            .expect("credentials");
        let debug = format!("{creds:?}");
        assert!(debug.contains("P-256"));
        assert!(!debug.contains("PRIVATE KEY"));
    }
}
