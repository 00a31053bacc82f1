use ca_admin_rs::{AdminClient, ProvisionerSelector, TransportOptions};
use std::path::Path;
use std::sync::Arc;
use std::thread;

mod common;
use common::{identity, json_response, serve_sequence, serve_with, verify_token};

const ADMIN_JSON: &str = r#"{"id":"a1","subject":"alice@example.com","type":"ADMIN"}"#;

fn write_identity(dir: &Path, common_name: &str) -> (std::path::PathBuf, std::path::PathBuf) {
    let key = rcgen::KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256).expect("key pair");
    let mut params = rcgen::CertificateParams::default();
    params.distinguished_name = rcgen::DistinguishedName::new();
    params
        .distinguished_name
        .push(rcgen::DnType::CommonName, common_name);
    let cert = params.self_signed(&key).expect("certificate");
    let cert_path = dir.join("client.crt");
    let key_path = dir.join("client.key");
    std::fs::write(&cert_path, cert.pem()).expect("cert");
    std::fs::write(&key_path, key.serialize_pem()).expect("key");
    (cert_path, key_path)
}

#[test]
fn renewed_identity_is_picked_up_on_retry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (cert_path, key_path) = write_identity(dir.path(), "client-v1");
    let id = identity("root@example.com");
    let server = serve_sequence(vec![
        json_response("401 Unauthorized", r#"{"message":"certificate expired"}"#),
        json_response("200 OK", ADMIN_JSON),
    ]);
    let client = AdminClient::builder(&server.base_url)
        .expect("builder")
        .credentials(id.credentials)
        .transport(TransportOptions::new().mtls_identity_from_files(&cert_path, &key_path))
        .retry_on(|status| status == 401)
        .build()
        .expect("client");

    write_identity(dir.path(), "client-v2");
    let admin = client.get_admin("a1").expect("admin after retry");
    assert_eq!(admin.subject, "alice@example.com");
    assert_eq!(client.transport_generation(), 1);

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    let first = verify_token(&requests[0], &id.public_key_pem);
    let second = verify_token(&requests[1], &id.public_key_pem);
    assert_ne!(first["jti"], second["jti"]);
}

#[test]
fn each_call_gets_its_own_retry() {
    let id = identity("root@example.com");
    let server = serve_sequence(vec![
        json_response("503 Service Unavailable", r#"{"message":"busy"}"#),
        json_response("200 OK", ADMIN_JSON),
        json_response("503 Service Unavailable", r#"{"message":"busy"}"#),
        json_response("503 Service Unavailable", r#"{"message":"still busy"}"#),
    ]);
    let client = AdminClient::builder(&server.base_url)
        .expect("builder")
        .credentials(id.credentials)
        .retry_on(|status| status == 503)
        .build()
        .expect("client");

    client.get_admin("a1").expect("first call recovers");
    let err = client.get_admin("a1").expect_err("second call exhausts");
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "still busy");
    assert_eq!(server.hits(), 4);
    assert_eq!(client.transport_generation(), 2);
}

#[test]
fn shared_client_serves_concurrent_callers() {
    let id = identity("root@example.com");
    let server = serve_with(|req| {
        if req.path == "/admin/provisioners/jwk" {
            json_response("200 OK", r#"{"id":"p1","type":"JWK","name":"jwk"}"#)
        } else {
            json_response("200 OK", ADMIN_JSON)
        }
    });
    let client = Arc::new(
        AdminClient::builder(&server.base_url)
            .expect("builder")
            .credentials(id.credentials)
            .retry_on(|status| status >= 500)
            .build()
            .expect("client"),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                if i % 2 == 0 {
                    client.get_admin("a1").map(|a| a.id)
                } else {
                    client
                        .get_provisioner(&ProvisionerSelector::by_name("jwk"))
                        .map(|p| p.id)
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join").expect("call");
    }

    let requests = server.requests();
    assert_eq!(requests.len(), 4);
    for req in &requests {
        let claims = verify_token(req, &id.public_key_pem);
        assert_eq!(claims["aud"], req.path.as_str());
    }
    assert_eq!(client.transport_generation(), 0);
}
