#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ca_admin_rs::CredentialMaterial;
use serde_json::Value;
use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const READ_TIMEOUT: Duration = Duration::from_millis(500);
const MAX_READ_DURATION: Duration = Duration::from_secs(6);
const MAX_HEADER_BYTES: usize = 64 * 1024;
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub query: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json request body")
    }

    pub fn token(&self) -> &str {
        self.header_value("Authorization")
            .expect("authorization header")
    }

    /// Decoded claims of the bearer token, without verifying the signature.
    pub fn token_claims(&self) -> Value {
        let payload = self.token().split('.').nth(1).expect("payload segment");
        let bytes = URL_SAFE_NO_PAD.decode(payload).expect("base64 payload");
        serde_json::from_slice(&bytes).expect("claims json")
    }
}

pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl TestServer {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().expect("requests").clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().expect("requests").len()
    }
}

/// Serves every connection with `handler`. Responses close the connection so
/// each request arrives on a fresh stream.
pub fn serve_with<F>(handler: F) -> TestServer
where
    F: FnMut(&CapturedRequest) -> String + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    let mut handler = handler;
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let req = read_request(&mut stream);
            let response = handler(&req);
            recorded.lock().expect("requests").push(req);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });
    TestServer {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// Answers requests with `responses` in order, then with 500.
pub fn serve_sequence(responses: Vec<String>) -> TestServer {
    let mut queue = responses.into_iter();
    serve_with(move |_| {
        queue.next().unwrap_or_else(|| {
            json_response(
                "500 Internal Server Error",
                r#"{"message":"unexpected request"}"#,
            )
        })
    })
}

pub fn json_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

pub fn empty_response(status: &str) -> String {
    format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
}

pub struct TestIdentity {
    pub credentials: CredentialMaterial,
    pub public_key_pem: String,
}

/// Self-signed P-256 identity whose leaf CN is `subject`.
pub fn identity(subject: &str) -> TestIdentity {
    let key = rcgen::KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256).expect("key pair");
    let mut params = rcgen::CertificateParams::default();
    params.distinguished_name = rcgen::DistinguishedName::new();
    params
        .distinguished_name
        .push(rcgen::DnType::CommonName, subject);
    let cert = params.self_signed(&key).expect("certificate");
    let credentials = CredentialMaterial::from_pem(
        cert.pem().as_bytes(),
        key.serialize_pem().as_bytes(),
        "admin-jwk",
    )
    .expect("credentials");
    TestIdentity {
        credentials,
        public_key_pem: key.public_key_pem(),
    }
}

/// Verifies the request token against `public_key_pem` and returns its claims.
pub fn verify_token(req: &CapturedRequest, public_key_pem: &str) -> Value {
    let key = jsonwebtoken::DecodingKey::from_ec_pem(public_key_pem.as_bytes()).expect("key");
    let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::ES256);
    validation.set_audience(&[req.path.as_str()]);
    validation.set_issuer(&["admin-jwk"]);
    jsonwebtoken::decode::<Value>(req.token(), &key, &validation)
        .expect("valid token")
        .claims
}

fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let deadline = Instant::now() + MAX_READ_DURATION;
    let _ = stream.set_read_timeout(Some(READ_TIMEOUT));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break Some(pos + 4);
        }
        if buf.len() > MAX_HEADER_BYTES {
            panic!("request headers too large");
        }
        if Instant::now() >= deadline {
            panic!("timed out reading request headers");
        }
        match stream.read(&mut chunk) {
            Ok(0) => break None,
            Ok(read) => buf.extend_from_slice(&chunk[..read]),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => continue,
            Err(e) => panic!("read_request I/O error: {e}"),
        }
    };

    let Some(header_end) = header_end else {
        return CapturedRequest {
            method: "<incomplete>".to_string(),
            path: "<eof>".to_string(),
            headers: Vec::new(),
            query: HashMap::new(),
            body: Vec::new(),
        };
    };

    let header_str = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = header_str.split("\r\n");
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let full_path = parts.next().unwrap_or("");
    let (path, query_str) = full_path.split_once('?').unwrap_or((full_path, ""));
    let query = url::form_urlencoded::parse(query_str.as_bytes())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let mut headers = Vec::new();
    let mut content_length: usize = 0;
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("Content-Length") {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name.to_string(), value.to_string()));
        }
    }
    if content_length > MAX_BODY_BYTES {
        panic!("request body too large: {content_length} > {MAX_BODY_BYTES} bytes");
    }

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        if Instant::now() >= deadline {
            panic!(
                "read_request body incomplete: expected {content_length} bytes, got {} bytes",
                body.len()
            );
        }
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => body.extend_from_slice(&chunk[..read]),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => continue,
            Err(e) => panic!("read_request body I/O error: {e}"),
        }
    }
    body.truncate(content_length);

    CapturedRequest {
        method,
        path: path.to_string(),
        headers,
        query,
        body,
    }
}
