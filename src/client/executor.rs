use crate::client_defaults::MAX_ERROR_BODY_BYTES;
use crate::error::{drain_body, parse_error_from_body, read_body, read_body_with_limit, Error};
use crate::retry::RetryState;
use reqwest::blocking::Response;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use url::Url;

use super::AdminClient;

impl AdminClient {
    /// Sends the request and decodes a successful body into `T`.
    pub(crate) fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &Url,
        body: Option<Vec<u8>>,
    ) -> Result<T, Error> {
        let mut resp = self.dispatch(method, url, body.as_deref())?;
        decode_body(url, &mut resp)
    }

    /// Sends the request and discards a successful body.
    pub(crate) fn execute_no_content(
        &self,
        method: Method,
        url: &Url,
        body: Option<Vec<u8>>,
    ) -> Result<(), Error> {
        let mut resp = self.dispatch(method, url, body.as_deref())?;
        drain_body(&mut resp)
    }

    /// Runs one logical call: a token per attempt, at most one replay after a
    /// transport rotation. Returns only responses with a status below 400.
    fn dispatch(&self, method: Method, url: &Url, body: Option<&[u8]>) -> Result<Response, Error> {
        let mut state = RetryState::new();
        loop {
            let token = self.minter.mint(url.path())?;
            let http = self.transport.current();
            let mut req = http
                .request(method.clone(), url.clone())
                .header(AUTHORIZATION, token.as_str());
            if let Some(body) = body {
                req = req
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.to_vec());
            }
            log::debug!(
                "{method} {url} (retried: {}, transport generation {})",
                state.retried,
                self.transport.generation()
            );

            let mut resp = req.send()?;
            let status = resp.status();
            if status.as_u16() < 400 {
                return Ok(resp);
            }
            if self
                .retry
                .should_retry(status.as_u16(), &mut state, &self.transport)
            {
                if let Err(err) = drain_body(&mut resp) {
                    log::debug!("discarding body of failed {method} {url}: {err}");
                }
                continue;
            }
            return Err(error_from_body(status, &mut resp));
        }
    }
}

pub(crate) fn json_body<B: Serialize>(body: &B) -> Result<Vec<u8>, Error> {
    Ok(serde_json::to_vec(body)?)
}

/// Reads the whole body, then decodes it.
pub(crate) fn decode_body<T: DeserializeOwned, R: Read>(url: &Url, body: &mut R) -> Result<T, Error> {
    let bytes = read_body(body)?;
    serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}

/// Builds the API error for a failed status from a bounded prefix of the body;
/// the rest is drained.
pub(crate) fn error_from_body<R: Read>(status: StatusCode, body: &mut R) -> Error {
    match read_body_with_limit(body, MAX_ERROR_BODY_BYTES) {
        Ok(bytes) => parse_error_from_body(status, &bytes),
        Err(err) => err,
    }
}
