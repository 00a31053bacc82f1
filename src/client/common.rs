use crate::client_defaults::ADMIN_URL_PREFIX;
use crate::error::Error;
use url::Url;

/// Appends `admin/<segments..>` to the endpoint path. Each segment is
/// percent-encoded on its own, so ids and names cannot introduce extra path
/// components. Any query or fragment on the endpoint is dropped.
pub(crate) fn build_url(endpoint: &Url, segments: &[&str]) -> Result<Url, Error> {
    let mut url = endpoint.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut path_segments = url
            .path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(endpoint.to_string()))?;
        path_segments.pop_if_empty();
        path_segments.push(ADMIN_URL_PREFIX);
        for segment in segments {
            path_segments.push(segment);
        }
    }
    Ok(url)
}

pub(crate) fn build_url_with_query(
    endpoint: &Url,
    segments: &[&str],
    params: Vec<(&'static str, String)>,
) -> Result<Url, Error> {
    let mut url = build_url(endpoint, segments)?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

pub(crate) fn require_segment<'a>(what: &str, value: &'a str) -> Result<&'a str, Error> {
    if value.is_empty() {
        return Err(Error::RequestBuild(format!("{what} must not be empty")));
    }
    Ok(value)
}
