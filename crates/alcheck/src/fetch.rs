use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::Path;
use url::Url;

/// Some hosts serve different content (or nothing) to non-browser
/// agents, so the default mimics one. Overridable per run.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Where a well-known assetlinks document lives on its host.
pub const WELL_KNOWN_PATH: &str = "/.well-known/assetlinks.json";

/// Read a local manifest in full. Empty contents is an error.
pub fn read_local(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if bytes.is_empty() {
        bail!("No file contents");
    }
    tracing::debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Turn a user-supplied reference into the URL to fetch:
/// a bare hostname gains the https scheme, http is rewritten to https,
/// and a reference with no path segment gains the well-known path.
/// Explicit non-root paths are left untouched; the whole mapping is
/// idempotent.
pub fn normalize_reference(reference: &str) -> Result<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        bail!("Empty reference");
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let mut url = Url::parse(&candidate)
        .with_context(|| format!("{trimmed:?} is not a valid reference"))?;

    if url.scheme() == "http" {
        url.set_scheme("https")
            .map_err(|()| anyhow!("cannot upgrade {trimmed:?} to https"))?;
    }
    if url.path() == "/" {
        url.set_path(WELL_KNOWN_PATH);
    }
    Ok(url)
}

/// Issue the single blocking GET for a remote manifest. Requires status
/// 200 and an `application/json` content type; anything else is fatal,
/// with any `Location` header surfaced as diagnostic context.
pub fn fetch_remote(url: &Url, user_agent: &str) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(user_agent)
        // one request per run, allowed to take as long as it takes
        .timeout(None)
        .build()
        .context("building HTTP client")?;

    let response = client
        .get(url.clone())
        .send()
        .with_context(|| format!("GET {url}"))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        match location_header(&response) {
            Some(location) => bail!("GET {url} returned {status} (Location: {location})"),
            None => bail!("GET {url} returned {status}"),
        }
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    if !content_type.starts_with("application/json") {
        bail!("GET {url} returned content type {content_type:?}, expected application/json");
    }

    let body = response.bytes().context("reading response body")?;
    tracing::debug!("fetched {} bytes from {url}", body.len());
    Ok(body.to_vec())
}

fn location_header(response: &reqwest::blocking::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
