// Static baseline HTTP client
//
// Fetches the read-only JSON seed files shipped alongside the site
// (`assets/data/*.json`). Every call goes to the network; nothing is
// cached here, so a redeployed baseline is visible on the next read.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for static baseline files.
///
/// Resolves relative asset paths against a base URL and decodes the
/// JSON body. Non-success statuses and malformed bodies are reported as
/// errors; deciding to degrade is the caller's business.
pub struct BaselineClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BaselineClient {
    /// Create a new baseline client from a `TransportConfig`.
    ///
    /// `base_url` is the site root (e.g. `https://quannem.example` or
    /// `http://localhost:8080/site/`). A missing trailing slash is added so
    /// relative asset paths resolve beneath it instead of replacing the
    /// last path segment.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a baseline client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
        }
    }

    /// The site root every asset path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative asset path (e.g. `assets/data/reviews.json`).
    pub fn asset_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// `GET` a relative asset path and decode its JSON body.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.asset_url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                target: url.to_string(),
            });
        }

        let body = resp.text().await?;
        trace!(bytes = body.len(), "baseline body received");

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BaselineClient {
        BaselineClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn asset_url_at_host_root() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.asset_url("assets/data/reviews.json").unwrap().as_str(),
            "http://localhost:8080/assets/data/reviews.json"
        );
    }

    #[test]
    fn asset_url_keeps_subdirectory_without_trailing_slash() {
        let c = client("https://example.com/quannem");
        assert_eq!(
            c.asset_url("assets/data/reservations.json").unwrap().as_str(),
            "https://example.com/quannem/assets/data/reservations.json"
        );
    }

    #[test]
    fn asset_url_ignores_leading_slash() {
        let c = client("https://example.com/site/");
        assert_eq!(
            c.asset_url("/assets/data/reviews.json").unwrap().as_str(),
            "https://example.com/site/assets/data/reviews.json"
        );
    }
}
