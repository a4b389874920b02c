use std::time::Duration;

use crate::foundation::error::{CardError, CardResult};

/// Loads remote (cross-origin) images.
///
/// The exporter and the CLI only reach for this when cross-origin loading is enabled; tests
/// swap in an in-memory implementation.
pub trait ImageFetcher: Send + Sync {
    /// Fetch the raw bytes behind `url`.
    fn fetch(&self, url: &str) -> CardResult<Vec<u8>>;
}

/// Blocking HTTP fetcher backed by `reqwest`.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Client with a crate user agent and a 10s connect timeout.
    pub fn new() -> CardResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("linkcard/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CardError::fetch(format!("build http client: {e}")))?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    #[tracing::instrument(skip(self))]
    fn fetch(&self, url: &str) -> CardResult<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| CardError::fetch(format!("GET {url}: {e}")))?;
        let bytes = resp
            .bytes()
            .map_err(|e| CardError::fetch(format!("read body of {url}: {e}")))?;
        tracing::debug!(len = bytes.len(), "fetched remote image");
        Ok(bytes.to_vec())
    }
}

/// Fetcher that refuses every request. Used when cross-origin loading is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineFetcher;

impl ImageFetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> CardResult<Vec<u8>> {
        Err(CardError::fetch(format!(
            "remote loading disabled, refusing '{url}'"
        )))
    }
}
