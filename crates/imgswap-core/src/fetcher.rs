use crate::config::AppConfig;
use crate::error::Error;
use crate::model::Dimensions;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Something that hands out placeholder image bytes for a size and seed.
pub trait PlaceholderSource {
    /// Where the image for these parameters comes from, for progress output.
    fn url_for(&self, dimensions: Dimensions, seed: u32) -> String;

    /// One attempt, no retry. Any failure means the caller keeps the original.
    fn fetch(&self, dimensions: Dimensions, seed: u32) -> Result<Vec<u8>, Error>;
}

/// `{base}/{width}/{height}?random={seed}`
pub fn placeholder_url(base_url: &str, dimensions: Dimensions, seed: u32) -> String {
    format!(
        "{}/{}/{}?random={}",
        base_url.trim_end_matches('/'),
        dimensions.width,
        dimensions.height,
        seed
    )
}

/// Blocking client for a Lorem Picsum style service.
pub struct PicsumClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl PicsumClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network {
                url: base_url.to_string(),
                message: format!("could not build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(&config.placeholder.base_url, config.request_timeout())
    }

    fn network_error(&self, url: &str, err: reqwest::Error) -> Error {
        let message = if err.is_timeout() {
            format!("timed out after {:.1}s", self.timeout.as_secs_f64())
        } else if let Some(status) = err.status() {
            format!("HTTP {}", status)
        } else {
            err.to_string()
        };
        Error::Network {
            url: url.to_string(),
            message,
        }
    }
}

impl PlaceholderSource for PicsumClient {
    fn url_for(&self, dimensions: Dimensions, seed: u32) -> String {
        placeholder_url(&self.base_url, dimensions, seed)
    }

    fn fetch(&self, dimensions: Dimensions, seed: u32) -> Result<Vec<u8>, Error> {
        let url = self.url_for(dimensions, seed);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.network_error(&url, e))?;

        let body = response.bytes().map_err(|e| self.network_error(&url, e))?;
        if body.is_empty() {
            return Err(Error::Network {
                url,
                message: "empty response body".to_string(),
            });
        }

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
