use reqwest::{
    header::{HeaderMap, HeaderValue, InvalidHeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT},
    Client, StatusCode,
};

use crate::configuration::ScraperSettings;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FetcherBuildError {
    #[error("invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fetches source pages as a desktop browser would.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(settings: &ScraperSettings) -> Result<Self, FetcherBuildError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&settings.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&settings.accept_language)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()?;

        Ok(PageFetcher { client })
    }

    /// Returns the page body decoded as UTF-8, whatever charset the server declares.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = res.bytes().await.map_err(|e| match e.is_timeout() {
            true => FetchError::Timeout {
                url: url.to_string(),
            },
            false => FetchError::Body {
                url: url.to_string(),
                source: e,
            },
        })?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn network_error(url: &str, e: reqwest::Error) -> FetchError {
    match e.is_timeout() {
        true => FetchError::Timeout {
            url: url.to_string(),
        },
        false => FetchError::Network {
            url: url.to_string(),
            source: e,
        },
    }
}
