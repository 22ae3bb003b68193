//! Fetch-by-URL capability
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
}

#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let data = self.fetch(url).await?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<HttpFetcher> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dompack/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;
        Ok(HttpFetcher { client })
    }
}

#[async_trait::async_trait]
impl Fetch for HttpFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let wrap = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };
        tracing::debug!("request");
        let resp = self.client.get(url).send().await.map_err(wrap)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().await.map_err(wrap)?;
        tracing::debug!(len = body.len(), "response read");
        Ok(body.to_vec())
    }
}
