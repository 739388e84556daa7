use std::fmt;
use std::future::Future;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, CONTENT_LENGTH, LOCATION};
use reqwest::{redirect, Client, Response, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::models::LauncherConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Network(String),

    #[error("Server returned HTTP {0}")]
    BadStatus(u16),

    #[error("Gave up after {0} redirects")]
    TooManyRedirects(usize),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Terminal response of a redirect chain, body not yet read
pub struct ResponseHandle {
    pub url: String,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: BoxStream<'static, Result<Bytes>>,
}

impl ResponseHandle {
    /// Declared body size, if the server sent one
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }
}

impl fmt::Debug for ResponseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseHandle")
            .field("url", &self.url)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Issues a GET and resolves it to a terminal 200 response.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<ResponseHandle>> + Send;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    max_redirects: usize,
}

impl HttpFetcher {
    pub fn new(config: &LauncherConfig) -> Result<Self> {
        // Redirects are walked by hand so every hop's body is drained and counted
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            max_redirects: config.max_redirects,
        })
    }

    fn next_location(current: &Url, response: &Response) -> Result<Option<Url>> {
        let Some(location) = response.headers().get(LOCATION) else {
            return Ok(None);
        };
        let location = location
            .to_str()
            .map_err(|_| FetchError::InvalidUrl("non-ASCII Location header".to_string()))?;

        // Location may be relative to the URL that produced it
        current
            .join(location)
            .map(Some)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", location, e)))
    }
}

/// Reads and throws away whatever is left of a response body.
async fn discard_body(response: Response) {
    if let Err(e) = response.bytes().await {
        debug!("failed to drain response body: {}", e);
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<ResponseHandle> {
        let mut current =
            Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        let mut hops = 0;

        loop {
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();

            if status.is_redirection() {
                if let Some(next) = Self::next_location(&current, &response)? {
                    discard_body(response).await;
                    if hops >= self.max_redirects {
                        return Err(FetchError::TooManyRedirects(self.max_redirects));
                    }
                    hops += 1;
                    debug!(status = status.as_u16(), from = %current, to = %next, "following redirect");
                    current = next;
                    continue;
                }
            }

            if status != StatusCode::OK {
                discard_body(response).await;
                return Err(FetchError::BadStatus(status.as_u16()));
            }

            let headers = response.headers().clone();
            let body = response.bytes_stream().map_err(FetchError::from).boxed();

            return Ok(ResponseHandle {
                url: current.to_string(),
                status: status.as_u16(),
                headers,
                body,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(max_redirects: usize) -> HttpFetcher {
        let config = LauncherConfig {
            max_redirects,
            ..LauncherConfig::default()
        };
        HttpFetcher::new(&config).unwrap()
    }

    async fn read_body(handle: ResponseHandle) -> Vec<u8> {
        let mut body = handle.body;
        let mut buf = Vec::new();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk.unwrap());
        }
        buf
    }

    #[tokio::test]
    async fn test_direct_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/file.exe")
            .with_status(200)
            .with_body("payload")
            .create_async()
            .await;

        let handle = fetcher(20)
            .fetch(&format!("{}/file.exe", server.url()))
            .await
            .unwrap();

        assert_eq!(handle.status, 200);
        assert_eq!(handle.content_length(), Some(7));
        assert_eq!(read_body(handle).await, b"payload");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_follows_redirect_chain() {
        let mut server = mockito::Server::new_async().await;
        let base = server.url();

        let first = server
            .mock("GET", "/latest")
            .with_status(302)
            .with_header("location", &format!("{}/hop", base))
            .with_body("intermediate-one")
            .create_async()
            .await;
        // Relative Location resolves against the hop that sent it
        let second = server
            .mock("GET", "/hop")
            .with_status(301)
            .with_header("location", "/cdn/file.exe")
            .with_body("intermediate-two")
            .create_async()
            .await;
        let last = server
            .mock("GET", "/cdn/file.exe")
            .with_status(200)
            .with_body("final")
            .create_async()
            .await;

        let handle = fetcher(20)
            .fetch(&format!("{}/latest", base))
            .await
            .unwrap();

        assert_eq!(handle.url, format!("{}/cdn/file.exe", base));
        assert_eq!(read_body(handle).await, b"final");
        first.assert_async().await;
        second.assert_async().await;
        last.assert_async().await;
    }

    #[tokio::test]
    async fn test_bad_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let err = fetcher(20)
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::BadStatus(404));
    }

    #[tokio::test]
    async fn test_redirect_without_location_is_terminal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/moved")
            .with_status(302)
            .create_async()
            .await;

        let err = fetcher(20)
            .fetch(&format!("{}/moved", server.url()))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::BadStatus(302));
    }

    #[tokio::test]
    async fn test_redirect_loop_is_bounded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/loop")
            .with_status(302)
            .with_header("location", "/loop")
            .expect(4)
            .create_async()
            .await;

        let err = fetcher(3)
            .fetch(&format!("{}/loop", server.url()))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::TooManyRedirects(3));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let err = fetcher(20).fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind then drop a listener to get a port nobody is serving
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = fetcher(20)
            .fetch(&format!("http://127.0.0.1:{}/file", port))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
