use crate::types::FetchResult;
use anyhow::Result;
use derive_builder::Builder;
use headers::{HeaderMap, HeaderValue};
use log::{info, warn};
use reqwest::header;
use std::time::{Duration, Instant};
use url::Url;

/// User agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("bulkfetch/", env!("CARGO_PKG_VERSION"));

/// A handle to a shared HTTP client.
///
/// Cloning is cheap; clones share the same underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    reqwest_client: reqwest::Client,
}

/// Configures and builds a [`Client`].
///
/// The request timeout is opt-in. Without one, a fetch runs until the
/// server responds or the transport gives up on its own.
#[derive(Builder, Debug)]
#[builder(build_fn(skip))]
#[builder(setter(into))]
#[builder(name = "ClientBuilder")]
pub struct ClientBuilderInternal {
    user_agent: String,
    custom_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn build(&mut self) -> Result<Client> {
        let mut headers = HeaderMap::new();

        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&user_agent)?);

        if let Some(custom) = &self.custom_headers {
            headers.extend(custom.clone());
        }

        let builder = reqwest::ClientBuilder::new()
            .gzip(true)
            .default_headers(headers);

        let builder = match self.timeout.flatten() {
            Some(t) => builder.timeout(t),
            None => builder,
        };

        Ok(Client {
            reqwest_client: builder.build()?,
        })
    }
}

impl Client {
    /// Fetch a single URL with a plain GET and report the outcome.
    ///
    /// This never fails: transport errors (DNS, connect, TLS, timeout)
    /// and body-read errors are folded into the returned [`FetchResult`]
    /// with a status code of `0`. An HTTP response is read to completion
    /// regardless of its status code.
    pub async fn fetch(&self, url: &Url) -> FetchResult {
        info!("Fetching {}", url);
        let start = Instant::now();

        let response = match self.reqwest_client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                return FetchResult::errored(url, e, start.elapsed());
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => FetchResult::completed(url, status, body, start.elapsed()),
            Err(e) => {
                warn!("Reading body from {} failed: {}", url, e);
                FetchResult::errored(url, e, start.elapsed())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{
        get_mock_server, get_mock_server_with_content, get_mock_server_with_delay,
    };
    use http::StatusCode;
    use pretty_assertions::assert_eq;
    use std::net::TcpListener;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("Expected valid URL")
    }

    #[tokio::test]
    async fn test_fetch_ok_with_body() {
        let mock_server = get_mock_server_with_content(StatusCode::OK, Some("Hello World")).await;
        let client = ClientBuilder::default().build().unwrap();

        let result = client.fetch(&url(&mock_server.uri())).await;
        assert!(result.success);
        assert_eq!(result.status_code, 200);
        assert_eq!(result.body, "Hello World");
        assert_eq!(result.error_message, None);
        assert!(result.elapsed_secs >= 0.0);
    }

    #[tokio::test]
    async fn test_fetch_not_found_has_status_but_no_message() {
        let mock_server = get_mock_server(StatusCode::NOT_FOUND).await;
        let client = ClientBuilder::default().build().unwrap();

        let result = client.fetch(&url(&mock_server.uri())).await;
        assert!(!result.success);
        assert_eq!(result.status_code, 404);
        assert_eq!(result.error_message, None);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Grab a free port, then close it again so nobody is listening.
        let listener = TcpListener::bind("127.0.0.1:0").expect("Expected a free port");
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = ClientBuilder::default().build().unwrap();
        let result = client
            .fetch(&url(&format!("http://127.0.0.1:{}", port)))
            .await;

        assert!(!result.success);
        assert_eq!(result.status_code, 0);
        assert_eq!(result.body, "");
        assert!(!result.error_message.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_a_transport_failure() {
        let mock_delay = Duration::from_millis(50);
        let client_timeout = Duration::from_millis(10);
        assert!(mock_delay > client_timeout);

        let mock_server = get_mock_server_with_delay(StatusCode::OK, mock_delay).await;
        let client = ClientBuilder::default()
            .timeout(client_timeout)
            .build()
            .unwrap();

        let result = client.fetch(&url(&mock_server.uri())).await;
        assert!(!result.success);
        assert_eq!(result.status_code, 0);
        assert!(result.error_message.is_some());
    }

    #[tokio::test]
    async fn test_custom_user_agent() {
        let mock_server = get_mock_server(StatusCode::OK).await;
        let client = ClientBuilder::default()
            .user_agent("batch-test/1.0")
            .build()
            .unwrap();

        let result = client.fetch(&url(&mock_server.uri())).await;
        assert!(result.success);
    }
}
