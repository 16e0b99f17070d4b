use async_trait::async_trait;

/// Boxed error returned by [`TargetClient::fetch`].
///
/// The engine never inspects it; any error means the attempt failed and is
/// counted as such, with the message logged at debug level.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A single call against the system under test.
///
/// This is the only seam between the engine and the outside world. Workers
/// share one client through an [`Arc`](std::sync::Arc) and invoke it
/// concurrently, so implementations must be `Send + Sync` and internally
/// cheap to share. Latency is measured around the whole `fetch` call, which
/// should therefore not return until the remote work is actually done.
///
/// The crate ships [`HttpTargetClient`] behind the `http` feature; anything
/// else (gRPC, a database, an in-process stub) is one impl away.
///
/// # Example
/// ```rust
/// use async_trait::async_trait;
/// use brunt::{BoxError, TargetClient};
///
/// struct AlwaysOk;
///
/// #[async_trait]
/// impl TargetClient for AlwaysOk {
///     async fn fetch(&self, _target: u64) -> Result<(), BoxError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait TargetClient: Send + Sync {
    /// Performs one request against `target`, resolving once the response
    /// has been fully consumed.
    async fn fetch(&self, target: u64) -> Result<(), BoxError>;
}

#[cfg(feature = "http")]
pub use http::HttpTargetClient;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;

    use super::{BoxError, TargetClient};

    /// [`TargetClient`] that POSTs to `{base_url}/api/recommendations/{target}`.
    ///
    /// Any non-2xx status or transport error counts as a failure. The response
    /// body is drained before returning so the measured latency covers the
    /// full exchange.
    #[derive(Debug, Clone)]
    pub struct HttpTargetClient {
        client: reqwest::Client,
        base_url: String,
    }

    impl HttpTargetClient {
        /// Creates a client with default [`reqwest`] settings.
        pub fn new(base_url: impl Into<String>) -> Self {
            Self::with_client(reqwest::Client::new(), base_url)
        }

        /// Creates a client on top of a preconfigured [`reqwest::Client`],
        /// for callers that need custom timeouts or connection pooling.
        pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
            let base_url = base_url.into();
            Self {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }
        }
    }

    #[async_trait]
    impl TargetClient for HttpTargetClient {
        async fn fetch(&self, target: u64) -> Result<(), BoxError> {
            let url = format!("{}/api/recommendations/{target}", self.base_url);
            let response = self.client.post(&url).send().await?.error_for_status()?;
            response.bytes().await?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use super::*;

        #[tokio::test]
        async fn posts_to_the_recommendation_route() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/recommendations/42"))
                .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
                .expect(1)
                .mount(&server)
                .await;

            let client = HttpTargetClient::new(server.uri());
            client.fetch(42).await.unwrap();
        }

        #[tokio::test]
        async fn non_2xx_statuses_surface_as_errors() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;

            let client = HttpTargetClient::new(server.uri());
            assert!(client.fetch(7).await.is_err());
        }

        #[tokio::test]
        async fn unreachable_hosts_surface_as_errors() {
            let client = HttpTargetClient::new("http://127.0.0.1:1");
            assert!(client.fetch(1).await.is_err());
        }

        #[test]
        fn trailing_slash_is_trimmed() {
            let client = HttpTargetClient::new("http://localhost:8080/");
            assert_eq!(client.base_url, "http://localhost:8080");
        }
    }
}
