//! HTTP implementation of the content-transport boundary.
//!
//! [`HttpTransport`] satisfies view content fetches over HTTP: the request
//! runs on the shared runtime (see [`crate::runtime`]) and the completion
//! callback is invoked from the worker that finished it. Non-success status
//! codes settle as [`LoadError::HttpStatus`]; URLs that fail to parse are
//! rejected before any request is issued.

use std::time::Duration;

use trellis::{ContentTransport, FetchCallback, LoadError};
use url::Url;

use crate::runtime;

/// Configuration for the HTTP transport.
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Request timeout.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: Some(format!("Trellis/{} (Rust)", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Builder for [`HttpTransport`].
pub struct HttpTransportBuilder {
    config: HttpTransportConfig,
}

impl HttpTransportBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: HttpTransportConfig::default(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Disable the request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<HttpTransport, LoadError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(ref user_agent) = self.config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| LoadError::Request(err.to_string()))?;

        Ok(HttpTransport {
            client,
            config: self.config,
        })
    }
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP content transport backed by reqwest.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a transport with default configuration.
    pub fn new() -> Self {
        HttpTransportBuilder::new()
            .build()
            .expect("Failed to create HTTP transport with default configuration")
    }

    /// Create a builder for custom configuration.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    /// The transport's configuration.
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    async fn fetch_text(client: reqwest::Client, url: String) -> Result<String, LoadError> {
        let response = client.get(&url).send().await.map_err(map_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(map_error)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTransport for HttpTransport {
    fn fetch(&self, url: &str, done: FetchCallback) {
        if let Err(err) = Url::parse(url) {
            done(Err(LoadError::InvalidUrl(err.to_string())));
            return;
        }

        tracing::debug!(target: "trellis_net::transport", url, "fetching content");
        let client = self.client.clone();
        let url = url.to_owned();
        runtime::spawn(async move {
            let result = Self::fetch_text(client, url.clone()).await;
            if let Err(ref err) = result {
                tracing::debug!(target: "trellis_net::transport", url = %url, error = %err, "fetch settled with error");
            }
            done(result);
        });
    }
}

fn map_error(err: reqwest::Error) -> LoadError {
    if err.is_timeout() {
        LoadError::Timeout
    } else {
        LoadError::Request(err.to_string())
    }
}
