//! Blocking HTTP GET client with the status retry policy baked in.
//!
//! One `ThumbClient` is built at startup and borrowed by the fetcher for every
//! request. Bodies are buffered in memory; nothing reaches disk until the
//! final response is a success.

use crate::config::ThumbgenConfig;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use std::time::Duration;

/// Transfer options applied to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub user_agent: String,
    /// Whole-request timeout (None = no limit).
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: concat!("thumbgen/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout: None,
            connect_timeout: None,
        }
    }
}

/// Final successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// Requests made, including retries.
    pub attempts: u32,
}

#[derive(Debug, Clone)]
pub struct ThumbClient {
    policy: RetryPolicy,
    options: ClientOptions,
}

impl ThumbClient {
    pub fn new(policy: RetryPolicy, options: ClientOptions) -> Self {
        Self { policy, options }
    }

    pub fn from_config(cfg: &ThumbgenConfig) -> Self {
        let policy = cfg
            .retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default();
        let options = ClientOptions {
            user_agent: cfg.user_agent.clone(),
            request_timeout: cfg.request_timeout_secs.map(Duration::from_secs),
            connect_timeout: cfg.connect_timeout_secs.map(Duration::from_secs),
        };
        Self::new(policy, options)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `url`, retrying gateway errors per the policy. Any final non-2xx is an error.
    pub fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let out = run_with_retry(&self.policy, || self.get_once(url))?;
        let (status, body) = out.value;
        Ok(HttpResponse {
            status,
            body,
            attempts: out.attempts,
        })
    }

    fn get_once(&self, url: &str) -> Result<(u16, Vec<u8>), FetchError> {
        let transport = |source: curl::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(transport)?;
        easy.get(true).map_err(transport)?;
        easy.follow_location(true).map_err(transport)?;
        easy.max_redirections(10).map_err(transport)?;
        easy.useragent(&self.options.user_agent).map_err(transport)?;
        if let Some(t) = self.options.connect_timeout {
            easy.connect_timeout(t).map_err(transport)?;
        }
        if let Some(t) = self.options.request_timeout {
            easy.timeout(t).map_err(transport)?;
        }

        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(transport)?;
            transfer.perform().map_err(transport)?;
        }

        let code = easy.response_code().map_err(transport)?;
        let status = u16::try_from(code).unwrap_or(0);
        tracing::debug!(url, status, bytes = body.len(), "GET");
        if !(200..300).contains(&status) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok((status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_without_retry_section_uses_defaults() {
        let mut cfg = ThumbgenConfig::default();
        cfg.retry = None;
        cfg.request_timeout_secs = Some(30);
        let client = ThumbClient::from_config(&cfg);
        assert_eq!(client.policy(), &RetryPolicy::default());
        assert_eq!(client.options.request_timeout, Some(Duration::from_secs(30)));
        assert!(client.options.connect_timeout.is_none());
    }

    #[test]
    fn connection_refused_is_transport_error_without_retry() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let client = ThumbClient::new(RetryPolicy::default(), ClientOptions::default());
        let started = std::time::Instant::now();
        let err = client
            .get(&format!("http://127.0.0.1:{}/styles/IHM/static/x.png", port))
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        // Default backoff would sleep 2s+ if connection errors were retried.
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
