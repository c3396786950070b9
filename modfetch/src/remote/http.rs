//! HTTP-based module repository.
//!
//! Artifacts are requested with blocking GETs. The response body is handed
//! to the caller as a stream so large resources are written to the cache
//! without being buffered in memory.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};

use super::retry::RetryPolicy;
use super::{RemoteFetch, RemoteRepository};

/// Default timeout for HTTP requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Outcome of one HTTP attempt, before retry handling.
enum Attempt {
    Done(RemoteFetch),
    Retryable(String),
}

/// Repository reached over HTTP(S).
#[derive(Debug)]
pub struct HttpRepository {
    client: Client,
    root_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpRepository {
    /// Create a repository rooted at `root_url`.
    ///
    /// `root_url` is used as a plain string prefix; a trailing `/` is added
    /// when missing.
    pub fn new(
        root_url: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("modfetch/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut root_url = root_url.into();
        if !root_url.ends_with('/') {
            root_url.push('/');
        }

        Ok(Self {
            client,
            root_url,
            timeout,
            retry,
        })
    }

    /// Create a repository with the default timeout and retry policy.
    pub fn with_url(root_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::new(
            root_url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            RetryPolicy::default(),
        )
    }

    /// Repository root URL.
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retry policy.
    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    /// Full target URL for a resource.
    ///
    /// `%`, `?` and `#` in the prefix or resource are percent-encoded so the
    /// request path is exactly the declared one.
    pub fn target(&self, remote_prefix: &str, resource: &str) -> String {
        let mut target = self.root_url.clone();
        encode_path_into(&mut target, remote_prefix);
        encode_path_into(&mut target, resource);
        target
    }

    fn attempt(&self, url: &Url) -> Attempt {
        let response = match self.client.get(url.clone()).send() {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Attempt::Retryable(format!(
                    "request to {} timed out after {}s",
                    url,
                    self.timeout.as_secs()
                ));
            }
            Err(e) => return Attempt::Retryable(e.to_string()),
        };

        let status = response.status();
        if status.is_success() {
            return Attempt::Done(RemoteFetch::Found(Box::new(response)));
        }

        match status {
            StatusCode::NOT_FOUND | StatusCode::GONE => Attempt::Done(RemoteFetch::NotFound),
            s if s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS => {
                Attempt::Retryable(format!("GET request failed with status {}", s))
            }
            s => Attempt::Done(RemoteFetch::Unavailable(format!(
                "GET request failed with status {}",
                s
            ))),
        }
    }
}

impl RemoteRepository for HttpRepository {
    fn fetch(&self, remote_prefix: &str, resource: &str) -> RemoteFetch {
        let target = self.target(remote_prefix, resource);
        let url = match Url::parse(&target) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(url = %target, error = %e, "Cannot open stream");
                return RemoteFetch::Unavailable(format!("malformed URL {}: {}", target, e));
            }
        };

        let mut last_error = String::new();
        for attempt in 0..self.retry.attempts() {
            if attempt > 0 {
                let delay = self.retry.backoff(attempt);
                tracing::debug!(url = %url, attempt, delay_ms = delay.as_millis() as u64, "Retrying fetch");
                thread::sleep(delay);
            }

            tracing::debug!(url = %url, "Fetching resource");
            match self.attempt(&url) {
                Attempt::Done(outcome) => return outcome,
                Attempt::Retryable(reason) => {
                    tracing::debug!(url = %url, reason = %reason, "Cannot open stream");
                    last_error = reason;
                }
            }
        }

        RemoteFetch::Unavailable(last_error)
    }

    fn describe(&self) -> String {
        format!("http repository (url: {})", self.root_url)
    }
}

/// Append `path` to `out`, escaping characters that would end the URL path
/// or start an escape sequence.
fn encode_path_into(out: &mut String, path: &str) {
    for c in path.chars() {
        match c {
            '%' => out.push_str("%25"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository(url: &str) -> HttpRepository {
        HttpRepository::new(url, Duration::from_secs(5), RetryPolicy::none()).unwrap()
    }

    #[test]
    fn test_with_url_defaults() {
        let repo = HttpRepository::with_url("http://localhost/modules/").unwrap();
        assert_eq!(repo.timeout().as_secs(), DEFAULT_TIMEOUT_SECS);
        assert_eq!(repo.retry(), RetryPolicy::default());
    }

    #[test]
    fn test_root_url_gets_trailing_slash() {
        let repo = repository("http://localhost/modules");
        assert_eq!(repo.root_url(), "http://localhost/modules/");
    }

    #[test]
    fn test_target_composition() {
        let repo = repository("http://localhost/modules/");
        assert_eq!(
            repo.target("trunk/org/example/foo/main/", "foo.jar"),
            "http://localhost/modules/trunk/org/example/foo/main/foo.jar"
        );
    }

    #[test]
    fn test_target_escapes_query_and_fragment() {
        let repo = repository("http://localhost/modules/");
        assert_eq!(
            repo.target("trunk/a/main/", "lib#1?.jar"),
            "http://localhost/modules/trunk/a/main/lib%231%3F.jar"
        );
        assert_eq!(
            repo.target("trunk/a/main/", "100%.jar"),
            "http://localhost/modules/trunk/a/main/100%25.jar"
        );
    }

    #[test]
    fn test_malformed_url_is_unavailable() {
        let repo = repository("not a url");
        let outcome = repo.fetch("trunk/a/main/", "module.xml");
        assert!(matches!(outcome, RemoteFetch::Unavailable(_)));
    }

    #[test]
    fn test_describe_includes_url() {
        let repo = repository("http://localhost/modules/");
        assert_eq!(
            repo.describe(),
            "http repository (url: http://localhost/modules/)"
        );
    }
}
