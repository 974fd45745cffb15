// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Retry policies with URL-based classification for the FrameVault Client.
//!
//! Requests are classified into two categories with different error
//! handling rules:
//!
//! - **Api**: FrameVault JSON-RPC API calls (`*.framevault.io/api`).
//!   Authentication failures (401/403) fail fast so invalid credentials are
//!   reported immediately; timeouts, rate limiting, and server errors are
//!   retried.
//! - **FileIO**: everything else, meaning bucket endpoints (S3, GCS,
//!   CloudFront) reached through pre-signed URLs. All transient failures
//!   are retried,
//!   including 401/403, which S3 can return during eventual-consistency
//!   windows.
//!
//! Both scopes share the retry count from `FRAMEVAULT_MAX_RETRIES`
//! (default: 3). The request timeout is configured separately through
//! `FRAMEVAULT_TIMEOUT` (default: 30 seconds).

use url::Url;

/// Retry scope classification for URL-based retry policies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetryScope {
    /// FrameVault JSON-RPC API calls to `*.framevault.io/api`.
    Api,
    /// File upload/download operations to bucket endpoints.
    FileIO,
}

/// Classifies a URL to determine which retry policy to apply.
///
/// Only HTTP/HTTPS URLs whose host is `framevault.io` (or a subdomain) with
/// a path of `/api` or `/api/...` classify as [`RetryScope::Api`]; anything
/// else is [`RetryScope::FileIO`]. Proper URL parsing is used so that hosts
/// like `framevault.io.example.com` or paths embedding the API host do not
/// spoof the API classification.
///
/// # Examples
///
/// ```rust
/// use framevault_client::{RetryScope, classify_url};
///
/// assert_eq!(classify_url("https://framevault.io/api"), RetryScope::Api);
/// assert_eq!(
///     classify_url("https://stage.framevault.io/api/datasets.create_version"),
///     RetryScope::Api
/// );
/// assert_eq!(
///     classify_url("https://s3.amazonaws.com/bucket/img000.png"),
///     RetryScope::FileIO
/// );
/// ```
pub fn classify_url(url: &str) -> RetryScope {
    if let Ok(parsed) = Url::parse(url) {
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return RetryScope::FileIO;
        }

        if let Some(host) = parsed.host_str() {
            let host_matches = host == "framevault.io" || host.ends_with(".framevault.io");

            // Path must be exactly "/api" or start with "/api/" (not "/apis")
            let path = parsed.path();
            let path_is_api = path == "/api" || path.starts_with("/api/");

            if host_matches && path_is_api {
                return RetryScope::Api;
            }
        }
    }

    RetryScope::FileIO
}

/// Creates a retry policy with URL-based classification.
///
/// The policy inspects each request URL and applies the error
/// classification rules described in the module documentation. The retry
/// count is read from `FRAMEVAULT_MAX_RETRIES` (default: 3).
pub fn create_retry_policy() -> reqwest::retry::Builder {
    let max_retries = std::env::var("FRAMEVAULT_MAX_RETRIES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);

    // Wildcard host scope since the URL inspection happens in classify_fn
    reqwest::retry::for_host("*")
        .max_retries_per_request(max_retries)
        .classify_fn(|req_rep| {
            let url = req_rep.uri().to_string();

            match classify_url(&url) {
                RetryScope::Api => match req_rep.status() {
                    Some(status) => match status.as_u16() {
                        401 | 403 => req_rep.success(), // auth failures - don't retry
                        429 | 408 | 500..=599 => req_rep.retryable(),
                        _ => req_rep.success(),
                    },
                    // No status code means a transport failure (connection
                    // error, DNS, timeout), safe to retry for API calls
                    None if req_rep.error().is_some() => req_rep.retryable(),
                    None => req_rep.success(),
                },
                RetryScope::FileIO => match req_rep.status() {
                    Some(status) => match status.as_u16() {
                        429 | 408 | 500..=599 | 409 | 423 => req_rep.retryable(),
                        _ => req_rep.success(),
                    },
                    None if req_rep.error().is_some() => req_rep.retryable(),
                    None => req_rep.success(),
                },
            }
        })
}

pub fn log_retry_configuration() {
    let max_retries = std::env::var("FRAMEVAULT_MAX_RETRIES").unwrap_or_else(|_| "3".to_string());
    let timeout = std::env::var("FRAMEVAULT_TIMEOUT").unwrap_or_else(|_| "30".to_string());
    log::debug!(
        "Retry configuration - max_retries={}, timeout={}s",
        max_retries,
        timeout
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_url_api() {
        assert_eq!(classify_url("https://framevault.io/api"), RetryScope::Api);
        assert_eq!(
            classify_url("https://stage.framevault.io/api"),
            RetryScope::Api
        );
        assert_eq!(
            classify_url("https://test.framevault.io:8080/api"),
            RetryScope::Api
        );
        assert_eq!(
            classify_url("https://framevault.io/api/frames.add"),
            RetryScope::Api
        );
    }

    #[test]
    fn test_classify_url_file_io() {
        // Bucket URLs for file content
        assert_eq!(
            classify_url("https://s3.amazonaws.com/bucket/img000.png"),
            RetryScope::FileIO
        );
        assert_eq!(
            classify_url("https://storage.googleapis.com/bucket/img000.png"),
            RetryScope::FileIO
        );
        assert_eq!(classify_url("gs://bucket/prefix"), RetryScope::FileIO);

        // Non-API paths on the framevault.io domain
        assert_eq!(classify_url("https://framevault.io/docs"), RetryScope::FileIO);
        assert_eq!(
            classify_url("https://framevault.io/apis"),
            RetryScope::FileIO
        );

        // Host spoofing attempts
        assert_eq!(
            classify_url("https://framevault.io.example.com/api"),
            RetryScope::FileIO
        );
        assert_eq!(
            classify_url("https://example.com/framevault.io/api"),
            RetryScope::FileIO
        );
    }
}
