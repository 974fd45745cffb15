// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    Error,
    api::{VersionCreateParams, VersionCreateResult},
    dataset::DatasetVersion,
    retry::{create_retry_policy, log_retry_configuration},
};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use log::{Level, debug, error, log_enabled, trace};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{collections::HashMap, time::Duration};

/// Progress information for long-running operations.
///
/// Tracks the cumulative count of completed items against the total so
/// applications can render progress bars while frames are submitted.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Current number of completed items.
    pub current: usize,
    /// Total number of items to process.
    pub total: usize,
}

#[derive(Serialize)]
struct RpcRequest<Params> {
    id: u64,
    jsonrpc: String,
    method: String,
    params: Option<Params>,
}

impl<T> Default for RpcRequest<T> {
    fn default() -> Self {
        RpcRequest {
            id: 0,
            jsonrpc: "2.0".to_string(),
            method: "".to_string(),
            params: None,
        }
    }
}

#[derive(Deserialize)]
struct RpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse<RpcResult> {
    #[allow(dead_code)]
    id: String,
    #[allow(dead_code)]
    jsonrpc: String,
    error: Option<RpcError>,
    result: Option<RpcResult>,
}

/// Client for the FrameVault dataset-versioning service.
///
/// The client handles the connection to the FrameVault server and manages
/// authentication and JSON-RPC calls. It exposes the three operations this
/// crate relies on: querying the server version, creating a dataset version,
/// and (through the [`DatasetVersion`] handle it returns) adding frame
/// batches and committing the version.
///
/// Storage, content ingestion, and versioning semantics are owned by the
/// service; the client only submits frame records pointing at sources under
/// a local root directory.
///
/// # Examples
///
/// ```rust,no_run
/// use framevault_client::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new()?.with_server("stage");
/// let version = client.create_version("ffhq", "1.0").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    url: String,
    token: String,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url)
            .field("has_token", &!self.token.is_empty())
            .finish()
    }
}

impl Client {
    /// Create a new client for the default saas server.
    ///
    /// The token is sourced from the `FRAMEVAULT_TOKEN` environment variable
    /// or, failing that, the platform config file
    /// (e.g. `~/.config/FrameVault/token` on Linux). Use
    /// [`with_token`][Self::with_token] to override it and
    /// [`with_server`][Self::with_server] to target another server instance.
    pub fn new() -> Result<Self, Error> {
        log_retry_configuration();

        let timeout_secs = std::env::var("FRAMEVAULT_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        // Single HTTP client with the URL-classified retry policy: API
        // calls fail fast on auth errors, bucket endpoints retry all
        // transient failures. See retry.rs.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .retry(create_retry_policy())
            .build()?;

        let token = match std::env::var("FRAMEVAULT_TOKEN") {
            Ok(token) => token,
            Err(_) => Self::token_from_config_file().unwrap_or_default(),
        };

        Ok(Client {
            http,
            url: "https://framevault.io".to_string(),
            token,
        })
    }

    fn token_from_config_file() -> Option<String> {
        let path = ProjectDirs::from("io", "FrameVault", "FrameVault")?
            .config_dir()
            .join("token");
        match std::fs::read_to_string(&path) {
            Ok(token) if !token.trim().is_empty() => {
                debug!("Loaded token from {:?}", path);
                Some(token.trim().to_string())
            }
            _ => None,
        }
    }

    /// Returns a new client connected to the specified server instance.
    ///
    /// The server parameter is an instance name that maps to a URL:
    /// - `""` or `"saas"` → `https://framevault.io`
    /// - `"{name}"` → `https://{name}.framevault.io`
    pub fn with_server(&self, server: &str) -> Self {
        let url = match server {
            "" | "saas" => "https://framevault.io".to_string(),
            name => format!("https://{}.framevault.io", name),
        };

        Client {
            url,
            ..self.clone()
        }
    }

    /// Returns a new client authenticated with the provided token.
    ///
    /// The token must be JWT-shaped; the expiration claim is validated so an
    /// expired token fails here instead of on the first RPC.
    pub fn with_token(&self, token: &str) -> Result<Self, Error> {
        if token.is_empty() {
            return Err(Error::EmptyToken);
        }

        let client = Client {
            token: token.to_string(),
            ..self.clone()
        };

        if client.token_expiration()? <= Utc::now() {
            return Err(Error::TokenExpired);
        }

        Ok(client)
    }

    /// Returns the URL of the FrameVault server for the current client.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Return the token used to authenticate the client with the server.
    pub fn token(&self) -> &str {
        &self.token
    }

    fn token_field(&self, field: &str) -> Result<serde_json::Value, Error> {
        if self.token.is_empty() {
            return Err(Error::EmptyToken);
        }

        let token_parts: Vec<&str> = self.token.split('.').collect();
        if token_parts.len() != 3 {
            return Err(Error::InvalidToken);
        }

        let decoded = base64::engine::general_purpose::STANDARD_NO_PAD
            .decode(token_parts[1])
            .map_err(|_| Error::InvalidToken)?;
        let payload: HashMap<String, serde_json::Value> = serde_json::from_slice(&decoded)?;
        match payload.get(field) {
            Some(value) => Ok(value.to_owned()),
            None => Err(Error::InvalidToken),
        }
    }

    /// Returns the expiration time encoded in the authentication token.
    pub fn token_expiration(&self) -> Result<DateTime<Utc>, Error> {
        let exp = self.token_field("exp")?;
        let secs = exp.as_i64().ok_or(Error::InvalidToken)?;
        DateTime::from_timestamp(secs, 0).ok_or(Error::InvalidToken)
    }

    /// Return the version of the FrameVault server for the current client
    /// connection.
    pub async fn version(&self) -> Result<String, Error> {
        let version: HashMap<String, String> = self
            .rpc_without_auth::<(), HashMap<String, String>>("version".to_owned(), None)
            .await?;
        let version = version.get("version").ok_or(Error::InvalidResponse)?;
        Ok(version.to_owned())
    }

    /// Create a new dataset version with the provided dataset and version
    /// names, returning the [`DatasetVersion`] handle used to add frame
    /// batches and commit.
    pub async fn create_version(
        &self,
        dataset_name: &str,
        version_name: &str,
    ) -> Result<DatasetVersion, Error> {
        let params = VersionCreateParams {
            dataset_name: dataset_name.to_owned(),
            version_name: version_name.to_owned(),
        };
        let result: VersionCreateResult = self
            .rpc("datasets.create_version".to_owned(), Some(params))
            .await?;

        debug!(
            "created dataset version {} for {}:{}",
            result.version_id, dataset_name, version_name
        );

        Ok(DatasetVersion::new(self.clone(), result.version_id))
    }

    /// Perform a JSON-RPC method call against the FrameVault server.
    ///
    /// NOTE: This API would generally not be called directly and instead
    /// users should use the higher-level methods provided by the client.
    pub async fn rpc<Params, RpcResult>(
        &self,
        method: String,
        params: Option<Params>,
    ) -> Result<RpcResult, Error>
    where
        Params: Serialize,
        RpcResult: DeserializeOwned,
    {
        if self.token.is_empty() {
            return Err(Error::EmptyToken);
        }
        if self.token_expiration()? <= Utc::now() {
            return Err(Error::TokenExpired);
        }

        self.rpc_without_auth(method, params).await
    }

    async fn rpc_without_auth<Params, RpcResult>(
        &self,
        method: String,
        params: Option<Params>,
    ) -> Result<RpcResult, Error>
    where
        Params: Serialize,
        RpcResult: DeserializeOwned,
    {
        let request = RpcRequest {
            method,
            params,
            ..Default::default()
        };

        if log_enabled!(Level::Trace) {
            trace!(
                "RPC Request: {}",
                serde_json::ser::to_string_pretty(&request)?
            );
        }

        let url = format!("{}/api", self.url);

        let res = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .header("User-Agent", "FrameVault Client")
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&request)
            .send()
            .await?;

        self.process_rpc_response(res).await
    }

    async fn process_rpc_response<RpcResult>(
        &self,
        res: reqwest::Response,
    ) -> Result<RpcResult, Error>
    where
        RpcResult: DeserializeOwned,
    {
        let body = res.bytes().await?;

        if log_enabled!(Level::Trace) {
            trace!("RPC Response: {}", String::from_utf8_lossy(&body));
        }

        let response: RpcResponse<RpcResult> = match serde_json::from_slice(&body) {
            Ok(response) => response,
            Err(err) => {
                error!("Invalid JSON Response: {}", String::from_utf8_lossy(&body));
                return Err(err.into());
            }
        };

        if let Some(error) = response.error {
            Err(Error::RpcError(error.code, error.message))
        } else if let Some(result) = response.result {
            Ok(result)
        } else {
            Err(Error::InvalidResponse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn make_token(payload: serde_json::Value) -> String {
        let engine = base64::engine::general_purpose::STANDARD_NO_PAD;
        let header = engine.encode(b"{}");
        let payload = engine.encode(payload.to_string().as_bytes());
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_with_server() -> Result<(), Error> {
        let client = Client::new()?;
        assert_eq!(client.with_server("").url(), "https://framevault.io");
        assert_eq!(client.with_server("saas").url(), "https://framevault.io");
        assert_eq!(
            client.with_server("stage").url(),
            "https://stage.framevault.io"
        );
        Ok(())
    }

    #[test]
    fn test_with_token_accepts_unexpired() -> Result<(), Error> {
        // 2100-01-01T00:00:00Z
        let token = make_token(serde_json::json!({ "exp": 4102444800i64 }));
        let client = Client::new()?.with_token(&token)?;
        assert_eq!(client.token(), token);
        assert!(client.token_expiration()? > Utc::now());
        Ok(())
    }

    #[test]
    fn test_with_token_rejects_expired() -> Result<(), Error> {
        let token = make_token(serde_json::json!({ "exp": 1000000i64 }));
        let client = Client::new()?;
        assert!(matches!(
            client.with_token(&token),
            Err(Error::TokenExpired)
        ));
        Ok(())
    }

    #[test]
    fn test_with_token_rejects_malformed() -> Result<(), Error> {
        let client = Client::new()?;
        assert!(matches!(client.with_token(""), Err(Error::EmptyToken)));
        assert!(matches!(
            client.with_token("not-a-jwt"),
            Err(Error::InvalidToken)
        ));
        Ok(())
    }

    #[test]
    fn test_token_field_missing_claim() -> Result<(), Error> {
        let token = make_token(serde_json::json!({ "user": "test" }));
        let client = Client {
            token,
            ..Client::new()?
        };
        assert!(matches!(
            client.token_expiration(),
            Err(Error::InvalidToken)
        ));
        Ok(())
    }
}
