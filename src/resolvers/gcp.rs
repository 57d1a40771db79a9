//! GCP Secret Manager resolver.
//!
//! Resolves `sigex-secret-gcp://<resource-name>` tokens, where the resource
//! name is a fully qualified secret version, e.g.
//! `projects/my-project/secrets/my-secret/versions/latest`.
//!
//! ## Authentication
//!
//! The access token is taken from `GOOGLE_OAUTH_ACCESS_TOKEN` when set,
//! otherwise from `gcloud auth print-access-token`, so the resolver works
//! with both service-account and developer-workstation credentials.
//!
//! ## Integrity
//!
//! The payload is verified against the CRC32C checksum (Castagnoli) the
//! API returns alongside it. A mismatch is data corruption, reported as an
//! integrity error and never as the payload.

use std::process::{Command, Stdio};

use base64::Engine;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing::trace;
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::resolvers::Resolver;

const PREFIX: &str = "sigex-secret-gcp://";
const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com";

/// Resolves secrets from Google Secret Manager over its REST surface.
///
/// The HTTP client is created lazily on first use and lives for the rest
/// of the process.
pub struct GcpResolver {
    endpoint: String,
    access_token: Option<String>,
    client: OnceCell<reqwest::blocking::Client>,
}

/// `AccessSecretVersion` response body (proto3 JSON mapping: bytes as
/// base64, int64 as decimal string).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessSecretVersionResponse {
    payload: SecretPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretPayload {
    data: String,
    data_crc32c: String,
}

impl GcpResolver {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            client: OnceCell::new(),
        }
    }

    /// Point the resolver at a non-default API endpoint (private Google
    /// access, emulators, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a fixed access token instead of ambient credentials.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn client(&self) -> Result<&reqwest::blocking::Client> {
        self.client
            .get_or_try_init(|| reqwest::blocking::Client::builder().build().map_err(Error::from))
    }

    /// Obtain a bearer token for the Secret Manager API.
    fn token(&self) -> Result<Zeroizing<String>> {
        if let Some(token) = &self.access_token {
            return Ok(Zeroizing::new(token.clone()));
        }
        if let Ok(token) = std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN") {
            return Ok(Zeroizing::new(token));
        }

        let output = Command::new("gcloud")
            .args(["auth", "print-access-token"])
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|_| {
                Error::Backend(
                    "no GCP credentials: set GOOGLE_OAUTH_ACCESS_TOKEN or install the gcloud CLI"
                        .to_string(),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Backend(format!(
                "gcloud auth print-access-token failed: {}",
                stderr.trim()
            )));
        }

        let token = String::from_utf8(output.stdout)
            .map_err(|_| Error::Backend("gcloud returned a non-UTF-8 token".to_string()))?;
        Ok(Zeroizing::new(token.trim().to_string()))
    }
}

impl Default for GcpResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for GcpResolver {
    fn can_resolve(&self, value: &str) -> bool {
        value.starts_with(PREFIX)
    }

    fn resolve(&self, value: &str) -> Result<String> {
        let name = value.strip_prefix(PREFIX).unwrap_or(value);
        trace!(name, "accessing GCP secret version");

        let token = self.token()?;
        let url = format!("{}/v1/{}:access", self.endpoint, name);

        let response = self.client()?.get(&url).bearer_auth(token.as_str()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Backend(format!(
                "failed to access secret version {}: HTTP {}",
                name, status
            )));
        }

        let body: AccessSecretVersionResponse = response.json()?;

        let data = base64::engine::general_purpose::STANDARD
            .decode(&body.payload.data)
            .map_err(|e| Error::Backend(format!("invalid base64 payload for {}: {}", name, e)))?;

        // Verify the data checksum before trusting the payload.
        let expected: i64 = body
            .payload
            .data_crc32c
            .parse()
            .map_err(|_| Error::Backend(format!("invalid dataCrc32c for {}", name)))?;
        let actual = i64::from(crc32c::crc32c(&data));
        if actual != expected {
            return Err(Error::Integrity(name.to_string()));
        }

        let plaintext = String::from_utf8(data)
            .map_err(|_| Error::Backend(format!("secret payload for {} is not UTF-8", name)))?;

        trace!(name, plaintext_len = plaintext.len(), "secret version accessed");
        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn resolver_for(server: &MockServer) -> GcpResolver {
        GcpResolver::new()
            .with_endpoint(server.base_url())
            .with_access_token("test-token")
    }

    #[test]
    fn test_gcp_prefix_detection() {
        let r = GcpResolver::new();

        assert!(r.can_resolve("sigex-secret-gcp://projects/p/secrets/s/versions/1"));
        assert!(!r.can_resolve("sigex-secret-aws://id"));
        assert!(!r.can_resolve("plain"));
    }

    #[test]
    fn test_gcp_resolves_and_verifies_checksum() {
        let server = MockServer::start();
        let payload = b"s3cr3t-value";
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/projects/p/secrets/s/versions/latest:access")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!({
                "name": "projects/p/secrets/s/versions/1",
                "payload": {
                    "data": base64::engine::general_purpose::STANDARD.encode(payload),
                    "dataCrc32c": crc32c::crc32c(payload).to_string(),
                }
            }));
        });

        let r = resolver_for(&server);
        let out = r
            .resolve("sigex-secret-gcp://projects/p/secrets/s/versions/latest")
            .unwrap();

        mock.assert();
        assert_eq!(out, "s3cr3t-value");
    }

    #[test]
    fn test_gcp_checksum_mismatch_is_integrity_error() {
        let server = MockServer::start();
        let payload = b"corrupted-on-the-wire";
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/projects/p/secrets/s/versions/1:access");
            then.status(200).json_body(json!({
                "payload": {
                    "data": base64::engine::general_purpose::STANDARD.encode(payload),
                    "dataCrc32c": (crc32c::crc32c(payload) ^ 1).to_string(),
                }
            }));
        });

        let r = resolver_for(&server);
        let err = r
            .resolve("sigex-secret-gcp://projects/p/secrets/s/versions/1")
            .unwrap_err();

        // The corrupted payload must never leak, not even in the error.
        assert!(matches!(err, Error::Integrity(_)));
        assert!(!err.to_string().contains("corrupted-on-the-wire"));
    }

    #[test]
    fn test_gcp_http_error_is_backend_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/projects/p/secrets/denied/versions/1:access");
            then.status(403).body("permission denied");
        });

        let r = resolver_for(&server);
        let err = r
            .resolve("sigex-secret-gcp://projects/p/secrets/denied/versions/1")
            .unwrap_err();

        assert!(matches!(err, Error::Backend(_)));
        assert!(err.to_string().contains("403"));
    }
}
