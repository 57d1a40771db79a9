//! AWS Secrets Manager resolver.
//!
//! Resolves `sigex-secret-aws://<secret-id>` tokens, where the identifier
//! is a secret name or full ARN. Credentials come from the default AWS
//! provider chain (environment, shared config, instance metadata).

use once_cell::sync::OnceCell;
use tracing::trace;

use crate::error::{Error, Result};
use crate::resolvers::Resolver;

const PREFIX: &str = "sigex-secret-aws://";

/// Resolves secrets from AWS Secrets Manager.
///
/// The SDK is async; the resolver owns a current-thread runtime and a
/// client, both created lazily on first use and reused for the rest of
/// the process.
pub struct AwsResolver {
    handle: OnceCell<(tokio::runtime::Runtime, aws_sdk_secretsmanager::Client)>,
}

impl AwsResolver {
    pub fn new() -> Self {
        Self {
            handle: OnceCell::new(),
        }
    }

    fn handle(&self) -> Result<&(tokio::runtime::Runtime, aws_sdk_secretsmanager::Client)> {
        self.handle.get_or_try_init(|| {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| Error::Backend(format!("failed to create runtime: {}", e)))?;

            let client = rt.block_on(async {
                let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                aws_sdk_secretsmanager::Client::new(&config)
            });

            Ok((rt, client))
        })
    }
}

impl Default for AwsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for AwsResolver {
    fn can_resolve(&self, value: &str) -> bool {
        value.starts_with(PREFIX)
    }

    fn resolve(&self, value: &str) -> Result<String> {
        let id = value.strip_prefix(PREFIX).unwrap_or(value);
        trace!(id, "accessing AWS secret");

        let (rt, client) = self.handle()?;
        rt.block_on(async {
            let output = client
                .get_secret_value()
                .secret_id(id)
                .send()
                .await
                .map_err(|e| Error::Backend(format!("failed to access secret {}: {}", id, e)))?;

            output
                .secret_string()
                .map(str::to_string)
                .ok_or_else(|| Error::Backend(format!("secret {} has no string payload", id)))
        })
    }
}
