//! Secret token resolution.
//!
//! Values of the form `sigex-secret-<platform>://<identifier>` are resolved
//! to plaintext by contacting the platform's secret manager; anything else
//! passes through unchanged.
//!
//! ## Backends
//!
//! - **GCP**: Google Secret Manager, with CRC32C payload verification.
//! - **AWS**: AWS Secrets Manager.
//! - **ROT13**: reversible obfuscation for tests and demos, not secrecy.
//! - **Default**: terminal pass-through, accepts everything.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Resolver` trait with a prefix test and a fetch
//! 2. Add the implementation in a new file (e.g., `vault.rs`)
//! 3. Insert it into `ResolverChain::standard()` ahead of the default

use tracing::{debug, trace};

use crate::env::EnvMap;
use crate::error::{Error, Result};

mod aws;
mod default;
mod gcp;
mod rot13;

pub use aws::AwsResolver;
pub use default::DefaultResolver;
pub use gcp::GcpResolver;
pub use rot13::Rot13Resolver;

/// Literal scheme prefix shared by every secret token.
pub const SCHEME_PREFIX: &str = "sigex-secret-";

/// A secret resolution backend.
///
/// `can_resolve` must be a cheap, pure prefix test with no I/O; `resolve`
/// is only called on values this resolver accepted and may hit the network.
pub trait Resolver {
    /// Whether this resolver handles the value.
    fn can_resolve(&self, value: &str) -> bool;

    /// Resolve the value to plaintext.
    fn resolve(&self, value: &str) -> Result<String>;
}

/// An ordered, immutable chain of resolvers.
///
/// Built once at startup. The terminal element is always the pass-through
/// [`DefaultResolver`], fixed by construction, so dispatch is total: every
/// value is handled by exactly one resolver. Earlier resolvers take
/// precedence.
pub struct ResolverChain {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverChain {
    /// The standard chain: GCP, AWS, ROT13, then pass-through.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(GcpResolver::new()),
            Box::new(AwsResolver::new()),
            Box::new(Rot13Resolver),
        ])
    }

    /// Build a chain from the given resolvers, appending the terminal
    /// pass-through resolver.
    pub fn new(mut resolvers: Vec<Box<dyn Resolver>>) -> Self {
        resolvers.push(Box::new(DefaultResolver));
        Self { resolvers }
    }

    /// Dispatch a single value through the chain.
    ///
    /// The first resolver whose `can_resolve` accepts handles the value;
    /// later resolvers are never consulted. A value carrying the token
    /// scheme that no real resolver claims is fatal rather than passed
    /// through: either the token fails to decompose (malformed) or it
    /// names a platform we do not support.
    pub fn resolve(&self, value: &str) -> Result<String> {
        let last = self.resolvers.len() - 1;
        for (i, resolver) in self.resolvers.iter().enumerate() {
            if !resolver.can_resolve(value) {
                continue;
            }
            if i == last && value.starts_with(SCHEME_PREFIX) {
                return Err(match token_platform(value) {
                    Some(platform) => Error::UnsupportedPlatform(platform.to_string()),
                    None => Error::MalformedToken(value.to_string()),
                });
            }
            return resolver.resolve(value);
        }
        unreachable!("the terminal resolver accepts every value");
    }
}

/// Extract the platform name from a token, if the value decomposes as
/// `sigex-secret-<platform>://<identifier>` with a non-empty platform.
fn token_platform(value: &str) -> Option<&str> {
    let rest = value.strip_prefix(SCHEME_PREFIX)?;
    let (platform, _identifier) = rest.split_once("://")?;
    if platform.is_empty() {
        return None;
    }
    Some(platform)
}

/// Resolve every value in the composed environment.
///
/// With `skip` set the map is returned untouched and no resolver runs;
/// this is the escape hatch for hosts without network access to secret
/// backends. Any resolver error aborts the whole pass, wrapped with the
/// offending key: a half-resolved environment is never returned.
pub fn resolve_all(chain: &ResolverChain, env: &EnvMap, skip: bool) -> Result<EnvMap> {
    if skip {
        debug!("secret resolution skipped");
        return Ok(env.clone());
    }

    let mut resolved = EnvMap::new();
    for (key, value) in env {
        trace!(key, "resolving value");
        let plaintext = chain.resolve(value).map_err(|e| e.for_key(key))?;
        resolved.insert(key.clone(), plaintext);
    }

    debug!(entries = resolved.len(), "environment resolved");
    Ok(resolved)
}
