//! Terminal pass-through resolver.

use crate::error::Result;
use crate::resolvers::Resolver;

/// Accepts every value and returns it unchanged. Placed last in the chain
/// by construction, which makes dispatch total.
pub struct DefaultResolver;

impl Resolver for DefaultResolver {
    fn can_resolve(&self, _value: &str) -> bool {
        true
    }

    fn resolve(&self, value: &str) -> Result<String> {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accepts_and_passes_through() {
        let r = DefaultResolver;

        assert!(r.can_resolve("anything"));
        assert!(r.can_resolve(""));
        assert_eq!(r.resolve("anything").unwrap(), "anything");
    }
}
