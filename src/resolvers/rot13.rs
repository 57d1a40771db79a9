//! ROT13 resolver.
//!
//! Reversible obfuscation for tests and demos. This is not secrecy: the
//! rotation is fixed and self-inverse.

use crate::error::Result;
use crate::resolvers::Resolver;

const PREFIX: &str = "sigex-secret-rot13://";

/// Decodes `sigex-secret-rot13://` tokens with a 13-place Caesar rotation.
pub struct Rot13Resolver;

impl Resolver for Rot13Resolver {
    fn can_resolve(&self, value: &str) -> bool {
        value.starts_with(PREFIX)
    }

    fn resolve(&self, value: &str) -> Result<String> {
        let encoded = value.strip_prefix(PREFIX).unwrap_or(value);
        Ok(encoded.chars().map(rot13).collect())
    }
}

/// Rotate ASCII letters 13 places, preserving case; leave everything else.
fn rot13(c: char) -> char {
    match c {
        'a'..='m' | 'A'..='M' => ((c as u8) + 13) as char,
        'n'..='z' | 'N'..='Z' => ((c as u8) - 13) as char,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rot13_decodes_token() {
        let r = Rot13Resolver;

        assert!(r.can_resolve("sigex-secret-rot13://uryyb"));
        assert_eq!(r.resolve("sigex-secret-rot13://uryyb").unwrap(), "hello");
    }

    #[test]
    fn test_rot13_is_self_inverse() {
        let original = "The Quick Brown Fox Jumps Over 13 Lazy Dogs!";
        let once: String = original.chars().map(rot13).collect();
        let twice: String = once.chars().map(rot13).collect();

        assert_ne!(once, original);
        assert_eq!(twice, original);
    }

    #[test]
    fn test_rot13_preserves_case_and_non_letters() {
        assert_eq!(rot13('a'), 'n');
        assert_eq!(rot13('N'), 'A');
        assert_eq!(rot13('5'), '5');
        assert_eq!(rot13('-'), '-');
        assert_eq!(rot13('é'), 'é');
    }

    #[test]
    fn test_rot13_rejects_other_schemes() {
        let r = Rot13Resolver;

        assert!(!r.can_resolve("sigex-secret-gcp://x"));
        assert!(!r.can_resolve("plain value"));
    }
}
