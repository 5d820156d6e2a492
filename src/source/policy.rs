//! URL validation against scheme and allow/block lists.

use crate::config::SecurityConfig;

/// Decides whether a URL may be fetched.
pub trait SourceValidator: Send + Sync {
    fn validate(&self, url: &str) -> bool;
}

/// Validator built from the security configuration.
///
/// A URL is accepted when its scheme is allowed, it matches at least one
/// allowed pattern (or no allowed patterns are configured), and it matches
/// no blocked pattern.
#[derive(Debug, Clone, Default)]
pub struct SourcePolicy {
    allowed_schemes: Vec<String>,
    allowed_sources: Vec<String>,
    blocked_sources: Vec<String>,
}

impl SourcePolicy {
    pub fn new(
        allowed_schemes: Vec<String>,
        allowed_sources: Vec<String>,
        blocked_sources: Vec<String>,
    ) -> Self {
        Self {
            allowed_schemes: allowed_schemes
                .into_iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
            allowed_sources,
            blocked_sources,
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.allowed_schemes.clone(),
            config.allowed_sources.clone(),
            config.blocked_sources.clone(),
        )
    }

    fn scheme_allowed(&self, url: &str) -> bool {
        if self.allowed_schemes.is_empty() {
            return true;
        }
        match url.split_once("://") {
            Some((scheme, rest)) if !rest.is_empty() => {
                let scheme = scheme.to_ascii_lowercase();
                self.allowed_schemes.iter().any(|s| *s == scheme)
            }
            _ => false,
        }
    }
}

impl SourceValidator for SourcePolicy {
    fn validate(&self, url: &str) -> bool {
        if !self.scheme_allowed(url) {
            return false;
        }

        let allowed = self.allowed_sources.is_empty()
            || self
                .allowed_sources
                .iter()
                .any(|pattern| glob_match(pattern, url));

        allowed
            && !self
                .blocked_sources
                .iter()
                .any(|pattern| glob_match(pattern, url))
    }
}

/// Simple glob matching: `*` alone, a `prefix*`, a `*suffix`, or an exact
/// string.
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "**" || pattern == "*" {
        return true;
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        return text.ends_with(suffix);
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return text.starts_with(prefix);
    }

    pattern == text
}
