//! Per-route access decisions
//!
//! The reference deployment is maximally permissive, but the table keeps a
//! required-authority variant so individual routes can be tightened without
//! touching the enforcement mechanism.

use crate::auth::tokens::RequestPrincipal;
use crate::error::{AllServeError, Result};

/// What a route requires before its handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone, authenticated or not
    Public,
    /// Any authenticated principal
    Authenticated,
    /// An authenticated principal carrying this exact authority string
    RequiresAuthority(&'static str),
}

/// Decision table consulted before request handling.
#[derive(Debug, Default)]
pub struct AccessPolicy {
    rules: Vec<(&'static str, RouteAccess)>,
}

impl AccessPolicy {
    /// The reference policy: token endpoints and login routes are open,
    /// everything else passes for any request, authenticated or anonymous.
    pub fn permissive() -> Self {
        Self {
            rules: vec![
                ("/oauth2/", RouteAccess::Public),
                ("/login", RouteAccess::Public),
                ("/health", RouteAccess::Public),
            ],
        }
    }

    /// Add a rule for a path and everything below it. First matching rule
    /// wins.
    pub fn with_rule(mut self, prefix: &'static str, access: RouteAccess) -> Self {
        self.rules.push((prefix, access));
        self
    }

    fn access_for(&self, path: &str) -> RouteAccess {
        for (prefix, access) in &self.rules {
            if rule_matches(prefix, path) {
                return access.clone();
            }
        }
        // Unlisted routes: the reference deployment lets everything through.
        RouteAccess::Public
    }

    /// Allow or reject a request for `path` carrying an optional principal.
    ///
    /// An unauthenticated request to a guarded route fails as an
    /// authentication problem; an authenticated one lacking the required
    /// authority fails as `AccessDenied`, a distinct response status.
    pub fn decide(&self, path: &str, principal: Option<&RequestPrincipal>) -> Result<()> {
        match self.access_for(path) {
            RouteAccess::Public => Ok(()),
            RouteAccess::Authenticated => match principal {
                Some(_) => Ok(()),
                None => Err(AllServeError::InvalidCredentials),
            },
            RouteAccess::RequiresAuthority(required) => match principal {
                None => Err(AllServeError::InvalidCredentials),
                Some(p) if p.authority() == Some(required) => Ok(()),
                Some(_) => Err(AllServeError::AccessDenied),
            },
        }
    }
}

/// A rule covers its own path and everything below it, never a sibling that
/// merely shares the leading characters (`/login` must not cover
/// `/loginaudit`).
fn rule_matches(rule: &str, path: &str) -> bool {
    match rule.strip_suffix('/') {
        Some(bare) => path == bare || path.starts_with(rule),
        None => {
            path == rule
                || path
                    .strip_prefix(rule)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_stop_at_path_segment_boundaries() {
        assert!(rule_matches("/login", "/login"));
        assert!(rule_matches("/login", "/login/federated"));
        assert!(!rule_matches("/login", "/loginaudit"));

        assert!(rule_matches("/oauth2/", "/oauth2"));
        assert!(rule_matches("/oauth2/", "/oauth2/token"));
        assert!(!rule_matches("/oauth2/", "/oauth2x"));
    }
}
