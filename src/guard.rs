//! Route table and navigation guard.
//!
//! DESIGN
//! ======
//! The guard is a pure function of the target route's `requires_auth` flag
//! and the current [`SessionState`]. It never triggers a status check;
//! callers refresh the session (e.g. at bootstrap) when freshness matters.
//! [`Navigator`] runs the guard before each navigation and tracks the
//! resulting location.

use std::collections::HashMap;

use crate::session::SessionState;

pub const LOGIN_ROUTE: &str = "/login";

/// Outcome of a single navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(String),
}

/// Core guard decision.
#[must_use]
pub fn guard(requires_auth: bool, authenticated: bool) -> Navigation {
    if requires_auth && !authenticated {
        Navigation::Redirect(LOGIN_ROUTE.to_owned())
    } else {
        Navigation::Allow
    }
}

// =============================================================================
// ROUTES
// =============================================================================

/// A named route. Pattern segments starting with `:` capture a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub pattern: &'static str,
    pub requires_auth: bool,
}

impl Route {
    #[must_use]
    pub const fn public(name: &'static str, pattern: &'static str) -> Self {
        Self { name, pattern, requires_auth: false }
    }

    #[must_use]
    pub const fn protected(name: &'static str, pattern: &'static str) -> Self {
        Self { name, pattern, requires_auth: true }
    }

    /// Match `path` (query string ignored) against this route's pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let want = segments(self.pattern);
        let got = segments(path);
        if want.len() != got.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (pattern, actual) in want.iter().zip(got.iter()) {
            if let Some(name) = pattern.strip_prefix(':') {
                params.insert(name.to_owned(), (*actual).to_owned());
            } else if pattern != actual {
                return None;
            }
        }
        Some(params)
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// A resolved route with its captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    /// The forum's routes. None of them require authentication.
    fn default() -> Self {
        Self {
            routes: vec![
                Route::public("Home", "/"),
                Route::public("Login", LOGIN_ROUTE),
                Route::public("Register", "/register"),
                Route::public("PostDetail", "/post/:id"),
            ],
        }
    }
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First route whose pattern matches `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .find_map(|route| route.matches(path).map(|params| RouteMatch { route, params }))
    }

    /// Guard decision for navigating to `path`. Unknown paths are allowed.
    #[must_use]
    pub fn check(&self, path: &str, session: &SessionState) -> Navigation {
        let requires_auth = self.resolve(path).is_some_and(|m| m.route.requires_auth);
        guard(requires_auth, session.is_authenticated())
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Current location plus the guard that gates moving away from it.
#[derive(Debug, Clone)]
pub struct Navigator {
    table: RouteTable,
    location: String,
}

impl Navigator {
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self { table, location: "/".to_owned() }
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Navigate to `target`, landing on the redirect target when the guard
    /// refuses. Returns the guard decision.
    pub fn navigate(&mut self, target: &str, session: &SessionState) -> Navigation {
        let decision = self.table.check(target, session);
        match &decision {
            Navigation::Allow => self.location = target.to_owned(),
            Navigation::Redirect(to) => {
                tracing::debug!(path = target, redirect = %to, "navigation redirected");
                self.location.clone_from(to);
            }
        }
        decision
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(RouteTable::default())
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
