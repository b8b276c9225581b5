//! Navigation signals returned to the caller in place of browser redirects.

use std::time::Duration;

/// Screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Otp,
    /// Landing page after sign-in (upload widget).
    Home,
    /// File dashboard.
    Uploads,
}

/// Go to `route` once `after` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub route: Route,
    pub after: Duration,
}

impl Redirect {
    pub fn now(route: Route) -> Self {
        Self {
            route,
            after: Duration::ZERO,
        }
    }

    pub fn after(route: Route, after: Duration) -> Self {
        Self { route, after }
    }
}
