//! Driven port for moving the user between screens.

use crate::domain::Route;

/// Port notified whenever the session flows change the current screen.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Navigate to `route`.
    fn navigate(&self, route: Route);
}

/// Navigator that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureNavigator;

impl Navigator for FixtureNavigator {
    fn navigate(&self, _route: Route) {}
}
