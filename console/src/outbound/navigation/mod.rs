//! Navigator for terminal front ends.
//!
//! There is no screen to switch, so navigation is logged and the latest
//! target is kept for the caller to report.

use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::domain::Route;
use crate::domain::ports::Navigator;

/// [`Navigator`] that logs each route and remembers the last one.
#[derive(Debug, Default)]
pub struct LoggingNavigator {
    last: Mutex<Option<Route>>,
}

impl LoggingNavigator {
    /// Most recent navigation target, if any.
    pub fn last(&self) -> Option<Route> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: Route) {
        info!(route = %route, "navigate");
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remembers_the_latest_route() {
        let navigator = LoggingNavigator::default();
        assert_eq!(navigator.last(), None);

        navigator.navigate(Route::ArticlesAdmin);
        navigator.navigate(Route::Login);

        assert_eq!(navigator.last(), Some(Route::Login));
    }
}
