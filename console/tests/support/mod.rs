//! Shared helpers for the console integration tests.

pub mod canned_http;

use std::sync::Arc;

use article_console::domain::ports::{Navigator, SessionStorage};
use article_console::{Console, ConsoleSettings};

/// Console pointed at `base_url` with small page sizes.
pub fn console_for(
    base_url: &str,
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
) -> Console {
    let settings = ConsoleSettings {
        base_url: Some(base_url.to_owned()),
        timeout_ms: Some(5_000),
        admin_page_size: Some(2),
        user_page_size: Some(2),
        ..ConsoleSettings::default()
    };
    Console::connect(settings, storage, navigator).expect("console should connect")
}
