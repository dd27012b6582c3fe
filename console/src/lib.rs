//! Article console library.
//!
//! Session lifecycle, collection caches and list-view state for the Article
//! Console REST API, with a reqwest client and file-backed session storage.

pub mod config;
pub mod console;
pub mod domain;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::ConsoleSettings;
pub use console::Console;
