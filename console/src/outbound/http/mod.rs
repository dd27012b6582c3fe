//! HTTP adapter for the Article Console REST API.
//!
//! One [`RemoteClient`] implements the auth port and the collection port for
//! both articles and categories.

mod client;
mod dto;

pub use client::RemoteClient;
