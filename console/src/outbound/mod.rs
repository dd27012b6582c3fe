//! Outbound adapters implementing the domain ports.
//!
//! - **http**: reqwest client for the auth, article and category endpoints
//! - **storage**: file-backed session persistence on `cap-std`
//! - **navigation**: navigator for terminal front ends
//!
//! Adapters translate between domain types and their wire or disk
//! representations. They contain no session or cache logic.

pub mod http;
pub mod navigation;
pub mod storage;
