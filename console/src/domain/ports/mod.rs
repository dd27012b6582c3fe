//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod collection_gateway;
mod gateway_error;
mod navigator;
mod session_guard;
mod session_storage;

#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, FixtureAuthGateway, LoginGrant};
pub use collection_gateway::{CollectionGateway, FixtureCollectionGateway};
pub use gateway_error::GatewayError;
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::{FixtureNavigator, Navigator};
#[cfg(test)]
pub use session_guard::MockSessionGuard;
pub use session_guard::{FixtureSessionGuard, SessionGuard};
#[cfg(test)]
pub use session_storage::MockSessionStorage;
pub use session_storage::{
    InMemorySessionStorage, PersistedSession, SessionStorage, SessionStorageError,
};
