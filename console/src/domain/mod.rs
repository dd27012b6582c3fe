//! Domain primitives, ports and the stores built on them.
//!
//! Purpose: model the console's state (session, collections, list views)
//! independently of HTTP and storage. Adapters in `outbound` implement the
//! ports declared in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Session, Role, Capability: identity and centralized permission checks.
//! - Article, Category: collection entities and their drafts.
//! - SessionContext / SessionService: session state and flows.
//! - CollectionStore / ListViewController: list caches and view state.

pub mod article;
pub mod auth;
pub mod capability;
pub mod category;
pub mod collection_store;
pub mod debounce;
pub mod error;
pub mod list_view;
pub mod ports;
pub mod query;
pub mod resource;
pub mod session;
pub mod session_service;
pub mod user;

pub use self::article::{Article, ArticleDraft, ArticleId, CategorySnapshot, TITLE_MAX_CHARS};
pub use self::auth::{AuthError, LoginCredentials, LoginValidationError, Registration};
pub use self::capability::{Capability, Route};
pub use self::category::{Category, CategoryDraft, CategoryId};
pub use self::collection_store::{CollectionSnapshot, CollectionStore, FetchOutcome};
pub use self::debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::list_view::{ListViewController, PageControls, ViewStatus};
pub use self::query::Query;
pub use self::resource::{CategoryFilter, Refinement, Resource};
pub use self::session::SessionContext;
pub use self::session_service::SessionService;
pub use self::user::{Credential, IdentityValidationError, Profile, Role, Session, UserId};

/// Convenient result alias for console operations.
///
/// # Examples
/// ```
/// use article_console::domain::{ConsoleResult, Error};
///
/// fn refuse() -> ConsoleResult<()> {
///     Err(Error::forbidden("admins only"))
/// }
/// assert!(refuse().is_err());
/// ```
pub type ConsoleResult<T> = Result<T, Error>;
