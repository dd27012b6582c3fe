//! Capabilities checked before actions, and the screens navigation targets.

use std::fmt;

/// Something a session may or may not be allowed to do.
///
/// Grants are decided by [`Role::grants`](crate::domain::Role::grants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// List and read articles.
    ReadArticles,
    /// Create, edit and delete articles.
    WriteArticles,
    /// Browse and edit categories.
    ManageCategories,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadArticles => f.write_str("read articles"),
            Self::WriteArticles => f.write_str("write articles"),
            Self::ManageCategories => f.write_str("manage categories"),
        }
    }
}

/// Screens the console can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in screen; the target of logout and forced logout.
    Login,
    /// Read-only article list.
    Articles,
    /// Article list with editing actions.
    ArticlesAdmin,
    /// Category management.
    Categories,
}

impl Route {
    /// Path used by the browser console for this screen.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Articles => "/articles",
            Self::ArticlesAdmin => "/admin/articles",
            Self::Categories => "/categories",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
