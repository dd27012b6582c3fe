//! Driven port for the list/read/write endpoints of one entity collection.

use async_trait::async_trait;
use pagination::Page;

use super::GatewayError;
use crate::domain::{Query, Resource};

/// Port for `/{collection}` and `/{collection}/{id}`.
///
/// Implementations attach the active session's credential themselves; a 401
/// on any of these calls ends the session before the error is returned.
#[async_trait]
pub trait CollectionGateway<R: Resource>: Send + Sync {
    /// Fetch one page of the collection.
    async fn list(&self, query: &Query) -> Result<Page<R>, GatewayError>;

    /// Fetch a single entity.
    async fn get(&self, id: &R::Id) -> Result<R, GatewayError>;

    /// Create an entity and return it as stored by the server.
    async fn create(&self, draft: &R::Draft) -> Result<R, GatewayError>;

    /// Replace an entity and return it as stored by the server.
    async fn update(&self, id: &R::Id, draft: &R::Draft) -> Result<R, GatewayError>;

    /// Delete an entity.
    async fn delete(&self, id: &R::Id) -> Result<(), GatewayError>;
}

/// Fixture implementation backed by an always-empty collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCollectionGateway;

#[async_trait]
impl<R: Resource> CollectionGateway<R> for FixtureCollectionGateway {
    async fn list(&self, query: &Query) -> Result<Page<R>, GatewayError> {
        let page = query.page();
        Page::try_new(Vec::new(), 0, page.page(), page.limit())
            .map_err(|err| GatewayError::decode(err.to_string()))
    }

    async fn get(&self, id: &R::Id) -> Result<R, GatewayError> {
        Err(GatewayError::not_found(format!("{} {id} not found", R::NAME)))
    }

    async fn create(&self, _draft: &R::Draft) -> Result<R, GatewayError> {
        Err(GatewayError::forbidden("fixture collection is read-only"))
    }

    async fn update(&self, id: &R::Id, _draft: &R::Draft) -> Result<R, GatewayError> {
        Err(GatewayError::not_found(format!("{} {id} not found", R::NAME)))
    }

    async fn delete(&self, id: &R::Id) -> Result<(), GatewayError> {
        Err(GatewayError::not_found(format!("{} {id} not found", R::NAME)))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{Article, ArticleId};

    #[tokio::test]
    async fn fixture_lists_an_empty_page_echoing_the_request() {
        let query = Query::first(9)
            .and_then(|query| query.with_page(2))
            .expect("valid query");
        let page: Page<Article> = FixtureCollectionGateway
            .list(&query)
            .await
            .expect("fixture page");
        assert!(page.items().is_empty());
        assert_eq!((page.page(), page.limit(), page.total()), (2, 9, 0));
    }

    #[tokio::test]
    async fn fixture_reports_unknown_ids_as_missing() {
        let id = ArticleId::new("a-1").expect("valid id");
        let err = CollectionGateway::<Article>::get(&FixtureCollectionGateway, &id)
            .await
            .expect_err("empty collection");
        assert!(matches!(err, GatewayError::NotFound { .. }));
    }
}
