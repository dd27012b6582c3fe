//! Composition root: wires settings, persistence, navigation, the remote
//! client, the session flows and the collection stores.
//!
//! Every action checks the session's capabilities before a request is sent,
//! so a refused action never reaches the network.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ConsoleSettings;
use crate::domain::ports::{AuthGateway, CollectionGateway, Navigator, SessionStorage};
use crate::domain::{
    Article, ArticleDraft, ArticleId, AuthError, Capability, Category, CategoryDraft,
    CategoryFilter, CategoryId, CollectionStore, ConsoleResult, Error, ListViewController, Query,
    Resource, Role, Session, SessionContext, SessionService,
};
use crate::outbound::http::RemoteClient;

/// The assembled console.
pub struct Console {
    settings: ConsoleSettings,
    sessions: SessionService,
    navigator: Arc<dyn Navigator>,
    category_gateway: Arc<dyn CollectionGateway<Category>>,
    articles: Arc<CollectionStore<Article>>,
    categories: Arc<CollectionStore<Category>>,
}

impl Console {
    /// Build a console talking to the configured API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::invalid_request`] for a malformed base URL and
    /// [`Error::internal`] when the HTTP client cannot be built.
    pub fn connect(
        settings: ConsoleSettings,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> ConsoleResult<Self> {
        let base = settings
            .base_url()
            .map_err(|err| Error::invalid_request(format!("invalid base url: {err}")))?;
        let context = Arc::new(SessionContext::new(storage, Arc::clone(&navigator)));
        let client = RemoteClient::new(base, settings.timeout(), context.clone())
            .map_err(|err| Error::internal(format!("http client: {err}")))?;
        let client = Arc::new(client);
        debug!(base_url = %client.base_url(), "remote client ready");

        Ok(Self::assemble(
            settings,
            context,
            navigator,
            client.clone(),
            client.clone(),
            client,
        ))
    }

    /// Build a console from already constructed parts.
    pub fn assemble(
        settings: ConsoleSettings,
        context: Arc<SessionContext>,
        navigator: Arc<dyn Navigator>,
        auth: Arc<dyn AuthGateway>,
        article_gateway: Arc<dyn CollectionGateway<Article>>,
        category_gateway: Arc<dyn CollectionGateway<Category>>,
    ) -> Self {
        Self {
            settings,
            sessions: SessionService::new(context, auth),
            navigator,
            articles: Arc::new(CollectionStore::new(article_gateway)),
            categories: Arc::new(CollectionStore::new(Arc::clone(&category_gateway))),
            category_gateway,
        }
    }

    /// Loaded settings.
    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    /// Session flows.
    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    /// Shared session state.
    pub fn context(&self) -> &Arc<SessionContext> {
        self.sessions.context()
    }

    /// Active session, if any.
    pub fn session(&self) -> Option<Session> {
        self.context().current()
    }

    /// Article cache.
    pub fn articles(&self) -> &Arc<CollectionStore<Article>> {
        &self.articles
    }

    /// Category cache used by the management screen.
    pub fn categories(&self) -> &Arc<CollectionStore<Category>> {
        &self.categories
    }

    /// Re-establish the persisted session on start-up.
    pub async fn restore(&self) -> Option<Session> {
        self.sessions.restore().await
    }

    /// Log in and land on the screen matching the role.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.sessions.login(username, password).await?;
        self.land(&session);
        Ok(session)
    }

    /// Register, log in and land on the screen matching the role.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Session, AuthError> {
        let session = self.sessions.register(username, password, role).await?;
        self.land(&session);
        Ok(session)
    }

    fn land(&self, session: &Session) {
        self.navigator.navigate(session.role().landing_route());
    }

    /// End the session.
    pub fn logout(&self) {
        self.sessions.logout();
    }

    /// List view over articles, paged by the session's role.
    ///
    /// # Errors
    ///
    /// Fails when logged out.
    pub fn article_list(&self) -> ConsoleResult<Arc<ListViewController<Article>>> {
        let session = self.context().authorize(Capability::ReadArticles)?;
        let limit = self.settings.article_page_size(session.role());
        self.list_view(&self.articles, limit)
    }

    /// List view over categories for the management screen.
    ///
    /// # Errors
    ///
    /// Fails when logged out or when the role may not manage categories.
    pub fn category_list(&self) -> ConsoleResult<Arc<ListViewController<Category>>> {
        self.context().authorize(Capability::ManageCategories)?;
        self.list_view(&self.categories, self.settings.category_page_size())
    }

    fn list_view<R: Resource>(
        &self,
        store: &Arc<CollectionStore<R>>,
        limit: u32,
    ) -> ConsoleResult<Arc<ListViewController<R>>> {
        let view = ListViewController::new(Arc::clone(store), limit, self.settings.debounce())
            .map_err(|err| Error::invalid_request(format!("page size: {err}")))?;
        Ok(Arc::new(view))
    }

    /// Categories offered by the article filter and forms.
    ///
    /// Reads straight from the server so the management cache is untouched.
    ///
    /// # Errors
    ///
    /// Fails when logged out or when the request fails.
    pub async fn category_filters(&self) -> ConsoleResult<Vec<CategoryFilter>> {
        self.context().authorize(Capability::ReadArticles)?;
        let query = Query::first(self.settings.category_page_size())
            .map_err(|err| Error::invalid_request(format!("page size: {err}")))?;
        let page = self.category_gateway.list(&query).await?;
        let (items, _) = page.into_parts();
        Ok(items
            .into_iter()
            .map(|category| CategoryFilter {
                name: category.name().to_owned(),
                id: category.id().clone(),
            })
            .collect())
    }

    /// Fetch one article.
    ///
    /// # Errors
    ///
    /// Fails when logged out, for a blank id or when the request fails.
    pub async fn article(&self, id: &str) -> ConsoleResult<Article> {
        self.context().authorize(Capability::ReadArticles)?;
        self.articles.get(&ArticleId::new(id)?).await
    }

    /// Create an article.
    ///
    /// # Errors
    ///
    /// Fails without a request when the role may not write articles or the
    /// draft is invalid.
    pub async fn create_article(
        &self,
        title: &str,
        content: &str,
        category_id: &str,
    ) -> ConsoleResult<Article> {
        let session = self.context().authorize(Capability::WriteArticles)?;
        let draft = ArticleDraft::try_new(title, content, category_id)?;
        let article = self.articles.create(&draft).await?;
        info!(username = session.username(), article_id = %article.id(), "article created");
        Ok(article)
    }

    /// Replace an article.
    ///
    /// # Errors
    ///
    /// Fails without a request when the role may not write articles or the
    /// draft is invalid.
    pub async fn update_article(
        &self,
        id: &str,
        title: &str,
        content: &str,
        category_id: &str,
    ) -> ConsoleResult<Article> {
        let session = self.context().authorize(Capability::WriteArticles)?;
        let id = ArticleId::new(id)?;
        let draft = ArticleDraft::try_new(title, content, category_id)?;
        let article = self.articles.update(&id, &draft).await?;
        info!(username = session.username(), article_id = %id, "article updated");
        Ok(article)
    }

    /// Delete an article.
    ///
    /// # Errors
    ///
    /// Fails without a request when the role may not write articles.
    pub async fn delete_article(&self, id: &str) -> ConsoleResult<()> {
        let session = self.context().authorize(Capability::WriteArticles)?;
        let id = ArticleId::new(id)?;
        self.articles.delete(&id).await?;
        info!(username = session.username(), article_id = %id, "article deleted");
        Ok(())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Fails without a request when the role may not manage categories or
    /// the name is blank.
    pub async fn create_category(&self, name: &str) -> ConsoleResult<Category> {
        let session = self.context().authorize(Capability::ManageCategories)?;
        let draft = CategoryDraft::try_new(name)?;
        let category = self.categories.create(&draft).await?;
        info!(username = session.username(), category_id = %category.id(), "category created");
        Ok(category)
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Fails without a request when the role may not manage categories or
    /// the name is blank.
    pub async fn update_category(&self, id: &str, name: &str) -> ConsoleResult<Category> {
        let session = self.context().authorize(Capability::ManageCategories)?;
        let id = CategoryId::new(id)?;
        let draft = CategoryDraft::try_new(name)?;
        let category = self.categories.update(&id, &draft).await?;
        info!(username = session.username(), category_id = %id, "category updated");
        Ok(category)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Fails without a request when the role may not manage categories.
    pub async fn delete_category(&self, id: &str) -> ConsoleResult<()> {
        let session = self.context().authorize(Capability::ManageCategories)?;
        let id = CategoryId::new(id)?;
        self.categories.delete(&id).await?;
        info!(username = session.username(), category_id = %id, "category deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
