//! Terminal front end for the article console.
//!
//! Each invocation restores the persisted session, runs one command and
//! exits, so the session directory plays the part of browser storage.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use article_console::domain::{
    Article, AuthError, Category, CategoryFilter, Error, ListViewController, PageControls,
    Resource, Role, Session,
};
use article_console::outbound::navigation::LoggingNavigator;
use article_console::outbound::storage::FileSessionStorage;
use article_console::{Console, ConsoleSettings};
use clap::{Parser, Subcommand, ValueEnum};
use ortho_config::OrthoConfig;
use pagination::PageSlot;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `article-console` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "article-console",
    about = "Manage articles and categories on the Article Console API",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and persist the session.
    Login {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in to it.
    Register {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Account password.
        #[arg(long)]
        password: String,
        /// Requested role.
        #[arg(long, value_enum, default_value_t = RoleArg::User)]
        role: RoleArg,
    },
    /// End the persisted session.
    Logout,
    /// Show the signed-in account.
    Whoami,
    /// Browse and edit articles.
    #[command(subcommand)]
    Articles(ArticleCommand),
    /// Browse and edit categories.
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Debug, Subcommand)]
enum ArticleCommand {
    /// List one page of articles.
    List {
        /// Search text matched against title and content.
        #[arg(long)]
        search: Option<String>,
        /// Category name or id.
        #[arg(long)]
        category: Option<String>,
        /// Page to show, one-based.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one article.
    Show {
        /// Article id.
        id: String,
    },
    /// Create an article.
    Create {
        /// Title, at most 200 characters.
        #[arg(long)]
        title: String,
        /// Rich-text body.
        #[arg(long)]
        content: String,
        /// Category id.
        #[arg(long)]
        category: String,
    },
    /// Replace an article.
    Update {
        /// Article id.
        id: String,
        /// Title, at most 200 characters.
        #[arg(long)]
        title: String,
        /// Rich-text body.
        #[arg(long)]
        content: String,
        /// Category id.
        #[arg(long)]
        category: String,
    },
    /// Delete an article.
    Delete {
        /// Article id.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    /// List one page of categories.
    List {
        /// Search text matched against the name.
        #[arg(long)]
        search: Option<String>,
        /// Page to show, one-based.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Create a category.
    Create {
        /// Category name.
        #[arg(long)]
        name: String,
    },
    /// Rename a category.
    Update {
        /// Category id.
        id: String,
        /// New name.
        #[arg(long)]
        name: String,
    },
    /// Delete a category.
    Delete {
        /// Category id.
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RoleArg {
    User,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::User => Self::User,
            RoleArg::Admin => Self::Admin,
        }
    }
}

fn main() -> io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> io::Result<()> {
    let settings = ConsoleSettings::load_from_iter([OsString::from("article-console")])
        .map_err(|error| io::Error::other(format!("load configuration: {error}")))?;
    let storage = Arc::new(FileSessionStorage::new(settings.session_dir()));
    let navigator = Arc::new(LoggingNavigator::default());
    let console = Console::connect(settings, storage, navigator.clone()).map_err(domain_error)?;
    let mut out = io::stdout().lock();

    match args.command {
        Command::Login { username, password } => {
            let session = console
                .login(&username, &password)
                .await
                .map_err(auth_error)?;
            write_session(&mut out, &session)?;
            if let Some(route) = navigator.last() {
                writeln!(out, "landing={route}")?;
            }
        }
        Command::Register {
            username,
            password,
            role,
        } => {
            let session = console
                .register(&username, &password, role.into())
                .await
                .map_err(auth_error)?;
            write_session(&mut out, &session)?;
            if let Some(route) = navigator.last() {
                writeln!(out, "landing={route}")?;
            }
        }
        Command::Logout => {
            console.logout();
            writeln!(out, "signed out")?;
        }
        Command::Whoami => {
            let session = signed_in(&console).await?;
            write_session(&mut out, &session)?;
        }
        Command::Articles(command) => {
            signed_in(&console).await?;
            run_articles(&console, command, &mut out).await?;
        }
        Command::Categories(command) => {
            signed_in(&console).await?;
            run_categories(&console, command, &mut out).await?;
        }
    }
    Ok(())
}

async fn signed_in(console: &Console) -> io::Result<Session> {
    console.restore().await.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::PermissionDenied,
            "not signed in: run `article-console login` first",
        )
    })
}

async fn run_articles(
    console: &Console,
    command: ArticleCommand,
    out: &mut impl Write,
) -> io::Result<()> {
    match command {
        ArticleCommand::List {
            search,
            category,
            page,
        } => {
            let filter = match category {
                Some(raw) => Some(resolve_category(console, &raw).await?),
                None => None,
            };
            let view = console.article_list().map_err(domain_error)?;
            show_page(&view, search.as_deref(), filter, page).await?;
            for article in view.visible_items() {
                write_article_row(out, &article)?;
            }
            write_controls(out, &view.controls(), view.store().total())?;
        }
        ArticleCommand::Show { id } => {
            let article = console.article(&id).await.map_err(domain_error)?;
            write_article_row(out, &article)?;
            writeln!(out)?;
            writeln!(out, "{}", article.content())?;
        }
        ArticleCommand::Create {
            title,
            content,
            category,
        } => {
            let article = console
                .create_article(&title, &content, &category)
                .await
                .map_err(domain_error)?;
            writeln!(out, "created {}", article.id())?;
        }
        ArticleCommand::Update {
            id,
            title,
            content,
            category,
        } => {
            let article = console
                .update_article(&id, &title, &content, &category)
                .await
                .map_err(domain_error)?;
            writeln!(out, "updated {}", article.id())?;
        }
        ArticleCommand::Delete { id } => {
            console.delete_article(&id).await.map_err(domain_error)?;
            writeln!(out, "deleted {id}")?;
        }
    }
    Ok(())
}

async fn run_categories(
    console: &Console,
    command: CategoryCommand,
    out: &mut impl Write,
) -> io::Result<()> {
    match command {
        CategoryCommand::List { search, page } => {
            let view = console.category_list().map_err(domain_error)?;
            show_page(&view, search.as_deref(), None, page).await?;
            for category in view.visible_items() {
                write_category_row(out, &category)?;
            }
            write_controls(out, &view.controls(), view.store().total())?;
        }
        CategoryCommand::Create { name } => {
            let category = console.create_category(&name).await.map_err(domain_error)?;
            writeln!(out, "created {}", category_id(&category))?;
        }
        CategoryCommand::Update { id, name } => {
            let category = console
                .update_category(&id, &name)
                .await
                .map_err(domain_error)?;
            writeln!(out, "updated {}", category_id(&category))?;
        }
        CategoryCommand::Delete { id } => {
            console.delete_category(&id).await.map_err(domain_error)?;
            writeln!(out, "deleted {id}")?;
        }
    }
    Ok(())
}

/// Drive `view` to `page` of the given filters the way the list screen does:
/// filters first, then the page move.
async fn show_page<R: Resource>(
    view: &Arc<ListViewController<R>>,
    search: Option<&str>,
    category: Option<CategoryFilter>,
    page: u32,
) -> io::Result<()> {
    let mut fetched = false;
    if let Some(text) = search {
        view.input_search(text);
        fetched |= view.flush_search().await.map_err(domain_error)?.is_some();
    }
    if category.is_some() {
        fetched |= view
            .select_category(category)
            .await
            .map_err(domain_error)?
            .is_some();
    }
    if !fetched {
        view.mount().await.map_err(domain_error)?;
    }
    if page != view.page() && view.go_to_page(page).await.map_err(domain_error)?.is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("page {page} is outside 1..={}", view.page_count()),
        ));
    }
    Ok(())
}

async fn resolve_category(console: &Console, raw: &str) -> io::Result<CategoryFilter> {
    let wanted = raw.trim();
    let filters = console.category_filters().await.map_err(domain_error)?;
    filters
        .into_iter()
        .find(|filter| filter.id.as_ref() == wanted || filter.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("unknown category: {wanted}"),
            )
        })
}

fn category_id(category: &Category) -> &str {
    category.id().as_ref()
}

fn write_session(out: &mut impl Write, session: &Session) -> io::Result<()> {
    writeln!(out, "username={}", session.username())?;
    writeln!(out, "role={}", session.role())?;
    if let Some(id) = session.user_id() {
        writeln!(out, "user_id={id}")?;
    }
    Ok(())
}

fn write_article_row(out: &mut impl Write, article: &Article) -> io::Result<()> {
    let category = article
        .category()
        .map_or_else(|| article.category_id().to_string(), |snapshot| snapshot.name.clone());
    writeln!(
        out,
        "{}\t{}\t{}\t{}",
        article.id(),
        article.title(),
        category,
        article.updated_at().to_rfc3339()
    )
}

fn write_category_row(out: &mut impl Write, category: &Category) -> io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}",
        category_id(category),
        category.name(),
        category.updated_at().to_rfc3339()
    )
}

fn write_controls(out: &mut impl Write, controls: &PageControls, total: u64) -> io::Result<()> {
    let slots = controls
        .slots
        .iter()
        .map(|slot| match slot {
            PageSlot::Page(number) if u64::from(controls.page) == *number => {
                format!("[{number}]")
            }
            PageSlot::Page(number) => number.to_string(),
            PageSlot::Ellipsis => "...".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(
        out,
        "page {}/{} ({total} total) {slots}",
        controls.page, controls.page_count
    )
}

fn domain_error(error: Error) -> io::Error {
    io::Error::other(error.to_string())
}

fn auth_error(error: AuthError) -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, error.user_message())
}

#[cfg(test)]
mod tests {
    //! Unit tests for argument parsing and output helpers.

    use super::*;
    use article_console::test_support::fixtures::article_in;
    use rstest::rstest;

    #[rstest]
    fn parses_article_listing_filters() {
        let args = CliArgs::try_parse_from([
            "article-console",
            "articles",
            "list",
            "--search",
            "rust",
            "--category",
            "Technology",
            "--page",
            "2",
        ])
        .expect("arguments should parse");
        let Command::Articles(ArticleCommand::List {
            search,
            category,
            page,
        }) = args.command
        else {
            panic!("expected articles list, got {:?}", args.command);
        };
        assert_eq!(search.as_deref(), Some("rust"));
        assert_eq!(category.as_deref(), Some("Technology"));
        assert_eq!(page, 2);
    }

    #[rstest]
    #[case(&[] as &[&str], Role::User)]
    #[case(&["--role", "admin"], Role::Admin)]
    fn register_role_defaults_to_user(#[case] extra: &[&str], #[case] expected: Role) {
        let mut argv = vec![
            "article-console",
            "register",
            "--username",
            "ana",
            "--password",
            "pw",
        ];
        argv.extend_from_slice(extra);
        let args = CliArgs::try_parse_from(argv).expect("arguments should parse");
        let Command::Register { role, .. } = args.command else {
            panic!("expected register, got {:?}", args.command);
        };
        assert_eq!(Role::from(role), expected);
    }

    #[rstest]
    fn article_rows_prefer_the_category_name() {
        let mut out = Vec::new();
        write_article_row(&mut out, &article_in("a-1", "Match day", "c-2", "Sport"))
            .expect("write row");
        let row = String::from_utf8(out).expect("utf8");
        assert!(row.starts_with("a-1\tMatch day\tSport\t"), "{row}");
    }

    #[rstest]
    fn controls_mark_the_current_page() {
        let controls = PageControls {
            page: 2,
            page_count: 3,
            has_previous: true,
            has_next: true,
            slots: vec![
                PageSlot::Page(1),
                PageSlot::Page(2),
                PageSlot::Page(3),
            ],
        };
        let mut out = Vec::new();
        write_controls(&mut out, &controls, 25).expect("write controls");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "page 2/3 (25 total) 1 [2] 3\n"
        );
    }
}
