//! novelshelf CLI entry point.

use clap::Parser;
use novelshelf::{
    api::{self, ApiClient},
    config::{AdminCommand, Cli, Command, Config, HistoryCommand, ShelfCommand},
    session::SessionStore,
    transport::LogNavigator,
    types::{
        AdminNovelQuery, AdminUserQuery, AnalyticsQuery, BanKind, Credentials, Novel, NovelStatus,
        PageQuery, RecommendationKind, RecommendationQuery, SearchQuery, SortBy, UserStatus,
    },
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "novelshelf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Init needs no backend
    if let Command::Init { force } = &cli.command {
        return cmd_init(*force);
    }

    // Find or load config
    let config_path = cli.config.clone().or_else(Config::find_config_file);

    let mut config = if let Some(ref path) = config_path {
        Config::load(path)?
    } else {
        Config::default()
    };

    // CLI mode overrides config
    if let Some(mode) = cli.mode {
        config.api.mode = mode;
    }

    let session = match config.session.dir {
        Some(ref dir) => SessionStore::open(dir),
        None => SessionStore::open_default(),
    };

    let client = api::client_for_mode(&config, session.clone(), Arc::new(LogNavigator))?;

    match cli.command {
        Command::Init { .. } => unreachable!("handled above"),
        Command::Login {
            credential,
            password,
        } => cmd_login(&client, &session, credential, password).await,
        Command::Logout => cmd_logout(&client, &session).await,
        Command::Me => cmd_me(&client).await,
        Command::Search {
            query,
            title,
            author,
            category,
            tag,
            sort,
            page,
            page_size,
        } => {
            let search = SearchQuery {
                keyword: query,
                title,
                author,
                category,
                tag,
                status: None,
                sort: Some(parse_sort(&sort)?),
                page: Some(page),
                page_size: Some(page_size),
            };
            cmd_search(&client, &search).await
        }
        Command::Show { id } => cmd_show(&client, &id).await,
        Command::Read { novel, chapter } => cmd_read(&client, &novel, &chapter).await,
        Command::Recommend { kind, novel, limit } => {
            let query = RecommendationQuery {
                kind: parse_kind(&kind)?,
                novel_id: novel,
                limit,
            };
            cmd_recommend(&client, &query).await
        }
        Command::Shelf { action } => cmd_shelf(&client, action).await,
        Command::History { action } => cmd_history(&client, action).await,
        Command::Comments {
            novel,
            page,
            page_size,
        } => cmd_comments(&client, &novel, page, page_size).await,
        Command::Comment {
            novel,
            content,
            parent,
        } => cmd_comment(&client, &novel, &content, parent.as_deref()).await,
        Command::Rate { novel, score } => cmd_rate(&client, &novel, score).await,
        Command::Admin { action } => cmd_admin(&client, action).await,
    }
}

/// Create a default config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let config_path = PathBuf::from("config.toml");

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, Config::generate_default())?;
    println!("Created config file: {}", config_path.display());
    println!("\nEdit config.toml to point at your server, then run:");
    println!("  novelshelf login <username>");

    Ok(())
}

/// Log in and persist the session.
async fn cmd_login(
    api: &impl ApiClient,
    session: &SessionStore,
    credential: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password: ")?,
    };

    let login = api
        .login(&Credentials {
            credential,
            password,
        })
        .await?;

    session.save(&login.token, &login.user);
    println!(
        "Logged in as {} ({})",
        login.user.username,
        match login.user.role {
            novelshelf::types::UserRole::Admin => "admin",
            novelshelf::types::UserRole::User => "user",
        }
    );

    Ok(())
}

/// Log out. The local session is cleared even when the server call fails.
async fn cmd_logout(api: &impl ApiClient, session: &SessionStore) -> anyhow::Result<()> {
    if let Err(e) = api.logout().await {
        tracing::warn!(error = %e, "Server logout failed, clearing local session anyway");
    }
    session.clear();
    println!("Logged out.");
    Ok(())
}

/// Show the current user profile.
async fn cmd_me(api: &impl ApiClient) -> anyhow::Result<()> {
    let user = api.me().await?;
    println!("ID:       {}", user.id);
    println!("Username: {}", user.username);
    if let Some(name) = user.display_name {
        println!("Name:     {}", name);
    }
    if let Some(email) = user.email {
        println!("Email:    {}", email);
    }
    if let Some(bio) = user.bio {
        println!("Bio:      {}", bio);
    }
    Ok(())
}

/// Search the catalog and print a result table.
async fn cmd_search(api: &impl ApiClient, query: &SearchQuery) -> anyhow::Result<()> {
    let page = api.search_novels(query).await?;

    if page.items.is_empty() {
        println!("No novels found.");
        return Ok(());
    }

    print_novel_table(&page.items);
    println!(
        "\nPage {} ({} of {} total)",
        page.page,
        page.items.len(),
        page.total
    );
    Ok(())
}

/// Show a novel's details.
async fn cmd_show(api: &impl ApiClient, id: &str) -> anyhow::Result<()> {
    let novel = api.novel(id).await?;

    println!("{} by {}", novel.title, novel.author);
    println!(
        "Category: {}  Tags: {}",
        novel.category,
        novel.tags.join(", ")
    );
    println!(
        "Rating: {:.1}  Views: {}  Favorites: {}  Words: {}",
        novel.rating, novel.views, novel.favorites, novel.word_count
    );
    if let Some(status) = novel.status {
        println!(
            "Status: {}",
            match status {
                NovelStatus::Ongoing => "ongoing",
                NovelStatus::Completed => "completed",
            }
        );
    }
    if let Some(true) = novel.my_favorite {
        println!("On your shelf.");
    }
    if let Some(score) = novel.my_rating {
        println!("Your rating: {}", score);
    }
    println!("\n{}", novel.intro);

    let chapters = api.chapters(id).await?;
    println!("\n{} chapters:", chapters.len());
    for chapter in chapters.iter().take(20) {
        println!("  {:>4}  {}", chapter.id, chapter.title);
    }
    if chapters.len() > 20 {
        println!("  ... and {} more", chapters.len() - 20);
    }

    Ok(())
}

/// Print a chapter and record it in the read history.
async fn cmd_read(api: &impl ApiClient, novel_id: &str, chapter_id: &str) -> anyhow::Result<()> {
    let chapter = api.chapter(novel_id, chapter_id).await?;

    // History is best-effort; reading works while logged out.
    if let Err(e) = api.record_read(novel_id).await {
        tracing::debug!(error = %e, "Could not record read history");
    }

    println!("{}\n", chapter.title);
    match chapter.content {
        Some(content) => println!("{}", content),
        None => println!("(no content)"),
    }

    Ok(())
}

/// Fetch and print a recommendation feed.
async fn cmd_recommend(api: &impl ApiClient, query: &RecommendationQuery) -> anyhow::Result<()> {
    let novels = api.recommendations(query).await?;
    if novels.is_empty() {
        println!("No recommendations.");
    } else {
        print_novel_table(&novels);
    }
    Ok(())
}

/// Bookshelf commands.
async fn cmd_shelf(api: &impl ApiClient, action: ShelfCommand) -> anyhow::Result<()> {
    match action {
        ShelfCommand::List { page, page_size } => {
            let novels = api
                .bookshelf(PageQuery {
                    page: Some(page),
                    page_size: Some(page_size),
                })
                .await?;
            if novels.is_empty() {
                println!("Your bookshelf is empty.");
            } else {
                print_novel_table(&novels);
            }
        }
        ShelfCommand::Add { novel } => {
            api.add_to_bookshelf(&novel).await?;
            println!("Added to bookshelf: {}", novel);
        }
        ShelfCommand::Del { novel } => {
            api.remove_from_bookshelf(&novel).await?;
            println!("Removed from bookshelf: {}", novel);
        }
    }
    Ok(())
}

/// Read-history commands.
async fn cmd_history(api: &impl ApiClient, action: HistoryCommand) -> anyhow::Result<()> {
    match action {
        HistoryCommand::List => {
            let entries = api.read_history().await?;
            if entries.is_empty() {
                println!("No read history.");
                return Ok(());
            }
            println!(
                "{:<8} {:<30} {:<24} {:>8}  LAST READ",
                "ID", "TITLE", "CHAPTER", "PROGRESS"
            );
            println!("{}", "-".repeat(90));
            for entry in entries {
                println!(
                    "{:<8} {:<30} {:<24} {:>7}%  {}",
                    entry.id,
                    entry.novel.title,
                    entry.last_chapter,
                    entry.progress,
                    entry.last_read_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        HistoryCommand::Del { id } => {
            api.remove_read_history(&id).await?;
            println!("Removed history entry: {}", id);
        }
        HistoryCommand::Clear => {
            api.clear_read_history().await?;
            println!("Read history cleared.");
        }
    }
    Ok(())
}

/// List comments on a novel.
async fn cmd_comments(
    api: &impl ApiClient,
    novel_id: &str,
    page: u32,
    page_size: u32,
) -> anyhow::Result<()> {
    let threads = api
        .comments(
            novel_id,
            PageQuery {
                page: Some(page),
                page_size: Some(page_size),
            },
        )
        .await?;

    if threads.items.is_empty() {
        println!("No comments.");
        return Ok(());
    }

    for thread in &threads.items {
        println!(
            "[{}] {} ({}):",
            thread.comment.id,
            thread.comment.user_display_name,
            thread.comment.created_at.format("%Y-%m-%d %H:%M")
        );
        println!("  {}", thread.comment.content);
        for reply in &thread.replies {
            println!("    > {}: {}", reply.user_display_name, reply.content);
        }
    }
    println!(
        "\nPage {} ({} of {} total)",
        threads.page,
        threads.items.len(),
        threads.total
    );
    Ok(())
}

/// Post a comment.
async fn cmd_comment(
    api: &impl ApiClient,
    novel_id: &str,
    content: &str,
    parent: Option<&str>,
) -> anyhow::Result<()> {
    let created = api.post_comment(novel_id, content, parent).await?;
    println!("Comment posted: {}", created.comment_id);
    Ok(())
}

/// Rate a novel.
async fn cmd_rate(api: &impl ApiClient, novel_id: &str, score: u8) -> anyhow::Result<()> {
    api.rate_novel(novel_id, score).await?;
    println!("Rated {} with {}/5.", novel_id, score);
    Ok(())
}

/// Administration commands.
async fn cmd_admin(api: &impl ApiClient, action: AdminCommand) -> anyhow::Result<()> {
    match action {
        AdminCommand::Novels {
            query,
            category,
            author,
            page,
            page_size,
        } => {
            let result = api
                .admin_novels(&AdminNovelQuery {
                    keyword: query,
                    category,
                    author,
                    page: PageQuery {
                        page: Some(page),
                        page_size: Some(page_size),
                    },
                })
                .await?;
            print_novel_table(&result.items);
            println!("\n{} novels total", result.total);
        }

        AdminCommand::Users {
            query,
            status,
            page,
            page_size,
        } => {
            let status = status.as_deref().map(parse_user_status).transpose()?;
            let result = api
                .admin_users(&AdminUserQuery {
                    keyword: query,
                    status,
                    page: PageQuery {
                        page: Some(page),
                        page_size: Some(page_size),
                    },
                })
                .await?;
            println!("{:<36} {:<20} {:<10} STATUS", "ID", "USERNAME", "ROLE");
            println!("{}", "-".repeat(80));
            for user in &result.items {
                println!(
                    "{:<36} {:<20} {:<10} {}",
                    user.id,
                    user.username,
                    match user.role {
                        novelshelf::types::UserRole::Admin => "admin",
                        novelshelf::types::UserRole::User => "user",
                    },
                    user.status.map(|s| s.as_str()).unwrap_or("-")
                );
            }
            println!("\n{} users total", result.total);
        }

        AdminCommand::Ban { id, permanent } => {
            let kind = if permanent {
                BanKind::Permanent
            } else {
                BanKind::Temporary
            };
            api.admin_ban_user(&id, kind).await?;
            println!(
                "Banned user {} ({}).",
                id,
                if permanent { "permanent" } else { "temporary" }
            );
        }

        AdminCommand::Unban { id } => {
            api.admin_unban_user(&id).await?;
            println!("Unbanned user {}.", id);
        }

        AdminCommand::SetStatus { id, status } => {
            let status = parse_novel_status(&status)?;
            api.admin_set_novel_status(&id, status).await?;
            println!("Updated status of {}.", id);
        }

        AdminCommand::NovelStats { from, to, page } => {
            let result = api
                .admin_novel_analytics(&AnalyticsQuery {
                    from,
                    to,
                    page: PageQuery {
                        page: Some(page),
                        page_size: None,
                    },
                })
                .await?;
            println!(
                "{:<30} {:>10} {:>10} {:>8} {:>8}",
                "TITLE", "VIEWS", "FAVS", "RATINGS", "AVG"
            );
            println!("{}", "-".repeat(70));
            for row in &result.items {
                println!(
                    "{:<30} {:>10} {:>10} {:>8} {:>8.1}",
                    row.title, row.views, row.favorites, row.rating_count, row.avg_rating
                );
            }
        }

        AdminCommand::UserStats { from, to, page } => {
            let result = api
                .admin_user_analytics(&AnalyticsQuery {
                    from,
                    to,
                    page: PageQuery {
                        page: Some(page),
                        page_size: None,
                    },
                })
                .await?;
            println!(
                "{:<20} {:>7} {:>9} {:>7} {:>7} {:>8} {:>9}",
                "USERNAME", "LOGINS", "SEARCHES", "VIEWS", "FAVS", "RATINGS", "COMMENTS"
            );
            println!("{}", "-".repeat(75));
            for row in &result.items {
                println!(
                    "{:<20} {:>7} {:>9} {:>7} {:>7} {:>8} {:>9}",
                    row.username,
                    row.logins,
                    row.searches,
                    row.novel_views,
                    row.favorites,
                    row.ratings,
                    row.comments
                );
            }
        }
    }
    Ok(())
}

/// Print a novel listing table.
fn print_novel_table(novels: &[Novel]) {
    println!(
        "{:<6} {:<32} {:<16} {:<12} {:>6}",
        "ID", "TITLE", "AUTHOR", "CATEGORY", "RATING"
    );
    println!("{}", "-".repeat(78));
    for novel in novels {
        println!(
            "{:<6} {:<32} {:<16} {:<12} {:>6.1}",
            novel.id, novel.title, novel.author, novel.category, novel.rating
        );
    }
}

fn parse_sort(s: &str) -> anyhow::Result<SortBy> {
    match s {
        "hot" => Ok(SortBy::Hot),
        "latest" => Ok(SortBy::Latest),
        "rating" => Ok(SortBy::Rating),
        "views" => Ok(SortBy::Views),
        other => anyhow::bail!("Unknown sort order: {}", other),
    }
}

fn parse_kind(s: &str) -> anyhow::Result<RecommendationKind> {
    match s {
        "personalized" => Ok(RecommendationKind::Personalized),
        "hot" => Ok(RecommendationKind::Hot),
        "latest" => Ok(RecommendationKind::Latest),
        "new" => Ok(RecommendationKind::New),
        "completed" => Ok(RecommendationKind::Completed),
        "rating" => Ok(RecommendationKind::Rating),
        "monthly" => Ok(RecommendationKind::Monthly),
        "reward" => Ok(RecommendationKind::Reward),
        "related" => Ok(RecommendationKind::Related),
        other => anyhow::bail!("Unknown recommendation kind: {}", other),
    }
}

fn parse_user_status(s: &str) -> anyhow::Result<UserStatus> {
    match s {
        "active" => Ok(UserStatus::Active),
        "banned" => Ok(UserStatus::Banned),
        "permanent_banned" => Ok(UserStatus::PermanentBanned),
        "deleted" => Ok(UserStatus::Deleted),
        other => anyhow::bail!("Unknown user status: {}", other),
    }
}

fn parse_novel_status(s: &str) -> anyhow::Result<NovelStatus> {
    match s {
        "ongoing" => Ok(NovelStatus::Ongoing),
        "completed" => Ok(NovelStatus::Completed),
        other => anyhow::bail!("Unknown novel status: {}", other),
    }
}

/// Prompt for password input.
fn prompt_password(prompt: &str) -> anyhow::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;

    Ok(password.trim().to_string())
}
