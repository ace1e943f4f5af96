//! Vocab Admin operator CLI
//!
//! Inspects and edits the console's collections from the command line.
//! Every command prints JSON to stdout.
//!
//! ## Usage
//!
//! ```bash
//! # Typed collections
//! vocab-admin categories list
//! vocab-admin worlds list
//! vocab-admin words page --cursor <last-id> --search tree
//! vocab-admin words import rows.json
//! vocab-admin users page
//! vocab-admin users upsert <user-id> --json '{"isOpen": true}'
//! vocab-admin worlds games <world-id>
//! vocab-admin langs list
//!
//! # Any collection or nested document by path
//! vocab-admin docs list worlds <world-id> games
//! vocab-admin docs get users <user-id> Profiles <profile-id>
//! vocab-admin docs set langs he --json '{"name": "Hebrew"}'
//!
//! # Throwaway in-memory store
//! vocab-admin --backend memory categories list
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vocab_admin_store::repos::{user_profiles_path, world_games_path};
use vocab_admin_store::{Backend, Config, Fields, Repositories, UserPatch, WordFilter};

#[derive(Parser, Debug)]
#[command(name = "vocab-admin")]
#[command(about = "Operator CLI for the vocabulary admin store")]
struct Args {
    /// Path to config file
    #[arg(short, long, env = "VOCAB_ADMIN_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the persistent store
    #[arg(long, env = "VOCAB_ADMIN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Store backend
    #[arg(long, value_enum, env = "VOCAB_ADMIN_BACKEND")]
    backend: Option<Backend>,

    /// Items per page for paged collections
    #[arg(long, env = "VOCAB_ADMIN_PAGE_SIZE")]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Categories, newest first
    Categories {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Worlds, by orderId
    Worlds {
        #[command(subcommand)]
        action: WorldsAction,
    },
    /// Words, paged by English title
    Words {
        #[command(subcommand)]
        action: WordsAction,
    },
    /// Users, paged newest first
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Lang documents
    Langs {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Free-form documents addressed by path segments
    Docs {
        #[command(subcommand)]
        action: DocsAction,
    },
}

#[derive(Subcommand, Debug)]
enum ListAction {
    /// List every document
    List,
}

#[derive(Subcommand, Debug)]
enum WorldsAction {
    /// List every world
    List,
    /// List a world's games
    Games { world_id: String },
}

#[derive(Subcommand, Debug)]
enum UsersAction {
    /// Fetch one page
    Page {
        /// Id of the last item of the previous page
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Merge fields into a user, creating it when absent
    Upsert {
        id: String,
        #[arg(long)]
        json: String,
    },
    /// List a user's profiles
    Profiles { user_id: String },
}

#[derive(Subcommand, Debug)]
enum WordsAction {
    /// Fetch one page, optionally filtered
    Page {
        /// Id of the last item of the previous page
        #[arg(long)]
        cursor: Option<String>,

        /// Case-insensitive match on either title
        #[arg(long, default_value = "")]
        search: String,

        /// Case-insensitive match on any tag
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Copy a word under a fresh id
    Duplicate { id: String },
    /// Create or update words from a JSON array of rows
    Import { file: PathBuf },
    /// Every word as flat export rows
    Export,
}

#[derive(Subcommand, Debug)]
enum DocsAction {
    /// List a collection: `worlds <id> games`
    List { path: Vec<String> },
    /// Read a document: `users <id> Profiles <profile-id>`
    Get { path: Vec<String> },
    /// Create under a generated id in a collection
    Create {
        path: Vec<String>,
        #[arg(long)]
        json: String,
    },
    /// Write a document under its id, replacing any existing body
    Set {
        path: Vec<String>,
        #[arg(long)]
        json: String,
    },
    /// Merge fields into an existing document
    Update {
        path: Vec<String>,
        #[arg(long)]
        json: String,
    },
    /// Delete a document
    Delete { path: Vec<String> },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_payload(json: &str) -> anyhow::Result<Fields> {
    serde_json::from_str(json).context("payload must be a JSON object")
}

/// Split a document path into its collection segments and id
fn split_doc_path(path: &[String]) -> anyhow::Result<(&[String], &str)> {
    match path.split_last() {
        Some((id, collection)) if !collection.is_empty() => Ok((collection, id.as_str())),
        _ => bail!("document path needs a collection and an id"),
    }
}

async fn run_docs(repos: &Repositories, action: DocsAction) -> anyhow::Result<()> {
    let docs = &repos.docs;
    match action {
        DocsAction::List { path } => print_json(&docs.list(&path).await?),
        DocsAction::Get { path } => {
            let (collection, id) = split_doc_path(&path)?;
            print_json(&docs.get(collection, id).await?)
        }
        DocsAction::Create { path, json } => {
            let id = docs.create(&path, parse_payload(&json)?).await?;
            print_json(&serde_json::json!({ "id": id }))
        }
        DocsAction::Set { path, json } => {
            let (collection, id) = split_doc_path(&path)?;
            docs.create_with_id(collection, id, parse_payload(&json)?)
                .await?;
            print_json(&serde_json::json!({ "id": id }))
        }
        DocsAction::Update { path, json } => {
            let (collection, id) = split_doc_path(&path)?;
            docs.update(collection, id, parse_payload(&json)?).await?;
            print_json(&serde_json::json!({ "id": id }))
        }
        DocsAction::Delete { path } => {
            let (collection, id) = split_doc_path(&path)?;
            docs.remove(collection, id).await?;
            print_json(&serde_json::json!({ "id": id }))
        }
    }
}

async fn run_users(repos: &Repositories, config: &Config, action: UsersAction) -> anyhow::Result<()> {
    match action {
        UsersAction::Page { cursor } => print_json(
            &repos
                .users
                .list_page(config.page_size, cursor.as_deref())
                .await?,
        ),
        UsersAction::Upsert { id, json } => {
            let patch: UserPatch =
                serde_json::from_str(&json).context("payload must be a user patch object")?;
            repos.users.upsert(&id, &patch).await?;
            print_json(&repos.users.get(&id).await?)
        }
        UsersAction::Profiles { user_id } => {
            let profiles = user_profiles_path(&user_id)?;
            print_json(&repos.docs.list(profiles.segments()).await?)
        }
    }
}

async fn run_words(repos: &Repositories, config: &Config, action: WordsAction) -> anyhow::Result<()> {
    match action {
        WordsAction::Page {
            cursor,
            search,
            category,
        } => {
            let mut page = repos
                .words
                .list_page(config.page_size, cursor.as_deref())
                .await?;
            let filter = WordFilter { search, category };
            page.items.retain(|word| filter.matches(word));
            print_json(&page)
        }
        WordsAction::Duplicate { id } => {
            let Some(copy_id) = repos.words.duplicate(&id).await? else {
                bail!("word {} not found", id);
            };
            print_json(&serde_json::json!({ "id": copy_id }))
        }
        WordsAction::Import { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let rows: Vec<Fields> =
                serde_json::from_str(&content).context("import file must be a JSON array of objects")?;
            let summary = repos
                .words
                .import_rows(&rows, config.import_concurrency)
                .await?;
            print_json(&summary)
        }
        WordsAction::Export => {
            let mut rows = Vec::new();
            let mut cursor: Option<String> = None;
            loop {
                let page = repos
                    .words
                    .list_page(config.page_size.max(1), cursor.as_deref())
                    .await?;
                rows.extend(page.items.iter().map(|word| word.to_export_row()));
                debug!(count = rows.len(), "Exported words so far");
                if !page.has_more() {
                    break;
                }
                cursor = page.last_id;
            }
            print_json(&rows)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("vocab_admin_store=info".parse()?),
        )
        .init();

    let args = Args::parse();

    // Load config, writing defaults to a named file that does not exist yet
    let mut config = match &args.config {
        Some(config_path) if config_path.exists() => Config::load(config_path)
            .with_context(|| format!("loading config {}", config_path.display()))?,
        Some(config_path) => {
            let config = Config::default();
            config.save(config_path)?;
            info!(path = %config_path.display(), "Created default config");
            config
        }
        None => Config::default(),
    };

    // Apply CLI overrides
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }

    info!(
        backend = ?config.backend,
        data_dir = %config.data_dir.display(),
        page_size = config.page_size,
        "Opening vocab-admin store"
    );

    let repos = Repositories::new(config.open_store()?);

    match args.command {
        Command::Categories {
            action: ListAction::List,
        } => print_json(&repos.categories.list().await?),
        Command::Worlds {
            action: WorldsAction::List,
        } => print_json(&repos.worlds.list().await?),
        Command::Worlds {
            action: WorldsAction::Games { world_id },
        } => {
            let games = world_games_path(&world_id)?;
            print_json(&repos.docs.list(games.segments()).await?)
        }
        Command::Words { action } => run_words(&repos, &config, action).await,
        Command::Users { action } => run_users(&repos, &config, action).await,
        Command::Langs {
            action: ListAction::List,
        } => print_json(&repos.langs.list().await?),
        Command::Docs { action } => run_docs(&repos, action).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_doc_path() {
        let path = vec!["users".to_string(), "u1".to_string()];
        let (collection, id) = split_doc_path(&path).unwrap();
        assert_eq!(collection, ["users".to_string()]);
        assert_eq!(id, "u1");

        assert!(split_doc_path(&["users".to_string()]).is_err());
        assert!(split_doc_path(&[]).is_err());
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "vocab-admin",
            "--backend",
            "memory",
            "docs",
            "set",
            "langs",
            "he",
            "--json",
            "{}",
        ])
        .unwrap();
        assert_eq!(args.backend, Some(Backend::Memory));
        assert!(matches!(args.command, Command::Docs { action: DocsAction::Set { .. } }));
    }

    #[test]
    fn test_parse_nested_commands() {
        let args = Args::try_parse_from(["vocab-admin", "worlds", "games", "w1"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Worlds { action: WorldsAction::Games { ref world_id } } if world_id == "w1"
        ));

        let args =
            Args::try_parse_from(["vocab-admin", "users", "upsert", "u1", "--json", "{}"]).unwrap();
        assert!(matches!(args.command, Command::Users { action: UsersAction::Upsert { .. } }));
    }

    #[test]
    fn test_payload_must_be_object() {
        assert!(parse_payload(r#"{"a": 1}"#).is_ok());
        assert!(parse_payload("[1]").is_err());
    }
}
