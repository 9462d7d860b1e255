use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use news_law_explainer::repository::ARTICLES_COLLECTION;
use news_law_explainer::{
    logging, parse_response, AnalysisRequest, Analyzer, ArticleService, Config, GeminiClient,
    ParsedResponse, Repository, SqliteStore,
};

#[derive(Parser)]
#[command(name = "news-law-explainer", version, about = "Legal analysis of news articles")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a saved raw model reply without calling the model
    Parse { file: PathBuf },

    /// Analyze an article body with the model
    Analyze {
        file: PathBuf,

        /// Title used when saving
        #[arg(long)]
        title: Option<String>,

        /// Persist the analysis in the database
        #[arg(long)]
        save: bool,
    },

    /// List stored articles, most recent first
    List,

    /// Print one stored article as JSON
    Show { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(&cli.config.log_level, cli.config.log_format);

    match cli.command {
        Command::Parse { file } => run_parse(&cli.config, &file),
        Command::Analyze { file, title, save } => run_analyze(&cli.config, &file, title, save).await,
        Command::List => run_list(&cli.config).await,
        Command::Show { id } => run_show(&cli.config, &id).await,
    }
}

fn read_input(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))
}

fn open_repository(config: &Config) -> Result<(SqliteStore, Repository)> {
    let store = SqliteStore::open(&config.database)
        .with_context(|| format!("Failed to open database {:?}", config.database))?;
    let repository = Repository::new(Arc::new(store.clone()));
    Ok((store, repository))
}

fn run_parse(config: &Config, file: &Path) -> Result<()> {
    let raw = read_input(file)?;
    let parsed = parse_response(&raw);

    if let ParsedResponse::Malformed { reason, .. } = &parsed {
        eprintln!("⚠️  Malformed reply: {}", reason);
    }

    let result = config.parse_policy.apply(parsed)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn run_analyze(config: &Config, file: &Path, title: Option<String>, save: bool) -> Result<()> {
    let content = read_input(file)?;
    let model = GeminiClient::new(config.gemini_settings()).context("Failed to configure Gemini client")?;
    let analyzer = Analyzer::new(Arc::new(model), config.parse_policy);

    let title = title.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    if !save {
        let result = analyzer.analyze(&content).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let (_, repository) = open_repository(config)?;
    let service = ArticleService::new(analyzer, repository);
    let stored = service
        .generate_article(AnalysisRequest { title, content })
        .await?;

    eprintln!("✓ Saved article {}", stored.id);
    println!("{}", serde_json::to_string_pretty(&stored)?);
    Ok(())
}

async fn run_list(config: &Config) -> Result<()> {
    let (store, repository) = open_repository(config)?;
    let articles = repository.list_all().await?;

    println!("📰 {} articles", store.count(ARTICLES_COLLECTION)?);
    for article in articles {
        println!(
            "{}  {}  {}  (法令 {}, 判例 {})",
            article.created_at.format("%Y-%m-%d %H:%M:%S"),
            article.id,
            article.title,
            article.related_laws.len(),
            article.related_cases.len()
        );
    }
    Ok(())
}

async fn run_show(config: &Config, id: &str) -> Result<()> {
    let (_, repository) = open_repository(config)?;

    match repository.get_by_id(id).await? {
        Some(article) => {
            println!("{}", serde_json::to_string_pretty(&article)?);
            Ok(())
        }
        None => {
            eprintln!("❌ Article not found: {}", id);
            std::process::exit(1);
        }
    }
}
