use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;
use url::Url;

use blogkit_core::assets::AssetManifest;
use blogkit_core::config::Config;
use blogkit_demo::{render_markdown, Language, LiveDemo, MemoryHost};
use blogkit_search::query::{initial_query, set_query};
use blogkit_search::render::render_results;
use blogkit_search::{feed, Outcome, SearchSession, SearchWorker};

#[derive(Parser)]
#[command(name = "blogkit", about = "Live demos and semantic search for the blog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a markdown post, folding demo blocks into <live-demo> widgets.
    Render {
        file: PathBuf,
        /// Bundled module to load the components from.
        #[arg(long, default_value = "assets/index.js")]
        module: String,
    },
    /// Print what an expanded demo renders into its execution host.
    Demo {
        file: PathBuf,
        id: String,
    },
    /// Rank feed posts against a natural-language query.
    Search {
        #[arg(long)]
        query: Option<String>,
        /// Page URL; its `q` parameter is used when --query is absent.
        #[arg(long)]
        url: Option<String>,
        /// Feed file or URL, overriding `search.feed`.
        #[arg(long)]
        feed: Option<String>,
    },
}

fn read_post(file: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}

fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load().map_err(|e| { tracing::error!(error = %e, "loading config"); e })?;
    let settings = config.settings()?;

    match cli.command {
        Command::Render { file, module } => {
            let page = render_markdown(&read_post(&file)?);
            let manifest = AssetManifest::from_settings(&settings.assets, Path::new("."))?;
            println!("{}", page.html);
            if !page.widgets.is_empty() {
                println!("{}", manifest.module_tag(&module)?);
            }
            tracing::info!(widgets = page.widgets.len(), "rendered {}", file.display());
        }
        Command::Demo { file, id } => {
            let page = render_markdown(&read_post(&file)?);
            let group = page.widget(&id)?.group();
            let mut demo = LiveDemo::new(group, MemoryHost::default(), &settings.demo);
            let tabs: Vec<&str> = demo.language_options().iter().map(|l| l.key()).collect();
            tracing::info!(id = %demo.id(), tabs = ?tabs, selected = ?demo.selected_language().map(Language::key), "demo loaded");
            demo.toggle()?;
            tracing::info!(element = %demo.open_tag(), "demo expanded");
            let content = demo.host().content().ok_or_else(|| anyhow!("demo '{}' rendered nothing", id))?;
            println!("{content}");
        }
        Command::Search { query, url, feed: feed_source } => {
            let feed_source = feed_source.unwrap_or_else(|| settings.search.feed.clone());
            let mut page_url = Url::parse(url.as_deref().unwrap_or(&settings.search.page_url))?;
            let query = match query {
                Some(q) => { set_query(&mut page_url, &q); q }
                None => initial_query(&mut page_url, &settings.search.default_query),
            };

            let worker = SearchWorker::spawn_default(settings.embed.clone(), &settings.search);
            let pb = spinner("Contacting Skynet...");
            let (corpus, loaded) = tokio::join!(feed::load_corpus(&feed_source), worker.load());
            loaded?;
            let session = SearchSession::new(worker, corpus?);
            pb.set_message("Searching posts...");
            let outcome = session.submit(&query).await;
            pb.finish_and_clear();

            match outcome {
                Outcome::Applied(result) => {
                    println!("{}", render_results(&result.resolve(session.corpus())));
                    println!("\n{page_url}");
                }
                Outcome::Stale { generation, newest } => tracing::warn!(generation, newest, "search superseded"),
                Outcome::Failed(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}
