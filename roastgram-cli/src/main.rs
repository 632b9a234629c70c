//! roastgram CLI
//!
//! Multi-agent Instagram profile review: fetch, critique, roast.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use roastgram_agents::{
    create_anthropic_backend, create_backend, AnthropicConfig, OpenAICompatConfig,
    PersonaRegistry, ReviewPanel, ReviewRequest, DEFAULT_MODEL,
};
use roastgram_core::{FocusArea, DEFAULT_POST_COUNT};
use roastgram_insta::{fetch_profile, FetchConfig, InstagramSource};

#[derive(Parser)]
#[command(name = "roastgram")]
#[command(author, version, about = "roastgram: multi-agent Instagram profile roast", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a profile and run the reviewer panel on it
    Review {
        /// Profile URL, e.g. https://www.instagram.com/natgeo/
        url: String,

        /// Number of recent posts to pull captions from
        #[arg(short, long, default_value_t = DEFAULT_POST_COUNT)]
        posts: usize,

        /// LLM model to use
        #[arg(short, long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Gemini API key (or set GEMINI_API_KEY env var)
        #[arg(long, env = "GEMINI_API_KEY")]
        gemini_key: Option<String>,

        /// OpenAI API key (or set OPENAI_API_KEY env var)
        #[arg(long, env = "OPENAI_API_KEY")]
        openai_key: Option<String>,

        /// Anthropic API key (or set ANTHROPIC_API_KEY env var)
        #[arg(long, env = "ANTHROPIC_API_KEY")]
        anthropic_key: Option<String>,

        /// Use OpenAI instead of Gemini
        #[arg(long)]
        openai: bool,

        /// Use Anthropic instead of Gemini
        #[arg(long)]
        anthropic: bool,

        /// Base URL of a local OpenAI-compatible server
        #[arg(long)]
        local: Option<String>,

        /// Focus areas (repeatable): composition, voice, humor, positioning
        #[arg(long = "focus", value_parser = parse_focus)]
        focus: Vec<FocusArea>,

        /// Free-text context: what the roast is for, target audience, etc.
        #[arg(short, long)]
        context: Option<String>,

        /// Total fetch attempt cap
        #[arg(long, default_value = "3")]
        retries: u32,

        /// Skip competitor research for the marketing reviewer
        #[arg(long)]
        no_research: bool,

        /// Output file for the report (default: roast_<timestamp>.md)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch the profile snapshot and print it as JSON
    Fetch {
        /// Profile URL
        url: String,

        /// Number of recent posts to pull captions from
        #[arg(short, long, default_value_t = DEFAULT_POST_COUNT)]
        posts: usize,

        /// Total fetch attempt cap
        #[arg(long, default_value = "3")]
        retries: u32,
    },

    /// List the loaded reviewer personas
    Personas,
}

fn parse_focus(s: &str) -> Result<FocusArea, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Commands::Review {
            url,
            posts,
            model,
            gemini_key,
            openai_key,
            anthropic_key,
            openai,
            anthropic,
            local,
            focus,
            context,
            retries,
            no_research,
            output,
        } => {
            run_review(
                &url,
                posts,
                &model,
                gemini_key,
                openai_key,
                anthropic_key,
                openai,
                anthropic,
                local,
                focus,
                context,
                retries,
                no_research,
                output,
            )
            .await?;
        }
        Commands::Fetch { url, posts, retries } => {
            run_fetch(&url, posts, retries).await?;
        }
        Commands::Personas => {
            list_personas();
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_review(
    url: &str,
    posts: usize,
    model: &str,
    gemini_key: Option<String>,
    openai_key: Option<String>,
    anthropic_key: Option<String>,
    use_openai: bool,
    use_anthropic: bool,
    local: Option<String>,
    focus: Vec<FocusArea>,
    context: Option<String>,
    retries: u32,
    no_research: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    println!("🔥 roastgram - Multi-agent Instagram profile roast\n");

    // Configure backend (Gemini is default)
    let backend = if let Some(base_url) = &local {
        create_backend(OpenAICompatConfig::local(base_url, model))?
    } else if use_anthropic {
        let key = anthropic_key.ok_or_else(|| {
            anyhow::anyhow!("Anthropic API key required. Set ANTHROPIC_API_KEY or use --anthropic-key")
        })?;
        create_anthropic_backend(AnthropicConfig::new(&key, model))?
    } else if use_openai {
        let key = openai_key.ok_or_else(|| {
            anyhow::anyhow!("OpenAI API key required. Set OPENAI_API_KEY or use --openai-key")
        })?;
        create_backend(OpenAICompatConfig::openai(&key, model))?
    } else {
        let key = gemini_key.ok_or_else(|| {
            anyhow::anyhow!("Gemini API key required. Set GEMINI_API_KEY or use --gemini-key")
        })?;
        create_backend(OpenAICompatConfig::gemini(&key, model))?
    };

    let provider = if local.is_some() {
        "local"
    } else if use_anthropic {
        "Anthropic"
    } else if use_openai {
        "OpenAI"
    } else {
        "Gemini"
    };
    println!("📡 Provider: {} | Model: {}", provider, model);
    println!("🔗 Profile: {}", url);
    println!("📝 Posts: {} | Retries: {}\n", posts, retries);

    // Fetch the profile snapshot
    println!("📥 Fetching profile...");
    let source = InstagramSource::new()?;
    let fetch_config = FetchConfig {
        max_retries: retries,
        ..FetchConfig::default()
    };
    let snapshot = fetch_profile(&source, url, posts, &fetch_config).await?;
    println!(
        "✅ Fetched @{} ({} captions)\n",
        snapshot.handle,
        snapshot.captions.len()
    );

    // Run the reviewer panel
    let mut panel = ReviewPanel::new(backend);
    if no_research {
        panel = panel.without_research();
    }
    println!("🤖 Reviewers: {}\n", panel.list_reviewers().join(", "));

    let request = ReviewRequest {
        snapshot,
        focus,
        context,
    };

    println!("🚀 Running the panel...");
    let reports = panel.run(&request).await;

    if reports.is_empty() {
        anyhow::bail!("every reviewer failed; check the API key and model name");
    }

    let report = roastgram_agents::render_report(&request, &reports);

    let output_path = output.unwrap_or_else(|| {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
        PathBuf::from(format!("roast_{}.md", timestamp))
    });

    fs::write(&output_path, &report)?;
    println!("\n✅ Roast complete!");
    println!("📄 Report saved to: {}", output_path.display());

    // Print report preview
    println!("\n{}", "=".repeat(60));
    let preview: String = report.chars().take(1000).collect();
    println!("{}", preview);
    if report.len() > 1000 {
        println!("...\n[truncated - see full report in output file]");
    }

    Ok(())
}

async fn run_fetch(url: &str, posts: usize, retries: u32) -> Result<()> {
    let source = InstagramSource::new()?;
    let config = FetchConfig {
        max_retries: retries,
        ..FetchConfig::default()
    };

    let snapshot = fetch_profile(&source, url, posts, &config).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}

fn list_personas() {
    let registry = PersonaRegistry::load_embedded();

    println!("Loaded reviewer personas:\n");
    for persona in registry.reviewers() {
        println!(
            "  {} ({}) - specialty: {}{}",
            persona.reviewer.name,
            persona.reviewer.id,
            persona.reviewer.specialty,
            if persona.reviewer.wants_research {
                ", uses competitor research"
            } else {
                ""
            }
        );
    }
}
