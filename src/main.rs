//! Libri CLI - terminal book catalog browser

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use libri::error::FixSuggestion;
use libri::{Backend, LibriConfig, LibriError};

#[derive(Parser)]
#[command(name = "libri")]
#[command(about = "Terminal book catalog browser with AI-powered recommendations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct EndpointArgs {
    /// Override the catalog service base URL
    #[arg(long)]
    catalog_url: Option<String>,

    /// Override the session service base URL
    #[arg(long)]
    session_url: Option<String>,

    /// Override the agent service base URL
    #[arg(long)]
    agent_url: Option<String>,

    /// API key for the session and agent services
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog in the terminal
    Browse {
        #[command(flatten)]
        endpoints: EndpointArgs,

        /// Use the seeded in-memory backend (offline demo)
        #[arg(long)]
        mock: bool,
    },

    /// Probe the configured services and report reachability
    Check {
        #[command(flatten)]
        endpoints: EndpointArgs,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    // Initialize tracing; quiet by default so the TUI owns the terminal
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Browse { endpoints, mock }) => browse(endpoints, mock).await,
        Some(Commands::Check { endpoints }) => check(endpoints).await,
        None => {
            print_banner();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(libri_err) = e.downcast_ref::<LibriError>() {
            if let Some(suggestion) = libri_err.fix_suggestion() {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
        }
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        "{} {}",
        "libri".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).cyan()
    );
    println!("Terminal book catalog browser with AI-powered recommendations");
    println!();
    println!("  {}   browse the catalog (add --mock for an offline demo)", "libri browse".bold());
    println!("  {}    probe the configured services", "libri check".bold());
    println!();
    println!("Run {} for all options.", "libri --help".bold());
}

/// Config file + env, overridden by CLI flags
fn effective_config(endpoints: EndpointArgs) -> Result<LibriConfig, LibriError> {
    let mut config = LibriConfig::load()?.with_env();
    if let Some(url) = endpoints.catalog_url {
        config.endpoints.catalog_url = Some(url);
    }
    if let Some(url) = endpoints.session_url {
        config.endpoints.session_url = Some(url);
    }
    if let Some(url) = endpoints.agent_url {
        config.endpoints.agent_url = Some(url);
    }
    if let Some(key) = endpoints.api_key {
        config.auth.api_key = Some(key);
    }
    config.validate()?;
    Ok(config)
}

async fn browse(endpoints: EndpointArgs, mock: bool) -> anyhow::Result<()> {
    let backend = if mock {
        Backend::mock()
    } else {
        let config = effective_config(endpoints)?;
        Backend::http(&config)?
    };

    libri::tui::run(backend).await
}

async fn check(endpoints: EndpointArgs) -> anyhow::Result<()> {
    let config = effective_config(endpoints)?;
    let backend = Backend::http(&config)?;

    println!("{} libri service check", "→".cyan());
    match config.api_key() {
        Some(key) => println!("  api key: {}", libri::config::mask_api_key(key, 8)),
        None => println!("  api key: (none)"),
    }

    let (catalog_result, session_result) = futures::future::join(
        backend.catalog.fetch_all(),
        backend.session.init_session(),
    )
    .await;

    match &catalog_result {
        Ok(books) => println!(
            "{} catalog: {} books at {}",
            "✓".green(),
            books.len(),
            config.catalog_url()
        ),
        Err(e) => println!("{} catalog: {}", "✗".red(), e),
    }

    match &session_result {
        Ok(info) => println!("{} session: id {}", "✓".green(), info.session_id),
        Err(e) => println!("{} session: {}", "✗".red(), e),
    }

    let agent_ok = match &session_result {
        Ok(session) => {
            match backend
                .agent
                .invoke(session, "Reply with one short sentence.")
                .await
            {
                Ok(_) => {
                    println!("{} agent: reachable at {}", "✓".green(), config.agent_url());
                    true
                }
                Err(e) => {
                    println!("{} agent: {}", "✗".red(), e);
                    false
                }
            }
        }
        Err(_) => {
            println!("{} agent: skipped (no session)", "-".yellow());
            false
        }
    };

    if catalog_result.is_err() || session_result.is_err() || !agent_ok {
        anyhow::bail!("one or more services failed the check");
    }
    Ok(())
}
