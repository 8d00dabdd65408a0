use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use krypton_bot::application::context::BotContext;
use krypton_bot::application::errors::BotError;
use krypton_bot::application::services::{CommandService, PresenceRotator};
use krypton_bot::domain::entities::CommandRegistry;
use krypton_bot::infrastructure::adapters::{console, discord};
use krypton_bot::infrastructure::config::{Config, ENV_TEMPLATE};
use krypton_bot::infrastructure::extensions::{ExtensionCatalog, ExtensionLoader, LoadOutcome};
use krypton_bot::infrastructure::logging;

#[derive(Parser)]
#[command(name = "krypton-bot")]
#[command(about = "A Discord bot scaffold with loadable command extensions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Env file to read settings from
    #[arg(short, long, default_value = ".env")]
    env_file: PathBuf,

    /// Bot token (overrides TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run {
        /// Read commands from stdin instead of connecting to Discord
        #[arg(long)]
        console: bool,
    },
    /// List the extensions the loader would pick up
    Extensions,
    /// Show version
    Version,
    /// Generate a default .env
    InitConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { console } => run_bot(&cli.env_file, cli.token, console),
        Commands::Extensions => list_extensions(&cli.env_file),
        Commands::Version => {
            println!("krypton-bot v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Commands::InitConfig => init_config(&cli.env_file),
    }
}

fn load_config(env_file: &Path) -> Option<Config> {
    match Config::load(Some(env_file)) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            None
        }
    }
}

fn run_bot(env_file: &Path, token_override: Option<String>, use_console: bool) -> ExitCode {
    let Some(config) = load_config(env_file) else {
        return ExitCode::FAILURE;
    };
    let config = config.with_token(token_override);

    // Dropping the guard flushes the file writer, so it lives until exit.
    let _log_guard = match logging::init(&config.log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(start(config, use_console)) {
        Ok(()) => {
            tracing::info!("Bot stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn start(config: Config, use_console: bool) -> Result<(), BotError> {
    tracing::info!("Starting krypton-bot v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Running on {} {} (pid {})",
        std::env::consts::OS,
        std::env::consts::ARCH,
        std::process::id()
    );

    let token = if use_console {
        None
    } else {
        Some(config.require_token()?.to_string())
    };

    let context = Arc::new(
        BotContext::new(config.prefix.clone())
            .with_invite_link(config.invite_link.clone())
            .with_owners(config.owners.clone()),
    );

    let loader = ExtensionLoader::new(&config.extensions_dir, ExtensionCatalog::builtin());
    let mut registry = CommandRegistry::new();
    let reports = loader.load_all(&mut registry);
    let loaded = reports.iter().filter(|r| r.is_loaded()).count();

    let runtime = Arc::new(CommandService::new(registry, context));
    tracing::info!(
        "Loaded {} of {} extensions from {} ({} commands)",
        loaded,
        reports.len(),
        loader.directory().display(),
        runtime.registry().len()
    );
    let rotator = PresenceRotator::new().with_interval(config.status_interval);

    match token {
        Some(token) => discord::run(&token, runtime, rotator).await,
        None => console::run(runtime, rotator).await,
    }
}

fn list_extensions(env_file: &Path) -> ExitCode {
    let Some(config) = load_config(env_file) else {
        return ExitCode::FAILURE;
    };

    let loader = ExtensionLoader::new(&config.extensions_dir, ExtensionCatalog::builtin());
    let mut registry = CommandRegistry::new();
    let reports = loader.load_all(&mut registry);
    let catalog = ExtensionCatalog::builtin();

    if reports.is_empty() {
        println!("No extensions found in {}", loader.directory().display());
        return ExitCode::SUCCESS;
    }

    println!("Extensions in {}:", loader.directory().display());
    for report in &reports {
        let status = match &report.outcome {
            LoadOutcome::Loaded => "loaded".to_string(),
            LoadOutcome::Skipped => "disabled".to_string(),
            LoadOutcome::Failed(e) => format!("failed: {}", e),
        };
        let about = catalog
            .create(&report.identifier)
            .map(|extension| extension.description().to_string())
            .unwrap_or_default();
        println!("  {:<12} {:<10} {}", report.identifier, status, about);
    }
    for (extension, commands) in registry.by_extension() {
        let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        println!("  [{}] {}", extension, names.join(", "));
    }
    ExitCode::SUCCESS
}

fn init_config(env_file: &Path) -> ExitCode {
    if env_file.exists() {
        println!("{} already exists", env_file.display());
        return ExitCode::SUCCESS;
    }

    match std::fs::write(env_file, ENV_TEMPLATE) {
        Ok(()) => {
            println!("Created {}", env_file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to write {}: {}", env_file.display(), e);
            ExitCode::FAILURE
        }
    }
}
