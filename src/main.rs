// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

use shoresh::app_config::{self, Config, EnrichmentProvider};
use shoresh::{Controller, RunOptions, RunOutcome};

/// CLI Wrapper for EnrichmentProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliEnrichmentProvider {
    Gemini,
    Ollama,
    Anthropic,
}

impl From<CliEnrichmentProvider> for EnrichmentProvider {
    fn from(cli_provider: CliEnrichmentProvider) -> Self {
        match cli_provider {
            CliEnrichmentProvider::Gemini => EnrichmentProvider::Gemini,
            CliEnrichmentProvider::Ollama => EnrichmentProvider::Ollama,
            CliEnrichmentProvider::Anthropic => EnrichmentProvider::Anthropic,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish the next unused root (default command)
    Run(RunArgs),

    /// Print the segmentation of one page as JSON
    Inspect {
        /// Zero-based page index
        #[arg(value_name = "PAGE")]
        page: usize,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Test the connection to the enrichment provider
    Check {
        #[command(flatten)]
        provider: ProviderArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate shell completions for shoresh
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that reads the configuration
#[derive(clap::Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Dictionary PDF, overriding the configured one
    #[arg(long)]
    pdf: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
struct RunArgs {
    /// Send the message without updating the history
    #[arg(long)]
    preview: bool,

    /// Start the search at this page instead of after the last published one
    #[arg(long)]
    page: Option<usize>,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    telegram_token: Option<String>,

    /// Telegram chat to post to
    #[arg(long, env = "CHAT_ID")]
    chat_id: Option<String>,

    #[command(flatten)]
    provider: ProviderArgs,

    #[command(flatten)]
    common: CommonArgs,
}

/// Enrichment provider selection
#[derive(clap::Args, Debug, Clone)]
struct ProviderArgs {
    /// Enrichment provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliEnrichmentProvider>,

    /// API key for the Gemini provider
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,
}

impl ProviderArgs {
    fn apply(self, config: &mut Config) {
        if let Some(provider) = self.provider {
            config.enrichment.provider = provider.into();
        }
        if let Some(key) = self.gemini_api_key.filter(|k| !k.is_empty()) {
            if config.enrichment.provider == EnrichmentProvider::Gemini {
                config.enrichment.active_provider_config_mut().api_key = key;
            }
        }
    }
}

/// Shoresh - Daily Hebrew roots
///
/// Reads a Hebrew root dictionary PDF, finds the next root that has not been
/// published yet and sends its words to a Telegram chat.
#[derive(Parser, Debug)]
#[command(name = "shoresh")]
#[command(version)]
#[command(about = "Daily Hebrew root digest from a dictionary PDF")]
#[command(long_about = "Shoresh rebuilds dictionary pages from PDF text and posts one new root a day.

EXAMPLES:
    shoresh                                  # Publish the next unused root
    shoresh run --preview                    # Send without updating the history
    shoresh run --page 40                    # Start searching at page 40
    shoresh inspect 12                       # Show how page 12 is segmented
    shoresh check -p ollama                  # Test the enrichment provider
    shoresh completions bash > shoresh.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically. TELEGRAM_TOKEN, CHAT_ID
    and GEMINI_API_KEY are read from the environment when set.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "shoresh", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Inspect { page, common }) => run_inspect(page, common),
        Some(Commands::Check { provider, common }) => run_check(provider, common).await,
        Some(Commands::Run(args)) => run_daily(args).await,
        // Default behavior: top-level args act as `run`
        None => run_daily(cli.run).await,
    }
}

/// Load the configuration and apply the overrides shared by all commands
fn load_config(common: &CommonArgs) -> Result<Config> {
    if let Some(cmd_log_level) = &common.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let (mut config, created) = Config::load_or_create(&common.config_path)?;
    if created {
        warn!("Config file not found at '{}', created default config.", common.config_path);
    }

    if let Some(pdf) = &common.pdf {
        config.pdf_path = pdf.clone();
    }

    match &common.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    Ok(config)
}

async fn run_daily(args: RunArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;
    args.provider.apply(&mut config);

    if let Some(token) = args.telegram_token.filter(|t| !t.is_empty()) {
        config.telegram.bot_token = token;
    }
    if let Some(chat_id) = args.chat_id.filter(|c| !c.is_empty()) {
        config.telegram.chat_id = chat_id;
    }
    let controller = Controller::with_config(config).context("Configuration validation failed")?;

    let options = RunOptions {
        preview: args.preview,
        start_page: args.page,
    };

    match controller.run(options).await? {
        RunOutcome::Published(digest) => info!("Published root {} from page {}", digest.root, digest.page),
        RunOutcome::Previewed(digest) => info!("Previewed root {} from page {}", digest.root, digest.page),
        RunOutcome::NothingNew => info!("Nothing new to publish."),
    }

    Ok(())
}

async fn run_check(provider: ProviderArgs, common: CommonArgs) -> Result<()> {
    let mut config = load_config(&common)?;
    provider.apply(&mut config);

    let controller = Controller::with_config(config).context("Configuration validation failed")?;
    controller.check_enrichment().await
}

fn run_inspect(page: usize, common: CommonArgs) -> Result<()> {
    let config = load_config(&common)?;
    let controller = Controller::with_config(config).context("Configuration validation failed")?;

    let report = match controller.inspect(page)? {
        None => serde_json::json!({ "page": page, "status": "empty" }),
        Some(Err(e)) => serde_json::json!({ "page": page, "status": "no_root", "error": e.to_string() }),
        Some(Ok(result)) => serde_json::json!({ "page": page, "status": "ok", "result": result }),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
