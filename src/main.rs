#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use deepl_bridge::app_config::{self, Config};
use deepl_bridge::language_utils::validate_language_code;
use deepl_bridge::{
    get_language_name, AppError, Controller, Direction, LanguagePair, TranslationOutcome,
};

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

#[derive(Debug, Clone, ValueEnum)]
enum CliDirection {
    Source,
    Target,
}

impl From<CliDirection> for Direction {
    fn from(direction: CliDirection) -> Self {
        match direction {
            CliDirection::Source => Direction::Source,
            CliDirection::Target => Direction::Target,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text with DeepL
    Translate {
        /// Text to translate; several values are translated concurrently
        #[arg(value_name = "TEXT", required = true)]
        text: Vec<String>,

        /// Source language code (e.g., 'EN', 'DE')
        #[arg(short, long, default_value = "EN")]
        source_language: String,

        /// Target language code (e.g., 'DE', 'EN-GB')
        #[arg(short, long)]
        target_language: String,
    },

    /// Show the languages DeepL supports
    Languages {
        /// Which list to show
        #[arg(short, long, value_enum, default_value = "target")]
        direction: CliDirection,

        /// Ignore the cached list and fetch it again
        #[arg(short, long)]
        refresh: bool,
    },

    /// Manage DeepL glossaries
    #[command(subcommand)]
    Glossaries(GlossaryCommands),

    /// Generate shell completions for deepl-bridge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum GlossaryCommands {
    /// List glossaries stored with DeepL
    List {
        /// Show the local registry instead
        #[arg(long)]
        local: bool,
    },

    /// Delete every remote glossary and clear the local registry
    Purge,

    /// Create a glossary from a TSV file and register it
    Create {
        /// Source language code
        #[arg(short, long)]
        source_language: String,

        /// Target language code
        #[arg(short, long)]
        target_language: String,

        /// Glossary name
        #[arg(short, long)]
        name: String,

        /// TSV file with one 'source<TAB>target' term per line
        #[arg(value_name = "ENTRIES_FILE")]
        entries: PathBuf,
    },
}

/// deepl-bridge - DeepL translation with glossary and capability management
#[derive(Parser, Debug)]
#[command(name = "deepl-bridge")]
#[command(version)]
#[command(about = "DeepL translation with glossary and capability management")]
#[command(long_about = "deepl-bridge translates text through the DeepL API, caches the supported
language lists and keeps remote glossaries in sync with a local registry.

EXAMPLES:
    deepl-bridge translate -t DE \"Hello I would like to be translated\"
    deepl-bridge languages --direction source
    deepl-bridge glossaries list
    deepl-bridge glossaries create -s EN -t DE -n Terms terms.tsv
    deepl-bridge glossaries purge
    deepl-bridge completions bash > deepl-bridge.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key can also be given through
    DEEPL_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// DeepL API key, overrides the configuration file
    #[arg(long, global = true, env = "DEEPL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌"),
            Level::Warn => ("\x1B[1;33m", "🚧"),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍"),
            Level::Trace => ("\x1B[1;35m", "📋"),
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
            let (color, emoji) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Level is lowered or raised once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "deepl-bridge", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let controller = Controller::with_config(config).context("Configuration validation failed")?;
    if let Err(e) = controller.prune_cache().await {
        warn!("Failed to prune expired cache entries: {:#}", e);
    }

    match cli.command {
        Commands::Translate {
            text,
            source_language,
            target_language,
        } => run_translate(&controller, &text, &target_language, &source_language).await,
        Commands::Languages { direction, refresh } => {
            run_languages(&controller, direction.into(), refresh).await
        }
        Commands::Glossaries(command) => run_glossaries(&controller, command).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the config file, creating a default one if missing, and apply CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config, AppError> {
    let config_path = Path::new(&cli.config_path);

    let mut config = if config_path.exists() {
        Config::from_file(config_path).map_err(|e| AppError::Config(format!("{:#}", e)))?
    } else {
        warn!("Config file not found at '{}', creating default config.", cli.config_path);
        let config = Config::default();
        config
            .save(config_path)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;
        config
    };

    if let Some(api_key) = &cli.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

async fn run_translate(
    controller: &Controller,
    texts: &[String],
    target_language: &str,
    source_language: &str,
) -> Result<()> {
    let outcomes = controller
        .translate_many(texts, target_language, source_language)
        .await;

    for outcome in outcomes {
        if let TranslationOutcome::Skipped { reason, .. } = &outcome {
            warn!("Returned original text: {}", reason);
        }
        println!("{}", outcome.into_text());
    }

    Ok(())
}

async fn run_languages(controller: &Controller, direction: Direction, refresh: bool) -> Result<()> {
    if refresh {
        controller.refresh_languages(direction).await?;
    }

    let entries = controller.languages(direction).await;
    if entries.is_empty() {
        warn!("No {} languages available", direction);
        return Ok(());
    }

    for entry in entries {
        let name = if entry.name.is_empty() {
            get_language_name(&entry.language).unwrap_or_default()
        } else {
            entry.name.clone()
        };
        let formality = if entry.supports_formality { "  (formality)" } else { "" };
        println!("{:<8} {}{}", entry.language, name, formality);
    }

    Ok(())
}

async fn run_glossaries(controller: &Controller, command: GlossaryCommands) -> Result<()> {
    match command {
        GlossaryCommands::List { local: true } => {
            for record in controller.local_glossaries().await? {
                println!(
                    "{} -> {}  {}  {}",
                    record.source_language, record.target_language, record.glossary_id, record.name
                );
            }
        }
        GlossaryCommands::List { local: false } => {
            for glossary in controller.remote_glossaries().await? {
                println!("{}", glossary);
            }
        }
        GlossaryCommands::Purge => {
            let report = controller.purge_glossaries().await?;

            println!("List of Glossary entries");
            println!("============");
            for glossary in &report.glossaries {
                println!("{}", glossary);
            }

            for failure in &report.failures {
                warn!("Could not delete {}: {}", failure.glossary_id, failure.error);
            }
            if report.registry_truncated {
                info!(
                    "Deleted {} glossaries, removed {} local records",
                    report.deleted.len(),
                    report.local_records_removed
                );
            } else if !report.failures.is_empty() {
                warn!("Local glossary registry kept because some deletes failed");
            }
        }
        GlossaryCommands::Create {
            source_language,
            target_language,
            name,
            entries,
        } => {
            let entries = std::fs::read_to_string(&entries)
                .with_context(|| format!("Failed to read glossary entries: {}", entries.display()))?;
            validate_language_code(&source_language)?;
            validate_language_code(&target_language)?;
            let pair = LanguagePair::new(&source_language, &target_language);
            let record = controller.create_glossary(&pair, &name, &entries).await?;
            println!("{}", record.glossary_id);
        }
    }

    Ok(())
}
