// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use medtrans::app_config::{Config, LogLevel};
use medtrans::app_controller::{Controller, RunOutcome};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a document or a directory of documents (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for medtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Input text document (form-feed separated pages) or directory
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: TranslateOptions,
}

#[derive(Args, Debug, Clone)]
struct TranslateOptions {
    /// Directory for output files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Medical terminology record file (overrides the config)
    #[arg(long)]
    domain_terms: Option<PathBuf>,

    /// General vocabulary record file (overrides the config)
    #[arg(long)]
    general_terms: Option<PathBuf>,

    /// Correct OCR digit look-alikes inside words before translating
    #[arg(long)]
    ocr: bool,

    /// Maximum number of pages translated at once
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Do not append a glossary page
    #[arg(long)]
    no_glossary: bool,

    /// Hide progress bars
    #[arg(short, long)]
    quiet: bool,
}

/// medtrans - English to Arabic medical document translation
///
/// Translates medical documents page by page with a layered rule engine and
/// writes a bilingual document where every original page is followed by its
/// Arabic translation.
#[derive(Parser, Debug)]
#[command(name = "medtrans")]
#[command(version)]
#[command(about = "Rule-based English to Arabic medical document translation")]
#[command(long_about = "medtrans translates medical documents from English to Arabic.

EXAMPLES:
    medtrans report.txt                         # Translate using default config
    medtrans -f report.txt                      # Force overwrite existing files
    medtrans -o out/ report.txt                 # Write outputs to out/
    medtrans --ocr --no-glossary scan.txt       # Fix OCR digits, skip the glossary
    medtrans --log-level debug /reports/        # Process a whole directory
    medtrans completions bash > medtrans.bash   # Generate bash completions

INPUT:
    Plain UTF-8 text where pages are separated by form feeds, as written by
    `pdftotext -layout`.

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input text document (form-feed separated pages) or directory
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: TranslateOptions,
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

    // @returns: Prefix and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "\x1B[1;31m"),
            Level::Warn => ("🚧", "\x1B[1;33m"),
            Level::Info => (" ", "\x1B[1;32m"),
            Level::Debug => ("🔍", "\x1B[1;36m"),
            Level::Trace => ("📋", "\x1B[1;35m"),
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
            let (prefix, color) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, prefix, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The level is lowered or raised once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "medtrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Top-level arguments behave like the translate subcommand
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;
            run_translate(TranslateArgs {
                input_path,
                options: cli.options,
            })
            .await
        }
    }
}

/// Apply command line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut Config, options: &TranslateOptions) {
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(path) = &options.domain_terms {
        config.terminology.domain_path = Some(path.clone());
    }
    if let Some(path) = &options.general_terms {
        config.terminology.general_path = Some(path.clone());
    }
    if options.ocr {
        config.pipeline.ocr_correction = true;
    }
    if let Some(jobs) = options.jobs {
        config.pipeline.max_concurrent_pages = jobs;
    }
    if options.no_glossary {
        config.glossary.enabled = false;
    }
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let TranslateArgs { input_path, options } = args;

    // Apply a command line log level before the config is read
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options);
    log::set_max_level(config.log_level.into());

    // Validation happens inside the controller
    let controller = Controller::with_config(config).await?.with_progress(!options.quiet);

    if input_path.is_file() {
        let output_dir = options
            .output_dir
            .clone()
            .or_else(|| input_path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        match controller
            .run(input_path.clone(), output_dir, options.force_overwrite)
            .await?
        {
            RunOutcome::Translated(summary) => {
                if summary.fallback_pages > 0 {
                    info!("{} pages used the word-for-word fallback", summary.fallback_pages);
                }
            }
            RunOutcome::Skipped(_) => {}
        }
    } else if input_path.is_dir() {
        let summary = controller
            .run_folder(input_path.clone(), options.output_dir.clone(), options.force_overwrite)
            .await?;
        if summary.errors > 0 {
            return Err(anyhow!("{} documents failed to translate", summary.errors));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
