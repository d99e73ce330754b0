// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use vttreport::app_config::{Config, PromptConfig, RemoteConfig};
use vttreport::app_controller::Controller;
use vttreport::env_utils;
use vttreport::file_utils::FileManager;
use vttreport::providers::openai::OpenAI;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate Markdown reports from VTT transcripts (default command)
    #[command(alias = "run")]
    Generate(GenerateArgs),

    /// Generate shell completions for vttreport
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Path to the prompt config file (INI [prompts] section or a raw
    /// system prompt)
    #[arg(short, long, default_value = "conf/auto.conf")]
    conf: PathBuf,

    /// Directory containing .vtt files (searched recursively)
    #[arg(short, long, default_value = "data")]
    data: PathBuf,

    /// Output directory for .md files
    #[arg(short, long, default_value = "result")]
    out: PathBuf,

    /// Model name to use for generation
    #[arg(short, long, default_value = "gpt-4o")]
    model: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 90)]
    request_timeout: u64,

    /// Process only the first N files (0 = all)
    #[arg(long, default_value_t = 0)]
    limit_files: usize,

    /// Reduce logging output
    #[arg(short, long)]
    quiet: bool,

    /// Disable file attachments and send extracted text inline instead
    #[arg(long)]
    no_attachments: bool,
}

/// vttreport - VTT transcripts to Markdown reports with AI
///
/// Batch-converts WebVTT transcript files into structured Markdown reports
/// by delegating summarization to the OpenAI Responses API.
#[derive(Parser, Debug)]
#[command(name = "vttreport")]
#[command(version = "0.1.0")]
#[command(about = "Generate Markdown reports from VTT transcripts with AI")]
#[command(long_about = "vttreport finds .vtt files under a directory and turns each into a
Markdown report via the OpenAI Responses API.

EXAMPLES:
    vttreport                                   # Process ./data into ./result
    vttreport -d meetings -o reports            # Custom input and output roots
    vttreport -m gpt-4o --limit-files 3         # Only the first three files
    vttreport --no-attachments                  # Inline extracted text, no upload
    vttreport completions bash > vttreport.bash # Generate bash completions

CONFIGURATION:
    Prompts are read from the config file given with --conf. An INI
    [prompts] section with system_prompt and user_prompt keys is used as-is;
    any other file is taken wholesale as the system prompt.

ENVIRONMENT:
    OPENAI_API_KEY     required credential (also loaded from a .env file)
    OPENAI_BASE_URL    optional alternate endpoint

EXIT CODES:
    0  all files succeeded, or none were found
    1  at least one file failed
    2  configuration/setup error")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: GenerateArgs,
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
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} [{}] {}\x1B[0m",
                color,
                now,
                record.level().as_str().to_lowercase(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger once with info level by default
    let _ = CustomLogger::init(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "vttreport", &mut std::io::stdout());
            ExitCode::SUCCESS
        }
        Some(Commands::Generate(args)) => run_batch(args).await,
        None => run_batch(cli.args).await,
    }
}

async fn run_batch(args: GenerateArgs) -> ExitCode {
    if args.quiet {
        log::set_max_level(LevelFilter::Warn);
    }

    // Load environment from .env if available
    env_utils::load_env_auto();

    let prompts = match PromptConfig::load(&args.conf) {
        Ok(prompts) => prompts,
        Err(e) => {
            error!("Loading prompts failed: {}", e);
            return ExitCode::from(2);
        }
    };

    if !FileManager::dir_exists(&args.data) {
        error!("Data dir not found: {:?}", args.data);
        return ExitCode::from(2);
    }

    let remote = match RemoteConfig::from_env(args.model, args.request_timeout) {
        Ok(remote) => remote,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    let config = Config {
        prompts,
        remote: remote.clone(),
        limit_files: args.limit_files,
        use_attachments: !args.no_attachments,
    };

    let provider = match OpenAI::new(remote) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    let controller = match Controller::new(config, provider) {
        Ok(controller) => controller,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    match controller.run(&args.data, &args.out).await {
        Ok(summary) => {
            println!("Done. {}/{} succeeded.", summary.succeeded, summary.attempted);
            if summary.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!("Batch run failed: {}", e);
            ExitCode::from(1)
        }
    }
}
