use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use command::{CommandContext, CommandOutput};
use hpl_protocol::{serialize_json, ExitCode};
use std::io;
use std::path::PathBuf;

mod command;
mod config;
mod render;

pub use config::{
    resolve_config, ConfigFile, ConfigOverrides, ResolvedConfig, DEFAULT_BASE_URL,
};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "hpl")]
#[command(about = "Human Pattern Lab notes client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit exactly one JSON envelope on stdout (implies --quiet)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// API base URL (overrides HPL_BASE_URL and the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show CLI version (show_version)
    Version,

    /// Show CLI capabilities for agents (show_capabilities)
    Capabilities,

    /// Check API health (check_health)
    Health,

    /// Lab Notes commands
    #[command(subcommand)]
    Notes(NotesCommands),
}

#[derive(Subcommand)]
pub enum NotesCommands {
    /// List lab notes (render_lab_note)
    List(ListArgs),

    /// Fetch one lab note by slug (render_lab_note)
    Get(GetArgs),

    /// Create a lab note (create_lab_note)
    Create(CreateArgs),

    /// Update an existing lab note (update_lab_note)
    Update(UpdateArgs),

    /// Sync markdown notes from a directory or content repo (sync_lab_notes)
    Sync(SyncArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Rows shown in the table (0 = all); JSON output is never truncated
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
}

#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    pub slug: String,

    /// Print only the markdown body
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ContentArgs {
    /// Markdown content (inline)
    #[arg(long)]
    pub markdown: Option<String>,

    /// Path to a markdown file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct NoteFieldArgs {
    /// Locale code
    #[arg(long, default_value = "en")]
    pub locale: String,

    #[arg(long)]
    pub subtitle: Option<String>,

    #[arg(long)]
    pub summary: Option<String>,

    /// Comma-separated tags
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// Publish date (ISO 8601)
    #[arg(long)]
    pub published: Option<String>,

    /// published | draft | archived
    #[arg(long)]
    pub status: Option<String>,

    /// labnote | paper | memo | lore | weather
    #[arg(long = "type")]
    pub note_type: Option<String>,

    #[arg(long)]
    pub dept: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub slug: String,

    #[command(flatten)]
    pub content: ContentArgs,

    #[command(flatten)]
    pub fields: NoteFieldArgs,

    /// API token (overrides HPL_TOKEN)
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    pub slug: String,

    #[arg(long)]
    pub title: String,

    #[command(flatten)]
    pub content: ContentArgs,

    #[command(flatten)]
    pub fields: NoteFieldArgs,

    /// API token (overrides HPL_TOKEN)
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Directory containing markdown notes
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Content repo: owner/name or URL (or HPL_CONTENT_REPO)
    #[arg(long)]
    pub content_repo: Option<String>,

    /// Branch or tag to check out
    #[arg(long, default_value = hpl_sync::DEFAULT_CONTENT_REF)]
    pub content_ref: String,

    /// Subdirectory inside the content repo holding the notes
    #[arg(long, default_value = "labnotes")]
    pub content_subdir: PathBuf,

    /// Cache directory for cloned content repos
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    #[arg(long, default_value = "en")]
    pub locale: String,

    /// Read and validate every note but do not call the API
    #[arg(long)]
    pub dry_run: bool,

    /// Only files whose path contains this text (case-insensitive)
    #[arg(long)]
    pub only: Option<String>,

    /// Only the first N selected files (0 = all)
    #[arg(long)]
    pub limit: Option<usize>,

    /// API token (overrides HPL_TOKEN)
    #[arg(long)]
    pub token: Option<String>,
}

fn init_logger(cli: &Cli) {
    let quiet = cli.quiet || cli.json;
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn emit(output: &CommandOutput, json: bool) -> Result<()> {
    if json {
        return print_stdout(&serialize_json(&output.envelope)?);
    }

    for line in &output.text {
        print_stdout(line)?;
    }
    if let Some(warnings) = &output.envelope.warnings {
        for warning in warnings {
            eprintln!("warning: {warning}");
        }
    }
    if output.envelope.is_error() {
        if let Some(error) = &output.envelope.error {
            eprintln!("error: {}: {}", error.code, error.message);
        }
    }
    Ok(())
}

/// Parses arguments, runs one command, writes its result and returns the
/// process exit code.
pub async fn main_entry() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logger(&cli);

    let ctx = CommandContext::from_process(cli.json, cli.base_url.clone());
    let output = match cli.command {
        Commands::Version => command::services::version::run(&ctx),
        Commands::Capabilities => command::services::capabilities::run(&ctx),
        Commands::Health => command::services::health::run(&ctx).await,
        Commands::Notes(notes) => command::run_notes(notes, &ctx).await,
    };

    emit(&output, cli.json)?;
    Ok(output.exit)
}
