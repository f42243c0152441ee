use std::fs;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use indicatif::ProgressBar;
use output::{OutputFormat, Renderer};
use progress::spinner;
use serde::Serialize;
use serde_json::Value;
use threadmark_core::{bootstrap, ServiceConfig, ServiceMode, ToolExecutor, ToolExecutorError};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "threadmark",
    version,
    about = "Render Markdown headings, page through item lists, and review comment permissions from the shell."
)]
struct Cli {
    /// Preferred renderer for command output.
    #[arg(long, global = true, value_enum, default_value = "markdown")]
    format: OutputFormat,
    /// Disable ANSI colors in CLI output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Suppress non-critical CLI output.
    #[arg(long, global = true)]
    quiet: bool,
    /// Disable progress indicators.
    #[arg(long, global = true)]
    no_progress: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, Clone)]
enum Command {
    /// Serve tools over stdio (line-delimited JSON).
    Serve,
    /// Inspect and invoke available tools.
    Tools {
        #[command(subcommand)]
        command: ToolCommand,
    },
    /// Inspect or reset the in-memory render cache.
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
    /// View recent tool telemetry captured by the service.
    Telemetry {
        /// Maximum number of telemetry entries to display (0 = all).
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand, Clone)]
enum ToolCommand {
    /// List registered tools and their descriptions.
    List,
    /// Execute a tool by name with optional JSON arguments.
    Call {
        name: String,
        /// Tool arguments expressed as JSON (`{"key": "value"}`) or @path to a JSON file.
        #[arg(short, long)]
        arguments: Option<String>,
    },
}

#[derive(Debug, Subcommand, Clone)]
enum CacheCommand {
    /// Report memoized line count and hit/miss totals.
    Status,
    /// Drop memoized conversions while keeping the counters.
    Clear,
}

#[derive(Clone, Debug, Serialize)]
struct CacheReport {
    entries: usize,
    hits: u64,
    misses: u64,
    hit_rate: f64,
}

impl Cli {
    fn progress_enabled(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut config = ServiceConfig::default();
    config.mode = match cli.command {
        Command::Serve => ServiceMode::Stdio,
        _ => ServiceMode::Headless,
    };

    let runtime = bootstrap(config).await?;
    let executor = runtime.executor();
    let renderer = Renderer::new(cli.format);

    match &cli.command {
        Command::Serve => {
            tracing::info!(target: "threadmark_cli", "serving tools over stdio");
            runtime.serve().await
        }
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "threadmark", &mut std::io::stdout());
            Ok(())
        }
        Command::Tools { command } => {
            handle_tool_command(command.clone(), &cli, &renderer, executor).await
        }
        Command::Cache { command } => handle_cache_command(command.clone(), &cli, &renderer, &executor),
        Command::Telemetry { limit } => {
            handle_telemetry_command(*limit, &cli, &renderer, &executor).await
        }
    }
}

async fn handle_tool_command(
    command: ToolCommand,
    cli: &Cli,
    renderer: &Renderer,
    executor: ToolExecutor,
) -> Result<()> {
    match command {
        ToolCommand::List => {
            let definitions = executor.list_tools().await;
            if cli.quiet {
                return Ok(());
            }
            renderer.tool_definitions(&definitions)?;
        }
        ToolCommand::Call { name, arguments } => {
            let payload = parse_arguments(arguments)?;
            let spinner = spinner(cli.progress_enabled(), format!("Calling `{name}`..."));
            match executor.call_tool(&name, payload).await {
                Ok(response) => {
                    finish_spinner(spinner, Some(format!("Tool `{name}` completed")));
                    if !cli.quiet {
                        renderer.tool_response(&response)?;
                    }
                }
                Err(ToolExecutorError::UnknownTool(_)) => {
                    finish_spinner(spinner, None);
                    anyhow::bail!("unknown tool: {name}");
                }
                Err(ToolExecutorError::Execution { source, .. }) => {
                    finish_spinner(spinner, None);
                    return Err(source.context(format!("tool `{name}` failed")));
                }
            }
        }
    }

    Ok(())
}

fn handle_cache_command(
    command: CacheCommand,
    cli: &Cli,
    renderer: &Renderer,
    executor: &ToolExecutor,
) -> Result<()> {
    let context = executor.context();
    match command {
        CacheCommand::Status => {
            let snapshot = context.state.render_cache.snapshot();
            if cli.quiet {
                return Ok(());
            }
            renderer.cache_status(&CacheReport {
                entries: snapshot.entries,
                hits: snapshot.hits,
                misses: snapshot.misses,
                hit_rate: snapshot.hit_rate(),
            })?;
        }
        CacheCommand::Clear => {
            context.state.render_cache.clear();
            if cli.quiet {
                return Ok(());
            }
            renderer.cache_cleared()?;
        }
    }
    Ok(())
}

async fn handle_telemetry_command(
    limit: usize,
    cli: &Cli,
    renderer: &Renderer,
    executor: &ToolExecutor,
) -> Result<()> {
    if cli.quiet {
        return Ok(());
    }

    let entries = executor.context().telemetry_snapshot().await;
    if entries.is_empty() {
        renderer.no_telemetry()?;
        return Ok(());
    }

    let total = entries.len();
    let start = if limit == 0 {
        0
    } else {
        total.saturating_sub(limit)
    };
    let sliced: Vec<_> = entries.into_iter().skip(start).collect();
    renderer.telemetry(&sliced)?;
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,threadmark_cli=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_ansi(!cli.no_color)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}

fn parse_arguments(arguments: Option<String>) -> Result<Value> {
    match arguments {
        Some(raw) if raw.starts_with('@') => {
            let path = raw.trim_start_matches('@');
            let contents =
                fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("invalid JSON arguments in {path}"))
        }
        Some(raw) => serde_json::from_str(&raw).context("invalid JSON arguments"),
        None => Ok(Value::Object(Default::default())),
    }
}

fn finish_spinner(spinner: Option<ProgressBar>, message: Option<String>) {
    if let Some(progress) = spinner {
        if let Some(msg) = message {
            progress.finish_with_message(msg);
        } else {
            progress.finish_and_clear();
        }
    }
}

mod output {
    use anyhow::Result;
    use clap::ValueEnum;
    use serde_json::json;
    use threadmark_core::state::{TelemetryEntry, ToolDefinition, ToolResponse};

    #[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
    pub enum OutputFormat {
        Json,
        Markdown,
        Text,
    }

    #[derive(Copy, Clone, Debug)]
    pub struct Renderer {
        format: OutputFormat,
    }

    impl Renderer {
        pub fn new(format: OutputFormat) -> Self {
            Self { format }
        }

        pub fn tool_definitions(&self, definitions: &[ToolDefinition]) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    let payload = json!({ "tools": definitions });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Markdown => {
                    println!("| Tool | Description |");
                    println!("| --- | --- |");
                    for entry in definitions {
                        println!("| `{}` | {} |", entry.name, flatten(&entry.description));
                    }
                }
                OutputFormat::Text => {
                    for entry in definitions {
                        println!("• {} — {}", entry.name, entry.description);
                    }
                }
            }
            Ok(())
        }

        pub fn tool_response(&self, response: &ToolResponse) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(response)?);
                }
                OutputFormat::Markdown | OutputFormat::Text => {
                    for content in &response.content {
                        println!("{}", content.text.trim_end());
                    }
                    if let Some(metadata) = &response.metadata {
                        println!();
                        println!("```json");
                        println!("{}", serde_json::to_string_pretty(metadata)?);
                        println!("```");
                    }
                }
            }
            Ok(())
        }

        pub fn telemetry(&self, entries: &[TelemetryEntry]) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(entries)?);
                }
                OutputFormat::Markdown => {
                    println!("| Timestamp | Tool | Latency (ms) | Success |");
                    println!("| --- | --- | ---: | --- |");
                    for entry in entries {
                        println!(
                            "| {} | `{}` | {} | {} |",
                            entry.timestamp, entry.tool, entry.latency_ms, entry.success
                        );
                    }
                }
                OutputFormat::Text => {
                    for entry in entries {
                        println!(
                            "[{}] {} — {} ms ({})",
                            entry.timestamp,
                            entry.tool,
                            entry.latency_ms,
                            if entry.success { "success" } else { "error" }
                        );
                        if let Some(error) = &entry.error {
                            println!("  error: {error}");
                        }
                    }
                }
            }
            Ok(())
        }

        pub fn cache_status(&self, report: &crate::CacheReport) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(report)?);
                }
                OutputFormat::Markdown => {
                    println!("| Property | Value |");
                    println!("| --- | --- |");
                    println!("| Entries | {} |", report.entries);
                    println!("| Hits | {} |", report.hits);
                    println!("| Misses | {} |", report.misses);
                    println!("| Hit rate | {:.1}% |", report.hit_rate);
                }
                OutputFormat::Text => {
                    println!("Render cache:");
                    println!("  Entries: {}", report.entries);
                    println!("  Hits: {}", report.hits);
                    println!("  Misses: {}", report.misses);
                    println!("  Hit rate: {:.1}%", report.hit_rate);
                }
            }
            Ok(())
        }

        pub fn cache_cleared(&self) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    let payload = json!({ "event": "cache_clear", "status": "success" });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Markdown | OutputFormat::Text => {
                    println!("Render cache cleared.");
                }
            }
            Ok(())
        }

        pub fn no_telemetry(&self) -> Result<()> {
            match self.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&Vec::<TelemetryEntry>::new())?
                    );
                }
                OutputFormat::Markdown | OutputFormat::Text => {
                    println!("No telemetry entries recorded yet.");
                }
            }
            Ok(())
        }
    }

    fn flatten(value: &str) -> String {
        value
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

mod progress {
    use std::time::Duration;

    use indicatif::{ProgressBar, ProgressStyle};

    pub fn spinner(enabled: bool, message: impl Into<String>) -> Option<ProgressBar> {
        if !enabled {
            return None;
        }
        let progress = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress.set_style(style);
        progress.set_message(message.into());
        progress.enable_steady_tick(Duration::from_millis(80));
        Some(progress)
    }
}
