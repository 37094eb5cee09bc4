use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use omnigenius::connector::api::{Container, ContainerConfig, Router};
use omnigenius::{Backoff, Commands, GenerationParameters, GuardArg, PollPolicy};

#[derive(Parser)]
#[command(name = "omnigenius")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.omnigenius")]
    data_dir: String,

    /// Keep the chat log in memory only
    #[arg(long, global = true)]
    memory_storage: bool,

    /// Answer with canned replies instead of calling the inference service
    #[arg(long, global = true)]
    mock_inference: bool,

    /// Inference endpoint base URL (defaults to $OMNIGENIUS_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[arg(long, global = true, default_value = "1000")]
    poll_interval_ms: u64,

    /// Status checks before giving up (at least 1)
    #[arg(
        long,
        global = true,
        default_value = "120",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_attempts: u32,

    /// Grow the poll interval exponentially (capped, with jitter)
    #[arg(long, global = true)]
    backoff: bool,

    #[arg(long, global = true, default_value = "512")]
    max_tokens: u32,

    #[arg(long, global = true, default_value = "0.7")]
    sampling_bias: f32,

    #[arg(long, global = true, default_value = "4")]
    recurrence_steps: u32,

    #[arg(long, global = true, value_enum, default_value = "reject")]
    guard: GuardArg,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = expand_tilde(&cli.data_dir);
    if !cli.memory_storage {
        std::fs::create_dir_all(&data_dir)?;
    }

    let mut poll_policy = PollPolicy::new(
        Duration::from_millis(cli.poll_interval_ms),
        cli.max_attempts,
    );
    if cli.backoff {
        poll_policy = poll_policy.with_backoff(Backoff::default());
    }

    let config = ContainerConfig {
        data_dir,
        memory_storage: cli.memory_storage,
        mock_inference: cli.mock_inference,
        endpoint: cli.endpoint,
        parameters: GenerationParameters::new(
            cli.max_tokens,
            cli.sampling_bias,
            cli.recurrence_steps,
        ),
        poll_policy,
        guard: cli.guard.mode(),
    };

    let container = Container::new(config)?;
    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
