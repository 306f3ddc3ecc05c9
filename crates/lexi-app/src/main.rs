use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kanal::AsyncReceiver;
use lexi_config::Config;
use lexi_core::InteractionState;
use lexi_types::AppEvent;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod controller;
pub mod events;
pub mod io;
pub mod state;
pub mod view;


use self::controller::AppController;
use self::events::run_until;
use self::state::build_state;

/// Lexi - dictionary lookup with voice input and spoken definitions
#[derive(Parser)]
#[command(name = "lexi", version, about)]
struct Cli {
    /// Word to look up once; omit for an interactive session
    word: Option<String>,

    /// JSON profile with config overrides
    #[arg(short, long, env = "LEXI_CONFIG")]
    config: Option<PathBuf>,

    /// Dictionary endpoint; the word is appended as a path segment
    #[arg(long)]
    endpoint: Option<String>,

    /// Print the normalized result as JSON (one-shot mode)
    #[arg(long)]
    json: bool,

    /// Read the meanings aloud after a one-shot lookup
    #[arg(long)]
    speak: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info,lexi_core=debug,lexi_io=debug,lexi_app=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            eprintln!("lexi: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.lookup.endpoint = endpoint.clone();
    }

    let controller = AppController::new();
    let state = build_state(&config, controller.sink())?;

    match cli.word.as_deref() {
        Some(word) => lookup_once(state, controller.receiver(), word, cli.json, cli.speak).await,
        None => {
            interactive(&controller, state).await;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn interactive(controller: &AppController, state: InteractionState) {
    let mut tasks = controller.spawn_tasks(state);

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            controller.shutdown();
        }
        Some(result) = tasks.join_next() => {
            log_task_exit(result);
        }
    }

    while let Some(result) = tasks.join_next().await {
        log_task_exit(result);
    }
}

fn log_task_exit(result: Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => tracing::debug!("Task finished"),
        Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
        Err(e) => tracing::error!("Task panicked: {e}"),
    }
}

/// Single lookup, printed to stdout; non-zero exit when nothing was found
async fn lookup_once(
    mut state: InteractionState,
    rx: AsyncReceiver<AppEvent>,
    word: &str,
    json: bool,
    speak: bool,
) -> anyhow::Result<ExitCode> {
    let interrupt = || async {
        let _ = signal::ctrl_c().await;
    };

    if state.search(word).is_none() {
        anyhow::bail!("nothing to look up");
    }

    if !run_until(&mut state, &rx, |s| !s.is_lookup_pending(), interrupt()).await? {
        tracing::info!("Lookup interrupted");
        state.shutdown();
        return Ok(ExitCode::FAILURE);
    }

    match (state.result(), json) {
        (Some(result), true) => println!("{}", serde_json::to_string_pretty(result)?),
        _ => print!("{}", view::render(&state.snapshot())),
    }

    if state.result().is_none() {
        return Ok(ExitCode::FAILURE);
    }

    if speak {
        state.toggle_meaning_playback();
        if let Some(error) = state.error() {
            eprintln!("{error}");
        }

        run_until(&mut state, &rx, |s| !s.is_speaking(), interrupt()).await?;
    }

    state.shutdown();
    Ok(ExitCode::SUCCESS)
}
