//! `dsh`: a minimal shell loop around the line editor.
use anyhow::{Context, Result};
use clap::Parser;
use core_complete::Completer;
use core_config::load_from;
use core_history::History;
use core_readline::{Readline, ReadlineError, ReadlineOptions};
use core_terminal::{CrosstermTerminal, Terminal, TerminalCapabilities};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod shell;

use shell::Outcome;

const LOG_FILE_NAME: &str = "dsh.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "dsh", version, about = "Interactive shell line editor")]
struct Args {
    /// Configuration file (overrides discovery of `dsh.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// History file (overrides `[history] path` and `~/.dsh_history`).
    #[arg(long = "history")]
    history: Option<PathBuf>,
    /// Prompt text (overrides `[prompt] text`).
    #[arg(long = "prompt")]
    prompt: Option<String>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE_NAME);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn build_readline(args: &Args) -> Result<Readline<CrosstermTerminal>> {
    let config_override = args.config.is_some();
    let mut cfg = load_from(args.config.clone()).context("loading configuration")?;
    if let Some(prompt) = &args.prompt {
        cfg.file.prompt.text = prompt.clone();
    }

    let history_path = args.history.clone().unwrap_or_else(|| cfg.history_path());
    let history = History::with_file(&history_path, cfg.file.history.max_size);

    let term = CrosstermTerminal::new();
    let mut options = ReadlineOptions::from_config(&cfg, TerminalCapabilities::detect());
    if let Ok((_, rows)) = term.size() {
        options.menu_max_rows = cfg.effective_menu_rows(rows);
    }

    info!(
        target: "runtime.startup",
        config = cfg.source.as_ref().map(|p| p.display().to_string()).as_deref(),
        config_override,
        history = %history_path.display(),
        history_len = history.len(),
        menu_max_rows = options.menu_max_rows,
        "bootstrap_complete"
    );
    Ok(Readline::new(term, history, Completer::from_env(), options))
}

fn run(rl: &mut Readline<CrosstermTerminal>) -> Result<()> {
    let stdout = io::stdout();
    loop {
        match rl.read_line() {
            Ok(line) => {
                let outcome = shell::handle_line(&line, rl.history(), &mut stdout.lock())?;
                if outcome == Outcome::Exit {
                    info!(target: "runtime", reason = "exit", "shutdown");
                    return Ok(());
                }
            }
            Err(ReadlineError::Eof) => {
                info!(target: "runtime", reason = "eof", "shutdown");
                return Ok(());
            }
            Err(e) => {
                tracing::error!(target: "runtime", error = %e, "readline_failed");
                return Err(e).context("reading input");
            }
        }
    }
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let mut rl = build_readline(&args)?;
    run(&mut rl)
}
