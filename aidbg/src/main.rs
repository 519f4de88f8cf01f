//! `aidbg`: step through a batch script with an AI assistant at the prompt.

use std::path::{Path, PathBuf};

use aidbg::debugger::script::Script;
use aidbg::debugger::{ScriptDebugger, debugger_tools};
use aidbg::exit_codes;
use aidbg::io::ai_client::CommandAiClient;
use aidbg::io::config::load_config;
use aidbg::io::context::SourceContextBuilder;
use aidbg::io::init::{AidbgPaths, InitOptions, init_aidbg};
use aidbg::io::tools::{CompositeRegistry, builtin_tools};
use aidbg::logging;
use aidbg::repl::{self, EditorReader};
use aidbg::session::{Session, SessionOptions};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "aidbg",
    version,
    about = "Batch script debugger with an AI assistant"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Debug a script interactively.
    Run {
        /// Script to debug.
        script: PathBuf,
        /// Config file to use instead of `.aidbg/config.toml`.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Show error details and enable debug tracing.
        #[arg(long)]
        debug: bool,
    },
    /// Create `.aidbg/` with a default config.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(matches!(cli.command, Command::Run { debug: true, .. }));
    if let Err(err) = run(cli) {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = std::env::current_dir().context("resolve current directory")?;
    match cli.command {
        Command::Init { force } => cmd_init(&root, force),
        Command::Run {
            script,
            config,
            debug,
        } => cmd_run(&root, &script, config, debug),
    }
}

fn cmd_init(root: &Path, force: bool) -> Result<()> {
    let paths = init_aidbg(root, &InitOptions { force })?;
    println!("Created {}", paths.config_path.display());
    Ok(())
}

fn cmd_run(root: &Path, script: &Path, config: Option<PathBuf>, debug: bool) -> Result<()> {
    let paths = AidbgPaths::new(root);
    let config_path = config.unwrap_or_else(|| paths.config_path.clone());
    let mut cfg = load_config(&config_path)?;
    cfg.debug |= debug;
    let script = Script::load(script)?;
    info!(script = %script.path.display(), lines = script.len(), "loaded script");

    let registry = CompositeRegistry::new(debugger_tools(), builtin_tools());
    let client = CommandAiClient::new(
        cfg.agent.clone(),
        config_path.display().to_string(),
        registry,
    )?;
    let builder = SourceContextBuilder::new(cfg.context.source_window);
    let mut session = Session::new(
        builder,
        client,
        std::io::stdout(),
        SessionOptions::from_config(&cfg),
    );
    let mut debugger = ScriptDebugger::new(script, std::io::stdout());

    let history = paths
        .aidbg_dir
        .is_dir()
        .then(|| paths.history_path.clone());
    let mut reader = EditorReader::new(session.trigger(), history)?;

    session.print_banner();
    debugger.show_position();
    let result = repl::run(&mut session, &mut debugger, &mut reader);
    reader.save_history();
    result
}
