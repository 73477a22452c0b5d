use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use color_print::cstr;

use worktree_assistant::commands;
use worktree_assistant::config::Config;
use worktree_assistant::git::{GitError, Repository, WorktreeDirCache};
use worktree_assistant::styling::{ERROR, ERROR_EMOJI, eprintln};
use worktree_assistant::ui::TerminalPrompt;

const AFTER_HELP: &str = cstr!(
    "<bold>Examples:</bold>
  wta add                  # pick a branch, pick a path, add a worktree
  cd \"$(wta switch)\"       # jump to another worktree
  wta remove               # remove a linked worktree"
);

/// Interactive assistant for git worktrees.
#[derive(Debug, Parser)]
#[command(name = "wta", version, about, after_help = AFTER_HELP)]
struct Cli {
    /// Run as if started in this directory.
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a worktree for an existing branch, a new branch, or a commit.
    Add,
    /// Pick a worktree and print its directory.
    Switch,
    /// Pick a worktree and print its open target.
    Open,
    /// Pick a linked worktree and remove it.
    Remove,
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        // Domain errors carry their own styled rendering.
        match err.downcast_ref::<GitError>() {
            Some(git_err) => eprintln!("{}", git_err.styled()),
            None => eprintln!("{ERROR_EMOJI} {ERROR}{err:#}{ERROR:#}"),
        }
        exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let start_dir = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let cache = WorktreeDirCache::new();
    let repo = Repository::discover(start_dir, &cache)?;
    let prompt = TerminalPrompt;

    match cli.command {
        Commands::Add => commands::add::run(&repo, &config, &prompt),
        Commands::Switch => commands::open::switch(&repo, &prompt),
        Commands::Open => commands::open::open(&repo, &config, &prompt),
        Commands::Remove => commands::remove::run(&repo, &prompt),
    }
}
