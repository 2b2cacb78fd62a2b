// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use git_replicator::{
    delete_branch_dir, find_repo_dir, get, list_branch_dirs, list_repos, replicate,
    switch_branch, Config, Git2Engine, ReplicateOptions, SwitchOptions,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{
    env::current_dir,
    fs::canonicalize,
    path::{Path, PathBuf},
    process::exit,
};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "git-replicator [options] <command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path to configuration file [default: ~/.git-replicator.toml].
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let root = resolve_root(self.config.as_deref())?;
        match self.command {
            Command::Get(opts) => run_get(opts, &root),
            Command::List => run_list(&root),
            Command::Branch => run_branch(&root),
            Command::Delete(opts) => run_delete(opts, &root),
            Command::Switch(opts) => run_switch(opts, &root),
            Command::Replicate(opts) => run_replicate(opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Clone repository into replicator root.
    #[command(override_usage = "git-replicator get [options] <url>")]
    Get(GetOptions),

    /// List repositories in replicator root.
    #[command(override_usage = "git-replicator list [options]")]
    List,

    /// List branch directories of current repository.
    #[command(override_usage = "git-replicator branch [options]")]
    Branch,

    /// Delete branch directory of current repository.
    #[command(override_usage = "git-replicator delete [options] <branch>")]
    Delete(DeleteOptions),

    /// Clone current repository into new branch directory.
    #[command(override_usage = "git-replicator switch [options] <branch>")]
    Switch(SwitchCliOptions),

    /// Replicate repository from one remote to another.
    #[command(override_usage = "git-replicator replicate [options] --source <url> --target <url>")]
    Replicate(ReplicateCliOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct GetOptions {
    /// URL of remote to clone.
    #[arg(required = true, value_name = "url")]
    pub url: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct DeleteOptions {
    /// Name of branch directory to delete.
    #[arg(required = true, value_name = "branch")]
    pub branch: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct SwitchCliOptions {
    /// Name of branch to materialize.
    #[arg(required = true, value_name = "branch")]
    pub branch: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ReplicateCliOptions {
    /// URL of source repository.
    #[arg(long, required = true, value_name = "url")]
    pub source: String,

    /// URL of target repository.
    #[arg(long, required = true, value_name = "url")]
    pub target: String,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(layer).with(filter);

    let code = tracing::subscriber::with_default(subscriber, || match cli.run() {
        Ok(()) => 0,
        Err(error) => {
            error!("{error:?}");
            1
        }
    });

    exit(code)
}

fn resolve_root(config: Option<&Path>) -> Result<PathBuf> {
    let root = Config::load(config)
        .context("failed to load configuration")?
        .root_dir()
        .context("failed to resolve replicator root")?;

    // INVARIANT: Compare against the same spelling current_dir() reports.
    Ok(canonicalize(&root).unwrap_or(root))
}

fn current_repo_dir(root: &Path) -> Result<PathBuf> {
    let cwd = current_dir().context("failed to get current directory")?;
    find_repo_dir(cwd, root).context("failed to locate repository")
}

fn run_get(opts: GetOptions, root: &Path) -> Result<()> {
    get(&opts.url, root, &Git2Engine::new()).context("failed to get repository")?;
    Ok(())
}

fn run_list(root: &Path) -> Result<()> {
    let repos = list_repos(root).context("failed to list repositories")?;
    for repo in repos {
        println!("{}/{}/{}", repo.host, repo.owner, repo.repo);
    }

    Ok(())
}

fn run_branch(root: &Path) -> Result<()> {
    let repo_dir = current_repo_dir(root)?;
    let branches = list_branch_dirs(repo_dir).context("failed to list branch directories")?;
    for branch in branches {
        println!("{branch}");
    }

    Ok(())
}

fn run_delete(opts: DeleteOptions, root: &Path) -> Result<()> {
    let repo_dir = current_repo_dir(root)?;
    delete_branch_dir(repo_dir, &opts.branch).context("failed to delete branch directory")?;
    Ok(())
}

fn run_switch(opts: SwitchCliOptions, root: &Path) -> Result<()> {
    let opts = SwitchOptions {
        repo_dir: current_repo_dir(root)?,
        branch_name: opts.branch,
        root: root.to_path_buf(),
    };
    switch_branch(&opts, &Git2Engine::new()).context("failed to switch branch")?;
    Ok(())
}

fn run_replicate(opts: ReplicateCliOptions) -> Result<()> {
    let opts = ReplicateOptions {
        source: opts.source,
        target: opts.target,
    };
    replicate(&opts).context("failed to replicate")?;
    Ok(())
}
