// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Git engine access.
//!
//! Git-replicator never implements Git itself. Everything that touches
//! repository internals goes through the [`GitEngine`] trait, which only
//! needs to be able to clone a URL into a directory, list the remotes of a
//! working copy, and checkout a branch. The default engine is backed by
//! libgit2 through [`Git2Engine`].
//!
//! # Authentication
//!
//! Clones through [`Git2Engine`] go through `auth-git2`, which tries the SSH
//! agent, SSH keys, and Git credential helpers before falling back to
//! prompting the user. Prompts suspend the clone progress bar while waiting
//! for input.

use auth_git2::{GitAuthenticator, Prompter};
use git2::{
    build::{CheckoutBuilder, RepoBuilder},
    BranchType, Config, ErrorCode, FetchOptions, RemoteCallbacks, Repository,
};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Password, Text};
use std::{
    path::{Path, PathBuf},
    time,
};
use tracing::{debug, info, instrument};

/// Name of remote that fresh clones get.
pub const DEFAULT_REMOTE: &str = "origin";

/// Layer of indirection for Git access.
pub trait GitEngine {
    /// Clone remote URL into target directory.
    fn clone_repo(&self, url: &str, path: &Path) -> Result<()>;

    /// List URLs of every remote in working copy at path.
    fn remote_urls(&self, path: &Path) -> Result<Vec<String>>;

    /// Point working copy at branch, creating it if needed.
    ///
    /// Uses the remote branch of the same name when one exists, otherwise
    /// branches off the current HEAD. Working tree is forced to match.
    fn checkout_branch(&self, path: &Path, branch: &str) -> Result<()>;
}

/// Git access through libgit2.
#[derive(Debug, Clone)]
pub struct Git2Engine {
    bar: ProgressBar,
}

impl Git2Engine {
    /// Construct new engine that shows clone progress.
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::new(0),
        }
    }

    /// Construct new engine that never draws anything.
    pub fn quiet() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for Git2Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl GitEngine for Git2Engine {
    /// Clone remote URL into target directory.
    ///
    /// The progress of the clone is displayed through a progress bar. If
    /// credentials are required, the user is prompted for them.
    ///
    /// # Errors
    ///
    /// - Return [`Error::Git2`] if libgit2 operations fail.
    /// - Return [`Error::IndicatifStyleTemplate`] if progress bar cannot be
    ///   styled.
    #[instrument(skip(self), level = "debug")]
    fn clone_repo(&self, url: &str, path: &Path) -> Result<()> {
        info!("clone {url} into {:?}", path.display());
        let style = ProgressStyle::with_template(
            "{elapsed_precise:.green}  {msg:<50}  [{wide_bar:.yellow/blue}]",
        )?
        .progress_chars("-Cco.");
        let bar = self.bar.clone();
        bar.reset();
        bar.set_style(style);
        bar.set_message(url.to_string());
        bar.enable_steady_tick(time::Duration::from_millis(100));

        let prompter = IndicatifPrompter::new(bar.clone());
        let authenticator = GitAuthenticator::default().set_prompter(prompter);
        let config = Config::open_default()?;

        let mut throttle = time::Instant::now();
        let mut rc = RemoteCallbacks::new();
        rc.credentials(authenticator.credentials(&config));
        rc.transfer_progress(|progress| {
            if throttle.elapsed() > time::Duration::from_millis(10) {
                throttle = time::Instant::now();
                bar.set_length(progress.total_objects() as u64);
                bar.set_position(progress.received_objects() as u64);
            }
            true
        });

        let mut fo = FetchOptions::new();
        fo.remote_callbacks(rc);
        let result = RepoBuilder::new().fetch_options(fo).clone(url, path);
        self.bar.finish_and_clear();
        result?;

        Ok(())
    }

    /// List URLs of every remote in working copy at path.
    ///
    /// Remotes without a valid UTF-8 URL are skipped.
    ///
    /// # Errors
    ///
    /// - Return [`Error::Open`] if path is not a working copy.
    /// - Return [`Error::Git2`] if remotes cannot be listed.
    #[instrument(skip(self), level = "debug")]
    fn remote_urls(&self, path: &Path) -> Result<Vec<String>> {
        let repository = Repository::open(path).map_err(|err| Error::Open {
            source: err,
            path: path.into(),
        })?;
        let mut urls = Vec::new();
        for name in repository.remotes()?.iter().flatten() {
            let remote = repository.find_remote(name)?;
            if let Some(url) = remote.url() {
                debug!("remote {name} of {:?} is {url}", path.display());
                urls.push(url.to_string());
            }
        }

        Ok(urls)
    }

    /// Point working copy at branch, creating it if needed.
    ///
    /// Equivalent of `git switch -C <branch> [origin/<branch>]` with forced
    /// checkout. Any uncommitted changes are discarded.
    ///
    /// # Errors
    ///
    /// - Return [`Error::Git2`] if libgit2 operations fail.
    #[instrument(skip(self), level = "debug")]
    fn checkout_branch(&self, path: &Path, branch: &str) -> Result<()> {
        let repository = Repository::open(path)?;
        let upstream = format!("{DEFAULT_REMOTE}/{branch}");

        let (target, tracked) = match repository.find_branch(&upstream, BranchType::Remote) {
            Ok(remote) => (remote.get().peel_to_commit()?, true),
            Err(err) if err.code() == ErrorCode::NotFound => {
                debug!("no {upstream} found, branch off HEAD");
                (repository.head()?.peel_to_commit()?, false)
            }
            Err(err) => return Err(err.into()),
        };

        let refname = format!("refs/heads/{branch}");
        let on_branch = repository
            .head()
            .ok()
            .and_then(|head| head.name().map(|name| name == refname))
            .unwrap_or(false);

        // INVARIANT: libgit2 refuses to force update the branch HEAD is on.
        if on_branch {
            repository.reset(target.as_object(), git2::ResetType::Hard, None)?;
        } else {
            let mut local = repository.branch(branch, &target, true)?;
            if tracked {
                local.set_upstream(Some(&upstream))?;
            }
            repository.checkout_tree(target.as_object(), Some(CheckoutBuilder::new().force()))?;
            repository.set_head(&refname)?;
        }

        info!("checked out {branch} in {:?}", path.display());

        Ok(())
    }
}

/// Git2 authentication prompter for progress bar.
#[derive(Debug, Clone)]
pub struct IndicatifPrompter {
    bar: ProgressBar,
}

impl IndicatifPrompter {
    /// Construct new progress bar authenticator.
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl Prompter for IndicatifPrompter {
    #[instrument(skip(self, url, _config), level = "debug")]
    fn prompt_username_password(
        &mut self,
        url: &str,
        _config: &git2::Config,
    ) -> Option<(String, String)> {
        info!("authentication required at {url}");
        self.bar.suspend(|| -> Option<(String, String)> {
            let username = Text::new("username").prompt().ok()?;
            let password = Password::new("password")
                .without_confirmation()
                .prompt()
                .ok()?;
            Some((username, password))
        })
    }

    #[instrument(skip(self, username, url, _config), level = "debug")]
    fn prompt_password(
        &mut self,
        username: &str,
        url: &str,
        _config: &git2::Config,
    ) -> Option<String> {
        info!("authentication required at {url} for user {username}");
        self.bar.suspend(|| -> Option<String> {
            Password::new("password")
                .without_confirmation()
                .prompt()
                .ok()
        })
    }

    #[instrument(skip(self, ssh_key_path, _config), level = "debug")]
    fn prompt_ssh_key_passphrase(
        &mut self,
        ssh_key_path: &Path,
        _config: &git2::Config,
    ) -> Option<String> {
        info!(
            "authentication required with ssh key at {}",
            ssh_key_path.display()
        );
        self.bar.suspend(|| -> Option<String> {
            Password::new("passphrase")
                .without_confirmation()
                .prompt()
                .ok()
        })
    }
}

/// Git engine error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Style template cannot be set for progress bars.
    #[error(transparent)]
    IndicatifStyleTemplate(#[from] indicatif::style::TemplateError),

    /// Path cannot be opened as a Git repository.
    #[error("failed to open git repository at {:?}", path.display())]
    Open {
        #[source]
        source: git2::Error,
        path: PathBuf,
    },

    /// Operations from libgit2 fail.
    #[error(transparent)]
    Git2(#[from] git2::Error),
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
