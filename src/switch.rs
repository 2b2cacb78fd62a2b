// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Branch materialization.
//!
//! Git-replicator never switches the HEAD of an existing working copy.
//! Instead, each branch gets its own fresh clone in a sibling directory of
//! the base clone, named after the branch. The remote to clone from is
//! reconstructed purely from the repo directory's place in the replicator
//! root.

use crate::{
    branch::validate_branch_name,
    git::GitEngine,
    path::remote_url_from_repo_dir,
};

use std::{
    fs::remove_dir_all,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{info, instrument, warn};

/// Options for branch materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOptions {
    /// Repo directory to materialize branch in.
    pub repo_dir: PathBuf,

    /// Name of branch to materialize.
    pub branch_name: String,

    /// Replicator root that repo directory lives under.
    pub root: PathBuf,
}

/// Materialize branch as fresh clone next to base clone.
///
/// Resolves remote URL of repo directory, clones it into
/// `repo_dir/branch_name`, then checks out `branch_name` in the new clone.
/// Returns path to new branch directory.
///
/// A clone that fails midway never leaves its directory behind. A checkout
/// that fails leaves the fresh clone in place on its default branch.
///
/// # Errors
///
/// - Return [`Error::InvalidArgument`] if repo directory is empty, or the
///   branch name cannot be used as a branch directory.
/// - Return [`Error::RemoteResolutionFailed`] if remote URL cannot be
///   reconstructed from repo directory.
/// - Return [`Error::BranchAlreadyExists`] if branch directory exists.
/// - Return [`Error::CloneFailed`] if cloning fails.
/// - Return [`Error::CheckoutFailed`] if branch checkout fails.
#[instrument(skip(opts, engine), level = "debug")]
pub fn switch_branch(opts: &SwitchOptions, engine: &impl GitEngine) -> Result<PathBuf> {
    if opts.repo_dir.as_os_str().is_empty() {
        return Err(Error::InvalidArgument {
            reason: "repo directory is required".into(),
        });
    }
    validate_branch_name(&opts.branch_name).map_err(|err| Error::InvalidArgument {
        reason: err.to_string(),
    })?;

    let remote_url = remote_url_from_repo_dir(&opts.repo_dir, &opts.root)
        .map_err(|err| Error::RemoteResolutionFailed { source: err })?;

    let branch_dir = opts.repo_dir.join(&opts.branch_name);
    if branch_dir.exists() {
        return Err(Error::BranchAlreadyExists { branch_dir });
    }

    if let Err(err) = engine.clone_repo(&remote_url, &branch_dir) {
        discard_partial_clone(&branch_dir);
        return Err(Error::CloneFailed {
            source: err,
            url: remote_url,
            branch_dir,
        });
    }

    engine
        .checkout_branch(&branch_dir, &opts.branch_name)
        .map_err(|err| Error::CheckoutFailed {
            source: err,
            branch: opts.branch_name.clone(),
            branch_dir: branch_dir.clone(),
        })?;

    info!(
        "cloned branch {} into {:?}",
        opts.branch_name,
        branch_dir.display()
    );

    Ok(branch_dir)
}

/// Remove whatever a failed clone left at target path.
pub(crate) fn discard_partial_clone(path: &Path) {
    match remove_dir_all(path) {
        Ok(()) => warn!("removed partial clone at {:?}", path.display()),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!("cannot remove partial clone at {:?}: {err}", path.display()),
    }
}

/// Branch materialization error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required argument is missing or unusable.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Remote URL cannot be reconstructed from repo directory.
    #[error("failed to resolve remote url")]
    RemoteResolutionFailed {
        #[source]
        source: crate::path::Error,
    },

    /// Branch directory is already there.
    #[error("branch directory {:?} already exists", branch_dir.display())]
    BranchAlreadyExists { branch_dir: PathBuf },

    /// Fresh clone into branch directory fails.
    #[error("failed to clone {url} into {:?}", branch_dir.display())]
    CloneFailed {
        #[source]
        source: crate::git::Error,
        url: String,
        branch_dir: PathBuf,
    },

    /// Branch cannot be checked out in fresh clone.
    #[error("failed to checkout {branch} in {:?}", branch_dir.display())]
    CheckoutFailed {
        #[source]
        source: crate::git::Error,
        branch: String,
        branch_dir: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
