// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Branch directory management.
//!
//! Every immediate subdirectory of a repo directory is one checked out
//! working copy. The base clone is listed like any other, but can never be
//! deleted through here.

use crate::path::is_base_dir_name;

use std::{
    fs::{read_dir, remove_dir_all},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// List names of branch directories in repo directory.
///
/// Includes the base clone. Names are sorted.
///
/// # Errors
///
/// - Return [`Error::ReadRepoDir`] if repo directory cannot be read.
#[instrument(skip(repo_dir), level = "debug")]
pub fn list_branch_dirs(repo_dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let repo_dir = repo_dir.as_ref();
    let read_err = |err| Error::ReadRepoDir {
        source: err,
        repo_dir: repo_dir.into(),
    };

    let mut branches = Vec::new();
    for entry in read_dir(repo_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_dir() {
            branches.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    branches.sort();

    Ok(branches)
}

/// Delete branch directory from repo directory.
///
/// Deleting a branch directory that does not exist is not an error.
///
/// # Errors
///
/// - Return [`Error::InvalidBranchName`] if branch name is unusable, or
///   names the base clone.
/// - Return [`Error::DeleteBranchDir`] if branch directory cannot be
///   removed.
#[instrument(skip(repo_dir), level = "debug")]
pub fn delete_branch_dir(repo_dir: impl AsRef<Path>, branch: &str) -> Result<()> {
    validate_branch_name(branch)?;

    let branch_dir = repo_dir.as_ref().join(branch);
    match remove_dir_all(&branch_dir) {
        Ok(()) => info!("deleted branch directory {:?}", branch_dir.display()),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no branch directory at {:?}", branch_dir.display())
        }
        Err(err) => {
            return Err(Error::DeleteBranchDir {
                source: err,
                branch_dir,
            })
        }
    }

    Ok(())
}

/// Check that branch name can live as an immediate child of repo directory.
///
/// # Errors
///
/// - Return [`Error::InvalidBranchName`] if branch name is empty, is "base",
///   "." or "..", or contains a path separator.
pub fn validate_branch_name(branch: &str) -> Result<()> {
    let reason = if branch.is_empty() {
        "branch name is required"
    } else if is_base_dir_name(branch) {
        "\"base\" is reserved for the base clone"
    } else if branch == "." || branch == ".." {
        "branch name cannot be a relative path"
    } else if branch.contains(['/', '\\']) {
        "branch name cannot contain a path separator"
    } else {
        return Ok(());
    };

    Err(Error::InvalidBranchName {
        branch: branch.into(),
        reason,
    })
}

/// Branch directory error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Branch name cannot be used as branch directory.
    #[error("invalid branch name {branch:?}: {reason}")]
    InvalidBranchName { branch: String, reason: &'static str },

    /// Repo directory cannot be read.
    #[error("failed to read repo directory {:?}", repo_dir.display())]
    ReadRepoDir {
        #[source]
        source: std::io::Error,
        repo_dir: PathBuf,
    },

    /// Branch directory cannot be removed.
    #[error("failed to delete branch directory {:?}", branch_dir.display())]
    DeleteBranchDir {
        #[source]
        source: std::io::Error,
        branch_dir: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
