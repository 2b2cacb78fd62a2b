// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Fetch remote repository into replicator root.

use crate::{
    git::GitEngine,
    path::base_path,
    remote::RemoteIdentity,
    switch::discard_partial_clone,
};

use std::{
    fs::{create_dir_all, remove_dir},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// Clone remote URL as base clone under replicator root.
///
/// The base clone is placed at `root/host/owner/repo/base`. Getting a
/// repository that already has a base clone with a matching remote does
/// nothing. Returns path to base clone.
///
/// If the clone fails, the partial base clone is removed together with any
/// parent directories this call had to create.
///
/// # Errors
///
/// - Return [`Error::Remote`] if URL cannot be parsed.
/// - Return [`Error::NotAGitDirectory`] if something that is not a
///   working copy occupies the base clone path.
/// - Return [`Error::ReadRemotes`] if remotes of existing base clone cannot
///   be read.
/// - Return [`Error::RemoteMismatch`] if base clone exists with another
///   remote.
/// - Return [`Error::CreateParentDir`] if parent directories cannot be
///   created.
/// - Return [`Error::CloneFailed`] if cloning fails.
#[instrument(skip(root, engine), level = "debug")]
pub fn get(url: &str, root: impl AsRef<Path>, engine: &impl GitEngine) -> Result<PathBuf> {
    let identity = RemoteIdentity::parse(url)?;
    let clone_url = if url.ends_with(".git") {
        url.to_string()
    } else {
        format!("{url}.git")
    };
    let dir = base_path(root, &identity);

    if dir.exists() {
        let remotes = engine.remote_urls(&dir).map_err(|err| match err {
            err @ crate::git::Error::Open { .. } => Error::NotAGitDirectory {
                source: err,
                dir: dir.clone(),
            },
            err => Error::ReadRemotes {
                source: err,
                dir: dir.clone(),
            },
        })?;

        if remotes.iter().any(|remote| remote == url || *remote == clone_url) {
            info!("{identity} already cloned at {:?}", dir.display());
            return Ok(dir);
        }

        return Err(Error::RemoteMismatch {
            dir,
            expect: clone_url,
            found: remotes,
        });
    }

    let created = dir.parent().and_then(first_missing_ancestor);
    if let Some(parent) = dir.parent() {
        create_dir_all(parent).map_err(|err| Error::CreateParentDir {
            source: err,
            dir: parent.into(),
        })?;
    }

    if let Err(err) = engine.clone_repo(&clone_url, &dir) {
        discard_partial_clone(&dir);
        if let Some(created) = created {
            discard_empty_parents(&dir, &created);
        }
        return Err(Error::CloneFailed {
            source: err,
            url: clone_url,
        });
    }

    info!("cloned {identity} into {:?}", dir.display());

    Ok(dir)
}

fn first_missing_ancestor(path: &Path) -> Option<PathBuf> {
    let mut missing = None;
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() || ancestor.exists() {
            break;
        }
        missing = Some(ancestor.to_path_buf());
    }

    missing
}

// INVARIANT: Only remove empty directories between base clone and the
// topmost directory this call created.
fn discard_empty_parents(dir: &Path, created: &Path) {
    for parent in dir.ancestors().skip(1) {
        if let Err(err) = remove_dir(parent) {
            debug!("keep {:?}: {err}", parent.display());
            break;
        }
        debug!("removed empty directory {:?}", parent.display());

        if parent == created {
            break;
        }
    }
}

/// Get command error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Remote URL cannot be parsed.
    #[error(transparent)]
    Remote(#[from] crate::remote::Error),

    /// Base clone path is taken by something that is not a working copy.
    #[error("{:?} exists but is not a git repository", dir.display())]
    NotAGitDirectory {
        #[source]
        source: crate::git::Error,
        dir: PathBuf,
    },

    /// Base clone is a working copy, but its remotes cannot be read.
    #[error("failed to read remotes of {:?}", dir.display())]
    ReadRemotes {
        #[source]
        source: crate::git::Error,
        dir: PathBuf,
    },

    /// Base clone exists, but tracks another remote.
    #[error(
        "{:?} is a git repository, but its remotes {found:?} do not match {expect}",
        dir.display()
    )]
    RemoteMismatch {
        dir: PathBuf,
        expect: String,
        found: Vec<String>,
    },

    /// Parent directories of base clone cannot be created.
    #[error("failed to create directory {:?}", dir.display())]
    CreateParentDir {
        #[source]
        source: std::io::Error,
        dir: PathBuf,
    },

    /// Clone of remote fails.
    #[error("failed to clone {url}")]
    CloneFailed {
        #[source]
        source: crate::git::Error,
        url: String,
    },
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
