// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Map remote identities to their place in the replicator root, and map
//! places in the replicator root back to remote URLs.
//!
//! # Replicator Root Layout
//!
//! All repositories live under one root directory, which defaults to
//! `$HOME/git-replicator`. Each repository is given a __repo directory__ at
//! `root/host/owner/repo`. The unmodified upstream clone of a repository
//! lives at `root/host/owner/repo/base`, and every additional checked out
//! branch lives in a sibling of "base" named after the branch.
//!
//! No metadata is stored anywhere else. The layout itself is the source of
//! truth, which is why a repo directory can be turned back into a remote URL
//! without asking Git about it.

use crate::remote::RemoteIdentity;

use std::{
    ffi::OsStr,
    path::{absolute, Component, Path, PathBuf},
};

/// Name of directory holding the unmodified upstream clone.
pub const BASE_DIR_NAME: &str = "base";

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`Error::NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(Error::NoWayHome)
}

/// Determine default absolute path to replicator root.
///
/// Uses `$HOME/git-replicator`. Does not check if the path returned
/// actually exists.
///
/// # Errors
///
/// - Return [`Error::NoWayHome`] if home directory path cannot be determined.
pub fn default_root_dir() -> Result<PathBuf> {
    home_dir().map(|path| path.join("git-replicator"))
}

/// Path to base clone of remote identity under replicator root.
pub fn base_path(root: impl AsRef<Path>, identity: &RemoteIdentity) -> PathBuf {
    root.as_ref()
        .join(identity.host())
        .join(identity.owner())
        .join(identity.repo())
        .join(BASE_DIR_NAME)
}

/// Reconstruct remote URL of repo directory from its place in root.
///
/// Only the first three components relative to root are considered, so
/// anything nested deeper in the repo directory resolves to the same URL.
/// The result is always an HTTPS URL.
///
/// # Errors
///
/// - Return [`Error::OutsideRoot`] if repo directory is not a strict
///   descendant of root.
/// - Return [`Error::MalformedPath`] if repo directory does not name a
///   host, owner, and repository.
pub fn remote_url_from_repo_dir(
    repo_dir: impl AsRef<Path>,
    root: impl AsRef<Path>,
) -> Result<String> {
    let repo_dir = normalize(repo_dir.as_ref())?;
    let root = normalize(root.as_ref())?;

    let relative = match repo_dir.strip_prefix(&root) {
        Ok(relative) if relative.components().next().is_some() => relative,
        _ => {
            return Err(Error::OutsideRoot {
                path: repo_dir.clone(),
                root: root.clone(),
            })
        }
    };

    let malformed = || Error::MalformedPath {
        path: repo_dir.clone(),
    };

    let mut parts = relative.components().map(|component| match component {
        Component::Normal(part) => part.to_str().filter(|part| !part.is_empty()),
        _ => None,
    });
    let (Some(Some(host)), Some(Some(owner)), Some(Some(repo))) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    let identity = RemoteIdentity::new(host, owner, repo).map_err(|_| malformed())?;

    Ok(identity.https_url())
}

/// Lexically normalize path into absolute form.
///
/// Resolves "." and ".." without touching the file system, so symbolic
/// links are left as they are.
pub(crate) fn normalize(path: &Path) -> Result<PathBuf> {
    let path = absolute(path).map_err(|err| Error::Absolute {
        source: err,
        path: path.into(),
    })?;

    let mut normal = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other.as_os_str()),
        }
    }

    Ok(normal)
}

/// Check if path component is the reserved base clone name.
pub(crate) fn is_base_dir_name(name: impl AsRef<OsStr>) -> bool {
    name.as_ref() == BASE_DIR_NAME
}

/// Path resolution error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No way to determine user's home directory.
    #[error("cannot determine absolute path to user's home directory")]
    NoWayHome,

    /// Path cannot be made absolute.
    #[error("failed to make {:?} absolute", path.display())]
    Absolute {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Path is not inside replicator root.
    #[error("{:?} is not under replicator root {:?}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// Path does not name a host, owner, and repository.
    #[error("{:?} does not name a host, owner, and repository", path.display())]
    MalformedPath { path: PathBuf },
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
