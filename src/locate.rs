// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Locate enclosing repo directory.

use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Find repo directory enclosing current working directory.
///
/// Walks up from `cwd` one parent at a time. The first directory whose
/// great-grandparent is `root` is the repo directory, i.e.,
/// `root/host/owner/repo`. Works from the repo directory itself, from its
/// base clone, from any branch directory, and from anything nested inside
/// those.
///
/// # Errors
///
/// - Return [`Error::NotFound`] if the walk reaches `root`, the file
///   system root, or runs out of relative components without a match.
#[instrument(skip(cwd, root), level = "debug")]
pub fn find_repo_dir(cwd: impl AsRef<Path>, root: impl AsRef<Path>) -> Result<PathBuf> {
    let (cwd, root) = (cwd.as_ref(), root.as_ref());
    let mut dir = cwd;

    loop {
        let great_grandparent = dir.parent().and_then(Path::parent).and_then(Path::parent);
        if great_grandparent == Some(root) {
            debug!("found repo directory {:?}", dir.display());
            return Ok(dir.to_path_buf());
        }

        match dir.parent() {
            Some(parent) if dir != root && !is_terminal(parent) => dir = parent,
            _ => {
                return Err(Error::NotFound {
                    cwd: cwd.to_path_buf(),
                    root: root.to_path_buf(),
                })
            }
        }
    }
}

// INVARIANT: Relative walks end on "" or ".", never on a real directory.
fn is_terminal(path: &Path) -> bool {
    path.as_os_str().is_empty() || path == Path::new(".")
}

/// Repo locator error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Current working directory is not inside a repo directory.
    #[error(
        "{:?} is not inside a repository under replicator root {:?}",
        cwd.display(),
        root.display()
    )]
    NotFound { cwd: PathBuf, root: PathBuf },
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
