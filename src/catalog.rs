// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Repository catalog.
//!
//! Git-replicator keeps no index of the repositories it manages. The
//! catalog is rebuilt on every call by walking the replicator root, and
//! treating every `host/owner/repo/base` directory that holds a Git
//! repository as one entry.
//!
//! Anything shallower than a base clone is traversed but never reported.
//! Nothing inside a base clone, or inside a branch directory, is ever
//! visited.

use crate::path::is_base_dir_name;

use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument};

/// Depth of base clone relative to replicator root.
const BASE_DEPTH: usize = 4;

/// One discovered repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    /// Host name of remote.
    pub host: String,

    /// Owner or organization of remote.
    pub owner: String,

    /// Repository name of remote.
    pub repo: String,

    /// Path to base clone.
    pub path: PathBuf,
}

/// List every repository with a valid base clone under replicator root.
///
/// Walks depth-first in file name order.
///
/// # Errors
///
/// - Return [`Error::Traversal`] if any part of the walk fails. No partial
///   listing is returned.
#[instrument(skip(root), level = "debug")]
pub fn list_repos(root: impl AsRef<Path>) -> Result<Vec<RepoInfo>> {
    let root = root.as_ref();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .max_depth(Some(BASE_DEPTH))
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut repos = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| Error::Traversal {
            source: err,
            root: root.into(),
        })?;

        if entry.depth() != BASE_DEPTH || !is_base_dir_name(entry.file_name()) {
            continue;
        }

        let path = entry.path();
        // INVARIANT: Symbolic links are never base clones, even if they point at one.
        if !entry.file_type().is_some_and(|kind| kind.is_dir()) {
            debug!("skip {:?}, not a directory", path.display());
            continue;
        }

        if !path.join(".git").is_dir() {
            debug!("skip {:?}, no git repository in it", path.display());
            continue;
        }

        if let Some(info) = repo_info(root, path) {
            debug!("found {}/{}/{}", info.host, info.owner, info.repo);
            repos.push(info);
        }
    }

    Ok(repos)
}

fn repo_info(root: &Path, path: &Path) -> Option<RepoInfo> {
    let mut parts = path.strip_prefix(root).ok()?.components().map(|part| match part {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        _ => None,
    });

    Some(RepoInfo {
        host: parts.next()??,
        owner: parts.next()??,
        repo: parts.next()??,
        path: path.into(),
    })
}

/// Repository catalog error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Walking replicator root fails.
    #[error("failed to traverse replicator root {:?}", root.display())]
    Traversal {
        #[source]
        source: ignore::Error,
        root: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::{env::current_dir, fs::create_dir_all};

    #[sealed_test]
    fn list_repos_only_reports_base_clones() -> anyhow::Result<()> {
        let root = current_dir()?.join("root");
        create_dir_all(root.join("github.com/owner/repo/base/.git"))?;
        create_dir_all(root.join("github.com/owner/repo/feature-x/.git"))?;
        create_dir_all(root.join("github.com/owner/not-a-repo"))?;
        create_dir_all(root.join("github.com/owner/no-git/base/src"))?;
        create_dir_all(root.join("gitlab.com/group/project/base/.git"))?;
        create_dir_all(root.join("gitlab.com/group/project/base/vendor/x/base/.git"))?;

        let result = list_repos(&root)?;
        let expect = vec![
            RepoInfo {
                host: "github.com".into(),
                owner: "owner".into(),
                repo: "repo".into(),
                path: root.join("github.com/owner/repo/base"),
            },
            RepoInfo {
                host: "gitlab.com".into(),
                owner: "group".into(),
                repo: "project".into(),
                path: root.join("gitlab.com/group/project/base"),
            },
        ];
        assert_eq!(result, expect);

        Ok(())
    }

    #[sealed_test]
    fn list_repos_ignores_shallow_directories() -> anyhow::Result<()> {
        let root = current_dir()?.join("root");
        create_dir_all(root.join("github.com/owner/repo/base/.git"))?;
        create_dir_all(root.join("github.com/owner/base/.git"))?;

        let result = list_repos(&root)?;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].repo, "repo");

        Ok(())
    }

    #[cfg(unix)]
    #[sealed_test]
    fn list_repos_skips_symlinked_base() -> anyhow::Result<()> {
        let root = current_dir()?.join("root");
        let elsewhere = current_dir()?.join("elsewhere");
        create_dir_all(elsewhere.join(".git"))?;
        create_dir_all(root.join("github.com/owner/repo"))?;
        std::os::unix::fs::symlink(&elsewhere, root.join("github.com/owner/repo/base"))?;

        assert!(list_repos(&root)?.is_empty());

        Ok(())
    }

    #[sealed_test]
    fn list_repos_on_empty_root() -> anyhow::Result<()> {
        let root = current_dir()?.join("root");
        create_dir_all(&root)?;

        assert!(list_repos(&root)?.is_empty());

        Ok(())
    }

    #[sealed_test]
    fn list_repos_fails_on_missing_root() {
        let result = list_repos(current_dir().unwrap().join("missing"));
        assert!(matches!(result, Err(Error::Traversal { .. })), "{result:?}");
    }
}
