// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Local cache of Git repositories, one directory per branch.
//!
//! Git-replicator keeps every repository it manages under a single
//! replicator root laid out as `root/host/owner/repo`. The upstream clone of
//! a repository lives in `base`, and every other branch is materialized as
//! its own full clone in a sibling directory named after the branch. Think
//! of it as `git switch`, except each branch gets a directory of its own
//! instead of sharing one working tree.
//!
//! The directory layout is the only state git-replicator has. Remote URLs,
//! repository listings, and branch listings are always derived from it.

pub mod branch;
pub mod catalog;
pub mod config;
pub mod get;
pub mod git;
pub mod locate;
pub mod path;
pub mod remote;
pub mod replicate;
pub mod switch;

pub use branch::{delete_branch_dir, list_branch_dirs};
pub use catalog::{list_repos, RepoInfo};
pub use config::Config;
pub use get::get;
pub use git::{Git2Engine, GitEngine};
pub use locate::find_repo_dir;
pub use path::{base_path, remote_url_from_repo_dir};
pub use remote::RemoteIdentity;
pub use replicate::{replicate, ReplicateOptions};
pub use switch::{switch_branch, SwitchOptions};
