// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{LocalMirror, RepoFixture};

use anyhow::Result;
use git2::Repository;
use git_replicator::{
    delete_branch_dir, find_repo_dir, get, list_branch_dirs, list_repos, switch_branch,
    switch, SwitchOptions,
};
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use std::{env::current_dir, fs::create_dir_all};

fn upstream() -> Result<RepoFixture> {
    let fixture = RepoFixture::new(current_dir()?.join("upstream"))?;
    fixture.stage_and_commit("README.md", "hello")?;
    Ok(fixture)
}

#[sealed_test]
fn get_then_switch_then_delete() -> Result<()> {
    let fixture = upstream()?;
    let engine = LocalMirror::new(fixture.path());
    let root = current_dir()?.join("root");

    let base = get("https://example.org/owner/repo", &root, &engine)?;
    assert_eq!(base, root.join("example.org/owner/repo/base"));

    // Getting the same repository twice is a no-op.
    get("https://example.org/owner/repo.git", &root, &engine)?;

    let src = base.join("src");
    create_dir_all(&src)?;
    let repo_dir = find_repo_dir(&src, &root)?;
    assert_eq!(repo_dir, root.join("example.org/owner/repo"));

    let opts = SwitchOptions {
        repo_dir: repo_dir.clone(),
        branch_name: "feature-x".into(),
        root: root.clone(),
    };
    let branch_dir = switch_branch(&opts, &engine)?;
    assert_eq!(branch_dir, repo_dir.join("feature-x"));

    let clone = Repository::open(&branch_dir)?;
    assert_eq!(clone.head()?.name(), Some("refs/heads/feature-x"));
    let origin = clone.find_remote("origin")?.url().map(str::to_owned);
    assert_eq!(origin, Some("https://example.org/owner/repo.git".to_string()));

    assert_eq!(list_branch_dirs(&repo_dir)?, vec!["base", "feature-x"]);

    // Branch directories never show up as repositories of their own.
    let repos = list_repos(&root)?;
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].path, base);

    delete_branch_dir(&repo_dir, "feature-x")?;
    delete_branch_dir(&repo_dir, "feature-x")?;
    assert_eq!(list_branch_dirs(&repo_dir)?, vec!["base"]);

    Ok(())
}

#[sealed_test]
fn switch_twice_to_same_branch_fails() -> Result<()> {
    let fixture = upstream()?;
    let engine = LocalMirror::new(fixture.path());
    let root = current_dir()?.join("root");
    let base = get("git@example.org:owner/repo.git", &root, &engine)?;

    let opts = SwitchOptions {
        repo_dir: find_repo_dir(&base, &root)?,
        branch_name: "feature-x".into(),
        root: root.clone(),
    };
    switch_branch(&opts, &engine)?;

    let result = switch_branch(&opts, &engine);
    assert!(
        matches!(result, Err(switch::Error::BranchAlreadyExists { .. })),
        "{result:?}"
    );

    Ok(())
}

#[sealed_test]
fn get_refuses_mismatched_base_clone() -> Result<()> {
    let fixture = upstream()?;
    let engine = LocalMirror::new(fixture.path());
    let root = current_dir()?.join("root");
    get("https://example.org/owner/repo", &root, &engine)?;

    let result = get("git@example.org:owner/repo", &root, &engine);
    assert!(
        matches!(result, Err(git_replicator::get::Error::RemoteMismatch { .. })),
        "{result:?}"
    );

    Ok(())
}

#[sealed_test]
fn failed_clone_leaves_nothing_behind() -> Result<()> {
    let engine = LocalMirror::new(current_dir()?.join("no-such-upstream"));
    let root = current_dir()?.join("root");

    let result = get("https://example.org/owner/repo", &root, &engine);
    assert!(result.is_err());
    assert!(!root.join("example.org/owner/repo/base").exists());
    assert!(!root.exists());

    Ok(())
}
