// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::RepoFixture;

use anyhow::Result;
use git2::Repository;
use git_replicator::{Git2Engine, GitEngine};
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use std::{env::current_dir, fs::read_to_string};

fn upstream() -> Result<RepoFixture> {
    let fixture = RepoFixture::new(current_dir()?.join("upstream"))?;
    fixture.stage_and_commit("README.md", "hello from main")?;
    fixture.commit_on_branch("develop", "CHANGELOG.md", "hello from develop")?;
    Ok(fixture)
}

#[sealed_test]
fn clone_repo_from_local_path() -> Result<()> {
    let fixture = upstream()?;
    let target = current_dir()?.join("clone");
    let engine = Git2Engine::quiet();

    engine.clone_repo(fixture.path().to_string_lossy().as_ref(), &target)?;
    assert_eq!(read_to_string(target.join("README.md"))?, "hello from main");

    let remotes = engine.remote_urls(&target)?;
    assert_eq!(remotes.len(), 1);

    Ok(())
}

#[sealed_test]
fn remote_urls_fails_outside_working_copy() -> Result<()> {
    std::fs::create_dir_all("plain")?;
    let result = Git2Engine::quiet().remote_urls(&current_dir()?.join("plain"));
    assert!(
        matches!(result, Err(git_replicator::git::Error::Open { .. })),
        "{result:?}"
    );

    Ok(())
}

#[sealed_test]
fn checkout_branch_creates_branch_off_head() -> Result<()> {
    let fixture = upstream()?;
    let target = current_dir()?.join("clone");
    let engine = Git2Engine::quiet();
    engine.clone_repo(fixture.path().to_string_lossy().as_ref(), &target)?;

    engine.checkout_branch(&target, "feature-x")?;

    let repo = Repository::open(&target)?;
    let head = repo.head()?;
    assert_eq!(head.name(), Some("refs/heads/feature-x"));
    let main = repo.find_reference("refs/remotes/origin/main")?.target();
    assert_eq!(head.target(), main);

    Ok(())
}

#[sealed_test]
fn checkout_branch_tracks_remote_branch() -> Result<()> {
    let fixture = upstream()?;
    let target = current_dir()?.join("clone");
    let engine = Git2Engine::quiet();
    engine.clone_repo(fixture.path().to_string_lossy().as_ref(), &target)?;

    engine.checkout_branch(&target, "develop")?;

    let repo = Repository::open(&target)?;
    assert_eq!(repo.head()?.name(), Some("refs/heads/develop"));
    let tracking = repo
        .find_branch("develop", git2::BranchType::Local)?
        .upstream()?
        .name()?
        .map(str::to_owned);
    assert_eq!(tracking, Some("origin/develop".to_string()));
    assert_eq!(
        read_to_string(target.join("CHANGELOG.md"))?,
        "hello from develop"
    );

    Ok(())
}

#[sealed_test]
fn checkout_branch_already_on_branch() -> Result<()> {
    let fixture = upstream()?;
    let target = current_dir()?.join("clone");
    let engine = Git2Engine::quiet();
    engine.clone_repo(fixture.path().to_string_lossy().as_ref(), &target)?;

    engine.checkout_branch(&target, "main")?;
    engine.checkout_branch(&target, "main")?;

    let repo = Repository::open(&target)?;
    assert_eq!(repo.head()?.name(), Some("refs/heads/main"));

    Ok(())
}
