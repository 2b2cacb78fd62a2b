// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Replicate repository from one remote to another.
//!
//! Only argument validation exists so far. Both remotes must be URLs the
//! rest of git-replicator understands, after which the operation reports
//! that it is not supported.

use crate::remote::RemoteIdentity;

use tracing::{info, instrument};

/// Options for replication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicateOptions {
    /// URL of remote to replicate from.
    pub source: String,

    /// URL of remote to replicate to.
    pub target: String,
}

/// Replicate source remote into target remote.
///
/// # Errors
///
/// - Return [`Error::Remote`] if either URL cannot be parsed.
/// - Return [`Error::Unsupported`] once both URLs are valid.
#[instrument(level = "debug")]
pub fn replicate(opts: &ReplicateOptions) -> Result<()> {
    let source = RemoteIdentity::parse(&opts.source)?;
    let target = RemoteIdentity::parse(&opts.target)?;
    info!("replicate {source} into {target}");

    Err(Error::Unsupported {
        from: source,
        to: target,
    })
}

/// Replication error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source or target URL cannot be parsed.
    #[error(transparent)]
    Remote(#[from] crate::remote::Error),

    /// Replication itself is not available.
    #[error("replication from {from} to {to} is not supported yet")]
    Unsupported {
        from: RemoteIdentity,
        to: RemoteIdentity,
    },
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
