// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of git-replicator's configuration file, and how the
//! replicator root is resolved from it.
//!
//! # Root Resolution
//!
//! The replicator root is determined by the first of these that is set:
//!
//! 1. `GIT_REPLICATOR_ROOT` environment variable.
//! 2. `root` key of configuration file.
//! 3. `$HOME/git-replicator`.
//!
//! The configuration file is `$HOME/.git-replicator.toml` unless another one
//! is given explicitly. The default file may be missing, but an explicitly
//! given one may not.

use crate::path::{default_root_dir, home_dir};

use serde::{Deserialize, Serialize};
use std::{
    env,
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    fs::read_to_string,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

/// Environment variable that overrides replicator root.
pub const ROOT_ENV_VAR: &str = "GIT_REPLICATOR_ROOT";

/// File name of default configuration file in home directory.
pub const CONFIG_FILE_NAME: &str = ".git-replicator.toml";

/// Configuration file layout.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Replicator root to manage repositories in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl Config {
    /// Load configuration file.
    ///
    /// Reads `path` if given, otherwise the default configuration file in
    /// the home directory. Missing default configuration file yields the
    /// default configuration.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if configuration file cannot be read.
    /// - Return [`ConfigError::Deserialize`] if configuration file is invalid.
    /// - Return [`ConfigError::ShellExpansion`] if root cannot be expanded.
    /// - Return [`ConfigError::Path`] if home directory cannot be determined.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (home_dir()?.join(CONFIG_FILE_NAME), false),
        };

        match read_to_string(&path) {
            Ok(data) => {
                debug!("using config file {:?}", path.display());
                data.parse()
            }
            Err(err) if err.kind() == ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(err) => Err(ConfigError::Read { source: err, path }),
        }
    }

    /// Resolve replicator root.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::ShellExpansion`] if environment override
    ///   cannot be expanded.
    /// - Return [`ConfigError::Path`] if home directory cannot be determined.
    pub fn root_dir(&self) -> Result<PathBuf> {
        if let Some(root) = env::var_os(ROOT_ENV_VAR).filter(|root| !root.is_empty()) {
            return expand(&PathBuf::from(root));
        }

        match &self.root {
            Some(root) => Ok(root.clone()),
            None => Ok(default_root_dir()?),
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: Config = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on root field.
        if let Some(root) = &config.root {
            config.root = Some(expand(root)?);
        }

        Ok(config)
    }
}

impl Display for Config {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

fn expand(path: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::full(path.to_string_lossy().as_ref())
        .map_err(ConfigError::ShellExpansion)?
        .into_owned();

    Ok(PathBuf::from(expanded))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),

    /// Failed to determine default paths.
    #[error(transparent)]
    Path(#[from] crate::path::Error),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
