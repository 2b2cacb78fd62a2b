// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Remote URL canonicalization.
//!
//! Every repository managed by git-replicator is identified by the triple
//! of host, owner, and repository name. This triple is extracted from the
//! remote URL the user hands us, and is what decides where the repository
//! lives on disk.
//!
//! # Supported Forms
//!
//! - SSH scp-like syntax: `user@host:owner/repo[.git]`.
//! - HTTP(S) syntax: `scheme://host/owner/repo[.git]`.
//!
//! # Known Limitations
//!
//! Only the first two path segments after the host are used. Thus, a
//! repository nested in a GitLab subgroup like `gitlab.com/group/sub/repo`
//! is identified as `gitlab.com/group/sub`.
//!
//! HTTP(S) URLs go through WHATWG normalization. Host names are lowercased,
//! and path segments keep their percent-encoding, so
//! `https://Host/o%20x/r%20w` lands in `host/o%20x/r%20w` rather than in a
//! directory with spaces. A decoded `%2F` could otherwise smuggle extra
//! path components into the replicator root. SSH scp-like URLs are taken
//! verbatim.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Identity of a remote repository.
///
/// # Invariant
///
/// - Host, owner, and repo are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteIdentity {
    host: String,
    owner: String,
    repo: String,
}

impl RemoteIdentity {
    /// Construct new remote identity from its parts.
    ///
    /// # Errors
    ///
    /// - Return [`Error::InvalidUrl`] if any part is empty.
    pub fn new(
        host: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self> {
        let identity = Self {
            host: host.into(),
            owner: owner.into(),
            repo: repo.into(),
        };

        if identity.host.is_empty() || identity.owner.is_empty() || identity.repo.is_empty() {
            return Err(Error::InvalidUrl {
                source: None,
                url: format!("{}/{}/{}", identity.host, identity.owner, identity.repo),
            });
        }

        Ok(identity)
    }

    /// Parse SSH or HTTP(S) remote URL into its identity.
    ///
    /// A trailing ".git" is stripped before anything else happens.
    ///
    /// # Errors
    ///
    /// - Return [`Error::InvalidUrl`] if URL is malformed, or its path does
    ///   not contain at least an owner and a repository name.
    /// - Return [`Error::UnsupportedScheme`] if URL is neither SSH nor HTTP(S).
    pub fn parse(raw: impl AsRef<str>) -> Result<Self> {
        let raw = raw.as_ref();
        let stripped = raw.strip_suffix(".git").unwrap_or(raw);

        if let Some((host, path)) = split_scp_like(stripped) {
            let (owner, repo) = owner_and_repo(path).ok_or_else(|| invalid(raw))?;
            return Self::new(host, owner, repo).map_err(|_| invalid(raw));
        }

        if stripped.starts_with("http://") || stripped.starts_with("https://") {
            let url = url::Url::parse(stripped).map_err(|err| Error::InvalidUrl {
                source: Some(err),
                url: raw.into(),
            })?;
            let host = match (url.host_str(), url.port()) {
                (Some(host), Some(port)) => format!("{host}:{port}"),
                (Some(host), None) => host.to_string(),
                (None, _) => return Err(invalid(raw)),
            };
            let (owner, repo) = owner_and_repo(url.path().trim_matches('/'))
                .ok_or_else(|| invalid(raw))?;
            return Self::new(host, owner, repo).map_err(|_| invalid(raw));
        }

        Err(Error::UnsupportedScheme { url: raw.into() })
    }

    /// Host name of remote, including port if one was given.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Owner or organization of remote.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name of remote.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Normalized HTTPS clone URL of remote.
    ///
    /// Always HTTPS, even if the identity was parsed from an SSH URL.
    pub fn https_url(&self) -> String {
        format!("https://{}/{}/{}.git", self.host, self.owner, self.repo)
    }
}

impl FromStr for RemoteIdentity {
    type Err = Error;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Self::parse(data)
    }
}

impl Display for RemoteIdentity {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{}/{}/{}", self.host, self.owner, self.repo)
    }
}

// INVARIANT: Login must not look like part of a scheme, e.g., "https://user@".
fn split_scp_like(url: &str) -> Option<(&str, &str)> {
    let (login, rest) = url.split_once('@')?;
    if login.is_empty() || login.contains([':', '/']) {
        return None;
    }

    Some(rest.split_once(':').unwrap_or((rest, "")))
}

fn owner_and_repo(path: &str) -> Option<(&str, &str)> {
    let mut parts = path.split('/');
    let owner = parts.next()?;
    let repo = parts.next()?;

    Some((owner, repo))
}

fn invalid(url: &str) -> Error {
    Error::InvalidUrl {
        source: None,
        url: url.into(),
    }
}

/// Remote URL parsing error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// URL is malformed, or does not describe a host, owner, and repository.
    #[error("invalid git remote url {url:?}")]
    InvalidUrl {
        #[source]
        source: Option<url::ParseError>,
        url: String,
    },

    /// URL is neither SSH nor HTTP(S).
    #[error("unsupported git remote url format {url:?}")]
    UnsupportedScheme { url: String },
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use simple_test_case::test_case;

    #[test_case("https://github.com/owner/repo"; "https")]
    #[test_case("https://github.com/owner/repo.git"; "https with suffix")]
    #[test_case("http://github.com/owner/repo/"; "http with trailing slash")]
    #[test_case("git@github.com:owner/repo"; "ssh")]
    #[test_case("git@github.com:owner/repo.git"; "ssh with suffix")]
    #[test_case("deploy@github.com:owner/repo.git"; "ssh with other login")]
    #[test]
    fn parse_valid_urls(url: &str) {
        let result = RemoteIdentity::parse(url).unwrap();
        let expect = RemoteIdentity::new("github.com", "owner", "repo").unwrap();
        pretty_assertions::assert_eq!(result, expect);
    }

    #[test]
    fn parse_truncates_extra_path_segments() {
        let result = RemoteIdentity::parse("https://gitlab.com/group/sub/repo.git").unwrap();
        assert_eq!(result.to_string(), "gitlab.com/group/sub");

        let result = RemoteIdentity::parse("git@gitlab.com:group/sub/repo").unwrap();
        assert_eq!(result.to_string(), "gitlab.com/group/sub");
    }

    #[test]
    fn parse_keeps_port_in_host() {
        let result = RemoteIdentity::parse("https://git.example.org:8443/owner/repo").unwrap();
        assert_eq!(result.host(), "git.example.org:8443");
    }

    #[test_case("git@github.com:owner"; "ssh missing repo")]
    #[test_case("git@github.com"; "ssh missing path")]
    #[test_case("git@github.com:owner/"; "ssh empty repo")]
    #[test_case("https://github.com/owner"; "https missing repo")]
    #[test_case("https://github.com/"; "https missing path")]
    #[test]
    fn parse_rejects_short_paths(url: &str) {
        let result = RemoteIdentity::parse(url);
        assert!(
            matches!(result, Err(Error::InvalidUrl { source: None, .. })),
            "{result:?}"
        );
    }

    #[test_case("https://"; "https empty host")]
    #[test_case("http://[::1/owner/repo"; "http broken ipv6 host")]
    #[test_case("https://exa mple.com/owner/repo"; "https space in host")]
    #[test]
    fn parse_rejects_malformed_urls(url: &str) {
        let result = RemoteIdentity::parse(url);
        assert!(
            matches!(result, Err(Error::InvalidUrl { source: Some(_), .. })),
            "{result:?}"
        );
    }

    #[test]
    fn parse_keeps_percent_encoding_and_lowercases_host() {
        let result = RemoteIdentity::parse("https://GitHub.com/o%20x/r%20w").unwrap();
        assert_eq!(result.to_string(), "github.com/o%20x/r%20w");

        let result = RemoteIdentity::parse("https://github.com/o x/r w").unwrap();
        assert_eq!(result.to_string(), "github.com/o%20x/r%20w");
    }

    #[test_case("ftp://github.com/owner/repo"; "ftp")]
    #[test_case("ssh://git@github.com/owner/repo"; "ssh scheme")]
    #[test_case("owner/repo"; "shorthand")]
    #[test_case(""; "empty")]
    #[test]
    fn parse_rejects_unsupported_schemes(url: &str) {
        let result = RemoteIdentity::parse(url);
        assert!(matches!(result, Err(Error::UnsupportedScheme { .. })), "{result:?}");
    }

    #[test]
    fn https_url_normalizes_ssh() {
        let result = RemoteIdentity::parse("git@github.com:owner/repo.git")
            .unwrap()
            .https_url();
        assert_eq!(result, "https://github.com/owner/repo.git");
    }
}
