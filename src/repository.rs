// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Resolution of GitHub repository API URLs into owner/name pairs.
//!
//! Search results reference their repository through an API URL such as
//! `https://api.github.com/repos/octocat/hello-world`. The resolver accepts the
//! public API host as well as GitHub Enterprise hosts serving the API under
//! `/api/v3`.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::error::Error;

static REPOSITORY_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:https?)://[^/\s]+(?:/api/v3)?/repos/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)/?$")
        .expect("repository URL pattern is valid")
});

/// Owner and name of a repository referenced by a contribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryRef {
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub name:  String
}

impl RepositoryRef {
    /// Returns the `owner/name` form used by GitHub endpoints.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Returns `true` when both refs name the same repository, ignoring
    /// ASCII case. Owners are not compared.
    pub fn same_name(&self, other: &RepositoryRef) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parses a repository API URL into a [`RepositoryRef`].
///
/// Surrounding whitespace and a single trailing slash are ignored. The scheme
/// is matched case-insensitively; owner and name are returned verbatim.
///
/// # Errors
///
/// Returns [`Error::MalformedUrl`] when the URL is not shaped like
/// `http(s)://<host>[/api/v3]/repos/<owner>/<name>`.
///
/// # Examples
///
/// ```
/// use hacktoberboard::resolve_repository;
///
/// let repository = resolve_repository("https://api.github.com/repos/octocat/hello-world")?;
/// assert_eq!(repository.full_name(), "octocat/hello-world");
/// # Ok::<(), hacktoberboard::Error>(())
/// ```
pub fn resolve_repository(url: &str) -> Result<RepositoryRef, Error> {
    let captures = REPOSITORY_URL.captures(url.trim()).ok_or_else(|| Error::MalformedUrl {
        url: url.to_owned()
    })?;

    Ok(RepositoryRef {
        owner: captures[1].to_owned(),
        name:  captures[2].to_owned()
    })
}
