// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Contribution records as returned by the GitHub issue search.
///
/// Pull requests and issues share a single payload shape in search results;
/// a record is a pull request when the payload carries a `pull_request` block.
use chrono::{DateTime, Utc};
use octocrab::models::issues::Issue;
use serde::{Deserialize, Serialize};

use crate::repository::RepositoryRef;

/// One pull request or issue authored by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct ContributionRecord
{
    /// Repository API URL, e.g. `https://api.github.com/repos/owner/name`.
    pub repository_url:  String,
    pub is_pull_request: bool,
    #[serde(default)]
    pub labels:          Vec<String,>,
    pub created_at:      DateTime<Utc,>,
    #[serde(default)]
    pub body:            String,
    /// Number of the pull request or issue within its repository.
    pub number:          u64,
}

impl ContributionRecord
{
    /// Returns `true` when any label equals one of `names`.
    pub fn has_any_label(&self, names: &[&str],) -> bool
    {
        self.labels.iter().any(|label| names.contains(&label.as_str(),),)
    }
}

impl From<Issue,> for ContributionRecord
{
    fn from(issue: Issue,) -> Self
    {
        Self {
            repository_url:  issue.repository_url.to_string(),
            is_pull_request: issue.pull_request.is_some(),
            labels:          issue.labels.into_iter().map(|label| label.name,).collect(),
            created_at:      issue.created_at,
            body:            issue.body.unwrap_or_default(),
            number:          issue.number,
        }
    }
}

/// A record paired with the repository it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct Contribution
{
    pub record:     ContributionRecord,
    pub repository: RepositoryRef,
}

impl Contribution
{
    pub fn repository_url(&self,) -> &str
    {
        &self.record.repository_url
    }

    /// Number of whitespace-separated words in the body.
    pub fn body_word_count(&self,) -> usize
    {
        self.record.body.split_whitespace().count()
    }

    pub fn has_empty_body(&self,) -> bool
    {
        self.record.body.trim().is_empty()
    }
}
