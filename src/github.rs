// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// GitHub-backed data source for the scoreboard.
///
/// Resolves participant identities, searches their pull requests and issues,
/// and answers the classifier's merge-status and topic lookups. Every request
/// goes through [`retry_with_backoff`].
use masterror::AppError;
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    contribution::ContributionRecord,
    error::Error,
    lookup::ContributionLookup,
    participant::Identity,
    repository::RepositoryRef,
    retry::{RetryConfig, retry_with_backoff},
};

/// Maximum number of search results fetched per participant.
pub const SEARCH_PAGE_SIZE: u8 = 100;

/// GitHub users API response subset.
#[derive(Debug, Clone, Deserialize,)]
struct UserPayload
{
    login:      String,
    avatar_url: String,
    html_url:   String,
}

impl From<UserPayload,> for Identity
{
    fn from(user: UserPayload,) -> Self
    {
        Self {
            username: user.login, avatar_url: user.avatar_url, profile_url: user.html_url,
        }
    }
}

/// Builds the issue search query for `login` within `search_window`.
///
/// # Example
///
/// ```
/// use hacktoberboard::github::contributions_query;
///
/// assert_eq!(
///     contributions_query("octocat", "created:2020-10-01..2020-10-31",),
///     "author:octocat created:2020-10-01..2020-10-31"
/// );
/// ```
pub fn contributions_query(login: &str, search_window: &str,) -> String
{
    let window = search_window.trim();
    if window.is_empty() {
        format!("author:{login}")
    } else {
        format!("author:{login} {window}")
    }
}

/// GitHub API client with retry.
#[derive(Debug, Clone,)]
pub struct GithubClient
{
    octocrab: Octocrab,
    retry:    RetryConfig,
}

impl GithubClient
{
    /// Creates a client, authenticated when `token` is provided.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalLookup`] when the HTTP client cannot be
    /// initialized.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hacktoberboard::{github::GithubClient, retry::RetryConfig};
    ///
    /// # async fn example() -> Result<(), hacktoberboard::Error> {
    /// let token = std::env::var("GITHUB_TOKEN",).ok();
    /// let client = GithubClient::new(token.as_deref(), RetryConfig::default(),)?;
    /// let identity = client.resolve_user("octocat",).await?;
    /// println!("{}", identity.profile_url);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(token: Option<&str,>, retry: RetryConfig,) -> Result<Self, Error,>
    {
        let builder = Octocrab::builder();
        let builder = match token {
            Some(token,) => builder.personal_token(token.to_owned(),),
            None => builder,
        };
        let octocrab = builder.build().map_err(|e| {
            AppError::unauthorized(format!("failed to initialize GitHub client: {e}"),)
        },)?;

        Ok(Self::from_octocrab(octocrab, retry,),)
    }

    /// Wraps an already configured [`Octocrab`] instance.
    pub fn from_octocrab(octocrab: Octocrab, retry: RetryConfig,) -> Self
    {
        Self {
            octocrab,
            retry,
        }
    }

    /// Fetches the public identity of `login`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalLookup`] when the user cannot be fetched.
    pub async fn resolve_user(&self, login: &str,) -> Result<Identity, Error,>
    {
        debug!("Resolving GitHub user {}", login);
        let operation = format!("user lookup for {login}");
        let route = format!("/users/{login}");

        let user: UserPayload = retry_with_backoff(&self.retry, &operation, || {
            let octocrab = self.octocrab.clone();
            let route = route.clone();
            let operation = operation.clone();
            async move {
                octocrab
                    .get(route, None::<&(),>,)
                    .await
                    .map_err(|e| Error::lookup(operation, e.to_string(),),)
            }
        },)
        .await?;

        Ok(user.into(),)
    }

    /// Searches pull requests and issues authored by `login`.
    ///
    /// Only the first page of results is fetched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalLookup`] when the search fails.
    pub async fn fetch_contributions(
        &self,
        login: &str,
        search_window: &str,
    ) -> Result<Vec<ContributionRecord,>, Error,>
    {
        let query = contributions_query(login, search_window,);
        let operation = format!("contribution search for {login}");
        debug!("Searching GitHub issues with query {:?}", query);

        let page = retry_with_backoff(&self.retry, &operation, || {
            let octocrab = self.octocrab.clone();
            let query = query.clone();
            let operation = operation.clone();
            async move {
                octocrab
                    .search()
                    .issues_and_pull_requests(&query,)
                    .per_page(SEARCH_PAGE_SIZE,)
                    .send()
                    .await
                    .map_err(|e| Error::lookup(operation, e.to_string(),),)
            }
        },)
        .await?;

        let records: Vec<ContributionRecord,> =
            page.items.into_iter().map(ContributionRecord::from,).collect();
        info!("Found {} contributions for {}", records.len(), login);

        Ok(records,)
    }
}

impl ContributionLookup for GithubClient
{
    async fn is_merged(&self, repository: &RepositoryRef, number: u64,) -> Result<bool, Error,>
    {
        let operation = format!("merge status for {repository}#{number}");
        let owner = repository.owner.clone();
        let name = repository.name.clone();

        retry_with_backoff(&self.retry, &operation, || {
            let octocrab = self.octocrab.clone();
            let owner = owner.clone();
            let name = name.clone();
            let operation = operation.clone();
            async move {
                octocrab
                    .pulls(owner, name,)
                    .is_merged(number,)
                    .await
                    .map_err(|e| Error::lookup(operation, e.to_string(),),)
            }
        },)
        .await
    }

    async fn repository_topics(&self, repository: &RepositoryRef,) -> Result<Vec<String,>, Error,>
    {
        let operation = format!("topics for {repository}");
        let owner = repository.owner.clone();
        let name = repository.name.clone();

        let details = retry_with_backoff(&self.retry, &operation, || {
            let octocrab = self.octocrab.clone();
            let owner = owner.clone();
            let name = name.clone();
            let operation = operation.clone();
            async move {
                octocrab
                    .repos(owner, name,)
                    .get()
                    .await
                    .map_err(|e| Error::lookup(operation, e.to_string(),),)
            }
        },)
        .await?;

        Ok(details.topics.unwrap_or_default(),)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn query_includes_author_and_window()
    {
        assert_eq!(
            contributions_query("octocat", " created:2020-10-01..2020-10-31 ",),
            "author:octocat created:2020-10-01..2020-10-31"
        );
    }

    #[test]
    fn query_without_window_only_filters_author()
    {
        assert_eq!(contributions_query("octocat", "  ",), "author:octocat");
    }

    #[test]
    fn user_payload_maps_to_identity()
    {
        let payload: UserPayload = serde_json::from_str(
            r#"{
                "login": "octocat",
                "id": 1,
                "avatar_url": "https://avatars.githubusercontent.com/u/583231",
                "html_url": "https://github.com/octocat"
            }"#,
        )
        .expect("valid payload",);

        let identity: Identity = payload.into();
        assert_eq!(identity.username, "octocat");
        assert_eq!(identity.profile_url, "https://github.com/octocat");
    }
}
