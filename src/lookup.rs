// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Live lookups consulted by the classifier.
///
/// The classifier only needs two answers from the hosting platform: whether a
/// pull request was merged and which topics a repository carries. Both are
/// behind [`ContributionLookup`] so classification can run against GitHub or
/// against answers recorded earlier.
use std::{
    collections::{HashMap, HashSet},
    future::Future,
    sync::atomic::{AtomicUsize, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, repository::RepositoryRef};

/// Capabilities the classifier requires from the hosting platform.
///
/// Implementations must report failures as errors; they are never interpreted
/// as "not merged" or "no topics".
pub trait ContributionLookup
{
    /// Returns whether pull request `number` of `repository` was merged.
    fn is_merged(
        &self,
        repository: &RepositoryRef,
        number: u64,
    ) -> impl Future<Output = Result<bool, Error,>,> + Send;

    /// Returns the topics attached to `repository`.
    fn repository_topics(
        &self,
        repository: &RepositoryRef,
    ) -> impl Future<Output = Result<Vec<String,>, Error,>,> + Send;
}

/// Lookup answers captured ahead of time.
///
/// Unknown repositories have no topics and unknown pull requests are not
/// merged. Repositories listed in `failing` report a lookup error instead,
/// which lets callers rehearse partial outages. The number of calls made is
/// tracked so tests can assert which lookups were skipped.
#[derive(Debug, Default, Serialize, Deserialize,)]
pub struct RecordedLookup
{
    /// Topics keyed by `owner/name`.
    #[serde(default)]
    pub topics:  HashMap<String, Vec<String,>,>,
    /// Merged pull requests, each formatted as `owner/name#number`.
    #[serde(default)]
    pub merged:  HashSet<String,>,
    /// Repositories (`owner/name`) whose lookups fail.
    #[serde(default)]
    pub failing: HashSet<String,>,
    #[serde(skip)]
    topic_calls: AtomicUsize,
    #[serde(skip)]
    merge_calls: AtomicUsize,
}

impl RecordedLookup
{
    /// Records `topics` for the repository `full_name`.
    pub fn with_topics(mut self, full_name: &str, topics: &[&str],) -> Self
    {
        self.topics.insert(
            full_name.to_string(),
            topics.iter().map(|topic| (*topic).to_string(),).collect(),
        );
        self
    }

    /// Marks pull request `number` of `full_name` as merged.
    pub fn with_merged(mut self, full_name: &str, number: u64,) -> Self
    {
        self.merged.insert(format!("{full_name}#{number}"),);
        self
    }

    /// Makes every lookup against `full_name` fail.
    pub fn with_failure(mut self, full_name: &str,) -> Self
    {
        self.failing.insert(full_name.to_string(),);
        self
    }

    pub fn topic_calls(&self,) -> usize
    {
        self.topic_calls.load(Ordering::Relaxed,)
    }

    pub fn merge_calls(&self,) -> usize
    {
        self.merge_calls.load(Ordering::Relaxed,)
    }

    fn check_available(&self, operation: &str, full_name: &str,) -> Result<(), Error,>
    {
        if self.failing.contains(full_name,) {
            return Err(Error::lookup(
                format!("{operation} for {full_name}"),
                "recorded lookup failure",
            ),);
        }
        Ok((),)
    }
}

impl ContributionLookup for RecordedLookup
{
    async fn is_merged(&self, repository: &RepositoryRef, number: u64,) -> Result<bool, Error,>
    {
        self.merge_calls.fetch_add(1, Ordering::Relaxed,);
        let full_name = repository.full_name();
        self.check_available("merge status", &full_name,)?;
        Ok(self.merged.contains(&format!("{full_name}#{number}"),),)
    }

    async fn repository_topics(&self, repository: &RepositoryRef,) -> Result<Vec<String,>, Error,>
    {
        self.topic_calls.fetch_add(1, Ordering::Relaxed,);
        let full_name = repository.full_name();
        self.check_available("topics", &full_name,)?;
        Ok(self.topics.get(&full_name,).cloned().unwrap_or_default(),)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn repository() -> RepositoryRef
    {
        RepositoryRef {
            owner: "octo".to_string(), name: "repo".to_string(),
        }
    }

    #[tokio::test]
    async fn recorded_answers_are_returned()
    {
        let lookup = RecordedLookup::default()
            .with_topics("octo/repo", &["hacktoberfest", "rust"],)
            .with_merged("octo/repo", 12,);

        let topics = lookup.repository_topics(&repository(),).await.expect("topics",);
        assert_eq!(topics, vec!["hacktoberfest".to_string(), "rust".to_string()]);
        assert!(lookup.is_merged(&repository(), 12,).await.expect("merge status",));
        assert!(!lookup.is_merged(&repository(), 13,).await.expect("merge status",));
        assert_eq!(lookup.topic_calls(), 1);
        assert_eq!(lookup.merge_calls(), 2);
    }

    #[tokio::test]
    async fn unknown_repository_has_no_topics()
    {
        let lookup = RecordedLookup::default();
        let topics = lookup.repository_topics(&repository(),).await.expect("topics",);
        assert!(topics.is_empty());
    }

    #[tokio::test]
    async fn failing_repository_reports_lookup_error()
    {
        let lookup = RecordedLookup::default().with_failure("octo/repo",);
        let error = lookup.repository_topics(&repository(),).await.unwrap_err();
        assert!(matches!(error, Error::ExternalLookup { .. }));
    }

    #[test]
    fn recorded_lookup_deserializes_from_json()
    {
        let json = r#"{"topics": {"octo/repo": ["hacktoberfest"]}, "merged": ["octo/repo#4"]}"#;
        let lookup: RecordedLookup = serde_json::from_str(json,).expect("valid lookup",);
        assert_eq!(lookup.topics["octo/repo"], vec!["hacktoberfest".to_string()]);
        assert!(lookup.merged.contains("octo/repo#4"));
        assert!(lookup.failing.is_empty());
    }
}
