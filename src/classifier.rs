// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Partitioning of a participant's contributions into scoring buckets.
//!
//! Every record ends up in exactly one of four buckets. The bucket is chosen by
//! walking [`RULES`] top to bottom; the first rule with a satisfied condition
//! wins and [`FALLBACK`] applies when none match. Conditions inside a rule are
//! checked left to right and stop at the first hit, so the network-backed
//! condition is only evaluated for pull requests that are neither labelled
//! nor opened before the cutoff.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    contribution::{Contribution, ContributionRecord},
    error::Error,
    lookup::ContributionLookup,
    repository::{RepositoryRef, resolve_repository}
};

/// Labels that disqualify a pull request.
pub const INVALID_LABELS: &[&str] = &["invalid", "spam"];
/// Label maintainers apply to accept a pull request explicitly.
pub const ACCEPTED_LABELS: &[&str] = &["hacktoberfest-accepted"];
/// Repository topic that opts a repository into the challenge.
pub const CHALLENGE_TOPIC: &str = "hacktoberfest";

/// Destination of a classified record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Pull request counting towards the objective.
    Valid,
    /// Pull request labelled as invalid or spam.
    Invalid,
    /// Pull request excluded by the opt-in rules.
    Ignored,
    /// Issue rather than a pull request.
    Issue
}

/// Predicate over a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The record is an issue.
    NotPullRequest,
    /// The record carries one of the listed labels.
    HasLabel(&'static [&'static str]),
    /// The record was created strictly before the challenge cutoff.
    CreatedBeforeCutoff,
    /// The repository carries [`CHALLENGE_TOPIC`] and the pull request was
    /// merged. Requires both lookups; the merge status is only queried for
    /// opted-in repositories.
    MergedIntoOptedInRepository
}

/// A row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub bucket: Bucket,
    /// The rule applies when any condition holds.
    pub any_of: &'static [Condition]
}

/// Decision table in precedence order.
pub const RULES: &[Rule] = &[
    Rule {
        bucket: Bucket::Issue,
        any_of: &[Condition::NotPullRequest]
    },
    Rule {
        bucket: Bucket::Invalid,
        any_of: &[Condition::HasLabel(INVALID_LABELS)]
    },
    Rule {
        bucket: Bucket::Valid,
        any_of: &[
            Condition::HasLabel(ACCEPTED_LABELS),
            Condition::CreatedBeforeCutoff,
            Condition::MergedIntoOptedInRepository
        ]
    }
];

/// Bucket used when no rule matches.
pub const FALLBACK: Bucket = Bucket::Ignored;

/// The four disjoint buckets produced by classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Buckets {
    pub valid:   Vec<Contribution>,
    pub invalid: Vec<Contribution>,
    pub ignored: Vec<Contribution>,
    pub issues:  Vec<Contribution>
}

impl Buckets {
    /// Returns the contributions stored in `bucket`.
    pub fn get(&self, bucket: Bucket) -> &[Contribution] {
        match bucket {
            Bucket::Valid => &self.valid,
            Bucket::Invalid => &self.invalid,
            Bucket::Ignored => &self.ignored,
            Bucket::Issue => &self.issues
        }
    }

    /// Total number of contributions across all buckets.
    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len() + self.ignored.len() + self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, bucket: Bucket, contribution: Contribution) {
        match bucket {
            Bucket::Valid => self.valid.push(contribution),
            Bucket::Invalid => self.invalid.push(contribution),
            Bucket::Ignored => self.ignored.push(contribution),
            Bucket::Issue => self.issues.push(contribution)
        }
    }
}

/// Outcome of classifying one participant's records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub buckets:      Buckets,
    /// Repositories referenced by any record, deduplicated by name, in
    /// first-seen order.
    pub repositories: Vec<RepositoryRef>
}

/// Classifies the records of a single participant.
///
/// A classifier memoizes repository topics for the duration of one pass; it
/// is consumed by [`classify`](Self::classify) and should not be shared
/// between participants.
#[derive(Debug)]
pub struct Classifier<'lookup, L> {
    lookup: &'lookup L,
    cutoff: DateTime<Utc>,
    topics: HashMap<String, bool>
}

impl<'lookup, L> Classifier<'lookup, L>
where
    L: ContributionLookup
{
    /// Creates a classifier using `lookup` for live checks and `cutoff` as
    /// the early-contribution boundary.
    pub fn new(lookup: &'lookup L, cutoff: DateTime<Utc>) -> Self {
        Self {
            lookup,
            cutoff,
            topics: HashMap::new()
        }
    }

    /// Partitions `records` into buckets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedUrl`] if any record references an
    /// unresolvable repository and [`Error::ExternalLookup`] if a live lookup
    /// fails. Either aborts the whole pass; no partial result is returned.
    pub async fn classify(
        mut self,
        records: Vec<ContributionRecord>
    ) -> Result<Classification, Error> {
        let mut classification = Classification::default();

        for record in records {
            let repository = resolve_repository(&record.repository_url)?;
            if !classification
                .repositories
                .iter()
                .any(|known| known.same_name(&repository))
            {
                classification.repositories.push(repository.clone());
            }

            let bucket = self.bucket_for(&record, &repository).await?;
            debug!("{}#{} classified as {:?}", repository, record.number, bucket);
            classification.buckets.push(bucket, Contribution {
                record,
                repository
            });
        }

        let buckets = &classification.buckets;
        info!(
            "Classified {} contributions: {} valid, {} invalid, {} ignored, {} issues",
            buckets.len(),
            buckets.valid.len(),
            buckets.invalid.len(),
            buckets.ignored.len(),
            buckets.issues.len()
        );

        Ok(classification)
    }

    /// Returns the bucket of a single record by walking [`RULES`].
    ///
    /// # Errors
    ///
    /// Propagates lookup failures.
    pub async fn bucket_for(
        &mut self,
        record: &ContributionRecord,
        repository: &RepositoryRef
    ) -> Result<Bucket, Error> {
        for rule in RULES {
            for condition in rule.any_of {
                if self.holds(*condition, record, repository).await? {
                    return Ok(rule.bucket);
                }
            }
        }
        Ok(FALLBACK)
    }

    async fn holds(
        &mut self,
        condition: Condition,
        record: &ContributionRecord,
        repository: &RepositoryRef
    ) -> Result<bool, Error> {
        match condition {
            Condition::NotPullRequest => Ok(!record.is_pull_request),
            Condition::HasLabel(labels) => Ok(record.has_any_label(labels)),
            Condition::CreatedBeforeCutoff => Ok(record.created_at < self.cutoff),
            Condition::MergedIntoOptedInRepository => {
                if !self.opted_in(repository).await? {
                    return Ok(false);
                }
                self.lookup.is_merged(repository, record.number).await
            }
        }
    }

    async fn opted_in(&mut self, repository: &RepositoryRef) -> Result<bool, Error> {
        let full_name = repository.full_name();
        if let Some(opted_in) = self.topics.get(&full_name) {
            return Ok(*opted_in);
        }

        let topics = self.lookup.repository_topics(repository).await?;
        let opted_in = topics.iter().any(|topic| topic == CHALLENGE_TOPIC);
        debug!("{} opted in: {}", full_name, opted_in);
        self.topics.insert(full_name, opted_in);
        Ok(opted_in)
    }
}

/// Classifies `records` with a fresh [`Classifier`].
///
/// # Errors
///
/// See [`Classifier::classify`].
pub async fn classify<L>(
    records: Vec<ContributionRecord>,
    lookup: &L,
    cutoff: DateTime<Utc>
) -> Result<Classification, Error>
where
    L: ContributionLookup
{
    Classifier::new(lookup, cutoff).classify(records).await
}
