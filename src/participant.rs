// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Participant aggregates and the metrics derived from their buckets.
//!
//! A [`Participant`] is immutable once built. Every metric is computed on
//! demand from the classified buckets; nothing is cached or persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    badge::{Badge, BadgeCatalog},
    classifier::{Buckets, Classification},
    config::ScoreSettings,
    contribution::Contribution,
    repository::RepositoryRef
};

/// Word count above which a contribution body counts as long.
pub const LONG_BODY_THRESHOLD: usize = 100;
/// Valid contributions needed for the ten-contributions milestone.
pub const TEN_CONTRIBUTIONS: usize = 10;

/// Public identity of a participant as returned by the GitHub users API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username:    String,
    pub avatar_url:  String,
    pub profile_url: String
}

/// Minimal public representation handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicProfile {
    pub username: String,
    pub avatar:   String,
    pub profile:  String
}

/// A participant together with their classified contributions.
#[derive(Debug, Clone)]
pub struct Participant {
    identity:     Identity,
    buckets:      Buckets,
    repositories: Vec<RepositoryRef>,
    settings:     ScoreSettings
}

impl Participant {
    /// Builds a participant from its identity and classification output.
    pub fn new(identity: Identity, classification: Classification, settings: ScoreSettings) -> Self {
        Self {
            identity,
            buckets: classification.buckets,
            repositories: classification.repositories,
            settings
        }
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    pub fn settings(&self) -> &ScoreSettings {
        &self.settings
    }

    /// Valid contributions.
    pub fn contributions(&self) -> &[Contribution] {
        &self.buckets.valid
    }

    /// Repositories referenced by any contribution, issues included.
    pub fn repositories(&self) -> &[RepositoryRef] {
        &self.repositories
    }

    pub fn contributions_count(&self) -> usize {
        self.buckets.valid.len()
    }

    pub fn challenge_complete(&self) -> bool {
        self.contributions_count() >= self.objective()
    }

    /// Completion percentage, floored and clamped to 100.
    pub fn challenge_completion(&self) -> u32 {
        let percent = self.contributions_count() * 100 / self.objective();
        percent.min(100) as u32
    }

    pub fn ten_contributions(&self) -> bool {
        self.contributions_count() >= TEN_CONTRIBUTIONS
    }

    /// Valid contributions made to the repository at `repository_url`.
    pub fn contributed_to(&self, repository_url: &str) -> usize {
        self.count_valid(|contribution| contribution.repository_url() == repository_url)
    }

    /// Valid contributions to the configured snake repository, zero when
    /// none is configured.
    pub fn contributed_to_snake(&self) -> usize {
        self.settings
            .targets
            .snake
            .as_deref()
            .map_or(0, |url| self.contributed_to(url))
    }

    /// Valid contributions to the configured leaderboard repository, zero
    /// when none is configured.
    pub fn contributed_to_leaderboard(&self) -> usize {
        self.settings
            .targets
            .leaderboard
            .as_deref()
            .map_or(0, |url| self.contributed_to(url))
    }

    /// Valid contributions to repositories outside both the organization and
    /// the participant's own namespace.
    pub fn contributed_out_of_org(&self) -> usize {
        let personal = self.settings.personal_prefix(self.username());
        self.count_valid(|contribution| {
            let url = contribution.repository_url();
            !url.starts_with(&self.settings.org_repos_url) && !url.starts_with(&personal)
        })
    }

    /// Valid contributions whose body has at least `threshold` words.
    pub fn contributions_with_long_body(&self, threshold: usize) -> usize {
        self.count_valid(|contribution| contribution.body_word_count() >= threshold)
    }

    pub fn contributions_with_empty_body(&self) -> usize {
        self.count_valid(Contribution::has_empty_body)
    }

    /// Valid contributions to repositories under the participant's own
    /// namespace.
    pub fn contributions_to_own_repos(&self) -> usize {
        let personal = self.settings.personal_prefix(self.username());
        self.count_valid(|contribution| contribution.repository_url().starts_with(&personal))
    }

    pub fn invalid_count(&self) -> usize {
        self.buckets.invalid.len()
    }

    pub fn ignored_count(&self) -> usize {
        self.buckets.ignored.len()
    }

    pub fn issues_count(&self) -> usize {
        self.buckets.issues.len()
    }

    /// Valid contributions per repository full name.
    pub fn contributions_by_repository(&self) -> BTreeMap<String, usize> {
        let mut breakdown = BTreeMap::new();
        for contribution in &self.buckets.valid {
            *breakdown
                .entry(contribution.repository.full_name())
                .or_insert(0) += 1;
        }
        breakdown
    }

    /// Badges from `catalog` earned by this participant.
    pub fn badges<'catalog>(&self, catalog: &'catalog BadgeCatalog) -> Vec<&'catalog Badge> {
        catalog.earned_by(self)
    }

    /// Returns the public `{username, avatar, profile}` view.
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            username: self.identity.username.clone(),
            avatar:   self.identity.avatar_url.clone(),
            profile:  self.identity.profile_url.clone()
        }
    }

    fn objective(&self) -> usize {
        self.settings.objective.get() as usize
    }

    fn count_valid<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Contribution) -> bool
    {
        self.buckets
            .valid
            .iter()
            .filter(|&contribution| predicate(contribution))
            .count()
    }
}

impl Serialize for Participant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer
    {
        self.public_profile().serialize(serializer)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Identity, LONG_BODY_THRESHOLD, Participant};
    use crate::{
        ContributionRecord, Objective, RepositoryRef, ScoreSettings,
        classifier::{Buckets, Classification},
        contribution::Contribution,
        resolve_repository
    };

    pub(crate) const ORG: &str = "https://api.github.com/repos/acme";

    pub(crate) fn valid(url: &str, body: &str) -> Contribution {
        Contribution {
            record:     ContributionRecord {
                repository_url:  url.to_owned(),
                is_pull_request: true,
                labels:          Vec::new(),
                created_at:      "2020-10-01T00:00:00Z".parse().expect("valid timestamp"),
                body:            body.to_owned(),
                number:          1
            },
            repository: resolve_repository(url).expect("valid repository URL")
        }
    }

    pub(crate) fn participant(objective: u32, valid: Vec<Contribution>) -> Participant {
        let mut settings = ScoreSettings::new(Objective::new(objective).expect("positive"), ORG);
        settings.targets.snake = Some(format!("{ORG}/snake"));
        settings.targets.leaderboard = Some(format!("{ORG}/leaderboard"));

        Participant::new(
            Identity {
                username:    "octocat".to_owned(),
                avatar_url:  "https://avatars.example.com/octocat".to_owned(),
                profile_url: "https://github.com/octocat".to_owned()
            },
            Classification {
                buckets:      Buckets {
                    valid,
                    ..Buckets::default()
                },
                repositories: Vec::<RepositoryRef>::new()
            },
            settings
        )
    }

    fn repeated(count: usize) -> Vec<Contribution> {
        (0..count)
            .map(|_| valid("https://api.github.com/repos/other/tool", "Fix typo"))
            .collect()
    }

    #[test]
    fn completion_is_clamped_when_objective_exceeded() {
        let participant = participant(4, repeated(10));
        assert_eq!(participant.contributions_count(), 10);
        assert_eq!(participant.challenge_completion(), 100);
        assert!(participant.challenge_complete());
        assert!(participant.ten_contributions());
    }

    #[test]
    fn completion_is_floored() {
        let participant = participant(3, repeated(1));
        assert_eq!(participant.challenge_completion(), 33);
        assert!(!participant.challenge_complete());
    }

    #[test]
    fn empty_participant_has_zero_completion() {
        let participant = participant(4, Vec::new());
        assert_eq!(participant.challenge_completion(), 0);
        assert!(!participant.challenge_complete());
        assert!(participant.contributions_by_repository().is_empty());
    }

    #[test]
    fn target_repository_counters() {
        let participant = participant(4, vec![
            valid(&format!("{ORG}/snake"), "a"),
            valid(&format!("{ORG}/snake"), "b"),
            valid(&format!("{ORG}/leaderboard"), "c"),
        ]);
        assert_eq!(participant.contributed_to_snake(), 2);
        assert_eq!(participant.contributed_to_leaderboard(), 1);
        assert_eq!(participant.contributed_to("https://api.github.com/repos/x/y"), 0);
    }

    #[test]
    fn own_namespace_is_not_out_of_org() {
        let participant = participant(4, vec![
            valid(&format!("{ORG}/snake"), "org"),
            valid("https://api.github.com/repos/octocat/dotfiles", "own"),
            valid("https://api.github.com/repos/rust-lang/rust", "external"),
        ]);
        assert_eq!(participant.contributed_out_of_org(), 1);
        assert_eq!(participant.contributions_to_own_repos(), 1);
    }

    #[test]
    fn org_prefix_keeps_configured_trailing_slash() {
        let settings =
            ScoreSettings::new(Objective::new(4).expect("positive"), &format!("{ORG}/"));
        let sibling = participant(4, vec![
            valid(&format!("{ORG}/snake"), "org"),
            valid("https://api.github.com/repos/acme-labs/tool", "sibling"),
        ]);
        let participant = Participant::new(
            sibling.identity().clone(),
            Classification {
                buckets:      sibling.buckets().clone(),
                repositories: Vec::new()
            },
            settings
        );

        assert_eq!(participant.settings().org_repos_url, format!("{ORG}/"));
        assert_eq!(participant.contributed_out_of_org(), 1);
    }

    #[test]
    fn body_metrics_count_words_and_blanks() {
        let long_body = vec!["word"; LONG_BODY_THRESHOLD].join(" ");
        let participant = participant(4, vec![
            valid(&format!("{ORG}/snake"), &long_body),
            valid(&format!("{ORG}/snake"), "   "),
            valid(&format!("{ORG}/snake"), "short body"),
        ]);
        assert_eq!(participant.contributions_with_long_body(LONG_BODY_THRESHOLD), 1);
        assert_eq!(participant.contributions_with_long_body(2), 2);
        assert_eq!(participant.contributions_with_empty_body(), 1);
    }

    #[test]
    fn repository_breakdown_groups_by_full_name() {
        let participant = participant(4, vec![
            valid(&format!("{ORG}/snake"), "a"),
            valid("https://api.github.com/repos/other/tool", "b"),
            valid(&format!("{ORG}/snake"), "c"),
        ]);
        let breakdown = participant.contributions_by_repository();
        assert_eq!(breakdown.get("acme/snake"), Some(&2));
        assert_eq!(breakdown.get("other/tool"), Some(&1));
    }

    #[test]
    fn serialization_exposes_public_profile_only() {
        let participant = participant(4, repeated(2));
        let json = serde_json::to_value(&participant).expect("serialization failed");
        assert_eq!(
            json,
            serde_json::json!({
                "username": "octocat",
                "avatar": "https://avatars.example.com/octocat",
                "profile": "https://github.com/octocat"
            })
        );
    }
}
