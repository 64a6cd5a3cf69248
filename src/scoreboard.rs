// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Scoreboard assembly.
//!
//! Each participant goes through fetch, classify, aggregate and badge
//! evaluation. Participants are independent, so rows are evaluated in
//! parallel once every aggregate has been built.

use std::{collections::BTreeMap, fs, path::Path};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    badge::{Badge, BadgeCatalog},
    classifier::classify,
    config::{ChallengeSettings, ScoreSettings},
    contribution::ContributionRecord,
    error::{self, Error},
    github::GithubClient,
    lookup::{ContributionLookup, RecordedLookup},
    participant::{Identity, Participant, PublicProfile}
};

/// Classifies `records` and wraps the result into a [`Participant`].
///
/// # Errors
///
/// Propagates classification errors; no participant is produced for a
/// partial classification.
pub async fn build_participant<L>(
    identity: Identity,
    records: Vec<ContributionRecord>,
    lookup: &L,
    cutoff: DateTime<Utc>,
    settings: ScoreSettings
) -> Result<Participant, Error>
where
    L: ContributionLookup
{
    let classification = classify(records, lookup, cutoff).await?;
    Ok(Participant::new(identity, classification, settings))
}

/// Fetches and classifies the contributions of `login` from GitHub.
///
/// # Errors
///
/// Returns [`Error::ExternalLookup`] when any GitHub request fails after
/// retries and [`Error::MalformedUrl`] when a search result references an
/// unexpected repository URL.
pub async fn score_participant(
    client: &GithubClient,
    settings: &ChallengeSettings,
    login: &str
) -> Result<Participant, Error> {
    let identity = client.resolve_user(login).await?;
    let records = client
        .fetch_contributions(login, &settings.search_window)
        .await?;
    build_participant(
        identity,
        records,
        client,
        settings.cutoff,
        settings.score.clone()
    )
    .await
}

/// Recorded participant used for offline classification.
///
/// # Examples
///
/// ```
/// use hacktoberboard::ReplayFixture;
///
/// let fixture: ReplayFixture = serde_json::from_str(
///     r#"{
///         "identity": {
///             "username": "octocat",
///             "avatar_url": "https://avatars.example.com/octocat",
///             "profile_url": "https://github.com/octocat"
///         },
///         "records": []
///     }"#
/// )?;
/// assert!(fixture.records.is_empty());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Deserialize)]
pub struct ReplayFixture {
    pub identity: Identity,
    #[serde(default)]
    pub records:  Vec<ContributionRecord>,
    /// Recorded answers for merge-status and topic lookups.
    #[serde(default)]
    pub lookups:  RecordedLookup
}

impl ReplayFixture {
    /// Reads a JSON fixture from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Serialize`] when it is not a valid fixture.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Classifies the recorded contributions against the recorded lookups.
    ///
    /// # Errors
    ///
    /// See [`build_participant`].
    pub async fn replay(self, settings: &ChallengeSettings) -> Result<Participant, Error> {
        let Self {
            identity,
            records,
            lookups
        } = self;
        build_participant(
            identity,
            records,
            &lookups,
            settings.cutoff,
            settings.score.clone()
        )
        .await
    }
}

/// One scoreboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreboardEntry {
    #[serde(flatten)]
    pub profile:       PublicProfile,
    pub contributions: usize,
    pub invalid:       usize,
    pub ignored:       usize,
    pub issues:        usize,
    /// Completion percentage in `0..=100`.
    pub completion:    u32,
    pub complete:      bool,
    /// Identifiers of earned badges, in catalog order.
    pub badges:        Vec<&'static str>,
    /// Valid contributions per repository.
    pub repositories:  BTreeMap<String, usize>
}

impl ScoreboardEntry {
    /// Evaluates every metric of `participant`.
    pub fn evaluate(participant: &Participant, catalog: &BadgeCatalog) -> Self {
        Self {
            profile:       participant.public_profile(),
            contributions: participant.contributions_count(),
            invalid:       participant.invalid_count(),
            ignored:       participant.ignored_count(),
            issues:        participant.issues_count(),
            completion:    participant.challenge_completion(),
            complete:      participant.challenge_complete(),
            badges:        participant
                .badges(catalog)
                .into_iter()
                .map(Badge::id)
                .collect(),
            repositories:  participant.contributions_by_repository()
        }
    }
}

/// Scoreboard for the whole challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub objective: u32,
    /// Rows ordered by valid contributions, then username.
    pub entries:   Vec<ScoreboardEntry>
}

impl Scoreboard {
    /// Builds the scoreboard for `participants` scored under `settings`.
    ///
    /// The reported objective is `settings.objective`. Rows are evaluated
    /// with the objective their participant was built with; a participant
    /// built with different settings is logged.
    pub fn from_participants(
        settings: &ScoreSettings,
        participants: &[Participant],
        catalog: &BadgeCatalog
    ) -> Self {
        let objective = settings.objective;
        for participant in participants {
            if participant.settings().objective != objective {
                warn!(
                    "{} was scored against objective {}, scoreboard reports {}",
                    participant.username(),
                    participant.settings().objective,
                    objective
                );
            }
        }

        let mut entries: Vec<ScoreboardEntry> = participants
            .par_iter()
            .map(|participant| ScoreboardEntry::evaluate(participant, catalog))
            .collect();

        entries.sort_by(|left, right| {
            right
                .contributions
                .cmp(&left.contributions)
                .then_with(|| left.profile.username.cmp(&right.profile.username))
        });

        let completed = entries.iter().filter(|entry| entry.complete).count();
        info!(
            "Scoreboard built for {} participants, {} completed the challenge",
            entries.len(),
            completed
        );

        Self {
            objective: objective.get(),
            entries
        }
    }
}
