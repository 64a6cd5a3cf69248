//! Scoreboard for time-boxed contribution challenges.
//!
//! The library classifies a participant's pull requests and issues fetched
//! from GitHub against the challenge rules, aggregates the valid ones into
//! per-participant metrics and evaluates badges over those metrics. Live
//! checks (merge status, repository topics) go through
//! [`ContributionLookup`], which is implemented for the GitHub API client and
//! for recorded answers.

mod badge;
mod classifier;
mod config;
mod contribution;
mod error;
pub mod github;
mod lookup;
mod participant;
mod repository;
pub mod retry;
mod scoreboard;

pub use badge::{Badge, BadgeCatalog};
pub use classifier::{
    ACCEPTED_LABELS, Bucket, Buckets, CHALLENGE_TOPIC, Classification, Classifier, Condition,
    FALLBACK, INVALID_LABELS, RULES, Rule, classify,
};
pub use config::{
    ChallengeConfig, ChallengeSettings, DEFAULT_BASE_REPOS_URL, DEFAULT_CUTOFF_TIMESTAMP,
    DEFAULT_SEARCH_WINDOW, Objective, ScoreSettings, TargetRepositories, default_cutoff,
    load_challenge, parse_challenge,
};
pub use contribution::{Contribution, ContributionRecord};
pub use error::{Error, io_error};
pub use lookup::{ContributionLookup, RecordedLookup};
pub use participant::{Identity, LONG_BODY_THRESHOLD, Participant, PublicProfile, TEN_CONTRIBUTIONS};
pub use repository::{RepositoryRef, resolve_repository};
pub use scoreboard::{
    ReplayFixture, Scoreboard, ScoreboardEntry, build_participant, score_participant,
};
