// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Badge evaluation.
//!
//! A badge is a named predicate over a [`Participant`]. Predicates only read
//! the participant's public metrics, so new badges are added by pushing onto a
//! [`BadgeCatalog`] without touching the aggregate or the classifier.

use std::fmt;

use crate::participant::{LONG_BODY_THRESHOLD, Participant};

type Predicate = dyn Fn(&Participant) -> bool + Send + Sync;

/// Named achievement awarded when its predicate holds.
pub struct Badge {
    id:          &'static str,
    description: &'static str,
    predicate:   Box<Predicate>
}

impl Badge {
    /// Creates a badge from an identifier, a description and a predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use hacktoberboard::Badge;
    ///
    /// let badge = Badge::new("first-step", "Made a valid contribution", |participant| {
    ///     participant.contributions_count() > 0
    /// });
    /// assert_eq!(badge.id(), "first-step");
    /// ```
    pub fn new<F>(id: &'static str, description: &'static str, predicate: F) -> Self
    where
        F: Fn(&Participant) -> bool + Send + Sync + 'static
    {
        Self {
            id,
            description,
            predicate: Box::new(predicate)
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Returns `true` when `participant` earned this badge.
    pub fn earned_by(&self, participant: &Participant) -> bool {
        (self.predicate)(participant)
    }
}

impl fmt::Debug for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Badge")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of badges.
#[derive(Debug, Default)]
pub struct BadgeCatalog {
    badges: Vec<Badge>
}

impl BadgeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the badges awarded by the scoreboard out of the box.
    pub fn default_catalog() -> Self {
        let mut catalog = Self::new();
        catalog.push(Badge::new(
            "challenge-complete",
            "Reached the challenge objective",
            Participant::challenge_complete
        ));
        catalog.push(Badge::new(
            "ten-contributions",
            "Made ten valid contributions",
            Participant::ten_contributions
        ));
        catalog.push(Badge::new(
            "out-of-org",
            "Contributed to a project outside the organization",
            |participant| participant.contributed_out_of_org() > 0
        ));
        catalog.push(Badge::new(
            "snake",
            "Contributed to the snake game",
            |participant| participant.contributed_to_snake() > 0
        ));
        catalog.push(Badge::new(
            "leaderboard",
            "Contributed to the leaderboard",
            |participant| participant.contributed_to_leaderboard() > 0
        ));
        catalog.push(Badge::new(
            "storyteller",
            "Wrote a pull request description of at least a hundred words",
            |participant| participant.contributions_with_long_body(LONG_BODY_THRESHOLD) > 0
        ));
        catalog.push(Badge::new(
            "silent",
            "Opened a pull request without a description",
            |participant| participant.contributions_with_empty_body() > 0
        ));
        catalog.push(Badge::new(
            "self-made",
            "Contributed to one of their own repositories",
            |participant| participant.contributions_to_own_repos() > 0
        ));
        catalog
    }

    pub fn push(&mut self, badge: Badge) {
        self.badges.push(badge);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter()
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    /// Returns the badges whose predicate holds for `participant`, in catalog
    /// order.
    pub fn earned_by(&self, participant: &Participant) -> Vec<&Badge> {
        self.badges
            .iter()
            .filter(|badge| badge.earned_by(participant))
            .collect()
    }
}
