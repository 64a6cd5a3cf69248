//! Challenge configuration documents and the validated settings derived from
//! them.
//!
//! The YAML document names the objective, the URL prefixes used to tell
//! organization repositories apart from personal ones, the named target
//! repositories, and the participants to score. Optional values fall back to
//! the 2020 edition of the challenge.

use std::{fmt, fs, num::NonZeroU32, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Timestamp before which every pull request counts (2020-10-03T00:00:00Z).
pub const DEFAULT_CUTOFF_TIMESTAMP: i64 = 1_601_683_200;
/// Search qualifier bounding the challenge month.
pub const DEFAULT_SEARCH_WINDOW: &str =
    "created:2020-09-30T10:00:00-12:00..2020-11-01T12:00:00-12:00";
/// Prefix shared by every repository API URL.
pub const DEFAULT_BASE_REPOS_URL: &str = "https://api.github.com/repos";

/// Number of valid contributions required to complete the challenge.
///
/// Always positive, which keeps completion percentages well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,)]
pub struct Objective(NonZeroU32,);

impl Objective
{
    /// Creates an objective of `target` contributions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when `target` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use hacktoberboard::Objective;
    ///
    /// assert_eq!(Objective::new(4,)?.get(), 4);
    /// assert!(Objective::new(0,).is_err());
    /// # Ok::<(), hacktoberboard::Error>(())
    /// ```
    pub fn new(target: u32,) -> Result<Self, Error,>
    {
        NonZeroU32::new(target,)
            .map(Self,)
            .ok_or_else(|| Error::configuration("objective must be greater than zero",),)
    }

    pub fn get(self,) -> u32
    {
        self.0.get()
    }
}

impl fmt::Display for Objective
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

impl<'de,> Deserialize<'de,> for Objective
{
    fn deserialize<D,>(deserializer: D,) -> Result<Self, D::Error,>
    where
        D: serde::Deserializer<'de,>,
    {
        let value = u32::deserialize(deserializer,)?;
        NonZeroU32::new(value,)
            .map(Self,)
            .ok_or_else(|| serde::de::Error::custom("objective must be greater than zero",),)
    }
}

/// Repositories that award dedicated badges.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq,)]
#[serde(deny_unknown_fields)]
pub struct TargetRepositories
{
    /// API URL of the snake game repository.
    #[serde(default)]
    pub snake:       Option<String,>,
    /// API URL of the leaderboard repository.
    #[serde(default)]
    pub leaderboard: Option<String,>,
}

/// Raw challenge document as written in YAML.
///
/// # Examples
///
/// ```
/// use hacktoberboard::ChallengeConfig;
///
/// let yaml = r#"
/// objective: 4
/// org_repos_url: https://api.github.com/repos/acme
/// participants: [octocat]
/// "#;
/// let config: ChallengeConfig = serde_yaml::from_str(yaml,).expect("valid configuration",);
/// assert_eq!(config.objective.get(), 4);
/// ```
#[derive(Debug, Deserialize, Clone,)]
#[serde(deny_unknown_fields)]
pub struct ChallengeConfig
{
    pub objective: Objective,

    /// Overrides the 2020 cutoff. Must be an RFC 3339 timestamp.
    #[serde(default)]
    pub cutoff: Option<DateTime<Utc,>,>,

    /// Overrides the search qualifier appended to `author:<login>`.
    #[serde(default)]
    pub search_window: Option<String,>,

    /// API URL prefix of the organization's repositories.
    pub org_repos_url: String,

    /// API URL prefix under which personal namespaces live.
    #[serde(default)]
    pub base_repos_url: Option<String,>,

    #[serde(default)]
    pub targets: TargetRepositories,

    /// GitHub logins to score.
    #[serde(default)]
    pub participants: Vec<String,>,
}

/// Settings every participant aggregate is built with.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ScoreSettings
{
    pub objective:      Objective,
    /// Organization repository prefix, matched verbatim against
    /// repository URLs.
    pub org_repos_url:  String,
    /// Base repository prefix, without trailing slash.
    pub base_repos_url: String,
    pub targets:        TargetRepositories,
}

impl ScoreSettings
{
    /// Builds settings with the public GitHub base URL and no target
    /// repositories.
    pub fn new(objective: Objective, org_repos_url: &str,) -> Self
    {
        Self {
            objective,
            org_repos_url: org_repos_url.trim().to_owned(),
            base_repos_url: DEFAULT_BASE_REPOS_URL.to_owned(),
            targets: TargetRepositories::default(),
        }
    }

    /// Prefix of repositories owned by `username`.
    pub fn personal_prefix(&self, username: &str,) -> String
    {
        format!("{}/{}", self.base_repos_url, username)
    }
}

/// Validated challenge settings.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ChallengeSettings
{
    pub score:         ScoreSettings,
    pub cutoff:        DateTime<Utc,>,
    pub search_window: String,
    pub participants:  Vec<String,>,
}

/// Returns the 2020 edition cutoff.
pub fn default_cutoff() -> DateTime<Utc,>
{
    DateTime::from_timestamp(DEFAULT_CUTOFF_TIMESTAMP, 0,).unwrap_or_default()
}

/// Loads challenge settings from a YAML file.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and the errors of
/// [`parse_challenge`] otherwise.
pub fn load_challenge(path: &Path,) -> Result<ChallengeSettings, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_challenge(&contents,)
}

/// Parses and validates a challenge document.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the YAML cannot be decoded (including a zero
/// objective) and [`Error::Configuration`] when URLs or participants are
/// blank.
pub fn parse_challenge(contents: &str,) -> Result<ChallengeSettings, Error,>
{
    let config: ChallengeConfig = serde_yaml::from_str(contents,)?;
    ChallengeSettings::try_from(config,)
}

impl TryFrom<ChallengeConfig,> for ChallengeSettings
{
    type Error = Error;

    fn try_from(config: ChallengeConfig,) -> Result<Self, Self::Error,>
    {
        let org_repos_url = required_prefix("org_repos_url", &config.org_repos_url,)?;
        let base_repos_url = match config.base_repos_url.as_deref() {
            Some(url,) => required_url("base_repos_url", url,)?,
            None => DEFAULT_BASE_REPOS_URL.to_owned(),
        };

        let targets = TargetRepositories {
            snake:       optional_url("targets.snake", config.targets.snake.as_deref(),)?,
            leaderboard: optional_url("targets.leaderboard", config.targets.leaderboard.as_deref(),)?,
        };

        let mut participants = Vec::with_capacity(config.participants.len(),);
        for login in &config.participants {
            let trimmed = login.trim();
            if trimmed.is_empty() {
                return Err(Error::configuration("participant logins cannot be empty",),);
            }
            if !participants.iter().any(|known: &String| known.eq_ignore_ascii_case(trimmed,),) {
                participants.push(trimmed.to_owned(),);
            }
        }

        let search_window = config
            .search_window
            .map(|window| window.trim().to_owned(),)
            .filter(|window| !window.is_empty(),)
            .unwrap_or_else(|| DEFAULT_SEARCH_WINDOW.to_owned(),);

        Ok(Self {
            score: ScoreSettings {
                objective: config.objective,
                org_repos_url,
                base_repos_url,
                targets,
            },
            cutoff: config.cutoff.unwrap_or_else(default_cutoff,),
            search_window,
            participants,
        },)
    }
}

fn trim_url(url: &str,) -> String
{
    url.trim().trim_end_matches('/',).to_owned()
}

fn required_url(field: &str, url: &str,) -> Result<String, Error,>
{
    required_prefix(field, &trim_url(url,),)
}

/// Validates `url` without touching anything but surrounding whitespace.
fn required_prefix(field: &str, url: &str,) -> Result<String, Error,>
{
    let trimmed = url.trim().to_owned();
    if trimmed.is_empty() {
        return Err(Error::configuration(format!("{field} cannot be empty"),),);
    }
    if !trimmed.starts_with("http://",) && !trimmed.starts_with("https://",) {
        return Err(Error::configuration(format!("{field} must be an http(s) URL"),),);
    }
    Ok(trimmed,)
}

fn optional_url(field: &str, url: Option<&str,>,) -> Result<Option<String,>, Error,>
{
    url.map(|value| required_url(field, value,),).transpose()
}
