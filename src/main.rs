//! Command-line interface for the hacktoberboard binary.
//!
//! `score` fetches every configured participant from GitHub and prints the
//! scoreboard; `classify` replays a recorded participant offline through the
//! same rules.

use std::{
    io,
    path::{Path, PathBuf},
    process,
    time::Duration,
};

use clap::{ArgAction, Args, Parser, Subcommand};
use hacktoberboard::{
    BadgeCatalog, Error, ReplayFixture, Scoreboard, ScoreboardEntry, github::GithubClient,
    load_challenge, retry::RetryConfig, score_participant,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command line interface for building challenge scoreboards.
#[derive(Debug, Parser,)]
#[command(name = "hacktoberboard", version, about = "Score challenge contributions")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Fetch participants from GitHub and print the scoreboard.
    Score(ScoreArgs,),
    /// Classify a recorded participant fixture without network access.
    Classify(ClassifyArgs,),
}

#[derive(Debug, Args,)]
struct ScoreArgs
{
    /// Path to the YAML challenge configuration.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// GitHub token used for API requests.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String,>,

    /// Attempts per GitHub request before giving up.
    #[arg(long = "max-attempts", value_name = "N", default_value_t = 3)]
    max_attempts: u32,

    /// Skip participants whose scoring fails instead of aborting.
    #[arg(long = "skip-failed", action = ArgAction::SetTrue)]
    skip_failed: bool,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct ClassifyArgs
{
    /// Path to the YAML challenge configuration.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// JSON fixture holding the participant, records and recorded lookups.
    #[arg(long = "input", value_name = "PATH")]
    input: PathBuf,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),),
        )
        .with_writer(io::stderr,)
        .init();

    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, lookup and serialization errors.
fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::configuration(format!("failed to start async runtime: {e}"),),)?;

    match cli.command {
        Command::Score(args,) => runtime.block_on(run_score(args,),),
        Command::Classify(args,) => runtime.block_on(run_classify(args,),),
    }
}

async fn run_score(args: ScoreArgs,) -> Result<(), Error,>
{
    let settings = load_challenge(&args.config,)?;
    let retry = RetryConfig {
        max_attempts: args.max_attempts, ..RetryConfig::default()
    };
    let client = GithubClient::new(args.token.as_deref(), retry,)?;
    let catalog = BadgeCatalog::default_catalog();

    let pb = ProgressBar::new(settings.participants.len() as u64,);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.yellow} [{elapsed_precise}] {pos}/{len} {msg}",)
            .unwrap_or_else(|_| ProgressStyle::default_bar(),),
    );
    pb.enable_steady_tick(Duration::from_millis(120,),);

    let mut participants = Vec::with_capacity(settings.participants.len(),);
    for login in &settings.participants {
        pb.set_message(format!("Scoring {login}..."),);
        match score_participant(&client, &settings, login,).await {
            Ok(participant,) => participants.push(participant,),
            Err(error,) if args.skip_failed => {
                warn!("Skipping {}: {}", login, error);
            }
            Err(error,) => {
                pb.abandon_with_message(format!("Failed to score {login}"),);
                return Err(error,);
            }
        }
        pb.inc(1,);
    }
    pb.finish_with_message("Done",);

    info!("Scored {} of {} participants", participants.len(), settings.participants.len());
    let scoreboard =
        Scoreboard::from_participants(&settings.score, &participants, &catalog,);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &scoreboard, args.pretty,)
}

async fn run_classify(args: ClassifyArgs,) -> Result<(), Error,>
{
    let entry = classify_fixture(&args.config, &args.input,).await?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &entry, args.pretty,)
}

async fn classify_fixture(config: &Path, input: &Path,) -> Result<ScoreboardEntry, Error,>
{
    let settings = load_challenge(config,)?;
    let participant = ReplayFixture::load(input,)?.replay(&settings,).await?;
    Ok(ScoreboardEntry::evaluate(&participant, &BadgeCatalog::default_catalog(),),)
}

fn write_json<W: io::Write, T: serde::Serialize,>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, value,)?;
    } else {
        serde_json::to_writer(writer, value,)?;
    }

    Ok((),)
}

#[cfg(test)]
mod tests
{
    use std::{fs, io::Cursor};

    use clap::Parser;
    use hacktoberboard::Scoreboard;
    use tempfile::tempdir;

    use super::{Cli, Command, classify_fixture, write_json};

    #[test]
    fn score_subcommand_parses_flags()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "score",
            "--config",
            "challenge.yaml",
            "--token",
            "secret",
            "--max-attempts",
            "5",
            "--skip-failed",
        ],)
        .expect("failed to parse CLI",);

        match cli.command {
            Command::Score(args,) => {
                assert_eq!(args.token.as_deref(), Some("secret"));
                assert_eq!(args.max_attempts, 5);
                assert!(args.skip_failed);
                assert!(!args.pretty);
            }
            other => panic!("unexpected command variant: {other:?}"),
        }
    }

    #[test]
    fn classify_subcommand_requires_input()
    {
        let result =
            Cli::try_parse_from([env!("CARGO_PKG_NAME"), "classify", "--config", "c.yaml",],);
        assert!(result.is_err());
    }

    #[test]
    fn pretty_flag_uses_pretty_writer()
    {
        let scoreboard = Scoreboard {
            objective: 4, entries: Vec::new(),
        };

        let mut compact = Cursor::new(Vec::new(),);
        write_json(&mut compact, &scoreboard, false,).expect("failed to serialize",);
        let output = String::from_utf8(compact.into_inner(),).expect("invalid UTF-8",);
        assert_eq!(output, "{\"objective\":4,\"entries\":[]}");

        let mut pretty = Cursor::new(Vec::new(),);
        write_json(&mut pretty, &scoreboard, true,).expect("failed to serialize",);
        let output = String::from_utf8(pretty.into_inner(),).expect("invalid UTF-8",);
        assert_eq!(output, "{\n  \"objective\": 4,\n  \"entries\": []\n}");
    }

    #[tokio::test]
    async fn classify_fixture_produces_entry()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let config = temp.path().join("challenge.yaml",);
        let input = temp.path().join("octocat.json",);
        fs::write(&config, "objective: 1\norg_repos_url: https://api.github.com/repos/acme\n",)
            .expect("failed to write config",);
        fs::write(
            &input,
            r#"{
                "identity": {
                    "username": "octocat",
                    "avatar_url": "https://avatars.example.com/octocat",
                    "profile_url": "https://github.com/octocat"
                },
                "records": [{
                    "repository_url": "https://api.github.com/repos/rust-lang/book",
                    "is_pull_request": true,
                    "labels": ["hacktoberfest-accepted"],
                    "created_at": "2020-10-21T00:00:00Z",
                    "body": "Clarify ownership chapter",
                    "number": 9
                }]
            }"#,
        )
        .expect("failed to write fixture",);

        let entry = classify_fixture(&config, &input,).await.expect("classification failed",);
        assert_eq!(entry.contributions, 1);
        assert!(entry.complete);
        assert_eq!(entry.badges, vec!["challenge-complete", "out-of-org"]);
    }

    #[tokio::test]
    async fn classify_fixture_reports_missing_config()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let error = classify_fixture(&temp.path().join("missing.yaml",), &temp.path().join("x.json",),)
            .await
            .expect_err("expected io error",);
        assert!(matches!(error, hacktoberboard::Error::Io { .. }));
    }
}
