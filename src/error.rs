#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the scoreboard crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.

use std::path::{Path, PathBuf};

/// Unified error type returned by the classifier, the configuration loader
/// and the GitHub client.
///
/// No variant is ever converted into a classification outcome: a failure
/// aborts the participant being processed and the caller decides whether to
/// retry or give up.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// A repository URL did not match the GitHub repository API shape.
    #[error("malformed repository URL: {url:?}")]
    MalformedUrl {
        /// Offending URL as received.
        url: String
    },
    /// Network or API failure while querying GitHub.
    #[error("{operation} failed: {message}")]
    ExternalLookup {
        /// Short description of the lookup that failed.
        operation: String,
        /// Human readable failure reported by the client.
        message:   String
    },
    /// Challenge settings violate an invariant.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Human readable message describing the problem.
        message: String
    },
    /// Wraps I/O errors that occur while reading input documents.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Location of the document.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps JSON encoding and decoding errors.
    #[error("failed to process JSON: {source}")]
    Serialize {
        /// Underlying serde_json error.
        source: serde_json::Error
    }
}

impl Error {
    /// Constructs a configuration error from the provided message.
    pub fn configuration<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Configuration {
            message: message.into()
        }
    }

    /// Constructs a lookup error for the named operation.
    ///
    /// # Parameters
    ///
    /// * `operation` - What was being fetched, e.g. `topics for octo/repo`.
    /// * `message` - Failure reported by the client.
    pub fn lookup<O, M>(operation: O, message: M) -> Self
    where
        O: Into<String>,
        M: Into<String>
    {
        Self::ExternalLookup {
            operation: operation.into(),
            message:   message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// Matches the [`std::fmt::Display`] implementation; intended for CLI
    /// output.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(error: masterror::AppError) -> Self {
        Self::ExternalLookup {
            operation: "GitHub request".to_owned(),
            message:   error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}
