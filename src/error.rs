use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop sshift before or after the UI runs.
#[derive(Error, Debug)]
pub enum Error {
    /// The home directory, which holds the config file, could not be found.
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// `ssh` could not be started for the selected server.
    #[error("Failed to launch ssh for {target}: {source}")]
    Ssh {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// A problem found while reading the config file.
///
/// Warnings never abort loading: the offending line or section is skipped and
/// every other section is still turned into a server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    #[error("[{section}] is missing required key `{key}`, skipped")]
    MissingKey { section: String, key: &'static str },

    #[error("[{section}] `{key}` value `{value}` starts with '-', skipped")]
    OptionLikeValue {
        section: String,
        key: &'static str,
        value: String,
    },

    #[error("[{section}] has invalid port `{value}`, skipped")]
    InvalidPort { section: String, value: String },

    #[error("line {line}: section [{section}] is defined twice, ignoring the second one")]
    DuplicateSection { section: String, line: usize },

    #[error("line {line}: cannot parse `{content}`")]
    MalformedLine { line: usize, content: String },

    #[error("cannot read config {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("cannot write config template {path}: {reason}")]
    TemplateNotWritten { path: PathBuf, reason: String },
}
