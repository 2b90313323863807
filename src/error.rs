//! Error handling for setupgen.
//! Defines the error taxonomy and result alias used throughout the crate.
//!
//! Missing configuration keys and failed structural checks are not errors:
//! the former resolve to empty values, the latter are collected into a
//! [`crate::validator::ValidationReport`].

use std::io;
use thiserror::Error;

use crate::generator::Stage;

/// Error type for setupgen operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File system failure while reading a template or writing output
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Directory traversal failure inside the template tree
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// Configuration document that could not be read
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Malformed `s/pattern/replacement/flags` expression
    #[error("Substitution error: {0}.")]
    SubstitutionError(String),

    /// Invalid pattern in a `.setupignore` file
    #[error("SetupIgnore error: {0}.")]
    IgnoreError(String),

    #[error("Template directory '{template_dir}' does not exist.")]
    TemplateDirNotFound { template_dir: String },

    #[error("No profile configuration found in '{location}'.")]
    ProfileNotFound { location: String },

    /// Fatal failure while generating a single profile; `stage` is the last
    /// stage the profile completed
    #[error("Generation of profile '{profile}' failed: {message}")]
    GenerationError { profile: String, stage: Option<Stage>, message: String },
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
