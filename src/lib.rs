//! setupgen turns a profile configuration into a populated tree of agent
//! rules, skills and settings.
//! Configuration values are resolved from YAML documents and substituted
//! into a template tree through escaped `s/pattern/replacement/` expressions,
//! then the generated tree is checked against its structural contract.

/// Command-line interface module for the setupgen application
pub mod cli;

/// Profile configuration documents and placeholder resolution
pub mod config;

/// File-name conventions and the generated tree contract
pub mod constants;

/// Error types and handling for the setupgen application
pub mod error;

/// Escaping of values for substitution operands
pub mod escape;

/// Template tree expansion
pub mod expander;

/// Profile state machine, discovery and batch runs
pub mod generator;

/// File and directory ignore patterns
/// Processes .setupignore files to exclude specific template paths
pub mod ignore;

/// Logger initialization for the command-line binary
pub mod logger;

/// Line-oriented substitution expressions
pub mod substitution;

/// Structural checks on generated trees
pub mod validator;
