//! Profile generation.
//! Drives one profile through `Loaded -> Expanded -> Validated` and decides
//! whether it passes, and runs several profiles in sequence without letting
//! one failure stop the rest.

use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ConfigDocument;
use crate::constants::{CONFIG_PREFIX, CONFIG_SUFFIX, DEFAULT_TEMPLATE_DIR};
use crate::error::{Error, Result};
use crate::expander::{ExpansionReport, Expander};
use crate::ignore::parse_ignore_file;
use crate::validator::{validate_tree, ValidationReport};

/// A named configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub config_path: PathBuf,
}

impl Profile {
    /// Builds a profile from its configuration path.
    ///
    /// `setup-config.<name>.yaml` yields `<name>`; any other file name falls
    /// back to its stem.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let name = profile_name(file_name)
            .map(str::to_string)
            .or_else(|| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .unwrap_or_else(|| "default".to_string());
        Self { name, config_path: path.to_path_buf() }
    }
}

/// Extracts `<name>` from `setup-config.<name>.yaml`.
pub fn profile_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(CONFIG_PREFIX)
        .and_then(|rest| rest.strip_suffix(CONFIG_SUFFIX))
        .filter(|name| !name.is_empty())
}

/// Lists every `setup-config.<profile>.yaml` in `dir`, sorted by profile name.
///
/// # Errors
/// * `Error::IoError` if the directory cannot be read
/// * `Error::ProfileNotFound` if it holds no profile configuration
pub fn discover_profiles<P: AsRef<Path>>(dir: P) -> Result<Vec<Profile>> {
    let dir = dir.as_ref();
    let mut profiles = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_profile = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(profile_name)
            .is_some();
        if is_profile && path.is_file() {
            profiles.push(Profile::from_path(&path));
        }
    }
    if profiles.is_empty() {
        return Err(Error::ProfileNotFound { location: dir.display().to_string() });
    }
    profiles.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(profiles)
}

/// Template tree looked up beside a configuration document.
pub fn default_template_dir<P: AsRef<Path>>(config_path: P) -> PathBuf {
    config_path
        .as_ref()
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_TEMPLATE_DIR)
}

/// Stages a profile run passes through before its outcome is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    Expanded,
    Validated,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Loaded => write!(f, "loaded"),
            Stage::Expanded => write!(f, "expanded"),
            Stage::Validated => write!(f, "validated"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "PASS"),
            Outcome::Fail => write!(f, "FAIL"),
        }
    }
}

/// Result of a profile run that got as far as validation.
#[derive(Debug, Clone)]
pub struct ProfileReport {
    pub profile: String,
    pub output_dir: PathBuf,
    pub placeholders: usize,
    pub expansion: ExpansionReport,
    pub validation: ValidationReport,
    pub outcome: Outcome,
}

/// Generates profiles from a single template tree.
pub struct ProfileGenerator {
    template_root: PathBuf,
}

impl ProfileGenerator {
    pub fn new<P: Into<PathBuf>>(template_root: P) -> Self {
        Self { template_root: template_root.into() }
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    /// Loads `profile`, expands the template tree into `output_dir` and
    /// validates the result.
    ///
    /// # Errors
    /// * `Error::GenerationError` naming the profile and the last stage it
    ///   completed if its configuration cannot be read or the output cannot
    ///   be written. Failed structural checks are not errors; they yield
    ///   `Outcome::Fail`.
    pub fn run(&self, profile: &Profile, output_dir: &Path) -> Result<ProfileReport> {
        let mut reached = None;
        self.advance(profile, output_dir, &mut reached)
            .map_err(|e| generation_error(profile, reached, e))
    }

    fn advance(
        &self,
        profile: &Profile,
        output_dir: &Path,
        reached: &mut Option<Stage>,
    ) -> Result<ProfileReport> {
        let document = ConfigDocument::load(&profile.config_path)?;
        *reached = Some(Stage::Loaded);
        debug!("[{}] {}", profile.name, Stage::Loaded);

        let placeholders = document.placeholders();
        let expander = Expander::new(&placeholders)?;
        let ignored = parse_ignore_file(&self.template_root)?;
        let expansion = expander.expand_tree(&self.template_root, output_dir, &ignored)?;
        *reached = Some(Stage::Expanded);
        debug!(
            "[{}] {}: {} written, {} copied",
            profile.name,
            Stage::Expanded,
            expansion.written.len(),
            expansion.copied.len()
        );

        let validation = validate_tree(output_dir, &expansion)?;
        *reached = Some(Stage::Validated);

        let outcome = if validation.passed() { Outcome::Pass } else { Outcome::Fail };
        for failure in validation.failures() {
            warn!("[{}] {}", profile.name, failure);
        }
        info!("[{}] {}", profile.name, outcome);

        Ok(ProfileReport {
            profile: profile.name.clone(),
            output_dir: output_dir.to_path_buf(),
            placeholders: placeholders.len(),
            expansion,
            validation,
            outcome,
        })
    }
}

fn generation_error(profile: &Profile, stage: Option<Stage>, err: Error) -> Error {
    match err {
        Error::GenerationError { .. } => err,
        other => Error::GenerationError {
            profile: profile.name.clone(),
            stage,
            message: other.to_string(),
        },
    }
}

/// Per-profile entry of a batch run.
#[derive(Debug)]
pub enum ProfileResult {
    Completed(ProfileReport),
    /// Generation stopped; `stage` is the last stage completed, if any
    Failed { profile: String, stage: Option<Stage>, message: String },
}

impl ProfileResult {
    pub fn profile(&self) -> &str {
        match self {
            ProfileResult::Completed(report) => &report.profile,
            ProfileResult::Failed { profile, .. } => profile,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, ProfileResult::Completed(report) if report.outcome == Outcome::Pass)
    }
}

impl fmt::Display for ProfileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileResult::Completed(report) => {
                write!(f, "{} {}", report.outcome, report.profile)?;
                for failure in report.validation.failures() {
                    write!(f, "\n    {}", failure)?;
                }
                Ok(())
            }
            ProfileResult::Failed { profile, stage: Some(stage), message } => {
                write!(f, "{} {} (stopped after {}): {}", Outcome::Fail, profile, stage, message)
            }
            ProfileResult::Failed { profile, stage: None, message } => {
                write!(f, "{} {} (not loaded): {}", Outcome::Fail, profile, message)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub results: Vec<ProfileResult>,
}

impl BatchSummary {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn success(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{}", result)?;
        }
        write!(f, "{} passed, {} failed", self.passed(), self.failed())
    }
}

/// Output directory of `profile` within a batch of `count` profiles.
pub fn profile_output_dir(output_root: &Path, profile: &Profile, count: usize) -> PathBuf {
    if count > 1 {
        output_root.join(&profile.name)
    } else {
        output_root.to_path_buf()
    }
}

/// Runs every profile in order. A profile that fails to generate is recorded
/// and the remaining profiles still run.
pub fn run_batch(
    generator: &ProfileGenerator,
    profiles: &[Profile],
    output_root: &Path,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for profile in profiles {
        let output_dir = profile_output_dir(output_root, profile, profiles.len());
        info!("Generating profile '{}' into {}", profile.name, output_dir.display());
        let result = match generator.run(profile, &output_dir) {
            Ok(report) => ProfileResult::Completed(report),
            Err(e) => {
                warn!("{}", e);
                let (stage, message) = match e {
                    Error::GenerationError { stage, message, .. } => (stage, message),
                    other => (None, other.to_string()),
                };
                ProfileResult::Failed { profile: profile.name.clone(), stage, message }
            }
        };
        summary.results.push(result);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_name() {
        assert_eq!(profile_name("setup-config.java-spring.yaml"), Some("java-spring"));
        assert_eq!(profile_name("setup-config..yaml"), None);
        assert_eq!(profile_name("setup-config.java.yml"), None);
        assert_eq!(profile_name("other.yaml"), None);
    }

    #[test]
    fn test_profile_from_path() {
        let profile = Profile::from_path("profiles/setup-config.python-fastapi.yaml");
        assert_eq!(profile.name, "python-fastapi");

        let profile = Profile::from_path("custom.yaml");
        assert_eq!(profile.name, "custom");
    }

    #[test]
    fn test_profile_output_dir() {
        let profile = Profile::from_path("setup-config.a.yaml");
        let root = Path::new("out");
        assert_eq!(profile_output_dir(root, &profile, 1), PathBuf::from("out"));
        assert_eq!(profile_output_dir(root, &profile, 2), PathBuf::from("out/a"));
    }

    #[test]
    fn test_default_template_dir() {
        assert_eq!(
            default_template_dir("profiles/setup-config.a.yaml"),
            PathBuf::from("profiles/templates")
        );
    }
}
