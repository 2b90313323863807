//! Structural validation of a generated tree.
//!
//! Every check runs regardless of earlier failures so that a single report
//! lists everything wrong with a profile.

use log::debug;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::constants::{REQUIRED_DIRS, REQUIRED_FILES, RULES_DIR, RULE_EXTENSION, SETTINGS_FILE};
use crate::error::Result;
use crate::expander::{token_regex, ExpansionReport};

/// Outcome of one structural check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub detail: Option<String>,
}

impl Check {
    fn pass<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), passed: true, detail: None }
    }

    fn fail<S: Into<String>, D: Into<String>>(name: S, detail: D) -> Self {
        Self { name: name.into(), passed: false, detail: Some(detail.into()) }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "ok" } else { "FAILED" };
        match &self.detail {
            Some(detail) => write!(f, "[{}] {}: {}", status, self.name, detail),
            None => write!(f, "[{}] {}", status, self.name),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub checks: Vec<Check>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|check| !check.passed)
    }
}

/// Runs every structural check against the tree at `root`.
///
/// Required directories and files are looked up under `root`. Placeholder
/// leftovers are searched only in the files `expansion` produced, so
/// unrelated files already present in an additively written output
/// directory never fail a profile.
///
/// # Errors
/// Only if the placeholder token pattern fails to compile; problems with the
/// tree itself are reported as failed checks.
pub fn validate_tree<P: AsRef<Path>>(
    root: P,
    expansion: &ExpansionReport,
) -> Result<ValidationReport> {
    let root = root.as_ref();
    debug!("Validating {}", root.display());

    let mut checks = Vec::new();
    for dir in REQUIRED_DIRS {
        checks.push(check_dir(root, dir));
    }
    checks.push(check_rules(root));
    for file in REQUIRED_FILES {
        checks.push(check_file(root, file));
    }
    checks.push(check_settings(root));
    checks.push(check_placeholders(root, expansion)?);

    Ok(ValidationReport { checks })
}

fn check_dir(root: &Path, dir: &str) -> Check {
    let name = format!("{}/ is non-empty", dir);
    match fs::read_dir(root.join(dir)) {
        Ok(mut entries) => {
            if entries.next().is_some() {
                Check::pass(name)
            } else {
                Check::fail(name, "directory empty")
            }
        }
        Err(_) => Check::fail(name, "directory missing"),
    }
}

fn check_rules(root: &Path) -> Check {
    let name = format!("{}/*.{} present", RULES_DIR, RULE_EXTENSION);
    let Ok(entries) = fs::read_dir(root.join(RULES_DIR)) else {
        return Check::fail(name, "directory missing");
    };
    let has_rule = entries.filter_map(|entry| entry.ok()).any(|entry| {
        entry.path().is_file() && entry.path().extension().is_some_and(|e| e == RULE_EXTENSION)
    });
    if has_rule {
        Check::pass(name)
    } else {
        Check::fail(name, "no rule files")
    }
}

fn check_file(root: &Path, file: &str) -> Check {
    let name = format!("{} exists", file);
    if root.join(file).is_file() {
        Check::pass(name)
    } else {
        Check::fail(name, "file missing")
    }
}

fn check_settings(root: &Path) -> Check {
    let name = format!("{} is valid JSON", SETTINGS_FILE);
    match fs::read_to_string(root.join(SETTINGS_FILE)) {
        Ok(content) => match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(_) => Check::pass(name),
            Err(e) => Check::fail(name, e.to_string()),
        },
        Err(e) => Check::fail(name, e.to_string()),
    }
}

fn check_placeholders(root: &Path, expansion: &ExpansionReport) -> Result<Check> {
    let name = "no unresolved placeholders";
    let token = token_regex()?;
    let mut found = Vec::new();

    for target in expansion.written.iter().chain(expansion.copied.iter()) {
        let relative = target.strip_prefix(root).unwrap_or(target);
        if let Some(m) = relative.to_str().and_then(|p| token.find(p)) {
            found.push(format!("{} (path): {}", relative.display(), m.as_str()));
        }
        let Ok(content) = fs::read_to_string(target) else { continue };
        for (number, line) in content.lines().enumerate() {
            for m in token.find_iter(line) {
                found.push(format!("{}:{}: {}", relative.display(), number + 1, m.as_str()));
            }
        }
    }

    if found.is_empty() {
        Ok(Check::pass(name))
    } else {
        Ok(Check::fail(name, found.join(", ")))
    }
}
