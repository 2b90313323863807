//! Template expansion.
//! Walks a template tree, substitutes every `{NAME}` placeholder with its
//! resolved value and mirrors the result into an output directory.

use globset::GlobSet;
use indexmap::IndexMap;
use log::{debug, warn};
use regex::{Captures, Regex};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Placeholders;
use crate::error::{Error, Result};
use crate::substitution::Substitution;

/// Placeholder names; tokens are names wrapped in braces.
pub const NAME_PATTERN: &str = "[A-Z][A-Z0-9_]*";

/// Matches a `{NAME}` token, capturing the name.
pub fn token_regex() -> Result<Regex> {
    Regex::new(&format!(r"\{{({NAME_PATTERN})\}}"))
        .map_err(|e| Error::TemplateError(format!("invalid token pattern: {}", e)))
}

/// What the expander did with a single template entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    /// Content contained placeholders and was written after substitution
    Write { target: PathBuf, content: String },
    /// Content was copied byte for byte
    Copy { target: PathBuf },
    CreateDir { target: PathBuf },
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Write { target, .. } => write!(f, "Writing: '{}'", target.display()),
            FileOperation::Copy { target } => write!(f, "Copying: '{}'", target.display()),
            FileOperation::CreateDir { target } => {
                write!(f, "Creating: '{}'", target.display())
            }
        }
    }
}

/// A `{NAME}` token that had no value and was left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPlaceholder {
    /// Template path relative to the template root
    pub file: PathBuf,
    pub token: String,
}

/// Summary of one expansion run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpansionReport {
    pub written: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
    pub unresolved: Vec<UnresolvedPlaceholder>,
}

impl ExpansionReport {
    pub fn files(&self) -> usize {
        self.written.len() + self.copied.len()
    }
}

/// Substitutes resolved placeholders into template text.
pub struct Expander {
    substitutions: IndexMap<String, Substitution>,
    token: Regex,
}

impl Expander {
    /// Compiles one substitution per placeholder.
    ///
    /// # Errors
    /// * `Error::SubstitutionError` if a placeholder cannot be turned into an
    ///   expression; escaping makes this unreachable for any value
    pub fn new(placeholders: &Placeholders) -> Result<Self> {
        let token = token_regex()?;
        let name_only = Regex::new(&format!("^{NAME_PATTERN}$"))
            .map_err(|e| Error::TemplateError(format!("invalid token pattern: {}", e)))?;

        let mut substitutions = IndexMap::new();
        for (name, value) in placeholders {
            if !name_only.is_match(name) {
                warn!("Placeholder '{}' can never match a {{NAME}} token", name);
                continue;
            }
            substitutions.insert(name.clone(), Substitution::for_placeholder(name, value)?);
        }
        Ok(Self { substitutions, token })
    }

    /// Expands a single line, appending the names of unknown tokens to
    /// `unresolved`.
    ///
    /// The line is scanned once and every token is replaced by its own
    /// substitution, so a value that itself looks like a token is never
    /// expanded again.
    pub fn expand_line(&self, line: &str, unresolved: &mut Vec<String>) -> String {
        self.token
            .replace_all(line, |caps: &Captures| {
                let matched = &caps[0];
                match self.substitutions.get(&caps[1]) {
                    Some(substitution) => substitution.replacement_for(matched),
                    None => {
                        unresolved.push(matched.to_string());
                        matched.to_string()
                    }
                }
            })
            .into_owned()
    }

    /// Expands multi-line text line by line, preserving line endings.
    pub fn expand_text(&self, text: &str) -> (String, Vec<String>) {
        let mut unresolved = Vec::new();
        let mut out = String::with_capacity(text.len());
        for line in text.split_inclusive('\n') {
            out.push_str(&self.expand_line(line, &mut unresolved));
        }
        (out, unresolved)
    }

    /// Decides what to do with one template entry without touching the output.
    ///
    /// Returns `None` for entries whose expanded path is unusable.
    pub fn plan(
        &self,
        source: &Path,
        relative: &str,
        output_root: &Path,
        unresolved: &mut Vec<UnresolvedPlaceholder>,
    ) -> Result<Option<FileOperation>> {
        let mut path_tokens = Vec::new();
        let expanded_path = self.expand_line(relative, &mut path_tokens);
        record(relative, path_tokens, unresolved);

        if !is_expanded_path_valid(&expanded_path) {
            warn!("Skipping '{}': expanded path '{}' is invalid", relative, expanded_path);
            return Ok(None);
        }
        let target = output_root.join(&expanded_path);

        if source.is_dir() {
            return Ok(Some(FileOperation::CreateDir { target }));
        }

        let bytes = fs::read(source)?;
        let Ok(text) = String::from_utf8(bytes) else {
            debug!("Copying non-text file: {}", relative);
            return Ok(Some(FileOperation::Copy { target }));
        };

        let (content, tokens) = self.expand_text(&text);
        record(relative, tokens, unresolved);
        if content == text {
            Ok(Some(FileOperation::Copy { target }))
        } else {
            Ok(Some(FileOperation::Write { target, content }))
        }
    }

    /// Expands `template_root` into `output_root`.
    ///
    /// Output is additive: files already present in `output_root` that the
    /// template does not produce are left alone, files it does produce are
    /// overwritten. The template tree is never modified.
    ///
    /// # Errors
    /// * `Error::TemplateDirNotFound` if `template_root` is not a directory
    /// * `Error::IoError` if reading a template or writing output fails
    pub fn expand_tree(
        &self,
        template_root: &Path,
        output_root: &Path,
        ignored: &GlobSet,
    ) -> Result<ExpansionReport> {
        if !template_root.is_dir() {
            return Err(Error::TemplateDirNotFound {
                template_dir: template_root.display().to_string(),
            });
        }
        debug!("Expanding {} into {}", template_root.display(), output_root.display());
        fs::create_dir_all(output_root)?;

        let mut report = ExpansionReport::default();
        let mut walker = WalkDir::new(template_root).min_depth(1).sort_by_file_name().into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| Error::TemplateError(e.to_string()))?;
            let path = entry.path();
            let relative = path
                .strip_prefix(template_root)
                .map_err(|e| Error::TemplateError(e.to_string()))?
                .to_str()
                .ok_or_else(|| Error::TemplateError("Invalid path".to_string()))?
                .to_string();

            if ignored.is_match(&relative) {
                debug!("Skipping {} from ignore patterns", relative);
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }

            let Some(operation) = self.plan(path, &relative, output_root, &mut report.unresolved)?
            else {
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            };

            match &operation {
                FileOperation::CreateDir { target } => fs::create_dir_all(target)?,
                FileOperation::Copy { target } => {
                    copy_file(path, target)?;
                    report.copied.push(target.clone());
                }
                FileOperation::Write { target, content } => {
                    write_file(target, content)?;
                    report.written.push(target.clone());
                }
            }
            debug!("{}", operation);
        }

        Ok(report)
    }
}

fn record(file: &str, tokens: Vec<String>, unresolved: &mut Vec<UnresolvedPlaceholder>) {
    for token in tokens {
        unresolved.push(UnresolvedPlaceholder { file: PathBuf::from(file), token });
    }
}

/// An expanded relative path is usable when it is non-empty, has no empty
/// components and every component is a plain name, so the target always
/// stays inside the output root.
pub fn is_expanded_path_valid(path: &str) -> bool {
    if path.trim().is_empty() || path.contains("//") {
        return false;
    }
    Path::new(path).components().all(|c| matches!(c, Component::Normal(_)))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).map_err(Error::IoError)
}

fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, dest).map(|_| ()).map_err(Error::IoError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expander(pairs: &[(&str, &str)]) -> Expander {
        let placeholders: Placeholders =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Expander::new(&placeholders).unwrap()
    }

    #[test]
    fn test_multiple_placeholders_on_one_line() {
        let expander = expander(&[("A", "{B}"), ("B", "bee")]);
        let mut unresolved = Vec::new();
        let line = expander.expand_line("{A} and {B} and {A}", &mut unresolved);
        assert_eq!(line, "{B} and bee and {B}");
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_unknown_tokens_are_reported() {
        let expander = expander(&[("A", "a")]);
        let (text, unresolved) = expander.expand_text("{A}\n{MISSING}\n{lower}\n");
        assert_eq!(text, "a\n{MISSING}\n{lower}\n");
        assert_eq!(unresolved, vec!["{MISSING}".to_string()]);
    }

    #[test]
    fn test_line_endings_preserved() {
        let expander = expander(&[("A", "x")]);
        let (text, _) = expander.expand_text("{A}\r\n\n{A}");
        assert_eq!(text, "x\r\n\nx");
    }

    #[test]
    fn test_empty_value_expands_to_nothing() {
        let expander = expander(&[("EMPTY", "")]);
        let (text, unresolved) = expander.expand_text("[{EMPTY}]");
        assert_eq!(text, "[]");
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_is_expanded_path_valid() {
        assert!(!is_expanded_path_valid(""));
        assert!(!is_expanded_path_valid("skills//SKILL.md"));
        assert!(!is_expanded_path_valid("/SKILL.md"));
        assert!(!is_expanded_path_valid("skills/../../SKILL.md"));
        assert!(!is_expanded_path_valid("../SKILL.md"));
        assert!(!is_expanded_path_valid("./SKILL.md"));
        assert!(is_expanded_path_valid("skills/demo/SKILL.md"));
        assert!(is_expanded_path_valid("skills/demo..v2/SKILL.md"));
    }
}
