//! Common constants used throughout setupgen.

/// Profile configuration files are named `setup-config.<profile>.yaml`
pub const CONFIG_PREFIX: &str = "setup-config.";
pub const CONFIG_SUFFIX: &str = ".yaml";

/// Template directory looked up beside the configuration document
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Ignore file read from the template root
pub const IGNORE_FILE: &str = ".setupignore";

/// Patterns that are always excluded from the template tree
pub const DEFAULT_IGNORE_PATTERNS: [&str; 3] = ["**/.DS_Store", "**/.git/**", ".git/**"];

/// Top-level configuration key holding explicitly declared placeholders
pub const PLACEHOLDERS_KEY: &str = "placeholders";

/// Directories every generated tree must contain, each non-empty
pub const REQUIRED_DIRS: [&str; 3] = [RULES_DIR, "skills", "agents"];

/// Rule documents live directly under this directory
pub const RULES_DIR: &str = "rules";
pub const RULE_EXTENSION: &str = "md";

/// Files every generated tree must contain
pub const REQUIRED_FILES: [&str; 2] = [SETTINGS_FILE, README_FILE];

pub const SETTINGS_FILE: &str = "settings.json";
pub const README_FILE: &str = "README.md";
