use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File as ConfigFile};
use serde::Deserialize;

use crate::error::Error;

/// Directory names never descended into. Entries with `*`, `?` or `[` are
/// matched as glob patterns against the directory name.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "venv", ".venv", "env", ".env", "lib", "lib64", "site-packages", "dist-packages", "eggs",
    "pip-wheel-metadata", "__pycache__", "build", "dist", "docs", "doc", "etc", "static",
    "templates", "media", "node_modules", ".git", ".svn", ".hg", ".CVS", ".idea", ".vscode",
    "spyder-py3", ".pylint.d", ".mypy_cache", ".pytest_cache", "__pypackages__", "wheelhouse",
    "htmlcov", ".coverage", "coverage.xml", "*.egg-info", "MANIFEST", "sphinx-build", "_build",
    "_static", "_templates", "data", "resources", "assets", "out", "output", "target", "log",
    "logs", "tmp", "temp", "cache", "caches", ".gradle", ".mvn", ".docker", ".vagrant",
    ".terraform", "ansible", ".terraform.lock.hcl", ".DS_Store", ".Trashes", "$RECYCLE.BIN",
    "System Volume Information", "._*", "._.Trashes", "._.DS_Store", ".localized",
    ".AppleDouble",
];

/// Directory names that are always traversed, even when listed in the ignore set.
pub const DEFAULT_KEEP_DIRS: &[&str] = &[
    "test", "tests", "testing", "integration-tests", "unit-tests", "functional-tests",
    "benchmark", "benchmarks", "example", "examples", "sample", "samples", "notebooks",
];

pub const DEFAULT_EXTENSION: &str = ".py";
pub const DEFAULT_OUTPUT_DIR: &str = "output_heatscan";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub root_paths: Vec<String>,
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,
    #[serde(default = "default_keep_dirs")]
    pub keep_dirs: Vec<String>,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_count_lines")]
    pub count_lines: bool,
    /// First year shown in hourly reports. `None` starts at the earliest year found.
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_ignore_dirs() -> Vec<String> {
    DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect()
}

fn default_keep_dirs() -> Vec<String> {
    DEFAULT_KEEP_DIRS.iter().map(|s| s.to_string()).collect()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_count_lines() -> bool {
    true
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_paths: Vec::new(),
            ignore_dirs: default_ignore_dirs(),
            keep_dirs: default_keep_dirs(),
            extension: default_extension(),
            count_lines: default_count_lines(),
            start_year: None,
            output_dir: default_output_dir(),
        }
    }
}

impl AppConfig {
    pub fn with_roots<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root_paths: roots.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Reads `Config.toml` (optional) and `HEATSCAN_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, Error> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("HEATSCAN")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("root_paths")
                .with_list_parse_key("ignore_dirs")
                .with_list_parse_key("keep_dirs"),
        );
    build_configuration(builder)
}

/// Builds and deserializes the layered sources; missing keys take defaults.
pub fn build_configuration(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, Error> {
    Ok(builder.build()?.try_deserialize::<AppConfig>()?)
}
