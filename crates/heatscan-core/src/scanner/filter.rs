use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use tracing::error;

const GLOB_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Directory names to prune during a walk, with the keep-list already
/// subtracted. Built once per run.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    names: HashSet<String>,
    patterns: Vec<Pattern>,
    keep: HashSet<String>,
}

impl IgnoreSet {
    pub fn new<I, K>(ignore: I, keep: K) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        let keep: HashSet<String> = keep
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .collect();

        let mut names = HashSet::new();
        let mut patterns = Vec::new();

        for entry in ignore {
            let lowered = entry.as_ref().to_lowercase();
            if keep.contains(&lowered) {
                continue;
            }
            if is_glob(&lowered) {
                match Pattern::new(&lowered) {
                    Ok(p) => patterns.push(p),
                    Err(e) => error!("Invalid ignore pattern '{}': {}", entry.as_ref(), e),
                }
            } else {
                names.insert(lowered);
            }
        }

        Self {
            names,
            patterns,
            keep,
        }
    }

    /// True when a directory with this name must not be descended into.
    /// Hidden directories are pruned unless the keep-list names them.
    pub fn is_ignored(&self, dir_name: &str) -> bool {
        let lowered = dir_name.to_lowercase();
        if self.keep.contains(&lowered) {
            return false;
        }
        if lowered.starts_with('.') {
            return true;
        }
        self.names.contains(&lowered)
            || self
                .patterns
                .iter()
                .any(|p| p.matches_with(&lowered, GLOB_MATCH_OPTIONS))
    }

    pub fn len(&self) -> usize {
        self.names.len() + self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}
