//! Search-path filtering.

/// A `PATH`-like value split into the entries kept and the entries dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRewrite {
    pub kept: Vec<String>,
    pub removed: Vec<String>,
}

impl PathRewrite {
    /// Rejoin the kept entries in their original order.
    pub fn joined(&self, separator: char) -> String {
        self.kept.join(separator.to_string().as_str())
    }

    /// True when at least one entry was dropped.
    pub fn changed(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// Split `value` on `separator` and drop every entry that contains one of
/// `tokens`, compared case-insensitively.
///
/// Order of kept entries is preserved. Empty entries are kept as they were
/// so a rewrite never changes a value beyond removing matches.
pub fn filter_path_entries(value: &str, separator: char, tokens: &[String]) -> PathRewrite {
    let tokens: Vec<String> = tokens
        .iter()
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect();

    let mut rewrite = PathRewrite::default();
    if value.is_empty() {
        return rewrite;
    }
    for entry in value.split(separator) {
        let lowered = entry.to_lowercase();
        if tokens.iter().any(|token| lowered.contains(token.as_str())) {
            rewrite.removed.push(entry.to_string());
        } else {
            rewrite.kept.push(entry.to_string());
        }
    }
    rewrite
}
