use crate::entry::normalize_separators;

/// One line of the tracked-rules section.
///
/// Only a restricted subset of ignore-file grammar is understood:
/// - `!` prefix re-includes instead of excluding
/// - trailing `/` restricts the rule to directories
/// - a leading `*` turns the rest of the pattern into a case-insensitive
///   suffix match
/// - anything else must equal the root-relative path exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRule {
    raw: String,
    pattern: String,
    negated: bool,
    dir_only: bool,
    /// Lowercased suffix for `*`-prefixed patterns
    suffix: Option<String>,
}

impl ExclusionRule {
    /// Parse one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with('#') {
            return None;
        }

        let (negated, rest) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let normalized = normalize_separators(rest);
        let (dir_only, pattern) = match normalized.strip_suffix('/') {
            Some(p) => (true, p.to_owned()),
            None => (false, normalized),
        };

        let suffix = pattern.strip_prefix('*').map(str::to_lowercase);

        Some(ExclusionRule {
            raw: raw.to_owned(),
            pattern,
            negated,
            dir_only,
            suffix,
        })
    }

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    #[inline]
    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    #[inline]
    pub fn is_suffix(&self) -> bool {
        self.suffix.is_some()
    }

    /// Whether this rule applies to `path`, ignoring its polarity.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }

        let path = normalize_separators(path);
        match &self.suffix {
            Some(suffix) => path.to_lowercase().ends_with(suffix.as_str()),
            None => path == self.pattern,
        }
    }
}

/// Ordered rules; the last matching rule decides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<ExclusionRule>,
}

impl RuleSet {
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        RuleSet {
            rules: lines.into_iter().filter_map(ExclusionRule::parse).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExclusionRule> {
        self.rules.iter()
    }

    #[inline]
    #[must_use]
    pub fn is_excluded(&self, path: &str, is_dir: bool) -> bool {
        is_excluded(&self.rules, path, is_dir)
    }
}

/// Evaluate `rules` in order against `path`.
///
/// A match sets the verdict to excluded, or back to included for negated
/// rules, so a later rule always overrides an earlier one.
#[must_use]
pub fn is_excluded(rules: &[ExclusionRule], path: &str, is_dir: bool) -> bool {
    let mut excluded = false;

    for rule in rules {
        if rule.matches(path, is_dir) {
            excluded = !rule.negated;
        }
    }

    excluded
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
