mod config;
mod entry;
mod rules;
mod source;
mod walker;

pub use entry::{FileEntry, normalize_separators};
pub use rules::{ExclusionRule, RuleSet, is_excluded};
pub use source::{InitOutcome, ensure_rules_section, load_rules, parse_rules_section};
pub use walker::{ScanContext, collect_entries, walk_parallel};
