//! Parsing of the `--scenarios` argument.
use std::collections::BTreeSet;

const ALL_SCENARIOS: &str = "all";

/// The scenarios one run of the checker covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioSelection {
    All,
    /// Slugs in the order given, without repeats.
    Slugs(Vec<String>),
}

impl ScenarioSelection {
    /// Comma separated slugs. Blank items are skipped; an empty list or one
    /// naming `all` selects every scenario.
    pub fn parse(arg: &str) -> Self {
        let mut seen = BTreeSet::new();
        let mut slugs = Vec::new();
        for slug in arg.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if slug.eq_ignore_ascii_case(ALL_SCENARIOS) {
                return Self::All;
            }
            if seen.insert(slug) {
                slugs.push(slug.to_string());
            }
        }
        if slugs.is_empty() {
            Self::All
        } else {
            Self::Slugs(slugs)
        }
    }
}
