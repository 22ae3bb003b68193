use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

static PROBLEM_DESC: Lazy<Regex> = Lazy::new(|| {
    let pattern = concat!(
        r"<div[^>]*>\s*<b>\s*([^<]*?)\s*</b>\s*<br\s*/>",
        r"[^<]*",
        r"<a[^>]*cpid=(\d+)[^>]*>\s*View\s*problem\s*</a>",
        r"[^<]*",
        r"<a[^>]*current/data/(\w+)\.zip[^>]*>\s*Test\s*data\s*</a>",
        r".*?",
        r"</div>",
    );
    RegexBuilder::new(pattern)
        .multi_line(true)
        .dot_matches_new_line(true)
        .build()
        .unwrap()
});

/// One problem on contest listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestDescriptor {
    pub title: String,
    pub problem_id: u32,
    /// Name of test data archive, without extension
    pub secondary_id: String,
}

/// Problems of one or several contests, keyed by problem id
#[derive(Debug, Clone, Default)]
pub struct ContestIndex {
    problems: BTreeMap<u32, ContestDescriptor>,
}

impl ContestIndex {
    pub fn new() -> ContestIndex {
        ContestIndex::default()
    }

    /// Scans listing page. If some problem id occurs more than once,
    /// the last occurrence wins.
    pub fn scan(listing: &str) -> ContestIndex {
        let mut index = ContestIndex::new();
        for caps in PROBLEM_DESC.captures_iter(listing) {
            let problem_id = match caps[2].parse::<u32>() {
                Ok(id) => id,
                Err(err) => {
                    tracing::warn!(id = &caps[2], error = %err, "problem id out of range");
                    continue;
                }
            };
            let desc = ContestDescriptor {
                title: caps[1].to_string(),
                problem_id,
                secondary_id: caps[3].to_string(),
            };
            tracing::debug!(?desc, "problem found");
            index.insert(desc);
        }
        index
    }

    pub fn insert(&mut self, desc: ContestDescriptor) {
        self.problems.insert(desc.problem_id, desc);
    }

    /// Merges `other` into `self`, entries of `other` overwrite existing ones
    pub fn merge(&mut self, other: ContestIndex) {
        self.problems.extend(other.problems);
    }

    pub fn get(&self, problem_id: u32) -> Option<&ContestDescriptor> {
        self.problems.get(&problem_id)
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContestDescriptor> {
        self.problems.values()
    }
}
