//! Test data: `data/{sample,secret}/<n>.{in,ans}`
use super::{
    package_index::{check_nodes, find_tags, parse_text, text, PackageIndex, Tag},
    pattern::format_pattern,
    PackageError,
};
use crate::fs_util;
use dompack_api::{convert_problem::Update, EventTx};
use std::path::{Path, PathBuf};

const TESTSET_KEYS: &[&str] = &[
    "time-limit",
    "memory-limit",
    "input-path-pattern",
    "answer-path-pattern",
    "test-count",
    "tests",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Unique across sample and secret tests, starting from 1
    pub ordinal: usize,
    /// Relative to package root
    pub input_path: String,
    /// Relative to package root
    pub answer_path: String,
    pub is_sample: bool,
}

impl TestCase {
    fn partition(&self) -> &'static str {
        if self.is_sample {
            "sample"
        } else {
            "secret"
        }
    }

    pub fn dest_input(&self, dest_root: &Path) -> PathBuf {
        dest_root
            .join("data")
            .join(self.partition())
            .join(format!("{}.in", self.ordinal))
    }

    pub fn dest_answer(&self, dest_root: &Path) -> PathBuf {
        dest_root
            .join("data")
            .join(self.partition())
            .join(format!("{}.ans", self.ordinal))
    }
}

/// Reads tests of all testsets in document order
pub fn read_testset(index: &PackageIndex) -> Result<Vec<TestCase>, PackageError> {
    let mut out = Vec::new();
    let mut ordinal = 0;
    for group in index.node(Tag::Judging).children().filter(|n| n.is_element()) {
        let nodes = find_tags(group, TESTSET_KEYS)?;
        check_nodes(&nodes, TESTSET_KEYS)?;
        let node = |k: &str| nodes[k].expect("checked above");
        let input_pattern = text(node("input-path-pattern"))?;
        let answer_pattern = text(node("answer-path-pattern"))?;
        let declared: usize = parse_text(node("test-count"))?;
        let tests: Vec<_> = node("tests")
            .children()
            .filter(|n| n.is_element())
            .collect();
        if tests.len() != declared {
            return Err(PackageError::CountMismatch {
                declared,
                actual: tests.len(),
            });
        }
        for (i, test) in tests.into_iter().enumerate() {
            ordinal += 1;
            let is_sample = test
                .attribute("sample")
                .map_or(false, |v| v.eq_ignore_ascii_case("true"));
            out.push(TestCase {
                ordinal,
                input_path: format_pattern(input_pattern, i + 1)?,
                answer_path: format_pattern(answer_pattern, i + 1)?,
                is_sample,
            });
        }
    }
    Ok(out)
}

#[tracing::instrument(skip_all)]
pub fn copy_data(
    src_root: &Path,
    dest_root: &Path,
    index: &PackageIndex,
    tx: &EventTx<Update>,
) -> anyhow::Result<()> {
    let tests = read_testset(index)?;
    for test in &tests {
        fs_util::copy(&src_root.join(&test.input_path), &test.dest_input(dest_root))?;
        fs_util::copy(&src_root.join(&test.answer_path), &test.dest_answer(dest_root))?;
    }
    let sample = tests.iter().filter(|t| t.is_sample).count();
    tracing::debug!(sample, total = tests.len(), "tests copied");
    tx.send_event(Update::TestsCopied {
        sample,
        secret: tests.len() - sample,
    });
    Ok(())
}
