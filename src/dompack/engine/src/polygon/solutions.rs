//! Solutions sorted into `submissions/<verdict>/`
use super::{
    package_index::{attribute, PackageIndex, Tag},
    PackageError,
};
use crate::fs_util;
use anyhow::Context as _;
use dompack_api::{convert_problem::Update, EventTx};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Solution tag as declared by package author
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SolutionTag {
    Accepted,
    Main,
    WrongAnswer,
    PresentationError,
    Rejected,
    MemoryLimitExceeded,
    TimeLimitExceeded,
    TimeLimitExceededOrAccepted,
    TimeLimitExceededOrMemoryLimitExceeded,
}

/// Judge verdict bucket, name of directory under `submissions`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    RunTimeError,
    TimeLimitExceeded,
}

impl Verdict {
    pub fn dir_name(self) -> &'static str {
        match self {
            Verdict::Accepted => "accepted",
            Verdict::WrongAnswer => "wrong_answer",
            Verdict::RunTimeError => "run_time_error",
            Verdict::TimeLimitExceeded => "time_limit_exceeded",
        }
    }
}

impl SolutionTag {
    pub fn verdict(self) -> Verdict {
        match self {
            SolutionTag::Accepted | SolutionTag::Main => Verdict::Accepted,
            SolutionTag::WrongAnswer | SolutionTag::PresentationError | SolutionTag::Rejected => {
                Verdict::WrongAnswer
            }
            SolutionTag::MemoryLimitExceeded => Verdict::RunTimeError,
            SolutionTag::TimeLimitExceeded
            | SolutionTag::TimeLimitExceededOrAccepted
            | SolutionTag::TimeLimitExceededOrMemoryLimitExceeded => Verdict::TimeLimitExceeded,
        }
    }
}

impl FromStr for SolutionTag {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<SolutionTag, PackageError> {
        let tag = match s.to_ascii_lowercase().as_str() {
            "accepted" => SolutionTag::Accepted,
            "main" => SolutionTag::Main,
            "wrong_answer" => SolutionTag::WrongAnswer,
            "presentation_error" => SolutionTag::PresentationError,
            "rejected" => SolutionTag::Rejected,
            "memory_limit_exceeded" => SolutionTag::MemoryLimitExceeded,
            "time_limit_exceeded" => SolutionTag::TimeLimitExceeded,
            "time_limit_exceeded_or_accepted" => SolutionTag::TimeLimitExceededOrAccepted,
            "time_limit_exceeded_or_memory_limit_exceeded" => {
                SolutionTag::TimeLimitExceededOrMemoryLimitExceeded
            }
            _ => return Err(PackageError::UnknownVerdict(s.to_string())),
        };
        Ok(tag)
    }
}

/// Parses `Key: value` lines of `.desc` file
pub fn parse_desc(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionDescriptor {
    pub file_name: String,
    pub tag: SolutionTag,
}

impl SolutionDescriptor {
    pub fn read(path: &Path) -> anyhow::Result<SolutionDescriptor> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let desc = parse_desc(&content);
        let field = |key: &str| {
            desc.get(key)
                .with_context(|| format!("{} has no `{}` field", path.display(), key))
        };
        let file_name = field("File name")?.clone();
        let tag: SolutionTag = field("Tag")?.parse()?;
        Ok(SolutionDescriptor { file_name, tag })
    }
}

/// Maps full source path to its declared (lower-cased) type
pub fn registered_sources(
    src_root: &Path,
    index: &PackageIndex,
) -> Result<HashMap<PathBuf, String>, PackageError> {
    let mut out = HashMap::new();
    for node in index
        .node(Tag::Solutions)
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "source")
    {
        let path = src_root.join(attribute(node, "path")?);
        let ty = attribute(node, "type")?.to_ascii_lowercase();
        out.insert(path, ty);
    }
    Ok(out)
}

/// Target file name: Python variants get version-specific extension
pub fn target_file_name(file_name: &str, source_type: &str) -> String {
    match source_type {
        "python.3" => file_name.replace(".py3", ".py").replace(".py", ".py3"),
        "python.2" => file_name.replace(".py2", ".py").replace(".py", ".py2"),
        _ => file_name.to_string(),
    }
}

fn list_descriptors(solutions_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.desc",
        glob::Pattern::escape(&solutions_dir.display().to_string())
    );
    let mut out = Vec::new();
    for entry in glob::glob(&pattern).context("bad glob pattern")? {
        out.push(entry.context("failed to list solutions")?);
    }
    Ok(out)
}

#[tracing::instrument(skip_all)]
pub fn copy_solutions(
    src_root: &Path,
    dest_root: &Path,
    index: &PackageIndex,
    tx: &EventTx<Update>,
) -> anyhow::Result<()> {
    let solutions_dir = src_root.join("solutions");
    let registered = registered_sources(src_root, index)?;
    for desc_path in list_descriptors(&solutions_dir)? {
        let desc = SolutionDescriptor::read(&desc_path)?;
        let verdict = desc.tag.verdict();
        let src = solutions_dir.join(&desc.file_name);
        let source_type = match registered.get(&src) {
            Some(ty) => ty,
            None => {
                let message = format!(
                    "{} is in {} but not in problem.xml",
                    desc_path.display(),
                    solutions_dir.display()
                );
                tracing::warn!("{}", message);
                tx.send_event(Update::Warning(message));
                continue;
            }
        };
        let name = target_file_name(&desc.file_name, source_type);
        let dest = dest_root
            .join("submissions")
            .join(verdict.dir_name())
            .join(&name);
        fs_util::copy(&src, &dest)?;
        tx.send_event(Update::SolutionCopied {
            file_name: name,
            verdict: verdict.dir_name().to_string(),
        });
    }
    Ok(())
}
