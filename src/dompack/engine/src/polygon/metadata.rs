//! `domjudge-problem.ini` and `problem.yaml`
use super::{
    package_index::{attribute, parse_text, PackageIndex, Tag},
    PackageError,
};
use crate::fs_util;
use dompack_api::{
    convert_problem::{PropertyName, Request, Update},
    EventTx,
};
use serde::Serialize;

/// Judge-side problem id: explicit override or package short name
pub fn problem_id(req: &Request, index: &PackageIndex) -> Result<String, PackageError> {
    match &req.probid {
        Some(id) => Ok(id.clone()),
        None => attribute(index.node(Tag::Problem), "short-name").map(str::to_string),
    }
}

/// Problem name in `language` (compared case-insensitively)
pub fn problem_name<'a>(index: &'a PackageIndex, language: &str) -> Result<&'a str, PackageError> {
    for name in index.node(Tag::Names).children().filter(|n| n.is_element()) {
        let lang = attribute(name, "language")?;
        if lang.eq_ignore_ascii_case(language) {
            return attribute(name, "value");
        }
    }
    Err(PackageError::MissingName(language.to_string()))
}

/// Milliseconds as seconds; whole seconds keep `.0`
pub fn format_time_limit(ms: u64) -> String {
    if ms % 1000 == 0 {
        format!("{}.0", ms / 1000)
    } else {
        format!("{}", ms as f64 / 1000.0)
    }
}

/// Bytes to MiB, rounded up
pub fn memory_limit_mib(bytes: u64) -> u64 {
    (bytes + (1 << 20) - 1) >> 20
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ProblemYaml {
    pub limits: Limits,
    pub validation: String,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Limits {
    /// MiB
    pub memory: u64,
}

pub struct ProblemInfo {
    pub probid: String,
    pub name: String,
    pub time_limit_ms: u64,
    pub memory_limit_bytes: u64,
    pub color: String,
    pub interactive: bool,
}

impl ProblemInfo {
    pub fn collect(req: &Request, index: &PackageIndex) -> Result<ProblemInfo, PackageError> {
        Ok(ProblemInfo {
            probid: problem_id(req, index)?,
            name: problem_name(index, &req.language)?.to_string(),
            time_limit_ms: parse_text(index.node(Tag::TimeLimit))?,
            memory_limit_bytes: parse_text(index.node(Tag::MemoryLimit))?,
            color: req.color.clone(),
            interactive: index.is_interactive(),
        })
    }

    pub fn domjudge_ini(&self) -> String {
        format!(
            "probid = {}\nname = {}\ntimelimit = {}\ncolor = {}\n",
            self.probid,
            self.name,
            format_time_limit(self.time_limit_ms),
            self.color
        )
    }

    pub fn problem_yaml(&self) -> ProblemYaml {
        let validation = if self.interactive {
            "custom interactive"
        } else {
            "custom"
        };
        ProblemYaml {
            limits: Limits {
                memory: memory_limit_mib(self.memory_limit_bytes),
            },
            validation: validation.to_string(),
        }
    }
}

#[tracing::instrument(skip_all)]
pub fn make_problem_info(
    req: &Request,
    index: &PackageIndex,
    tx: &EventTx<Update>,
) -> anyhow::Result<()> {
    let info = ProblemInfo::collect(req, index)?;
    let props = [
        (PropertyName::ProblemId, info.probid.clone()),
        (PropertyName::ProblemTitle, info.name.clone()),
        (PropertyName::TimeLimit, info.time_limit_ms.to_string()),
        (PropertyName::MemoryLimit, info.memory_limit_bytes.to_string()),
    ];
    for (property_name, property_value) in props {
        tx.send_event(Update::Property {
            property_name,
            property_value,
        });
    }
    fs_util::write(&req.out_path.join("domjudge-problem.ini"), info.domjudge_ini())?;
    let yaml = serde_yaml::to_string(&info.problem_yaml())?;
    fs_util::write(&req.out_path.join("problem.yaml"), yaml)?;
    Ok(())
}
