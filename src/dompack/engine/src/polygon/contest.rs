//! Polygon contest package: `contest.xml` plus `problems/<name>/`
use super::{
    convert_problem, fail_all,
    package_index::{attribute, Node},
    PackageError, StepReport,
};
use crate::{color::Color, config::PolygonConfig, fs_util};
use anyhow::Context as _;
use dompack_api::{
    convert_problem::{ContestRequest, PropertyName, Request, Update},
    EventTx,
};
use std::path::Path;

const BUNDLED_COMMON_TEX: &str = include_str!("common.tex");
const CONTEST_NAME_PLACEHOLDER: &str = "$contest_name$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestProblem {
    /// Letter shown in contest, becomes judge problem id
    pub index: String,
    /// Package directory name under `problems/`
    pub package_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestManifest {
    pub name: String,
    pub problems: Vec<ContestProblem>,
}

fn element_children<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Vec<Node<'a, 'input>> {
    node.children()
        .filter(|n| n.is_element() && n.tag_name().name() == tag)
        .collect()
}

impl ContestManifest {
    pub fn parse(text: &str, language: &str) -> Result<ContestManifest, PackageError> {
        let doc = roxmltree::Document::parse(text).map_err(|source| PackageError::XmlSyn {
            path: "contest.xml".to_string(),
            source,
        })?;
        let root = doc.root_element();

        let mut name = None;
        for names in element_children(root, "names") {
            for node in element_children(names, "name") {
                if attribute(node, "language")?.eq_ignore_ascii_case(language) {
                    name = Some(attribute(node, "value")?.to_string());
                    break;
                }
            }
        }
        let name = name.ok_or_else(|| PackageError::MissingName(language.to_string()))?;

        let mut problems = Vec::new();
        for list in element_children(root, "problems") {
            for node in element_children(list, "problem") {
                let url = attribute(node, "url")?;
                let package_name = url.rsplit('/').next().unwrap_or(url);
                if package_name.is_empty() {
                    return Err(PackageError::BadValue {
                        tag: "problem".to_string(),
                        value: url.to_string(),
                    });
                }
                problems.push(ContestProblem {
                    index: attribute(node, "index")?.to_string(),
                    package_name: package_name.to_string(),
                });
            }
        }
        Ok(ContestManifest { name, problems })
    }

    pub fn read(src_root: &Path, language: &str) -> anyhow::Result<ContestManifest> {
        let path = src_root.join("contest.xml");
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(ContestManifest::parse(&text, language)?)
    }
}

pub fn common_tex(template: &str, contest_name: &str) -> String {
    template.replace(CONTEST_NAME_PLACEHOLDER, contest_name)
}

fn write_common_tex(
    config: &PolygonConfig,
    dest_root: &Path,
    contest_name: &str,
) -> anyhow::Result<()> {
    let template = match &config.common_tex {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display()))?,
        None => BUNDLED_COMMON_TEX.to_string(),
    };
    fs_util::write(&dest_root.join("common.tex"), common_tex(&template, contest_name))
}

/// Converts every problem of contest.
///
/// Fails only if contest-wide files can not be produced; per-problem failures are
/// reported in returned step reports.
#[tracing::instrument(skip_all, fields(src = %req.src_path.display()))]
pub fn convert_contest(
    req: &ContestRequest,
    config: &PolygonConfig,
    tx: &EventTx<Update>,
) -> anyhow::Result<Vec<(ContestProblem, StepReport)>> {
    fs_util::check_dir(&req.src_path, true)?;
    let manifest = ContestManifest::read(&req.src_path, &req.language)?;
    tx.send_event(Update::Property {
        property_name: PropertyName::ContestTitle,
        property_value: manifest.name.clone(),
    });
    write_common_tex(config, &req.out_path, &manifest.name)?;

    let mut reports = Vec::new();
    for problem in manifest.problems {
        tx.send_event(Update::ContestProblem {
            index: problem.index.clone(),
            name: problem.package_name.clone(),
        });
        let report = convert_contest_problem(req, &problem, Color::random(), config, tx);
        reports.push((problem, report));
    }
    Ok(reports)
}

/// Converts one problem of contest; failed color generation fails every step of it
fn convert_contest_problem(
    req: &ContestRequest,
    problem: &ContestProblem,
    color: anyhow::Result<Color>,
    config: &PolygonConfig,
    tx: &EventTx<Update>,
) -> StepReport {
    let color = match color {
        Ok(c) => c,
        Err(err) => return fail_all(err.context("generate problem color"), tx),
    };
    let problem_req = Request {
        src_path: req.src_path.join("problems").join(&problem.package_name),
        out_path: req.out_path.join("problems").join(&problem.index),
        language: req.language.clone(),
        probid: Some(problem.index.clone()),
        color: color.to_css(),
    };
    convert_problem(&problem_req, config, tx)
}
