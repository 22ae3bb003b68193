//! Convert Polygon problem package into DOMjudge problem package
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Polygon package root (directory containing problem.xml)
    pub src_path: PathBuf,
    /// Where to put generated judge package
    pub out_path: PathBuf,
    /// Statement and name language, e.g. `english`
    pub language: String,
    /// Overrides problem short name from package
    pub probid: Option<String>,
    /// Display color, `#RRGGBB`
    pub color: String,
}

/// One independent conversion step.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    ProblemInfo,
    Statement,
    Solutions,
    Data,
    CheckerAndInteractor,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::ProblemInfo,
        Step::Statement,
        Step::Solutions,
        Step::Data,
        Step::CheckerAndInteractor,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Step::ProblemInfo => "Make problem info",
            Step::Statement => "Copy statement",
            Step::Solutions => "Copy solutions",
            Step::Data => "Copy data",
            Step::CheckerAndInteractor => "Copy checker and interactor",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Update {
    /// Contains one property of discovered problem.
    /// Each `property_name` will be reported at most once.
    Property {
        property_name: PropertyName,
        property_value: String,
    },
    /// Contains one warning. May appear multiple times.
    Warning(String),
    /// Step finished, successfully or not.
    StepDone {
        step: Step,
        outcome: crate::SimpleFinish,
    },
    /// Finished copying tests.
    TestsCopied { sample: usize, secret: usize },
    /// Solution file was placed into verdict directory
    SolutionCopied { file_name: String, verdict: String },
    /// Build script for checker was generated
    CheckerScript { interactive: bool },
    /// Contest mode: started converting problem `index` from package `name`
    ContestProblem { index: String, name: String },
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub enum PropertyName {
    /// Value is time limit in milliseconds.
    TimeLimit,
    /// Value is memory limit in bytes.
    MemoryLimit,
    /// Value is problem title.
    ProblemTitle,
    /// Value is problem id in judge package.
    ProblemId,
    /// Value is contest title.
    ContestTitle,
}

/// Convert every problem of Polygon contest package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestRequest {
    /// Contest package root (directory containing contest.xml)
    pub src_path: PathBuf,
    /// Problems are placed into `<out_path>/problems/<index>`
    pub out_path: PathBuf,
    pub language: String,
}
