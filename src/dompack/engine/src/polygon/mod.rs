//! Polygon package to DOMjudge package conversion
pub mod checker;
pub mod contest;
mod error;
pub mod metadata;
pub mod package_index;
pub mod pattern;
pub mod solutions;
pub mod statement;
pub mod testset;

pub use contest::convert_contest;
pub use error::PackageError;
pub use package_index::PackageIndex;

use crate::{config::PolygonConfig, fs_util};
use dompack_api::{
    convert_problem::{Request, Step, Update},
    EventTx, SimpleFinish,
};
use std::path::PathBuf;

/// Outcome of every step, in execution order
pub type StepReport = Vec<(Step, anyhow::Result<()>)>;

fn run_step(
    step: Step,
    req: &Request,
    config: &PolygonConfig,
    index: &PackageIndex,
    tx: &EventTx<Update>,
) -> anyhow::Result<()> {
    let src = &req.src_path;
    let dest = &req.out_path;
    match step {
        Step::ProblemInfo => metadata::make_problem_info(req, index, tx),
        Step::Statement => statement::copy_statement(req, &config.olymp_sty_link, index, tx),
        Step::Solutions => solutions::copy_solutions(src, dest, index, tx),
        Step::Data => testset::copy_data(src, dest, index, tx),
        Step::CheckerAndInteractor => {
            let testlib = config
                .testlib
                .clone()
                .unwrap_or_else(|| default_testlib(req));
            checker::copy_checker_and_interactor(src, dest, &testlib, index, tx)
        }
    }
}

fn default_testlib(req: &Request) -> PathBuf {
    req.src_path.join("files/testlib.h")
}

fn report(
    step: Step,
    res: anyhow::Result<()>,
    tx: &EventTx<Update>,
) -> (Step, anyhow::Result<()>) {
    match &res {
        Ok(()) => tracing::info!(step = step.description(), "step succeeded"),
        Err(err) => tracing::error!(step = step.description(), "step failed: {:#}", err),
    }
    let outcome = SimpleFinish::from(&res);
    tx.send_event(Update::StepDone { step, outcome });
    (step, res)
}

/// Runs every conversion step, continuing after failures.
///
/// `problem.xml` is parsed once; if it can not be parsed, each step fails with
/// the same error.
#[tracing::instrument(skip_all, fields(src = %req.src_path.display()))]
pub fn convert_problem(
    req: &Request,
    config: &PolygonConfig,
    tx: &EventTx<Update>,
) -> StepReport {
    let manifest = fs_util::check_dir(&req.src_path, true)
        .and_then(|_| Ok(PackageIndex::read_manifest(&req.src_path)?));
    let manifest = match manifest {
        Ok(m) => m,
        Err(err) => return fail_all(err, tx),
    };
    let index = match PackageIndex::parse(&manifest) {
        Ok(idx) => idx,
        Err(err) => return fail_all(err.into(), tx),
    };
    Step::ALL
        .iter()
        .map(|&step| report(step, run_step(step, req, config, &index, tx), tx))
        .collect()
}

pub(crate) fn fail_all(err: anyhow::Error, tx: &EventTx<Update>) -> StepReport {
    let message = format!("{:#}", err);
    Step::ALL
        .iter()
        .map(|&step| report(step, Err(anyhow::anyhow!("{}", message)), tx))
        .collect()
}

/// True if every step succeeded
pub fn is_success(report: &StepReport) -> bool {
    report.iter().all(|(_, res)| res.is_ok())
}
