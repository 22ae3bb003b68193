use crate::printer;
use dompack_api::{
    convert_problem::{ContestRequest, PropertyName, Request, Update},
    EventTx,
};
use dompack_engine::{color::Color, config::PolygonConfig, polygon};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub(crate) struct ProblemArgs {
    /// Polygon package directory (contains problem.xml)
    #[arg(long, short = 'I')]
    src: PathBuf,
    /// Output directory
    #[arg(long, short = 'O')]
    dst: PathBuf,
    /// Language of statement and problem name
    #[arg(long, default_value = "english")]
    language: String,
    /// Problem id; package short name by default
    #[arg(long)]
    probid: Option<String>,
    /// Display color `#RRGGBB`; random by default
    #[arg(long)]
    color: Option<String>,
    /// Allow writing into non-empty output directory
    #[arg(long, short = 'F')]
    force: bool,
}

#[derive(clap::Args, Debug)]
pub(crate) struct ContestArgs {
    /// Polygon contest directory (contains contest.xml)
    #[arg(long, short = 'I')]
    src: PathBuf,
    /// Output directory
    #[arg(long, short = 'O')]
    dst: PathBuf,
    /// Language of statements, problem and contest names
    #[arg(long, default_value = "english")]
    language: String,
    /// Allow writing into non-empty output directory
    #[arg(long, short = 'F')]
    force: bool,
}

fn describe(update: &Update) -> String {
    match update {
        Update::Property {
            property_name,
            property_value,
        } => match property_name {
            PropertyName::TimeLimit => format!("Time limit: {} ms", property_value),
            PropertyName::MemoryLimit => match property_value.parse::<u64>() {
                Ok(ml) => format!("Memory limit: {} bytes ({} MiBs)", ml, ml >> 20),
                Err(_) => format!("Memory limit: {}", property_value),
            },
            PropertyName::ProblemTitle => format!("Problem title: {}", property_value),
            PropertyName::ProblemId => format!("Problem id: {}", property_value),
            PropertyName::ContestTitle => format!("Contest title: {}", property_value),
        },
        Update::Warning(warning) => format!("[WARN] {}", warning),
        Update::StepDone { step, outcome } => match &outcome.0 {
            Ok(()) => format!("{} {}", printer::status(true), step.description()),
            Err(err) => format!("{} {}: {}", printer::status(false), step.description(), err),
        },
        Update::TestsCopied { sample, secret } => {
            format!("{} sample and {} secret tests copied", sample, secret)
        }
        Update::SolutionCopied { file_name, verdict } => {
            format!("Solution '{}' -> {}", file_name, verdict)
        }
        Update::CheckerScript { interactive: true } => {
            "Generated build script for checker and interactor".to_string()
        }
        Update::CheckerScript { interactive: false } => {
            "Generated build script for checker".to_string()
        }
        Update::ContestProblem { index, name } => format!("== {} ({}) ==", index, name),
    }
}

/// Runs blocking conversion `f` while its updates are printed
async fn with_printer<T, F>(json: bool, f: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&EventTx<Update>) -> T + Send + 'static,
{
    let (tx, rx) = EventTx::channel();
    let printer = printer::spawn(rx, json, describe);
    let res = tokio::task::spawn_blocking(move || f(&tx)).await;
    printer.await?;
    Ok(res?)
}

pub(crate) async fn exec_problem(
    args: ProblemArgs,
    config: PolygonConfig,
    json: bool,
) -> anyhow::Result<bool> {
    dompack_engine::prepare_out_dir(&args.dst, args.force)?;
    let color = match args.color {
        Some(c) => c,
        None => Color::random()?.to_css(),
    };
    let req = Request {
        src_path: args.src,
        out_path: args.dst,
        language: args.language,
        probid: args.probid,
        color,
    };
    let report =
        with_printer(json, move |tx| polygon::convert_problem(&req, &config, tx)).await?;
    Ok(polygon::is_success(&report))
}

pub(crate) async fn exec_contest(
    args: ContestArgs,
    config: PolygonConfig,
    json: bool,
) -> anyhow::Result<bool> {
    dompack_engine::prepare_out_dir(&args.dst, args.force)?;
    let req = ContestRequest {
        src_path: args.src,
        out_path: args.dst,
        language: args.language,
    };
    let reports =
        with_printer(json, move |tx| polygon::convert_contest(&req, &config, tx)).await??;
    let mut ok = true;
    for (problem, report) in &reports {
        let success = polygon::is_success(report);
        if !success {
            tracing::error!(problem = %problem.index, "problem conversion failed");
        }
        ok &= success;
    }
    Ok(ok)
}
