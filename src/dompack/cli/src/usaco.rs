use crate::printer;
use dompack_api::{
    scrape_problems::{Request, Update},
    EventTx,
};
use dompack_engine::{
    archive::ZipArchiveTool, config::UsacoConfig, fetch::HttpFetcher, render::PlaceholderRender,
    usaco::Scraper,
};
use std::sync::Arc;

#[derive(clap::Args, Debug)]
pub(crate) struct UsacoArgs {
    /// Contest listing page, e.g. `dec19results`
    #[arg(long = "contest", required = true)]
    contests: Vec<String>,
    /// Problem id (`cpid`); problems get letters in the given order
    #[arg(long = "problem", required = true)]
    problems: Vec<u32>,
    /// Download test archives missing from cache
    #[arg(long)]
    download: bool,
    /// Download archives of all problems of listed contests first
    #[arg(long)]
    prefetch: bool,
}

fn describe(update: &Update) -> String {
    match update {
        Update::ContestScanned {
            contest,
            problem_count,
        } => format!("{}: {} problems", contest, problem_count),
        Update::ProblemDiscovered {
            problem_id,
            title,
            secondary_id,
        } => format!("  {} {} ({})", problem_id, title, secondary_id),
        Update::ArchiveCached { path } => format!("{} exists and is valid", path),
        Update::ArchiveInvalid { path } => format!("{} is invalid", path),
        Update::Downloading { url } => format!("Downloading {}", url),
        Update::Downloaded { url } => format!("Downloaded {}", url),
        Update::Warning(warning) => format!("[WARN] {}", warning),
        Update::ProblemDone {
            problem_id,
            letter_id,
            outcome,
        } => match &outcome.0 {
            Ok(()) => format!("{} {} ({})", printer::status(true), letter_id, problem_id),
            Err(err) => format!(
                "{} {} ({}): {}",
                printer::status(false),
                letter_id,
                problem_id,
                err
            ),
        },
    }
}

pub(crate) async fn exec(args: UsacoArgs, config: UsacoConfig, json: bool) -> anyhow::Result<bool> {
    let req = Request {
        contests: args.contests,
        problems: args.problems,
        download: args.download,
        prefetch: args.prefetch,
    };
    let (tx, rx) = EventTx::channel();
    let printer = printer::spawn(rx, json, describe);
    let scraper = Scraper::new(
        config,
        Arc::new(HttpFetcher::new()?),
        Arc::new(ZipArchiveTool),
        Arc::new(PlaceholderRender),
        tx,
    );
    let res = scraper.run(&req).await;
    drop(scraper);
    printer.await?;
    Ok(res?.iter().all(|r| r.result.is_ok()))
}
