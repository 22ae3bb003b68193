mod polygon;
mod printer;
mod usaco;

use clap::Parser as _;
use dompack_engine::Config;
use std::path::PathBuf;

/// Builds DOMjudge problem packages from USACO pages and Polygon packages
#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Config file; `$DOMPACK_CONFIG` is used if omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print progress events as JSON lines
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Scrape problems from USACO contests
    Usaco(usaco::UsacoArgs),
    /// Convert single Polygon problem package
    Polygon(polygon::ProblemArgs),
    /// Convert every problem of Polygon contest package
    PolygonContest(polygon::ContestArgs),
}

#[tokio::main]
async fn main() {
    util::log::setup();
    let args = Args::parse();
    match process_args(args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            util::print_error(err.as_ref());
            std::process::exit(1);
        }
    }
}

/// Returns false if some problem or step failed
#[tracing::instrument(skip(args))]
async fn process_args(args: Args) -> anyhow::Result<bool> {
    tracing::debug!(args = ?args, "executing requested command");
    let config = Config::load(args.config.as_deref())?;
    match args.command {
        Command::Usaco(a) => usaco::exec(a, config.usaco, args.json).await,
        Command::Polygon(a) => polygon::exec_problem(a, config.polygon, args.json).await,
        Command::PolygonContest(a) => polygon::exec_contest(a, config.polygon, args.json).await,
    }
}
