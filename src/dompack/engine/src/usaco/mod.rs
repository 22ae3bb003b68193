//! USACO problem pages to judge package directories
mod data;
mod output;

use crate::{
    archive::Archive,
    color::Color,
    config::UsacoConfig,
    fetch::Fetch,
    render::Render,
    statement::{letter_id, ContestIndex, Problem},
};
use anyhow::Context as _;
use dompack_api::{
    scrape_problems::{Request, Update},
    EventTx, SimpleFinish,
};
use futures_util::stream::StreamExt as _;
use std::sync::Arc;

/// Letters `a..=z` are available for problem ids
pub const MAX_PROBLEMS: usize = 26;

pub struct ProblemReport {
    pub problem_id: u32,
    pub letter_id: String,
    pub result: anyhow::Result<()>,
}

/// Runs scraping pipeline against pluggable collaborators
pub struct Scraper {
    config: UsacoConfig,
    fetch: Arc<dyn Fetch>,
    archive: Arc<dyn Archive>,
    render: Arc<dyn Render>,
    tx: EventTx<Update>,
}

impl Scraper {
    pub fn new(
        config: UsacoConfig,
        fetch: Arc<dyn Fetch>,
        archive: Arc<dyn Archive>,
        render: Arc<dyn Render>,
        tx: EventTx<Update>,
    ) -> Scraper {
        Scraper {
            config,
            fetch,
            archive,
            render,
            tx,
        }
    }

    fn workers(&self) -> usize {
        self.config.workers.max(1)
    }

    #[tracing::instrument(skip(self))]
    async fn scan_contest(&self, contest: &str) -> anyhow::Result<ContestIndex> {
        let url = self.config.contest_url(contest);
        let listing = self.fetch.fetch_text(&url).await?;
        let index = ContestIndex::scan(&listing);
        tracing::info!(problems = index.len(), "contest scanned");
        self.tx.send_event(Update::ContestScanned {
            contest: contest.to_string(),
            problem_count: index.len(),
        });
        for desc in index.iter() {
            self.tx.send_event(Update::ProblemDiscovered {
                problem_id: desc.problem_id,
                title: desc.title.clone(),
                secondary_id: desc.secondary_id.clone(),
            });
        }
        Ok(index)
    }

    /// Scans listings concurrently and merges them in the order of `contests`,
    /// so a problem listed twice keeps the descriptor from the later contest.
    pub async fn scan_contests(&self, contests: &[String]) -> anyhow::Result<ContestIndex> {
        let scanned: Vec<anyhow::Result<ContestIndex>> = futures_util::stream::iter(contests)
            .map(|cid| async move {
                self.scan_contest(cid)
                    .await
                    .with_context(|| format!("failed to scan contest {}", cid))
            })
            .buffered(self.workers())
            .collect()
            .await;
        let mut index = ContestIndex::new();
        for part in scanned {
            index.merge(part?);
        }
        Ok(index)
    }

    #[tracing::instrument(skip(self, contests))]
    async fn add_problem(
        &self,
        contests: &ContestIndex,
        sequence_index: usize,
        problem_id: u32,
        download: bool,
    ) -> anyhow::Result<()> {
        let desc = contests
            .get(problem_id)
            .with_context(|| format!("problem {} is not listed in scanned contests", problem_id))?;
        let problem_root = self.config.problems_dir.join(letter_id(sequence_index));

        let fetch_page = async {
            let url = self.config.problem_url(problem_id);
            self.fetch
                .fetch_text(&url)
                .await
                .with_context(|| format!("failed to fetch problem page {}", url))
        };
        let (data, page) = futures_util::future::join(
            self.extract_data(&problem_root, &desc.secondary_id, download),
            fetch_page,
        )
        .await;
        let html = page?;

        let problem = Problem::from_html(sequence_index, &html, Color::random()?);
        let (dumped, rendered) = futures_util::future::join(
            self.dump_html(&problem_root, &html),
            self.render_templates(&problem_root, &problem),
        )
        .await;
        dumped?;
        rendered?;
        data
    }

    /// Processes problems `workers` at a time.
    ///
    /// Problem at position `i` of `problem_ids` gets letter `i`. Reports are
    /// returned in the same order.
    pub async fn add_problems(
        &self,
        contests: &ContestIndex,
        problem_ids: &[u32],
        download: bool,
    ) -> anyhow::Result<Vec<ProblemReport>> {
        if problem_ids.len() > MAX_PROBLEMS {
            anyhow::bail!(
                "{} problems requested, at most {} are supported",
                problem_ids.len(),
                MAX_PROBLEMS
            );
        }
        let mut reports: Vec<(usize, ProblemReport)> =
            futures_util::stream::iter(problem_ids.iter().copied().enumerate())
                .map(|(seq, pid)| async move {
                    let result = self.add_problem(contests, seq, pid, download).await;
                    let report = ProblemReport {
                        problem_id: pid,
                        letter_id: letter_id(seq),
                        result,
                    };
                    self.report(&report);
                    (seq, report)
                })
                .buffer_unordered(self.workers())
                .collect()
                .await;
        reports.sort_by_key(|(seq, _)| *seq);
        Ok(reports.into_iter().map(|(_, r)| r).collect())
    }

    fn report(&self, report: &ProblemReport) {
        match &report.result {
            Ok(()) => tracing::info!(problem = report.problem_id, "problem done"),
            Err(err) => tracing::error!(problem = report.problem_id, "problem failed: {:#}", err),
        }
        let outcome = SimpleFinish::from(&report.result);
        self.tx.send_event(Update::ProblemDone {
            problem_id: report.problem_id,
            letter_id: report.letter_id.clone(),
            outcome,
        });
    }

    /// Scans contests, optionally prefetches archives, then builds problems
    pub async fn run(&self, req: &Request) -> anyhow::Result<Vec<ProblemReport>> {
        let contests = self.scan_contests(&req.contests).await?;
        if req.prefetch {
            let ids: Vec<String> = contests.iter().map(|d| d.secondary_id.clone()).collect();
            self.prefetch(&ids).await;
        }
        self.add_problems(&contests, &req.problems, req.download)
            .await
    }
}
