use dompack_api::{
    scrape_problems::{Request, Update},
    EventTx,
};
use dompack_engine::{
    archive::{Archive, ZipArchiveTool},
    config::UsacoConfig,
    fetch::{Fetch, FetchError},
    render::PlaceholderRender,
    usaco::Scraper,
};
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tokio::sync::mpsc::UnboundedReceiver;

const SITE: &str = "http://usaco.test/index.php";
const DATA: &str = "http://usaco.test/current/data";

/// Serves fixed responses and counts requests
#[derive(Default)]
struct MockFetch {
    pages: HashMap<String, Vec<u8>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl MockFetch {
    fn serve(&mut self, url: &str, body: impl Into<Vec<u8>>) {
        self.pages.insert(url.to_string(), body.into());
    }

    fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl Fetch for MockFetch {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut w = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in files {
        w.start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        w.write_all(content.as_bytes()).unwrap();
    }
    w.finish().unwrap().into_inner()
}

fn listing(entries: &[(&str, u32, &str)]) -> String {
    let mut out = String::from("<html><body>");
    for (title, cpid, sid) in entries {
        out.push_str(&format!(
            "<div class='panel historypanel'>\n<b>{}</b><br />\n\
             <a href='index.php?page=viewproblem2&cpid={}'>View problem</a> | \
             <a href='current/data/{}.zip'>Test data</a>\n</div>\n",
            title, cpid, sid
        ));
    }
    out.push_str("</body></html>");
    out
}

fn page(num: u32, title: &str) -> String {
    format!(
        "<h2>Problem {}. {}</h2>\
         <span id=\"probtext-text\"><p>Farmer John has N cows.</p>\
         <div class='prob-in-spec'><h4>INPUT FORMAT (file cows.in):</h4>One integer N.\
         <div class='prob-out-spec'><h4>OUTPUT FORMAT (file cows.out):</h4>One integer.\
         <h4>SAMPLE INPUT:</h4><pre class='in'>3\n</pre>\
         <h4>SAMPLE OUTPUT:</h4><pre class='out'>6\n</pre>\
         Problem credits: Brian Dean</span>",
        num, title
    )
}

struct Env {
    _dir: tempfile::TempDir,
    config: UsacoConfig,
}

fn env() -> Env {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let template_dir = root.join("template");
    std::fs::create_dir_all(template_dir.join("statement")).unwrap();
    std::fs::write(
        template_dir.join("statement/problem.tex"),
        "\\begin{problem}{{{title}}}{{ problem_id }}\n{{statement}}{{notes}}\n",
    )
    .unwrap();
    std::fs::write(template_dir.join("olymp.sty"), "{{ kept as is }}").unwrap();
    let config = UsacoConfig {
        site_url: SITE.to_string(),
        data_url: DATA.to_string(),
        cache_dir: root.join("cache"),
        problems_dir: root.join("problems"),
        template_dir,
        workers: 2,
    };
    Env { _dir: dir, config }
}

fn scraper(config: &UsacoConfig, fetch: Arc<MockFetch>, tx: EventTx<Update>) -> Scraper {
    Scraper::new(
        config.clone(),
        fetch,
        Arc::new(ZipArchiveTool),
        Arc::new(PlaceholderRender),
        tx,
    )
}

fn mock() -> MockFetch {
    let mut fetch = MockFetch::default();
    fetch.serve(
        &format!("{}?page=dec19results", SITE),
        listing(&[
            ("Cow Gymnastics", 963, "gymnastics_bronze_dec19"),
            ("Where Am I?", 964, "whereami_bronze_dec19"),
        ]),
    );
    fetch.serve(
        &format!("{}?page=viewproblem2&cpid=963", SITE),
        page(1, "Cow Gymnastics"),
    );
    fetch.serve(
        &format!("{}?page=viewproblem2&cpid=964", SITE),
        page(2, "Where Am I?"),
    );
    fetch.serve(
        &format!("{}/gymnastics_bronze_dec19.zip", DATA),
        zip_bytes(&[("1.in", "3\n"), ("1.out", "6\n"), ("2.in", "4\n"), ("2.out", "10\n")]),
    );
    fetch.serve(
        &format!("{}/whereami_bronze_dec19.zip", DATA),
        zip_bytes(&[("1.in", "7\n"), ("1.out", "ABCDABC\n")]),
    );
    fetch
}

fn drain(mut rx: UnboundedReceiver<Update>) -> Vec<Update> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("{}: {}", path.as_ref().display(), e))
}

#[tokio::test]
async fn builds_problems_with_download() {
    let env = env();
    let fetch = Arc::new(mock());
    let (tx, rx) = EventTx::channel();
    let scraper = scraper(&env.config, fetch.clone(), tx);

    let reports = scraper
        .run(&Request {
            contests: vec!["dec19results".to_string()],
            problems: vec![964, 963],
            download: true,
            prefetch: false,
        })
        .await
        .unwrap();
    drop(scraper);

    assert_eq!(reports.len(), 2);
    for r in &reports {
        assert!(r.result.is_ok(), "{}: {:#}", r.problem_id, r.result.as_ref().unwrap_err());
    }
    assert_eq!(reports[0].problem_id, 964);
    assert_eq!(reports[0].letter_id, "a");
    assert_eq!(reports[1].letter_id, "b");

    let b: PathBuf = env.config.problems_dir.join("b");
    let tex = read(b.join("statement/problem.tex"));
    assert!(tex.starts_with("\\begin{problem}{Cow Gymnastics}b\nFarmer John has N cows."));
    assert_eq!(read(b.join("olymp.sty")), "{{ kept as is }}");
    assert!(read(b.join("origin.html")).contains("<h2>Problem 1. Cow Gymnastics</h2>"));
    assert_eq!(read(b.join("data/sample/1.ans")), "6\n");
    assert_eq!(read(b.join("data/secret/2.ans")), "10\n");
    assert_eq!(
        read(env.config.problems_dir.join("a/data/sample/1.ans")),
        "ABCDABC\n"
    );

    let events = drain(rx);
    assert!(events.iter().any(|e| matches!(
        e,
        Update::ContestScanned { problem_count: 2, .. }
    )));
    let done = events
        .iter()
        .filter(|e| matches!(e, Update::ProblemDone { outcome, .. } if outcome.is_ok()))
        .count();
    assert_eq!(done, 2);
}

#[tokio::test]
async fn missing_archive_without_download_fails_only_that_problem() {
    let env = env();
    let fetch = Arc::new(mock());
    let scraper = scraper(&env.config, fetch.clone(), EventTx::sink());
    let contests = scraper
        .scan_contests(&["dec19results".to_string()])
        .await
        .unwrap();

    let reports = scraper
        .add_problems(&contests, &[963, 1000], false)
        .await
        .unwrap();
    let msg = format!("{:#}", reports[0].result.as_ref().unwrap_err());
    assert!(msg.contains("gymnastics_bronze_dec19.zip"), "{}", msg);
    let msg = format!("{:#}", reports[1].result.as_ref().unwrap_err());
    assert!(msg.contains("1000"), "{}", msg);
    // page is still rendered even though data is missing
    assert!(env.config.problems_dir.join("a/origin.html").exists());
    assert_eq!(fetch.hits(&format!("{}/gymnastics_bronze_dec19.zip", DATA)), 0);
}

#[tokio::test]
async fn invalid_cache_is_refetched() {
    let env = env();
    let fetch = Arc::new(mock());
    let scraper = scraper(&env.config, fetch.clone(), EventTx::sink());
    let sid = "gymnastics_bronze_dec19";
    let url = format!("{}/{}.zip", DATA, sid);
    let cached = env.config.archive_path(sid);
    std::fs::create_dir_all(cached.parent().unwrap()).unwrap();
    std::fs::write(&cached, "<html>not a zip</html>").unwrap();

    scraper.download_data(sid).await;
    assert_eq!(fetch.hits(&url), 1);
    assert!(ZipArchiveTool.validate(&cached));

    // valid cache is reused
    scraper.download_data(sid).await;
    assert_eq!(fetch.hits(&url), 1);
}

#[tokio::test]
async fn truncated_cache_is_refetched_before_extraction() {
    let env = env();
    let fetch = Arc::new(mock());
    let (tx, rx) = EventTx::channel();
    let scraper = scraper(&env.config, fetch.clone(), tx);
    let sid = "gymnastics_bronze_dec19";
    let url = format!("{}/{}.zip", DATA, sid);
    let full = zip_bytes(&[("1.in", "3\n"), ("1.out", "6\n"), ("2.in", "4\n"), ("2.out", "10\n")]);
    let cached = env.config.archive_path(sid);
    std::fs::create_dir_all(cached.parent().unwrap()).unwrap();
    std::fs::write(&cached, &full[..full.len() / 2]).unwrap();

    let contests = scraper
        .scan_contests(&["dec19results".to_string()])
        .await
        .unwrap();
    let reports = scraper.add_problems(&contests, &[963], true).await.unwrap();
    drop(scraper);

    assert!(
        reports[0].result.is_ok(),
        "{:#}",
        reports[0].result.as_ref().unwrap_err()
    );
    assert_eq!(fetch.hits(&url), 1);
    assert!(ZipArchiveTool.validate(&cached));
    assert_eq!(
        read(env.config.problems_dir.join("a/data/secret/2.ans")),
        "10\n"
    );
    assert!(drain(rx)
        .iter()
        .any(|e| matches!(e, Update::ArchiveInvalid { .. })));
}

#[tokio::test]
async fn prefetch_and_failed_download() {
    let env = env();
    let mut fetch = mock();
    fetch.serve(
        &format!("{}?page=jan20results", SITE),
        listing(&[("Broken", 999, "broken_jan20")]),
    );
    let fetch = Arc::new(fetch);
    let (tx, rx) = EventTx::channel();
    let scraper = scraper(&env.config, fetch.clone(), tx);
    let reports = scraper
        .run(&Request {
            contests: vec!["dec19results".to_string(), "jan20results".to_string()],
            problems: vec![963],
            download: false,
            prefetch: true,
        })
        .await
        .unwrap();
    drop(scraper);
    assert!(reports[0].result.is_ok());
    assert!(env.config.archive_path("whereami_bronze_dec19").exists());
    assert!(!env.config.archive_path("broken_jan20").exists());
    let events = drain(rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, Update::Warning(w) if w.contains("broken_jan20"))));
}
