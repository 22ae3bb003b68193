use dompack_api::{
    convert_problem::{ContestRequest, Request, Step, Update},
    EventTx,
};
use dompack_engine::{config::PolygonConfig, polygon};
use std::path::Path;

const PROBLEM_XML: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<problem revision="7" short-name="cows" url="https://polygon.codeforces.com/p/jury/cows">
  <names>
    <name language="english" value="Counting Cows"/>
  </names>
  <statements>
    <statement charset="UTF-8" language="english" path="statements/english/problem.tex" type="application/x-tex"/>
  </statements>
  <judging cpu-name="Intel(R) Core(TM) i3-8100 CPU @ 3.60GHz" cpu-speed="3600" input-file="" output-file="">
    <testset name="tests">
      <time-limit>1500</time-limit>
      <memory-limit>268435456</memory-limit>
      <test-count>3</test-count>
      <input-path-pattern>tests/%02d</input-path-pattern>
      <answer-path-pattern>tests/%02d.a</answer-path-pattern>
      <tests>
        <test method="manual" sample="true"/>
        <test method="generated" cmd="gen 1"/>
        <test method="generated" cmd="gen 2"/>
      </tests>
    </testset>
  </judging>
  <files>
    <resources>
      <file path="files/testlib.h" type="h.g++"/>
    </resources>
  </files>
  <assets>
    <checker name="std::ncmp.cpp" type="testlib">
      <source path="files/check.cpp" type="cpp.g++17"/>
    </checker>
    <solutions>
      <solution tag="main">
        <source path="solutions/main.cpp" type="cpp.g++17"/>
      </solution>
      <solution tag="wrong-answer">
        <source path="solutions/greedy.py" type="python.3"/>
      </solution>
    </solutions>
  </assets>
</problem>
"#;

fn put(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn make_package(root: &Path, manifest: &str) {
    put(root, "problem.xml", manifest);
    put(root, "files/testlib.h", "// testlib\n");
    put(root, "files/check.cpp", "#include \"testlib.h\"\n");
    for i in 1..=3 {
        put(root, &format!("tests/{:02}", i), &format!("{}\n", i));
        put(root, &format!("tests/{:02}.a", i), &format!("{}\n", i * 2));
    }
    put(root, "solutions/main.cpp", "int main() {}\n");
    put(root, "solutions/main.cpp.desc", "File name: main.cpp\nTag: MAIN\n");
    put(root, "solutions/greedy.py", "print(0)\n");
    put(root, "solutions/greedy.py.desc", "File name: greedy.py\nTag: WRONG_ANSWER\n");
    put(root, "solutions/draft.cpp", "int main() {}\n");
    put(root, "solutions/draft.cpp.desc", "File name: draft.cpp\nTag: REJECTED\n");
    put(root, "statements/english/problem.tex", "\\begin{problem}{Counting Cows}\n");
    put(root, "statements/english/cows.png", "png");
}

fn request(src: &Path, dst: &Path) -> Request {
    Request {
        src_path: src.to_path_buf(),
        out_path: dst.to_path_buf(),
        language: "english".to_string(),
        probid: Some("B".to_string()),
        color: "#FF8000".to_string(),
    }
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("{}: {}", path.as_ref().display(), e))
}

#[test]
fn full_problem_conversion() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    make_package(src.path(), PROBLEM_XML);
    let (tx, mut rx) = EventTx::channel();

    let report = polygon::convert_problem(
        &request(src.path(), dst.path()),
        &PolygonConfig::default(),
        &tx,
    );
    drop(tx);
    for (step, res) in &report {
        assert!(res.is_ok(), "{:?} failed: {:#}", step, res.as_ref().unwrap_err());
    }
    assert_eq!(
        report.iter().map(|(s, _)| *s).collect::<Vec<_>>(),
        Step::ALL.to_vec()
    );
    assert!(polygon::is_success(&report));

    let d = dst.path();
    assert_eq!(
        read(d.join("domjudge-problem.ini")),
        "probid = B\nname = Counting Cows\ntimelimit = 1.5\ncolor = #FF8000\n"
    );
    let yaml = read(d.join("problem.yaml"));
    assert!(yaml.contains("memory: 256"));
    assert!(yaml.contains("validation: custom"));
    assert!(!yaml.contains("interactive"));

    assert_eq!(read(d.join("data/sample/1.in")), "1\n");
    assert_eq!(read(d.join("data/sample/1.ans")), "2\n");
    assert_eq!(read(d.join("data/secret/3.ans")), "6\n");
    assert!(!d.join("data/secret/1.in").exists());

    assert!(d.join("submissions/accepted/main.cpp").exists());
    assert!(d.join("submissions/wrong_answer/greedy.py3").exists());
    assert!(!d.join("submissions/wrong_answer/draft.cpp").exists());

    assert!(d.join("problem_statement/problem.tex").exists());
    assert!(read(d.join("problem_statement/wrap.tex")).contains("\\addtocounter{problem}{1}"));

    let build = read(d.join("output_validators/checker/build"));
    assert!(build.contains("g++ -Wall -DDOMJUDGE -O2 check.cpp -o run"));
    assert!(d.join("output_validators/checker/testlib.h").exists());
    assert!(d.join("output_validators/checker/check.cpp").exists());

    let mut events: Vec<Update> = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert!(events
        .iter()
        .any(|e| matches!(e, Update::Warning(w) if w.contains("draft.cpp.desc"))));
    assert!(events
        .iter()
        .any(|e| matches!(e, Update::TestsCopied { sample: 1, secret: 2 })));
    let done = events
        .iter()
        .filter(|e| matches!(e, Update::StepDone { .. }))
        .count();
    assert_eq!(done, Step::ALL.len());
}

#[test]
fn interactive_problem() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let manifest = PROBLEM_XML.replace(
        "<solutions>",
        r#"<interactor><source path="files/interactor.cpp" type="cpp.g++17"/></interactor>
    <solutions>"#,
    );
    make_package(src.path(), &manifest);
    put(src.path(), "files/interactor.cpp", "int main() {}\n");

    let report = polygon::convert_problem(
        &request(src.path(), dst.path()),
        &PolygonConfig::default(),
        &EventTx::sink(),
    );
    assert!(polygon::is_success(&report));
    let d = dst.path();
    assert!(read(d.join("problem.yaml")).contains("custom interactive"));
    let build = read(d.join("output_validators/checker/build"));
    assert!(build.contains("-o checker_run"));
    assert!(build.contains("-o interactor_run"));
    assert!(d.join("output_validators/checker/interactor.cpp").exists());
}

#[test]
fn failed_step_does_not_stop_others() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    make_package(src.path(), PROBLEM_XML);
    std::fs::remove_file(src.path().join("files/check.cpp")).unwrap();

    let report = polygon::convert_problem(
        &request(src.path(), dst.path()),
        &PolygonConfig::default(),
        &EventTx::sink(),
    );
    assert!(!polygon::is_success(&report));
    for (step, res) in &report {
        assert_eq!(res.is_ok(), *step != Step::CheckerAndInteractor, "{:?}", step);
    }
    assert!(dst.path().join("domjudge-problem.ini").exists());
    assert!(dst.path().join("data/secret/2.in").exists());
}

#[test]
fn broken_manifest_fails_every_step() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    make_package(src.path(), "<problem><names></problem>");

    let report = polygon::convert_problem(
        &request(src.path(), dst.path()),
        &PolygonConfig::default(),
        &EventTx::sink(),
    );
    assert_eq!(report.len(), Step::ALL.len());
    for (_, res) in &report {
        let msg = format!("{:#}", res.as_ref().unwrap_err());
        assert!(msg.contains("problem.xml"), "{}", msg);
    }
}

#[test]
fn contest_conversion() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    put(
        src.path(),
        "contest.xml",
        r#"<contest>
  <names><name language="english" value="Spring Cup"/></names>
  <problems>
    <problem index="A" url="https://polygon.codeforces.com/p/jury/cows"/>
  </problems>
</contest>"#,
    );
    make_package(&src.path().join("problems/cows"), PROBLEM_XML);

    let reports = polygon::convert_contest(
        &ContestRequest {
            src_path: src.path().to_path_buf(),
            out_path: dst.path().to_path_buf(),
            language: "english".to_string(),
        },
        &PolygonConfig::default(),
        &EventTx::sink(),
    )
    .unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0.index, "A");
    assert!(polygon::is_success(&reports[0].1));

    assert!(read(dst.path().join("common.tex")).contains("Spring Cup"));
    let ini = read(dst.path().join("problems/A/domjudge-problem.ini"));
    assert!(ini.starts_with("probid = A\n"));
    let color = ini.lines().find(|l| l.starts_with("color = #")).unwrap();
    assert_eq!(color.len(), "color = #".len() + 6);
    assert!(read(dst.path().join("problems/A/problem_statement/wrap.tex"))
        .contains("\\addtocounter{problem}{0}"));
}
