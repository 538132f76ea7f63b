use chrono::{TimeZone, Utc};
use hashbench_core::publish::{VersionControl, CSV_FILE, HTML_FILE, MARKDOWN_FILE};
use hashbench_core::{augment, loader, BenchmarkRecord, Error, LegendOrder, Publisher, ReportConfig, ReportFormat, ResultTable};
use std::cell::RefCell;
use std::path::Path;

#[derive(Default)]
struct FakeVcs {
    calls: RefCell<Vec<String>>,
    dirty: bool,
}

impl VersionControl for FakeVcs {
    fn stage(&self, _dir: &Path) -> hashbench_core::Result<()> {
        self.calls.borrow_mut().push("stage".into());
        Ok(())
    }
    fn has_staged_changes(&self, _dir: &Path) -> hashbench_core::Result<bool> { Ok(self.dirty) }
    fn commit(&self, _dir: &Path, message: &str) -> hashbench_core::Result<()> {
        self.calls.borrow_mut().push(format!("commit {message}"));
        Ok(())
    }
    fn head(&self, _dir: &Path) -> hashbench_core::Result<String> { Ok("0123456789abcdef0123456789abcdef01234567".into()) }
    fn repo_path(&self, _dir: &Path) -> hashbench_core::Result<String> { Ok("docs".into()) }
}

fn sample_table() -> ResultTable {
    let mut records = Vec::new();
    for (hashfn, base) in [("RankHash", 40.0), ("MWHC", 120.0), ("<script>", 80.0)] {
        for count in [10_000u64, 1_000_000, 100_000_000] {
            let label = format!("{hashfn}:uniform");
            records.push(BenchmarkRecord::new("LookupTime", label.clone(), base + count as f64 / 1e6, count, 3.0));
            records.push(BenchmarkRecord::new("BuildTime", label.clone(), base * count as f64, count, 3.0));
            records.push(BenchmarkRecord::new("PresortedBuildTime", label, base * count as f64 / 2.0, count, 3.0));
        }
    }
    augment(records, &LegendOrder::default())
}

fn config(dir: &Path, format: ReportFormat) -> ReportConfig {
    let mut cfg = ReportConfig { format, output_dir: Some(dir.to_path_buf()), ..Default::default() };
    cfg.image.scale = 1;
    cfg.publish.raw_base_url = "https://raw.example.org/lab/hashing".into();
    cfg
}

#[test]
fn png_run_writes_csv_and_every_chart() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results");
    let publisher = Publisher::with_vcs(&config(&out, ReportFormat::Png), FakeVcs::default());
    let outcome = publisher.publish(&sample_table()).unwrap();

    assert_eq!(outcome.written.len(), 1 + 8);
    assert!(outcome.commit.is_none());
    for stem in ["lookup_time", "bits_per_key", "lookup_throughput", "build_time"] {
        assert!(out.join(format!("{stem}.png")).is_file(), "{stem}");
        assert!(out.join(format!("zoomed_{stem}.png")).is_file(), "zoomed {stem}");
    }
    assert!(out.join(CSV_FILE).is_file());
}

#[test]
fn html_report_inlines_svg_and_escapes_table() {
    let dir = tempfile::tempdir().unwrap();
    let publisher = Publisher::with_vcs(&config(dir.path(), ReportFormat::Html), FakeVcs::default());
    let when = Utc.with_ymd_and_hms(2022, 3, 1, 12, 0, 0).unwrap();
    publisher.publish_at(&sample_table(), when).unwrap();

    let page = std::fs::read_to_string(dir.path().join(HTML_FILE)).unwrap();
    assert_eq!(page.matches("<svg").count(), 8);
    assert!(page.contains("Generated 2022-03-01 12:00 UTC"));
    assert!(page.contains("&lt;script&gt;:uniform"));
    assert!(!page.contains("<td><script>"));
    assert!(!dir.path().join("lookup_time.png").exists());
}

#[test]
fn markdown_report_links_committed_images() {
    let dir = tempfile::tempdir().unwrap();
    let vcs = FakeVcs { dirty: true, ..Default::default() };
    let publisher = Publisher::with_vcs(&config(dir.path(), ReportFormat::Markdown), vcs);
    let outcome = publisher.publish(&sample_table()).unwrap();

    let commit = outcome.commit.as_deref().unwrap();
    let md = std::fs::read_to_string(dir.path().join(MARKDOWN_FILE)).unwrap();
    assert!(md.contains(&format!("https://raw.example.org/lab/hashing/{commit}/docs/zoomed_build_time.png")));
    assert!(md.contains("commit `0123456`"));
    assert_eq!(outcome.written.last().unwrap(), &dir.path().join(MARKDOWN_FILE));
}

#[test]
fn clean_tree_skips_commit_but_still_reports_head() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), ReportFormat::Png);
    cfg.publish.commit = true;
    let vcs = FakeVcs::default();
    let publisher = Publisher::with_vcs(&cfg, &vcs);
    let table = augment(loader::load_str(r#"{"benchmarks": []}"#, "benchmarks").unwrap(), &LegendOrder::default());
    let outcome = publisher.publish(&table).unwrap();
    assert!(outcome.commit.is_some());
    assert_eq!(*vcs.calls.borrow(), vec!["stage".to_string()]);
}

#[test]
fn dirty_tree_is_committed_once_with_configured_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), ReportFormat::Html);
    cfg.publish.commit = true;
    cfg.publish.message = "bench: refresh".into();
    let vcs = FakeVcs { dirty: true, ..Default::default() };
    let outcome = Publisher::with_vcs(&cfg, &vcs).publish(&sample_table()).unwrap();
    assert_eq!(*vcs.calls.borrow(), vec!["stage".to_string(), "commit bench: refresh".to_string()]);
    assert!(outcome.commit.is_some());
}

#[test]
fn report_failure_after_commit_names_the_commit() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the report file should go makes the write fail
    std::fs::create_dir_all(dir.path().join(MARKDOWN_FILE)).unwrap();
    let vcs = FakeVcs { dirty: true, ..Default::default() };
    let publisher = Publisher::with_vcs(&config(dir.path(), ReportFormat::Markdown), vcs);
    match publisher.publish(&sample_table()) {
        Err(Error::Report { commit, .. }) => assert!(commit.starts_with("0123456")),
        other => panic!("expected report error, got {other:?}"),
    }
}
