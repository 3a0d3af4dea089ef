//! Integration tests for the corpus-to-text pipeline.

use std::fs;
use std::sync::Arc;

use docflat::corpus::{CorpusOptions, CorpusSource, FormatFilter, LocalCorpus, VolumeLocation};
use docflat::error::Error;
use docflat::model::{Document, ParseResult};
use docflat::parser::{DocumentParser, FlattenOptions, FnParser, SidecarParser};
use docflat::pipeline::{OutcomeStatus, Pipeline, PipelineOptions};
use docflat::render::to_json_lines;

const HELLO_CHART: &str = r#"{
    "document": {
        "pages": [{"id": 0}],
        "elements": [
            {"type": "text", "content": "Hello", "bbox": [{"page_id": 1, "coord": [0, 0, 10, 10]}]},
            {"type": "figure", "content": null, "description": "A chart"}
        ]
    },
    "corrupted_data": false,
    "error_status": null,
    "metadata": {"version": "2.0"}
}"#;

const CORRUPTED: &str = r#"{"document": {"elements": null}, "corrupted_data": true, "error_status": null}"#;

const ERRORED: &str = r#"{
    "document": {"elements": []},
    "corrupted_data": false,
    "error_status": [{"error_message": "page could not be rendered", "page_id": 3}]
}"#;

/// Writes documents and their sidecars into a temporary corpus.
fn corpus_fixture(entries: &[(&str, Option<&str>)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, parsed) in entries {
        fs::write(dir.path().join(name), b"%PDF-1.4\n%binary").unwrap();
        if let Some(parsed) = parsed {
            fs::write(dir.path().join(format!("{}.parsed.json", name)), parsed).unwrap();
        }
    }
    dir
}

#[test]
fn test_round_trip_through_corpus() {
    let dir = corpus_fixture(&[("report.pdf", Some(HELLO_CHART))]);
    let corpus = LocalCorpus::new(dir.path())
        .with_options(CorpusOptions::new().with_pattern("*.pdf").unwrap());

    let pipeline = Pipeline::new(Arc::new(SidecarParser::new()));
    let report = pipeline.process_corpus(&corpus).unwrap();

    assert_eq!(report.total(), 1);
    assert!(report.all_succeeded());
    let texts = report.texts();
    assert!(texts[0].uri.ends_with("report.pdf"));
    assert_eq!(texts[0].text, "Hello\nA chart");
}

#[test]
fn test_failures_are_isolated() {
    let dir = corpus_fixture(&[
        ("a.pdf", Some(HELLO_CHART)),
        ("b.pdf", Some(CORRUPTED)),
        ("c.pdf", Some(HELLO_CHART)),
    ]);
    let corpus = LocalCorpus::new(dir.path())
        .with_options(CorpusOptions::new().with_pattern("*.pdf").unwrap());

    let report = Pipeline::new(Arc::new(SidecarParser::new()))
        .process_corpus(&corpus)
        .unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);

    let failed = report.failures().next().unwrap();
    assert!(failed.uri.ends_with("b.pdf"));
    match &failed.status {
        OutcomeStatus::Failed { error_kind, reason } => {
            assert_eq!(error_kind, "document_parse_failure");
            assert!(reason.contains("corrupted"));
        }
        OutcomeStatus::Succeeded { .. } => panic!("expected failure"),
    }
}

#[test]
fn test_error_status_and_missing_sidecar_fail_separately() {
    let dir = corpus_fixture(&[
        ("errored.pdf", Some(ERRORED)),
        ("missing.pdf", None),
        ("ok.pdf", Some(HELLO_CHART)),
    ]);
    let corpus = LocalCorpus::new(dir.path())
        .with_options(CorpusOptions::new().with_pattern("*.pdf").unwrap());

    let report = Pipeline::new(Arc::new(SidecarParser::new()))
        .with_options(PipelineOptions::new().sequential())
        .process_corpus(&corpus)
        .unwrap();

    let reasons: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| o.failure_reason().map(str::to_string))
        .collect();

    assert!(reasons[0]
        .as_deref()
        .is_some_and(|r| r.contains("page could not be rendered")));
    assert!(reasons[1].as_deref().is_some_and(|r| r.contains("no parser output")));
    assert!(reasons[2].is_none());
}

#[test]
fn test_empty_document_is_not_a_failure() {
    let empty = r#"{"document": {"pages": [], "elements": []}, "corrupted_data": false}"#;
    let dir = corpus_fixture(&[("blank.pdf", Some(empty))]);
    let report = Pipeline::new(Arc::new(SidecarParser::new()))
        .process_corpus(&LocalCorpus::new(dir.path()).with_options(
            CorpusOptions::new().with_pattern("*.pdf").unwrap(),
        ))
        .unwrap();

    assert!(report.all_succeeded());
    assert_eq!(report.outcomes[0].text(), Some(""));
}

#[test]
fn test_sidecars_in_separate_directory() {
    let docs = tempfile::tempdir().unwrap();
    let parsed = tempfile::tempdir().unwrap();
    fs::write(docs.path().join("scan.png"), b"\x89PNG\r\n\x1a\n").unwrap();
    fs::write(docs.path().join("notes.txt"), b"plain").unwrap();
    fs::write(parsed.path().join("scan.png.out.json"), HELLO_CHART).unwrap();

    let corpus = LocalCorpus::new(docs.path())
        .with_options(CorpusOptions::new().with_format(FormatFilter::parse("pdf,png").unwrap()));
    let parser = SidecarParser::new()
        .with_suffix(".out.json")
        .with_output_dir(parsed.path());

    let report = Pipeline::new(Arc::new(parser))
        .process_corpus(&corpus)
        .unwrap();

    assert_eq!(report.total(), 1);
    assert_eq!(report.outcomes[0].text(), Some("Hello\nA chart"));
}

#[test]
fn test_strict_mode_fails_whole_document() {
    let malformed = r#"{"document": {"elements": [
        {"type": "text", "content": "kept"},
        {"type": "text", "content": "bad box", "bbox": [{"page_id": 1, "coord": [0, 0]}]}
    ]}}"#;

    let parser: Arc<dyn DocumentParser> = Arc::new(FnParser::new("inline", move |_: &Document| {
        ParseResult::from_json(malformed)
    }));
    let documents = vec![Document::new("m.pdf", Vec::new())];

    let lenient = Pipeline::new(parser.clone()).process_batch(&documents);
    assert_eq!(lenient.outcomes[0].text(), Some("kept"));

    let strict = Pipeline::new(parser)
        .with_options(PipelineOptions::new().with_flatten_options(FlattenOptions::new().strict()))
        .process_batch(&documents);
    match &strict.outcomes[0].status {
        OutcomeStatus::Failed { error_kind, .. } => {
            assert_eq!(error_kind, "malformed_element_shape")
        }
        OutcomeStatus::Succeeded { .. } => panic!("strict mode should fail"),
    }
}

#[test]
fn test_parser_error_is_retained() {
    let parser = FnParser::new("offline", |doc: &Document| {
        Err(Error::Parser(format!("endpoint unavailable for {}", doc.uri)))
    });
    let report = Pipeline::new(Arc::new(parser))
        .process_batch(&[Document::new("x.pdf", Vec::new())]);

    assert_eq!(
        report.outcomes[0].failure_reason(),
        Some("Parser error: endpoint unavailable for x.pdf")
    );
}

#[test]
fn test_outcomes_serialize_as_json_lines() {
    let dir = corpus_fixture(&[("a.pdf", Some(HELLO_CHART)), ("b.pdf", Some(CORRUPTED))]);
    let report = Pipeline::new(Arc::new(SidecarParser::new()))
        .process_corpus(&LocalCorpus::new(dir.path()).with_options(
            CorpusOptions::new().with_pattern("*.pdf").unwrap(),
        ))
        .unwrap();

    let lines = to_json_lines(&report.outcomes).unwrap();
    let parsed: Vec<serde_json::Value> = lines
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0]["status"], "succeeded");
    assert_eq!(parsed[0]["text"], "Hello\nA chart");
    assert_eq!(parsed[1]["status"], "failed");
}

#[test]
fn test_volume_location_corpus() {
    let mount = tempfile::tempdir().unwrap();
    let location = VolumeLocation::new("main", "docs");
    let root = location.resolve(mount.path());
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.pdf"), b"%PDF-1.5").unwrap();

    let corpus = LocalCorpus::from_volume(&location, mount.path());
    assert_eq!(corpus.root(), root.as_path());
    assert_eq!(corpus.documents().unwrap().len(), 1);
}
