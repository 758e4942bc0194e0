use std::sync::Arc;

use refsplice::classifier::SuffixClassifier;
use refsplice::fetcher::*;
use refsplice::reporter::{DefectLog, DefectReporter};
use refsplice::resolution::Resolver;
use refsplice::types::{Defect, DefectKind};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Writes `<root>/<entity>/<id>.json` fixtures for a teacher and two students.
fn setup_fixtures() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    for (entity, id, body) in [
        ("teacher", "42", r#"{"id": "42", "name": "Ada"}"#),
        ("students", "1", r#"{"id": "1", "name": "Bo"}"#),
        ("students", "3", r#"{"id": "3", "name": "Cy"}"#),
        ("students", "4", r#"["not", "an", "object"]"#),
    ] {
        let entity_dir = dir.path().join(entity);
        std::fs::create_dir_all(&entity_dir).unwrap();
        std::fs::write(entity_dir.join(format!("{}.json", id)), body).unwrap();
    }
    dir
}

#[test]
fn test_directory_fetcher_reads_files() {
    let dir = setup_fixtures();
    let fetcher = DirectoryFetcher::new(dir.path());
    let bytes = fetcher.fetch("teacher", "42").unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["name"], "Ada");
}

#[test]
fn test_directory_fetcher_missing_file_is_empty() {
    let dir = setup_fixtures();
    let fetcher = DirectoryFetcher::new(dir.path());
    assert!(fetcher.fetch("teacher", "404").unwrap().is_empty());
    assert!(fetcher.fetch("nobody", "1").unwrap().is_empty());
}

#[test]
fn test_directory_fetcher_rejects_path_escapes() {
    let dir = setup_fixtures();
    let fetcher = DirectoryFetcher::new(dir.path());
    assert!(fetcher.fetch("teacher", "../students/1").is_err());
    assert!(fetcher.fetch("..", "1").is_err());
    assert!(fetcher.fetch("teacher", "a\\b").is_err());
    assert!(fetcher.fetch("teacher", "").is_err());
}

#[test]
fn test_directory_fetcher_end_to_end() {
    let dir = setup_fixtures();
    let log = Arc::new(DefectLog::new());
    let resolver = Resolver::new(SuffixClassifier::default(), DirectoryFetcher::new(dir.path()))
        .with_reporter(log.clone());

    let out = resolver
        .resolve(br#"{"teacher_id": 42, "student_ids": ["1", "2", "3", "4"]}"#)
        .unwrap();
    let value: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        value,
        json!({
            "teacher": { "id": "42", "name": "Ada" },
            "students": [{ "id": "1", "name": "Bo" }, { "id": "3", "name": "Cy" }],
        })
    );

    let kinds: Vec<DefectKind> = log.take().iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DefectKind::EmptyFetchResult, DefectKind::NonObjectFetchResult]
    );
    assert!(log.is_empty());
}

#[test]
fn test_registry_dispatches_by_entity() {
    let registry = FetcherRegistry::new()
        .with("teacher", |id: &str| Ok(format!("{{\"teacher\": \"{}\"}}", id).into_bytes()))
        .with("course", |id: &str| Ok(format!("{{\"course\": \"{}\"}}", id).into_bytes()));

    assert!(registry.handles("teacher"));
    assert!(!registry.handles("student"));
    assert_eq!(registry.entities(), vec!["course", "teacher"]);
    assert_eq!(registry.fetch("course", "7").unwrap(), br#"{"course": "7"}"#.to_vec());
    assert!(registry.fetch("student", "7").is_err());
}

#[test]
fn test_closure_reporter_receives_defects() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = seen.clone();
    let reporter = move |defect: &Defect| sink.lock().unwrap().push(defect.to_string());

    reporter.report(&Defect {
        kind: DefectKind::EmptyFetchResult,
        entity: "teacher".to_string(),
        id: "9".to_string(),
    });
    assert_eq!(*seen.lock().unwrap(), vec!["fetched nothing for teacher id '9'"]);
}
