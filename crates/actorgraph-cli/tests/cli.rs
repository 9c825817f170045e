use std::fs;
use std::path::{Path, PathBuf};

use actorgraph::repository::MANIFEST_FILE;
use actorgraph::{DiscoverOptions, Repository, find_repository_basedir, run_main};
use actorgraph_error::ErrorKind;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const BASE_MANIFEST: &str = r#"
name = "system_upgrade"
links = ["../common"]

[[actors]]
name = "CollectFacts"
path = "actors/collectfacts"
produces = ["OSReleaseFacts"]
tags = ["FactsPhaseTag"]

[[actors]]
name = "CheckOsRelease"
description = "Checks the OS release is supported."
path = "actors/checkosrelease"
consumes = ["OSReleaseFacts"]
produces = ["Report"]
tags = ["ChecksPhaseTag", "IPUWorkflowTag"]

[[actors.dialogs]]
scope = "os_release_check"
title = "Confirm release"

[[actors]]
name = "InhibitorCheck"
path = "actors/inhibitorcheck"
consumes = ["OSReleaseFacts"]
produces = ["Inhibitor"]
tags = ["ChecksPhaseTag"]

[[models]]
name = "OSReleaseFacts"
path = "models/osrelease.py"

[[topics]]
name = "SystemInfoTopic"
path = "topics/systeminfo.py"

[[tags]]
name = "ChecksPhaseTag"
path = "tags/checks.py"

[[workflows]]
name = "IPUWorkflow"
short_name = "ipu"
description = "In-place upgrade."
path = "workflows/ipu.py"
phases = ["FactsCollection", "Checks"]
"#;

const COMMON_MANIFEST: &str = r#"
name = "common"
links = ["../repo"]

[[actors]]
name = "ReportGenerator"
path = "actors/report_generator"
consumes = ["Report"]

[[actors]]
name = "Unrelated"
path = "actors/unrelated"
produces = ["Lonely"]

[[models]]
name = "Report"
path = "models/report.py"

[[tags]]
name = "IPUWorkflowTag"
path = "tags/ipu.py"
"#;

/// `<tmp>/repo` linking `<tmp>/common`, which links back.
fn write_fixture() -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().expect("tempdir");
    let repo = dir.path().join("repo");
    let common = dir.path().join("common");
    fs::create_dir_all(repo.join("actors/checkosrelease")).expect("repo dirs");
    fs::create_dir_all(&common).expect("common dir");
    fs::write(repo.join(MANIFEST_FILE), BASE_MANIFEST).expect("write base manifest");
    fs::write(common.join(MANIFEST_FILE), COMMON_MANIFEST).expect("write common manifest");
    (dir, repo)
}

fn options(repo: &Path) -> DiscoverOptions {
    DiscoverOptions {
        repository: repo.to_path_buf(),
        ..DiscoverOptions::default()
    }
}

fn dot_nodes(dot: &str) -> Vec<String> {
    dot.lines()
        .filter(|line| line.ends_with(']') && !line.contains(" -> "))
        .map(|line| line.split(' ').next().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn graph_covers_linked_repositories() {
    let (_dir, repo) = write_fixture();
    let mut opts = options(&repo);
    opts.as_graph = true;

    let output = run_main(&opts).expect("graph run");
    let expected = "\
digraph \"leapp-actors\" {
nodesep=2
ranksep=2
rankdir=LR
CheckOsRelease [label=CheckOsRelease]
CollectFacts [label=CollectFacts]
InhibitorCheck [label=InhibitorCheck]
ReportGenerator [label=ReportGenerator]
CheckOsRelease -> ReportGenerator [label=Report]
CollectFacts -> CheckOsRelease [label=OSReleaseFacts]
CollectFacts -> InhibitorCheck [label=OSReleaseFacts]
}
";
    assert_eq!(output.text, expected);
    assert!(output.warnings.is_empty());
}

#[test]
fn tight_filter_drops_sibling_branches() {
    let (_dir, repo) = write_fixture();
    let mut opts = options(&repo);
    opts.as_graph = true;
    opts.only_related_to = vec!["Report".to_string()];

    opts.tight = true;
    let tight = run_main(&opts).expect("tight run").text;
    assert_eq!(
        dot_nodes(&tight),
        vec!["CheckOsRelease", "CollectFacts", "ReportGenerator"]
    );
    assert!(!tight.contains("InhibitorCheck"));

    opts.tight = false;
    let loose = run_main(&opts).expect("loose run").text;
    assert_eq!(
        dot_nodes(&loose),
        vec![
            "CheckOsRelease",
            "CollectFacts",
            "InhibitorCheck",
            "ReportGenerator"
        ]
    );
}

#[test]
fn unknown_filter_yields_empty_graph() {
    let (_dir, repo) = write_fixture();
    let mut opts = options(&repo);
    opts.as_graph = true;
    opts.only_related_to = vec!["NoSuchThing".to_string()];

    let output = run_main(&opts).expect("graph run").text;
    assert_eq!(
        output,
        "digraph \"leapp-actors\" {\nnodesep=2\nranksep=2\nrankdir=LR\n}\n"
    );
}

#[test]
fn json_report_has_fixed_layout() {
    let (_dir, repo) = write_fixture();
    let mut opts = options(&repo);
    opts.json = true;

    let text = run_main(&opts).expect("json run").text;
    assert!(text.ends_with("}\n"));

    let positions: Vec<usize> = [
        "repository",
        "base_dir",
        "topics",
        "models",
        "actors",
        "tags",
        "workflows",
    ]
    .iter()
    .map(|key| {
        text.find(&format!("\n  \"{key}\":"))
            .unwrap_or_else(|| panic!("missing top-level key {key}: {text}"))
    })
    .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted, "top-level keys out of order");

    let json: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(json["repository"], "system_upgrade");
    assert_eq!(
        json["base_dir"],
        repo.canonicalize().unwrap().display().to_string()
    );

    let check = &json["actors"]["CheckOsRelease"];
    assert_eq!(check["name"], "check_os_release");
    assert_eq!(check["class_name"], "CheckOsRelease");
    assert_eq!(check["produces"], serde_json::json!(["Report"]));
    assert_eq!(check["consumes"], serde_json::json!(["OSReleaseFacts"]));
    assert_eq!(check["path"], "actors/checkosrelease");
    assert_eq!(check["apis"], serde_json::json!([]));
    assert_eq!(check["dialogs"][0]["scope"], "os_release_check");

    // Linked actors are always reported, with paths relative to the base.
    assert_eq!(
        json["actors"]["ReportGenerator"]["path"],
        "../common/actors/report_generator"
    );

    let models: Vec<&String> = json["models"].as_object().unwrap().keys().collect();
    assert_eq!(models, vec!["OSReleaseFacts"]);
    assert_eq!(
        json["tags"]["ChecksPhaseTag"]["actors"],
        serde_json::json!(["CheckOsRelease", "InhibitorCheck"])
    );
    assert_eq!(json["topics"]["SystemInfoTopic"]["path"], "topics/systeminfo.py");
    assert_eq!(json["workflows"]["IPUWorkflow"]["short_name"], "ipu");
}

#[test]
fn all_flag_includes_linked_entities() {
    let (_dir, repo) = write_fixture();
    let mut opts = options(&repo);
    opts.json = true;
    opts.all = true;

    let text = run_main(&opts).expect("json run").text;
    let json: serde_json::Value = serde_json::from_str(&text).expect("valid json");

    assert_eq!(json["models"]["Report"]["path"], "../common/models/report.py");
    assert_eq!(
        json["tags"]["IPUWorkflowTag"]["actors"],
        serde_json::json!(["CheckOsRelease"])
    );
}

#[test]
fn listing_groups_and_counts() {
    let (_dir, repo) = write_fixture();

    let text = run_main(&options(&repo)).expect("listing run").text;
    let base = repo.canonicalize().unwrap();
    assert!(text.starts_with(&format!(
        "Repository:\n  Name: system_upgrade\n  Path: {}\n\n",
        base.display()
    )));

    let headers: Vec<&str> = text.lines().filter(|l| l.ends_with("):")).collect();
    assert_eq!(
        headers,
        vec!["Actors(5):", "Models(1):", "Tags(1):", "Topics(1):", "Workflows(1):"]
    );

    let actor_lines: Vec<&str> = text
        .lines()
        .skip_while(|l| *l != "Actors(5):")
        .skip(1)
        .take_while(|l| !l.is_empty())
        .collect();
    let names: Vec<&str> = actor_lines
        .iter()
        .map(|l| l.trim_start_matches("   - ").split_whitespace().next().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "CheckOsRelease",
            "CollectFacts",
            "InhibitorCheck",
            "ReportGenerator",
            "Unrelated"
        ]
    );
    assert!(actor_lines[0].ends_with("actors/checkosrelease"));

    let mut opts = options(&repo);
    opts.all = true;
    let text = run_main(&opts).expect("listing run").text;
    assert!(text.contains("Models(2):\n"));
    assert!(text.contains("Tags(2):\n"));
}

#[test]
fn safe_and_json_conflict() {
    let (_dir, repo) = write_fixture();
    let mut opts = options(&repo);
    opts.safe = true;
    opts.json = true;

    let err = run_main(&opts).expect_err("safe and json should conflict");
    assert_eq!(err.kind(), ErrorKind::ConflictingOptions);
    assert!(
        err.message().contains("--safe") && err.message().contains("--json"),
        "unexpected error message: {err}"
    );
}

#[test]
fn safe_mode_lists_base_actors_only() {
    let (_dir, repo) = write_fixture();
    let mut opts = options(&repo);
    opts.safe = true;

    let output = run_main(&opts).expect("safe run");
    assert!(output.text.contains("Actors(3):\n"));
    assert!(output.text.contains("consumes: OSReleaseFacts\n"));
    assert!(!output.text.contains("ReportGenerator"));
    assert!(output.warnings.is_empty());
}

#[test]
fn search_starts_from_subdirectory() {
    let (_dir, repo) = write_fixture();
    let nested = repo.join("actors/checkosrelease");

    let found = find_repository_basedir(&nested).expect("basedir");
    assert_eq!(found, repo.canonicalize().unwrap());
}

#[test]
fn missing_repository_is_reported() {
    let dir = tempdir().expect("tempdir");
    let mut opts = options(dir.path());
    opts.as_graph = true;

    let err = run_main(&opts).expect_err("no manifest anywhere");
    assert_eq!(err.kind(), ErrorKind::RepositoryNotFound);
}

#[test]
fn broken_link_fails_loading() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join(MANIFEST_FILE),
        "name = \"lonely\"\nlinks = [\"../does-not-exist\"]\n",
    )
    .expect("write manifest");

    let err = Repository::load(dir.path()).expect_err("link must resolve");
    assert_eq!(err.kind(), ErrorKind::LinkUnresolved);
}

#[test]
fn invalid_manifest_fails_loading() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(MANIFEST_FILE), "[[actors]]\nname = 1\n").expect("write manifest");

    let err = run_main(&options(dir.path())).expect_err("manifest must parse");
    assert_eq!(err.kind(), ErrorKind::ManifestInvalid);
}

#[test]
fn linked_repositories_are_loaded_once() {
    let (_dir, repo) = write_fixture();

    let repository = Repository::load(&repo).expect("load");
    assert_eq!(repository.repo_dirs().len(), 2);
    assert_eq!(repository.actors().len(), 5);
    assert_eq!(repository.name(), "system_upgrade");
}

#[test]
fn link_to_directory_without_manifest_names_the_file() {
    let dir = tempdir().expect("tempdir");
    let repo = dir.path().join("repo");
    fs::create_dir_all(&repo).expect("repo dir");
    fs::create_dir_all(dir.path().join("empty")).expect("empty dir");
    fs::write(
        repo.join(MANIFEST_FILE),
        "name = \"linked\"\nlinks = [\"../empty\"]\n",
    )
    .expect("write manifest");

    let err = run_main(&options(&repo)).expect_err("linked manifest is missing");
    assert_eq!(err.kind(), ErrorKind::FileNotFound);

    let missing = dir
        .path()
        .canonicalize()
        .unwrap()
        .join("empty")
        .join(MANIFEST_FILE);
    assert!(
        err.message().contains(&missing.display().to_string()),
        "message should name the manifest: {}",
        err.message()
    );
}
