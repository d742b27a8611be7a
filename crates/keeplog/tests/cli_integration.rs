//! End-to-end CLI integration tests.
//!
//! Each test builds a throwaway repository, runs the `keeplog` binary inside
//! it and checks its output and the files it leaves behind.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use git2::{Oid, Repository, Signature, Time};
use predicates::prelude::*;
use tempfile::TempDir;

/// 2021-01-01T00:00:00Z
const EPOCH: i64 = 1_609_459_200;
const DAY: i64 = 86_400;

fn keeplog(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("keeplog").expect("binary should build");
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("KEEPLOG_CONFIG");
    cmd
}

fn commit(repo: &Repository, message: &str, seconds: i64) -> Oid {
    let signature = Signature::new("Alice", "alice@example.com", &Time::new(seconds, 0)).unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )
    .unwrap()
}

fn tag(repo: &Repository, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

/// A repository with a tagged initial commit and three newer commits.
fn setup_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("failed to init git repo");

    let initial = commit(&repo, "Initial commit", EPOCH);
    tag(&repo, "v0.1.0", initial);
    commit(&repo, "fix: bug", EPOCH + DAY);
    commit(&repo, "added new feature", EPOCH + 2 * DAY);
    commit(&repo, "Update docs", EPOCH + 3 * DAY);

    temp_dir
}

#[test]
fn test_init_creates_config() {
    let temp_dir = setup_repo();
    let dir = temp_dir.path();

    keeplog(dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("keeplog.toml"));

    let content = fs::read_to_string(dir.join("keeplog.toml")).unwrap();
    assert!(content.contains("[repository]"));
    assert!(content.contains("[changelog]"));
    assert!(content.contains("[sources]"));
    assert!(content.contains("[commit]"));
}

#[test]
fn test_init_force_overwrites() {
    let temp_dir = setup_repo();
    let dir = temp_dir.path();
    fs::write(dir.join("keeplog.toml"), "# old config\n").unwrap();

    keeplog(dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    keeplog(dir).args(["init", "--force"]).assert().success();

    let content = fs::read_to_string(dir.join("keeplog.toml")).unwrap();
    assert!(!content.contains("# old config"));
}

#[test]
fn test_generate_prints_unreleased_changes() {
    let temp_dir = setup_repo();

    keeplog(temp_dir.path())
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("## [Unreleased] - 2021-01-04"))
        .stdout(predicate::str::contains("### Added"))
        .stdout(predicate::str::contains("**new feature** - @Alice"))
        .stdout(predicate::str::contains("### Fixed"))
        .stdout(predicate::str::contains("**bug**"))
        .stdout(predicate::str::contains("**Update docs**"))
        .stdout(predicate::str::contains("Initial commit").not());
}

#[test]
fn test_generate_tagged_release() {
    let temp_dir = setup_repo();

    keeplog(temp_dir.path())
        .args(["generate", "--tag", "v0.1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## [v0.1.0] - 2021-01-01"))
        .stdout(predicate::str::contains("**Initial commit**"))
        .stdout(predicate::str::contains("bug").not());
}

#[test]
fn test_generate_unknown_tag_fails() {
    let temp_dir = setup_repo();

    keeplog(temp_dir.path())
        .args(["generate", "--tag", "v9.9.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("v9.9.9"));
}

#[test]
fn test_generate_skip_and_date_bounds() {
    let temp_dir = setup_repo();

    keeplog(temp_dir.path())
        .args(["generate", "--since", "2021-01-03", "--until", "2021-01-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**new feature**"))
        .stdout(predicate::str::contains("**bug**").not());

    keeplog(temp_dir.path())
        .args(["generate", "--skip-from", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("###").not());
}

#[test]
fn test_generate_conflicting_source_modes() {
    let temp_dir = setup_repo();

    keeplog(temp_dir.path())
        .args(["generate", "--only-commits", "--only-pull-requests"])
        .assert()
        .failure();
}

#[test]
fn test_generate_json() {
    let temp_dir = setup_repo();

    keeplog(temp_dir.path())
        .args(["generate", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Unreleased\""))
        .stdout(predicate::str::contains("\"description\": \"new feature\""));
}

#[test]
fn test_generate_update_is_idempotent() {
    let temp_dir = setup_repo();
    let dir = temp_dir.path();

    keeplog(dir)
        .args(["generate", "--update"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated CHANGELOG.md"));

    let first = fs::read_to_string(dir.join("CHANGELOG.md")).unwrap();
    assert!(first.starts_with("# Changelog\n"));
    assert!(first.contains("## [Unreleased] - 2021-01-04"));

    keeplog(dir)
        .args(["generate", "--update"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));

    let second = fs::read_to_string(dir.join("CHANGELOG.md")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_generate_update_keeps_older_releases() {
    let temp_dir = setup_repo();
    let dir = temp_dir.path();

    keeplog(dir)
        .args(["generate", "--update", "--tag", "v0.1.0"])
        .assert()
        .success();
    keeplog(dir).args(["generate", "--update"]).assert().success();

    let content = fs::read_to_string(dir.join("CHANGELOG.md")).unwrap();
    let unreleased = content.find("## [Unreleased]").unwrap();
    let tagged = content.find("## [v0.1.0]").unwrap();
    assert!(unreleased < tagged);
}

#[test]
fn test_generate_update_html() {
    let temp_dir = setup_repo();
    let dir = temp_dir.path();

    keeplog(dir)
        .args(["generate", "--update", "--output", "CHANGELOG.html"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.join("CHANGELOG.html")).unwrap();
    assert!(content.starts_with("<h1>Changelog</h1>\n"));
    assert!(content.contains("<h2>[Unreleased] - 2021-01-04</h2>"));
    assert!(content.contains("<strong>bug</strong>"));
}

#[test]
fn test_generate_update_commits_changelog() {
    let temp_dir = setup_repo();
    let dir = temp_dir.path();

    keeplog(dir)
        .args(["generate", "--update", "--commit"])
        .assert()
        .success();

    let repo = Repository::open(dir).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.summary(), Some("Update changelog"));
    assert_eq!(head.author().name(), Some("keeplog"));
    assert!(head.tree().unwrap().get_name("CHANGELOG.md").is_some());
}

#[test]
fn test_release_promotes_unreleased() {
    let temp_dir = setup_repo();
    let dir = temp_dir.path();

    keeplog(dir).args(["generate", "--update"]).assert().success();
    keeplog(dir)
        .args(["release", "0.2.0", "--date", "2021-02-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Released 0.2.0"));

    let content = fs::read_to_string(dir.join("CHANGELOG.md")).unwrap();
    assert!(content.contains("## [0.2.0] - 2021-02-01"));
    assert!(!content.contains("Unreleased"));
    assert!(content.contains("**new feature**"));
}

#[test]
fn test_release_promotes_undated_unreleased() {
    let temp_dir = setup_repo();
    let dir = temp_dir.path();
    fs::write(
        dir.join("CHANGELOG.md"),
        "# Changelog\n\n## [Unreleased]\n\n### Added\n\n- #7 - **Hand written entry** - @alice\n",
    )
    .unwrap();

    keeplog(dir)
        .args(["release", "1.0.0", "--date", "2021-02-01"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.join("CHANGELOG.md")).unwrap();
    assert!(content.contains("## [1.0.0] - 2021-02-01"));
    assert!(content.contains("- #7 - **Hand written entry** - @alice"));
}

#[test]
fn test_release_without_unreleased_fails() {
    let temp_dir = setup_repo();
    let dir = temp_dir.path();
    let original = "# Changelog\n\n## [0.1.0] - 2021-01-01\n\n### Added\n\n- #1 - **Initial** - @alice\n";
    fs::write(dir.join("CHANGELOG.md"), original).unwrap();

    keeplog(dir)
        .args(["release", "0.2.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("There is nothing to release"));

    assert_eq!(
        fs::read_to_string(dir.join("CHANGELOG.md")).unwrap(),
        original
    );
}

#[test]
fn test_release_existing_name_fails() {
    let temp_dir = setup_repo();
    let dir = temp_dir.path();
    fs::write(
        dir.join("CHANGELOG.md"),
        "## [Unreleased] - 2021-01-05\n\n### Fixed\n\n- #2 - **Fix**\n\n## [0.1.0] - 2021-01-01\n\n### Added\n\n- #1 - **Initial**\n",
    )
    .unwrap();

    keeplog(dir)
        .args(["release", "0.1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Release 0.1.0 already exists and can't be released again",
        ));
}

#[test]
fn test_release_rejects_bad_date() {
    let temp_dir = setup_repo();

    keeplog(temp_dir.path())
        .args(["release", "1.0.0", "--date", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}
