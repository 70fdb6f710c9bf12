use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `kbh` isolated from the caller's config, home and server settings
fn kbh(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kbh").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("KBH_CONFIG")
        .env_remove("KBH_SERVER_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn show_unknown_article_fails() {
    let dir = TempDir::new().unwrap();
    kbh(&dir)
        .args(["show", "nonexistent-slug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Article not found: nonexistent-slug"));
}

#[test]
fn show_article_with_related() {
    let dir = TempDir::new().unwrap();
    kbh(&dir)
        .args(["show", "getting-started-support", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"author\": \"Sarah Johnson\""))
        .stdout(predicate::str::contains("onboarding-checklist"));
}

#[test]
fn search_title_mode() {
    let dir = TempDir::new().unwrap();
    kbh(&dir)
        .args(["search", "kubernetes", "--mode", "title", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"slug\": \"kubernetes-basics\""))
        .stdout(predicate::str::contains("\"matchType\": \"title\""));
}

#[test]
fn search_without_matches() {
    let dir = TempDir::new().unwrap();
    kbh(&dir)
        .args(["search", "zzz-no-such-text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found."));
}

#[test]
fn groups_as_json() {
    let dir = TempDir::new().unwrap();
    kbh(&dir)
        .args(["groups", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"resource-centre\""))
        .stdout(predicate::str::contains("Resource Centre"));
}

#[test]
fn subsections_of_unknown_group_fails() {
    let dir = TempDir::new().unwrap();
    kbh(&dir)
        .args(["subsections", "marketing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("marketing"));
}

#[test]
fn negative_limit_yields_empty_list() {
    let dir = TempDir::new().unwrap();
    kbh(&dir)
        .args(["popular", "--limit", "-1", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn prefs_round_trip() {
    let dir = TempDir::new().unwrap();

    kbh(&dir)
        .args(["prefs", "sidebar-collapsed"])
        .assert()
        .success()
        .stdout(predicate::str::diff("false\n"));

    kbh(&dir)
        .args(["prefs", "sidebar-collapsed", "true"])
        .assert()
        .success();

    kbh(&dir)
        .args(["prefs", "sidebar-collapsed"])
        .assert()
        .success()
        .stdout(predicate::str::diff("true\n"));

    kbh(&dir)
        .args(["prefs", "sidebar-collapsed", "--toggle"])
        .assert()
        .success();

    kbh(&dir)
        .args(["prefs", "sidebar-collapsed"])
        .assert()
        .success()
        .stdout(predicate::str::diff("false\n"));
}

#[test]
fn prefs_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    kbh(&dir)
        .args(["prefs", "theme", "dark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown preference"));
}

#[test]
fn init_then_read_exported_dataset() {
    let dir = TempDir::new().unwrap();

    kbh(&dir)
        .args(["init", "--export-dataset"])
        .assert()
        .success();

    assert!(dir.path().join(".kbh/config.toml").exists());
    assert!(dir.path().join(".kbh/dataset.json").exists());

    kbh(&dir)
        .args(["config", "store.dataset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dataset.json"));

    kbh(&dir)
        .args(["show", "kubernetes-basics", "--no-body"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kubernetes Deployment Basics"));
}

#[test]
fn config_set_and_get() {
    let dir = TempDir::new().unwrap();
    kbh(&dir).arg("init").assert().success();

    kbh(&dir)
        .args(["config", "query.popular_limit", "2"])
        .assert()
        .success();

    kbh(&dir)
        .args(["config", "query.popular_limit"])
        .assert()
        .success()
        .stdout(predicate::str::diff("2\n"));
}
