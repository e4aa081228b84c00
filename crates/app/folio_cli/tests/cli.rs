//! End-to-end tests of the `folio` binary against a temporary data directory.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const USER: &str = "beratmen";
const PASS: &str = "!@NB281109#!";

fn folio(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("folio").expect("folio binary");
    cmd.env("FOLIO_DATA_DIR", data_dir)
        .env("FOLIO_STORAGE_KEY", "cli-test-key")
        .env("FOLIO_ADMIN_USERNAME", USER)
        .env("FOLIO_ADMIN_PASSWORD", PASS)
        .env_remove("FOLIO_ADMIN_CREDENTIAL_HASH")
        .env_remove("FOLIO_LOGIN_PASSWORD")
        .env("RUST_LOG", "warn");
    cmd
}

fn login(data_dir: &Path) {
    folio(data_dir)
        .args(["login", "--username", USER, "--password", PASS])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Signed in until"));
}

/// Create a post and return its id.
fn create_post(data_dir: &Path, title: &str, body: &str, extra: &[&str]) -> i64 {
    let content = data_dir.join(format!("{}.md", title.replace(' ', "_")));
    std::fs::write(&content, body).unwrap();

    let output = folio(data_dir)
        .args(["posts", "new", "--title", title, "--content-file"])
        .arg(&content)
        .args(extra)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    stdout
        .trim()
        .strip_prefix("Saved post ")
        .expect("saved line")
        .parse()
        .expect("post id")
}

#[test]
fn version_prints_name() {
    let dir = TempDir::new().unwrap();
    folio(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("folio_cli "));
}

#[test]
fn sanitize_reads_stdin() {
    let dir = TempDir::new().unwrap();
    folio(dir.path())
        .arg("sanitize")
        .write_stdin("<script>alert(1)</script><p>hi</p>")
        .assert()
        .success()
        .stdout("<p>hi</p>\n");
}

#[test]
fn empty_blog_lists_no_posts() {
    let dir = TempDir::new().unwrap();
    folio(dir.path())
        .args(["posts", "list"])
        .assert()
        .success()
        .stdout("No posts\n");
}

#[test]
fn wrong_password_is_rejected() {
    let dir = TempDir::new().unwrap();
    folio(dir.path())
        .args(["login", "--username", USER, "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));
    folio(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout("Signed out\n");
}

#[test]
fn login_fails_closed_without_configured_credentials() {
    let dir = TempDir::new().unwrap();
    folio(dir.path())
        .env_remove("FOLIO_ADMIN_USERNAME")
        .env_remove("FOLIO_ADMIN_PASSWORD")
        .args(["login", "--username", "admin", "--password", "admin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));
}

#[test]
fn writes_require_a_session() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("post.md");
    std::fs::write(&content, "body").unwrap();

    folio(dir.path())
        .args(["posts", "new", "--title", "Nope", "--content-file"])
        .arg(&content)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
    folio(dir.path())
        .args(["posts", "delete", "1"])
        .assert()
        .failure();
    folio(dir.path())
        .args(["posts", "list", "--all"])
        .assert()
        .failure();
}

#[test]
fn admin_publishes_edits_and_deletes_a_post() {
    let dir = TempDir::new().unwrap();
    login(dir.path());
    folio(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Signed in until"));

    let id = create_post(
        dir.path(),
        "Hello Rust",
        "Some <b>bold</b> text<script>alert(1)</script>",
        &[
            "--publish",
            "--category",
            "Rust",
            "--tag",
            "systems",
            "--golden-link",
            "https://doc.rust-lang.org|Docs",
        ],
    );
    let draft_id = create_post(dir.path(), "Secret draft", "wip", &[]);

    folio(dir.path())
        .args(["posts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello Rust"))
        .stdout(predicate::str::contains("Secret draft").not());
    folio(dir.path())
        .args(["posts", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Secret draft"));
    folio(dir.path())
        .args(["posts", "list", "--tag", "SYSTEMS"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello Rust"));
    folio(dir.path())
        .args(["posts", "categories"])
        .assert()
        .success()
        .stdout("Rust\n");

    folio(dir.path())
        .args(["posts", "show", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Hello Rust"))
        .stdout(predicate::str::contains("Some <b>bold</b> text"))
        .stdout(predicate::str::contains("<script>").not())
        .stdout(predicate::str::contains("- Docs: https://doc.rust-lang.org"));

    folio(dir.path())
        .args(["posts", "edit", &id.to_string(), "--title", "Hello again"])
        .assert()
        .success();
    folio(dir.path())
        .args(["posts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello again"))
        .stdout(predicate::str::contains("Hello Rust").not());

    folio(dir.path())
        .args(["posts", "delete", &id.to_string()])
        .assert()
        .success()
        .stdout(format!("Deleted post {id}\n"));
    folio(dir.path())
        .args(["posts", "show", &id.to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    folio(dir.path()).arg("logout").assert().success();

    // Drafts are hidden from the public once signed out.
    folio(dir.path())
        .args(["posts", "show", &draft_id.to_string()])
        .assert()
        .failure();
    folio(dir.path())
        .args(["posts", "delete", &draft_id.to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn session_is_unreadable_with_another_storage_key() {
    let dir = TempDir::new().unwrap();
    login(dir.path());
    folio(dir.path())
        .env("FOLIO_STORAGE_KEY", "different-key")
        .arg("status")
        .assert()
        .success()
        .stdout("Signed out\n");
}

#[test]
fn login_attempts_are_limited_across_invocations() {
    let dir = TempDir::new().unwrap();
    for _ in 0..2 {
        folio(dir.path())
            .env("FOLIO_RATE_LIMIT_MAX", "2")
            .args(["login", "--username", USER, "--password", "wrong"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid credentials"));
    }
    folio(dir.path())
        .env("FOLIO_RATE_LIMIT_MAX", "2")
        .args(["login", "--username", USER, "--password", PASS])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Too many attempts"));
    folio(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout("Signed out\n");
}
