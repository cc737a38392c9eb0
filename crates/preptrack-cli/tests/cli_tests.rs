//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A `preptrack` command isolated inside `dir`.
fn preptrack(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("preptrack").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("PREPTRACK_IDENTITY_URL")
        .env_remove("PREPTRACK_CORE_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn profile_cache(dir: &TempDir) -> PathBuf {
    dir.path().join("profile.json")
}

/// Point both services at `uri` with a config picked up from the working directory.
fn write_config(dir: &TempDir, uri: &str) {
    let config = format!(
        "identity_base_url = \"{uri}\"\ncore_base_url = \"{uri}\"\ntimeout_secs = 5\nprofile_cache = \"{}\"\n",
        profile_cache(dir).display()
    );
    std::fs::write(dir.path().join("preptrack.toml"), config).unwrap();
}

fn log_in(dir: &TempDir, target_exam: Option<&str>) {
    let cached = json!({
        "token": "tok-1",
        "profile": {
            "id": "u1",
            "name": "Ada",
            "email": "ada@example.com",
            "target_exam": target_exam
        },
        "stored_at": "2026-01-01T00:00:00Z"
    });
    std::fs::write(profile_cache(dir), cached.to_string()).unwrap();
}

fn evaluation_json(score: f64, correct: u32, wrong: u32) -> serde_json::Value {
    json!({
        "id": "ev-1",
        "exam_id": "gre",
        "score_percentage": score,
        "correct": correct,
        "wrong": wrong,
        "skipped": 0,
        "time_taken": 9.0,
        "concepts": [
            {"concept": "arithmetic", "score_percentage": score, "correct": correct, "total": correct + wrong}
        ]
    })
}

async fn mount_exam(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/exams/gre"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": "gre",
                "title": "GRE Quant",
                "total_questions": 2,
                "page": 1,
                "questions": [
                    {
                        "id": "q1",
                        "prompt": "2 + 2 = ?",
                        "correct_answer": {"id": "a", "text": "4"},
                        "distractors": [{"id": "b", "text": "5"}],
                        "difficulty": "easy",
                        "avg_completion_secs": 20.0
                    },
                    {
                        "id": "q2",
                        "prompt": "3 + 3 = ?",
                        "correct_answer": {"id": "d", "text": "6"},
                        "distractors": [{"id": "c", "text": "7"}],
                        "avg_completion_secs": 40.0
                    }
                ]
            }
        })))
        .mount(server)
        .await;
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    preptrack(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("take"))
        .stdout(predicate::str::contains("study-guide"))
        .stdout(predicate::str::contains("test-path"));
}

#[test]
fn init_creates_config_once() {
    let dir = TempDir::new().unwrap();
    preptrack(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created preptrack.toml"));
    assert!(dir.path().join("preptrack.toml").exists());

    preptrack(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    preptrack(&dir)
        .args(["profile", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn profile_requires_login() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "http://127.0.0.1:9");
    preptrack(&dir)
        .arg("profile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: you must be logged in"));
}

#[test]
fn study_guide_needs_a_target() {
    let dir = TempDir::new().unwrap();
    preptrack(&dir).arg("study-guide").assert().failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn login_caches_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"token": "tok-1", "user": {"id": "u1", "name": "Ada", "email": "ada@example.com"}}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    preptrack(&dir)
        .args(["login", "--email", "ada@example.com", "--password", "hunter22"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as Ada."));

    let cached = std::fs::read_to_string(profile_cache(&dir)).unwrap();
    assert!(cached.contains("tok-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn login_reads_password_from_stdin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({"password": "from-stdin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"token": "tok-2", "user": {"id": "u1", "name": "Ada", "email": "ada@example.com"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    preptrack(&dir)
        .args(["login", "--email", "ada@example.com"])
        .write_stdin("from-stdin\n")
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_login_shows_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "data": "Invalid email or password"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    preptrack(&dir)
        .args(["login", "--email", "ada@example.com", "--password", "wrong-pass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Invalid email or password"));
    assert!(!profile_cache(&dir).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn server_outage_shows_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    log_in(&dir, None);
    preptrack(&dir)
        .arg("profile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: An unexpected error occurred"));
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_clears_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("cookie", "token=tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": null})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    log_in(&dir, None);
    preptrack(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));
    assert!(!profile_cache(&dir).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn take_exam_answers_and_submits() {
    let server = MockServer::start().await;
    mount_exam(&server).await;
    Mock::given(method("POST"))
        .and(path("/evaluations"))
        .and(header("cookie", "token=tok-1"))
        .and(body_partial_json(json!({
            "exam_id": "gre",
            "is_init": true,
            "responses": [
                {"question_id": "q1", "answer_id": "a"},
                {"question_id": "q2", "answer_id": "c"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": evaluation_json(50.0, 1, 1)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    log_in(&dir, None);
    preptrack(&dir)
        .args(["take", "--exam-id", "gre", "--init"])
        .write_stdin("1\n\n1\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/2 [easy] (45s)"))
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Question 2/2 [medium] (60s)"))
        .stdout(predicate::str::contains("Incorrect. The answer is: 6"))
        .stdout(predicate::str::contains("Score: 50.0% (1 correct, 1 wrong, 0 skipped, 9s)"))
        .stdout(predicate::str::contains("arithmetic"));
}

#[tokio::test(flavor = "multi_thread")]
async fn quitting_an_exam_submits_nothing() {
    let server = MockServer::start().await;
    mount_exam(&server).await;
    Mock::given(method("POST"))
        .and(path("/evaluations"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    log_in(&dir, None);
    preptrack(&dir)
        .args(["take", "--exam-id", "gre"])
        .write_stdin("s\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 2/2"))
        .stdout(predicate::str::contains("Exam abandoned"));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_first_load_offers_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exams/gre"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_exam(&server).await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    log_in(&dir, None);
    preptrack(&dir)
        .args(["take", "--exam-id", "gre"])
        .write_stdin("\nq\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("An unexpected error occurred"))
        .stdout(predicate::str::contains("Retry? [Y/n]"))
        .stdout(predicate::str::contains("Question 1/2"))
        .stdout(predicate::str::contains("Exam abandoned"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_exam_reports_server_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exams/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "data": "Exam not found"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    log_in(&dir, None);
    preptrack(&dir)
        .args(["take", "--exam-id", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Exam not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_path_defaults_to_target_exam() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test-paths/gre"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "exam_id": "gre",
                "stages": [
                    {"id": "s1", "title": "Diagnostic", "completed": true},
                    {"id": "s2", "title": "Quant drills", "exam_ids": ["gre-q1"]}
                ]
            }
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    log_in(&dir, Some("gre"));
    preptrack(&dir)
        .arg("test-path")
        .assert()
        .success()
        .stdout(predicate::str::contains("Next up: Quant drills"));
}

#[tokio::test(flavor = "multi_thread")]
async fn result_prints_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/evaluations/ev-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": evaluation_json(100.0, 2, 0)
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());
    log_in(&dir, None);
    let output = preptrack(&dir)
        .args(["result", "--id", "ev-1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["score_percentage"], 100.0);
}
